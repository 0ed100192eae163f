use crate::models::{FilterCriteria, FlatServiceRecord};

/// Keep records matching every criterion
///
/// Category is an exact, case-sensitive match unless it is empty or equals
/// `all_label`. Price is inclusive on both ends, rating is a floor.
pub fn filter(
    records: &[FlatServiceRecord],
    criteria: &FilterCriteria,
    all_label: &str,
) -> Vec<FlatServiceRecord> {
    let any_category = criteria.category.is_empty() || criteria.category == all_label;
    let (min_price, max_price) = criteria.price_range;

    records
        .iter()
        .filter(|r| any_category || r.category == criteria.category)
        .filter(|r| r.price >= min_price && r.price <= max_price)
        .filter(|r| r.rating >= criteria.rating)
        .cloned()
        .collect()
}

/// Labels for the category tab strip: `all_label`, then every category in
/// the order it first shows up
pub fn category_tabs(records: &[FlatServiceRecord], all_label: &str) -> Vec<String> {
    let mut tabs = vec![all_label.to_string()];
    for record in records {
        if !tabs.iter().any(|t| t == &record.category) {
            tabs.push(record.category.clone());
        }
    }
    tabs
}
