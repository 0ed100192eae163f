use crate::models::FlatServiceRecord;
use std::cmp::Ordering;

/// The sort options offered on the filter screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    MostPopular,
    HighestRating,
    LowestPrice,
    HighestPrice,
    /// No timestamp exists on services, so this keeps input order
    Newest,
}

impl SortStrategy {
    pub fn all() -> Vec<SortStrategy> {
        vec![
            SortStrategy::MostPopular,
            SortStrategy::HighestRating,
            SortStrategy::LowestPrice,
            SortStrategy::HighestPrice,
            SortStrategy::Newest,
        ]
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            SortStrategy::MostPopular => "Most Popular",
            SortStrategy::HighestRating => "Highest Rating",
            SortStrategy::LowestPrice => "Lowest Price",
            SortStrategy::HighestPrice => "Highest Price",
            SortStrategy::Newest => "Newest",
        }
    }

    /// Accepts display labels and camelCase keys alike
    /// ("Highest Price", "highest price", "highestPrice", "highest-price")
    pub fn from_label(label: &str) -> Option<SortStrategy> {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "mostpopular" => Some(SortStrategy::MostPopular),
            "highestrating" => Some(SortStrategy::HighestRating),
            "lowestprice" => Some(SortStrategy::LowestPrice),
            "highestprice" => Some(SortStrategy::HighestPrice),
            "newest" => Some(SortStrategy::Newest),
            _ => None,
        }
    }

    fn compare(&self, a: &FlatServiceRecord, b: &FlatServiceRecord) -> Ordering {
        match self {
            SortStrategy::MostPopular => b.reviews.cmp(&a.reviews),
            SortStrategy::HighestRating => b.rating.total_cmp(&a.rating),
            SortStrategy::LowestPrice => a.price.total_cmp(&b.price),
            SortStrategy::HighestPrice => b.price.total_cmp(&a.price),
            SortStrategy::Newest => Ordering::Equal,
        }
    }

    /// Stable sort into a new vector; ties keep their input order
    pub fn apply(&self, records: &[FlatServiceRecord]) -> Vec<FlatServiceRecord> {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}

impl std::fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sort by the label the user picked; unknown labels leave the order alone
pub fn sort(records: &[FlatServiceRecord], strategy: &str) -> Vec<FlatServiceRecord> {
    match SortStrategy::from_label(strategy) {
        Some(strategy) => strategy.apply(records),
        None => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, price: f64, rating: f64, reviews: u32) -> FlatServiceRecord {
        FlatServiceRecord {
            id: id.to_string(),
            provider_name: "Provider".to_string(),
            service_name: id.to_string(),
            price,
            rating,
            reviews,
            image: String::new(),
            background_color: String::new(),
            category: "Cleaning".to_string(),
        }
    }

    fn records() -> Vec<FlatServiceRecord> {
        vec![
            record("a", 40.0, 4.5, 10),
            record("b", 20.0, 4.9, 300),
            record("c", 40.0, 4.5, 300),
            record("d", 75.0, 3.8, 42),
        ]
    }

    fn ids(records: &[FlatServiceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_from_label_variants() {
        assert_eq!(
            SortStrategy::from_label("Most Popular"),
            Some(SortStrategy::MostPopular)
        );
        assert_eq!(
            SortStrategy::from_label("highestPrice"),
            Some(SortStrategy::HighestPrice)
        );
        assert_eq!(
            SortStrategy::from_label("lowest_price"),
            Some(SortStrategy::LowestPrice)
        );
        assert_eq!(SortStrategy::from_label("cheapest"), None);
        assert_eq!(SortStrategy::from_label(""), None);
    }

    #[test]
    fn test_labels_round_trip() {
        for strategy in SortStrategy::all() {
            assert_eq!(SortStrategy::from_label(strategy.label()), Some(strategy));
        }
    }

    #[test]
    fn test_most_popular_is_stable() {
        // b and c tie on reviews and keep their input order
        assert_eq!(ids(&sort(&records(), "most popular")), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_highest_rating() {
        assert_eq!(ids(&sort(&records(), "highest rating")), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_price_orders() {
        assert_eq!(ids(&sort(&records(), "lowest price")), vec!["b", "a", "c", "d"]);
        assert_eq!(ids(&sort(&records(), "highest price")), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_newest_and_unknown_are_no_ops() {
        assert_eq!(ids(&sort(&records(), "newest")), vec!["a", "b", "c", "d"]);
        assert_eq!(ids(&sort(&records(), "alphabetical")), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_leaves_input_alone() {
        let input = records();
        let _ = sort(&input, "highestPrice");
        assert_eq!(input, records());
    }
}
