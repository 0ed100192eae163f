use crate::models::{Category, FlatServiceRecord, PLACEHOLDER_IMAGE, PLACEHOLDER_PROVIDER};

/// Flatten categories into display-ready records
///
/// One record per service, in category-then-service order. `translate` maps
/// a category name to whatever the current locale calls it.
pub fn project<F>(categories: &[Category], translate: F) -> Vec<FlatServiceRecord>
where
    F: Fn(&str) -> String,
{
    categories
        .iter()
        .flat_map(|category| {
            let label = translate(&category.name);
            category.services.iter().map(move |service| FlatServiceRecord {
                id: service.id.clone(),
                provider_name: service
                    .example_provider_name
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_PROVIDER.to_string()),
                service_name: service.name.clone(),
                price: service.price,
                rating: service.rating,
                reviews: service.reviews,
                image: service
                    .hero_image
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                background_color: category.color.clone(),
                category: label.clone(),
            })
        })
        .collect()
}
