// src/themes.rs
// Theme Extractor: groups consolidated hashtags by category and derives a
// bounded popularity weight per group.

use crate::model::{Hashtag, SourceName, Theme};
use std::collections::HashMap;

const MAX_THEMES: usize = 5;
const WEIGHT_DIVISOR: f64 = 1000.0;

/// Group hashtags by category (default "General"), weight each theme by
/// summed engagement normalized into [0, 1], attach the source platform,
/// sort descending and keep the top 5.
pub fn extract_themes(hashtags: &[Hashtag], platform: SourceName) -> Vec<Theme> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, u64> = HashMap::new();

    for h in hashtags {
        let category = if h.category.is_empty() {
            "General".to_string()
        } else {
            h.category.clone()
        };
        if !sums.contains_key(&category) {
            order.push(category.clone());
        }
        *sums.entry(category).or_insert(0) += h.engagement;
    }

    let mut themes: Vec<Theme> = order
        .into_iter()
        .map(|name| {
            let sum = sums[&name];
            Theme {
                name,
                weight: ((sum as f64) / WEIGHT_DIVISOR).min(1.0),
                platforms: vec![platform],
            }
        })
        .collect();

    themes.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    themes.truncate(MAX_THEMES);
    themes
}
