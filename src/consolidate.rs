// src/consolidate.rs
// Hashtag Consolidator: case-insensitive duplicate merge by engagement sum.
// Pure and deterministic; ties keep original encounter order (stable sort).

use crate::model::Hashtag;
use std::collections::HashMap;

/// Public cap applied to consolidated source results.
pub const DEFAULT_CAP: usize = 12;

/// Merge duplicate tags (case-insensitive), summing engagement. All other
/// fields come from the first occurrence, including its casing. Sorted
/// descending by merged engagement, truncated to `cap`.
pub fn consolidate_hashtags(hashtags: Vec<Hashtag>, cap: usize) -> Vec<Hashtag> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, Hashtag> = HashMap::new();

    for h in hashtags {
        let key = h.tag.to_lowercase();
        match merged.get_mut(&key) {
            Some(existing) => existing.engagement += h.engagement,
            None => {
                order.push(key.clone());
                merged.insert(key, h);
            }
        }
    }

    let mut out: Vec<Hashtag> = order
        .into_iter()
        .map(|key| merged.remove(&key).expect("key inserted above"))
        .collect();
    out.sort_by(|a, b| b.engagement.cmp(&a.engagement));
    out.truncate(cap);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceName;

    fn tag(name: &str, engagement: u64) -> Hashtag {
        Hashtag::raw(name, engagement, SourceName::Reddit, "General")
    }

    #[test]
    fn merges_case_insensitively_and_keeps_first_seen_casing() {
        let out = consolidate_hashtags(vec![tag("AI", 10), tag("ai", 5)], DEFAULT_CAP);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, "AI");
        assert_eq!(out[0].engagement, 15);
    }

    #[test]
    fn preserves_total_engagement() {
        let input = vec![tag("rust", 7), tag("linux", 3), tag("RUST", 5)];
        let total_in: u64 = input.iter().map(|h| h.engagement).sum();
        let out = consolidate_hashtags(input, DEFAULT_CAP);
        let total_out: u64 = out.iter().map(|h| h.engagement).sum();
        assert_eq!(total_in, total_out);
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let input: Vec<Hashtag> = (0..20).map(|i| tag(&format!("t{i}"), i as u64)).collect();
        let out = consolidate_hashtags(input, DEFAULT_CAP);
        assert_eq!(out.len(), DEFAULT_CAP);
        assert!(out.windows(2).all(|w| w[0].engagement >= w[1].engagement));
        assert_eq!(out[0].engagement, 19);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let out = consolidate_hashtags(vec![tag("first", 5), tag("second", 5)], DEFAULT_CAP);
        assert_eq!(out[0].tag, "first");
        assert_eq!(out[1].tag, "second");
    }

    #[test]
    fn smaller_cap_bounds_enrichment_candidates() {
        let input: Vec<Hashtag> = (0..6).map(|i| tag(&format!("t{i}"), 10 - i as u64)).collect();
        let out = consolidate_hashtags(input, 3);
        assert_eq!(out.len(), 3);
    }
}
