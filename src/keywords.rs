// src/keywords.rs
// Text Extractor: turns raw item titles into candidate hashtag keywords.
// Word-boundary tokenization only, no stemming. Deterministic for a given
// (text, rule) pair.

use crate::config::{load_vocabulary_or, ENV_NEWS_VOCAB_PATH, ENV_TECH_VOCAB_PATH};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing::warn;

const BUILTIN_TECH_TERMS: &[&str] = &[
    "ai",
    "data",
    "tech",
    "app",
    "web",
    "code",
    "dev",
    "api",
    "ml",
    "crypto",
    "blockchain",
];

const BUILTIN_NEWS_TERMS: &[&str] = &[
    "india",
    "delhi",
    "mumbai",
    "bangalore",
    "chennai",
    "kolkata",
    "modi",
    "bjp",
    "congress",
    "bollywood",
    "cricket",
    "ipl",
    "startup",
    "tech",
    "election",
    "government",
    "health",
    "education",
    "economy",
    "business",
    "finance",
];

/// Tech vocabulary applied to Hacker News titles. File override via
/// `TREND_TECH_VOCAB_PATH`; built-in list otherwise.
pub static TECH_TERMS: Lazy<Vec<String>> =
    Lazy::new(|| resolve_vocabulary(ENV_TECH_VOCAB_PATH, BUILTIN_TECH_TERMS));

/// India-news vocabulary applied to RSS headline text. File override via
/// `TREND_NEWS_VOCAB_PATH`; built-in list otherwise.
pub static NEWS_TERMS: Lazy<Vec<String>> =
    Lazy::new(|| resolve_vocabulary(ENV_NEWS_VOCAB_PATH, BUILTIN_NEWS_TERMS));

fn resolve_vocabulary(env_key: &str, builtin: &[&str]) -> Vec<String> {
    match load_vocabulary_or(env_key, builtin) {
        Ok(terms) => terms,
        Err(e) => {
            warn!(vocabulary = env_key, error = %e, "vocabulary override failed, using built-in list");
            builtin.iter().map(|s| s.to_string()).collect()
        }
    }
}

/// Inclusion rule applied after tokenization.
#[derive(Debug, Clone)]
pub enum KeywordRule<'a> {
    /// Keep tokens longer than 3 chars that are not pure digit strings.
    Generic { take: usize },
    /// Keep tokens longer than 2 chars present in a curated vocabulary.
    Vocabulary { terms: &'a [String], take: usize },
}

/// Lowercased alphanumeric tokens, in order of appearance.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

/// Extract candidate keywords from a title according to the caller's rule.
pub fn extract_keywords(text: &str, rule: &KeywordRule<'_>) -> Vec<String> {
    match rule {
        KeywordRule::Generic { take } => tokenize(text)
            .filter(|w| w.len() > 3 && !w.chars().all(|c| c.is_ascii_digit()))
            .take(*take)
            .collect(),
        KeywordRule::Vocabulary { terms, take } => tokenize(text)
            .filter(|w| w.len() > 2 && terms.iter().any(|t| t == w))
            .take(*take)
            .collect(),
    }
}

/// Normalize a feed/item title before tokenization: CDATA markers out,
/// HTML entities decoded, tags stripped, whitespace collapsed.
pub fn normalize_title(raw: &str) -> String {
    let mut out = raw.replace("<![CDATA[", "").replace("]]>", "");
    out = html_escape::decode_html_entities(&out).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_rule_keeps_long_non_numeric_tokens() {
        let words = extract_keywords(
            "Massive breakthrough announced today",
            &KeywordRule::Generic { take: 2 },
        );
        assert_eq!(words, vec!["massive", "breakthrough"]);
    }

    #[test]
    fn generic_rule_skips_digits_and_short_words() {
        let words =
            extract_keywords("Top 2024 AI wins 100 prizes", &KeywordRule::Generic { take: 2 });
        // "top"/"ai" too short, "2024"/"100" numeric
        assert_eq!(words, vec!["wins", "prizes"]);
    }

    #[test]
    fn vocabulary_rule_only_matches_curated_terms() {
        let words = extract_keywords(
            "Show HN: my crypto side project in Rust",
            &KeywordRule::Vocabulary {
                terms: &TECH_TERMS,
                take: 1,
            },
        );
        assert_eq!(words, vec!["crypto"]);
    }

    #[test]
    fn vocabulary_rule_returns_empty_without_matches() {
        let words = extract_keywords(
            "Nothing relevant here",
            &KeywordRule::Vocabulary {
                terms: &TECH_TERMS,
                take: 2,
            },
        );
        assert!(words.is_empty());
    }

    #[test]
    fn normalize_title_strips_cdata_entities_and_tags() {
        let s = "<![CDATA[Fed &amp; markets <b>rally</b>   today]]>";
        assert_eq!(normalize_title(s), "Fed & markets rally today");
    }

    #[test]
    fn extraction_is_deterministic() {
        let rule = KeywordRule::Generic { take: 2 };
        let a = extract_keywords("breaking news update", &rule);
        let b = extract_keywords("breaking news update", &rule);
        assert_eq!(a, b);
        assert_eq!(a, vec!["breaking", "news"]);
    }
}
