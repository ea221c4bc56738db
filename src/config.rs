// src/config.rs
// Environment- and file-backed configuration consumed by the core.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_GROQ_KEY: &str = "GROQ_API_KEY";
pub const ENV_YOUTUBE_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_TECH_VOCAB_PATH: &str = "TREND_TECH_VOCAB_PATH";
pub const ENV_NEWS_VOCAB_PATH: &str = "TREND_NEWS_VOCAB_PATH";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Required for enrichment and generation. Absence disables both
    /// capabilities (surfaced as a configuration error, not a crash).
    pub groq_api_key: Option<String>,
    /// Optional; without it the YouTube adapter degrades to empty results.
    pub youtube_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            groq_api_key: non_empty_env(ENV_GROQ_KEY),
            youtube_api_key: non_empty_env(ENV_YOUTUBE_KEY),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load a keyword vocabulary from an explicit path. Supports TOML
/// (`terms = [...]`) and plain JSON arrays.
pub fn load_vocabulary_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading vocabulary from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_vocabulary(&content, ext.as_str())
}

/// Resolve a vocabulary for the given env var, falling back to the built-in
/// list when no override is configured.
pub fn load_vocabulary_or(env_path: &str, builtin: &[&str]) -> Result<Vec<String>> {
    if let Ok(p) = std::env::var(env_path) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_vocabulary_from(&pb);
        }
        return Err(anyhow!("{env_path} points to a non-existent path"));
    }
    Ok(builtin.iter().map(|s| s.to_string()).collect())
}

fn parse_vocabulary(s: &str, hint_ext: &str) -> Result<Vec<String>> {
    let try_toml = hint_ext == "toml" || s.contains("terms");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported vocabulary format"))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlVocab {
        terms: Vec<String>,
    }
    let v: TomlVocab = toml::from_str(s)?;
    Ok(clean_list(v.terms))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn parses_toml_and_json_with_dedup_and_lowercase() {
        let toml = r#"terms = [" AI ", "", "Crypto", "crypto"]"#;
        let json = r#"["Modi", "  cricket  ", ""]"#;
        assert_eq!(parse_toml(toml).unwrap(), vec!["ai", "crypto"]);
        assert_eq!(parse_json(json).unwrap(), vec!["cricket", "modi"]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_vocabulary("not a vocab at all", "txt").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn env_override_wins_over_builtin() {
        // Scratch env var so the real vocabulary statics stay untouched.
        const SCRATCH: &str = "TREND_VOCAB_SCRATCH_PATH";
        let tmp = env::temp_dir().join("trend_vocab_test.json");
        fs::write(&tmp, r#"["solar"]"#).unwrap();
        env::set_var(SCRATCH, tmp.display().to_string());

        let v = load_vocabulary_or(SCRATCH, &["ai"]).unwrap();
        assert_eq!(v, vec!["solar"]);

        env::remove_var(SCRATCH);
        let v = load_vocabulary_or(SCRATCH, &["ai"]).unwrap();
        assert_eq!(v, vec!["ai".to_string()]);
        let _ = fs::remove_file(tmp);
    }

    #[serial_test::serial]
    #[test]
    fn missing_keys_read_as_none() {
        env::remove_var(ENV_GROQ_KEY);
        env::remove_var(ENV_YOUTUBE_KEY);
        let cfg = AppConfig::from_env();
        assert!(cfg.groq_api_key.is_none());
        assert!(cfg.youtube_api_key.is_none());
    }
}
