use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use evergreens_chat::PromptRevision;
use evergreens_chat::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub chat: ChatConfig,
}

#[derive(Debug)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub prompt: PromptRevision,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let port = var("EVERGREENS_PORT", "3000")
            .parse::<u16>()
            .context("EVERGREENS_PORT must be a port number")?;

        let prompt = match lookup("EVERGREENS_CHAT_PROMPT") {
            Some(raw) => raw.trim().parse::<PromptRevision>().with_context(|| {
                format!("EVERGREENS_CHAT_PROMPT must be 'guided' or 'no-commercial-terms', got '{raw}'")
            })?,
            None => PromptRevision::default(),
        };

        let timeout = lookup("EVERGREENS_CHAT_TIMEOUT_SECS")
            .map(|raw| raw.parse::<u64>().map(Duration::from_secs))
            .transpose()
            .context("EVERGREENS_CHAT_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            host: var("EVERGREENS_HOST", "0.0.0.0"),
            port,
            db_path: var("EVERGREENS_DB_PATH", "evergreens.db").into(),
            chat: ChatConfig {
                api_key: lookup("GEMINI_API_KEY"),
                model: var("EVERGREENS_CHAT_MODEL", DEFAULT_MODEL),
                api_base: var("EVERGREENS_CHAT_API_BASE", DEFAULT_API_BASE),
                prompt,
                timeout,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.db_path, PathBuf::from("evergreens.db"));
        assert_eq!(cfg.chat.model, "gemini-3-flash-preview");
        assert_eq!(cfg.chat.prompt, PromptRevision::Guided);
        assert!(cfg.chat.api_key.is_none());
        assert!(cfg.chat.timeout.is_none());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("EVERGREENS_PORT", "8080"),
            ("EVERGREENS_DB_PATH", "/var/lib/evergreens/portal.db"),
            ("GEMINI_API_KEY", "abc"),
            ("EVERGREENS_CHAT_PROMPT", " no-commercial-terms "),
            ("EVERGREENS_CHAT_TIMEOUT_SECS", "20"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.db_path, PathBuf::from("/var/lib/evergreens/portal.db"));
        assert_eq!(cfg.chat.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.chat.prompt, PromptRevision::NoCommercialTerms);
        assert_eq!(cfg.chat.timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn malformed_values_fail() {
        assert!(config(&[("EVERGREENS_PORT", "http")]).is_err());
        assert!(config(&[("EVERGREENS_CHAT_PROMPT", "friendly")]).is_err());
        assert!(config(&[("EVERGREENS_CHAT_TIMEOUT_SECS", "soon")]).is_err());
    }
}
