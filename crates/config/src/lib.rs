use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Environment variable holding the search-capability credential.
pub const SEARCH_API_KEY_VAR: &str = "TAVILY_API_KEY";
/// Environment variable holding the language-model credential.
pub const LLM_API_KEY_VAR: &str = "GROQ_API_KEY";

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible chat-completions API.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Ask the model for one extra assistant message after every search.
    /// Off by default: the fixed replies of the gathering and search steps
    /// are the whole conversation.
    pub follow_up_replies: bool,
    /// Overridden at runtime by `GROQ_API_KEY` when that variable is set.
    pub api_key: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
            temperature: 0.5,
            follow_up_replies: false,
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    /// Upper bound on results requested per search.
    pub max_results: usize,
    /// Overall request timeout.  Unset means the HTTP client default.
    pub timeout_secs: Option<u64>,
    /// Overridden at runtime by `TAVILY_API_KEY` when that variable is set.
    pub api_key: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            max_results: 5,
            timeout_secs: None,
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub url: String,
    pub output_path: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: "https://blog.govtribe.com/top-20-federal-contracting-opportunities-in-january-2024"
                .to_string(),
            output_path: "scraped_content.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub scraper: ScraperConfig,
    pub telemetry: TelemetryConfig,
}

/// Both API keys, checked once at startup and held for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub search_api_key: String,
    pub llm_api_key: String,
}

impl AppConfig {
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)?;
        }

        // Env keys take precedence over the config file.
        if let Ok(key) = env::var(SEARCH_API_KEY_VAR) {
            if !key.is_empty() {
                config.search.api_key = key;
            }
        }
        if let Ok(key) = env::var(LLM_API_KEY_VAR) {
            if !key.is_empty() {
                config.llm.api_key = key;
            }
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Validate that both credentials are present.  The error names the
    /// first missing setting, search key first.
    pub fn credentials(&self) -> Result<Credentials> {
        if self.search.api_key.trim().is_empty() {
            bail!("{SEARCH_API_KEY_VAR} is not set in the environment or .env file");
        }
        if self.llm.api_key.trim().is_empty() {
            bail!("{LLM_API_KEY_VAR} is not set in the environment or .env file");
        }
        Ok(Credentials {
            search_api_key: self.search.api_key.clone(),
            llm_api_key: self.llm.api_key.clone(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests that touch process env vars must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_key_vars() {
        // SAFETY: callers hold ENV_LOCK.
        unsafe {
            env::remove_var(SEARCH_API_KEY_VAR);
            env::remove_var(LLM_API_KEY_VAR);
        }
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.llm.model, "llama3-70b-8192");
        assert!((cfg.llm.temperature - 0.5).abs() < f32::EPSILON);
        assert!(!cfg.llm.follow_up_replies);
        assert_eq!(cfg.search.max_results, 5);
        assert_eq!(cfg.search.base_url, "https://api.tavily.com");
        assert!(cfg.search.timeout_secs.is_none());
        assert_eq!(cfg.scraper.output_path, "scraped_content.txt");
        assert!(cfg.scraper.url.starts_with("https://blog.govtribe.com/"));
        assert_eq!(cfg.telemetry.log_level, "warn");
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_key_vars();
        let dir = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(cfg.search.max_results, 5);
        assert!(cfg.search.api_key.is_empty());
    }

    #[test]
    fn load_from_partial_toml_fills_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_key_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(
            &path,
            r#"
[search]
max_results = 3
timeout_secs = 20

[llm]
follow_up_replies = true
"#,
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.search.max_results, 3);
        assert_eq!(cfg.search.timeout_secs, Some(20));
        assert!(cfg.llm.follow_up_replies);
        assert_eq!(cfg.llm.model, "llama3-70b-8192");
        assert_eq!(cfg.scraper.output_path, "scraped_content.txt");
    }

    #[test]
    fn load_from_invalid_toml_returns_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_key_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub/config.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.model = "llama-3.3-70b-versatile".to_string();
        cfg.scraper.output_path = "out/page.txt".to_string();
        cfg.save_to(&path).unwrap();
        assert!(path.exists());

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(loaded.scraper.output_path, "out/page.txt");
    }

    #[test]
    fn env_keys_override_config_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.toml");
        fs::write(
            &path,
            r#"
[search]
api_key = "from-file"

[llm]
api_key = "llm-from-file"
"#,
        )
        .unwrap();

        // SAFETY: guarded by ENV_LOCK.
        unsafe { env::set_var(SEARCH_API_KEY_VAR, "from-env") };
        unsafe { env::remove_var(LLM_API_KEY_VAR) };
        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.search.api_key, "from-env");
        assert_eq!(cfg.llm.api_key, "llm-from-file");
        clear_key_vars();
    }

    #[test]
    fn credentials_report_missing_search_key_first() {
        let cfg = AppConfig::default();
        let err = cfg.credentials().unwrap_err().to_string();
        assert!(err.contains("TAVILY_API_KEY"), "got: {err}");
    }

    #[test]
    fn credentials_report_missing_llm_key() {
        let mut cfg = AppConfig::default();
        cfg.search.api_key = "tvly-123".to_string();
        cfg.llm.api_key = "   ".to_string();
        let err = cfg.credentials().unwrap_err().to_string();
        assert!(err.contains("GROQ_API_KEY"), "got: {err}");
    }

    #[test]
    fn credentials_ok_when_both_set() {
        let mut cfg = AppConfig::default();
        cfg.search.api_key = "tvly-123".to_string();
        cfg.llm.api_key = "gsk-456".to_string();
        let creds = cfg.credentials().unwrap();
        assert_eq!(creds.search_api_key, "tvly-123");
        assert_eq!(creds.llm_api_key, "gsk-456");
    }
}
