//! Run configuration.
//!
//! [`PipelineConfig`] is built once at startup and handed to the
//! [`Pipeline`](crate::pipeline::Pipeline). Values are layered:
//!
//! 1. built-in defaults ([`PipelineConfig::default`])
//! 2. an optional YAML file (`--config digest.yaml`)
//! 3. command-line flags and environment variables (see [`crate::cli`])
//!
//! # Example file
//!
//! ```yaml
//! listing_url: https://www.artificialintelligence-news.com/artificial-intelligence-news/
//! num_articles: 5
//! provider: gemini
//! model_name: gemini-1.5-pro
//! link_selectors:
//!   - ".post-list h2 a"
//! pacing_delay_secs: 2.0
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_LISTING_URL: &str =
    "https://www.artificialintelligence-news.com/artificial-intelligence-news/";

/// Browser-like User-Agent; some sites refuse obvious bots outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/124.0.0.0 Safari/537.36";

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Which completion API the summarizer talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Gemini `generateContent`.
    #[default]
    Gemini,
    /// Any OpenAI-compatible `chat/completions` endpoint.
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAi,
}

impl Provider {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::Gemini => GEMINI_BASE_URL,
            Provider::OpenAi => OPENAI_BASE_URL,
        }
    }
}

/// Everything the pipeline needs to know for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// The index page that lists articles.
    pub listing_url: String,
    /// How many discovered links to process.
    pub num_articles: usize,
    /// Join extracted paragraphs with blank lines instead of single newlines.
    pub print_spaced: bool,
    /// Print a preview of the extracted text before each summary.
    pub print_full_text: bool,
    /// Length of that preview, in characters.
    pub preview_chars: usize,
    /// Article text is cut to this many characters before prompting.
    pub trim_article_chars: usize,
    /// Texts shorter than this are printed as-is without a model call.
    pub min_summary_chars: usize,
    /// Extra link selectors tried before the built-in ones.
    pub link_selectors: Vec<String>,
    pub provider: Provider,
    pub model_name: String,
    /// Overrides the provider's default endpoint root.
    pub api_base_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub user_agent: String,
    pub listing_timeout_secs: u64,
    pub article_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    /// Sleep after each article, whatever its outcome.
    pub pacing_delay_secs: f64,
    /// Total model-call attempts per article.
    pub max_attempts: usize,
    /// Backoff after failed attempt `n` is `n * backoff_step_secs`.
    pub backoff_step_secs: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            num_articles: 2,
            print_spaced: true,
            print_full_text: false,
            preview_chars: 3000,
            trim_article_chars: 60_000,
            min_summary_chars: 200,
            link_selectors: Vec::new(),
            provider: Provider::Gemini,
            model_name: "gemini-1.5-pro".to_string(),
            api_base_url: None,
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            listing_timeout_secs: 20,
            article_timeout_secs: 30,
            llm_timeout_secs: 120,
            pacing_delay_secs: 1.0,
            max_attempts: 3,
            backoff_step_secs: 1.5,
        }
    }
}

impl PipelineConfig {
    /// Load a YAML config file. Missing keys fall back to defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        debug!(listing_url = %config.listing_url, num_articles = config.num_articles, "Loaded config file");
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.listing_url).map_err(|e| {
            ConfigError::Invalid(format!("listing_url {:?}: {e}", self.listing_url))
        })?;
        if self.num_articles == 0 {
            return Err(ConfigError::Invalid("num_articles must be at least 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        for (name, value) in [
            ("pacing_delay_secs", self.pacing_delay_secs),
            ("backoff_step_secs", self.backoff_step_secs),
        ] {
            if let Err(e) = Duration::try_from_secs_f64(value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number of seconds, got {value}: {e}"
                )));
            }
        }
        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Zero when the value is out of range; [`validate`](Self::validate) rejects those.
    pub fn pacing_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.pacing_delay_secs).unwrap_or_default()
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::try_from_secs_f64(self.backoff_step_secs).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.num_articles, 2);
        assert_eq!(config.trim_article_chars, 60_000);
        assert_eq!(config.min_summary_chars, 200);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.listing_timeout(), Duration::from_secs(20));
        assert_eq!(config.article_timeout(), Duration::from_secs(30));
        assert_eq!(config.backoff_step(), Duration::from_millis(1500));
        assert_eq!(config.pacing_delay(), Duration::from_secs(1));
        assert!(config.user_agent.contains("Chrome/124.0.0.0"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "num_articles: 5\nprovider: openai\nlink_selectors:\n  - \".post h2 a\"\npacing_delay_secs: 0.5"
        )
        .unwrap();

        let config = PipelineConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.num_articles, 5);
        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.link_selectors, vec![".post h2 a".to_string()]);
        assert_eq!(config.pacing_delay(), Duration::from_millis(500));
        assert_eq!(config.listing_url, DEFAULT_LISTING_URL);
        assert_eq!(config.api_base_url(), OPENAI_BASE_URL);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = PipelineConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "num_articles: [not, a, number]").unwrap();
        let err = PipelineConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = PipelineConfig {
            num_articles: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            backoff_step_secs: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            listing_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        for huge in [1e30, f64::INFINITY, f64::NAN] {
            let config = PipelineConfig {
                pacing_delay_secs: huge,
                backoff_step_secs: huge,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
            assert_eq!(config.pacing_delay(), Duration::ZERO);
            assert_eq!(config.backoff_step(), Duration::ZERO);
        }
    }

    #[test]
    fn test_api_base_url_override() {
        let config = PipelineConfig {
            api_base_url: Some("http://localhost:8080".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_base_url(), "http://localhost:8080");
        assert_eq!(PipelineConfig::default().api_base_url(), GEMINI_BASE_URL);
    }
}
