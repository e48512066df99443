//! Command-line interface definitions.
//!
//! Every flag is optional: anything not given on the command line (or through
//! its environment variable) keeps the value from the config file, or the
//! built-in default when there is no file.

use crate::config::{PipelineConfig, Provider};
use crate::error::ConfigError;
use clap::Parser;

/// Command-line arguments for headline_digest.
///
/// # Examples
///
/// ```sh
/// # Summarize the two newest articles with Gemini
/// GEMINI_API_KEY=AIza... headline_digest
///
/// # Five articles, custom selector, print the extracted text too
/// headline_digest -n 5 -s ".post-list h2 a" --full-text
///
/// # Local OpenAI-compatible server
/// headline_digest --provider openai --api-base-url http://localhost:11434/v1 --model llama3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listing page to discover article links on
    #[arg(long, env = "LISTING_URL")]
    pub listing_url: Option<String>,

    /// Number of articles to summarize
    #[arg(short, long)]
    pub num_articles: Option<usize>,

    /// CSS selector for article links, tried before the built-in ones (repeatable)
    #[arg(short = 's', long = "selector")]
    pub selectors: Vec<String>,

    /// Join extracted paragraphs with single newlines instead of blank lines
    #[arg(long, overrides_with = "spaced")]
    pub compact: bool,

    /// Join extracted paragraphs with blank lines (the default)
    #[arg(long, overrides_with = "compact")]
    pub spaced: bool,

    /// Print a preview of each article's extracted text
    #[arg(long, overrides_with = "no_full_text")]
    pub full_text: bool,

    /// Do not print the text preview, even when the config file asks for it
    #[arg(long, overrides_with = "full_text")]
    pub no_full_text: bool,

    /// Length of the text preview, in characters
    #[arg(long)]
    pub preview_chars: Option<usize>,

    /// Article text is cut to this many characters before summarizing
    #[arg(long)]
    pub trim_chars: Option<usize>,

    /// Completion API to use
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Model identifier
    #[arg(long, env = "MODEL_NAME")]
    pub model: Option<String>,

    /// Root URL of the completion API
    #[arg(long, env = "LLM_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// API key for the completion API
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds to wait after each article
    #[arg(long)]
    pub pacing_delay: Option<f64>,
}

impl Cli {
    /// Build the run configuration: defaults, then the config file, then flags.
    pub fn into_config(self) -> Result<PipelineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)?,
            None => PipelineConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(self, config: &mut PipelineConfig) {
        if let Some(url) = self.listing_url {
            config.listing_url = url;
        }
        if let Some(n) = self.num_articles {
            config.num_articles = n;
        }
        if !self.selectors.is_empty() {
            config.link_selectors = self.selectors;
        }
        if self.compact {
            config.print_spaced = false;
        }
        if self.spaced {
            config.print_spaced = true;
        }
        if self.full_text {
            config.print_full_text = true;
        }
        if self.no_full_text {
            config.print_full_text = false;
        }
        if let Some(chars) = self.preview_chars {
            config.preview_chars = chars;
        }
        if let Some(chars) = self.trim_chars {
            config.trim_article_chars = chars;
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = self.model {
            config.model_name = model;
        }
        if let Some(base) = self.api_base_url {
            config.api_base_url = Some(base);
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
        }
        if let Some(delay) = self.pacing_delay {
            config.pacing_delay_secs = delay;
        }
    }
}
