//! Three-sentence article summaries.

use crate::api::{AskAsync, RetryAsk};
use crate::config::PipelineConfig;
use crate::error::SummarizeError;
use crate::utils::take_chars;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Number of sentences kept from the model output.
pub const SUMMARY_SENTENCES: usize = 3;

/// Terminal punctuation followed by whitespace.
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex is valid"));

/// Limits and retry budget for [`Summarizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummarizerSettings {
    /// Texts with fewer characters are returned as-is.
    pub min_chars: usize,
    /// Texts are cut to this many characters before prompting.
    pub trim_chars: usize,
    pub max_attempts: usize,
    pub backoff_step: Duration,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl SummarizerSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            min_chars: config.min_summary_chars,
            trim_chars: config.trim_article_chars,
            max_attempts: config.max_attempts,
            backoff_step: config.backoff_step(),
        }
    }
}

/// Summarizes article text through a retrying completion client.
#[derive(Debug)]
pub struct Summarizer<C> {
    client: RetryAsk<C>,
    settings: SummarizerSettings,
}

impl<C> Summarizer<C>
where
    C: AskAsync<Response = String>,
{
    pub fn new(client: C, settings: SummarizerSettings) -> Self {
        Self {
            client: RetryAsk::new(client, settings.max_attempts, settings.backoff_step),
            settings,
        }
    }

    /// Summarize `text` in at most three sentences.
    ///
    /// Short texts are already summary-sized and come back trimmed, without a
    /// model call. Otherwise the model is asked up to `max_attempts` times.
    #[instrument(level = "info", skip_all, fields(chars = tracing::field::Empty))]
    pub async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let chars = text.chars().count();
        tracing::Span::current().record("chars", chars);

        if chars < self.settings.min_chars {
            debug!(min = self.settings.min_chars, "Text below summary threshold; returning as-is");
            return Ok(text.trim().to_string());
        }

        let trimmed = take_chars(text, self.settings.trim_chars);
        if trimmed.len() < text.len() {
            debug!(limit = self.settings.trim_chars, "Article text trimmed before prompting");
        }
        let prompt = build_prompt(trimmed);

        let t0 = Instant::now();
        let raw = self
            .client
            .ask(&prompt)
            .await
            .map_err(|source| SummarizeError::Exhausted {
                attempts: self.client.max_attempts(),
                source,
            })?;

        let summary = first_sentences(&raw, SUMMARY_SENTENCES);
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            raw_chars = raw.chars().count(),
            summary_chars = summary.chars().count(),
            "Summarized article"
        );
        Ok(summary)
    }
}

/// The fixed instruction prompt wrapped around the article text.
pub fn build_prompt(article: &str) -> String {
    format!(
        "Summarize the following article in EXACTLY 3 sentences.\n\
         - No fluff or hype. Keep it factual and easy to understand.\n\
         - Include the most important numbers if present.\n\
         - No opinions, no predictions.\n\n\
         Article:\n\
         {article}\n\n\
         Now write the 3-sentence summary:"
    )
}

/// Keep the first `n` sentences of `text`, joined by single spaces.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace; the punctuation
/// stays with its sentence.
pub fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    let mut fragments = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Punctuation is a single ASCII byte.
        fragments.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    fragments.push(&text[start..]);

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(n)
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{ScriptedAsk, server_error};
    use crate::error::LlmError;
    use std::sync::Arc;

    fn settings() -> SummarizerSettings {
        SummarizerSettings {
            backoff_step: Duration::ZERO,
            ..SummarizerSettings::default()
        }
    }

    fn long_article() -> String {
        "The company reported revenue of $4.2 billion for the quarter. ".repeat(10)
    }

    #[tokio::test]
    async fn test_short_text_returned_without_model_call() {
        let client = Arc::new(ScriptedAsk::always("should not be used"));
        let summarizer = Summarizer::new(Arc::clone(&client), settings());

        let out = summarizer.summarize("   A short note.  \n").await.unwrap();
        assert_eq!(out, "A short note.");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_threshold_counts_characters_not_bytes() {
        let client = Arc::new(ScriptedAsk::always("unused"));
        let summarizer = Summarizer::new(Arc::clone(&client), settings());

        // 150 chars, 300 bytes.
        let text = "é".repeat(150);
        assert_eq!(summarizer.summarize(&text).await.unwrap(), text);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_output_limited_to_three_sentences() {
        let client = ScriptedAsk::always(
            "Revenue rose 12% to $4.2B. Margins held at 30%! Guidance was raised? \
             Analysts cheered. Shares jumped.",
        );
        let summarizer = Summarizer::new(client, settings());

        let out = summarizer.summarize(&long_article()).await.unwrap();
        assert_eq!(
            out,
            "Revenue rose 12% to $4.2B. Margins held at 30%! Guidance was raised?"
        );
    }

    #[tokio::test]
    async fn test_prompt_contains_trimmed_article() {
        let client = Arc::new(ScriptedAsk::always("One. Two. Three."));
        let summarizer = Summarizer::new(
            Arc::clone(&client),
            SummarizerSettings {
                trim_chars: 250,
                ..settings()
            },
        );

        let article = format!("{}TAIL-MARKER", "x".repeat(300));
        summarizer.summarize(&article).await.unwrap();

        let prompt = client.last_prompt().unwrap();
        assert!(prompt.starts_with("Summarize the following article in EXACTLY 3 sentences."));
        assert!(prompt.contains(&format!("Article:\n{}\n\n", "x".repeat(250))));
        assert!(!prompt.contains("TAIL-MARKER"));
        assert!(prompt.ends_with("Now write the 3-sentence summary:"));
    }

    #[tokio::test]
    async fn test_two_failures_then_success() {
        let client = Arc::new(ScriptedAsk::new(vec![
            Err(server_error()),
            Err(server_error()),
            Ok("Third attempt worked. Really.".to_string()),
        ]));
        let summarizer = Summarizer::new(Arc::clone(&client), settings());

        let out = summarizer.summarize(&long_article()).await.unwrap();
        assert_eq!(out, "Third attempt worked. Really.");
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_three_failures_propagate() {
        let client = Arc::new(ScriptedAsk::new(vec![
            Err(server_error()),
            Err(server_error()),
            Err(LlmError::EmptyResponse),
        ]));
        let summarizer = Summarizer::new(Arc::clone(&client), settings());

        let err = summarizer.summarize(&long_article()).await.unwrap_err();
        let SummarizeError::Exhausted { attempts, source } = err;
        assert_eq!(attempts, 3);
        assert!(matches!(source, LlmError::EmptyResponse));
        assert_eq!(client.calls(), 3);
    }

    #[test]
    fn test_first_sentences_splitting() {
        assert_eq!(first_sentences("  One.  Two!\n\nThree? Four. ", 3), "One. Two! Three?");
        assert_eq!(first_sentences("No terminal punctuation", 3), "No terminal punctuation");
        assert_eq!(first_sentences("Pi is 3.14 today. Yes.", 3), "Pi is 3.14 today. Yes.");
        assert_eq!(first_sentences("Wait!! Really?! Ok.", 2), "Wait!! Really?!");
        assert_eq!(first_sentences("", 3), "");
    }

    #[test]
    fn test_first_sentences_never_exceeds_limit() {
        let text = "A. ".repeat(20);
        let out = first_sentences(&text, 3);
        assert_eq!(out, "A. A. A.");
        assert_eq!(SENTENCE_BOUNDARY.find_iter(&format!("{out} ")).count(), 3);
    }
}
