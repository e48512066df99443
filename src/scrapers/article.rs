//! Main-text extraction for a single article page.
//!
//! Three tiers, each attempted only when the previous one produced nothing:
//!
//! 1. [`ContentExtractor`] (readability by default) on the raw HTML.
//! 2. `p`/`li` text inside the first known content container in document
//!    order, or inside the whole document when no container matches.
//! 3. All visible text of that same scope, without paragraph structure.

use super::visible_text;
use crate::utils::{normalize_paragraphs, truncate_for_log};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::io::Cursor;
use tracing::{debug, instrument, warn};
use url::Url;

/// Content containers used by common CMS themes. Matched as one group, so the
/// earliest container in the document wins.
pub const CONTENT_CONTAINER_SELECTOR: &str = ".td-post-content, .entry-content, article";

static CONTAINER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(CONTENT_CONTAINER_SELECTOR).expect("container selector is valid CSS")
});

static PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, li").expect("paragraph selector is valid CSS"));

/// A generic main-content extractor, tried before the selector fallbacks.
pub trait ContentExtractor {
    /// Plain text of the page's main content, or `None` when nothing was found.
    fn extract(&self, html: &str, url: &str) -> Option<String>;
}

/// Mozilla-readability style extraction via the `readability` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadabilityExtractor;

impl ContentExtractor for ReadabilityExtractor {
    fn extract(&self, html: &str, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let mut reader = Cursor::new(html.as_bytes());
        match readability::extractor::extract(&mut reader, &url) {
            Ok(product) => Some(product.text),
            Err(e) => {
                warn!(%url, error = %e, "Readability extraction failed");
                None
            }
        }
    }
}

/// Which tier produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTier {
    Primary,
    Paragraphs,
    VisibleText,
}

/// The fallback chain around a primary [`ContentExtractor`].
pub struct ArticleExtractor {
    primary: Box<dyn ContentExtractor + Send + Sync>,
}

impl std::fmt::Debug for ArticleExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleExtractor").finish_non_exhaustive()
    }
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new(ReadabilityExtractor)
    }
}

impl ArticleExtractor {
    pub fn new(primary: impl ContentExtractor + Send + Sync + 'static) -> Self {
        Self {
            primary: Box::new(primary),
        }
    }

    /// Extract the article text from `html`.
    ///
    /// With `paragraph_joined`, paragraphs are separated by blank lines;
    /// otherwise by single newlines. May return an empty string when the page
    /// has no visible text at all.
    pub fn extract_text(&self, html: &str, url: &str, paragraph_joined: bool) -> String {
        self.extract_with_tier(html, url, paragraph_joined).1
    }

    #[instrument(level = "debug", skip(self, html))]
    pub fn extract_with_tier(
        &self,
        html: &str,
        url: &str,
        paragraph_joined: bool,
    ) -> (ExtractionTier, String) {
        if let Some(text) = self.primary.extract(html, url).filter(|t| !t.trim().is_empty()) {
            let text = if paragraph_joined {
                normalize_paragraphs(&text)
            } else {
                text.trim().to_string()
            };
            debug!(chars = text.chars().count(), "Primary extractor succeeded");
            return (ExtractionTier::Primary, text);
        }

        let document = Html::parse_document(html);
        let container = document.select(&CONTAINER).next();
        let scope = container.unwrap_or_else(|| document.root_element());

        let separator = if paragraph_joined { "\n\n" } else { "\n" };
        let paragraphs = scope
            .select(&PARAGRAPHS)
            .map(visible_text)
            .filter(|p| !p.is_empty())
            .join(separator);
        if !paragraphs.is_empty() {
            debug!(
                in_container = container.is_some(),
                preview = %truncate_for_log(&paragraphs, 120),
                "Used paragraph fallback"
            );
            return (ExtractionTier::Paragraphs, paragraphs);
        }

        let text = visible_text(scope);
        warn!(
            in_container = container.is_some(),
            chars = text.chars().count(),
            "No paragraphs found; using visible page text"
        );
        (ExtractionTier::VisibleText, text)
    }
}
