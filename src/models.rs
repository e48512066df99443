//! Data models passed between pipeline stages.
//!
//! Everything here lives for a single run:
//! - [`ListingPage`]: the raw index page, consumed by link discovery
//! - [`ArticleDocument`]: one article's HTML and the text extracted from it
//! - [`ArticleOutcome`] and [`RunReport`]: what happened to each link

/// The raw listing (index) page as fetched.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// The URL the page was fetched from.
    pub url: String,
    /// The response body.
    pub html: String,
}

/// A fetched article and its extracted plain text.
#[derive(Debug, Clone)]
pub struct ArticleDocument {
    /// The article URL.
    pub url: String,
    /// The raw HTML body.
    pub html: String,
    /// The extracted text. Empty only when every extraction tier came up empty.
    pub text: String,
}

impl ArticleDocument {
    /// Number of characters (not bytes) of extracted text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Result of processing one discovered link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// The article was summarized; holds the summary text.
    Summarized(String),
    /// Processing failed; holds the rendered error message.
    Failed(String),
}

/// Counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub attempted: usize,
    pub summarized: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn record(&mut self, outcome: &ArticleOutcome) {
        self.attempted += 1;
        match outcome {
            ArticleOutcome::Summarized(_) => self.summarized += 1,
            ArticleOutcome::Failed(_) => self.failed += 1,
        }
    }
}
