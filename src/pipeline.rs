//! The digest pipeline: listing → links → articles → summaries → console.
//!
//! Articles are processed strictly one after another. A failure on one
//! article is printed as a warning and the loop moves on; only a failed
//! listing fetch or an empty link set aborts the run.

use crate::api::AskAsync;
use crate::config::PipelineConfig;
use crate::error::{ArticleError, ConfigError, PipelineError};
use crate::fetcher::HttpFetcher;
use crate::models::{ArticleDocument, ArticleOutcome, ListingPage, RunReport};
use crate::outputs::console;
use crate::scrapers::article::ArticleExtractor;
use crate::scrapers::links::LinkExtractor;
use crate::summarizer::{Summarizer, SummarizerSettings};
use std::io::Write;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// One configured run of the digest.
///
/// `C` is the completion client and `W` the console sink.
#[derive(Debug)]
pub struct Pipeline<C, W> {
    config: PipelineConfig,
    fetcher: HttpFetcher,
    links: LinkExtractor,
    extractor: ArticleExtractor,
    summarizer: Summarizer<C>,
    out: W,
}

impl<C, W> Pipeline<C, W>
where
    C: AskAsync<Response = String>,
    W: Write,
{
    /// Wire up all stages from `config`.
    ///
    /// Custom link selectors are compiled here, so a bad selector fails
    /// before any request is made.
    pub fn new(config: PipelineConfig, client: C, out: W) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config.user_agent)
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {e}")))?;
        let links = LinkExtractor::new(&config.link_selectors)?;
        debug!(selectors = ?links.selectors().collect::<Vec<_>>(), "Link selector chain");
        let summarizer = Summarizer::new(client, SummarizerSettings::from_config(&config));
        Ok(Self {
            config,
            fetcher,
            links,
            extractor: ArticleExtractor::default(),
            summarizer,
            out,
        })
    }

    /// Replace the default readability-first text extractor.
    #[cfg(test)]
    pub fn with_extractor(mut self, extractor: ArticleExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run the whole pipeline once.
    #[instrument(level = "info", skip_all, fields(listing_url = %self.config.listing_url))]
    pub async fn run(&mut self) -> Result<RunReport, PipelineError> {
        let t0 = Instant::now();

        let listing = self.fetch_listing().await?;
        let links = self
            .links
            .extract_links(&listing.html, self.config.num_articles);
        if links.is_empty() {
            error!(url = %listing.url, "No links found on listing page");
            return Err(PipelineError::NoLinks { url: listing.url });
        }

        let total = links.len();
        let mut report = RunReport::default();
        for (i, url) in links.iter().enumerate() {
            let index = i + 1;
            console::write_article_header(&mut self.out, index, total, url)?;

            let outcome = match self.process_article(url).await {
                Ok(summary) => {
                    info!(index, %url, "Article summarized");
                    ArticleOutcome::Summarized(summary)
                }
                Err(e) => {
                    warn!(index, %url, error = %e, "Article failed; continuing");
                    console::write_warning(&mut self.out, url, &e.to_string())?;
                    ArticleOutcome::Failed(e.to_string())
                }
            };
            report.record(&outcome);

            sleep(self.config.pacing_delay()).await;
        }
        self.out.flush()?;

        info!(
            attempted = report.attempted,
            summarized = report.summarized,
            failed = report.failed,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Run complete"
        );
        Ok(report)
    }

    async fn fetch_listing(&self) -> Result<ListingPage, PipelineError> {
        let url = self.config.listing_url.clone();
        let page = self
            .fetcher
            .fetch(&url, self.config.listing_timeout())
            .await
            .map_err(|e| {
                error!(%url, error = %e, "Listing fetch failed");
                PipelineError::Listing(e)
            })?;
        Ok(ListingPage {
            url,
            html: page.body,
        })
    }

    async fn fetch_article(&self, url: &str) -> Result<ArticleDocument, ArticleError> {
        let page = self
            .fetcher
            .fetch(url, self.config.article_timeout())
            .await?;
        debug!(status = page.status, "Article page fetched");
        let text = self
            .extractor
            .extract_text(&page.body, url, self.config.print_spaced);
        Ok(ArticleDocument {
            url: url.to_string(),
            html: page.body,
            text,
        })
    }

    /// Fetch, extract and summarize one article, printing preview and summary.
    #[instrument(level = "info", skip(self))]
    async fn process_article(&mut self, url: &str) -> Result<String, ArticleError> {
        let doc = self.fetch_article(url).await?;
        info!(
            url = %doc.url,
            html_bytes = doc.html.len(),
            chars = doc.char_count(),
            "Extracted article text"
        );
        if doc.text.is_empty() {
            warn!("No text could be extracted");
        }

        if self.config.print_full_text {
            console::write_preview(&mut self.out, &doc.text, self.config.preview_chars)?;
        }

        let summary = self.summarizer.summarize(&doc.text).await?;
        console::write_summary(&mut self.out, &summary)?;
        Ok(summary)
    }
}
