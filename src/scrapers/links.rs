//! Article link discovery on the listing page.
//!
//! Selectors are tried in order and the first one that produces any usable
//! link wins. Results from different selectors are never merged, so a broad
//! fallback like `article h1 a` cannot mix sidebar links into the main list.

use crate::error::ConfigError;
use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

/// Built-in link selectors, most specific first.
pub const DEFAULT_LINK_SELECTORS: &[&str] = &[
    ".elementor-loop-container .elementor-widget-theme-post-title h1 a",
    ".elementor-loop-container h1 a",
    "article h1 a",
];

/// Prioritized chain of compiled link selectors.
#[derive(Debug)]
pub struct LinkExtractor {
    selectors: Vec<(String, Selector)>,
}

impl LinkExtractor {
    /// Compile `overrides` followed by [`DEFAULT_LINK_SELECTORS`].
    ///
    /// Fails on the first override that is not valid CSS.
    pub fn new(overrides: &[String]) -> Result<Self, ConfigError> {
        let selectors = overrides
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_LINK_SELECTORS.iter().copied())
            .map(|raw| {
                Selector::parse(raw)
                    .map(|selector| (raw.to_string(), selector))
                    .map_err(|e| ConfigError::Selector {
                        selector: raw.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// Selector source strings in evaluation order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selectors.iter().map(|(raw, _)| raw.as_str())
    }

    /// Return up to `max_count` unique absolute links from the first selector
    /// that matches any.
    ///
    /// Order follows the document. An empty result means no selector matched.
    #[instrument(level = "info", skip_all, fields(max_count = max_count))]
    pub fn extract_links(&self, html: &str, max_count: usize) -> Vec<String> {
        let document = Html::parse_document(html);

        let found = self.selectors.iter().find_map(|(raw, selector)| {
            let links = document
                .select(selector)
                .filter_map(|anchor| anchor.value().attr("href"))
                .map(str::trim)
                .filter(|href| is_absolute_http(href))
                .map(str::to_string)
                .collect::<Vec<_>>();
            debug!(selector = %raw, matches = links.len(), "Tried link selector");
            (!links.is_empty()).then_some((raw, links))
        });

        match found {
            Some((raw, links)) => {
                let links = links.into_iter().unique().take(max_count).collect::<Vec<_>>();
                info!(selector = %raw, count = links.len(), "Discovered article links");
                links
            }
            None => {
                info!("No link selector matched");
                Vec::new()
            }
        }
    }
}

/// `true` for hrefs with an explicit http(s) scheme; relative paths and
/// fragments are rejected.
fn is_absolute_http(href: &str) -> bool {
    !href.is_empty()
        && Url::parse(href).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new(&[]).unwrap()
    }

    const ELEMENTOR_LISTING: &str = r#"
        <html><body>
          <div class="elementor-loop-container">
            <div class="elementor-widget-theme-post-title"><h1><a href="https://news.example/a">A</a></h1></div>
            <div class="elementor-widget-theme-post-title"><h1><a href="https://news.example/b">B</a></h1></div>
            <div class="elementor-widget-theme-post-title"><h1><a href="https://news.example/a">A again</a></h1></div>
            <div class="elementor-widget-theme-post-title"><h1><a href="https://news.example/c">C</a></h1></div>
            <div class="elementor-widget-theme-post-title"><h1><a href="https://news.example/d">D</a></h1></div>
            <div class="elementor-widget-theme-post-title"><h1><a href="https://news.example/e">E</a></h1></div>
          </div>
          <article><h1><a href="https://news.example/sidebar">Sidebar</a></h1></article>
        </body></html>
    "#;

    #[test]
    fn test_first_n_unique_links_in_document_order() {
        let links = extractor().extract_links(ELEMENTOR_LISTING, 2);
        assert_eq!(links, vec!["https://news.example/a", "https://news.example/b"]);
    }

    #[test]
    fn test_duplicates_removed_before_truncation() {
        let links = extractor().extract_links(ELEMENTOR_LISTING, 10);
        assert_eq!(
            links,
            vec![
                "https://news.example/a",
                "https://news.example/b",
                "https://news.example/c",
                "https://news.example/d",
                "https://news.example/e",
            ]
        );
        assert_eq!(links.iter().unique().count(), links.len());
    }

    #[test]
    fn test_matches_are_not_merged_across_selectors() {
        // `article h1 a` also matches the sidebar, but the first selector already matched.
        let links = extractor().extract_links(ELEMENTOR_LISTING, 10);
        assert!(!links.contains(&"https://news.example/sidebar".to_string()));
    }

    #[test]
    fn test_falls_through_to_later_selector() {
        let html = r#"
            <div class="elementor-loop-container"><h2><a href="https://x.example/h2">no</a></h2></div>
            <article><h1><a href="https://x.example/one">One</a></h1></article>
            <article><h1><a href="https://x.example/two">Two</a></h1></article>
        "#;
        let links = extractor().extract_links(html, 5);
        assert_eq!(links, vec!["https://x.example/one", "https://x.example/two"]);
    }

    #[test]
    fn test_selector_with_only_relative_links_does_not_win() {
        let html = r##"
            <div class="elementor-loop-container"><h1><a href="/relative">rel</a></h1><h1><a href="#top">top</a></h1></div>
            <article><h1><a href="https://x.example/abs">abs</a></h1></article>
        "##;
        let links = extractor().extract_links(html, 5);
        assert_eq!(links, vec!["https://x.example/abs"]);
    }

    #[test]
    fn test_every_link_has_http_scheme() {
        let html = r#"
            <article><h1><a href="  https://x.example/1  ">1</a></h1></article>
            <article><h1><a href="">empty</a></h1></article>
            <article><h1><a>no href</a></h1></article>
            <article><h1><a href="mailto:desk@x.example">mail</a></h1></article>
            <article><h1><a href="http://x.example/2">2</a></h1></article>
        "#;
        let links = extractor().extract_links(html, 10);
        assert_eq!(links, vec!["https://x.example/1", "http://x.example/2"]);
        assert!(links.iter().all(|l| l.starts_with("http")));
    }

    #[test]
    fn test_overrides_take_priority() {
        let extractor = LinkExtractor::new(&[".custom a".to_string()]).unwrap();
        let html = r#"
            <ul class="custom"><li><a href="https://x.example/custom">c</a></li></ul>
            <article><h1><a href="https://x.example/default">d</a></h1></article>
        "#;
        assert_eq!(extractor.extract_links(html, 5), vec!["https://x.example/custom"]);
        assert_eq!(extractor.selectors().next(), Some(".custom a"));
        assert_eq!(extractor.selectors().count(), DEFAULT_LINK_SELECTORS.len() + 1);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let links = extractor().extract_links("<html><body><p>nothing</p></body></html>", 3);
        assert!(links.is_empty());
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let err = LinkExtractor::new(&["div[".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::Selector { ref selector, .. } if selector == "div["));
    }
}
