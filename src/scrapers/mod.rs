//! HTML scraping for the listing page and for individual articles.
//!
//! Both halves are strategy chains evaluated in priority order with an early
//! exit on the first strategy that produces something:
//!
//! | Stage | Module | Chain |
//! |-------|--------|-------|
//! | Link discovery | [`links`] | custom selectors, then built-in selectors, most specific first |
//! | Text extraction | [`article`] | readability, then content-container paragraphs, then visible text |
//!
//! Neither module touches the network; they take HTML that the
//! [`fetcher`](crate::fetcher) already downloaded.

pub mod article;
pub mod links;

use itertools::Itertools;
use scraper::{ElementRef, Node};

/// Tags whose text never renders.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Visible text under `root`: trimmed text nodes joined by single spaces.
pub(crate) fn visible_text(root: ElementRef<'_>) -> String {
    root.descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some((node, text)),
            _ => None,
        })
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
            })
        })
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let html = Html::parse_document(
            "<html><head><style>p { color: red }</style></head>\
             <body><p> Hello   </p><script>var x = 1;</script><div>world<span>!</span></div></body></html>",
        );
        assert_eq!(visible_text(html.root_element()), "Hello world !");
    }
}
