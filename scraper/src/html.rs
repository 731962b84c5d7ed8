//! Small helpers shared by the HTML-based boards.

use common::{ScrapeError, Site};
use scraper::{ElementRef, Html, Selector};

pub(crate) fn selector(site: Site, css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse {
        site,
        message: format!("bad selector {css:?}: {e}"),
    })
}

/// Text of the first element under `element` matching `selector`.
pub(crate) fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| clean_text(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}

pub(crate) fn first_attr(
    element: &ElementRef<'_>,
    selector: &Selector,
    attr: &str,
) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Visible text of a full document matched by `selector`.
pub(crate) fn document_text(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let text = document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))?;
    let text = clean_text(&text);
    (!text.is_empty()).then_some(text)
}

/// Strips markup from an HTML fragment.
pub(crate) fn fragment_text(fragment: &str) -> String {
    let fragment = Html::parse_fragment(fragment);
    clean_text(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
}

/// Collapses all runs of whitespace into single spaces.
pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
