//! Parsed documents and the text heuristics shared by the extractors.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("valid digit pattern"));

/// Parse a fetched body into a navigable document.
pub fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

/// Compile a CSS selector known to be valid.
pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// A `&'static Selector` for a literal, compiled once on first use.
macro_rules! selector {
    ($css:literal) => {{
        static SELECTOR: ::std::sync::LazyLock<::scraper::Selector> =
            ::std::sync::LazyLock::new(|| $crate::document::sel($css));
        &*SELECTOR
    }};
}
pub(crate) use selector;

/// Concatenated text of an element and its descendants.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trimmed text of the first match of `selector` below `element`.
pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|found| text_of(found).trim().to_string())
}

/// Trimmed text of the first match of `selector` in the whole document.
pub(crate) fn page_text(page: &Html, selector: &Selector) -> Option<String> {
    page.select(selector)
        .next()
        .map(|found| text_of(found).trim().to_string())
}

pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

pub fn href(element: ElementRef<'_>) -> Option<&str> {
    element.value().attr("href")
}

/// First run of digits in free text, ignoring thousands separators.
///
/// No digits yields `None`, never zero.
pub fn first_digits(text: &str) -> Option<u32> {
    DIGITS
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

/// Turn a visible label such as `"Release Date:"` into a field key (`"Release-Date"`).
pub fn hyphenate_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Split an interleaved column into its even-indexed and odd-indexed items.
///
/// Assumes the source interleaves both sub-columns strictly; an odd-length
/// input leaves the first sub-column one item longer.
pub fn split_parity<T>(items: Vec<T>) -> (Vec<T>, Vec<T>) {
    let mut even = Vec::with_capacity(items.len().div_ceil(2));
    let mut odd = Vec::with_capacity(items.len() / 2);
    for (idx, item) in items.into_iter().enumerate() {
        if idx % 2 == 0 { even.push(item) } else { odd.push(item) }
    }
    (even, odd)
}

/// Segments of a delimited description such as `"Nintendo, Sega, Action, 1998"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Everything before the category, re-joined with the delimiter.
    pub remainder: Option<String>,
    /// Second-to-last segment.
    pub category: Option<String>,
    /// Last segment.
    pub year: Option<String>,
}

/// Segment a delimited description from the right: year, then category,
/// then the free-form remainder. Missing segments stay `None`.
pub fn segment_info(text: &str, delimiter: &str) -> Segments {
    let parts: Vec<&str> = text.split(delimiter).collect();
    let n = parts.len();

    Segments {
        remainder: (n > 2).then(|| parts[..n - 2].join(delimiter).trim().to_string()),
        category: (n >= 2).then(|| parts[n - 2].trim().to_string()),
        year: parts.last().map(|year| year.trim().to_string()),
    }
}
