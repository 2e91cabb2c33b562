//! Base info page extractors.
//!
//! The game info pod is a single `<ul>` whose items share no label scheme:
//! the core platform, ESRB badge and Metacritic badge carry their own
//! classes, release date and franchise carry a bold label, and the
//! developer and add-on count are bare links. Items are classified in that
//! order, then by link target, then by a `key: value` text split.

use gamescrape_core::records::{BaseInfo, Esrb, FieldFailure, FieldMap, FieldValue, FullBaseInfo, Metacritic, UserRating};
use gamescrape_core::{Error, Result};
use scraper::{ElementRef, Html};

use crate::document::{first_digits, first_text, has_class, href, hyphenate_label, page_text, selector, text_of};

/// Title of the game, shared by the base and advanced pages.
pub fn extract_name(page: &Html) -> Option<String> {
    page_text(page, selector!("h1.page-title"))
}

pub fn extract_description(page: &Html) -> Option<String> {
    page_text(page, selector!("div.desc"))
}

/// Name, description and the game info pod.
///
/// # Errors
///
/// `MalformedField` if the ESRB badge cannot be split into rating and description.
pub fn extract_base_info(page: &Html) -> Result<BaseInfo> {
    let pod = read_info_pod(page);

    Ok(BaseInfo {
        name: extract_name(page),
        description: extract_description(page),
        fields: pod.fields,
        esrb: pod.esrb.transpose()?,
        metacritic: pod.metacritic,
    })
}

/// Owned, rating, difficulty, length and completion statistics.
pub fn extract_user_ratings(page: &Html) -> Vec<UserRating> {
    let mut ratings = Vec::new();

    for fieldset in page.select(selector!("fieldset.mygames_section")) {
        // only rendered for signed-in users
        if fieldset.value().attr("disabled").is_some() {
            continue;
        }

        let Some(title) = fieldset.select(selector!("div.subsection-title")).next() else {
            continue;
        };
        let text = text_of(title);
        let Some((category, rest)) = text.split_once(':') else {
            tracing::debug!(text = %text.trim(), "skipping user rating without label");
            continue;
        };

        let votes_text = first_text(title, selector!("p.rate"));
        let rating = match first_text(title, selector!("div.rating")) {
            Some(rating) => rating,
            None => match &votes_text {
                Some(votes) => rest.replacen(votes.as_str(), "", 1).trim().to_string(),
                None => rest.trim().to_string(),
            },
        };

        ratings.push(UserRating {
            category: category.trim().to_string(),
            rating,
            votes: votes_text.as_deref().and_then(first_digits),
        });
    }

    ratings
}

/// Everything on the base page. A field whose heuristic fails is recorded
/// in `failures` and the remaining fields are still returned.
pub fn extract_full_base_info(page: &Html) -> FullBaseInfo {
    let pod = read_info_pod(page);
    let mut failures = Vec::new();

    let esrb = match pod.esrb {
        Some(Ok(esrb)) => Some(esrb),
        Some(Err(err)) => {
            tracing::warn!(error = %err, "ESRB badge not recognised");
            failures.push(FieldFailure::new("ESRB", &err));
            None
        }
        None => None,
    };

    FullBaseInfo {
        name: extract_name(page),
        description: extract_description(page),
        fields: pod.fields,
        esrb,
        metacritic: pod.metacritic,
        user_ratings: extract_user_ratings(page),
        failures,
    }
}

/// Split a `"T - Teen"` badge on its first hyphen.
pub fn parse_esrb(text: &str) -> Result<Esrb> {
    let (rating, description) = text
        .split_once('-')
        .ok_or_else(|| Error::malformed("ESRB", format!("expected `rating - description`, got {:?}", text.trim())))?;

    Ok(Esrb { rating: rating.trim().to_string(), description: description.trim().to_string() })
}

/// Items of the info pod, classified but with the ESRB badge left unchecked.
struct InfoPod {
    fields: FieldMap,
    esrb: Option<Result<Esrb>>,
    metacritic: Option<Metacritic>,
}

enum PodItem {
    Field(String, FieldValue),
    Esrb(Result<Esrb>),
    Metacritic(Metacritic),
    Skip,
}

fn read_info_pod(page: &Html) -> InfoPod {
    let mut pod = InfoPod { fields: FieldMap::new(), esrb: None, metacritic: None };

    let Some(list) = page.select(selector!("div.pod_gameinfo ul")).next() else {
        return pod;
    };

    for item in list.select(selector!("li")) {
        match classify(item) {
            PodItem::Field(key, value) => pod.fields.insert(key, value),
            PodItem::Esrb(esrb) => pod.esrb = Some(esrb),
            PodItem::Metacritic(metacritic) => pod.metacritic = Some(metacritic),
            PodItem::Skip => {}
        }
    }

    pod
}

fn classify(item: ElementRef<'_>) -> PodItem {
    if has_class(item, "core-platform") {
        return PodItem::Field("Core-Platform".into(), FieldValue::Scalar(text_of(item).trim().to_string()));
    }
    if has_class(item, "boxshot") {
        return PodItem::Skip;
    }
    if has_class(item, "esrb") {
        return PodItem::Esrb(parse_esrb(&text_of(item)));
    }
    if has_class(item, "metacritic") {
        return PodItem::Metacritic(parse_metacritic(item));
    }

    if let Some(label) = item.select(selector!("b")).next() {
        return labeled_field(item, &text_of(label));
    }

    if let Some(target) = item.select(selector!("a[href]")).next().and_then(href) {
        let key = if target.contains("#dlc") {
            Some("DLC")
        } else if target.contains("/company/") {
            Some("Company")
        } else {
            None
        };
        if let Some(key) = key {
            return PodItem::Field(key.into(), FieldValue::Scalar(text_of(item).trim().to_string()));
        }
    }

    let text = text_of(item);
    match text.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            PodItem::Field(key.trim().to_string(), FieldValue::Scalar(value.trim().to_string()))
        }
        _ => {
            tracing::debug!(text = %text.trim(), "skipping unclassified info item");
            PodItem::Skip
        }
    }
}

/// `<b>Label:</b>` followed by links, or by plain text when there are none.
fn labeled_field(item: ElementRef<'_>, label: &str) -> PodItem {
    let key = hyphenate_label(label);
    if key.is_empty() {
        return PodItem::Skip;
    }

    let links: Vec<String> = item
        .select(selector!("a"))
        .map(|a| text_of(a).trim().to_string())
        .collect();

    let value = FieldValue::from_values(links)
        .unwrap_or_else(|| FieldValue::Scalar(text_of(item).replacen(label, "", 1).trim().to_string()));

    PodItem::Field(key, value)
}

fn parse_metacritic(item: ElementRef<'_>) -> Metacritic {
    Metacritic {
        score: first_text(item, selector!("div.score")).and_then(|score| score.parse().ok()),
        review_count: first_text(item, selector!("div.review_link")).as_deref().and_then(first_digits),
    }
}
