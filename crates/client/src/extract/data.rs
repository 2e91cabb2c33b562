//! Advanced ("data") page extractors: title data, versions and add-ons.

use gamescrape_core::records::{AdvancedInfo, DlcEntry, FieldMap, FieldValue, VersionEntry};
use scraper::{Html, Selector};

use crate::document::{href, hyphenate_label, selector, split_parity, text_of};

/// Developer, genre, player counts and similar facts; the set varies per game.
pub fn extract_title_data(page: &Html) -> FieldMap {
    let mut fields = FieldMap::new();

    let Some(pod) = page.select(selector!("div.pod_titledata")).next() else {
        return fields;
    };

    let terms = pod.select(selector!("dt"));
    let definitions = pod.select(selector!("dd"));

    for (term, definition) in terms.zip(definitions) {
        let key = hyphenate_label(&text_of(term).replace(['(', ')'], ""));
        if key.is_empty() {
            continue;
        }

        // genre paths are written "Action > Shooter > First-Person"
        let raw = text_of(definition).replace(" >", ",");
        let values: Vec<String> = raw
            .split(',')
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();

        let value = FieldValue::from_values(values).unwrap_or_else(|| FieldValue::Scalar(String::new()));
        fields.insert(key, value);
    }

    fields
}

/// Every published release of the game.
///
/// The version table has no row grouping usable here: each column is read
/// as its own cell list and rows are rebuilt by index. Product ID and
/// barcode cells share one class and strictly alternate, so that column is
/// split by parity. If any column is missing entirely no versions are
/// returned.
pub fn extract_versions(page: &Html) -> Vec<VersionEntry> {
    let column = |selector: &Selector| -> Vec<String> {
        page.select(selector)
            .map(|cell| text_of(cell).trim().to_string())
            .collect()
    };

    let regions = column(selector!("td.cregion"));
    let publishers = column(selector!("td.datacompany"));
    let (product_ids, barcodes) = split_parity(column(selector!("td.datapid")));
    let release_dates = column(selector!("td.cdate"));
    let ratings = column(selector!("td.datarating"));

    let columns = [&regions, &publishers, &product_ids, &barcodes, &release_dates, &ratings];
    if columns.iter().any(|c| c.is_empty()) {
        return Vec::new();
    }

    regions
        .into_iter()
        .zip(publishers)
        .zip(product_ids)
        .zip(barcodes)
        .zip(release_dates)
        .zip(ratings)
        .map(
            |(((((region, publisher), product_id), barcode), release_date), rating)| VersionEntry {
                region,
                publisher,
                product_id,
                barcode,
                release_date,
                rating,
            },
        )
        .collect()
}

/// Add-ons listed in the `#dlc` section, in page order.
pub fn extract_dlc(page: &Html) -> Vec<DlcEntry> {
    let Some(section) = page.select(selector!("div#dlc")).next() else {
        return Vec::new();
    };

    section
        .select(selector!("a[href]"))
        .filter_map(|link| {
            let target = href(link)?;
            Some(DlcEntry { name: text_of(link).trim().to_string(), link: target.to_string() })
        })
        .collect()
}

pub fn extract_advanced_info(page: &Html) -> AdvancedInfo {
    AdvancedInfo { title_data: extract_title_data(page), versions: extract_versions(page), dlc: extract_dlc(page) }
}
