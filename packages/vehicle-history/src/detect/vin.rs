//! VIN extraction.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VIN_TOKEN: Regex = Regex::new(r"\b[A-HJ-NPR-Z0-9]{17}\b").unwrap();

    // "VIN: 1HG...", "VIN #<b>1HG...</b>", "<td>VIN</td><td>1HG...</td>"
    static ref LABELED_VIN: Regex = Regex::new(
        r"\b(?i:vin)\b\s*(?:#|(?i:number))?\s*:?\s*(?:<[^>]*>\s*)*([A-HJ-NPR-Z0-9]{17})\b"
    ).unwrap();

    static ref DATA_VIN: Regex =
        Regex::new(r#"(?i)data-vin\s*=\s*["']\s*([a-hj-npr-z0-9]{17})\s*["']"#).unwrap();

    static ref TITLE: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
}

/// Whether `token` is a plausible VIN: 17 characters of `[A-HJ-NPR-Z0-9]`
/// with at least one digit.
pub fn is_vin(token: &str) -> bool {
    token.len() == 17
        && token
            .chars()
            .all(|c| {
                c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q'))
            })
        && token.chars().any(|c| c.is_ascii_digit())
}

/// First VIN-shaped token in a piece of text.
pub fn find_vin(text: &str) -> Option<String> {
    VIN_TOKEN
        .find_iter(&text.to_uppercase())
        .map(|m| m.as_str().to_string())
        .find(|token| is_vin(token))
}

/// Extract the VIN from a raw HTML document.
///
/// Candidates come from labelled fields, `data-vin` attributes and the
/// document title. When several distinct VINs appear the most frequent
/// one wins, ties going to the one seen first.
pub fn extract_vin(html: &str) -> Option<String> {
    let mut votes: IndexMap<String, usize> = IndexMap::new();
    let mut vote = |candidate: &str| {
        let candidate = candidate.to_uppercase();
        if is_vin(&candidate) {
            *votes.entry(candidate).or_insert(0) += 1;
        }
    };

    for caps in LABELED_VIN.captures_iter(html) {
        vote(&caps[1]);
    }
    for caps in DATA_VIN.captures_iter(html) {
        vote(&caps[1]);
    }
    if let Some(caps) = TITLE.captures(html) {
        for token in VIN_TOKEN.find_iter(&caps[1]) {
            vote(token.as_str());
        }
    }

    let mut best: Option<(&String, usize)> = None;
    for (vin, count) in &votes {
        if best.map_or(true, |(_, top)| *count > top) {
            best = Some((vin, *count));
        }
    }
    best.map(|(vin, _)| vin.clone())
}
