//! Field parsers for the loosely formatted values found in reports.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_MDY: Regex = Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap();
    static ref DATE_ISO: Regex = Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap();
    static ref DATE_NAMED: Regex =
        Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b").unwrap();
    static ref DATE_MDY_SHORT: Regex = Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{2})\b").unwrap();
    static ref DATE_MONTH_YEAR: Regex = Regex::new(r"\b(\d{1,2})/(\d{4})\b").unwrap();

    static ref NUMBER: Regex = Regex::new(r"\d{1,3}(?:,\d{3})+|\d+").unwrap();
    static ref LOCATION_STATE: Regex = Regex::new(r",\s*([A-Za-z]{2})\b").unwrap();
    static ref STATE_TOKEN: Regex = Regex::new(r"\b([A-Z]{2})\b").unwrap();
    static ref YEAR_MAKE_MODEL: Regex =
        Regex::new(r"\b((?:19|20)\d{2})\s+([A-Za-z][\w&\-]*)\s+([\w\-]+)(?:\s+(.+))?").unwrap();
}

/// USPS codes for the states, DC and territories that appear in reports.
const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY", "PR", "GU", "VI",
];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Find the first date in `text`.
///
/// Accepts `MM/DD/YYYY`, `MM-DD-YYYY`, `YYYY-MM-DD`, `Mon DD, YYYY`,
/// `Month DD, YYYY`, `MM/DD/YY`, and month-only `MM/YYYY` (first of month).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Some(c) = DATE_ISO.captures(text) {
        if let Some(date) = ymd(&c[1], &c[2], &c[3]) {
            return Some(date);
        }
    }
    if let Some(c) = DATE_MDY.captures(text) {
        if let Some(date) = ymd(&c[3], &c[1], &c[2]) {
            return Some(date);
        }
    }
    if let Some(c) = DATE_NAMED.captures(text) {
        let prefix = c[1].to_lowercase();
        if let Some(month) = MONTHS.iter().position(|m| prefix.starts_with(m)) {
            let month = (month + 1).to_string();
            if let Some(date) = ymd(&c[3], &month, &c[2]) {
                return Some(date);
            }
        }
    }
    if let Some(c) = DATE_MDY_SHORT.captures(text) {
        let year: i32 = c[3].parse().ok()?;
        // Two-digit years in reports are always post-1950 model years
        let year = if year < 50 { 2000 + year } else { 1900 + year };
        if let Some(date) = ymd(&year.to_string(), &c[1], &c[2]) {
            return Some(date);
        }
    }
    if let Some(c) = DATE_MONTH_YEAR.captures(text) {
        return ymd(&c[2], &c[1], "1");
    }
    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Odometer reading in miles from text like "50,100 mi" or "Odometer: 50100".
pub fn parse_odometer(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    if lowered.contains("not reported") || lowered.contains("n/a") || lowered.contains("exempt") {
        return None;
    }
    parse_number(text)
}

/// First integer in `text`, allowing thousands separators.
pub fn parse_number(text: &str) -> Option<u32> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

/// Count from text like "3", "3 owners" or "None".
pub fn parse_count(text: &str) -> Option<u32> {
    let lowered = text.trim().to_lowercase();
    if lowered.starts_with("no") || lowered == "0" {
        return Some(0);
    }
    parse_number(text)
}

/// Two-letter state code from a location ("Raleigh, NC") or a bare code.
pub fn parse_state(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() == 2 {
        return valid_state(trimmed);
    }
    if let Some(state) = LOCATION_STATE
        .captures_iter(trimmed)
        .filter_map(|c| valid_state(&c[1]))
        .last()
    {
        return Some(state);
    }
    STATE_TOKEN
        .captures_iter(trimmed)
        .filter_map(|c| valid_state(&c[1]))
        .last()
}

fn valid_state(code: &str) -> Option<String> {
    let upper = code.to_uppercase();
    US_STATES.contains(&upper.as_str()).then_some(upper)
}

/// Year, make, model and trim from a heading like "2018 HONDA ACCORD EX-L".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearMakeModel {
    pub year: Option<u16>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
}

pub fn parse_year_make_model(text: &str) -> YearMakeModel {
    let Some(c) = YEAR_MAKE_MODEL.captures(text) else {
        return YearMakeModel::default();
    };
    YearMakeModel {
        year: c[1].parse().ok(),
        make: Some(c[2].to_string()),
        model: Some(c[3].to_string()),
        trim: c
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty()),
    }
}

/// Interpret a check-row value ("Problem Reported", "No Problem", "Yes").
pub fn parse_flag(text: &str) -> Option<bool> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let negative = ["no", "none", "not ", "clear", "ok", "passed", "false", "0"];
    if negative.iter().any(|n| lowered.starts_with(n)) {
        return Some(false);
    }
    let positive = ["yes", "problem", "reported", "found", "true", "brand", "alert", "1"];
    if positive.iter().any(|p| lowered.starts_with(p)) {
        return Some(true);
    }
    None
}

/// Owner index from "Owner 2", "2nd owner" or a bare "2".
pub fn parse_owner_index(text: &str) -> Option<u32> {
    parse_number(text).filter(|n| *n > 0 && *n < 100)
}
