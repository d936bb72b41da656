//! Summary scalars shared by every layout.
//!
//! Layout parsers fill what their own markup exposes, then fall back to
//! [`Summary::from_document`], which reads labelled values and free text.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

use super::fields::{parse_count, parse_date, parse_flag, parse_odometer};
use super::html::{document_text, labeled_value};
use crate::types::report::SourceReport;

lazy_static! {
    static ref OWNERS_TEXT: Regex =
        Regex::new(r"(?i)\b(\d{1,2})\s+(?:previous\s+|prior\s+)?owners?\b").unwrap();
    static ref ACCIDENTS_TEXT: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+accidents?\s+reported\b|\baccidents?\s+reported\s*:?\s*(\d{1,2})\b"
    ).unwrap();
    static ref RECALLS_TEXT: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+open\s+recalls?\b|\bopen\s+recalls?\s*:?\s*(\d{1,2})\b"
    ).unwrap();
    static ref REPORT_DATE_TEXT: Regex = Regex::new(
        r"(?i)\b(?:report\s+(?:run\s+date|date|generated(?:\s+on)?|run(?:\s+on)?)|date\s+run)\s*:?\s*([A-Za-z0-9/,\- ]{6,20})"
    ).unwrap();
    static ref TOTAL_LOSS_TEXT: Regex = Regex::new(
        r"(?i)\btotal\s+loss\s+(?:reported|brand|vehicle|declared|record)|\bdeclared\s+(?:a\s+)?total\s+loss"
    ).unwrap();
    static ref ODOMETER_ISSUE_TEXT: Regex = Regex::new(
        r"(?i)\bodometer\s+(?:rollback|problem|discrepancy|tampering|inconsisten)|\bnot\s+actual\s+mileage|\bexceeds\s+mechanical\s+limits"
    ).unwrap();
}

const OWNER_LABELS: &[&str] = &[
    "Owners",
    "Estimated owners",
    "Number of owners",
    "Previous owners",
    "Owner count",
];
const ACCIDENT_LABELS: &[&str] = &["Accidents reported", "Accident count", "Number of accidents"];
const ODOMETER_LABELS: &[&str] = &[
    "Last reported odometer",
    "Last odometer reading",
    "Last reported mileage",
    "Odometer reading",
];
const ODOMETER_DATE_LABELS: &[&str] = &["Last odometer date", "Odometer reported on"];
const RECALL_LABELS: &[&str] = &["Open recalls", "Open recall count", "Recalls"];
const REPORT_DATE_LABELS: &[&str] = &[
    "Report run date",
    "Report date",
    "Date run",
    "Report generated",
];
const TOTAL_LOSS_LABELS: &[&str] = &["Total loss", "Total loss check"];
const ODOMETER_CHECK_LABELS: &[&str] =
    &["Odometer check", "Odometer problems", "Odometer rollback"];
const BRAND_LABELS: &[&str] = &["Title brands", "Title brand", "Branded title", "Title problems"];

/// Summary scalars of one report; `None` means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub report_date: Option<NaiveDate>,
    pub estimated_owners: Option<u32>,
    pub accident_count: Option<u32>,
    pub odometer_last_reported: Option<u32>,
    pub odometer_last_date: Option<NaiveDate>,
    pub odometer_issues: Option<bool>,
    pub total_loss: Option<bool>,
    pub open_recall_count: Option<u32>,
    pub title_brands: Vec<String>,
}

impl Summary {
    /// Read summary scalars from labelled values, then from free text.
    pub fn from_document(doc: &Html) -> Self {
        let root = doc.root_element();
        let text = document_text(doc);
        let labeled = |labels: &[&str]| labeled_value(root, labels);

        Self {
            report_date: labeled(REPORT_DATE_LABELS)
                .and_then(|v| parse_date(&v))
                .or_else(|| {
                    REPORT_DATE_TEXT
                        .captures(&text)
                        .and_then(|c| parse_date(&c[1]))
                }),
            estimated_owners: labeled(OWNER_LABELS)
                .and_then(|v| parse_count(&v))
                .or_else(|| first_number(&OWNERS_TEXT, &text)),
            accident_count: labeled(ACCIDENT_LABELS)
                .and_then(|v| parse_count(&v))
                .or_else(|| first_number(&ACCIDENTS_TEXT, &text)),
            odometer_last_reported: labeled(ODOMETER_LABELS).and_then(|v| parse_odometer(&v)),
            odometer_last_date: labeled(ODOMETER_DATE_LABELS).and_then(|v| parse_date(&v)),
            odometer_issues: labeled(ODOMETER_CHECK_LABELS)
                .and_then(|v| parse_flag(&v))
                .or_else(|| affirmed(&ODOMETER_ISSUE_TEXT, &text)),
            total_loss: labeled(TOTAL_LOSS_LABELS)
                .and_then(|v| parse_flag(&v))
                .or_else(|| affirmed(&TOTAL_LOSS_TEXT, &text)),
            open_recall_count: labeled(RECALL_LABELS)
                .and_then(|v| parse_count(&v))
                .or_else(|| first_number(&RECALLS_TEXT, &text)),
            title_brands: labeled(BRAND_LABELS)
                .map(|v| split_brands(&v))
                .unwrap_or_default(),
        }
    }

    /// Fill every field still missing from `fallback`.
    pub fn or(mut self, fallback: Summary) -> Self {
        self.report_date = self.report_date.or(fallback.report_date);
        self.estimated_owners = self.estimated_owners.or(fallback.estimated_owners);
        self.accident_count = self.accident_count.or(fallback.accident_count);
        self.odometer_last_reported = self
            .odometer_last_reported
            .or(fallback.odometer_last_reported);
        self.odometer_last_date = self.odometer_last_date.or(fallback.odometer_last_date);
        self.odometer_issues = self.odometer_issues.or(fallback.odometer_issues);
        self.total_loss = self.total_loss.or(fallback.total_loss);
        self.open_recall_count = self.open_recall_count.or(fallback.open_recall_count);
        if self.title_brands.is_empty() {
            self.title_brands = fallback.title_brands;
        }
        self
    }

    /// Whether any scalar was found.
    pub fn is_empty(&self) -> bool {
        *self == Summary::default()
    }

    /// Write the summary into `report`, warning about gaps.
    ///
    /// Call after events are extracted: a missing last odometer reading is
    /// taken from the latest event that has one.
    pub fn apply(self, report: &mut SourceReport, warnings: &mut Vec<String>) {
        let brands_total_loss = self.title_brands.iter().any(|b| b.contains("total loss"));

        report.report_date = self.report_date;
        report.estimated_owners = self.estimated_owners;
        report.accident_count = self.accident_count;
        report.odometer_issues = self.odometer_issues.unwrap_or(false);
        report.total_loss = self.total_loss.unwrap_or(false) || brands_total_loss;
        report.open_recall_count = self.open_recall_count;
        report.title_brands = self.title_brands;

        match self.odometer_last_reported {
            Some(odometer) => {
                report.odometer_last_reported = Some(odometer);
                report.odometer_last_date = self.odometer_last_date;
            }
            None => {
                if let Some(latest) = report
                    .events
                    .iter()
                    .filter(|e| e.odometer.is_some())
                    .max_by_key(|e| (e.date, e.odometer))
                {
                    report.odometer_last_reported = latest.odometer;
                    report.odometer_last_date = Some(latest.date);
                }
            }
        }

        if report.report_date.is_none() {
            warnings.push("report date not found".to_string());
        }
        if report.estimated_owners.is_none() {
            warnings.push("estimated owner count not found".to_string());
        }
        if report.odometer_last_reported.is_none() {
            warnings.push("no odometer reading found".to_string());
        }
        if report.open_recall_count.is_none() {
            warnings.push("open recall count not found".to_string());
        }
    }
}

/// Split a brand list like "Salvage, Rebuilt" into lowercase brand names.
pub fn split_brands(text: &str) -> Vec<String> {
    text.split([',', ';', '|', '/'])
        .map(|b| b.trim().to_lowercase())
        .filter(|b| !b.is_empty())
        .filter(|b| !(b == "none" || b.starts_with("no ") || b == "clean"))
        .collect()
}

fn first_number(re: &Regex, text: &str) -> Option<u32> {
    let caps = re.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .find_map(|m| m.as_str().parse().ok())
}

/// `Some(true)` when the pattern occurs without a leading "no".
fn affirmed(re: &Regex, text: &str) -> Option<bool> {
    re.find_iter(text)
        .any(|m| {
            let before = text[..m.start()].trim_end().to_lowercase();
            !(before.ends_with(" no") || before == "no" || before.ends_with("without"))
        })
        .then_some(true)
}
