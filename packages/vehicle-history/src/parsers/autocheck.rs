//! AutoCheck parser.
//!
//! Two generations are in circulation:
//! - `full_report`: `body#fastLinkFullReport`, one `.history-record` block per
//!   event grouped by `data-owner`, accidents as `.accident-record` blocks.
//! - `legacy`: a single `table.history-table` with "Owner N" divider rows
//!   and an optional `table.accident-table`.

use scraper::{ElementRef, Html};

use super::fields::parse_count;
use super::html::{first_text, has_match, select_first};
use super::records::{
    accident_cards, accident_table, brand_list, history_table, record_cards, vehicle_info,
};
use super::summary::Summary;
use super::{finish, AutocheckLayout, ParseResult};
use crate::types::report::{Provider, SourceReport};

const VIN_SELECTORS: &[&str] = &[".vin", "#vin", ".vehicle-vin"];
const HEADING_SELECTORS: &[&str] = &[
    ".vehicle-ymm",
    ".ymm",
    "h1.vehicle-title",
    ".vehicle-info h1",
];

/// Parse an AutoCheck document, probing for its layout.
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);
    let layout = AutocheckLayout::probe(&doc);
    parse_layout(&doc, html, layout)
}

pub(crate) fn parse_layout(doc: &Html, html: &str, layout: AutocheckLayout) -> ParseResult {
    let root = doc.root_element();
    let mut warnings = Vec::new();
    let mut report = SourceReport::new(
        Provider::Autocheck,
        layout.as_str(),
        vehicle_info(root, VIN_SELECTORS, HEADING_SELECTORS),
    );

    let has_accident_section = match layout {
        AutocheckLayout::FullReport => parse_full_report(root, &mut report, &mut warnings),
        AutocheckLayout::Legacy => parse_legacy(root, &mut report, &mut warnings),
    };

    if report.events.is_empty() {
        warnings.push("no history records found".to_string());
    }

    layout_summary(root)
        .or(Summary::from_document(doc))
        .apply(&mut report, &mut warnings);

    finish(report, html, has_accident_section, warnings)
}

fn parse_full_report(
    root: ElementRef<'_>,
    report: &mut SourceReport,
    warnings: &mut Vec<String>,
) -> bool {
    report.events = record_cards(root, ".history-record", warnings);
    report.accidents = accident_cards(root, ".accident-record", warnings);
    has_match(root, ".accident-records") || has_match(root, ".accident-record")
}

fn parse_legacy(
    root: ElementRef<'_>,
    report: &mut SourceReport,
    warnings: &mut Vec<String>,
) -> bool {
    match select_first(root, &["table.history-table"]) {
        Some(table) => report.events = history_table(table, warnings),
        None => warnings.push("history table not found".to_string()),
    }
    match select_first(root, &["table.accident-table"]) {
        Some(table) => {
            report.accidents = accident_table(table, warnings);
            true
        }
        None => false,
    }
}

/// Summary values AutoCheck exposes in dedicated elements.
fn layout_summary(root: ElementRef<'_>) -> Summary {
    Summary {
        estimated_owners: first_text(root, &[".owner-count"]).and_then(|t| parse_count(&t)),
        title_brands: brand_list(root),
        ..Default::default()
    }
}
