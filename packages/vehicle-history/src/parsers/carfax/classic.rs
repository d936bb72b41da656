//! Classic row-table layout.

use scraper::ElementRef;

use super::Extracted;
use crate::parsers::html::{first_text, has_match, select_first};
use crate::parsers::records::{accident_table, brand_list, history_table};
use crate::parsers::summary::{split_brands, Summary};
use crate::types::report::SourceReport;

pub(super) fn extract(
    root: ElementRef<'_>,
    report: &mut SourceReport,
    warnings: &mut Vec<String>,
) -> Extracted {
    match select_first(root, &["table#detailedHistory", "table.detailed-history"]) {
        Some(table) => report.events = history_table(table, warnings),
        None => warnings.push("detailed history table not found".to_string()),
    }

    let has_accident_section = has_match(root, "table#accidentTable");
    if let Some(table) = select_first(root, &["table#accidentTable"]) {
        report.accidents = accident_table(table, warnings);
    }

    let mut title_brands = brand_list(root);
    if title_brands.is_empty() {
        title_brands = first_text(root, &["#titleBrands"])
            .map(|t| split_brands(&t))
            .unwrap_or_default();
    }

    Extracted {
        has_accident_section,
        summary: Summary {
            title_brands,
            ..Default::default()
        },
    }
}
