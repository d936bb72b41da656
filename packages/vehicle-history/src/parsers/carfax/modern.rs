//! Card layout: owner sections holding record cards.

use scraper::ElementRef;

use super::Extracted;
use crate::parsers::fields::parse_count;
use crate::parsers::html::{first_text, has_match, select_all};
use crate::parsers::records::{accident_cards, brand_list, record_cards};
use crate::parsers::summary::Summary;
use crate::types::report::SourceReport;

pub(super) fn extract(
    root: ElementRef<'_>,
    report: &mut SourceReport,
    warnings: &mut Vec<String>,
) -> Extracted {
    report.events = record_cards(root, ".record-card", warnings);
    report.accidents = accident_cards(root, ".accident-card", warnings);

    let sections = select_all(root, ".owner-section").len();
    Extracted {
        has_accident_section: has_match(root, ".accident-card")
            || has_match(root, ".accident-section"),
        summary: Summary {
            estimated_owners: first_text(root, &[".owner-count"])
                .and_then(|t| parse_count(&t))
                .or((sections > 0).then_some(sections as u32)),
            title_brands: brand_list(root),
            ..Default::default()
        },
    }
}
