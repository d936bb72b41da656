//! Carfax parser.
//!
//! Three generations are in circulation, each in its own module:
//! - [`classic`]: `table#detailedHistory` row table with owner divider rows
//! - [`modern`]: `.owner-section` blocks holding `.record-card` entries
//! - [`react`]: single-page app with the report embedded as JSON state

pub mod classic;
pub mod modern;
pub mod react;

use scraper::{ElementRef, Html};

use super::records::vehicle_info;
use super::summary::Summary;
use super::{finish, CarfaxLayout, ParseResult};
use crate::types::report::{Provider, SourceReport};
use crate::types::vehicle::VehicleInfo;

const VIN_SELECTORS: &[&str] = &["#headerVin", ".vin", ".vehicle-vin"];
const HEADING_SELECTORS: &[&str] = &[
    "#headerMakeModelYear",
    ".vehicle-header h1",
    ".vehicle-title",
];

/// What a layout module found besides events and accidents.
pub(super) struct Extracted {
    pub has_accident_section: bool,
    pub summary: Summary,
}

/// Parse a Carfax document, probing for its layout.
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);
    let layout = CarfaxLayout::probe(&doc);
    parse_layout(&doc, html, layout)
}

pub(crate) fn parse_layout(doc: &Html, html: &str, layout: CarfaxLayout) -> ParseResult {
    let root = doc.root_element();
    let mut warnings = Vec::new();
    let mut report = SourceReport::new(Provider::Carfax, layout.as_str(), header_vehicle(root));

    let extracted = match layout {
        CarfaxLayout::Classic => classic::extract(root, &mut report, &mut warnings),
        CarfaxLayout::Modern => modern::extract(root, &mut report, &mut warnings),
        CarfaxLayout::React => react::extract(doc, &mut report, &mut warnings),
    };

    if report.events.is_empty() {
        warnings.push("no history records found".to_string());
    }

    extracted
        .summary
        .or(Summary::from_document(doc))
        .apply(&mut report, &mut warnings);

    finish(report, html, extracted.has_accident_section, warnings)
}

fn header_vehicle(root: ElementRef<'_>) -> VehicleInfo {
    vehicle_info(root, VIN_SELECTORS, HEADING_SELECTORS)
}
