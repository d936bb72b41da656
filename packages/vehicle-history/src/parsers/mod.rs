//! Format parsers - raw provider HTML into a [`SourceReport`].
//!
//! Dispatch is a closed union: [`ReportFormat`] names a provider and one of
//! its layouts, and each layout knows how to parse itself. Layouts are
//! chosen by probing the markup, since older saved documents routinely
//! carry a misleading version banner.
//!
//! # Contract
//!
//! A parse only fails when the document has no VIN or nothing extractable
//! at all. Every other gap (optional field missing, unparseable row,
//! ambiguous owner index) is a warning and the parse still succeeds.

pub mod autocheck;
pub mod carfax;
pub mod fields;
pub mod html;
pub mod records;
pub mod summary;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detect::{detect_provider, extract_vin, find_vin};
use crate::normalize::{classify_event_type, extract_severity};
use crate::types::event::EventType;
use crate::types::report::{Accident, Provider, SourceReport};

use self::html::has_match;

/// Outcome of parsing one document.
///
/// `errors` is non-empty exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<SourceReport>,

    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ParseResult {
    pub fn ok(report: SourceReport, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            report: Some(report),
            errors: Vec::new(),
            warnings,
        }
    }

    pub fn failed(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            report: None,
            errors,
            warnings,
        }
    }

    /// The report, when the parse succeeded.
    pub fn into_report(self) -> Option<SourceReport> {
        if self.success {
            self.report
        } else {
            None
        }
    }
}

/// AutoCheck layout generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutocheckLayout {
    /// Div-based `history-record` blocks
    FullReport,
    /// Single header-mapped `history-table`
    Legacy,
}

impl AutocheckLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutocheckLayout::FullReport => "full_report",
            AutocheckLayout::Legacy => "legacy",
        }
    }

    /// Pick the layout from structural markers.
    pub fn probe(doc: &Html) -> Self {
        let root = doc.root_element();
        if has_match(root, "table.history-table") && !has_match(root, ".history-record") {
            AutocheckLayout::Legacy
        } else {
            AutocheckLayout::FullReport
        }
    }
}

/// Carfax layout generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarfaxLayout {
    /// Row table with owner divider rows
    Classic,
    /// Owner sections holding record cards
    Modern,
    /// Single-page app with the report embedded as JSON state
    React,
}

impl CarfaxLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarfaxLayout::Classic => "classic",
            CarfaxLayout::Modern => "modern",
            CarfaxLayout::React => "react",
        }
    }

    /// Pick the layout from structural markers.
    pub fn probe(doc: &Html) -> Self {
        let root = doc.root_element();
        if has_match(root, "[data-react-helmet]") || carfax::react::has_embedded_state(doc) {
            CarfaxLayout::React
        } else if has_match(root, ".record-card") || has_match(root, ".owner-section") {
            CarfaxLayout::Modern
        } else {
            CarfaxLayout::Classic
        }
    }
}

/// A provider plus one of its layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Autocheck(AutocheckLayout),
    Carfax(CarfaxLayout),
}

impl ReportFormat {
    pub fn provider(&self) -> Provider {
        match self {
            ReportFormat::Autocheck(_) => Provider::Autocheck,
            ReportFormat::Carfax(_) => Provider::Carfax,
        }
    }

    /// Parser version string recorded on the report.
    pub fn version(&self) -> &'static str {
        match self {
            ReportFormat::Autocheck(layout) => layout.as_str(),
            ReportFormat::Carfax(layout) => layout.as_str(),
        }
    }

    /// Parse `html` with this layout.
    pub fn parse(&self, html: &str) -> ParseResult {
        let doc = Html::parse_document(html);
        match self {
            ReportFormat::Autocheck(layout) => autocheck::parse_layout(&doc, html, *layout),
            ReportFormat::Carfax(layout) => carfax::parse_layout(&doc, html, *layout),
        }
    }
}

/// Detect the provider and parse with the matching layout.
pub fn parse_report(html: &str) -> ParseResult {
    match detect_provider(html) {
        Some(detection) => detection.format.parse(html),
        None => ParseResult::failed(vec!["unrecognized report format".to_string()], Vec::new()),
    }
}

/// Finish a layout parse: resolve the VIN, backfill accidents and decide
/// success.
pub(crate) fn finish(
    mut report: SourceReport,
    html: &str,
    has_accident_section: bool,
    mut warnings: Vec<String>,
) -> ParseResult {
    let mut errors = Vec::new();

    let layout_vin = find_vin(&report.vehicle_info.vin);
    match layout_vin.or_else(|| extract_vin(html)) {
        Some(vin) => report.vehicle_info.vin = vin,
        None => errors.push("VIN not found".to_string()),
    }

    if !has_accident_section && report.accidents.is_empty() {
        report.accidents = derive_accidents(&report);
        if !report.accidents.is_empty() {
            warnings.push(format!(
                "no accident section; derived {} accident(s) from history events",
                report.accidents.len()
            ));
        }
    }

    if !report.has_content() {
        errors.push("no extractable report section found".to_string());
    }

    for field in report.vehicle_info.missing_fields() {
        warnings.push(format!("vehicle {field} not found"));
    }

    if !errors.is_empty() {
        warn!(
            provider = %report.provider,
            version = %report.parser_version,
            errors = ?errors,
            "Report parse failed"
        );
        return ParseResult::failed(errors, warnings);
    }

    debug!(
        provider = %report.provider,
        version = %report.parser_version,
        vin = %report.vehicle_info.vin,
        events = report.events.len(),
        accidents = report.accidents.len(),
        warnings = warnings.len(),
        "Parsed report"
    );
    ParseResult::ok(report, warnings)
}

/// Accidents implied by history events when a layout has no accident list.
fn derive_accidents(report: &SourceReport) -> Vec<Accident> {
    report
        .events
        .iter()
        .filter(|e| classify_event_type(e) == EventType::Accident)
        .map(|e| {
            let accident = Accident::new(e.date, e.details.clone());
            match extract_severity(e) {
                Some(severity) => accident.with_severity(severity),
                None => accident,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::event::RawParsedEvent;
    use crate::types::vehicle::VehicleInfo;
    use chrono::NaiveDate;

    fn report_with_event(details: &str) -> SourceReport {
        let mut report = SourceReport::new(
            Provider::Carfax,
            "classic",
            VehicleInfo::new("1HGCV1F34JA123456"),
        );
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        report.events.push(RawParsedEvent::new(date, details));
        report
    }

    #[test]
    fn test_format_version_strings() {
        assert_eq!(ReportFormat::Autocheck(AutocheckLayout::FullReport).version(), "full_report");
        assert_eq!(ReportFormat::Autocheck(AutocheckLayout::Legacy).version(), "legacy");
        assert_eq!(ReportFormat::Carfax(CarfaxLayout::Classic).version(), "classic");
        assert_eq!(ReportFormat::Carfax(CarfaxLayout::Modern).version(), "modern");
        assert_eq!(ReportFormat::Carfax(CarfaxLayout::React).version(), "react");
    }

    #[test]
    fn test_finish_without_vin_fails() {
        let mut report = report_with_event("Oil change");
        report.vehicle_info.vin.clear();

        let result = finish(report, "<html></html>", true, Vec::new());
        assert!(!result.success);
        assert!(result.report.is_none());
        assert_eq!(result.errors, vec!["VIN not found"]);
    }

    #[test]
    fn test_finish_falls_back_to_document_vin() {
        let mut report = report_with_event("Oil change");
        report.vehicle_info.vin.clear();

        let result = finish(report, "<p>VIN: 1HGCV1F34JA123456</p>", true, Vec::new());
        assert!(result.success);
        assert_eq!(result.report.unwrap().vin(), "1HGCV1F34JA123456");
    }

    #[test]
    fn test_finish_without_content_fails() {
        let report = SourceReport::new(
            Provider::Autocheck,
            "legacy",
            VehicleInfo::new("1HGCV1F34JA123456"),
        );
        let result = finish(report, "", false, Vec::new());
        assert!(!result.success);
        assert!(result.errors[0].contains("no extractable"));
    }

    #[test]
    fn test_finish_derives_accidents() {
        let report = report_with_event("Accident reported - minor damage, rear impact");
        let result = finish(report, "", false, Vec::new());

        let report = result.report.unwrap();
        assert_eq!(report.accidents.len(), 1);
        assert!(result.warnings.iter().any(|w| w.contains("derived 1 accident")));
    }

    #[test]
    fn test_finish_warns_about_missing_vehicle_fields() {
        let result = finish(report_with_event("Oil change"), "", true, Vec::new());
        assert!(result.success);
        assert!(result.errors.is_empty());
        assert!(result.warnings.contains(&"vehicle make not found".to_string()));
    }

    #[test]
    fn test_parse_report_unrecognized() {
        let result = parse_report("<html><body><p>Hello</p></body></html>");
        assert!(!result.success);
        assert_eq!(result.errors, vec!["unrecognized report format"]);
    }
}
