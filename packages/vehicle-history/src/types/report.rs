//! Report types - per-provider parse output and the merged canonical report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::event::{NormalizedEvent, RawParsedEvent, Severity};
use super::vehicle::VehicleInfo;

/// Originating vendor of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Autocheck,
    Carfax,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Autocheck => "autocheck",
            Provider::Carfax => "carfax",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accident as listed in a provider's accident section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accident {
    pub date: NaiveDate,

    /// Free-text accident type ("Collision with another vehicle", "Rear impact")
    #[serde(rename = "type")]
    pub accident_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Accident {
    pub fn new(date: NaiveDate, accident_type: impl Into<String>) -> Self {
        Self {
            date,
            accident_type: accident_type.into(),
            severity: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

/// A deduplicated accident in the canonical report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedAccident {
    #[serde(flatten)]
    pub accident: Accident,

    /// Parsed report ids that listed this accident.
    pub sources: BTreeSet<String>,
}

impl MergedAccident {
    pub fn date(&self) -> NaiveDate {
        self.accident.date
    }
}

/// Structured output of parsing one provider document.
///
/// Immutable once returned by a parser; the merge engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub provider: Provider,

    /// Layout strategy that produced this report ("classic", "full_report", ...)
    pub parser_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_date: Option<NaiveDate>,

    pub vehicle_info: VehicleInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_owners: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accident_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer_last_reported: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer_last_date: Option<NaiveDate>,

    #[serde(default)]
    pub odometer_issues: bool,

    #[serde(default)]
    pub title_brands: Vec<String>,

    #[serde(default)]
    pub total_loss: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_recall_count: Option<u32>,

    #[serde(default)]
    pub events: Vec<RawParsedEvent>,

    #[serde(default)]
    pub accidents: Vec<Accident>,
}

impl SourceReport {
    /// Create an empty report for a provider and vehicle.
    pub fn new(
        provider: Provider,
        parser_version: impl Into<String>,
        vehicle_info: VehicleInfo,
    ) -> Self {
        Self {
            provider,
            parser_version: parser_version.into(),
            report_date: None,
            vehicle_info,
            estimated_owners: None,
            accident_count: None,
            odometer_last_reported: None,
            odometer_last_date: None,
            odometer_issues: false,
            title_brands: Vec::new(),
            total_loss: false,
            open_recall_count: None,
            events: Vec::new(),
            accidents: Vec::new(),
        }
    }

    pub fn vin(&self) -> &str {
        &self.vehicle_info.vin
    }

    /// True when the report carries any event or scalar field.
    pub fn has_content(&self) -> bool {
        !self.events.is_empty()
            || !self.accidents.is_empty()
            || !self.title_brands.is_empty()
            || self.estimated_owners.is_some()
            || self.accident_count.is_some()
            || self.odometer_last_reported.is_some()
            || self.open_recall_count.is_some()
            || self.total_loss
            || self.odometer_issues
    }
}

/// One input to the merge engine: a parsed report plus its provenance id.
#[derive(Debug, Clone)]
pub struct MergeSource {
    pub report: SourceReport,

    /// Caller-supplied id, used only as a provenance tag on merged events.
    pub parsed_report_id: String,
}

impl MergeSource {
    pub fn new(report: SourceReport, parsed_report_id: impl Into<String>) -> Self {
        Self {
            report,
            parsed_report_id: parsed_report_id.into(),
        }
    }
}

/// The single merged, deduplicated record for a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalReport {
    pub vehicle_info: VehicleInfo,

    /// Latest report date among the inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_owners: Option<u32>,

    /// Always equal to `accidents.len()`
    pub accident_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer_last_reported: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer_last_date: Option<NaiveDate>,

    pub odometer_issues: bool,

    pub title_brands: Vec<String>,

    pub total_loss: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_recall_count: Option<u32>,

    /// Always equal to `events.len()`
    pub event_count: u32,

    pub service_record_count: u32,

    pub events: Vec<NormalizedEvent>,

    pub accidents: Vec<MergedAccident>,

    pub source_providers: BTreeSet<Provider>,

    /// Parsed report ids in input order
    pub source_report_ids: Vec<String>,
}

impl CanonicalReport {
    pub fn vin(&self) -> &str {
        &self.vehicle_info.vin
    }

    /// Events that describe accidents, damage, salvage and the like.
    pub fn negative_events(&self) -> impl Iterator<Item = &NormalizedEvent> {
        self.events.iter().filter(|e| e.is_negative)
    }
}
