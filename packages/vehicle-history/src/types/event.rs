//! Event types - raw history lines and their normalized form.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single history line as it appears in a provider's report.
///
/// Parsers produce these without interpretation; classification happens
/// later in [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParsedEvent {
    /// Calendar date of the record
    pub date: NaiveDate,

    /// Free-text description (comments column, card body, etc.)
    pub details: String,

    /// Free-text label of who reported the record ("Service Record", "DMV")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,

    /// Odometer reading in miles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer: Option<u32>,

    /// Two-letter state code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// 1-based index of the ownership period the record belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_sequence: Option<u32>,
}

impl RawParsedEvent {
    /// Create an event with only the required fields.
    pub fn new(date: NaiveDate, details: impl Into<String>) -> Self {
        Self {
            date,
            details: details.into(),
            data_source: None,
            odometer: None,
            state: None,
            owner_sequence: None,
        }
    }

    /// Set the data source label.
    pub fn with_data_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = Some(source.into());
        self
    }

    /// Set the odometer reading.
    pub fn with_odometer(mut self, odometer: u32) -> Self {
        self.odometer = Some(odometer);
        self
    }

    /// Set the state code.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the owner sequence.
    pub fn with_owner(mut self, owner: u32) -> Self {
        self.owner_sequence = Some(owner);
        self
    }

    /// (year, month) of the event date.
    pub fn year_month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

/// Canonical event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Service,
    Title,
    Registration,
    Accident,
    Damage,
    Auction,
    Other,
}

impl EventType {
    /// Upper-case wire name, also used as the fingerprint prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Service => "SERVICE",
            EventType::Title => "TITLE",
            EventType::Registration => "REGISTRATION",
            EventType::Accident => "ACCIDENT",
            EventType::Damage => "DAMAGE",
            EventType::Auction => "AUCTION",
            EventType::Other => "OTHER",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a negative event. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }

    /// Parse a provider's severity label ("Minor", "MODERATE", "major damage").
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("severe") || label.contains("major") || label.contains("disabling") {
            Some(Severity::Severe)
        } else if label.contains("moderate") || label.contains("functional") {
            Some(Severity::Moderate)
        } else if label.contains("minor") || label.contains("cosmetic") {
            Some(Severity::Minor)
        } else {
            None
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified event carrying the provenance of every report it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    #[serde(flatten)]
    pub event: RawParsedEvent,

    pub event_type: EventType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    pub is_negative: bool,

    /// Parsed report ids that contributed this event. Never empty.
    pub sources: BTreeSet<String>,

    /// Dedup key of the first event in this cluster.
    pub fingerprint: String,
}

impl NormalizedEvent {
    pub fn date(&self) -> NaiveDate {
        self.event.date
    }

    pub fn details(&self) -> &str {
        &self.event.details
    }
}
