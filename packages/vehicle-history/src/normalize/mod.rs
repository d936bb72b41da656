//! Event normalizer - turns raw history lines into classified events.
//!
//! Every heuristic here is an ordered table evaluated top to bottom:
//! - [`rules`] decides the [`EventType`]
//! - [`signals`] decides negativity, severity and subtype

pub mod rules;
pub mod signals;

use std::collections::BTreeSet;

use crate::fingerprint::create_event_fingerprint;
use crate::types::event::{EventType, NormalizedEvent, RawParsedEvent};

pub use rules::{matching_rule, ClassificationRule, EventText, CLASSIFICATION_RULES};
pub use signals::{extract_event_subtype, extract_severity, is_negative_event};

/// Classify an event into its canonical type. Falls back to `Other`.
pub fn classify_event_type(event: &RawParsedEvent) -> EventType {
    matching_rule(event)
        .map(|rule| rule.event_type)
        .unwrap_or(EventType::Other)
}

/// Classify a raw event and tag it with the report it came from.
pub fn normalize_event(event: RawParsedEvent, source_id: impl Into<String>) -> NormalizedEvent {
    let event_type = classify_event_type(&event);
    let subtype = extract_event_subtype(event_type, &event).map(str::to_string);
    let is_negative = is_negative_event(&event);
    let severity = extract_severity(&event);
    let fingerprint = create_event_fingerprint(event_type, &event);

    NormalizedEvent {
        event,
        event_type,
        subtype,
        severity,
        is_negative,
        sources: BTreeSet::from([source_id.into()]),
        fingerprint,
    }
}
