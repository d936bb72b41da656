//! Accident deduplication across sources.

use chrono::Datelike;
use std::collections::BTreeSet;

use crate::types::report::{Accident, MergedAccident};

/// Impact categories used to tell two same-month accidents apart.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("rear", &["rear", "rear-end", "rear end"]),
    ("front", &["front", "head-on", "head on"]),
    ("side", &["side", "t-bone", "broadside"]),
    ("rollover", &["rollover", "rolled"]),
    ("animal", &["animal", "deer"]),
    ("object", &["pole", "tree", "guardrail", "fixed object"]),
];

/// Impact category of a free-text accident type; `None` when generic
/// ("Accident", "Collision with another vehicle").
pub fn accident_category(accident_type: &str) -> Option<&'static str> {
    let lowered = accident_type.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(category, _)| *category)
}

/// Same (year, month) and compatible types: equal categories, or either
/// side generic.
fn same_accident(a: &Accident, b: &Accident) -> bool {
    if (a.date.year(), a.date.month()) != (b.date.year(), b.date.month()) {
        return false;
    }
    match (accident_category(&a.accident_type), accident_category(&b.accident_type)) {
        (Some(ca), Some(cb)) => ca == cb,
        _ => true,
    }
}

/// Collapse accidents reported by several sources.
///
/// Input is taken in date order, so the earliest date of a collapsed
/// accident is kept whatever order the sources came in. A generic type is
/// replaced by a categorized one; severity takes the worst. Two accidents
/// from the same report are never collapsed.
pub fn dedup_accidents(mut accidents: Vec<(Accident, String)>) -> Vec<MergedAccident> {
    accidents.sort_by(|(a, a_source), (b, b_source)| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.accident_type.cmp(&b.accident_type))
            .then_with(|| a.severity.cmp(&b.severity))
            .then_with(|| a_source.cmp(b_source))
    });

    let mut merged: Vec<MergedAccident> = Vec::new();

    for (accident, source) in accidents {
        let existing = merged
            .iter_mut()
            .find(|m| !m.sources.contains(&source) && same_accident(&m.accident, &accident));

        match existing {
            Some(existing) => {
                existing.sources.insert(source);
                existing.accident.severity = existing.accident.severity.max(accident.severity);
                if accident_category(&existing.accident.accident_type).is_none()
                    && accident_category(&accident.accident_type).is_some()
                {
                    existing.accident.accident_type = accident.accident_type;
                }
            }
            None => merged.push(MergedAccident {
                accident,
                sources: BTreeSet::from([source]),
            }),
        }
    }

    merged.sort_by_key(|m| m.accident.date);
    merged
}
