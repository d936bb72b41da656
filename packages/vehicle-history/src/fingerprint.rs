//! Fingerprint engine - dedup keys and event similarity.
//!
//! The fingerprint is the fast path: events that land in the same
//! (type, month, odometer bucket, state) bucket are compared first.
//! [`are_similar_events`] is the slow confirmatory path that also catches
//! identical events split across a bucket edge (49,900 vs 50,100 miles).

use chrono::Datelike;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::types::config::SimilarityConfig;
use crate::types::event::{EventType, RawParsedEvent};

/// Width of an odometer bucket in miles.
pub const ODOMETER_BUCKET: u32 = 1000;

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 16;

/// Words that carry no meaning when comparing event descriptions.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "from", "in", "is", "of", "on", "or", "the", "to",
    "was", "were", "with", "vehicle", "reported", "report",
];

/// Round an odometer reading down to its bucket.
pub fn odometer_bucket(odometer: u32) -> u32 {
    odometer - odometer % ODOMETER_BUCKET
}

/// Compute the 16-character dedup key of an event.
///
/// Depends only on the event type, the (year, month) of the date, the
/// odometer bucket and the state, so it is stable across runs and
/// providers. Details text is deliberately not part of the key.
pub fn create_event_fingerprint(event_type: EventType, event: &RawParsedEvent) -> String {
    let bucket = event
        .odometer
        .map(|o| odometer_bucket(o).to_string())
        .unwrap_or_else(|| "-".to_string());
    let state = event
        .state
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "-".to_string());

    let key = format!(
        "{}|{:04}-{:02}|{}|{}",
        event_type.as_str(),
        event.date.year(),
        event.date.month(),
        bucket,
        state
    );

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}

/// Whether two events describe the same real-world record, using the
/// default tolerances.
pub fn are_similar_events(
    a: &RawParsedEvent,
    b: &RawParsedEvent,
    type_a: EventType,
    type_b: EventType,
) -> bool {
    are_similar_events_with(&SimilarityConfig::default(), a, b, type_a, type_b)
}

/// Whether two events describe the same real-world record.
///
/// Requires the same type, the same (year, month), matching states (or both
/// absent), odometers within tolerance when both are present, and details
/// text at or above the similarity threshold.
pub fn are_similar_events_with(
    config: &SimilarityConfig,
    a: &RawParsedEvent,
    b: &RawParsedEvent,
    type_a: EventType,
    type_b: EventType,
) -> bool {
    if type_a != type_b {
        return false;
    }
    if a.year_month() != b.year_month() {
        return false;
    }

    let states_match = match (a.state.as_deref(), b.state.as_deref()) {
        (Some(sa), Some(sb)) => sa.trim().eq_ignore_ascii_case(sb.trim()),
        (None, None) => true,
        _ => false,
    };
    if !states_match {
        return false;
    }

    if let (Some(oa), Some(ob)) = (a.odometer, b.odometer) {
        if oa.abs_diff(ob) > config.odometer_tolerance {
            return false;
        }
    }

    text_similarity(&a.details, &b.details) >= config.text_threshold
}

/// Similarity of two free-text descriptions in `0.0..=1.0`.
///
/// The larger of the token overlap coefficient (tolerant of added or
/// reordered words) and the normalized Levenshtein similarity (tolerant of
/// typos and abbreviations).
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let norm_a = normalize_text(a);
    let norm_b = normalize_text(b);

    if norm_a.is_empty() || norm_b.is_empty() {
        return if norm_a == norm_b { 1.0 } else { 0.0 };
    }

    let overlap = token_overlap(&norm_a, &norm_b);
    let edit = strsim::normalized_levenshtein(&norm_a, &norm_b);
    overlap.max(edit)
}

fn token_overlap(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    let smaller = ta.len().min(tb.len());
    if smaller == 0 {
        return 0.0;
    }
    ta.intersection(&tb).count() as f64 / smaller as f64
}

/// Lowercase, punctuation to spaces, whitespace collapsed.
fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokens(normalized: &str) -> BTreeSet<String> {
    normalized
        .split_whitespace()
        .filter(|t| !STOPWORDS.contains(t))
        .map(stem)
        .collect()
}

/// Crude suffix stripping so "changed", "changes" and "change" agree.
fn stem(token: &str) -> String {
    let mut word = token;
    for suffix in ["ing", "ed", "es", "s"] {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) && !word.ends_with("ss") {
            word = &word[..word.len() - suffix.len()];
            break;
        }
    }
    if word.len() > 3 && word.ends_with('e') {
        word = &word[..word.len() - 1];
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn service(day: u32, odometer: u32, state: &str, details: &str) -> RawParsedEvent {
        RawParsedEvent::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), details)
            .with_odometer(odometer)
            .with_state(state)
    }

    #[test]
    fn test_fingerprint_is_16_hex_chars() {
        let fp = create_event_fingerprint(EventType::Service, &service(15, 50_100, "NC", "Oil"));
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let event = service(15, 50_100, "NC", "Oil change");
        assert_eq!(
            create_event_fingerprint(EventType::Service, &event),
            create_event_fingerprint(EventType::Service, &event.clone())
        );
    }

    #[test]
    fn test_fingerprint_buckets_odometer() {
        let a = service(3, 50_100, "NC", "Oil change");
        let b = service(28, 50_200, "NC", "Completely different text");
        assert_eq!(
            create_event_fingerprint(EventType::Service, &a),
            create_event_fingerprint(EventType::Service, &b)
        );
    }

    #[test]
    fn test_fingerprint_changes_with_month_and_type() {
        let jan = service(15, 50_100, "NC", "Oil change");
        let mut feb = jan.clone();
        feb.date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();

        assert_ne!(
            create_event_fingerprint(EventType::Service, &jan),
            create_event_fingerprint(EventType::Service, &feb)
        );
        assert_ne!(
            create_event_fingerprint(EventType::Service, &jan),
            create_event_fingerprint(EventType::Title, &jan)
        );
    }

    #[test]
    fn test_fingerprint_state_case_insensitive() {
        let upper = service(15, 50_100, "NC", "Oil change");
        let lower = service(15, 50_100, "nc", "Oil change");
        assert_eq!(
            create_event_fingerprint(EventType::Service, &upper),
            create_event_fingerprint(EventType::Service, &lower)
        );
    }

    #[test]
    fn test_similar_paraphrase() {
        let a = service(10, 50_000, "NC", "Oil change performed");
        let b = service(12, 50_100, "NC", "Oil and filter changed");
        assert!(are_similar_events(&a, &b, EventType::Service, EventType::Service));
    }

    #[test]
    fn test_not_similar_far_odometer() {
        let a = service(10, 50_000, "NC", "Oil change performed");
        let b = service(12, 60_000, "NC", "Oil change performed");
        assert!(!are_similar_events(&a, &b, EventType::Service, EventType::Service));
    }

    #[test]
    fn test_not_similar_different_state() {
        let a = service(10, 50_000, "NC", "Oil change performed");
        let b = service(12, 50_000, "CA", "Oil change performed");
        assert!(!are_similar_events(&a, &b, EventType::Service, EventType::Service));
    }

    #[test]
    fn test_not_similar_different_type() {
        let a = service(10, 50_000, "NC", "Oil change performed");
        assert!(!are_similar_events(&a, &a, EventType::Service, EventType::Title));
    }

    #[test]
    fn test_state_present_on_one_side_only() {
        let a = service(10, 50_000, "NC", "Oil change performed");
        let mut b = a.clone();
        b.state = None;
        assert!(!are_similar_events(&a, &b, EventType::Service, EventType::Service));
    }

    #[test]
    fn test_missing_odometer_is_not_disqualifying() {
        let a = service(10, 50_000, "NC", "Title issued");
        let mut b = a.clone();
        b.odometer = None;
        assert!(are_similar_events(&a, &b, EventType::Title, EventType::Title));
    }

    #[test]
    fn test_unrelated_text_not_similar() {
        let a = service(10, 50_000, "NC", "Oil change performed");
        let b = service(12, 50_100, "NC", "Windshield replaced");
        assert!(!are_similar_events(&a, &b, EventType::Service, EventType::Service));
    }

    #[test]
    fn test_text_similarity_bounds() {
        assert_eq!(text_similarity("", ""), 1.0);
        assert_eq!(text_similarity("Oil change", ""), 0.0);
        assert_eq!(text_similarity("Oil change", "OIL CHANGE!"), 1.0);
    }

    #[test]
    fn test_stem() {
        assert_eq!(stem("changed"), stem("change"));
        assert_eq!(stem("changes"), stem("change"));
        assert_eq!(stem("serviced"), stem("service"));
        assert_eq!(stem("glass"), "glass");
    }
}
