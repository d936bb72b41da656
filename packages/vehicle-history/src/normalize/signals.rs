//! Negativity, severity and subtype heuristics.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::event::{EventType, RawParsedEvent, Severity};

lazy_static! {
    static ref NEGATIVE_WORDS: Regex = Regex::new(
        r"(?i)\b(accidents?|collisions?|salvage|total(?:led)?[\s-]+loss|totall?ed|damaged?|fire|flood(?:ed)?|hail|airbags?\s+deployed|junk|stolen|theft|lemon|rebuilt\s+title)\b"
    ).unwrap();

    // "No accidents reported", "without damage", "no accident or damage"
    static ref NEGATED_PHRASE: Regex = Regex::new(
        r"(?i)\b(?:no|without|never|not)\s+(?:[a-z]+\s+){0,2}?(?:accidents?|damages?|damaged|collisions?)(?:\s+(?:or|and)\s+(?:accidents?|damages?|collisions?))?"
    ).unwrap();

    static ref SEVERE_WORDS: Regex =
        Regex::new(r"(?i)\b(severe|major|disabling|structural)\b").unwrap();
    static ref MODERATE_WORDS: Regex = Regex::new(r"(?i)\b(moderate|functional)\b").unwrap();
    static ref MINOR_WORDS: Regex = Regex::new(r"(?i)\b(minor|cosmetic|superficial)\b").unwrap();
}

/// Whether the event describes accident, salvage, total-loss, damage, fire,
/// flood or similar adverse history.
pub fn is_negative_event(event: &RawParsedEvent) -> bool {
    let text = searchable_text(event);
    let without_negations = NEGATED_PHRASE.replace_all(&text, " ");
    NEGATIVE_WORDS.is_match(&without_negations)
}

/// Severity of a negative event; `None` for events that are not negative.
///
/// Negative events with no severity keyword default to moderate.
pub fn extract_severity(event: &RawParsedEvent) -> Option<Severity> {
    if !is_negative_event(event) {
        return None;
    }

    let text = searchable_text(event);
    Some(severity_keyword(&text).unwrap_or(Severity::Moderate))
}

/// Severity keywords in precedence order: severe, then moderate, then minor.
fn severity_keyword(text: &str) -> Option<Severity> {
    if SEVERE_WORDS.is_match(text) {
        Some(Severity::Severe)
    } else if MODERATE_WORDS.is_match(text) {
        Some(Severity::Moderate)
    } else if MINOR_WORDS.is_match(text) {
        Some(Severity::Minor)
    } else {
        None
    }
}

struct SubtypeRule {
    event_type: EventType,
    pattern: &'static str,
    subtype: &'static str,
}

/// Type-scoped refinements. Within a type, the first match wins.
static SUBTYPE_RULES: &[SubtypeRule] = &[
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\boil\b",
        subtype: "oil_change",
    },
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\bbrakes?\b",
        subtype: "brake_service",
    },
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\b(tires?|rotat)",
        subtype: "tire_service",
    },
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\brecall\b",
        subtype: "recall_repair",
    },
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\b(emissions|inspect)",
        subtype: "inspection",
    },
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\bbattery\b",
        subtype: "battery_service",
    },
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\btransmission\b",
        subtype: "transmission_service",
    },
    SubtypeRule {
        event_type: EventType::Service,
        pattern: r"\b(maintenance|maintained)\b",
        subtype: "routine_maintenance",
    },
    SubtypeRule {
        event_type: EventType::Title,
        pattern: r"\blien",
        subtype: "title_with_lien",
    },
    SubtypeRule {
        event_type: EventType::Title,
        pattern: r"\bsalvage\b",
        subtype: "salvage_title",
    },
    SubtypeRule {
        event_type: EventType::Title,
        pattern: r"\b(rebuilt|reconstructed)\b",
        subtype: "rebuilt_title",
    },
    SubtypeRule {
        event_type: EventType::Title,
        pattern: r"\bduplicate\b",
        subtype: "duplicate_title",
    },
    SubtypeRule {
        event_type: EventType::Registration,
        pattern: r"\brenew",
        subtype: "registration_renewal",
    },
    SubtypeRule {
        event_type: EventType::Registration,
        pattern: r"\b(new|first)\s+(owner|registration)",
        subtype: "new_registration",
    },
    SubtypeRule {
        event_type: EventType::Accident,
        pattern: r"\bairbags?\b",
        subtype: "airbag_deployment",
    },
    SubtypeRule {
        event_type: EventType::Accident,
        pattern: r"\brear",
        subtype: "rear_impact",
    },
    SubtypeRule {
        event_type: EventType::Accident,
        pattern: r"\b(front|head-on)",
        subtype: "front_impact",
    },
    SubtypeRule {
        event_type: EventType::Accident,
        pattern: r"\bside\b",
        subtype: "side_impact",
    },
    SubtypeRule {
        event_type: EventType::Damage,
        pattern: r"\bsalvage\b",
        subtype: "salvage",
    },
    SubtypeRule {
        event_type: EventType::Damage,
        pattern: r"\bflood",
        subtype: "flood_damage",
    },
    SubtypeRule {
        event_type: EventType::Damage,
        pattern: r"\bfire\b",
        subtype: "fire_damage",
    },
    SubtypeRule {
        event_type: EventType::Damage,
        pattern: r"\bhail\b",
        subtype: "hail_damage",
    },
    SubtypeRule {
        event_type: EventType::Damage,
        pattern: r"\btotal(?:led)?[\s-]+loss\b",
        subtype: "total_loss",
    },
    SubtypeRule {
        event_type: EventType::Auction,
        pattern: r"\bsalvage\b",
        subtype: "salvage_auction",
    },
    SubtypeRule {
        event_type: EventType::Auction,
        pattern: r"\bdealer\b",
        subtype: "dealer_auction",
    },
    SubtypeRule {
        event_type: EventType::Auction,
        pattern: r"\bsold\b",
        subtype: "sold_at_auction",
    },
];

lazy_static! {
    static ref SUBTYPE_PATTERNS: Vec<Regex> = SUBTYPE_RULES
        .iter()
        .map(|rule| Regex::new(&format!("(?i){}", rule.pattern)).unwrap())
        .collect();
}

/// Refine an event type into a subtype using type-scoped keywords.
pub fn extract_event_subtype(
    event_type: EventType,
    event: &RawParsedEvent,
) -> Option<&'static str> {
    let text = searchable_text(event);
    SUBTYPE_RULES
        .iter()
        .zip(SUBTYPE_PATTERNS.iter())
        .filter(|(rule, _)| rule.event_type == event_type)
        .find(|(_, re)| re.is_match(&text))
        .map(|(rule, _)| rule.subtype)
}

/// Details plus the data source label, which sometimes carries the only
/// keyword ("Salvage Auction", "Fire Dept.").
fn searchable_text(event: &RawParsedEvent) -> String {
    match event.data_source.as_deref() {
        Some(label) => format!("{} {}", event.details, label),
        None => event.details.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(details: &str) -> RawParsedEvent {
        RawParsedEvent::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), details)
    }

    #[test]
    fn test_negative_language() {
        assert!(is_negative_event(&event("Accident reported")));
        assert!(is_negative_event(&event("Salvage title issued")));
        assert!(is_negative_event(&event("Vehicle declared a total loss")));
        assert!(is_negative_event(&event("Flood damage reported")));
        assert!(is_negative_event(&event("Fire reported")));
    }

    #[test]
    fn test_routine_language_is_not_negative() {
        assert!(!is_negative_event(&event("Oil change performed")));
        assert!(!is_negative_event(&event("Registration renewal")));
        assert!(!is_negative_event(&event("Vehicle serviced, tires rotated")));
    }

    #[test]
    fn test_negated_phrases_are_not_negative() {
        assert!(!is_negative_event(&event("No accidents reported")));
        assert!(!is_negative_event(&event("Inspected - no damage found")));
        assert!(!is_negative_event(&event("No accident or damage reported")));
        assert!(is_negative_event(&event("No injuries, rear collision")));
    }

    #[test]
    fn test_label_contributes_to_negativity() {
        let e = event("Vehicle sold").with_data_source("Salvage Auction");
        assert!(is_negative_event(&e));
    }

    #[test]
    fn test_explicit_severity() {
        assert_eq!(extract_severity(&event("Severe damage reported")), Some(Severity::Severe));
        assert_eq!(
            extract_severity(&event("Major damage reported to vehicle")),
            Some(Severity::Severe)
        );
        assert_eq!(extract_severity(&event("Moderate damage to front")), Some(Severity::Moderate));
        assert_eq!(extract_severity(&event("Minor damage reported")), Some(Severity::Minor));
    }

    #[test]
    fn test_default_severity() {
        assert_eq!(extract_severity(&event("Accident reported")), Some(Severity::Moderate));
        assert_eq!(extract_severity(&event("Oil change performed")), None);
        assert_eq!(extract_severity(&event("Minor maintenance performed")), None);
    }

    #[test]
    fn test_subtypes() {
        let oil = event("Oil and filter changed");
        assert_eq!(extract_event_subtype(EventType::Service, &oil), Some("oil_change"));

        let brakes = event("Front brakes replaced");
        assert_eq!(extract_event_subtype(EventType::Service, &brakes), Some("brake_service"));

        let lien = event("Title issued with lienholder");
        assert_eq!(extract_event_subtype(EventType::Title, &lien), Some("title_with_lien"));

        let salvage = event("Salvage damage reported");
        assert_eq!(extract_event_subtype(EventType::Damage, &salvage), Some("salvage"));
    }

    #[test]
    fn test_subtype_scoped_to_type() {
        let oil = event("Oil leak after collision");
        assert_eq!(extract_event_subtype(EventType::Accident, &oil), None);
        assert_eq!(extract_event_subtype(EventType::Other, &event("Oil")), None);
    }
}
