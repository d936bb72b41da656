//! Event type classification rules.
//!
//! Rules are evaluated top to bottom and the first match wins. Rules that
//! look at the `dataSource` label come before rules that look at the
//! free-text details, so a "Service Record" line that mentions an accident
//! repair is still a service event.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::event::{EventType, RawParsedEvent};

lazy_static! {
    static ref SERVICE_LABEL: Regex = Regex::new(r"(?i)\bservice").unwrap();

    // State titling/registration agencies under their many names
    static ref DMV_LABEL: Regex = Regex::new(
        r"(?i)\b(dmv|mvd|bmv|motor\s+vehicles?|dept\.?\s+of\s+motor|department\s+of\s+motor|bureau\s+of\s+motor|secretary\s+of\s+state|dept\.?\s+of\s+revenue|department\s+of\s+revenue|title\s+(?:and|&)\s+registration)"
    ).unwrap();

    static ref AUCTION_WORD: Regex = Regex::new(r"(?i)\bauction").unwrap();
    static ref TITLE_WORD: Regex = Regex::new(r"(?i)\btitle").unwrap();
    static ref REGISTRATION_WORD: Regex =
        Regex::new(r"(?i)\b(registration|registered|re-?registered|renew)").unwrap();
    static ref ACCIDENT_WORD: Regex = Regex::new(r"(?i)\b(accident|collision)").unwrap();
    static ref DAMAGE_WORD: Regex = Regex::new(r"(?i)\b(damage|salvage)").unwrap();
    static ref SERVICE_WORD: Regex = Regex::new(
        r"(?i)\b(oil|maintenance|maintained|service|serviced|inspect|inspection|inspected|tires?|brakes?|battery|alignment|wiper|filter|fluid|transmission|coolant)\b"
    ).unwrap();

    // A recall notice alone is not work done on the vehicle
    static ref SERVICE_WORK: Regex = Regex::new(
        r"(?i)\b(?:recall\s+(?:repair(?:ed)?|performed|completed|remedy)|emissions\s+test(?:ed)?)\b"
    ).unwrap();
}

/// The text an event is classified on.
#[derive(Debug, Clone, Copy)]
pub struct EventText<'a> {
    pub label: Option<&'a str>,
    pub details: &'a str,
}

impl<'a> EventText<'a> {
    pub fn of(event: &'a RawParsedEvent) -> Self {
        Self {
            label: event.data_source.as_deref(),
            details: &event.details,
        }
    }

    fn label_matches(&self, re: &Regex) -> bool {
        self.label.is_some_and(|l| re.is_match(l))
    }

    fn details_match(&self, re: &Regex) -> bool {
        re.is_match(self.details)
    }
}

/// One row of the classification table.
pub struct ClassificationRule {
    pub name: &'static str,
    pub matches: fn(&EventText<'_>) -> bool,
    pub event_type: EventType,
}

/// Ordered classification table. The first matching rule decides the type.
pub static CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "service_label",
        matches: service_label,
        event_type: EventType::Service,
    },
    ClassificationRule {
        name: "dmv_label_title",
        matches: dmv_label_title,
        event_type: EventType::Title,
    },
    ClassificationRule {
        name: "dmv_label_registration",
        matches: dmv_label_registration,
        event_type: EventType::Registration,
    },
    ClassificationRule {
        name: "auction_label",
        matches: auction_label,
        event_type: EventType::Auction,
    },
    ClassificationRule {
        name: "accident_details",
        matches: accident_details,
        event_type: EventType::Accident,
    },
    ClassificationRule {
        name: "damage_details",
        matches: damage_details,
        event_type: EventType::Damage,
    },
    ClassificationRule {
        name: "title_details",
        matches: title_details,
        event_type: EventType::Title,
    },
    ClassificationRule {
        name: "registration_details",
        matches: registration_details,
        event_type: EventType::Registration,
    },
    ClassificationRule {
        name: "service_details",
        matches: service_details,
        event_type: EventType::Service,
    },
    ClassificationRule {
        name: "auction_details",
        matches: auction_details,
        event_type: EventType::Auction,
    },
    // A DMV line that mentions neither title nor registration is almost
    // always a registration-side record (odometer reading, plate transfer)
    ClassificationRule {
        name: "dmv_label_fallback",
        matches: dmv_label_fallback,
        event_type: EventType::Registration,
    },
];

fn service_label(t: &EventText<'_>) -> bool {
    t.label_matches(&SERVICE_LABEL)
}

fn dmv_label_title(t: &EventText<'_>) -> bool {
    t.label_matches(&DMV_LABEL) && t.details_match(&TITLE_WORD)
}

fn dmv_label_registration(t: &EventText<'_>) -> bool {
    t.label_matches(&DMV_LABEL) && t.details_match(&REGISTRATION_WORD)
}

fn auction_label(t: &EventText<'_>) -> bool {
    t.label_matches(&AUCTION_WORD)
}

fn accident_details(t: &EventText<'_>) -> bool {
    t.details_match(&ACCIDENT_WORD)
}

fn damage_details(t: &EventText<'_>) -> bool {
    t.details_match(&DAMAGE_WORD)
}

fn title_details(t: &EventText<'_>) -> bool {
    t.details_match(&TITLE_WORD)
}

fn registration_details(t: &EventText<'_>) -> bool {
    t.details_match(&REGISTRATION_WORD)
}

fn service_details(t: &EventText<'_>) -> bool {
    t.details_match(&SERVICE_WORD) || t.details_match(&SERVICE_WORK)
}

fn auction_details(t: &EventText<'_>) -> bool {
    t.details_match(&AUCTION_WORD)
}

fn dmv_label_fallback(t: &EventText<'_>) -> bool {
    t.label_matches(&DMV_LABEL)
}

/// First rule that matches the event, if any.
pub fn matching_rule(event: &RawParsedEvent) -> Option<&'static ClassificationRule> {
    let text = EventText::of(event);
    CLASSIFICATION_RULES.iter().find(|rule| (rule.matches)(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(label: Option<&str>, details: &str) -> RawParsedEvent {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let event = RawParsedEvent::new(date, details);
        match label {
            Some(l) => event.with_data_source(l),
            None => event,
        }
    }

    fn rule_name(label: Option<&str>, details: &str) -> Option<&'static str> {
        matching_rule(&event(label, details)).map(|r| r.name)
    }

    #[test]
    fn test_service_label_beats_accident_details() {
        assert_eq!(
            rule_name(Some("Service Record"), "Accident repair completed"),
            Some("service_label")
        );
    }

    #[test]
    fn test_dmv_label_title() {
        assert_eq!(
            rule_name(Some("Motor Vehicle Dept."), "Title issued"),
            Some("dmv_label_title")
        );
    }

    #[test]
    fn test_dmv_label_registration() {
        assert_eq!(
            rule_name(Some("DMV"), "Registration renewal"),
            Some("dmv_label_registration")
        );
        assert_eq!(
            rule_name(Some("Department of Motor Vehicles"), "Registration issued"),
            Some("dmv_label_registration")
        );
    }

    #[test]
    fn test_dmv_label_fallback_is_last() {
        assert_eq!(
            rule_name(Some("Motor Vehicle Dept."), "Odometer reading reported"),
            Some("dmv_label_fallback")
        );
        // Details rules still win over the fallback
        assert_eq!(
            rule_name(Some("Motor Vehicle Dept."), "Damage report filed"),
            Some("damage_details")
        );
    }

    #[test]
    fn test_auction_label() {
        assert_eq!(rule_name(Some("Auction"), "Vehicle sold"), Some("auction_label"));
    }

    #[test]
    fn test_details_rules() {
        assert_eq!(rule_name(None, "Accident reported - collision"), Some("accident_details"));
        assert_eq!(rule_name(None, "Major damage reported to vehicle"), Some("damage_details"));
        assert_eq!(rule_name(None, "Title issued"), Some("title_details"));
        assert_eq!(rule_name(None, "Registration renewal"), Some("registration_details"));
        assert_eq!(rule_name(None, "Oil change performed"), Some("service_details"));
        assert_eq!(rule_name(None, "Listed at dealer auction"), Some("auction_details"));
    }

    #[test]
    fn test_recall_counts_as_service_only_when_repaired() {
        assert_eq!(rule_name(None, "Manufacturer recall issued"), None);
        assert_eq!(rule_name(None, "Safety recall notice sent"), None);
        assert_eq!(rule_name(None, "Recall performed"), Some("service_details"));
        assert_eq!(
            rule_name(None, "Safety recall repair completed"),
            Some("service_details")
        );
    }

    #[test]
    fn test_emissions_needs_a_test_or_inspection() {
        assert_eq!(rule_name(None, "Emissions test passed"), Some("service_details"));
        assert_eq!(rule_name(None, "Emissions inspection"), Some("service_details"));
        assert_eq!(rule_name(None, "California emissions vehicle"), None);
    }

    #[test]
    fn test_no_rule_matches() {
        assert_eq!(rule_name(None, "Vehicle color changed"), None);
        assert_eq!(rule_name(Some("Dealer"), "Vehicle offered for sale"), None);
    }

    #[test]
    fn test_word_boundaries() {
        // "entire" must not read as "tire"; "subtitle" must not read as "title"
        assert_eq!(rule_name(None, "Entire history reviewed"), None);
        assert_eq!(rule_name(None, "Subtitled listing"), None);
    }
}
