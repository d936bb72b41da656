//! Provider and layout detection against full report fixtures.

mod common;

use common::*;
use vehicle_history::{detect_provider, detect_provider_with, DetectionConfig, Provider};

#[test]
fn autocheck_full_report_is_detected_with_high_confidence() {
    let detection = detect_provider(AUTOCHECK_FULL_REPORT).expect("should detect AutoCheck");

    assert_eq!(detection.provider(), Provider::Autocheck);
    assert_eq!(detection.version(), "full_report");
    assert!(detection.confidence > 0.3);
    assert!(detection.confidence <= 1.0);
}

#[test]
fn autocheck_legacy_layout_is_recognized() {
    let detection = detect_provider(AUTOCHECK_LEGACY).expect("should detect AutoCheck");

    assert_eq!(detection.provider(), Provider::Autocheck);
    assert_eq!(detection.version(), "legacy");
}

#[test]
fn carfax_layouts_are_told_apart() {
    let cases = [
        (CARFAX_CLASSIC, "classic"),
        (CARFAX_MODERN, "modern"),
        (CARFAX_REACT, "react"),
    ];

    for (html, version) in cases {
        let detection = detect_provider(html).expect("should detect Carfax");
        assert_eq!(detection.provider(), Provider::Carfax, "layout {version}");
        assert_eq!(detection.version(), version);
    }
}

#[test]
fn react_helmet_title_alone_is_enough_for_carfax() {
    let html = r#"<html><head>
        <title data-react-helmet="true">CARFAX Vehicle History Report</title>
        </head><body><div id="root"></div></body></html>"#;

    let detection = detect_provider(html).expect("should detect Carfax");
    assert_eq!(detection.provider(), Provider::Carfax);
    assert_eq!(detection.version(), "react");
    assert!(detection.confidence > 0.3);
}

#[test]
fn unrelated_page_is_not_detected() {
    assert!(detect_provider(UNRELATED_PAGE).is_none());
    assert!(detect_provider("").is_none());
}

#[test]
fn confidence_floor_is_configurable() {
    // Title plus markers only
    let html = r#"<html><head><title>CARFAX Report</title></head>
        <body><div class="record-card"></div></body></html>"#;

    assert!(detect_provider(html).is_some());

    let strict = DetectionConfig { min_confidence: 0.9 };
    assert!(detect_provider_with(&strict, html).is_none());
}

#[test]
fn detection_serializes_provider_and_version() {
    let detection = detect_provider(CARFAX_REACT).unwrap();
    let json = serde_json::to_value(detection).unwrap();

    assert_eq!(json["provider"], "carfax");
    assert_eq!(json["version"], "react");
    assert!(json["confidence"].as_f64().unwrap() > 0.3);
}
