//! Batch ingestion and per-vehicle merging.

mod common;

use common::*;
use vehicle_history::{
    ingest_document, ingest_documents, merge_by_vehicle, merge_documents, CoreConfig,
    DetectionConfig, Provider, RawDocument, SimilarityConfig,
};

fn batch() -> Vec<RawDocument> {
    vec![
        RawDocument::new("ac-honda", AUTOCHECK_FULL_REPORT),
        RawDocument::new("junk", UNRELATED_PAGE),
        RawDocument::new("cf-honda", CARFAX_CLASSIC),
        RawDocument::new("cf-camry", CARFAX_MODERN),
        RawDocument::new("ac-corolla", AUTOCHECK_LEGACY),
    ]
}

#[tokio::test]
async fn test_batch_preserves_order_and_isolates_failures() {
    let config = CoreConfig::default().with_max_concurrent_parses(2);
    let parsed = ingest_documents(batch(), &config).await;

    let ids: Vec<&str> = parsed.iter().map(|p| p.parsed_report_id.as_str()).collect();
    assert_eq!(ids, vec!["ac-honda", "junk", "cf-honda", "cf-camry", "ac-corolla"]);

    assert!(parsed[0].result.success);
    assert!(!parsed[1].result.success);
    assert!(parsed[1].detection.is_none());
    assert_eq!(parsed[1].result.errors, vec!["unrecognized report format"]);
    assert!(parsed[2..].iter().all(|p| p.result.success));

    let detection = parsed[3].detection.unwrap();
    assert_eq!(detection.provider(), Provider::Carfax);
    assert_eq!(detection.version(), "modern");
}

#[tokio::test]
async fn test_merge_by_vehicle_groups_on_vin() {
    let parsed = ingest_documents(batch(), &CoreConfig::default()).await;
    let merged = merge_by_vehicle(&parsed, &SimilarityConfig::default()).unwrap();

    let vins: Vec<&str> = merged.keys().map(String::as_str).collect();
    assert_eq!(vins, vec![HONDA_VIN, CAMRY_VIN, TOYOTA_VIN]);

    let honda = &merged[HONDA_VIN];
    assert_eq!(honda.source_report_ids, vec!["ac-honda", "cf-honda"]);
    assert_eq!(honda.source_providers.len(), 2);
    assert_eq!(honda.estimated_owners, Some(3));

    let camry = &merged[CAMRY_VIN];
    assert_eq!(camry.source_report_ids, vec!["cf-camry"]);
    assert_eq!(camry.accident_count, 0);
}

#[tokio::test]
async fn test_single_permit_still_parses_everything() {
    let config = CoreConfig::default().with_max_concurrent_parses(1);
    let parsed = ingest_documents(batch(), &config).await;
    assert_eq!(parsed.iter().filter(|p| p.result.success).count(), 4);
}

#[tokio::test]
async fn test_empty_batch() {
    let parsed = ingest_documents(Vec::new(), &CoreConfig::default()).await;
    assert!(parsed.is_empty());
    assert!(merge_by_vehicle(&parsed, &SimilarityConfig::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_merge_documents_skips_failures() {
    let config = DetectionConfig::default();
    let parsed = vec![
        ingest_document(&config, AUTOCHECK_FULL_REPORT, "ac-honda"),
        ingest_document(&config, UNRELATED_PAGE, "junk"),
        ingest_document(&config, CARFAX_REACT, "cf-react"),
    ];

    let merged = merge_documents(&parsed, &SimilarityConfig::default()).unwrap();
    assert_eq!(merged.source_report_ids, vec!["ac-honda", "cf-react"]);
    assert_eq!(merged.vin(), HONDA_VIN);
}

#[test]
fn test_parsed_document_serializes_detection() {
    let parsed = ingest_document(&DetectionConfig::default(), CARFAX_REACT, "cf-react");
    let json = serde_json::to_value(&parsed).unwrap();

    assert_eq!(json["parsedReportId"], "cf-react");
    assert_eq!(json["detection"]["provider"], "carfax");
    assert_eq!(json["detection"]["version"], "react");
    assert_eq!(json["result"]["success"], true);
}
