//! Ingest pipeline - detect and parse documents, then merge per vehicle.
//!
//! Parsing is CPU-bound and independent per document, so batches run on
//! tokio's blocking pool behind a semaphore. A document that fails (or
//! whose task panics) yields a failed [`ParseResult`] without affecting the
//! rest of the batch.

use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::detect::{detect_provider_with, Detection};
use crate::error::MergeResult;
use crate::merge::merge_reports_with;
use crate::parsers::ParseResult;
use crate::types::config::{CoreConfig, DetectionConfig, SimilarityConfig};
use crate::types::report::{CanonicalReport, MergeSource};

/// A raw document waiting to be parsed.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Caller-supplied provenance id
    pub parsed_report_id: String,
    pub html: String,
}

impl RawDocument {
    pub fn new(parsed_report_id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            parsed_report_id: parsed_report_id.into(),
            html: html.into(),
        }
    }
}

/// Outcome of detecting and parsing one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub parsed_report_id: String,
    pub detection: Option<Detection>,
    pub result: ParseResult,
}

impl ParsedDocument {
    fn failed(parsed_report_id: String, error: String) -> Self {
        Self {
            parsed_report_id,
            detection: None,
            result: ParseResult::failed(vec![error], Vec::new()),
        }
    }

    /// The parsed report as merge input, when parsing succeeded.
    pub fn merge_source(&self) -> Option<MergeSource> {
        if !self.result.success {
            return None;
        }
        let report = self.result.report.clone()?;
        Some(MergeSource::new(report, self.parsed_report_id.clone()))
    }
}

/// Detect and parse a single document.
pub fn ingest_document(
    config: &DetectionConfig,
    html: &str,
    parsed_report_id: impl Into<String>,
) -> ParsedDocument {
    let parsed_report_id = parsed_report_id.into();

    let Some(detection) = detect_provider_with(config, html) else {
        debug!(parsed_report_id = %parsed_report_id, "No provider detected");
        return ParsedDocument::failed(parsed_report_id, "unrecognized report format".to_string());
    };

    debug!(
        parsed_report_id = %parsed_report_id,
        provider = %detection.provider(),
        version = detection.version(),
        confidence = detection.confidence,
        "Detected report format"
    );

    let result = detection.format.parse(html);
    ParsedDocument {
        parsed_report_id,
        detection: Some(detection),
        result,
    }
}

/// Parse a batch of documents concurrently, preserving input order.
pub async fn ingest_documents(
    documents: Vec<RawDocument>,
    config: &CoreConfig,
) -> Vec<ParsedDocument> {
    let total = documents.len();
    let semaphore = Arc::new(Semaphore::new(config.ingest.max_concurrent_parses.max(1)));
    let detection = config.detection;

    let tasks = documents.into_iter().map(|doc| {
        let sem = semaphore.clone();
        async move {
            let id = doc.parsed_report_id.clone();
            let Ok(_permit) = sem.acquire_owned().await else {
                return ParsedDocument::failed(id, "parser pool closed".to_string());
            };

            let task = tokio::task::spawn_blocking(move || {
                ingest_document(&detection, &doc.html, doc.parsed_report_id)
            });
            match task.await {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(parsed_report_id = %id, error = %e, "Parse task failed");
                    ParsedDocument::failed(id, format!("parse task failed: {e}"))
                }
            }
        }
    });

    let parsed = join_all(tasks).await;

    let failed = parsed.iter().filter(|p| !p.result.success).count();
    info!(
        documents = total,
        parsed = total - failed,
        failed = failed,
        "Batch parse complete"
    );
    parsed
}

/// Merge every successfully parsed document into one report.
///
/// All documents are assumed to describe the same vehicle; failed parses
/// are skipped. Errors only when nothing parsed.
pub fn merge_documents(
    documents: &[ParsedDocument],
    config: &SimilarityConfig,
) -> MergeResult<CanonicalReport> {
    let sources: Vec<MergeSource> = documents
        .iter()
        .filter_map(ParsedDocument::merge_source)
        .collect();
    merge_reports_with(config, &sources)
}

/// Group successfully parsed documents by VIN and merge each group.
///
/// Groups keep the order in which their VIN was first seen.
pub fn merge_by_vehicle(
    documents: &[ParsedDocument],
    config: &SimilarityConfig,
) -> MergeResult<IndexMap<String, CanonicalReport>> {
    let mut groups: IndexMap<String, Vec<MergeSource>> = IndexMap::new();
    for source in documents.iter().filter_map(ParsedDocument::merge_source) {
        groups.entry(source.report.vin().to_string()).or_default().push(source);
    }

    let mut merged = IndexMap::new();
    for (vin, sources) in groups {
        let report = merge_reports_with(config, &sources)?;
        merged.insert(vin, report);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_document() {
        let parsed = ingest_document(&DetectionConfig::default(), "<p>hello</p>", "doc-1");
        assert!(parsed.detection.is_none());
        assert!(!parsed.result.success);
        assert!(parsed.merge_source().is_none());
    }

    #[test]
    fn test_merge_documents_with_nothing_parsed() {
        let parsed = vec![ParsedDocument::failed("x".to_string(), "boom".to_string())];
        let err = merge_documents(&parsed, &SimilarityConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot merge empty source list");
    }
}
