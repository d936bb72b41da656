//! Vehicle History Report Core
//!
//! Turns scraped AutoCheck and Carfax HTML into one deduplicated canonical
//! report per vehicle.
//!
//! # Flow
//!
//! ```text
//! HTML -> detect -> parse (per layout) -> SourceReport -> merge -> CanonicalReport
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use vehicle_history::{merge_reports, parse_report, MergeSource};
//!
//! let autocheck = parse_report(&autocheck_html).into_report().unwrap();
//! let carfax = parse_report(&carfax_html).into_report().unwrap();
//!
//! let canonical = merge_reports(&[
//!     MergeSource::new(autocheck, "parsed-1"),
//!     MergeSource::new(carfax, "parsed-2"),
//! ])?;
//! ```
//!
//! # Modules
//!
//! - [`detect`] - Provider/layout detection and VIN extraction
//! - [`parsers`] - Per-provider layout parsers
//! - [`normalize`] - Event classification, polarity, severity, subtype
//! - [`fingerprint`] - Dedup keys and event similarity
//! - [`merge`] - Field-level merge into a canonical report
//! - [`pipeline`] - Concurrent batch parsing and per-vehicle merging
//! - [`types`] - Shared data types and configuration

pub mod detect;
pub mod error;
pub mod fingerprint;
pub mod merge;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod types;

// Re-export core types at crate root
pub use detect::{detect_provider, detect_provider_with, extract_vin, Detection};
pub use error::{ConfigError, MergeError};
pub use fingerprint::{are_similar_events, are_similar_events_with, create_event_fingerprint};
pub use merge::{merge_reports, merge_reports_with};
pub use normalize::{
    classify_event_type, extract_event_subtype, extract_severity, is_negative_event,
    normalize_event,
};
pub use parsers::{parse_report, AutocheckLayout, CarfaxLayout, ParseResult, ReportFormat};
pub use pipeline::{
    ingest_document, ingest_documents, merge_by_vehicle, merge_documents, ParsedDocument,
    RawDocument,
};
pub use types::{
    config::{CoreConfig, DetectionConfig, IngestConfig, SimilarityConfig},
    event::{EventType, NormalizedEvent, RawParsedEvent, Severity},
    report::{Accident, CanonicalReport, MergeSource, MergedAccident, Provider, SourceReport},
    vehicle::VehicleInfo,
};
