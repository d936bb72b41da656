//! Merge engine - reduces the source reports for one vehicle into a single
//! [`CanonicalReport`].
//!
//! A pure batch transform: every call builds a fresh report from the full
//! input list. Field policy:
//!
//! | field | policy |
//! |---|---|
//! | vehicleInfo | first non-empty value per attribute, input order |
//! | estimatedOwners, openRecallCount | max |
//! | titleBrands | case-normalized set union, sorted |
//! | totalLoss, odometerIssues | OR |
//! | accidentCount | number of deduplicated accidents |
//! | odometerLastReported/Date | latest event carrying an odometer |
//! | reportDate | latest |

pub mod accidents;
pub mod events;

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::error::{MergeError, MergeResult};
use crate::normalize::normalize_event;
use crate::types::config::SimilarityConfig;
use crate::types::event::EventType;
use crate::types::report::{CanonicalReport, MergeSource};

pub use accidents::{accident_category, dedup_accidents};
pub use events::dedup_events;

/// Merge with the default similarity tolerances.
pub fn merge_reports(sources: &[MergeSource]) -> MergeResult<CanonicalReport> {
    merge_reports_with(&SimilarityConfig::default(), sources)
}

/// Merge every source report for one vehicle.
///
/// Fails only on an empty input list. Callers filter out failed parses
/// first and must not merge the same vehicle concurrently.
pub fn merge_reports_with(
    config: &SimilarityConfig,
    sources: &[MergeSource],
) -> MergeResult<CanonicalReport> {
    let (first, rest) = sources.split_first().ok_or(MergeError::EmptySourceList)?;

    let mut vehicle_info = first.report.vehicle_info.clone();
    for source in rest {
        if !source.report.vin().is_empty() && source.report.vin() != vehicle_info.vin {
            warn!(
                expected = %vehicle_info.vin,
                found = %source.report.vin(),
                parsed_report_id = %source.parsed_report_id,
                "Merging report with a different VIN"
            );
        }
        vehicle_info.fill_from(&source.report.vehicle_info);
    }

    let raw_event_count: usize = sources.iter().map(|s| s.report.events.len()).sum();
    let normalized = sources
        .iter()
        .flat_map(|s| {
            s.report
                .events
                .iter()
                .map(move |e| normalize_event(e.clone(), s.parsed_report_id.clone()))
        })
        .collect();
    let events = dedup_events(normalized, config);

    let accidents = dedup_accidents(
        sources
            .iter()
            .flat_map(|s| {
                s.report
                    .accidents
                    .iter()
                    .map(move |a| (a.clone(), s.parsed_report_id.clone()))
            })
            .collect(),
    );

    let latest_odometer = events
        .iter()
        .filter_map(|e| e.event.odometer.map(|o| (e.date(), o)))
        .max();

    let title_brands: BTreeSet<String> = sources
        .iter()
        .flat_map(|s| s.report.title_brands.iter())
        .map(|b| b.trim().to_lowercase())
        .filter(|b| !b.is_empty())
        .collect();

    let report = CanonicalReport {
        vehicle_info,
        report_date: sources.iter().filter_map(|s| s.report.report_date).max(),
        estimated_owners: sources.iter().filter_map(|s| s.report.estimated_owners).max(),
        accident_count: accidents.len() as u32,
        odometer_last_reported: latest_odometer.map(|(_, o)| o),
        odometer_last_date: latest_odometer.map(|(d, _)| d),
        odometer_issues: sources.iter().any(|s| s.report.odometer_issues),
        title_brands: title_brands.into_iter().collect(),
        total_loss: sources.iter().any(|s| s.report.total_loss),
        open_recall_count: sources.iter().filter_map(|s| s.report.open_recall_count).max(),
        event_count: events.len() as u32,
        service_record_count: events
            .iter()
            .filter(|e| e.event_type == EventType::Service)
            .count() as u32,
        events,
        accidents,
        source_providers: sources
            .iter()
            .filter(|s| s.report.has_content())
            .map(|s| s.report.provider)
            .collect(),
        source_report_ids: sources.iter().map(|s| s.parsed_report_id.clone()).collect(),
    };

    debug!(
        vin = %report.vin(),
        sources = sources.len(),
        raw_events = raw_event_count,
        merged_events = report.event_count,
        accidents = report.accident_count,
        "Merged reports"
    );

    Ok(report)
}
