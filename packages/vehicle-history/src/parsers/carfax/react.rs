//! Single-page layout: the report ships as JSON state inside a `<script>`.
//!
//! Two embeddings are seen in saved pages:
//! - `<script id="__CARFAX_REPORT_STATE__" type="application/json">{...}</script>`
//! - `<script>window.__INITIAL_STATE__ = {...};</script>`
//!
//! Pages saved before the app hydrated have no usable state; those fall back
//! to the server-rendered card markup.

use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use super::{modern, Extracted};
use crate::parsers::fields::{parse_date, parse_odometer};
use crate::parsers::html::script_bodies;
use crate::parsers::records::RowFields;
use crate::parsers::summary::{split_brands, Summary};
use crate::types::event::Severity;
use crate::types::report::{Accident, SourceReport};
use crate::types::vehicle::VehicleInfo;

const STATE_SCRIPT_ID: &str = "__CARFAX_REPORT_STATE__";
const INITIAL_STATE_MARKER: &str = "__INITIAL_STATE__";

/// A JSON scalar some app versions emit as a number and others as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(u64),
    Text(String),
}

impl Scalar {
    fn text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(t) => t.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReportState {
    vehicle: VehicleState,
    report_date: Option<String>,
    summary: SummaryState,
    ownership_history: Vec<OwnerState>,
    accidents: Vec<AccidentState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VehicleState {
    vin: Option<String>,
    year: Option<Scalar>,
    make: Option<String>,
    model: Option<String>,
    trim: Option<String>,
    body_style: Option<String>,
    engine: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryState {
    owner_count: Option<u32>,
    accident_count: Option<u32>,
    last_odometer: Option<Scalar>,
    last_odometer_date: Option<String>,
    total_loss: Option<bool>,
    odometer_problem: Option<bool>,
    title_brands: Vec<String>,
    open_recall_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OwnerState {
    owner_number: Option<u32>,
    records: Vec<RecordState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecordState {
    date: Option<String>,
    odometer: Option<Scalar>,
    source: Option<String>,
    location: Option<String>,
    comments: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AccidentState {
    date: Option<String>,
    #[serde(rename = "type")]
    accident_type: Option<String>,
    severity: Option<String>,
}

/// Whether the document carries embedded report state.
pub fn has_embedded_state(doc: &Html) -> bool {
    script_bodies(doc).iter().any(|(id, body)| {
        id.as_deref() == Some(STATE_SCRIPT_ID) || body.contains(INITIAL_STATE_MARKER)
    })
}

/// Raw JSON text of the embedded state, if any.
fn embedded_json(doc: &Html) -> Option<String> {
    let scripts = script_bodies(doc);
    if let Some((_, body)) = scripts
        .iter()
        .find(|(id, _)| id.as_deref() == Some(STATE_SCRIPT_ID))
    {
        return Some(body.trim().to_string());
    }

    scripts.iter().find_map(|(_, body)| {
        let marker = body.find(INITIAL_STATE_MARKER)?;
        let rest = &body[marker..];
        let start = rest.find('{')?;
        let end = rest.rfind('}')?;
        (end > start).then(|| rest[start..=end].to_string())
    })
}

fn load_state(doc: &Html) -> Result<ReportState, String> {
    let json = embedded_json(doc).ok_or_else(|| "embedded report state not found".to_string())?;
    let mut value: Value =
        serde_json::from_str(&json).map_err(|e| format!("embedded report state is invalid: {e}"))?;

    // Some app versions nest everything under "report"
    if let Some(inner) = value.get_mut("report").filter(|r| r.is_object()) {
        value = inner.take();
    }
    serde_json::from_value(value).map_err(|e| format!("embedded report state is invalid: {e}"))
}

pub(super) fn extract(
    doc: &Html,
    report: &mut SourceReport,
    warnings: &mut Vec<String>,
) -> Extracted {
    let state = match load_state(doc) {
        Ok(state) => state,
        Err(reason) => {
            warnings.push(format!("{reason}; falling back to card layout"));
            return modern::extract(doc.root_element(), report, warnings);
        }
    };

    let header = std::mem::take(&mut report.vehicle_info);
    report.vehicle_info = vehicle_from(state.vehicle);
    report.vehicle_info.fill_from(&header);

    for owner in state.ownership_history {
        for (i, record) in owner.records.into_iter().enumerate() {
            let fields = RowFields {
                date: record.date,
                details: Some(record.comments.join("; ")),
                source: record.source,
                location: record.location,
                odometer: record.odometer.map(|o| o.text()),
                owner: owner.owner_number,
            };
            let label = format!("owner {} record {}", owner.owner_number.unwrap_or(0), i + 1);
            if let Some(event) = fields.into_event(&label, warnings) {
                report.events.push(event);
            }
        }
    }

    for (i, accident) in state.accidents.into_iter().enumerate() {
        let Some(date) = accident.date.as_deref().and_then(parse_date) else {
            warnings.push(format!("skipped accident {}: unparseable accident date", i + 1));
            continue;
        };
        let accident_type = accident
            .accident_type
            .unwrap_or_else(|| "Accident".to_string());
        let entry = Accident::new(date, accident_type);
        report.accidents.push(match accident.severity.as_deref().and_then(Severity::from_label) {
            Some(severity) => entry.with_severity(severity),
            None => entry,
        });
    }

    let summary = state.summary;
    Extracted {
        has_accident_section: true,
        summary: Summary {
            report_date: state.report_date.as_deref().and_then(parse_date),
            estimated_owners: summary.owner_count,
            accident_count: summary.accident_count,
            odometer_last_reported: summary.last_odometer.and_then(|o| parse_odometer(&o.text())),
            odometer_last_date: summary.last_odometer_date.as_deref().and_then(parse_date),
            odometer_issues: summary.odometer_problem,
            total_loss: summary.total_loss,
            open_recall_count: summary.open_recall_count,
            title_brands: split_brands(&summary.title_brands.join(",")),
        },
    }
}

fn vehicle_from(state: VehicleState) -> VehicleInfo {
    VehicleInfo {
        vin: state.vin.unwrap_or_default(),
        year: state.year.and_then(|y| y.text().trim().parse().ok()),
        make: state.make,
        model: state.model,
        trim: state.trim,
        body_style: state.body_style,
        engine: state.engine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::Provider;

    #[test]
    fn test_initial_state_assignment() {
        let doc = Html::parse_document(
            r#"<script>window.__INITIAL_STATE__ = {"report": {"vehicle": {"vin": "1HGCV1F34JA123456", "year": "2018"}}};</script>"#,
        );
        assert!(has_embedded_state(&doc));
        let state = load_state(&doc).unwrap();
        assert_eq!(state.vehicle.vin.as_deref(), Some("1HGCV1F34JA123456"));
        assert_eq!(vehicle_from(state.vehicle).year, Some(2018));
    }

    #[test]
    fn test_odometer_number_or_text() {
        let doc = Html::parse_document(
            r#"<script id="__CARFAX_REPORT_STATE__" type="application/json">
                 {"ownershipHistory": [{"ownerNumber": 1, "records": [
                   {"date": "2024-01-12", "odometer": 50150, "comments": ["Oil changed"]},
                   {"date": "2023-06-15", "odometer": "41,200 mi", "comments": ["Accident reported"]}
                 ]}]}
               </script>"#,
        );
        let mut report = SourceReport::new(Provider::Carfax, "react", VehicleInfo::default());
        let mut warnings = Vec::new();
        extract(&doc, &mut report, &mut warnings);

        assert_eq!(report.events.len(), 2);
        assert_eq!(report.events[0].odometer, Some(50_150));
        assert_eq!(report.events[1].odometer, Some(41_200));
        assert_eq!(report.events[1].owner_sequence, Some(1));
    }

    #[test]
    fn test_invalid_state_falls_back_with_warning() {
        let doc = Html::parse_document(
            r#"<script id="__CARFAX_REPORT_STATE__">{not json</script>
               <div class="record-card"><span class="record-date">01/12/2024</span><span class="record-details">Oil changed</span></div>"#,
        );
        let mut report = SourceReport::new(Provider::Carfax, "react", VehicleInfo::default());
        let mut warnings = Vec::new();
        extract(&doc, &mut report, &mut warnings);

        assert_eq!(report.events.len(), 1);
        assert!(warnings[0].contains("falling back to card layout"));
    }
}
