//! Record extraction shared across layouts: history rows, record cards,
//! accident lists and the vehicle header.

use scraper::ElementRef;

use super::fields::{
    parse_date, parse_odometer, parse_owner_index, parse_state, parse_year_make_model,
};
use super::html::{
    element_text, first_text, labeled_value, select_all, select_first, text_chunks, MappedTable,
};
use crate::types::event::{RawParsedEvent, Severity};
use crate::types::report::Accident;
use crate::types::vehicle::VehicleInfo;

const HISTORY_COLUMNS: &[(&str, &[&str])] = &[
    ("date", &["date"]),
    ("odometer", &["odometer", "mileage"]),
    ("source", &["source"]),
    ("location", &["location", "state"]),
    ("details", &["details", "comments", "description", "event"]),
];

const ACCIDENT_COLUMNS: &[(&str, &[&str])] = &[
    ("date", &["date"]),
    ("type", &["type", "description"]),
    ("severity", &["severity", "damage"]),
];

/// Raw text pulled from one history row or card, before interpretation.
#[derive(Debug, Clone, Default)]
pub struct RowFields {
    pub date: Option<String>,
    pub details: Option<String>,
    pub source: Option<String>,
    pub location: Option<String>,
    pub odometer: Option<String>,
    pub owner: Option<u32>,
}

impl RowFields {
    /// Interpret the row. Rows without a usable date are skipped with a
    /// warning naming `row`.
    pub fn into_event(self, row: &str, warnings: &mut Vec<String>) -> Option<RawParsedEvent> {
        let Some(date) = self.date.as_deref().and_then(parse_date) else {
            warnings.push(format!(
                "skipped {row}: unparseable date {:?}",
                self.date.unwrap_or_default()
            ));
            return None;
        };

        let details = self
            .details
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| self.source.clone())
            .unwrap_or_default();
        if details.is_empty() {
            warnings.push(format!("skipped {row}: no description"));
            return None;
        }

        let state = self
            .location
            .as_deref()
            .and_then(parse_state)
            .or_else(|| self.source.as_deref().and_then(parse_state));

        let mut event = RawParsedEvent::new(date, details);
        event.data_source = self.source.filter(|s| !s.is_empty());
        event.odometer = self.odometer.as_deref().and_then(parse_odometer);
        event.state = state;
        event.owner_sequence = self.owner;
        Some(event)
    }
}

/// Owner index from a `data-owner` attribute on the element or an ancestor.
pub fn owner_of(el: ElementRef<'_>, warnings: &mut Vec<String>) -> Option<u32> {
    let raw = std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .find_map(|e| e.value().attr("data-owner"))?;
    let owner = parse_owner_index(raw);
    if owner.is_none() {
        warnings.push(format!("ambiguous owner index {raw:?}"));
    }
    owner
}

/// Text of a list element as "item; item", or its plain text.
fn list_or_text(el: ElementRef<'_>) -> String {
    let items: Vec<String> = select_all(el, "li")
        .into_iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();
    if items.is_empty() {
        element_text(el)
    } else {
        items.join("; ")
    }
}

/// Events from card-style records (`.record-date`, `.record-details`, ...).
pub fn record_cards(
    root: ElementRef<'_>,
    card_css: &str,
    warnings: &mut Vec<String>,
) -> Vec<RawParsedEvent> {
    select_all(root, card_css)
        .into_iter()
        .enumerate()
        .filter_map(|(i, card)| {
            let fields = RowFields {
                date: first_text(card, &[".record-date"]),
                details: select_first(card, &[".record-details", ".record-comments"])
                    .map(list_or_text),
                source: first_text(card, &[".record-source"]),
                location: first_text(card, &[".record-location"]),
                odometer: first_text(card, &[".record-odometer"]),
                owner: owner_of(card, warnings),
            };
            fields.into_event(&format!("record {}", i + 1), warnings)
        })
        .collect()
}

/// Events from a header-mapped history table with "Owner N" divider rows.
pub fn history_table(table: ElementRef<'_>, warnings: &mut Vec<String>) -> Vec<RawParsedEvent> {
    let mapped = MappedTable::from_table(table, HISTORY_COLUMNS);
    if !mapped.has_column("date") {
        warnings.push("history table has no date column".to_string());
        return Vec::new();
    }

    let mut owner = None;
    let mut events = Vec::new();
    for (i, row) in mapped.rows.iter().enumerate() {
        if row.is_divider() {
            let text = element_text(row.cells[0]);
            if text.to_lowercase().contains("owner") {
                owner = parse_owner_index(&text);
                if owner.is_none() {
                    warnings.push(format!("ambiguous owner index {text:?}"));
                }
            }
            continue;
        }
        if row.cells.iter().all(|c| element_text(*c).is_empty()) {
            continue;
        }

        // "Service facility<br>Raleigh, NC": label first, location after
        let (source, source_location) = match row.cell(mapped.column("source")) {
            Some(cell) => {
                let chunks = text_chunks(cell);
                let location = (chunks.len() > 1).then(|| chunks[1..].join(" "));
                (chunks.into_iter().next(), location)
            }
            None => (None, None),
        };

        let fields = RowFields {
            date: row.cell_text(mapped.column("date")),
            details: row
                .cell(mapped.column("details"))
                .map(|cell| text_chunks(cell).join("; ")),
            source,
            location: row.cell_text(mapped.column("location")).or(source_location),
            odometer: row.cell_text(mapped.column("odometer")),
            owner,
        };
        if let Some(event) = fields.into_event(&format!("history row {}", i + 1), warnings) {
            events.push(event);
        }
    }
    events
}

fn accident_from(
    date: Option<String>,
    accident_type: Option<String>,
    severity: Option<String>,
    row: &str,
    warnings: &mut Vec<String>,
) -> Option<Accident> {
    let Some(date) = date.as_deref().and_then(parse_date) else {
        warnings.push(format!("skipped {row}: unparseable accident date"));
        return None;
    };
    let accident = Accident::new(date, accident_type.unwrap_or_else(|| "Accident".to_string()));
    Some(match severity.as_deref().and_then(Severity::from_label) {
        Some(severity) => accident.with_severity(severity),
        None => accident,
    })
}

/// Accidents from card-style entries (`.accident-date`, `.accident-type`,
/// `.accident-severity`).
pub fn accident_cards(
    root: ElementRef<'_>,
    card_css: &str,
    warnings: &mut Vec<String>,
) -> Vec<Accident> {
    select_all(root, card_css)
        .into_iter()
        .enumerate()
        .filter_map(|(i, card)| {
            accident_from(
                first_text(card, &[".accident-date"]),
                first_text(card, &[".accident-type"]),
                first_text(card, &[".accident-severity"]),
                &format!("accident {}", i + 1),
                warnings,
            )
        })
        .collect()
}

/// Accidents from a header-mapped table.
pub fn accident_table(table: ElementRef<'_>, warnings: &mut Vec<String>) -> Vec<Accident> {
    let mapped = MappedTable::from_table(table, ACCIDENT_COLUMNS);
    mapped
        .rows
        .iter()
        .filter(|row| !row.is_divider())
        .enumerate()
        .filter_map(|(i, row)| {
            accident_from(
                row.cell_text(mapped.column("date")),
                row.cell_text(mapped.column("type")),
                row.cell_text(mapped.column("severity")),
                &format!("accident row {}", i + 1),
                warnings,
            )
        })
        .collect()
}

/// Vehicle header: VIN from `data-vin` or the given selectors, year/make/
/// model from a heading, the rest from labelled values.
///
/// The VIN is left as raw text; [`super::finish`] validates it.
pub fn vehicle_info(root: ElementRef<'_>, vin_css: &[&str], heading_css: &[&str]) -> VehicleInfo {
    let vin = select_all(root, "[data-vin]")
        .into_iter()
        .find_map(|el| el.value().attr("data-vin").map(str::to_string))
        .or_else(|| first_text(root, vin_css))
        .or_else(|| labeled_value(root, &["VIN", "VIN number"]))
        .unwrap_or_default();

    let heading = first_text(root, heading_css)
        .or_else(|| labeled_value(root, &["Year/Make/Model", "Vehicle"]))
        .unwrap_or_default();
    let ymm = parse_year_make_model(&heading);

    VehicleInfo {
        vin,
        year: ymm.year,
        make: ymm.make,
        model: ymm.model,
        trim: ymm.trim.or_else(|| labeled_value(root, &["Trim"])),
        body_style: labeled_value(root, &["Body style", "Body type"]),
        engine: labeled_value(root, &["Engine"]),
    }
}

/// Title brands listed as `.title-brand` elements, lowercased.
pub fn brand_list(root: ElementRef<'_>) -> Vec<String> {
    select_all(root, ".title-brand")
        .into_iter()
        .map(|el| element_text(el).to_lowercase())
        .filter(|b| !b.is_empty())
        .collect()
}
