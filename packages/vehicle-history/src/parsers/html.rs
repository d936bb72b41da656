//! DOM helpers shared by every layout parser.
//!
//! Thin wrappers over `scraper` that never fail: an invalid selector or a
//! missing element simply yields nothing, so layout parsers can probe
//! freely and record gaps as warnings.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Parse a CSS selector, ignoring invalid ones.
pub fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// All elements under `root` matching `css`, in document order.
pub fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => root.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// First element matching any of the selectors, trying them in order.
pub fn select_first<'a>(root: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|sel| root.select(&sel).next())
}

/// Whether anything under `root` matches `css`.
pub fn has_match(root: ElementRef<'_>, css: &str) -> bool {
    selector(css).is_some_and(|sel| root.select(&sel).next().is_some())
}

/// Collapse whitespace runs into single spaces and trim.
pub fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with whitespace collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    collapse_ws(&el.text().collect::<Vec<_>>().join(" "))
}

/// Non-empty text chunks of an element, one per text node.
///
/// Cells like `Service facility<br>Raleigh, NC` come back as two chunks.
pub fn text_chunks(el: ElementRef<'_>) -> Vec<String> {
    el.text()
        .map(collapse_ws)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Text of the first non-empty element matching any of the selectors.
pub fn first_text(root: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|css| selector(css))
        .flat_map(|sel| root.select(&sel).map(element_text).collect::<Vec<_>>())
        .find(|text| !text.is_empty())
}

/// Visible document text, skipping `<script>`, `<style>` and `<noscript>`.
pub fn document_text(doc: &Html) -> String {
    let mut out = String::new();
    for node in doc.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    collapse_ws(&out)
}

/// Raw contents of every `<script>` element.
pub fn script_bodies(doc: &Html) -> Vec<(Option<String>, String)> {
    select_all(doc.root_element(), "script")
        .into_iter()
        .map(|el| {
            let id = el.value().attr("id").map(str::to_string);
            (id, el.text().collect::<String>())
        })
        .collect()
}

fn normalize_label(text: &str) -> String {
    collapse_ws(text)
        .trim_end_matches([':', '-', ' '])
        .to_lowercase()
}

/// Value printed next to a label, e.g. `<td>Owners</td><td>3</td>`,
/// `<dt>Engine</dt><dd>2.0L</dd>` or `<div>Owners: 3</div>`.
///
/// Among all candidates the tightest (shortest) labelled element wins, so a
/// container holding several labels does not shadow the row it contains.
pub fn labeled_value(root: ElementRef<'_>, labels: &[&str]) -> Option<String> {
    let wanted: Vec<String> = labels.iter().map(|l| normalize_label(l)).collect();
    let mut best: Option<(usize, String)> = None;

    for node in root.descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if matches!(el.value().name(), "html" | "body" | "head" | "script" | "style") {
            continue;
        }

        let text = element_text(el);
        if text.is_empty() || text.len() > 160 {
            continue;
        }
        let lowered = text.to_lowercase();

        for label in &wanted {
            let value = if normalize_label(&text) == *label {
                sibling_value(el)
            } else if let Some(rest) = lowered.strip_prefix(label.as_str()) {
                let rest = rest.trim_start();
                match rest.strip_prefix(':') {
                    Some(_) => {
                        // Slice the original text to keep its casing
                        let offset = text.len() - rest.len() + 1;
                        text.get(offset..).map(|v| v.trim().to_string())
                    }
                    None => None,
                }
            } else {
                None
            };

            if let Some(value) = value.filter(|v| !v.is_empty()) {
                if best.as_ref().map_or(true, |(len, _)| text.len() < *len) {
                    best = Some((text.len(), value));
                }
            }
        }
    }

    best.map(|(_, value)| value)
}

/// Text of the next element sibling, or of the paired `<dd>` for a `<dt>`.
fn sibling_value(el: ElementRef<'_>) -> Option<String> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .map(element_text)
        .find(|text| !text.is_empty())
        .or_else(|| {
            // Label wrapped in its own cell-like container: <td><b>Owners</b></td><td>3</td>
            let parent = el.parent().and_then(ElementRef::wrap)?;
            if normalize_label(&element_text(parent)) != normalize_label(&element_text(el)) {
                return None;
            }
            parent
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
}

/// A row of a header-mapped table.
#[derive(Debug, Clone)]
pub struct TableRow<'a> {
    pub element: ElementRef<'a>,
    pub cells: Vec<ElementRef<'a>>,
}

impl<'a> TableRow<'a> {
    /// A single spanning cell, used by reports for "Owner 2" dividers.
    pub fn is_divider(&self) -> bool {
        self.cells.len() == 1
    }

    pub fn cell(&self, index: Option<usize>) -> Option<ElementRef<'a>> {
        index.and_then(|i| self.cells.get(i).copied())
    }

    pub fn cell_text(&self, index: Option<usize>) -> Option<String> {
        self.cell(index)
            .map(element_text)
            .filter(|text| !text.is_empty())
    }
}

/// A table whose columns are identified by header text rather than position.
#[derive(Debug, Clone)]
pub struct MappedTable<'a> {
    columns: HashMap<&'static str, usize>,
    pub rows: Vec<TableRow<'a>>,
}

impl<'a> MappedTable<'a> {
    /// Map header cells onto logical column names using per-column aliases.
    ///
    /// The first row containing `<th>` cells is the header. Rows without
    /// `<td>` cells are dropped.
    pub fn from_table(table: ElementRef<'a>, aliases: &[(&'static str, &[&str])]) -> Self {
        let headers: Vec<String> = select_all(table, "tr")
            .into_iter()
            .map(|tr| select_all(tr, "th"))
            .find(|ths| !ths.is_empty())
            .unwrap_or_default()
            .into_iter()
            .map(|th| element_text(th).to_lowercase())
            .collect();

        let mut columns = HashMap::new();
        for (name, names) in aliases {
            if let Some(index) = headers
                .iter()
                .position(|h| names.iter().any(|alias| h.contains(alias)))
            {
                columns.insert(*name, index);
            }
        }

        let rows = select_all(table, "tr")
            .into_iter()
            .filter_map(|tr| {
                let cells = select_all(tr, "td");
                (!cells.is_empty()).then_some(TableRow { element: tr, cells })
            })
            .collect();

        Self { columns, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }
}
