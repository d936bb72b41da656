//! Provider detector - decides which vendor and layout produced a document.
//!
//! Detection is signal counting: each matched signal adds its weight to the
//! provider's confidence (capped at 1.0). The layout variant comes from the
//! same structural probe the provider's parser runs, never from a version
//! string printed in the document.

pub mod vin;

use scraper::{ElementRef, Html};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::parsers::html::{has_match, select_all};
use crate::parsers::{AutocheckLayout, CarfaxLayout, ReportFormat};
use crate::types::config::DetectionConfig;
use crate::types::report::Provider;

pub use vin::{extract_vin, find_vin, is_vin};

/// Result of a successful detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub format: ReportFormat,

    /// Capped sum of matched signal weights, in `0.0..=1.0`
    pub confidence: f32,
}

impl Detection {
    pub fn provider(&self) -> Provider {
        self.format.provider()
    }

    pub fn version(&self) -> &'static str {
        self.format.version()
    }
}

#[derive(Serialize)]
struct DetectionView {
    provider: Provider,
    version: &'static str,
    confidence: f32,
}

impl Serialize for Detection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DetectionView {
            provider: self.provider(),
            version: self.version(),
            confidence: self.confidence,
        }
        .serialize(serializer)
    }
}

/// A parsed document plus the lowercase strings most signals look at.
struct Probe<'a> {
    doc: &'a Html,
    title: String,
}

impl<'a> Probe<'a> {
    fn new(doc: &'a Html) -> Self {
        let title = select_all(doc.root_element(), "title")
            .into_iter()
            .map(|t| t.text().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self { doc, title }
    }

    fn root(&self) -> ElementRef<'a> {
        self.doc.root_element()
    }

    fn has(&self, css: &str) -> bool {
        has_match(self.root(), css)
    }

    fn attr_contains(&self, css: &str, attr: &str, needle: &str) -> bool {
        select_all(self.root(), css).into_iter().any(|el| {
            el.value()
                .attr(attr)
                .is_some_and(|v| v.to_lowercase().contains(needle))
        })
    }

    fn meta_mentions(&self, needle: &str) -> bool {
        self.attr_contains("meta", "content", needle) || self.attr_contains("meta", "name", needle)
    }

    fn script_mentions(&self, needle: &str) -> bool {
        select_all(self.root(), "script")
            .into_iter()
            .any(|s| s.text().any(|t| t.contains(needle)))
    }
}

struct Signal {
    provider: Provider,
    name: &'static str,
    weight: f32,
    matches: fn(&Probe<'_>) -> bool,
}

fn autocheck_body_id(p: &Probe<'_>) -> bool {
    p.has("body#fastLinkFullReport")
}

fn autocheck_logo(p: &Probe<'_>) -> bool {
    p.attr_contains("img", "src", "experian") || p.attr_contains("img", "src", "autocheck")
}

fn autocheck_title(p: &Probe<'_>) -> bool {
    p.title.contains("autocheck")
}

fn autocheck_meta(p: &Probe<'_>) -> bool {
    p.meta_mentions("autocheck") || p.meta_mentions("experian")
}

fn autocheck_markers(p: &Probe<'_>) -> bool {
    p.has(".history-record")
        || p.has("table.history-table")
        || p.has("#autocheckScore")
        || p.has(".autocheck-score")
}

fn carfax_title(p: &Probe<'_>) -> bool {
    p.title.contains("carfax")
}

fn carfax_logo(p: &Probe<'_>) -> bool {
    p.attr_contains("img", "src", "carfax")
}

fn carfax_markers(p: &Probe<'_>) -> bool {
    p.has("#headerMakeModelYear")
        || p.has("table#detailedHistory")
        || p.has(".record-card")
        || p.has("#summaryTable")
}

fn carfax_helmet(p: &Probe<'_>) -> bool {
    select_all(p.root(), "[data-react-helmet]").into_iter().any(|el| {
        let content = el.value().attr("content").unwrap_or_default().to_lowercase();
        let text = el.text().collect::<String>().to_lowercase();
        content.contains("carfax") || text.contains("carfax")
    })
}

fn carfax_meta(p: &Probe<'_>) -> bool {
    p.meta_mentions("carfax")
}

fn carfax_embedded_state(p: &Probe<'_>) -> bool {
    p.script_mentions("__CARFAX_REPORT_STATE__") || p.has("script#__CARFAX_REPORT_STATE__")
}

/// Every signal, grouped by provider.
static SIGNALS: &[Signal] = &[
    Signal {
        provider: Provider::Autocheck,
        name: "body_id",
        weight: 0.4,
        matches: autocheck_body_id,
    },
    Signal {
        provider: Provider::Autocheck,
        name: "logo",
        weight: 0.25,
        matches: autocheck_logo,
    },
    Signal {
        provider: Provider::Autocheck,
        name: "title",
        weight: 0.3,
        matches: autocheck_title,
    },
    Signal {
        provider: Provider::Autocheck,
        name: "meta",
        weight: 0.15,
        matches: autocheck_meta,
    },
    Signal {
        provider: Provider::Autocheck,
        name: "markers",
        weight: 0.2,
        matches: autocheck_markers,
    },
    Signal {
        provider: Provider::Carfax,
        name: "title",
        weight: 0.3,
        matches: carfax_title,
    },
    Signal {
        provider: Provider::Carfax,
        name: "logo",
        weight: 0.25,
        matches: carfax_logo,
    },
    Signal {
        provider: Provider::Carfax,
        name: "markers",
        weight: 0.2,
        matches: carfax_markers,
    },
    Signal {
        provider: Provider::Carfax,
        name: "react_helmet",
        weight: 0.3,
        matches: carfax_helmet,
    },
    Signal {
        provider: Provider::Carfax,
        name: "meta",
        weight: 0.15,
        matches: carfax_meta,
    },
    Signal {
        provider: Provider::Carfax,
        name: "embedded_state",
        weight: 0.2,
        matches: carfax_embedded_state,
    },
];

/// Confidence that `provider` produced the probed document.
fn score(probe: &Probe<'_>, provider: Provider) -> f32 {
    let matched: Vec<&Signal> = SIGNALS
        .iter()
        .filter(|s| s.provider == provider && (s.matches)(probe))
        .collect();
    let total: f32 = matched.iter().map(|s| s.weight).sum();

    debug!(
        provider = %provider,
        signals = ?matched.iter().map(|s| s.name).collect::<Vec<_>>(),
        confidence = total.min(1.0),
        "Scored provider signals"
    );
    total.min(1.0)
}

/// Detect provider and layout with the default confidence floor.
pub fn detect_provider(html: &str) -> Option<Detection> {
    detect_provider_with(&DetectionConfig::default(), html)
}

/// Detect provider and layout; `None` when no provider clears the floor.
pub fn detect_provider_with(config: &DetectionConfig, html: &str) -> Option<Detection> {
    let doc = Html::parse_document(html);
    let probe = Probe::new(&doc);

    let autocheck = score(&probe, Provider::Autocheck);
    let carfax = score(&probe, Provider::Carfax);

    let (provider, confidence) = if carfax > autocheck {
        (Provider::Carfax, carfax)
    } else {
        (Provider::Autocheck, autocheck)
    };
    // A provider must clear the floor, not merely reach it
    if confidence <= config.min_confidence {
        return None;
    }

    let format = match provider {
        Provider::Autocheck => ReportFormat::Autocheck(AutocheckLayout::probe(&doc)),
        Provider::Carfax => ReportFormat::Carfax(CarfaxLayout::probe(&doc)),
    };
    Some(Detection { format, confidence })
}
