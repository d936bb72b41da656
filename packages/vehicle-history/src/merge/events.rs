//! Event deduplication across sources.

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::fingerprint::are_similar_events_with;
use crate::types::config::SimilarityConfig;
use crate::types::event::{EventType, NormalizedEvent};

/// Events believed to describe the same real-world record.
#[derive(Debug, Default)]
struct Cluster {
    members: Vec<NormalizedEvent>,
}

impl Cluster {
    /// One report never lists the same record twice, so an event is only
    /// taken by a cluster that holds nothing from its sources yet.
    fn accepts(&self, config: &SimilarityConfig, event: &NormalizedEvent) -> bool {
        !self.shares_source(&event.sources)
            && self.members.iter().any(|m| {
                are_similar_events_with(
                    config,
                    &m.event,
                    &event.event,
                    m.event_type,
                    event.event_type,
                )
            })
    }

    fn shares_source(&self, sources: &BTreeSet<String>) -> bool {
        self.members
            .iter()
            .any(|m| !m.sources.is_disjoint(sources))
    }

    /// Move every member of `other` into this cluster, unless the two
    /// already hold records from the same report.
    fn absorb(&mut self, other: &mut Cluster) -> bool {
        if other.members.iter().any(|m| self.shares_source(&m.sources)) {
            return false;
        }
        self.members.append(&mut other.members);
        true
    }

    /// Collapse into one event carrying every member's sources.
    ///
    /// Details: longest text, ties to the earliest member. Optional fields
    /// are filled from later members; severity takes the worst.
    fn collapse(self) -> Option<NormalizedEvent> {
        let mut members = self.members;
        members.sort_by(canonical_order);

        let mut members = members.into_iter();
        let mut merged = members.next()?;

        for member in members {
            merged.sources.extend(member.sources.iter().cloned());

            if member.details().chars().count() > merged.details().chars().count() {
                merged.event.details = member.event.details;
            }
            if merged.event.odometer.is_none() {
                merged.event.odometer = member.event.odometer;
            }
            if merged.event.state.is_none() {
                merged.event.state = member.event.state;
            }
            if merged.event.data_source.is_none() {
                merged.event.data_source = member.event.data_source;
            }
            if merged.event.owner_sequence.is_none() {
                merged.event.owner_sequence = member.event.owner_sequence;
            }
            if merged.subtype.is_none() {
                merged.subtype = member.subtype;
            }
            merged.severity = merged.severity.max(member.severity);
            merged.is_negative |= member.is_negative;
        }
        Some(merged)
    }
}

/// Total order over everything an event carries, so clustering sees the
/// same sequence however the sources were listed.
fn canonical_order(a: &NormalizedEvent, b: &NormalizedEvent) -> Ordering {
    a.date()
        .cmp(&b.date())
        .then_with(|| a.event_type.cmp(&b.event_type))
        .then_with(|| a.event.odometer.cmp(&b.event.odometer))
        .then_with(|| a.event.state.cmp(&b.event.state))
        .then_with(|| a.details().cmp(b.details()))
        .then_with(|| a.event.data_source.cmp(&b.event.data_source))
        .then_with(|| a.event.owner_sequence.cmp(&b.event.owner_sequence))
        .then_with(|| a.sources.cmp(&b.sources))
}

/// Collapse similar events into one entry per real-world record, sorted by
/// date.
///
/// Fingerprint buckets are checked first; every other cluster of the same
/// type and month is checked next, catching records split across an
/// odometer bucket edge. An event accepted by several clusters joins them
/// into one, so a chain of pairwise-similar records collapses whatever
/// order it arrives in.
pub fn dedup_events(
    mut events: Vec<NormalizedEvent>,
    config: &SimilarityConfig,
) -> Vec<NormalizedEvent> {
    events.sort_by(canonical_order);

    let mut clusters: Vec<Cluster> = Vec::new();
    let mut by_fingerprint: IndexMap<String, Vec<usize>> = IndexMap::new();
    let mut by_month: HashMap<(EventType, (i32, u32)), Vec<usize>> = HashMap::new();

    for event in events {
        let month_key = (event.event_type, event.event.year_month());
        let fast = by_fingerprint
            .get(&event.fingerprint)
            .cloned()
            .unwrap_or_default();
        let slow = by_month
            .get(&month_key)
            .into_iter()
            .flatten()
            .copied()
            .filter(|i| !fast.contains(i));

        let accepting: Vec<usize> = fast
            .iter()
            .copied()
            .chain(slow)
            .filter(|&i| clusters[i].accepts(config, &event))
            .collect();

        let index = match accepting.split_first() {
            Some((&first, rest)) => {
                for &other in rest {
                    let mut absorbed = std::mem::take(&mut clusters[other]);
                    if !clusters[first].absorb(&mut absorbed) {
                        clusters[other] = absorbed;
                    }
                }
                first
            }
            None => {
                clusters.push(Cluster::default());
                let i = clusters.len() - 1;
                by_month.entry(month_key).or_default().push(i);
                i
            }
        };

        let bucket = by_fingerprint.entry(event.fingerprint.clone()).or_default();
        if !bucket.contains(&index) {
            bucket.push(index);
        }
        clusters[index].members.push(event);
    }

    // Absorbed clusters are left empty and collapse to nothing
    let mut merged: Vec<NormalizedEvent> =
        clusters.into_iter().filter_map(Cluster::collapse).collect();
    merged.sort_by_key(|e| e.date());
    merged
}
