//! Series aggregation for listing.
//!
//! Reconstructs series from a flat event collection: one group per series
//! key, the record without a parent becomes the base, everything else an
//! override. Groups without a base are orphans (their base was deleted
//! without cascading) and are dropped from the output even though the
//! override records still occupy storage.

use std::collections::HashMap;

use serde::Serialize;

use crate::event::Event;

/// One reconstructed series: the base plus its overrides.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSeries {
    pub series_id: String,
    pub base_event: Event,
    pub overrides: Vec<Event>,
}

/// Group a flat event list into series. Output order is deterministic:
/// series by base start time then id, overrides by start time then id.
pub fn aggregate(events: Vec<Event>) -> Vec<EventSeries> {
    let mut bases: HashMap<String, Event> = HashMap::new();
    let mut overrides: HashMap<String, Vec<Event>> = HashMap::new();

    for event in events {
        match event.parent_event.clone() {
            Some(base_id) => overrides.entry(base_id).or_default().push(event),
            None => {
                bases.insert(event.id.clone(), event);
            }
        }
    }

    let mut series: Vec<EventSeries> = bases
        .into_values()
        .map(|base| {
            let mut ovs = overrides.remove(&base.id).unwrap_or_default();
            ovs.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
            EventSeries {
                series_id: base.id.clone(),
                base_event: base,
                overrides: ovs,
            }
        })
        .collect();

    // Whatever is left in `overrides` points at bases that are not in the
    // input: orphans, intentionally invisible.
    series.sort_by(|a, b| {
        a.base_event
            .start_time
            .cmp(&b.base_event.start_time)
            .then_with(|| a.series_id.cmp(&b.series_id))
    });
    series
}
