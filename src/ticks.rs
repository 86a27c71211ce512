use serde::{Deserialize, Serialize};

/// A single recorded event: one timestamp, one label, one reporting flag.
/// Immutable once constructed; only its position in the store can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    /// Absolute milliseconds, same clock domain as
    /// [`crate::NavigationTiming`].
    pub timestamp_ms: i64,
    /// Human-readable event name, e.g. `"DOM complete"`.
    pub label: String,
    /// Whether this tick is eligible for the outbound beacon.
    #[serde(default)]
    pub reportable: bool,
}

impl Tick {
    pub fn new(timestamp_ms: i64, label: impl Into<String>, reportable: bool) -> Self {
        Self {
            timestamp_ms,
            label: label.into(),
            reportable,
        }
    }
}

/// Ordered collection of all ticks for the current page load.
///
/// Append-only, except for the single [`TickStore::sort_by_time`] pass the
/// load sequence performs once the navigation milestones are in. Ticks
/// appended after that land at the end and are not re-sorted.
#[derive(Debug, Default)]
pub struct TickStore {
    ticks: Vec<Tick>,
}

impl TickStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with ticks the host recorded before the session
    /// existed, in the order the host recorded them.
    pub fn with_initial(initial: Vec<Tick>) -> Self {
        Self { ticks: initial }
    }

    /// Push a tick onto the end of the sequence.
    pub fn append(&mut self, tick: Tick) {
        self.ticks.push(tick);
    }

    /// Sort ascending by timestamp. The sort is stable, so ticks with equal
    /// timestamps keep their insertion order.
    pub fn sort_by_time(&mut self) {
        self.ticks.sort_by_key(|tick| tick.timestamp_ms);
    }

    /// Timestamp of the first tick, in current order, whose label matches.
    /// `None` when no tick does; callers treat that as a zero baseline.
    pub fn baseline(&self, label: &str) -> Option<i64> {
        self.ticks
            .iter()
            .find(|tick| tick.label == label)
            .map(|tick| tick.timestamp_ms)
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}
