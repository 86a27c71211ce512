use serde::{Deserialize, Serialize};

/// Snapshot of the host environment's navigation-timing milestones.
///
/// All values are absolute Unix-epoch milliseconds, the same clock domain
/// custom ticks are stamped with. The host captures this once from its
/// timing facility and hands it to [`crate::PageStatsd::init`]; a host
/// without such a facility passes `None` there and the whole session stays
/// a no-op for the page's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    pub navigation_start: i64,
    pub response_end: i64,
    pub dom_content_loaded_event_end: i64,
    pub dom_complete: i64,
    pub load_event_end: i64,
}

impl NavigationTiming {
    /// Key lookup over the fixed event vocabulary used by
    /// [`crate::ReportEvent::event`]. Unknown names yield `None`.
    pub fn get(&self, event: &str) -> Option<i64> {
        match event {
            "navigationStart" => Some(self.navigation_start),
            "responseEnd" => Some(self.response_end),
            "domContentLoadedEventEnd" => Some(self.dom_content_loaded_event_end),
            "domComplete" => Some(self.dom_complete),
            "loadEventEnd" => Some(self.load_event_end),
            _ => None,
        }
    }
}
