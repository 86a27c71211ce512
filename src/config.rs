use std::sync::Arc;

use serde::Deserialize;

use crate::render::ReportSurface;
use crate::ticks::Tick;

// ─── Defaults ────────────────────────────────────────────────────

/// Sampling rate applied when the caller does not set one: report every load.
const DEFAULT_REPORTING_PERCENT: f64 = 100.0;

/// Label used as the zero point for relative timings unless overridden.
const DEFAULT_BASE_OF_OPERATIONS: &str = "Response end";

/// The four standard navigation milestones recorded on every page load.
/// Only the final one is beacon-eligible out of the box.
fn default_report_events() -> Vec<ReportEvent> {
    vec![
        ReportEvent {
            event: "responseEnd".into(),
            message: "Response end".into(),
            reporting: false,
        },
        ReportEvent {
            event: "domContentLoadedEventEnd".into(),
            message: "DOM content loaded".into(),
            reporting: false,
        },
        ReportEvent {
            event: "domComplete".into(),
            message: "DOM complete".into(),
            reporting: false,
        },
        ReportEvent {
            event: "loadEventEnd".into(),
            message: "Load end".into(),
            reporting: true,
        },
    ]
}

// ─── Public types ────────────────────────────────────────────────

/// Hook applied to the serialized `key=value` pairs before they are joined
/// into the beacon query string. The default is the identity function.
pub type AppendParams = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// One navigation milestone to turn into a tick once the page has loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportEvent {
    /// Key into the timing-source vocabulary, e.g. `"loadEventEnd"`.
    pub event: String,
    /// Label the resulting tick carries, e.g. `"Load end"`.
    pub message: String,
    /// Whether the resulting tick is beacon-eligible.
    #[serde(default)]
    pub reporting: bool,
}

/// Caller-supplied partial configuration.
///
/// Every field left unset falls back to its built-in default during
/// [`Settings::resolve`]. The plain-data half deserializes from JSON with
/// the camelCase keys hosts already use (`displayReport`, `statsdUrl`, ...);
/// `append_params` and `report_surface` can only be supplied in code.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Render the visible timing table into the page.
    pub display_report: Option<bool>,
    /// Which navigation milestones become ticks, and whether each reports.
    pub report_events: Option<Vec<ReportEvent>>,
    /// Percentage of page loads whose reportable ticks are transmitted.
    pub reporting_percent: Option<f64>,
    /// Label whose first tick is the zero point for relative timings.
    pub base_of_operations: Option<String>,
    /// Collector endpoint. Absent means transmission never happens.
    pub statsd_url: Option<String>,
    /// Ticks the host buffered before initialization, seeded verbatim.
    pub initial_ticks: Option<Vec<Tick>>,
    /// Post-processes the serialized params before transmission.
    #[serde(skip)]
    pub append_params: Option<AppendParams>,
    /// Page hook the rendered report is pushed through.
    #[serde(skip)]
    pub report_surface: Option<Arc<dyn ReportSurface>>,
}

impl Options {
    /// Parse the plain-data half of the configuration from JSON, using the
    /// same camelCase keys hosts configure the browser side with. The hook
    /// fields stay unset and can be filled in afterwards.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Fully resolved configuration, immutable for the session's lifetime.
#[derive(Clone)]
pub struct Settings {
    pub display_report: bool,
    pub report_events: Vec<ReportEvent>,
    pub reporting_percent: f64,
    pub base_of_operations: String,
    pub statsd_url: Option<String>,
    pub initial_ticks: Vec<Tick>,
    pub append_params: AppendParams,
    pub report_surface: Option<Arc<dyn ReportSurface>>,
}

impl Settings {
    /// Shallow merge of caller options over the defaults: each supplied
    /// field wins wholesale. `report_events` in particular is replaced as a
    /// unit, never element-merged. Values are not validated; out-of-range
    /// settings surface later as degraded behavior (a negative
    /// `reporting_percent` simply never samples true).
    pub fn resolve(options: Options) -> Self {
        Self {
            display_report: options.display_report.unwrap_or(false),
            report_events: options
                .report_events
                .unwrap_or_else(default_report_events),
            reporting_percent: options
                .reporting_percent
                .unwrap_or(DEFAULT_REPORTING_PERCENT),
            base_of_operations: options
                .base_of_operations
                .unwrap_or_else(|| DEFAULT_BASE_OF_OPERATIONS.into()),
            statsd_url: options.statsd_url,
            initial_ticks: options.initial_ticks.unwrap_or_default(),
            append_params: options
                .append_params
                .unwrap_or_else(|| Arc::new(|params| params)),
            report_surface: options.report_surface,
        }
    }
}
