use log::debug;
use rand::Rng;

use crate::config::Settings;
use crate::ticks::Tick;

/// Query-string key for a tick label: lowercased, with every whitespace
/// character replaced by one underscore. Runs are not collapsed, so
/// `"DOM  complete"` becomes `dom__complete`.
fn param_key(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Serialize the reportable ticks into `key=value` pairs, preserving their
/// current order. Values are millisecond offsets from the baseline and may
/// be negative.
pub(crate) fn prepare_params(ticks: &[Tick], baseline: Option<i64>) -> Vec<String> {
    let base = baseline.unwrap_or(0);

    ticks
        .iter()
        .filter(|tick| tick.reportable)
        .map(|tick| format!("{}={}", param_key(&tick.label), tick.timestamp_ms - base))
        .collect()
}

/// Build the final query string: filter, serialize, caller hook, join.
pub(crate) fn build_query(settings: &Settings, ticks: &[Tick], baseline: Option<i64>) -> String {
    let params = (settings.append_params)(prepare_params(ticks, baseline));
    params.join("&")
}

/// One Bernoulli draw per page load: a uniform integer in [0, 100) must be
/// strictly below `reporting_percent` for the beacon to fire. Out-of-range
/// percentages degrade the obvious way (negative never fires, above 100
/// always does).
pub(crate) fn should_report(settings: &Settings) -> bool {
    f64::from(rand::thread_rng().gen_range(0u8..100)) < settings.reporting_percent
}

/// The sample-and-transmit step of the load sequence. Best-effort by
/// contract: the response is never inspected, transport errors are logged
/// at debug and dropped, and nothing is retried.
pub(crate) async fn report_ticks(
    client: &reqwest::Client,
    settings: &Settings,
    ticks: &[Tick],
    baseline: Option<i64>,
) {
    let Some(url) = settings.statsd_url.as_deref() else {
        return;
    };

    if !should_report(settings) {
        debug!("page load not sampled for reporting");
        return;
    }

    let query = build_query(settings, ticks, baseline);
    let full = format!("{url}?{query}");

    match client.get(&full).send().await {
        Ok(_) => debug!("beacon sent: {full}"),
        Err(err) => debug!("beacon dropped: {err}"),
    }
}

// ─── Tests ───────────────────────────────────────────────────────
