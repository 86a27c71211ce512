use std::sync::Arc;

use crate::ticks::Tick;
use crate::timing::NavigationTiming;

/// Host-page hook the renderer pushes markup through.
///
/// [`prepend`](ReportSurface::prepend) receives the report container once,
/// to be inserted at the top of the page body;
/// [`append_row`](ReportSurface::append_row) then receives one `<tr>`
/// fragment per tick, in append order, destined for the table inside that
/// container.
pub trait ReportSurface: Send + Sync {
    fn prepend(&self, html: &str);
    fn append_row(&self, html: &str);
}

/// Builds the on-page timing table.
///
/// The first [`render_report`](ReportRenderer::render_report) call emits the
/// container plus one row per existing tick; after that the renderer stays
/// in lockstep with the store, emitting a row for every tick the moment it
/// is appended. The table therefore always shows the full store in append
/// order, which for late custom ticks is not timestamp order.
pub struct ReportRenderer {
    surface: Option<Arc<dyn ReportSurface>>,
    rendered: bool,
}

impl ReportRenderer {
    pub fn new(surface: Option<Arc<dyn ReportSurface>>) -> Self {
        Self {
            surface,
            rendered: false,
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Full render: container, header row, one row per tick. Without a
    /// surface to draw on this does nothing, and the renderer never enters
    /// the incremental phase.
    pub fn render_report(
        &mut self,
        timing: &NavigationTiming,
        baseline: Option<i64>,
        ticks: &[Tick],
    ) {
        let Some(surface) = self.surface.as_deref() else {
            return;
        };

        surface.prepend(&container_html(timing));
        for tick in ticks {
            surface.append_row(&row_html(timing, baseline, tick));
        }
        self.rendered = true;
    }

    /// Emit the row for one freshly appended tick.
    pub fn append_tick(&self, timing: &NavigationTiming, baseline: Option<i64>, tick: &Tick) {
        if let Some(surface) = self.surface.as_deref() {
            surface.append_row(&row_html(timing, baseline, tick));
        }
    }
}

// ─── Markup ──────────────────────────────────────────────────────

/// Report container: a navigation-start-to-load-end summary line and the
/// (initially empty) timing table with its header row.
fn container_html(timing: &NavigationTiming) -> String {
    let nav_start_to_load_end = timing.load_event_end - timing.navigation_start;

    format!(
        "<div id=\"timing-report\" class=\"proxima\">\
         {nav_start_to_load_end} ms - Navigation Start to Page Load End <br /><hr />\
         <table class=\"advanced-timing-table\">\
         <thead><tr><th>Clock</th><th>Relative</th><th>Name</th><th>Reporting</th></tr></thead>\
         </table></div>"
    )
}

/// One table row: elapsed since navigation start, elapsed relative to the
/// baseline (0 when no baseline tick matched), the label, and an "X" marker
/// for beacon-eligible ticks. Integer milliseconds throughout. Labels are
/// interpolated verbatim; they come from the embedding page.
fn row_html(timing: &NavigationTiming, baseline: Option<i64>, tick: &Tick) -> String {
    let clock = tick.timestamp_ms - timing.navigation_start;
    let relative = tick.timestamp_ms - baseline.unwrap_or(0);
    let reporting = if tick.reportable { "X" } else { "" };

    format!(
        "<tr><td class=\"text-right\">{clock} ms</td>\
         <td class=\"text-right\">{relative} ms</td>\
         <td>{label}</td><td>{reporting}</td></tr>",
        label = tick.label,
    )
}

// ─── Tests ───────────────────────────────────────────────────────
