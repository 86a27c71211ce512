use std::sync::Arc;

use parking_lot::Mutex;

use page_statsd::{
    Error, NavigationTiming, Options, PageStatsd, ReportSurface, Tick,
};

fn timing() -> NavigationTiming {
    NavigationTiming {
        navigation_start: 0,
        response_end: 100,
        dom_content_loaded_event_end: 150,
        dom_complete: 180,
        load_event_end: 200,
    }
}

/// Test surface that just records every fragment pushed at it.
#[derive(Default)]
struct RecordingSurface {
    containers: Mutex<Vec<String>>,
    rows: Mutex<Vec<String>>,
}

impl ReportSurface for RecordingSurface {
    fn prepend(&self, html: &str) {
        self.containers.lock().push(html.to_string());
    }

    fn append_row(&self, html: &str) {
        self.rows.lock().push(html.to_string());
    }
}

fn displaying_session(surface: Arc<RecordingSurface>, options: Options) -> PageStatsd {
    let statsd = PageStatsd::new();
    statsd
        .init(
            Some(timing()),
            Options {
                display_report: Some(true),
                report_surface: Some(surface),
                ..options
            },
        )
        .unwrap();
    statsd
}

// ─── Mode transitions ────────────────────────────────────────────

#[test]
fn second_initialization_is_rejected() {
    let statsd = PageStatsd::new();
    statsd.init(Some(timing()), Options::default()).unwrap();
    assert_eq!(
        statsd.init(Some(timing()), Options::default()),
        Err(Error::AlreadyInitialized),
    );
}

#[test]
fn disabled_session_rejects_reinitialization_too() {
    let statsd = PageStatsd::new();
    statsd.init(None, Options::default()).unwrap();
    assert_eq!(
        statsd.init(Some(timing()), Options::default()),
        Err(Error::AlreadyInitialized),
    );
}

#[test]
fn error_message_names_the_problem() {
    assert_eq!(
        Error::AlreadyInitialized.to_string(),
        "timing session already initialized",
    );
}

#[tokio::test]
async fn disabled_session_is_inert() {
    let statsd = PageStatsd::new();
    statsd.init(None, Options::default()).unwrap();

    statsd.tick("Anything", true);
    statsd.page_loaded();
    statsd.loaded().await;
}

#[test]
fn ticks_before_initialization_are_dropped() {
    let statsd = PageStatsd::new();
    statsd.tick("Too early", true);
}

// ─── Rendering ───────────────────────────────────────────────────

#[tokio::test]
async fn report_rows_match_the_store_at_render_time() {
    let surface = Arc::new(RecordingSurface::default());
    let statsd = displaying_session(surface.clone(), Options::default());

    statsd.page_loaded();
    statsd.loaded().await;

    assert_eq!(surface.containers.lock().len(), 1);
    assert_eq!(surface.rows.lock().len(), 4);
}

#[tokio::test]
async fn rows_are_sorted_and_relative_to_the_baseline() {
    let surface = Arc::new(RecordingSurface::default());
    let statsd = displaying_session(surface.clone(), Options::default());

    statsd.page_loaded();
    statsd.loaded().await;

    let rows = surface.rows.lock();
    assert_eq!(
        rows[0],
        "<tr><td class=\"text-right\">100 ms</td>\
         <td class=\"text-right\">0 ms</td>\
         <td>Response end</td><td></td></tr>",
    );
    assert_eq!(
        rows[3],
        "<tr><td class=\"text-right\">200 ms</td>\
         <td class=\"text-right\">100 ms</td>\
         <td>Load end</td><td>X</td></tr>",
    );
}

#[tokio::test]
async fn post_render_ticks_append_rows_in_lockstep() {
    let surface = Arc::new(RecordingSurface::default());
    let statsd = displaying_session(surface.clone(), Options::default());

    statsd.page_loaded();
    statsd.loaded().await;
    assert_eq!(surface.rows.lock().len(), 4);

    statsd.tick("Widget ready", false);
    let rows = surface.rows.lock();
    assert_eq!(rows.len(), 5);
    assert!(rows[4].contains("<td>Widget ready</td>"));
}

#[tokio::test]
async fn initial_ticks_are_sorted_into_place() {
    let surface = Arc::new(RecordingSurface::default());
    let statsd = displaying_session(
        surface.clone(),
        Options {
            initial_ticks: Some(vec![Tick::new(160, "App boot", false)]),
            ..Options::default()
        },
    );

    statsd.page_loaded();
    statsd.loaded().await;

    let rows = surface.rows.lock();
    assert_eq!(rows.len(), 5);
    // 100, 150, 160, 180, 200: the seeded tick lands between the milestones.
    assert!(rows[2].contains("<td>App boot</td>"));
}

#[tokio::test]
async fn missing_baseline_defaults_relative_times_to_absolute() {
    let surface = Arc::new(RecordingSurface::default());
    let statsd = displaying_session(
        surface.clone(),
        Options {
            base_of_operations: Some("No such label".into()),
            ..Options::default()
        },
    );

    statsd.page_loaded();
    statsd.loaded().await;

    let rows = surface.rows.lock();
    assert_eq!(
        rows[0],
        "<tr><td class=\"text-right\">100 ms</td>\
         <td class=\"text-right\">100 ms</td>\
         <td>Response end</td><td></td></tr>",
    );
}

#[tokio::test]
async fn load_sequence_runs_only_once() {
    let surface = Arc::new(RecordingSurface::default());
    let statsd = displaying_session(surface.clone(), Options::default());

    statsd.page_loaded();
    statsd.page_loaded();
    statsd.loaded().await;
    statsd.page_loaded();
    statsd.loaded().await;

    assert_eq!(surface.containers.lock().len(), 1);
    assert_eq!(surface.rows.lock().len(), 4);
}

#[tokio::test]
async fn no_surface_means_no_rendering_but_everything_else_runs() {
    let statsd = PageStatsd::new();
    statsd
        .init(
            Some(timing()),
            Options {
                display_report: Some(true),
                ..Options::default()
            },
        )
        .unwrap();

    statsd.page_loaded();
    statsd.loaded().await;
    statsd.tick("Still fine", false);
}
