use std::sync::Arc;

use chrono::Utc;
use log::debug;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::config::{Options, Settings};
use crate::render::ReportRenderer;
use crate::report;
use crate::ticks::{Tick, TickStore};
use crate::timing::NavigationTiming;
use crate::Error;

/// A page-load timing session.
///
/// Starts uninitialized; [`init`](PageStatsd::init) moves it exactly once
/// into either the active or the permanently disabled mode, and every other
/// method dispatches on that mode. Cheap to clone: all clones share one
/// underlying session, so the handle can be passed freely to whatever code
/// wants to record ticks.
#[derive(Clone, Default)]
pub struct PageStatsd {
    mode: Arc<Mutex<Mode>>,
    /// Handle to the spawned load sequence so callers can await it.
    load_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

#[derive(Default)]
enum Mode {
    #[default]
    Uninitialized,
    /// The host has no timing facility: every call is a no-op, forever.
    Disabled,
    Active(Arc<Session>),
}

impl PageStatsd {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-way transition out of the uninitialized mode.
    ///
    /// The timing snapshot decides where the session lands: `Some` resolves
    /// the options and activates it, `None` disables it for the page's
    /// lifetime. A second call in either case is rejected; sessions are not
    /// reconfigurable.
    pub fn init(
        &self,
        timing: Option<NavigationTiming>,
        options: Options,
    ) -> Result<(), Error> {
        let mut mode = self.mode.lock();
        if !matches!(*mode, Mode::Uninitialized) {
            return Err(Error::AlreadyInitialized);
        }

        let Some(timing) = timing else {
            debug!("navigation timing unavailable, session disabled");
            *mode = Mode::Disabled;
            return Ok(());
        };

        let settings = Settings::resolve(options);
        let store = TickStore::with_initial(settings.initial_ticks.clone());
        let renderer = ReportRenderer::new(settings.report_surface.clone());

        *mode = Mode::Active(Arc::new(Session {
            settings,
            timing,
            client: reqwest::Client::new(),
            inner: Mutex::new(Inner {
                store,
                baseline: None,
                renderer,
                load_started: false,
            }),
        }));

        debug!("timing session initialized");
        Ok(())
    }

    /// Record a custom event, stamped with the current wall clock.
    /// A no-op unless the session is active.
    pub fn tick(&self, label: impl Into<String>, reportable: bool) {
        if let Some(session) = self.session() {
            session.record(Tick::new(
                Utc::now().timestamp_millis(),
                label,
                reportable,
            ));
        }
    }

    /// Signal that the host's load event has fired.
    ///
    /// Spawns the deferred load sequence (milestone collection, sort,
    /// baseline, render, sample/report) onto the runtime; only the first
    /// call per session does anything. Must be called from within a Tokio
    /// runtime.
    pub fn page_loaded(&self) {
        let Some(session) = self.session() else {
            return;
        };

        {
            let mut inner = session.inner.lock();
            if inner.load_started {
                return;
            }
            inner.load_started = true;
        }

        let handle = tokio::spawn(async move {
            // One turn of the event loop first, so values produced by the
            // host's other load handlers have settled before milestones
            // are read.
            tokio::task::yield_now().await;
            session.run_load_sequence().await;
        });

        *self.load_handle.lock() = Some(handle);
    }

    /// Await completion of the load sequence spawned by
    /// [`page_loaded`](PageStatsd::page_loaded). Returns immediately when
    /// it never started or has already been awaited.
    pub async fn loaded(&self) {
        let handle = self.load_handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn session(&self) -> Option<Arc<Session>> {
        match &*self.mode.lock() {
            Mode::Active(session) => Some(session.clone()),
            _ => None,
        }
    }
}

// ─── Active-session internals ────────────────────────────────────

/// Everything an initialized session owns. Settings and the timing snapshot
/// are immutable; the rest sits behind one lock.
struct Session {
    settings: Settings,
    timing: NavigationTiming,
    client: reqwest::Client,
    inner: Mutex<Inner>,
}

/// State mutated after initialization. One lock guards it all, so a tick
/// append and its post-render row emit happen in the same step.
struct Inner {
    store: TickStore,
    baseline: Option<i64>,
    renderer: ReportRenderer,
    load_started: bool,
}

impl Session {
    /// Append one tick. When the on-page report is already up, the matching
    /// row goes out before the lock is released, keeping table and store in
    /// lockstep.
    fn record(&self, tick: Tick) {
        let mut inner = self.inner.lock();
        if inner.renderer.is_rendered() {
            inner.renderer.append_tick(&self.timing, inner.baseline, &tick);
        }
        inner.store.append(tick);
    }

    /// The fixed once-per-load pipeline: milestones in, sort, baseline,
    /// optional render, sample/report. The beacon is sent after the lock is
    /// released; only this detached task ever awaits it.
    async fn run_load_sequence(&self) {
        let (snapshot, baseline) = {
            let mut inner = self.inner.lock();

            for report_event in &self.settings.report_events {
                match self.timing.get(&report_event.event) {
                    Some(ms) => inner.store.append(Tick::new(
                        ms,
                        report_event.message.clone(),
                        report_event.reporting,
                    )),
                    None => debug!(
                        "unknown timing event {:?}, milestone skipped",
                        report_event.event
                    ),
                }
            }

            inner.store.sort_by_time();
            inner.baseline = inner.store.baseline(&self.settings.base_of_operations);

            if self.settings.display_report {
                let baseline = inner.baseline;
                let Inner {
                    store, renderer, ..
                } = &mut *inner;
                renderer.render_report(&self.timing, baseline, store.ticks());
            }

            (inner.store.ticks().to_vec(), inner.baseline)
        };

        report::report_ticks(&self.client, &self.settings, &snapshot, baseline).await;
    }
}
