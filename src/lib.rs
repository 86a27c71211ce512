//! Page-load timing collection with sampled statsd beaconing.
//!
//! The host hands [`PageStatsd::init`] a snapshot of its navigation-timing
//! milestones, then signals [`PageStatsd::page_loaded`] when its load event
//! fires. The session turns the configured milestones into ticks, sorts
//! them, optionally renders an on-page report through a host-provided
//! [`ReportSurface`], and, for a sampled subset of page loads, fires a
//! single fire-and-forget GET to a statsd-style collector. Custom events
//! can be recorded at any later point with [`PageStatsd::tick`].
//!
//! Telemetry must never break the embedding page, so almost nothing here
//! errors: a host without a timing facility gets a permanently inert
//! session, a missing collector URL means no transmission, and a failed
//! beacon is dropped after a debug log.

use thiserror::Error;

mod config;
mod render;
mod report;
mod session;
mod ticks;
mod timing;

pub use config::{AppendParams, Options, ReportEvent, Settings};
pub use render::ReportSurface;
pub use session::PageStatsd;
pub use ticks::{Tick, TickStore};
pub use timing::NavigationTiming;

/// The one recoverable error this crate produces. Everything else degrades
/// silently by contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("timing session already initialized")]
    AlreadyInitialized,
}
