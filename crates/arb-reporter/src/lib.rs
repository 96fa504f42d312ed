//! arb-reporter — C3, the fire-and-forget reporter sink.
//!
//! `emit` is synchronous by design: callers in the pair coordinator's
//! happens-before chain must never suspend on event delivery. The only
//! suspension point lives in the background task that drains the channel and
//! performs the actual HTTP POST.

#[cfg(feature = "testkit")]
mod capturing;
mod http;

#[cfg(feature = "testkit")]
pub use capturing::CapturingReporterSink;
pub use http::HttpReporterSink;

use arb_schemas::ReporterEvent;

/// Fire-and-forget emitter. Delivery failure is logged, never
/// propagated — the core's execution path is unaffected by reporter outages.
pub trait ReporterSink: Send + Sync {
    fn emit(&self, event: ReporterEvent);
}
