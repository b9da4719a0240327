//! Shared server state -- request counters, lookup service, uptime.
//!
//! All handlers share one [`AppState`] behind an `Arc`. The counters are
//! owned atomics on the state itself; there is no global mutable state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use sleuth_core::metrics as m;
use sleuth_lookup::LookupService;

/// Request counters reported by `/status`.
///
/// `total_requests` only ever grows. `active_requests` is incremented when a
/// lookup starts and decremented when the returned [`ActiveRequestGuard`]
/// drops, so it reaches zero again on every exit path (success, validation
/// error, scan failure).
#[derive(Debug, Default)]
pub struct ServiceCounters {
    total_requests: AtomicU64,
    active_requests: AtomicU64,
}

impl ServiceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a lookup request.
    ///
    /// Increments both counters and mirrors them to the metrics recorder.
    /// The guard must be held for the duration of the request.
    pub fn track_request(&self) -> ActiveRequestGuard<'_> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.active_requests.fetch_add(1, Ordering::Relaxed);

        metrics::counter!(m::LOOKUP_REQUESTS_TOTAL).increment(1);
        metrics::gauge!(m::LOOKUP_ACTIVE_REQUESTS).increment(1.0);

        ActiveRequestGuard { counters: self }
    }

    /// Total number of lookup requests since start.
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Number of lookups currently in flight.
    pub fn active_requests(&self) -> u64 {
        self.active_requests.load(Ordering::Relaxed)
    }
}

/// RAII guard for the in-flight request count.
///
/// Dropping the guard decrements `active_requests`, so handlers cannot leak
/// the count no matter how they return.
#[derive(Debug)]
pub struct ActiveRequestGuard<'a> {
    counters: &'a ServiceCounters,
}

impl Drop for ActiveRequestGuard<'_> {
    fn drop(&mut self) {
        self.counters.active_requests.fetch_sub(1, Ordering::Relaxed);
        metrics::gauge!(m::LOOKUP_ACTIVE_REQUESTS).decrement(1.0);
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Lookup pipeline (sanitize -> scan -> parse).
    pub service: LookupService,
    /// Request counters reported by `/status`.
    pub counters: ServiceCounters,
    /// Server start time (for uptime reporting).
    started_at: Instant,
}

impl AppState {
    /// Create fresh state around a lookup service.
    pub fn new(service: LookupService) -> Self {
        Self {
            service,
            counters: ServiceCounters::new(),
            started_at: Instant::now(),
        }
    }

    /// Elapsed time since server start.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
