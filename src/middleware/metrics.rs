use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::Middleware;
use crate::error::Result;
use crate::message::{Request, Response};
use crate::relay::Next;

/// Middleware collecting request statistics for everything downstream of it
///
/// All counters use atomic operations, so one instance can be shared by
/// concurrent dispatches and read at any time.
///
/// Metrics collected:
/// - Total request count
/// - Error count (downstream returned `Err`)
/// - Client/server error responses (status >= 400)
/// - Average latency of the downstream chain
#[derive(Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    error_count: AtomicUsize,
    error_responses: AtomicUsize,
    total_latency_ns: AtomicU64,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Dispatches where the downstream chain returned an error
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Responses with a 4xx or 5xx status
    #[must_use]
    pub fn error_responses(&self) -> usize {
        self.error_responses.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let start = Instant::now();
        let result = next.handle(request);
        let latency = start.elapsed();

        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        match &result {
            Ok(response) if response.status().as_u16() >= 400 => {
                self.error_responses.fetch_add(1, Ordering::Relaxed);
            }
            Ok(_) => {}
            Err(_) => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
        }

        result
    }
}
