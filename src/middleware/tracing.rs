use std::time::Instant;

use tracing::{field, info_span, warn};

use super::Middleware;
use crate::error::Result;
use crate::message::{Request, Response};
use crate::ids::RequestId;
use crate::relay::Next;

/// Runs the downstream chain inside a `request` span.
///
/// The span records method, path and request id up front, then status and
/// latency once the downstream chain returns. Events emitted by later entries
/// are nested under it.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let request_id = RequestId::from_request(&request);
        let span = info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = field::Empty,
            status = field::Empty,
            latency_ms = field::Empty,
        );
        if let Some(id) = request_id {
            span.record("request_id", field::display(id));
        }

        let start = Instant::now();
        let result = span.in_scope(|| next.handle(request));
        span.record("latency_ms", start.elapsed().as_millis() as u64);

        match &result {
            Ok(response) => {
                span.record("status", response.status().as_u16());
            }
            Err(err) => {
                span.in_scope(|| warn!(error = %err, "Downstream middleware failed"));
            }
        }

        result
    }
}
