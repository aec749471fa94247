//! # Middleware Module
//!
//! The two unit contracts a queue entry can implement, plus ready-made units
//! for the usual pipeline roles.
//!
//! - [`Middleware`] - sees the request, may delegate to `next`, sees the response
//! - [`RequestHandler`] - terminal; produces a response without delegating
//!
//! Bundled units:
//!
//! - [`RequestIdMiddleware`] - ensures an `x-request-id` on request and response
//! - [`TracingMiddleware`] - wraps the downstream chain in a `request` span
//! - [`MetricsMiddleware`] - request/error counts and average latency
//! - [`AuthMiddleware`] - token check that short-circuits with 401
//! - [`StatusResponder`] - fixed-status terminal responder

mod auth;
mod core;
mod metrics;
mod request_id;
mod responder;
mod tracing;

pub use self::core::{Middleware, RequestHandler};
pub use auth::AuthMiddleware;
pub use metrics::MetricsMiddleware;
pub use request_id::RequestIdMiddleware;
pub use responder::StatusResponder;
pub use self::tracing::TracingMiddleware;
