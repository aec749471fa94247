//! # Relay
//!
//! **Relay** turns an ordered queue of middleware into a single request handler.
//! Each unit may inspect or modify the request, delegate to the rest of the
//! queue, then inspect or modify the response on the way back: the classic
//! "onion".
//!
//! ## Overview
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Relay
//!     participant A as Entry 0
//!     participant B as Entry 1
//!     participant R as Responder
//!
//!     Caller->>Relay: handle(request)
//!     Relay->>A: process(request, next@1)
//!     A->>B: next.handle(request)
//!     B->>R: next.handle(request)
//!     R-->>B: response
//!     B-->>A: response (after-code runs)
//!     A-->>Relay: response (after-code runs)
//!     Relay-->>Caller: response
//! ```
//!
//! ## Architecture
//!
//! - **[`queue`]** - entry shapes and queue normalization
//! - **[`resolver`]** - identifier → entry resolution, [`Registry`]
//! - **[`relay`]** - the adapter and continuation-chain dispatcher
//! - **[`middleware`]** - unit contracts and bundled units
//! - **[`message`]** - `http` request/response types with an appendable [`Body`]
//! - **[`config`]** / **[`telemetry`]** - configuration and logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::StatusCode;
//! use relay::middleware::{AuthMiddleware, StatusResponder};
//! use relay::message::Body;
//! use relay::{Entry, Registry, Relay};
//!
//! let mut registry = Registry::new();
//! registry.register("auth", || Entry::middleware(AuthMiddleware::new("Bearer s3cret")));
//! registry.register_shared("hello", || {
//!     Entry::handler(StatusResponder::new(StatusCode::OK).with_body("hello"))
//! });
//!
//! let relay = Relay::new(vec![Entry::from("auth"), Entry::from("hello")], Some(Arc::new(registry)))?;
//!
//! let request = http::Request::builder()
//!     .uri("/greet")
//!     .header("authorization", "Bearer s3cret")
//!     .body(Body::empty())
//!     .map_err(anyhow::Error::from)?;
//! let response = relay.handle(request)?;
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().to_string(), "hello");
//! # Ok::<(), relay::RelayError>(())
//! ```
//!
//! ## Execution Model
//!
//! Dispatch is synchronous and strictly sequential. A relay is immutable once
//! built, so it may be shared across threads; entries that keep state are
//! responsible for their own synchronization.

pub mod config;
pub mod error;
pub mod ids;
pub mod message;
pub mod middleware;
pub mod queue;
pub mod relay;
pub mod resolver;
pub mod telemetry;

pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use message::{Body, Request, Response};
pub use middleware::{Middleware, RequestHandler};
pub use queue::{Entry, Queue, QueueSource};
pub use relay::{ExhaustionPolicy, Next, Relay, RelayBuilder};
pub use resolver::{Registry, Resolver};
