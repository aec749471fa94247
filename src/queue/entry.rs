use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::message::{Request, Response};
use crate::middleware::{Middleware, RequestHandler};
use crate::relay::{Next, Relay};

/// Signature of a plain callable entry
pub type MiddlewareFn = dyn for<'a> Fn(Request, Next<'a>) -> Result<Response> + Send + Sync;

/// One slot in the middleware queue.
///
/// Instances are shared through `Arc`, so their identity (and any state they
/// keep) is the same on every dispatch.
#[derive(Clone)]
pub enum Entry {
    /// Continuation-style handler instance
    Middleware(Arc<dyn Middleware>),
    /// Terminal handler instance; never sees the continuation
    Handler(Arc<dyn RequestHandler>),
    /// Plain `(request, next)` closure
    Callable(Arc<MiddlewareFn>),
    /// Token that must be resolved before it can be invoked
    Identifier(String),
    /// Value of no supported shape, e.g. a number in a described queue.
    /// Never resolved; fails with `InvalidEntry` once reached.
    Invalid(String),
}

impl Entry {
    #[must_use]
    pub fn middleware<M>(middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        Entry::Middleware(Arc::new(middleware))
    }

    #[must_use]
    pub fn handler<H>(handler: H) -> Self
    where
        H: RequestHandler + 'static,
    {
        Entry::Handler(Arc::new(handler))
    }

    /// Wrap a closure; the closure itself decides whether and when to call `next`
    #[must_use]
    pub fn callable<F>(f: F) -> Self
    where
        F: for<'a> Fn(Request, Next<'a>) -> Result<Response> + Send + Sync + 'static,
    {
        Entry::Callable(Arc::new(f))
    }

    #[must_use]
    pub fn identifier(identifier: impl Into<String>) -> Self {
        Entry::Identifier(identifier.into())
    }

    #[must_use]
    pub fn is_identifier(&self) -> bool {
        matches!(self, Entry::Identifier(_))
    }

    /// Short human-readable representation used in errors and logs
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Entry::Middleware(_) => "<middleware>".to_string(),
            Entry::Handler(_) => "<request handler>".to_string(),
            Entry::Callable(_) => "<callable>".to_string(),
            Entry::Identifier(identifier) | Entry::Invalid(identifier) => identifier.clone(),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Middleware(_) => f.write_str("Middleware(..)"),
            Entry::Handler(_) => f.write_str("Handler(..)"),
            Entry::Callable(_) => f.write_str("Callable(..)"),
            Entry::Identifier(identifier) => f.debug_tuple("Identifier").field(identifier).finish(),
            Entry::Invalid(repr) => f.debug_tuple("Invalid").field(repr).finish(),
        }
    }
}

impl From<&str> for Entry {
    fn from(identifier: &str) -> Self {
        Entry::Identifier(identifier.to_string())
    }
}

impl From<String> for Entry {
    fn from(identifier: String) -> Self {
        Entry::Identifier(identifier)
    }
}

impl From<Arc<dyn Middleware>> for Entry {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        Entry::Middleware(middleware)
    }
}

impl From<Arc<dyn RequestHandler>> for Entry {
    fn from(handler: Arc<dyn RequestHandler>) -> Self {
        Entry::Handler(handler)
    }
}

/// A relay placed in another queue acts as a terminal request handler.
///
/// Use [`Entry::middleware`] instead to nest it as a sub-pipeline that falls
/// through to the outer chain once its own queue is exhausted.
impl From<Relay> for Entry {
    fn from(relay: Relay) -> Self {
        Entry::Handler(Arc::new(relay))
    }
}
