use std::sync::Arc;

use tracing::warn;

use super::Next;
use crate::error::{RelayError, Result};
use crate::message::{Request, Response};
use crate::middleware::{Middleware, RequestHandler};
use crate::queue::{Entry, MiddlewareFn};
use crate::resolver::Resolver;

/// An entry normalized to the uniform `invoke(request, next)` contract.
#[derive(Clone)]
pub enum Adapted {
    Middleware(Arc<dyn Middleware>),
    Handler(Arc<dyn RequestHandler>),
    Callable(Arc<MiddlewareFn>),
}

impl Adapted {
    /// Run the adapted unit
    ///
    /// Terminal handlers ignore `next`; the other shapes decide for themselves
    /// whether and how often to call it.
    pub fn invoke(&self, request: Request, next: Next<'_>) -> Result<Response> {
        match self {
            Adapted::Middleware(middleware) => middleware.process(request, next),
            Adapted::Handler(handler) => handler.handle(request),
            Adapted::Callable(f) => f(request, next),
        }
    }
}

/// Adapt `entry`, resolving identifiers through `resolver`
///
/// Instances are returned as-is (same `Arc`), so their state is shared with the
/// queue. Nothing is cached here beyond what the resolver caches itself.
///
/// # Errors
///
/// - [`RelayError::InvalidEntry`] for [`Entry::Invalid`], or when an identifier
///   cannot be adapted: there is no resolver, or the resolver hands back
///   another identifier
/// - any error reported by the resolver, unchanged
pub fn adapt(entry: &Entry, resolver: Option<&dyn Resolver>) -> Result<Adapted> {
    match entry {
        Entry::Middleware(middleware) => Ok(Adapted::Middleware(Arc::clone(middleware))),
        Entry::Handler(handler) => Ok(Adapted::Handler(Arc::clone(handler))),
        Entry::Callable(f) => Ok(Adapted::Callable(Arc::clone(f))),
        Entry::Invalid(repr) => {
            warn!(entry = %repr, "Queue entry is not middleware, a handler, a callable or an identifier");
            Err(RelayError::invalid_entry(repr.as_str()))
        }
        Entry::Identifier(identifier) => {
            let Some(resolver) = resolver else {
                warn!(entry = %identifier, "Unresolvable queue entry: no resolver configured");
                return Err(RelayError::invalid_entry(identifier.as_str()));
            };

            match resolver.resolve(identifier)? {
                Entry::Identifier(resolved) => {
                    warn!(
                        entry = %identifier,
                        resolved = %resolved,
                        "Resolver returned another identifier"
                    );
                    Err(RelayError::invalid_entry(identifier.as_str()))
                }
                resolved => adapt(&resolved, None),
            }
        }
    }
}
