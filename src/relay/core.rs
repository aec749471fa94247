use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, trace, warn};

use super::adapter::adapt;
use super::RelayBuilder;
use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::message::{empty_response, Request, Response};
use crate::middleware::{Middleware, RequestHandler};
use crate::queue::{Entry, Queue, QueueSource};
use crate::resolver::Resolver;

/// What a relay does when the last entry delegates to `next` anyway.
#[derive(Clone, Default)]
pub enum ExhaustionPolicy {
    /// Fail the dispatch with [`RelayError::ChainExhausted`]
    #[default]
    Fail,
    /// Answer with an empty response carrying this status
    Respond(StatusCode),
    /// Hand the request to a fallback terminal handler
    Delegate(Arc<dyn RequestHandler>),
}

impl fmt::Debug for ExhaustionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionPolicy::Fail => f.write_str("Fail"),
            ExhaustionPolicy::Respond(status) => f.debug_tuple("Respond").field(status).finish(),
            ExhaustionPolicy::Delegate(_) => f.write_str("Delegate(..)"),
        }
    }
}

/// Onion-style dispatcher over a fixed queue of entries.
///
/// Built once; [`Relay::handle`] may then be called any number of times, from
/// any number of threads. Every call walks the queue from the first entry with
/// a fresh continuation chain. The relay itself holds no per-call state; the
/// only state observed across calls is whatever the entries keep.
///
/// # Example
///
/// ```rust
/// use relay::{Entry, Relay};
/// use relay::message::{empty_response, Body, Request};
/// use http::StatusCode;
///
/// let relay = Relay::new(
///     vec![
///         Entry::callable(|req, next| {
///             let mut res = next.handle(req)?;
///             res.body_mut().write("Hello, callable world!");
///             Ok(res)
///         }),
///         Entry::callable(|_req, _next| Ok(empty_response(StatusCode::OK))),
///     ],
///     None,
/// )?;
///
/// let res = relay.handle(Request::new(Body::empty()))?;
/// assert_eq!(res.body().to_string(), "Hello, callable world!");
/// # Ok::<(), relay::RelayError>(())
/// ```
#[derive(Clone)]
pub struct Relay {
    queue: Arc<Queue>,
    resolver: Option<Arc<dyn Resolver>>,
    on_exhausted: ExhaustionPolicy,
}

impl Relay {
    /// Build a relay over `source`, resolving identifiers through `resolver`
    ///
    /// # Errors
    ///
    /// [`RelayError::TypeMismatch`] or [`RelayError::EmptyQueue`] from queue
    /// normalization. Entry content is not checked until dispatch.
    pub fn new(
        source: impl Into<QueueSource>,
        resolver: Option<Arc<dyn Resolver>>,
    ) -> Result<Self> {
        let queue = Queue::normalize(source)?;
        Ok(Self::from_parts(queue, resolver, ExhaustionPolicy::default()))
    }

    #[must_use]
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// Build a relay from a loaded [`RelayConfig`]
    ///
    /// # Errors
    ///
    /// Fails when the configured exhaustion status is not a valid HTTP status,
    /// or when the configured queue is missing, empty or not a list.
    pub fn from_config(
        config: &RelayConfig,
        resolver: Option<Arc<dyn Resolver>>,
    ) -> anyhow::Result<Self> {
        let mut builder = Relay::builder().config(config)?;
        if let Some(resolver) = resolver {
            builder = builder.shared_resolver(resolver);
        }
        Ok(builder.build()?)
    }

    pub(crate) fn from_parts(
        queue: Queue,
        resolver: Option<Arc<dyn Resolver>>,
        on_exhausted: ExhaustionPolicy,
    ) -> Self {
        Relay {
            queue: Arc::new(queue),
            resolver,
            on_exhausted,
        }
    }

    /// Number of entries in the queue
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Always `false`: a relay cannot be built over an empty queue
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    #[must_use]
    pub fn on_exhausted(&self) -> &ExhaustionPolicy {
        &self.on_exhausted
    }

    #[must_use]
    pub fn with_exhaustion_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.on_exhausted = policy;
        self
    }

    /// Run `request` through the whole queue and return the outermost response
    ///
    /// # Errors
    ///
    /// - [`RelayError::InvalidEntry`] when a reached entry cannot be adapted
    /// - [`RelayError::ChainExhausted`] when the last entry calls `next` and the
    ///   policy is [`ExhaustionPolicy::Fail`]
    /// - anything an entry or the resolver reports
    pub fn handle(&self, request: Request) -> Result<Response> {
        debug!(
            method = %request.method(),
            path = %request.uri().path(),
            entries = self.queue.len(),
            "Relay dispatch start"
        );
        let chain = self.chain(Tail::Policy(&self.on_exhausted));
        chain.first().handle(request)
    }

    fn chain<'a>(&'a self, tail: Tail<'a>) -> Chain<'a> {
        Chain {
            entries: self.queue.as_slice(),
            resolver: self.resolver.as_deref(),
            tail,
        }
    }
}

impl fmt::Debug for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay")
            .field("queue", &self.queue)
            .field("resolver", &self.resolver.is_some())
            .field("on_exhausted", &self.on_exhausted)
            .finish()
    }
}

/// A relay used as a terminal handler is transparent: same response as calling it directly.
impl RequestHandler for Relay {
    fn handle(&self, request: Request) -> Result<Response> {
        Relay::handle(self, request)
    }
}

/// A relay used as middleware runs its own queue first, then continues with
/// the outer chain instead of applying its own exhaustion policy.
impl Middleware for Relay {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let chain = self.chain(Tail::Outer(next));
        chain.first().handle(request)
    }
}

/// Per-dispatch view of the queue. Lives on the stack of one `handle()` call.
struct Chain<'a> {
    entries: &'a [Entry],
    resolver: Option<&'a dyn Resolver>,
    tail: Tail<'a>,
}

#[derive(Clone, Copy)]
enum Tail<'a> {
    Policy(&'a ExhaustionPolicy),
    Outer(Next<'a>),
}

impl<'a> Chain<'a> {
    fn first(&'a self) -> Next<'a> {
        Next {
            chain: self,
            index: 0,
        }
    }

    fn exhausted(&self, request: Request) -> Result<Response> {
        match self.tail {
            Tail::Outer(outer) => outer.handle(request),
            Tail::Policy(ExhaustionPolicy::Fail) => {
                warn!(
                    entries = self.entries.len(),
                    "Middleware queue exhausted without a response"
                );
                Err(RelayError::ChainExhausted {
                    len: self.entries.len(),
                })
            }
            Tail::Policy(ExhaustionPolicy::Respond(status)) => {
                debug!(status = %status, "Middleware queue exhausted, responding with fallback status");
                Ok(empty_response(*status))
            }
            Tail::Policy(ExhaustionPolicy::Delegate(handler)) => handler.handle(request),
        }
    }
}

/// Continuation handed to each entry: "the rest of the chain".
///
/// Calling [`Next::handle`] runs the entries after the current one. It may be
/// called zero times (short-circuit), once, or several times; each call
/// restarts the downstream chain with the request it is given.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a Chain<'a>,
    index: usize,
}

impl Next<'_> {
    /// Run the remainder of the chain
    ///
    /// # Errors
    ///
    /// Propagates adapter, resolver, exhaustion and downstream entry errors.
    pub fn handle(&self, request: Request) -> Result<Response> {
        let chain = self.chain;
        let Some(entry) = chain.entries.get(self.index) else {
            return chain.exhausted(request);
        };

        trace!(index = self.index, entry = ?entry, "Invoking middleware entry");
        let adapted = adapt(entry, chain.resolver)?;
        adapted.invoke(
            request,
            Next {
                chain,
                index: self.index + 1,
            },
        )
    }

    /// Queue position this continuation will invoke
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Entries left in this relay's queue, including the one at [`Next::index`]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.entries.len().saturating_sub(self.index)
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl RequestHandler for Next<'_> {
    fn handle(&self, request: Request) -> Result<Response> {
        Next::handle(self, request)
    }
}
