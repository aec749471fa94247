use std::sync::Arc;

use super::{ExhaustionPolicy, Relay};
use crate::config::RelayConfig;
use crate::error::Result;
use crate::queue::{Queue, QueueSource};
use crate::resolver::Resolver;

/// Builder for [`Relay`] with a fluent API
///
/// # Example
///
/// ```rust,ignore
/// use relay::{Entry, ExhaustionPolicy, Registry, Relay};
/// use http::StatusCode;
///
/// let relay = Relay::builder()
///     .queue(vec![Entry::from("request_id"), Entry::from("auth"), Entry::from("hello")])
///     .resolver(registry)
///     .on_exhausted(ExhaustionPolicy::Respond(StatusCode::NOT_FOUND))
///     .build()?;
/// ```
pub struct RelayBuilder {
    source: Option<QueueSource>,
    resolver: Option<Arc<dyn Resolver>>,
    on_exhausted: ExhaustionPolicy,
}

impl RelayBuilder {
    /// Create a builder with no queue, no resolver and the failing exhaustion policy
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            resolver: None,
            on_exhausted: ExhaustionPolicy::Fail,
        }
    }

    #[must_use]
    pub fn queue(mut self, source: impl Into<QueueSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn resolver<R>(mut self, resolver: R) -> Self
    where
        R: Resolver + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Use a resolver that is shared with other relays
    #[must_use]
    pub fn shared_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn on_exhausted(mut self, policy: ExhaustionPolicy) -> Self {
        self.on_exhausted = policy;
        self
    }

    /// Apply the queue (when present) and exhaustion policy from `config`
    ///
    /// # Errors
    ///
    /// Fails when the configured exhaustion status is not a valid HTTP status.
    pub fn config(mut self, config: &RelayConfig) -> anyhow::Result<Self> {
        if let Some(queue) = &config.queue {
            self.source = Some(QueueSource::Described(queue.clone()));
        }
        self.on_exhausted = config.exhaustion_policy()?;
        Ok(self)
    }

    /// Normalize the queue and build the relay
    ///
    /// # Errors
    ///
    /// [`RelayError::TypeMismatch`](crate::RelayError::TypeMismatch) or
    /// [`RelayError::EmptyQueue`](crate::RelayError::EmptyQueue); a builder
    /// without a queue counts as empty.
    pub fn build(self) -> Result<Relay> {
        let source = self.source.unwrap_or(QueueSource::List(Vec::new()));
        let queue = Queue::normalize(source)?;
        Ok(Relay::from_parts(queue, self.resolver, self.on_exhausted))
    }
}

impl Default for RelayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
