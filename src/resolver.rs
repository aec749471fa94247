//! # Resolver Module
//!
//! Maps opaque identifiers in a queue to middleware instances on demand.
//!
//! The relay treats a resolver as a capability: it calls [`Resolver::resolve`]
//! only when an [`Entry::Identifier`] is actually reached during a dispatch, and
//! surfaces whatever error the resolver reports unchanged.
//!
//! [`Registry`] is the bundled implementation, a name → provider table built at
//! startup:
//!
//! ```rust,ignore
//! use relay::{Entry, Registry, Relay};
//! use relay::middleware::{AuthMiddleware, StatusResponder};
//! use http::StatusCode;
//!
//! let mut registry = Registry::new();
//! registry.register("auth", || Entry::middleware(AuthMiddleware::new("Bearer s3cret")));
//! registry.register_shared("ok", || Entry::handler(StatusResponder::new(StatusCode::OK)));
//!
//! let relay = Relay::builder()
//!     .queue(vec![Entry::from("auth"), Entry::from("ok")])
//!     .resolver(registry)
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{RelayError, Result};
use crate::queue::Entry;

/// Maps an identifier to a middleware entry.
pub trait Resolver: Send + Sync {
    /// Resolve `identifier`
    ///
    /// # Errors
    ///
    /// Implementations report their own failures; the relay propagates them unchanged.
    fn resolve(&self, identifier: &str) -> Result<Entry>;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Result<Entry> + Send + Sync,
{
    fn resolve(&self, identifier: &str) -> Result<Entry> {
        self(identifier)
    }
}

type Factory = Box<dyn Fn() -> Entry + Send + Sync>;

enum Provider {
    /// New instance on every resolution
    Factory(Factory),
    /// Built on first resolution, then shared
    Shared {
        init: Factory,
        instance: OnceCell<Entry>,
    },
}

impl Provider {
    fn provide(&self) -> Entry {
        match self {
            Provider::Factory(factory) => factory(),
            Provider::Shared { init, instance } => instance.get_or_init(|| init()).clone(),
        }
    }
}

/// Identifier → provider table.
///
/// Registration happens at startup through `&mut self`; resolution only reads
/// the table, so a built registry can be shared across threads.
#[derive(Default)]
pub struct Registry {
    providers: HashMap<String, Provider>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory that builds a fresh entry every time `identifier` is resolved
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Entry + Send + Sync + 'static,
    {
        self.insert(identifier.into(), Provider::Factory(Box::new(factory)))
    }

    /// Register a factory whose entry is built once, on first resolution, and reused
    pub fn register_shared<F>(&mut self, identifier: impl Into<String>, init: F) -> &mut Self
    where
        F: Fn() -> Entry + Send + Sync + 'static,
    {
        self.insert(
            identifier.into(),
            Provider::Shared {
                init: Box::new(init),
                instance: OnceCell::new(),
            },
        )
    }

    /// Register an already-built entry under `identifier`
    pub fn register_instance(&mut self, identifier: impl Into<String>, entry: Entry) -> &mut Self {
        self.insert(
            identifier.into(),
            Provider::Shared {
                init: Box::new(move || entry.clone()),
                instance: OnceCell::new(),
            },
        )
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.providers.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered identifiers, in no particular order
    #[must_use]
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    fn insert(&mut self, identifier: String, provider: Provider) -> &mut Self {
        if self.providers.remove(&identifier).is_some() {
            warn!(
                identifier = %identifier,
                total_providers = self.providers.len(),
                "Replaced existing middleware provider"
            );
        }

        info!(
            identifier = %identifier,
            total_providers = self.providers.len() + 1,
            "Middleware provider registered"
        );

        self.providers.insert(identifier, provider);
        self
    }
}

impl Resolver for Registry {
    fn resolve(&self, identifier: &str) -> Result<Entry> {
        let provider = self
            .providers
            .get(identifier)
            .ok_or_else(|| RelayError::Unresolved {
                identifier: identifier.to_string(),
            })?;
        debug!(identifier = %identifier, "Resolved middleware identifier");
        Ok(provider.provide())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut identifiers: Vec<&str> = self.identifiers().collect();
        identifiers.sort_unstable();
        f.debug_struct("Registry")
            .field("identifiers", &identifiers)
            .finish()
    }
}
