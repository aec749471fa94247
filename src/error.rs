use thiserror::Error;

/// Result alias used across the dispatcher surface.
pub type Result<T, E = RelayError> = std::result::Result<T, E>;

/// Errors raised while building a [`Relay`](crate::relay::Relay) or dispatching through it.
///
/// Construction errors (`TypeMismatch`, `EmptyQueue`) prevent the relay from
/// existing at all. Dispatch errors abort the in-flight `handle()` call.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The queue source is not a sequence of entries.
    #[error("middleware queue must be a sequence of entries, found {found}")]
    TypeMismatch {
        /// Kind of value that was supplied instead
        found: &'static str,
    },

    /// The queue source yielded no entries.
    #[error("middleware queue cannot be empty")]
    EmptyQueue,

    /// An entry could not be adapted to the invocation contract.
    ///
    /// Raised lazily, the first time the offending index is reached.
    #[error(
        "Invalid middleware queue entry: {entry}. \
         Middleware must either be callable or implement Middleware or RequestHandler."
    )]
    InvalidEntry {
        /// Representation of the offending entry
        entry: String,
    },

    /// The last entry delegated to its continuation instead of responding.
    #[error("middleware queue exhausted after {len} entries without producing a response")]
    ChainExhausted {
        /// Number of entries in the exhausted queue
        len: usize,
    },

    /// A resolver has nothing registered under the identifier.
    #[error("no middleware registered for identifier '{identifier}'")]
    Unresolved {
        /// The identifier that could not be resolved
        identifier: String,
    },

    /// Failure raised by an entry or a custom resolver.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    /// Build an [`RelayError::InvalidEntry`] for the given entry representation
    #[must_use]
    pub fn invalid_entry(entry: impl Into<String>) -> Self {
        RelayError::InvalidEntry {
            entry: entry.into(),
        }
    }

    /// `true` for errors that can only happen while constructing a relay
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            RelayError::TypeMismatch { .. } | RelayError::EmptyQueue
        )
    }
}
