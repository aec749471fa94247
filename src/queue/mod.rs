//! # Queue Module
//!
//! The ordered, immutable sequence of entries a [`Relay`](crate::relay::Relay)
//! dispatches through.
//!
//! ## Entry Shapes
//!
//! Each slot is an [`Entry`] in one of a closed set of shapes:
//!
//! - [`Entry::Middleware`] - continuation-style handler (`process(request, next)`)
//! - [`Entry::Handler`] - terminal handler (`handle(request)`)
//! - [`Entry::Callable`] - plain closure taking `(request, next)`
//! - [`Entry::Identifier`] - opaque token resolved on demand by a
//!   [`Resolver`](crate::resolver::Resolver)
//! - [`Entry::Invalid`] - placeholder for a described item of no supported
//!   shape; rejected when reached, without consulting the resolver
//!
//! ## Normalization
//!
//! [`Queue::normalize`] materializes a [`QueueSource`] once, at construction
//! time. Lazy sources are drained exactly once; later dispatches work from the
//! materialized entries. Entry *content* is not validated here: identifiers may
//! need resolution before their validity is known, so that check happens the
//! first time an index is reached during dispatch.

mod entry;
mod source;

pub use entry::{Entry, MiddlewareFn};
pub use source::{EntryVec, Queue, QueueSource, INLINE_QUEUE};
