//! # Relay Module
//!
//! The chain dispatcher: turns a queue of entries into one callable request handler.
//!
//! ## Request Flow
//!
//! Each call to [`Relay::handle`] builds a continuation for index 0 and runs it.
//! Invoking the continuation for index `i`:
//!
//! 1. past the end of the queue, applies the [`ExhaustionPolicy`] (or, for a
//!    relay nested as middleware, continues with the outer chain)
//! 2. otherwise adapts entry `i` through [`adapt`], resolving identifiers on demand
//! 3. invokes the adapted unit with the request and the continuation for `i + 1`
//!
//! ```text
//! handle(req) ──► A.before ──► B.before ──► C.before ──► responder
//!                                                           │
//! response ◄──── A.after ◄──── B.after ◄──── C.after ◄──────┘
//! ```
//!
//! Entries before the responder can short-circuit by returning without calling
//! `next`; later entries are then skipped for that call only, and are never
//! resolved or validated.
//!
//! ## Concurrency
//!
//! A relay is immutable after construction, so `handle()` can run on many
//! threads at once. Entries that keep state must synchronize it themselves.

mod adapter;
mod builder;
mod core;

pub use adapter::{adapt, Adapted};
pub use builder::RelayBuilder;
pub use self::core::{ExhaustionPolicy, Next, Relay};
