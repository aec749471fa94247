use crate::error::Result;
use crate::message::{Request, Response};
use crate::relay::Next;

/// A unit of request processing that may delegate to the rest of the chain.
///
/// Code before `next.handle(..)` runs on the way in, code after it runs on the
/// way out. Returning without calling `next` short-circuits the chain.
pub trait Middleware: Send + Sync {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response>;
}

/// A terminal unit: turns a request into a response without a continuation.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: Request) -> Result<Response>;
}
