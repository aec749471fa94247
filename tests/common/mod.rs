//! Shared fixtures for the relay integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::StatusCode;
use relay::message::{empty_response, Body, Request, Response};
use relay::{Entry, Middleware, Next, Registry, Relay, Result};

/// Tag counter shared by the fake middleware of one test
pub type Counter = Arc<AtomicUsize>;

pub fn counter() -> Counter {
    Arc::new(AtomicUsize::new(0))
}

/// Takes the next tag from the shared counter on the way in and appends
/// `<tag` to the response body on the way out.
pub struct FakeMiddleware {
    counter: Counter,
}

impl FakeMiddleware {
    pub fn new(counter: &Counter) -> Self {
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Middleware for FakeMiddleware {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let tag = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut response = next.handle(request)?;
        response.body_mut().write(format!("<{tag}"));
        Ok(response)
    }
}

pub fn fake(counter: &Counter) -> Entry {
    Entry::middleware(FakeMiddleware::new(counter))
}

/// Terminal callable answering 200 with an empty body
pub fn responder() -> Entry {
    Entry::callable(|_request, _next| Ok(empty_response(StatusCode::OK)))
}

/// `[fake, fake, fake, responder]`
pub fn fake_queue(counter: &Counter) -> Vec<Entry> {
    vec![fake(counter), fake(counter), fake(counter), responder()]
}

/// Registry resolving `"fake"` to a fresh [`FakeMiddleware`] on every lookup
pub fn fake_registry(counter: &Counter) -> Registry {
    let counter = Arc::clone(counter);
    let mut registry = Registry::new();
    registry.register("fake", move || Entry::middleware(FakeMiddleware::new(&counter)));
    registry
}

pub fn request() -> Request {
    request_to("/")
}

pub fn request_to(path: &str) -> Request {
    http::Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("valid request")
}

pub fn body(response: &Response) -> String {
    response.body().to_string()
}

/// Dispatch twice and check the tags keep accumulating across calls
pub fn assert_relay(relay: &Relay, counter: &Counter) {
    counter.store(0, Ordering::SeqCst);

    let response = relay.handle(request()).expect("first dispatch");
    assert_eq!(body(&response), "<3<2<1");

    let response = relay.handle(request()).expect("second dispatch");
    assert_eq!(body(&response), "<6<5<4");
}
