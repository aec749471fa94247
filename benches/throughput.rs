use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use http::StatusCode;
use relay::message::{empty_response, Body};
use relay::middleware::{MetricsMiddleware, RequestIdMiddleware, StatusResponder};
use relay::{Entry, Registry, Relay, Request};

fn request() -> Request {
    http::Request::builder()
        .uri("/zoo/animals/123")
        .body(Body::empty())
        .expect("valid request")
}

fn passthrough() -> Entry {
    Entry::callable(|req, next| next.handle(req))
}

fn bench_direct_dispatch(c: &mut Criterion) {
    let relay = Relay::new(
        vec![
            passthrough(),
            passthrough(),
            passthrough(),
            passthrough(),
            Entry::callable(|_req, _next| Ok(empty_response(StatusCode::OK))),
        ],
        None,
    )
    .expect("relay");

    c.bench_function("dispatch_direct_5", |b| {
        b.iter(|| black_box(relay.handle(request())))
    });
}

fn bench_resolved_dispatch(c: &mut Criterion) {
    let mut registry = Registry::new();
    registry
        .register("request_id", || Entry::middleware(RequestIdMiddleware))
        .register_shared("metrics", || Entry::middleware(MetricsMiddleware::new()))
        .register_shared("ok", || Entry::handler(StatusResponder::new(StatusCode::OK)));

    let relay = Relay::new(
        vec![
            Entry::from("request_id"),
            Entry::from("metrics"),
            Entry::from("ok"),
        ],
        Some(Arc::new(registry)),
    )
    .expect("relay");

    c.bench_function("dispatch_resolved_3", |b| {
        b.iter(|| black_box(relay.handle(request())))
    });
}

fn bench_deep_chain(c: &mut Criterion) {
    let mut queue: Vec<Entry> = (0..64).map(|_| passthrough()).collect();
    queue.push(Entry::callable(|_req, _next| Ok(empty_response(StatusCode::OK))));
    let relay = Relay::new(queue, None).expect("relay");

    c.bench_function("dispatch_direct_65", |b| {
        b.iter(|| black_box(relay.handle(request())))
    });
}

criterion_group!(
    benches,
    bench_direct_dispatch,
    bench_resolved_dispatch,
    bench_deep_chain
);
criterion_main!(benches);
