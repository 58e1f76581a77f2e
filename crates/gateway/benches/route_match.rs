use std::hint::black_box;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;
use criterion::{Criterion, criterion_group, criterion_main};

use orgkit_auth::AuthRequirement;
use orgkit_gateway::{Route, RouteTable, UseCaseHandler, UseCaseRequest, UseCaseResponse, UseCaseResult};

struct NoopHandler;

#[async_trait]
impl UseCaseHandler for NoopHandler {
    async fn handle(&self, _request: UseCaseRequest) -> UseCaseResult {
        Ok(UseCaseResponse::no_content())
    }
}

fn build_table(routes: usize) -> RouteTable {
    let handler: Arc<dyn UseCaseHandler> = Arc::new(NoopHandler);
    let mut builder = RouteTable::builder("/api");
    for i in 0..routes {
        builder = builder.route(Route::new(
            Method::GET,
            format!("/resource{i}/:id"),
            AuthRequirement::None,
            handler.clone(),
        ));
    }
    builder.build()
}

fn bench_route_match(c: &mut Criterion) {
    let table = build_table(50);

    c.bench_function("match_first_of_50", |b| {
        b.iter(|| black_box(table.find(&Method::GET, black_box("/api/resource0/id-1"))))
    });

    c.bench_function("match_last_of_50", |b| {
        b.iter(|| black_box(table.find(&Method::GET, black_box("/api/resource49/id-1"))))
    });

    c.bench_function("miss_of_50", |b| {
        b.iter(|| black_box(table.find(&Method::GET, black_box("/api/absent/id-1"))))
    });
}

criterion_group!(benches, bench_route_match);
criterion_main!(benches);
