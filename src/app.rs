use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use std::time::Instant;

/// Target of per-request access log events.
pub const ACCESS_LOG_TARGET: &str = "access";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::gateway))
        .layer(middleware::from_fn(access_log))
        .with_state(state)
}

async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: ACCESS_LOG_TARGET,
        %method,
        %uri,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
