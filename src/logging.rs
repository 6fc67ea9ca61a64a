//! Tracing setup and the per-request access log.
//!
//! The access-log middleware is the entry point of the pipeline: it seeds
//! the [`RequestContext`] with request and correlation identifiers (taken
//! from the inbound headers or generated), opens a tracing span carrying
//! them so every downstream log line is attributable, and emits one
//! structured line per request.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, info, info_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::context::RequestContext;

/// Header carrying a client-supplied request identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
/// Header correlating this request with an upstream one.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the
                // `axum::rejection` target, at `TRACE` level
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn header_or_generated(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Records one access-log line per request and attaches the request context.
pub async fn access_log_middleware(mut req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let version = req.version();
    let path = req.uri().path().to_string();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let request_id = header_or_generated(req.headers(), REQUEST_ID_HEADER);
    let correlation_id = header_or_generated(req.headers(), CORRELATION_ID_HEADER);
    req.extensions_mut()
        .insert(RequestContext::new(request_id.clone(), correlation_id.clone()));

    let span = info_span!(
        "request",
        request_id = %request_id,
        correlation_id = %correlation_id,
    );
    let response = next.run(req).instrument(span).await;

    let status = response.status().as_u16();
    info!(
        request_id = %request_id,
        correlation_id = %correlation_id,
        matched_path = %matched_path,
        status,
        duration_ms = start.elapsed().as_millis() as u64,
        "{} {} {:?} {}",
        method,
        path,
        version,
        status,
    );

    response
}
