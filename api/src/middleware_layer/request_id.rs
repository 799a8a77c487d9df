use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Returns the caller's request id, or a fresh one derived from the clock.
fn resolve_request_id(headers: &HeaderMap) -> String {
    if let Some(v) = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        if !v.trim().is_empty() {
            return v.to_string();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Reads the request id from handler headers, `-` when absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}

/// Makes sure both the request (for handlers) and the response carry an id.
pub async fn ensure_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = resolve_request_id(req.headers());
    let value = HeaderValue::from_str(&id).ok();

    if let Some(v) = value.clone() {
        req.headers_mut().insert(REQUEST_ID_HEADER, v);
    }

    debug!(request_id = %id, method = %req.method(), uri = %req.uri(), "request received");

    let mut res = next.run(req).await;
    if let Some(v) = value {
        res.headers_mut().insert(REQUEST_ID_HEADER, v);
    }
    res
}
