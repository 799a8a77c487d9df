use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Browser clients send these on the search call and the change stream.
const ALLOWED_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    header::CONTENT_TYPE,
];

/// Builds the CORS layer that also answers `OPTIONS` preflights.
pub fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS)
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(3600));

    if allowed_origins.is_empty() {
        return cors;
    }

    if allowed_origins.len() == 1 && allowed_origins[0] == "*" {
        return cors.allow_origin(Any);
    }

    if allowed_origins.iter().any(|origin| origin == "*") {
        warn!(
            origins = ?allowed_origins,
            "Invalid CORS config: '*' must be the only allowed origin"
        );
        return cors;
    }

    let allowed: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        warn!("All configured CORS origins were invalid; disabling CORS");
        cors
    } else {
        info!(origins = ?allowed_origins, "CORS configured");
        cors.allow_origin(AllowOrigin::list(allowed))
    }
}
