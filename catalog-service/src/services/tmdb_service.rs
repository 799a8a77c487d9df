//! Thin TMDB client used by the search proxy.
//!
//! Endpoint used:
//! - `GET {api_base}/search/movie?api_key=..&query=..`
//!
//! Search hits are reshaped into [`Movie`] right here so nothing downstream
//! ever sees the upstream schema. The search endpoint carries no crew or
//! cast, so `director` is always `"N/A"` and `cast` is always empty.
//!
//! # Examples
//!
//! ```no_run
//! use catalog_service::{CatalogConfig, TmdbService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = TmdbService::new(CatalogConfig::new("tmdb-key"))?;
//! let movies = svc.search("batman").await?;
//! println!("{} hits", movies.len());
//! # Ok(()) }
//! ```

use std::time::Duration;

use movie_types::env::validate_http_endpoint;
use movie_types::{Movie, NOT_AVAILABLE, PLACEHOLDER_POSTER};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::catalog_config::{CatalogConfig, DEFAULT_TIMEOUT_SECS};
use crate::error_handler::{CatalogError, Result, make_snippet};

/// Thin client for the TMDB search API.
///
/// Reuses one HTTP client with the configured timeout.
#[derive(Debug, Clone)]
pub struct TmdbService {
    client: reqwest::Client,
    cfg: CatalogConfig,
    url_search: String,
}

impl TmdbService {
    /// Creates a new [`TmdbService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`](crate::ConfigError::InvalidFormat) if the base is not http(s)
    /// - [`CatalogError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: CatalogConfig) -> Result<Self> {
        validate_http_endpoint("TMDB_API_BASE", cfg.api_base.trim())?;

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()?;

        let url_search = format!("{}/search/movie", cfg.api_base.trim_end_matches('/'));

        Ok(Self {
            client,
            cfg,
            url_search,
        })
    }

    /// Config this service was built from.
    pub fn config(&self) -> &CatalogConfig {
        &self.cfg
    }

    /// Searches the catalog by free text.
    ///
    /// # Errors
    /// - [`CatalogError::HttpStatus`] for non-2xx responses
    /// - [`CatalogError::HttpTransport`] for client errors
    /// - [`CatalogError::Decode`] if the body has no `results` array
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let url = format!(
            "{}?api_key={}&query={}",
            self.url_search,
            urlencoding::encode(&self.cfg.api_key),
            urlencoding::encode(query)
        );

        // The key travels in the query string, keep it out of error messages.
        debug!("GET {}", self.url_search);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::HttpTransport(e.without_url()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CatalogError::HttpTransport(e.without_url()))?;

        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status,
                url: self.url_search.clone(),
                snippet: make_snippet(&text),
            });
        }

        let movies = parse_search_body(&text, &self.cfg.image_base)?;
        debug!(hits = movies.len(), "search completed");
        Ok(movies)
    }
}

/* ==========================
HTTP payloads & mapping
========================== */

/// Response body for `/search/movie`. Only `results` is required.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

/// Subset of a TMDB search hit.
#[derive(Debug, Deserialize)]
struct SearchHit {
    id: Option<i64>,
    title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    overview: Option<String>,
}

/// Decodes a `/search/movie` body and maps every hit to a [`Movie`].
///
/// Hits without an `id` are skipped.
///
/// # Errors
/// Returns [`CatalogError::Decode`] when the body is not JSON or lacks `results`.
pub fn parse_search_body(body: &str, image_base: &str) -> Result<Vec<Movie>> {
    let parsed: SearchResponse = serde_json::from_str(body).map_err(|e| {
        CatalogError::Decode(format!(
            "serde error: {e}; expected `{{ results: object[] }}`"
        ))
    })?;

    Ok(parsed
        .results
        .into_iter()
        .filter_map(|hit| {
            let mapped = map_hit(hit, image_base);
            if mapped.is_none() {
                warn!("skipping search hit without id");
            }
            mapped
        })
        .collect())
}

fn map_hit(hit: SearchHit, image_base: &str) -> Option<Movie> {
    let id = hit.id?;

    let year = hit
        .release_date
        .as_deref()
        .and_then(|date| date.split('-').next())
        .filter(|y| !y.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    let poster = match hit.poster_path.as_deref() {
        Some(path) if !path.is_empty() => format!("{}{}", image_base.trim_end_matches('/'), path),
        _ => PLACEHOLDER_POSTER.to_string(),
    };

    Some(Movie {
        id,
        title: hit.title.unwrap_or_default(),
        year,
        poster,
        rating: hit.vote_average.unwrap_or(0.0),
        plot: hit.overview.unwrap_or_default(),
        director: NOT_AVAILABLE.to_string(),
        cast: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;

    const IMAGES: &str = "https://image.tmdb.org/t/p/w500";
    const KEY: &str = "tmdb-secret-42";

    /// Serves `/search/movie` on a random local port, answering with `status`
    /// and `body` after checking the key and query are passed through.
    async fn fake_tmdb(status: StatusCode, body: serde_json::Value) -> String {
        let app = Router::new().route(
            "/search/movie",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let body = body.clone();
                async move {
                    let forwarded = params.get("api_key").map(String::as_str) == Some(KEY)
                        && params.get("query").map(String::as_str) == Some("dark knight");
                    if forwarded {
                        (status, Json(body))
                    } else {
                        (StatusCode::BAD_REQUEST, Json(json!({ "status_message": "bad params" })))
                    }
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn service(base: String) -> TmdbService {
        TmdbService::new(CatalogConfig::new(KEY).with_api_base(base)).unwrap()
    }

    #[tokio::test]
    async fn search_maps_upstream_hits() {
        let base = fake_tmdb(
            StatusCode::OK,
            json!({ "results": [{
                "id": 155,
                "title": "The Dark Knight",
                "release_date": "2008-07-16",
                "poster_path": "/dk.jpg",
                "vote_average": 8.5,
                "overview": "Batman raises the stakes."
            }] }),
        )
        .await;

        let movies = service(base).search("dark knight").await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 155);
        assert_eq!(movies[0].year, "2008");
        assert_eq!(movies[0].poster, format!("{IMAGES}/dk.jpg"));
    }

    #[tokio::test]
    async fn unauthorized_is_a_status_error_without_the_key() {
        let base = fake_tmdb(
            StatusCode::UNAUTHORIZED,
            json!({ "status_code": 7, "status_message": "Invalid API key" }),
        )
        .await;

        let err = service(base.clone()).search("dark knight").await.unwrap_err();
        match &err {
            CatalogError::HttpStatus { status, url, snippet } => {
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert_eq!(url, &format!("{base}/search/movie"));
                assert!(snippet.contains("Invalid API key"));
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert!(!err.to_string().contains(KEY));
        assert!(!format!("{err:?}").contains(KEY));
    }

    #[tokio::test]
    async fn server_error_is_a_status_error() {
        let base = fake_tmdb(StatusCode::INTERNAL_SERVER_ERROR, json!({ "oops": true })).await;

        let err = service(base).search("dark knight").await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::HttpStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(!err.to_string().contains(KEY));
    }

    #[tokio::test]
    async fn transport_errors_hide_the_key() {
        // Bind then drop to get a local port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = service(format!("http://{addr}"))
            .search("dark knight")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::HttpTransport(_)));
        assert!(!err.to_string().contains(KEY));
        assert!(!format!("{err:?}").contains(KEY));
    }

    #[test]
    fn maps_complete_hit() {
        let body = r#"{
            "page": 1,
            "results": [{
                "id": 155,
                "title": "The Dark Knight",
                "release_date": "2008-07-16",
                "poster_path": "/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
                "vote_average": 8.5,
                "overview": "Batman raises the stakes in his war on crime."
            }]
        }"#;

        let movies = parse_search_body(body, IMAGES).unwrap();
        assert_eq!(movies.len(), 1);
        let m = &movies[0];
        assert_eq!(m.id, 155);
        assert_eq!(m.year, "2008");
        assert_eq!(
            m.poster,
            "https://image.tmdb.org/t/p/w500/qJ2tW6WMUDux911r6m7haRef0WH.jpg"
        );
        assert_eq!(m.rating, 8.5);
        assert_eq!(m.director, "N/A");
        assert!(m.cast.is_empty());
    }

    #[test]
    fn missing_fields_use_local_defaults() {
        let body = r#"{ "results": [
            { "id": 1, "title": "Unreleased", "release_date": "", "poster_path": null },
            { "id": 2, "title": "No date at all" }
        ] }"#;

        let movies = parse_search_body(body, IMAGES).unwrap();
        assert_eq!(movies[0].year, "N/A");
        assert_eq!(movies[0].poster, "/placeholder.svg");
        assert_eq!(movies[1].year, "N/A");
        assert_eq!(movies[1].rating, 0.0);
        assert_eq!(movies[1].plot, "");
    }

    #[test]
    fn hits_without_id_are_dropped() {
        let body = r#"{ "results": [ { "title": "ghost" }, { "id": 3, "title": "real" } ] }"#;
        let movies = parse_search_body(body, IMAGES).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 3);
    }

    #[test]
    fn body_without_results_is_a_decode_error() {
        let err = parse_search_body(r#"{ "status_code": 7 }"#, IMAGES).unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn empty_results_are_fine() {
        let movies = parse_search_body(r#"{ "results": [] }"#, IMAGES).unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn rejects_non_http_base() {
        let cfg = CatalogConfig::new("k").with_api_base("ftp://example.org");
        assert!(TmdbService::new(cfg).is_err());
    }
}
