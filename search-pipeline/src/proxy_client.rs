//! HTTP client for the search proxy.
//!
//! Endpoint used:
//!   * POST {proxy_url}/search-movies  body `{ "query": "<text>" }`
//!
//! A 2xx answer must be a JSON array of movie records. Each record is coerced
//! through [`RawMovie`], so absent fields become defaults; records lacking an
//! id are dropped.

use movie_types::{Movie, RawMovie};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    backend::SearchBackend,
    config::PipelineConfig,
    error::{PipelineError, SearchError},
};

const SNIPPET_CHARS: usize = 240;

/// Search proxy HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    url_search: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

impl ProxyClient {
    pub fn new(cfg: &PipelineConfig) -> Result<Self, PipelineError> {
        let http = Client::builder().timeout(cfg.timeout).gzip(true).build()?;
        Ok(Self::with_client(http, cfg))
    }

    /// Builds the client around a shared HTTP instance.
    pub fn with_client(http: Client, cfg: &PipelineConfig) -> Self {
        debug!("Creating ProxyClient with proxy_url={}", cfg.proxy_url);
        Self {
            http,
            url_search: format!("{}/search-movies", cfg.proxy_url),
            api_key: cfg.api_key.clone(),
        }
    }
}

impl SearchBackend for ProxyClient {
    #[instrument(skip_all, fields(query = %query))]
    async fn search(&self, query: &str) -> Result<Vec<Movie>, SearchError> {
        let mut req = self.http.post(&self.url_search).json(&SearchRequest { query });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key).header("apikey", key);
        }

        debug!("POST {}", self.url_search);
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(SearchError::HttpStatus {
                status: status.as_u16(),
                snippet: text.chars().take(SNIPPET_CHARS).collect(),
            });
        }

        decode_movies(&text)
    }
}

/// Decodes a proxy response body into movies, dropping records without id.
pub fn decode_movies(body: &str) -> Result<Vec<Movie>, SearchError> {
    let raw: Vec<RawMovie> = serde_json::from_str(body).map_err(|e| {
        SearchError::Decode(format!("serde error: {e}; expected an array of movies"))
    })?;

    let total = raw.len();
    let movies: Vec<Movie> = raw.into_iter().filter_map(RawMovie::into_movie).collect();
    if movies.len() < total {
        warn!(dropped = total - movies.len(), "search response had records without id");
    }
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use api::core::app_state::AppState;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base: &str) -> ProxyClient {
        let mut cfg = PipelineConfig::new(base);
        cfg.api_key = Some("anon-key".into());
        ProxyClient::new(&cfg).unwrap()
    }

    #[test]
    fn decode_applies_defaults_and_drops_idless_records() {
        let movies = decode_movies(
            r#"[
                {"id": 2, "title": "The Dark Knight", "year": "2008", "rating": 9.0,
                 "poster_path": "/placeholder.svg", "plot": "", "director": "N/A", "cast_members": []},
                {"title": "no id"},
                {"id": 3, "rating": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "The Dark Knight");
        assert_eq!(movies[1].rating, 0.0);
        assert_eq!(movies[1].year, "N/A");
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_movies(r#"{"error":"TMDB API key not configured"}"#).unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn posts_query_and_credentials() {
        let app = Router::new().route(
            "/search-movies",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(body["query"], "batman");
                assert_eq!(headers["apikey"], "anon-key");
                assert_eq!(headers["authorization"], "Bearer anon-key");
                Json(json!([{ "id": 2, "title": "The Dark Knight", "rating": 9.0 }]))
            }),
        );
        let base = serve(app).await;

        let movies = client(&base).search("batman").await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 2);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/search-movies",
            post(|| async { (StatusCode::BAD_GATEWAY, Json(json!({ "error": "upstream" }))) }),
        );
        let base = serve(app).await;

        let err = client(&base).search("batman").await.unwrap_err();
        assert!(matches!(err, SearchError::HttpStatus { status: 502, .. }));
    }

    #[tokio::test]
    async fn unconfigured_proxy_surfaces_as_error() {
        let state = Arc::new(AppState::new(None, vec!["*".into()]));
        let base = serve(api::router(state)).await;

        let err = client(&base).search("batman").await.unwrap_err();
        assert!(matches!(err, SearchError::HttpStatus { status: 500, .. }));

        let empty = client(&base).search("   ").await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        let err = client("http://127.0.0.1:9").search("batman").await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
    }
}
