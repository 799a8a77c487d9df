use std::future::Future;

use movie_types::Movie;

use crate::error::SearchError;

/// Anything that can answer a settled query with movie records.
///
/// The pipeline holds it as an injected capability, so tests substitute a
/// fake and production uses [`crate::proxy_client::ProxyClient`].
pub trait SearchBackend: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Movie>, SearchError>> + Send;
}
