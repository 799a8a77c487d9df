/// Default TMDB REST base.
pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";

/// Default image CDN prefix; poster paths from search results are appended to it.
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Default request timeout for catalog calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the catalog adapter.
///
/// # Fields
///
/// - `api_key`: TMDB v3 API key, sent as the `api_key` query parameter.
/// - `api_base`: REST base URL without a trailing slash.
/// - `image_base`: Prefix joined with `poster_path` to form a poster URL.
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
    pub timeout_secs: Option<u64>,
}

impl CatalogConfig {
    /// Builds a config pointing at the public TMDB endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the REST base (useful for staging mirrors and local fakes).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the poster image prefix.
    pub fn with_image_base(mut self, base: impl Into<String>) -> Self {
        self.image_base = base.into().trim_end_matches('/').to_string();
        self
    }
}
