use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchMoviesRequest {
    #[serde(default)]
    pub query: String,
}
