//! Movie record and its wire-level counterpart.
//!
//! [`Movie`] is the only shape the rest of the workspace renders or merges.
//! Anything coming off the wire goes through [`RawMovie`] first, where every
//! field is optional and absent values collapse to documented defaults:
//!
//! | field      | default                 |
//! |------------|-------------------------|
//! | `title`    | `""`                    |
//! | `year`     | `"N/A"`                 |
//! | `poster`   | `/placeholder.svg`      |
//! | `rating`   | `0.0`                   |
//! | `plot`     | `""`                    |
//! | `director` | `"N/A"`                 |
//! | `cast`     | `[]`                    |
//!
//! Only `id` is mandatory: without it a record has no merge key.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Sentinel used for unknown year/director.
pub const NOT_AVAILABLE: &str = "N/A";

/// Local poster shown when the catalog has no artwork.
pub const PLACEHOLDER_POSTER: &str = "/placeholder.svg";

/// A single movie as displayed in the grid and detail overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMovie")]
pub struct Movie {
    /// Stable identifier, unique within a displayed collection.
    pub id: i64,
    pub title: String,
    /// Release year or [`NOT_AVAILABLE`].
    pub year: String,
    /// Poster URL or [`PLACEHOLDER_POSTER`].
    pub poster: String,
    pub rating: f64,
    pub plot: String,
    pub director: String,
    pub cast: Vec<String>,
}

impl Movie {
    /// Builds a record with every optional field at its default.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            year: NOT_AVAILABLE.to_string(),
            poster: PLACEHOLDER_POSTER.to_string(),
            rating: 0.0,
            plot: String::new(),
            director: NOT_AVAILABLE.to_string(),
            cast: Vec::new(),
        }
    }
}

/// Error returned when a wire record cannot become a [`Movie`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("movie record has no `id`")]
pub struct MissingId;

/// Untrusted movie payload as received from the proxy or the change channel.
///
/// Accepts both the display names (`poster`, `cast`) and the proxy's
/// historical names (`poster_path`, `cast_members`). Scalars are read
/// leniently: a numeric year or a stringly rating still decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(default, alias = "poster_path", deserialize_with = "lenient_text")]
    pub poster: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub plot: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub director: Option<String>,
    #[serde(default, alias = "cast_members", deserialize_with = "lenient_list")]
    pub cast: Option<Vec<String>>,
}

impl RawMovie {
    /// Coerces into a [`Movie`], returning `None` when `id` is absent.
    pub fn into_movie(self) -> Option<Movie> {
        let id = self.id?;
        Some(Movie {
            id,
            title: self.title.unwrap_or_default(),
            year: non_empty_or(self.year, NOT_AVAILABLE),
            poster: non_empty_or(self.poster, PLACEHOLDER_POSTER),
            rating: self.rating.filter(|r| r.is_finite()).unwrap_or(0.0),
            plot: self.plot.unwrap_or_default(),
            director: non_empty_or(self.director, NOT_AVAILABLE),
            cast: self
                .cast
                .unwrap_or_default()
                .into_iter()
                .filter(|name| !name.trim().is_empty())
                .collect(),
        })
    }
}

impl TryFrom<RawMovie> for Movie {
    type Error = MissingId;

    fn try_from(raw: RawMovie) -> Result<Self, Self::Error> {
        raw.into_movie().ok_or(MissingId)
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

fn lenient_id<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_list<'de, D>(de: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
