//! Wire types for the scrape endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Field values captured from the form at submission time.
///
/// Sent to the server verbatim: no validation, trimming or type coercion
/// happens on this side. The server understands `bar`/`hist`/`pie` for
/// `plot` and `csv`/`json`/`excel` for `export`, but anything the controls
/// hold goes through as-is.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest {
    pub top: String,
    pub plot: String,
    pub export: String,
}

/// What the server answers with. Both URLs are independently optional;
/// presence of one says nothing about the other.
#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default, deserialize_with = "provided_url")]
    pub chart_url: Option<String>,
    #[serde(default, deserialize_with = "provided_url")]
    pub download_url: Option<String>,
}

/// A URL field is "provided" only when it is a non-empty JSON string.
/// Anything else (absent, null, number, empty string) reads as `None`.
fn provided_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(url) if !url.is_empty() => Some(url),
        _ => None,
    })
}
