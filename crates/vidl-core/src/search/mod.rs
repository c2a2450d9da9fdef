//! Metadata fetcher: POST the source URL to the search endpoint and pick a
//! downloadable quality from the answer.

mod parse;

use crate::config::QualityStrategy;
use crate::error::{Error, Result};
use crate::http::{self, RequestOptions};
use serde_json::{json, Value};

pub use parse::parse_metadata;

/// What the convert step needs, plus what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    /// Opaque per-quality key (`k`).
    pub resource_key: String,
    /// Upstream video id (`vid`).
    pub resource_id: String,
    pub title: String,
    /// Label of the picked `links.mp4` entry (e.g. `720p`).
    pub quality: String,
}

fn search_fields(source_url: &str) -> [(&str, &str); 2] {
    [("query", source_url), ("vt", "home")]
}

/// Fetches and parses metadata for `source_url`.
pub fn fetch_metadata(
    source_url: &str,
    search_endpoint: &str,
    strategy: QualityStrategy,
    opts: &RequestOptions,
) -> Result<VideoMetadata> {
    let body = http::post_form(search_endpoint, &search_fields(source_url), opts)?;
    let meta = parse_metadata(&body, strategy)?;
    tracing::debug!(
        url = source_url,
        vid = %meta.resource_id,
        quality = %meta.quality,
        "metadata resolved"
    );
    Ok(meta)
}

/// Raw search response as JSON, for the debug view.
pub fn search_raw(source_url: &str, search_endpoint: &str, opts: &RequestOptions) -> Result<Value> {
    let body = http::post_form(search_endpoint, &search_fields(source_url), opts)?;
    serde_json::from_slice(&body)
        .map_err(|e| Error::Parse(format!("search response is not valid JSON: {e}")))
}

/// The fields the debug view shows: `title`, `dlink`, `vid`, `links`.
/// Missing fields become `""` (or `{}` for `links`).
pub fn debug_summary(raw: &Value) -> Value {
    let field = |name: &str, default: Value| raw.get(name).cloned().unwrap_or(default);
    json!({
        "title": field("title", json!("")),
        "dlink": field("dlink", json!("")),
        "vid": field("vid", json!("")),
        "links": field("links", json!({})),
    })
}
