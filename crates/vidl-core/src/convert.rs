//! Link resolver: trade a video id + quality key for a direct download URL.

use crate::error::{Error, Result};
use crate::http::{self, RequestOptions};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    dlink: Option<String>,
}

/// Extracts `dlink` from a convert response body.
pub fn parse_link(body: &[u8]) -> Result<String> {
    let resp: ConvertResponse = serde_json::from_slice(body)
        .map_err(|e| Error::Parse(format!("convert response is not valid JSON: {e}")))?;
    match resp.dlink {
        Some(link) if !link.trim().is_empty() => Ok(link.trim().to_string()),
        _ => Err(Error::MissingLink),
    }
}

/// POSTs `vid` and `k` to the convert endpoint and returns the direct link.
/// The link is short-lived upstream; callers should download right away.
pub fn resolve_link(
    resource_id: &str,
    resource_key: &str,
    convert_endpoint: &str,
    opts: &RequestOptions,
) -> Result<String> {
    let body = http::post_form(
        convert_endpoint,
        &[("vid", resource_id), ("k", resource_key)],
        opts,
    )?;
    let link = parse_link(&body)?;
    tracing::debug!(vid = resource_id, "download link resolved");
    Ok(link)
}
