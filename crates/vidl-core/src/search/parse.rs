//! Search response structures and quality selection.

use super::VideoMetadata;
use crate::config::QualityStrategy;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    vid: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    links: Option<SearchLinks>,
    /// Upstream explanation when the lookup failed.
    #[serde(default)]
    mess: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchLinks {
    /// Quality label → `{ "k": ..., "q": ..., ... }`, in document order.
    #[serde(default)]
    mp4: Option<Map<String, Value>>,
}

impl SearchResponse {
    fn upstream_message(&self) -> Option<&str> {
        self.mess
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

fn parse_error(what: &str, upstream: Option<&str>) -> Error {
    match upstream {
        Some(mess) => Error::Parse(format!("{what} (upstream: {mess})")),
        None => Error::Parse(what.to_string()),
    }
}

/// Leading integer of the entry's `q` field, or of its label when `q` is absent.
fn quality_rank(label: &str, entry: &Value) -> Option<u32> {
    let text = entry.get("q").and_then(Value::as_str).unwrap_or(label);
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Picks one entry from a non-empty quality map.
fn select_quality(
    qualities: &Map<String, Value>,
    strategy: QualityStrategy,
) -> Option<(&String, &Value)> {
    match strategy {
        QualityStrategy::First => qualities.iter().next(),
        QualityStrategy::Highest => {
            let mut best: Option<((&String, &Value), u32)> = None;
            for (label, entry) in qualities {
                if let Some(rank) = quality_rank(label, entry) {
                    if best.map_or(true, |(_, top)| rank > top) {
                        best = Some(((label, entry), rank));
                    }
                }
            }
            best.map(|(pick, _)| pick)
                .or_else(|| qualities.iter().next())
        }
    }
}

/// Parses a search response body into [`VideoMetadata`].
pub fn parse_metadata(body: &[u8], strategy: QualityStrategy) -> Result<VideoMetadata> {
    let resp: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| Error::Parse(format!("search response is not valid JSON: {e}")))?;
    let upstream = resp.upstream_message();

    let qualities = resp
        .links
        .as_ref()
        .and_then(|links| links.mp4.as_ref())
        .ok_or_else(|| parse_error("search response has no links.mp4", upstream))?;
    let (label, entry) = select_quality(qualities, strategy)
        .ok_or_else(|| parse_error("links.mp4 is empty", upstream))?;
    let resource_key = entry
        .get("k")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| parse_error(&format!("quality {label} has no key"), upstream))?
        .to_string();

    let resource_id = resp
        .vid
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| parse_error("search response has no vid", upstream))?
        .to_string();
    let title = resp
        .title
        .clone()
        .ok_or_else(|| parse_error("search response has no title", upstream))?;

    Ok(VideoMetadata {
        resource_key,
        resource_id,
        title,
        quality: label.clone(),
    })
}
