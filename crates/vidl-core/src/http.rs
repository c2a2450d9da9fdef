//! Form-encoded POST over libcurl, shared by the search and convert stages.
//!
//! Each call uses a fresh `Easy` handle with bounded connect/total timeouts,
//! so a dead endpoint surfaces as a network failure instead of hanging.

use crate::config::VidlConfig;
use crate::error::{Error, Result};
use crate::interrupt::CancelToken;
use std::time::Duration;

/// Per-request settings for the API calls.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub cancel: CancelToken,
}

impl RequestOptions {
    pub fn from_config(cfg: &VidlConfig, cancel: CancelToken) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: cfg.timeouts.connect(),
            timeout: cfg.timeouts.request(),
            cancel,
        }
    }
}

/// `application/x-www-form-urlencoded` body for `fields`, in order.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

pub(crate) fn is_success(status: u32) -> bool {
    (200..300).contains(&status)
}

/// POSTs `fields` to `url` and returns the response body.
///
/// Non-2xx responses are returned as [`Error::Status`]; the body is discarded.
pub fn post_form(url: &str, fields: &[(&str, &str)], opts: &RequestOptions) -> Result<Vec<u8>> {
    opts.cancel.check()?;
    let net = |e: curl::Error| Error::transport(url, e);
    let body = encode_form(fields);
    let mut response: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(net)?;
    easy.post(true).map_err(net)?;
    easy.post_fields_copy(body.as_bytes()).map_err(net)?;
    easy.useragent(&opts.user_agent).map_err(net)?;
    easy.follow_location(true).map_err(net)?;
    easy.connect_timeout(opts.connect_timeout).map_err(net)?;
    easy.timeout(opts.timeout).map_err(net)?;
    easy.progress(true).map_err(net)?;

    {
        let cancel = &opts.cancel;
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(net)?;
        transfer
            .progress_function(|_, _, _, _| !cancel.is_cancelled())
            .map_err(net)?;
        if let Err(e) = transfer.perform() {
            if e.is_aborted_by_callback() && cancel.is_cancelled() {
                return Err(Error::Interrupted);
            }
            return Err(net(e));
        }
    }

    let status = easy.response_code().map_err(net)?;
    tracing::debug!(url, status, bytes = response.len(), "form POST finished");
    if !is_success(status) {
        return Err(Error::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response)
}
