//! File materializer: stream a direct link to disk with a single GET.
//!
//! The body is written chunk by chunk as libcurl delivers it (at most
//! `chunk_size` bytes each), so memory use does not grow with file size.

mod progress;

pub use progress::{NoProgress, ProgressSink};

use crate::config::VidlConfig;
use crate::error::{Error, Result};
use crate::http::is_success;
use crate::interrupt::CancelToken;
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::str;
use std::time::Duration;

/// Settings for one streamed download.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// libcurl receive buffer size; upper bound of each written chunk.
    pub chunk_size: usize,
    pub connect_timeout: Duration,
    /// Abort when the rate stays below `low_speed_bytes`/s for `low_speed_time`.
    pub low_speed_bytes: u32,
    pub low_speed_time: Duration,
    /// Remove the partial file on failure instead of leaving it in place.
    pub discard_partial: bool,
    pub cancel: CancelToken,
}

impl DownloadOptions {
    pub fn from_config(cfg: &VidlConfig, cancel: CancelToken) -> Self {
        Self {
            chunk_size: cfg.chunk_size,
            connect_timeout: cfg.timeouts.connect(),
            low_speed_bytes: cfg.timeouts.low_speed_bytes,
            low_speed_time: cfg.timeouts.low_speed_time(),
            discard_partial: cfg.discard_partial,
            cancel,
        }
    }
}

/// Transfer state shared by the curl callbacks.
struct Sink<'a> {
    destination: &'a Path,
    label: String,
    file: Option<File>,
    created: bool,
    written: u64,
    content_length: Option<u64>,
    started: bool,
    failure: Option<Error>,
    progress: &'a mut dyn ProgressSink,
}

impl<'a> Sink<'a> {
    fn new(destination: &'a Path, progress: &'a mut dyn ProgressSink) -> Self {
        let label = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| destination.display().to_string());
        Self {
            destination,
            label,
            file: None,
            created: false,
            written: 0,
            content_length: None,
            started: false,
            failure: None,
            progress,
        }
    }

    /// Tracks `Content-Length` of the last response in a redirect chain.
    fn header_line(&mut self, line: &str) {
        if line.starts_with("HTTP/") {
            self.content_length = None;
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    fn begin(&mut self) {
        if !self.started {
            self.started = true;
            self.progress.start(&self.label, self.content_length);
        }
    }

    fn create_file(&mut self) -> Result<()> {
        if !self.created {
            let file = File::create(self.destination).map_err(|e| Error::fs(self.destination, e))?;
            self.file = Some(file);
            self.created = true;
        }
        Ok(())
    }

    fn write_chunk(&mut self, data: &[u8]) -> Result<()> {
        self.begin();
        self.create_file()?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(data)
                .map_err(|e| Error::fs(self.destination, e))?;
        }
        self.written += data.len() as u64;
        self.progress.advance(data.len() as u64);
        Ok(())
    }

    /// Successful transfer: make sure the file exists (empty bodies never hit
    /// the write callback) and report completion.
    fn complete(mut self, discard_partial: bool) -> Result<u64> {
        self.begin();
        if let Err(e) = self.create_file() {
            return Err(self.abandon(e, discard_partial));
        }
        if let Some(file) = self.file.take() {
            if let Err(e) = file.sync_all() {
                let err = Error::fs(self.destination, e);
                return Err(self.abandon(err, discard_partial));
            }
        }
        self.progress.finish(true);
        Ok(self.written)
    }

    /// Failed transfer: report, optionally remove the partial file, return `err`.
    fn abandon(mut self, err: Error, discard_partial: bool) -> Error {
        if self.started {
            self.progress.finish(false);
        }
        drop(self.file.take());
        if self.created {
            if discard_partial {
                match fs::remove_file(self.destination) {
                    Ok(()) => tracing::debug!(path = %self.destination.display(), "removed partial file"),
                    Err(e) => tracing::warn!(path = %self.destination.display(), "could not remove partial file: {}", e),
                }
            } else {
                tracing::warn!(
                    path = %self.destination.display(),
                    bytes = self.written,
                    "download failed; partial file left in place"
                );
            }
        }
        err
    }
}

/// Streams `url` to `destination` and returns the number of bytes written.
///
/// Follows redirects. The file is created when the first body chunk arrives
/// (or after an empty successful transfer), so HTTP errors leave no file behind.
/// A missing `Content-Length` only makes progress indeterminate.
pub fn download(
    url: &str,
    destination: &Path,
    opts: &DownloadOptions,
    progress: &mut dyn ProgressSink,
) -> Result<u64> {
    opts.cancel.check()?;
    let net = |e: curl::Error| Error::transport(url, e);

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(net)?;
    easy.get(true).map_err(net)?;
    easy.follow_location(true).map_err(net)?;
    easy.max_redirections(10).map_err(net)?;
    easy.fail_on_error(true).map_err(net)?;
    easy.buffer_size(opts.chunk_size).map_err(net)?;
    easy.connect_timeout(opts.connect_timeout).map_err(net)?;
    easy.low_speed_limit(opts.low_speed_bytes).map_err(net)?;
    easy.low_speed_time(opts.low_speed_time).map_err(net)?;
    easy.progress(true).map_err(net)?;

    let sink = RefCell::new(Sink::new(destination, progress));
    let cancel = &opts.cancel;
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    sink.borrow_mut().header_line(line.trim_end());
                }
                true
            })
            .map_err(net)?;
        transfer
            .write_function(|data| {
                let mut sink = sink.borrow_mut();
                if cancel.is_cancelled() {
                    sink.failure = Some(Error::Interrupted);
                    return Ok(0); // abort transfer
                }
                match sink.write_chunk(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        tracing::warn!("download write failed: {}", e);
                        sink.failure = Some(e);
                        Ok(0)
                    }
                }
            })
            .map_err(net)?;
        transfer
            .progress_function(|_, _, _, _| !cancel.is_cancelled())
            .map_err(net)?;
        transfer.perform()
    };

    let mut sink = sink.into_inner();
    let status = easy.response_code().unwrap_or(0);

    if let Err(e) = performed {
        let err = match sink.failure.take() {
            Some(failure) => failure,
            None if e.is_aborted_by_callback() && cancel.is_cancelled() => Error::Interrupted,
            None if e.is_http_returned_error() && status >= 400 => Error::Status {
                url: url.to_string(),
                status,
            },
            None => net(e),
        };
        return Err(sink.abandon(err, opts.discard_partial));
    }

    if !is_success(status) {
        let err = Error::Status {
            url: url.to_string(),
            status,
        };
        return Err(sink.abandon(err, opts.discard_partial));
    }

    let written = sink.complete(opts.discard_partial)?;
    tracing::info!(path = %destination.display(), bytes = written, "download complete");
    Ok(written)
}
