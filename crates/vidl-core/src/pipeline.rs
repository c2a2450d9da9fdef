//! Pipeline orchestrator: search → convert → prepare destination → download.
//!
//! Each stage either completes or fails before the next starts; a failure is
//! tagged with its [`Stage`] and short-circuits the run. Nothing is retried.
//! Bulk runs process every URL independently and only stop early when the
//! user interrupts.

use crate::config::VidlConfig;
use crate::convert;
use crate::download::{self, DownloadOptions, ProgressSink};
use crate::error::{Error, FailureKind, Result};
use crate::http::RequestOptions;
use crate::interrupt::CancelToken;
use crate::naming::{self, Clock, DownloadTarget, SystemClock};
use crate::search::{self, VideoMetadata};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchMetadata,
    ResolveLink,
    PrepareDestination,
    Download,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::FetchMetadata => "fetching video info",
            Stage::ResolveLink => "resolving download link",
            Stage::PrepareDestination => "preparing destination",
            Stage::Download => "downloading",
        };
        f.write_str(s)
    }
}

/// A stage error, tagged with the stage that produced it.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub error: Error,
}

impl StageFailure {
    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}

fn at(stage: Stage) -> impl Fn(Error) -> StageFailure {
    move |error| StageFailure { stage, error }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Outcome of one URL in a bulk run.
#[derive(Debug)]
pub struct BulkOutcome {
    pub url: String,
    pub result: Result<Downloaded, StageFailure>,
}

#[derive(Debug, Default)]
pub struct BulkReport {
    /// One entry per attempted URL, in input order.
    pub outcomes: Vec<BulkOutcome>,
    /// True when Ctrl+C stopped the batch before every URL was attempted.
    pub interrupted: bool,
}

impl BulkReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// URLs from a line-delimited list: one per line, surrounding whitespace
/// trimmed, blank lines skipped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a bulk input file. A missing file is a filesystem failure.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
    Ok(parse_url_list(&text))
}

/// Resolves and downloads videos into `output_root/DDMMYYYY/`.
pub struct Pipeline<C: Clock = SystemClock> {
    config: VidlConfig,
    output_root: PathBuf,
    clock: C,
    cancel: CancelToken,
}

impl Pipeline<SystemClock> {
    pub fn new(config: VidlConfig, output_root: impl Into<PathBuf>) -> Self {
        Self::with_clock(config, output_root, SystemClock)
    }
}

impl<C: Clock> Pipeline<C> {
    pub fn with_clock(config: VidlConfig, output_root: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            config,
            output_root: output_root.into(),
            clock,
            cancel: CancelToken::new(),
        }
    }

    /// Use `cancel` (e.g. [`crate::interrupt::sigint_token`]) to abort runs.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &VidlConfig {
        &self.config
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn request_options(&self) -> RequestOptions {
        RequestOptions::from_config(&self.config, self.cancel.clone())
    }

    /// Metadata for `url` without downloading anything.
    pub fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata> {
        search::fetch_metadata(
            url,
            &self.config.search_url,
            self.config.quality,
            &self.request_options(),
        )
    }

    /// Raw search response for `url` (debug view).
    pub fn search_raw(&self, url: &str) -> Result<serde_json::Value> {
        search::search_raw(url, &self.config.search_url, &self.request_options())
    }

    /// Creates today's folder and picks a free file name for `title`.
    pub fn prepare_destination(&self, title: &str) -> Result<DownloadTarget> {
        let folder = naming::ensure_date_folder(&self.output_root, &self.clock)?;
        let file_name = naming::next_available_name(&folder, &naming::sanitize_title(title));
        Ok(DownloadTarget { folder, file_name })
    }

    /// Runs every stage for one URL.
    pub fn process_one(
        &self,
        url: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<Downloaded, StageFailure> {
        tracing::info!(url, "processing");
        let result = self.run_stages(url, progress);
        match &result {
            Ok(done) => tracing::info!(
                url,
                path = %done.path.display(),
                bytes = done.bytes,
                "done"
            ),
            Err(failure) => tracing::warn!(url, stage = ?failure.stage, "{}", failure),
        }
        result
    }

    fn run_stages(
        &self,
        url: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<Downloaded, StageFailure> {
        let meta = self
            .cancel
            .check()
            .and_then(|()| self.fetch_metadata(url))
            .map_err(at(Stage::FetchMetadata))?;

        let link = self
            .cancel
            .check()
            .and_then(|()| {
                convert::resolve_link(
                    &meta.resource_id,
                    &meta.resource_key,
                    &self.config.convert_url,
                    &self.request_options(),
                )
            })
            .map_err(at(Stage::ResolveLink))?;

        let target = self
            .prepare_destination(&meta.title)
            .map_err(at(Stage::PrepareDestination))?;
        let path = target.path();

        let opts = DownloadOptions::from_config(&self.config, self.cancel.clone());
        let bytes =
            download::download(&link, &path, &opts, progress).map_err(at(Stage::Download))?;

        Ok(Downloaded { path, bytes })
    }

    /// Processes each URL in order. A failed URL does not stop the batch;
    /// an interrupt does.
    pub fn process_bulk<S: AsRef<str>>(
        &self,
        urls: &[S],
        progress: &mut dyn ProgressSink,
    ) -> BulkReport {
        let total = urls.len();
        let mut report = BulkReport::default();

        for (i, url) in urls.iter().enumerate() {
            let url = url.as_ref();
            progress.item(i + 1, total, url);
            let result = self.process_one(url, progress);
            let stop = matches!(&result, Err(f) if f.kind() == FailureKind::Interrupted);
            report.outcomes.push(BulkOutcome {
                url: url.to_string(),
                result,
            });
            if stop {
                report.interrupted = true;
                break;
            }
        }

        tracing::info!(
            total,
            succeeded = report.succeeded(),
            failed = report.failed(),
            interrupted = report.interrupted,
            "bulk run finished"
        );
        report
    }
}
