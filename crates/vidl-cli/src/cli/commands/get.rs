//! `vidl get <url>` – resolve and download one video.

use anyhow::Result;
use std::io::Write;
use vidl_core::naming::Clock;
use vidl_core::pipeline::{Downloaded, Pipeline, StageFailure};

use super::interruptible;
use crate::cli::progress::BarProgress;

/// Runs the whole pipeline for `url` with a progress bar.
pub(super) fn download_one<C: Clock>(
    pipeline: &Pipeline<C>,
    url: &str,
) -> Result<Result<Downloaded, StageFailure>> {
    let mut bar = BarProgress::new();
    interruptible(|| pipeline.process_one(url, &mut bar))
}

pub(super) fn print_saved<W: Write>(out: &mut W, done: &Downloaded) -> Result<()> {
    writeln!(
        out,
        "Successfully downloaded: {} ({} bytes)",
        done.path.display(),
        done.bytes
    )?;
    Ok(())
}

pub fn run_get<C: Clock, W: Write>(pipeline: &Pipeline<C>, url: &str, out: &mut W) -> Result<()> {
    writeln!(out, "\nProcessing: {url}")?;
    let done = download_one(pipeline, url)??;
    print_saved(out, &done)
}
