//! `vidl bulk [--file PATH]` – download every URL in a line-delimited list.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use vidl_core::error::Error;
use vidl_core::naming::Clock;
use vidl_core::pipeline::{self, Pipeline};

use super::interruptible;
use crate::cli::progress::BarProgress;

/// Processes the list at `list`. Individual failures are reported and
/// skipped; only an unreadable list or Ctrl+C make this return `Err`.
pub fn run_bulk<C: Clock, W: Write>(pipeline: &Pipeline<C>, list: &Path, out: &mut W) -> Result<()> {
    let urls = pipeline::read_url_list(list)
        .with_context(|| format!("cannot read URL list {}", list.display()))?;
    if urls.is_empty() {
        writeln!(out, "No URLs found in {}", list.display())?;
        return Ok(());
    }
    writeln!(out, "\nFound {} URLs in {}", urls.len(), list.display())?;

    let report = {
        let mut bar = BarProgress::with_log(&mut *out);
        interruptible(|| pipeline.process_bulk(&urls[..], &mut bar))?
    };

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(done) => writeln!(out, "  ok      {}", done.path.display())?,
            Err(failure) => writeln!(out, "  failed  {}: {}", outcome.url, failure)?,
        }
    }
    writeln!(
        out,
        "Bulk download finished: {} succeeded, {} failed.",
        report.succeeded(),
        report.failed()
    )?;

    if report.interrupted {
        return Err(Error::Interrupted.into());
    }
    Ok(())
}
