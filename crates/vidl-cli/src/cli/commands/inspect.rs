//! `vidl inspect <url>` – debug view of the raw search response.

use anyhow::Result;
use std::io::Write;
use vidl_core::naming::Clock;
use vidl_core::pipeline::Pipeline;
use vidl_core::search::debug_summary;

use super::interruptible;

const RULE: &str = "--------------------------------------------------";

pub fn run_inspect<C: Clock, W: Write>(
    pipeline: &Pipeline<C>,
    url: &str,
    out: &mut W,
) -> Result<()> {
    let raw = interruptible(|| pipeline.search_raw(url))??;
    writeln!(out, "\nAPI Response:")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{:#}", debug_summary(&raw))?;
    writeln!(out, "{RULE}")?;
    Ok(())
}
