//! `vidl info <url>` – what would be downloaded, without downloading it.

use anyhow::Result;
use std::io::Write;
use vidl_core::naming::Clock;
use vidl_core::pipeline::Pipeline;

use super::interruptible;

pub fn run_info<C: Clock, W: Write>(pipeline: &Pipeline<C>, url: &str, out: &mut W) -> Result<()> {
    let meta = interruptible(|| pipeline.fetch_metadata(url))??;
    writeln!(out, "Title:    {}", meta.title)?;
    writeln!(out, "Video id: {}", meta.resource_id)?;
    writeln!(out, "Quality:  {}", meta.quality)?;
    writeln!(out, "Key:      {}", meta.resource_key)?;
    Ok(())
}
