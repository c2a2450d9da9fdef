//! Interactive menu, the default when no subcommand is given.
//!
//! Reads choices line by line from any `BufRead` so it can be driven from
//! tests. End of input exits like option 4. Ctrl+C, at a prompt or during a
//! download, returns `Interrupted` and ends the program.

use anyhow::{Context, Result};
use std::io::{BufRead, ErrorKind, Write};
use vidl_core::interrupt::{CancelToken, SigintGuard};
use vidl_core::naming::Clock;
use vidl_core::pipeline::Pipeline;

use super::get::{download_one, print_saved};
use super::{run_bulk, run_inspect};
use crate::cli::is_interrupted;

const MENU: &str = "\nvidl video downloader
1. Download single video
2. Bulk download from file
3. Debug mode (show JSON response)
4. Exit";

/// One trimmed line, or `None` at end of input.
///
/// `BufRead::read_line` retries on `EINTR`, which would leave Ctrl+C waiting
/// for the next newline; this loop checks `cancel` after every interrupted read.
fn read_line<R: BufRead>(input: &mut R, cancel: &CancelToken) -> Result<Option<String>> {
    let mut line = Vec::new();
    loop {
        cancel.check()?;
        let (used, done) = match input.fill_buf() {
            Ok([]) => (0, true),
            Ok(available) => match available.iter().position(|&b| b == b'\n') {
                Some(end) => {
                    line.extend_from_slice(&available[..=end]);
                    (end + 1, true)
                }
                None => {
                    line.extend_from_slice(available);
                    (available.len(), false)
                }
            },
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        input.consume(used);
        if done {
            break;
        }
    }
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    cancel: &CancelToken,
    text: &str,
) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    read_line(input, cancel)
}

/// Prints a non-fatal error and returns to the menu; cancellation still ends the run.
fn report<W: Write>(out: &mut W, what: &str, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if is_interrupted(&err) => Err(err),
        Err(err) => {
            writeln!(out, "\nError in {what}: {err:#}")?;
            Ok(())
        }
    }
}

pub fn run_menu<C: Clock, R: BufRead, W: Write>(
    pipeline: &Pipeline<C>,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let _guard = SigintGuard::install().context("failed to install Ctrl+C handler")?;
    let cancel = pipeline.cancel_token();

    loop {
        writeln!(out, "{MENU}")?;
        let Some(choice) = prompt(input, out, cancel, "\nEnter your choice (1-4): ")? else {
            writeln!(out)?;
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let Some(url) = prompt(input, out, cancel, "\nEnter video URL: ")? else {
                    return Ok(());
                };
                if url.is_empty() {
                    writeln!(out, "Error: URL cannot be empty!")?;
                    continue;
                }
                writeln!(out, "\nProcessing: {url}")?;
                let result = match download_one(pipeline, &url)? {
                    Ok(done) => print_saved(out, &done),
                    Err(failure) => Err(failure.into()),
                };
                report(out, "download", result)?;
            }
            "2" => {
                let list = pipeline.config().bulk_file.clone();
                let result = run_bulk(pipeline, &list, out);
                report(out, "bulk download", result)?;
            }
            "3" => {
                let Some(url) = prompt(input, out, cancel, "\nEnter video URL: ")? else {
                    return Ok(());
                };
                if url.is_empty() {
                    writeln!(out, "Error: URL cannot be empty!")?;
                    continue;
                }
                let result = run_inspect(pipeline, &url, out);
                report(out, "debug mode", result)?;
            }
            "4" => {
                writeln!(out, "\nExiting...")?;
                return Ok(());
            }
            _ => writeln!(out, "\nInvalid choice! Please try again.")?,
        }
    }
}
