//! Terminal progress bars for downloads.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use vidl_core::download::ProgressSink;

const BAR_STYLE: &str = "{prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";

// No Content-Length: bytes so far, no bar.
const SPINNER_STYLE: &str =
    "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const BAR_CHARS: &str = "█▓▒░  ";

fn style(template: &str) -> ProgressStyle {
    match ProgressStyle::with_template(template) {
        Ok(style) => style.tick_chars(TICK).progress_chars(BAR_CHARS),
        Err(_) => ProgressStyle::default_bar(),
    }
}

/// One indicatif bar per transfer (stderr); a spinner when the size is unknown.
/// Bulk item headers go to `log`, the command's output writer.
#[derive(Default)]
pub struct BarProgress<'a> {
    bar: Option<ProgressBar>,
    log: Option<&'a mut dyn Write>,
}

impl<'a> BarProgress<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: &'a mut dyn Write) -> Self {
        Self {
            bar: None,
            log: Some(log),
        }
    }
}

impl ProgressSink for BarProgress<'_> {
    fn item(&mut self, index: usize, total: usize, url: &str) {
        if let Some(log) = self.log.as_mut() {
            if let Err(e) = writeln!(log, "\nProcessing URL {index}/{total}: {url}") {
                tracing::warn!("could not write progress line: {}", e);
            }
        }
    }

    fn start(&mut self, label: &str, total: Option<u64>) {
        let bar = match total {
            Some(len) => ProgressBar::new(len).with_style(style(BAR_STYLE)),
            None => {
                let bar = ProgressBar::new_spinner().with_style(style(SPINNER_STYLE));
                bar.enable_steady_tick(Duration::from_millis(120));
                bar
            }
        };
        bar.set_prefix("Downloading");
        bar.set_message(label.to_string());
        self.bar = Some(bar);
    }

    fn advance(&mut self, bytes: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(bytes);
        }
    }

    fn finish(&mut self, ok: bool) {
        if let Some(bar) = self.bar.take() {
            if ok {
                bar.finish();
            } else {
                bar.abandon();
            }
        }
    }
}
