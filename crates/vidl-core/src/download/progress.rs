//! Progress reporting hooks for the file materializer and bulk runs.

/// Receives download progress. The CLI renders it as a progress bar; library
/// callers that don't care pass [`NoProgress`].
pub trait ProgressSink {
    /// A bulk run is about to process item `index` (1-based) of `total`.
    fn item(&mut self, _index: usize, _total: usize, _url: &str) {}

    /// The body transfer for `label` began. `total` is the `Content-Length`,
    /// or `None` when the server did not send one (indeterminate progress).
    fn start(&mut self, label: &str, total: Option<u64>);

    /// `bytes` more were written to disk.
    fn advance(&mut self, bytes: u64);

    /// The transfer ended; `ok` is false when it failed or was interrupted.
    fn finish(&mut self, ok: bool);
}

/// Discards all progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&mut self, _label: &str, _total: Option<u64>) {}
    fn advance(&mut self, _bytes: u64) {}
    fn finish(&mut self, _ok: bool) {}
}
