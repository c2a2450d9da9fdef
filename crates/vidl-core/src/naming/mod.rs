//! Destination naming: date folders and collision-free `.mp4` file names.

mod date_folder;
mod sanitize;

pub use date_folder::{date_folder_name, ensure_date_folder, Clock, FixedClock, SystemClock};
pub use sanitize::sanitize_title;

use std::path::{Path, PathBuf};

/// Extension appended to every downloaded video.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Folder and file name a download will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub folder: PathBuf,
    pub file_name: String,
}

impl DownloadTarget {
    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }
}

/// First free name for `title` in `folder`.
///
/// Tries `{title}.mp4`, then `1_{title}.mp4`, `2_{title}.mp4`, ... and returns the
/// first that does not exist. Only reads the filesystem; nothing is reserved, so
/// two callers racing on the same folder can pick the same name.
pub fn next_available_name(folder: &Path, title: &str) -> String {
    let base = format!("{title}.{VIDEO_EXTENSION}");
    if !folder.join(&base).exists() {
        return base;
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{counter}_{title}.{VIDEO_EXTENSION}");
        if !folder.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}
