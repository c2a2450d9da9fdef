//! Date-stamped output folders (`DDMMYYYY`) with an injectable clock.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of "today" for folder naming.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always returns the same date (tests, reproducible runs).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Folder name for `date`, e.g. 19 Oct 2026 → `19102026`.
pub fn date_folder_name(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

/// Creates `root/DDMMYYYY` (and any missing parents) and returns its path.
pub fn ensure_date_folder(root: &Path, clock: &dyn Clock) -> Result<PathBuf> {
    let folder = root.join(date_folder_name(clock.today()));
    fs::create_dir_all(&folder).map_err(|e| Error::fs(&folder, e))?;
    Ok(folder)
}
