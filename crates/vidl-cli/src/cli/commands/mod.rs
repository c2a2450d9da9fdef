//! CLI command handlers, one file per command.

mod bulk;
mod completions;
mod get;
mod info;
mod inspect;
mod menu;

pub use bulk::run_bulk;
pub use completions::run_completions;
pub use get::run_get;
pub use info::run_info;
pub use inspect::run_inspect;
pub use menu::run_menu;

use anyhow::{Context, Result};
use vidl_core::interrupt::SigintGuard;

/// Runs `f` with Ctrl+C routed to the pipeline's cancel token.
fn interruptible<T>(f: impl FnOnce() -> T) -> Result<T> {
    let _guard = SigintGuard::install().context("failed to install Ctrl+C handler")?;
    Ok(f())
}
