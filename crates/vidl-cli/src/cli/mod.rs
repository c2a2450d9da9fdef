//! CLI for the vidl video downloader.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use vidl_core::config::{self, VidlConfig};
use vidl_core::error::Error;
use vidl_core::interrupt;
use vidl_core::pipeline::Pipeline;

use commands::{run_bulk, run_completions, run_get, run_info, run_inspect, run_menu};

/// Top-level CLI for vidl.
#[derive(Debug, Parser)]
#[command(name = "vidl")]
#[command(about = "vidl: resolve and download videos through a conversion API", long_about = None)]
pub struct Cli {
    /// Read configuration from PATH instead of ~/.config/vidl/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root for the dated download folders (default: config `output_dir`, then the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Subcommand; the interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a single video.
    Get {
        /// Source video URL.
        url: String,
    },

    /// Download every URL listed in a file (one per line).
    Bulk {
        /// URL list (default: config `bulk_file`, normally ./file.txt).
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Show the search API's raw answer for a URL (debug view).
    Inspect {
        /// Source video URL.
        url: String,
    },

    /// Show title, id and the quality that would be downloaded.
    Info {
        /// Source video URL.
        url: String,
    },

    /// Interactive menu.
    Menu,

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Global options that shape the pipeline.
struct Globals {
    config: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl Globals {
    fn load_config(&self) -> Result<VidlConfig> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    fn pipeline(&self) -> Result<Pipeline> {
        let cfg = self.load_config()?;
        let root = match self.output_dir.clone().or_else(|| cfg.output_dir.clone()) {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        Ok(Pipeline::new(cfg, root).with_cancel(interrupt::sigint_token()))
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let globals = Globals {
            config: cli.config,
            output_dir: cli.output_dir,
        };
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match cli.command.unwrap_or(CliCommand::Menu) {
            CliCommand::Get { url } => run_get(&globals.pipeline()?, &url, &mut out)?,
            CliCommand::Bulk { file } => {
                let pipeline = globals.pipeline()?;
                let list = file.unwrap_or_else(|| pipeline.config().bulk_file.clone());
                run_bulk(&pipeline, &list, &mut out)?;
            }
            CliCommand::Inspect { url } => run_inspect(&globals.pipeline()?, &url, &mut out)?,
            CliCommand::Info { url } => run_info(&globals.pipeline()?, &url, &mut out)?,
            CliCommand::Menu => {
                let pipeline = globals.pipeline()?;
                let stdin = io::stdin();
                run_menu(&pipeline, &mut stdin.lock(), &mut out)?;
            }
            CliCommand::Completions { shell } => run_completions(shell, &mut out)?,
        }

        Ok(())
    }
}

/// True when `err` (or anything it wraps) is a user cancellation.
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<Error>(), Some(Error::Interrupted)))
}

#[cfg(test)]
mod tests;
