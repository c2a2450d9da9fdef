use vidl_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // A read-only state dir must not stop the CLI; log to stderr instead.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args() {
        if cli::is_interrupted(&err) {
            println!("\nOperation cancelled by user.");
            std::process::exit(130);
        }
        eprintln!("vidl error: {:#}", err);
        std::process::exit(1);
    }
}
