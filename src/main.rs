//! RenderKit CLI entry point
//!
//! Parses arguments, runs the selected render mode, and turns any fatal
//! error into a formatted message and exit code 1.

use clap::Parser;
use renderkit::cli;
use renderkit::core::error::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
