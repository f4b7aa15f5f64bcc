//! Xyston CLI binary.

use clap::Parser;
use std::process;
use xyston::cli::{args::XystonArgs, commands::execute_command};

fn main() {
    // Parse command line arguments using clap
    let args = XystonArgs::parse();

    // Map CLI verbosity onto the logger unless RUST_LOG overrides it.
    let default_level = match args.verbosity() {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
