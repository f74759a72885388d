//! Restgate CLI
//!
//! Reads a generation request and writes one Rust module per annotated
//! input file, plus `mod.rs`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::process::ExitCode;

use clap::Parser;
use restgate_cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) => {
            println!("restgate: generated {} code, {} files", summary.mode, summary.files.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("restgate: {}", e);
            ExitCode::FAILURE
        }
    }
}
