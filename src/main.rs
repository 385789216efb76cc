//! `reel`: cut clips out of a movie library.
//!
//! Finds a movie by fuzzy title (or takes a path), asks for the clip range,
//! picks an audio stream, and has ffmpeg cut the clip. See `reel --help`.

mod app;
mod cli;
mod error;
mod prompt;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_TARGETS: [&str; 7] =
    ["reel", "reel_scan", "reel_cache", "reel_match", "reel_plan", "reel_config", "reel_ffmpeg"];

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);
    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        },
    }
}

fn failure_message(err: &error::Error) -> String {
    let mut message = format!("Error: {err:?}");
    if err.is_retryable() {
        message.push_str("\nThis may work if you run the same command again.");
    }
    message
}

/// `RUST_LOG` wins; otherwise our own crates log at a level set by `-v`.
fn init_logging(verbosity: u8) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbosity).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    LOG_TARGETS.map(|target| format!("{target}={level}")).join(",")
}
