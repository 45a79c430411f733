#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint that wires the safety services together and runs the
//! requested diagnostic command.

use baynav_app::cli::Cli;
use baynav_app::{AppResult, run_app};
use clap::Parser;

/// Parses arguments, bootstraps the safety services, and runs one command.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app(Cli::parse()).await
}
