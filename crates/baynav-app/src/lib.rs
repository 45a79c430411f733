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

//! Bay Navigator safety diagnostic wiring.
//!
//! Layout: `cli.rs` (argument surface), `bootstrap.rs` (service wiring and
//! command execution), `error.rs`.

/// Application bootstrap and command execution.
pub mod bootstrap;
/// Command-line argument surface.
pub mod cli;
/// Application-level errors.
pub mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
