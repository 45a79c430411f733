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

//! Shared test helpers used across the safety integration suites.
//! Layout: mocks.rs (scriptable collaborator fakes), log.rs (cross-fake
//! invocation recording for ordering assertions).

pub mod log;
pub mod mocks;

pub use log::InvocationLog;
pub use mocks::{RecordingConcealer, RecordingLauncher, ScriptedConnectivity, ScriptedPrefs};
