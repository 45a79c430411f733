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

//! Durable preference storage seam for the safety subsystem.
//!
//! Layout: `store.rs` (the `PreferenceStore` trait and value model), `keys.rs`
//! (the stable on-disk key contract), `memory.rs` (in-memory store),
//! `file.rs` (JSON-file-backed store for desktop hosts), `error.rs`.

pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
pub mod store;

pub use error::{PrefsError, PrefsResult};
pub use file::JsonFilePrefs;
pub use memory::MemoryPrefs;
pub use store::{PrefValue, PreferenceStore};
