//! Error types for preference storage operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for preference storage operations.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// A stored value exists under the key but with a different type.
    #[error("preference value has the wrong type")]
    WrongType {
        /// Key that was read.
        key: String,
        /// Type the caller expected.
        expected: &'static str,
    },
    /// The backing document could not be serialised or parsed.
    #[error("preference document was invalid")]
    Document {
        /// Operation identifier.
        operation: &'static str,
        /// Source serialisation error.
        source: serde_json::Error,
    },
    /// File system access to the backing document failed.
    #[error("preference file access failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path of the backing document.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

/// Convenience alias for preference results.
pub type PrefsResult<T> = Result<T, PrefsError>;
