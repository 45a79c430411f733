//! # Design
//!
//! - Centralize application-level errors for bootstrap and command handling.
//! - Keep error messages constant while carrying context fields for
//!   debugging.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Telemetry error detail.
        detail: anyhow::Error,
    },
    /// Preference store operations failed.
    #[error("preference store operation failed")]
    Prefs {
        /// Operation identifier.
        operation: &'static str,
        /// Source preference error.
        source: baynav_prefs::PrefsError,
    },
    /// Output serialisation failed.
    #[error("output serialisation failed")]
    Serialize {
        /// Operation identifier.
        operation: &'static str,
        /// Source serialisation error.
        source: serde_json::Error,
    },
}

impl AppError {
    pub(crate) const fn telemetry(operation: &'static str, detail: anyhow::Error) -> Self {
        Self::Telemetry { operation, detail }
    }

    pub(crate) const fn prefs(operation: &'static str, source: baynav_prefs::PrefsError) -> Self {
        Self::Prefs { operation, source }
    }

    pub(crate) const fn serialize(operation: &'static str, source: serde_json::Error) -> Self {
        Self::Serialize { operation, source }
    }
}
