//! Safety-state management for the Bay Navigator resource directory.
//!
//! The engine (`SafetyService`) is the single source of truth for persisted
//! safety settings and transient session history; all mutations pass through
//! it. The facade (`SafetyController`) wraps the engine for reactive UI,
//! emitting immutable [`SafetyViewState`] snapshots over a watch channel.
//!
//! Layout: `model.rs` (typed settings and status models), `catalog.rs`
//! (static destination/icon/tip catalogs), `classify.rs` (pure sensitivity
//! and network classification), `history.rs` (history list discipline),
//! `service.rs` (`SafetyService`), `controller.rs` (`SafetyController`).

pub mod catalog;
pub mod classify;
pub mod controller;
pub mod history;
pub mod model;
pub mod service;

pub use classify::{classify_transports, is_program_sensitive, safety_tips};
pub use controller::{SafetyController, SafetyViewState};
pub use history::{HistoryList, PERSISTED_HISTORY_CAP, SESSION_HISTORY_CAP};
pub use model::{
    DisguiseResult, DisguisedAppIcon, NetworkPrivacyStatus, QuickExitDestination, SafetySettings,
    SafetyTip, SensitiveCategory, SensitiveEligibility,
};
pub use service::{NetworkPrivacyStream, SafetyService};
