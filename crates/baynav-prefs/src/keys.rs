//! Stable key names for persisted safety settings.
//!
//! # Design
//! - These names form the on-disk contract and must stay stable across app
//!   versions; renaming one silently resets the user's setting.
//! - History caps are enforced by the safety engine, not the store.

/// Whether the quick-exit button is shown (bool, default false).
pub const QUICK_EXIT_ENABLED: &str = "quick_exit_enabled";
/// Destination opened by the quick exit (string, default = first catalog entry).
pub const QUICK_EXIT_URL: &str = "quick_exit_url";
/// Durable incognito preference (bool, default false).
pub const INCOGNITO_MODE: &str = "incognito_mode";
/// Whether safety tips are surfaced before contact (bool, default true).
pub const SHOW_SAFETY_TIPS: &str = "show_safety_tips";
/// Whether network privacy warnings are surfaced (bool, default true).
pub const NETWORK_WARNINGS: &str = "network_warnings";
/// Persisted recently-viewed program ids (list, most-recent-first, max 20).
pub const RECENT_PROGRAMS: &str = "recent_programs";
/// Persisted search queries (list, most-recent-first, max 20).
pub const SEARCH_HISTORY: &str = "search_history";
/// Whether the disguised app identity is active (bool, default false).
pub const DISGUISED_MODE: &str = "disguised_mode";
/// Selected disguise icon id (string, absent = none).
pub const DISGUISED_ICON: &str = "disguised_icon";
