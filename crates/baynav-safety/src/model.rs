//! Typed safety settings and status models.
//!
//! # Design
//! - Pure data carriers used by the engine and facade.
//! - Category/eligibility values are closed variant sets so adding one is a
//!   compile-time-visible change, not a new magic string.

use serde::Serialize;

use baynav_events::PrivacyLevel;

use crate::catalog;

/// Persisted safety settings, loaded as one unit by the facade.
///
/// Owned exclusively by the engine; the preference store is a durability
/// sink, not a co-owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetySettings {
    /// Whether the quick-exit button is shown.
    pub quick_exit_enabled: bool,
    /// Destination opened by the quick exit; never empty.
    pub quick_exit_url: String,
    /// Durable incognito preference.
    pub incognito_mode_enabled: bool,
    /// Whether safety tips are surfaced before contact.
    pub show_safety_tips: bool,
    /// Whether network privacy warnings are surfaced.
    pub network_warnings_enabled: bool,
    /// Whether the disguised app identity is active.
    pub disguised_mode_enabled: bool,
    /// Selected disguise icon id, absent when none was chosen.
    pub disguised_icon_id: Option<String>,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            quick_exit_enabled: false,
            quick_exit_url: catalog::default_quick_exit_url().to_string(),
            incognito_mode_enabled: false,
            show_safety_tips: true,
            network_warnings_enabled: true,
            disguised_mode_enabled: false,
            disguised_icon_id: None,
        }
    }
}

/// Privacy assessment of the current network transport. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkPrivacyStatus {
    /// Classified privacy level.
    pub level: PrivacyLevel,
    /// Human-readable transport label.
    pub connection_type: String,
    /// Caution text shown to the user, when warranted.
    pub warning: Option<String>,
    /// Actionable suggestion paired with the warning.
    pub suggestion: Option<String>,
}

impl NetworkPrivacyStatus {
    /// Status reported when the transport cannot be determined.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            level: PrivacyLevel::Unknown,
            connection_type: "Unknown".to_string(),
            warning: None,
            suggestion: None,
        }
    }
}

impl Default for NetworkPrivacyStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Advisory outcome of a disguise operation.
///
/// The engine persists the selection only; the actual OS icon swap is
/// delegated to the platform integration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisguiseResult {
    /// Whether the selection was persisted.
    pub success: bool,
    /// User-facing advisory text.
    pub message: String,
    /// Whether the platform may need an app restart before the change shows.
    pub requires_restart: bool,
}

impl DisguiseResult {
    pub(crate) fn applied(message: String) -> Self {
        Self {
            success: true,
            message,
            requires_restart: true,
        }
    }

    pub(crate) fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            requires_restart: false,
        }
    }
}

/// Program categories that warrant extra privacy guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveCategory {
    Crisis,
    DomesticViolence,
    MentalHealth,
    Lgbtq,
    TeenHealth,
    SubstanceAbuse,
    HousingEmergency,
}

impl SensitiveCategory {
    /// Parse a directory category value, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "crisis" => Some(Self::Crisis),
            "domestic-violence" => Some(Self::DomesticViolence),
            "mental-health" => Some(Self::MentalHealth),
            "lgbtq" => Some(Self::Lgbtq),
            "teen-health" => Some(Self::TeenHealth),
            "substance-abuse" => Some(Self::SubstanceAbuse),
            "housing-emergency" => Some(Self::HousingEmergency),
            _ => None,
        }
    }
}

/// Eligibility groups that warrant extra privacy guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveEligibility {
    Lgbtq,
    Youth,
    Immigrants,
    Unhoused,
    Reentry,
}

impl SensitiveEligibility {
    /// Parse a directory eligibility tag, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "lgbtq" => Some(Self::Lgbtq),
            "youth" => Some(Self::Youth),
            "immigrants" => Some(Self::Immigrants),
            "unhoused" => Some(Self::Unhoused),
            "reentry" => Some(Self::Reentry),
            _ => None,
        }
    }
}

/// Neutral destination offered for the quick exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickExitDestination {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

/// One privacy/safety tip shown before contacting a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyTip {
    pub title: &'static str,
    pub body: &'static str,
}

/// Cosmetic app identity used to reduce shoulder-surfing risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisguisedAppIcon {
    pub id: &'static str,
    pub name: &'static str,
    /// Activity alias toggled on Android.
    pub android_alias: &'static str,
    /// Alternate icon name registered on iOS.
    pub ios_icon_name: &'static str,
    /// Glyph shown in pickers.
    pub glyph: &'static str,
    /// Background colour, as a hex string.
    pub background: &'static str,
}
