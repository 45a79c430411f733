//! Pure classification helpers: program sensitivity, safety tips, and
//! network privacy leveling. No IO; every function is deterministic in its
//! inputs.

use baynav_events::PrivacyLevel;
use baynav_platform::Transport;

use crate::catalog::{BASE_SAFETY_TIPS, CRISIS_SAFETY_TIPS};
use crate::model::{NetworkPrivacyStatus, SafetyTip, SensitiveCategory, SensitiveEligibility};

/// Whether a program warrants extra privacy guidance before contact.
///
/// True when the category is in the sensitive-category set, or any
/// eligibility tag is in the sensitive-eligibility set. Matching is
/// case-insensitive on both axes.
#[must_use]
pub fn is_program_sensitive(category: Option<&str>, eligibility_tags: &[String]) -> bool {
    if category.is_some_and(|value| SensitiveCategory::parse(value).is_some()) {
        return true;
    }
    eligibility_tags
        .iter()
        .any(|tag| SensitiveEligibility::parse(tag).is_some())
}

/// Tips to show for a program category, in display order.
///
/// Every category gets the base tips; crisis and domestic-violence programs
/// get the two call-safety tips appended, in fixed order.
#[must_use]
pub fn safety_tips(category: &str) -> Vec<SafetyTip> {
    let mut tips = BASE_SAFETY_TIPS.to_vec();
    if matches!(
        SensitiveCategory::parse(category),
        Some(SensitiveCategory::Crisis | SensitiveCategory::DomesticViolence)
    ) {
        tips.extend_from_slice(&CRISIS_SAFETY_TIPS);
    }
    tips
}

/// Classify a connectivity reading into a privacy status.
///
/// Priority order, first match wins: wifi, cellular, vpn, explicit none.
/// Anything else (including an empty reading) is unknown.
#[must_use]
pub fn classify_transports(reading: &[Transport]) -> NetworkPrivacyStatus {
    if reading.contains(&Transport::Wifi) {
        return NetworkPrivacyStatus {
            level: PrivacyLevel::Caution,
            connection_type: "WiFi".to_string(),
            warning: Some(
                "On shared or public WiFi, the network owner may be able to \
                 see which sites you visit."
                    .to_string(),
            ),
            suggestion: Some(
                "Switch to mobile data or a VPN before viewing sensitive resources.".to_string(),
            ),
        };
    }
    if reading.contains(&Transport::Cellular) {
        return NetworkPrivacyStatus {
            level: PrivacyLevel::Moderate,
            connection_type: "Mobile Data".to_string(),
            warning: None,
            suggestion: None,
        };
    }
    if reading.contains(&Transport::Vpn) {
        return NetworkPrivacyStatus {
            level: PrivacyLevel::Good,
            connection_type: "VPN".to_string(),
            warning: None,
            suggestion: None,
        };
    }
    if reading.contains(&Transport::None) {
        return NetworkPrivacyStatus {
            level: PrivacyLevel::Offline,
            connection_type: "Offline".to_string(),
            warning: Some("No network connection is available.".to_string()),
            suggestion: None,
        };
    }
    NetworkPrivacyStatus::unknown()
}
