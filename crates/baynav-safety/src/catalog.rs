//! Static catalogs: quick-exit destinations, disguise icons, safety tips.
//!
//! # Design
//! - Catalog order is part of the contract: the first destination is the
//!   quick-exit default, the first icon is the disguise fallback, and tip
//!   order is stable for display.

use crate::model::{DisguisedAppIcon, QuickExitDestination, SafetyTip};

/// Neutral destinations offered for the quick exit.
pub const QUICK_EXIT_DESTINATIONS: [QuickExitDestination; 4] = [
    QuickExitDestination {
        id: "google",
        name: "Google",
        url: "https://www.google.com",
        description: "A blank search page",
    },
    QuickExitDestination {
        id: "weather",
        name: "Weather",
        url: "https://www.weather.gov",
        description: "The national weather forecast",
    },
    QuickExitDestination {
        id: "news",
        name: "News",
        url: "https://apnews.com",
        description: "General news headlines",
    },
    QuickExitDestination {
        id: "recipes",
        name: "Recipes",
        url: "https://www.allrecipes.com",
        description: "A recipe site",
    },
];

/// Disguised app identities. The first entry is the fallback when a stored
/// icon id is no longer recognised.
pub const DISGUISED_ICONS: [DisguisedAppIcon; 4] = [
    DisguisedAppIcon {
        id: "calculator",
        name: "Calculator",
        android_alias: "CalculatorAlias",
        ios_icon_name: "AppIconCalculator",
        glyph: "🧮",
        background: "#4A4A4A",
    },
    DisguisedAppIcon {
        id: "weather",
        name: "Weather",
        android_alias: "WeatherAlias",
        ios_icon_name: "AppIconWeather",
        glyph: "⛅",
        background: "#3B7DD8",
    },
    DisguisedAppIcon {
        id: "notes",
        name: "Notes",
        android_alias: "NotesAlias",
        ios_icon_name: "AppIconNotes",
        glyph: "📝",
        background: "#E6B800",
    },
    DisguisedAppIcon {
        id: "clock",
        name: "Clock",
        android_alias: "ClockAlias",
        ios_icon_name: "AppIconClock",
        glyph: "🕐",
        background: "#2D2D2D",
    },
];

/// Tips shown for every program.
pub const BASE_SAFETY_TIPS: [SafetyTip; 3] = [
    SafetyTip {
        title: "Use a safe device",
        body: "If someone may be monitoring your phone or computer, use one \
               they cannot access, such as a public library computer.",
    },
    SafetyTip {
        title: "You can leave quickly",
        body: "The quick exit button clears your activity here and opens a \
               neutral site in one tap.",
    },
    SafetyTip {
        title: "Browse privately",
        body: "Turn on incognito mode in safety settings and nothing you \
               view or search here is saved.",
    },
];

/// Tips appended, in order, for crisis and domestic-violence programs.
pub const CRISIS_SAFETY_TIPS: [SafetyTip; 2] = [
    SafetyTip {
        title: "Block your caller ID",
        body: "Dial *67 before the number so your phone number is not shown \
               to the line you are calling.",
    },
    SafetyTip {
        title: "Plan your call",
        body: "Call at a time when the person you are concerned about is not \
               nearby, and decide beforehand what you can safely say.",
    },
];

/// URL used when no quick-exit destination was ever chosen.
#[must_use]
pub fn default_quick_exit_url() -> &'static str {
    QUICK_EXIT_DESTINATIONS[0].url
}

/// Look up a quick-exit destination by id.
#[must_use]
pub fn destination_by_id(id: &str) -> Option<&'static QuickExitDestination> {
    QUICK_EXIT_DESTINATIONS
        .iter()
        .find(|destination| destination.id == id)
}

/// Look up a disguise icon by id.
#[must_use]
pub fn icon_by_id(id: &str) -> Option<&'static DisguisedAppIcon> {
    DISGUISED_ICONS.iter().find(|icon| icon.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quick_exit_url_is_first_destination() {
        assert_eq!(default_quick_exit_url(), "https://www.google.com");
        assert_eq!(QUICK_EXIT_DESTINATIONS[0].id, "google");
    }

    #[test]
    fn destination_lookup_by_id() {
        assert_eq!(
            destination_by_id("weather").map(|d| d.url),
            Some("https://www.weather.gov")
        );
        assert!(destination_by_id("casino").is_none());
    }

    #[test]
    fn icon_ids_are_unique() {
        for (i, icon) in DISGUISED_ICONS.iter().enumerate() {
            for other in &DISGUISED_ICONS[i + 1..] {
                assert_ne!(icon.id, other.id);
            }
            assert_eq!(icon_by_id(icon.id), Some(icon));
        }
    }
}
