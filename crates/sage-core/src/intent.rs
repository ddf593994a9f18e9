//! Intent derivation from decoded assistant text.
//!
//! The assistant's replies name the control the trainee should press
//! ("Press the Cancel button to stop printing."). Intent derivation is
//! deliberately shallow: lower-case the text and take the first keyword
//! from an ordered table that occurs as a substring.

use serde::{Deserialize, Serialize};

/// Simulator controls that can be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetId {
    PowerButton,
    CancelButton,
    RestartButton,
}

impl TargetId {
    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetId::PowerButton => "PowerButton",
            TargetId::CancelButton => "CancelButton",
            TargetId::RestartButton => "RestartButton",
        }
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword-to-target table, evaluated in declaration order.
///
/// The order is a behavioral contract, not an implementation detail: when
/// keywords overlap, the earlier entry wins ("restart" must be tried before
/// "reset"). Keep this a slice, never an unordered map.
pub const KEYWORD_TARGETS: &[(&str, TargetId)] = &[
    ("power on", TargetId::PowerButton),
    ("power button", TargetId::PowerButton),
    ("turn on", TargetId::PowerButton),
    ("press power", TargetId::PowerButton),
    ("start printer", TargetId::PowerButton),
    ("cancel", TargetId::CancelButton),
    ("stop print", TargetId::CancelButton),
    ("stop printing", TargetId::CancelButton),
    ("abort", TargetId::CancelButton),
    ("restart", TargetId::RestartButton),
    ("reset", TargetId::RestartButton),
    ("reboot", TargetId::RestartButton),
];

/// Derives the control an assistant reply is talking about, if any.
///
/// Returns `None` when no keyword matches; callers treat that as "clear all
/// highlights" rather than as an error.
///
/// # Examples
///
/// ```
/// use sage_core::intent::{TargetId, map_intent};
///
/// assert_eq!(map_intent("Press the Cancel button."), Some(TargetId::CancelButton));
/// assert_eq!(map_intent("no idea"), None);
/// ```
pub fn map_intent(text: &str) -> Option<TargetId> {
    let lowered = text.to_lowercase();
    let lowered = lowered.trim();

    KEYWORD_TARGETS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, target)| *target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_button_phrases() {
        assert_eq!(
            map_intent("Please press power button now"),
            Some(TargetId::PowerButton)
        );
        assert_eq!(
            map_intent("Turn on the printer first."),
            Some(TargetId::PowerButton)
        );
    }

    #[test]
    fn test_cancel_and_restart_phrases() {
        assert_eq!(
            map_intent("Press Cancel to stop the job"),
            Some(TargetId::CancelButton)
        );
        assert_eq!(
            map_intent("please restart the device"),
            Some(TargetId::RestartButton)
        );
        assert_eq!(
            map_intent("you may need to reset it"),
            Some(TargetId::RestartButton)
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(map_intent("no idea"), None);
        assert_eq!(map_intent(""), None);
    }

    #[test]
    fn test_match_is_case_insensitive_and_trimmed() {
        assert_eq!(map_intent("  ABORT THE PRINT  "), Some(TargetId::CancelButton));
    }

    #[test]
    fn test_declaration_order_resolves_overlaps() {
        // "restart" precedes "reset" in the table; an input containing both
        // must resolve through the earlier entry.
        let restart_pos = KEYWORD_TARGETS
            .iter()
            .position(|(k, _)| *k == "restart")
            .unwrap();
        let reset_pos = KEYWORD_TARGETS
            .iter()
            .position(|(k, _)| *k == "reset")
            .unwrap();
        assert!(restart_pos < reset_pos);
        assert_eq!(
            map_intent("reset by pressing restart"),
            Some(TargetId::RestartButton)
        );
    }
}
