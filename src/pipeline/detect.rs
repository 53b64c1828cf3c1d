//! Change detection between the fetched and the persisted report.
//!
//! The detector only looks at digests. What a detection implies for the
//! tick is encoded here as well so callers never re-derive it:
//!
//! | Detection   | persist | notify |
//! |-------------|---------|--------|
//! | `FirstSeen` | yes     | no     |
//! | `Unchanged` | no      | no     |
//! | `Changed`   | yes     | yes    |

use std::fmt;

use serde::Serialize;

use crate::models::ContentDigest;

/// Outcome of comparing two report digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Detection {
    /// No report was persisted before
    FirstSeen,
    /// Same content as the persisted report
    Unchanged,
    /// Content differs from the persisted report
    Changed,
}

impl Detection {
    /// Whether the fetched report replaces the persisted one.
    pub fn should_persist(self) -> bool {
        matches!(self, Self::FirstSeen | Self::Changed)
    }

    /// Whether the recipient hears about it.
    pub fn should_notify(self) -> bool {
        matches!(self, Self::Changed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstSeen => "first_seen",
            Self::Unchanged => "unchanged",
            Self::Changed => "changed",
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the digest of a freshly fetched report with the persisted one.
pub fn detect_change(current: &ContentDigest, previous: Option<&ContentDigest>) -> Detection {
    match previous {
        None => Detection::FirstSeen,
        Some(previous) if previous == current => Detection::Unchanged,
        Some(_) => Detection::Changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::digest::digest_text;

    #[test]
    fn test_first_seen() {
        let current = digest_text("bulletin");
        let detection = detect_change(&current, None);
        assert_eq!(detection, Detection::FirstSeen);
        assert!(detection.should_persist());
        assert!(!detection.should_notify());
    }

    #[test]
    fn test_unchanged() {
        let current = digest_text("bulletin");
        let previous = digest_text("bulletin");
        let detection = detect_change(&current, Some(&previous));
        assert_eq!(detection, Detection::Unchanged);
        assert!(!detection.should_persist());
        assert!(!detection.should_notify());
    }

    #[test]
    fn test_changed() {
        let current = digest_text("inf1005a");
        let previous = digest_text("inf1005b");
        let detection = detect_change(&current, Some(&previous));
        assert_eq!(detection, Detection::Changed);
        assert!(detection.should_persist());
        assert!(detection.should_notify());
    }

    #[test]
    fn test_display_and_json() {
        assert_eq!(Detection::FirstSeen.to_string(), "first_seen");
        assert_eq!(
            serde_json::to_string(&Detection::Changed).unwrap(),
            "\"changed\""
        );
    }
}
