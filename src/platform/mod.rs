//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Player identity (an opaque wallet address, or anonymous)
//! - Play days (calendar dates for streaks and daily challenges)
//! - Device tilt input

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::consts::GUEST_KEY;

/// Who is playing. The address is never interpreted, only used as a storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    address: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self { address: None }
    }

    /// Blank addresses are treated as anonymous
    pub fn wallet(address: impl Into<String>) -> Self {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            Self::anonymous()
        } else {
            Self {
                address: Some(trimmed.to_string()),
            }
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.address.is_none()
    }

    /// Key used for leaderboards; anonymous players share the guest board
    pub fn leaderboard_key(&self) -> &str {
        self.address().unwrap_or(GUEST_KEY)
    }

    /// `0x1234...abcd` style label for the HUD
    pub fn short_label(&self) -> String {
        match self.address() {
            None => "Guest".to_string(),
            Some(a) if a.chars().count() <= 10 => a.to_string(),
            Some(a) => {
                let head: String = a.chars().take(6).collect();
                let tail: String = a.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
                format!("{head}...{tail}")
            }
        }
    }
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `YYYY-MM-DD`, the storage form of a play day
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub fn is_previous_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier + Duration::days(1) == later
}

/// Forward tilt below this angle (degrees) can trigger a jump
const TILT_TRIGGER_DEG: f64 = -15.0;
/// Minimum change from the reference angle for a trigger
const TILT_DELTA_DEG: f64 = 10.0;
/// Within this band the device counts as level and the reference follows it
const TILT_NEUTRAL_DEG: f64 = 5.0;

/// Converts device-orientation `beta` readings into discrete jump triggers.
///
/// A jump fires on a sharp forward tilt; the reference angle then moves to the
/// tilted reading, so holding the device tilted does not retrigger. Returning to
/// level re-arms the detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TiltDetector {
    last_beta: f64,
    pub enabled: bool,
}

impl TiltDetector {
    pub fn new(enabled: bool) -> Self {
        Self {
            last_beta: 0.0,
            enabled,
        }
    }

    /// Feed one `beta` reading. Returns true when it should trigger a jump.
    pub fn sample(&mut self, beta: f64) -> bool {
        if !self.enabled || !beta.is_finite() {
            return false;
        }
        if beta < TILT_TRIGGER_DEG && (beta - self.last_beta).abs() > TILT_DELTA_DEG {
            self.last_beta = beta;
            return true;
        }
        if beta.abs() < TILT_NEUTRAL_DEG {
            self.last_beta = beta;
        }
        false
    }

    pub fn reset(&mut self) {
        self.last_beta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_keys() {
        assert_eq!(Identity::anonymous().leaderboard_key(), "guest");
        assert!(Identity::wallet("   ").is_anonymous());
        let id = Identity::wallet("0xAbCdEf0123456789");
        assert_eq!(id.leaderboard_key(), "0xAbCdEf0123456789");
        assert_eq!(id.short_label(), "0xAbCd...6789");
    }

    #[test]
    fn test_day_helpers() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(day_key(next), "2024-02-29");
        assert!(is_previous_day(d, next));
        assert!(!is_previous_day(next, d));
        assert!(!is_previous_day(d, d));
    }

    #[test]
    fn test_tilt_triggers_once_per_gesture() {
        let mut tilt = TiltDetector::new(true);
        assert!(!tilt.sample(-10.0));
        assert!(tilt.sample(-20.0));
        // Held tilt does not retrigger
        assert!(!tilt.sample(-22.0));
        // Back to level re-arms
        assert!(!tilt.sample(2.0));
        assert!(tilt.sample(-16.0));
    }

    #[test]
    fn test_tilt_disabled_or_garbage() {
        let mut tilt = TiltDetector::new(false);
        assert!(!tilt.sample(-40.0));
        tilt.enabled = true;
        assert!(!tilt.sample(f64::NAN));
        assert!(tilt.sample(-40.0));
    }
}
