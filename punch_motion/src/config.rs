//! Classifier configuration, fixed for the lifetime of a classifier.

use serde::{Deserialize, Serialize};

use crate::classifier::{MIN_HOOK_SAMPLES, MIN_PUNCH_SAMPLES};
use crate::error::{MotionError, Result};
use crate::trajectory::DEFAULT_HISTORY_LEN;

/// Default minimum gap between two emissions for the same side, in seconds.
pub const DEFAULT_COOLDOWN_SECS: f64 = 0.8;

/// Construction-time settings for [`GestureClassifier`](crate::GestureClassifier).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Samples kept per side.  Hooks need at least 10.
    pub history_len: usize,
    /// Per-side debounce interval.
    pub cooldown_secs: f64,
    /// Landmarks reporting a lower visibility are treated as missing.
    pub min_visibility: Option<f64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            history_len: DEFAULT_HISTORY_LEN,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            min_visibility: None,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if self.history_len == 0 {
            return Err(MotionError::InvalidCapacity(self.history_len));
        }
        if !(self.cooldown_secs.is_finite() && self.cooldown_secs > 0.0) {
            return Err(MotionError::InvalidCooldown(self.cooldown_secs));
        }
        if let Some(v) = self.min_visibility {
            if !(0.0..=1.0).contains(&v) {
                return Err(MotionError::InvalidVisibility(v));
            }
        }
        Ok(())
    }

    /// Gestures a valid but short history can never produce.
    pub fn history_limitation(&self) -> Option<&'static str> {
        if self.history_len < MIN_PUNCH_SAMPLES {
            Some("history too short for any punch; only blocks can fire")
        } else if self.history_len < MIN_HOOK_SAMPLES {
            Some("history too short for hooks")
        } else {
            None
        }
    }
}
