//! Error type for the classification core.
//!
//! Missing landmarks and short windows are not errors; they simply yield
//! no event.  Only bad configuration and malformed input land here.

use thiserror::Error;

/// Errors raised by `punch_motion`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    /// Trajectory capacity of zero.
    #[error("history capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// Cooldown that is zero, negative, or not finite.
    #[error("cooldown must be a positive number of seconds, got {0}")]
    InvalidCooldown(f64),

    /// Visibility cut-off outside `[0, 1]`.
    #[error("minimum visibility must lie in [0, 1], got {0}")]
    InvalidVisibility(f64),

    /// Frame with a non-positive dimension.
    #[error("frame size must be positive, got {width}x{height}")]
    InvalidFrameSize { width: f64, height: f64 },

    /// Landmark entry that is not `[index, x, y, (z), (visibility)]`.
    #[error("landmark '{key}' has {len} values, expected 3 to 5")]
    MalformedLandmark { key: String, len: usize },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, MotionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let e = MotionError::MalformedLandmark { key: "POSE:NOSE".into(), len: 2 };
        assert_eq!(e.to_string(), "landmark 'POSE:NOSE' has 2 values, expected 3 to 5");
        assert!(MotionError::InvalidCooldown(-1.0).to_string().contains("-1"));
    }
}
