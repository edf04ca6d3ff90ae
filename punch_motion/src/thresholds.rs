//! Resolution-relative thresholds.
//!
//! Every distance and speed threshold is a fraction of the frame diagonal
//! (or of a frame side), recomputed per call, so the classifier behaves the
//! same at any capture resolution.

use crate::error::{MotionError, Result};

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSize {
    width: f64,
    height: f64,
}

impl FrameSize {
    /// 640 × 480.
    pub const VGA: FrameSize = FrameSize { width: 640.0, height: 480.0 };

    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(MotionError::InvalidFrameSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }
}

// ── scale factors ─────────────────────────────────────────────────────────

const SPEED_FAST_PER_DIAG: f64 = 2.2;
const SPEED_MED_PER_DIAG: f64 = 1.5;
const SPEED_VERT_PER_DIAG: f64 = 1.4;
const RADIAL_OUT_PER_SIDE: f64 = 0.10;
const RADIAL_BACK_PER_SIDE: f64 = 0.07;
const UP_DIST_PER_HEIGHT: f64 = 0.12;
/// Floor for the uppercut rise, in pixels.
const UP_DIST_MIN_PX: f64 = 60.0;
const ELBOW_Y_PER_HEIGHT: f64 = 0.18;
const BLOCK_WRISTS_PER_DIAG: f64 = 0.10;
const BLOCK_FACE_PER_DIAG: f64 = 0.13;

/// Thresholds for one frame.  Speeds in px/s, distances in px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Not used by any rule.
    pub speed_fast: f64,
    /// Minimum wrist speed for a swept hook.
    pub speed_med: f64,
    /// Minimum wrist speed for an uppercut.
    pub speed_vert: f64,
    /// Radial growth that counts as "out".
    pub radial_thresh: f64,
    /// Radial shrink that counts as "back in".
    pub radial_back: f64,
    /// Minimum upward wrist travel for an uppercut.
    pub up_dist: f64,
    /// Maximum elbow/shoulder height difference for a swept hook.
    pub elbow_y_thresh: f64,
    /// Maximum wrist-to-wrist distance for a block.
    pub block_thresh: f64,
    /// Maximum wrist-to-nose distance for a block.
    pub face_thresh: f64,
}

impl Thresholds {
    pub fn for_frame(size: FrameSize) -> Self {
        let d = size.diagonal();
        let side = size.longest_side();
        let h = size.height();
        Self {
            speed_fast: SPEED_FAST_PER_DIAG * d,
            speed_med: SPEED_MED_PER_DIAG * d,
            speed_vert: SPEED_VERT_PER_DIAG * d,
            radial_thresh: RADIAL_OUT_PER_SIDE * side,
            radial_back: RADIAL_BACK_PER_SIDE * side,
            up_dist: (UP_DIST_PER_HEIGHT * h).max(UP_DIST_MIN_PX),
            elbow_y_thresh: ELBOW_Y_PER_HEIGHT * h,
            block_thresh: BLOCK_WRISTS_PER_DIAG * d,
            face_thresh: BLOCK_FACE_PER_DIAG * d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn vga_frame() {
        let t = Thresholds::for_frame(FrameSize::new(640.0, 480.0).unwrap());
        assert!(close(t.speed_med, 1200.0));
        assert!(close(t.speed_vert, 1120.0));
        assert!(close(t.speed_fast, 1760.0));
        assert!(close(t.radial_thresh, 64.0));
        assert!(close(t.radial_back, 44.8));
        assert!(close(t.elbow_y_thresh, 86.4));
        assert!(close(t.block_thresh, 80.0));
        assert!(close(t.face_thresh, 104.0));
        // 0.12 * 480 = 57.6, below the floor
        assert!(close(t.up_dist, 60.0));
    }

    #[test]
    fn up_dist_scales_above_floor() {
        let t = Thresholds::for_frame(FrameSize::new(1280.0, 800.0).unwrap());
        assert!(close(t.up_dist, 96.0));
    }

    #[test]
    fn vga_constant_matches_constructor() {
        assert_eq!(FrameSize::VGA, FrameSize::new(640.0, 480.0).unwrap());
        assert!(close(FrameSize::VGA.diagonal(), 800.0));
    }

    #[test]
    fn degenerate_frames_rejected() {
        assert!(FrameSize::new(0.0, 480.0).is_err());
        assert!(FrameSize::new(640.0, -1.0).is_err());
        assert!(FrameSize::new(f64::NAN, 480.0).is_err());
    }
}
