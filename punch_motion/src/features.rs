//! Kinematic features over a trajectory window.
//!
//! All functions are pure.  A window that is too short for a feature yields
//! its neutral value (zero, empty, or `None`) instead of failing.

use std::f64::consts::{PI, TAU};

use crate::trajectory::{Sample, Window};

/// Floor for time deltas between samples, in seconds.
pub const MIN_DT: f64 = 1e-4;

/// Floor for speeds used as divisors.
const MIN_SPEED: f64 = 1e-6;

/// Number of most recent segments averaged for velocity.
pub const VELOCITY_SEGMENTS: usize = 3;

/// Radial and angular change compare the newest sample with this many back.
pub const CHANGE_LAG: usize = 2;

/// Depth change compares the newest sample with this many back.
pub const DEPTH_LAG: usize = 3;

/// Wrist velocity in px/s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Share of the speed carried by the horizontal component.
    pub fn horizontal_fraction(&self) -> f64 {
        self.vx.abs() / self.speed().max(MIN_SPEED)
    }

    /// Share of the speed carried by the vertical component.
    pub fn vertical_fraction(&self) -> f64 {
        self.vy.abs() / self.speed().max(MIN_SPEED)
    }
}

/// Mean of the per-segment wrist velocities over the last
/// [`VELOCITY_SEGMENTS`] pairs.  Needs at least 3 samples.
pub fn average_velocity(window: &Window<'_>) -> Velocity {
    if window.len() < 3 {
        return Velocity::default();
    }
    let segments = (window.len() - 1).min(VELOCITY_SEGMENTS);
    let newest_first = window.iter().rev();
    let (sx, sy) = newest_first
        .clone()
        .zip(newest_first.skip(1))
        .take(segments)
        .fold((0.0, 0.0), |(sx, sy), (newer, older)| {
            let dt = (newer.timestamp - older.timestamp).max(MIN_DT);
            (
                sx + (newer.wrist.x - older.wrist.x) / dt,
                sy + (newer.wrist.y - older.wrist.y) / dt,
            )
        });
    let n = segments as f64;
    Velocity { vx: sx / n, vy: sy / n }
}

/// Wrist-to-shoulder distance: how far the arm is extended.
pub fn radial_distance(sample: &Sample) -> f64 {
    (sample.wrist.x - sample.shoulder.x).hypot(sample.wrist.y - sample.shoulder.y)
}

/// Radial distance change and the time it took.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RadialChange {
    pub delta: f64,
    pub elapsed: f64,
}

/// Radial distance at the newest sample minus [`CHANGE_LAG`] samples back.
pub fn radial_change(window: &Window<'_>) -> RadialChange {
    let (Some(now), Some(prev)) = (window.back(0), window.back(CHANGE_LAG)) else {
        return RadialChange::default();
    };
    RadialChange {
        delta: radial_distance(now) - radial_distance(prev),
        elapsed: (now.timestamp - prev.timestamp).max(MIN_DT),
    }
}

/// Up to `points` radial distances spaced `stride` samples apart, oldest
/// first and ending at the newest sample.  A point is only taken while an
/// older sample remains in front of it, so `points` values need
/// `(points - 1) * stride + 2` samples.
pub fn radial_series(window: &Window<'_>, points: usize, stride: usize) -> Vec<f64> {
    let mut series: Vec<f64> = (0..points)
        .map(|step| step * stride)
        .take_while(|&back| back + 1 < window.len())
        .filter_map(|back| window.back(back))
        .map(radial_distance)
        .collect();
    series.reverse();
    series
}

/// True when the series grew by more than `out` over its first half and then
/// shrank by more than `back` over its second half.  Needs 5 points.
pub fn out_then_in(series: &[f64], out: f64, back: f64) -> bool {
    match *series {
        [.., r0, _, r2, _, r4] => r2 - r0 > out && r4 - r2 < -back,
        _ => false,
    }
}

/// Absolute rotation, in degrees, of the shoulder→wrist vector between the
/// newest sample and [`CHANGE_LAG`] samples back.
pub fn angular_change(window: &Window<'_>) -> f64 {
    let (Some(now), Some(prev)) = (window.back(0), window.back(CHANGE_LAG)) else {
        return 0.0;
    };
    let heading = |s: &Sample| (s.wrist.y - s.shoulder.y).atan2(s.wrist.x - s.shoulder.x);
    let d = (heading(now) - heading(prev) + PI).rem_euclid(TAU) - PI;
    d.to_degrees().abs()
}

/// Change in wrist depth, absolute and relative to the shoulder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthDelta {
    pub wrist: f64,
    pub relative: f64,
}

/// Depth change between the newest sample and [`DEPTH_LAG`] back.  `None`
/// unless both ends carry wrist depth.  Missing shoulder depth counts as 0.
pub fn depth_delta(window: &Window<'_>) -> Option<DepthDelta> {
    let now = window.back(0)?;
    let prev = window.back(DEPTH_LAG)?;
    let (wz_now, wz_prev) = (now.wrist.z?, prev.wrist.z?);
    let sz_now = now.shoulder.z.unwrap_or(0.0);
    let sz_prev = prev.shoulder.z.unwrap_or(0.0);
    Some(DepthDelta {
        wrist: wz_now - wz_prev,
        relative: (wz_now - sz_now) - (wz_prev - sz_prev),
    })
}

/// Unit vector from shoulder to wrist.  A zero-length arm uses magnitude 1.
pub fn unit_radial(sample: &Sample) -> (f64, f64) {
    let (rx, ry) = (sample.wrist.x - sample.shoulder.x, sample.wrist.y - sample.shoulder.y);
    let mag = rx.hypot(ry);
    let mag = if mag > 0.0 { mag } else { 1.0 };
    (rx / mag, ry / mag)
}

/// Normalised projection of the velocity onto the radial direction:
/// +1 straight out from the shoulder, -1 straight back in.
pub fn alignment(velocity: Velocity, unit: (f64, f64)) -> f64 {
    (velocity.vx * unit.0 + velocity.vy * unit.1) / (velocity.speed() + MIN_SPEED)
}

// ════════════════════════════════════════════════════════════════════════════
// Kinematics: everything derived for one side in one frame
// ════════════════════════════════════════════════════════════════════════════

/// Features derived once per side per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    pub velocity: Velocity,
    pub speed: f64,
    pub radial: RadialChange,
    /// Degrees.
    pub angular_change: f64,
    /// Diagnostic only.
    pub alignment: f64,
    pub depth: Option<DepthDelta>,
}

impl Kinematics {
    /// `None` for an empty window.
    pub fn from_window(window: &Window<'_>) -> Option<Self> {
        let newest = window.newest()?;
        let velocity = average_velocity(window);
        Some(Self {
            velocity,
            speed: velocity.speed(),
            radial: radial_change(window),
            angular_change: angular_change(window),
            alignment: alignment(velocity, unit_radial(newest)),
            depth: depth_delta(window),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
