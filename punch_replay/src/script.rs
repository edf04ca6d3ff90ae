//! Scripted boxing motions over a fixed 640×480 neutral pose.
//!
//! Each [`Motion`] expands into a run of complete landmark frames.  The
//! geometry is chosen so that every punch clears the VGA thresholds by a
//! comfortable margin and nothing else fires in between.

use punch_motion::{BodyPart, GestureLabel, Landmark, LandmarkFrame, Side};

// ════════════════════════════════════════════════════════════════════════════
// Pose geometry (pixels, image y grows downward)
// ════════════════════════════════════════════════════════════════════════════

const NOSE: (f64, f64) = (320.0, 150.0);

/// Per-frame wrist travel for an uppercut.
const UPPERCUT_STEP: f64 = 50.0;
const UPPERCUT_FRAMES: usize = 5;

/// Per-frame wrist travel for a hook, toward the body midline.
const HOOK_STEP_X: f64 = 45.0;
const HOOK_STEP_Y: f64 = 10.0;
const HOOK_FRAMES: usize = 6;

const GUARD_RIGHT: (f64, f64) = (305.0, 175.0);
const GUARD_LEFT: (f64, f64) = (335.0, 175.0);
const GUARD_HOLD: usize = 10;

fn shoulder(side: Side) -> (f64, f64) {
    match side {
        Side::Right => (250.0, 240.0),
        Side::Left => (390.0, 240.0),
    }
}

fn elbow(side: Side) -> (f64, f64) {
    match side {
        Side::Right => (240.0, 290.0),
        Side::Left => (400.0, 290.0),
    }
}

fn rest_wrist(side: Side) -> (f64, f64) {
    match side {
        Side::Right => (230.0, 330.0),
        Side::Left => (410.0, 330.0),
    }
}

/// Sign of a hook's horizontal travel: the right wrist sweeps toward +x.
fn inward(side: Side) -> f64 {
    match side {
        Side::Right => 1.0,
        Side::Left => -1.0,
    }
}

fn at((x, y): (f64, f64)) -> Landmark {
    Landmark::new(x, y)
}

/// Full pose with the given wrist positions.
fn pose(right_wrist: (f64, f64), left_wrist: (f64, f64)) -> LandmarkFrame {
    LandmarkFrame::new()
        .with(BodyPart::Nose, at(NOSE))
        .with(BodyPart::RightShoulder, at(shoulder(Side::Right)))
        .with(BodyPart::LeftShoulder, at(shoulder(Side::Left)))
        .with(BodyPart::RightElbow, at(elbow(Side::Right)))
        .with(BodyPart::LeftElbow, at(elbow(Side::Left)))
        .with(BodyPart::RightWrist, at(right_wrist))
        .with(BodyPart::LeftWrist, at(left_wrist))
}

/// Neutral pose with one wrist displaced from rest by `(dx, dy)`.
fn displaced(side: Side, dx: f64, dy: f64) -> LandmarkFrame {
    let (x, y) = rest_wrist(side);
    let moved = (x + dx, y + dy);
    match side {
        Side::Right => pose(moved, rest_wrist(Side::Left)),
        Side::Left => pose(rest_wrist(Side::Right), moved),
    }
}

fn neutral() -> LandmarkFrame {
    pose(rest_wrist(Side::Right), rest_wrist(Side::Left))
}

// ════════════════════════════════════════════════════════════════════════════
// Motion
// ════════════════════════════════════════════════════════════════════════════

/// One step of a scripted session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Hold the neutral pose for `n` frames.
    Idle(usize),
    /// Drive one wrist straight up, then bring it back down.
    Uppercut(Side),
    /// Sweep one wrist across the body past the nose, then back.
    Hook(Side),
    /// Snap both wrists in front of the face, hold, release.
    Block,
}

impl Motion {
    /// The label this motion should produce, if any.
    pub fn expected(self) -> GestureLabel {
        match self {
            Motion::Idle(_) => GestureLabel::None,
            Motion::Uppercut(side) => GestureLabel::uppercut(side),
            Motion::Hook(side) => GestureLabel::hook(side),
            Motion::Block => GestureLabel::Block,
        }
    }

    fn frames(self, out: &mut Vec<LandmarkFrame>) {
        match self {
            Motion::Idle(n) => out.extend(std::iter::repeat(neutral()).take(n)),
            Motion::Uppercut(side) => {
                let rise = |i: usize| displaced(side, 0.0, -UPPERCUT_STEP * i as f64);
                out.extend((1..=UPPERCUT_FRAMES).map(rise));
                out.extend((0..UPPERCUT_FRAMES).rev().map(rise));
            }
            Motion::Hook(side) => {
                let dir = inward(side);
                let sweep = |i: usize| {
                    let i = i as f64;
                    displaced(side, dir * HOOK_STEP_X * i, -HOOK_STEP_Y * i)
                };
                out.extend((1..=HOOK_FRAMES).map(sweep));
                out.extend((0..HOOK_FRAMES).rev().map(sweep));
            }
            Motion::Block => {
                out.extend(std::iter::repeat(pose(GUARD_RIGHT, GUARD_LEFT)).take(GUARD_HOLD));
                out.push(neutral());
            }
        }
    }
}

/// Expand a script into consecutive frames.
pub fn render(script: &[Motion]) -> Vec<LandmarkFrame> {
    let mut frames = Vec::new();
    for motion in script {
        motion.frames(&mut frames);
    }
    frames
}

/// One of each gesture, separated by rests longer than the default cooldown.
pub fn demo_session() -> Vec<Motion> {
    vec![
        Motion::Idle(12),
        Motion::Uppercut(Side::Right),
        Motion::Idle(40),
        Motion::Hook(Side::Right),
        Motion::Idle(40),
        Motion::Block,
        Motion::Idle(40),
        Motion::Uppercut(Side::Left),
        Motion::Idle(40),
        Motion::Hook(Side::Left),
        Motion::Idle(12),
    ]
}

/// Labels a script should yield, in order.
pub fn expected_labels(script: &[Motion]) -> Vec<GestureLabel> {
    script
        .iter()
        .map(|m| m.expected())
        .filter(|l| l.is_event())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_counts() {
        assert_eq!(render(&[Motion::Idle(7)]).len(), 7);
        assert_eq!(render(&[Motion::Uppercut(Side::Left)]).len(), 2 * UPPERCUT_FRAMES);
        assert_eq!(render(&[Motion::Hook(Side::Right)]).len(), 2 * HOOK_FRAMES);
        assert_eq!(render(&[Motion::Block]).len(), GUARD_HOLD + 1);
    }

    #[test]
    fn every_frame_is_a_full_pose() {
        for frame in render(&demo_session()) {
            for part in BodyPart::ALL {
                assert!(frame.get(part).is_some(), "{:?} missing", part);
            }
        }
    }

    #[test]
    fn motions_return_to_rest() {
        for motion in [
            Motion::Uppercut(Side::Right),
            Motion::Hook(Side::Left),
            Motion::Block,
        ] {
            let frames = render(&[motion]);
            assert_eq!(frames.last(), Some(&neutral()), "{:?}", motion);
        }
    }

    #[test]
    fn hooks_cross_the_nose() {
        let peak = |side| render(&[Motion::Hook(side)])[HOOK_FRAMES - 1];
        let right = peak(Side::Right).get(BodyPart::RightWrist).unwrap().x;
        let left = peak(Side::Left).get(BodyPart::LeftWrist).unwrap().x;
        assert!(right > NOSE.0);
        assert!(left < NOSE.0);
    }

    #[test]
    fn demo_expectation() {
        assert_eq!(
            expected_labels(&demo_session()),
            vec![
                GestureLabel::UppercutRight,
                GestureLabel::HookRight,
                GestureLabel::Block,
                GestureLabel::UppercutLeft,
                GestureLabel::HookLeft,
            ]
        );
    }
}
