//! Gesture classifier: per-frame decision with per-side cooldown.
//!
//! Each call to [`GestureClassifier::process_frame`]:
//!
//! 1. appends a [`Sample`](crate::trajectory::Sample) for every side whose wrist and shoulder are
//!    visible (right first, then left),
//! 2. derives [`Thresholds`] from the frame size and [`Kinematics`] for each
//!    side,
//! 3. walks [`RULE_ORDER`] and returns the first label a rule produces,
//! 4. on an emission, starts the cooldown for the punching side (both sides
//!    for a block).
//!
//! # Rules
//!
//! * **Block**: both wrists within 10 % of the diagonal of each other and
//!   within 13 % of the diagonal of the nose.
//! * **Hook**: the arm swings out and back in with a sideways sweep, *or*
//!   the wrist has crossed the nose horizontally.
//! * **Uppercut**: a fast, mostly vertical, upward wrist movement.
//!
//! The order is Block, then for the right side Hook and Uppercut, then the
//! same for the left side.  Reordering changes which label wins when more
//! than one rule matches.

use tracing::{debug, trace, warn};

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::features::{self, Kinematics};
use crate::gesture::GestureLabel;
use crate::landmark::{BodyPart, LandmarkFrame, Side};
use crate::thresholds::{FrameSize, Thresholds};
use crate::trajectory::{TrajectoryStore, Window};

/// Punch rules ignore a side until it has this many samples.
pub const MIN_PUNCH_SAMPLES: usize = 5;

/// Radial series used for the hook's out-then-in shape.
const HOOK_SERIES_POINTS: usize = 5;
const HOOK_SERIES_STRIDE: usize = 2;
/// Samples needed before a hook can fire at all.
pub const MIN_HOOK_SAMPLES: usize = (HOOK_SERIES_POINTS - 1) * HOOK_SERIES_STRIDE + 2;
/// Minimum sweep of the shoulder→wrist vector, degrees.
const HOOK_MIN_SWEEP_DEG: f64 = 25.0;
const HOOK_MIN_HORIZONTAL: f64 = 0.5;

/// Uppercut rise is measured over the last `UPPERCUT_LAG + 1` samples.
const UPPERCUT_LAG: usize = 3;
const UPPERCUT_MIN_VERTICAL: f64 = 0.7;

/// Slack for float rounding in cooldown comparisons.
const COOLDOWN_EPSILON: f64 = 1e-9;

// ════════════════════════════════════════════════════════════════════════════
// CooldownState
// ════════════════════════════════════════════════════════════════════════════

/// Time of the last emission for each side, in monotonic seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CooldownState {
    last_trigger: [f64; 2],
}

impl CooldownState {
    pub fn last_trigger(&self, side: Side) -> f64 {
        self.last_trigger[side.index()]
    }

    /// True once `cooldown` seconds have passed since the side last fired.
    pub fn is_armed(&self, side: Side, now: f64, cooldown: f64) -> bool {
        now - self.last_trigger(side) + COOLDOWN_EPSILON >= cooldown
    }

    /// Block gate, measured from the older of the two last triggers.
    pub fn both_armed(&self, now: f64, cooldown: f64) -> bool {
        now - self.last_trigger[0].min(self.last_trigger[1]) + COOLDOWN_EPSILON >= cooldown
    }

    /// Start the cooldown for whoever `label` belongs to.
    pub fn record(&mut self, label: GestureLabel, now: f64) {
        match (label, label.side()) {
            (GestureLabel::Block, _) => self.last_trigger = [now, now],
            (_, Some(side)) => self.last_trigger[side.index()] = now,
            (_, None) => {}
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameContext: what the rules can see
// ════════════════════════════════════════════════════════════════════════════

/// A side that passed the per-side gate this frame.
#[derive(Clone, Copy, Debug)]
pub struct SideContext<'a> {
    pub window: Window<'a>,
    pub kinematics: Kinematics,
}

/// Inputs to the rules for one frame.
#[derive(Clone, Debug)]
pub struct FrameContext<'a> {
    pub now: f64,
    pub thresholds: Thresholds,
    pub landmarks: LandmarkFrame,
    /// Block cooldown has elapsed.
    pub block_armed: bool,
    sides: [Option<SideContext<'a>>; 2],
}

impl<'a> FrameContext<'a> {
    /// Context with no side eligible for a punch.
    pub fn new(now: f64, thresholds: Thresholds, landmarks: LandmarkFrame, block_armed: bool) -> Self {
        Self { now, thresholds, landmarks, block_armed, sides: [None, None] }
    }

    /// Offer `side` to the punch rules.  Windows shorter than
    /// [`MIN_PUNCH_SAMPLES`] are not offered.
    pub fn with_side(mut self, side: Side, window: Window<'a>) -> Self {
        if let Some(kinematics) = Kinematics::from_window(&window) {
            self.offer(side, window, kinematics);
        }
        self
    }

    fn offer(&mut self, side: Side, window: Window<'a>, kinematics: Kinematics) {
        if window.len() >= MIN_PUNCH_SAMPLES {
            self.sides[side.index()] = Some(SideContext { window, kinematics });
        }
    }

    pub fn side(&self, side: Side) -> Option<&SideContext<'a>> {
        self.sides[side.index()].as_ref()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rules
// ════════════════════════════════════════════════════════════════════════════

/// One classification rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Block,
    Hook(Side),
    Uppercut(Side),
}

/// Evaluation order; the first rule that fires wins the frame.
pub const RULE_ORDER: [Rule; 5] = [
    Rule::Block,
    Rule::Hook(Side::Right),
    Rule::Uppercut(Side::Right),
    Rule::Hook(Side::Left),
    Rule::Uppercut(Side::Left),
];

impl Rule {
    /// The label this rule emits.
    pub fn label(self) -> GestureLabel {
        match self {
            Rule::Block => GestureLabel::Block,
            Rule::Hook(side) => GestureLabel::hook(side),
            Rule::Uppercut(side) => GestureLabel::uppercut(side),
        }
    }

    pub fn check(self, ctx: &FrameContext<'_>) -> Option<GestureLabel> {
        let fired = match self {
            Rule::Block => block(ctx),
            Rule::Hook(side) => hook(ctx, side),
            Rule::Uppercut(side) => uppercut(ctx, side),
        };
        fired.then(|| self.label())
    }
}

fn block(ctx: &FrameContext<'_>) -> bool {
    let lm = &ctx.landmarks;
    let (Some(right), Some(left), Some(nose)) = (
        lm.get(BodyPart::RightWrist),
        lm.get(BodyPart::LeftWrist),
        lm.get(BodyPart::Nose),
    ) else {
        return false;
    };
    let t = &ctx.thresholds;
    ctx.block_armed
        && right.distance(left) < t.block_thresh
        && right.distance(nose) < t.face_thresh
        && left.distance(nose) < t.face_thresh
}

fn hook(ctx: &FrameContext<'_>, side: Side) -> bool {
    let Some(sc) = ctx.side(side) else { return false };
    let Some(newest) = sc.window.newest() else { return false };
    let series = features::radial_series(&sc.window, HOOK_SERIES_POINTS, HOOK_SERIES_STRIDE);
    if series.len() < HOOK_SERIES_POINTS {
        return false;
    }

    let t = &ctx.thresholds;
    let k = &sc.kinematics;
    let elbow_level = newest
        .elbow
        .is_some_and(|e| (e.y - newest.shoulder.y).abs() < t.elbow_y_thresh);
    let swept = k.speed > t.speed_med
        && features::out_then_in(&series, t.radial_thresh, t.radial_back)
        && k.angular_change > HOOK_MIN_SWEEP_DEG
        && k.velocity.horizontal_fraction() > HOOK_MIN_HORIZONTAL
        && elbow_level;

    // Wrist past the nose on its own side of the image.
    let crossed = ctx.landmarks.get(BodyPart::Nose).is_some_and(|nose| match side {
        Side::Right => newest.wrist.x > nose.x,
        Side::Left => newest.wrist.x < nose.x,
    });

    swept || crossed
}

fn uppercut(ctx: &FrameContext<'_>, side: Side) -> bool {
    let Some(sc) = ctx.side(side) else { return false };
    let (Some(now), Some(then)) = (sc.window.back(0), sc.window.back(UPPERCUT_LAG)) else {
        return false;
    };
    let t = &ctx.thresholds;
    let k = &sc.kinematics;
    // Image y grows downward.
    let rise = then.wrist.y - now.wrist.y;
    k.speed > t.speed_vert
        && k.velocity.vy < 0.0
        && k.velocity.vertical_fraction() > UPPERCUT_MIN_VERTICAL
        && rise > t.up_dist
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Stateful classifier.  Owns both trajectories and both cooldowns; feed it
/// one frame at a time, in timestamp order.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    config: ClassifierConfig,
    store: TrajectoryStore,
    cooldowns: CooldownState,
    /// Features from the last frame, per side, for diagnostics.
    kinematics: [Option<Kinematics>; 2],
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        if let Some(limit) = config.history_limitation() {
            warn!(history = config.history_len, "{}", limit);
        }
        Ok(Self {
            store: TrajectoryStore::new(config.history_len)?,
            config,
            cooldowns: CooldownState::default(),
            kinematics: [None, None],
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one frame.  `now` is monotonic seconds; `size` is the frame
    /// the landmark coordinates refer to.
    pub fn process_frame(
        &mut self,
        landmarks: &LandmarkFrame,
        now: f64,
        size: FrameSize,
    ) -> GestureLabel {
        let landmarks = match self.config.min_visibility {
            Some(min) => landmarks.gated(min),
            None => *landmarks,
        };

        let mut present = [false; 2];
        for side in Side::EVALUATION_ORDER {
            if let Some(sample) = landmarks.sample(side, now) {
                self.store.append(side, sample);
                present[side.index()] = true;
            }
        }

        let cooldown = self.config.cooldown_secs;
        let thresholds = Thresholds::for_frame(size);
        let mut kinematics = [None, None];

        let label = {
            let mut ctx = FrameContext::new(
                now,
                thresholds,
                landmarks,
                self.cooldowns.both_armed(now, cooldown),
            );
            for side in Side::EVALUATION_ORDER {
                if !present[side.index()] {
                    continue;
                }
                let window = self.store.window(side);
                let Some(k) = Kinematics::from_window(&window) else { continue };
                kinematics[side.index()] = Some(k);
                trace!(
                    ?side,
                    samples = window.len(),
                    speed = k.speed,
                    vx = k.velocity.vx,
                    vy = k.velocity.vy,
                    radial = k.radial.delta,
                    sweep = k.angular_change,
                    alignment = k.alignment,
                    "kinematics"
                );
                if self.cooldowns.is_armed(side, now, cooldown) {
                    ctx.offer(side, window, k);
                }
            }
            RULE_ORDER
                .iter()
                .find_map(|rule| rule.check(&ctx))
                .unwrap_or(GestureLabel::None)
        };

        self.kinematics = kinematics;
        if label.is_event() {
            self.cooldowns.record(label, now);
            match label.side().and_then(|s| self.kinematics[s.index()]) {
                Some(k) => debug!(
                    %label,
                    t = now,
                    speed = k.speed,
                    sweep = k.angular_change,
                    alignment = k.alignment,
                    "gesture emitted"
                ),
                None => debug!(%label, t = now, "gesture emitted"),
            }
        }
        label
    }

    /// Features computed for `side` on the last frame, if it had a sample.
    pub fn kinematics(&self, side: Side) -> Option<&Kinematics> {
        self.kinematics[side.index()].as_ref()
    }

    pub fn cooldowns(&self) -> &CooldownState {
        &self.cooldowns
    }

    pub fn window(&self, side: Side) -> Window<'_> {
        self.store.window(side)
    }

    /// Forget all history, cooldowns and diagnostics.
    pub fn reset(&mut self) {
        self.store.clear();
        self.cooldowns = CooldownState::default();
        self.kinematics = [None, None];
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
