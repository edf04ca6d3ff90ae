//! Landmark model: the typed form of one frame of pose keypoints.
//!
//! Landmark sources hand us a string-keyed mapping such as
//! `"POSE:RIGHT_WRIST" → [16, 412, 300, -0.21, 0.98]`.  We only care about
//! seven body parts, so the mapping is folded into a fixed table indexed by
//! [`BodyPart`]; a missing entry is simply `None`.

use crate::error::{MotionError, Result};
use crate::trajectory::{Point, Sample};

// ════════════════════════════════════════════════════════════════════════════
// Side
// ════════════════════════════════════════════════════════════════════════════

/// Limb designation, tracked independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Order in which sides are offered to the punch rules.
    pub const EVALUATION_ORDER: [Side; 2] = [Side::Right, Side::Left];

    /// Stable slot for per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn wrist(self) -> BodyPart {
        match self {
            Side::Left => BodyPart::LeftWrist,
            Side::Right => BodyPart::RightWrist,
        }
    }

    pub fn shoulder(self) -> BodyPart {
        match self {
            Side::Left => BodyPart::LeftShoulder,
            Side::Right => BodyPart::RightShoulder,
        }
    }

    pub fn elbow(self) -> BodyPart {
        match self {
            Side::Left => BodyPart::LeftElbow,
            Side::Right => BodyPart::RightElbow,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// BodyPart
// ════════════════════════════════════════════════════════════════════════════

/// The body parts the classifier reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyPart {
    Nose = 0,
    LeftShoulder = 1,
    RightShoulder = 2,
    LeftElbow = 3,
    RightElbow = 4,
    LeftWrist = 5,
    RightWrist = 6,
}

impl BodyPart {
    pub const COUNT: usize = 7;

    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
    ];

    /// Index in the 33-point MediaPipe pose model.
    pub fn pose_index(self) -> usize {
        match self {
            BodyPart::Nose => 0,
            BodyPart::LeftShoulder => 11,
            BodyPart::RightShoulder => 12,
            BodyPart::LeftElbow => 13,
            BodyPart::RightElbow => 14,
            BodyPart::LeftWrist => 15,
            BodyPart::RightWrist => 16,
        }
    }

    /// Upper-case landmark name as emitted by pose sources.
    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose => "NOSE",
            BodyPart::LeftShoulder => "LEFT_SHOULDER",
            BodyPart::RightShoulder => "RIGHT_SHOULDER",
            BodyPart::LeftElbow => "LEFT_ELBOW",
            BodyPart::RightElbow => "RIGHT_ELBOW",
            BodyPart::LeftWrist => "LEFT_WRIST",
            BodyPart::RightWrist => "RIGHT_WRIST",
        }
    }

    /// Canonical source key, e.g. `POSE:RIGHT_WRIST`.
    pub fn key(self) -> String {
        format!("POSE:{}", self.name())
    }

    /// Resolve a source key.  Accepts both the named form (`POSE:NOSE`) and
    /// the numeric fallback (`POSE:0`).  Keys for other components or
    /// other body parts resolve to `None`.
    pub fn from_key(key: &str) -> Option<BodyPart> {
        let rest = key.strip_prefix("POSE:")?;
        if let Ok(idx) = rest.parse::<usize>() {
            return BodyPart::ALL.into_iter().find(|p| p.pose_index() == idx);
        }
        BodyPart::ALL.into_iter().find(|p| p.name() == rest)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One detected keypoint, pixel space for x/y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth; more negative is closer to the camera.
    pub z: Option<f64>,
    /// Detection confidence in `[0, 1]`.
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None, visibility: None }
    }

    pub fn with_depth(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Parse a source entry `[index, x, y, (z), (visibility)]`.
    pub fn from_entry(key: &str, entry: &[f64]) -> Result<Self> {
        match *entry {
            [_, x, y] => Ok(Landmark::new(x, y)),
            [_, x, y, z] => Ok(Landmark::new(x, y).with_depth(z)),
            [_, x, y, z, v] => Ok(Landmark::new(x, y).with_depth(z).with_visibility(v)),
            _ => Err(MotionError::MalformedLandmark {
                key: key.to_string(),
                len: entry.len(),
            }),
        }
    }

    pub fn point(&self) -> Point {
        Point { x: self.x, y: self.y, z: self.z }
    }

    pub fn distance(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// All landmarks of interest for one camera frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    parts: [Option<Landmark>; BodyPart::COUNT],
}

impl LandmarkFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a source mapping.  Unknown keys are ignored; a known key
    /// with a malformed entry is an error.
    pub fn from_keyed<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[f64]>,
    {
        let mut frame = LandmarkFrame::new();
        for (key, entry) in entries {
            let key = key.as_ref();
            if let Some(part) = BodyPart::from_key(key) {
                frame.set(part, Landmark::from_entry(key, entry.as_ref())?);
            }
        }
        Ok(frame)
    }

    pub fn get(&self, part: BodyPart) -> Option<&Landmark> {
        self.parts[part as usize].as_ref()
    }

    pub fn set(&mut self, part: BodyPart, landmark: Landmark) {
        self.parts[part as usize] = Some(landmark);
    }

    pub fn remove(&mut self, part: BodyPart) {
        self.parts[part as usize] = None;
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, part: BodyPart, landmark: Landmark) -> Self {
        self.set(part, landmark);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(Option::is_none)
    }

    /// Drop landmarks whose visibility is known and below `min`.
    /// Landmarks without a visibility value are kept.
    pub fn gated(&self, min: f64) -> LandmarkFrame {
        let mut out = *self;
        for slot in out.parts.iter_mut() {
            if matches!(slot, Some(lm) if lm.visibility.is_some_and(|v| v < min)) {
                *slot = None;
            }
        }
        out
    }

    /// The trajectory sample for `side`, if both wrist and shoulder are
    /// present.  The elbow is optional.
    pub fn sample(&self, side: Side, timestamp: f64) -> Option<Sample> {
        let wrist = self.get(side.wrist())?;
        let shoulder = self.get(side.shoulder())?;
        Some(Sample {
            timestamp,
            wrist: wrist.point(),
            shoulder: shoulder.point(),
            elbow: self.get(side.elbow()).map(Landmark::point),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn keys_resolve_by_name_and_index() {
        assert_eq!(BodyPart::from_key("POSE:RIGHT_WRIST"), Some(BodyPart::RightWrist));
        assert_eq!(BodyPart::from_key("POSE:13"), Some(BodyPart::LeftElbow));
        assert_eq!(BodyPart::from_key("POSE:LEFT_HIP"), None);
        assert_eq!(BodyPart::from_key("LEFT_HAND:0"), None);
        for part in BodyPart::ALL {
            assert_eq!(BodyPart::from_key(&part.key()), Some(part));
        }
    }

    #[test]
    fn entries_of_every_width_parse() {
        let a = Landmark::from_entry("k", &[16.0, 10.0, 20.0]).unwrap();
        assert_eq!((a.x, a.y, a.z, a.visibility), (10.0, 20.0, None, None));
        let b = Landmark::from_entry("k", &[16.0, 10.0, 20.0, -0.3]).unwrap();
        assert_eq!(b.z, Some(-0.3));
        let c = Landmark::from_entry("k", &[16.0, 10.0, 20.0, -0.3, 0.9]).unwrap();
        assert_eq!(c.visibility, Some(0.9));
        assert!(Landmark::from_entry("k", &[16.0, 10.0]).is_err());
    }

    #[test]
    fn from_keyed_ignores_unknown_parts() {
        let mut raw = BTreeMap::new();
        raw.insert("POSE:NOSE".to_string(), vec![0.0, 320.0, 150.0]);
        raw.insert("POSE:LEFT_HIP".to_string(), vec![23.0, 1.0, 2.0]);
        raw.insert("FACE:12".to_string(), vec![12.0, 1.0]);
        let frame = LandmarkFrame::from_keyed(&raw).unwrap();
        assert_eq!(frame.get(BodyPart::Nose).map(|l| l.x), Some(320.0));
        assert!(frame.get(BodyPart::LeftWrist).is_none());
    }

    #[test]
    fn from_keyed_rejects_short_entry_for_known_part() {
        let raw = vec![("POSE:RIGHT_WRIST", vec![16.0, 1.0])];
        let err = LandmarkFrame::from_keyed(raw).unwrap_err();
        assert!(matches!(err, MotionError::MalformedLandmark { len: 2, .. }));
    }

    #[test]
    fn sample_needs_wrist_and_shoulder() {
        let frame = LandmarkFrame::new()
            .with(BodyPart::RightWrist, Landmark::new(10.0, 20.0));
        assert!(frame.sample(Side::Right, 1.0).is_none());

        let frame = frame.with(BodyPart::RightShoulder, Landmark::new(0.0, 0.0));
        let s = frame.sample(Side::Right, 1.0).unwrap();
        assert_eq!(s.wrist.x, 10.0);
        assert!(s.elbow.is_none());
        assert!(frame.sample(Side::Left, 1.0).is_none());
    }

    #[test]
    fn gating_drops_only_low_confidence() {
        let frame = LandmarkFrame::new()
            .with(BodyPart::Nose, Landmark::new(1.0, 1.0).with_visibility(0.2))
            .with(BodyPart::LeftWrist, Landmark::new(1.0, 1.0).with_visibility(0.8))
            .with(BodyPart::RightWrist, Landmark::new(1.0, 1.0));
        let gated = frame.gated(0.5);
        assert!(gated.get(BodyPart::Nose).is_none());
        assert!(gated.get(BodyPart::LeftWrist).is_some());
        assert!(gated.get(BodyPart::RightWrist).is_some());
    }
}
