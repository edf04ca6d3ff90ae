//! # punch_motion
//!
//! Turns a stream of per-frame pose keypoints into discrete punch gestures
//! for driving keystrokes or other actions.
//!
//! ## Gesture vocabulary
//!
//! | Gesture | Side | Shape |
//! |---|---|---|
//! | Block | Both | Wrists together in front of the face |
//! | Hook | Either | Arm swings out then back in with a sideways sweep, or the wrist crosses the nose |
//! | Uppercut | Either | Fast, mostly vertical upward wrist movement |
//!
//! At most one gesture is emitted per frame, and each side is debounced by
//! a cooldown (0.8 s by default).  All thresholds scale with the frame size.
//!
//! ## Quick start
//!
//! ```rust
//! use punch_motion::{
//!     BodyPart, ClassifierConfig, FrameSize, GestureClassifier, GestureLabel, Landmark,
//!     LandmarkFrame,
//! };
//!
//! let mut classifier = GestureClassifier::new(ClassifierConfig::default()).unwrap();
//! let size = FrameSize::new(640.0, 480.0).unwrap();
//!
//! let guard = LandmarkFrame::new()
//!     .with(BodyPart::Nose, Landmark::new(320.0, 200.0))
//!     .with(BodyPart::RightWrist, Landmark::new(300.0, 230.0))
//!     .with(BodyPart::LeftWrist, Landmark::new(340.0, 230.0));
//!
//! assert_eq!(classifier.process_frame(&guard, 10.0, size), GestureLabel::Block);
//! // Still cooling down.
//! assert_eq!(classifier.process_frame(&guard, 10.2, size), GestureLabel::None);
//! ```
//!
//! ## Layout
//!
//! * [`landmark`]: typed landmark frames
//! * [`trajectory`]: per-side ring buffers of recent samples
//! * [`features`]: velocity, radial, angular and depth features
//! * [`thresholds`]: resolution-relative thresholds
//! * [`classifier`]: rules, priority order, cooldowns
//! * [`action`]: label → action mapping

pub mod action;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod gesture;
pub mod landmark;
pub mod thresholds;
pub mod trajectory;

pub use action::{ActionMapper, KeyMap};
pub use classifier::{CooldownState, FrameContext, GestureClassifier, Rule, RULE_ORDER};
pub use config::ClassifierConfig;
pub use error::{MotionError, Result};
pub use features::Kinematics;
pub use gesture::GestureLabel;
pub use landmark::{BodyPart, Landmark, LandmarkFrame, Side};
pub use thresholds::{FrameSize, Thresholds};
pub use trajectory::{Point, Sample, TrajectoryStore, Window};
