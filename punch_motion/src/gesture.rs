//! Gesture labels: the classifier's entire output vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::landmark::Side;

/// One decision per processed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    /// Both wrists held together in front of the face.
    Block,
    HookLeft,
    HookRight,
    UppercutLeft,
    UppercutRight,
    /// No event this frame.
    None,
}

impl GestureLabel {
    pub const ALL: [GestureLabel; 6] = [
        GestureLabel::Block,
        GestureLabel::HookLeft,
        GestureLabel::HookRight,
        GestureLabel::UppercutLeft,
        GestureLabel::UppercutRight,
        GestureLabel::None,
    ];

    pub fn hook(side: Side) -> Self {
        match side {
            Side::Left => GestureLabel::HookLeft,
            Side::Right => GestureLabel::HookRight,
        }
    }

    pub fn uppercut(side: Side) -> Self {
        match side {
            Side::Left => GestureLabel::UppercutLeft,
            Side::Right => GestureLabel::UppercutRight,
        }
    }

    /// The punching side; `None` for Block and no-event.
    pub fn side(self) -> Option<Side> {
        match self {
            GestureLabel::HookLeft | GestureLabel::UppercutLeft => Some(Side::Left),
            GestureLabel::HookRight | GestureLabel::UppercutRight => Some(Side::Right),
            GestureLabel::Block | GestureLabel::None => None,
        }
    }

    /// Anything but `None`.
    pub fn is_event(self) -> bool {
        self != GestureLabel::None
    }

    /// Display form: `Block`, `Hook (L)`, `Uppercut (R)`, …
    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::Block => "Block",
            GestureLabel::HookLeft => "Hook (L)",
            GestureLabel::HookRight => "Hook (R)",
            GestureLabel::UppercutLeft => "Uppercut (L)",
            GestureLabel::UppercutRight => "Uppercut (R)",
            GestureLabel::None => "None",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unrecognised label text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown gesture label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for GestureLabel {
    type Err = UnknownLabel;

    /// Accepts the display form case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GestureLabel::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
