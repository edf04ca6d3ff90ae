//! Gesture → action mapping.
//!
//! The classifier only produces labels.  What a label *does* is decided by
//! an [`ActionMapper`]; the stock one is [`KeyMap`], a static table of
//! keyboard keys.
//!
//! | Gesture | Key |
//! |---|---|
//! | Block | `f` |
//! | Hook (L) | `s` |
//! | Hook (R) | `l` |
//! | Uppercut (L) | `d` |
//! | Uppercut (R) | `k` |

use serde::{Deserialize, Serialize};

use crate::gesture::GestureLabel;

/// Total mapping from labels to action tokens.  `GestureLabel::None` always
/// maps to no action; every other label maps to exactly one token.
pub trait ActionMapper {
    type Action;

    fn action_for(&self, label: GestureLabel) -> Option<Self::Action>;
}

/// Keyboard binding per gesture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub block: char,
    pub hook_left: char,
    pub hook_right: char,
    pub uppercut_left: char,
    pub uppercut_right: char,
}

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap {
            block: 'f',
            hook_left: 's',
            hook_right: 'l',
            uppercut_left: 'd',
            uppercut_right: 'k',
        }
    }
}

impl ActionMapper for KeyMap {
    type Action = char;

    fn action_for(&self, label: GestureLabel) -> Option<char> {
        match label {
            GestureLabel::Block => Some(self.block),
            GestureLabel::HookLeft => Some(self.hook_left),
            GestureLabel::HookRight => Some(self.hook_right),
            GestureLabel::UppercutLeft => Some(self.uppercut_left),
            GestureLabel::UppercutRight => Some(self.uppercut_right),
            GestureLabel::None => None,
        }
    }
}
