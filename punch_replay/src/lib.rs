//! # punch_replay
//!
//! Feeds recorded or scripted keypoint streams through the
//! [`punch_motion`] classifier and reports every gesture with the key it
//! maps to.
//!
//! ## Sources
//!
//! | Source | Input |
//! |---|---|
//! | [`JsonLinesSource`](source::JsonLinesSource) | One frame record per line, from a file or stdin |
//! | [`SimFrameSource`](source::SimFrameSource) | A [`Motion`](script::Motion) script over a VGA neutral pose |
//!
//! ### Frame record
//!
//! ```json
//! {"t": 12.345, "width": 640, "height": 480,
//!  "landmarks": {"POSE:RIGHT_WRIST": [16, 230.0, 330.0], "POSE:NOSE": [0, 320.0, 150.0]}}
//! ```
//!
//! Landmark entries are `[index, x, y, (z), (visibility)]` in pixels.  Lines
//! that fail to parse are logged and skipped.
//!
//! ## Output
//!
//! | Format | Line |
//! |---|---|
//! | text (default) | `t=12.345  Hook (R)     -> key 'l'` |
//! | `--json` | `{"t":12.345,"label":"hook_right","key":"l"}` |
//!
//! Both formats end with a summary of frames seen, frames skipped and
//! emissions per label.

pub mod app;
pub mod script;
pub mod source;
