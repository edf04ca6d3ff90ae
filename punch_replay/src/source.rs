//! Frame sources: recorded JSON-lines files and the scripted simulator.
//!
//! The public interface is [`SourceEvent`] delivered over a `mpsc` channel.
//! The replay loop does not know whether frames came from a recording or
//! from a [`Motion`] script.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use punch_motion::{FrameSize, LandmarkFrame, MotionError};

use crate::script::{self, Motion};

// ════════════════════════════════════════════════════════════════════════════
// FrameRecord / SourceEvent
// ════════════════════════════════════════════════════════════════════════════

/// One line of a JSON-lines recording.
///
/// ```json
/// {"t": 12.345, "width": 640, "height": 480,
///  "landmarks": {"POSE:RIGHT_WRIST": [16, 230.0, 330.0, -0.1, 0.98]}}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time, monotonic seconds.
    pub t: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub landmarks: BTreeMap<String, Vec<f64>>,
}

impl FrameRecord {
    /// Validate the geometry and landmark entries.
    pub fn into_event(self) -> Result<SourceEvent, MotionError> {
        let size = FrameSize::new(self.width, self.height)?;
        let landmarks = LandmarkFrame::from_keyed(&self.landmarks)?;
        Ok(SourceEvent::Frame { t: self.t, size, landmarks })
    }
}

/// What a source delivers.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// A frame ready for classification.
    Frame { t: f64, size: FrameSize, landmarks: LandmarkFrame },

    /// Input `line` (1-based) could not be turned into a frame.
    Malformed { line: usize, reason: String },
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.  Dropping the
/// sender ends the stream.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource
// ════════════════════════════════════════════════════════════════════════════

/// Reads one [`FrameRecord`] per line.  Blank lines are ignored; a read
/// error ends the stream.
pub struct JsonLinesSource<R> {
    reader: R,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

/// Decode one non-blank line.
pub fn parse_line(line: &str) -> Result<SourceEvent, String> {
    let record: FrameRecord = serde_json::from_str(line).map_err(|e| e.to_string())?;
    record.into_event().map_err(|e| e.to_string())
}

impl<R: BufRead + Send + 'static> FrameSource for JsonLinesSource<R> {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        for (idx, line) in self.reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(line = line_no, error = %e, "read failed, ending input");
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let event = parse_line(&line)
                .unwrap_or_else(|reason| SourceEvent::Malformed { line: line_no, reason });
            if tx.send(event).is_err() {
                debug!("receiver gone, stopping reader");
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource
// ════════════════════════════════════════════════════════════════════════════

/// Default simulator rate.
pub const SIM_FPS: f64 = 40.0;

/// Plays a [`Motion`] script at a fixed frame rate on a VGA frame.
///
/// Frames are timestamped from `start` rather than the wall clock, so a run
/// is fully deterministic.
pub struct SimFrameSource {
    pub script: Vec<Motion>,
    pub fps: f64,
    /// Timestamp of the first frame.  Should exceed the cooldown so the
    /// first gesture is not suppressed.
    pub start: f64,
}

impl SimFrameSource {
    pub fn new(script: Vec<Motion>) -> Self {
        Self { script, fps: SIM_FPS, start: 1.0 }
    }
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let dt = 1.0 / self.fps;
        for (i, landmarks) in script::render(&self.script).into_iter().enumerate() {
            let event = SourceEvent::Frame {
                t: self.start + i as f64 * dt,
                size: FrameSize::VGA,
                landmarks,
            };
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use punch_motion::{BodyPart, Side};
    use std::io::Cursor;

    fn collect<S: FrameSource>(source: S) -> Vec<SourceEvent> {
        spawn_frame_source(source).into_iter().collect()
    }

    #[test]
    fn parses_a_record() {
        let line = r#"{"t": 2.5, "width": 640, "height": 480,
            "landmarks": {"POSE:RIGHT_WRIST": [16, 230, 330, -0.1, 0.9],
                          "POSE:12": [12, 250, 240],
                          "HAND:WRIST": [0, 1, 2]}}"#;
        let SourceEvent::Frame { t, size, landmarks } = parse_line(line).unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!(t, 2.5);
        assert_eq!(size, FrameSize::VGA);
        let wrist = landmarks.get(BodyPart::RightWrist).unwrap();
        assert_eq!((wrist.x, wrist.y), (230.0, 330.0));
        assert_eq!(wrist.visibility, Some(0.9));
        assert!(landmarks.get(BodyPart::RightShoulder).is_some());
        assert!(landmarks.sample(Side::Right, t).is_some());
    }

    #[test]
    fn landmarks_field_is_optional() {
        let event = parse_line(r#"{"t": 1, "width": 10, "height": 10}"#).unwrap();
        let SourceEvent::Frame { landmarks, .. } = event else { panic!() };
        assert!(landmarks.is_empty());
    }

    #[test]
    fn rejects_bad_records() {
        assert!(parse_line("not json").is_err());
        assert!(parse_line(r#"{"t": 1, "width": 0, "height": 480}"#).is_err());
        let short = r#"{"t": 1, "width": 640, "height": 480,
            "landmarks": {"POSE:NOSE": [0, 1]}}"#;
        let err = parse_line(short).unwrap_err();
        assert!(err.contains("POSE:NOSE"), "{}", err);
    }

    #[test]
    fn json_lines_skip_blanks_and_flag_garbage() {
        let input = "\
{\"t\": 1.0, \"width\": 640, \"height\": 480}

{oops
{\"t\": 1.1, \"width\": 640, \"height\": 480}
";
        let events = collect(JsonLinesSource::new(Cursor::new(input)));
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SourceEvent::Frame { t, .. } if t == 1.0));
        assert!(matches!(events[1], SourceEvent::Malformed { line: 3, .. }));
        assert!(matches!(events[2], SourceEvent::Frame { t, .. } if t == 1.1));
    }

    #[test]
    fn simulator_timestamps_are_evenly_spaced() {
        let source = SimFrameSource::new(vec![Motion::Idle(4)]);
        let times: Vec<f64> = collect(source)
            .into_iter()
            .map(|e| match e {
                SourceEvent::Frame { t, .. } => t,
                SourceEvent::Malformed { .. } => panic!("simulator never malformed"),
            })
            .collect();
        assert_eq!(times.len(), 4);
        for (i, t) in times.iter().enumerate() {
            assert!((t - (1.0 + i as f64 / SIM_FPS)).abs() < 1e-12);
        }
    }
}
