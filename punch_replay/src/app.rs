//! Top-level replay loop.
//!
//! `AppState` owns the [`GestureClassifier`] and the [`KeyMap`].  It turns
//! each [`SourceEvent`] into at most one [`Emission`] and keeps the
//! counters reported at the end of a run.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::mpsc::Receiver;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use punch_motion::{ActionMapper, ClassifierConfig, GestureClassifier, GestureLabel, KeyMap};

use crate::source::SourceEvent;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// How emissions are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `t=12.345  Hook (R)      -> key 'l'`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Configuration for a replay run.  The classifier and key sections can be
/// loaded from a JSON file; the output format comes from the command line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub classifier: ClassifierConfig,
    pub keys: KeyMap,
    #[serde(skip)]
    pub output: OutputFormat,
}

// ════════════════════════════════════════════════════════════════════════════
// Emission / Summary
// ════════════════════════════════════════════════════════════════════════════

/// A gesture together with the key it maps to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Emission {
    pub t: f64,
    pub label: GestureLabel,
    pub key: Option<char>,
}

impl Emission {
    pub fn write_to<W: Write>(&self, out: &mut W, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Text => match self.key {
                Some(key) => writeln!(out, "t={:.3}  {:<12} -> key '{}'", self.t, self.label, key)?,
                None => writeln!(out, "t={:.3}  {}", self.t, self.label)?,
            },
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, self).context("encoding emission")?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// Counters for one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Frames handed to the classifier.
    pub frames: usize,
    /// Malformed or out-of-order input.
    pub skipped: usize,
    /// Only labels that fired.
    pub emissions: BTreeMap<GestureLabel, usize>,
}

/// Final line of JSON output: `{"summary": {...}}`.
#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a Summary,
}

impl Summary {
    pub fn count(&self, label: GestureLabel) -> usize {
        self.emissions.get(&label).copied().unwrap_or(0)
    }

    pub fn total_emissions(&self) -> usize {
        self.emissions.values().sum()
    }

    pub fn write_to<W: Write>(&self, out: &mut W, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Text => {
                writeln!(out)?;
                writeln!(out, "frames   {}", self.frames)?;
                writeln!(out, "skipped  {}", self.skipped)?;
                for label in GestureLabel::ALL.into_iter().filter(|l| l.is_event()) {
                    writeln!(out, "{:<12} {}", label, self.count(label))?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &SummaryLine { summary: self })
                    .context("encoding summary")?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    classifier: GestureClassifier,
    keys: KeyMap,
    summary: Summary,
    /// Timestamp of the last accepted frame.
    last_t: Option<f64>,
}

impl AppState {
    pub fn new(cfg: AppConfig) -> punch_motion::Result<Self> {
        Ok(AppState {
            classifier: GestureClassifier::new(cfg.classifier)?,
            keys: cfg.keys,
            summary: Summary::default(),
            last_t: None,
        })
    }

    pub fn handle_event(&mut self, event: SourceEvent) -> Option<Emission> {
        match event {
            SourceEvent::Frame { t, size, landmarks } => {
                // Trajectories must stay in timestamp order.
                if let Some(last) = self.last_t.filter(|&last| t < last) {
                    warn!(t, last, "frame older than its predecessor, skipping");
                    self.summary.skipped += 1;
                    return None;
                }
                self.last_t = Some(t);
                self.summary.frames += 1;

                let label = self.classifier.process_frame(&landmarks, t, size);
                if !label.is_event() {
                    return None;
                }
                *self.summary.emissions.entry(label).or_default() += 1;
                Some(Emission { t, label, key: self.keys.action_for(label) })
            }
            SourceEvent::Malformed { line, reason } => {
                warn!(line, %reason, "skipping malformed frame");
                self.summary.skipped += 1;
                None
            }
        }
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn into_summary(self) -> Summary {
        self.summary
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

/// Drain `rx` until the source hangs up, writing each emission to `out`.
pub fn run<W: Write>(cfg: AppConfig, rx: Receiver<SourceEvent>, out: &mut W) -> anyhow::Result<Summary> {
    let format = cfg.output;
    let mut app = AppState::new(cfg).context("invalid classifier configuration")?;

    for event in rx {
        if let Some(emission) = app.handle_event(event) {
            emission.write_to(out, format)?;
        }
    }
    out.flush()?;

    let summary = app.into_summary();
    info!(
        frames = summary.frames,
        skipped = summary.skipped,
        emissions = summary.total_emissions(),
        "input exhausted"
    );
    Ok(summary)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{self, Motion};
    use crate::source::{spawn_frame_source, JsonLinesSource, SimFrameSource};
    use punch_motion::{FrameSize, LandmarkFrame, Side};
    use std::io::Cursor;

    fn simulate(script: Vec<Motion>, cfg: AppConfig) -> (Summary, String) {
        let rx = spawn_frame_source(SimFrameSource::new(script));
        let mut out = Vec::new();
        let summary = run(cfg, rx, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    fn labels_of(text: &str) -> Vec<GestureLabel> {
        text.lines()
            .map(|line| {
                let label = line.split("  ").nth(1).unwrap();
                label.split(" -> ").next().unwrap().parse().unwrap()
            })
            .collect()
    }

    #[test]
    fn demo_session_yields_each_gesture_once() {
        let script = script::demo_session();
        let expected = script::expected_labels(&script);
        let (summary, text) = simulate(script.clone(), AppConfig::default());

        assert_eq!(labels_of(&text), expected);
        assert_eq!(summary.frames, script::render(&script).len());
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.total_emissions(), 5);
        for label in expected {
            assert_eq!(summary.count(label), 1, "{}", label);
        }
    }

    #[test]
    fn text_lines_carry_the_mapped_key() {
        let (_, text) = simulate(
            vec![Motion::Idle(12), Motion::Hook(Side::Left), Motion::Idle(4)],
            AppConfig::default(),
        );
        let line = text.lines().next().unwrap();
        assert!(line.starts_with("t="), "{}", line);
        assert!(line.contains("Hook (L)"), "{}", line);
        assert!(line.ends_with("-> key 's'"), "{}", line);
    }

    #[test]
    fn custom_keys_and_json_output() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"keys": {"uppercut_right": "u"}}"#).unwrap();
        let cfg = AppConfig { output: OutputFormat::Json, ..cfg };
        let (_, text) = simulate(
            vec![Motion::Idle(12), Motion::Uppercut(Side::Right), Motion::Idle(4)],
            cfg,
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["label"], "uppercut_right");
        assert_eq!(value["key"], "u");
        assert!(value["t"].as_f64().unwrap() > 1.0);
    }

    #[test]
    fn config_file_sections_are_optional() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"classifier": {"cooldown_secs": 0.5}}"#).unwrap();
        assert_eq!(cfg.classifier.cooldown_secs, 0.5);
        assert_eq!(cfg.classifier.history_len, ClassifierConfig::default().history_len);
        assert_eq!(cfg.keys, KeyMap::default());
    }

    #[test]
    fn invalid_config_fails_the_run() {
        let mut cfg = AppConfig::default();
        cfg.classifier.history_len = 0;
        let rx = spawn_frame_source(SimFrameSource::new(vec![Motion::Idle(1)]));
        assert!(run(cfg, rx, &mut Vec::new()).is_err());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let input = "\
{\"t\": 1.0, \"width\": 640, \"height\": 480}
garbage
{\"t\": 1.1, \"width\": -5, \"height\": 480}
{\"t\": 1.2, \"width\": 640, \"height\": 480}
";
        let rx = spawn_frame_source(JsonLinesSource::new(Cursor::new(input)));
        let mut out = Vec::new();
        let summary = run(AppConfig::default(), rx, &mut out).unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.skipped, 2);
        assert!(out.is_empty());
    }

    #[test]
    fn out_of_order_frames_are_skipped() {
        let mut app = AppState::new(AppConfig::default()).unwrap();
        let frame = |t| SourceEvent::Frame { t, size: FrameSize::VGA, landmarks: LandmarkFrame::new() };
        assert_eq!(app.handle_event(frame(2.0)), None);
        assert_eq!(app.handle_event(frame(1.5)), None);
        assert_eq!(app.handle_event(frame(2.0)), None);
        assert_eq!(app.summary().frames, 2);
        assert_eq!(app.summary().skipped, 1);
    }

    #[test]
    fn recorded_session_matches_simulation() {
        // Serialise the simulated frames to JSON lines and replay them.
        let script = vec![Motion::Idle(12), Motion::Block, Motion::Idle(4)];
        let mut recording = String::new();
        for (i, frame) in script::render(&script).into_iter().enumerate() {
            let landmarks = punch_motion::BodyPart::ALL
                .into_iter()
                .filter_map(|part| {
                    let lm = frame.get(part)?;
                    Some((part.key(), vec![part.pose_index() as f64, lm.x, lm.y]))
                })
                .collect();
            let record = crate::source::FrameRecord {
                t: 1.0 + i as f64 * 0.025,
                width: 640.0,
                height: 480.0,
                landmarks,
            };
            recording.push_str(&serde_json::to_string(&record).unwrap());
            recording.push('\n');
        }

        let rx = spawn_frame_source(JsonLinesSource::new(Cursor::new(recording)));
        let mut out = Vec::new();
        let summary = run(AppConfig::default(), rx, &mut out).unwrap();
        assert_eq!(summary.count(GestureLabel::Block), 1);
        assert_eq!(summary.total_emissions(), 1);
        assert!(String::from_utf8(out).unwrap().contains("Block"));
    }

    #[test]
    fn summary_lists_every_event_label() {
        let summary = Summary {
            frames: 3,
            skipped: 0,
            emissions: BTreeMap::from([(GestureLabel::Block, 2)]),
        };
        let mut out = Vec::new();
        summary.write_to(&mut out, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("frames   3"));
        assert!(text.contains("Block        2"));
        assert!(text.contains("Hook (L)     0"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn json_summary_is_one_tagged_line() {
        let summary = Summary {
            frames: 120,
            skipped: 1,
            emissions: BTreeMap::from([(GestureLabel::HookRight, 1), (GestureLabel::Block, 2)]),
        };
        let mut out = Vec::new();
        summary.write_to(&mut out, OutputFormat::Json).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(
            text.trim_end(),
            r#"{"summary":{"frames":120,"skipped":1,"emissions":{"block":2,"hook_right":1}}}"#
        );
    }
}
