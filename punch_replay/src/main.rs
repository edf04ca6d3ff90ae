//! punch_replay: command-line entry point.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use punch_replay::app::{self, AppConfig, OutputFormat};
use punch_replay::script;
use punch_replay::source::{spawn_frame_source, JsonLinesSource, SimFrameSource, SourceEvent};

#[derive(Parser, Debug)]
#[command(name = "punch_replay", version, about = "Replay keypoint streams through the punch classifier")]
struct Cli {
    /// JSON-lines recording to replay; `-` reads stdin
    #[arg(long, short, required_unless_present = "simulate", conflicts_with = "simulate")]
    input: Option<PathBuf>,

    /// Play the built-in scripted session instead of a recording
    #[arg(long)]
    simulate: bool,

    /// JSON config file with `classifier` and `keys` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Samples kept per side (overrides the config file)
    #[arg(long)]
    history: Option<usize>,

    /// Per-side cooldown in seconds (overrides the config file)
    #[arg(long)]
    cooldown: Option<f64>,

    /// Treat landmarks below this visibility as missing
    #[arg(long)]
    min_visibility: Option<f64>,

    /// Emit one JSON object per gesture instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "punch_replay=info,punch_motion=info".into()),
        )
        .init();

    let cfg = build_config(&cli)?;
    info!(
        history = cfg.classifier.history_len,
        cooldown = cfg.classifier.cooldown_secs,
        min_visibility = ?cfg.classifier.min_visibility,
        "punch_replay v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let rx = open_source(&cli)?;
    let format = cfg.output;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = app::run(cfg, rx, &mut out)?;
    summary.write_to(&mut out, format)?;
    out.flush()?;
    Ok(())
}

/// Config file (if any), then command-line overrides.
fn build_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut cfg = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(n) = cli.history {
        cfg.classifier.history_len = n;
    }
    if let Some(secs) = cli.cooldown {
        cfg.classifier.cooldown_secs = secs;
    }
    if cli.min_visibility.is_some() {
        cfg.classifier.min_visibility = cli.min_visibility;
    }
    if cli.json {
        cfg.output = OutputFormat::Json;
    }
    cfg.classifier.validate().context("invalid classifier settings")?;
    Ok(cfg)
}

fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn open_source(cli: &Cli) -> anyhow::Result<Receiver<SourceEvent>> {
    if cli.simulate {
        info!("replaying scripted demo session");
        return Ok(spawn_frame_source(SimFrameSource::new(script::demo_session())));
    }
    match cli.input.as_deref() {
        Some(path) if path == Path::new("-") => {
            info!("reading frames from stdin");
            Ok(spawn_frame_source(JsonLinesSource::new(BufReader::new(io::stdin()))))
        }
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening recording {}", path.display()))?;
            info!(path = %path.display(), "reading frames");
            Ok(spawn_frame_source(JsonLinesSource::new(BufReader::new(file))))
        }
        None => anyhow::bail!("nothing to replay: pass --input <PATH|-> or --simulate"),
    }
}
