//! Scene dump tool for Inkscene.
//!
//! Loads an SVG document, flattens it into a scene and prints the entries,
//! the envelope and the camera framing.
//!
//! ## Usage
//!
//! ```bash
//! # Human-readable summary
//! scene-dump drawing.svg
//!
//! # Full scene as JSON, y-up, framed for a 1920x1080 viewport
//! scene-dump drawing.svg --flip-y --width 1920 --height 1080 --json
//!
//! # Trace the path engine
//! scene-dump drawing.svg --log-level trace --log-format compact
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use inkscene_common::{init_logging, LogConfig, LogFormat};
use inkscene_svg::{BoundingBox, Camera, Color, Document, Scene, SceneConfig, SceneEntry};
use serde::Serialize;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "scene-dump")]
#[command(about = "Load an SVG file and print the flattened scene")]
struct Cli {
    /// SVG file to load
    file: PathBuf,
    /// JSON scene configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Viewport width used for camera framing
    #[arg(long)]
    width: Option<f64>,
    /// Viewport height used for camera framing
    #[arg(long)]
    height: Option<f64>,
    /// Flip the y axis so that the scene is y-up
    #[arg(long)]
    flip_y: bool,
    /// Print the whole scene as JSON
    #[arg(long)]
    json: bool,
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: Level,
    /// Log format (pretty, compact, json)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,
}

/// JSON form of a loaded scene.
#[derive(Serialize)]
struct SceneReport<'a> {
    file: String,
    background: Option<Color>,
    envelope: Option<BoundingBox>,
    camera: Camera,
    entries: &'a [SceneEntry],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(
        LogConfig::default()
            .with_level(cli.log_level)
            .with_format(cli.log_format),
    )
    .context("failed to initialize logging")?;

    let config = scene_config(&cli)?;
    let scene = load_scene(&cli.file, &config)?;
    info!(entries = scene.len(), "Loaded {}", cli.file.display());

    let output = if cli.json {
        render_json(&cli.file, &scene)?
    } else {
        render_text(&cli.file, &scene)?
    };
    println!("{output}");
    Ok(())
}

/// The configuration file, if any, with command line overrides applied.
fn scene_config(cli: &Cli) -> Result<SceneConfig> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(width) = cli.width {
        config.viewport_width = width;
    }
    if let Some(height) = cli.height {
        config.viewport_height = height;
    }
    if cli.flip_y {
        config.flip_y = true;
    }
    config.validate().context("invalid scene configuration")?;
    Ok(config)
}

fn load_scene(file: &Path, config: &SceneConfig) -> Result<Scene> {
    let document =
        Document::open(file).with_context(|| format!("failed to load {}", file.display()))?;
    Scene::build(&document, config)
        .with_context(|| format!("failed to build scene for {}", file.display()))
}

fn render_json(file: &Path, scene: &Scene) -> Result<String> {
    let envelope = scene.envelope();
    let report = SceneReport {
        file: file.display().to_string(),
        background: scene.background(),
        envelope: (!envelope.is_empty()).then_some(envelope),
        camera: scene.camera(),
        entries: scene.entries(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn render_text(file: &Path, scene: &Scene) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "scene: {}", file.display())?;
    writeln!(out, "entries: {}", scene.len())?;
    for (i, entry) in scene.entries().iter().enumerate() {
        writeln!(
            out,
            "  [{}] {} fill={} stroke={} box={}",
            i,
            entry.shape.kind(),
            paint(entry.fill),
            paint(entry.stroke),
            format_box(&entry.shape.bounding_box())
        )?;
    }
    writeln!(out, "envelope: {}", format_box(&scene.envelope()))?;
    let camera = scene.camera();
    writeln!(
        out,
        "camera: center=({}, {}) scale={}",
        camera.center_x, camera.center_y, camera.scale
    )?;
    write!(out, "background: {}", paint(scene.background()))?;
    Ok(out)
}

fn paint(color: Option<Color>) -> String {
    color.map_or_else(|| "none".to_string(), |c| c.to_string())
}

fn format_box(bounding_box: &BoundingBox) -> String {
    if bounding_box.is_empty() {
        return "empty".to_string();
    }
    format!(
        "({}, {})-({}, {})",
        bounding_box.min_x, bounding_box.min_y, bounding_box.max_x, bounding_box.max_y
    )
}
