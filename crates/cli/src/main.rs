use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde::{Deserialize, Serialize};

use objtrack_core::shared::bounding_box::BoundingBox;
use objtrack_core::shared::coco_labels::label_name;
use objtrack_core::shared::constants::DEFAULT_MIN_SCORE;
use objtrack_core::shared::detection::Detection;
use objtrack_core::shared::frame::Frame;
use objtrack_core::tracking::domain::feature_extractor::FeatureExtractor;
use objtrack_core::tracking::domain::track_table::TrackSnapshot;
use objtrack_core::tracking::infrastructure::histogram_feature_extractor::HistogramFeatureExtractor;
use objtrack_core::tracking::infrastructure::parallel_feature_extractor::ParallelFeatureExtractor;
use objtrack_core::tracking::infrastructure::uniform_feature_extractor::UniformFeatureExtractor;
use objtrack_core::tracking::multi_object_tracker::MultiObjectTracker;
use objtrack_core::tracking::tracker_config::TrackerConfig;
use objtrack_core::video::infrastructure::image_file_reader::ImageFileReader;

/// Replays per-frame detector output through the multi-object tracker.
#[derive(Parser)]
#[command(name = "objtrack")]
struct Cli {
    /// JSON file with one entry per frame: optional image path and detections.
    detections: PathBuf,

    /// Tracker config JSON (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Discard detections scoring at or below this value (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: f64,

    /// Only report tracks with at least this much life.
    #[arg(long, default_value = "1")]
    snapshot_life: u32,

    /// Appearance features: histogram or uniform.
    #[arg(long, default_value = "uniform")]
    features: String,

    /// Override the configured track table capacity.
    #[arg(long)]
    capacity: Option<usize>,

    /// Override the configured maximum track life.
    #[arg(long)]
    max_life: Option<u32>,

    /// Write JSON lines here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    image: Option<PathBuf>,
    #[serde(default)]
    detections: Vec<Detection>,
}

#[derive(Debug, Serialize)]
struct FrameReport {
    frame: usize,
    tracks: Vec<TrackReport>,
}

#[derive(Debug, Serialize)]
struct TrackReport {
    track_id: u32,
    label: u32,
    label_name: &'static str,
    #[serde(rename = "box")]
    bbox: BoundingBox,
}

impl From<&TrackSnapshot> for TrackReport {
    fn from(t: &TrackSnapshot) -> Self {
        Self {
            track_id: t.track_id,
            label: t.label,
            label_name: label_name(t.label),
            bbox: t.bbox,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let extractor = build_extractor(&cli.features, config.feature_dimension);
    let mut tracker = MultiObjectTracker::new(config, extractor)?;

    let records = load_records(&cli.detections)?;
    log::info!(
        "Loaded {} frames from {}",
        records.len(),
        cli.detections.display()
    );

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(fs::File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let base_dir = cli.detections.parent().unwrap_or_else(|| Path::new("."));
    let reader = ImageFileReader::new();
    for (index, record) in records.iter().enumerate() {
        let frame = match &record.image {
            Some(image) => reader.read(&base_dir.join(image), index)?,
            None => Frame::blank(index),
        };
        tracker.update_with_detections(&frame, &record.detections, cli.min_score)?;

        let report = FrameReport {
            frame: index,
            tracks: tracker
                .snapshot(cli.snapshot_life)
                .iter()
                .map(TrackReport::from)
                .collect(),
        };
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }
    out.flush()?;

    log::info!(
        "Tracked {} frames, {} track IDs issued",
        tracker.frames_processed(),
        tracker.table().max_issued_id()
    );
    if let Some(path) = &cli.output {
        log::info!("Output written to {}", path.display());
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<TrackerConfig, Box<dyn std::error::Error>> {
    let path = cli.config.clone().or_else(TrackerConfig::default_path);
    let mut config = TrackerConfig::load_or_default(path.as_deref())?;
    if let Some(capacity) = cli.capacity {
        config.capacity = capacity;
    }
    if let Some(max_life) = cli.max_life {
        config.max_life = max_life;
    }
    config.validate()?;
    Ok(config)
}

fn build_extractor(kind: &str, dimension: usize) -> Box<dyn FeatureExtractor> {
    if kind == "histogram" {
        Box::new(ParallelFeatureExtractor::with_available_parallelism(
            Box::new(HistogramFeatureExtractor::new(dimension)),
        ))
    } else {
        Box::new(UniformFeatureExtractor::new(dimension))
    }
}

fn load_records(path: &Path) -> Result<Vec<FrameRecord>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let records: Vec<FrameRecord> = serde_json::from_str(&json)?;
    let skipped = records
        .iter()
        .flat_map(|r| &r.detections)
        .filter(|d| d.label == 0)
        .count();
    if skipped > 0 {
        log::warn!("{skipped} detections use background label 0 and will be ignored");
    }
    Ok(records
        .into_iter()
        .map(|mut r| {
            r.detections.retain(|d| d.label != 0);
            r
        })
        .collect())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.detections.exists() {
        return Err(format!("Detections file not found: {}", cli.detections.display()).into());
    }
    if let Some(config) = &cli.config {
        if !config.exists() {
            return Err(format!("Config file not found: {}", config.display()).into());
        }
    }
    if !(0.0..=1.0).contains(&cli.min_score) {
        return Err(format!(
            "Min score must be between 0.0 and 1.0, got {}",
            cli.min_score
        )
        .into());
    }
    if cli.features != "histogram" && cli.features != "uniform" {
        return Err(format!(
            "Features must be 'histogram' or 'uniform', got '{}'",
            cli.features
        )
        .into());
    }
    if cli.capacity == Some(0) {
        return Err("Capacity must be at least 1".into());
    }
    Ok(())
}
