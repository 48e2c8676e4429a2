use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CAPACITY, DEFAULT_CENTER_WEIGHT,
    DEFAULT_CLOSE_THRESHOLD, DEFAULT_FEATURE_DIMENSION, DEFAULT_GAP_THRESHOLD, DEFAULT_MAX_LIFE,
    DEFAULT_MIN_LIFE,
};
use crate::tracking::domain::associator::MatchThresholds;
use crate::tracking::domain::motion_model::MotionModelKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,
    #[error("feature dimension must be at least 1")]
    ZeroFeatureDimension,
    #[error("min_life ({min_life}) must be below max_life ({max_life})")]
    LifeRange { min_life: u32, max_life: u32 },
    #[error("center_weight must be within [0, 1], got {0}")]
    CenterWeight(f64),
    #[error("{name} must be a finite non-negative distance, got {value}")]
    Threshold { name: &'static str, value: f64 },
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Tracker parameters, fixed for the lifetime of a tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum number of concurrently tracked objects.
    pub capacity: usize,
    pub feature_dimension: usize,
    pub min_life: u32,
    pub max_life: u32,
    pub close_threshold: f64,
    pub gap_threshold: f64,
    pub center_weight: f64,
    pub motion_model: MotionModelKind,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            feature_dimension: DEFAULT_FEATURE_DIMENSION,
            min_life: DEFAULT_MIN_LIFE,
            max_life: DEFAULT_MAX_LIFE,
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
            gap_threshold: DEFAULT_GAP_THRESHOLD,
            center_weight: DEFAULT_CENTER_WEIGHT,
            motion_model: MotionModelKind::default(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.feature_dimension == 0 {
            return Err(ConfigError::ZeroFeatureDimension);
        }
        if self.min_life >= self.max_life {
            return Err(ConfigError::LifeRange {
                min_life: self.min_life,
                max_life: self.max_life,
            });
        }
        if !(0.0..=1.0).contains(&self.center_weight) {
            return Err(ConfigError::CenterWeight(self.center_weight));
        }
        for (name, value) in [
            ("close_threshold", self.close_threshold),
            ("gap_threshold", self.gap_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Threshold { name, value });
            }
        }
        Ok(())
    }

    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            close: self.close_threshold,
            gap: self.gap_threshold,
        }
    }

    /// Reads and validates a JSON config. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TrackerConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// `<platform config dir>/objtrack/tracker.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => Self::from_json_file(p),
            _ => Ok(Self::default()),
        }
    }
}
