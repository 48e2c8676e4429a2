use thiserror::Error;

use crate::tracking::tracker_config::ConfigError;

/// Rejections raised by [`MultiObjectTracker`](super::multi_object_tracker::MultiObjectTracker).
///
/// Every `update` precondition is checked before the track table is
/// touched, so an error never leaves the table half-updated.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("detection count mismatch: {boxes} boxes but {labels} labels")]
    DetectionCountMismatch { boxes: usize, labels: usize },
    #[error("detection {index} uses the reserved empty-slot label 0")]
    ReservedLabel { index: usize },
    #[error("detection {index} has a non-finite box coordinate")]
    NonFiniteBox { index: usize },
    #[error("feature extractor returned {actual} descriptors for {expected} detections")]
    FeatureCount { expected: usize, actual: usize },
    #[error("feature extractor returned {actual} values, expected {expected}")]
    FeatureDimension { expected: usize, actual: usize },
    #[error("invalid tracker configuration: {0}")]
    Config(#[from] ConfigError),
}
