use std::time::Instant;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::EMPTY_LABEL;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;
use crate::tracking::domain::associator::Associator;
use crate::tracking::domain::feature_extractor::FeatureExtractor;
use crate::tracking::domain::lifecycle::{FrameOutcome, LifecycleManager};
use crate::tracking::domain::motion_model::MotionModel;
use crate::tracking::domain::track_table::{TrackSnapshot, TrackTable};
use crate::tracking::tracker_config::TrackerConfig;
use crate::tracking::tracker_error::TrackerError;

/// Keeps stable identities for detected objects across video frames.
///
/// Call [`update`](Self::update) once per frame with the detector output,
/// then read the current tracks with [`snapshot`](Self::snapshot). Updates
/// are synchronous and must not overlap.
pub struct MultiObjectTracker {
    config: TrackerConfig,
    table: TrackTable,
    extractor: Box<dyn FeatureExtractor>,
    motion: Box<dyn MotionModel>,
    frames_processed: usize,
}

impl MultiObjectTracker {
    pub fn new(
        config: TrackerConfig,
        extractor: Box<dyn FeatureExtractor>,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        if extractor.dimension() != config.feature_dimension {
            return Err(TrackerError::FeatureDimension {
                expected: config.feature_dimension,
                actual: extractor.dimension(),
            });
        }
        let table = TrackTable::new(
            config.capacity,
            config.feature_dimension,
            config.min_life,
            config.max_life,
        );
        let motion = config.motion_model.build();
        log::debug!(
            "Tracker ready: capacity={} features={} life=[{}, {}] motion={}",
            config.capacity,
            config.feature_dimension,
            config.min_life,
            config.max_life,
            config.motion_model
        );
        Ok(Self {
            config,
            table,
            extractor,
            motion,
            frames_processed: 0,
        })
    }

    /// Replaces the configured position-prediction strategy.
    pub fn with_motion_model(mut self, motion: Box<dyn MotionModel>) -> Self {
        self.motion = motion;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn table(&self) -> &TrackTable {
        &self.table
    }

    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }

    /// Advances the tracker by one frame.
    ///
    /// `boxes` and `labels` are parallel lists, one entry per detection.
    /// Inputs are validated and features extracted before the table is
    /// modified, so an error leaves the tracker exactly as it was.
    pub fn update(
        &mut self,
        frame: &Frame,
        boxes: &[BoundingBox],
        labels: &[u32],
    ) -> Result<FrameOutcome, TrackerError> {
        let start = Instant::now();

        if boxes.len() != labels.len() {
            return Err(TrackerError::DetectionCountMismatch {
                boxes: boxes.len(),
                labels: labels.len(),
            });
        }
        if let Some(index) = labels.iter().position(|&l| l == EMPTY_LABEL) {
            return Err(TrackerError::ReservedLabel { index });
        }
        if let Some(index) = boxes
            .iter()
            .position(|b| !b.to_array().iter().all(|v| v.is_finite()))
        {
            return Err(TrackerError::NonFiniteBox { index });
        }

        let features = self.extractor.extract_all(frame, boxes);
        if features.len() != boxes.len() {
            return Err(TrackerError::FeatureCount {
                expected: boxes.len(),
                actual: features.len(),
            });
        }
        if let Some(bad) = features
            .iter()
            .find(|f| f.len() != self.config.feature_dimension)
        {
            return Err(TrackerError::FeatureDimension {
                expected: self.config.feature_dimension,
                actual: bad.len(),
            });
        }

        let classifications = Associator::new(
            self.motion.as_ref(),
            self.config.thresholds(),
            self.config.center_weight,
        )
        .associate(&self.table, boxes, labels, &features);

        let outcome = LifecycleManager::new(self.motion.as_ref()).apply(
            &mut self.table,
            boxes,
            labels,
            features,
            &classifications,
        );
        self.frames_processed += 1;

        log::debug!(
            "Frame {}: {} detections, {} updated, {} occluded, {} born, {} dropped, {} decayed, {} freed, {} live ({:.2} ms)",
            frame.index(),
            boxes.len(),
            outcome.updated,
            outcome.occluded,
            outcome.born,
            outcome.dropped,
            outcome.decayed,
            outcome.freed,
            self.table.occupied_count(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        if log::log_enabled!(log::Level::Trace) {
            for line in self.table.status_lines() {
                log::trace!("{line}");
            }
        }

        Ok(outcome)
    }

    /// [`update`](Self::update) from raw detector output, keeping only
    /// detections scoring above `min_score`.
    pub fn update_with_detections(
        &mut self,
        frame: &Frame,
        detections: &[Detection],
        min_score: f64,
    ) -> Result<FrameOutcome, TrackerError> {
        let (boxes, labels) = Detection::filter_by_score(detections, min_score);
        self.update(frame, &boxes, &labels)
    }

    /// Live tracks whose life is at least `min_life`, in slot order.
    pub fn snapshot(&self, min_life: u32) -> Vec<TrackSnapshot> {
        self.table.snapshot(min_life)
    }
}
