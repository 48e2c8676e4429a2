/// Per-frame association of detections to live tracks.
///
/// Detections and tracks are partitioned by label. Within a label, each
/// detection is compared against the predicted position of every live track
/// using a weighted sum of center distance and feature distance, and is
/// classified from the nearest and second-nearest candidates:
///
/// - nearest is close and clearly nearer than the runner-up: correspondent
/// - nearest is close but the runner-up is almost as near: occlusion
/// - nothing is close: new match
use std::collections::BTreeSet;

use ndarray::{Array1, Array2, ArrayView1};

use crate::shared::bounding_box::BoundingBox;
use crate::tracking::domain::motion_model::MotionModel;
use crate::tracking::domain::track_table::TrackTable;
use crate::tracking::infrastructure::distance::{features_matrix, pairwise_distances, points_matrix};

/// Outcome for one detection. Slot indices refer to the track table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchClassification {
    /// Unambiguously the same object as the track in this slot.
    Correspondent(usize),
    /// Probably the track in this slot, but too close to another candidate
    /// to trust its position.
    Occlusion(usize),
    /// No existing track is close enough.
    NewMatch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchThresholds {
    /// Nearest distance must be strictly below this to match at all.
    pub close: f64,
    /// Nearest and second-nearest must differ by strictly more than this.
    pub gap: f64,
}

/// Classifies a detection from its nearest candidate distance `d_min` and
/// second-nearest distance `d_second` (`None` with a single candidate).
pub fn classify(
    d_min: f64,
    d_second: Option<f64>,
    candidate: usize,
    thresholds: &MatchThresholds,
) -> MatchClassification {
    let gap = d_second.map_or(f64::INFINITY, |d| (d_min - d).abs());
    if d_min < thresholds.close && gap > thresholds.gap {
        MatchClassification::Correspondent(candidate)
    } else if d_min < thresholds.close {
        MatchClassification::Occlusion(candidate)
    } else {
        MatchClassification::NewMatch
    }
}

/// Classifies one row of a distance matrix; `candidate` in the result is the
/// column index of the nearest entry. NaN entries are never candidates.
pub fn classify_row(row: ArrayView1<'_, f64>, thresholds: &MatchThresholds) -> MatchClassification {
    let mut nearest: Option<(usize, f64)> = None;
    let mut second: Option<f64> = None;
    for (j, &d) in row.iter().enumerate().filter(|(_, d)| !d.is_nan()) {
        match nearest {
            Some((_, best)) if d >= best => {
                if second.map_or(true, |s| d < s) {
                    second = Some(d);
                }
            }
            _ => {
                second = nearest.map(|(_, best)| best);
                nearest = Some((j, d));
            }
        }
    }
    match nearest {
        Some((j, d_min)) => classify(d_min, second, j, thresholds),
        None => MatchClassification::NewMatch,
    }
}

pub struct Associator<'a> {
    motion: &'a dyn MotionModel,
    thresholds: MatchThresholds,
    center_weight: f64,
}

impl<'a> Associator<'a> {
    pub fn new(motion: &'a dyn MotionModel, thresholds: MatchThresholds, center_weight: f64) -> Self {
        Self {
            motion,
            thresholds,
            center_weight,
        }
    }

    /// Classifies every detection. The result is parallel to `boxes`.
    ///
    /// `boxes`, `labels` and `features` must have the same length.
    pub fn associate(
        &self,
        table: &TrackTable,
        boxes: &[BoundingBox],
        labels: &[u32],
        features: &[Array1<f64>],
    ) -> Vec<MatchClassification> {
        debug_assert_eq!(boxes.len(), labels.len());
        debug_assert_eq!(boxes.len(), features.len());

        let mut result = vec![MatchClassification::NewMatch; boxes.len()];
        let unique_labels: BTreeSet<u32> = labels.iter().copied().collect();

        for label in unique_labels {
            let detections: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == label).collect();
            let slots = table.slots_with_label(label);
            if slots.is_empty() {
                // Every distance is effectively infinite: all new matches.
                continue;
            }

            let distances = self.combined_distances(table, &slots, &detections, boxes, features);
            for (row, &det) in detections.iter().enumerate() {
                result[det] = match classify_row(distances.row(row), &self.thresholds) {
                    MatchClassification::Correspondent(col) => MatchClassification::Correspondent(slots[col]),
                    MatchClassification::Occlusion(col) => MatchClassification::Occlusion(slots[col]),
                    MatchClassification::NewMatch => MatchClassification::NewMatch,
                };
            }

            log::trace!(
                "label {label}: {} detections vs {} tracks, distances {:?}",
                detections.len(),
                slots.len(),
                distances
            );
        }

        result
    }

    /// `weight * center_distance + (1 - weight) * feature_distance`, with
    /// tracks at their predicted positions. Rows are detections, columns slots.
    fn combined_distances(
        &self,
        table: &TrackTable,
        slots: &[usize],
        detections: &[usize],
        boxes: &[BoundingBox],
        features: &[Array1<f64>],
    ) -> Array2<f64> {
        let tracked = slots.iter().filter_map(|&i| table.slot(i));

        let mut predicted_centers = Vec::with_capacity(slots.len());
        let mut tracked_features = Vec::with_capacity(slots.len());
        for slot in tracked {
            predicted_centers.push(self.motion.predict(slot.bbox(), slot.movement()).center());
            tracked_features.push(slot.feature());
        }

        let detection_centers: Vec<_> = detections.iter().map(|&i| boxes[i].center()).collect();
        let detection_features: Vec<&Array1<f64>> = detections.iter().map(|&i| &features[i]).collect();
        let dimension = tracked_features.first().map_or(0, |f| f.len());

        let center_distances = pairwise_distances(
            points_matrix(&detection_centers).view(),
            points_matrix(&predicted_centers).view(),
        );
        let feature_distances = pairwise_distances(
            features_matrix(&detection_features, dimension).view(),
            features_matrix(&tracked_features, dimension).view(),
        );

        center_distances * self.center_weight + feature_distances * (1.0 - self.center_weight)
    }
}
