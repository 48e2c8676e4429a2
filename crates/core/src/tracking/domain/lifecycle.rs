/// Applies one frame's association results to the track table.
///
/// Detections are applied in input order. Correspondents move their track
/// and raise its life, occlusions only keep their track alive, new matches
/// start tracks while free slots last. Afterwards every live track that no
/// detection touched is extrapolated and loses one life; tracks reaching the
/// minimum life free their slot.
use ndarray::Array1;

use crate::shared::bounding_box::BoundingBox;
use crate::tracking::domain::associator::MatchClassification;
use crate::tracking::domain::motion_model::MotionModel;
use crate::tracking::domain::track_table::TrackTable;

/// Per-frame counts of what happened to the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub updated: usize,
    pub occluded: usize,
    pub born: usize,
    /// New matches discarded because the table was full.
    pub dropped: usize,
    pub decayed: usize,
    pub freed: usize,
}

pub struct LifecycleManager<'a> {
    motion: &'a dyn MotionModel,
}

impl<'a> LifecycleManager<'a> {
    pub fn new(motion: &'a dyn MotionModel) -> Self {
        Self { motion }
    }

    /// `boxes`, `features` and `classifications` are parallel, one entry
    /// per detection.
    pub fn apply(
        &self,
        table: &mut TrackTable,
        boxes: &[BoundingBox],
        labels: &[u32],
        features: Vec<Array1<f64>>,
        classifications: &[MatchClassification],
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        let mut touched = vec![false; table.capacity()];
        let mut updated = vec![false; table.capacity()];

        for (i, feature) in features.into_iter().enumerate() {
            match classifications[i] {
                // A slot moves at most once per frame; later claims only hold it.
                MatchClassification::Correspondent(slot) if !updated[slot] => {
                    table.apply_correspondence(slot, boxes[i], feature);
                    updated[slot] = true;
                    touched[slot] = true;
                    outcome.updated += 1;
                }
                MatchClassification::Correspondent(slot) | MatchClassification::Occlusion(slot) => {
                    touched[slot] = true;
                    outcome.occluded += 1;
                }
                MatchClassification::NewMatch => match table.allocate(boxes[i], labels[i], feature) {
                    Some(slot) => {
                        touched[slot] = true;
                        outcome.born += 1;
                    }
                    None => {
                        log::debug!(
                            "Track table full ({} slots), dropping label {} detection at {:?}",
                            table.capacity(),
                            labels[i],
                            boxes[i].to_array()
                        );
                        outcome.dropped += 1;
                    }
                },
            }
        }

        for slot in table.occupied_slots() {
            if touched[slot] {
                continue;
            }
            outcome.decayed += 1;
            if table.decay(slot, self.motion) {
                outcome.freed += 1;
            }
        }

        outcome
    }
}
