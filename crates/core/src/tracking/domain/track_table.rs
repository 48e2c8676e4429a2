/// Fixed-capacity table of tracked-object slots.
///
/// The table owns every per-track field. Slots are never added or removed
/// after construction; each one is either free (`life == min_life`,
/// `track_id == 0`) or holds exactly one live track. Track IDs come from a
/// monotonic counter, so an ID is never issued twice even after the track
/// holding the highest ID dies.
use ndarray::Array1;
use serde::Serialize;

use crate::shared::bounding_box::{BoundingBox, Vector2};
use crate::shared::constants::{EMPTY_LABEL, UNASSIGNED_TRACK_ID};
use crate::tracking::domain::motion_model::MotionModel;

#[derive(Clone, Debug, PartialEq)]
pub struct TrackSlot {
    bbox: BoundingBox,
    label: u32,
    feature: Array1<f64>,
    movement: Vector2,
    track_id: u32,
    life: u32,
}

impl TrackSlot {
    fn free(feature_dimension: usize, min_life: u32) -> Self {
        Self {
            bbox: BoundingBox::default(),
            label: EMPTY_LABEL,
            feature: Array1::zeros(feature_dimension),
            movement: [0.0, 0.0],
            track_id: UNASSIGNED_TRACK_ID,
            life: min_life,
        }
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn label(&self) -> u32 {
        self.label
    }

    pub fn feature(&self) -> &Array1<f64> {
        &self.feature
    }

    pub fn movement(&self) -> Vector2 {
        self.movement
    }

    /// 0 while the slot is free.
    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn life(&self) -> u32 {
        self.life
    }
}

/// Externally visible view of one live track.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackSnapshot {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub label: u32,
    pub track_id: u32,
}

pub struct TrackTable {
    slots: Box<[TrackSlot]>,
    min_life: u32,
    max_life: u32,
    last_issued_id: u32,
}

impl TrackTable {
    pub fn new(capacity: usize, feature_dimension: usize, min_life: u32, max_life: u32) -> Self {
        debug_assert!(min_life < max_life, "min_life must be below max_life");
        Self {
            slots: vec![TrackSlot::free(feature_dimension, min_life); capacity].into_boxed_slice(),
            min_life,
            max_life,
            last_issued_id: UNASSIGNED_TRACK_ID,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn min_life(&self) -> u32 {
        self.min_life
    }

    pub fn max_life(&self) -> u32 {
        self.max_life
    }

    pub fn slot(&self, index: usize) -> Option<&TrackSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[TrackSlot] {
        &self.slots
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|s| s.life > self.min_life)
    }

    /// Indices of all slots holding a live track, in slot order.
    pub fn occupied_slots(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.is_occupied(i))
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.life > self.min_life).count()
    }

    /// Lowest-indexed free slot.
    pub fn find_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.life == self.min_life)
    }

    /// Highest track ID ever issued by this table; 0 before the first one.
    pub fn max_issued_id(&self) -> u32 {
        self.last_issued_id
    }

    /// Starts a new track in the lowest free slot.
    ///
    /// Returns `None` when the table is full or the ID space is exhausted;
    /// the caller drops the detection.
    pub fn allocate(&mut self, bbox: BoundingBox, label: u32, feature: Array1<f64>) -> Option<usize> {
        let index = self.find_free_slot()?;
        let Some(track_id) = self.last_issued_id.checked_add(1) else {
            log::warn!("Track ID space exhausted after {} IDs", self.last_issued_id);
            return None;
        };
        self.last_issued_id = track_id;
        self.slots[index] = TrackSlot {
            bbox,
            label,
            feature,
            movement: [0.0, 0.0],
            track_id,
            life: self.min_life + 1,
        };
        Some(index)
    }

    /// Live slots of the given label, in slot order.
    pub fn slots_with_label(&self, label: u32) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.life > self.min_life && s.label == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Live tracks with `life >= min_life`, in slot order. Free slots are
    /// never reported, whatever the threshold.
    pub fn snapshot(&self, min_life: u32) -> Vec<TrackSnapshot> {
        self.slots
            .iter()
            .filter(|s| s.life > self.min_life && s.life >= min_life)
            .map(|s| TrackSnapshot {
                bbox: s.bbox,
                label: s.label,
                track_id: s.track_id,
            })
            .collect()
    }

    /// Moves a live track to a confidently matched detection and raises
    /// its life by one, up to `max_life`.
    pub fn apply_correspondence(&mut self, index: usize, bbox: BoundingBox, feature: Array1<f64>) {
        let max_life = self.max_life;
        let slot = &mut self.slots[index];
        slot.movement = bbox.center_delta(&slot.bbox);
        slot.bbox = bbox;
        slot.feature = feature;
        slot.life = (slot.life + 1).min(max_life);
    }

    /// Extrapolates an unmatched track and lowers its life by one.
    ///
    /// Returns `true` if the track died and its slot is free again.
    pub fn decay(&mut self, index: usize, motion: &dyn MotionModel) -> bool {
        let min_life = self.min_life;
        let slot = &mut self.slots[index];
        slot.bbox = motion.predict(&slot.bbox, slot.movement);
        slot.life = slot.life.saturating_sub(1).max(min_life);
        if slot.life == min_life {
            slot.track_id = UNASSIGNED_TRACK_ID;
            slot.label = EMPTY_LABEL;
            return true;
        }
        false
    }

    /// One line per slot, for trace-level status dumps.
    pub fn status_lines(&self) -> Vec<String> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let b = s.bbox;
                format!(
                    "slot {i:3}: id={:<5} label={:<3} life={} box=[{:.1}, {:.1}, {:.1}, {:.1}] move=[{:.1}, {:.1}]",
                    s.track_id, s.label, s.life, b.x1, b.y1, b.x2, b.y2, s.movement[0], s.movement[1]
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::domain::motion_model::{ConstantVelocity, Stationary};
    use approx::assert_relative_eq;

    fn bbox(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x, y, x + 10.0, y + 10.0)
    }

    fn table(capacity: usize) -> TrackTable {
        TrackTable::new(capacity, 4, 0, 5)
    }

    #[test]
    fn test_new_table_is_all_free() {
        let t = table(3);
        assert_eq!(t.capacity(), 3);
        assert_eq!(t.occupied_count(), 0);
        assert_eq!(t.find_free_slot(), Some(0));
        assert_eq!(t.max_issued_id(), 0);
        assert!(t.slots().iter().all(|s| s.track_id() == 0 && s.life() == 0));
    }

    #[test]
    fn test_allocate_fills_lowest_free_slot() {
        let mut t = table(3);
        let idx = t.allocate(bbox(10.0, 10.0), 64, Array1::ones(4)).unwrap();
        assert_eq!(idx, 0);
        let s = t.slot(0).unwrap();
        assert_eq!(s.track_id(), 1);
        assert_eq!(s.life(), 1);
        assert_eq!(s.label(), 64);
        assert_eq!(s.movement(), [0.0, 0.0]);
        assert_eq!(s.feature(), &Array1::<f64>::ones(4));
        assert_eq!(t.find_free_slot(), Some(1));
    }

    #[test]
    fn test_allocate_when_full_returns_none() {
        let mut t = table(2);
        assert!(t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4)).is_some());
        assert!(t.allocate(bbox(50.0, 0.0), 1, Array1::zeros(4)).is_some());
        assert_eq!(t.allocate(bbox(100.0, 0.0), 1, Array1::zeros(4)), None);
        assert_eq!(t.occupied_count(), 2);
        assert_eq!(t.max_issued_id(), 2);
    }

    #[test]
    fn test_freed_slot_is_reused_with_fresh_id() {
        let mut t = table(2);
        t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4));
        t.allocate(bbox(50.0, 0.0), 1, Array1::zeros(4));
        assert!(t.decay(1, &Stationary));
        assert_eq!(t.find_free_slot(), Some(1));

        let idx = t.allocate(bbox(80.0, 0.0), 1, Array1::zeros(4)).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(t.slot(1).unwrap().track_id(), 3);
    }

    #[test]
    fn test_max_issued_id_does_not_regress_when_highest_dies() {
        let mut t = table(3);
        t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4));
        t.allocate(bbox(50.0, 0.0), 1, Array1::zeros(4));
        t.decay(1, &Stationary);
        assert_eq!(t.max_issued_id(), 2);
        let idx = t.allocate(bbox(90.0, 0.0), 1, Array1::zeros(4)).unwrap();
        assert_eq!(t.slot(idx).unwrap().track_id(), 3);
    }

    #[test]
    fn test_allocate_refuses_once_ids_exhausted() {
        let mut t = table(3);
        t.last_issued_id = u32::MAX - 1;
        let idx = t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4)).unwrap();
        assert_eq!(t.slot(idx).unwrap().track_id(), u32::MAX);

        assert_eq!(t.allocate(bbox(50.0, 0.0), 1, Array1::zeros(4)), None);
        assert_eq!(t.occupied_count(), 1);
        assert_eq!(t.max_issued_id(), u32::MAX);
        assert!(!t.is_occupied(1));
    }

    #[test]
    fn test_slots_with_label_filters_live_tracks() {
        let mut t = table(4);
        t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4));
        t.allocate(bbox(20.0, 0.0), 3, Array1::zeros(4));
        t.allocate(bbox(40.0, 0.0), 1, Array1::zeros(4));
        assert_eq!(t.slots_with_label(1), vec![0, 2]);
        assert_eq!(t.slots_with_label(3), vec![1]);
        assert!(t.slots_with_label(7).is_empty());

        t.decay(0, &Stationary);
        assert_eq!(t.slots_with_label(1), vec![2]);
    }

    #[test]
    fn test_correspondence_updates_state() {
        let mut t = table(1);
        t.allocate(bbox(10.0, 10.0), 1, Array1::zeros(4));
        t.apply_correspondence(0, bbox(13.0, 14.0), Array1::ones(4));
        let s = t.slot(0).unwrap();
        assert_eq!(*s.bbox(), bbox(13.0, 14.0));
        assert_relative_eq!(s.movement()[0], 3.0);
        assert_relative_eq!(s.movement()[1], 4.0);
        assert_eq!(s.life(), 2);
        assert_eq!(s.feature(), &Array1::<f64>::ones(4));
    }

    #[test]
    fn test_correspondence_life_clamped_at_max() {
        let mut t = table(1);
        t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4));
        for _ in 0..10 {
            t.apply_correspondence(0, bbox(0.0, 0.0), Array1::zeros(4));
        }
        assert_eq!(t.slot(0).unwrap().life(), 5);
    }

    #[test]
    fn test_decay_extrapolates_and_frees() {
        let mut t = table(1);
        t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4));
        t.apply_correspondence(0, bbox(2.0, 0.0), Array1::zeros(4));
        assert_eq!(t.slot(0).unwrap().life(), 2);

        assert!(!t.decay(0, &ConstantVelocity));
        let s = t.slot(0).unwrap();
        assert_eq!(*s.bbox(), bbox(4.0, 0.0));
        assert_eq!(s.life(), 1);
        assert_eq!(s.track_id(), 1);

        assert!(t.decay(0, &ConstantVelocity));
        let s = t.slot(0).unwrap();
        assert_eq!(s.life(), 0);
        assert_eq!(s.track_id(), 0);
        assert!(!t.is_occupied(0));
    }

    #[test]
    fn test_nonzero_min_life() {
        let mut t = TrackTable::new(2, 4, 3, 6);
        let idx = t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4)).unwrap();
        assert_eq!(t.slot(idx).unwrap().life(), 4);
        assert!(t.decay(idx, &Stationary));
        assert_eq!(t.slot(idx).unwrap().life(), 3);
        assert_eq!(t.find_free_slot(), Some(0));
    }

    #[test]
    fn test_snapshot_threshold_and_order() {
        let mut t = table(3);
        t.allocate(bbox(0.0, 0.0), 1, Array1::zeros(4));
        t.allocate(bbox(20.0, 0.0), 3, Array1::zeros(4));
        t.apply_correspondence(1, bbox(21.0, 0.0), Array1::zeros(4));

        let all = t.snapshot(1);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].track_id, 1);
        assert_eq!(all[1].track_id, 2);
        assert_eq!(all[1].bbox, bbox(21.0, 0.0));

        let confident = t.snapshot(2);
        assert_eq!(confident.len(), 1);
        assert_eq!(confident[0].label, 3);

        // Free slots never appear, even with a zero threshold.
        assert_eq!(t.snapshot(0).len(), 2);
    }

    #[test]
    fn test_status_lines_cover_every_slot() {
        let mut t = table(3);
        t.allocate(bbox(0.0, 0.0), 64, Array1::zeros(4));
        let lines = t.status_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("id=1"));
        assert!(lines[0].contains("label=64"));
    }
}
