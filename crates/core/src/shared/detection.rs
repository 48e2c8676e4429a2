use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::BoundingBox;

/// One detector output: box, class label and confidence score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub label: u32,
    pub score: f64,
}

impl Detection {
    pub fn new(bbox: BoundingBox, label: u32, score: f64) -> Self {
        Self { bbox, label, score }
    }

    /// Keeps detections scoring strictly above `min_score` and splits them
    /// into the parallel box and label lists the tracker consumes.
    pub fn filter_by_score(detections: &[Detection], min_score: f64) -> (Vec<BoundingBox>, Vec<u32>) {
        detections
            .iter()
            .filter(|d| d.score > min_score)
            .map(|d| (d.bbox, d.label))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f64, label: u32, score: f64) -> Detection {
        Detection::new(BoundingBox::new(x, x, x + 10.0, x + 10.0), label, score)
    }

    #[test]
    fn test_filter_keeps_order_and_pairs() {
        let dets = vec![det(0.0, 1, 0.9), det(10.0, 3, 0.2), det(20.0, 64, 0.7)];
        let (boxes, labels) = Detection::filter_by_score(&dets, 0.5);
        assert_eq!(labels, vec![1, 64]);
        assert_eq!(boxes[0], dets[0].bbox);
        assert_eq!(boxes[1], dets[2].bbox);
    }

    #[test]
    fn test_filter_threshold_is_exclusive() {
        let dets = vec![det(0.0, 1, 0.5)];
        let (boxes, labels) = Detection::filter_by_score(&dets, 0.5);
        assert!(boxes.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_deserialize_box_field() {
        let json = r#"{"box": [10, 10, 20, 20], "label": 64, "score": 0.8}"#;
        let d: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(d.bbox, BoundingBox::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(d.label, 64);
    }
}
