use ndarray::Array1;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Domain interface for appearance descriptors of a frame region.
///
/// Implementations must be deterministic for identical inputs and return
/// vectors of exactly `dimension()` elements.
pub trait FeatureExtractor: Send + Sync {
    fn dimension(&self) -> usize;

    fn extract(&self, frame: &Frame, bbox: &BoundingBox) -> Array1<f64>;

    /// Descriptors for every box, in box order.
    fn extract_all(&self, frame: &Frame, boxes: &[BoundingBox]) -> Vec<Array1<f64>> {
        boxes.iter().map(|b| self.extract(frame, b)).collect()
    }
}
