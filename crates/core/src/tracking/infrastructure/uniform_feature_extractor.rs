use ndarray::Array1;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::tracking::domain::feature_extractor::FeatureExtractor;

/// Placeholder extractor returning an all-ones descriptor for every region.
///
/// Feature distances are then always zero, so matching degrades to pure
/// centroid distance regardless of the configured weight.
pub struct UniformFeatureExtractor {
    dimension: usize,
}

impl UniformFeatureExtractor {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl FeatureExtractor for UniformFeatureExtractor {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn extract(&self, _frame: &Frame, _bbox: &BoundingBox) -> Array1<f64> {
        Array1::ones(self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_ones_of_dimension() {
        let extractor = UniformFeatureExtractor::new(10);
        let f = extractor.extract(&Frame::blank(0), &BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(f.len(), 10);
        assert!(f.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_extract_all_preserves_count() {
        let extractor = UniformFeatureExtractor::new(4);
        let boxes = vec![BoundingBox::default(); 3];
        assert_eq!(extractor.extract_all(&Frame::blank(0), &boxes).len(), 3);
    }
}
