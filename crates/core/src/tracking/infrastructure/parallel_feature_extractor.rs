use ndarray::Array1;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::tracking::domain::feature_extractor::FeatureExtractor;

/// Decorator that extracts descriptors for several boxes concurrently.
///
/// Boxes are split into contiguous chunks, one scoped thread per chunk.
/// Results are sent back over a channel tagged with their box index, so the
/// output order always matches the input order.
pub struct ParallelFeatureExtractor {
    inner: Box<dyn FeatureExtractor>,
    workers: usize,
}

impl ParallelFeatureExtractor {
    pub fn new(inner: Box<dyn FeatureExtractor>, workers: usize) -> Self {
        Self {
            inner,
            workers: workers.max(1),
        }
    }

    /// One worker per available core.
    pub fn with_available_parallelism(inner: Box<dyn FeatureExtractor>) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(inner, workers)
    }
}

impl FeatureExtractor for ParallelFeatureExtractor {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn extract(&self, frame: &Frame, bbox: &BoundingBox) -> Array1<f64> {
        self.inner.extract(frame, bbox)
    }

    fn extract_all(&self, frame: &Frame, boxes: &[BoundingBox]) -> Vec<Array1<f64>> {
        if self.workers == 1 || boxes.len() < 2 {
            return self.inner.extract_all(frame, boxes);
        }

        let chunk_size = boxes.len().div_ceil(self.workers);
        let (tx, rx) = crossbeam_channel::unbounded::<(usize, Array1<f64>)>();
        let inner = self.inner.as_ref();

        std::thread::scope(|scope| {
            for (chunk_idx, chunk) in boxes.chunks(chunk_size).enumerate() {
                let tx = tx.clone();
                scope.spawn(move || {
                    for (offset, bbox) in chunk.iter().enumerate() {
                        let _ = tx.send((chunk_idx * chunk_size + offset, inner.extract(frame, bbox)));
                    }
                });
            }
        });
        drop(tx);

        let mut features = vec![Array1::zeros(0); boxes.len()];
        for (idx, feature) in rx.iter() {
            features[idx] = feature;
        }
        features
    }
}
