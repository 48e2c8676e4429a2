/// Hue histogram descriptor of a frame region.
///
/// Summarizes a box by the distribution of pixel hues over `dimension`
/// equal-width bins, normalized to sum to 1. Cheap and model-free, which is
/// enough to separate differently-colored objects of the same class.
/// Frames with fewer than three channels are binned by intensity instead.
use ndarray::{Array1, ArrayView1, Axis};

use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::tracking::domain::feature_extractor::FeatureExtractor;

pub struct HistogramFeatureExtractor {
    bins: usize,
}

impl HistogramFeatureExtractor {
    pub fn new(bins: usize) -> Self {
        Self { bins: bins.max(1) }
    }

    fn bin_of(&self, pixel: ArrayView1<'_, u8>) -> usize {
        let position = if pixel.len() >= 3 {
            let r = pixel[0] as f64 / 255.0;
            let g = pixel[1] as f64 / 255.0;
            let b = pixel[2] as f64 / 255.0;
            rgb_to_hue(r, g, b) / 360.0
        } else {
            pixel.first().copied().unwrap_or(0) as f64 / 256.0
        };
        ((position * self.bins as f64) as usize).min(self.bins - 1)
    }
}

impl FeatureExtractor for HistogramFeatureExtractor {
    fn dimension(&self) -> usize {
        self.bins
    }

    fn extract(&self, frame: &Frame, bbox: &BoundingBox) -> Array1<f64> {
        let mut hist = Array1::<f64>::zeros(self.bins);
        let mut count = 0usize;
        if let Some(region) = frame.region(bbox) {
            for pixel in region.lanes(Axis(2)) {
                hist[self.bin_of(pixel)] += 1.0;
                count += 1;
            }
        }
        if count > 0 {
            hist /= count as f64;
        }
        hist
    }
}

/// Hue in degrees `[0, 360)`; 0 for achromatic pixels.
fn rgb_to_hue(r: f64, g: f64, b: f64) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if (max - r).abs() < f64::EPSILON {
        60.0 * (((g - b) / delta) % 6.0)
    } else if (max - g).abs() < f64::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}
