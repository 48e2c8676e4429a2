use ndarray::{s, ArrayView3};

use crate::shared::bounding_box::BoundingBox;

/// A single video frame: contiguous interleaved bytes in row-major order.
///
/// The tracker never inspects pixels itself; frames are handed through to
/// the feature extractor.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// 1x1 black RGB frame, for replaying detections without image content.
    pub fn blank(index: usize) -> Self {
        Self::new(vec![0; 3], 1, 1, 3, index)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Pixel rectangle `(x0, y0, x1, y1)`, end-exclusive, covered by `bbox`
    /// after clipping to the frame. `None` when nothing is left.
    pub fn clip(&self, bbox: &BoundingBox) -> Option<(usize, usize, usize, usize)> {
        let w = self.width as f64;
        let h = self.height as f64;
        let x0 = bbox.x1.floor().clamp(0.0, w) as usize;
        let y0 = bbox.y1.floor().clamp(0.0, h) as usize;
        let x1 = bbox.x2.ceil().clamp(0.0, w) as usize;
        let y1 = bbox.y2.ceil().clamp(0.0, h) as usize;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// `(rows, cols, channels)` view of the pixels inside `bbox`, clipped
    /// to the frame. `None` when the box lies entirely outside.
    pub fn region(&self, bbox: &BoundingBox) -> Option<ArrayView3<'_, u8>> {
        let (x0, y0, x1, y1) = self.clip(bbox)?;
        Some(self.as_ndarray().slice_move(s![y0..y1, x0..x1, ..]))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
