use serde::{Deserialize, Serialize};

/// Per-frame displacement `(dx, dy)` in pixels.
pub type Vector2 = [f64; 2];

/// Axis-aligned box in pixel coordinates.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right one.
/// Serialized as a flat `[x1, y1, x2, y2]` array, the layout detectors emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Vector2 {
        [(self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0]
    }

    /// Shifts both corners by `shift`, keeping the box size.
    pub fn translate(&self, shift: Vector2) -> Self {
        Self {
            x1: self.x1 + shift[0],
            y1: self.y1 + shift[1],
            x2: self.x2 + shift[0],
            y2: self.y2 + shift[1],
        }
    }

    /// Displacement of this box's center relative to `previous`'s center.
    pub fn center_delta(&self, previous: &BoundingBox) -> Vector2 {
        let [cx, cy] = self.center();
        let [px, py] = previous.center();
        [cx - px, cy - py]
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}
