use serde::{Deserialize, Serialize};

use crate::shared::bounding_box::{BoundingBox, Vector2};

/// Strategy predicting where a tracked box will be in the next frame.
pub trait MotionModel: Send + Sync {
    fn predict(&self, bbox: &BoundingBox, movement: Vector2) -> BoundingBox;
}

/// Extrapolates the box by its last observed per-frame displacement.
pub struct ConstantVelocity;

impl MotionModel for ConstantVelocity {
    fn predict(&self, bbox: &BoundingBox, movement: Vector2) -> BoundingBox {
        bbox.translate(movement)
    }
}

/// Assumes the object stays where it was last seen.
pub struct Stationary;

impl MotionModel for Stationary {
    fn predict(&self, bbox: &BoundingBox, _movement: Vector2) -> BoundingBox {
        *bbox
    }
}

/// Configurable selection of the built-in motion models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionModelKind {
    #[default]
    ConstantVelocity,
    Stationary,
}

impl MotionModelKind {
    pub fn build(self) -> Box<dyn MotionModel> {
        match self {
            MotionModelKind::ConstantVelocity => Box::new(ConstantVelocity),
            MotionModelKind::Stationary => Box::new(Stationary),
        }
    }
}

impl std::fmt::Display for MotionModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionModelKind::ConstantVelocity => write!(f, "constant_velocity"),
            MotionModelKind::Stationary => write!(f, "stationary"),
        }
    }
}
