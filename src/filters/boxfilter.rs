// crate
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::precision::Float;

/// Equal weight over the support; the cheapest filter and the
/// reference for tests because its weights cancel in normalisation.
pub struct BoxFilter {
    pub radius: Vector2f,
}

impl BoxFilter {
    pub fn new(radius: Vector2f) -> Self {
        BoxFilter { radius }
    }
    pub fn evaluate(&self, _p: Point2f) -> Float {
        1.0 as Float
    }
}
