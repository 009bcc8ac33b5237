// crate
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::precision::Float;

/// Weight falls off linearly from the center to the radius.
pub struct TriangleFilter {
    pub radius: Vector2f,
}

impl TriangleFilter {
    pub fn new(radius: Vector2f) -> Self {
        TriangleFilter { radius }
    }
    pub fn evaluate(&self, p: Point2f) -> Float {
        (0.0 as Float).max(self.radius.x - p.x.abs())
            * (0.0 as Float).max(self.radius.y - p.y.abs())
    }
}
