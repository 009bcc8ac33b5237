// crate
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::precision::Float;

/// Radially symmetric Gaussian bump, offset so it reaches zero
/// exactly at the radius.
pub struct GaussianFilter {
    pub radius: Vector2f,
    pub alpha: Float,
    exp_x: Float,
    exp_y: Float,
}

impl GaussianFilter {
    pub fn new(radius: Vector2f, alpha: Float) -> Self {
        GaussianFilter {
            radius,
            alpha,
            exp_x: (-alpha * radius.x * radius.x).exp(),
            exp_y: (-alpha * radius.y * radius.y).exp(),
        }
    }
    fn gaussian(&self, d: Float, expv: Float) -> Float {
        (0.0 as Float).max((-self.alpha * d * d).exp() - expv)
    }
    pub fn evaluate(&self, p: Point2f) -> Float {
        self.gaussian(p.x, self.exp_x) * self.gaussian(p.y, self.exp_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanishes_at_the_support_boundary() {
        let filter: GaussianFilter = GaussianFilter::new(Vector2f { x: 2.0, y: 2.0 }, 2.0);
        assert!(filter.evaluate(Point2f { x: 2.0, y: 0.0 }) < 1e-6);
        assert!(filter.evaluate(Point2f { x: 0.0, y: 0.0 }) > 0.5);
        // symmetric in each axis
        assert_eq!(
            filter.evaluate(Point2f { x: 0.7, y: -0.3 }),
            filter.evaluate(Point2f { x: -0.7, y: 0.3 })
        );
    }
}
