//! Reconstruction filter dispatch. All three filters are separable
//! and symmetric in x and y, which is what lets the sensor tabulate
//! them over the positive quadrant only.

// crate
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::precision::Float;
use crate::filters::boxfilter::BoxFilter;
use crate::filters::gaussian::GaussianFilter;
use crate::filters::triangle::TriangleFilter;

pub enum Filter {
    Bx(BoxFilter),
    Gaussian(GaussianFilter),
    Triangle(TriangleFilter),
}

impl Filter {
    /// Filter value at *p*, a position relative to the filter center;
    /// zero outside the radius.
    pub fn evaluate(&self, p: Point2f) -> Float {
        match self {
            Filter::Bx(filter) => filter.evaluate(p),
            Filter::Gaussian(filter) => filter.evaluate(p),
            Filter::Triangle(filter) => filter.evaluate(p),
        }
    }
    pub fn get_radius(&self) -> Vector2f {
        match self {
            Filter::Bx(filter) => filter.radius,
            Filter::Gaussian(filter) => filter.radius,
            Filter::Triangle(filter) => filter.radius,
        }
    }
}
