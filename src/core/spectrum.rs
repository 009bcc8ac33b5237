//! The RGB spectrum representation and its conversions to and from
//! CIE XYZ tristimulus values.

// others
use num::Zero;
use std::ops;
use strum_macros::EnumIter;
// crate
use crate::core::math::clamp_t;
use crate::core::precision::Float;

#[derive(Debug, Copy, Clone, PartialEq, EnumIter)]
pub enum RGBEnum {
    Red = 0,
    Green = 1,
    Blue = 2,
}

/// Radiometric quantities are carried as RGB triples; conversion to
/// XYZ happens only at the sensor.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

pub type Spectrum = RGBSpectrum;

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn from_rgb(rgb: &[Float; 3]) -> Self {
        RGBSpectrum {
            c: [rgb[0], rgb[1], rgb[2]],
        }
    }
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }
    pub fn from_xyz(xyz: &[Float; 3]) -> Self {
        let mut rgb: [Float; 3] = [0.0 as Float; 3];
        xyz_to_rgb(xyz, &mut rgb);
        RGBSpectrum::from_rgb(&rgb)
    }
    pub fn to_xyz(&self) -> [Float; 3] {
        let mut xyz: [Float; 3] = [0.0 as Float; 3];
        rgb_to_xyz(&self.c, &mut xyz);
        xyz
    }
    /// Luminance (the CIE Y channel).
    pub fn y(&self) -> Float {
        let y_weight: [Float; 3] = [0.212_671_273, 0.715_159_717, 0.072_168_828];
        y_weight[0] * self.c[0] + y_weight[1] * self.c[1] + y_weight[2] * self.c[2]
    }
    pub fn is_black(&self) -> bool {
        self.c[0] == 0.0 as Float && self.c[1] == 0.0 as Float && self.c[2] == 0.0 as Float
    }
    pub fn has_nans(&self) -> bool {
        self.c[0].is_nan() || self.c[1].is_nan() || self.c[2].is_nan()
    }
    pub fn sqrt(&self) -> RGBSpectrum {
        RGBSpectrum {
            c: [self.c[0].sqrt(), self.c[1].sqrt(), self.c[2].sqrt()],
        }
    }
    pub fn clamp(&self, low: Float, high: Float) -> RGBSpectrum {
        RGBSpectrum {
            c: [
                clamp_t(self.c[0], low, high),
                clamp_t(self.c[1], low, high),
                clamp_t(self.c[2], low, high),
            ],
        }
    }
    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }
}

impl From<Float> for RGBSpectrum {
    fn from(v: Float) -> Self {
        RGBSpectrum::new(v)
    }
}

impl std::ops::Index<RGBEnum> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: RGBEnum) -> &Float {
        &self.c[index as usize]
    }
}

impl std::ops::IndexMut<RGBEnum> for RGBSpectrum {
    fn index_mut(&mut self, index: RGBEnum) -> &mut Float {
        &mut self.c[index as usize]
    }
}

impl Zero for RGBSpectrum {
    fn zero() -> RGBSpectrum {
        RGBSpectrum::new(0.0 as Float)
    }
    fn is_zero(&self) -> bool {
        self.is_black()
    }
}

impl_op_ex!(+ |a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum { c: [a.c[0] + b.c[0], a.c[1] + b.c[1], a.c[2] + b.c[2]] }
});
impl_op_ex!(-|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] - b.c[0], a.c[1] - b.c[1], a.c[2] - b.c[2]],
    }
});
impl_op_ex!(*|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] * b.c[0], a.c[1] * b.c[1], a.c[2] * b.c[2]],
    }
});
impl_op_ex!(/ |a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum { c: [a.c[0] / b.c[0], a.c[1] / b.c[1], a.c[2] / b.c[2]] }
});
impl_op_ex!(*|a: &RGBSpectrum, s: Float| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] * s, a.c[1] * s, a.c[2] * s],
    }
});
impl_op_ex!(/ |a: &RGBSpectrum, s: Float| -> RGBSpectrum {
    let inv: Float = 1.0 as Float / s;
    RGBSpectrum { c: [a.c[0] * inv, a.c[1] * inv, a.c[2] * inv] }
});
impl_op_ex!(+= |a: &mut RGBSpectrum, b: &RGBSpectrum| {
    a.c[0] += b.c[0];
    a.c[1] += b.c[1];
    a.c[2] += b.c[2];
});
impl_op_ex!(*= |a: &mut RGBSpectrum, b: &RGBSpectrum| {
    a.c[0] *= b.c[0];
    a.c[1] *= b.c[1];
    a.c[2] *= b.c[2];
});

/// CIE XYZ to linear sRGB primaries.
pub fn xyz_to_rgb(xyz: &[Float; 3], rgb: &mut [Float; 3]) {
    rgb[0] = 3.240_479 * xyz[0] - 1.537_150 * xyz[1] - 0.498_535 * xyz[2];
    rgb[1] = -0.969_256 * xyz[0] + 1.875_991 * xyz[1] + 0.041_556 * xyz[2];
    rgb[2] = 0.055_648 * xyz[0] - 0.204_043 * xyz[1] + 1.057_311 * xyz[2];
}

/// Linear sRGB primaries to CIE XYZ. The coefficients are the exact
/// inverse of the matrix above so a round trip through XYZ preserves
/// colors to within float rounding.
pub fn rgb_to_xyz(rgb: &[Float; 3], xyz: &mut [Float; 3]) {
    xyz[0] = 0.412_453_296 * rgb[0] + 0.357_579_837 * rgb[1] + 0.180_422_616 * rgb[2];
    xyz[1] = 0.212_671_273 * rgb[0] + 0.715_159_717 * rgb[1] + 0.072_168_828 * rgb[2];
    xyz[2] = 0.019_333_842 * rgb[0] + 0.119_193_625 * rgb[1] + 0.950_226_931 * rgb[2];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xyz_round_trip() {
        let s: Spectrum = Spectrum::from_rgb(&[0.25, 0.5, 0.75]);
        let back: Spectrum = Spectrum::from_xyz(&s.to_xyz());
        for i in 0..3 {
            assert!((s.c[i] - back.c[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn luminance_matches_xyz_y() {
        let s: Spectrum = Spectrum::from_rgb(&[0.2, 0.7, 0.1]);
        let xyz: [Float; 3] = s.to_xyz();
        assert!((s.y() - xyz[1]).abs() < 1e-6);
    }

    #[test]
    fn black_detection_and_zero() {
        assert!(Spectrum::default().is_black());
        assert!(Spectrum::zero().is_zero());
        assert!(!Spectrum::new(0.1).is_black());
    }
}
