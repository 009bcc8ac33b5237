//! Microfacet normal distributions with Smith masking-shadowing.
//! Both are parameterised by anisotropic slope deviations along the
//! tangent directions.

// std
use std::f32::consts::PI;
// crate
use crate::core::geometry::{Point2f, Vector3f, XYEnum};
use crate::core::precision::Float;
use crate::core::reflection::{
    abs_cos_theta, cos_2_phi, cos_2_theta, sin_2_phi, tan_2_theta, tan_theta,
    vec3_same_hemisphere_vec3,
};

#[derive(Debug, Copy, Clone)]
pub enum MicrofacetDistribution {
    Beckmann(BeckmannDistribution),
    TrowbridgeReitz(TrowbridgeReitzDistribution),
}

impl MicrofacetDistribution {
    /// Differential area of microfacets with the given half-vector.
    pub fn d(&self, wh: &Vector3f) -> Float {
        match self {
            MicrofacetDistribution::Beckmann(distrib) => distrib.d(wh),
            MicrofacetDistribution::TrowbridgeReitz(distrib) => distrib.d(wh),
        }
    }
    /// Smith auxiliary function: masked area per visible area along w.
    pub fn lambda(&self, w: &Vector3f) -> Float {
        match self {
            MicrofacetDistribution::Beckmann(distrib) => distrib.lambda(w),
            MicrofacetDistribution::TrowbridgeReitz(distrib) => distrib.lambda(w),
        }
    }
    pub fn g1(&self, w: &Vector3f) -> Float {
        1.0 as Float / (1.0 as Float + self.lambda(w))
    }
    pub fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 as Float / (1.0 as Float + self.lambda(wo) + self.lambda(wi))
    }
    pub fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        match self {
            MicrofacetDistribution::Beckmann(distrib) => distrib.sample_wh(wo, u),
            MicrofacetDistribution::TrowbridgeReitz(distrib) => distrib.sample_wh(wo, u),
        }
    }
    pub fn pdf(&self, _wo: &Vector3f, wh: &Vector3f) -> Float {
        self.d(wh) * abs_cos_theta(wh)
    }
}

fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f {
        x: sin_theta * phi.cos(),
        y: sin_theta * phi.sin(),
        z: cos_theta,
    }
}

/// Anisotropic azimuth for full-distribution sampling; both
/// distributions share the construction.
fn anisotropic_phi(u1: Float, alpha_x: Float, alpha_y: Float) -> Float {
    let mut phi: Float =
        (alpha_y / alpha_x * (2.0 as Float * PI as Float * u1 + 0.5 as Float * PI as Float).tan())
            .atan();
    if u1 > 0.5 as Float {
        phi += PI as Float;
    }
    phi
}

#[derive(Debug, Copy, Clone)]
pub struct BeckmannDistribution {
    pub alpha_x: Float,
    pub alpha_y: Float,
}

impl BeckmannDistribution {
    pub fn new(alpha_x: Float, alpha_y: Float) -> Self {
        BeckmannDistribution { alpha_x, alpha_y }
    }
    /// Map a normalised roughness in [0, 1] to a slope deviation.
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        let roughness: Float = roughness.max(1e-3 as Float);
        let x: Float = roughness.ln();
        1.621_42 as Float
            + 0.819_955 as Float * x
            + 0.1734 as Float * x * x
            + 0.017_120_1 as Float * x * x * x
            + 0.000_640_711 as Float * x * x * x * x
    }
    pub fn d(&self, wh: &Vector3f) -> Float {
        let tan_2_theta: Float = tan_2_theta(wh);
        if tan_2_theta.is_infinite() {
            return 0.0 as Float;
        }
        let cos_4_theta: Float = cos_2_theta(wh) * cos_2_theta(wh);
        (-tan_2_theta
            * (cos_2_phi(wh) / (self.alpha_x * self.alpha_x)
                + sin_2_phi(wh) / (self.alpha_y * self.alpha_y)))
            .exp()
            / (PI as Float * self.alpha_x * self.alpha_y * cos_4_theta)
    }
    pub fn lambda(&self, w: &Vector3f) -> Float {
        let abs_tan_theta: Float = tan_theta(w).abs();
        if abs_tan_theta.is_infinite() {
            return 0.0 as Float;
        }
        // directional slope deviation for w's azimuth
        let alpha: Float = (cos_2_phi(w) * self.alpha_x * self.alpha_x
            + sin_2_phi(w) * self.alpha_y * self.alpha_y)
            .sqrt();
        let a: Float = 1.0 as Float / (alpha * abs_tan_theta);
        if a >= 1.6 as Float {
            return 0.0 as Float;
        }
        (1.0 as Float - 1.259 as Float * a + 0.396 as Float * a * a)
            / (3.535 as Float * a + 2.181 as Float * a * a)
    }
    pub fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        // sample the full distribution of normals
        let log_sample: Float = (1.0 as Float - u[XYEnum::X]).ln();
        let (tan_2_theta, phi): (Float, Float) = if self.alpha_x == self.alpha_y {
            (
                -self.alpha_x * self.alpha_x * log_sample,
                u[XYEnum::Y] * 2.0 as Float * PI as Float,
            )
        } else {
            let phi: Float = anisotropic_phi(u[XYEnum::Y], self.alpha_x, self.alpha_y);
            let sin_phi: Float = phi.sin();
            let cos_phi: Float = phi.cos();
            (
                -log_sample
                    / (cos_phi * cos_phi / (self.alpha_x * self.alpha_x)
                        + sin_phi * sin_phi / (self.alpha_y * self.alpha_y)),
                phi,
            )
        };
        let cos_theta: Float = 1.0 as Float / (1.0 as Float + tan_2_theta).sqrt();
        let sin_theta: Float = (0.0 as Float)
            .max(1.0 as Float - cos_theta * cos_theta)
            .sqrt();
        let mut wh: Vector3f = spherical_direction(sin_theta, cos_theta, phi);
        if !vec3_same_hemisphere_vec3(wo, &wh) {
            wh = -wh;
        }
        wh
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TrowbridgeReitzDistribution {
    pub alpha_x: Float,
    pub alpha_y: Float,
}

impl TrowbridgeReitzDistribution {
    pub fn new(alpha_x: Float, alpha_y: Float) -> Self {
        TrowbridgeReitzDistribution { alpha_x, alpha_y }
    }
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        let roughness: Float = roughness.max(1e-3 as Float);
        let x: Float = roughness.ln();
        1.621_42 as Float
            + 0.819_955 as Float * x
            + 0.1734 as Float * x * x
            + 0.017_120_1 as Float * x * x * x
            + 0.000_640_711 as Float * x * x * x * x
    }
    pub fn d(&self, wh: &Vector3f) -> Float {
        let tan_2_theta: Float = tan_2_theta(wh);
        if tan_2_theta.is_infinite() {
            return 0.0 as Float;
        }
        let cos_4_theta: Float = cos_2_theta(wh) * cos_2_theta(wh);
        let e: Float = (cos_2_phi(wh) / (self.alpha_x * self.alpha_x)
            + sin_2_phi(wh) / (self.alpha_y * self.alpha_y))
            * tan_2_theta;
        1.0 as Float
            / (PI as Float
                * self.alpha_x
                * self.alpha_y
                * cos_4_theta
                * (1.0 as Float + e)
                * (1.0 as Float + e))
    }
    pub fn lambda(&self, w: &Vector3f) -> Float {
        let abs_tan_theta: Float = tan_theta(w).abs();
        if abs_tan_theta.is_infinite() {
            return 0.0 as Float;
        }
        let alpha: Float = (cos_2_phi(w) * self.alpha_x * self.alpha_x
            + sin_2_phi(w) * self.alpha_y * self.alpha_y)
            .sqrt();
        let alpha_2_tan_2_theta: Float = (alpha * abs_tan_theta) * (alpha * abs_tan_theta);
        ((1.0 as Float + alpha_2_tan_2_theta).sqrt() - 1.0 as Float) * 0.5 as Float
    }
    pub fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        let (tan_2_theta, phi): (Float, Float) = if self.alpha_x == self.alpha_y {
            (
                self.alpha_x * self.alpha_x * u[XYEnum::X] / (1.0 as Float - u[XYEnum::X]),
                u[XYEnum::Y] * 2.0 as Float * PI as Float,
            )
        } else {
            let phi: Float = anisotropic_phi(u[XYEnum::Y], self.alpha_x, self.alpha_y);
            let sin_phi: Float = phi.sin();
            let cos_phi: Float = phi.cos();
            (
                u[XYEnum::X] / (1.0 as Float - u[XYEnum::X])
                    / (cos_phi * cos_phi / (self.alpha_x * self.alpha_x)
                        + sin_phi * sin_phi / (self.alpha_y * self.alpha_y)),
                phi,
            )
        };
        let cos_theta: Float = 1.0 as Float / (1.0 as Float + tan_2_theta).sqrt();
        let sin_theta: Float = (0.0 as Float)
            .max(1.0 as Float - cos_theta * cos_theta)
            .sqrt();
        let mut wh: Vector3f = spherical_direction(sin_theta, cos_theta, phi);
        if !vec3_same_hemisphere_vec3(wo, &wh) {
            wh = -wh;
        }
        wh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reflection::cos_theta;
    use crate::core::rng::Rng;

    fn up() -> Vector3f {
        Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }
    }

    #[test]
    fn distributions_integrate_projected_area_to_one() {
        // integral of D(wh) cos(theta) over the hemisphere must be 1
        let distribs: [MicrofacetDistribution; 2] = [
            MicrofacetDistribution::Beckmann(BeckmannDistribution::new(0.3, 0.3)),
            MicrofacetDistribution::TrowbridgeReitz(TrowbridgeReitzDistribution::new(0.3, 0.3)),
        ];
        let n_theta: usize = 256;
        let n_phi: usize = 64;
        for distrib in distribs.iter() {
            let mut integral: Float = 0.0;
            for i in 0..n_theta {
                let theta: Float = (i as Float + 0.5) / n_theta as Float * PI as Float / 2.0;
                for j in 0..n_phi {
                    let phi: Float = (j as Float + 0.5) / n_phi as Float * 2.0 * PI as Float;
                    let wh: Vector3f = spherical_direction(theta.sin(), theta.cos(), phi);
                    integral += distrib.d(&wh)
                        * cos_theta(&wh)
                        * theta.sin()
                        * (PI as Float / 2.0 / n_theta as Float)
                        * (2.0 * PI as Float / n_phi as Float);
                }
            }
            assert!((integral - 1.0).abs() < 2e-2, "integral = {}", integral);
        }
    }

    #[test]
    fn sampled_half_vectors_match_wo_hemisphere() {
        let distrib: MicrofacetDistribution =
            MicrofacetDistribution::TrowbridgeReitz(TrowbridgeReitzDistribution::new(0.5, 0.2));
        let mut rng: Rng = Rng::new();
        rng.set_sequence(31);
        let wo: Vector3f = Vector3f {
            x: 0.4,
            y: -0.2,
            z: 0.89,
        }
        .normalize();
        for _ in 0..1000 {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            let wh: Vector3f = distrib.sample_wh(&wo, &u);
            assert!(vec3_same_hemisphere_vec3(&wo, &wh));
            assert!((wh.length() - 1.0).abs() < 1e-3);
            assert!(distrib.pdf(&wo, &wh) > 0.0);
        }
    }

    #[test]
    fn masking_vanishes_at_normal_incidence() {
        let distrib: MicrofacetDistribution =
            MicrofacetDistribution::Beckmann(BeckmannDistribution::new(0.2, 0.2));
        assert!((distrib.g1(&up()) - 1.0).abs() < 1e-5);
        // grazing directions are heavily masked
        let grazing: Vector3f = Vector3f {
            x: 1.0,
            y: 0.0,
            z: 1e-3,
        }
        .normalize();
        assert!(distrib.g1(&grazing) < 0.1);
    }

    #[test]
    fn roughness_remap_is_monotonic() {
        let mut prev: Float = 0.0;
        for i in 1..=10 {
            let alpha: Float =
                TrowbridgeReitzDistribution::roughness_to_alpha(i as Float / 10.0);
            assert!(alpha > prev);
            prev = alpha;
        }
    }
}
