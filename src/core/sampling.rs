//! Warping transforms from uniform samples to useful distributions,
//! plus the stratified and Latin-hypercube pattern generators that the
//! pixel samplers build on.

// crate
use crate::core::geometry::{Point2f, Vector2f, Vector3f, XYEnum};
use crate::core::math::{INV_2_PI, INV_4_PI, INV_PI, PI, PI_OVER_2, PI_OVER_4};
use crate::core::precision::Float;
use crate::core::rng::Rng;
use crate::core::rng::FLOAT_ONE_MINUS_EPSILON;

/// Fill *samp* with jittered stratified values covering [0, 1).
pub fn stratified_sample_1d(samp: &mut [Float], n_samples: i32, rng: &mut Rng, jitter: bool) {
    let inv_n_samples: Float = 1.0 as Float / n_samples as Float;
    for i in 0..n_samples {
        let delta: Float = if jitter {
            rng.uniform_float()
        } else {
            0.5 as Float
        };
        samp[i as usize] = ((i as Float + delta) * inv_n_samples).min(FLOAT_ONE_MINUS_EPSILON);
    }
}

/// Fill *samp* with one jittered point per cell of an nx * ny grid
/// over the unit square.
pub fn stratified_sample_2d(samp: &mut [Point2f], nx: i32, ny: i32, rng: &mut Rng, jitter: bool) {
    let dx: Float = 1.0 as Float / nx as Float;
    let dy: Float = 1.0 as Float / ny as Float;
    let mut samp_idx: usize = 0;
    for y in 0..ny {
        for x in 0..nx {
            let jx: Float = if jitter {
                rng.uniform_float()
            } else {
                0.5 as Float
            };
            let jy: Float = if jitter {
                rng.uniform_float()
            } else {
                0.5 as Float
            };
            samp[samp_idx].x = ((x as Float + jx) * dx).min(FLOAT_ONE_MINUS_EPSILON);
            samp[samp_idx].y = ((y as Float + jy) * dy).min(FLOAT_ONE_MINUS_EPSILON);
            samp_idx += 1;
        }
    }
}

/// Latin hypercube construction over the unit square: per-dimension
/// stratification followed by an independent permutation of each
/// dimension, decorrelating the two axes.
pub fn latin_hypercube(samples: &mut [Point2f], n_samples: u32, rng: &mut Rng) {
    // generate LHS samples along diagonal
    let inv_n_samples: Float = 1.0 as Float / n_samples as Float;
    for i in 0..n_samples {
        for j in 0..2_usize {
            let sj: Float = (i as Float + rng.uniform_float()) * inv_n_samples;
            if j == 0 {
                samples[i as usize].x = sj.min(FLOAT_ONE_MINUS_EPSILON);
            } else {
                samples[i as usize].y = sj.min(FLOAT_ONE_MINUS_EPSILON);
            }
        }
    }
    // permute LHS samples in each dimension
    for i in 0..2_usize {
        for j in 0..n_samples {
            let other: u32 = j + rng.uniform_uint32_bounded(n_samples - j);
            if i == 0 {
                let tmp: Float = samples[j as usize].x;
                samples[j as usize].x = samples[other as usize].x;
                samples[other as usize].x = tmp;
            } else {
                let tmp: Float = samples[j as usize].y;
                samples[j as usize].y = samples[other as usize].y;
                samples[other as usize].y = tmp;
            }
        }
    }
}

/// Fisher-Yates permutation of *count* blocks of *n_dimensions*
/// contiguous values.
pub fn shuffle<T>(samp: &mut [T], count: i32, n_dimensions: i32, rng: &mut Rng) {
    for i in 0..count {
        let other: i32 = i + rng.uniform_uint32_bounded((count - i) as u32) as i32;
        for j in 0..n_dimensions {
            samp.swap(
                (n_dimensions * i + j) as usize,
                (n_dimensions * other + j) as usize,
            );
        }
    }
}

/// Concentric mapping of the unit square onto the unit disk; uniform
/// density is preserved and the two angular cases avoid the
/// singularities along the diagonals.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // map uniform random numbers to $[-1,1]^2$
    let u_offset: Point2f = *u * 2.0 as Float - Vector2f { x: 1.0, y: 1.0 };
    // handle degeneracy at the origin
    if u_offset.x == 0.0 as Float && u_offset.y == 0.0 as Float {
        return Point2f::default();
    }
    // apply concentric mapping to point
    let theta: Float;
    let r: Float;
    if u_offset.x.abs() > u_offset.y.abs() {
        r = u_offset.x;
        theta = PI_OVER_4 * (u_offset.y / u_offset.x);
    } else {
        r = u_offset.y;
        theta = PI_OVER_2 - PI_OVER_4 * (u_offset.x / u_offset.y);
    }
    Point2f {
        x: theta.cos(),
        y: theta.sin(),
    } * r
}

/// Polar mapping onto the unit disk (r = sqrt(u1), theta = 2 pi u2).
pub fn uniform_sample_disk(u: &Point2f) -> Point2f {
    let r: Float = u[XYEnum::X].sqrt();
    let theta: Float = 2.0 as Float * PI * u[XYEnum::Y];
    Point2f {
        x: r * theta.cos(),
        y: r * theta.sin(),
    }
}

/// Cosine-weighted hemisphere sampling through the concentric disk
/// (Malley's method).
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d: Point2f = concentric_sample_disk(u);
    let z: Float = (0.0 as Float)
        .max(1.0 as Float - d.x * d.x - d.y * d.y)
        .sqrt();
    Vector3f { x: d.x, y: d.y, z }
}

pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

pub fn uniform_sample_hemisphere(u: &Point2f) -> Vector3f {
    let z: Float = u[XYEnum::X];
    let r: Float = (0.0 as Float).max(1.0 as Float - z * z).sqrt();
    let phi: Float = 2.0 as Float * PI * u[XYEnum::Y];
    Vector3f {
        x: r * phi.cos(),
        y: r * phi.sin(),
        z,
    }
}

pub fn uniform_hemisphere_pdf() -> Float {
    INV_2_PI
}

pub fn uniform_sample_sphere(u: Point2f) -> Vector3f {
    let z: Float = 1.0 as Float - 2.0 as Float * u[XYEnum::X];
    let r: Float = (0.0 as Float).max(1.0 as Float - z * z).sqrt();
    let phi: Float = 2.0 as Float * PI * u[XYEnum::Y];
    Vector3f {
        x: r * phi.cos(),
        y: r * phi.sin(),
        z,
    }
}

pub fn uniform_sphere_pdf() -> Float {
    INV_4_PI
}

pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 as Float / (2.0 as Float * PI * (1.0 as Float - cos_theta_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stratified_1d_lands_one_sample_per_stratum() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(1);
        let n: i32 = 16;
        let mut samp: Vec<Float> = vec![0.0; n as usize];
        stratified_sample_1d(&mut samp, n, &mut rng, true);
        for (i, s) in samp.iter().enumerate() {
            assert!(*s >= i as Float / n as Float);
            assert!(*s < (i + 1) as Float / n as Float);
        }
    }

    #[test]
    fn latin_hypercube_stratifies_each_dimension() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(2);
        let n: u32 = 32;
        let mut samp: Vec<Point2f> = vec![Point2f::default(); n as usize];
        latin_hypercube(&mut samp, n, &mut rng);
        for dim in 0..2 {
            let mut occupied: Vec<bool> = vec![false; n as usize];
            for s in samp.iter() {
                let v: Float = if dim == 0 { s.x } else { s.y };
                let cell: usize = (v * n as Float) as usize;
                assert!(!occupied[cell], "two samples in one stratum");
                occupied[cell] = true;
            }
        }
    }

    #[test]
    fn concentric_disk_maps_origin_and_stays_inside() {
        assert_eq!(
            concentric_sample_disk(&Point2f { x: 0.5, y: 0.5 }),
            Point2f::default()
        );
        let mut rng: Rng = Rng::new();
        rng.set_sequence(3);
        for _ in 0..10_000 {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            let d: Point2f = concentric_sample_disk(&u);
            assert!(d.x * d.x + d.y * d.y <= 1.0 as Float + 1e-5);
        }
    }

    #[test]
    fn concentric_disk_preserves_uniform_density() {
        // bin a large number of samples into equal-area annuli; each
        // must receive its share within statistical tolerance
        let mut rng: Rng = Rng::new();
        rng.set_sequence(4);
        let n: usize = 1_000_000;
        let n_bins: usize = 10;
        let mut counts: Vec<usize> = vec![0; n_bins];
        for _ in 0..n {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            let d: Point2f = concentric_sample_disk(&u);
            let r2: Float = d.x * d.x + d.y * d.y;
            let bin: usize = ((r2 * n_bins as Float) as usize).min(n_bins - 1);
            counts[bin] += 1;
        }
        let expected: Float = n as Float / n_bins as Float;
        for &count in counts.iter() {
            let relative: Float = (count as Float - expected) / expected;
            assert!(relative.abs() < 0.01, "annulus count off by {}", relative);
        }
    }

    #[test]
    fn uniform_disk_covers_the_disk() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(7);
        for _ in 0..10_000 {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            let d: Point2f = uniform_sample_disk(&u);
            assert!(d.x * d.x + d.y * d.y <= 1.0 as Float + 1e-5);
        }
    }

    #[test]
    fn cosine_hemisphere_samples_are_unit_and_upward() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(5);
        for _ in 0..10_000 {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            let w: Vector3f = cosine_sample_hemisphere(&u);
            assert!(w.z >= 0.0 as Float);
            assert!((w.length() - 1.0 as Float).abs() < 1e-3);
        }
    }

    #[test]
    fn shuffle_keeps_contents() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(6);
        let mut values: Vec<i32> = (0..64).collect();
        shuffle(&mut values, 64, 1, &mut rng);
        let mut sorted: Vec<i32> = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<i32>>());
    }
}
