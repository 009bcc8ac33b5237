//! Annular disks in a plane of constant z, optionally limited to a
//! maximum azimuthal angle. Planar intersection is exact, so the
//! reported position error is zero.

// std
use std::f32::consts::PI;
// crate
use crate::core::geometry::{Bounds3f, Normal3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::math::{clamp_t, radians};
use crate::core::precision::Float;
use crate::core::sampling::concentric_sample_disk;
use crate::core::transform::Transform;

#[derive(Clone)]
pub struct Disk {
    pub height: Float,
    pub radius: Float,
    pub inner_radius: Float,
    pub phi_max: Float,
    pub object_to_world: Transform,
    pub world_to_object: Transform,
    pub reverse_orientation: bool,
    pub transform_swaps_handedness: bool,
}

impl Disk {
    pub fn new(
        object_to_world: Transform,
        world_to_object: Transform,
        reverse_orientation: bool,
        height: Float,
        radius: Float,
        inner_radius: Float,
        phi_max: Float,
    ) -> Self {
        Disk {
            height,
            radius,
            inner_radius,
            phi_max: radians(clamp_t(phi_max, 0.0, 360.0)),
            transform_swaps_handedness: object_to_world.swaps_handedness(),
            object_to_world,
            world_to_object,
            reverse_orientation,
        }
    }
    pub fn object_bound(&self) -> Bounds3f {
        Bounds3f {
            p_min: Point3f {
                x: -self.radius,
                y: -self.radius,
                z: self.height,
            },
            p_max: Point3f {
                x: self.radius,
                y: self.radius,
                z: self.height,
            },
        }
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.object_to_world.transform_bounds(&self.object_bound())
    }
    /// Plane intersection with the annulus and phi clip checks; the
    /// same path serves both query kinds.
    fn find_hit(&self, r: &Ray) -> Option<(Float, Point3f, Float, Ray)> {
        let mut o_err: Vector3f = Vector3f::default();
        let mut d_err: Vector3f = Vector3f::default();
        let ray: Ray = self
            .world_to_object
            .transform_ray_with_error(r, &mut o_err, &mut d_err);
        // a ray parallel to the disk plane misses outright
        if ray.d.z == 0.0 as Float {
            return None;
        }
        let t_shape_hit: Float = (self.height - ray.o.z) / ray.d.z;
        if t_shape_hit <= 0.0 as Float || t_shape_hit >= ray.t_max.get() {
            return None;
        }
        let mut p_hit: Point3f = ray.position(t_shape_hit);
        let dist2: Float = p_hit.x * p_hit.x + p_hit.y * p_hit.y;
        if dist2 > self.radius * self.radius || dist2 < self.inner_radius * self.inner_radius {
            return None;
        }
        let mut phi: Float = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 as Float {
            phi += 2.0 as Float * PI as Float;
        }
        if phi > self.phi_max {
            return None;
        }
        p_hit.z = self.height;
        Some((t_shape_hit, p_hit, phi, ray))
    }
    pub fn intersect(&self, r: &Ray, t_hit: &mut Float, isect: &mut SurfaceInteraction) -> bool {
        let (t_shape_hit, p_hit, phi, ray) = match self.find_hit(r) {
            Some(hit) => hit,
            None => return false,
        };
        let dist: Float = (p_hit.x * p_hit.x + p_hit.y * p_hit.y).sqrt();
        let u: Float = phi / self.phi_max;
        let one_minus_v: Float = (dist - self.inner_radius) / (self.radius - self.inner_radius);
        let v: Float = 1.0 as Float - one_minus_v;
        let dpdu: Vector3f = Vector3f {
            x: -self.phi_max * p_hit.y,
            y: self.phi_max * p_hit.x,
            z: 0.0,
        };
        let dpdv: Vector3f = Vector3f {
            x: p_hit.x,
            y: p_hit.y,
            z: 0.0,
        } * ((self.inner_radius - self.radius) / dist);
        let dndu: Normal3f = Normal3f::default();
        let dndv: Normal3f = Normal3f::default();
        // planar intersection: no accumulated position error
        let p_error: Vector3f = Vector3f::default();
        let uv_hit: Point2f = Point2f { x: u, y: v };
        let wo: Vector3f = -ray.d;
        *isect = SurfaceInteraction::new(
            &p_hit, &p_error, uv_hit, &wo, &dpdu, &dpdv, &dndu, &dndv, ray.time,
        );
        self.object_to_world.transform_surface_interaction(isect);
        if self.reverse_orientation ^ self.transform_swaps_handedness {
            isect.reverse_normals();
        }
        *t_hit = t_shape_hit;
        true
    }
    pub fn intersect_p(&self, r: &Ray) -> bool {
        self.find_hit(r).is_some()
    }
    pub fn area(&self) -> Float {
        self.phi_max * 0.5 as Float
            * (self.radius * self.radius - self.inner_radius * self.inner_radius)
    }
    pub fn sample(&self, u: Point2f, pdf: &mut Float) -> InteractionCommon {
        let pd: Point2f = concentric_sample_disk(&u);
        let p_obj: Point3f = Point3f {
            x: pd.x * self.radius,
            y: pd.y * self.radius,
            z: self.height,
        };
        let mut it: InteractionCommon = InteractionCommon::default();
        it.n = self
            .object_to_world
            .transform_normal(&Normal3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            })
            .normalize();
        if self.reverse_orientation {
            it.n *= -1.0 as Float;
        }
        it.p = self.object_to_world.transform_point_with_abs_error(
            &p_obj,
            &Vector3f::default(),
            &mut it.p_error,
        );
        *pdf = 1.0 as Float / self.area();
        it
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annulus() -> Disk {
        // inner radius 0.5, outer 1.0, half swept (180 degrees)
        Disk::new(
            Transform::default(),
            Transform::default(),
            false,
            0.0,
            1.0,
            0.5,
            180.0,
        )
    }

    fn down_ray(x: Float, y: Float) -> Ray {
        Ray::new(
            Point3f { x, y, z: 2.0 },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        )
    }

    #[test]
    fn hole_and_removed_half_miss() {
        let disk: Disk = annulus();
        // through the hole
        assert!(!disk.intersect_p(&down_ray(0.25, 0.0)));
        // into the clipped half (phi > 180 degrees)
        assert!(!disk.intersect_p(&down_ray(0.0, -0.75)));
        // outside the outer radius
        assert!(!disk.intersect_p(&down_ray(1.5, 0.0)));
    }

    #[test]
    fn annulus_hit_has_expected_parameterisation() {
        let disk: Disk = annulus();
        let ray: Ray = down_ray(0.75, 0.0);
        let mut t_hit: Float = 0.0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        assert!(disk.intersect(&ray, &mut t_hit, &mut isect));
        assert!((t_hit - 2.0).abs() < 1e-5);
        assert!(isect.uv.x.abs() < 1e-5);
        assert!((isect.uv.y - 0.5).abs() < 1e-5);
        assert_eq!(isect.common.p_error, Vector3f::default());
    }

    #[test]
    fn parallel_ray_misses_cleanly() {
        let disk: Disk = annulus();
        let ray: Ray = Ray::new(
            Point3f {
                x: -3.0,
                y: 0.0,
                z: 0.0,
            },
            Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        assert!(!disk.intersect_p(&ray));
    }

    #[test]
    fn area_accounts_for_hole_and_sweep() {
        let disk: Disk = annulus();
        let expected: Float = PI * 0.5 * (1.0 - 0.25);
        assert!((disk.area() - expected).abs() < 1e-4);
    }
}
