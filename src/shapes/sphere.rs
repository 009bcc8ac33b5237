//! Spheres, optionally clipped to a z interval and a maximum
//! azimuthal angle. Intersection runs the conservative quadric
//! template: error-tracked coefficients, ordered-root selection with
//! clip-and-retry, hit-point reprojection and a gamma(5) error bound.

// std
use std::f32::consts::PI;
// crate
use crate::core::efloat::{quadratic_efloat, EFloat};
use crate::core::geometry::{
    nrm_abs_dot_vec3f, pnt3_distance_squaredf, pnt3_distancef, pnt3_offset_ray_origin,
    spherical_direction_vec3, vec3_coordinate_system, vec3_cross_vec3, vec3_dot_vec3f, Bounds3f,
    Normal3f, Point2f, Point3f, Ray, Vector3f, XYEnum,
};
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::math::{clamp_t, radians};
use crate::core::precision::{gamma, Float};
use crate::core::sampling::{uniform_cone_pdf, uniform_sample_sphere};
use crate::core::transform::Transform;

#[derive(Clone)]
pub struct Sphere {
    pub radius: Float,
    pub z_min: Float,
    pub z_max: Float,
    pub theta_min: Float,
    pub theta_max: Float,
    pub phi_max: Float,
    pub object_to_world: Transform,
    pub world_to_object: Transform,
    pub reverse_orientation: bool,
    pub transform_swaps_handedness: bool,
}

impl Default for Sphere {
    fn default() -> Self {
        Sphere::new(
            Transform::default(),
            Transform::default(),
            false,
            1.0,
            -1.0,
            1.0,
            360.0,
        )
    }
}

impl Sphere {
    pub fn new(
        object_to_world: Transform,
        world_to_object: Transform,
        reverse_orientation: bool,
        radius: Float,
        z_min: Float,
        z_max: Float,
        phi_max: Float,
    ) -> Self {
        Sphere {
            radius,
            z_min: clamp_t(z_min.min(z_max), -radius, radius),
            z_max: clamp_t(z_min.max(z_max), -radius, radius),
            theta_min: clamp_t(z_min.min(z_max) / radius, -1.0, 1.0).acos(),
            theta_max: clamp_t(z_min.max(z_max) / radius, -1.0, 1.0).acos(),
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
                z: self.z_min,
            },
            p_max: Point3f {
                x: self.radius,
                y: self.radius,
                z: self.z_max,
            },
        }
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.object_to_world.transform_bounds(&self.object_bound())
    }
    /// Solve the quadric in object space; on success fill the hit
    /// candidates and the clip test inputs.
    fn find_hit(&self, r: &Ray) -> Option<(EFloat, EFloat, Ray)> {
        // transform the ray to object space, tracking the error the
        // transformation introduced
        let mut o_err: Vector3f = Vector3f::default();
        let mut d_err: Vector3f = Vector3f::default();
        let ray: Ray = self
            .world_to_object
            .transform_ray_with_error(r, &mut o_err, &mut d_err);
        // quadric coefficients from error-tracked ray values
        let ox = EFloat::new(ray.o.x, o_err.x);
        let oy = EFloat::new(ray.o.y, o_err.y);
        let oz = EFloat::new(ray.o.z, o_err.z);
        let dx = EFloat::new(ray.d.x, d_err.x);
        let dy = EFloat::new(ray.d.y, d_err.y);
        let dz = EFloat::new(ray.d.z, d_err.z);
        let a: EFloat = dx * dx + dy * dy + dz * dz;
        let b: EFloat = (dx * ox + dy * oy + dz * oz) * 2.0 as Float;
        let c: EFloat = ox * ox + oy * oy + oz * oz
            - EFloat::new(self.radius, 0.0) * EFloat::new(self.radius, 0.0);
        let mut t0: EFloat = EFloat::default();
        let mut t1: EFloat = EFloat::default();
        if !quadratic_efloat(a, b, c, &mut t0, &mut t1) {
            return None;
        }
        // conservative rejection against the ray extent
        if t0.upper_bound() > ray.t_max.get() || t1.lower_bound() <= 0.0 as Float {
            return None;
        }
        Some((t0, t1, ray))
    }
    /// Evaluate a candidate root: reproject onto the sphere, stabilise
    /// phi, and check the clip bounds.
    fn hit_position(&self, ray: &Ray, t: EFloat) -> Option<(Point3f, Float)> {
        let mut p_hit: Point3f = ray.position(t.v);
        // reproject onto the sphere surface to remove accumulated
        // round-off drift
        p_hit *= self.radius / pnt3_distancef(&p_hit, &Point3f::default());
        if p_hit.x == 0.0 as Float && p_hit.y == 0.0 as Float {
            p_hit.x = 1e-5 as Float * self.radius;
        }
        let mut phi: Float = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 as Float {
            phi += 2.0 as Float * PI as Float;
        }
        if (self.z_min > -self.radius && p_hit.z < self.z_min)
            || (self.z_max < self.radius && p_hit.z > self.z_max)
            || phi > self.phi_max
        {
            return None;
        }
        Some((p_hit, phi))
    }
    pub fn intersect(&self, r: &Ray, t_hit: &mut Float, isect: &mut SurfaceInteraction) -> bool {
        let (t0, t1, ray) = match self.find_hit(r) {
            Some(candidates) => candidates,
            None => return false,
        };
        let mut t_shape_hit: EFloat = t0;
        if t_shape_hit.lower_bound() <= 0.0 as Float {
            t_shape_hit = t1;
            if t_shape_hit.upper_bound() > ray.t_max.get() {
                return false;
            }
        }
        let (p_hit, phi) = match self.hit_position(&ray, t_shape_hit) {
            Some(hit) => hit,
            None => {
                // the near root is clipped away; retry with the far one
                if t_shape_hit == t1 {
                    return false;
                }
                if t1.upper_bound() > ray.t_max.get() {
                    return false;
                }
                t_shape_hit = t1;
                match self.hit_position(&ray, t_shape_hit) {
                    Some(hit) => hit,
                    None => return false,
                }
            }
        };
        // parametric representation of the hit
        let u: Float = phi / self.phi_max;
        let theta: Float = clamp_t(p_hit.z / self.radius, -1.0, 1.0).acos();
        let v: Float = (theta - self.theta_min) / (self.theta_max - self.theta_min);
        let z_radius: Float = (p_hit.x * p_hit.x + p_hit.y * p_hit.y).sqrt();
        let inv_z_radius: Float = 1.0 as Float / z_radius;
        let cos_phi: Float = p_hit.x * inv_z_radius;
        let sin_phi: Float = p_hit.y * inv_z_radius;
        let dpdu: Vector3f = Vector3f {
            x: -self.phi_max * p_hit.y,
            y: self.phi_max * p_hit.x,
            z: 0.0,
        };
        let dpdv: Vector3f = Vector3f {
            x: p_hit.z * cos_phi,
            y: p_hit.z * sin_phi,
            z: -self.radius * theta.sin(),
        } * (self.theta_max - self.theta_min);
        // normal derivatives from the Weingarten equations
        let d2_p_duu: Vector3f = Vector3f {
            x: p_hit.x,
            y: p_hit.y,
            z: 0.0,
        } * -self.phi_max
            * self.phi_max;
        let d2_p_duv: Vector3f = Vector3f {
            x: -sin_phi,
            y: cos_phi,
            z: 0.0,
        } * (self.theta_max - self.theta_min)
            * p_hit.z
            * self.phi_max;
        let d2_p_dvv: Vector3f = Vector3f {
            x: p_hit.x,
            y: p_hit.y,
            z: p_hit.z,
        } * -(self.theta_max - self.theta_min)
            * (self.theta_max - self.theta_min);
        let ec: Float = vec3_dot_vec3f(&dpdu, &dpdu);
        let fc: Float = vec3_dot_vec3f(&dpdu, &dpdv);
        let gc: Float = vec3_dot_vec3f(&dpdv, &dpdv);
        let nc: Vector3f = vec3_cross_vec3(&dpdu, &dpdv).normalize();
        let el: Float = vec3_dot_vec3f(&nc, &d2_p_duu);
        let fl: Float = vec3_dot_vec3f(&nc, &d2_p_duv);
        let gl: Float = vec3_dot_vec3f(&nc, &d2_p_dvv);
        let inv_egf2: Float = 1.0 as Float / (ec * gc - fc * fc);
        let dndu: Vector3f =
            dpdu * (fl * fc - el * gc) * inv_egf2 + dpdv * (el * fc - fl * ec) * inv_egf2;
        let dndu = Normal3f {
            x: dndu.x,
            y: dndu.y,
            z: dndu.z,
        };
        let dndv: Vector3f =
            dpdu * (gl * fc - fl * gc) * inv_egf2 + dpdv * (fl * fc - gl * ec) * inv_egf2;
        let dndv = Normal3f {
            x: dndv.x,
            y: dndv.y,
            z: dndv.z,
        };
        // conservative bound on the reprojected hit position
        let p_error: Vector3f = Vector3f {
            x: p_hit.x,
            y: p_hit.y,
            z: p_hit.z,
        }
        .abs()
            * gamma(5_i32);
        let uv_hit: Point2f = Point2f { x: u, y: v };
        let wo: Vector3f = -ray.d;
        *isect = SurfaceInteraction::new(
            &p_hit, &p_error, uv_hit, &wo, &dpdu, &dpdv, &dndu, &dndv, ray.time,
        );
        self.object_to_world.transform_surface_interaction(isect);
        if self.reverse_orientation ^ self.transform_swaps_handedness {
            isect.reverse_normals();
        }
        *t_hit = t_shape_hit.v;
        true
    }
    pub fn intersect_p(&self, r: &Ray) -> bool {
        let (t0, t1, ray) = match self.find_hit(r) {
            Some(candidates) => candidates,
            None => return false,
        };
        let mut t_shape_hit: EFloat = t0;
        if t_shape_hit.lower_bound() <= 0.0 as Float {
            t_shape_hit = t1;
            if t_shape_hit.upper_bound() > ray.t_max.get() {
                return false;
            }
        }
        if self.hit_position(&ray, t_shape_hit).is_some() {
            return true;
        }
        if t_shape_hit == t1 {
            return false;
        }
        if t1.upper_bound() > ray.t_max.get() {
            return false;
        }
        self.hit_position(&ray, t1).is_some()
    }
    pub fn area(&self) -> Float {
        self.phi_max * self.radius * (self.z_max - self.z_min)
    }
    pub fn sample(&self, u: Point2f, pdf: &mut Float) -> InteractionCommon {
        let mut p_obj: Point3f = Point3f::default() + uniform_sample_sphere(u) * self.radius;
        let mut it: InteractionCommon = InteractionCommon::default();
        it.n = self
            .object_to_world
            .transform_normal(&Normal3f {
                x: p_obj.x,
                y: p_obj.y,
                z: p_obj.z,
            })
            .normalize();
        if self.reverse_orientation {
            it.n *= -1.0 as Float;
        }
        // reproject and carry the reprojection error into world space
        p_obj *= self.radius / pnt3_distancef(&p_obj, &Point3f::default());
        let p_obj_error: Vector3f = Vector3f::from(p_obj).abs() * gamma(5_i32);
        it.p = self.object_to_world.transform_point_with_abs_error(
            &p_obj,
            &p_obj_error,
            &mut it.p_error,
        );
        *pdf = 1.0 as Float / self.area();
        it
    }
    pub fn sample_with_ref_point(
        &self,
        iref: &InteractionCommon,
        u: Point2f,
        pdf: &mut Float,
    ) -> InteractionCommon {
        let p_center: Point3f = self.object_to_world.transform_point(&Point3f::default());
        // fall back to uniform area sampling when the reference point
        // is inside the sphere
        let p_origin: Point3f =
            pnt3_offset_ray_origin(&iref.p, &iref.p_error, &iref.n, &(p_center - iref.p));
        if pnt3_distance_squaredf(&p_origin, &p_center) <= self.radius * self.radius {
            let intr: InteractionCommon = self.sample(u, pdf);
            let mut wi: Vector3f = intr.p - iref.p;
            if wi.length_squared() == 0.0 as Float {
                *pdf = 0.0 as Float;
            } else {
                // convert the area measure to solid angle
                wi = wi.normalize();
                *pdf *= pnt3_distance_squaredf(&iref.p, &intr.p) / nrm_abs_dot_vec3f(&intr.n, &-wi);
            }
            if (*pdf).is_infinite() {
                *pdf = 0.0 as Float;
            }
            return intr;
        }
        // otherwise sample uniformly inside the subtended cone
        let wc: Vector3f = (p_center - iref.p).normalize();
        let mut wc_x: Vector3f = Vector3f::default();
        let mut wc_y: Vector3f = Vector3f::default();
        vec3_coordinate_system(&wc, &mut wc_x, &mut wc_y);
        let sin_theta_max2: Float =
            self.radius * self.radius / pnt3_distance_squaredf(&iref.p, &p_center);
        let cos_theta_max: Float = (0.0 as Float).max(1.0 as Float - sin_theta_max2).sqrt();
        let cos_theta: Float = (1.0 as Float - u[XYEnum::X]) + u[XYEnum::X] * cos_theta_max;
        let sin_theta: Float = (0.0 as Float)
            .max(1.0 as Float - cos_theta * cos_theta)
            .sqrt();
        let phi: Float = u[XYEnum::Y] * 2.0 as Float * PI as Float;
        // angle from the sphere center to the sampled surface point
        let dc: Float = pnt3_distancef(&iref.p, &p_center);
        let ds: Float = dc * cos_theta
            - (0.0 as Float)
                .max(self.radius * self.radius - dc * dc * sin_theta * sin_theta)
                .sqrt();
        let cos_alpha: Float =
            (dc * dc + self.radius * self.radius - ds * ds) / (2.0 as Float * dc * self.radius);
        let sin_alpha: Float = (0.0 as Float)
            .max(1.0 as Float - cos_alpha * cos_alpha)
            .sqrt();
        let n_world: Vector3f =
            spherical_direction_vec3(sin_alpha, cos_alpha, phi, &(-wc_x), &(-wc_y), &(-wc));
        let p_world: Point3f = p_center
            + Point3f {
                x: n_world.x,
                y: n_world.y,
                z: n_world.z,
            } * self.radius;
        let mut it: InteractionCommon = InteractionCommon::default();
        it.p = p_world;
        it.p_error = Vector3f::from(p_world).abs() * gamma(5_i32);
        it.n = Normal3f::from(n_world);
        if self.reverse_orientation {
            it.n *= -1.0 as Float;
        }
        *pdf = uniform_cone_pdf(cos_theta_max);
        it
    }
    pub fn pdf_with_ref_point(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float {
        let p_center: Point3f = self.object_to_world.transform_point(&Point3f::default());
        let p_origin: Point3f =
            pnt3_offset_ray_origin(&iref.p, &iref.p_error, &iref.n, &(p_center - iref.p));
        if pnt3_distance_squaredf(&p_origin, &p_center) <= self.radius * self.radius {
            // reference inside the sphere: intersect and convert the
            // area density at the hit
            let ray: Ray = iref.spawn_ray(wi);
            let mut t_hit: Float = 0.0;
            let mut isect_light: SurfaceInteraction = SurfaceInteraction::default();
            if self.intersect(&ray, &mut t_hit, &mut isect_light) {
                let mut pdf: Float = pnt3_distance_squaredf(&iref.p, &isect_light.common.p)
                    / (nrm_abs_dot_vec3f(&isect_light.common.n, &-(*wi)) * self.area());
                if pdf.is_infinite() {
                    pdf = 0.0 as Float;
                }
                return pdf;
            } else {
                return 0.0 as Float;
            }
        }
        let sin_theta_max2: Float =
            self.radius * self.radius / pnt3_distance_squaredf(&iref.p, &p_center);
        let cos_theta_max: Float = (0.0 as Float).max(1.0 as Float - sin_theta_max2).sqrt();
        uniform_cone_pdf(cos_theta_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::pnt3_distancef;

    fn unit_sphere_at(center: Vector3f) -> Sphere {
        let object_to_world: Transform = Transform::translate(&center);
        let world_to_object: Transform = object_to_world.inverse();
        Sphere::new(object_to_world, world_to_object, false, 1.0, -1.0, 1.0, 360.0)
    }

    #[test]
    fn head_on_ray_hits_front_surface() {
        let sphere: Sphere = unit_sphere_at(Vector3f::default());
        let ray: Ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: 3.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        );
        let mut t_hit: Float = 0.0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        assert!(sphere.intersect(&ray, &mut t_hit, &mut isect));
        assert!((t_hit - 2.0).abs() < 1e-4);
        assert!((isect.common.p.z - 1.0).abs() < 1e-4);
        assert!(isect.common.n.z > 0.99);
        assert!(sphere.intersect_p(&ray));
    }

    #[test]
    fn hit_point_lies_within_reported_error_bound() {
        let sphere: Sphere = unit_sphere_at(Vector3f {
            x: 0.3,
            y: -0.2,
            z: 5.0,
        });
        let ray: Ray = Ray::new(
            Point3f {
                x: 0.1,
                y: 0.05,
                z: 0.0,
            },
            Vector3f {
                x: 0.02,
                y: -0.04,
                z: 1.0,
            }
            .normalize(),
        );
        let mut t_hit: Float = 0.0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        assert!(sphere.intersect(&ray, &mut t_hit, &mut isect));
        let along_ray: Point3f = ray.position(t_hit);
        assert!(
            pnt3_distancef(&along_ray, &isect.common.p) <= isect.common.p_error.length() + 1e-5
        );
    }

    #[test]
    fn ray_from_inside_uses_far_root() {
        let sphere: Sphere = unit_sphere_at(Vector3f::default());
        let ray: Ray = Ray::new(
            Point3f::default(),
            Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        let mut t_hit: Float = 0.0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        assert!(sphere.intersect(&ray, &mut t_hit, &mut isect));
        assert!((t_hit - 1.0).abs() < 1e-4);
    }

    #[test]
    fn partial_sphere_rejects_clipped_hits() {
        let object_to_world: Transform = Transform::default();
        let world_to_object: Transform = Transform::default();
        // keep only the upper half
        let sphere: Sphere =
            Sphere::new(object_to_world, world_to_object, false, 1.0, 0.0, 1.0, 360.0);
        let low_ray: Ray = Ray::new(
            Point3f {
                x: 3.0,
                y: 0.0,
                z: -0.5,
            },
            Vector3f {
                x: -1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        assert!(!sphere.intersect_p(&low_ray));
        let high_ray: Ray = Ray::new(
            Point3f {
                x: 3.0,
                y: 0.0,
                z: 0.5,
            },
            Vector3f {
                x: -1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        assert!(sphere.intersect_p(&high_ray));
    }

    #[test]
    fn grazing_rays_never_produce_nan() {
        let sphere: Sphere = unit_sphere_at(Vector3f::default());
        for i in 0..64 {
            // rays nearly tangent to the top of the sphere
            let eps: Float = (i as Float - 32.0) * 1e-7;
            let ray: Ray = Ray::new(
                Point3f {
                    x: -5.0,
                    y: 0.0,
                    z: 1.0 + eps,
                },
                Vector3f {
                    x: 1.0,
                    y: 0.0,
                    z: 0.0,
                },
            );
            let mut t_hit: Float = 0.0;
            let mut isect: SurfaceInteraction = SurfaceInteraction::default();
            if sphere.intersect(&ray, &mut t_hit, &mut isect) {
                assert!(!t_hit.is_nan());
                assert!(!isect.common.p.has_nans());
                assert!(!isect.common.n.has_nans());
                let along_ray: Point3f = ray.position(t_hit);
                assert!(
                    pnt3_distancef(&along_ray, &isect.common.p)
                        <= isect.common.p_error.length() + 1e-4
                );
            }
        }
    }

    #[test]
    fn area_of_full_unit_sphere() {
        let sphere: Sphere = unit_sphere_at(Vector3f::default());
        assert!((sphere.area() - 4.0 * PI).abs() < 1e-3);
    }
}
