//! Open cylinders around the z axis, clipped to a z interval and a
//! maximum azimuthal angle. Same conservative intersection template as
//! the sphere, with a gamma(3) error bound on the reprojected hit.

// std
use std::f32::consts::PI;
// crate
use crate::core::efloat::{quadratic_efloat, EFloat};
use crate::core::geometry::{
    vec3_cross_vec3, vec3_dot_vec3f, Bounds3f, Normal3f, Point2f, Point3f, Ray, Vector3f, XYEnum,
};
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::math::{clamp_t, lerp, radians};
use crate::core::precision::{gamma, Float};
use crate::core::transform::Transform;

#[derive(Clone)]
pub struct Cylinder {
    pub radius: Float,
    pub z_min: Float,
    pub z_max: Float,
    pub phi_max: Float,
    pub object_to_world: Transform,
    pub world_to_object: Transform,
    pub reverse_orientation: bool,
    pub transform_swaps_handedness: bool,
}

impl Cylinder {
    pub fn new(
        object_to_world: Transform,
        world_to_object: Transform,
        reverse_orientation: bool,
        radius: Float,
        z_min: Float,
        z_max: Float,
        phi_max: Float,
    ) -> Self {
        Cylinder {
            radius,
            z_min: z_min.min(z_max),
            z_max: z_min.max(z_max),
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
    fn find_hit(&self, r: &Ray) -> Option<(EFloat, EFloat, Ray)> {
        let mut o_err: Vector3f = Vector3f::default();
        let mut d_err: Vector3f = Vector3f::default();
        let ray: Ray = self
            .world_to_object
            .transform_ray_with_error(r, &mut o_err, &mut d_err);
        // the z components drop out of the lateral-surface quadric
        let ox = EFloat::new(ray.o.x, o_err.x);
        let oy = EFloat::new(ray.o.y, o_err.y);
        let dx = EFloat::new(ray.d.x, d_err.x);
        let dy = EFloat::new(ray.d.y, d_err.y);
        let a: EFloat = dx * dx + dy * dy;
        // a ray parallel to the axis never crosses the lateral surface
        if a.v == 0.0 as Float {
            return None;
        }
        let b: EFloat = (dx * ox + dy * oy) * 2.0 as Float;
        let c: EFloat =
            ox * ox + oy * oy - EFloat::new(self.radius, 0.0) * EFloat::new(self.radius, 0.0);
        let mut t0: EFloat = EFloat::default();
        let mut t1: EFloat = EFloat::default();
        if !quadratic_efloat(a, b, c, &mut t0, &mut t1) {
            return None;
        }
        if t0.upper_bound() > ray.t_max.get() || t1.lower_bound() <= 0.0 as Float {
            return None;
        }
        Some((t0, t1, ray))
    }
    fn hit_position(&self, ray: &Ray, t: EFloat) -> Option<(Point3f, Float)> {
        let mut p_hit: Point3f = ray.position(t.v);
        // reproject onto the cylinder surface
        let hit_radius: Float = (p_hit.x * p_hit.x + p_hit.y * p_hit.y).sqrt();
        p_hit.x *= self.radius / hit_radius;
        p_hit.y *= self.radius / hit_radius;
        let mut phi: Float = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 as Float {
            phi += 2.0 as Float * PI as Float;
        }
        if p_hit.z < self.z_min || p_hit.z > self.z_max || phi > self.phi_max {
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
        let u: Float = phi / self.phi_max;
        let v: Float = (p_hit.z - self.z_min) / (self.z_max - self.z_min);
        let dpdu: Vector3f = Vector3f {
            x: -self.phi_max * p_hit.y,
            y: self.phi_max * p_hit.x,
            z: 0.0,
        };
        let dpdv: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: self.z_max - self.z_min,
        };
        // the lateral surface is flat along v, so the second
        // fundamental form only has the uu term
        let d2_p_duu: Vector3f = Vector3f {
            x: p_hit.x,
            y: p_hit.y,
            z: 0.0,
        } * -self.phi_max
            * self.phi_max;
        let d2_p_duv: Vector3f = Vector3f::default();
        let d2_p_dvv: Vector3f = Vector3f::default();
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
        let p_error: Vector3f = Vector3f {
            x: p_hit.x,
            y: p_hit.y,
            z: 0.0,
        }
        .abs()
            * gamma(3_i32);
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
        (self.z_max - self.z_min) * self.radius * self.phi_max
    }
    pub fn sample(&self, u: Point2f, pdf: &mut Float) -> InteractionCommon {
        let z: Float = lerp(u[XYEnum::X], self.z_min, self.z_max);
        let phi: Float = u[XYEnum::Y] * self.phi_max;
        let mut p_obj: Point3f = Point3f {
            x: self.radius * phi.cos(),
            y: self.radius * phi.sin(),
            z,
        };
        let mut it: InteractionCommon = InteractionCommon::default();
        it.n = self
            .object_to_world
            .transform_normal(&Normal3f {
                x: p_obj.x,
                y: p_obj.y,
                z: 0.0,
            })
            .normalize();
        if self.reverse_orientation {
            it.n *= -1.0 as Float;
        }
        // reproject radially before transforming out
        let hit_radius: Float = (p_obj.x * p_obj.x + p_obj.y * p_obj.y).sqrt();
        p_obj.x *= self.radius / hit_radius;
        p_obj.y *= self.radius / hit_radius;
        let p_obj_error: Vector3f = Vector3f {
            x: p_obj.x,
            y: p_obj.y,
            z: 0.0,
        }
        .abs()
            * gamma(3_i32);
        it.p = self.object_to_world.transform_point_with_abs_error(
            &p_obj,
            &p_obj_error,
            &mut it.p_error,
        );
        *pdf = 1.0 as Float / self.area();
        it
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cylinder() -> Cylinder {
        Cylinder::new(
            Transform::default(),
            Transform::default(),
            false,
            1.0,
            -1.0,
            1.0,
            360.0,
        )
    }

    #[test]
    fn side_ray_hits_lateral_surface() {
        let cylinder: Cylinder = unit_cylinder();
        let ray: Ray = Ray::new(
            Point3f {
                x: 4.0,
                y: 0.0,
                z: 0.25,
            },
            Vector3f {
                x: -1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        let mut t_hit: Float = 0.0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        assert!(cylinder.intersect(&ray, &mut t_hit, &mut isect));
        assert!((t_hit - 3.0).abs() < 1e-4);
        assert!((isect.common.p.x - 1.0).abs() < 1e-4);
        assert!(isect.common.n.x > 0.99);
        // the cylinder is open; a ray down the axis passes through
        let axial: Ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: 4.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        );
        assert!(!cylinder.intersect_p(&axial));
    }

    #[test]
    fn clipped_height_and_phi_reject_hits() {
        let half: Cylinder = Cylinder::new(
            Transform::default(),
            Transform::default(),
            false,
            1.0,
            -1.0,
            1.0,
            180.0,
        );
        // phi of the +y half is within [0, 180]; -y half is clipped
        let hit_ray: Ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 4.0,
                z: 0.0,
            },
            Vector3f {
                x: 0.0,
                y: -1.0,
                z: 0.0,
            },
        );
        assert!(half.intersect_p(&hit_ray));
        let cylinder: Cylinder = unit_cylinder();
        let above: Ray = Ray::new(
            Point3f {
                x: 4.0,
                y: 0.0,
                z: 1.5,
            },
            Vector3f {
                x: -1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        assert!(!cylinder.intersect_p(&above));
    }

    #[test]
    fn parametric_values_match_position() {
        let cylinder: Cylinder = unit_cylinder();
        let ray: Ray = Ray::new(
            Point3f {
                x: 4.0,
                y: 0.0,
                z: 0.5,
            },
            Vector3f {
                x: -1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        let mut t_hit: Float = 0.0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        assert!(cylinder.intersect(&ray, &mut t_hit, &mut isect));
        assert!(isect.uv.x.abs() < 1e-5);
        assert!((isect.uv.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn area_of_full_cylinder() {
        let cylinder: Cylinder = unit_cylinder();
        assert!((cylinder.area() - 2.0 * PI * 2.0).abs() < 1e-3);
    }
}
