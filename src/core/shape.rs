//! Shape dispatch. The shape set is closed (sphere, cylinder, disk),
//! so calls fan out through an enum rather than a vtable.

// crate
use crate::core::geometry::{
    nrm_abs_dot_vec3f, pnt3_distance_squaredf, Bounds3f, Point2f, Ray, Vector3f,
};
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::precision::Float;
use crate::shapes::cylinder::Cylinder;
use crate::shapes::disk::Disk;
use crate::shapes::sphere::Sphere;

pub enum Shape {
    Sphere(Sphere),
    Cylinder(Cylinder),
    Disk(Disk),
}

impl Shape {
    pub fn object_bound(&self) -> Bounds3f {
        match self {
            Shape::Sphere(shape) => shape.object_bound(),
            Shape::Cylinder(shape) => shape.object_bound(),
            Shape::Disk(shape) => shape.object_bound(),
        }
    }
    pub fn world_bound(&self) -> Bounds3f {
        match self {
            Shape::Sphere(shape) => shape.world_bound(),
            Shape::Cylinder(shape) => shape.world_bound(),
            Shape::Disk(shape) => shape.world_bound(),
        }
    }
    pub fn intersect(&self, r: &Ray, t_hit: &mut Float, isect: &mut SurfaceInteraction) -> bool {
        match self {
            Shape::Sphere(shape) => shape.intersect(r, t_hit, isect),
            Shape::Cylinder(shape) => shape.intersect(r, t_hit, isect),
            Shape::Disk(shape) => shape.intersect(r, t_hit, isect),
        }
    }
    pub fn intersect_p(&self, r: &Ray) -> bool {
        match self {
            Shape::Sphere(shape) => shape.intersect_p(r),
            Shape::Cylinder(shape) => shape.intersect_p(r),
            Shape::Disk(shape) => shape.intersect_p(r),
        }
    }
    pub fn area(&self) -> Float {
        match self {
            Shape::Sphere(shape) => shape.area(),
            Shape::Cylinder(shape) => shape.area(),
            Shape::Disk(shape) => shape.area(),
        }
    }
    pub fn sample(&self, u: Point2f, pdf: &mut Float) -> InteractionCommon {
        match self {
            Shape::Sphere(shape) => shape.sample(u, pdf),
            Shape::Cylinder(shape) => shape.sample(u, pdf),
            Shape::Disk(shape) => shape.sample(u, pdf),
        }
    }
    /// Sample a point on the shape as seen from a reference point;
    /// the pdf is with respect to solid angle at the reference.
    pub fn sample_with_ref_point(
        &self,
        iref: &InteractionCommon,
        u: Point2f,
        pdf: &mut Float,
    ) -> InteractionCommon {
        match self {
            Shape::Sphere(shape) => shape.sample_with_ref_point(iref, u, pdf),
            _ => {
                // area sampling converted to solid-angle measure
                let intr: InteractionCommon = self.sample(u, pdf);
                let mut wi: Vector3f = intr.p - iref.p;
                if wi.length_squared() == 0.0 as Float {
                    *pdf = 0.0 as Float;
                } else {
                    wi = wi.normalize();
                    *pdf *= pnt3_distance_squaredf(&iref.p, &intr.p)
                        / nrm_abs_dot_vec3f(&intr.n, &-wi);
                    if (*pdf).is_infinite() {
                        *pdf = 0.0 as Float;
                    }
                }
                intr
            }
        }
    }
    pub fn pdf_with_ref_point(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float {
        match self {
            Shape::Sphere(shape) => shape.pdf_with_ref_point(iref, wi),
            _ => {
                // intersect the sample ray with the shape and convert
                // the area density at the hit to solid angle
                let ray: Ray = iref.spawn_ray(wi);
                let mut t_hit: Float = 0.0;
                let mut isect_light: SurfaceInteraction = SurfaceInteraction::default();
                if !self.intersect(&ray, &mut t_hit, &mut isect_light) {
                    return 0.0 as Float;
                }
                let mut pdf: Float = pnt3_distance_squaredf(&iref.p, &isect_light.common.p)
                    / (nrm_abs_dot_vec3f(&isect_light.common.n, &-(*wi)) * self.area());
                if pdf.is_infinite() {
                    pdf = 0.0 as Float;
                }
                pdf
            }
        }
    }
    pub fn get_reverse_orientation(&self) -> bool {
        match self {
            Shape::Sphere(shape) => shape.reverse_orientation,
            Shape::Cylinder(shape) => shape.reverse_orientation,
            Shape::Disk(shape) => shape.reverse_orientation,
        }
    }
    pub fn get_transform_swaps_handedness(&self) -> bool {
        match self {
            Shape::Sphere(shape) => shape.transform_swaps_handedness,
            Shape::Cylinder(shape) => shape.transform_swaps_handedness,
            Shape::Disk(shape) => shape.transform_swaps_handedness,
        }
    }
}
