//! Models bind a shape to its material and, optionally, an area
//! light. The acceleration structure is itself a model, so scenes can
//! nest aggregates.

// std
use std::sync::Arc;
// crate
use crate::accelerators::bvh::BoundingVolumeHierarchy;
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::interaction::SurfaceInteraction;
use crate::core::light::Light;
use crate::core::material::Material;
use crate::core::precision::Float;
use crate::core::shape::Shape;

pub struct GeometricModel {
    pub shape: Arc<Shape>,
    pub material: Option<Arc<Material>>,
    pub area_light: Option<Arc<Light>>,
}

impl GeometricModel {
    pub fn new(
        shape: Arc<Shape>,
        material: Option<Arc<Material>>,
        area_light: Option<Arc<Light>>,
    ) -> Self {
        GeometricModel {
            shape,
            material,
            area_light,
        }
    }
}

pub enum Model {
    Geometric(GeometricModel),
    BVH(Box<BoundingVolumeHierarchy>),
}

impl Model {
    pub fn world_bound(&self) -> Bounds3f {
        match self {
            Model::Geometric(model) => model.shape.world_bound(),
            Model::BVH(accel) => accel.world_bound(),
        }
    }
    /// Nearest-hit query. A successful intersection tightens the
    /// ray's extent so later candidates behind it are pruned, and
    /// leaves a back-reference to the hit model in the event.
    pub fn intersect(&self, ray: &Ray, isect: &mut SurfaceInteraction) -> bool {
        match self {
            Model::Geometric(model) => {
                let mut t_hit: Float = 0.0;
                if !model.shape.intersect(ray, &mut t_hit, isect) {
                    return false;
                }
                ray.t_max.set(t_hit);
                isect.model = Some(self as *const Model);
                true
            }
            Model::BVH(accel) => accel.intersect(ray, isect),
        }
    }
    /// Any-hit query for visibility testing; cheaper because no event
    /// is produced.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        match self {
            Model::Geometric(model) => model.shape.intersect_p(ray),
            Model::BVH(accel) => accel.intersect_p(ray),
        }
    }
    pub fn get_material(&self) -> Option<Arc<Material>> {
        match self {
            Model::Geometric(model) => model.material.clone(),
            Model::BVH(_accel) => None,
        }
    }
    pub fn get_area_light(&self) -> Option<Arc<Light>> {
        match self {
            Model::Geometric(model) => model.area_light.clone(),
            Model::BVH(_accel) => None,
        }
    }
}
