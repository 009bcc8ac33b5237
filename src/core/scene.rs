//! The scene ties the acceleration aggregate to the light list and
//! answers the two ray queries everything else is built on.

// std
use std::sync::Arc;
// crate
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::interaction::SurfaceInteraction;
use crate::core::light::Light;
use crate::core::model::Model;

pub struct Scene {
    pub lights: Vec<Arc<Light>>,
    aggregate: Arc<Model>,
    world_bound: Bounds3f,
}

impl Scene {
    pub fn new(aggregate: Arc<Model>, lights: Vec<Arc<Light>>) -> Self {
        let world_bound: Bounds3f = aggregate.world_bound();
        let scene: Scene = Scene {
            lights,
            aggregate,
            world_bound,
        };
        for light in scene.lights.iter() {
            light.preprocess(&scene.world_bound);
        }
        scene
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }
    /// Nearest intersection along the ray, if any.
    pub fn intersect(&self, ray: &Ray, isect: &mut SurfaceInteraction) -> bool {
        assert_ne!(ray.d, crate::core::geometry::Vector3f::default());
        self.aggregate.intersect(ray, isect)
    }
    /// Predicate form for visibility queries.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        assert_ne!(ray.d, crate::core::geometry::Vector3f::default());
        self.aggregate.intersect_p(ray)
    }
}
