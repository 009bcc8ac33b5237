//! Light dispatch and visibility testing. Lights expose incident
//! radiance sampling toward a scattering event plus their total
//! emitted power; visibility between the event and the sampled light
//! point goes through an any-hit query.

// crate
use crate::core::geometry::{Bounds3f, Point2f, Ray, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::precision::Float;
use crate::core::scene::Scene;
use crate::core::spectrum::Spectrum;
use crate::lights::diffuse::DiffuseAreaLight;
use crate::lights::infinite::InfiniteLight;
use crate::lights::point::PointLight;
use crate::lights::spot::SpotLight;

#[repr(u8)]
pub enum LightFlags {
    DeltaPosition = 1,
    DeltaDirection = 2,
    Area = 4,
    Infinite = 8,
}

pub fn is_delta_light(flags: u8) -> bool {
    flags & LightFlags::DeltaPosition as u8 > 0
        || flags & LightFlags::DeltaDirection as u8 > 0
}

/// The two endpoints of a sampled beam; `unoccluded` shoots the
/// connecting segment through the scene.
#[derive(Debug, Default, Clone)]
pub struct VisibilityTester {
    pub p0: InteractionCommon,
    pub p1: InteractionCommon,
}

impl VisibilityTester {
    pub fn unoccluded(&self, scene: &Scene) -> bool {
        !scene.intersect_p(&self.p0.spawn_ray_to(&self.p1))
    }
}

pub enum Light {
    Point(PointLight),
    Spot(SpotLight),
    DiffuseArea(DiffuseAreaLight),
    Infinite(InfiniteLight),
}

impl Light {
    /// Sample a direction from the event toward the light; returns
    /// the incident radiance and fills direction, density and the
    /// visibility tester.
    pub fn sample_li(
        &self,
        iref: &InteractionCommon,
        u: Point2f,
        wi: &mut Vector3f,
        pdf: &mut Float,
        vis: &mut VisibilityTester,
    ) -> Spectrum {
        match self {
            Light::Point(light) => light.sample_li(iref, u, wi, pdf, vis),
            Light::Spot(light) => light.sample_li(iref, u, wi, pdf, vis),
            Light::DiffuseArea(light) => light.sample_li(iref, u, wi, pdf, vis),
            Light::Infinite(light) => light.sample_li(iref, u, wi, pdf, vis),
        }
    }
    pub fn power(&self) -> Spectrum {
        match self {
            Light::Point(light) => light.power(),
            Light::Spot(light) => light.power(),
            Light::DiffuseArea(light) => light.power(),
            Light::Infinite(light) => light.power(),
        }
    }
    /// Emitted radiance carried by a ray that leaves the scene;
    /// nonzero only for infinite lights.
    pub fn le(&self, ray: &Ray) -> Spectrum {
        match self {
            Light::Infinite(light) => light.le(ray),
            _ => Spectrum::default(),
        }
    }
    pub fn pdf_li(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float {
        match self {
            Light::Point(light) => light.pdf_li(iref, wi),
            Light::Spot(light) => light.pdf_li(iref, wi),
            Light::DiffuseArea(light) => light.pdf_li(iref, wi),
            Light::Infinite(light) => light.pdf_li(iref, wi),
        }
    }
    /// Area radiance leaving a point on the light's surface in
    /// direction *w*; zero for everything but area lights.
    pub fn l(&self, intr: &InteractionCommon, w: &Vector3f) -> Spectrum {
        match self {
            Light::DiffuseArea(light) => light.l(intr, w),
            _ => Spectrum::default(),
        }
    }
    /// Called once the scene bounds are known; infinite lights size
    /// themselves to the scene here.
    pub fn preprocess(&self, world_bound: &Bounds3f) {
        if let Light::Infinite(light) = self {
            light.preprocess(world_bound);
        }
    }
    pub fn get_flags(&self) -> u8 {
        match self {
            Light::Point(light) => light.flags,
            Light::Spot(light) => light.flags,
            Light::DiffuseArea(light) => light.flags,
            Light::Infinite(light) => light.flags,
        }
    }
}
