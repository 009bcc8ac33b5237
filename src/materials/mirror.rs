// std
use std::sync::Arc;
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::memory::RegionAllocator;
use crate::core::precision::Float;
use crate::core::reflection::{Bsdf, Bxdf, Fresnel, FresnelNoOp, SpecularReflection};
use crate::core::spectrum::Spectrum;
use crate::core::texture::Texture;

/// A perfect mirror: one specular reflection lobe with unit Fresnel.
pub struct MirrorMaterial {
    pub kr: Arc<Texture<Spectrum>>, // default: 0.9
    pub bump_map: Option<Arc<Texture<Float>>>,
}

impl MirrorMaterial {
    pub fn new(kr: Arc<Texture<Spectrum>>, bump_map: Option<Arc<Texture<Float>>>) -> Self {
        MirrorMaterial { kr, bump_map }
    }
    // Material
    pub fn compute_scattering_functions<'a>(
        &self,
        si: &mut SurfaceInteraction,
        arena: &'a RegionAllocator,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
        scale_opt: Option<Spectrum>,
    ) -> &'a mut Bsdf {
        if let Some(ref bump) = self.bump_map {
            Material::bump(bump, si);
        }
        let r: Spectrum = self
            .kr
            .evaluate(si)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let bsdf: &mut Bsdf = arena.alloc(Bsdf::new(si, 1.0));
        if !r.is_black() {
            bsdf.add(Bxdf::SpecRefl(SpecularReflection::new(
                r,
                Fresnel::NoOp(FresnelNoOp {}),
                scale_opt,
            )));
        }
        bsdf
    }
}
