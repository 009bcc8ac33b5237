// std
use std::sync::Arc;
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::memory::RegionAllocator;
use crate::core::precision::Float;
use crate::core::reflection::Bsdf;
use crate::core::spectrum::Spectrum;
use crate::core::texture::Texture;

/// Blend of two materials: both build their BSDFs (the second against
/// a copy of the scattering event, so its bump mapping stays
/// independent) and every component is scaled by the blend weight.
pub struct MixMaterial {
    pub m1: Arc<Material>,
    pub m2: Arc<Material>,
    pub scale: Arc<Texture<Spectrum>>, // default: 0.5
}

impl MixMaterial {
    pub fn new(m1: Arc<Material>, m2: Arc<Material>, scale: Arc<Texture<Spectrum>>) -> Self {
        MixMaterial { m1, m2, scale }
    }
    // Material
    pub fn compute_scattering_functions<'a>(
        &self,
        si: &mut SurfaceInteraction,
        arena: &'a RegionAllocator,
        mode: TransportMode,
        allow_multiple_lobes: bool,
        _scale_opt: Option<Spectrum>,
    ) -> &'a mut Bsdf {
        let s2: Spectrum = self
            .scale
            .evaluate(si)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let s1: Spectrum = (Spectrum::new(1.0 as Float) - s2)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let mut si2: SurfaceInteraction = si.clone();
        let bsdf1: &mut Bsdf =
            self.m1
                .compute_scattering_functions(si, arena, mode, allow_multiple_lobes, Some(s1));
        let bsdf2: &mut Bsdf = self.m2.compute_scattering_functions(
            &mut si2,
            arena,
            mode,
            allow_multiple_lobes,
            Some(s2),
        );
        for bxdf in bsdf2.bxdfs.iter() {
            bsdf1.add(bxdf.clone());
        }
        bsdf1
    }
}
