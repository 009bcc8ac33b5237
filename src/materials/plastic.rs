// std
use std::sync::Arc;
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::memory::RegionAllocator;
use crate::core::microfacet::{MicrofacetDistribution, TrowbridgeReitzDistribution};
use crate::core::precision::Float;
use crate::core::reflection::{
    Bsdf, Bxdf, Fresnel, FresnelDielectric, LambertianReflection, MicrofacetReflection,
};
use crate::core::spectrum::Spectrum;
use crate::core::texture::Texture;

/// Plastic is modeled as a mixture of a diffuse base and a glossy
/// dielectric coat.
pub struct PlasticMaterial {
    pub kd: Arc<Texture<Spectrum>>,     // default: 0.25
    pub ks: Arc<Texture<Spectrum>>,     // default: 0.25
    pub roughness: Arc<Texture<Float>>, // default: 0.1
    pub bump_map: Option<Arc<Texture<Float>>>,
    pub remap_roughness: bool,
}

impl PlasticMaterial {
    pub fn new(
        kd: Arc<Texture<Spectrum>>,
        ks: Arc<Texture<Spectrum>>,
        roughness: Arc<Texture<Float>>,
        bump_map: Option<Arc<Texture<Float>>>,
        remap_roughness: bool,
    ) -> Self {
        PlasticMaterial {
            kd,
            ks,
            roughness,
            bump_map,
            remap_roughness,
        }
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
        let kd: Spectrum = self
            .kd
            .evaluate(si)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let ks: Spectrum = self
            .ks
            .evaluate(si)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let mut rough: Float = self.roughness.evaluate(si);
        let bsdf: &mut Bsdf = arena.alloc(Bsdf::new(si, 1.0));
        // diffuse component
        if !kd.is_black() {
            bsdf.add(Bxdf::LambertianRefl(LambertianReflection::new(
                kd, scale_opt,
            )));
        }
        // glossy coat
        if !ks.is_black() {
            let fresnel = Fresnel::Dielectric(FresnelDielectric {
                eta_i: 1.0 as Float,
                eta_t: 1.5 as Float,
            });
            if self.remap_roughness {
                rough = TrowbridgeReitzDistribution::roughness_to_alpha(rough);
            }
            let distrib = MicrofacetDistribution::TrowbridgeReitz(
                TrowbridgeReitzDistribution::new(rough, rough),
            );
            bsdf.add(Bxdf::MicrofacetRefl(MicrofacetReflection::new(
                ks, distrib, fresnel, scale_opt,
            )));
        }
        bsdf
    }
}
