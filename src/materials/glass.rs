// std
use std::sync::Arc;
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::memory::RegionAllocator;
use crate::core::microfacet::{MicrofacetDistribution, TrowbridgeReitzDistribution};
use crate::core::precision::Float;
use crate::core::reflection::{
    Bsdf, Bxdf, Fresnel, FresnelDielectric, FresnelSpecular, MicrofacetReflection,
    MicrofacetTransmission, SpecularReflection, SpecularTransmission,
};
use crate::core::spectrum::Spectrum;
use crate::core::texture::Texture;

/// Dielectric interface with reflection and transmission. Perfectly
/// smooth glass gets delta lobes (or the combined lobe when the
/// integrator can handle it); rough glass gets microfacet lobes.
pub struct GlassMaterial {
    pub kr: Arc<Texture<Spectrum>>,          // default: 1.0
    pub kt: Arc<Texture<Spectrum>>,          // default: 1.0
    pub u_roughness: Arc<Texture<Float>>,    // default: 0.0
    pub v_roughness: Arc<Texture<Float>>,    // default: 0.0
    pub index: Arc<Texture<Float>>,          // default: 1.5
    pub bump_map: Option<Arc<Texture<Float>>>,
    pub remap_roughness: bool,
}

impl GlassMaterial {
    pub fn new(
        kr: Arc<Texture<Spectrum>>,
        kt: Arc<Texture<Spectrum>>,
        u_roughness: Arc<Texture<Float>>,
        v_roughness: Arc<Texture<Float>>,
        index: Arc<Texture<Float>>,
        bump_map: Option<Arc<Texture<Float>>>,
        remap_roughness: bool,
    ) -> Self {
        GlassMaterial {
            kr,
            kt,
            u_roughness,
            v_roughness,
            index,
            bump_map,
            remap_roughness,
        }
    }
    // Material
    pub fn compute_scattering_functions<'a>(
        &self,
        si: &mut SurfaceInteraction,
        arena: &'a RegionAllocator,
        mode: TransportMode,
        allow_multiple_lobes: bool,
        scale_opt: Option<Spectrum>,
    ) -> &'a mut Bsdf {
        if let Some(ref bump) = self.bump_map {
            Material::bump(bump, si);
        }
        let eta: Float = self.index.evaluate(si);
        let mut u_rough: Float = self.u_roughness.evaluate(si);
        let mut v_rough: Float = self.v_roughness.evaluate(si);
        let r: Spectrum = self
            .kr
            .evaluate(si)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let t: Spectrum = self
            .kt
            .evaluate(si)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let bsdf: &mut Bsdf = arena.alloc(Bsdf::new(si, eta));
        if r.is_black() && t.is_black() {
            return bsdf;
        }
        let is_specular: bool = u_rough == 0.0 as Float && v_rough == 0.0 as Float;
        if is_specular && allow_multiple_lobes {
            bsdf.add(Bxdf::FresnelSpec(FresnelSpecular::new(
                r, t, 1.0, eta, mode, scale_opt,
            )));
        } else {
            if self.remap_roughness {
                u_rough = TrowbridgeReitzDistribution::roughness_to_alpha(u_rough);
                v_rough = TrowbridgeReitzDistribution::roughness_to_alpha(v_rough);
            }
            if is_specular {
                if !r.is_black() {
                    let fresnel = Fresnel::Dielectric(FresnelDielectric {
                        eta_i: 1.0 as Float,
                        eta_t: eta,
                    });
                    bsdf.add(Bxdf::SpecRefl(SpecularReflection::new(
                        r, fresnel, scale_opt,
                    )));
                }
                if !t.is_black() {
                    bsdf.add(Bxdf::SpecTrans(SpecularTransmission::new(
                        t, 1.0, eta, mode, scale_opt,
                    )));
                }
            } else {
                let distrib = MicrofacetDistribution::TrowbridgeReitz(
                    TrowbridgeReitzDistribution::new(u_rough, v_rough),
                );
                if !r.is_black() {
                    let fresnel = Fresnel::Dielectric(FresnelDielectric {
                        eta_i: 1.0 as Float,
                        eta_t: eta,
                    });
                    bsdf.add(Bxdf::MicrofacetRefl(MicrofacetReflection::new(
                        r, distrib, fresnel, scale_opt,
                    )));
                }
                if !t.is_black() {
                    bsdf.add(Bxdf::MicrofacetTrans(MicrofacetTransmission::new(
                        t, distrib, 1.0, eta, mode, scale_opt,
                    )));
                }
            }
        }
        bsdf
    }
}
