// std
use std::sync::Arc;
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::memory::RegionAllocator;
use crate::core::precision::Float;
use crate::core::reflection::{Bsdf, Bxdf, LambertianReflection, OrenNayar};
use crate::core::spectrum::Spectrum;
use crate::core::texture::Texture;

/// Purely diffuse surface; a zero roughness deviation gives the
/// Lambertian model, anything else Oren-Nayar.
pub struct MatteMaterial {
    pub kd: Arc<Texture<Spectrum>>, // default: 0.5
    pub sigma: Arc<Texture<Float>>, // default: 0.0 (degrees)
    pub bump_map: Option<Arc<Texture<Float>>>,
}

impl MatteMaterial {
    pub fn new(
        kd: Arc<Texture<Spectrum>>,
        sigma: Arc<Texture<Float>>,
        bump_map: Option<Arc<Texture<Float>>>,
    ) -> Self {
        MatteMaterial {
            kd,
            sigma,
            bump_map,
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
        let r: Spectrum = self
            .kd
            .evaluate(si)
            .clamp(0.0 as Float, std::f32::INFINITY as Float);
        let sig: Float = crate::core::math::clamp_t(self.sigma.evaluate(si), 0.0, 90.0);
        let bsdf: &mut Bsdf = arena.alloc(Bsdf::new(si, 1.0));
        if !r.is_black() {
            if sig == 0.0 as Float {
                bsdf.add(Bxdf::LambertianRefl(LambertianReflection::new(
                    r, scale_opt,
                )));
            } else {
                bsdf.add(Bxdf::OrenNayarRefl(OrenNayar::new(r, sig, scale_opt)));
            }
        }
        bsdf
    }
}
