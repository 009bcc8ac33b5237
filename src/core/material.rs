//! Material dispatch and bump mapping. A material turns a surface
//! scattering event into a BSDF, allocated from the per-thread region
//! allocator so it lives exactly as long as the pixel sample.

// std
use std::sync::Arc;
// crate
use crate::core::geometry::{Normal3f, Point2f, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::memory::RegionAllocator;
use crate::core::precision::Float;
use crate::core::reflection::Bsdf;
use crate::core::spectrum::Spectrum;
use crate::core::texture::Texture;
use crate::materials::glass::GlassMaterial;
use crate::materials::matte::MatteMaterial;
use crate::materials::mirror::MirrorMaterial;
use crate::materials::mixmat::MixMaterial;
use crate::materials::plastic::PlasticMaterial;

/// Which quantity a path carries; transmission is not symmetric
/// between the two.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

pub enum Material {
    Matte(MatteMaterial),
    Plastic(PlasticMaterial),
    Glass(GlassMaterial),
    Mirror(MirrorMaterial),
    Mix(MixMaterial),
}

impl Material {
    /// Synthesise the BSDF for the given scattering event. The event
    /// is mutable because bump mapping perturbs its shading frame
    /// first.
    pub fn compute_scattering_functions<'a>(
        &self,
        si: &mut SurfaceInteraction,
        arena: &'a RegionAllocator,
        mode: TransportMode,
        allow_multiple_lobes: bool,
        scale_opt: Option<Spectrum>,
    ) -> &'a mut Bsdf {
        match self {
            Material::Matte(material) => {
                material.compute_scattering_functions(si, arena, mode, allow_multiple_lobes, scale_opt)
            }
            Material::Plastic(material) => {
                material.compute_scattering_functions(si, arena, mode, allow_multiple_lobes, scale_opt)
            }
            Material::Glass(material) => {
                material.compute_scattering_functions(si, arena, mode, allow_multiple_lobes, scale_opt)
            }
            Material::Mirror(material) => {
                material.compute_scattering_functions(si, arena, mode, allow_multiple_lobes, scale_opt)
            }
            Material::Mix(material) => {
                material.compute_scattering_functions(si, arena, mode, allow_multiple_lobes, scale_opt)
            }
        }
    }
    /// Perturb the shading frame by the gradient of a displacement
    /// texture, estimated with finite differences over the surface
    /// parameterisation.
    pub fn bump(bump_map: &Arc<Texture<Float>>, si: &mut SurfaceInteraction) {
        let mut si_eval: SurfaceInteraction = si.clone();
        // shift in the u direction, half the screen-space footprint
        let mut du: Float = 0.5 as Float * (si.dudx.abs() + si.dudy.abs());
        if du == 0.0 as Float {
            du = 0.01 as Float;
        }
        si_eval.common.p = si.common.p + si.shading.dpdu * du;
        si_eval.uv = Point2f {
            x: si.uv.x + du,
            y: si.uv.y,
        };
        let n_for_shift: Vector3f = Vector3f::from(
            crate::core::geometry::vec3_cross_vec3(&si.shading.dpdu, &si.shading.dpdv),
        ) + Vector3f::from(si.shading.dndu) * du;
        si_eval.common.n = Normal3f::from(n_for_shift).normalize();
        let u_displace: Float = bump_map.evaluate(&si_eval);
        // shift in the v direction
        let mut dv: Float = 0.5 as Float * (si.dvdx.abs() + si.dvdy.abs());
        if dv == 0.0 as Float {
            dv = 0.01 as Float;
        }
        si_eval.common.p = si.common.p + si.shading.dpdv * dv;
        si_eval.uv = Point2f {
            x: si.uv.x,
            y: si.uv.y + dv,
        };
        let n_for_shift: Vector3f = Vector3f::from(
            crate::core::geometry::vec3_cross_vec3(&si.shading.dpdu, &si.shading.dpdv),
        ) + Vector3f::from(si.shading.dndv) * dv;
        si_eval.common.n = Normal3f::from(n_for_shift).normalize();
        let v_displace: Float = bump_map.evaluate(&si_eval);
        let displace: Float = bump_map.evaluate(si);
        // displaced partial derivatives
        let dpdu: Vector3f = si.shading.dpdu
            + Vector3f::from(si.shading.n) * ((u_displace - displace) / du)
            + Vector3f::from(si.shading.dndu) * displace;
        let dpdv: Vector3f = si.shading.dpdv
            + Vector3f::from(si.shading.n) * ((v_displace - displace) / dv)
            + Vector3f::from(si.shading.dndv) * displace;
        let dndu: Normal3f = si.shading.dndu;
        let dndv: Normal3f = si.shading.dndv;
        si.set_shading_geometry(&dpdu, &dpdv, &dndu, &dndv, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{nrm_dot_nrmf, Point3f};
    use crate::textures::constant::ConstantTexture;
    use crate::textures::mix::MixTexture;

    fn plane_event() -> SurfaceInteraction {
        SurfaceInteraction::new(
            &Point3f::default(),
            &Vector3f::default(),
            Point2f { x: 0.5, y: 0.5 },
            &Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            &Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
            &Vector3f {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
            &Normal3f::default(),
            &Normal3f::default(),
            0.0,
        )
    }

    #[test]
    fn constant_displacement_keeps_the_frame() {
        let bump: Arc<Texture<Float>> =
            Arc::new(Texture::Constant(ConstantTexture::new(0.35 as Float)));
        let mut si: SurfaceInteraction = plane_event();
        let n_before: Normal3f = si.shading.n;
        Material::bump(&bump, &mut si);
        assert!((nrm_dot_nrmf(&si.shading.n, &n_before) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bump_leaves_the_geometric_normal_alone() {
        let bump: Arc<Texture<Float>> = Arc::new(Texture::Mix(MixTexture::new(
            Box::new(Texture::Constant(ConstantTexture::new(0.0 as Float))),
            Box::new(Texture::Constant(ConstantTexture::new(1.0 as Float))),
            Box::new(Texture::Constant(ConstantTexture::new(0.5 as Float))),
        )));
        let mut si: SurfaceInteraction = plane_event();
        let n_before: Normal3f = si.common.n;
        Material::bump(&bump, &mut si);
        assert_eq!(si.common.n, n_before);
    }
}
