//! When light is incident on a surface it is scattered back into the
//! environment. The BXDFs in this module describe the directional
//! distribution of that scattering in a local frame whose z axis is
//! the shading normal; the BSDF aggregate multiplexes up to eight of
//! them with importance sampling.

// std
use std::f32::consts::PI;
// others
use smallvec::SmallVec;
// crate
use crate::core::geometry::{
    nrm_cross_vec3, nrm_dot_vec3f, nrm_faceforward_vec3, vec3_abs_dot_vec3f, vec3_dot_nrmf,
    vec3_dot_vec3f, Normal3f, Point2f, Vector3f, XYEnum,
};
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::TransportMode;
use crate::core::math::{clamp_t, INV_PI};
use crate::core::microfacet::MicrofacetDistribution;
use crate::core::precision::Float;
use crate::core::rng::FLOAT_ONE_MINUS_EPSILON;
use crate::core::sampling::{
    cosine_sample_hemisphere, uniform_hemisphere_pdf, uniform_sample_hemisphere,
};
use crate::core::spectrum::Spectrum;

pub const MAX_BXDFS: u8 = 8_u8;

#[repr(u8)]
pub enum BxdfType {
    BsdfReflection = 1,
    BsdfTransmission = 2,
    BsdfDiffuse = 4,
    BsdfGlossy = 8,
    BsdfSpecular = 16,
    BsdfAll = 31,
}

/// The surface response at one scattering event: a shading frame plus
/// the component scattering functions. Lives only inside a region
/// allocator, so it is never dropped individually.
pub struct Bsdf {
    /// relative refractive index of the outside medium
    pub eta: Float,
    /// shading normal
    pub ns: Normal3f,
    /// geometric normal
    pub ng: Normal3f,
    pub ss: Vector3f,
    pub ts: Vector3f,
    pub bxdfs: SmallVec<[Bxdf; 8]>,
}

impl Bsdf {
    pub fn new(si: &SurfaceInteraction, eta: Float) -> Self {
        let ss: Vector3f = si.shading.dpdu.normalize();
        Bsdf {
            eta,
            ns: si.shading.n,
            ng: si.common.n,
            ss,
            ts: nrm_cross_vec3(&si.shading.n, &ss),
            bxdfs: SmallVec::new(),
        }
    }
    pub fn add(&mut self, b: Bxdf) {
        assert!(self.bxdfs.len() < MAX_BXDFS as usize);
        self.bxdfs.push(b);
    }
    pub fn num_components(&self, flags: u8) -> u8 {
        let mut num: u8 = 0;
        for b in self.bxdfs.iter() {
            if b.matches_flags(flags) {
                num += 1;
            }
        }
        num
    }
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: vec3_dot_vec3f(v, &self.ss),
            y: vec3_dot_vec3f(v, &self.ts),
            z: vec3_dot_vec3f(v, &Vector3f::from(self.ns)),
        }
    }
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            y: self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            z: self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        }
    }
    /// Evaluate all matching components. Whether a component may
    /// contribute is decided against the geometric normal, so light
    /// leaks across the shading/geometric disagreement are avoided.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: u8) -> Spectrum {
        let wi: Vector3f = self.world_to_local(wi_w);
        let wo: Vector3f = self.world_to_local(wo_w);
        if wo.z == 0.0 as Float {
            return Spectrum::new(0.0 as Float);
        }
        let reflect: bool = (vec3_dot_nrmf(wi_w, &self.ng) * vec3_dot_nrmf(wo_w, &self.ng))
            > 0.0 as Float;
        let mut f: Spectrum = Spectrum::new(0.0 as Float);
        for b in self.bxdfs.iter() {
            if b.matches_flags(flags)
                && ((reflect && (b.get_type() & BxdfType::BsdfReflection as u8 > 0_u8))
                    || (!reflect && (b.get_type() & BxdfType::BsdfTransmission as u8 > 0_u8)))
            {
                f += b.f(&wo, &wi);
            }
        }
        f
    }
    /// Pick one matching component uniformly, sample it, then fold in
    /// the other matching components' values and densities (unless
    /// the chosen lobe is specular).
    pub fn sample_f(
        &self,
        wo_world: &Vector3f,
        wi_world: &mut Vector3f,
        u: &Point2f,
        pdf: &mut Float,
        bsdf_flags: u8,
        sampled_type: &mut u8,
    ) -> Spectrum {
        let matching_comps: u8 = self.num_components(bsdf_flags);
        if matching_comps == 0 {
            *pdf = 0.0 as Float;
            *sampled_type = 0_u8;
            return Spectrum::default();
        }
        let comp: u8 = std::cmp::min(
            (u[XYEnum::X] * matching_comps as Float).floor() as u8,
            matching_comps - 1_u8,
        );
        // find the chosen component by counting matches
        let mut bxdf: Option<&Bxdf> = None;
        let mut count: i8 = comp as i8;
        let mut bxdf_index: usize = 0_usize;
        for (i, b) in self.bxdfs.iter().enumerate() {
            let matches: bool = b.matches_flags(bsdf_flags);
            if matches && count == 0 {
                bxdf = Some(b);
                bxdf_index = i;
                break;
            } else if matches {
                count -= 1_i8;
            }
        }
        let bxdf: &Bxdf = match bxdf {
            Some(b) => b,
            None => return Spectrum::default(),
        };
        // remap the component-selection sample back to [0,1)
        let u_remapped: Point2f = Point2f {
            x: (u[XYEnum::X] * matching_comps as Float - comp as Float)
                .min(FLOAT_ONE_MINUS_EPSILON),
            y: u[XYEnum::Y],
        };
        let mut wi: Vector3f = Vector3f::default();
        let wo: Vector3f = self.world_to_local(wo_world);
        if wo.z == 0.0 as Float {
            return Spectrum::default();
        }
        *pdf = 0.0 as Float;
        if *sampled_type != 0_u8 {
            *sampled_type = bxdf.get_type();
        }
        let mut f: Spectrum = bxdf.sample_f(&wo, &mut wi, &u_remapped, pdf, sampled_type);
        if *pdf == 0.0 as Float {
            if *sampled_type != 0_u8 {
                *sampled_type = 0_u8;
            }
            return Spectrum::default();
        }
        *wi_world = self.local_to_world(&wi);
        // average in the pdfs of all other matching components
        if (bxdf.get_type() & BxdfType::BsdfSpecular as u8 == 0_u8) && matching_comps > 1_u8 {
            for (i, b) in self.bxdfs.iter().enumerate() {
                if bxdf_index != i && b.matches_flags(bsdf_flags) {
                    *pdf += b.pdf(&wo, &wi);
                }
            }
        }
        if matching_comps > 1_u8 {
            *pdf /= matching_comps as Float;
        }
        // sum the value over all matching components on the right side
        if bxdf.get_type() & BxdfType::BsdfSpecular as u8 == 0_u8 {
            let reflect: bool = vec3_dot_nrmf(&*wi_world, &self.ng)
                * vec3_dot_nrmf(wo_world, &self.ng)
                > 0.0 as Float;
            f = Spectrum::default();
            for b in self.bxdfs.iter() {
                if b.matches_flags(bsdf_flags)
                    && ((reflect && ((b.get_type() & BxdfType::BsdfReflection as u8) != 0_u8))
                        || (!reflect
                            && ((b.get_type() & BxdfType::BsdfTransmission as u8) != 0_u8)))
                {
                    f += b.f(&wo, &wi);
                }
            }
        }
        f
    }
    pub fn pdf(&self, wo_world: &Vector3f, wi_world: &Vector3f, bsdf_flags: u8) -> Float {
        if self.bxdfs.is_empty() {
            return 0.0 as Float;
        }
        let wo: Vector3f = self.world_to_local(wo_world);
        let wi: Vector3f = self.world_to_local(wi_world);
        if wo.z == 0.0 as Float {
            return 0.0 as Float;
        }
        let mut pdf: Float = 0.0 as Float;
        let mut matching_comps: u8 = 0;
        for b in self.bxdfs.iter() {
            if b.matches_flags(bsdf_flags) {
                matching_comps += 1;
                pdf += b.pdf(&wo, &wi);
            }
        }
        if matching_comps > 0 {
            pdf / matching_comps as Float
        } else {
            0.0 as Float
        }
    }
}

#[derive(Clone)]
pub enum Bxdf {
    SpecRefl(SpecularReflection),
    SpecTrans(SpecularTransmission),
    FresnelSpec(FresnelSpecular),
    LambertianRefl(LambertianReflection),
    LambertianTrans(LambertianTransmission),
    OrenNayarRefl(OrenNayar),
    MicrofacetRefl(MicrofacetReflection),
    MicrofacetTrans(MicrofacetTransmission),
}

impl Bxdf {
    pub fn matches_flags(&self, t: u8) -> bool {
        self.get_type() & t == self.get_type()
    }
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            Bxdf::SpecRefl(bxdf) => bxdf.f(wo, wi),
            Bxdf::SpecTrans(bxdf) => bxdf.f(wo, wi),
            Bxdf::FresnelSpec(bxdf) => bxdf.f(wo, wi),
            Bxdf::LambertianRefl(bxdf) => bxdf.f(wo, wi),
            Bxdf::LambertianTrans(bxdf) => bxdf.f(wo, wi),
            Bxdf::OrenNayarRefl(bxdf) => bxdf.f(wo, wi),
            Bxdf::MicrofacetRefl(bxdf) => bxdf.f(wo, wi),
            Bxdf::MicrofacetTrans(bxdf) => bxdf.f(wo, wi),
        }
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        u: &Point2f,
        pdf: &mut Float,
        sampled_type: &mut u8,
    ) -> Spectrum {
        match self {
            Bxdf::SpecRefl(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
            Bxdf::SpecTrans(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
            Bxdf::FresnelSpec(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
            Bxdf::LambertianRefl(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
            Bxdf::LambertianTrans(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
            Bxdf::OrenNayarRefl(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
            Bxdf::MicrofacetRefl(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
            Bxdf::MicrofacetTrans(bxdf) => bxdf.sample_f(wo, wi, u, pdf, sampled_type),
        }
    }
    /// The density `sample_f` draws from; the default for diffuse and
    /// glossy lobes is the cosine-weighted hemisphere.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Bxdf::SpecRefl(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::SpecTrans(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::FresnelSpec(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::LambertianRefl(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::LambertianTrans(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::OrenNayarRefl(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::MicrofacetRefl(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::MicrofacetTrans(bxdf) => bxdf.pdf(wo, wi),
        }
    }
    pub fn get_type(&self) -> u8 {
        match self {
            Bxdf::SpecRefl(bxdf) => bxdf.get_type(),
            Bxdf::SpecTrans(bxdf) => bxdf.get_type(),
            Bxdf::FresnelSpec(bxdf) => bxdf.get_type(),
            Bxdf::LambertianRefl(bxdf) => bxdf.get_type(),
            Bxdf::LambertianTrans(bxdf) => bxdf.get_type(),
            Bxdf::OrenNayarRefl(bxdf) => bxdf.get_type(),
            Bxdf::MicrofacetRefl(bxdf) => bxdf.get_type(),
            Bxdf::MicrofacetTrans(bxdf) => bxdf.get_type(),
        }
    }
    /// Hemispherical-directional reflectance. Lambertian lobes have a
    /// closed form; everything else falls back to a Monte Carlo
    /// estimate over the provided stratified samples.
    pub fn rho_hd(&self, wo: &Vector3f, samples: &[Point2f]) -> Spectrum {
        match self {
            Bxdf::LambertianRefl(bxdf) => bxdf.scaled(bxdf.r),
            Bxdf::LambertianTrans(bxdf) => bxdf.scaled(bxdf.t),
            _ => {
                let mut r: Spectrum = Spectrum::default();
                for u in samples.iter() {
                    let mut wi: Vector3f = Vector3f::default();
                    let mut pdf: Float = 0.0 as Float;
                    let mut sampled_type: u8 = 0_u8;
                    let f: Spectrum = self.sample_f(wo, &mut wi, u, &mut pdf, &mut sampled_type);
                    if pdf > 0.0 as Float {
                        r += f * abs_cos_theta(&wi) / pdf;
                    }
                }
                r / samples.len() as Float
            }
        }
    }
    /// Hemispherical-hemispherical reflectance; both incident and
    /// outgoing directions are integrated.
    pub fn rho_hh(&self, samples1: &[Point2f], samples2: &[Point2f]) -> Spectrum {
        assert_eq!(samples1.len(), samples2.len());
        match self {
            Bxdf::LambertianRefl(bxdf) => bxdf.scaled(bxdf.r),
            Bxdf::LambertianTrans(bxdf) => bxdf.scaled(bxdf.t),
            _ => {
                let mut r: Spectrum = Spectrum::default();
                for (u1, u2) in samples1.iter().zip(samples2.iter()) {
                    let wo: Vector3f = uniform_sample_hemisphere(u1);
                    let pdf_o: Float = uniform_hemisphere_pdf();
                    let mut wi: Vector3f = Vector3f::default();
                    let mut pdf_i: Float = 0.0 as Float;
                    let mut sampled_type: u8 = 0_u8;
                    let f: Spectrum =
                        self.sample_f(&wo, &mut wi, u2, &mut pdf_i, &mut sampled_type);
                    if pdf_i > 0.0 as Float {
                        r += f * abs_cos_theta(&wi) * abs_cos_theta(&wo) / (pdf_o * pdf_i);
                    }
                }
                r / (PI as Float * samples1.len() as Float)
            }
        }
    }
}

#[derive(Copy, Clone)]
pub enum Fresnel {
    /// perfect reflector: unity for every angle
    NoOp(FresnelNoOp),
    Conductor(FresnelConductor),
    Dielectric(FresnelDielectric),
}

impl Fresnel {
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        match self {
            Fresnel::NoOp(fresnel) => fresnel.evaluate(cos_theta_i),
            Fresnel::Conductor(fresnel) => fresnel.evaluate(cos_theta_i),
            Fresnel::Dielectric(fresnel) => fresnel.evaluate(cos_theta_i),
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct FresnelNoOp {}

impl FresnelNoOp {
    pub fn evaluate(&self, _cos_theta_i: Float) -> Spectrum {
        Spectrum::new(1.0 as Float)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct FresnelConductor {
    pub eta_i: Spectrum,
    pub eta_t: Spectrum,
    pub k: Spectrum,
}

impl FresnelConductor {
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        fr_conductor(cos_theta_i.abs(), self.eta_i, self.eta_t, self.k)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct FresnelDielectric {
    pub eta_i: Float,
    pub eta_t: Float,
}

impl FresnelDielectric {
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        Spectrum::new(fr_dielectric(cos_theta_i, self.eta_i, self.eta_t))
    }
}

#[derive(Copy, Clone)]
pub struct SpecularReflection {
    pub r: Spectrum,
    pub fresnel: Fresnel,
    pub sc_opt: Option<Spectrum>,
}

impl SpecularReflection {
    pub fn new(r: Spectrum, fresnel: Fresnel, sc_opt: Option<Spectrum>) -> Self {
        SpecularReflection { r, fresnel, sc_opt }
    }
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::new(0.0 as Float)
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        _sample: &Point2f,
        pdf: &mut Float,
        _sampled_type: &mut u8,
    ) -> Spectrum {
        // the mirror direction, with probability one
        *wi = Vector3f {
            x: -wo.x,
            y: -wo.y,
            z: wo.z,
        };
        *pdf = 1.0 as Float;
        let cos_theta_i: Float = cos_theta(&*wi);
        let f: Spectrum = self.fresnel.evaluate(cos_theta_i) * self.r / abs_cos_theta(&*wi);
        if let Some(sc) = self.sc_opt {
            sc * f
        } else {
            f
        }
    }
    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0 as Float
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfReflection as u8 | BxdfType::BsdfSpecular as u8
    }
}

#[derive(Copy, Clone)]
pub struct SpecularTransmission {
    pub t: Spectrum,
    pub eta_a: Float,
    pub eta_b: Float,
    pub fresnel: FresnelDielectric,
    pub mode: TransportMode,
    pub sc_opt: Option<Spectrum>,
}

impl SpecularTransmission {
    pub fn new(
        t: Spectrum,
        eta_a: Float,
        eta_b: Float,
        mode: TransportMode,
        sc_opt: Option<Spectrum>,
    ) -> Self {
        SpecularTransmission {
            t,
            eta_a,
            eta_b,
            fresnel: FresnelDielectric {
                eta_i: eta_a,
                eta_t: eta_b,
            },
            mode,
            sc_opt,
        }
    }
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::new(0.0 as Float)
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        _sample: &Point2f,
        pdf: &mut Float,
        _sampled_type: &mut u8,
    ) -> Spectrum {
        // which side of the interface are we entering from?
        let entering: bool = cos_theta(wo) > 0.0 as Float;
        let eta_i: Float = if entering { self.eta_a } else { self.eta_b };
        let eta_t: Float = if entering { self.eta_b } else { self.eta_a };
        if !refract(
            wo,
            &nrm_faceforward_vec3(
                &Normal3f {
                    x: 0.0,
                    y: 0.0,
                    z: 1.0,
                },
                wo,
            ),
            eta_i / eta_t,
            wi,
        ) {
            // total internal reflection
            return Spectrum::default();
        }
        *pdf = 1.0 as Float;
        let mut ft: Spectrum =
            self.t * (Spectrum::new(1.0 as Float) - self.fresnel.evaluate(cos_theta(&*wi)));
        // non-symmetric scattering under radiance transport
        if self.mode == TransportMode::Radiance {
            ft *= Spectrum::new((eta_i * eta_i) / (eta_t * eta_t));
        }
        let f: Spectrum = ft / abs_cos_theta(&*wi);
        if let Some(sc) = self.sc_opt {
            sc * f
        } else {
            f
        }
    }
    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0 as Float
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfTransmission as u8 | BxdfType::BsdfSpecular as u8
    }
}

/// Specular reflection and transmission combined; the Fresnel
/// reflectance decides which one a sample takes.
#[derive(Copy, Clone)]
pub struct FresnelSpecular {
    pub r: Spectrum,
    pub t: Spectrum,
    pub eta_a: Float,
    pub eta_b: Float,
    pub mode: TransportMode,
    pub sc_opt: Option<Spectrum>,
}

impl FresnelSpecular {
    pub fn new(
        r: Spectrum,
        t: Spectrum,
        eta_a: Float,
        eta_b: Float,
        mode: TransportMode,
        sc_opt: Option<Spectrum>,
    ) -> Self {
        FresnelSpecular {
            r,
            t,
            eta_a,
            eta_b,
            mode,
            sc_opt,
        }
    }
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::new(0.0 as Float)
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        sample: &Point2f,
        pdf: &mut Float,
        sampled_type: &mut u8,
    ) -> Spectrum {
        let f: Float = fr_dielectric(cos_theta(wo), self.eta_a, self.eta_b);
        if sample[XYEnum::X] < f {
            // reflect with probability F
            *wi = Vector3f {
                x: -wo.x,
                y: -wo.y,
                z: wo.z,
            };
            if *sampled_type != 0_u8 {
                *sampled_type = BxdfType::BsdfReflection as u8 | BxdfType::BsdfSpecular as u8;
            }
            *pdf = f;
            let result: Spectrum = self.r * f / abs_cos_theta(&*wi);
            if let Some(sc) = self.sc_opt {
                sc * result
            } else {
                result
            }
        } else {
            // transmit with probability 1 - F
            let entering: bool = cos_theta(wo) > 0.0 as Float;
            let eta_i: Float = if entering { self.eta_a } else { self.eta_b };
            let eta_t: Float = if entering { self.eta_b } else { self.eta_a };
            if !refract(
                wo,
                &nrm_faceforward_vec3(
                    &Normal3f {
                        x: 0.0,
                        y: 0.0,
                        z: 1.0,
                    },
                    wo,
                ),
                eta_i / eta_t,
                wi,
            ) {
                return Spectrum::default();
            }
            let mut ft: Spectrum = self.t * (1.0 as Float - f);
            if self.mode == TransportMode::Radiance {
                ft *= Spectrum::new((eta_i * eta_i) / (eta_t * eta_t));
            }
            if *sampled_type != 0_u8 {
                *sampled_type = BxdfType::BsdfTransmission as u8 | BxdfType::BsdfSpecular as u8;
            }
            *pdf = 1.0 as Float - f;
            let result: Spectrum = ft / abs_cos_theta(&*wi);
            if let Some(sc) = self.sc_opt {
                sc * result
            } else {
                result
            }
        }
    }
    pub fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f) -> Float {
        0.0 as Float
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfReflection as u8
            | BxdfType::BsdfTransmission as u8
            | BxdfType::BsdfSpecular as u8
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct LambertianReflection {
    pub r: Spectrum,
    pub sc_opt: Option<Spectrum>,
}

impl LambertianReflection {
    pub fn new(r: Spectrum, sc_opt: Option<Spectrum>) -> Self {
        LambertianReflection { r, sc_opt }
    }
    fn scaled(&self, s: Spectrum) -> Spectrum {
        if let Some(sc) = self.sc_opt {
            sc * s
        } else {
            s
        }
    }
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        self.scaled(self.r * Spectrum::new(INV_PI))
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        u: &Point2f,
        pdf: &mut Float,
        _sampled_type: &mut u8,
    ) -> Spectrum {
        *wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 as Float {
            wi.z *= -1.0 as Float;
        }
        *pdf = self.pdf(wo, &*wi);
        self.f(wo, &*wi)
    }
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if vec3_same_hemisphere_vec3(wo, wi) {
            abs_cos_theta(wi) * INV_PI
        } else {
            0.0 as Float
        }
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct LambertianTransmission {
    pub t: Spectrum,
    pub sc_opt: Option<Spectrum>,
}

impl LambertianTransmission {
    pub fn new(t: Spectrum, sc_opt: Option<Spectrum>) -> Self {
        LambertianTransmission { t, sc_opt }
    }
    fn scaled(&self, s: Spectrum) -> Spectrum {
        if let Some(sc) = self.sc_opt {
            sc * s
        } else {
            s
        }
    }
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        self.scaled(self.t * INV_PI)
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        u: &Point2f,
        pdf: &mut Float,
        _sampled_type: &mut u8,
    ) -> Spectrum {
        // transmission samples the opposite hemisphere
        *wi = cosine_sample_hemisphere(u);
        if wo.z > 0.0 as Float {
            wi.z *= -1.0 as Float;
        }
        *pdf = self.pdf(wo, &*wi);
        self.f(wo, &*wi)
    }
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !vec3_same_hemisphere_vec3(wo, wi) {
            abs_cos_theta(wi) * INV_PI
        } else {
            0.0 as Float
        }
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfTransmission as u8
    }
}

#[derive(Copy, Clone)]
pub struct OrenNayar {
    pub r: Spectrum,
    pub a: Float,
    pub b: Float,
    pub sc_opt: Option<Spectrum>,
}

impl OrenNayar {
    /// *sigma* is the surface roughness standard deviation in degrees.
    pub fn new(r: Spectrum, sigma: Float, sc_opt: Option<Spectrum>) -> Self {
        let sigma: Float = crate::core::math::radians(sigma);
        let sigma2: Float = sigma * sigma;
        OrenNayar {
            r,
            a: 1.0 - (sigma2 / (2.0 * (sigma2 + 0.33))),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
            sc_opt,
        }
    }
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let sin_theta_i: Float = sin_theta(wi);
        let sin_theta_o: Float = sin_theta(wo);
        // cosine of the azimuth difference, clamped to positive
        let max_cos: Float = if sin_theta_i > 1.0e-4 && sin_theta_o > 1.0e-4 {
            let sin_phi_i: Float = sin_phi(wi);
            let cos_phi_i: Float = cos_phi(wi);
            let sin_phi_o: Float = sin_phi(wo);
            let cos_phi_o: Float = cos_phi(wo);
            let d_cos: Float = cos_phi_i * cos_phi_o + sin_phi_i * sin_phi_o;
            d_cos.max(0.0 as Float)
        } else {
            0.0 as Float
        };
        // alpha is the larger of the two zenith angles, beta the smaller
        let sin_alpha: Float;
        let tan_beta: Float = if abs_cos_theta(wi) > abs_cos_theta(wo) {
            sin_alpha = sin_theta_o;
            sin_theta_i / abs_cos_theta(wi)
        } else {
            sin_alpha = sin_theta_i;
            sin_theta_o / abs_cos_theta(wo)
        };
        let f: Spectrum = self.r
            * Spectrum::new(INV_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta));
        if let Some(sc) = self.sc_opt {
            sc * f
        } else {
            f
        }
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        u: &Point2f,
        pdf: &mut Float,
        _sampled_type: &mut u8,
    ) -> Spectrum {
        *wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 as Float {
            wi.z *= -1.0 as Float;
        }
        *pdf = self.pdf(wo, &*wi);
        self.f(wo, &*wi)
    }
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if vec3_same_hemisphere_vec3(wo, wi) {
            abs_cos_theta(wi) * INV_PI
        } else {
            0.0 as Float
        }
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8
    }
}

#[derive(Copy, Clone)]
pub struct MicrofacetReflection {
    pub r: Spectrum,
    pub distribution: MicrofacetDistribution,
    pub fresnel: Fresnel,
    pub sc_opt: Option<Spectrum>,
}

impl MicrofacetReflection {
    pub fn new(
        r: Spectrum,
        distribution: MicrofacetDistribution,
        fresnel: Fresnel,
        sc_opt: Option<Spectrum>,
    ) -> Self {
        MicrofacetReflection {
            r,
            distribution,
            fresnel,
            sc_opt,
        }
    }
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let cos_theta_o: Float = abs_cos_theta(wo);
        let cos_theta_i: Float = abs_cos_theta(wi);
        let mut wh: Vector3f = *wi + *wo;
        // degenerate directions carry no energy
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 {
            return Spectrum::new(0.0);
        }
        if wh.x == 0.0 && wh.y == 0.0 && wh.z == 0.0 {
            return Spectrum::new(0.0);
        }
        wh = wh.normalize();
        let dot: Float = vec3_dot_vec3f(wi, &wh);
        let fr: Spectrum = self.fresnel.evaluate(dot);
        let f: Spectrum = self.r * self.distribution.d(&wh) * self.distribution.g(wo, wi) * fr
            / (4.0 as Float * cos_theta_i * cos_theta_o);
        if let Some(sc) = self.sc_opt {
            sc * f
        } else {
            f
        }
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        u: &Point2f,
        pdf: &mut Float,
        _sampled_type: &mut u8,
    ) -> Spectrum {
        // sample a microfacet orientation, reflect about it
        if wo.z == 0.0 as Float {
            return Spectrum::default();
        }
        let wh: Vector3f = self.distribution.sample_wh(wo, u);
        *wi = reflect(wo, &wh);
        if !vec3_same_hemisphere_vec3(wo, &*wi) {
            return Spectrum::default();
        }
        *pdf = self.distribution.pdf(wo, &wh) / (4.0 * vec3_dot_vec3f(wo, &wh));
        self.f(wo, &*wi)
    }
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !vec3_same_hemisphere_vec3(wo, wi) {
            return 0.0 as Float;
        }
        let wh: Vector3f = (*wo + *wi).normalize();
        self.distribution.pdf(wo, &wh) / (4.0 * vec3_dot_vec3f(wo, &wh))
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfReflection as u8 | BxdfType::BsdfGlossy as u8
    }
}

#[derive(Copy, Clone)]
pub struct MicrofacetTransmission {
    pub t: Spectrum,
    pub distribution: MicrofacetDistribution,
    pub eta_a: Float,
    pub eta_b: Float,
    pub fresnel: FresnelDielectric,
    pub mode: TransportMode,
    pub sc_opt: Option<Spectrum>,
}

impl MicrofacetTransmission {
    pub fn new(
        t: Spectrum,
        distribution: MicrofacetDistribution,
        eta_a: Float,
        eta_b: Float,
        mode: TransportMode,
        sc_opt: Option<Spectrum>,
    ) -> Self {
        MicrofacetTransmission {
            t,
            distribution,
            eta_a,
            eta_b,
            fresnel: FresnelDielectric {
                eta_i: eta_a,
                eta_t: eta_b,
            },
            mode,
            sc_opt,
        }
    }
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if vec3_same_hemisphere_vec3(wo, wi) {
            // transmission only
            return Spectrum::default();
        }
        let cos_theta_o: Float = cos_theta(wo);
        let cos_theta_i: Float = cos_theta(wi);
        if cos_theta_o == 0.0 || cos_theta_i == 0.0 {
            return Spectrum::default();
        }
        let eta: Float = if cos_theta_o > 0.0 {
            self.eta_b / self.eta_a
        } else {
            self.eta_a / self.eta_b
        };
        let mut wh: Vector3f = (*wo + *wi * eta).normalize();
        if wh.z < 0.0 {
            wh = -wh;
        }
        if vec3_dot_vec3f(wo, &wh) * vec3_dot_vec3f(wi, &wh) > 0.0 as Float {
            return Spectrum::default();
        }
        let fr: Spectrum = self.fresnel.evaluate(vec3_dot_vec3f(wo, &wh));
        let sqrt_denom: Float = vec3_dot_vec3f(wo, &wh) + eta * vec3_dot_vec3f(wi, &wh);
        let factor: Float = match self.mode {
            TransportMode::Radiance => 1.0 / eta,
            _ => 1.0,
        };
        let f: Spectrum = (Spectrum::new(1.0) - fr)
            * self.t
            * Float::abs(
                self.distribution.d(&wh)
                    * self.distribution.g(wo, wi)
                    * eta
                    * eta
                    * vec3_abs_dot_vec3f(wi, &wh)
                    * vec3_abs_dot_vec3f(wo, &wh)
                    * factor
                    * factor
                    / (cos_theta_i * cos_theta_o * sqrt_denom * sqrt_denom),
            );
        if let Some(sc) = self.sc_opt {
            sc * f
        } else {
            f
        }
    }
    pub fn sample_f(
        &self,
        wo: &Vector3f,
        wi: &mut Vector3f,
        u: &Point2f,
        pdf: &mut Float,
        _sampled_type: &mut u8,
    ) -> Spectrum {
        if wo.z == 0.0 {
            return Spectrum::default();
        }
        let wh: Vector3f = self.distribution.sample_wh(wo, u);
        let eta: Float = if cos_theta(wo) > 0.0 {
            self.eta_a / self.eta_b
        } else {
            self.eta_b / self.eta_a
        };
        if refract(wo, &Normal3f::from(wh), eta, wi) {
            *pdf = self.pdf(wo, wi);
            self.f(wo, wi)
        } else {
            Spectrum::default()
        }
    }
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if vec3_same_hemisphere_vec3(wo, wi) {
            return 0.0;
        }
        let eta: Float = if cos_theta(wo) > 0.0 {
            self.eta_b / self.eta_a
        } else {
            self.eta_a / self.eta_b
        };
        let wh: Vector3f = (*wo + *wi * eta).normalize();
        let wo_dot_wh: Float = vec3_dot_vec3f(wo, &wh);
        let wi_dot_wh: Float = vec3_dot_vec3f(wi, &wh);
        if wo_dot_wh * wi_dot_wh > 0.0 as Float {
            return 0.0 as Float;
        }
        // Jacobian of the half-vector mapping for refraction
        let sqrt_denom: Float = wo_dot_wh + eta * wi_dot_wh;
        let dwh_dwi: Float = ((eta * eta * wi_dot_wh) / (sqrt_denom * sqrt_denom)).abs();
        self.distribution.pdf(wo, &wh) * dwh_dwi
    }
    pub fn get_type(&self) -> u8 {
        BxdfType::BsdfTransmission as u8 | BxdfType::BsdfGlossy as u8
    }
}

/// Shading-frame cosine: the z component.
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

pub fn sin_2_theta(w: &Vector3f) -> Float {
    (0.0 as Float).max(1.0 as Float - cos_2_theta(w))
}

pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

pub fn tan_theta(w: &Vector3f) -> Float {
    sin_theta(w) / cos_theta(w)
}

pub fn tan_2_theta(w: &Vector3f) -> Float {
    sin_2_theta(w) / cos_2_theta(w)
}

/// Azimuth cosine; defined as 1 when the direction is vertical.
pub fn cos_phi(w: &Vector3f) -> Float {
    let sin_theta: Float = sin_theta(w);
    if sin_theta == 0.0 as Float {
        1.0 as Float
    } else {
        clamp_t(w.x / sin_theta, -1.0, 1.0)
    }
}

pub fn sin_phi(w: &Vector3f) -> Float {
    let sin_theta: Float = sin_theta(w);
    if sin_theta == 0.0 as Float {
        0.0 as Float
    } else {
        clamp_t(w.y / sin_theta, -1.0, 1.0)
    }
}

pub fn cos_2_phi(w: &Vector3f) -> Float {
    cos_phi(w) * cos_phi(w)
}

pub fn sin_2_phi(w: &Vector3f) -> Float {
    sin_phi(w) * sin_phi(w)
}

/// Mirror *wo* about the (local) normal *n*.
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -(*wo) + *n * 2.0 as Float * vec3_dot_vec3f(wo, n)
}

/// Refraction through a surface with relative index *eta*; returns
/// false on total internal reflection.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float, wt: &mut Vector3f) -> bool {
    let cos_theta_i: Float = nrm_dot_vec3f(n, wi);
    let sin2_theta_i: Float = (0.0 as Float).max(1.0 as Float - cos_theta_i * cos_theta_i);
    let sin2_theta_t: Float = eta * eta * sin2_theta_i;
    if sin2_theta_t >= 1.0 as Float {
        return false;
    }
    let cos_theta_t: Float = (1.0 as Float - sin2_theta_t).sqrt();
    *wt = -(*wi) * eta + Vector3f::from(*n) * (eta * cos_theta_i - cos_theta_t);
    true
}

/// Both directions on the same side of the surface.
pub fn vec3_same_hemisphere_vec3(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0 as Float
}

/// Fresnel reflectance of a dielectric interface for unpolarised
/// light; indices swap when the incident direction is inside.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp_t(cos_theta_i, -1.0, 1.0);
    let entering: bool = cos_theta_i > 0.0;
    let mut local_eta_i = eta_i;
    let mut local_eta_t = eta_t;
    if !entering {
        std::mem::swap(&mut local_eta_i, &mut local_eta_t);
        cos_theta_i = cos_theta_i.abs();
    }
    let sin_theta_i: Float = (0.0 as Float)
        .max(1.0 as Float - cos_theta_i * cos_theta_i)
        .sqrt();
    let sin_theta_t: Float = local_eta_i / local_eta_t * sin_theta_i;
    if sin_theta_t >= 1.0 as Float {
        // total internal reflection
        return 1.0 as Float;
    }
    let cos_theta_t: Float = (0.0 as Float)
        .max(1.0 as Float - sin_theta_t * sin_theta_t)
        .sqrt();
    let r_parl: Float = ((local_eta_t * cos_theta_i) - (local_eta_i * cos_theta_t))
        / ((local_eta_t * cos_theta_i) + (local_eta_i * cos_theta_t));
    let r_perp: Float = ((local_eta_i * cos_theta_i) - (local_eta_t * cos_theta_t))
        / ((local_eta_i * cos_theta_i) + (local_eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

/// Fresnel reflectance at a conductor, with absorption.
pub fn fr_conductor(cos_theta_i: Float, eta_i: Spectrum, eta_t: Spectrum, k: Spectrum) -> Spectrum {
    let cos_theta_i: Float = clamp_t(cos_theta_i, -1.0, 1.0);
    let eta: Spectrum = eta_t / eta_i;
    let eta_k: Spectrum = k / eta_i;
    let cos_theta_i2: Float = cos_theta_i * cos_theta_i;
    let sin_theta_i2: Float = 1.0 as Float - cos_theta_i2;
    let eta_2: Spectrum = eta * eta;
    let eta_k2: Spectrum = eta_k * eta_k;
    let t0: Spectrum = eta_2 - eta_k2 - Spectrum::new(sin_theta_i2);
    let a2_plus_b2: Spectrum = (t0 * t0 + eta_2 * eta_k2 * Spectrum::new(4.0 as Float)).sqrt();
    let t1: Spectrum = a2_plus_b2 + Spectrum::new(cos_theta_i2);
    let a: Spectrum = ((a2_plus_b2 + t0) * 0.5 as Float).sqrt();
    let t2: Spectrum = a * 2.0 as Float * cos_theta_i;
    let rs: Spectrum = (t1 - t2) / (t1 + t2);
    let t3: Spectrum = a2_plus_b2 * cos_theta_i2 + Spectrum::new(sin_theta_i2 * sin_theta_i2);
    let t4: Spectrum = t2 * sin_theta_i2;
    let rp: Spectrum = rs * (t3 - t4) / (t3 + t4);
    (rp + rs) * Spectrum::new(0.5 as Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use crate::core::sampling::stratified_sample_2d;

    fn local(x: Float, y: Float, z: Float) -> Vector3f {
        Vector3f { x, y, z }.normalize()
    }

    fn stratified_samples(n: usize, seed: u64) -> Vec<Point2f> {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(seed);
        let side: i32 = (n as Float).sqrt() as i32;
        let mut samples: Vec<Point2f> = vec![Point2f::default(); (side * side) as usize];
        stratified_sample_2d(&mut samples, side, side, &mut rng, true);
        samples
    }

    #[test]
    fn fresnel_dielectric_limits() {
        // normal incidence of an air/glass interface
        let f0: Float = fr_dielectric(1.0, 1.0, 1.5);
        assert!((f0 - 0.04).abs() < 1e-3);
        // grazing incidence approaches total reflection
        assert!(fr_dielectric(1e-4, 1.0, 1.5) > 0.99);
        // beyond the critical angle from inside: total internal reflection
        let cos_critical: Float = (1.0 - (1.0 / 1.5) * (1.0 / 1.5) as Float).sqrt();
        assert_eq!(fr_dielectric(-(cos_critical - 0.05), 1.0, 1.5), 1.0);
    }

    #[test]
    fn refraction_bends_and_reports_tir() {
        let n: Normal3f = Normal3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        let mut wt: Vector3f = Vector3f::default();
        let wi: Vector3f = local(0.5, 0.0, 0.9);
        assert!(refract(&wi, &n, 1.0 / 1.5, &mut wt));
        assert!(wt.z < 0.0);
        assert!((wt.length() - 1.0).abs() < 1e-4);
        // shallow direction from the dense side: sin_theta >= 1/1.5
        let sin_i: Float = 0.75;
        let grazing: Vector3f = local(sin_i, 0.0, (1.0 - sin_i * sin_i).sqrt());
        assert!(!refract(&grazing, &n, 1.5, &mut wt));
    }

    #[test]
    fn sampled_pdf_matches_queried_pdf() {
        let distribution: MicrofacetDistribution = MicrofacetDistribution::TrowbridgeReitz(
            crate::core::microfacet::TrowbridgeReitzDistribution::new(0.3, 0.3),
        );
        let bxdfs: Vec<Bxdf> = vec![
            Bxdf::LambertianRefl(LambertianReflection::new(Spectrum::new(0.7), None)),
            Bxdf::LambertianTrans(LambertianTransmission::new(Spectrum::new(0.6), None)),
            Bxdf::OrenNayarRefl(OrenNayar::new(Spectrum::new(0.5), 20.0, None)),
            Bxdf::MicrofacetRefl(MicrofacetReflection::new(
                Spectrum::new(0.9),
                distribution,
                Fresnel::NoOp(FresnelNoOp {}),
                None,
            )),
        ];
        let wo: Vector3f = local(0.2, -0.4, 0.8);
        let mut rng: Rng = Rng::new();
        rng.set_sequence(51);
        for bxdf in bxdfs.iter() {
            for _ in 0..256 {
                let u: Point2f = Point2f {
                    x: rng.uniform_float(),
                    y: rng.uniform_float(),
                };
                let mut wi: Vector3f = Vector3f::default();
                let mut pdf: Float = 0.0;
                let mut sampled_type: u8 = 0_u8;
                let f: Spectrum = bxdf.sample_f(&wo, &mut wi, &u, &mut pdf, &mut sampled_type);
                if pdf > 0.0 && !f.is_black() {
                    let queried: Float = bxdf.pdf(&wo, &wi);
                    assert!(
                        (queried - pdf).abs() <= 1e-3 * pdf.max(1.0),
                        "pdf mismatch: {} vs {}",
                        queried,
                        pdf
                    );
                }
            }
        }
    }

    #[test]
    fn specular_mirror_flips_tangential_components() {
        let bxdf: Bxdf = Bxdf::SpecRefl(SpecularReflection::new(
            Spectrum::new(1.0),
            Fresnel::NoOp(FresnelNoOp {}),
            None,
        ));
        let wo: Vector3f = local(0.3, -0.1, 0.95);
        let mut wi: Vector3f = Vector3f::default();
        let mut pdf: Float = 0.0;
        let mut sampled_type: u8 = 0_u8;
        let f: Spectrum = bxdf.sample_f(&wo, &mut wi, &Point2f::default(), &mut pdf, &mut sampled_type);
        assert_eq!(pdf, 1.0);
        assert!((wi.x + wo.x).abs() < 1e-6);
        assert!((wi.y + wo.y).abs() < 1e-6);
        assert!((wi.z - wo.z).abs() < 1e-6);
        // evaluate() between arbitrary directions is zero for deltas
        assert!(bxdf.f(&wo, &wi).is_black());
        assert!(!f.is_black());
    }

    #[test]
    fn lambertian_reduced_reflectance_is_exact_and_consistent() {
        let rho: Spectrum = Spectrum::new(0.8);
        let lambertian: Bxdf = Bxdf::LambertianRefl(LambertianReflection::new(rho, None));
        let wo: Vector3f = local(0.0, 0.3, 0.95);
        let samples: Vec<Point2f> = stratified_samples(1024, 61);
        assert_eq!(lambertian.rho_hd(&wo, &samples), rho);
        // an Oren-Nayar lobe with sigma = 0 degenerates to Lambertian,
        // so its Monte Carlo estimate must converge to rho
        let degenerate: Bxdf = Bxdf::OrenNayarRefl(OrenNayar::new(rho, 0.0, None));
        let estimate: Spectrum = degenerate.rho_hd(&wo, &samples);
        for c in 0..3 {
            assert!((estimate.c[c] - 0.8).abs() < 0.02, "estimate = {:?}", estimate);
        }
        let samples2: Vec<Point2f> = stratified_samples(1024, 62);
        let hh: Spectrum = degenerate.rho_hh(&samples, &samples2);
        for c in 0..3 {
            assert!((hh.c[c] - 0.8).abs() < 0.05, "estimate = {:?}", hh);
        }
    }

    #[test]
    fn bsdf_aggregate_filters_by_type_and_side() {
        let si: SurfaceInteraction = SurfaceInteraction::new(
            &crate::core::geometry::Point3f::default(),
            &Vector3f::default(),
            Point2f::default(),
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
        );
        let mut bsdf: Bsdf = Bsdf::new(&si, 1.0);
        bsdf.add(Bxdf::LambertianRefl(LambertianReflection::new(
            Spectrum::new(0.5),
            None,
        )));
        bsdf.add(Bxdf::SpecRefl(SpecularReflection::new(
            Spectrum::new(1.0),
            Fresnel::NoOp(FresnelNoOp {}),
            None,
        )));
        assert_eq!(bsdf.num_components(BxdfType::BsdfAll as u8), 2);
        assert_eq!(
            bsdf.num_components(BxdfType::BsdfSpecular as u8 | BxdfType::BsdfReflection as u8),
            1
        );
        let wo: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        let wi: Vector3f = local(0.2, 0.2, 0.95);
        // diffuse-only evaluation sees the Lambertian lobe
        let f: Spectrum = bsdf.f(
            &wo,
            &wi,
            BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8,
        );
        assert!((f.c[0] - 0.5 * INV_PI).abs() < 1e-5);
        // directions below the surface reflect off nothing diffuse
        let below: Vector3f = local(0.2, 0.2, -0.95);
        assert!(bsdf
            .f(
                &wo,
                &below,
                BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8
            )
            .is_black());
        // pdf averages over matching components
        let pdf_all: Float = bsdf.pdf(&wo, &wi, BxdfType::BsdfAll as u8);
        let expected: Float = 0.5 * abs_cos_theta(&wi) * INV_PI;
        assert!((pdf_all - expected).abs() < 1e-5);
    }

    #[test]
    fn bsdf_specular_sampling_selects_the_mirror() {
        let si: SurfaceInteraction = SurfaceInteraction::new(
            &crate::core::geometry::Point3f::default(),
            &Vector3f::default(),
            Point2f::default(),
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
        );
        let mut bsdf: Bsdf = Bsdf::new(&si, 1.0);
        bsdf.add(Bxdf::SpecRefl(SpecularReflection::new(
            Spectrum::new(1.0),
            Fresnel::NoOp(FresnelNoOp {}),
            None,
        )));
        let wo_world: Vector3f = local(0.3, 0.2, 0.93);
        let mut wi_world: Vector3f = Vector3f::default();
        let mut pdf: Float = 0.0;
        let mut sampled_type: u8 = BxdfType::BsdfAll as u8;
        let f: Spectrum = bsdf.sample_f(
            &wo_world,
            &mut wi_world,
            &Point2f { x: 0.3, y: 0.7 },
            &mut pdf,
            BxdfType::BsdfSpecular as u8
                | BxdfType::BsdfReflection as u8
                | BxdfType::BsdfTransmission as u8,
            &mut sampled_type,
        );
        assert_eq!(pdf, 1.0);
        assert!(!f.is_black());
        assert!(sampled_type & BxdfType::BsdfSpecular as u8 != 0);
    }
}
