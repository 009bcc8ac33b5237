//! Scattering events. A surface intersection records the hit
//! position together with its conservative error bound, the local
//! parameterisation and its derivatives, and a shading frame that may
//! be perturbed away from the true geometry by bump mapping.

// crate
use crate::core::geometry::{
    nrm_dot_nrmf, nrm_faceforward_nrm, pnt3_offset_ray_origin, vec3_cross_vec3, vec3_dot_nrmf,
    Normal3f, Point2f, Point3f, Ray, Vector3f,
};
use crate::core::math::solve_linear_system_2x2;
use crate::core::model::Model;
use crate::core::precision::Float;
use crate::core::spectrum::Spectrum;

/// Position, time and direction data shared by surface and light
/// sample interactions.
#[derive(Debug, Default, Clone)]
pub struct InteractionCommon {
    pub p: Point3f,
    pub time: Float,
    pub p_error: Vector3f,
    pub wo: Vector3f,
    pub n: Normal3f,
}

impl InteractionCommon {
    /// Ray leaving this point in direction *d*, with its origin pushed
    /// past the point's error bound.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let o: Point3f = pnt3_offset_ray_origin(&self.p, &self.p_error, &self.n, d);
        let mut ray: Ray = Ray::new(o, *d);
        ray.time = self.time;
        ray
    }
    /// Segment ray toward another interaction; `t_max` stops just
    /// short of the far endpoint so the target surface itself does
    /// not occlude the beam.
    pub fn spawn_ray_to(&self, other: &InteractionCommon) -> Ray {
        let target_dir: Vector3f = other.p - self.p;
        let origin: Point3f = pnt3_offset_ray_origin(&self.p, &self.p_error, &self.n, &target_dir);
        let target: Point3f =
            pnt3_offset_ray_origin(&other.p, &other.p_error, &other.n, &(origin - other.p));
        let d: Vector3f = target - origin;
        let mut ray: Ray = Ray::new(origin, d);
        ray.t_max.set(1.0 as Float - 0.0001 as Float);
        ray.time = self.time;
        ray
    }
}

#[derive(Debug, Default, Clone)]
pub struct ShadingGeometry {
    pub n: Normal3f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
}

/// Everything a shape reports about an intersection, in world space.
#[derive(Debug, Default, Clone)]
pub struct SurfaceInteraction {
    pub common: InteractionCommon,
    pub uv: Point2f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
    pub shading: ShadingGeometry,
    // screen-space footprint, filled by compute_differentials
    pub dpdx: Vector3f,
    pub dpdy: Vector3f,
    pub dudx: Float,
    pub dvdx: Float,
    pub dudy: Float,
    pub dvdy: Float,
    /// Weak back-reference to the intersected model, used only to
    /// reach its material and area light during shading; never owns.
    pub model: Option<*const Model>,
}

impl SurfaceInteraction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: &Point3f,
        p_error: &Vector3f,
        uv: Point2f,
        wo: &Vector3f,
        dpdu: &Vector3f,
        dpdv: &Vector3f,
        dndu: &Normal3f,
        dndv: &Normal3f,
        time: Float,
    ) -> Self {
        let nv: Vector3f = vec3_cross_vec3(dpdu, dpdv).normalize();
        let n: Normal3f = Normal3f {
            x: nv.x,
            y: nv.y,
            z: nv.z,
        };
        SurfaceInteraction {
            common: InteractionCommon {
                p: *p,
                time,
                p_error: *p_error,
                wo: *wo,
                n,
            },
            uv,
            dpdu: *dpdu,
            dpdv: *dpdv,
            dndu: *dndu,
            dndv: *dndv,
            shading: ShadingGeometry {
                n,
                dpdu: *dpdu,
                dpdv: *dpdv,
                dndu: *dndu,
                dndv: *dndv,
            },
            dpdx: Vector3f::default(),
            dpdy: Vector3f::default(),
            dudx: 0.0 as Float,
            dvdx: 0.0 as Float,
            dudy: 0.0 as Float,
            dvdy: 0.0 as Float,
            model: None,
        }
    }
    /// Flip the geometric and shading normals; shapes call this when
    /// their orientation is reversed or the transform flips
    /// handedness (but not both).
    pub fn reverse_normals(&mut self) {
        self.common.n = -self.common.n;
        self.shading.n = -self.shading.n;
    }
    /// Replace the shading frame, e.g. after bump mapping. When
    /// `orientation_is_authoritative` the geometric normal flips to
    /// the shading side instead of the other way around.
    pub fn set_shading_geometry(
        &mut self,
        dpdus: &Vector3f,
        dpdvs: &Vector3f,
        dndus: &Normal3f,
        dndvs: &Normal3f,
        orientation_is_authoritative: bool,
    ) {
        let nv: Vector3f = vec3_cross_vec3(dpdus, dpdvs).normalize();
        let mut ns: Normal3f = Normal3f {
            x: nv.x,
            y: nv.y,
            z: nv.z,
        };
        if nrm_dot_nrmf(&ns, &self.common.n) < 0.0 as Float && !orientation_is_authoritative {
            ns = -ns;
        }
        if orientation_is_authoritative {
            self.common.n = nrm_faceforward_nrm(&self.common.n, &ns);
        }
        self.shading.n = ns;
        self.shading.dpdu = *dpdus;
        self.shading.dpdv = *dpdvs;
        self.shading.dndu = *dndus;
        self.shading.dndv = *dndvs;
    }
    /// Estimate (du/dx, dv/dx, du/dy, dv/dy) from the offset rays'
    /// intersections with the tangent plane at the hit point. Falls
    /// back to zero differentials when the rays are missing or the
    /// 2x2 system is near singular.
    pub fn compute_differentials(&mut self, ray: &Ray) {
        let mut ok: bool = false;
        if let Some(diff) = ray.differential.as_ref() {
            // intersect the two offset rays with the tangent plane
            let n: Normal3f = self.common.n;
            let d: Float = vec3_dot_nrmf(&Vector3f::from(self.common.p), &n);
            let tx: Float = -(vec3_dot_nrmf(&Vector3f::from(diff.rx_origin), &n) - d)
                / vec3_dot_nrmf(&diff.rx_direction, &n);
            let ty: Float = -(vec3_dot_nrmf(&Vector3f::from(diff.ry_origin), &n) - d)
                / vec3_dot_nrmf(&diff.ry_direction, &n);
            if tx.is_finite() && ty.is_finite() {
                let px: Point3f = diff.rx_origin + diff.rx_direction * tx;
                let py: Point3f = diff.ry_origin + diff.ry_direction * ty;
                self.dpdx = px - self.common.p;
                self.dpdy = py - self.common.p;
                // pick the two most stable axes to express the system in
                let dim: [usize; 2] = if n.x.abs() > n.y.abs() && n.x.abs() > n.z.abs() {
                    [1, 2]
                } else if n.y.abs() > n.z.abs() {
                    [0, 2]
                } else {
                    [0, 1]
                };
                let p_comp: [Float; 3] = [self.common.p.x, self.common.p.y, self.common.p.z];
                let px_comp: [Float; 3] = [px.x, px.y, px.z];
                let py_comp: [Float; 3] = [py.x, py.y, py.z];
                let dpdu_comp: [Float; 3] = [self.dpdu.x, self.dpdu.y, self.dpdu.z];
                let dpdv_comp: [Float; 3] = [self.dpdv.x, self.dpdv.y, self.dpdv.z];
                let a: [[Float; 2]; 2] = [
                    [dpdu_comp[dim[0]], dpdv_comp[dim[0]]],
                    [dpdu_comp[dim[1]], dpdv_comp[dim[1]]],
                ];
                let bx: [Float; 2] = [
                    px_comp[dim[0]] - p_comp[dim[0]],
                    px_comp[dim[1]] - p_comp[dim[1]],
                ];
                let by: [Float; 2] = [
                    py_comp[dim[0]] - p_comp[dim[0]],
                    py_comp[dim[1]] - p_comp[dim[1]],
                ];
                let mut dudx: Float = 0.0;
                let mut dvdx: Float = 0.0;
                let mut dudy: Float = 0.0;
                let mut dvdy: Float = 0.0;
                let sx: bool = solve_linear_system_2x2(a, bx, &mut dudx, &mut dvdx);
                let sy: bool = solve_linear_system_2x2(a, by, &mut dudy, &mut dvdy);
                self.dudx = if sx { dudx } else { 0.0 as Float };
                self.dvdx = if sx { dvdx } else { 0.0 as Float };
                self.dudy = if sy { dudy } else { 0.0 as Float };
                self.dvdy = if sy { dvdy } else { 0.0 as Float };
                ok = true;
            }
        }
        if !ok {
            self.dudx = 0.0 as Float;
            self.dvdx = 0.0 as Float;
            self.dudy = 0.0 as Float;
            self.dvdy = 0.0 as Float;
            self.dpdx = Vector3f::default();
            self.dpdy = Vector3f::default();
        }
    }
    /// Radiance emitted from the hit point in direction *w*; nonzero
    /// only when the intersected model carries an area light.
    pub fn emitted_radiance(&self, w: &Vector3f) -> Spectrum {
        if let Some(model_ptr) = self.model {
            let model: &Model = unsafe { &*model_ptr };
            if let Some(area_light) = model.get_area_light() {
                return area_light.l(&self.common, w);
            }
        }
        Spectrum::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::RayDifferential;

    fn plane_interaction() -> SurfaceInteraction {
        // z = 0 plane parameterised by (u, v) = (x, y)
        SurfaceInteraction::new(
            &Point3f::default(),
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
        )
    }

    #[test]
    fn differentials_on_an_axis_aligned_plane() {
        let mut si: SurfaceInteraction = plane_interaction();
        let mut ray: Ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        );
        ray.differential = Some(RayDifferential {
            rx_origin: Point3f {
                x: 0.5,
                y: 0.0,
                z: 1.0,
            },
            ry_origin: Point3f {
                x: 0.0,
                y: 0.5,
                z: 1.0,
            },
            rx_direction: ray.d,
            ry_direction: ray.d,
        });
        si.compute_differentials(&ray);
        assert!((si.dudx - 0.5).abs() < 1e-5);
        assert!(si.dvdx.abs() < 1e-5);
        assert!((si.dvdy - 0.5).abs() < 1e-5);
        assert!(si.dudy.abs() < 1e-5);
    }

    #[test]
    fn missing_offsets_give_zero_differentials() {
        let mut si: SurfaceInteraction = plane_interaction();
        si.dudx = 7.0;
        let ray: Ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, -1.0));
        si.compute_differentials(&ray);
        assert_eq!(si.dudx, 0.0);
        assert_eq!(si.dpdx, Vector3f::default());
    }

    #[test]
    fn spawned_rays_leave_the_surface() {
        let si: SurfaceInteraction = plane_interaction();
        let mut common: InteractionCommon = si.common.clone();
        common.p_error = Vector3f {
            x: 1e-5,
            y: 1e-5,
            z: 1e-5,
        };
        let up: Vector3f = Vector3f::new(0.0, 0.0, 1.0);
        let ray: Ray = common.spawn_ray(&up);
        assert!(ray.o.z > 0.0);
    }
}
