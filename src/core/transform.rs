//! 4x4 transformations stored together with their inverses, plus the
//! two-keyframe animated transformation used by cameras. Applying a
//! transformation to a point or ray can also produce a conservative
//! bound on the rounding error it introduced.

// crate
use crate::core::geometry::{
    bnd3_union_pnt3f, nrm_faceforward_nrm, vec3_dot_vec3f, Bounds3f, Normal3f, Point3f, Ray,
    Vector3f,
};
use crate::core::interaction::SurfaceInteraction;
use crate::core::math::{lerp, radians};
use crate::core::precision::{gamma, Float};
use crate::core::quaternion::{quat_slerp, Quaternion};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4x4 {
    pub m: [[Float; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4 {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

impl Matrix4x4 {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        t00: Float,
        t01: Float,
        t02: Float,
        t03: Float,
        t10: Float,
        t11: Float,
        t12: Float,
        t13: Float,
        t20: Float,
        t21: Float,
        t22: Float,
        t23: Float,
        t30: Float,
        t31: Float,
        t32: Float,
        t33: Float,
    ) -> Self {
        Matrix4x4 {
            m: [
                [t00, t01, t02, t03],
                [t10, t11, t12, t13],
                [t20, t21, t22, t23],
                [t30, t31, t32, t33],
            ],
        }
    }
    pub fn transpose(m: &Matrix4x4) -> Matrix4x4 {
        Matrix4x4::new(
            m.m[0][0], m.m[1][0], m.m[2][0], m.m[3][0], m.m[0][1], m.m[1][1], m.m[2][1], m.m[3][1],
            m.m[0][2], m.m[1][2], m.m[2][2], m.m[3][2], m.m[0][3], m.m[1][3], m.m[2][3], m.m[3][3],
        )
    }
    /// Gauss-Jordan elimination with full pivoting. A singular matrix
    /// is a programmer error and aborts.
    pub fn inverse(m: &Matrix4x4) -> Matrix4x4 {
        let mut indxc: [usize; 4] = [0; 4];
        let mut indxr: [usize; 4] = [0; 4];
        let mut ipiv: [usize; 4] = [0; 4];
        let mut minv: [[Float; 4]; 4] = m.m;
        for i in 0..4 {
            let mut irow: usize = 0;
            let mut icol: usize = 0;
            let mut big: Float = 0.0;
            // choose pivot
            for (j, ipiv_j) in ipiv.iter().enumerate() {
                if *ipiv_j != 1 {
                    for (k, ipiv_k) in ipiv.iter().enumerate() {
                        if *ipiv_k == 0 && minv[j][k].abs() >= big {
                            big = minv[j][k].abs();
                            irow = j;
                            icol = k;
                        }
                    }
                }
            }
            ipiv[icol] += 1;
            // swap rows irow and icol for pivot
            if irow != icol {
                for k in 0..4 {
                    let tmp: Float = minv[irow][k];
                    minv[irow][k] = minv[icol][k];
                    minv[icol][k] = tmp;
                }
            }
            indxr[i] = irow;
            indxc[i] = icol;
            assert!(minv[icol][icol] != 0.0, "singular matrix in Matrix4x4::inverse");
            // set minv[icol][icol] to one by scaling row icol
            let pivinv: Float = 1.0 as Float / minv[icol][icol];
            minv[icol][icol] = 1.0;
            for k in 0..4 {
                minv[icol][k] *= pivinv;
            }
            // subtract this row from the others to zero their columns
            for j in 0..4 {
                if j != icol {
                    let save: Float = minv[j][icol];
                    minv[j][icol] = 0.0;
                    for k in 0..4 {
                        minv[j][k] -= minv[icol][k] * save;
                    }
                }
            }
        }
        // swap columns back to reflect the permutation
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for row in minv.iter_mut() {
                    row.swap(indxr[j], indxc[j]);
                }
            }
        }
        Matrix4x4 { m: minv }
    }
    pub fn mul(m1: &Matrix4x4, m2: &Matrix4x4) -> Matrix4x4 {
        let mut r: Matrix4x4 = Matrix4x4::default();
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = m1.m[i][0] * m2.m[0][j]
                    + m1.m[i][1] * m2.m[1][j]
                    + m1.m[i][2] * m2.m[2][j]
                    + m1.m[i][3] * m2.m[3][j];
            }
        }
        r
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            m: Matrix4x4::default(),
            m_inv: Matrix4x4::default(),
        }
    }
}

impl Transform {
    pub fn new(m: Matrix4x4) -> Self {
        Transform {
            m,
            m_inv: Matrix4x4::inverse(&m),
        }
    }
    pub fn inverse(&self) -> Transform {
        Transform {
            m: self.m_inv,
            m_inv: self.m,
        }
    }
    pub fn is_identity(&self) -> bool {
        self.m == Matrix4x4::default()
    }
    /// The handedness flips iff the upper 3x3 determinant is negative.
    pub fn swaps_handedness(&self) -> bool {
        let det: Float = self.m.m[0][0]
            * (self.m.m[1][1] * self.m.m[2][2] - self.m.m[1][2] * self.m.m[2][1])
            - self.m.m[0][1] * (self.m.m[1][0] * self.m.m[2][2] - self.m.m[1][2] * self.m.m[2][0])
            + self.m.m[0][2] * (self.m.m[1][0] * self.m.m[2][1] - self.m.m[1][1] * self.m.m[2][0]);
        det < 0.0 as Float
    }
    pub fn translate(delta: &Vector3f) -> Transform {
        Transform {
            m: Matrix4x4::new(
                1.0, 0.0, 0.0, delta.x, 0.0, 1.0, 0.0, delta.y, 0.0, 0.0, 1.0, delta.z, 0.0, 0.0,
                0.0, 1.0,
            ),
            m_inv: Matrix4x4::new(
                1.0, 0.0, 0.0, -delta.x, 0.0, 1.0, 0.0, -delta.y, 0.0, 0.0, 1.0, -delta.z, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }
    pub fn scale(x: Float, y: Float, z: Float) -> Transform {
        Transform {
            m: Matrix4x4::new(
                x, 0.0, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, 0.0, z, 0.0, 0.0, 0.0, 0.0, 1.0,
            ),
            m_inv: Matrix4x4::new(
                1.0 / x,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0 / y,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0 / z,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
            ),
        }
    }
    pub fn rotate_x(theta: Float) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let m = Matrix4x4::new(
            1.0, 0.0, 0.0, 0.0, 0.0, cos_theta, -sin_theta, 0.0, 0.0, sin_theta, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    pub fn rotate_y(theta: Float) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let m = Matrix4x4::new(
            cos_theta, 0.0, sin_theta, 0.0, 0.0, 1.0, 0.0, 0.0, -sin_theta, 0.0, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    pub fn rotate_z(theta: Float) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let m = Matrix4x4::new(
            cos_theta, -sin_theta, 0.0, 0.0, sin_theta, cos_theta, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    pub fn rotate(theta: Float, axis: &Vector3f) -> Transform {
        let a: Vector3f = axis.normalize();
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let mut m: Matrix4x4 = Matrix4x4::default();
        // rotation of the basis vectors about a
        m.m[0][0] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
        m.m[0][1] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
        m.m[0][2] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;
        m.m[1][0] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
        m.m[1][1] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
        m.m[1][2] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;
        m.m[2][0] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
        m.m[2][1] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
        m.m[2][2] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    /// Camera-to-world transform for an eye position, look-at point
    /// and up vector.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Transform {
        let dir: Vector3f = (*look - *pos).normalize();
        let right: Vector3f = crate::core::geometry::vec3_cross_vec3(&up.normalize(), &dir);
        assert!(
            right.length_squared() > 0.0 as Float,
            "look_at: up vector and viewing direction are parallel"
        );
        let right: Vector3f = right.normalize();
        let new_up: Vector3f = crate::core::geometry::vec3_cross_vec3(&dir, &right);
        let camera_to_world = Matrix4x4::new(
            right.x, new_up.x, dir.x, pos.x, right.y, new_up.y, dir.y, pos.y, right.z, new_up.z,
            dir.z, pos.z, 0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m: camera_to_world,
            m_inv: Matrix4x4::inverse(&camera_to_world),
        }
    }
    pub fn orthographic(z_near: Float, z_far: Float) -> Transform {
        Transform::scale(1.0, 1.0, 1.0 / (z_far - z_near))
            * Transform::translate(&Vector3f {
                x: 0.0,
                y: 0.0,
                z: -z_near,
            })
    }
    pub fn perspective(fov: Float, n: Float, f: Float) -> Transform {
        // project onto the z = 1 plane, remapping z to [0, 1]
        let persp = Matrix4x4::new(
            1.0,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
            0.0,
            0.0,
            0.0,
            f / (f - n),
            -f * n / (f - n),
            0.0,
            0.0,
            1.0,
            0.0,
        );
        // scale canonical perspective view to the specified field of view
        let inv_tan_ang: Float = 1.0 as Float / (radians(fov) / 2.0 as Float).tan();
        Transform::scale(inv_tan_ang, inv_tan_ang, 1.0) * Transform::new(persp)
    }
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let x: Float = p.x;
        let y: Float = p.y;
        let z: Float = p.z;
        let xp: Float =
            self.m.m[0][0] * x + self.m.m[0][1] * y + self.m.m[0][2] * z + self.m.m[0][3];
        let yp: Float =
            self.m.m[1][0] * x + self.m.m[1][1] * y + self.m.m[1][2] * z + self.m.m[1][3];
        let zp: Float =
            self.m.m[2][0] * x + self.m.m[2][1] * y + self.m.m[2][2] * z + self.m.m[2][3];
        let wp: Float =
            self.m.m[3][0] * x + self.m.m[3][1] * y + self.m.m[3][2] * z + self.m.m[3][3];
        if wp == 1.0 as Float {
            Point3f {
                x: xp,
                y: yp,
                z: zp,
            }
        } else {
            Point3f {
                x: xp,
                y: yp,
                z: zp,
            } * (1.0 as Float / wp)
        }
    }
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: self.m.m[0][0] * v.x + self.m.m[0][1] * v.y + self.m.m[0][2] * v.z,
            y: self.m.m[1][0] * v.x + self.m.m[1][1] * v.y + self.m.m[1][2] * v.z,
            z: self.m.m[2][0] * v.x + self.m.m[2][1] * v.y + self.m.m[2][2] * v.z,
        }
    }
    /// Normals transform by the inverse transpose so they stay
    /// perpendicular to the surface.
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        Normal3f {
            x: self.m_inv.m[0][0] * n.x + self.m_inv.m[1][0] * n.y + self.m_inv.m[2][0] * n.z,
            y: self.m_inv.m[0][1] * n.x + self.m_inv.m[1][1] * n.y + self.m_inv.m[2][1] * n.z,
            z: self.m_inv.m[0][2] * n.x + self.m_inv.m[1][2] * n.y + self.m_inv.m[2][2] * n.z,
        }
    }
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        let mut ret: Bounds3f = Bounds3f {
            p_min: self.transform_point(&b.corner(0)),
            p_max: self.transform_point(&b.corner(0)),
        };
        for i in 1..8_u8 {
            ret = bnd3_union_pnt3f(&ret, &self.transform_point(&b.corner(i)));
        }
        ret
    }
    /// Transform a point and report a conservative absolute error for
    /// the result, assuming the input was exact.
    pub fn transform_point_with_error(&self, p: &Point3f, p_error: &mut Vector3f) -> Point3f {
        let x: Float = p.x;
        let y: Float = p.y;
        let z: Float = p.z;
        let x_abs_sum: Float = (self.m.m[0][0] * x).abs()
            + (self.m.m[0][1] * y).abs()
            + (self.m.m[0][2] * z).abs()
            + self.m.m[0][3].abs();
        let y_abs_sum: Float = (self.m.m[1][0] * x).abs()
            + (self.m.m[1][1] * y).abs()
            + (self.m.m[1][2] * z).abs()
            + self.m.m[1][3].abs();
        let z_abs_sum: Float = (self.m.m[2][0] * x).abs()
            + (self.m.m[2][1] * y).abs()
            + (self.m.m[2][2] * z).abs()
            + self.m.m[2][3].abs();
        *p_error = Vector3f {
            x: x_abs_sum,
            y: y_abs_sum,
            z: z_abs_sum,
        } * gamma(3);
        self.transform_point(p)
    }
    /// Transform a point that already carries an error bound; the
    /// output bound accounts for both the incoming error and the
    /// rounding of this transformation.
    pub fn transform_point_with_abs_error(
        &self,
        p: &Point3f,
        pt_error: &Vector3f,
        abs_error: &mut Vector3f,
    ) -> Point3f {
        let x: Float = p.x;
        let y: Float = p.y;
        let z: Float = p.z;
        abs_error.x = (gamma(3) + 1.0 as Float)
            * (self.m.m[0][0].abs() * pt_error.x
                + self.m.m[0][1].abs() * pt_error.y
                + self.m.m[0][2].abs() * pt_error.z)
            + gamma(3)
                * ((self.m.m[0][0] * x).abs()
                    + (self.m.m[0][1] * y).abs()
                    + (self.m.m[0][2] * z).abs()
                    + self.m.m[0][3].abs());
        abs_error.y = (gamma(3) + 1.0 as Float)
            * (self.m.m[1][0].abs() * pt_error.x
                + self.m.m[1][1].abs() * pt_error.y
                + self.m.m[1][2].abs() * pt_error.z)
            + gamma(3)
                * ((self.m.m[1][0] * x).abs()
                    + (self.m.m[1][1] * y).abs()
                    + (self.m.m[1][2] * z).abs()
                    + self.m.m[1][3].abs());
        abs_error.z = (gamma(3) + 1.0 as Float)
            * (self.m.m[2][0].abs() * pt_error.x
                + self.m.m[2][1].abs() * pt_error.y
                + self.m.m[2][2].abs() * pt_error.z)
            + gamma(3)
                * ((self.m.m[2][0] * x).abs()
                    + (self.m.m[2][1] * y).abs()
                    + (self.m.m[2][2] * z).abs()
                    + self.m.m[2][3].abs());
        self.transform_point(p)
    }
    pub fn transform_vector_with_error(&self, v: &Vector3f, abs_error: &mut Vector3f) -> Vector3f {
        let x: Float = v.x;
        let y: Float = v.y;
        let z: Float = v.z;
        abs_error.x = gamma(3)
            * ((self.m.m[0][0] * x).abs() + (self.m.m[0][1] * y).abs() + (self.m.m[0][2] * z).abs());
        abs_error.y = gamma(3)
            * ((self.m.m[1][0] * x).abs() + (self.m.m[1][1] * y).abs() + (self.m.m[1][2] * z).abs());
        abs_error.z = gamma(3)
            * ((self.m.m[2][0] * x).abs() + (self.m.m[2][1] * y).abs() + (self.m.m[2][2] * z).abs());
        self.transform_vector(v)
    }
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        let mut o_error: Vector3f = Vector3f::default();
        let mut o: Point3f = self.transform_point_with_error(&r.o, &mut o_error);
        let d: Vector3f = self.transform_vector(&r.d);
        // advance the origin past its own error interval so spawned
        // rays cannot re-hit the surface they left
        let length_squared: Float = d.length_squared();
        if length_squared > 0.0 as Float {
            let dt: Float = vec3_dot_vec3f(&d.abs(), &o_error) / length_squared;
            o += d * dt;
        }
        Ray {
            o,
            d,
            t_max: r.t_max.clone(),
            time: r.time,
            differential: r.differential.map(|diff| {
                crate::core::geometry::RayDifferential {
                    rx_origin: self.transform_point(&diff.rx_origin),
                    ry_origin: self.transform_point(&diff.ry_origin),
                    rx_direction: self.transform_vector(&diff.rx_direction),
                    ry_direction: self.transform_vector(&diff.ry_direction),
                }
            }),
        }
    }
    pub fn transform_ray_with_error(
        &self,
        r: &Ray,
        o_error: &mut Vector3f,
        d_error: &mut Vector3f,
    ) -> Ray {
        let mut o: Point3f = self.transform_point_with_error(&r.o, o_error);
        let d: Vector3f = self.transform_vector_with_error(&r.d, d_error);
        let length_squared: Float = d.length_squared();
        if length_squared > 0.0 as Float {
            let dt: Float = vec3_dot_vec3f(&d.abs(), o_error) / length_squared;
            o += d * dt;
        }
        Ray {
            o,
            d,
            t_max: r.t_max.clone(),
            time: r.time,
            differential: None,
        }
    }
    pub fn transform_surface_interaction(&self, si: &mut SurfaceInteraction) {
        let mut abs_error: Vector3f = Vector3f::default();
        si.common.p =
            self.transform_point_with_abs_error(&si.common.p, &si.common.p_error, &mut abs_error);
        si.common.p_error = abs_error;
        si.common.n = self.transform_normal(&si.common.n).normalize();
        si.common.wo = self.transform_vector(&si.common.wo);
        si.dpdu = self.transform_vector(&si.dpdu);
        si.dpdv = self.transform_vector(&si.dpdv);
        si.dndu = self.transform_normal(&si.dndu);
        si.dndv = self.transform_normal(&si.dndv);
        si.shading.n = self.transform_normal(&si.shading.n).normalize();
        si.shading.dpdu = self.transform_vector(&si.shading.dpdu);
        si.shading.dpdv = self.transform_vector(&si.shading.dpdv);
        si.shading.dndu = self.transform_normal(&si.shading.dndu);
        si.shading.dndv = self.transform_normal(&si.shading.dndv);
        si.shading.n = nrm_faceforward_nrm(&si.shading.n, &si.common.n);
    }
}

impl std::ops::Mul for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: Matrix4x4::mul(&self.m, &rhs.m),
            m_inv: Matrix4x4::mul(&rhs.m_inv, &self.m_inv),
        }
    }
}

/// Two keyframed rigid transformations; translation interpolates
/// linearly, rotation through quaternion slerp and scale linearly in
/// matrix form.
#[derive(Debug, Clone)]
pub struct AnimatedTransform {
    pub start_transform: Transform,
    pub end_transform: Transform,
    pub start_time: Float,
    pub end_time: Float,
    actually_animated: bool,
    t: [Vector3f; 2],
    r: [Quaternion; 2],
    s: [Matrix4x4; 2],
}

impl AnimatedTransform {
    pub fn new(
        start_transform: &Transform,
        start_time: Float,
        end_transform: &Transform,
        end_time: Float,
    ) -> Self {
        let mut at = AnimatedTransform {
            start_transform: *start_transform,
            end_transform: *end_transform,
            start_time,
            end_time,
            actually_animated: start_transform != end_transform,
            t: [Vector3f::default(); 2],
            r: [Quaternion::default(); 2],
            s: [Matrix4x4::default(); 2],
        };
        AnimatedTransform::decompose(&start_transform.m, &mut at.t[0], &mut at.r[0], &mut at.s[0]);
        AnimatedTransform::decompose(&end_transform.m, &mut at.t[1], &mut at.r[1], &mut at.s[1]);
        // pick the shorter great-circle arc between the two rotations
        if crate::core::quaternion::quat_dot_quat(&at.r[0], &at.r[1]) < 0.0 as Float {
            at.r[1] = -at.r[1];
        }
        at
    }
    /// Split a transformation into translation, rotation and scale.
    /// The rotation comes from polar decomposition of the upper 3x3.
    fn decompose(m: &Matrix4x4, t: &mut Vector3f, r_quat: &mut Quaternion, s: &mut Matrix4x4) {
        t.x = m.m[0][3];
        t.y = m.m[1][3];
        t.z = m.m[2][3];
        let mut matrix: Matrix4x4 = *m;
        for i in 0..3 {
            matrix.m[i][3] = 0.0;
            matrix.m[3][i] = 0.0;
        }
        matrix.m[3][3] = 1.0;
        // iterate toward the rotation factor
        let mut norm: Float;
        let mut r: Matrix4x4 = matrix;
        let mut count: u8 = 0;
        loop {
            let r_it: Matrix4x4 = Matrix4x4::inverse(&Matrix4x4::transpose(&r));
            let mut r_next: Matrix4x4 = Matrix4x4::default();
            for i in 0..4 {
                for j in 0..4 {
                    r_next.m[i][j] = 0.5 as Float * (r.m[i][j] + r_it.m[i][j]);
                }
            }
            norm = 0.0;
            for i in 0..3 {
                let n: Float = (r.m[i][0] - r_next.m[i][0]).abs()
                    + (r.m[i][1] - r_next.m[i][1]).abs()
                    + (r.m[i][2] - r_next.m[i][2]).abs();
                norm = norm.max(n);
            }
            r = r_next;
            count += 1;
            if count >= 100 || norm <= 0.0001 {
                break;
            }
        }
        *r_quat = Quaternion::from(&Transform {
            m: r,
            m_inv: Matrix4x4::inverse(&r),
        });
        *s = Matrix4x4::mul(&Matrix4x4::inverse(&r), &matrix);
    }
    pub fn interpolate(&self, time: Float) -> Transform {
        if !self.actually_animated || time <= self.start_time {
            return self.start_transform;
        }
        if time >= self.end_time {
            return self.end_transform;
        }
        let dt: Float = (time - self.start_time) / (self.end_time - self.start_time);
        let trans: Vector3f = self.t[0] * (1.0 as Float - dt) + self.t[1] * dt;
        let rotate: Quaternion = quat_slerp(dt, &self.r[0], &self.r[1]);
        let mut scale: Matrix4x4 = Matrix4x4::default();
        for i in 0..3 {
            for j in 0..3 {
                scale.m[i][j] = lerp(dt, self.s[0].m[i][j], self.s[1].m[i][j]);
            }
        }
        Transform::translate(&trans) * rotate.to_transform() * Transform::new(scale)
    }
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        if !self.actually_animated {
            self.start_transform.transform_ray(r)
        } else {
            self.interpolate(r.time).transform_ray(r)
        }
    }
    pub fn transform_point(&self, time: Float, p: &Point3f) -> Point3f {
        self.interpolate(time).transform_point(p)
    }
    pub fn transform_vector(&self, time: Float, v: &Vector3f) -> Vector3f {
        self.interpolate(time).transform_vector(v)
    }
    pub fn is_animated(&self) -> bool {
        self.actually_animated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrices_close(a: &Matrix4x4, b: &Matrix4x4, tol: Float) -> bool {
        for i in 0..4 {
            for j in 0..4 {
                if (a.m[i][j] - b.m[i][j]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn double_inversion_returns_original() {
        let t: Transform = Transform::translate(&Vector3f {
            x: 1.5,
            y: -2.25,
            z: 0.75,
        }) * Transform::rotate_y(37.0)
            * Transform::scale(1.0, 2.0, 4.0);
        let tt: Transform = t.inverse().inverse();
        assert!(matrices_close(&t.m, &tt.m, 1e-5));
    }

    #[test]
    fn inverse_composes_to_identity() {
        let t: Transform = Transform::look_at(
            &Point3f {
                x: 2.0,
                y: 3.0,
                z: 4.0,
            },
            &Point3f {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            &Vector3f {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
        );
        let id: Transform = t * t.inverse();
        assert!(matrices_close(&id.m, &Matrix4x4::default(), 1e-5));
    }

    #[test]
    fn normals_use_inverse_transpose() {
        // a pure scale must not keep normals parallel to vectors
        let t: Transform = Transform::scale(2.0, 1.0, 1.0);
        let n: Normal3f = Normal3f {
            x: 1.0,
            y: 1.0,
            z: 0.0,
        };
        let tn: Normal3f = t.transform_normal(&n).normalize();
        // the surface x + y = c maps to x/2 + y = c; its normal is (1/2, 1, 0)
        let expected: Normal3f = Normal3f {
            x: 0.5,
            y: 1.0,
            z: 0.0,
        }
        .normalize();
        assert!((tn.x - expected.x).abs() < 1e-5);
        assert!((tn.y - expected.y).abs() < 1e-5);
    }

    #[test]
    fn handedness_flip_detection() {
        assert!(!Transform::scale(1.0, 1.0, 1.0).swaps_handedness());
        assert!(Transform::scale(-1.0, 1.0, 1.0).swaps_handedness());
    }

    #[test]
    fn animated_transform_interpolates_translation() {
        let t0: Transform = Transform::default();
        let t1: Transform = Transform::translate(&Vector3f {
            x: 2.0,
            y: 0.0,
            z: 0.0,
        });
        let at: AnimatedTransform = AnimatedTransform::new(&t0, 0.0, &t1, 1.0);
        let mid: Transform = at.interpolate(0.5);
        let p: Point3f = mid.transform_point(&Point3f::default());
        assert!((p.x - 1.0).abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
    }

    #[test]
    fn animated_transform_clamps_outside_shutter() {
        let t0: Transform = Transform::default();
        let t1: Transform = Transform::translate(&Vector3f {
            x: 2.0,
            y: 0.0,
            z: 0.0,
        });
        let at: AnimatedTransform = AnimatedTransform::new(&t0, 0.0, &t1, 1.0);
        let p: Point3f = at.interpolate(4.0).transform_point(&Point3f::default());
        assert!((p.x - 2.0).abs() < 1e-5);
    }
}
