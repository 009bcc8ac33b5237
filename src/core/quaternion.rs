//! Unit quaternions, used to interpolate the rotation component of
//! animated transformations.

use crate::core::geometry::{vec3_cross_vec3, vec3_dot_vec3f, Vector3f};
use crate::core::math::clamp_t;
use crate::core::precision::Float;
use crate::core::transform::{Matrix4x4, Transform};
use std::ops;

#[derive(Debug, Copy, Clone)]
pub struct Quaternion {
    pub v: Vector3f,
    pub w: Float,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion {
            v: Vector3f::default(),
            w: 1.0 as Float,
        }
    }
}

impl Quaternion {
    pub fn new(v: Vector3f, w: Float) -> Self {
        Quaternion { v, w }
    }
    pub fn normalize(&self) -> Quaternion {
        let len: Float = quat_dot_quat(self, self).sqrt();
        Quaternion {
            v: self.v / len,
            w: self.w / len,
        }
    }
    /// Rotation matrix for this (unit) quaternion.
    pub fn to_transform(&self) -> Transform {
        let xx: Float = self.v.x * self.v.x;
        let yy: Float = self.v.y * self.v.y;
        let zz: Float = self.v.z * self.v.z;
        let xy: Float = self.v.x * self.v.y;
        let xz: Float = self.v.x * self.v.z;
        let yz: Float = self.v.y * self.v.z;
        let wx: Float = self.v.x * self.w;
        let wy: Float = self.v.y * self.w;
        let wz: Float = self.v.z * self.w;
        let m = Matrix4x4::new(
            1.0 - 2.0 * (yy + zz),
            2.0 * (xy + wz),
            2.0 * (xz - wy),
            0.0,
            2.0 * (xy - wz),
            1.0 - 2.0 * (xx + zz),
            2.0 * (yz + wx),
            0.0,
            2.0 * (xz + wy),
            2.0 * (yz - wx),
            1.0 - 2.0 * (xx + yy),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        );
        // transpose because the matrix above is left-handed
        Transform {
            m: Matrix4x4::transpose(&m),
            m_inv: m,
        }
    }
}

impl From<&Transform> for Quaternion {
    /// Extract the rotation of an orthonormal transform, branching on
    /// the trace for numerical stability.
    fn from(t: &Transform) -> Self {
        let m = &t.m;
        let trace: Float = m.m[0][0] + m.m[1][1] + m.m[2][2];
        if trace > 0.0 as Float {
            let mut s: Float = (trace + 1.0 as Float).sqrt();
            let w: Float = s / 2.0 as Float;
            s = 0.5 as Float / s;
            Quaternion {
                v: Vector3f {
                    x: (m.m[2][1] - m.m[1][2]) * s,
                    y: (m.m[0][2] - m.m[2][0]) * s,
                    z: (m.m[1][0] - m.m[0][1]) * s,
                },
                w,
            }
        } else {
            let nxt: [usize; 3] = [1, 2, 0];
            let mut q: [Float; 3] = [0.0 as Float; 3];
            let mut i: usize = 0;
            if m.m[1][1] > m.m[0][0] {
                i = 1;
            }
            if m.m[2][2] > m.m[i][i] {
                i = 2;
            }
            let j: usize = nxt[i];
            let k: usize = nxt[j];
            let mut s: Float = ((m.m[i][i] - (m.m[j][j] + m.m[k][k])) + 1.0 as Float).sqrt();
            q[i] = s * 0.5 as Float;
            if s != 0.0 as Float {
                s = 0.5 as Float / s;
            }
            let w: Float = (m.m[k][j] - m.m[j][k]) * s;
            q[j] = (m.m[j][i] + m.m[i][j]) * s;
            q[k] = (m.m[k][i] + m.m[i][k]) * s;
            Quaternion {
                v: Vector3f {
                    x: q[0],
                    y: q[1],
                    z: q[2],
                },
                w,
            }
        }
    }
}

impl_op_ex!(+ |a: &Quaternion, b: &Quaternion| -> Quaternion {
    Quaternion { v: a.v + b.v, w: a.w + b.w }
});
impl_op_ex!(-|a: &Quaternion, b: &Quaternion| -> Quaternion {
    Quaternion {
        v: a.v - b.v,
        w: a.w - b.w,
    }
});
impl_op_ex!(*|a: &Quaternion, s: Float| -> Quaternion {
    Quaternion {
        v: a.v * s,
        w: a.w * s,
    }
});
impl_op_ex!(-|a: &Quaternion| -> Quaternion { Quaternion { v: -a.v, w: -a.w } });

pub fn quat_dot_quat(q1: &Quaternion, q2: &Quaternion) -> Float {
    vec3_dot_vec3f(&q1.v, &q2.v) + q1.w * q2.w
}

/// Spherical linear interpolation; falls back to normalized linear
/// interpolation when the quaternions are nearly parallel.
pub fn quat_slerp(t: Float, q1: &Quaternion, q2: &Quaternion) -> Quaternion {
    let cos_theta: Float = quat_dot_quat(q1, q2);
    if cos_theta > 0.9995 as Float {
        (*q1 * (1.0 as Float - t) + *q2 * t).normalize()
    } else {
        let theta: Float = clamp_t(cos_theta, -1.0 as Float, 1.0 as Float).acos();
        let theta_p: Float = theta * t;
        let q_perp: Quaternion = (*q2 - *q1 * cos_theta).normalize();
        *q1 * theta_p.cos() + q_perp * theta_p.sin()
    }
}

/// Rotation of a vector by the quaternion, used by tests; rendering
/// code goes through the matrix form.
pub fn quat_rotate_vec3(q: &Quaternion, v: &Vector3f) -> Vector3f {
    let t: Vector3f = vec3_cross_vec3(&q.v, v) * 2.0 as Float;
    *v + t * q.w + vec3_cross_vec3(&q.v, &t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::radians;

    #[test]
    fn slerp_endpoints_match_inputs() {
        let q1: Quaternion = Quaternion::default();
        let half: Float = radians(90.0) / 2.0;
        let q2: Quaternion = Quaternion {
            v: Vector3f {
                x: 0.0,
                y: 0.0,
                z: half.sin(),
            },
            w: half.cos(),
        };
        let s0: Quaternion = quat_slerp(0.0, &q1, &q2);
        let s1: Quaternion = quat_slerp(1.0, &q1, &q2);
        assert!((quat_dot_quat(&s0, &q1) - 1.0).abs() < 1e-5);
        assert!((quat_dot_quat(&s1, &q2) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn halfway_slerp_rotates_half_angle() {
        let q1: Quaternion = Quaternion::default();
        let half: Float = radians(90.0) / 2.0;
        let q2: Quaternion = Quaternion {
            v: Vector3f {
                x: 0.0,
                y: 0.0,
                z: half.sin(),
            },
            w: half.cos(),
        };
        let mid: Quaternion = quat_slerp(0.5, &q1, &q2);
        let v: Vector3f = Vector3f {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        };
        let r: Vector3f = quat_rotate_vec3(&mid, &v);
        let expected: Float = radians(45.0);
        assert!((r.x - expected.cos()).abs() < 1e-5);
        assert!((r.y - expected.sin()).abs() < 1e-5);
    }
}
