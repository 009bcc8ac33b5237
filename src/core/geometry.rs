//! Two- and three-dimensional vectors, points, normals, axis-aligned
//! bounds and rays. Points translate under transformations, vectors do
//! not, and normals transform by the inverse transpose; keeping the
//! three as distinct types lets the type system enforce that.

// std
use std::cell::Cell;
use std::ops;
use std::ops::{Index, IndexMut};
// others
use strum_macros::EnumIter;
// crate
use crate::core::precision::{gamma, next_float_down, next_float_up, Float};

#[derive(Debug, Copy, Clone, PartialEq, EnumIter)]
pub enum XYEnum {
    X = 0,
    Y = 1,
}

#[derive(Debug, Copy, Clone, PartialEq, EnumIter)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

impl XYZEnum {
    pub fn from_index(i: u8) -> XYZEnum {
        match i {
            0 => XYZEnum::X,
            1 => XYZEnum::Y,
            _ => XYZEnum::Z,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

pub type Vector2f = Vector2<Float>;
pub type Vector2i = Vector2<i32>;
pub type Vector3f = Vector3<Float>;
pub type Point2f = Point2<Float>;
pub type Point2i = Point2<i32>;
pub type Point3f = Point3<Float>;
pub type Normal3f = Normal3<Float>;

// Vector2

impl<T> Vector2<T> {
    pub fn new(x: T, y: T) -> Self {
        Vector2 { x, y }
    }
}

impl Vector2f {
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
}

impl_op_ex!(+ |a: &Vector2f, b: &Vector2f| -> Vector2f {
    Vector2f { x: a.x + b.x, y: a.y + b.y }
});
impl_op_ex!(-|a: &Vector2f, b: &Vector2f| -> Vector2f {
    Vector2f {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});
impl_op_ex!(*|a: &Vector2f, s: Float| -> Vector2f {
    Vector2f {
        x: a.x * s,
        y: a.y * s,
    }
});
impl_op_ex!(/ |a: &Vector2f, s: Float| -> Vector2f {
    let inv: Float = 1.0 as Float / s;
    Vector2f { x: a.x * inv, y: a.y * inv }
});
impl_op_ex!(-|a: &Vector2f| -> Vector2f { Vector2f { x: -a.x, y: -a.y } });

impl_op_ex!(+ |a: &Vector2i, b: &Vector2i| -> Vector2i {
    Vector2i { x: a.x + b.x, y: a.y + b.y }
});
impl_op_ex!(-|a: &Vector2i, b: &Vector2i| -> Vector2i {
    Vector2i {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});

impl<T: Copy> Index<XYEnum> for Vector2<T> {
    type Output = T;
    fn index(&self, index: XYEnum) -> &T {
        match index {
            XYEnum::X => &self.x,
            XYEnum::Y => &self.y,
        }
    }
}

pub fn vec2_dot_vec2(v1: &Vector2f, v2: &Vector2f) -> Float {
    v1.x * v2.x + v1.y * v2.y
}

// Vector3

impl<T> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Vector3 { x, y, z }
    }
}

impl Vector3f {
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn abs(&self) -> Vector3f {
        Vector3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
    pub fn max_component(&self) -> Float {
        self.x.max(self.y.max(self.z))
    }
    pub fn max_dimension(&self) -> u8 {
        if self.x > self.y {
            if self.x > self.z {
                0_u8
            } else {
                2_u8
            }
        } else if self.y > self.z {
            1_u8
        } else {
            2_u8
        }
    }
    pub fn permute(&self, x: u8, y: u8, z: u8) -> Vector3f {
        let v3: [Float; 3] = [self.x, self.y, self.z];
        Vector3f {
            x: v3[x as usize],
            y: v3[y as usize],
            z: v3[z as usize],
        }
    }
}

impl_op_ex!(+ |a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f { x: a.x + b.x, y: a.y + b.y, z: a.z + b.z }
});
impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});
impl_op_ex!(*|a: &Vector3f, s: Float| -> Vector3f {
    Vector3f {
        x: a.x * s,
        y: a.y * s,
        z: a.z * s,
    }
});
impl_op_ex!(/ |a: &Vector3f, s: Float| -> Vector3f {
    let inv: Float = 1.0 as Float / s;
    Vector3f { x: a.x * inv, y: a.y * inv, z: a.z * inv }
});
impl_op_ex!(-|a: &Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});
impl_op_ex!(+= |a: &mut Vector3f, b: &Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});
impl_op_ex!(*= |a: &mut Vector3f, s: Float| {
    a.x *= s;
    a.y *= s;
    a.z *= s;
});

impl<T: Copy> Index<XYZEnum> for Vector3<T> {
    type Output = T;
    fn index(&self, index: XYZEnum) -> &T {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            XYZEnum::Z => &self.z,
        }
    }
}

impl<T: Copy> IndexMut<XYZEnum> for Vector3<T> {
    fn index_mut(&mut self, index: XYZEnum) -> &mut T {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            XYZEnum::Z => &mut self.z,
        }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Vector3f {
            x: n.x,
            y: n.y,
            z: n.z,
        }
    }
}

pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

pub fn vec3_abs_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    vec3_dot_vec3f(v1, v2).abs()
}

pub fn vec3_dot_nrmf(v: &Vector3f, n: &Normal3f) -> Float {
    v.x * n.x + v.y * n.y + v.z * n.z
}

pub fn vec3_abs_dot_nrmf(v: &Vector3f, n: &Normal3f) -> Float {
    vec3_dot_nrmf(v, n).abs()
}

/// Cross product computed in double precision to dodge catastrophic
/// cancellation between nearly parallel operands.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let v1x: f64 = v1.x as f64;
    let v1y: f64 = v1.y as f64;
    let v1z: f64 = v1.z as f64;
    let v2x: f64 = v2.x as f64;
    let v2y: f64 = v2.y as f64;
    let v2z: f64 = v2.z as f64;
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

pub fn vec3_cross_nrm(v1: &Vector3f, v2: &Normal3f) -> Vector3f {
    vec3_cross_vec3(v1, &Vector3f::from(*v2))
}

pub fn nrm_cross_vec3(n1: &Normal3f, v2: &Vector3f) -> Vector3f {
    vec3_cross_vec3(&Vector3f::from(*n1), v2)
}

/// Construct a right-handed orthonormal basis around the (unit) vector
/// *v1*; the larger-magnitude axis pair gives a stable first companion.
pub fn vec3_coordinate_system(v1: &Vector3f, v2: &mut Vector3f, v3: &mut Vector3f) {
    if v1.x.abs() > v1.y.abs() {
        *v2 = Vector3f {
            x: -v1.z,
            y: 0.0 as Float,
            z: v1.x,
        } / (v1.x * v1.x + v1.z * v1.z).sqrt();
    } else {
        *v2 = Vector3f {
            x: 0.0 as Float,
            y: v1.z,
            z: -v1.y,
        } / (v1.y * v1.y + v1.z * v1.z).sqrt();
    }
    *v3 = vec3_cross_vec3(v1, v2);
}

pub fn vec3_faceforward_nrm(v: &Vector3f, n: &Normal3f) -> Vector3f {
    if vec3_dot_nrmf(v, n) < 0.0 as Float {
        -(*v)
    } else {
        *v
    }
}

/// Spherical coordinates to a direction in the basis (x, y, z).
pub fn spherical_direction_vec3(
    sin_theta: Float,
    cos_theta: Float,
    phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    *x * (sin_theta * phi.cos()) + *y * (sin_theta * phi.sin()) + *z * cos_theta
}

// Point2

impl<T> Point2<T> {
    pub fn new(x: T, y: T) -> Self {
        Point2 { x, y }
    }
}

impl Point2f {
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
    pub fn floor(&self) -> Point2f {
        Point2f {
            x: self.x.floor(),
            y: self.y.floor(),
        }
    }
    pub fn ceil(&self) -> Point2f {
        Point2f {
            x: self.x.ceil(),
            y: self.y.ceil(),
        }
    }
}

impl From<Point2i> for Point2f {
    fn from(p: Point2i) -> Self {
        Point2f {
            x: p.x as Float,
            y: p.y as Float,
        }
    }
}

impl From<Point2f> for Point2i {
    fn from(p: Point2f) -> Self {
        Point2i {
            x: p.x as i32,
            y: p.y as i32,
        }
    }
}

impl<T: Copy> Index<XYEnum> for Point2<T> {
    type Output = T;
    fn index(&self, index: XYEnum) -> &T {
        match index {
            XYEnum::X => &self.x,
            XYEnum::Y => &self.y,
        }
    }
}

impl<T: Copy> IndexMut<XYEnum> for Point2<T> {
    fn index_mut(&mut self, index: XYEnum) -> &mut T {
        match index {
            XYEnum::X => &mut self.x,
            XYEnum::Y => &mut self.y,
        }
    }
}

impl_op_ex!(+ |a: &Point2f, b: &Point2f| -> Point2f {
    Point2f { x: a.x + b.x, y: a.y + b.y }
});
impl_op_ex!(+ |a: &Point2f, b: &Vector2f| -> Point2f {
    Point2f { x: a.x + b.x, y: a.y + b.y }
});
impl_op_ex!(-|a: &Point2f, b: &Point2f| -> Vector2f {
    Vector2f {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});
impl_op_ex!(-|a: &Point2f, b: &Vector2f| -> Point2f {
    Point2f {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});
impl_op_ex!(*|a: &Point2f, s: Float| -> Point2f {
    Point2f {
        x: a.x * s,
        y: a.y * s,
    }
});
impl_op_ex!(+ |a: &Point2i, b: &Vector2i| -> Point2i {
    Point2i { x: a.x + b.x, y: a.y + b.y }
});
impl_op_ex!(-|a: &Point2i, b: &Point2i| -> Vector2i {
    Vector2i {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});

pub fn pnt2_min_pnt2i(p1: Point2i, p2: Point2i) -> Point2i {
    Point2i {
        x: p1.x.min(p2.x),
        y: p1.y.min(p2.y),
    }
}

pub fn pnt2_max_pnt2i(p1: Point2i, p2: Point2i) -> Point2i {
    Point2i {
        x: p1.x.max(p2.x),
        y: p1.y.max(p2.y),
    }
}

// Point3

impl<T> Point3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Point3 { x, y, z }
    }
}

impl Point3f {
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn abs(&self) -> Point3f {
        Point3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
}

impl<T: Copy> Index<XYZEnum> for Point3<T> {
    type Output = T;
    fn index(&self, index: XYZEnum) -> &T {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            XYZEnum::Z => &self.z,
        }
    }
}

impl<T: Copy> IndexMut<XYZEnum> for Point3<T> {
    fn index_mut(&mut self, index: XYZEnum) -> &mut T {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            XYZEnum::Z => &mut self.z,
        }
    }
}

impl_op_ex!(+ |a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f { x: a.x + b.x, y: a.y + b.y, z: a.z + b.z }
});
impl_op_ex!(+ |a: &Point3f, b: &Point3f| -> Point3f {
    Point3f { x: a.x + b.x, y: a.y + b.y, z: a.z + b.z }
});
impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});
impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});
impl_op_ex!(*|a: &Point3f, s: Float| -> Point3f {
    Point3f {
        x: a.x * s,
        y: a.y * s,
        z: a.z * s,
    }
});
impl_op_ex!(*= |a: &mut Point3f, s: Float| {
    a.x *= s;
    a.y *= s;
    a.z *= s;
});
impl_op_ex!(+= |a: &mut Point3f, b: &Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

pub fn pnt3_distancef(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length()
}

pub fn pnt3_distance_squaredf(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length_squared()
}

pub fn pnt3_lerp(t: Float, p0: &Point3f, p1: &Point3f) -> Point3f {
    *p0 * (1.0 as Float - t) + *p1 * t
}

/// Offset a spawned ray's origin along the normal, out past the
/// conservative error bound of the surface point, and round each
/// component away from the surface so the new origin provably clears it.
pub fn pnt3_offset_ray_origin(
    p: &Point3f,
    p_error: &Vector3f,
    n: &Normal3f,
    w: &Vector3f,
) -> Point3f {
    let n_abs: Vector3f = Vector3f::from(*n).abs();
    let d: Float = vec3_dot_vec3f(&n_abs, p_error);
    let mut offset: Vector3f = Vector3f::from(*n) * d;
    if vec3_dot_nrmf(w, n) < 0.0 as Float {
        offset = -offset;
    }
    let mut po: Point3f = *p + offset;
    for i in 0..3_u8 {
        let idx: XYZEnum = XYZEnum::from_index(i);
        if offset[idx] > 0.0 as Float {
            po[idx] = next_float_up(po[idx]);
        } else if offset[idx] < 0.0 as Float {
            po[idx] = next_float_down(po[idx]);
        }
    }
    po
}

// Normal3

impl Normal3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Normal3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn normalize(&self) -> Normal3f {
        let l: Float = self.length();
        Normal3f {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }
    pub fn abs(&self) -> Normal3f {
        Normal3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl_op_ex!(+ |a: &Normal3f, b: &Normal3f| -> Normal3f {
    Normal3f { x: a.x + b.x, y: a.y + b.y, z: a.z + b.z }
});
impl_op_ex!(*|a: &Normal3f, s: Float| -> Normal3f {
    Normal3f {
        x: a.x * s,
        y: a.y * s,
        z: a.z * s,
    }
});
impl_op_ex!(-|a: &Normal3f| -> Normal3f {
    Normal3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});
impl_op_ex!(*= |a: &mut Normal3f, s: Float| {
    a.x *= s;
    a.y *= s;
    a.z *= s;
});

pub fn nrm_dot_vec3f(n: &Normal3f, v: &Vector3f) -> Float {
    n.x * v.x + n.y * v.y + n.z * v.z
}

pub fn nrm_abs_dot_vec3f(n: &Normal3f, v: &Vector3f) -> Float {
    nrm_dot_vec3f(n, v).abs()
}

pub fn nrm_dot_nrmf(n1: &Normal3f, n2: &Normal3f) -> Float {
    n1.x * n2.x + n1.y * n2.y + n1.z * n2.z
}

pub fn nrm_faceforward_vec3(n: &Normal3f, v: &Vector3f) -> Normal3f {
    if nrm_dot_vec3f(n, v) < 0.0 as Float {
        -(*n)
    } else {
        *n
    }
}

pub fn nrm_faceforward_nrm(n: &Normal3f, n2: &Normal3f) -> Normal3f {
    if nrm_dot_nrmf(n, n2) < 0.0 as Float {
        -(*n)
    } else {
        *n
    }
}

// Bounds2

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds2<T> {
    pub p_min: Point2<T>,
    pub p_max: Point2<T>,
}

pub type Bounds2f = Bounds2<Float>;
pub type Bounds2i = Bounds2<i32>;

impl Default for Bounds2f {
    fn default() -> Self {
        Bounds2f {
            p_min: Point2f {
                x: std::f32::INFINITY as Float,
                y: std::f32::INFINITY as Float,
            },
            p_max: Point2f {
                x: -std::f32::INFINITY as Float,
                y: -std::f32::INFINITY as Float,
            },
        }
    }
}

impl Default for Bounds2i {
    fn default() -> Self {
        Bounds2i {
            p_min: Point2i {
                x: std::i32::MAX,
                y: std::i32::MAX,
            },
            p_max: Point2i {
                x: std::i32::MIN,
                y: std::i32::MIN,
            },
        }
    }
}

impl Bounds2f {
    pub fn new(p1: Point2f, p2: Point2f) -> Self {
        Bounds2f {
            p_min: Point2f {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
            },
            p_max: Point2f {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
            },
        }
    }
    pub fn diagonal(&self) -> Vector2f {
        self.p_max - self.p_min
    }
    pub fn area(&self) -> Float {
        let d: Vector2f = self.diagonal();
        d.x * d.y
    }
}

impl Bounds2i {
    pub fn new(p1: Point2i, p2: Point2i) -> Self {
        Bounds2i {
            p_min: pnt2_min_pnt2i(p1, p2),
            p_max: pnt2_max_pnt2i(p1, p2),
        }
    }
    pub fn diagonal(&self) -> Vector2i {
        self.p_max - self.p_min
    }
    pub fn area(&self) -> i32 {
        let d: Vector2i = self.diagonal();
        d.x * d.y
    }
    /// Inclusive lower, exclusive upper containment for raster pixels.
    pub fn inside_exclusive(&self, p: Point2i) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }
}

pub fn bnd2_intersect_bnd2i(b1: &Bounds2i, b2: &Bounds2i) -> Bounds2i {
    Bounds2i {
        p_min: pnt2_max_pnt2i(b1.p_min, b2.p_min),
        p_max: pnt2_min_pnt2i(b1.p_max, b2.p_max),
    }
}

pub fn bnd2_union_bnd2i(b1: &Bounds2i, b2: &Bounds2i) -> Bounds2i {
    Bounds2i {
        p_min: pnt2_min_pnt2i(b1.p_min, b2.p_min),
        p_max: pnt2_max_pnt2i(b1.p_max, b2.p_max),
    }
}

/// Scan-order (x fastest) iteration over the integer points of a
/// raster rectangle.
pub struct Bounds2iIterator {
    bounds: Bounds2i,
    p: Point2i,
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;
    fn next(&mut self) -> Option<Point2i> {
        if self.p.y >= self.bounds.p_max.y {
            return None;
        }
        let ret: Point2i = self.p;
        self.p.x += 1;
        if self.p.x >= self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        Some(ret)
    }
}

impl IntoIterator for &Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;
    fn into_iter(self) -> Bounds2iIterator {
        // an empty rectangle must not yield its corner
        let start: Point2i = if self.p_min.x < self.p_max.x && self.p_min.y < self.p_max.y {
            self.p_min
        } else {
            Point2i {
                x: self.p_min.x,
                y: self.p_max.y,
            }
        };
        Bounds2iIterator {
            bounds: *self,
            p: start,
        }
    }
}

// Bounds3

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    fn default() -> Self {
        // degenerate so that enclosing a first point works
        Bounds3f {
            p_min: Point3f {
                x: std::f32::INFINITY as Float,
                y: std::f32::INFINITY as Float,
                z: std::f32::INFINITY as Float,
            },
            p_max: Point3f {
                x: -std::f32::INFINITY as Float,
                y: -std::f32::INFINITY as Float,
                z: -std::f32::INFINITY as Float,
            },
        }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Bounds3f {
            p_min: Point3f {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
                z: p1.z.min(p2.z),
            },
            p_max: Point3f {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
                z: p1.z.max(p2.z),
            },
        }
    }
    pub fn corner(&self, corner: u8) -> Point3f {
        let x: Float = if corner & 1 == 0 {
            self.p_min.x
        } else {
            self.p_max.x
        };
        let y: Float = if corner & 2 == 0 {
            self.p_min.y
        } else {
            self.p_max.y
        };
        let z: Float = if corner & 4 == 0 {
            self.p_min.z
        } else {
            self.p_max.z
        };
        Point3f { x, y, z }
    }
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
    pub fn surface_area(&self) -> Float {
        let d: Vector3f = self.diagonal();
        2.0 as Float * (d.x * d.y + d.x * d.z + d.y * d.z)
    }
    pub fn maximum_extent(&self) -> u8 {
        self.diagonal().max_dimension()
    }
    pub fn contains(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }
    /// Position of *p* relative to the box corners, in [0, 1] per axis
    /// for interior points.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o: Vector3f = *p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        }
        if self.p_max.z > self.p_min.z {
            o.z /= self.p_max.z - self.p_min.z;
        }
        o
    }
    pub fn bounding_sphere(&self, center: &mut Point3f, radius: &mut Float) {
        *center = self.p_min * 0.5 as Float + self.p_max * 0.5 as Float;
        *radius = if self.contains(center) {
            pnt3_distancef(center, &self.p_max)
        } else {
            0.0 as Float
        };
    }
    /// Parametric slab test against the full [0, t_max] ray interval;
    /// fills both intersection parameters on a hit.
    pub fn intersect_b(&self, ray: &Ray, hitt0: &mut Float, hitt1: &mut Float) -> bool {
        let mut t0: Float = 0.0;
        let mut t1: Float = ray.t_max.get();
        for i in 0..3_u8 {
            let idx: XYZEnum = XYZEnum::from_index(i);
            let inv_ray_dir: Float = 1.0 as Float / ray.d[idx];
            let mut t_near: Float = (self.p_min[idx] - ray.o[idx]) * inv_ray_dir;
            let mut t_far: Float = (self.p_max[idx] - ray.o[idx]) * inv_ray_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // widen to stay conservative under rounding
            t_far *= 1.0 as Float + 2.0 as Float * gamma(3);
            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return false;
            }
        }
        *hitt0 = t0;
        *hitt1 = t1;
        true
    }
    /// Slab test with precomputed reciprocal direction and sign bits,
    /// the form used by the BVH traversal inner loop.
    pub fn intersect_p(&self, ray: &Ray, inv_dir: &Vector3f, dir_is_neg: &[u8; 3]) -> bool {
        // check for ray intersection against x and y slabs
        let mut t_min: Float = (self.corner_component(dir_is_neg[0], 0) - ray.o.x) * inv_dir.x;
        let mut t_max: Float = (self.corner_component(1 - dir_is_neg[0], 0) - ray.o.x) * inv_dir.x;
        let ty_min: Float = (self.corner_component(dir_is_neg[1], 1) - ray.o.y) * inv_dir.y;
        let mut ty_max: Float =
            (self.corner_component(1 - dir_is_neg[1], 1) - ray.o.y) * inv_dir.y;
        t_max *= 1.0 as Float + 2.0 as Float * gamma(3);
        ty_max *= 1.0 as Float + 2.0 as Float * gamma(3);
        if t_min > ty_max || ty_min > t_max {
            return false;
        }
        if ty_min > t_min {
            t_min = ty_min;
        }
        if ty_max < t_max {
            t_max = ty_max;
        }
        // check for ray intersection against z slab
        let tz_min: Float = (self.corner_component(dir_is_neg[2], 2) - ray.o.z) * inv_dir.z;
        let mut tz_max: Float =
            (self.corner_component(1 - dir_is_neg[2], 2) - ray.o.z) * inv_dir.z;
        tz_max *= 1.0 as Float + 2.0 as Float * gamma(3);
        if t_min > tz_max || tz_min > t_max {
            return false;
        }
        if tz_min > t_min {
            t_min = tz_min;
        }
        if tz_max < t_max {
            t_max = tz_max;
        }
        t_min < ray.t_max.get() && t_max > 0.0 as Float
    }
    fn corner_component(&self, which: u8, axis: u8) -> Float {
        let idx: XYZEnum = XYZEnum::from_index(axis);
        if which == 0 {
            self.p_min[idx]
        } else {
            self.p_max[idx]
        }
    }
}

pub fn bnd3_union_pnt3f(b: &Bounds3f, p: &Point3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b.p_min.x.min(p.x),
            y: b.p_min.y.min(p.y),
            z: b.p_min.z.min(p.z),
        },
        p_max: Point3f {
            x: b.p_max.x.max(p.x),
            y: b.p_max.y.max(p.y),
            z: b.p_max.z.max(p.z),
        },
    }
}

pub fn bnd3_union_bnd3f(b1: &Bounds3f, b2: &Bounds3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b1.p_min.x.min(b2.p_min.x),
            y: b1.p_min.y.min(b2.p_min.y),
            z: b1.p_min.z.min(b2.p_min.z),
        },
        p_max: Point3f {
            x: b1.p_max.x.max(b2.p_max.x),
            y: b1.p_max.y.max(b2.p_max.y),
            z: b1.p_max.z.max(b2.p_max.z),
        },
    }
}

// Ray

#[derive(Debug, Default, Copy, Clone)]
pub struct RayDifferential {
    pub rx_origin: Point3f,
    pub ry_origin: Point3f,
    pub rx_direction: Vector3f,
    pub ry_direction: Vector3f,
}

/// A ray with a mutable extent; each accepted intersection tightens
/// `t_max` so later tests can be pruned. The optional differential
/// carries the adjacent-pixel rays for texture footprint estimation.
#[derive(Debug, Default, Clone)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
    pub t_max: Cell<Float>,
    pub time: Float,
    pub differential: Option<RayDifferential>,
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray {
            o,
            d,
            t_max: Cell::new(std::f32::INFINITY as Float),
            time: 0.0 as Float,
            differential: None,
        }
    }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(d) = self.differential.as_mut() {
            d.rx_origin = self.o + (d.rx_origin - self.o) * s;
            d.ry_origin = self.o + (d.ry_origin - self.o) * s;
            d.rx_direction = self.d + (d.rx_direction - self.d) * s;
            d.ry_direction = self.d + (d.ry_direction - self.d) * s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_system_is_orthonormal() {
        let v1: Vector3f = Vector3f {
            x: 0.3,
            y: -0.5,
            z: 0.81,
        }
        .normalize();
        let mut v2: Vector3f = Vector3f::default();
        let mut v3: Vector3f = Vector3f::default();
        vec3_coordinate_system(&v1, &mut v2, &mut v3);
        assert!(vec3_dot_vec3f(&v1, &v2).abs() < 1e-6);
        assert!(vec3_dot_vec3f(&v1, &v3).abs() < 1e-6);
        assert!(vec3_dot_vec3f(&v2, &v3).abs() < 1e-6);
        assert!((v2.length() - 1.0).abs() < 1e-5);
        assert!((v3.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn union_with_contained_point_is_identity() {
        let b: Bounds3f = Bounds3f::new(
            Point3f {
                x: -1.0,
                y: -2.0,
                z: -3.0,
            },
            Point3f {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
        );
        let p: Point3f = Point3f {
            x: 0.5,
            y: -1.0,
            z: 2.0,
        };
        assert!(b.contains(&p));
        assert_eq!(bnd3_union_pnt3f(&b, &p), b);
    }

    #[test]
    fn empty_bounds_union_is_idempotent_seed() {
        let empty: Bounds3f = Bounds3f::default();
        let p: Point3f = Point3f {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let b: Bounds3f = bnd3_union_pnt3f(&empty, &p);
        assert_eq!(b.p_min, p);
        assert_eq!(b.p_max, p);
    }

    #[test]
    fn bounds2i_iterates_in_scan_order() {
        let b: Bounds2i = Bounds2i::new(Point2i { x: 0, y: 0 }, Point2i { x: 2, y: 2 });
        let pts: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(
            pts,
            vec![
                Point2i { x: 0, y: 0 },
                Point2i { x: 1, y: 0 },
                Point2i { x: 0, y: 1 },
                Point2i { x: 1, y: 1 },
            ]
        );
    }

    #[test]
    fn empty_bounds2i_yields_nothing() {
        let b: Bounds2i = Bounds2i {
            p_min: Point2i { x: 3, y: 3 },
            p_max: Point2i { x: 3, y: 5 },
        };
        assert_eq!(b.into_iter().count(), 0);
    }

    #[test]
    fn slab_test_hits_and_misses() {
        let b: Bounds3f = Bounds3f::new(
            Point3f {
                x: -1.0,
                y: -1.0,
                z: -1.0,
            },
            Point3f {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
        );
        let ray: Ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: 5.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        );
        let inv_dir: Vector3f = Vector3f {
            x: 1.0 / ray.d.x,
            y: 1.0 / ray.d.y,
            z: 1.0 / ray.d.z,
        };
        let dir_is_neg: [u8; 3] = [
            (inv_dir.x < 0.0) as u8,
            (inv_dir.y < 0.0) as u8,
            (inv_dir.z < 0.0) as u8,
        ];
        assert!(b.intersect_p(&ray, &inv_dir, &dir_is_neg));
        let miss: Ray = Ray::new(
            Point3f {
                x: 5.0,
                y: 0.0,
                z: 5.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        );
        assert!(!b.intersect_p(&miss, &inv_dir, &dir_is_neg));
    }

    #[test]
    fn offset_ray_origin_clears_error_bound() {
        let p: Point3f = Point3f {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        };
        let p_error: Vector3f = Vector3f {
            x: 1e-4,
            y: 1e-4,
            z: 1e-4,
        };
        let n: Normal3f = Normal3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        let w: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        let po: Point3f = pnt3_offset_ray_origin(&p, &p_error, &n, &w);
        assert!(po.z > p.z + 0.5e-4);
    }
}
