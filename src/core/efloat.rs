//! An error-tracked scalar. Every operation widens a running interval
//! outward by one ulp per bound, so the true value provably stays
//! inside [low, high] as long as the inputs were bracketed. A shadow
//! double-precision value rides along and is checked in debug builds.

use crate::core::precision::{next_float_down, next_float_up, Float, MACHINE_EPSILON};

#[derive(Debug, Default, Copy, Clone)]
pub struct EFloat {
    pub v: Float,
    pub low: Float,
    pub high: Float,
    precise: f64,
}

impl EFloat {
    pub fn new(v: Float, err: Float) -> EFloat {
        let ef = if err == 0.0 as Float {
            EFloat {
                v,
                low: v,
                high: v,
                precise: v as f64,
            }
        } else {
            EFloat {
                v,
                low: next_float_down(v - err),
                high: next_float_up(v + err),
                precise: v as f64,
            }
        };
        ef.check();
        ef
    }
    pub fn lower_bound(&self) -> Float {
        self.low
    }
    pub fn upper_bound(&self) -> Float {
        self.high
    }
    pub fn get_absolute_error(&self) -> Float {
        next_float_up((self.high - self.v).abs().max((self.v - self.low).abs()))
    }
    fn check(&self) {
        if self.low.is_finite()
            && !self.low.is_nan()
            && self.high.is_finite()
            && !self.high.is_nan()
        {
            debug_assert!(self.low <= self.high);
            debug_assert!(self.low as f64 <= self.precise && self.precise <= self.high as f64);
        }
    }
    pub fn sqrt(&self) -> EFloat {
        let r = EFloat {
            v: self.v.sqrt(),
            low: next_float_down(self.low.sqrt()),
            high: next_float_up(self.high.sqrt()),
            precise: self.precise.sqrt(),
        };
        r.check();
        r
    }
    pub fn abs(&self) -> EFloat {
        if self.low >= 0.0 as Float {
            // interval is entirely non-negative
            *self
        } else if self.high <= 0.0 as Float {
            -(*self)
        } else {
            let r = EFloat {
                v: self.v.abs(),
                low: 0.0 as Float,
                high: (-self.low).max(self.high),
                precise: self.precise.abs(),
            };
            r.check();
            r
        }
    }
}

impl PartialEq for EFloat {
    fn eq(&self, other: &EFloat) -> bool {
        self.v == other.v
    }
}

impl std::ops::Add for EFloat {
    type Output = EFloat;
    fn add(self, rhs: EFloat) -> EFloat {
        let r = EFloat {
            v: self.v + rhs.v,
            low: next_float_down(self.low + rhs.low),
            high: next_float_up(self.high + rhs.high),
            precise: self.precise + rhs.precise,
        };
        r.check();
        r
    }
}

impl std::ops::Sub for EFloat {
    type Output = EFloat;
    fn sub(self, rhs: EFloat) -> EFloat {
        let r = EFloat {
            v: self.v - rhs.v,
            low: next_float_down(self.low - rhs.high),
            high: next_float_up(self.high - rhs.low),
            precise: self.precise - rhs.precise,
        };
        r.check();
        r
    }
}

impl std::ops::Mul for EFloat {
    type Output = EFloat;
    fn mul(self, rhs: EFloat) -> EFloat {
        let prod: [Float; 4] = [
            self.low * rhs.low,
            self.high * rhs.low,
            self.low * rhs.high,
            self.high * rhs.high,
        ];
        let r = EFloat {
            v: self.v * rhs.v,
            low: next_float_down(prod[0].min(prod[1]).min(prod[2].min(prod[3]))),
            high: next_float_up(prod[0].max(prod[1]).max(prod[2].max(prod[3]))),
            precise: self.precise * rhs.precise,
        };
        r.check();
        r
    }
}

impl std::ops::Div for EFloat {
    type Output = EFloat;
    fn div(self, rhs: EFloat) -> EFloat {
        let r = if rhs.low < 0.0 as Float && rhs.high > 0.0 as Float {
            // the divisor interval straddles zero; no finite bound holds
            EFloat {
                v: self.v / rhs.v,
                low: -std::f32::INFINITY as Float,
                high: std::f32::INFINITY as Float,
                precise: self.precise / rhs.precise,
            }
        } else {
            let quot: [Float; 4] = [
                self.low / rhs.low,
                self.high / rhs.low,
                self.low / rhs.high,
                self.high / rhs.high,
            ];
            EFloat {
                v: self.v / rhs.v,
                low: next_float_down(quot[0].min(quot[1]).min(quot[2].min(quot[3]))),
                high: next_float_up(quot[0].max(quot[1]).max(quot[2].max(quot[3]))),
                precise: self.precise / rhs.precise,
            }
        };
        r.check();
        r
    }
}

impl std::ops::Neg for EFloat {
    type Output = EFloat;
    fn neg(self) -> EFloat {
        let r = EFloat {
            v: -self.v,
            low: -self.high,
            high: -self.low,
            precise: -self.precise,
        };
        r.check();
        r
    }
}

impl std::ops::Mul<Float> for EFloat {
    type Output = EFloat;
    fn mul(self, rhs: Float) -> EFloat {
        self * EFloat::new(rhs, 0.0)
    }
}

impl std::ops::Add<Float> for EFloat {
    type Output = EFloat;
    fn add(self, rhs: Float) -> EFloat {
        self + EFloat::new(rhs, 0.0)
    }
}

impl std::ops::Sub<Float> for EFloat {
    type Output = EFloat;
    fn sub(self, rhs: Float) -> EFloat {
        self - EFloat::new(rhs, 0.0)
    }
}

/// Conservative quadratic solver over error-tracked coefficients. The
/// discriminant is taken in double precision; the returned roots carry
/// the propagated interval bounds, ordered by their central values.
pub fn quadratic_efloat(a: EFloat, b: EFloat, c: EFloat, t0: &mut EFloat, t1: &mut EFloat) -> bool {
    let discrim: f64 =
        b.v as f64 * b.v as f64 - 4.0f64 * (a.v as f64) * (c.v as f64);
    if discrim < 0.0 {
        return false;
    }
    let root_discrim: f64 = discrim.sqrt();
    let float_root_discrim: EFloat = EFloat::new(
        root_discrim as Float,
        (MACHINE_EPSILON as f64 * root_discrim) as Float,
    );
    // both roots from the numerically stable form of the formula
    let q: EFloat = if b.v < 0.0 as Float {
        (b - float_root_discrim) * -0.5 as Float
    } else {
        (b + float_root_discrim) * -0.5 as Float
    };
    *t0 = q / a;
    *t1 = c / q;
    if t0.v > t1.v {
        std::mem::swap(t0, t1);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_brackets_exact_arithmetic() {
        let a: EFloat = EFloat::new(1.0 / 3.0, 1e-7);
        let b: EFloat = EFloat::new(2.0 / 7.0, 1e-7);
        for r in [a + b, a - b, a * b, a / b, a.sqrt(), -a, a.abs()].iter() {
            assert!(r.lower_bound() <= r.v);
            assert!(r.v <= r.upper_bound());
        }
        let sum: EFloat = a + b;
        let exact: f64 = 1.0f64 / 3.0 + 2.0f64 / 7.0;
        assert!(sum.lower_bound() as f64 <= exact && exact <= sum.upper_bound() as f64);
    }

    #[test]
    fn interval_widens_under_chained_operations() {
        let mut x: EFloat = EFloat::new(1.0, 0.0);
        let third: EFloat = EFloat::new(1.0 / 3.0, 0.0);
        for _ in 0..16 {
            x = x * third + third;
        }
        assert!(x.upper_bound() >= x.lower_bound());
        assert!(x.get_absolute_error() > 0.0);
    }

    #[test]
    fn division_by_straddling_interval_is_unbounded() {
        let num: EFloat = EFloat::new(1.0, 0.0);
        let den: EFloat = EFloat::new(0.0, 1e-6);
        let q: EFloat = num / den;
        assert!(q.lower_bound().is_infinite());
        assert!(q.upper_bound().is_infinite());
    }

    #[test]
    fn quadratic_brackets_true_roots() {
        // x^2 - 3x + 2 = 0 has roots 1 and 2
        let a: EFloat = EFloat::new(1.0, 0.0);
        let b: EFloat = EFloat::new(-3.0, 1e-6);
        let c: EFloat = EFloat::new(2.0, 1e-6);
        let mut t0: EFloat = EFloat::default();
        let mut t1: EFloat = EFloat::default();
        assert!(quadratic_efloat(a, b, c, &mut t0, &mut t1));
        assert!(t0.lower_bound() <= 1.0 && 1.0 <= t0.upper_bound());
        assert!(t1.lower_bound() <= 2.0 && 2.0 <= t1.upper_bound());
    }

    #[test]
    fn quadratic_rejects_complex_roots() {
        let mut t0: EFloat = EFloat::default();
        let mut t1: EFloat = EFloat::default();
        assert!(!quadratic_efloat(
            EFloat::new(1.0, 0.0),
            EFloat::new(0.0, 0.0),
            EFloat::new(4.0, 0.0),
            &mut t0,
            &mut t1
        ));
    }
}
