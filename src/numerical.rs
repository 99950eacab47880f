//! `Numerical`: a value that is either an `f64` or an exact rational
//! `(i64, i64)`. The source overloaded the sign bit of the denominator in a
//! `union { double d; i64 i; }` to tell the two apart; per Design Notes §9
//! this is reformulated as an explicit tagged enum instead.

use std::fmt;

use crate::error::{EvalError, EvalResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numerical {
    Float(f64),
    Fraction { num: i64, den: i64 },
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    if a == 0 {
        1
    } else {
        a
    }
}

impl Numerical {
    pub fn int(n: i64) -> Self {
        Numerical::Fraction { num: n, den: 1 }
    }

    /// Builds a reduced fraction with the invariant `den > 0`,
    /// `gcd(|num|, den) == 1`.
    pub fn fraction(num: i64, den: i64) -> EvalResult<Self> {
        if den == 0 {
            return Err(EvalError::Math);
        }
        let (mut num, mut den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num, den);
        num /= g;
        den /= g;
        Ok(Numerical::Fraction { num, den })
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numerical::Float(f) => f,
            Numerical::Fraction { num, den } => num as f64 / den as f64,
        }
    }

    pub fn is_fraction(self) -> bool {
        matches!(self, Numerical::Fraction { .. })
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Numerical::Float(f) if f.is_nan())
    }

    pub fn nan() -> Self {
        Numerical::Float(f64::NAN)
    }

    pub fn is_zero(self) -> bool {
        match self {
            Numerical::Float(f) => f == 0.0,
            Numerical::Fraction { num, .. } => num == 0,
        }
    }

    fn promote_binop(
        self,
        other: Self,
        exact: impl FnOnce(i64, i64, i64, i64) -> EvalResult<Numerical>,
        float: impl FnOnce(f64, f64) -> Numerical,
    ) -> EvalResult<Numerical> {
        match (self, other) {
            (
                Numerical::Fraction { num: n1, den: d1 },
                Numerical::Fraction { num: n2, den: d2 },
            ) => exact(n1, d1, n2, d2),
            _ => Ok(float(self.as_f64(), other.as_f64())),
        }
    }

    pub fn add(self, other: Self) -> EvalResult<Self> {
        self.promote_binop(
            other,
            |n1, d1, n2, d2| Numerical::fraction(n1 * d2 + n2 * d1, d1 * d2),
            |a, b| Numerical::Float(a + b),
        )
    }

    pub fn sub(self, other: Self) -> EvalResult<Self> {
        self.promote_binop(
            other,
            |n1, d1, n2, d2| Numerical::fraction(n1 * d2 - n2 * d1, d1 * d2),
            |a, b| Numerical::Float(a - b),
        )
    }

    pub fn mul(self, other: Self) -> EvalResult<Self> {
        self.promote_binop(
            other,
            |n1, d1, n2, d2| Numerical::fraction(n1 * n2, d1 * d2),
            |a, b| Numerical::Float(a * b),
        )
    }

    /// Division. `force_fraction` models the NEDA `Fraction` node forcing a
    /// fraction result regardless of `auto_fractions` (§4.3).
    pub fn div(self, other: Self, auto_fractions: bool, force_fraction: bool) -> EvalResult<Self> {
        match (self, other) {
            (Numerical::Fraction { num: n1, den: d1 }, Numerical::Fraction { num: n2, den: d2 }) => {
                if n2 == 0 {
                    return if n1 == 0 {
                        Err(EvalError::Math)
                    } else {
                        Ok(Numerical::nan())
                    };
                }
                if auto_fractions || force_fraction {
                    Numerical::fraction(n1 * d2, d1 * n2)
                } else {
                    Ok(Numerical::Float((n1 as f64 / d1 as f64) / (n2 as f64 / d2 as f64)))
                }
            }
            _ => {
                let b = other.as_f64();
                if b == 0.0 {
                    Ok(Numerical::nan())
                } else {
                    Ok(Numerical::Float(self.as_f64() / b))
                }
            }
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Numerical::Float(f) => Numerical::Float(-f),
            Numerical::Fraction { num, den } => Numerical::Fraction { num: -num, den },
        }
    }

    pub fn pow(self, exp: Self) -> EvalResult<Self> {
        if let (Numerical::Fraction { num, den }, Numerical::Fraction { num: en, den: ed }) = (self, exp) {
            if ed == 1 && en >= 0 {
                let e = en as u32;
                if let (Some(n), Some(d)) = (num.checked_pow(e), den.checked_pow(e)) {
                    return Numerical::fraction(n, d);
                }
            }
        }
        Ok(Numerical::Float(self.as_f64().powf(exp.as_f64())))
    }

    pub fn sqrt(self) -> Self {
        if let Numerical::Fraction { num, den } = self {
            if num >= 0 {
                let sn = (num as f64).sqrt().round() as i64;
                let sd = (den as f64).sqrt().round() as i64;
                if sn * sn == num && sd * sd == den {
                    if let Ok(f) = Numerical::fraction(sn, sd) {
                        return f;
                    }
                }
            }
        }
        Numerical::Float(self.as_f64().sqrt())
    }

    pub fn factorial(self) -> EvalResult<Self> {
        let f = self.as_f64();
        if f < 0.0 || f.fract() != 0.0 || f > 170.0 {
            return Ok(Numerical::nan());
        }
        let mut acc: f64 = 1.0;
        let mut i = 2u32;
        while (i as f64) <= f {
            acc *= i as f64;
            i += 1;
        }
        if let Numerical::Fraction { .. } = self {
            if f <= 20.0 {
                let mut iacc: i64 = 1;
                let mut k = 2i64;
                while k as f64 <= f {
                    iacc *= k;
                    k += 1;
                }
                return Numerical::fraction(iacc, 1);
            }
        }
        Ok(Numerical::Float(acc))
    }

    /// Relative-tolerance float equality, per §4.3: "`==` between numericals
    /// uses a relative-tolerance float-equality on the double values."
    pub fn approx_eq(self, other: Self) -> bool {
        if let (Numerical::Fraction { num: n1, den: d1 }, Numerical::Fraction { num: n2, den: d2 }) = (self, other) {
            return n1 == n2 && d1 == d2;
        }
        let (a, b) = (self.as_f64(), other.as_f64());
        let tol = 1e-9 * a.abs().max(b.abs()).max(1.0);
        (a - b).abs() <= tol
    }
}

impl fmt::Display for Numerical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numerical::Float(v) => write!(f, "{}", v),
            Numerical::Fraction { num, den } => {
                if *den == 1 {
                    write!(f, "{}", num)
                } else {
                    write!(f, "{}/{}", num, den)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_reduces() {
        let f = Numerical::fraction(4, 8).unwrap();
        assert_eq!(f, Numerical::Fraction { num: 1, den: 2 });
    }

    #[test]
    fn fraction_sign_on_numerator() {
        let f = Numerical::fraction(3, -6).unwrap();
        assert_eq!(f, Numerical::Fraction { num: -1, den: 2 });
    }

    #[test]
    fn addition_of_fractions_exact() {
        let a = Numerical::fraction(1, 2).unwrap();
        let b = Numerical::fraction(1, 3).unwrap();
        let r = a.add(b).unwrap();
        assert_eq!(r, Numerical::Fraction { num: 5, den: 6 });
    }

    #[test]
    fn negated_fraction_sums_to_exact_zero() {
        let f = Numerical::fraction(7, 9).unwrap();
        let r = f.add(f.negate()).unwrap();
        assert_eq!(r, Numerical::Fraction { num: 0, den: 1 });
    }

    #[test]
    fn division_promotes_to_float_without_auto_fractions() {
        let a = Numerical::int(1);
        let b = Numerical::int(2);
        let r = a.div(b, false, false).unwrap();
        assert!(matches!(r, Numerical::Float(_)));
    }

    #[test]
    fn division_forced_fraction_even_with_auto_fractions_off() {
        let a = Numerical::int(1);
        let b = Numerical::int(2);
        let r = a.div(b, false, true).unwrap();
        assert_eq!(r, Numerical::Fraction { num: 1, den: 2 });
    }

    #[test]
    fn sqrt_of_perfect_square_stays_exact() {
        let f = Numerical::fraction(4, 9).unwrap();
        assert_eq!(f.sqrt(), Numerical::Fraction { num: 2, den: 3 });
    }

    #[test]
    fn sqrt_falls_back_to_float() {
        let f = Numerical::int(2);
        assert!(matches!(f.sqrt(), Numerical::Float(_)));
    }
}
