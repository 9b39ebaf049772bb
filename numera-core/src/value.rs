//! The closed numeric tower.
//!
//! [`Numeric`] tags a value as integer, rational or complex, in canonical
//! form: an integer-valued rational is always `Integer`, a complex value
//! with zero imaginary part always demotes through the rational rule. The
//! `From` constructors and the arithmetic here maintain that invariant, so
//! derived equality compares mathematical values, and promotion from an
//! operation is visible in the runtime variant.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::complex::Complex;
use crate::config::{self, DisplayMode};
use crate::error::{NumError, NumResult};
use crate::rational::Rational;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Numeric {
    Integer(BigInt),
    Rational(Rational),
    Complex(Complex),
}

impl Numeric {
    // ========== Queries ==========

    pub fn is_zero(&self) -> bool {
        match self {
            Numeric::Integer(n) => n.is_zero(),
            Numeric::Rational(r) => r.is_zero(),
            Numeric::Complex(z) => z.is_zero(),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Numeric::Integer(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Numeric::Complex(_))
    }

    pub fn is_real(&self) -> bool {
        !self.is_complex()
    }

    // ========== Widening views ==========

    /// The value as a rational, or `None` for a complex value.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Numeric::Integer(n) => Some(Rational::from(n.clone())),
            Numeric::Rational(r) => Some(r.clone()),
            Numeric::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Complex {
        match self {
            Numeric::Integer(n) => Complex::from(n.clone()),
            Numeric::Rational(r) => Complex::from(r.clone()),
            Numeric::Complex(z) => z.clone(),
        }
    }

    /// Nearest `f64` for real values, `None` for complex ones.
    pub fn to_f64(&self) -> Option<f64> {
        self.as_rational().and_then(|r| r.to_f64())
    }

    // ========== Fallible arithmetic ==========

    pub fn checked_div(&self, rhs: &Numeric) -> NumResult<Numeric> {
        match (self.as_rational(), rhs.as_rational()) {
            (Some(a), Some(b)) => Ok(Numeric::from(a.checked_div(&b)?)),
            _ => Ok(Numeric::from(
                self.as_complex().checked_div(&rhs.as_complex())?,
            )),
        }
    }

    pub fn inverse(&self) -> NumResult<Numeric> {
        match self {
            Numeric::Integer(n) => Ok(Numeric::from(Rational::from(n.clone()).inverse()?)),
            Numeric::Rational(r) => Ok(Numeric::from(r.inverse()?)),
            Numeric::Complex(z) => Ok(Numeric::from(z.inverse()?)),
        }
    }

    // ========== Rendering ==========

    pub fn to_string_mode(&self, mode: DisplayMode) -> String {
        match self {
            Numeric::Integer(n) => Rational::from(n.clone()).to_string_mode(mode),
            Numeric::Rational(r) => r.to_string_mode(mode),
            Numeric::Complex(z) => z.to_string_mode(mode),
        }
    }

    /// Exact form, the serialization format.
    pub fn to_fraction_string(&self) -> String {
        self.to_string_mode(DisplayMode::Fraction)
    }
}

// ========== Operators ==========

macro_rules! impl_numeric_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<&Numeric> for &Numeric {
            type Output = Numeric;

            fn $method(self, rhs: &Numeric) -> Numeric {
                if let (Numeric::Integer(a), Numeric::Integer(b)) = (self, rhs) {
                    return Numeric::Integer($imp::$method(a, b));
                }
                match (self.as_rational(), rhs.as_rational()) {
                    (Some(a), Some(b)) => Numeric::from($imp::$method(&a, &b)),
                    _ => Numeric::from($imp::$method(&self.as_complex(), &rhs.as_complex())),
                }
            }
        }

        impl $imp<Numeric> for Numeric {
            type Output = Numeric;

            fn $method(self, rhs: Numeric) -> Numeric {
                $imp::$method(&self, &rhs)
            }
        }

        impl $imp<&Numeric> for Numeric {
            type Output = Numeric;

            fn $method(self, rhs: &Numeric) -> Numeric {
                $imp::$method(&self, rhs)
            }
        }

        impl $imp<Numeric> for &Numeric {
            type Output = Numeric;

            fn $method(self, rhs: Numeric) -> Numeric {
                $imp::$method(self, &rhs)
            }
        }
    };
}

impl_numeric_binop!(Add, add);
impl_numeric_binop!(Sub, sub);
impl_numeric_binop!(Mul, mul);

impl Neg for &Numeric {
    type Output = Numeric;

    fn neg(self) -> Numeric {
        match self {
            Numeric::Integer(n) => Numeric::Integer(-n),
            Numeric::Rational(r) => Numeric::Rational(-r),
            Numeric::Complex(z) => Numeric::Complex(-z),
        }
    }
}

impl Neg for Numeric {
    type Output = Numeric;

    fn neg(self) -> Numeric {
        -&self
    }
}

/// Real values order totally; any comparison involving a complex value
/// is undefined and yields `None`.
impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.as_rational(), other.as_rational()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        }
    }
}

// ========== Conversions ==========

impl From<Rational> for Numeric {
    fn from(r: Rational) -> Numeric {
        if r.is_integer() {
            return Numeric::Integer(r.numerator());
        }
        Numeric::Rational(r)
    }
}

impl From<Complex> for Numeric {
    fn from(z: Complex) -> Numeric {
        if z.is_real() {
            let (re, _) = z.into_parts();
            return Numeric::from(re);
        }
        Numeric::Complex(z)
    }
}

impl From<BigInt> for Numeric {
    fn from(n: BigInt) -> Numeric {
        Numeric::Integer(n)
    }
}

macro_rules! impl_numeric_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Numeric {
            fn from(v: $t) -> Numeric {
                Numeric::Integer(BigInt::from(v))
            }
        }
    )*};
}

impl_numeric_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

// ========== Text ==========

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = config::with_current(|c| c.display);
        write!(f, "{}", self.to_string_mode(mode))
    }
}

impl FromStr for Numeric {
    type Err = NumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(r) = s.parse::<Rational>() {
            return Ok(Numeric::from(r));
        }
        Ok(Numeric::from(s.parse::<Complex>()?))
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fraction_string())
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn n(s: &str) -> Numeric {
        s.parse().unwrap()
    }

    #[test]
    fn test_canonical_construction() {
        assert!(matches!(Numeric::from(q("4/2")), Numeric::Integer(_)));
        assert!(matches!(Numeric::from(q("1/2")), Numeric::Rational(_)));
        assert!(matches!(
            Numeric::from(Complex::new(q("3"), q("0"))),
            Numeric::Integer(_)
        ));
        assert!(matches!(
            Numeric::from(Complex::new(q("1/2"), q("0"))),
            Numeric::Rational(_)
        ));
        assert!(matches!(
            Numeric::from(Complex::new(q("0"), q("1"))),
            Numeric::Complex(_)
        ));
        assert_eq!(Numeric::from(7i64), Numeric::Integer(BigInt::from(7)));
        assert_eq!(Numeric::from(q("2")), Numeric::from(2u8));
    }

    #[test]
    fn test_promotion_and_demotion() {
        let half = Numeric::from(q("1/2"));
        // rational + rational landing on an integer demotes
        assert!(matches!(&half + &half, Numeric::Integer(_)));
        assert_eq!(&half + &half, Numeric::from(1));
        // integer arithmetic stays integer
        assert_eq!(
            Numeric::from(6) * Numeric::from(7),
            Numeric::from(42)
        );
        // mixing in a complex operand promotes
        let i = Numeric::from(Complex::new(q("0"), q("1")));
        let z = &Numeric::from(2) + &i;
        assert_eq!(z, Numeric::Complex(Complex::new(q("2"), q("1"))));
        // complex arithmetic landing on the real axis demotes
        let w = Numeric::from(Complex::new(q("1"), q("1")));
        let v = Numeric::from(Complex::new(q("1"), q("-1")));
        assert_eq!(&w + &v, Numeric::from(2));
        assert_eq!(&w * &v, Numeric::from(2));
        assert_eq!(&w - &w, Numeric::from(0));
    }

    #[test]
    fn test_division_and_inverse() {
        let d = Numeric::from(1).checked_div(&Numeric::from(2)).unwrap();
        assert_eq!(d, Numeric::from(q("1/2")));
        assert!(matches!(
            Numeric::from(1).checked_div(&Numeric::from(0)),
            Err(NumError::DivisionByZero)
        ));
        // complex division reports MathError on a zero divisor
        let i = Numeric::from(Complex::new(q("0"), q("1")));
        assert!(matches!(
            i.checked_div(&Numeric::from(0)),
            Err(NumError::Math(_))
        ));
        let z = Numeric::from(Complex::new(q("2"), q("2")));
        let w = Numeric::from(Complex::new(q("1"), q("1")));
        assert_eq!(z.checked_div(&w).unwrap(), Numeric::from(2));
        assert_eq!(Numeric::from(2).inverse().unwrap(), Numeric::from(q("1/2")));
        assert!(matches!(
            Numeric::from(0).inverse(),
            Err(NumError::DivisionByZero)
        ));
        // a complex sum that cancels to zero demotes, so its inverse is
        // the rational division error
        let sum = &w + &Numeric::from(Complex::new(q("-1"), q("-1")));
        assert!(matches!(sum.inverse(), Err(NumError::DivisionByZero)));
    }

    #[test]
    fn test_ordering() {
        assert!(Numeric::from(q("1/2")) < Numeric::from(q("2/3")));
        assert!(Numeric::from(3) > Numeric::from(q("5/2")));
        let i = Numeric::from(Complex::new(q("0"), q("1")));
        assert_eq!(Numeric::from(1).partial_cmp(&i), None);
        assert_eq!(i.partial_cmp(&i), None);
    }

    #[test]
    fn test_neg_and_zero() {
        assert_eq!(-Numeric::from(5), Numeric::from(-5));
        assert_eq!(-Numeric::from(q("-1/3")), Numeric::from(q("1/3")));
        assert!(Numeric::from(0).is_zero());
        assert!(!Numeric::from(q("1/9")).is_zero());
        let i = Numeric::from(Complex::new(q("0"), q("1")));
        assert_eq!(-&i, Numeric::Complex(Complex::new(q("0"), q("-1"))));
        assert!(!i.is_zero());
    }

    #[test]
    fn test_widening_views() {
        assert_eq!(Numeric::from(3).as_rational(), Some(q("3")));
        assert_eq!(Numeric::from(q("1/2")).as_rational(), Some(q("1/2")));
        let i = Numeric::from(Complex::new(q("0"), q("1")));
        assert_eq!(i.as_rational(), None);
        assert_eq!(i.as_complex(), Complex::i());
        assert_eq!(Numeric::from(2).as_complex(), Complex::new(q("2"), q("0")));
        assert_eq!(Numeric::from(q("1/2")).to_f64(), Some(0.5));
        assert_eq!(i.to_f64(), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(n("42"), Numeric::from(42));
        assert_eq!(n("6/3"), Numeric::from(2));
        assert_eq!(n("-7/2"), Numeric::from(q("-7/2")));
        assert_eq!(n("3+4i"), Numeric::Complex(Complex::new(q("3"), q("4"))));
        assert_eq!(n("2i"), Numeric::Complex(Complex::new(q("0"), q("2"))));
        assert!("1+".parse::<Numeric>().is_err());
        assert_eq!(Numeric::from(42).to_string_mode(DisplayMode::Hex), "0x2a");
        assert_eq!(
            n("3+4i").to_string_mode(DisplayMode::Fraction),
            "3+4i"
        );
        assert_eq!(Numeric::from(q("1/20")).to_fraction_string(), "1/20");
    }

    #[test]
    fn test_serde_round_trip() {
        for s in ["42", "-7/2", "3+4i", "2i/5"] {
            let v = n(s);
            let json = serde_json::to_string(&v).unwrap();
            let back: Numeric = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v, "round trip of {s:?}");
        }
        assert_eq!(serde_json::to_string(&Numeric::from(q("1/2"))).unwrap(), "\"1/2\"");
    }
}
