//! Exact rational numbers.
//!
//! `Rational` wraps `num_rational::BigRational`: arbitrary-precision
//! numerator and denominator, always reduced, sign on the numerator,
//! denominator strictly positive. Arithmetic is exact; division is only
//! available through `checked_div`/`inverse` so a zero divisor shows up in
//! the signature. Transcendental methods return results within a caller
//! supplied (or thread-default) epsilon and promote to [`Complex`] when
//! the mathematical value leaves the real line.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Rem;
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_rational::BigRational;
use num_traits::{pow, One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::complex::Complex;
use crate::config::{self, DisplayMode};
use crate::error::{NumError, NumResult};
use crate::format;
use crate::int;
use crate::trans;
use crate::value::Numeric;

/// Rounding direction for quotients and approximations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Toward zero (truncate).
    Zero,
    /// Toward negative infinity.
    Floor,
    /// Toward positive infinity.
    Ceil,
    /// To nearest, halfway cases away from zero.
    Nearest,
}

/// An exact rational number.
#[derive(Debug, Clone)]
pub struct Rational {
    inner: BigRational,
}

impl Rational {
    // ========== Construction ==========

    /// Creates `numer/denom`, reduced and sign-normalized.
    pub fn new(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> NumResult<Self> {
        let denom = denom.into();
        if denom.is_zero() {
            return Err(NumError::DivisionByZero);
        }
        Ok(Self {
            inner: BigRational::new(numer.into(), denom),
        })
    }

    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self {
            inner: BigRational::from_integer(n.into()),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// Wraps an existing `BigRational`.
    pub fn from_ratio(r: BigRational) -> Self {
        Self { inner: r }
    }

    /// The engine-wide default accuracy, 10^-20.
    pub fn default_epsilon() -> Self {
        Self {
            inner: BigRational::new(BigInt::one(), pow(BigInt::from(10), 20)),
        }
    }

    /// Internal constructor; `denom` must be nonzero.
    pub(crate) fn from_ratio_parts(numer: BigInt, denom: BigInt) -> Self {
        debug_assert!(!denom.is_zero());
        Self {
            inner: BigRational::new(numer, denom),
        }
    }

    // ========== Accessors ==========

    pub fn numerator(&self) -> BigInt {
        self.inner.numer().clone()
    }

    /// Always strictly positive.
    pub fn denominator(&self) -> BigInt {
        self.inner.denom().clone()
    }

    pub fn as_ratio(&self) -> &BigRational {
        &self.inner
    }

    pub fn into_ratio(self) -> BigRational {
        self.inner
    }

    /// Nearest `f64`; loses precision by design.
    pub fn to_f64(&self) -> Option<f64> {
        self.inner.to_f64()
    }

    /// The exact integer value, or `None` for non-integers and overflow.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.inner.numer().to_i64()
        } else {
            None
        }
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.inner.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.inner.is_integer()
    }

    /// True for even integers only; fractions are neither even nor odd.
    pub fn is_even(&self) -> bool {
        self.is_integer() && self.inner.numer().is_even()
    }

    pub fn is_odd(&self) -> bool {
        self.is_integer() && self.inner.numer().is_odd()
    }

    /// Rationals are real; the dual flags exist so Rational and Complex
    /// answer the same questions.
    pub fn is_real(&self) -> bool {
        true
    }

    pub fn is_imag(&self) -> bool {
        false
    }

    pub fn isint(&self) -> Rational {
        flag(self.is_integer())
    }

    pub fn iseven(&self) -> Rational {
        flag(self.is_even())
    }

    pub fn isodd(&self) -> Rational {
        flag(self.is_odd())
    }

    pub fn isreal(&self) -> Rational {
        flag(true)
    }

    pub fn isimag(&self) -> Rational {
        flag(false)
    }

    // ========== Sign and magnitude ==========

    pub fn abs(&self) -> Rational {
        Self {
            inner: self.inner.abs(),
        }
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> Rational {
        Self {
            inner: self.inner.signum(),
        }
    }

    // ========== Rounding ==========

    pub fn floor(&self) -> Rational {
        Self {
            inner: self.inner.floor(),
        }
    }

    pub fn ceil(&self) -> Rational {
        Self {
            inner: self.inner.ceil(),
        }
    }

    pub fn trunc(&self) -> Rational {
        Self {
            inner: self.inner.trunc(),
        }
    }

    /// To nearest integer, halfway cases away from zero.
    pub fn round(&self) -> Rational {
        Self {
            inner: self.inner.round(),
        }
    }

    /// Integer part, truncated toward zero.
    pub fn int_part(&self) -> Rational {
        self.trunc()
    }

    /// Fractional part; carries the sign of self.
    pub fn frac_part(&self) -> Rational {
        Self {
            inner: self.inner.fract(),
        }
    }

    fn round_with(&self, rnd: Rounding) -> Rational {
        match rnd {
            Rounding::Zero => self.trunc(),
            Rounding::Floor => self.floor(),
            Rounding::Ceil => self.ceil(),
            Rounding::Nearest => self.round(),
        }
    }

    /// Rounds to the nearest multiple of `eps` under `rnd`. This is the
    /// snapping primitive behind every epsilon-bounded result.
    pub fn appr(&self, eps: Option<&Rational>, rnd: Rounding) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(self.snap_to(&eps, rnd))
    }

    /// Snap to the `eps` grid; `eps` must be positive.
    pub(crate) fn snap_to(&self, eps: &Rational, rnd: Rounding) -> Rational {
        let steps = self.div_exact(eps).round_with(rnd);
        &steps * eps
    }

    /// Compares |self - y| against eps: -1 below, 0 equal, 1 above.
    pub fn near(&self, y: &Rational, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        let d = (self - y).abs();
        Ok(match d.cmp(&eps) {
            Ordering::Less => Self::from_integer(-1),
            Ordering::Equal => Self::zero(),
            Ordering::Greater => Self::one(),
        })
    }

    // ========== Division family ==========

    pub fn checked_div(&self, y: &Rational) -> NumResult<Rational> {
        if y.is_zero() {
            return Err(NumError::DivisionByZero);
        }
        Ok(self.div_exact(y))
    }

    pub fn inverse(&self) -> NumResult<Rational> {
        if self.is_zero() {
            return Err(NumError::DivisionByZero);
        }
        Ok(Self {
            inner: self.inner.recip(),
        })
    }

    /// Internal division; `y` must be nonzero.
    pub(crate) fn div_exact(&self, y: &Rational) -> Rational {
        debug_assert!(!y.is_zero());
        Self {
            inner: &self.inner / &y.inner,
        }
    }

    /// Integer quotient of self/y under the given rounding.
    pub fn quotient(&self, y: &Rational, rnd: Rounding) -> NumResult<Rational> {
        if y.is_zero() {
            return Err(NumError::DivisionByZero);
        }
        Ok(self.div_exact(y).round_with(rnd))
    }

    /// `self - quotient(y, rnd) * y`. A zero divisor returns self
    /// unchanged: nothing was taken out.
    pub fn modulus(&self, y: &Rational, rnd: Rounding) -> Rational {
        if y.is_zero() {
            return self.clone();
        }
        let q = self.div_exact(y).round_with(rnd);
        self - &(&q * y)
    }

    /// Truncating quotient; the remainder carries the dividend's sign.
    pub fn quo(&self, y: &Rational) -> NumResult<Rational> {
        self.quotient(y, Rounding::Zero)
    }

    /// Floor modulus; the result carries the divisor's sign.
    pub fn modulo(&self, y: &Rational) -> Rational {
        self.modulus(y, Rounding::Floor)
    }

    /// Floor quotient and modulus as one consistent pair.
    pub fn quomod(&self, y: &Rational) -> NumResult<(Rational, Rational)> {
        let q = self.quotient(y, Rounding::Floor)?;
        let m = self - &(&q * y);
        Ok((q, m))
    }

    /// Remainder carrying the dividend's sign.
    pub fn remainder(&self, y: &Rational) -> Rational {
        let m = self.modulo(y);
        if m.is_zero() || self.is_negative() == y.is_negative() {
            m
        } else {
            &m - y
        }
    }

    // ========== Bits and shifts ==========

    /// Shift left by `amount` bits; negative amounts shift right.
    ///
    /// Sign-magnitude semantics: the magnitude shifts, the sign is
    /// reapplied afterward, so -20 >> 4 is -1, not -2.
    pub fn shl(&self, amount: &Rational) -> NumResult<Rational> {
        let n = shift_amount(amount)?;
        let v = self.require_integer("shift")?;
        Ok(Self::from_integer(shift_magnitude(v, n)))
    }

    /// Shift right; negative amounts shift left.
    pub fn shr(&self, amount: &Rational) -> NumResult<Rational> {
        let n = shift_amount(amount)?;
        let v = self.require_integer("shift")?;
        Ok(Self::from_integer(shift_magnitude(v, -n)))
    }

    /// Bit `pos` of the magnitude.
    pub fn bit(&self, pos: i64) -> NumResult<bool> {
        if pos < 0 {
            return Err(NumError::argument("negative bit position"));
        }
        let v = self.require_integer("bit")?;
        let shifted = v.magnitude() >> (pos as usize);
        Ok(shifted.is_odd())
    }

    /// Index of the highest set bit of the magnitude.
    pub fn highbit(&self) -> NumResult<u64> {
        let v = self.require_integer("highbit")?;
        if v.is_zero() {
            return Err(NumError::math("highbit of zero"));
        }
        Ok(v.bits() - 1)
    }

    // ========== Number theory ==========

    /// Fraction-aware gcd: gcd(a/b, c/d) = gcd(ad, cb) / bd.
    pub fn gcd(&self, y: &Rational) -> Rational {
        let n = (self.inner.numer() * y.inner.denom()).gcd(&(y.inner.numer() * self.inner.denom()));
        if n.is_zero() {
            return Self::zero();
        }
        Self::from_ratio_parts(n, self.inner.denom() * y.inner.denom())
    }

    /// Least common multiple, nonnegative; zero when either side is zero.
    pub fn lcm(&self, y: &Rational) -> Rational {
        let g = self.gcd(y);
        if g.is_zero() {
            return Self::zero();
        }
        (self * y).abs().div_exact(&g)
    }

    pub fn fact(&self) -> NumResult<Rational> {
        let n = self.require_integer("factorial")?;
        Ok(Self::from_integer(int::factorial(&n)?))
    }

    pub fn fib(&self) -> NumResult<Rational> {
        let n = self.require_integer("fibonacci")?;
        Ok(Self::from_integer(int::fibonacci(&n)?))
    }

    /// Floor square root of the floor of self.
    pub fn isqrt(&self) -> NumResult<Rational> {
        if self.is_negative() {
            return Err(NumError::math("isqrt of a negative value"));
        }
        Ok(Self::from_integer(self.inner.floor().to_integer().sqrt()))
    }

    /// Exact primality; integers only, deterministic below 2^32.
    pub fn is_prime(&self) -> NumResult<bool> {
        let n = self.require_integer("prime test")?;
        int::is_prime(&n)
    }

    /// Flag form of [`is_prime`](Self::is_prime).
    pub fn isprime(&self) -> NumResult<Rational> {
        Ok(flag(self.is_prime()?))
    }

    /// Miller-Rabin with the first `count` prime bases.
    pub fn ptest(&self, count: u32) -> NumResult<bool> {
        let n = self.require_integer("ptest")?;
        Ok(int::ptest(&n, count))
    }

    pub fn next_prime(&self) -> NumResult<Rational> {
        let n = self.require_integer("next_prime")?;
        Ok(Self::from_integer(int::next_prime(&n)?))
    }

    pub fn prev_prime(&self) -> NumResult<Rational> {
        let n = self.require_integer("prev_prime")?;
        Ok(Self::from_integer(int::prev_prime(&n)?))
    }

    /// Smallest prime factor of |self| not exceeding `bound`, or 1.
    pub fn factor(&self, bound: &Rational) -> NumResult<Rational> {
        let n = self.require_integer("factor")?;
        let b = bound.require_integer("factor bound")?;
        Ok(Self::from_integer(int::factor(&n, &b)?))
    }

    /// Coprimality of two integers.
    pub fn is_rel(&self, y: &Rational) -> NumResult<bool> {
        let a = self.require_integer("isrel")?;
        let b = y.require_integer("isrel")?;
        Ok(a.gcd(&b).is_one())
    }

    /// True when self is an integer multiple of y.
    pub fn is_mult(&self, y: &Rational) -> bool {
        if y.is_zero() {
            return self.is_zero();
        }
        self.div_exact(y).is_integer()
    }

    fn require_integer(&self, what: &str) -> NumResult<BigInt> {
        if !self.is_integer() {
            return Err(NumError::math(format!("{what} of a non-integer value")));
        }
        Ok(self.inner.to_integer())
    }

    // ========== Powers and roots ==========

    /// Exact integer power. 0^0 = 1; 0 to a negative power is a division
    /// by zero.
    pub fn pow_int(&self, exp: i64) -> NumResult<Rational> {
        if exp >= 0 {
            return Ok(self.pow_unsigned(exp as u64));
        }
        if self.is_zero() {
            return Err(NumError::DivisionByZero);
        }
        self.pow_unsigned(exp.unsigned_abs()).inverse()
    }

    fn pow_unsigned(&self, mut e: u64) -> Rational {
        let mut base = self.clone();
        let mut acc = Self::one();
        while e > 0 {
            if e & 1 == 1 {
                acc = &acc * &base;
            }
            base = &base * &base;
            e >>= 1;
        }
        acc
    }

    /// self^y. Integer y is exact; fractional y = p/q is epsilon-bounded.
    /// A negative base with odd q stays real with sign (-1)^p; with even q
    /// the result promotes to Complex.
    pub fn power(&self, y: &Rational, eps: Option<&Rational>) -> NumResult<Numeric> {
        // bases whose powers never grow stay exact at any exponent size
        if self.is_zero() {
            return if y.is_zero() {
                Ok(Numeric::from(Self::one()))
            } else if y.is_positive() {
                Ok(Numeric::from(Self::zero()))
            } else {
                Err(NumError::DivisionByZero)
            };
        }
        if y.is_integer() {
            if self.abs().is_one_value() {
                let negate = self.is_negative() && y.inner.numer().is_odd();
                return Ok(Numeric::from(if negate { -Self::one() } else { Self::one() }));
            }
            let e = y
                .to_i64()
                .ok_or_else(|| NumError::math("power exponent too large"))?;
            return Ok(Numeric::from(self.pow_int(e)?));
        }
        let eps = config::resolve_epsilon(eps)?;
        let p = y
            .inner
            .numer()
            .to_i64()
            .ok_or_else(|| NumError::math("power exponent too large"))?;
        let q = y
            .inner
            .denom()
            .to_i64()
            .ok_or_else(|| NumError::math("power exponent too large"))?;
        if self.is_positive() {
            return Ok(Numeric::from(trans::power(self, p, q, &eps)?));
        }
        if q % 2 == 1 {
            let mag = trans::power(&self.abs(), p, q, &eps)?;
            return Ok(Numeric::from(if p % 2 == 0 { mag } else { -mag }));
        }
        let z = Complex::from(self.clone());
        let w = Complex::from(y.clone());
        Ok(Numeric::from(z.power(&w, Some(&eps))?))
    }

    fn is_one_value(&self) -> bool {
        self.inner.is_one()
    }

    /// Principal square root; negative input promotes to the imaginary
    /// axis.
    pub fn sqrt(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_negative() {
            let im = trans::sqrt(&self.abs(), &eps)?;
            return Ok(Numeric::from(Complex::new(Self::zero(), im)));
        }
        Ok(Numeric::from(trans::sqrt(self, &eps)?))
    }

    /// Real cube root; total over the rationals.
    pub fn cbrt(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::root(self, 3, &eps)
    }

    /// Principal n-th root. Odd n keeps negative bases real; even n
    /// promotes them to Complex.
    pub fn root(&self, n: &Rational, eps: Option<&Rational>) -> NumResult<Numeric> {
        if !n.is_integer() {
            return Err(NumError::math("root degree must be an integer"));
        }
        let k = match n.to_i64() {
            Some(k) if k > 0 => k,
            _ => return Err(NumError::math("root degree out of range")),
        };
        let eps = config::resolve_epsilon(eps)?;
        if self.is_negative() && k % 2 == 0 {
            if k == 2 {
                let im = trans::sqrt(&self.abs(), &eps)?;
                return Ok(Numeric::from(Complex::new(Self::zero(), im)));
            }
            let z = Complex::from(self.clone());
            let w = Complex::from(Self::from_ratio_parts(BigInt::one(), BigInt::from(k)));
            return Ok(Numeric::from(z.power(&w, Some(&eps))?));
        }
        Ok(Numeric::from(trans::root(self, k, &eps)?))
    }

    // ========== Exponential and logarithmic ==========

    pub fn exp(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::exp(self, &eps))
    }

    /// Natural log. Zero is a pole; a negative argument promotes to
    /// ln|x| + i*pi (principal branch).
    pub fn ln(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("logarithm of zero"));
        }
        if self.is_negative() {
            let re = trans::ln(&self.abs(), &eps)?;
            let im = trans::pi(&eps);
            return Ok(Numeric::from(Complex::new(re, im)));
        }
        Ok(Numeric::from(trans::ln(self, &eps)?))
    }

    /// Base-10 log with the same domain policy as [`ln`](Self::ln).
    pub fn log(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("logarithm of zero"));
        }
        if self.is_negative() {
            let re = trans::log(&self.abs(), &eps)?;
            let im = trans::pi_over_ln10(&eps);
            return Ok(Numeric::from(Complex::new(re, im)));
        }
        Ok(Numeric::from(trans::log(self, &eps)?))
    }

    // ========== Trigonometric ==========

    pub fn sin(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::sin(self, &eps))
    }

    pub fn cos(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::cos(self, &eps))
    }

    pub fn tan(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::tan(self, &eps)
    }

    pub fn sec(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::sec(self, &eps)
    }

    pub fn csc(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::csc(self, &eps)
    }

    pub fn cot(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::cot(self, &eps)
    }

    /// Promotes to Complex outside [-1, 1].
    pub fn asin(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.abs() <= Self::one() {
            return Ok(Numeric::from(trans::asin(self, &eps)?));
        }
        Ok(Numeric::from(Complex::from(self.clone()).asin(Some(&eps))?))
    }

    /// Promotes to Complex outside [-1, 1].
    pub fn acos(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.abs() <= Self::one() {
            return Ok(Numeric::from(trans::acos(self, &eps)?));
        }
        Ok(Numeric::from(Complex::from(self.clone()).acos(Some(&eps))?))
    }

    pub fn atan(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::atan(self, &eps))
    }

    /// Range (0, pi); total over the rationals.
    pub fn acot(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::acot(self, &eps))
    }

    /// Pole at zero; promotes to Complex strictly inside the unit
    /// interval.
    pub fn asec(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("asec of zero"));
        }
        if self.abs() >= Self::one() {
            return Ok(Numeric::from(trans::asec(self, &eps)?));
        }
        Ok(Numeric::from(Complex::from(self.clone()).asec(Some(&eps))?))
    }

    /// Pole at zero; promotes to Complex strictly inside the unit
    /// interval.
    pub fn acsc(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("acsc of zero"));
        }
        if self.abs() >= Self::one() {
            return Ok(Numeric::from(trans::acsc(self, &eps)?));
        }
        Ok(Numeric::from(Complex::from(self.clone()).acsc(Some(&eps))?))
    }

    /// Quadrant-aware arctangent of self/x (self is the y coordinate).
    pub fn atan2(&self, x: &Rational, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::atan2(self, x, &eps))
    }

    /// sqrt(self^2 + y^2).
    pub fn hypot(&self, y: &Rational, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::hypot(self, y, &eps))
    }

    // ========== Hyperbolic ==========

    pub fn sinh(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::sinh(self, &eps))
    }

    pub fn cosh(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::cosh(self, &eps))
    }

    pub fn tanh(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::tanh(self, &eps)
    }

    pub fn coth(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::coth(self, &eps)
    }

    pub fn sech(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::sech(self, &eps)
    }

    pub fn csch(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        trans::csch(self, &eps)
    }

    pub fn asinh(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::asinh(self, &eps))
    }

    /// Real for x >= 1, Complex below.
    pub fn acosh(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self >= &Self::one() {
            return Ok(Numeric::from(trans::acosh(self, &eps)?));
        }
        Ok(Numeric::from(
            Complex::from(self.clone()).acosh(Some(&eps))?,
        ))
    }

    /// Real strictly inside (-1, 1), a pole at the endpoints, Complex
    /// outside.
    pub fn atanh(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        let mag = self.abs();
        if mag < Self::one() {
            return Ok(Numeric::from(trans::atanh(self, &eps)?));
        }
        if mag == Self::one() {
            return Err(NumError::math("atanh at a pole"));
        }
        Ok(Numeric::from(
            Complex::from(self.clone()).atanh(Some(&eps))?,
        ))
    }

    /// Real strictly outside [-1, 1], a pole at the endpoints, Complex
    /// inside (zero included: the reciprocal makes it a MathError).
    pub fn acoth(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        let mag = self.abs();
        if mag > Self::one() {
            return Ok(Numeric::from(trans::acoth(self, &eps)?));
        }
        if mag == Self::one() {
            return Err(NumError::math("acoth at a pole"));
        }
        Ok(Numeric::from(
            Complex::from(self.clone()).acoth(Some(&eps))?,
        ))
    }

    /// Real on (0, 1], a pole at zero, Complex elsewhere.
    pub fn asech(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("asech of zero"));
        }
        if self.is_positive() && self <= &Self::one() {
            return Ok(Numeric::from(trans::asech(self, &eps)?));
        }
        Ok(Numeric::from(
            Complex::from(self.clone()).asech(Some(&eps))?,
        ))
    }

    /// Total except the pole at zero.
    pub fn acsch(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("acsch of zero"));
        }
        trans::acsch(self, &eps)
    }

    // ========== Gudermannian ==========

    /// gd x = 2 atan(tanh(x/2)); real inputs stay real.
    pub fn gd(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::gd(self, &eps))
    }

    /// Inverse Gudermannian; promotes to Complex outside (-pi/2, pi/2)
    /// and fails at the poles.
    pub fn agd(&self, eps: Option<&Rational>) -> NumResult<Numeric> {
        let eps = config::resolve_epsilon(eps)?;
        trans::agd(self, &eps)
    }

    // ========== Constants ==========

    /// pi snapped to the eps grid; pi(10^-5) is exactly 314159/100000.
    pub fn pi(eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::pi(&eps))
    }

    // ========== Display ==========

    /// Renders under an explicit mode, ignoring the thread default.
    pub fn to_string_mode(&self, mode: DisplayMode) -> String {
        format::render(self, mode)
    }

    /// Exact `n/d` form, the serialization format.
    pub fn to_fraction_string(&self) -> String {
        format::render(self, DisplayMode::Fraction)
    }
}

// ========== Shift helpers ==========

fn shift_amount(amount: &Rational) -> NumResult<i64> {
    if !amount.is_integer() {
        return Err(NumError::argument("shift by a non-integer amount"));
    }
    match amount.to_i64() {
        Some(n) if n.unsigned_abs() < (1 << 31) => Ok(n),
        _ => Err(NumError::argument("shift by too many bits")),
    }
}

fn shift_magnitude(v: BigInt, n: i64) -> BigInt {
    let (sign, mag) = v.into_parts();
    let mag = if n >= 0 {
        mag << (n as usize)
    } else {
        mag >> ((-n) as usize)
    };
    BigInt::from_biguint(sign, mag)
}

fn flag(b: bool) -> Rational {
    if b {
        Rational::one()
    } else {
        Rational::zero()
    }
}

// ========== Trait Implementations ==========

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = config::with_current(|c| c.display);
        write!(f, "{}", format::render(self, mode))
    }
}

impl FromStr for Rational {
    type Err = NumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        format::parse(s)
    }
}

macro_rules! impl_from_machine_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Rational {
                fn from(n: $t) -> Self {
                    Self::from_integer(BigInt::from(n))
                }
            }
        )*
    };
}

impl_from_machine_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Self {
        Self::from_integer(n)
    }
}

impl TryFrom<f64> for Rational {
    type Error = NumError;

    /// Exact binary conversion: 0.5 becomes 1/2, 0.1 becomes the dyadic
    /// value the float actually holds.
    fn try_from(f: f64) -> Result<Self, Self::Error> {
        BigRational::from_float(f)
            .map(|inner| Self { inner })
            .ok_or_else(|| NumError::argument("non-finite float"))
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Rational {}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, other: &i64) -> bool {
        self.is_integer() && self.inner.numer().to_i64() == Some(*other)
    }
}

impl PartialEq<Rational> for i64 {
    fn eq(&self, other: &Rational) -> bool {
        other == self
    }
}

impl PartialEq<BigInt> for Rational {
    fn eq(&self, other: &BigInt) -> bool {
        self.is_integer() && self.inner.numer() == other
    }
}

impl PartialEq<&str> for Rational {
    /// An unparseable comparand is simply not equal.
    fn eq(&self, other: &&str) -> bool {
        match format::parse(other) {
            Ok(v) => *self == v,
            Err(_) => false,
        }
    }
}

impl PartialOrd<i64> for Rational {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        self.inner.partial_cmp(&BigRational::from_integer(BigInt::from(*other)))
    }
}

impl PartialOrd<BigInt> for Rational {
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        self.inner.partial_cmp(&BigRational::from_integer(other.clone()))
    }
}

impl PartialOrd<&str> for Rational {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        format::parse(other).ok().map(|v| self.cmp(&v))
    }
}

impl std::ops::Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational { inner: -self.inner }
    }
}

impl std::ops::Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            inner: -&self.inner,
        }
    }
}

macro_rules! impl_arith {
    ($imp:ident, $method:ident, $op:tt) => {
        impl std::ops::$imp for Rational {
            type Output = Rational;
            fn $method(self, rhs: Rational) -> Rational {
                Rational { inner: self.inner $op rhs.inner }
            }
        }

        impl std::ops::$imp<&Rational> for Rational {
            type Output = Rational;
            fn $method(self, rhs: &Rational) -> Rational {
                Rational { inner: self.inner $op &rhs.inner }
            }
        }

        impl std::ops::$imp<Rational> for &Rational {
            type Output = Rational;
            fn $method(self, rhs: Rational) -> Rational {
                Rational { inner: &self.inner $op rhs.inner }
            }
        }

        impl std::ops::$imp<&Rational> for &Rational {
            type Output = Rational;
            fn $method(self, rhs: &Rational) -> Rational {
                Rational { inner: &self.inner $op &rhs.inner }
            }
        }
    };
}

impl_arith!(Add, add, +);
impl_arith!(Sub, sub, -);
impl_arith!(Mul, mul, *);

impl Rem for Rational {
    type Output = Rational;

    fn rem(self, rhs: Rational) -> Rational {
        self.modulo(&rhs)
    }
}

impl Rem<&Rational> for &Rational {
    type Output = Rational;

    fn rem(self, rhs: &Rational) -> Rational {
        self.modulo(rhs)
    }
}

impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fraction_string())
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
