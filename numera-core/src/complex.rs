//! Exact complex numbers over [`Rational`] components.
//!
//! Arithmetic, conjugation and `norm` are exact. The transcendental
//! kernels mirror the real ones: each component of the result lands
//! within the call's epsilon of the true value, and both components are
//! snapped onto the epsilon grid so results are reproducible. Inverse
//! functions follow the principal branches (negative real cut for logs
//! and roots, the usual cuts outside [-1, 1] and [-i, i] for the arc
//! family). Quotient functions are exact ratios of snapped components
//! and report a pole when the denominator snaps onto zero.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_traits::{pow, One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{self, DisplayMode};
use crate::error::{NumError, NumResult};
use crate::rational::{Rational, Rounding};
use crate::trans;

/// An exact complex number, `re + im*i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    re: Rational,
    im: Rational,
}

impl Complex {
    // ========== Construction ==========

    pub fn new(re: Rational, im: Rational) -> Self {
        Self { re, im }
    }

    pub fn zero() -> Self {
        Self::new(Rational::zero(), Rational::zero())
    }

    pub fn one() -> Self {
        Self::new(Rational::one(), Rational::zero())
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Self::new(Rational::zero(), Rational::one())
    }

    /// Builds `r (cos theta + i sin theta)`, both parts within `eps`.
    pub fn from_polar(r: &Rational, theta: &Rational, eps: Option<&Rational>) -> NumResult<Self> {
        let eps = config::resolve_epsilon(eps)?;
        let rb = r.abs() + Rational::one();
        let b = shrink(&eps, 2).div_exact(&rb);
        let c = trans::cos(theta, &b);
        let s = trans::sin(theta, &b);
        Ok(Self::new(snap(&(r * &c), &eps), snap(&(r * &s), &eps)))
    }

    // ========== Accessors ==========

    pub fn re(&self) -> &Rational {
        &self.re
    }

    pub fn im(&self) -> &Rational {
        &self.im
    }

    pub fn into_parts(self) -> (Rational, Rational) {
        (self.re, self.im)
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    /// True when the imaginary part is zero.
    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    /// True for a nonzero value on the imaginary axis.
    pub fn is_imag(&self) -> bool {
        self.re.is_zero() && !self.im.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.im.is_zero() && self.re.is_integer()
    }

    /// Even and odd apply to real integer values only.
    pub fn is_even(&self) -> bool {
        self.im.is_zero() && self.re.is_even()
    }

    pub fn is_odd(&self) -> bool {
        self.im.is_zero() && self.re.is_odd()
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
        flag(self.is_real())
    }

    pub fn isimag(&self) -> Rational {
        flag(self.is_imag())
    }

    // ========== Exact operations ==========

    pub fn conj(&self) -> Complex {
        Complex::new(self.re.clone(), -&self.im)
    }

    /// Squared modulus `re^2 + im^2`, exactly.
    pub fn norm(&self) -> Rational {
        &(&self.re * &self.re) + &(&self.im * &self.im)
    }

    /// A zero divisor here is a `MathError`, unlike the rational layer's
    /// `DivisionByZero`.
    pub fn inverse(&self) -> NumResult<Complex> {
        let n = self.norm();
        if n.is_zero() {
            return Err(NumError::math("inverse of zero"));
        }
        Ok(Complex::new(
            self.re.div_exact(&n),
            (-&self.im).div_exact(&n),
        ))
    }

    pub fn checked_div(&self, rhs: &Complex) -> NumResult<Complex> {
        if rhs.is_zero() {
            return Err(NumError::math("division by zero"));
        }
        Ok(self * &rhs.inverse()?)
    }

    pub fn pow_int(&self, exp: i64) -> NumResult<Complex> {
        if exp == 0 {
            return Ok(Complex::one());
        }
        if self.is_zero() && exp < 0 {
            return Err(NumError::DivisionByZero);
        }
        let base = self.pow_unsigned(exp.unsigned_abs());
        if exp > 0 {
            return Ok(base);
        }
        base.inverse()
    }

    fn pow_unsigned(&self, mut e: u64) -> Complex {
        let mut base = self.clone();
        let mut acc = Complex::one();
        while e > 0 {
            if e & 1 == 1 {
                acc = &acc * &base;
            }
            base = &base * &base;
            e >>= 1;
        }
        acc
    }

    /// Rounds both components onto the `eps` grid.
    pub fn appr(&self, eps: Option<&Rational>, rounding: Rounding) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(Complex::new(
            self.re.snap_to(&eps, rounding),
            self.im.snap_to(&eps, rounding),
        ))
    }

    // ========== Modulus and argument ==========

    /// Modulus `|z|`. Exact on either axis, epsilon-bounded elsewhere.
    pub fn abs(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        if self.im.is_zero() {
            return Ok(self.re.abs());
        }
        if self.re.is_zero() {
            return Ok(self.im.abs());
        }
        Ok(trans::hypot(&self.re, &self.im, &eps))
    }

    /// Principal argument in (-pi, pi]; zero maps to zero.
    pub fn arg(&self, eps: Option<&Rational>) -> NumResult<Rational> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(trans::atan2(&self.im, &self.re, &eps))
    }

    // ========== Powers ==========

    pub fn power(&self, w: &Complex, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.power_with(w, &eps)
    }

    fn power_with(&self, w: &Complex, eps: &Rational) -> NumResult<Complex> {
        if w.is_zero() {
            return Ok(Complex::one());
        }
        if w.is_real() && w.re.is_integer() {
            let n = w
                .re
                .to_i64()
                .ok_or_else(|| NumError::math("power exponent too large"))?;
            return self.pow_int(n);
        }
        if self.is_zero() {
            if w.is_real() {
                return if w.re.is_positive() {
                    Ok(Complex::zero())
                } else {
                    Err(NumError::DivisionByZero)
                };
            }
            return Err(NumError::math("zero raised to a complex power"));
        }
        // exp(w ln z): a coarse magnitude pass bounds e^Re(w ln z) so the
        // fine budget can absorb the exponential growth
        let wb = w.span() + Rational::one();
        let coarse_b = Rational::one().div_exact(&(&wb * &Rational::from(4)));
        let u0 = w * &self.ln_with(&coarse_b)?;
        let a = u0.re.abs().ceil().numerator().to_u64().unwrap_or(u64::MAX) as usize;
        let r_bound = Rational::from_integer(pow(BigInt::from(4), a + 1));
        let b = shrink(eps, 5).div_exact(&(&r_bound * &wb));
        let u = w * &self.ln_with(&b)?;
        Ok(u.exp_with(eps))
    }

    /// Principal square root, real part nonnegative.
    pub fn sqrt(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(self.sqrt_with(&eps))
    }

    fn sqrt_with(&self, eps: &Rational) -> Complex {
        if self.is_zero() {
            return Complex::zero();
        }
        // sqrt((|z| + re)/2) and sqrt((|z| - re)/2) evaluated as floored
        // integer roots at scale 2^t, which stays stable for any modulus
        let b = shrink(eps, 3);
        let need = Rational::from(2).div_exact(&b).ceil();
        let t = need.numerator().bits() as usize;
        let ss = self.norm();
        let m = ((ss.numerator() << (4 * t)) / ss.denominator()).sqrt();
        let re_scaled = (self.re.numerator() << (2 * t)).div_floor(&self.re.denominator());
        let gamma2: BigInt = (&m + &re_scaled) >> 1;
        let delta2: BigInt = (&m - &re_scaled) >> 1;
        let gamma_scaled = if gamma2.is_negative() { BigInt::zero() } else { gamma2.sqrt() };
        let delta_scaled = if delta2.is_negative() { BigInt::zero() } else { delta2.sqrt() };
        let den = BigInt::one() << t;
        let gamma = Rational::from_ratio_parts(gamma_scaled, den.clone());
        let mut delta = Rational::from_ratio_parts(delta_scaled, den);
        if self.im.is_negative() {
            delta = -delta;
        }
        Complex::new(snap(&gamma, eps), snap(&delta, eps))
    }

    // ========== Exponential and logarithmic ==========

    pub fn exp(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(self.exp_with(&eps))
    }

    fn exp_with(&self, eps: &Rational) -> Complex {
        // e^(a+bi) = e^a (cos b + i sin b)
        let m = if self.re.is_positive() {
            growth_bound(&self.re)
        } else {
            Rational::from(4)
        };
        let b = shrink(eps, 4).div_exact(&m);
        let er = trans::exp(&self.re, &b);
        let c = trans::cos(&self.im, &b);
        let s = trans::sin(&self.im, &b);
        Complex::new(snap(&(&er * &c), eps), snap(&(&er * &s), eps))
    }

    pub fn ln(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.ln_with(&eps)
    }

    fn ln_with(&self, eps: &Rational) -> NumResult<Complex> {
        if self.is_zero() {
            return Err(NumError::math("logarithm of zero"));
        }
        // ln|z| = ln(norm)/2 with the exact squared modulus, so tiny and
        // huge moduli cost no extra precision
        let b = shrink(eps, 2);
        let re = trans::ln(&self.norm(), &b)?.div_exact(&Rational::from(2));
        let im = trans::atan2(&self.im, &self.re, &b);
        Ok(Complex::new(snap(&re, eps), snap(&im, eps)))
    }

    /// Base-10 logarithm with the same branch as [`ln`](Self::ln).
    pub fn log(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("logarithm of zero"));
        }
        let b = shrink(&eps, 3);
        let l = self.ln_with(&b)?;
        let scale = l.span().div_exact(&Rational::from(2)) + Rational::one();
        let l10 = trans::ln(&Rational::from(10), &b.div_exact(&scale))?;
        Ok(Complex::new(
            snap(&l.re.div_exact(&l10), &eps),
            snap(&l.im.div_exact(&l10), &eps),
        ))
    }

    // ========== Circular ==========

    pub fn sin(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(self.sin_with(&eps))
    }

    pub fn cos(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(self.cos_with(&eps))
    }

    pub fn tan(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(self.sin_with(&eps), self.cos_with(&eps), "tan")
    }

    pub fn sec(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(Complex::one(), self.cos_with(&eps), "sec")
    }

    pub fn csc(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(Complex::one(), self.sin_with(&eps), "csc")
    }

    pub fn cot(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(self.cos_with(&eps), self.sin_with(&eps), "cot")
    }

    fn sin_with(&self, eps: &Rational) -> Complex {
        // sin(a+bi) = sin a cosh b + i cos a sinh b
        let b = shrink(eps, 4).div_exact(&growth_bound(&self.im));
        let sa = trans::sin(&self.re, &b);
        let ca = trans::cos(&self.re, &b);
        let sh = trans::sinh(&self.im, &b);
        let ch = trans::cosh(&self.im, &b);
        Complex::new(snap(&(&sa * &ch), eps), snap(&(&ca * &sh), eps))
    }

    fn cos_with(&self, eps: &Rational) -> Complex {
        // cos(a+bi) = cos a cosh b - i sin a sinh b
        let b = shrink(eps, 4).div_exact(&growth_bound(&self.im));
        let sa = trans::sin(&self.re, &b);
        let ca = trans::cos(&self.re, &b);
        let sh = trans::sinh(&self.im, &b);
        let ch = trans::cosh(&self.im, &b);
        Complex::new(snap(&(&ca * &ch), eps), snap(&(-(&sa * &sh)), eps))
    }

    // ========== Inverse circular ==========

    pub fn asin(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.asin_with(&eps)
    }

    pub fn acos(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.acos_with(&eps)
    }

    pub fn atan(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.atan_with(&eps)
    }

    pub fn acot(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Ok(Complex::new(
                trans::acot(&Rational::zero(), &eps),
                Rational::zero(),
            ));
        }
        self.inverse()?.atan_with(&eps)
    }

    pub fn asec(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("asec of zero"));
        }
        self.inverse()?.acos_with(&eps)
    }

    pub fn acsc(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("acsc of zero"));
        }
        self.inverse()?.asin_with(&eps)
    }

    fn asin_with(&self, eps: &Rational) -> NumResult<Complex> {
        // asin z = -i ln(iz + sqrt(1 - z^2)); the identity
        // (iz + w)(iz - w) = -1 keeps the log argument at least
        // 1/(3|z| + 2) in magnitude
        let amp = Rational::from(3) * self.span() + Rational::from(2);
        let b = shrink(eps, 4).div_exact(&amp);
        let w = (&Complex::one() - &(self * self)).sqrt_with(&b);
        let arg = &self.mul_i() + &w;
        let l = arg.ln_with(&b)?;
        Ok(l.mul_neg_i().snapped(eps))
    }

    fn acos_with(&self, eps: &Rational) -> NumResult<Complex> {
        let b = shrink(eps, 2);
        let a = self.asin_with(&b)?;
        let hp = trans::pi(&b).div_exact(&Rational::from(2));
        Ok(Complex::new(snap(&(&hp - &a.re), eps), snap(&(-&a.im), eps)))
    }

    fn atan_with(&self, eps: &Rational) -> NumResult<Complex> {
        // atan z = (i/2)(ln(1 - iz) - ln(1 + iz)), poles at +-i
        let iz = self.mul_i();
        let p = &Complex::one() - &iz;
        let q = &Complex::one() + &iz;
        if p.is_zero() || q.is_zero() {
            return Err(NumError::math("atan at a pole"));
        }
        let b = shrink(eps, 2);
        let d = &p.ln_with(&b)? - &q.ln_with(&b)?;
        Ok(d.mul_i().half().snapped(eps))
    }

    // ========== Hyperbolic ==========

    pub fn sinh(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(self.sinh_with(&eps))
    }

    pub fn cosh(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        Ok(self.cosh_with(&eps))
    }

    pub fn tanh(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(self.sinh_with(&eps), self.cosh_with(&eps), "tanh")
    }

    pub fn coth(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(self.cosh_with(&eps), self.sinh_with(&eps), "coth")
    }

    pub fn sech(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(Complex::one(), self.cosh_with(&eps), "sech")
    }

    pub fn csch(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        pole_div(Complex::one(), self.sinh_with(&eps), "csch")
    }

    fn sinh_with(&self, eps: &Rational) -> Complex {
        // sinh(a+bi) = sinh a cos b + i cosh a sin b
        let b = shrink(eps, 4).div_exact(&growth_bound(&self.re));
        let sh = trans::sinh(&self.re, &b);
        let ch = trans::cosh(&self.re, &b);
        let sb = trans::sin(&self.im, &b);
        let cb = trans::cos(&self.im, &b);
        Complex::new(snap(&(&sh * &cb), eps), snap(&(&ch * &sb), eps))
    }

    fn cosh_with(&self, eps: &Rational) -> Complex {
        // cosh(a+bi) = cosh a cos b + i sinh a sin b
        let b = shrink(eps, 4).div_exact(&growth_bound(&self.re));
        let sh = trans::sinh(&self.re, &b);
        let ch = trans::cosh(&self.re, &b);
        let sb = trans::sin(&self.im, &b);
        let cb = trans::cos(&self.im, &b);
        Complex::new(snap(&(&ch * &cb), eps), snap(&(&sh * &sb), eps))
    }

    // ========== Inverse hyperbolic ==========

    pub fn asinh(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.asinh_with(&eps)
    }

    pub fn acosh(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.acosh_with(&eps)
    }

    pub fn atanh(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        self.atanh_with(&eps)
    }

    pub fn acoth(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("acoth of zero"));
        }
        self.inverse()?.atanh_with(&eps)
    }

    pub fn asech(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("asech of zero"));
        }
        self.inverse()?.acosh_with(&eps)
    }

    pub fn acsch(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        let eps = config::resolve_epsilon(eps)?;
        if self.is_zero() {
            return Err(NumError::math("acsch of zero"));
        }
        self.inverse()?.asinh_with(&eps)
    }

    fn asinh_with(&self, eps: &Rational) -> NumResult<Complex> {
        // asinh z = ln(z + sqrt(z^2 + 1)); (z + w)(w - z) = 1 bounds the
        // log argument the same way asin's identity does
        let amp = Rational::from(3) * self.span() + Rational::from(2);
        let b = shrink(eps, 4).div_exact(&amp);
        let w = (&(self * self) + &Complex::one()).sqrt_with(&b);
        let l = (self + &w).ln_with(&b)?;
        Ok(l.snapped(eps))
    }

    fn acosh_with(&self, eps: &Rational) -> NumResult<Complex> {
        // acosh z = ln(z + sqrt(z-1) sqrt(z+1)); the split roots pick the
        // branch that agrees with the real function on x >= 1, and the
        // argument magnitude never drops below 1
        let amp = self.span() + Rational::from(2);
        let b = shrink(eps, 4).div_exact(&amp);
        let wm = (self - &Complex::one()).sqrt_with(&b);
        let wp = (self + &Complex::one()).sqrt_with(&b);
        let l = (self + &(&wm * &wp)).ln_with(&b)?;
        Ok(l.snapped(eps))
    }

    fn atanh_with(&self, eps: &Rational) -> NumResult<Complex> {
        // atanh z = (ln(1+z) - ln(1-z)) / 2, poles at +-1
        let p = &Complex::one() + self;
        let q = &Complex::one() - self;
        if p.is_zero() || q.is_zero() {
            return Err(NumError::math("atanh at a pole"));
        }
        let b = shrink(eps, 2);
        let d = &p.ln_with(&b)? - &q.ln_with(&b)?;
        Ok(d.half().snapped(eps))
    }

    // ========== Gudermannian ==========

    pub fn gd(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        // gd z = 2 atan(tanh(z/2))
        let eps = config::resolve_epsilon(eps)?;
        let half = shrink(&eps, 1);
        let h = self.half();
        let t = pole_div(h.sinh_with(&half), h.cosh_with(&half), "gd")?;
        Ok(t.atan_with(&half)?.double())
    }

    pub fn agd(&self, eps: Option<&Rational>) -> NumResult<Complex> {
        // agd z = 2 atanh(tan(z/2))
        let eps = config::resolve_epsilon(eps)?;
        let half = shrink(&eps, 1);
        let h = self.half();
        let t = pole_div(h.sin_with(&half), h.cos_with(&half), "agd")?;
        Ok(t.atanh_with(&half)?.double())
    }

    // ========== Small exact helpers ==========

    fn span(&self) -> Rational {
        self.re.abs() + self.im.abs()
    }

    fn mul_i(&self) -> Complex {
        Complex::new(-&self.im, self.re.clone())
    }

    fn mul_neg_i(&self) -> Complex {
        Complex::new(self.im.clone(), -&self.re)
    }

    fn half(&self) -> Complex {
        Complex::new(
            self.re.div_exact(&Rational::from(2)),
            self.im.div_exact(&Rational::from(2)),
        )
    }

    fn double(&self) -> Complex {
        Complex::new(&self.re + &self.re, &self.im + &self.im)
    }

    fn snapped(&self, eps: &Rational) -> Complex {
        Complex::new(snap(&self.re, eps), snap(&self.im, eps))
    }

    // ========== Rendering ==========

    pub fn to_string_mode(&self, mode: DisplayMode) -> String {
        self.compose(mode)
    }

    /// Exact form with fraction components, the serialization format.
    pub fn to_fraction_string(&self) -> String {
        self.compose(DisplayMode::Fraction)
    }

    fn compose(&self, mode: DisplayMode) -> String {
        if self.im.is_zero() {
            return self.re.to_string_mode(mode);
        }
        let imag = imaginary_term(&self.im.abs(), mode);
        if self.re.is_zero() {
            return if self.im.is_negative() {
                format!("-{imag}")
            } else {
                imag
            };
        }
        let sep = if self.im.is_negative() { '-' } else { '+' };
        format!("{}{}{}", self.re.to_string_mode(mode), sep, imag)
    }
}

fn flag(b: bool) -> Rational {
    if b {
        Rational::one()
    } else {
        Rational::zero()
    }
}

fn snap(x: &Rational, eps: &Rational) -> Rational {
    x.snap_to(eps, Rounding::Nearest)
}

fn shrink(eps: &Rational, k: u32) -> Rational {
    eps.div_exact(&Rational::from_integer(BigInt::one() << (k as usize)))
}

/// 4^(ceil|x| + 1), an upper bound for e^|x| used to scale budgets.
fn growth_bound(x: &Rational) -> Rational {
    let a = x.abs().ceil().numerator().to_u64().unwrap_or(u64::MAX) as usize;
    Rational::from_integer(pow(BigInt::from(4), a + 1))
}

fn pole_div(num: Complex, den: Complex, what: &str) -> NumResult<Complex> {
    if den.is_zero() {
        return Err(NumError::math(format!("{what} at a pole")));
    }
    num.checked_div(&den)
}

/// The `i` binds to the numerator: 2/5 prints as `2i/5`.
fn imaginary_term(v: &Rational, mode: DisplayMode) -> String {
    let s = v.to_string_mode(mode);
    match s.split_once('/') {
        Some((n, d)) => format!("{n}i/{d}"),
        None => format!("{s}i"),
    }
}

// ========== Operators ==========

impl Add<&Complex> for &Complex {
    type Output = Complex;

    fn add(self, rhs: &Complex) -> Complex {
        Complex::new(&self.re + &rhs.re, &self.im + &rhs.im)
    }
}

impl Sub<&Complex> for &Complex {
    type Output = Complex;

    fn sub(self, rhs: &Complex) -> Complex {
        Complex::new(&self.re - &rhs.re, &self.im - &rhs.im)
    }
}

impl Mul<&Complex> for &Complex {
    type Output = Complex;

    fn mul(self, rhs: &Complex) -> Complex {
        let re = &(&self.re * &rhs.re) - &(&self.im * &rhs.im);
        let im = &(&self.re * &rhs.im) + &(&self.im * &rhs.re);
        Complex::new(re, im)
    }
}

macro_rules! forward_complex_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Complex> for Complex {
            type Output = Complex;

            fn $method(self, rhs: Complex) -> Complex {
                $imp::$method(&self, &rhs)
            }
        }

        impl $imp<&Complex> for Complex {
            type Output = Complex;

            fn $method(self, rhs: &Complex) -> Complex {
                $imp::$method(&self, rhs)
            }
        }

        impl $imp<Complex> for &Complex {
            type Output = Complex;

            fn $method(self, rhs: Complex) -> Complex {
                $imp::$method(self, &rhs)
            }
        }
    };
}

forward_complex_binop!(Add, add);
forward_complex_binop!(Sub, sub);
forward_complex_binop!(Mul, mul);

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl Neg for &Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-&self.re, -&self.im)
    }
}

// ========== Conversions ==========

impl From<Rational> for Complex {
    fn from(re: Rational) -> Complex {
        Complex::new(re, Rational::zero())
    }
}

impl From<BigInt> for Complex {
    fn from(n: BigInt) -> Complex {
        Complex::from(Rational::from(n))
    }
}

macro_rules! impl_complex_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Complex {
            fn from(v: $t) -> Complex {
                Complex::from(Rational::from(v))
            }
        }
    )*};
}

impl_complex_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl PartialEq<Rational> for Complex {
    fn eq(&self, other: &Rational) -> bool {
        self.im.is_zero() && self.re == *other
    }
}

impl PartialEq<i64> for Complex {
    fn eq(&self, other: &i64) -> bool {
        self.im.is_zero() && self.re == *other
    }
}

// ========== Text ==========

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = config::with_current(|c| c.display);
        write!(f, "{}", self.compose(mode))
    }
}

impl FromStr for Complex {
    type Err = NumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(bad(s));
        }
        if let Some(k) = split_point(t) {
            let re: Rational = t[..k].parse()?;
            let im = parse_imaginary(&t[k..], s)?;
            return Ok(Complex::new(re, im));
        }
        Ok(Complex::new(Rational::zero(), parse_imaginary(t, s)?))
    }
}

fn bad(s: &str) -> NumError {
    NumError::argument(format!("invalid complex literal: {s:?}"))
}

/// Index of the sign separating the real and imaginary terms, if both
/// are present. An exponent sign ("1e-5") does not split, except after a
/// radix prefix where `e` is an ordinary digit ("0x1e+2i").
fn split_point(t: &str) -> Option<usize> {
    let bytes = t.as_bytes();
    for k in (1..bytes.len()).rev() {
        if bytes[k] != b'+' && bytes[k] != b'-' {
            continue;
        }
        let prev = bytes[k - 1];
        if (prev == b'e' || prev == b'E') && !has_radix_prefix(&t[..k]) {
            continue;
        }
        return Some(k);
    }
    None
}

fn has_radix_prefix(head: &str) -> bool {
    let h = head.strip_prefix(['+', '-']).unwrap_or(head);
    h.starts_with("0x") || h.starts_with("0b")
}

/// Parses "2i", "-2i", "2i/5", "2/5i", "i", "+i", "-i".
fn parse_imaginary(part: &str, orig: &str) -> NumResult<Rational> {
    let core = if let Some(k) = part.find("i/") {
        let mut t = String::with_capacity(part.len() - 1);
        t.push_str(&part[..k]);
        t.push_str(&part[k + 1..]);
        t
    } else if let Some(head) = part.strip_suffix('i') {
        head.to_string()
    } else {
        return Err(bad(orig));
    };
    match core.as_str() {
        "" | "+" => Ok(Rational::one()),
        "-" => Ok(-Rational::one()),
        _ => core.parse().map_err(|_| bad(orig)),
    }
}

impl Serialize for Complex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fraction_string())
    }
}

impl<'de> Deserialize<'de> for Complex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if let Ok(z) = s.parse::<Complex>() {
            return Ok(z);
        }
        s.parse::<Rational>()
            .map(Complex::from)
            .map_err(serde::de::Error::custom)
    }
}
