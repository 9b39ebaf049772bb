//! Epsilon-bounded transcendental kernels over exact rationals.
//!
//! Every function here follows one contract: compute a raw rational whose
//! distance from the true real value is a small fraction of `eps`, then
//! snap it to the nearest multiple of `eps`. Series tails and integer-root
//! scaling give hard error bounds, so the same argument and epsilon always
//! produce the same rational. Quotient functions (`tan`, `sec`, `coth`,
//! ...) are exact ratios of their snapped components, which keeps
//! identities like `cot x == cos x / sin x` exact and turns a component
//! that snaps onto zero into a pole error.

use num_bigint::BigInt;
use num_integer::Roots;
use num_traits::{pow, One, ToPrimitive};

use crate::complex::Complex;
use crate::error::{NumError, NumResult};
use crate::rational::{Rational, Rounding};
use crate::value::Numeric;

fn snap(x: &Rational, eps: &Rational) -> Rational {
    x.snap_to(eps, Rounding::Nearest)
}

/// eps / 2^k, the budget split used throughout this module.
fn shrink(eps: &Rational, k: u32) -> Rational {
    eps.div_exact(&Rational::from_integer(BigInt::one() << (k as usize)))
}

fn frac(n: i64, d: i64) -> Rational {
    Rational::from_ratio_parts(BigInt::from(n), BigInt::from(d))
}

fn compose_div(num: Rational, den: Rational, what: &str) -> NumResult<Rational> {
    if den.is_zero() {
        return Err(NumError::math(format!("{what} at a pole")));
    }
    Ok(num.div_exact(&den))
}

// ========== Constants ==========

pub(crate) fn pi(eps: &Rational) -> Rational {
    snap(&pi_raw(&shrink(eps, 5)), eps)
}

pub(crate) fn pi_over_ln10(eps: &Rational) -> Rational {
    let b = shrink(eps, 6);
    let quot = pi_raw(&b).div_exact(&ln_raw(&Rational::from(10), &b));
    snap(&quot, eps)
}

// ========== Exponential and logarithmic ==========

pub(crate) fn exp(x: &Rational, eps: &Rational) -> Rational {
    snap(&exp_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn ln(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    if x.is_zero() {
        return Err(NumError::math("logarithm of zero"));
    }
    if x.is_negative() {
        return Err(NumError::math("logarithm of a negative value"));
    }
    Ok(snap(&ln_raw(x, &shrink(eps, 5)), eps))
}

pub(crate) fn log(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    if x.is_zero() {
        return Err(NumError::math("logarithm of zero"));
    }
    if x.is_negative() {
        return Err(NumError::math("logarithm of a negative value"));
    }
    let b = shrink(eps, 6);
    let lx = ln_raw(x, &b);
    // ln 10 must be good to lx's own scale or the quotient drifts
    let scale = lx.abs().div_exact(&Rational::from(2)) + Rational::one();
    let l10 = ln_raw(&Rational::from(10), &b.div_exact(&scale));
    Ok(snap(&lx.div_exact(&l10), eps))
}

// ========== Powers and roots ==========

pub(crate) fn sqrt(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    root(x, 2, eps)
}

/// Principal n-th root for n >= 1; odd n keeps negative bases real.
pub(crate) fn root(x: &Rational, n: i64, eps: &Rational) -> NumResult<Rational> {
    if n <= 0 {
        return Err(NumError::math("root degree out of range"));
    }
    let deg = u32::try_from(n).map_err(|_| NumError::math("root degree out of range"))?;
    if x.is_negative() {
        if deg % 2 == 0 {
            return Err(NumError::math("even root of a negative value"));
        }
        return Ok(-root(&x.abs(), n, eps)?);
    }
    if x.is_zero() {
        return Ok(Rational::zero());
    }
    // exact roots are exact answers, wherever they sit on the grid
    if let Some(exact) = exact_root(x, deg) {
        return Ok(exact);
    }
    Ok(snap(&root_raw(x, deg, &shrink(eps, 5)), eps))
}

/// x^(p/q) for a positive base and reduced fraction p/q with q >= 2.
pub(crate) fn power(x: &Rational, p: i64, q: i64, eps: &Rational) -> NumResult<Rational> {
    debug_assert!(x.is_positive() && q >= 2);
    if p.unsigned_abs() <= 16 {
        // small numerators go through one exact integer power and a
        // single root, which carries the whole error bound
        let base = x.pow_int(p)?;
        return root(&base, q, eps);
    }
    let w = Rational::from_ratio_parts(BigInt::from(p), BigInt::from(q));
    let wb = w.abs() + Rational::one();
    // coarse magnitude pass first: the fine budgets below must absorb
    // e^(w ln x), so bound it before committing to a precision
    let coarse_b = Rational::one().div_exact(&(&wb * &Rational::from(4)));
    let u_mag = (&w * &ln_raw(x, &coarse_b)).abs();
    let a = u_mag.ceil().numerator().to_u64().unwrap_or(u64::MAX) as usize;
    let r_bound = Rational::from_integer(pow(BigInt::from(4), a + 1));
    let b = shrink(eps, 6);
    let lx = ln_raw(x, &b.div_exact(&(&r_bound * &wb)));
    let u = &w * &lx;
    Ok(snap(&exp_raw(&u, &b), eps))
}

// ========== Circular ==========

pub(crate) fn sin(x: &Rational, eps: &Rational) -> Rational {
    snap(&sin_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn cos(x: &Rational, eps: &Rational) -> Rational {
    snap(&cos_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn tan(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(sin(x, eps), cos(x, eps), "tan")
}

pub(crate) fn sec(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(Rational::one(), cos(x, eps), "sec")
}

pub(crate) fn csc(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(Rational::one(), sin(x, eps), "csc")
}

pub(crate) fn cot(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(cos(x, eps), sin(x, eps), "cot")
}

// ========== Inverse circular ==========

pub(crate) fn atan(x: &Rational, eps: &Rational) -> Rational {
    snap(&atan_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn acot(x: &Rational, eps: &Rational) -> Rational {
    snap(&acot_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn asin(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    if x.abs() > Rational::one() {
        return Err(NumError::math("asin outside [-1, 1]"));
    }
    Ok(snap(&asin_raw(x, &shrink(eps, 5)), eps))
}

pub(crate) fn acos(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    if x.abs() > Rational::one() {
        return Err(NumError::math("acos outside [-1, 1]"));
    }
    Ok(snap(&acos_raw(x, &shrink(eps, 5)), eps))
}

pub(crate) fn asec(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    let inv = x.inverse()?;
    Ok(snap(&acos_raw(&inv, &shrink(eps, 5)), eps))
}

pub(crate) fn acsc(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    let inv = x.inverse()?;
    Ok(snap(&asin_raw(&inv, &shrink(eps, 5)), eps))
}

/// Signed plane angle of the point (x, y), in (-pi, pi].
pub(crate) fn atan2(y: &Rational, x: &Rational, eps: &Rational) -> Rational {
    let b = shrink(eps, 5);
    let raw = if x.is_positive() {
        atan_raw(&y.div_exact(x), &b)
    } else if x.is_negative() {
        let base = atan_raw(&y.div_exact(x), &shrink(&b, 1));
        let p = pi_raw(&shrink(&b, 1));
        if y.is_negative() {
            base - p
        } else {
            base + p
        }
    } else if y.is_positive() {
        pi_raw(&b).div_exact(&Rational::from(2))
    } else if y.is_negative() {
        -pi_raw(&b).div_exact(&Rational::from(2))
    } else {
        return Rational::zero();
    };
    snap(&raw, eps)
}

pub(crate) fn hypot(x: &Rational, y: &Rational, eps: &Rational) -> Rational {
    // the sum of squares is exact, so one root carries the whole error
    let ss = &(x * x) + &(y * y);
    if ss.is_zero() {
        return Rational::zero();
    }
    snap(&root_raw(&ss, 2, &shrink(eps, 5)), eps)
}

// ========== Hyperbolic ==========

pub(crate) fn sinh(x: &Rational, eps: &Rational) -> Rational {
    snap(&sinh_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn cosh(x: &Rational, eps: &Rational) -> Rational {
    snap(&cosh_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn tanh(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(sinh(x, eps), cosh(x, eps), "tanh")
}

pub(crate) fn coth(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(cosh(x, eps), sinh(x, eps), "coth")
}

pub(crate) fn sech(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(Rational::one(), cosh(x, eps), "sech")
}

pub(crate) fn csch(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    compose_div(Rational::one(), sinh(x, eps), "csch")
}

// ========== Inverse hyperbolic ==========

pub(crate) fn asinh(x: &Rational, eps: &Rational) -> Rational {
    snap(&asinh_raw(x, &shrink(eps, 5)), eps)
}

pub(crate) fn acosh(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    if x < &Rational::one() {
        return Err(NumError::math("acosh below 1"));
    }
    Ok(snap(&acosh_raw(x, &shrink(eps, 5)), eps))
}

pub(crate) fn atanh(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    if x.abs() >= Rational::one() {
        return Err(NumError::math("atanh at a pole"));
    }
    Ok(snap(&atanh_raw(x, &shrink(eps, 5)), eps))
}

pub(crate) fn acoth(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    // acoth x = atanh(1/x), and |x| > 1 keeps the inverse inside (-1, 1)
    let inv = x.inverse()?;
    Ok(snap(&atanh_raw(&inv, &shrink(eps, 5)), eps))
}

pub(crate) fn asech(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    let inv = x.inverse()?;
    Ok(snap(&acosh_raw(&inv, &shrink(eps, 5)), eps))
}

pub(crate) fn acsch(x: &Rational, eps: &Rational) -> NumResult<Rational> {
    let inv = x.inverse()?;
    Ok(snap(&asinh_raw(&inv, &shrink(eps, 5)), eps))
}

// ========== Gudermannian ==========

pub(crate) fn gd(x: &Rational, eps: &Rational) -> Rational {
    // gd x = 2 atan(tanh(x/2))
    let b = shrink(eps, 5);
    let bb = shrink(&b, 2);
    let t = tanh_raw(&x.div_exact(&Rational::from(2)), &bb);
    snap(&(Rational::from(2) * atan_raw(&t, &bb)), eps)
}

/// Inverse Gudermannian, agd x = 2 atanh(tan(x/2)). While |tan(x/2)| < 1
/// the value is real; past that the principal branch picks up an
/// imaginary -pi (positive side) or +pi (negative side).
pub(crate) fn agd(x: &Rational, eps: &Rational) -> NumResult<Numeric> {
    let half_eps = shrink(eps, 1);
    let h = x.div_exact(&Rational::from(2));
    let s = sin(&h, &half_eps);
    let c = cos(&h, &half_eps);
    if c.is_zero() {
        return Err(NumError::math("agd at a pole"));
    }
    let t = s.div_exact(&c);
    let mag = t.abs();
    if mag < Rational::one() {
        let v = Rational::from(2) * atanh_raw(&t, &shrink(eps, 4));
        return Ok(Numeric::from(snap(&v, eps)));
    }
    if mag == Rational::one() {
        return Err(NumError::math("agd at a pole"));
    }
    // (1+t)/(t-1) is positive on both sides of the cut
    let num = Rational::one() + &t;
    let den = &t - &Rational::one();
    let re = ln(&num.div_exact(&den), eps)?;
    let im = pi(eps);
    let im = if t.is_positive() { -im } else { im };
    Ok(Numeric::from(Complex::new(re, im)))
}

// ========== Raw kernels ==========
//
// The `_raw` functions return unsnapped rationals whose absolute error
// is at most the `budget` argument. Callers split budgets with `shrink`
// so the documented public bound survives composition.

fn pi_raw(budget: &Rational) -> Rational {
    // Machin: pi = 16 atan(1/5) - 4 atan(1/239)
    let a = atan_series(&frac(1, 5), &shrink(budget, 5));
    let b = atan_series(&frac(1, 239), &shrink(budget, 3));
    frac(16, 1) * a - frac(4, 1) * b
}

fn atan_raw(x: &Rational, budget: &Rational) -> Rational {
    if x.is_negative() {
        return -atan_raw(&x.abs(), budget);
    }
    if x.is_zero() {
        return Rational::zero();
    }
    let b = shrink(budget, 2);
    if x > &Rational::one() {
        // atan x = pi/2 - atan(1/x)
        let inv = Rational::one().div_exact(x);
        return pi_raw(&b).div_exact(&Rational::from(2)) - atan_raw(&inv, &b);
    }
    if x > &frac(1, 2) {
        // atan x = pi/4 + atan((x-1)/(x+1)), pulled inside [-1/3, 0]
        let t = (x - &Rational::one()).div_exact(&(x + &Rational::one()));
        return pi_raw(&b).div_exact(&Rational::from(4)) + atan_raw(&t, &b);
    }
    // snapping the argument first keeps the series denominators bounded;
    // |atan'| <= 1 so the shift carries through unchanged
    let xs = x.snap_to(&b, Rounding::Zero);
    atan_series(&xs, &b)
}

fn acot_raw(x: &Rational, budget: &Rational) -> Rational {
    let b = shrink(budget, 2);
    pi_raw(&b).div_exact(&Rational::from(2)) - atan_raw(x, &b)
}

fn asin_raw(x: &Rational, budget: &Rational) -> Rational {
    // asin x = 2 atan(x / (1 + sqrt(1 - x^2)))
    let b = shrink(budget, 3);
    let s = root_raw(&(Rational::one() - &(x * x)), 2, &b);
    let t = x.div_exact(&(Rational::one() + &s));
    Rational::from(2) * atan_raw(&t, &b)
}

fn acos_raw(x: &Rational, budget: &Rational) -> Rational {
    let b = shrink(budget, 2);
    pi_raw(&b).div_exact(&Rational::from(2)) - asin_raw(x, &b)
}

fn sin_raw(x: &Rational, budget: &Rational) -> Rational {
    let b = shrink(budget, 2);
    let r = reduce_angle(x, &b);
    let rs = r.snap_to(&b, Rounding::Zero);
    sin_series(&rs, &b)
}

fn cos_raw(x: &Rational, budget: &Rational) -> Rational {
    let b = shrink(budget, 2);
    let r = reduce_angle(x, &b);
    let rs = r.snap_to(&b, Rounding::Zero);
    cos_series(&rs, &b)
}

/// Reduce mod 2 pi into roughly [-pi, pi]. The pi approximation is
/// refined with the size of the quotient so q * (pi error) stays inside
/// the budget.
fn reduce_angle(x: &Rational, budget: &Rational) -> Rational {
    if x.abs() <= Rational::from(3) {
        return x.clone();
    }
    let qbound = x.abs().ceil() + Rational::one();
    let fine = budget.div_exact(&(&qbound * &Rational::from(4)));
    let two_pi = pi_raw(&fine) * Rational::from(2);
    let q = x.div_exact(&two_pi).round();
    x - &(&q * &two_pi)
}

fn exp_raw(x: &Rational, budget: &Rational) -> Rational {
    if x.is_zero() {
        return Rational::one();
    }
    if x.is_negative() {
        let p = exp_raw(&x.abs(), &shrink(budget, 1));
        return Rational::one().div_exact(&p);
    }
    // halve into [0, 1/2], run the series, square back up; each squaring
    // at most triples the error against the running value, and the
    // per-stage snap keeps denominators on the working grid
    let mut halvings = 0usize;
    let mut y = x.clone();
    let half = frac(1, 2);
    while y > half {
        y = y.div_exact(&Rational::from(2));
        halvings += 1;
    }
    let a = x.ceil().numerator().to_u64().unwrap_or(u64::MAX) as usize;
    let factor = Rational::from_integer(pow(BigInt::from(3), halvings + 1))
        * Rational::from_integer(pow(BigInt::from(4), a + 1));
    let w = budget.div_exact(&factor);
    let ys = y.snap_to(&w, Rounding::Zero);
    let mut v = exp_series(&ys, &w);
    for _ in 0..halvings {
        v = (&v * &v).snap_to(&w, Rounding::Zero);
    }
    v
}

fn ln_raw(x: &Rational, budget: &Rational) -> Rational {
    debug_assert!(x.is_positive());
    // x = z * 2^k with z in [3/4, 3/2): ln x = ln z + k ln 2
    let (z, k) = normalize_pow2(x);
    let b = shrink(budget, 2);
    let mut acc = ln_near_one(&z, &b);
    if k != 0 {
        let kq = Rational::from(k);
        let lb = b.div_exact(&(kq.abs() + Rational::one()));
        acc = acc + &kq * &ln2_raw(&lb);
    }
    acc
}

fn normalize_pow2(x: &Rational) -> (Rational, i64) {
    let mut k = x.numerator().bits() as i64 - x.denominator().bits() as i64;
    let mut z = if k >= 0 {
        x.div_exact(&Rational::from_integer(BigInt::one() << (k as usize)))
    } else {
        x * &Rational::from_integer(BigInt::one() << ((-k) as usize))
    };
    // z sits in (1/2, 2); one step pulls it into [3/4, 3/2)
    if z < frac(3, 4) {
        z = &z * &Rational::from(2);
        k -= 1;
    } else if z >= frac(3, 2) {
        z = z.div_exact(&Rational::from(2));
        k += 1;
    }
    (z, k)
}

fn ln_near_one(z: &Rational, budget: &Rational) -> Rational {
    // ln z = 2 atanh((z-1)/(z+1)); |t| <= 1/5 on [3/4, 3/2)
    let t = (z - &Rational::one()).div_exact(&(z + &Rational::one()));
    let b = shrink(budget, 3);
    let ts = t.snap_to(&b, Rounding::Zero);
    Rational::from(2) * atanh_series(&ts, &b)
}

fn ln2_raw(budget: &Rational) -> Rational {
    // ln 2 = 2 atanh(1/3)
    Rational::from(2) * atanh_series(&frac(1, 3), &shrink(budget, 2))
}

fn sinh_raw(x: &Rational, budget: &Rational) -> Rational {
    if x.is_negative() {
        return -sinh_raw(&x.abs(), budget);
    }
    let e = exp_raw(x, &shrink(budget, 1));
    (&e - &Rational::one().div_exact(&e)).div_exact(&Rational::from(2))
}

fn cosh_raw(x: &Rational, budget: &Rational) -> Rational {
    let e = exp_raw(&x.abs(), &shrink(budget, 1));
    (&e + &Rational::one().div_exact(&e)).div_exact(&Rational::from(2))
}

fn tanh_raw(x: &Rational, budget: &Rational) -> Rational {
    if x.is_negative() {
        return -tanh_raw(&x.abs(), budget);
    }
    // tanh x = (e^2x - 1) / (e^2x + 1), and d/dE stays below 1 for E >= 1
    let e = exp_raw(x, &shrink(budget, 1));
    let e2 = &e * &e;
    (&e2 - &Rational::one()).div_exact(&(&e2 + &Rational::one()))
}

fn asinh_raw(x: &Rational, budget: &Rational) -> Rational {
    if x.is_negative() {
        return -asinh_raw(&x.abs(), budget);
    }
    // asinh x = ln(x + sqrt(x^2 + 1)), argument >= 1 once x >= 0
    let b = shrink(budget, 2);
    let s = root_raw(&(&(x * x) + &Rational::one()), 2, &b);
    ln_raw(&(x + &s), &b)
}

fn acosh_raw(x: &Rational, budget: &Rational) -> Rational {
    let b = shrink(budget, 2);
    let s = root_raw(&(&(x * x) - &Rational::one()), 2, &b);
    ln_raw(&(x + &s), &b)
}

fn atanh_raw(x: &Rational, budget: &Rational) -> Rational {
    // atanh x = ln((1+x)/(1-x)) / 2 with an exact rational argument,
    // which stays stable all the way out to the poles
    let arg = (Rational::one() + x).div_exact(&(Rational::one() - x));
    ln_raw(&arg, &shrink(budget, 1)).div_exact(&Rational::from(2))
}

fn root_raw(x: &Rational, n: u32, budget: &Rational) -> Rational {
    debug_assert!(!x.is_negative());
    if let Some(exact) = exact_root(x, n) {
        return exact;
    }
    // scale by s = 2^t with s >= 2/budget; the floored integer root of
    // floor(x s^n) is then within 1/s of the true root
    let t = grid_bits(budget);
    let m = (x.numerator() << (t * n as usize)) / x.denominator();
    let r = m.nth_root(n);
    Rational::from_ratio_parts(r, BigInt::one() << t)
}

fn exact_root(x: &Rational, n: u32) -> Option<Rational> {
    let rn = x.numerator().nth_root(n);
    if pow(rn.clone(), n as usize) != x.numerator() {
        return None;
    }
    let rd = x.denominator().nth_root(n);
    if pow(rd.clone(), n as usize) != x.denominator() {
        return None;
    }
    Some(Rational::from_ratio_parts(rn, rd))
}

/// Smallest t with 2^t >= 2/budget.
fn grid_bits(budget: &Rational) -> usize {
    let need = Rational::from(2).div_exact(budget).ceil();
    need.numerator().bits() as usize
}

// ========== Series ==========

/// atan by alternating Taylor terms; the tail is below the first
/// omitted term. Callers keep |x| <= 1/2 so it converges briskly.
fn atan_series(x: &Rational, budget: &Rational) -> Rational {
    let xx = x * x;
    let mut power = x.clone();
    let mut sum = Rational::zero();
    let mut k = 0i64;
    loop {
        let contrib = power.div_exact(&Rational::from(2 * k + 1));
        sum = if k % 2 == 0 { &sum + &contrib } else { &sum - &contrib };
        power = &power * &xx;
        if power.abs().div_exact(&Rational::from(2 * k + 3)) <= *budget {
            return sum;
        }
        k += 1;
    }
}

/// atanh by same-sign Taylor terms, for |x| <= 1/2 only: the geometric
/// tail ratio is then at most 1/4 and twice the next term bounds it.
fn atanh_series(x: &Rational, budget: &Rational) -> Rational {
    let xx = x * x;
    let mut power = x.clone();
    let mut sum = Rational::zero();
    let mut k = 0i64;
    loop {
        sum = &sum + &power.div_exact(&Rational::from(2 * k + 1));
        power = &power * &xx;
        let next = power.abs().div_exact(&Rational::from(2 * k + 3));
        if &next + &next <= *budget {
            return sum;
        }
        k += 1;
    }
}

fn sin_series(x: &Rational, budget: &Rational) -> Rational {
    let xx = x * x;
    let mut term = x.clone();
    let mut sum = Rational::zero();
    let mut k = 0i64;
    loop {
        sum = &sum + &term;
        let next_denom = Rational::from((2 * k + 2) * (2 * k + 3));
        term = -(&term * &xx).div_exact(&next_denom);
        k += 1;
        // the tail bound needs the terms to be shrinking already
        if term.abs() <= *budget && xx <= next_denom {
            return sum;
        }
    }
}

fn cos_series(x: &Rational, budget: &Rational) -> Rational {
    let xx = x * x;
    let mut term = Rational::one();
    let mut sum = Rational::zero();
    let mut k = 0i64;
    loop {
        sum = &sum + &term;
        let next_denom = Rational::from((2 * k + 1) * (2 * k + 2));
        term = -(&term * &xx).div_exact(&next_denom);
        k += 1;
        if term.abs() <= *budget && xx <= next_denom {
            return sum;
        }
    }
}

fn exp_series(x: &Rational, budget: &Rational) -> Rational {
    // plain Taylor on [0, 1/2]; term ratio <= 1/2, tail <= twice the
    // next term
    let mut term = Rational::one();
    let mut sum = Rational::zero();
    let mut j = 1i64;
    loop {
        sum = &sum + &term;
        term = (&term * x).div_exact(&Rational::from(j));
        j += 1;
        if &term + &term <= *budget {
            return sum;
        }
    }
}
