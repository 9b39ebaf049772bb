//! Literal rendering and parsing for rationals.
//!
//! Rendering follows the display mode: exact fraction, truncated integer,
//! fixed-point real, scientific, or base-prefixed digits. Real and
//! scientific renderings of non-terminating values are rounded to twenty
//! digits and carry a leading `~`; every other mode round-trips through
//! `parse`.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{pow, One, Zero};

use crate::config::DisplayMode;
use crate::error::{NumError, NumResult};
use crate::rational::Rational;

/// Digit count for inexact real/scientific renderings.
const DISPLAY_DIGITS: usize = 20;

/// Exponents past this would allocate absurd powers of ten.
const MAX_EXPONENT: i64 = 1_000_000;

// ========== Rendering ==========

pub(crate) fn render(q: &Rational, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Fraction => fraction(q),
        DisplayMode::Integer => integer(q),
        DisplayMode::Real => real(q),
        DisplayMode::Scientific => scientific(q),
        DisplayMode::Hex => based(q, 16),
        DisplayMode::Octal => based(q, 8),
        DisplayMode::Binary => based(q, 2),
    }
}

fn fraction(q: &Rational) -> String {
    if q.is_integer() {
        q.numerator().to_string()
    } else {
        format!("{}/{}", q.numerator(), q.denominator())
    }
}

fn integer(q: &Rational) -> String {
    if q.is_integer() {
        q.numerator().to_string()
    } else {
        format!("~{}", q.trunc().numerator())
    }
}

/// Fractional digit count of a terminating decimal expansion, or `None`.
///
/// A reduced fraction terminates exactly when the denominator is of the
/// form 2^a * 5^b; the expansion then needs max(a, b) digits and its last
/// digit is nonzero.
fn terminating_digits(den: &BigInt) -> Option<usize> {
    let mut d = den.magnitude().clone();
    let mut twos = 0usize;
    while d.is_even() {
        d >>= 1;
        twos += 1;
    }
    let five = BigUint::from(5u32);
    let mut fives = 0usize;
    while (&d % &five).is_zero() {
        d = d / &five;
        fives += 1;
    }
    if d.is_one() {
        Some(twos.max(fives))
    } else {
        None
    }
}

fn real(q: &Rational) -> String {
    let sign = if q.is_negative() { "-" } else { "" };
    match terminating_digits(&q.denominator()) {
        Some(0) => format!("{}{}", sign, q.numerator().magnitude()),
        Some(k) => {
            let scaled =
                q.numerator().magnitude() * pow(BigUint::from(10u32), k) / q.denominator().magnitude();
            format!("{}{}", sign, place_point(&scaled.to_string(), k))
        }
        None => {
            let scaled = (q.abs() * ten_pow(DISPLAY_DIGITS as i64)).round();
            format!(
                "~{}{}",
                sign,
                place_point(&scaled.numerator().to_string(), DISPLAY_DIGITS)
            )
        }
    }
}

/// Inserts a decimal point `k` digits from the right, zero-padding as
/// needed. The caller trims nothing: exact expansions never end in zero
/// and inexact ones keep all their digits.
fn place_point(digits: &str, k: usize) -> String {
    let padded = if digits.len() > k {
        digits.to_string()
    } else {
        format!("{}{}", "0".repeat(k + 1 - digits.len()), digits)
    };
    let split = padded.len() - k;
    format!("{}.{}", &padded[..split], &padded[split..])
}

fn scientific(q: &Rational) -> String {
    if q.is_zero() {
        return "0".to_string();
    }
    let sign = if q.is_negative() { "-" } else { "" };
    let mag = q.abs();
    let (digits, exp, exact) = match terminating_digits(&q.denominator()) {
        Some(k) => {
            let scaled =
                q.numerator().magnitude() * pow(BigUint::from(10u32), k) / q.denominator().magnitude();
            let full = scaled.to_string();
            let exp = full.len() as i64 - 1 - k as i64;
            (full.trim_end_matches('0').to_string(), exp, true)
        }
        None => {
            let e = dec_exponent(&mag);
            let mut scaled = (&mag * ten_pow(DISPLAY_DIGITS as i64 - 1 - e)).round();
            let mut e = e;
            // rounding can carry into an extra digit
            if scaled.numerator().to_string().len() > DISPLAY_DIGITS {
                scaled = (&mag * ten_pow(DISPLAY_DIGITS as i64 - 2 - e)).round();
                e += 1;
            }
            (scaled.numerator().to_string(), e, false)
        }
    };
    let mantissa = if digits.len() == 1 {
        digits
    } else {
        format!("{}.{}", &digits[..1], &digits[1..])
    };
    let tilde = if exact { "" } else { "~" };
    format!("{tilde}{sign}{mantissa}e{exp}")
}

/// Largest e with 10^e <= q, for q > 0.
fn dec_exponent(q: &Rational) -> i64 {
    // bit-length estimate, then exact adjustment
    let mut e = (q.numerator().bits() as i64 - q.denominator().bits() as i64) * 30103 / 100000;
    while q < &ten_pow(e) {
        e -= 1;
    }
    while q >= &ten_pow(e + 1) {
        e += 1;
    }
    e
}

fn ten_pow(e: i64) -> Rational {
    let p = pow(BigInt::from(10), e.unsigned_abs() as usize);
    if e >= 0 {
        Rational::from(p)
    } else {
        Rational::from_ratio_parts(BigInt::one(), p)
    }
}

fn based(q: &Rational, radix: u32) -> String {
    if q.is_zero() {
        return "0".to_string();
    }
    let sign = if q.is_negative() { "-" } else { "" };
    let num = q.numerator().magnitude().to_str_radix(radix);
    if q.is_integer() {
        return format!("{}{}", sign, with_prefix(&num, radix));
    }
    let den = q.denominator().magnitude().to_str_radix(radix);
    format!("{}{}/{}", sign, num, with_prefix(&den, radix))
}

fn with_prefix(digits: &str, radix: u32) -> String {
    match radix {
        16 => format!("0x{digits}"),
        8 => format!("0{digits}"),
        2 => format!("0b{digits}"),
        _ => digits.to_string(),
    }
}

// ========== Parsing ==========

/// Parses every form `render` can emit except the lossy `~` ones, plus
/// plain decimals with exponents: "42", "-3/4", "0.05", "1.5e10", "5e-2",
/// "0x2a", "052", "0b101010", "1/0x14".
pub(crate) fn parse(s: &str) -> NumResult<Rational> {
    let t = s.trim();
    let (neg, rest) = match t.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    if rest.is_empty() {
        return Err(bad(s));
    }
    let v = match rest.split_once('/') {
        Some((num, den)) => parse_fraction(num, den, s)?,
        None => parse_term(rest, s)?,
    };
    Ok(if neg { -v } else { v })
}

fn parse_fraction(num: &str, den: &str, orig: &str) -> NumResult<Rational> {
    if num.is_empty() || den.is_empty() {
        return Err(bad(orig));
    }
    let (den_base, den_digits) = split_base(den);
    let d = BigInt::parse_bytes(den_digits.as_bytes(), den_base).ok_or_else(|| bad(orig))?;
    // a bare numerator is written in the denominator's base
    let n = match split_base_explicit(num) {
        Some((base, digits)) => BigInt::parse_bytes(digits.as_bytes(), base),
        None => BigInt::parse_bytes(num.as_bytes(), den_base),
    }
    .ok_or_else(|| bad(orig))?;
    if d.is_zero() {
        return Err(NumError::DivisionByZero);
    }
    Rational::new(n, d)
}

fn parse_term(t: &str, orig: &str) -> NumResult<Rational> {
    if let Some((base, digits)) = split_base_explicit(t) {
        return BigInt::parse_bytes(digits.as_bytes(), base)
            .map(Rational::from)
            .ok_or_else(|| bad(orig));
    }
    if t.contains(['.', 'e', 'E']) {
        return parse_decimal(t, orig);
    }
    if t.starts_with('0') && t.len() > 1 {
        // leading zero marks octal
        return BigInt::parse_bytes(t[1..].as_bytes(), 8)
            .map(Rational::from)
            .ok_or_else(|| bad(orig));
    }
    BigInt::parse_bytes(t.as_bytes(), 10)
        .map(Rational::from)
        .ok_or_else(|| bad(orig))
}

/// Splits an explicit base prefix off, or `None` for plain digits.
fn split_base_explicit(t: &str) -> Option<(u32, &str)> {
    if let Some(d) = t.strip_prefix("0x") {
        return Some((16, d));
    }
    if let Some(d) = t.strip_prefix("0b") {
        return Some((2, d));
    }
    if t.starts_with('0') && t.len() > 1 && !t.contains(['.', 'e', 'E']) {
        return Some((8, &t[1..]));
    }
    None
}

fn split_base(t: &str) -> (u32, &str) {
    split_base_explicit(t).unwrap_or((10, t))
}

fn parse_decimal(t: &str, orig: &str) -> NumResult<Rational> {
    let (mantissa, exp) = match t.split_once(['e', 'E']) {
        Some((m, e)) => {
            let exp: i64 = e.parse().map_err(|_| bad(orig))?;
            if exp.abs() > MAX_EXPONENT {
                return Err(NumError::argument("exponent out of range"));
            }
            (m, exp)
        }
        None => (t, 0),
    };
    let (int_digits, frac_digits) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err(bad(orig));
    }
    let joined = format!("{int_digits}{frac_digits}");
    let n = BigInt::parse_bytes(joined.as_bytes(), 10).ok_or_else(|| bad(orig))?;
    let scale = frac_digits.len() as i64 - exp;
    if scale > MAX_EXPONENT {
        return Err(NumError::argument("exponent out of range"));
    }
    if scale <= 0 {
        Ok(Rational::from(n * pow(BigInt::from(10), (-scale) as usize)))
    } else {
        Rational::new(n, pow(BigInt::from(10), scale as usize))
    }
}

fn bad(s: &str) -> NumError {
    NumError::argument(format!("invalid numeric literal: {s:?}"))
}
