//! Integer kernels layered over num-bigint.
//!
//! num-bigint brings the representation and the ring operations; this
//! module adds the number-theoretic layer: primality with a deterministic
//! bound, prime navigation, bounded factorization, factorial and
//! fibonacci. Everything here is pure and allocation-only.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{NumError, NumResult};

/// Exact primality answers are only promised below this bound.
pub const PRIME_BOUND: u64 = 1 << 32;

/// First prime past `PRIME_BOUND`, returned when a search crosses it.
const PRIME_AFTER_BOUND: u64 = 4_294_967_311;

// ========== Primality ==========

/// Deterministic primality for machine-word candidates
///
/// Miller-Rabin with bases 2, 3, 5, 7, 11 is exact for every value below
/// 2^41, comfortably covering the 2^32 contract.
pub(crate) fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }
    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }
    'base: for base in [2u64, 3, 5, 7, 11] {
        let mut x = powmod(base, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mulmod(x, x, n);
            if x == n - 1 {
                continue 'base;
            }
        }
        return false;
    }
    true
}

fn mulmod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn powmod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mulmod(acc, base, m);
        }
        base = mulmod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// Exact primality test
///
/// Deterministic below 2^32. Even values are composite at any size and are
/// answered without error; an odd value at or beyond the bound would need a
/// probabilistic answer, which an exact test must refuse.
pub fn is_prime(n: &BigInt) -> NumResult<bool> {
    if n.sign() == Sign::Minus {
        return Ok(false);
    }
    match n.to_u64() {
        Some(v) if v < PRIME_BOUND => Ok(is_prime_u64(v)),
        _ => {
            if n.is_even() {
                Ok(false)
            } else {
                Err(NumError::math("prime test of an odd value >= 2^32"))
            }
        }
    }
}

/// Probabilistic primality test
///
/// Runs `count` Miller-Rabin rounds with the first `count` primes as
/// bases. Below 2^32 the answer is the exact one regardless of `count`.
/// A composite passes with probability below (1/4)^count.
pub fn ptest(n: &BigInt, count: u32) -> bool {
    let n = n.magnitude();
    if let Some(v) = n.to_u64() {
        if v < PRIME_BOUND {
            return is_prime_u64(v);
        }
    }
    // quick reject: a small prime divisor settles it
    for p in [
        2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79,
        83, 89, 97, 101,
    ] {
        if (n % BigUint::from(p)).is_zero() {
            return false;
        }
    }
    let one = BigUint::one();
    let n_minus_1 = n - &one;
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }
    let mut base = 2u64;
    for _ in 0..count {
        let b = BigUint::from(base);
        if b >= n_minus_1 {
            break;
        }
        let mut x = b.modpow(&d, n);
        if !x.is_one() && x != n_minus_1 {
            let mut witness = true;
            for _ in 1..s {
                x = x.modpow(&BigUint::from(2u32), n);
                if x == n_minus_1 {
                    witness = false;
                    break;
                }
            }
            if witness {
                return false;
            }
        }
        base = next_prime_u64(base);
    }
    true
}

fn next_prime_u64(n: u64) -> u64 {
    let mut c = n + 1;
    if c <= 2 {
        return 2;
    }
    if c % 2 == 0 {
        c += 1;
    }
    while !is_prime_u64(c) {
        c += 2;
    }
    c
}

/// Smallest prime greater than `n`
///
/// `n` must sit below 2^32; when the next prime itself crosses the bound
/// the first prime past it (4294967311) is still returned, so the
/// function is total over its accepted domain.
pub fn next_prime(n: &BigInt) -> NumResult<BigInt> {
    let start = match n.to_i64() {
        Some(v) if (v.max(0) as u64) < PRIME_BOUND => v,
        _ => return Err(NumError::math("next_prime argument >= 2^32")),
    };
    if start < 2 {
        return Ok(BigInt::from(2));
    }
    let p = next_prime_u64(start as u64);
    if p >= PRIME_BOUND {
        return Ok(BigInt::from(PRIME_AFTER_BOUND));
    }
    Ok(BigInt::from(p))
}

/// Largest prime less than `n`
///
/// No prime sits below 3's predecessor, so `n <= 2` is a `MathError`
/// rather than an answer.
pub fn prev_prime(n: &BigInt) -> NumResult<BigInt> {
    let start = match n.to_u64() {
        Some(v) if v < PRIME_BOUND => v,
        _ => {
            if n.sign() == Sign::Minus {
                return Err(NumError::math("no prime below 2"));
            }
            return Err(NumError::math("prev_prime argument >= 2^32"));
        }
    };
    if start <= 2 {
        return Err(NumError::math("no prime below 2"));
    }
    let mut c = start - 1;
    if c == 2 {
        return Ok(BigInt::from(2));
    }
    if c % 2 == 0 {
        c -= 1;
    }
    while c > 2 && !is_prime_u64(c) {
        c -= 2;
    }
    Ok(BigInt::from(c.max(2)))
}

/// Smallest prime factor of |n| not exceeding `bound`, or 1 if none
///
/// The bound must stay below 2^32 so the search is a finite trial
/// division. When |n| itself is prime and within the bound, it is its own
/// answer.
pub fn factor(n: &BigInt, bound: &BigInt) -> NumResult<BigInt> {
    let bound = match bound.to_u64() {
        Some(b) if b < PRIME_BOUND => b,
        _ => return Err(NumError::math("factor bound must be < 2^32")),
    };
    let n = n.magnitude().clone();
    if n.is_zero() {
        return Ok(if bound >= 2 {
            BigInt::from(2)
        } else {
            BigInt::one()
        });
    }
    if n.is_one() || bound < 2 {
        return Ok(BigInt::one());
    }
    let mut d = 2u64;
    while d <= bound {
        let db = BigUint::from(d);
        if &db * &db > n {
            break;
        }
        if (&n % &db).is_zero() {
            return Ok(BigInt::from(d));
        }
        d = match d {
            2 => 3,
            3 => 5,
            _ => d + if d % 6 == 5 { 2 } else { 4 },
        };
    }
    // no divisor up to min(bound, sqrt(n)): n is prime
    if n <= BigUint::from(bound) {
        return Ok(BigInt::from(n));
    }
    Ok(BigInt::one())
}

// ========== Factorial and fibonacci ==========

/// n! for integer n >= 0
pub fn factorial(n: &BigInt) -> NumResult<BigInt> {
    if n.sign() == Sign::Minus {
        return Err(NumError::math("factorial of a negative value"));
    }
    let n = n
        .to_u64()
        .ok_or_else(|| NumError::math("factorial argument too large"))?;
    let mut acc = BigInt::one();
    for k in 2..=n {
        acc *= BigInt::from(k);
    }
    Ok(acc)
}

/// Fibonacci number by fast doubling
///
/// Negative indices follow F(-n) = (-1)^(n+1) F(n).
pub fn fibonacci(n: &BigInt) -> NumResult<BigInt> {
    let idx = n
        .magnitude()
        .to_u64()
        .ok_or_else(|| NumError::math("fibonacci argument too large"))?;
    let f = fib_u64(idx);
    if n.sign() == Sign::Minus && idx % 2 == 0 {
        Ok(-f)
    } else {
        Ok(f)
    }
}

fn fib_u64(n: u64) -> BigInt {
    // returns F(n); carries (F(k), F(k+1)) down the bits of n
    let mut a = BigInt::zero(); // F(0)
    let mut b = BigInt::one(); // F(1)
    for i in (0..64).rev() {
        let two_b_minus_a = (&b << 1) - &a;
        let c = &a * &two_b_minus_a; // F(2k)
        let d = &a * &a + &b * &b; // F(2k+1)
        if (n >> i) & 1 == 1 {
            a = d.clone();
            b = c + d;
        } else {
            a = c;
            b = d;
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i128) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_is_prime_small() {
        let primes = [2i128, 3, 5, 7, 11, 101, 65537, 2147483647];
        let composites = [0i128, 1, 4, 9, 100, 65539 * 3, 2147483639];
        for p in primes {
            assert_eq!(is_prime(&big(p)).unwrap(), true, "{p} is prime");
        }
        for c in composites {
            assert_eq!(is_prime(&big(c)).unwrap(), false, "{c} is composite");
        }
        assert!(!is_prime(&big(-7)).unwrap(), "negatives are not prime");
    }

    #[test]
    fn test_is_prime_near_the_bound() {
        // 2^31 - 1 is the Mersenne prime M31; 2^31 - 9 factors
        assert!(is_prime(&big(2147483647)).unwrap());
        assert!(!is_prime(&big(2147483639)).unwrap());
        // largest prime below 2^32
        assert!(is_prime(&big(4294967291)).unwrap());
    }

    #[test]
    fn test_is_prime_refuses_odd_values_over_the_bound() {
        let odd_big = big(1) << 33 | big(1);
        assert!(matches!(is_prime(&odd_big), Err(NumError::Math(_))));
        // even values of any size are just composite
        assert_eq!(is_prime(&(big(1) << 40)).unwrap(), false);
    }

    #[test]
    fn test_ptest() {
        assert!(ptest(&big(4294967291), 10));
        assert!(!ptest(&big(4294967291 + 2), 10));
        // a large prime: 2^61 - 1
        assert!(ptest(&((big(1) << 61) - 1), 10));
        // a large composite with no small factors: (2^31-1)^2
        let m31 = big(2147483647);
        assert!(!ptest(&(&m31 * &m31), 10));
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(&big(2)).unwrap(), big(3));
        assert_eq!(next_prime(&big(10)).unwrap(), big(11));
        assert_eq!(next_prime(&big(100)).unwrap(), big(101));
        assert_eq!(next_prime(&big(1000000)).unwrap(), big(1000003));
        assert_eq!(next_prime(&big(-5)).unwrap(), big(2));
        // crossing the bound lands on the first prime past it
        assert_eq!(next_prime(&big(4294967295)).unwrap(), big(4294967311));
        assert!(next_prime(&(big(1) << 32)).is_err());
    }

    #[test]
    fn test_prev_prime() {
        assert_eq!(prev_prime(&big(100)).unwrap(), big(97));
        assert_eq!(prev_prime(&big(3)).unwrap(), big(2));
        assert!(matches!(prev_prime(&big(2)), Err(NumError::Math(_))));
        assert!(matches!(prev_prime(&big(-10)), Err(NumError::Math(_))));
        assert!(prev_prime(&(big(1) << 32)).is_err());
    }

    #[test]
    fn test_factor() {
        assert_eq!(factor(&big(4294967295), &big(1000)).unwrap(), big(3));
        assert_eq!(factor(&big(35), &big(100)).unwrap(), big(5));
        assert_eq!(factor(&big(-35), &big(100)).unwrap(), big(5));
        // 101 is prime and within the bound: its own smallest factor
        assert_eq!(factor(&big(101), &big(1000)).unwrap(), big(101));
        // prime above the bound: nothing found
        assert_eq!(factor(&big(101), &big(50)).unwrap(), big(1));
        assert_eq!(factor(&big(0), &big(10)).unwrap(), big(2));
        assert!(factor(&big(12), &(big(1) << 32)).is_err());
    }

    #[test]
    fn test_factorial() {
        let table = [(0, 1i128), (1, 1), (2, 2), (5, 120), (10, 3628800)];
        for (n, expect) in table {
            assert_eq!(factorial(&big(n)).unwrap(), big(expect), "{n}!");
        }
        assert!(matches!(factorial(&big(-1)), Err(NumError::Math(_))));
    }

    #[test]
    fn test_fibonacci() {
        let expect = [0i128, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (n, e) in expect.iter().enumerate() {
            assert_eq!(fibonacci(&big(n as i128)).unwrap(), big(*e), "F({n})");
        }
        // F(-4) = -3, F(-5) = 5
        assert_eq!(fibonacci(&big(-4)).unwrap(), big(-3));
        assert_eq!(fibonacci(&big(-5)).unwrap(), big(5));
        // fast doubling far from the small cases
        assert_eq!(
            fibonacci(&big(100)).unwrap().to_string(),
            "354224848179261915075"
        );
    }
}
