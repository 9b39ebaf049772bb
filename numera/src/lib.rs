//! Numera - Exact rational and complex arithmetic
//!
//! The facade crate: re-exports the numeric tower from `numera-core` and
//! the stride sequences from `numera-sequence`, and adds the aggregate
//! functions that work over slices of [`Numeric`] values. Aggregates
//! return `None` on empty input instead of inventing a value.

use std::cmp::Ordering;

pub use numera_core::{config, int};
pub use numera_core::{Complex, Config, DisplayMode, NumError, NumResult, Numeric, Rational, Rounding};
pub use numera_sequence::Sequence;

/// Prelude for convenient imports
pub mod prelude {
    pub use numera_core::prelude::*;
    pub use numera_sequence::prelude::*;
}

/// Sum of the values; `None` on empty input
pub fn sum(values: &[Numeric]) -> Option<Numeric> {
    let (first, rest) = values.split_first()?;
    let mut total = first.clone();
    for v in rest {
        total = &total + v;
    }
    Some(total)
}

/// Arithmetic mean; component-wise over complex values
pub fn avg(values: &[Numeric]) -> Option<Numeric> {
    let total = sum(values)?;
    let count = Numeric::from(Rational::from_integer(values.len()));
    // count >= 1 here, so the division cannot fail
    total.checked_div(&count).ok()
}

/// Sum of squares; `None` on empty input
pub fn ssq(values: &[Numeric]) -> Option<Numeric> {
    let (first, rest) = values.split_first()?;
    let mut total = first * first;
    for v in rest {
        total = &total + &(v * v);
    }
    Some(total)
}

/// Harmonic mean: count over the sum of reciprocals
///
/// Any zero operand makes the result 0 exactly. A reciprocal sum that
/// cancels to zero over nonzero operands has no harmonic mean and fails
/// with `DivisionByZero`.
pub fn hmean(values: &[Numeric]) -> NumResult<Option<Numeric>> {
    if values.is_empty() {
        return Ok(None);
    }
    if values.iter().any(Numeric::is_zero) {
        return Ok(Some(Numeric::from(0)));
    }
    let mut recip_sum = values[0].inverse()?;
    for v in &values[1..] {
        recip_sum = &recip_sum + &v.inverse()?;
    }
    let count = Numeric::from(Rational::from_integer(values.len()));
    Ok(Some(count.checked_div(&recip_sum)?))
}

/// Largest value; complex operands have no order
pub fn max(values: &[Numeric]) -> NumResult<Option<Numeric>> {
    order_guard(values)?;
    let (first, rest) = match values.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };
    let mut best = first;
    for v in rest {
        if v.partial_cmp(best) == Some(Ordering::Greater) {
            best = v;
        }
    }
    Ok(Some(best.clone()))
}

/// Smallest value; complex operands have no order
pub fn min(values: &[Numeric]) -> NumResult<Option<Numeric>> {
    order_guard(values)?;
    let (first, rest) = match values.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };
    let mut best = first;
    for v in rest {
        if v.partial_cmp(best) == Some(Ordering::Less) {
            best = v;
        }
    }
    Ok(Some(best.clone()))
}

fn order_guard(values: &[Numeric]) -> NumResult<()> {
    if values.iter().any(Numeric::is_complex) {
        return Err(NumError::argument("cannot order complex values"));
    }
    Ok(())
}

/// Evaluates a polynomial with ascending coefficients at `x`
///
/// `poly(&[c0, c1, c2], x)` is c0 + c1 x + c2 x^2; an empty coefficient
/// slice is the zero polynomial.
pub fn poly(coeffs: &[Numeric], x: &Numeric) -> Numeric {
    let mut acc = Numeric::from(0);
    for c in coeffs.iter().rev() {
        acc = &(&acc * x) + c;
    }
    acc
}

/// Pi on the epsilon grid; see [`Rational::pi`]
pub fn pi(eps: Option<&Rational>) -> NumResult<Rational> {
    Rational::pi(eps)
}

/// The point at radius `r` and angle `theta`, as a canonical [`Numeric`]
///
/// Demotes on the way out: `polar(2, 0)` is the integer 2, not a complex
/// value with a zero imaginary part.
pub fn polar(r: &Rational, theta: &Rational, eps: Option<&Rational>) -> NumResult<Numeric> {
    Ok(Numeric::from(Complex::from_polar(r, theta, eps)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Numeric {
        s.parse().unwrap()
    }

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn list(xs: &[&str]) -> Vec<Numeric> {
        xs.iter().map(|s| s.parse().unwrap()).collect()
    }

    mod sum_tests {
        use super::*;

        #[test]
        fn test_sum_of_integers() {
            assert_eq!(sum(&list(&["1", "2", "3", "4", "5"])), Some(n("15")));
        }

        #[test]
        fn test_sum_mixes_rungs() {
            assert_eq!(sum(&list(&["1/2", "1/2", "3"])), Some(n("4")));
            assert_eq!(sum(&list(&["1", "1i", "-1i"])), Some(n("1")));
        }

        #[test]
        fn test_sum_of_nothing() {
            assert_eq!(sum(&[]), None);
        }
    }

    mod avg_tests {
        use super::*;

        #[test]
        fn test_avg_of_one_to_five() {
            assert_eq!(avg(&list(&["1", "2", "3", "4", "5"])), Some(n("3")));
        }

        #[test]
        fn test_avg_is_componentwise_over_complex() {
            let values = list(&["1", "1i", "2", "-2i"]);
            assert_eq!(avg(&values), Some(n("3/4-1i/4")));
        }

        #[test]
        fn test_avg_of_nothing() {
            assert_eq!(avg(&[]), None);
        }
    }

    mod ssq_tests {
        use super::*;

        #[test]
        fn test_ssq_of_integers() {
            assert_eq!(ssq(&list(&["1", "2", "3"])), Some(n("14")));
            assert_eq!(ssq(&list(&["2", "3", "5", "7"])), Some(n("87")));
        }

        #[test]
        fn test_ssq_squares_complex_values() {
            // 2^2 + (3i)^2 = 4 - 9
            assert_eq!(ssq(&list(&["2", "3i"])), Some(n("-5")));
        }

        #[test]
        fn test_ssq_of_nothing() {
            assert_eq!(ssq(&[]), None);
        }
    }

    mod hmean_tests {
        use super::*;

        #[test]
        fn test_hmean_of_integers() {
            assert_eq!(hmean(&list(&["1", "2"])).unwrap(), Some(n("4/3")));
            assert_eq!(hmean(&list(&["1", "2", "3"])).unwrap(), Some(n("18/11")));
            assert_eq!(hmean(&list(&["1", "2", "3", "4"])).unwrap(), Some(n("48/25")));
        }

        #[test]
        fn test_hmean_with_a_zero_operand_is_zero() {
            assert_eq!(hmean(&list(&["1", "2", "0", "3"])).unwrap(), Some(n("0")));
        }

        #[test]
        fn test_hmean_over_complex_values() {
            assert_eq!(hmean(&list(&["1i", "2i", "3i"])).unwrap(), Some(n("18i/11")));
            assert_eq!(hmean(&list(&["1", "2i"])).unwrap(), Some(n("8/5+4i/5")));
        }

        #[test]
        fn test_hmean_with_cancelling_reciprocals() {
            let r = hmean(&list(&["1", "-1"]));
            assert!(matches!(r, Err(NumError::DivisionByZero)));
        }

        #[test]
        fn test_hmean_of_nothing() {
            assert_eq!(hmean(&[]).unwrap(), None);
        }
    }

    mod order_tests {
        use super::*;

        #[test]
        fn test_max_and_min() {
            let values = list(&["5", "3", "7", "2", "9"]);
            assert_eq!(max(&values).unwrap(), Some(n("9")));
            assert_eq!(min(&values).unwrap(), Some(n("2")));
        }

        #[test]
        fn test_fractions_order_by_value() {
            let values = list(&["2/3", "7/11", "5/8"]);
            assert_eq!(max(&values).unwrap(), Some(n("2/3")));
            assert_eq!(min(&values).unwrap(), Some(n("5/8")));
        }

        #[test]
        fn test_complex_operand_has_no_order() {
            let values = list(&["1", "2i", "3"]);
            assert!(matches!(max(&values), Err(NumError::Argument(_))));
            assert!(matches!(min(&values), Err(NumError::Argument(_))));
        }

        #[test]
        fn test_extremes_of_nothing() {
            assert_eq!(max(&[]).unwrap(), None);
            assert_eq!(min(&[]).unwrap(), None);
        }
    }

    mod poly_tests {
        use super::*;

        #[test]
        fn test_ascending_coefficients() {
            // 5 + 3x + 2x^2 at x = 7
            let coeffs = list(&["5", "3", "2"]);
            assert_eq!(poly(&coeffs, &n("7")), n("124"));
        }

        #[test]
        fn test_empty_polynomial_is_zero() {
            assert_eq!(poly(&[], &n("7")), n("0"));
        }

        #[test]
        fn test_complex_point() {
            // 1 + x^2 at x = i
            let coeffs = list(&["1", "0", "1"]);
            assert_eq!(poly(&coeffs, &n("1i")), n("0"));
        }

        #[test]
        fn test_fractional_coefficients() {
            // 1/2 + (1/3)x at x = 6
            let coeffs = list(&["1/2", "1/3"]);
            assert_eq!(poly(&coeffs, &n("6")), n("5/2"));
        }
    }

    mod constant_tests {
        use super::*;

        #[test]
        fn test_pi_on_the_grid() {
            assert_eq!(pi(Some(&q("1/100000"))).unwrap(), q("314159/100000"));
            assert_eq!(
                pi(None).unwrap(),
                q("157079632679489661923/50000000000000000000")
            );
        }

        #[test]
        fn test_pi_reads_the_thread_default() {
            let cfg = Config {
                epsilon: q("1/100"),
                ..Config::default()
            };
            let p = config::with_config(cfg, || pi(None)).unwrap();
            assert_eq!(p, q("157/50"));
        }

        #[test]
        fn test_polar_demotes_on_the_real_axis() {
            let v = polar(&q("2"), &q("0"), None).unwrap();
            assert_eq!(v, n("2"));
            assert!(v.is_integer());
        }

        #[test]
        fn test_polar_off_axis() {
            let v = polar(&q("1"), &q("1.57079632679489661923"), None).unwrap();
            assert_eq!(v, n("1i"));
        }

        #[test]
        fn test_polar_rejects_bad_epsilon() {
            let r = polar(&q("1"), &q("1"), Some(&q("-1/10")));
            assert!(matches!(r, Err(NumError::Math(_))));
        }
    }

    mod sequence_tests {
        use super::*;

        #[test]
        fn test_aggregates_over_a_sequence() {
            let seq = Sequence::upto(q("1"), q("5"));
            let values: Vec<Numeric> = seq.iter().map(Numeric::from).collect();
            assert_eq!(sum(&values), Some(n("15")));
            assert_eq!(avg(&values), Some(n("3")));
            assert_eq!(ssq(&values), Some(n("55")));
        }

        #[test]
        fn test_downto_feeds_the_same_aggregates() {
            let seq = Sequence::downto(q("5"), q("1"));
            let values: Vec<Numeric> = seq.iter().map(Numeric::from).collect();
            assert_eq!(max(&values).unwrap(), Some(n("5")));
            assert_eq!(min(&values).unwrap(), Some(n("1")));
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_numeric_list_round_trip() {
            let values = list(&["3", "-22/7", "1+2i"]);
            let json = serde_json::to_string(&values).unwrap();
            assert_eq!(json, "[\"3\",\"-22/7\",\"1+2i\"]");
            let back: Vec<Numeric> = serde_json::from_str(&json).unwrap();
            assert_eq!(back, values);
        }
    }
}
