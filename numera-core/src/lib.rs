//! Numera Core - Exact arbitrary-precision arithmetic
//!
//! This crate provides the numeric foundation used throughout Numera:
//! - `Rational`: Exact arbitrary-precision rational numbers
//! - `Complex`: Complex numbers over rational components
//! - `Numeric`: The closed tower (integer, rational, complex) in canonical form
//! - `NumError`: Structured errors for every fallible operation
//!
//! Transcendental operations never return floats. Each one takes an
//! epsilon (or reads the thread default from [`config`]) and returns the
//! exact rational obtained by snapping the true value onto the epsilon
//! grid, so the same call always produces the same number. Operations
//! whose mathematical value leaves the real line promote to `Complex`;
//! operations at a pole fail with `NumError::Math`.

mod complex;
pub mod config;
mod error;
mod format;
pub mod int;
mod rational;
mod trans;
mod value;

pub use complex::Complex;
pub use config::{Config, DisplayMode};
pub use error::{NumError, NumResult};
pub use rational::{Rational, Rounding};
pub use value::Numeric;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Complex, Config, DisplayMode, NumError, NumResult, Numeric, Rational, Rounding};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    mod tower_tests {
        use super::*;

        #[test]
        fn test_sqrt_of_negative_promotes_and_squares_back() {
            let r = q("-4").sqrt(None).unwrap();
            let z = r.as_complex();
            assert_eq!(z, Complex::new(Rational::zero(), q("2")));
            // squaring the promoted value lands back on the integer rung
            let back = &r * &r;
            assert_eq!(back, Numeric::from(-4));
            assert!(back.is_integer());
        }

        #[test]
        fn test_ln_of_negative_is_i_pi() {
            let r = q("-1").ln(None).unwrap();
            match r {
                Numeric::Complex(z) => {
                    assert!(z.re().is_zero());
                    assert_eq!(*z.im(), Rational::pi(None).unwrap());
                }
                other => panic!("ln(-1) should promote, got {other}"),
            }
        }

        #[test]
        fn test_asin_past_one_promotes() {
            let r = q("2").asin(None).unwrap();
            assert!(r.as_rational().is_none());
            let z = r.as_complex();
            assert_eq!(*z.re(), q("1.57079632679489661923"));
            let diff = (z.im() + &q("1.31695789692481670863")).abs();
            assert!(diff <= q("2/100000000000000000000"), "asin(2) im = {}", z.im());
        }

        #[test]
        fn test_complex_arithmetic_demotes_through_numeric() {
            let a = Numeric::from(Complex::new(q("1"), q("2")));
            let b = Numeric::from(Complex::new(q("3"), q("-2")));
            let sum = &a + &b;
            assert_eq!(sum, Numeric::from(4));
            assert!(sum.is_integer());
            let i = Numeric::from(Complex::i());
            assert_eq!(&i * &i, Numeric::from(-1));
        }

        #[test]
        fn test_power_promotion_chain() {
            // (-4)^(1/2) = 2i, then (2i)^2 = -4 again
            let r = q("-4").power(&q("1/2"), None).unwrap();
            let z = r.as_complex();
            assert_eq!(z, Complex::new(Rational::zero(), q("2")));
            let sq = Numeric::from(z.pow_int(2).unwrap());
            assert_eq!(sq, Numeric::from(-4));
        }

        #[test]
        fn test_division_error_split() {
            // rational division by zero names the divisor; complex reports a pole
            let r = Numeric::from(1).checked_div(&Numeric::from(0));
            assert!(matches!(r, Err(NumError::DivisionByZero)));
            let z = Complex::one().checked_div(&Complex::zero());
            assert!(matches!(z, Err(NumError::Math(_))));
        }
    }

    mod epsilon_tests {
        use super::*;

        #[test]
        fn test_pi_lands_on_the_grid() {
            let p = Rational::pi(Some(&q("1/100000"))).unwrap();
            assert_eq!(p, q("314159/100000"));
            let p = Rational::pi(None).unwrap();
            assert_eq!(p, q("3.14159265358979323846"));
        }

        #[test]
        fn test_same_epsilon_same_answer() {
            let eps = q("1/1000000000");
            let a = q("2").sqrt(Some(&eps)).unwrap();
            let b = q("2").sqrt(Some(&eps)).unwrap();
            assert_eq!(a, b);
            let s1 = q("355/113").sin(Some(&eps)).unwrap();
            let s2 = q("355/113").sin(Some(&eps)).unwrap();
            assert_eq!(s1, s2);
        }

        #[test]
        fn test_result_is_a_grid_multiple() {
            let eps = q("1/4096");
            let r = q("2").exp(Some(&eps)).unwrap();
            assert!((r.checked_div(&eps)).unwrap().is_integer());
        }

        #[test]
        fn test_nonpositive_epsilon_is_rejected() {
            assert!(matches!(
                q("2").sqrt(Some(&Rational::zero())),
                Err(NumError::Math(_))
            ));
            assert!(matches!(
                Rational::pi(Some(&q("-1/10"))),
                Err(NumError::Math(_))
            ));
        }

        #[test]
        fn test_appr_respects_the_thread_default() {
            let cfg = Config {
                epsilon: q("1/100"),
                ..Config::default()
            };
            let inside = config::with_config(cfg, || q("355/113").appr(None, Rounding::Floor));
            assert_eq!(inside.unwrap(), q("314/100"));
            // outside the scope the 10^-20 default is back
            let outside = q("355/113").appr(None, Rounding::Floor).unwrap();
            assert_eq!(outside, q("3.14159292035398230088"));
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_display_mode_flows_into_rendering() {
            let v = Numeric::from(q("1/20"));
            assert_eq!(v.to_string(), "0.05");
            let cfg = Config {
                display: DisplayMode::Fraction,
                ..Config::default()
            };
            let s = config::with_config(cfg, || v.to_string());
            assert_eq!(s, "1/20");
            let cfg = Config {
                display: DisplayMode::Hex,
                ..Config::default()
            };
            let s = config::with_config(cfg, || v.to_string());
            assert_eq!(s, "1/0x14");
        }

        #[test]
        fn test_string_keyed_options() {
            config::with_config(Config::default(), || {
                config::set("display", "frac").unwrap();
                assert_eq!(config::get("display").unwrap(), "fraction");
                config::set("epsilon", "1/1000").unwrap();
                assert_eq!(config::get("epsilon").unwrap(), "1/1000");
                assert!(matches!(
                    config::set("quantum", "1"),
                    Err(NumError::Argument(_))
                ));
            });
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_numeric_round_trips_every_rung() {
            for s in ["42", "-7", "3/4", "-22/7", "2i/5", "1-1i", "3+4i"] {
                let v: Numeric = s.parse().unwrap();
                let back: Numeric = v.to_fraction_string().parse().unwrap();
                assert_eq!(back, v, "round trip through {s}");
            }
        }

        #[test]
        fn test_inexact_rendering_is_marked() {
            let third = q("1/3");
            let s = third.to_string_mode(DisplayMode::Real);
            assert_eq!(s, "~0.33333333333333333333");
            // terminating values carry no marker
            assert_eq!(q("1/4").to_string_mode(DisplayMode::Real), "0.25");
        }

        #[test]
        fn test_based_literals_parse_back() {
            assert_eq!(q("0x14"), q("20"));
            assert_eq!(q("0b101"), q("5"));
            assert_eq!(q("052"), q("42"));
            assert_eq!(q("1/0x14"), q("1/20"));
        }
    }
}
