//! Numera Sequence - Restartable stride sequences
//!
//! A [`Sequence`] is a start value, an optional inclusive limit and a
//! stride, all exact rationals. The sequence itself is immutable data;
//! `iter()` hands out a fresh cursor every call, so the same sequence can
//! be walked any number of times and shared freely. A zero stride is a
//! legitimate sequence that yields the start value forever.

use serde::{Deserialize, Serialize};

use numera_core::Rational;

/// An arithmetic progression over exact rationals
///
/// The limit is inclusive. With a positive stride the walk ends once the
/// next value would exceed the limit; with a negative stride once it
/// would fall below it. `limit: None` never ends, and neither does a
/// zero stride, whatever the limit says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    start: Rational,
    limit: Option<Rational>,
    stride: Rational,
}

impl Sequence {
    pub fn new(start: Rational, limit: Option<Rational>, stride: Rational) -> Self {
        Sequence { start, limit, stride }
    }

    /// Counts up from `start` to `limit` by 1
    pub fn upto(start: Rational, limit: Rational) -> Self {
        Sequence::new(start, Some(limit), Rational::one())
    }

    /// Counts down from `start` to `limit` by 1
    pub fn downto(start: Rational, limit: Rational) -> Self {
        Sequence::new(start, Some(limit), -Rational::one())
    }

    pub fn start(&self) -> &Rational {
        &self.start
    }

    pub fn limit(&self) -> Option<&Rational> {
        self.limit.as_ref()
    }

    pub fn stride(&self) -> &Rational {
        &self.stride
    }

    /// A fresh cursor positioned at `start`
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            seq: self,
            next: self.start.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = Rational;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Cursor over a [`Sequence`], created by [`Sequence::iter`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    seq: &'a Sequence,
    next: Rational,
}

impl Iterator for Iter<'_> {
    type Item = Rational;

    fn next(&mut self) -> Option<Rational> {
        if let Some(limit) = &self.seq.limit {
            if self.seq.stride.is_positive() && self.next > *limit {
                return None;
            }
            if self.seq.stride.is_negative() && self.next < *limit {
                return None;
            }
        }
        let out = self.next.clone();
        self.next = &out + &self.seq.stride;
        Some(out)
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::Sequence;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn collect(seq: &Sequence) -> Vec<Rational> {
        seq.iter().collect()
    }

    mod walk_tests {
        use super::*;

        #[test]
        fn test_upto_is_inclusive() {
            let seq = Sequence::upto(q("1"), q("5"));
            let got = collect(&seq);
            assert_eq!(got, vec![q("1"), q("2"), q("3"), q("4"), q("5")]);
        }

        #[test]
        fn test_downto_is_inclusive() {
            let seq = Sequence::downto(q("5"), q("1"));
            let got = collect(&seq);
            assert_eq!(got, vec![q("5"), q("4"), q("3"), q("2"), q("1")]);
        }

        #[test]
        fn test_fractional_stride_stops_past_the_limit() {
            let seq = Sequence::new(q("1"), Some(q("2")), q("2/3"));
            let got = collect(&seq);
            assert_eq!(got, vec![q("1"), q("5/3")], "7/3 is already past 2");
        }

        #[test]
        fn test_negative_fractional_stride() {
            let seq = Sequence::new(q("1"), Some(q("0")), q("-1/2"));
            let got = collect(&seq);
            assert_eq!(got, vec![q("1"), q("1/2"), q("0")]);
        }

        #[test]
        fn test_start_past_the_limit_is_empty() {
            let seq = Sequence::upto(q("5"), q("1"));
            assert_eq!(collect(&seq), Vec::<Rational>::new());
            let seq = Sequence::downto(q("1"), q("5"));
            assert_eq!(collect(&seq), Vec::<Rational>::new());
        }

        #[test]
        fn test_start_equal_to_limit_yields_once() {
            let seq = Sequence::upto(q("3"), q("3"));
            assert_eq!(collect(&seq), vec![q("3")]);
        }

        #[test]
        fn test_no_limit_never_stops() {
            let seq = Sequence::new(q("0"), None, q("1/4"));
            let got: Vec<Rational> = seq.iter().take(5).collect();
            assert_eq!(got, vec![q("0"), q("1/4"), q("1/2"), q("3/4"), q("1")]);
        }

        #[test]
        fn test_zero_stride_repeats_forever() {
            // the limit does not apply to a zero stride
            let seq = Sequence::new(q("7/2"), Some(q("1")), q("0"));
            let got: Vec<Rational> = seq.iter().take(4).collect();
            assert_eq!(got, vec![q("7/2"), q("7/2"), q("7/2"), q("7/2")]);
        }
    }

    mod cursor_tests {
        use super::*;

        #[test]
        fn test_iter_restarts_from_the_top() {
            let seq = Sequence::upto(q("1"), q("3"));
            let first: Vec<Rational> = seq.iter().collect();
            let second: Vec<Rational> = seq.iter().collect();
            assert_eq!(first, second);
        }

        #[test]
        fn test_for_loop_over_a_reference() {
            let seq = Sequence::upto(q("1"), q("4"));
            let mut total = Rational::zero();
            for v in &seq {
                total = &total + &v;
            }
            assert_eq!(total, q("10"));
        }

        #[test]
        fn test_accessors() {
            let seq = Sequence::new(q("2"), Some(q("10")), q("3/2"));
            assert_eq!(*seq.start(), q("2"));
            assert_eq!(seq.limit(), Some(&q("10")));
            assert_eq!(*seq.stride(), q("3/2"));
            let open = Sequence::new(q("2"), None, q("1"));
            assert_eq!(open.limit(), None);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_round_trip() {
            let seq = Sequence::new(q("1/2"), Some(q("9/2")), q("1/3"));
            let json = serde_json::to_string(&seq).unwrap();
            let back: Sequence = serde_json::from_str(&json).unwrap();
            assert_eq!(back, seq);
        }

        #[test]
        fn test_open_limit_round_trip() {
            let seq = Sequence::new(q("0"), None, q("-2"));
            let json = serde_json::to_string(&seq).unwrap();
            let back: Sequence = serde_json::from_str(&json).unwrap();
            assert_eq!(back, seq);
        }
    }
}
