//! Per-thread evaluation settings: default epsilon and display mode.
//!
//! There is deliberately no process-wide global. Each thread owns its
//! configuration, so a scoped override in one thread can never leak into
//! another. Functions taking `eps: Option<&Rational>` read the thread's
//! default when given `None`.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use crate::error::{NumError, NumResult};
use crate::rational::Rational;

/// Output mode for rendering values as strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Exact `numerator/denominator` form
    Fraction,
    /// Integer part, `~`-prefixed when the value has a fractional part
    Integer,
    /// Decimal expansion (exact when terminating, `~`-prefixed otherwise)
    Real,
    /// Decimal mantissa and power-of-ten exponent, `4.2e1`
    Scientific,
    /// Base 16 with `0x` prefix
    Hex,
    /// Base 8 with leading `0`
    Octal,
    /// Base 2 with `0b` prefix
    Binary,
}

impl DisplayMode {
    /// Canonical option-value name
    pub fn name(&self) -> &'static str {
        match self {
            DisplayMode::Fraction => "fraction",
            DisplayMode::Integer => "integer",
            DisplayMode::Real => "real",
            DisplayMode::Scientific => "scientific",
            DisplayMode::Hex => "hex",
            DisplayMode::Octal => "octal",
            DisplayMode::Binary => "binary",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayMode {
    type Err = NumError;

    fn from_str(s: &str) -> NumResult<Self> {
        match s {
            "fraction" | "frac" => Ok(DisplayMode::Fraction),
            "integer" | "int" => Ok(DisplayMode::Integer),
            "real" => Ok(DisplayMode::Real),
            "scientific" | "sci" => Ok(DisplayMode::Scientific),
            "hex" => Ok(DisplayMode::Hex),
            "octal" | "oct" => Ok(DisplayMode::Octal),
            "binary" | "bin" => Ok(DisplayMode::Binary),
            other => Err(NumError::argument(format!(
                "unknown display mode \"{other}\""
            ))),
        }
    }
}

/// Per-thread evaluation settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Default accuracy for epsilon-bounded functions; always > 0
    pub epsilon: Rational,
    /// Default rendering mode for `Display` and `to_string_mode(None)`
    pub display: DisplayMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            epsilon: Rational::default_epsilon(),
            display: DisplayMode::Real,
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Config> = RefCell::new(Config::default());
}

/// Snapshot of this thread's configuration
pub fn current() -> Config {
    CURRENT.with(|c| c.borrow().clone())
}

/// Read the configuration without cloning it
pub(crate) fn with_current<R>(f: impl FnOnce(&Config) -> R) -> R {
    CURRENT.with(|c| f(&c.borrow()))
}

/// Replace this thread's default epsilon; must be strictly positive
pub fn set_epsilon(epsilon: Rational) -> NumResult<()> {
    if !epsilon.is_positive() {
        return Err(NumError::math("zero or negative epsilon"));
    }
    CURRENT.with(|c| c.borrow_mut().epsilon = epsilon);
    Ok(())
}

/// Replace this thread's display mode
pub fn set_display(display: DisplayMode) {
    CURRENT.with(|c| c.borrow_mut().display = display);
}

/// String-keyed option write, for adapter boundaries
///
/// Recognized options: `epsilon` (a positive numeric literal) and
/// `display`/`mode` (a mode name).
pub fn set(option: &str, value: &str) -> NumResult<()> {
    match option {
        "epsilon" => set_epsilon(value.parse()?),
        "display" | "mode" => {
            set_display(value.parse()?);
            Ok(())
        }
        other => Err(NumError::argument(format!(
            "unknown config option \"{other}\""
        ))),
    }
}

/// String-keyed option read, for adapter boundaries
pub fn get(option: &str) -> NumResult<String> {
    match option {
        "epsilon" => Ok(with_current(|c| c.epsilon.to_fraction_string())),
        "display" | "mode" => Ok(with_current(|c| c.display.name().to_string())),
        other => Err(NumError::argument(format!(
            "unknown config option \"{other}\""
        ))),
    }
}

/// Run `f` under a temporary configuration
///
/// The prior configuration is restored on every exit path, including
/// unwinding out of `f`.
pub fn with_config<R>(config: Config, f: impl FnOnce() -> R) -> R {
    let prior = CURRENT.with(|c| c.replace(config));
    let _restore = Restore(Some(prior));
    f()
}

struct Restore(Option<Config>);

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(prior) = self.0.take() {
            CURRENT.with(|c| *c.borrow_mut() = prior);
        }
    }
}

/// Resolve an optional epsilon argument against the thread default
///
/// Rejects zero and negative accuracies for explicit arguments and for a
/// default that was somehow driven out of range.
pub(crate) fn resolve_epsilon(eps: Option<&Rational>) -> NumResult<Rational> {
    let eps = match eps {
        Some(e) => e.clone(),
        None => with_current(|c| c.epsilon.clone()),
    };
    if !eps.is_positive() {
        return Err(NumError::math("zero or negative epsilon"));
    }
    Ok(eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.display, DisplayMode::Real);
        assert_eq!(
            cfg.epsilon.to_fraction_string(),
            "1/100000000000000000000",
            "default epsilon is 10^-20"
        );
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in [
            DisplayMode::Fraction,
            DisplayMode::Integer,
            DisplayMode::Real,
            DisplayMode::Scientific,
            DisplayMode::Hex,
            DisplayMode::Octal,
            DisplayMode::Binary,
        ] {
            let parsed: DisplayMode = mode.name().parse().unwrap();
            assert_eq!(parsed, mode);
        }
        assert!("frac".parse::<DisplayMode>().is_ok());
        assert!("sci".parse::<DisplayMode>().is_ok());
        assert!("decimal".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn test_unknown_option_is_argument_error() {
        match set("precision", "50") {
            Err(NumError::Argument(msg)) => assert!(msg.contains("precision")),
            other => panic!("expected argument error, got {other:?}"),
        }
        assert!(get("precision").is_err());
    }

    #[test]
    fn test_set_epsilon_rejects_nonpositive() {
        assert!(set("epsilon", "0").is_err());
        assert!(set("epsilon", "-1/10").is_err());
        assert!(set("epsilon", "1/1000").is_ok());
        // restore the default for other tests on this thread
        set_epsilon(Rational::default_epsilon()).unwrap();
    }

    #[test]
    fn test_scoped_override_restores() {
        let before = current();
        let mut inside = None;
        with_config(
            Config {
                epsilon: Rational::new(1, 100).unwrap(),
                display: DisplayMode::Fraction,
            },
            || {
                inside = Some(current());
            },
        );
        let inside = inside.unwrap();
        assert_eq!(inside.display, DisplayMode::Fraction);
        assert_eq!(current(), before, "prior config must be restored");
    }

    #[test]
    fn test_scoped_override_restores_on_panic() {
        let before = current();
        let result = std::panic::catch_unwind(|| {
            with_config(
                Config {
                    epsilon: Rational::new(1, 2).unwrap(),
                    display: DisplayMode::Hex,
                },
                || panic!("boom"),
            )
        });
        assert!(result.is_err());
        assert_eq!(current(), before, "restore must run during unwinding");
    }
}
