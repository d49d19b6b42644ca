//! Gameplay error types.
//!
//! Gameplay operations themselves never fail: unmet preconditions are no-ops
//! and missing assets are skipped.  These types cover the one place where a
//! bad value can be rejected up front, the tunables loaded into
//! [`crate::config::GameplayConfig`].
//!
//! ## Usage
//!
//! ```rust
//! use shooter::error::{validate_range, GameplayResult};
//!
//! fn check(min: f32, max: f32) -> GameplayResult<()> {
//!     validate_range("pitch", min, max)?;
//!     Ok(())
//! }
//! assert!(check(-45.0, 85.0).is_ok());
//! ```

use std::fmt;

/// Top-level error enum for gameplay configuration.
#[derive(Debug)]
pub enum GameplayError {
    /// `assets/gameplay.toml` was present but not valid TOML for the config schema.
    ConfigParse(String),

    /// A `[min, max]` pair where `min > max`; clamps would no longer saturate.
    InvertedRange {
        /// Name of the range (for logging).
        name: &'static str,
        min: f32,
        max: f32,
    },

    /// Tunable is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameplayError::ConfigParse(msg) => write!(f, "config parse error: {}", msg),
            GameplayError::InvertedRange { name, min, max } => write!(
                f,
                "range '{}' is inverted: min {} is greater than max {}",
                name, min, max
            ),
            GameplayError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameplayError {}

/// Convenience alias: a `Result` using `GameplayError` as the error type.
pub type GameplayResult<T> = Result<T, GameplayError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `value` is NaN or infinite.
pub fn validate_finite(name: &'static str, value: f32) -> GameplayResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GameplayError::UnsafeConstant {
            name,
            value,
            safe_range: "finite",
        })
    }
}

/// Returns an error if either bound is not finite or `min > max`.
pub fn validate_range(name: &'static str, min: f32, max: f32) -> GameplayResult<()> {
    validate_finite(name, min)?;
    validate_finite(name, max)?;
    if min > max {
        Err(GameplayError::InvertedRange { name, min, max })
    } else {
        Ok(())
    }
}

/// Returns an error if an interpolation rate is negative or not finite.
///
/// A rate of exactly zero is allowed: `finterp_to` treats it as "snap".
pub fn validate_interp_rate(name: &'static str, value: f32) -> GameplayResult<()> {
    if !value.is_finite() || value < 0.0 {
        Err(GameplayError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if a duration is negative or not finite.
pub fn validate_non_negative(name: &'static str, value: f32) -> GameplayResult<()> {
    if !value.is_finite() || value < 0.0 {
        Err(GameplayError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `value` is not strictly positive and finite.
pub fn validate_positive(name: &'static str, value: f32) -> GameplayResult<()> {
    if !value.is_finite() || value <= 0.0 {
        Err(GameplayError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_rate_is_rejected() {
        assert!(validate_interp_rate("rate", -1.0).is_err());
        assert!(validate_interp_rate("rate", f32::NAN).is_err());
        assert!(validate_interp_rate("rate", 0.0).is_ok());
    }

    #[test]
    fn non_finite_values_fail_every_helper() {
        for v in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(validate_finite("x", v).is_err());
            assert!(validate_non_negative("x", v).is_err());
            assert!(validate_positive("x", v).is_err());
            assert!(validate_range("x", v, 1.0).is_err());
            assert!(validate_range("x", -1.0, v).is_err());
        }
        assert!(validate_range("x", -1.0, 1.0).is_ok());
    }

    #[test]
    fn display_names_the_constant() {
        let err = validate_positive("automatic_fire_interval", 0.0).unwrap_err();
        assert!(err.to_string().contains("automatic_fire_interval"));
    }
}
