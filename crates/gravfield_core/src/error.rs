//! Error taxonomy shared by every gravfield crate.
//!
//! Degenerate geometry (coincident particles) is never an error: it is
//! absorbed by softening and the non-finite guards in the physics crate.
//! What remains is caller configuration and non-finite aggregates.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GravfieldError {
    #[error("particle mass must be positive and finite, got {mass} (id {id:?})")]
    NonPositiveMass { id: Option<u64>, mass: f64 },

    #[error("galaxy particle count must be at least 1")]
    EmptyGalaxy,

    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("invalid field grid {width}x{height}: both dimensions must be non-zero")]
    InvalidGrid { width: u32, height: u32 },

    #[error("duplicate particle id {0}")]
    DuplicateId(u64),

    #[error("field intensity at cell ({x}, {y}) is not finite: {value}")]
    NonFiniteField { x: u32, y: u32, value: f64 },
}

pub type Result<T> = std::result::Result<T, GravfieldError>;

/// Fail with `InvalidParameter` unless `value` is finite
pub fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GravfieldError::InvalidParameter { name, value })
    }
}

/// Fail with `InvalidParameter` unless `value` is finite and `>= 0`
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GravfieldError::InvalidParameter { name, value })
    }
}

/// Fail with `InvalidParameter` unless `value` is finite and `> 0`
pub fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GravfieldError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_checks() {
        assert!(ensure_finite("g", -3.0).is_ok());
        assert!(ensure_finite("g", f64::NAN).is_err());
        assert!(ensure_non_negative("softening", 0.0).is_ok());
        assert!(ensure_non_negative("softening", -1e-9).is_err());
        assert_eq!(
            ensure_positive("dt", 0.0),
            Err(GravfieldError::InvalidParameter { name: "dt", value: 0.0 })
        );
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = GravfieldError::InvalidGrid { width: 0, height: 10 };
        assert_eq!(
            err.to_string(),
            "invalid field grid 0x10: both dimensions must be non-zero"
        );
    }
}
