//! Analysis configuration validation.
//!
//! [`validate_config`] checks every section and reports all problems at once,
//! so a configuration file can be fixed in one pass.
//!
//! # Example
//!
//! ```rust
//! use fringe_config::{AnalysisConfig, ValidationError, validate_config};
//!
//! let config = AnalysisConfig::new("bad").with_frequency_range(4.0, 2.0);
//! assert!(matches!(
//!     validate_config(&config),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use thiserror::Error;

use crate::config::AnalysisConfig;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric value outside its allowed range.
    #[error("'{param}' value {value} is invalid: {reason}")]
    OutOfRange {
        /// Dotted path of the parameter, e.g. `bank.low_frequency`.
        param: String,
        /// The rejected value.
        value: f64,
        /// What the value must satisfy.
        reason: String,
    },

    /// Bank needs at least two filters.
    #[error("'bank.num_filters' must be at least 2, got {0}")]
    TooFewFilters(usize),

    /// Resize section sets neither or both of `scale` and `new_size`.
    #[error("resize must set exactly one of 'scale' and 'new_size'")]
    ResizeArgs,

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_positive(errors: &mut Vec<ValidationError>, param: &str, value: f64) {
    if !(value > 0.0 && value.is_finite()) {
        errors.push(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            reason: "must be positive and finite".to_string(),
        });
    }
}

fn check_finite(errors: &mut Vec<ValidationError>, param: &str, value: f64) {
    if !value.is_finite() {
        errors.push(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            reason: "must be finite".to_string(),
        });
    }
}

/// Validate an analysis configuration.
///
/// Returns the single problem found, [`ValidationError::Multiple`] when there
/// are several, or `Ok(())`.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    let bank = &config.bank;
    if bank.num_filters < 2 {
        errors.push(ValidationError::TooFewFilters(bank.num_filters));
    }
    check_positive(&mut errors, "bank.low_frequency", bank.low_frequency);
    if !(bank.high_frequency > bank.low_frequency && bank.high_frequency.is_finite()) {
        errors.push(ValidationError::OutOfRange {
            param: "bank.high_frequency".to_string(),
            value: bank.high_frequency,
            reason: format!("must be finite and above {}", bank.low_frequency),
        });
    }

    let bitmap = &config.bitmap;
    check_positive(&mut errors, "bitmap.scale", bitmap.scale);
    if let Some(x_scale) = bitmap.x_scale {
        check_positive(&mut errors, "bitmap.x_scale", x_scale);
    }
    if let Some(y_scale) = bitmap.y_scale {
        check_positive(&mut errors, "bitmap.y_scale", y_scale);
    }
    check_finite(&mut errors, "bitmap.origin[0]", bitmap.origin[0]);
    check_finite(&mut errors, "bitmap.origin[1]", bitmap.origin[1]);

    if let Some(resize) = &config.resize {
        match (resize.scale, resize.new_size) {
            (Some(scale), None) => check_positive(&mut errors, "resize.scale", scale),
            (None, Some([height, width])) => {
                for (param, len) in [("resize.new_size[0]", height), ("resize.new_size[1]", width)] {
                    if len == 0 {
                        errors.push(ValidationError::OutOfRange {
                            param: param.to_string(),
                            value: 0.0,
                            reason: "must be at least 1".to_string(),
                        });
                    }
                }
            }
            _ => errors.push(ValidationError::ResizeArgs),
        }
    }

    if errors.len() > 1 {
        Err(ValidationError::Multiple(errors))
    } else {
        errors.pop().map_or(Ok(()), Err)
    }
}
