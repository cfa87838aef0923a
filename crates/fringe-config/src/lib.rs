//! Configuration for lattice-fringe analyses.
//!
//! An [`AnalysisConfig`] describes one run end to end: the filter bank, the
//! estimation mode, how bitmaps are imported onto a physical grid, and an
//! optional resampling step. Configurations are stored as TOML.
//!
//! # Features
//!
//! - **TOML files**: load, save and round-trip configurations
//! - **Validation**: report every invalid field at once
//! - **Bank construction**: build the configured log-Gabor or circular-Gabor bank
//!
//! # Example
//!
//! ```rust,no_run
//! use fringe_analysis::EstimationMode;
//! use fringe_config::{AnalysisConfig, BankKind};
//!
//! let config = AnalysisConfig::new("Lattice scan")
//!     .with_bank_kind(BankKind::LogGabor)
//!     .with_frequency_range(2.0, 16.0)
//!     .with_num_filters(7)
//!     .with_mode(EstimationMode::Weighted);
//! config.validate().unwrap();
//! config.save("configs/lattice.toml").unwrap();
//!
//! let loaded = AnalysisConfig::load("configs/lattice.toml").unwrap();
//! let bank = loaded.build_bank().unwrap();
//! assert_eq!(bank.frequencies().len(), 7);
//! ```

mod config;
mod error;

/// Configuration validation.
pub mod validation;

pub use config::{
    AnalysisConfig, BankConfig, BankKind, BitmapConfig, ConfiguredBank, EstimationConfig,
    ResizeConfig,
};
pub use error::ConfigError;
pub use validation::{ValidationError, ValidationResult, validate_config};
