//! Error types for filter, bank and estimation operations.

use thiserror::Error;

/// Errors raised while building filter banks or estimating frequencies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Consecutive centre-frequency ratios of the bank differ.
    #[error(
        "the frequency multiplier cannot be inferred from ratios {ratios:?}; \
         consider building the bank with `FilterBank::create`"
    )]
    InconsistentProgression {
        /// Ratios that survived tolerance deduplication.
        ratios: Vec<f64>,
    },

    /// Estimation mode string is neither `weighted` nor `strongest_vote`.
    #[error("mode must be 'weighted' or 'strongest_vote', got '{0}'")]
    UnknownMode(String),

    /// A bank needs at least two filters to infer its multiplier.
    #[error("a filter bank needs at least 2 filters, got {0}")]
    TooFewFilters(usize),

    /// Frequency, bandwidth or width parameter out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Grid or image operation failed.
    #[error(transparent)]
    Core(#[from] fringe_core::Error),
}

/// Result type for fringe-analysis operations.
pub type Result<T> = std::result::Result<T, Error>;
