//! Error types for grid, image and unit operations.

use thiserror::Error;

/// Errors raised by grid, image and composite operations.
///
/// Every variant signals an input or programmer error. Nothing in this crate
/// retries or substitutes a default after raising one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Coordinate arrays are not 1- or 2-dimensional, are empty, or disagree in shape.
    #[error("invalid grid specification: {0}")]
    GridSpec(String),

    /// Neither or both of `scale` and `new_size` were given to a resize call.
    #[error("exactly one of 'scale' and 'new_size' must be specified ({0})")]
    DispatchResizeArgs(String),

    /// Transform requested towards the domain the grid is already in.
    #[error("grid is already {domain}-domain; transforming to {domain} is not meaningful")]
    GridTransform {
        /// Domain the grid is (and would stay) in.
        domain: String,
    },

    /// Axis spacing requested on an axis with fewer than two samples.
    #[error("axis {axis} has {len} sample(s); spacing needs at least 2")]
    DegenerateAxis {
        /// Axis index (0 or 1).
        axis: usize,
        /// Number of samples along the axis.
        len: usize,
    },

    /// Pixel array has the wrong rank, or disagrees with its grid.
    #[error("invalid image specification: {0}")]
    ImageSpec(String),

    /// Forward or inverse Fourier transform requested on an unsuitable image.
    #[error("Fourier transform not applicable: {0}")]
    ImageFt(String),

    /// Bitmap pixels have an unsupported rank or channel count.
    #[error("unsupported bitmap: {0}")]
    ImageIo(String),

    /// Composite requested with no channels, too many, or mismatched shapes.
    #[error("cannot build composite: {0}")]
    Composite(String),
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
