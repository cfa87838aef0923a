//! File I/O for lattice-fringe.
//!
//! This crate provides:
//! - Bitmap loading into spatial [`fringe_core::Image`]s (PNG, JPEG, BMP, TIFF)
//! - PNG output for composites and single response maps

mod bitmap;
mod png;

pub use bitmap::{read_bitmap, read_bitmap_pixels};
pub use png::{write_composite_png, write_gray_png};

/// Error type for I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Decoding or encoding failed inside the `image` crate.
    #[error("image codec error: {0}")]
    Decode(#[from] image::ImageError),

    /// File could not be opened or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoded pixels could not be turned into an image.
    #[error(transparent)]
    Image(#[from] fringe_core::Error),

    /// Pixel layout the loader does not handle.
    #[error("unsupported color type: {0}")]
    UnsupportedColor(String),
}

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
