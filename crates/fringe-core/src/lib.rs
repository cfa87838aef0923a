//! Fringe Core - unit-aware grids and images for lattice fringe analysis
//!
//! This crate provides the data model that every analysis step works on:
//! coordinates that know their physical unit and domain, and images that
//! carry their sampling grid through Fourier transforms and resampling.
//!
//! # Core Abstractions
//!
//! ## Units and Domains
//!
//! - [`Domain`] - Spatial position or spatial frequency
//! - [`Unit`] - Length unit (m, nm, px, custom) or its inverse
//!
//! ## Grids
//!
//! - [`Grid`] - Pair of coordinate meshes plus a unit
//! - [`Scale`] / [`dispatch_resize_args`] - Resize argument handling
//!
//! ## Images
//!
//! - [`Image`] - `(height, width, channels)` samples bound to a grid
//! - [`Sample`] - Real (`f64`) or complex (`Complex64`) sample type
//! - [`BitmapOptions`] - Mapping from bitmap pixels to physical coordinates
//!
//! ## Utilities
//!
//! - [`fft`] - 2D FFT and zero-frequency shifts
//! - [`numeric`] - [`uniquetol`], [`linspace`], polar decomposition
//! - [`composite`] - Overlay of up to three maps for inspection
//!
//! # Example
//!
//! ```rust
//! use fringe_core::{Domain, Grid, Image, Unit};
//! use ndarray::{Array1, Array2};
//!
//! // A 16 × 32 image sampled every 0.5 nm.
//! let grid = Grid::from_axes(
//!     Array1::from_shape_fn(32, |j| j as f64 * 0.5),
//!     Array1::from_shape_fn(16, |i| i as f64 * 0.5),
//!     Unit::NANOMETER,
//! )
//! .unwrap();
//! let image: Image = Image::from_plane(Array2::zeros((16, 32)), Some(grid)).unwrap();
//!
//! let spectrum = image.ft().unwrap();
//! assert_eq!(spectrum.domain(), Domain::Frequency);
//! assert_eq!(spectrum.grid().unit(), &Unit::INVERSE_NANOMETER);
//! ```
//!
//! # Features
//!
//! - `tracing` - emit `tracing` events from transforms and bitmap conversion

pub mod bitmap;
pub mod composite;
pub mod error;
pub mod fft;
pub mod grid;
pub mod image;
pub mod numeric;
pub mod unit;

// Re-export main types at crate root
pub use bitmap::{BitmapOptions, GRAY_WEIGHTS};
pub use composite::{composite, normalize};
pub use error::{Error, Result};
pub use fft::{Fft2d, fft2, fftshift, ifft2, ifftshift};
pub use grid::{Grid, Scale, dispatch_resize_args};
pub use image::{Image, Sample};
pub use numeric::{F64_RESOLUTION, linspace, polar_components, uniquetol};
pub use unit::{Domain, Unit};

pub use rustfft::num_complex::Complex64;
