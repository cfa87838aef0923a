//! Fringe Analysis - oriented filter banks for local lattice frequency
//!
//! This crate estimates, per pixel, the dominant spatial frequency of a
//! periodic pattern (lattice fringes in micrographs, gratings, textures):
//!
//! - [`profile`] - Radial profiles ([`LogGabor`], [`CircularGabor`])
//! - [`filter`] - Two-lobe oriented [`Filter`] with a kernel cache
//! - [`filterbank`] - Geometric [`FilterBank`] and its factory
//! - [`estimate`] - Strongest-vote and weighted frequency estimation
//!
//! ## Example Workflow
//!
//! ```rust
//! use fringe_analysis::{EstimationMode, LogGaborBank};
//! use fringe_core::{Grid, Image, Unit};
//! use ndarray::{Array1, Array2};
//! use std::f64::consts::PI;
//!
//! // 32 samples per unit length, a grating of 4 cycles per unit.
//! let n = 32;
//! let axis = Array1::from_shape_fn(n, |j| j as f64 / n as f64);
//! let grid = Grid::from_axes(axis.clone(), axis, Unit::METER).unwrap();
//! let pixels = Array2::from_shape_fn((n, n), |(_, j)| (2.0 * PI * 4.0 * j as f64 / n as f64).sin());
//! let image = Image::from_plane(pixels, Some(grid)).unwrap();
//!
//! let mut bank = LogGaborBank::create(1.0, 8.0, 4).unwrap();
//! let map = bank.get_frequencies(&image, EstimationMode::StrongestVote).unwrap();
//! assert!((map.frequency[[16, 16]] - 4.0).abs() < 1e-6);
//! ```
//!
//! # Features
//!
//! - `tracing` - emit `tracing` events for kernel caching, bank construction
//!   and estimation

pub mod error;
pub mod estimate;
pub mod filter;
pub mod filterbank;
pub mod profile;

// Re-export main types
pub use error::{Error, Result};
pub use estimate::{
    EstimationMode, FrequencyEstimate, FrequencyMap, estimate, strongest_vote, weighted,
};
pub use filter::{CircularGaborFilter, Filter, KernelPair, LogGaborFilter};
pub use filterbank::{CircularGaborBank, FilterBank, LogGaborBank, RATIO_TOLERANCE};
pub use profile::{CircularGabor, LogGabor, RadialProfile};
