//! Pixel or coefficient arrays bound to a [`Grid`].
//!
//! An [`Image`] owns an `(height, width, channels)` array and the grid that
//! describes its sampling. The domain is always read through the grid.
//! Spatial images are usually real (`Image<f64>`); the forward transform
//! yields complex coefficients (`Image<Complex64>`).
//!
//! # Example
//!
//! ```rust
//! use fringe_core::{Domain, Image};
//! use ndarray::Array2;
//!
//! let pixels = Array2::from_shape_fn((8, 8), |(i, j)| ((i + j) % 2) as f64);
//! let image = Image::from_plane(pixels, None).unwrap();
//!
//! let spectrum = image.ft().unwrap();
//! assert_eq!(spectrum.domain(), Domain::Frequency);
//!
//! let back = spectrum.ift().unwrap();
//! assert!((back.channels()[[3, 4, 0]] - 1.0).abs() < 1e-12);
//! ```

use ndarray::{Array2, Array3, ArrayD, ArrayView2, Axis, Ix2, Ix3, s};
use rustfft::num_complex::Complex64;
use std::fmt::Debug;
use std::ops::{Add, Mul, Range};

use crate::error::{Error, Result};
use crate::fft::{Fft2d, fftshift, ifftshift};
use crate::grid::{Grid, Scale, dispatch_resize_args};
use crate::unit::Domain;

/// Element type an [`Image`] can hold.
///
/// Implemented for `f64` (real pixels and responses) and `Complex64`
/// (Fourier coefficients).
pub trait Sample:
    Copy + Default + PartialEq + Debug + Add<Output = Self> + Mul<f64, Output = Self> + Send + Sync + 'static
{
    /// Widen to a complex value.
    fn to_complex(self) -> Complex64;
}

impl Sample for f64 {
    #[inline]
    fn to_complex(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }
}

impl Sample for Complex64 {
    #[inline]
    fn to_complex(self) -> Complex64 {
        self
    }
}

/// Samples plus the grid they live on.
///
/// Invariant: the first two array dimensions equal `(grid.height(), grid.width())`
/// and there is at least one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T: Sample = f64> {
    channels: Array3<T>,
    grid: Grid,
}

impl<T: Sample> Image<T> {
    /// Build an image from a 2D or 3D array.
    ///
    /// A 2D array becomes a single-channel image. Without a grid, an integer
    /// pixel grid is inferred.
    pub fn new(channels: ArrayD<T>, grid: Option<Grid>) -> Result<Self> {
        match channels.ndim() {
            2 => {
                let plane = channels
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| Error::ImageSpec(e.to_string()))?;
                Self::from_plane(plane, grid)
            }
            3 => {
                let stack = channels
                    .into_dimensionality::<Ix3>()
                    .map_err(|e| Error::ImageSpec(e.to_string()))?;
                Self::from_channels(stack, grid)
            }
            n => Err(Error::ImageSpec(format!(
                "channels must be a 2- or 3-dimensional array, got {n} dimensions"
            ))),
        }
    }

    /// Single-channel image from a 2D array.
    pub fn from_plane(plane: Array2<T>, grid: Option<Grid>) -> Result<Self> {
        Self::from_channels(plane.insert_axis(Axis(2)), grid)
    }

    /// Image from an `(height, width, channels)` array.
    pub fn from_channels(channels: Array3<T>, grid: Option<Grid>) -> Result<Self> {
        let (rows, cols, depth) = channels.dim();
        if depth == 0 {
            return Err(Error::ImageSpec("image must have at least one channel".into()));
        }
        let grid = match grid {
            Some(grid) => grid,
            None => Grid::pixel(rows, cols).map_err(|e| Error::ImageSpec(e.to_string()))?,
        };
        if (rows, cols) != grid.size() {
            return Err(Error::ImageSpec(format!(
                "channel dimensions {:?} are not consistent with grid size {:?}",
                (rows, cols),
                grid.size()
            )));
        }
        Ok(Self { channels, grid })
    }

    /// Sampling grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Samples as `(height, width, channels)`.
    pub fn channels(&self) -> &Array3<T> {
        &self.channels
    }

    /// One channel as a 2D view.
    pub fn channel(&self, index: usize) -> ArrayView2<'_, T> {
        self.channels.index_axis(Axis(2), index)
    }

    /// Split into samples and grid.
    pub fn into_parts(self) -> (Array3<T>, Grid) {
        (self.channels, self.grid)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.channels.dim().1
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.channels.dim().0
    }

    /// `(height, width)`.
    pub fn size(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.dim().2
    }

    /// Domain of the grid.
    pub fn domain(&self) -> Domain {
        self.grid.domain()
    }

    /// Copy with complex samples.
    pub fn to_complex(&self) -> Image<Complex64> {
        Image {
            channels: self.channels.mapv(Sample::to_complex),
            grid: self.grid.clone(),
        }
    }

    /// Sub-image over `[rows, cols, channels]`; missing ranges select everything.
    pub fn slice(&self, ranges: &[Range<usize>]) -> Result<Self> {
        let grid = self.grid.slice(ranges)?;
        let rows = ranges.first().cloned().unwrap_or(0..self.height());
        let cols = ranges.get(1).cloned().unwrap_or(0..self.width());
        let depth = ranges.get(2).cloned().unwrap_or(0..self.num_channels());
        if depth.start >= depth.end || depth.end > self.num_channels() {
            return Err(Error::ImageSpec(format!(
                "channel range {depth:?} invalid for {} channel(s)",
                self.num_channels()
            )));
        }
        Self::from_channels(self.channels.slice(s![rows, cols, depth]).to_owned(), Some(grid))
    }

    /// Resample pixels and grid to a new size.
    ///
    /// Exactly one of `scale` and `new_size` (`(height, width)`) must be
    /// given. Pixels are linearly interpolated at the same positions the
    /// resized grid samples, so resizing to the current size is the identity.
    pub fn resize(&self, scale: Option<Scale>, new_size: Option<(usize, usize)>) -> Result<Self> {
        let (height, width) = dispatch_resize_args(scale, self.size(), new_size)?;
        let grid = self.grid.resize(None, Some((height, width)))?;

        let mut out = Array3::from_elem((height, width, self.num_channels()), T::default());
        for (mut dst, src) in out
            .axis_iter_mut(Axis(2))
            .zip(self.channels.axis_iter(Axis(2)))
        {
            dst.assign(&resample_bilinear(src, height, width));
        }
        Self::from_channels(out, Some(grid))
    }

    /// Forward 2D Fourier transform with the zero frequency centred.
    ///
    /// Only defined for single-channel spatial images.
    pub fn ft(&self) -> Result<Image<Complex64>> {
        if self.domain() != Domain::Spatial {
            return Err(Error::ImageFt(
                "the forward transform is only meaningful for spatial images".into(),
            ));
        }
        if self.num_channels() != 1 {
            return Err(Error::ImageFt(format!(
                "only single-channel images can be transformed, got {} channels",
                self.num_channels()
            )));
        }
        let grid = self.grid.transform_to(Domain::Frequency)?;

        let (rows, cols) = self.size();
        let mut plane = self.channel(0).mapv(Sample::to_complex);
        Fft2d::new(rows, cols).forward(&mut plane);

        #[cfg(feature = "tracing")]
        tracing::debug!(rows, cols, "image: forward transform");

        Image::from_plane(fftshift(&plane), Some(grid))
    }

    /// Inverse 2D Fourier transform of every channel, keeping the real part.
    ///
    /// The imaginary residue is discarded without being checked.
    pub fn ift(&self) -> Result<Image<f64>> {
        if self.domain() != Domain::Frequency {
            return Err(Error::ImageFt(
                "the image is already spatial; inverse transform is not meaningful".into(),
            ));
        }
        let grid = self.grid.transform_to(Domain::Spatial)?;

        let (rows, cols) = self.size();
        let fft = Fft2d::new(rows, cols);
        let mut out = Array3::zeros((rows, cols, self.num_channels()));
        for (mut dst, src) in out
            .axis_iter_mut(Axis(2))
            .zip(self.channels.axis_iter(Axis(2)))
        {
            let mut plane = ifftshift(&src.mapv(Sample::to_complex));
            fft.inverse(&mut plane);
            dst.assign(&plane.mapv(|c| c.re));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(rows, cols, channels = self.num_channels(), "image: inverse transform");

        Image::from_channels(out, Some(grid))
    }
}

/// Bilinear resampling with endpoint-aligned sample positions.
fn resample_bilinear<T: Sample>(src: ArrayView2<'_, T>, height: usize, width: usize) -> Array2<T> {
    let (rows, cols) = src.dim();
    let row_positions: Vec<(usize, usize, f64)> = (0..height)
        .map(|i| source_position(i, height, rows))
        .collect();
    let col_positions: Vec<(usize, usize, f64)> =
        (0..width).map(|j| source_position(j, width, cols)).collect();

    Array2::from_shape_fn((height, width), |(i, j)| {
        let (r0, r1, tr) = row_positions[i];
        let (c0, c1, tc) = col_positions[j];
        let top = src[[r0, c0]] * (1.0 - tc) + src[[r0, c1]] * tc;
        let bottom = src[[r1, c0]] * (1.0 - tc) + src[[r1, c1]] * tc;
        top * (1.0 - tr) + bottom * tr
    })
}

/// Neighbouring source indices and blend weight for target index `k`.
fn source_position(k: usize, target_len: usize, source_len: usize) -> (usize, usize, f64) {
    if target_len < 2 || source_len < 2 {
        return (0, 0, 0.0);
    }
    let pos = k as f64 * (source_len - 1) as f64 / (target_len - 1) as f64;
    let lower = (pos.floor() as usize).min(source_len - 1);
    let upper = (lower + 1).min(source_len - 1);
    (lower, upper, pos - lower as f64)
}
