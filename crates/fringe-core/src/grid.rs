//! Coordinate grids over the spatial or frequency domain.
//!
//! A [`Grid`] holds two coordinate meshes of identical shape `(height, width)`
//! together with a [`Unit`]. Its domain is read from the unit. Grids are plain
//! values: [`Grid::transform`] and [`Grid::resize`] return new grids and never
//! mutate in place.
//!
//! # Axis convention
//!
//! `coords_0` varies along columns and `coords_1` along rows, as produced by a
//! `meshgrid(axis_0, axis_1)`. So `axis_0` is the first row of `coords_0`
//! (length `width`) and `axis_1` is the first column of `coords_1` (length
//! `height`).
//!
//! # Example
//!
//! ```rust
//! use fringe_core::{Domain, Grid, Unit};
//!
//! let grid = Grid::pixel(32, 64).unwrap();
//! let spectrum_grid = grid.transform().unwrap();
//! assert_eq!(spectrum_grid.domain(), Domain::Frequency);
//! assert_eq!(spectrum_grid.unit(), &Unit::INVERSE_PIXEL);
//! assert_eq!(spectrum_grid.size(), (32, 64));
//! ```

use ndarray::{Array1, Array2, Array3, ArrayD, ArrayView1, Ix1, Ix2, s};
use std::ops::Range;

use crate::composite::composite;
use crate::error::{Error, Result};
use crate::numeric::linspace;
use crate::unit::{Domain, Unit};

/// Resampling factor for [`Grid::resize`] and [`crate::Image::resize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Same factor on both axes.
    Uniform(f64),
    /// Separate `(height, width)` factors.
    PerAxis(f64, f64),
}

impl Scale {
    /// Factors as `(height, width)`.
    pub fn factors(self) -> (f64, f64) {
        match self {
            Scale::Uniform(s) => (s, s),
            Scale::PerAxis(h, w) => (h, w),
        }
    }
}

impl From<f64> for Scale {
    fn from(scale: f64) -> Self {
        Scale::Uniform(scale)
    }
}

impl From<(f64, f64)> for Scale {
    fn from((h, w): (f64, f64)) -> Self {
        Scale::PerAxis(h, w)
    }
}

/// Resolve resize arguments into a target `(height, width)`.
///
/// Exactly one of `scale` and `new_size` must be given. With a scale, each
/// new length is `round(old_length · factor)`.
pub fn dispatch_resize_args(
    scale: Option<Scale>,
    old_size: (usize, usize),
    new_size: Option<(usize, usize)>,
) -> Result<(usize, usize)> {
    match (scale, new_size) {
        (None, None) => Err(Error::DispatchResizeArgs("neither was given".into())),
        (Some(_), Some(_)) => Err(Error::DispatchResizeArgs("both were given".into())),
        (None, Some(size)) => Ok(size),
        (Some(scale), None) => {
            let (sh, sw) = scale.factors();
            if !(sh > 0.0 && sw > 0.0 && sh.is_finite() && sw.is_finite()) {
                return Err(Error::DispatchResizeArgs(format!(
                    "scale factors must be positive and finite, got ({sh}, {sw})"
                )));
            }
            Ok((
                (old_size.0 as f64 * sh).round() as usize,
                (old_size.1 as f64 * sw).round() as usize,
            ))
        }
    }
}

/// A 2D coordinate grid with a unit and, through it, a domain.
#[derive(Debug, Clone)]
pub struct Grid {
    coords_0: Array2<f64>,
    coords_1: Array2<f64>,
    unit: Unit,
}

impl Grid {
    /// Build a grid from coordinate arrays of rank 1 (axes) or rank 2 (meshes).
    ///
    /// Two axes are expanded into meshes. Two meshes must share one shape.
    /// Mixed ranks, other ranks, or empty arrays are rejected.
    pub fn new(coords_0: ArrayD<f64>, coords_1: ArrayD<f64>, unit: Unit) -> Result<Self> {
        match (coords_0.ndim(), coords_1.ndim()) {
            (1, 1) => {
                let axis_0 = into_dim::<Ix1>(coords_0)?;
                let axis_1 = into_dim::<Ix1>(coords_1)?;
                Self::from_axes(axis_0, axis_1, unit)
            }
            (2, 2) => {
                let mesh_0 = into_dim::<Ix2>(coords_0)?;
                let mesh_1 = into_dim::<Ix2>(coords_1)?;
                Self::from_mesh(mesh_0, mesh_1, unit)
            }
            (a, b) => Err(Error::GridSpec(format!(
                "coordinates must both be 1- or both be 2-dimensional, got {a} and {b} dimensions"
            ))),
        }
    }

    /// Build a grid from two axes, expanding them into meshes.
    pub fn from_axes(axis_0: Array1<f64>, axis_1: Array1<f64>, unit: Unit) -> Result<Self> {
        let (width, height) = (axis_0.len(), axis_1.len());
        let coords_0 = Array2::from_shape_fn((height, width), |(_, j)| axis_0[j]);
        let coords_1 = Array2::from_shape_fn((height, width), |(i, _)| axis_1[i]);
        Self::from_mesh(coords_0, coords_1, unit)
    }

    /// Build a grid from two coordinate meshes of equal shape.
    pub fn from_mesh(coords_0: Array2<f64>, coords_1: Array2<f64>, unit: Unit) -> Result<Self> {
        if coords_0.dim() != coords_1.dim() {
            return Err(Error::GridSpec(format!(
                "coordinate meshes differ in shape: {:?} vs {:?}",
                coords_0.dim(),
                coords_1.dim()
            )));
        }
        if coords_0.is_empty() {
            return Err(Error::GridSpec("coordinate meshes are empty".into()));
        }
        Ok(Self {
            coords_0,
            coords_1,
            unit,
        })
    }

    /// Integer pixel grid `0..width` × `0..height` in [`Unit::PIXEL`].
    pub fn pixel(height: usize, width: usize) -> Result<Self> {
        Self::from_axes(
            Array1::from_shape_fn(width, |j| j as f64),
            Array1::from_shape_fn(height, |i| i as f64),
            Unit::PIXEL,
        )
    }

    /// Coordinate mesh varying along columns.
    pub fn coords_0(&self) -> &Array2<f64> {
        &self.coords_0
    }

    /// Coordinate mesh varying along rows.
    pub fn coords_1(&self) -> &Array2<f64> {
        &self.coords_1
    }

    /// Unit of both axes.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Domain, derived from the unit.
    pub fn domain(&self) -> Domain {
        self.unit.domain()
    }

    /// First row of `coords_0`.
    pub fn axis_0(&self) -> ArrayView1<'_, f64> {
        self.coords_0.row(0)
    }

    /// First column of `coords_1`.
    pub fn axis_1(&self) -> ArrayView1<'_, f64> {
        self.coords_1.column(0)
    }

    /// First and last values of `axis_0`.
    pub fn extent_0(&self) -> (f64, f64) {
        let axis = self.axis_0();
        (axis[0], axis[axis.len() - 1])
    }

    /// First and last values of `axis_1`.
    pub fn extent_1(&self) -> (f64, f64) {
        let axis = self.axis_1();
        (axis[0], axis[axis.len() - 1])
    }

    /// Number of samples along `axis_0`.
    pub fn width(&self) -> usize {
        self.coords_0.ncols()
    }

    /// Number of samples along `axis_1`.
    pub fn height(&self) -> usize {
        self.coords_0.nrows()
    }

    /// `(height, width)`.
    pub fn size(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Sample spacing along `axis_0`.
    pub fn delta_0(&self) -> Result<f64> {
        axis_delta(self.axis_0(), 0)
    }

    /// Sample spacing along `axis_1`.
    pub fn delta_1(&self) -> Result<f64> {
        axis_delta(self.axis_1(), 1)
    }

    /// Flip the grid into the conjugate domain.
    ///
    /// Spatial → frequency produces the centred discrete Fourier frequency
    /// axes `arange(-n/2, n/2) / δ / n` (cycles per original unit).
    ///
    /// Frequency → spatial produces `linspace(0, extent, n)` where `extent`
    /// is the span of the frequency axis. The absolute offset of the original
    /// spatial grid is not recoverable.
    pub fn transform(&self) -> Result<Grid> {
        match self.domain() {
            Domain::Spatial => {
                let axis_0 = centered_frequencies(self.width(), self.delta_0()?);
                let axis_1 = centered_frequencies(self.height(), self.delta_1()?);
                Grid::from_axes(axis_0, axis_1, self.unit.transform_unit())
            }
            Domain::Frequency => {
                let (a0, b0) = self.extent_0();
                let (a1, b1) = self.extent_1();
                Grid::from_axes(
                    linspace(0.0, b0 - a0, self.width()),
                    linspace(0.0, b1 - a1, self.height()),
                    self.unit.transform_unit(),
                )
            }
        }
    }

    /// Transform into `target`, failing if the grid is already there.
    pub fn transform_to(&self, target: Domain) -> Result<Grid> {
        if self.domain() == target {
            return Err(Error::GridTransform {
                domain: target.to_string(),
            });
        }
        self.transform()
    }

    /// Re-sample both axes over their current extents.
    ///
    /// Exactly one of `scale` and `new_size` (`(height, width)`) must be
    /// given. This changes resolution; it never crops.
    pub fn resize(&self, scale: Option<Scale>, new_size: Option<(usize, usize)>) -> Result<Grid> {
        let (height, width) = dispatch_resize_args(scale, self.size(), new_size)?;
        let (a0, b0) = self.extent_0();
        let (a1, b1) = self.extent_1();
        Grid::from_axes(
            linspace(a0, b0, width),
            linspace(a1, b1, height),
            self.unit.clone(),
        )
    }

    /// Sub-grid over `ranges` (`[rows, cols]`).
    ///
    /// A single range slices rows only. Entries past the second are ignored,
    /// so an image's `[rows, cols, channels]` index can be passed unchanged.
    pub fn slice(&self, ranges: &[Range<usize>]) -> Result<Grid> {
        let rows = ranges.first().cloned().unwrap_or(0..self.height());
        let cols = ranges.get(1).cloned().unwrap_or(0..self.width());
        if rows.start > rows.end || rows.end > self.height() {
            return Err(Error::GridSpec(format!(
                "row range {rows:?} out of bounds for height {}",
                self.height()
            )));
        }
        if cols.start > cols.end || cols.end > self.width() {
            return Err(Error::GridSpec(format!(
                "column range {cols:?} out of bounds for width {}",
                self.width()
            )));
        }
        Grid::from_mesh(
            self.coords_0.slice(s![rows.clone(), cols.clone()]).to_owned(),
            self.coords_1.slice(s![rows, cols]).to_owned(),
            self.unit.clone(),
        )
    }

    /// Visualization of the coordinate layout as an `(H, W, 3)` composite of
    /// `(x, -x, y)`, each scaled by its largest magnitude.
    pub fn composite(&self) -> Result<Array3<f64>> {
        let scaled = |mesh: &Array2<f64>| {
            let peak = mesh.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            let peak = if peak > 0.0 { peak } else { 1.0 };
            mesh / peak
        };
        let x = scaled(&self.coords_0);
        let neg_x = -&x;
        let y = scaled(&self.coords_1);
        composite(&[x.view(), neg_x.view(), y.view()], true)
    }
}

/// Grids compare equal when they share a domain and their coordinate meshes
/// are elementwise identical. This is exact equality, not tolerance-based.
/// Grids of different domains or shapes are simply unequal.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.domain() == other.domain()
            && self.coords_0 == other.coords_0
            && self.coords_1 == other.coords_1
    }
}

fn into_dim<D: ndarray::Dimension>(array: ArrayD<f64>) -> Result<ndarray::Array<f64, D>> {
    array
        .into_dimensionality::<D>()
        .map_err(|e| Error::GridSpec(e.to_string()))
}

fn axis_delta(axis: ArrayView1<'_, f64>, index: usize) -> Result<f64> {
    if axis.len() < 2 {
        return Err(Error::DegenerateAxis {
            axis: index,
            len: axis.len(),
        });
    }
    Ok(axis[1] - axis[0])
}

/// `arange(-n/2, n/2) / delta / n`.
fn centered_frequencies(n: usize, delta: f64) -> Array1<f64> {
    let half = n as f64 / 2.0;
    Array1::from_shape_fn(n, |i| (i as f64 - half) / delta / n as f64)
}
