//! 2D FFT wrapper and zero-frequency centering shifts.

use ndarray::{Array2, Axis};
use rustfft::{Fft, FftPlanner, num_complex::Complex64};
use std::sync::Arc;

/// Row/column separable 2D FFT with cached plans.
///
/// The inverse transform is normalized by `1 / (rows · cols)`, so
/// `inverse(forward(x)) == x` up to rounding.
pub struct Fft2d {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    /// Plan transforms for a `rows × cols` array.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        #[cfg(feature = "tracing")]
        tracing::trace!(rows, cols, "fft2d: planning");
        Self {
            rows,
            cols,
            row_forward: planner.plan_fft_forward(cols),
            row_inverse: planner.plan_fft_inverse(cols),
            col_forward: planner.plan_fft_forward(rows),
            col_inverse: planner.plan_fft_inverse(rows),
        }
    }

    /// Planned shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Forward transform in place.
    pub fn forward(&self, data: &mut Array2<Complex64>) {
        debug_assert_eq!(data.dim(), (self.rows, self.cols));
        Self::process_lanes(data, Axis(1), self.row_forward.as_ref());
        Self::process_lanes(data, Axis(0), self.col_forward.as_ref());
    }

    /// Inverse transform in place, normalized.
    pub fn inverse(&self, data: &mut Array2<Complex64>) {
        debug_assert_eq!(data.dim(), (self.rows, self.cols));
        Self::process_lanes(data, Axis(1), self.row_inverse.as_ref());
        Self::process_lanes(data, Axis(0), self.col_inverse.as_ref());

        let scale = 1.0 / (self.rows * self.cols) as f64;
        data.mapv_inplace(|c| c * scale);
    }

    /// Run a 1D plan along every lane of `axis`, gathering each lane into a
    /// contiguous buffer first.
    fn process_lanes(data: &mut Array2<Complex64>, axis: Axis, plan: &dyn Fft<f64>) {
        let mut buffer = Vec::with_capacity(data.len_of(axis));
        for mut lane in data.lanes_mut(axis) {
            buffer.clear();
            buffer.extend(lane.iter().copied());
            plan.process(&mut buffer);
            for (dst, src) in lane.iter_mut().zip(&buffer) {
                *dst = *src;
            }
        }
    }
}

/// Forward 2D FFT of `data`, returning a new array.
pub fn fft2(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    let mut out = data.clone();
    Fft2d::new(rows, cols).forward(&mut out);
    out
}

/// Normalized inverse 2D FFT of `data`, returning a new array.
pub fn ifft2(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (rows, cols) = data.dim();
    let mut out = data.clone();
    Fft2d::new(rows, cols).inverse(&mut out);
    out
}

/// Move the zero-frequency sample to the array centre.
pub fn fftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    roll(data, rows / 2, cols / 2)
}

/// Undo [`fftshift`], also for odd-sized axes.
pub fn ifftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    roll(data, rows - rows / 2, cols - cols / 2)
}

/// Circularly shift rows down by `dr` and columns right by `dc`.
fn roll<T: Clone>(data: &Array2<T>, dr: usize, dc: usize) -> Array2<T> {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return data.clone();
    }
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        data[[(i + rows - dr % rows) % rows, (j + cols - dc % cols) % cols]].clone()
    })
}
