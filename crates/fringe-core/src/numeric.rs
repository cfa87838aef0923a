//! Small numeric helpers shared by grids and filters.

use ndarray::{Array1, Array2, Zip};

/// Decimal resolution of `f64`, the `eps` used by [`uniquetol`].
pub const F64_RESOLUTION: f64 = 1e-15;

/// Tolerance-aware deduplication, first occurrence wins.
///
/// A value is dropped when it lies within `tolerance + 2·eps` (absolute
/// difference) of any *earlier* value in `values`. Order of the survivors is
/// preserved. This is O(n²) and meant for short slices such as the ratios
/// between consecutive filter frequencies.
///
/// ```
/// use fringe_core::numeric::uniquetol;
///
/// assert_eq!(uniquetol(&[1.0, 1.0, 2.0, 2.00001, 5.0], 1e-4), vec![1.0, 2.0, 5.0]);
/// assert_eq!(uniquetol(&[1.0, 1.1], 1e-4), vec![1.0, 1.1]);
/// ```
pub fn uniquetol(values: &[f64], tolerance: f64) -> Vec<f64> {
    let threshold = tolerance + 2.0 * F64_RESOLUTION;
    values
        .iter()
        .enumerate()
        .filter(|&(j, &v)| !values[..j].iter().any(|&u| (u - v).abs() <= threshold))
        .map(|(_, &v)| v)
        .collect()
}

/// `n` evenly spaced samples over `[start, stop]`, endpoints included.
///
/// Matches the usual scientific-library convention: `n == 1` yields
/// `[start]` and the last sample is exactly `stop`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out = Array1::from_shape_fn(n, |i| start + step * i as f64);
            out[n - 1] = stop;
            out
        }
    }
}

/// Radial distance and half-wave-rectified squared direction cosine.
///
/// For frequency coordinates `(f_x, f_y)` and a preferred direction `θ`:
///
/// ```text
/// r = sqrt(f_x² + f_y²)
/// u = (f_x, f_y) / r        (0 where r == 0)
/// d = max(0, u · (cos θ, sin θ))²
/// ```
///
/// `d` is the angular falloff shared by every oriented filter profile.
pub fn polar_components(
    f_x: &Array2<f64>,
    f_y: &Array2<f64>,
    direction: f64,
) -> (Array2<f64>, Array2<f64>) {
    let (sin, cos) = direction.sin_cos();
    let mut radius = Array2::zeros(f_x.raw_dim());
    let mut directional = Array2::zeros(f_x.raw_dim());

    Zip::from(&mut radius)
        .and(&mut directional)
        .and(f_x)
        .and(f_y)
        .for_each(|r, d, &x, &y| {
            let rr = x.hypot(y);
            *r = rr;
            *d = if rr > 0.0 {
                let projection = (x * cos + y * sin) / rr;
                projection.max(0.0).powi(2)
            } else {
                0.0
            };
        });

    (radius, directional)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn uniquetol_drops_near_duplicates() {
        assert_eq!(
            uniquetol(&[1.0, 1.0, 2.0, 2.00001, 5.0], 1e-4),
            vec![1.0, 2.0, 5.0]
        );
    }

    #[test]
    fn uniquetol_keeps_distinct_values() {
        assert_eq!(uniquetol(&[1.0, 1.1], 1e-4), vec![1.0, 1.1]);
    }

    #[test]
    fn uniquetol_first_occurrence_wins() {
        // 2.00001 is kept because it comes first; 2.0 is then within tolerance.
        assert_eq!(uniquetol(&[2.00001, 2.0], 1e-4), vec![2.00001]);
        assert!(uniquetol(&[], 1e-4).is_empty());
    }

    #[test]
    fn linspace_endpoints() {
        let x = linspace(-1.0, 1.0, 5);
        assert_eq!(x.to_vec(), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 7.0, 1).to_vec(), vec![3.0]);
        assert_eq!(linspace(3.0, 7.0, 0).len(), 0);
    }

    #[test]
    fn polar_components_masks_origin() {
        let fx = array![[0.0, 1.0], [-1.0, 0.0]];
        let fy = array![[0.0, 0.0], [0.0, 2.0]];
        let (r, d) = polar_components(&fx, &fy, 0.0);

        assert_eq!(r[[0, 0]], 0.0);
        assert_eq!(d[[0, 0]], 0.0);
        assert_eq!(r[[1, 1]], 2.0);
        // +x aligned: full response; -x: rectified to zero; +y: orthogonal.
        assert!((d[[0, 1]] - 1.0).abs() < 1e-12);
        assert_eq!(d[[1, 0]], 0.0);
        assert!(d[[1, 1]].abs() < 1e-12);
    }

    #[test]
    fn polar_components_orthogonal_direction() {
        let fx = array![[0.0, 3.0]];
        let fy = array![[3.0, 3.0]];
        let (_, d) = polar_components(&fx, &fy, FRAC_PI_2);
        assert!((d[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((d[[0, 1]] - 0.5).abs() < 1e-12);
    }
}
