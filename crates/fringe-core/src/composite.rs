//! Combine up to three 2D maps into one 3-channel visualization array.

use ndarray::{Array3, ArrayView2, Axis};

use crate::error::{Error, Result};

/// Shift and scale `channel` into `[0, 1]`.
///
/// A constant channel maps to all zeros.
pub fn normalize(channel: ArrayView2<'_, f64>) -> ndarray::Array2<f64> {
    let min = channel.iter().copied().fold(f64::INFINITY, f64::min);
    let max = channel.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span > 0.0 && span.is_finite() {
        channel.mapv(|v| (v - min) / span)
    } else {
        ndarray::Array2::zeros(channel.raw_dim())
    }
}

/// Stack 1 to 3 same-shaped 2D maps into an `(H, W, 3)` array.
///
/// Unused trailing channels stay zero. With `normalize` set, each input is
/// independently rescaled into `[0, 1]` first.
pub fn composite(channels: &[ArrayView2<'_, f64>], normalize: bool) -> Result<Array3<f64>> {
    let first = match channels {
        [] => return Err(Error::Composite("at least one channel must be given".into())),
        [first, ..] if channels.len() <= 3 => first,
        _ => {
            return Err(Error::Composite(format!(
                "at most 3 channels can be given, got {}",
                channels.len()
            )));
        }
    };
    if let Some(bad) = channels.iter().find(|c| c.dim() != first.dim()) {
        return Err(Error::Composite(format!(
            "all channels must have shape {:?}, got {:?}",
            first.dim(),
            bad.dim()
        )));
    }

    let (rows, cols) = first.dim();
    let mut out = Array3::zeros((rows, cols, 3));
    for (k, channel) in channels.iter().enumerate() {
        let mut plane = out.index_axis_mut(Axis(2), k);
        if normalize {
            plane.assign(&self::normalize(channel.view()));
        } else {
            plane.assign(channel);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn composite_normalizes_each_channel() {
        let a = array![[0.0, 2.0], [4.0, 8.0]];
        let b = array![[-1.0, -1.0], [1.0, 1.0]];
        let out = composite(&[a.view(), b.view()], true).unwrap();

        assert_eq!(out.dim(), (2, 2, 3));
        assert_eq!(out[[1, 1, 0]], 1.0);
        assert_eq!(out[[0, 1, 0]], 0.25);
        assert_eq!(out[[0, 0, 1]], 0.0);
        assert_eq!(out[[1, 0, 1]], 1.0);
        assert!(out.index_axis(Axis(2), 2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn composite_without_normalization_copies() {
        let a = array![[5.0, -3.0]];
        let out = composite(&[a.view()], false).unwrap();
        assert_eq!(out[[0, 0, 0]], 5.0);
        assert_eq!(out[[0, 1, 0]], -3.0);
    }

    #[test]
    fn constant_channel_normalizes_to_zero() {
        let flat = Array2::from_elem((3, 3), 7.0);
        assert!(normalize(flat.view()).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn composite_rejects_bad_inputs() {
        let a = Array2::<f64>::zeros((2, 2));
        let b = Array2::<f64>::zeros((2, 3));
        assert!(matches!(composite(&[], true), Err(Error::Composite(_))));
        assert!(matches!(
            composite(&[a.view(), a.view(), a.view(), a.view()], true),
            Err(Error::Composite(_))
        ));
        assert!(matches!(
            composite(&[a.view(), b.view()], true),
            Err(Error::Composite(_))
        ));
    }
}
