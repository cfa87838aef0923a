//! PNG output for visual inspection of composites and response maps.

use std::path::Path;

use fringe_core::normalize;
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use ndarray::{Array3, ArrayView2};

use crate::{Error, Result};

/// Write an `(H, W, 3)` composite with samples in `[0, 1]` as an 8-bit RGB PNG.
///
/// Samples outside `[0, 1]` are clamped; NaN is written as black.
///
/// # Example
/// ```ignore
/// let overlay = fringe_core::composite(&[map.frequency.view()], true)?;
/// write_composite_png("frequency.png", &overlay)?;
/// ```
pub fn write_composite_png<P: AsRef<Path>>(path: P, composite: &Array3<f64>) -> Result<()> {
    let (height, width, depth) = composite.dim();
    if depth != 3 {
        return Err(fringe_core::Error::Composite(format!(
            "expected 3 colour planes, got {depth}"
        ))
        .into());
    }

    let buffer = RgbImage::from_fn(dimension(width)?, dimension(height)?, |x, y| {
        let (i, j) = (y as usize, x as usize);
        Rgb([
            to_u8(composite[[i, j, 0]]),
            to_u8(composite[[i, j, 1]]),
            to_u8(composite[[i, j, 2]]),
        ])
    });
    buffer.save_with_format(path.as_ref(), ImageFormat::Png)?;

    tracing::debug!(path = %path.as_ref().display(), width, height, "Wrote composite PNG");
    Ok(())
}

/// Write a 2D map as an 8-bit grayscale PNG, stretched to the full range.
///
/// A constant map is written as black.
pub fn write_gray_png<P: AsRef<Path>>(path: P, map: ArrayView2<'_, f64>) -> Result<()> {
    let (height, width) = map.dim();
    let scaled = normalize(map);
    let buffer = GrayImage::from_fn(dimension(width)?, dimension(height)?, |x, y| {
        Luma([to_u8(scaled[[y as usize, x as usize]])])
    });
    buffer.save_with_format(path.as_ref(), ImageFormat::Png)?;

    tracing::debug!(path = %path.as_ref().display(), width, height, "Wrote grayscale PNG");
    Ok(())
}

fn dimension(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        Error::Image(fringe_core::Error::ImageIo(format!(
            "dimension {len} exceeds the PNG limit"
        )))
    })
}

fn to_u8(value: f64) -> u8 {
    // `as` saturates and maps NaN to 0.
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
