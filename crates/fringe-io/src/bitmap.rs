//! Bitmap file loading.

use std::path::Path;

use fringe_core::{BitmapOptions, Image};
use image::{DynamicImage, ImageReader};
use ndarray::{ArrayD, IxDyn};

use crate::{Error, Result};

/// Decode a bitmap file into raw samples and their white level.
///
/// The returned array is `(H, W)` for luminance data, `(H, W, 3)` for RGB and
/// `(H, W, 4)` for RGBA; luminance with alpha is widened to RGBA. Samples keep
/// their stored scale: the white level is 255 for 8-bit data, 65535 for
/// 16-bit data and 1.0 for floating point data.
pub fn read_bitmap_pixels<P: AsRef<Path>>(path: P) -> Result<(ArrayD<f64>, f64)> {
    let decoded = ImageReader::open(path.as_ref())?
        .with_guessed_format()?
        .decode()?;
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);

    let (samples, depth, white_level) = match &decoded {
        DynamicImage::ImageLuma8(buf) => (widen(buf.as_raw()), 1, 255.0),
        DynamicImage::ImageLuma16(buf) => (widen(buf.as_raw()), 1, 65535.0),
        DynamicImage::ImageRgb8(buf) => (widen(buf.as_raw()), 3, 255.0),
        DynamicImage::ImageRgb16(buf) => (widen(buf.as_raw()), 3, 65535.0),
        DynamicImage::ImageRgb32F(buf) => (widen(buf.as_raw()), 3, 1.0),
        DynamicImage::ImageRgba8(buf) => (widen(buf.as_raw()), 4, 255.0),
        DynamicImage::ImageRgba16(buf) => (widen(buf.as_raw()), 4, 65535.0),
        DynamicImage::ImageRgba32F(buf) => (widen(buf.as_raw()), 4, 1.0),
        DynamicImage::ImageLumaA8(_) => (widen(decoded.to_rgba8().as_raw()), 4, 255.0),
        DynamicImage::ImageLumaA16(_) => (widen(decoded.to_rgba16().as_raw()), 4, 65535.0),
        other => return Err(Error::UnsupportedColor(format!("{:?}", other.color()))),
    };

    let shape = if depth == 1 {
        vec![height, width]
    } else {
        vec![height, width, depth]
    };
    let pixels = ArrayD::from_shape_vec(IxDyn(&shape), samples)
        .map_err(|e| fringe_core::Error::ImageIo(e.to_string()))?;
    Ok((pixels, white_level))
}

/// Load a bitmap file as a spatial image.
///
/// Colour handling and the pixel grid follow [`Image::from_bitmap_pixels`]:
/// grayscale reduction when `options.grayscale` is set, collapse of RGB
/// images with identical planes, and a grid scaled and offset by `options`.
///
/// # Example
/// ```ignore
/// use fringe_core::{BitmapOptions, Unit};
///
/// let options = BitmapOptions { scale: 0.02, unit: Unit::NANOMETER, ..Default::default() };
/// let image = fringe_io::read_bitmap("lattice.png", &options)?;
/// println!("{} x {} px", image.width(), image.height());
/// ```
pub fn read_bitmap<P: AsRef<Path>>(path: P, options: &BitmapOptions) -> Result<Image<f64>> {
    let path = path.as_ref();
    let (pixels, white_level) = read_bitmap_pixels(path)?;
    let source_channels = if pixels.ndim() == 3 {
        pixels.shape()[2]
    } else {
        1
    };

    let image = Image::from_bitmap_pixels(pixels, white_level, options)?;

    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        channels = image.num_channels(),
        "Loaded bitmap"
    );
    tracing::debug!(
        source_channels,
        white_level,
        unit = %image.grid().unit(),
        grayscale = options.grayscale,
        "Bitmap conversion"
    );

    Ok(image)
}

fn widen<T: Copy + Into<f64>>(raw: &[T]) -> Vec<f64> {
    raw.iter().map(|&v| v.into()).collect()
}
