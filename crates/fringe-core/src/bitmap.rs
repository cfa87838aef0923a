//! Conversion of decoded bitmap pixels into a spatial [`Image`].
//!
//! File decoding lives in `fringe-io`; this module only interprets an already
//! decoded `(H, W)`, `(H, W, 3)` or `(H, W, 4)` sample array.

use ndarray::{Array2, Array3, ArrayD, Axis, Ix2, Ix3, Zip};

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::image::Image;
use crate::unit::Unit;

/// Luminance weights applied to normalized RGB samples.
pub const GRAY_WEIGHTS: [f64; 3] = [0.2125, 0.7154, 0.0721];

/// How bitmap pixel indices map onto physical coordinates.
///
/// Pixel `(i, j)` lands at `x = (j - origin.0) · x_scale`,
/// `y = (i - origin.1) · y_scale`. `x_scale` and `y_scale` fall back to
/// `scale` when unset.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapOptions {
    /// Shared scale for both axes.
    pub scale: f64,
    /// Horizontal scale, overriding `scale`.
    pub x_scale: Option<f64>,
    /// Vertical scale, overriding `scale`.
    pub y_scale: Option<f64>,
    /// Unit of the resulting grid.
    pub unit: Unit,
    /// Pixel position `(x, y)` of the coordinate origin.
    pub origin: (f64, f64),
    /// Reduce colour images to one luminance channel.
    pub grayscale: bool,
}

impl Default for BitmapOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x_scale: None,
            y_scale: None,
            unit: Unit::PIXEL,
            origin: (0.0, 0.0),
            grayscale: true,
        }
    }
}

impl BitmapOptions {
    /// Effective `(x, y)` scale factors.
    pub fn scales(&self) -> (f64, f64) {
        (
            self.x_scale.unwrap_or(self.scale),
            self.y_scale.unwrap_or(self.scale),
        )
    }

    /// Grid for a `height × width` bitmap.
    pub fn grid(&self, height: usize, width: usize) -> Result<Grid> {
        let (sx, sy) = self.scales();
        let (ox, oy) = self.origin;
        Grid::from_axes(
            ndarray::Array1::from_shape_fn(width, |j| (j as f64 - ox) * sx),
            ndarray::Array1::from_shape_fn(height, |i| (i as f64 - oy) * sy),
            self.unit.clone(),
        )
    }
}

impl Image<f64> {
    /// Build a spatial image from decoded bitmap samples.
    ///
    /// `white_level` is the sample value of full intensity (255 for 8-bit
    /// data). It is only used by the colour conversions, which produce gray
    /// values in `[0, 1]`; single-channel samples are kept as given.
    ///
    /// With `options.grayscale`, RGBA is composited over a white background
    /// and RGB is reduced with [`GRAY_WEIGHTS`]. Independently of that flag,
    /// an RGB image whose three planes are identical collapses to one channel.
    pub fn from_bitmap_pixels(
        pixels: ArrayD<f64>,
        white_level: f64,
        options: &BitmapOptions,
    ) -> Result<Self> {
        let stack = match pixels.ndim() {
            2 => pixels
                .into_dimensionality::<Ix2>()
                .map_err(|e| Error::ImageIo(e.to_string()))?
                .insert_axis(Axis(2)),
            3 => pixels
                .into_dimensionality::<Ix3>()
                .map_err(|e| Error::ImageIo(e.to_string()))?,
            n => {
                return Err(Error::ImageIo(format!(
                    "multi-dimensional images and scalar series are not supported, got {n} dimensions"
                )));
            }
        };
        let (height, width, depth) = stack.dim();
        if !matches!(depth, 1 | 3 | 4) {
            return Err(Error::ImageIo(format!(
                "expected 1, 3 or 4 channels, got {depth}"
            )));
        }
        if !(white_level > 0.0 && white_level.is_finite()) {
            return Err(Error::ImageIo(format!(
                "white level must be positive and finite, got {white_level}"
            )));
        }

        let channels = match depth {
            4 if options.grayscale => rgb_to_gray(&rgba_to_rgb(&stack, white_level))
                .insert_axis(Axis(2)),
            3 if options.grayscale => {
                rgb_to_gray(&stack.mapv(|v| v / white_level)).insert_axis(Axis(2))
            }
            3 if planes_identical(&stack) => stack.slice(ndarray::s![.., .., 0..1]).to_owned(),
            _ => stack,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            height,
            width,
            source_channels = depth,
            channels = channels.dim().2,
            "bitmap: converted pixels"
        );

        Image::from_channels(channels, Some(options.grid(height, width)?))
    }
}

/// Composite RGBA over white; output samples are in `[0, 1]`.
fn rgba_to_rgb(rgba: &Array3<f64>, white_level: f64) -> Array3<f64> {
    let (height, width, _) = rgba.dim();
    Array3::from_shape_fn((height, width, 3), |(i, j, k)| {
        let alpha = rgba[[i, j, 3]] / white_level;
        let value = rgba[[i, j, k]] / white_level;
        (1.0 - alpha) + alpha * value
    })
}

fn rgb_to_gray(rgb: &Array3<f64>) -> Array2<f64> {
    let [wr, wg, wb] = GRAY_WEIGHTS;
    let mut gray = Array2::zeros((rgb.dim().0, rgb.dim().1));
    Zip::from(&mut gray)
        .and(rgb.index_axis(Axis(2), 0))
        .and(rgb.index_axis(Axis(2), 1))
        .and(rgb.index_axis(Axis(2), 2))
        .for_each(|g, &r, &gr, &b| *g = wr * r + wg * gr + wb * b);
    gray
}

fn planes_identical(stack: &Array3<f64>) -> bool {
    let first = stack.index_axis(Axis(2), 0);
    stack
        .axis_iter(Axis(2))
        .skip(1)
        .all(|plane| plane == first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{IxDyn, array};

    fn dyn3(a: Array3<f64>) -> ArrayD<f64> {
        a.into_dyn()
    }

    #[test]
    fn rejects_bad_rank_and_depth() {
        let opts = BitmapOptions::default();
        let flat = ArrayD::<f64>::zeros(IxDyn(&[4]));
        assert!(matches!(
            Image::from_bitmap_pixels(flat, 255.0, &opts),
            Err(Error::ImageIo(_))
        ));
        let two = dyn3(Array3::zeros((2, 2, 2)));
        assert!(matches!(
            Image::from_bitmap_pixels(two, 255.0, &opts),
            Err(Error::ImageIo(_))
        ));
    }

    #[test]
    fn gray_plane_passes_through() {
        let pixels = array![[0.0, 128.0], [255.0, 64.0]];
        let image =
            Image::from_bitmap_pixels(pixels.clone().into_dyn(), 255.0, &BitmapOptions::default())
                .unwrap();
        assert_eq!(image.num_channels(), 1);
        assert_eq!(image.channel(0), pixels);
    }

    #[test]
    fn rgb_reduces_with_luminance_weights() {
        let mut rgb = Array3::zeros((1, 2, 3));
        rgb[[0, 0, 0]] = 255.0;
        rgb[[0, 1, 1]] = 255.0;
        let image =
            Image::from_bitmap_pixels(dyn3(rgb), 255.0, &BitmapOptions::default()).unwrap();
        assert_eq!(image.num_channels(), 1);
        assert!((image.channels()[[0, 0, 0]] - 0.2125).abs() < 1e-12);
        assert!((image.channels()[[0, 1, 0]] - 0.7154).abs() < 1e-12);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let mut rgba = Array3::zeros((1, 2, 4));
        // First pixel: fully transparent black. Second: opaque black.
        rgba[[0, 1, 3]] = 255.0;
        let image =
            Image::from_bitmap_pixels(dyn3(rgba), 255.0, &BitmapOptions::default()).unwrap();
        assert!((image.channels()[[0, 0, 0]] - 1.0).abs() < 1e-12);
        assert!(image.channels()[[0, 1, 0]].abs() < 1e-12);
    }

    #[test]
    fn identical_rgb_planes_collapse_without_grayscale() {
        let plane = array![[1.0, 2.0], [3.0, 4.0]];
        let mut rgb = Array3::zeros((2, 2, 3));
        for mut p in rgb.axis_iter_mut(Axis(2)) {
            p.assign(&plane);
        }
        let opts = BitmapOptions {
            grayscale: false,
            ..Default::default()
        };
        let image = Image::from_bitmap_pixels(dyn3(rgb.clone()), 255.0, &opts).unwrap();
        assert_eq!(image.num_channels(), 1);
        assert_eq!(image.channel(0), plane);

        rgb[[0, 0, 2]] = 9.0;
        let colour = Image::from_bitmap_pixels(dyn3(rgb), 255.0, &opts).unwrap();
        assert_eq!(colour.num_channels(), 3);
    }

    #[test]
    fn grid_honours_origin_and_scales() {
        let opts = BitmapOptions {
            scale: 2.0,
            y_scale: Some(0.5),
            origin: (1.0, 2.0),
            unit: Unit::NANOMETER,
            ..Default::default()
        };
        let image =
            Image::from_bitmap_pixels(Array2::<f64>::zeros((3, 4)).into_dyn(), 255.0, &opts)
                .unwrap();
        let grid = image.grid();
        assert_eq!(grid.axis_0().to_vec(), vec![-2.0, 0.0, 2.0, 4.0]);
        assert_eq!(grid.axis_1().to_vec(), vec![-1.0, -0.5, 0.0]);
        assert_eq!(grid.unit(), &Unit::NANOMETER);
    }

    #[test]
    fn default_options_give_pixel_grid() {
        let image = Image::from_bitmap_pixels(
            Array2::<f64>::zeros((3, 5)).into_dyn(),
            255.0,
            &BitmapOptions::default(),
        )
        .unwrap();
        assert_eq!(image.grid(), &Grid::pixel(3, 5).unwrap());
    }
}
