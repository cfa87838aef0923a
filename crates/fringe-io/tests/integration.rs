//! Integration tests for fringe-io: bitmap loading and PNG output.

use fringe_core::{BitmapOptions, Unit, composite};
use fringe_io::{Error, read_bitmap, read_bitmap_pixels, write_composite_png, write_gray_png};
use image::{GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::{Array2, Array3, array};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn colour_options() -> BitmapOptions {
    BitmapOptions {
        grayscale: false,
        ..Default::default()
    }
}

fn gray_ramp(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("ramp.png");
    GrayImage::from_fn(4, 3, |x, y| Luma([(x + 10 * y) as u8]))
        .save(&path)
        .unwrap();
    path
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn gray_bitmap_keeps_raw_samples() {
    let dir = TempDir::new().unwrap();
    let image = read_bitmap(gray_ramp(&dir), &BitmapOptions::default()).unwrap();

    assert_eq!(image.size(), (3, 4));
    assert_eq!(image.num_channels(), 1);
    assert_eq!(image.channel(0)[[2, 3]], 23.0);
    assert_eq!(image.grid().unit(), &Unit::PIXEL);
    assert_eq!(image.grid().axis_0().to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(image.grid().axis_1().to_vec(), vec![0.0, 1.0, 2.0]);
}

#[test]
fn scale_origin_and_unit_shape_the_grid() {
    let dir = TempDir::new().unwrap();
    let options = BitmapOptions {
        scale: 0.5,
        y_scale: Some(2.0),
        origin: (1.0, 1.0),
        unit: Unit::NANOMETER,
        ..Default::default()
    };
    let image = read_bitmap(gray_ramp(&dir), &options).unwrap();

    assert_eq!(image.grid().axis_0().to_vec(), vec![-0.5, 0.0, 0.5, 1.0]);
    assert_eq!(image.grid().axis_1().to_vec(), vec![-2.0, 0.0, 2.0]);
    assert_eq!(image.grid().unit(), &Unit::NANOMETER);
}

#[test]
fn rgb_with_identical_planes_collapses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gray_as_rgb.png");
    RgbImage::from_fn(3, 2, |x, y| {
        let v = (40 * x + y) as u8;
        Rgb([v, v, v])
    })
    .save(&path)
    .unwrap();

    let image = read_bitmap(&path, &colour_options()).unwrap();
    assert_eq!(image.num_channels(), 1);
    assert_eq!(image.channel(0)[[1, 2]], 81.0);
}

#[test]
fn rgb_is_reduced_to_luminance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("primaries.png");
    let colours = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]];
    RgbImage::from_fn(4, 1, |x, _| Rgb(colours[x as usize]))
        .save(&path)
        .unwrap();

    let gray = read_bitmap(&path, &BitmapOptions::default()).unwrap();
    assert_eq!(gray.num_channels(), 1);
    let expected = [0.2125, 0.7154, 0.0721, 1.0];
    for (j, e) in expected.iter().enumerate() {
        assert!((gray.channel(0)[[0, j]] - e).abs() < 1e-9);
    }

    let colour = read_bitmap(&path, &colour_options()).unwrap();
    assert_eq!(colour.num_channels(), 3);
    assert_eq!(colour.channels()[[0, 1, 1]], 255.0);
}

#[test]
fn transparent_pixels_become_white() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("alpha.png");
    RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
    .save(&path)
    .unwrap();

    let image = read_bitmap(&path, &BitmapOptions::default()).unwrap();
    assert!((image.channel(0)[[0, 0]] - 1.0).abs() < 1e-9);
    assert!(image.channel(0)[[0, 1]].abs() < 1e-12);
}

#[test]
fn gray_alpha_is_widened_to_rgba() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gray_alpha.png");
    GrayAlphaImage::from_pixel(2, 2, LumaA([100, 255]))
        .save(&path)
        .unwrap();

    let (pixels, white_level) = read_bitmap_pixels(&path).unwrap();
    assert_eq!(pixels.shape(), &[2, 2, 4]);
    assert_eq!(white_level, 255.0);

    let image = read_bitmap(&path, &BitmapOptions::default()).unwrap();
    assert!((image.channel(0)[[1, 1]] - 100.0 / 255.0).abs() < 1e-9);
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read_bitmap(dir.path().join("absent.png"), &BitmapOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {err:?}");
}

#[test]
fn garbage_file_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("noise.bin");
    std::fs::write(&path, b"definitely not a bitmap").unwrap();
    let err = read_bitmap(&path, &BitmapOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
}

// ===========================================================================
// PNG output
// ===========================================================================

#[test]
fn composite_png_round_trips_through_loader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("composite.png");
    let overlay = Array3::from_shape_fn((2, 3, 3), |(i, j, k)| (i + j + k) as f64 / 5.0);
    write_composite_png(&path, &overlay).unwrap();

    let image = read_bitmap(&path, &colour_options()).unwrap();
    assert_eq!(image.size(), (2, 3));
    assert_eq!(image.num_channels(), 3);
    for ((i, j, k), &v) in overlay.indexed_iter() {
        assert_eq!(image.channels()[[i, j, k]], (v * 255.0).round());
    }
}

#[test]
fn composite_of_response_maps_is_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("maps.png");
    let a = Array2::from_shape_fn((4, 4), |(i, _)| i as f64);
    let b = Array2::from_shape_fn((4, 4), |(_, j)| j as f64);
    let overlay = composite(&[a.view(), b.view()], true).unwrap();
    write_composite_png(&path, &overlay).unwrap();

    let image = read_bitmap(&path, &colour_options()).unwrap();
    assert_eq!(image.channels()[[3, 0, 0]], 255.0);
    assert_eq!(image.channels()[[0, 3, 1]], 255.0);
    assert_eq!(image.channels()[[3, 3, 2]], 0.0);
}

#[test]
fn gray_png_is_stretched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.png");
    write_gray_png(&path, array![[0.0, 1.0], [2.0, 3.0]].view()).unwrap();

    let image = read_bitmap(&path, &BitmapOptions::default()).unwrap();
    assert_eq!(image.channel(0), array![[0.0, 85.0], [170.0, 255.0]]);
}
