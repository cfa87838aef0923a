//! Oriented two-lobe filters with a per-instance kernel cache.
//!
//! A [`Filter`] evaluates its [`RadialProfile`] on a frequency grid twice,
//! once with the angular falloff pointing along `+x` ("right") and once along
//! `+y` ("left"):
//!
//! ```text
//! kernel_θ(f) = radial(|f|) · max(0, (f / |f|) · (cos θ, sin θ))²,  θ ∈ {0, π/2}
//! ```
//!
//! The response to an image is the sum of the magnitudes of both filtered
//! inverse transforms.
//!
//! # Caching
//!
//! The kernels for the most recent grid are kept alongside that grid and
//! replaced as a whole when a different grid arrives. Grid comparison is
//! exact (see [`Grid`]'s `PartialEq`). The cache needs `&mut self`; share a
//! filter across threads only behind a lock, or give each thread its own.

use ndarray::{Array2, Array3, Zip};
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use fringe_core::{
    Complex64, Domain, Fft2d, Grid, Image, Sample, composite, ifftshift, polar_components,
};

use crate::error::Result;
use crate::profile::{CircularGabor, LogGabor, RadialProfile};

/// Right (`θ = 0`) and left (`θ = π/2`) kernels for one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelPair {
    /// Kernel oriented along `+x`.
    pub right: Array2<f64>,
    /// Kernel oriented along `+y`.
    pub left: Array2<f64>,
}

#[derive(Debug, Clone)]
struct KernelCache {
    grid: Grid,
    kernels: Arc<KernelPair>,
}

/// Two-lobe oriented filter built on a radial profile.
#[derive(Debug, Clone)]
pub struct Filter<P: RadialProfile> {
    profile: P,
    cache: Option<KernelCache>,
}

/// Filter with a log-Gabor profile.
pub type LogGaborFilter = Filter<LogGabor>;

/// Filter with a circular-Gabor profile.
pub type CircularGaborFilter = Filter<CircularGabor>;

impl LogGaborFilter {
    /// Log-Gabor filter centred at `center_frequency` with bandwidth `β`.
    pub fn log_gabor(center_frequency: f64, bandwidth: f64) -> Result<Self> {
        Ok(Self::new(LogGabor::new(center_frequency, bandwidth)?))
    }
}

impl CircularGaborFilter {
    /// Circular-Gabor filter centred at `center_frequency` with ring width `σ`.
    pub fn circular_gabor(center_frequency: f64, sigma: f64) -> Result<Self> {
        Ok(Self::new(CircularGabor::new(center_frequency, sigma)?))
    }
}

impl<P: RadialProfile> Filter<P> {
    /// Filter with an empty kernel cache.
    pub fn new(profile: P) -> Self {
        Self {
            profile,
            cache: None,
        }
    }

    /// Radial profile.
    pub fn profile(&self) -> &P {
        &self.profile
    }

    /// Centre frequency, the bank's sort key.
    pub fn center_frequency(&self) -> f64 {
        self.profile.center_frequency()
    }

    /// Both kernels evaluated on `grid`.
    ///
    /// A spatial grid is transformed to its frequency grid first. When the
    /// resulting grid equals the cached one, the cached kernels are returned
    /// without recomputation (the same `Arc`).
    pub fn get_kernels(&mut self, grid: &Grid) -> Result<Arc<KernelPair>> {
        let frequency_grid;
        let grid = match grid.domain() {
            Domain::Frequency => grid,
            Domain::Spatial => {
                frequency_grid = grid.transform()?;
                &frequency_grid
            }
        };

        if let Some(cache) = &self.cache
            && cache.grid == *grid
        {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                center_frequency = self.center_frequency(),
                "filter: kernel cache hit"
            );
            return Ok(Arc::clone(&cache.kernels));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            center_frequency = self.center_frequency(),
            height = grid.height(),
            width = grid.width(),
            "filter: computing kernels"
        );

        let kernels = Arc::new(KernelPair {
            right: self.kernel(grid, 0.0),
            left: self.kernel(grid, FRAC_PI_2),
        });
        self.cache = Some(KernelCache {
            grid: grid.clone(),
            kernels: Arc::clone(&kernels),
        });
        Ok(kernels)
    }

    fn kernel(&self, grid: &Grid, direction: f64) -> Array2<f64> {
        let (mut radius, directional) =
            polar_components(grid.coords_0(), grid.coords_1(), direction);
        Zip::from(&mut radius)
            .and(&directional)
            .for_each(|r, &d| *r = self.profile.radial(*r) * d);
        radius
    }

    /// Response magnitude map `|right| + |left|` for a single-channel image.
    ///
    /// Spatial images are transformed first; frequency-domain images are
    /// used as given.
    pub fn get_response<T: Sample>(&mut self, image: &Image<T>) -> Result<Array2<f64>> {
        let spectrum = to_spectrum(image)?;
        let (rows, cols) = spectrum.size();
        self.spectrum_response(&spectrum, &Fft2d::new(rows, cols))
    }

    /// Response to a centred spectrum, reusing a planned FFT of its shape.
    pub(crate) fn spectrum_response(
        &mut self,
        spectrum: &Image<Complex64>,
        fft: &Fft2d,
    ) -> Result<Array2<f64>> {
        let kernels = self.get_kernels(spectrum.grid())?;
        let plane = spectrum.channel(0);

        let mut response = Array2::zeros(plane.raw_dim());
        for kernel in [&kernels.right, &kernels.left] {
            let mut filtered = Array2::zeros(plane.raw_dim());
            Zip::from(&mut filtered)
                .and(&plane)
                .and(kernel)
                .for_each(|out, &c, &k| *out = c * k);
            let mut lobe = ifftshift(&filtered);
            fft.inverse(&mut lobe);
            Zip::from(&mut response)
                .and(&lobe)
                .for_each(|acc, c| *acc += c.norm());
        }
        Ok(response)
    }

    /// Response as a single-channel image on the spatial grid.
    ///
    /// For a frequency-domain input the spatial grid is recovered with
    /// [`Grid::transform`], so its origin sits at zero.
    pub fn apply<T: Sample>(&mut self, image: &Image<T>) -> Result<Image<f64>> {
        let grid = spatial_grid(image)?;
        let response = self.get_response(image)?;
        Ok(Image::from_plane(response, Some(grid))?)
    }

    /// Overlay of the right (red) and left (green) kernels on `grid`.
    pub fn kernel_composite(&mut self, grid: &Grid) -> Result<Array3<f64>> {
        let kernels = self.get_kernels(grid)?;
        Ok(composite(&[kernels.right.view(), kernels.left.view()], true)?)
    }
}

/// Centred single-channel spectrum of `image`.
pub(crate) fn to_spectrum<T: Sample>(image: &Image<T>) -> Result<Image<Complex64>> {
    match image.domain() {
        Domain::Spatial => Ok(image.ft()?),
        Domain::Frequency if image.num_channels() == 1 => Ok(image.to_complex()),
        Domain::Frequency => Err(fringe_core::Error::ImageFt(format!(
            "filters take single-channel spectra, got {} channels",
            image.num_channels()
        ))
        .into()),
    }
}

/// Spatial grid matching `image`.
pub(crate) fn spatial_grid<T: Sample>(image: &Image<T>) -> Result<Grid> {
    Ok(match image.domain() {
        Domain::Spatial => image.grid().clone(),
        Domain::Frequency => image.grid().transform()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fringe_core::Unit;
    use ndarray::Array1;
    use std::f64::consts::PI;

    /// 32 × 32 grid with spacing 1/32, so frequency bins are integers.
    fn unit_square_grid(n: usize) -> Grid {
        let axis = Array1::from_shape_fn(n, |j| j as f64 / n as f64);
        Grid::from_axes(axis.clone(), axis, Unit::METER).unwrap()
    }

    fn grating(n: usize, cycles: f64, vertical: bool) -> Image<f64> {
        let pixels = Array2::from_shape_fn((n, n), |(i, j)| {
            let t = if vertical { i } else { j } as f64 / n as f64;
            (2.0 * PI * cycles * t).sin()
        });
        Image::from_plane(pixels, Some(unit_square_grid(n))).unwrap()
    }

    #[test]
    fn kernels_are_cached_per_grid() {
        let mut filter = LogGaborFilter::log_gabor(4.0, 2.0).unwrap();
        let grid = unit_square_grid(16).transform().unwrap();

        let first = filter.get_kernels(&grid).unwrap();
        let second = filter.get_kernels(&grid).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // An equal but separately built grid also hits.
        let again = unit_square_grid(16).transform().unwrap();
        assert!(Arc::ptr_eq(&first, &filter.get_kernels(&again).unwrap()));

        let other = unit_square_grid(8).transform().unwrap();
        let third = filter.get_kernels(&other).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.right.dim(), (8, 8));

        // The cache holds only the latest grid.
        let fourth = filter.get_kernels(&grid).unwrap();
        assert!(!Arc::ptr_eq(&first, &fourth));
        assert_eq!(*first, *fourth);
    }

    #[test]
    fn spatial_grid_is_transformed_for_kernels() {
        let mut filter = LogGaborFilter::log_gabor(4.0, 2.0).unwrap();
        let spatial = unit_square_grid(16);
        let from_spatial = filter.get_kernels(&spatial).unwrap();
        let from_frequency = filter.get_kernels(&spatial.transform().unwrap()).unwrap();
        assert!(Arc::ptr_eq(&from_spatial, &from_frequency));
    }

    #[test]
    fn kernels_are_half_plane_lobes() {
        let mut filter = LogGaborFilter::log_gabor(4.0, 2.0).unwrap();
        let grid = unit_square_grid(16).transform().unwrap();
        let kernels = filter.get_kernels(&grid).unwrap();
        // Index 8 is the zero bin; column 12 is f_x = 4, column 4 is f_x = -4.
        assert!((kernels.right[[8, 12]] - 1.0).abs() < 1e-12);
        assert_eq!(kernels.right[[8, 4]], 0.0);
        assert!(kernels.left[[8, 12]].abs() < 1e-12);
        assert!((kernels.left[[12, 8]] - 1.0).abs() < 1e-12);
        assert_eq!(kernels.right[[8, 8]], 0.0);
    }

    #[test]
    fn response_of_matched_grating_is_half_amplitude() {
        let mut filter = LogGaborFilter::log_gabor(4.0, 2.0).unwrap();
        let response = filter.get_response(&grating(32, 4.0, false)).unwrap();
        for &v in &response {
            assert!((v - 0.5).abs() < 1e-9, "{v}");
        }
    }

    #[test]
    fn response_is_rotation_covariant() {
        let mut filter = LogGaborFilter::log_gabor(4.0, 2.0).unwrap();
        let horizontal = filter.get_response(&grating(32, 4.0, false)).unwrap();
        let vertical = filter.get_response(&grating(32, 4.0, true)).unwrap();
        for (a, b) in horizontal.iter().zip(vertical.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn frequency_input_matches_spatial_input() {
        let image = grating(32, 4.0, false);
        let mut filter = CircularGaborFilter::circular_gabor(4.0, 1.0).unwrap();
        let from_spatial = filter.get_response(&image).unwrap();
        let from_spectrum = filter.get_response(&image.ft().unwrap()).unwrap();
        assert_eq!(from_spatial, from_spectrum);
    }

    #[test]
    fn apply_returns_spatial_image() {
        let image = grating(16, 2.0, false);
        let mut filter = LogGaborFilter::log_gabor(2.0, 2.0).unwrap();

        let applied = filter.apply(&image).unwrap();
        assert_eq!(applied.domain(), Domain::Spatial);
        assert_eq!(applied.grid(), image.grid());

        let from_spectrum = filter.apply(&image.ft().unwrap()).unwrap();
        assert_eq!(from_spectrum.domain(), Domain::Spatial);
        assert_eq!(from_spectrum.grid().extent_0().0, 0.0);
    }

    #[test]
    fn multichannel_spectrum_rejected() {
        let grid = unit_square_grid(4).transform().unwrap();
        let stack = Array3::<f64>::zeros((4, 4, 2));
        let spectra = Image::from_channels(stack, Some(grid)).unwrap();
        let mut filter = LogGaborFilter::log_gabor(1.0, 1.0).unwrap();
        assert!(filter.get_response(&spectra).is_err());
    }

    #[test]
    fn kernel_composite_is_rgb() {
        let mut filter = LogGaborFilter::log_gabor(2.0, 2.0).unwrap();
        let overlay = filter.kernel_composite(&unit_square_grid(16)).unwrap();
        assert_eq!(overlay.dim(), (16, 16, 3));
        assert!(overlay.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
