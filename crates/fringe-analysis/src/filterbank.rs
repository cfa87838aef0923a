//! Geometric filter banks.
//!
//! A [`FilterBank`] holds filters whose centre frequencies form a geometric
//! progression `f_i = m^i · f_0`. The multiplier `m` is inferred on
//! construction and drives the weighted estimation mode.
//!
//! # Example
//!
//! ```rust
//! use fringe_analysis::{EstimationMode, LogGaborBank};
//! use fringe_core::Image;
//! use ndarray::Array2;
//!
//! let mut bank = LogGaborBank::create(1.0, 8.0, 4).unwrap();
//! assert_eq!(bank.frequencies().len(), 4);
//! assert!((bank.frequency_multiplier() - 2.0).abs() < 1e-12);
//!
//! let image = Image::from_plane(Array2::<f64>::zeros((16, 16)), None).unwrap();
//! let map = bank.get_frequencies(&image, EstimationMode::StrongestVote).unwrap();
//! assert_eq!(map.dim(), (16, 16));
//! ```

use ndarray::{Array2, Array3, Axis};

use fringe_core::{Fft2d, Image, Sample, uniquetol};

use crate::error::{Error, Result};
use crate::estimate::{EstimationMode, FrequencyMap, estimate};
use crate::filter::{Filter, to_spectrum};
use crate::profile::{CircularGabor, LogGabor, RadialProfile};

/// Tolerance for deciding that consecutive frequency ratios agree.
pub const RATIO_TOLERANCE: f64 = 1e-5;

/// Filters with a common centre-frequency multiplier, ascending.
#[derive(Debug, Clone)]
pub struct FilterBank<P: RadialProfile> {
    filters: Vec<Filter<P>>,
    frequency_multiplier: f64,
}

/// Bank of log-Gabor filters.
pub type LogGaborBank = FilterBank<LogGabor>;

/// Bank of circular-Gabor filters.
pub type CircularGaborBank = FilterBank<CircularGabor>;

impl<P: RadialProfile> FilterBank<P> {
    /// Build a bank from filters in any order.
    ///
    /// Filters are sorted by centre frequency. The consecutive ratios must
    /// agree within [`RATIO_TOLERANCE`]; otherwise the multiplier cannot be
    /// inferred and [`Error::InconsistentProgression`] is returned.
    pub fn new(mut filters: Vec<Filter<P>>) -> Result<Self> {
        if filters.len() < 2 {
            return Err(Error::TooFewFilters(filters.len()));
        }
        filters.sort_by(|a, b| a.center_frequency().total_cmp(&b.center_frequency()));

        let ratios: Vec<f64> = filters
            .windows(2)
            .map(|pair| pair[1].center_frequency() / pair[0].center_frequency())
            .collect();
        let unique = uniquetol(&ratios, RATIO_TOLERANCE);
        let frequency_multiplier = match unique.as_slice() {
            [ratio] => *ratio,
            _ => return Err(Error::InconsistentProgression { ratios: unique }),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            num_filters = filters.len(),
            frequency_multiplier,
            "filterbank: constructed"
        );

        Ok(Self {
            filters,
            frequency_multiplier,
        })
    }

    /// Bank of `num_filters` filters spread geometrically over
    /// `[low_frequency, high_frequency]`.
    ///
    /// The ratio is `(high / low)^(1 / (num_filters - 1))` and filter `i` is
    /// centred at `ratio^i · low`. Each profile is sized for that ratio by
    /// [`RadialProfile::for_bank`].
    pub fn create(low_frequency: f64, high_frequency: f64, num_filters: usize) -> Result<Self> {
        if num_filters < 2 {
            return Err(Error::TooFewFilters(num_filters));
        }
        if !(low_frequency > 0.0 && low_frequency.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "low frequency must be positive and finite, got {low_frequency}"
            )));
        }
        if !(high_frequency > low_frequency && high_frequency.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "high frequency must be finite and above {low_frequency}, got {high_frequency}"
            )));
        }

        let ratio = (high_frequency / low_frequency).powf(1.0 / (num_filters - 1) as f64);
        let filters = (0..num_filters)
            .map(|i| {
                let center = ratio.powi(i as i32) * low_frequency;
                P::for_bank(center, ratio).map(Filter::new)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(filters)
    }

    /// Filters in ascending centre frequency.
    pub fn filters(&self) -> &[Filter<P>] {
        &self.filters
    }

    /// Number of filters.
    pub fn num_filters(&self) -> usize {
        self.filters.len()
    }

    /// Centre frequencies, ascending.
    pub fn frequencies(&self) -> Vec<f64> {
        self.filters.iter().map(Filter::center_frequency).collect()
    }

    /// Lowest centre frequency.
    pub fn min_frequency(&self) -> f64 {
        self.filters[0].center_frequency()
    }

    /// Ratio between consecutive centre frequencies.
    pub fn frequency_multiplier(&self) -> f64 {
        self.frequency_multiplier
    }

    /// Response map of every filter, in filter order.
    ///
    /// The image is transformed once and shared by all filters.
    pub fn get_responses<T: Sample>(&mut self, image: &Image<T>) -> Result<Vec<Array2<f64>>> {
        let spectrum = to_spectrum(image)?;
        let (rows, cols) = spectrum.size();
        let fft = Fft2d::new(rows, cols);
        self.filters
            .iter_mut()
            .map(|filter| filter.spectrum_response(&spectrum, &fft))
            .collect()
    }

    /// Responses stacked as channels of one image on the input's grid.
    pub fn apply<T: Sample>(&mut self, image: &Image<T>) -> Result<Image<f64>> {
        let stack = self.response_stack(image)?;
        Ok(Image::from_channels(stack, Some(image.grid().clone()))?)
    }

    /// Per-pixel frequency, certainty and maximum response.
    pub fn get_frequencies<T: Sample>(
        &mut self,
        image: &Image<T>,
        mode: EstimationMode,
    ) -> Result<FrequencyMap> {
        let stack = self.response_stack(image)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%mode, bands = self.num_filters(), "filterbank: estimating frequencies");

        Ok(estimate(
            &stack,
            &self.frequencies(),
            self.frequency_multiplier,
            mode,
        ))
    }

    /// `(height, width, num_filters)` stack of responses.
    fn response_stack<T: Sample>(&mut self, image: &Image<T>) -> Result<Array3<f64>> {
        let responses = self.get_responses(image)?;
        let views: Vec<_> = responses.iter().map(|r| r.view().insert_axis(Axis(2))).collect();
        ndarray::concatenate(Axis(2), &views)
            .map_err(|e| fringe_core::Error::ImageSpec(e.to_string()).into())
    }
}
