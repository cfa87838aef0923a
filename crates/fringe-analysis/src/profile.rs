//! Radial frequency profiles for oriented filters.
//!
//! A profile is the rotation-invariant part of a filter: a function of the
//! radial frequency `r = |f|`. [`crate::Filter`] multiplies it by the angular
//! falloff to form each oriented kernel.
//!
//! # Profiles
//!
//! ```text
//! log-Gabor:       exp(-cb · ln(r / f_c)²),  cb = 4 / (β² · ln 2),  0 at r = 0
//! circular-Gabor:  exp(-((r - f_c) / σ)²)
//! ```

use std::f64::consts::LN_2;
use std::fmt::Debug;

use crate::error::{Error, Result};

/// Rotation-invariant part of a filter's frequency response.
pub trait RadialProfile: Clone + Debug + Send + Sync {
    /// Centre frequency; filters in a bank are ordered by it.
    fn center_frequency(&self) -> f64;

    /// Gain at radial frequency `r >= 0`.
    fn radial(&self, r: f64) -> f64;

    /// Profile for the filter centred at `center_frequency` in a geometric
    /// bank whose adjacent centres differ by `ratio`.
    fn for_bank(center_frequency: f64, ratio: f64) -> Result<Self>
    where
        Self: Sized;
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Log-Gabor profile: Gaussian on a logarithmic frequency axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogGabor {
    center_frequency: f64,
    bandwidth: f64,
    cb: f64,
}

impl LogGabor {
    /// Profile centred at `center_frequency` with bandwidth `β` in octave-like
    /// log units.
    pub fn new(center_frequency: f64, bandwidth: f64) -> Result<Self> {
        check_positive("center frequency", center_frequency)?;
        check_positive("bandwidth", bandwidth)?;
        Ok(Self {
            center_frequency,
            bandwidth,
            cb: 4.0 / (bandwidth * bandwidth * LN_2),
        })
    }

    /// Bandwidth `β`.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Bank bandwidth for multiplier `ratio`: `2·sqrt(2/ln 2)·sqrt(ln ratio)`.
    ///
    /// Each filter's gain at a neighbour's centre is then `1/sqrt(ratio)`.
    pub fn bank_bandwidth(ratio: f64) -> f64 {
        2.0 * (2.0 / LN_2).sqrt() * ratio.ln().sqrt()
    }
}

impl RadialProfile for LogGabor {
    fn center_frequency(&self) -> f64 {
        self.center_frequency
    }

    fn radial(&self, r: f64) -> f64 {
        if r > 0.0 {
            let log_ratio = (r / self.center_frequency).ln();
            (-self.cb * log_ratio * log_ratio).exp()
        } else {
            0.0
        }
    }

    fn for_bank(center_frequency: f64, ratio: f64) -> Result<Self> {
        Self::new(center_frequency, Self::bank_bandwidth(ratio))
    }
}

/// Circular-Gabor profile: Gaussian ring on a linear frequency axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularGabor {
    center_frequency: f64,
    sigma: f64,
}

impl CircularGabor {
    /// Ring of radius `center_frequency` and width `sigma`.
    pub fn new(center_frequency: f64, sigma: f64) -> Result<Self> {
        check_positive("center frequency", center_frequency)?;
        check_positive("sigma", sigma)?;
        Ok(Self {
            center_frequency,
            sigma,
        })
    }

    /// Ring width `σ`.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Width at which the ring at `center_frequency` falls to half amplitude
    /// halfway to its neighbour at `ratio · center_frequency`.
    pub fn bank_sigma(center_frequency: f64, ratio: f64) -> f64 {
        center_frequency * (ratio - 1.0) / (2.0 * LN_2.sqrt())
    }
}

impl RadialProfile for CircularGabor {
    fn center_frequency(&self) -> f64 {
        self.center_frequency
    }

    fn radial(&self, r: f64) -> f64 {
        let z = (r - self.center_frequency) / self.sigma;
        (-z * z).exp()
    }

    fn for_bank(center_frequency: f64, ratio: f64) -> Result<Self> {
        Self::new(center_frequency, Self::bank_sigma(center_frequency, ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_gabor_peaks_at_centre() {
        let p = LogGabor::new(4.0, 2.0).unwrap();
        assert_eq!(p.radial(4.0), 1.0);
        assert!(p.radial(3.0) < 1.0);
        assert!(p.radial(5.0) < 1.0);
        assert_eq!(p.radial(0.0), 0.0);
    }

    #[test]
    fn log_gabor_is_symmetric_in_log_frequency() {
        let p = LogGabor::new(4.0, 1.5).unwrap();
        assert!((p.radial(2.0) - p.radial(8.0)).abs() < 1e-12);
    }

    #[test]
    fn bank_bandwidth_sets_neighbour_gain() {
        let ratio = 2.0;
        let low = LogGabor::for_bank(2.0, ratio).unwrap();
        let high = LogGabor::for_bank(4.0, ratio).unwrap();
        assert!((low.bandwidth() - 2.0 * 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((low.radial(4.0) - 0.5_f64.sqrt()).abs() < 1e-12);
        assert!((high.radial(2.0) - 0.5_f64.sqrt()).abs() < 1e-12);
        // Neighbours cross at the geometric mean of their centres.
        let crossing = 8.0_f64.sqrt();
        assert!((low.radial(crossing) - high.radial(crossing)).abs() < 1e-12);
    }

    #[test]
    fn circular_gabor_half_amplitude_between_centres() {
        let ratio = 2.0;
        let low = CircularGabor::for_bank(2.0, ratio).unwrap();
        // Halfway to the next centre (3.0) the gain is one half.
        assert!((low.radial(3.0) - 0.5).abs() < 1e-12);
        assert_eq!(low.radial(2.0), 1.0);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(matches!(LogGabor::new(0.0, 1.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(LogGabor::new(1.0, f64::NAN), Err(Error::InvalidParameter(_))));
        assert!(matches!(CircularGabor::new(1.0, -1.0), Err(Error::InvalidParameter(_))));
        // ratio 1 collapses the bank bandwidth to zero.
        assert!(LogGabor::for_bank(1.0, 1.0).is_err());
    }
}
