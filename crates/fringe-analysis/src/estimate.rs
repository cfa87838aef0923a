//! Per-pixel lattice-frequency estimation from stacked bank responses.
//!
//! Both modes read a response vector `R` (one value per filter, ascending
//! centre frequency `f`) and produce a [`FrequencyEstimate`].
//!
//! ## Strongest vote
//!
//! ```text
//! k*  = argmax_k R[k]            (first maximum)
//! nb  = min(k* + 1, N - 1)
//! f̂   = sqrt(f[k*] · f[nb]) · R[nb] / R[k*]
//! certainty = R[k*]
//! ```
//!
//! For a log-Gabor bank from [`crate::FilterBank::create`], the ratio of two
//! adjacent responses to a single frequency `r` is `r / sqrt(f[k*]·f[nb])`,
//! so `f̂` recovers `r` exactly. When the strongest band is the last one the
//! neighbour index is clamped onto it and `f̂ = f[N-1]`.
//!
//! ## Weighted
//!
//! Weights every band by the multiplier `m`:
//!
//! ```text
//! f̂ = f_min / Σ_{k<N-1} R[k] · Σ_{i<N-1} m^(i-1/2) · R[i+1]
//! s = 0;  for i in 0..N-1:  s = (s + R[i]² · m^(i-1/2) · R[i+1] / R[i] - f̂)²
//! certainty = 1 / (1 + s / Σ_{k<N-1} R[k]²)
//! ```
//!
//! The spread `s` is squared inside the loop, so every earlier term is
//! compounded again on each step. This is the established behaviour and is
//! pinned by a test.

use ndarray::{Array2, Array3, ArrayView1, Axis, Zip};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How stacked responses are turned into a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EstimationMode {
    /// Interpolate between the strongest band and the band above it.
    #[default]
    StrongestVote,
    /// Combine all bands weighted by the bank's multiplier.
    Weighted,
}

impl EstimationMode {
    /// Mode name as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            EstimationMode::StrongestVote => "strongest_vote",
            EstimationMode::Weighted => "weighted",
        }
    }
}

impl fmt::Display for EstimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strongest_vote" => Ok(EstimationMode::StrongestVote),
            "weighted" => Ok(EstimationMode::Weighted),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// Estimate for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyEstimate {
    /// Estimated local frequency, in the unit of the bank's centre frequencies.
    pub frequency: f64,
    /// Confidence; its scale depends on the mode.
    pub certainty: f64,
    /// Largest response over all bands.
    pub max_response: f64,
}

/// Estimates for every pixel, each map shaped `(height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMap {
    /// Estimated local frequency.
    pub frequency: Array2<f64>,
    /// Per-pixel confidence.
    pub certainty: Array2<f64>,
    /// Per-pixel largest response.
    pub max_response: Array2<f64>,
}

impl FrequencyMap {
    /// Map shape `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        self.frequency.dim()
    }
}

fn max_of(responses: ArrayView1<'_, f64>) -> f64 {
    responses.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Strongest-vote estimate for one response vector.
///
/// `frequencies` must be ascending and as long as `responses` (at least 1).
pub fn strongest_vote(responses: ArrayView1<'_, f64>, frequencies: &[f64]) -> FrequencyEstimate {
    let n = responses.len();
    let mut best = 0;
    for k in 1..n {
        if responses[k] > responses[best] {
            best = k;
        }
    }
    let neighbor = (best + 1).min(n - 1);
    let peak = responses[best];
    let mean_frequency = (frequencies[best] * frequencies[neighbor]).sqrt();

    FrequencyEstimate {
        frequency: mean_frequency * responses[neighbor] / peak,
        certainty: peak,
        max_response: max_of(responses),
    }
}

/// Weighted estimate for one response vector.
///
/// `responses` must hold at least two bands.
pub fn weighted(
    responses: ArrayView1<'_, f64>,
    min_frequency: f64,
    multiplier: f64,
) -> FrequencyEstimate {
    let n = responses.len();
    let lower = responses.slice(ndarray::s![..n - 1]);
    let weight = |i: usize| multiplier.powf(i as f64 - 0.5);

    let mut weighted_sum = 0.0;
    for i in 0..n - 1 {
        weighted_sum += weight(i) * responses[i + 1];
    }
    let frequency = min_frequency / lower.sum() * weighted_sum;

    let mut spread = 0.0;
    for i in 0..n - 1 {
        let r = responses[i];
        let term = spread + r * r * weight(i) * responses[i + 1] / r - frequency;
        spread = term * term;
    }
    let energy = lower.iter().map(|r| r * r).sum::<f64>();

    FrequencyEstimate {
        frequency,
        certainty: 1.0 / (1.0 + spread / energy),
        max_response: max_of(responses),
    }
}

/// Apply `mode` to every pixel of an `(height, width, bands)` response stack.
pub fn estimate(
    responses: &Array3<f64>,
    frequencies: &[f64],
    multiplier: f64,
    mode: EstimationMode,
) -> FrequencyMap {
    let (height, width, _) = responses.dim();
    let min_frequency = frequencies.iter().copied().fold(f64::INFINITY, f64::min);

    let mut map = FrequencyMap {
        frequency: Array2::zeros((height, width)),
        certainty: Array2::zeros((height, width)),
        max_response: Array2::zeros((height, width)),
    };
    Zip::from(&mut map.frequency)
        .and(&mut map.certainty)
        .and(&mut map.max_response)
        .and(responses.lanes(Axis(2)))
        .for_each(|f, c, m, lane| {
            let est = match mode {
                EstimationMode::StrongestVote => strongest_vote(lane, frequencies),
                EstimationMode::Weighted => weighted(lane, min_frequency, multiplier),
            };
            *f = est.frequency;
            *c = est.certainty;
            *m = est.max_response;
        });
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const BANDS: [f64; 4] = [1.0, 2.0, 4.0, 8.0];

    #[test]
    fn mode_parsing() {
        assert_eq!("weighted".parse::<EstimationMode>().unwrap(), EstimationMode::Weighted);
        assert_eq!(
            "strongest_vote".parse::<EstimationMode>().unwrap(),
            EstimationMode::StrongestVote
        );
        assert_eq!(
            "bogus".parse::<EstimationMode>(),
            Err(Error::UnknownMode("bogus".into()))
        );
        assert_eq!(EstimationMode::Weighted.to_string(), "weighted");
        assert_eq!(EstimationMode::default(), EstimationMode::StrongestVote);
    }

    #[test]
    fn strongest_vote_inverts_log_gabor_ratio() {
        // Responses of a ratio-2 log-Gabor bank to a single frequency of 4.
        let half = 0.5_f64.sqrt();
        let r = array![0.25, half, 1.0, half];
        let est = strongest_vote(r.view(), &BANDS);
        assert!((est.frequency - 4.0).abs() < 1e-12);
        assert_eq!(est.certainty, 1.0);
        assert_eq!(est.max_response, 1.0);
    }

    #[test]
    fn strongest_vote_first_maximum_wins() {
        let r = array![0.5, 1.0, 1.0, 0.25];
        let est = strongest_vote(r.view(), &BANDS);
        // k* = 1, neighbour 2: sqrt(2·4) · 1.0 / 1.0.
        assert!((est.frequency - 8.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn strongest_vote_top_band_clamps_to_last_filter() {
        let r = array![0.1, 0.2, 0.4, 0.9];
        let est = strongest_vote(r.view(), &BANDS);
        assert_eq!(est.frequency, 8.0);
        assert_eq!(est.certainty, 0.9);
    }

    #[test]
    fn strongest_vote_zero_response_is_nan() {
        let r = array![0.0, 0.0, 0.0, 0.0];
        let est = strongest_vote(r.view(), &BANDS);
        assert!(est.frequency.is_nan());
        assert_eq!(est.certainty, 0.0);
    }

    #[test]
    fn weighted_compounding_spread_is_pinned() {
        let r = array![1.0, 2.0, 4.0];
        let est = weighted(r.view(), 1.0, 2.0);
        // (2^-0.5 · 2 + 2^0.5 · 4) / 3
        assert!((est.frequency - 2.357022603955158).abs() < 1e-12);
        // The first squared term is folded into the second before squaring.
        let spread = {
            let s0 = (2.0_f64.powf(-0.5) * 2.0 - est.frequency).powi(2);
            (s0 + 4.0 * 2.0_f64.sqrt() * 4.0 / 2.0 - est.frequency).powi(2)
        };
        assert!((spread - 96.93533).abs() < 1e-4);
        let expected = 1.0 / (1.0 + spread / 5.0);
        assert!((est.certainty - expected).abs() < 1e-12);
        assert!((est.certainty - 0.049051).abs() < 1e-6);
        assert_eq!(est.max_response, 4.0);
    }

    #[test]
    fn estimate_maps_every_pixel() {
        let mut stack = Array3::zeros((2, 3, 4));
        for mut lane in stack.lanes_mut(Axis(2)) {
            lane.assign(&array![0.1, 0.2, 0.4, 0.9]);
        }
        stack[[1, 2, 3]] = 0.0;
        stack[[1, 2, 1]] = 1.0;

        let map = estimate(&stack, &BANDS, 2.0, EstimationMode::StrongestVote);
        assert_eq!(map.dim(), (2, 3));
        assert_eq!(map.frequency[[0, 0]], 8.0);
        // k* = 1, neighbour 2: sqrt(8) · 0.4 / 1.0.
        assert!((map.frequency[[1, 2]] - 8.0_f64.sqrt() * 0.4).abs() < 1e-12);
        assert_eq!(map.max_response[[1, 2]], 1.0);

        let weighted_map = estimate(&stack, &BANDS, 2.0, EstimationMode::Weighted);
        assert!(weighted_map.frequency.iter().all(|f| f.is_finite()));
        assert!(weighted_map.certainty.iter().all(|&c| c > 0.0 && c <= 1.0));
    }
}
