//! Analysis configuration file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use fringe_analysis::{CircularGaborBank, EstimationMode, FrequencyMap, LogGaborBank};
use fringe_core::{BitmapOptions, Image, Sample, Scale, Unit};

use crate::error::ConfigError;
use crate::validation::validate_config;

/// Radial profile used by every filter of the bank.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BankKind {
    /// Log-Gabor filters, bandwidth sized from the bank ratio.
    #[default]
    LogGabor,
    /// Gaussian rings, sigma sized from the bank ratio.
    CircularGabor,
}

/// Geometric filter bank description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankConfig {
    /// Profile of the filters.
    #[serde(default)]
    pub kind: BankKind,

    /// Centre frequency of the first filter.
    #[serde(default = "default_low_frequency")]
    pub low_frequency: f64,

    /// Centre frequency of the last filter.
    #[serde(default = "default_high_frequency")]
    pub high_frequency: f64,

    /// Number of filters.
    #[serde(default = "default_num_filters")]
    pub num_filters: usize,
}

fn default_low_frequency() -> f64 {
    1.0
}

fn default_high_frequency() -> f64 {
    5.0
}

fn default_num_filters() -> usize {
    10
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            kind: BankKind::default(),
            low_frequency: default_low_frequency(),
            high_frequency: default_high_frequency(),
            num_filters: default_num_filters(),
        }
    }
}

/// How responses are turned into frequencies.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EstimationConfig {
    /// `strongest_vote` or `weighted`.
    #[serde(default, with = "mode_serde")]
    pub mode: EstimationMode,
}

/// Mode strings go through [`EstimationMode`]'s `FromStr`, so an unknown
/// mode fails at parse time with the same message as everywhere else.
mod mode_serde {
    use fringe_analysis::EstimationMode;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Write the mode name.
    pub fn serialize<S: Serializer>(mode: &EstimationMode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(mode.as_str())
    }

    /// Parse a mode name.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<EstimationMode, D::Error> {
        let name = String::deserialize(d)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Bitmap import options, see [`BitmapOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BitmapConfig {
    /// Shared scale for both axes.
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Horizontal scale, overriding `scale`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_scale: Option<f64>,

    /// Vertical scale, overriding `scale`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_scale: Option<f64>,

    /// Axis unit label (`pixel`, `nm`, `m`, or any custom symbol).
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Pixel position `[x, y]` of the coordinate origin.
    #[serde(default)]
    pub origin: [f64; 2],

    /// Reduce colour bitmaps to one luminance channel.
    #[serde(default = "default_grayscale")]
    pub grayscale: bool,
}

fn default_scale() -> f64 {
    1.0
}

fn default_unit() -> String {
    "pixel".to_string()
}

fn default_grayscale() -> bool {
    true
}

impl Default for BitmapConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            x_scale: None,
            y_scale: None,
            unit: default_unit(),
            origin: [0.0, 0.0],
            grayscale: default_grayscale(),
        }
    }
}

impl BitmapConfig {
    /// Options for [`Image::from_bitmap_pixels`] and `fringe_io::read_bitmap`.
    pub fn options(&self) -> BitmapOptions {
        BitmapOptions {
            scale: self.scale,
            x_scale: self.x_scale,
            y_scale: self.y_scale,
            unit: Unit::from_label(&self.unit),
            origin: (self.origin[0], self.origin[1]),
            grayscale: self.grayscale,
        }
    }
}

/// Resampling applied before filtering. Exactly one field must be set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ResizeConfig {
    /// Uniform scale factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,

    /// Target `[height, width]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_size: Option<[usize; 2]>,
}

impl ResizeConfig {
    /// Resize by a uniform factor.
    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            new_size: None,
        }
    }

    /// Resize to `height × width`.
    pub fn new_size(height: usize, width: usize) -> Self {
        Self {
            scale: None,
            new_size: Some([height, width]),
        }
    }

    /// Apply to an image.
    pub fn apply<T: Sample>(&self, image: &Image<T>) -> Result<Image<T>, ConfigError> {
        Ok(image.resize(
            self.scale.map(Scale::Uniform),
            self.new_size.map(|[h, w]| (h, w)),
        )?)
    }
}

/// A bank built from a [`BankConfig`].
#[derive(Debug, Clone)]
pub enum ConfiguredBank {
    /// Log-Gabor bank.
    LogGabor(LogGaborBank),
    /// Circular-Gabor bank.
    CircularGabor(CircularGaborBank),
}

impl ConfiguredBank {
    /// Centre frequencies, ascending.
    pub fn frequencies(&self) -> Vec<f64> {
        match self {
            ConfiguredBank::LogGabor(bank) => bank.frequencies(),
            ConfiguredBank::CircularGabor(bank) => bank.frequencies(),
        }
    }

    /// Ratio between consecutive centre frequencies.
    pub fn frequency_multiplier(&self) -> f64 {
        match self {
            ConfiguredBank::LogGabor(bank) => bank.frequency_multiplier(),
            ConfiguredBank::CircularGabor(bank) => bank.frequency_multiplier(),
        }
    }

    /// Per-pixel frequency estimate, see [`fringe_analysis::FilterBank::get_frequencies`].
    pub fn get_frequencies<T: Sample>(
        &mut self,
        image: &Image<T>,
        mode: EstimationMode,
    ) -> fringe_analysis::Result<FrequencyMap> {
        match self {
            ConfiguredBank::LogGabor(bank) => bank.get_frequencies(image, mode),
            ConfiguredBank::CircularGabor(bank) => bank.get_frequencies(image, mode),
        }
    }
}

/// Complete description of one lattice-frequency analysis.
///
/// # TOML Format
///
/// ```toml
/// name = "Graphene lattice"
///
/// [bank]
/// kind = "log_gabor"
/// low_frequency = 2.0
/// high_frequency = 16.0
/// num_filters = 7
///
/// [estimation]
/// mode = "strongest_vote"
///
/// [bitmap]
/// scale = 0.0125
/// unit = "nm"
/// grayscale = true
///
/// [resize]
/// scale = 0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Name of the configuration.
    pub name: String,

    /// Filter bank.
    #[serde(default)]
    pub bank: BankConfig,

    /// Estimation mode.
    #[serde(default)]
    pub estimation: EstimationConfig,

    /// Bitmap import.
    #[serde(default)]
    pub bitmap: BitmapConfig,

    /// Optional resampling before filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeConfig>,
}

impl AnalysisConfig {
    /// Create a configuration with default sections.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bank: BankConfig::default(),
            estimation: EstimationConfig::default(),
            bitmap: BitmapConfig::default(),
            resize: None,
        }
    }

    /// Set the bank profile.
    pub fn with_bank_kind(mut self, kind: BankKind) -> Self {
        self.bank.kind = kind;
        self
    }

    /// Set the first and last centre frequencies.
    pub fn with_frequency_range(mut self, low: f64, high: f64) -> Self {
        self.bank.low_frequency = low;
        self.bank.high_frequency = high;
        self
    }

    /// Set the number of filters.
    pub fn with_num_filters(mut self, num_filters: usize) -> Self {
        self.bank.num_filters = num_filters;
        self
    }

    /// Set the estimation mode.
    pub fn with_mode(mut self, mode: EstimationMode) -> Self {
        self.estimation.mode = mode;
        self
    }

    /// Set the bitmap import section.
    pub fn with_bitmap(mut self, bitmap: BitmapConfig) -> Self {
        self.bitmap = bitmap;
        self
    }

    /// Resample images before filtering.
    pub fn with_resize(mut self, resize: ResizeConfig) -> Self {
        self.resize = Some(resize);
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section, see [`validate_config`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(validate_config(self)?)
    }

    /// Bitmap import options.
    pub fn bitmap_options(&self) -> BitmapOptions {
        self.bitmap.options()
    }

    /// Build the configured filter bank.
    pub fn build_bank(&self) -> Result<ConfiguredBank, ConfigError> {
        let bank = &self.bank;
        let (low, high, n) = (bank.low_frequency, bank.high_frequency, bank.num_filters);
        Ok(match bank.kind {
            BankKind::LogGabor => ConfiguredBank::LogGabor(LogGaborBank::create(low, high, n)?),
            BankKind::CircularGabor => {
                ConfiguredBank::CircularGabor(CircularGaborBank::create(low, high, n)?)
            }
        })
    }

    /// Validate, resize if configured, and estimate per-pixel frequencies.
    pub fn analyze<T: Sample>(&self, image: &Image<T>) -> Result<FrequencyMap, ConfigError> {
        self.validate()?;
        let mut bank = self.build_bank()?;
        let map = match &self.resize {
            Some(resize) => bank.get_frequencies(&resize.apply(image)?, self.estimation.mode)?,
            None => bank.get_frequencies(image, self.estimation.mode)?,
        };
        Ok(map)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
