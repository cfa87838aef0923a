//! Physical units and their Fourier-conjugate counterparts.
//!
//! A [`Unit`] is a value type tagged with the [`Domain`] it measures. Every
//! spatial unit has exactly one frequency-domain conjugate (meters ↔ 1/meters),
//! reached through [`Unit::transform_unit`]. The relation is structural, so a
//! double transform returns a unit equal to the original without any parsing
//! of unit labels.

use std::borrow::Cow;
use std::fmt;

/// Whether coordinates or samples represent position or spatial frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Physical position.
    Spatial,
    /// Spatial frequency (Fourier conjugate of position).
    Frequency,
}

impl Domain {
    /// The conjugate domain.
    pub fn flipped(self) -> Self {
        match self {
            Domain::Spatial => Domain::Frequency,
            Domain::Frequency => Domain::Spatial,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Spatial => write!(f, "spatial"),
            Domain::Frequency => write!(f, "frequency"),
        }
    }
}

/// A unit of measure in either the spatial or the frequency domain.
///
/// Internally a unit stores the symbol and scale of its *spatial* side, plus
/// the domain it currently describes. The frequency side is derived: its
/// multiplier is the reciprocal of the spatial scale, and it displays as
/// `1/<symbol>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    symbol: Cow<'static, str>,
    base_symbol: Cow<'static, str>,
    scale: f64,
    domain: Domain,
}

impl Unit {
    /// Meter, the base length unit.
    pub const METER: Unit = Unit::spatial_const("m", "m", 1.0);

    /// Nanometer.
    pub const NANOMETER: Unit = Unit::spatial_const("nm", "m", 1e-9);

    /// Pixel, the default unit of images read from bitmaps.
    pub const PIXEL: Unit = Unit::spatial_const("px", "px", 1.0);

    /// Inverse meter.
    pub const INVERSE_METER: Unit = Unit::frequency_const("m", "m", 1.0);

    /// Inverse nanometer.
    pub const INVERSE_NANOMETER: Unit = Unit::frequency_const("nm", "m", 1e-9);

    /// Cycles per pixel.
    pub const INVERSE_PIXEL: Unit = Unit::frequency_const("px", "px", 1.0);

    const fn spatial_const(symbol: &'static str, base: &'static str, scale: f64) -> Self {
        Self {
            symbol: Cow::Borrowed(symbol),
            base_symbol: Cow::Borrowed(base),
            scale,
            domain: Domain::Spatial,
        }
    }

    const fn frequency_const(symbol: &'static str, base: &'static str, scale: f64) -> Self {
        Self {
            symbol: Cow::Borrowed(symbol),
            base_symbol: Cow::Borrowed(base),
            scale,
            domain: Domain::Frequency,
        }
    }

    /// A custom spatial unit that is its own base (multiplier 1).
    ///
    /// Used for free-form axis labels such as `"pixel"` or `"sample"`.
    pub fn custom(symbol: impl Into<String>) -> Self {
        let symbol: String = symbol.into();
        Self {
            base_symbol: Cow::Owned(symbol.clone()),
            symbol: Cow::Owned(symbol),
            scale: 1.0,
            domain: Domain::Spatial,
        }
    }

    /// Resolve a unit label.
    ///
    /// Known labels (`m`, `meter`, `nm`, `nanometer`, `px`, `pixel`, each
    /// optionally prefixed with `1/`) map to the catalogue units. Anything
    /// else becomes a [`Unit::custom`] spatial unit.
    pub fn from_label(label: &str) -> Self {
        let (inverse, name) = match label.trim().strip_prefix("1/") {
            Some(rest) => (true, rest.trim()),
            None => (false, label.trim()),
        };
        let unit = match name {
            "m" | "meter" | "meters" => Unit::METER,
            "nm" | "nanometer" | "nanometers" => Unit::NANOMETER,
            "px" | "pixel" | "pixels" => Unit::PIXEL,
            other => Unit::custom(other),
        };
        if inverse { unit.transform_unit() } else { unit }
    }

    /// Domain this unit measures.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Symbol of the spatial side of this unit (`"nm"` for both nm and 1/nm).
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Scale factor to the base unit of the same domain.
    pub fn multiplier(&self) -> f64 {
        match self.domain {
            Domain::Spatial => self.scale,
            Domain::Frequency => 1.0 / self.scale,
        }
    }

    /// Canonical unit of the same physical kind and domain.
    pub fn base(&self) -> Unit {
        Unit {
            symbol: self.base_symbol.clone(),
            base_symbol: self.base_symbol.clone(),
            scale: 1.0,
            domain: self.domain,
        }
    }

    /// Conjugate unit in the other domain (m ↔ 1/m).
    pub fn transform_unit(&self) -> Unit {
        Unit {
            symbol: self.symbol.clone(),
            base_symbol: self.base_symbol.clone(),
            scale: self.scale,
            domain: self.domain.flipped(),
        }
    }

    /// Rescale `value` from this unit into `target`.
    ///
    /// No kind check is made; converting meters into pixels is the caller's
    /// mistake to avoid.
    pub fn convert_value(&self, value: f64, target: &Unit) -> f64 {
        value * self.multiplier() / target.multiplier()
    }

    /// Map a value to the conjugate domain (a period to a frequency or back).
    pub fn transform_value(&self, value: f64) -> f64 {
        1.0 / value
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.domain {
            Domain::Spatial => write!(f, "{}", self.symbol),
            Domain::Frequency => write!(f, "1/{}", self.symbol),
        }
    }
}
