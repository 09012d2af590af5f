use crate::algorithms::jenks::BreakSet;
use crate::error::{Error, Result};
use crate::model::Color;
use crate::numeric::limits;
use crate::numeric::tolerance::{clamp01, unit_position};
use serde::{Deserialize, Serialize};

/// Ordered color stops (light to dark, or any visual ordering), evenly spaced
/// along `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct ColorSpectrum {
    stops: Vec<Color>,
}

impl ColorSpectrum {
    pub fn new(stops: Vec<Color>) -> Result<Self> {
        if !limits::in_stop_bounds(stops.len()) {
            return Err(Error::InvalidConfig(format!(
                "spectrum needs {}..={} stops, got {}",
                limits::MIN_SPECTRUM_STOPS,
                limits::MAX_SPECTRUM_STOPS,
                stops.len()
            )));
        }
        Ok(ColorSpectrum { stops })
    }

    pub fn from_hex(stops: &[&str]) -> Result<Self> {
        let colors = stops.iter().map(|s| Color::parse_hex(s)).collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn stops(&self) -> &[Color] { &self.stops }

    /// Piecewise-linear sample at `t` (clamped to [0, 1]).
    pub fn at(&self, t: f64) -> Color {
        let segs = (self.stops.len() - 1) as f64;
        let pos = clamp01(t) * segs;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        self.stops[i].lerp(self.stops[i + 1], pos - i as f64)
    }

    /// `k` colors taken at even steps from the first stop to the last.
    pub fn discrete(&self, k: usize) -> Vec<Color> {
        match k {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            _ => (0..k).map(|i| self.at(i as f64 / (k - 1) as f64)).collect(),
        }
    }
}

impl TryFrom<Vec<Color>> for ColorSpectrum {
    type Error = Error;
    fn try_from(stops: Vec<Color>) -> Result<Self> { ColorSpectrum::new(stops) }
}

impl From<ColorSpectrum> for Vec<Color> {
    fn from(s: ColorSpectrum) -> Vec<Color> { s.stops }
}

/// Value to color through computed breaks; one color per class.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteColorScale {
    breaks: BreakSet,
    colors: Vec<Color>,
}

impl DiscreteColorScale {
    pub fn build(spectrum: &ColorSpectrum, breaks: &BreakSet) -> Self {
        DiscreteColorScale { colors: spectrum.discrete(breaks.classes()), breaks: breaks.clone() }
    }

    pub fn color(&self, value: f64) -> Color {
        self.colors[self.breaks.class_of(value)]
    }

    pub fn colors(&self) -> &[Color] { &self.colors }
    pub fn breaks(&self) -> &BreakSet { &self.breaks }
}

/// Unbinned mapping of a fixed domain onto a spectrum, clamped at both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousScale<'a> {
    pub spectrum: &'a ColorSpectrum,
    pub lo: f64,
    pub hi: f64,
}

impl ContinuousScale<'_> {
    pub fn color(&self, value: f64) -> Color {
        self.spectrum.at(unit_position(value, self.lo, self.hi))
    }
}
