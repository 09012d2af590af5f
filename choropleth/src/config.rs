use crate::algorithms::scale::ColorSpectrum;
use crate::error::{Error, Result};
use crate::model::{Color, MetricKey};
use crate::numeric::limits;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const PRIORITY_SCORE_NORM: &str = "Priority_Score_Norm";
pub const PRIORITY_SCORE_COMPOSITION: &str = "Priority_Score_Composition";
pub const DIFFERENCE_SCORE: &str = "Difference_Score";

/// One labeled bin of a fixed-domain metric: `[lower, upper)`, last bin closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedBin {
    pub lower: f64,
    pub upper: f64,
    pub label: String,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetricKind {
    /// Jenks-classified; `default_domain` drives the continuous fallback
    /// while no breaks are available.
    Natural { default_domain: [f64; 2], spectrum: ColorSpectrum },
    /// Domain known in advance; rendered with fixed labeled bins.
    Fixed { bins: Vec<FixedBin> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    pub key: MetricKey,
    #[serde(default)]
    pub title: String,
    pub kind: MetricKind,
}

impl MetricConfig {
    pub fn is_fixed(&self) -> bool { matches!(self.kind, MetricKind::Fixed { .. }) }

    /// Spectrum of a Jenks-classified metric.
    pub fn spectrum(&self) -> Option<&ColorSpectrum> {
        match &self.kind {
            MetricKind::Natural { spectrum, .. } => Some(spectrum),
            MetricKind::Fixed { .. } => None,
        }
    }

    /// Legend heading; falls back to the key.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { &self.key } else { &self.title }
    }

    fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(Error::InvalidConfig(format!("metric '{}': {}", self.key, msg)));
        if self.key.trim().is_empty() {
            return Err(Error::InvalidConfig("metric key must not be empty".into()));
        }
        match &self.kind {
            MetricKind::Natural { default_domain: [lo, hi], .. } => {
                if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                    return bad(format!("default_domain [{}, {}] must be finite and increasing", lo, hi));
                }
            }
            MetricKind::Fixed { bins } => {
                if bins.is_empty() {
                    return bad("fixed metric needs at least one bin".into());
                }
                for (i, b) in bins.iter().enumerate() {
                    if !b.lower.is_finite() || !b.upper.is_finite() || b.lower >= b.upper {
                        return bad(format!("bin {} bounds must be finite and increasing", i));
                    }
                    if i > 0 && bins[i - 1].upper > b.lower {
                        return bad(format!("bin {} overlaps the previous bin", i));
                    }
                }
            }
        }
        Ok(())
    }
}

fn default_classes() -> usize { 5 }
fn default_line_weight() -> f32 { 3.0 }
fn default_line_opacity() -> f32 { 0.9 }
fn default_no_data_color() -> Color { Color::rgb(0xbd, 0xbd, 0xbd) }
fn default_label_decimals() -> usize { 2 }
fn default_metric() -> MetricKey { PRIORITY_SCORE_NORM.to_string() }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_classes")]
    pub classes: usize,
    #[serde(default = "default_line_weight")]
    pub line_weight: f32,
    #[serde(default = "default_line_opacity")]
    pub line_opacity: f32,
    #[serde(default = "default_no_data_color")]
    pub no_data_color: Color,
    #[serde(default = "default_label_decimals")]
    pub label_decimals: usize,
    #[serde(default = "default_metric")]
    pub default_metric: MetricKey,
    /// Registration order doubles as the legend fallback priority.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            classes: default_classes(),
            line_weight: default_line_weight(),
            line_opacity: default_line_opacity(),
            no_data_color: default_no_data_color(),
            label_decimals: default_label_decimals(),
            default_metric: default_metric(),
            metrics: default_metrics(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_value(v)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !limits::in_class_bounds(self.classes) {
            return Err(Error::InvalidConfig(format!(
                "classes must be in {}..={}, got {}",
                limits::MIN_CLASSES,
                limits::MAX_CLASSES,
                self.classes
            )));
        }
        if !self.line_weight.is_finite() || self.line_weight <= 0.0 {
            return Err(Error::InvalidConfig("line_weight must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.line_opacity) {
            return Err(Error::InvalidConfig("line_opacity must be in [0, 1]".into()));
        }
        if self.label_decimals > limits::MAX_LABEL_DECIMALS {
            return Err(Error::InvalidConfig(format!(
                "label_decimals must be at most {}",
                limits::MAX_LABEL_DECIMALS
            )));
        }
        if self.metrics.is_empty() {
            return Err(Error::InvalidConfig("at least one metric is required".into()));
        }
        let mut seen = HashSet::new();
        for m in &self.metrics {
            m.validate()?;
            if !seen.insert(m.key.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate metric '{}'", m.key)));
            }
        }
        if !seen.contains(self.default_metric.as_str()) {
            return Err(Error::UnknownMetric(self.default_metric.clone()));
        }
        Ok(())
    }

    pub fn metric(&self, key: &str) -> Option<&MetricConfig> {
        self.metrics.iter().find(|m| m.key == key)
    }

    pub fn metric_keys(&self) -> Vec<MetricKey> {
        self.metrics.iter().map(|m| m.key.clone()).collect()
    }
}

fn spectrum(stops: &[(u8, u8, u8)]) -> ColorSpectrum {
    let colors = stops.iter().map(|&(r, g, b)| Color::rgb(r, g, b)).collect();
    // Built-in spectra are within the stop limits.
    ColorSpectrum::new(colors).unwrap_or_else(|_| unreachable!("built-in spectrum"))
}

fn bin(lower: f64, upper: f64, label: &str, color: (u8, u8, u8)) -> FixedBin {
    FixedBin { lower, upper, label: label.to_string(), color: Color::rgb(color.0, color.1, color.2) }
}

/// Metrics produced by the network scoring service.
pub fn default_metrics() -> Vec<MetricConfig> {
    // YlOrRd, light to dark.
    let ylorrd = spectrum(&[(0xff, 0xff, 0xb2), (0xfe, 0xcc, 0x5c), (0xfd, 0x8d, 0x3c), (0xf0, 0x3b, 0x20), (0xbd, 0x00, 0x26)]);
    // PuBu
    let pubu = spectrum(&[(0xf1, 0xee, 0xf6), (0xbd, 0xc9, 0xe1), (0x74, 0xa9, 0xcf), (0x2b, 0x8c, 0xbe), (0x04, 0x5a, 0x8d)]);
    vec![
        MetricConfig {
            key: PRIORITY_SCORE_NORM.to_string(),
            title: "Priority score (network normalized)".to_string(),
            // Nine criteria, each normalized to [0, 1].
            kind: MetricKind::Natural { default_domain: [0.0, 9.0], spectrum: ylorrd },
        },
        MetricConfig {
            key: PRIORITY_SCORE_COMPOSITION.to_string(),
            title: "Priority score (weighted composition)".to_string(),
            // Weighted average on the 1-3 criterion input scale.
            kind: MetricKind::Natural { default_domain: [0.0, 3.0], spectrum: pubu },
        },
        MetricConfig {
            key: DIFFERENCE_SCORE.to_string(),
            title: "Change vs. previous weights".to_string(),
            // RdBu, reversed so decreases read red and increases blue.
            kind: MetricKind::Fixed {
                bins: vec![
                    bin(-1.0, -0.5, "Much lower", (0xca, 0x00, 0x20)),
                    bin(-0.5, -0.1, "Lower", (0xf4, 0xa5, 0x82)),
                    bin(-0.1, 0.1, "About the same", (0xf7, 0xf7, 0xf7)),
                    bin(0.1, 0.5, "Higher", (0x92, 0xc5, 0xde)),
                    bin(0.5, 1.0, "Much higher", (0x05, 0x71, 0xb0)),
                ],
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_validate() {
        let cfg = EngineConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.metric_keys(), vec![PRIORITY_SCORE_NORM, PRIORITY_SCORE_COMPOSITION, DIFFERENCE_SCORE]);
        assert!(cfg.metric(DIFFERENCE_SCORE).unwrap().is_fixed());
        assert!(cfg.metric(DIFFERENCE_SCORE).unwrap().spectrum().is_none());
    }

    #[test]
    fn fixed_metric_needs_no_spectrum() {
        let cfg = EngineConfig::from_json_value(json!({
            "default_metric": "d",
            "metrics": [{"key": "d", "kind": {"type": "fixed", "bins": [
                {"lower": -1, "upper": 0, "label": "down", "color": "#ca0020"},
                {"lower": 0, "upper": 1, "label": "up", "color": "#0571b0"}
            ]}}]
        }))
        .unwrap();
        assert!(cfg.metric("d").unwrap().is_fixed());
        // A natural metric without one is rejected.
        let missing = json!({"default_metric": "n", "metrics": [
            {"key": "n", "kind": {"type": "natural", "default_domain": [0, 1]}}
        ]});
        assert!(EngineConfig::from_json_value(missing).is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json_value(json!({"classes": 7, "line_weight": 4.5})).unwrap();
        assert_eq!(cfg.classes, 7);
        assert_eq!(cfg.line_weight, 4.5);
        assert_eq!(cfg.metrics.len(), 3);
        assert_eq!(cfg.default_metric, PRIORITY_SCORE_NORM);
    }

    #[test]
    fn custom_metric_table() {
        let cfg = EngineConfig::from_json_value(json!({
            "default_metric": "Safety_Score",
            "metrics": [{
                "key": "Safety_Score",
                "kind": {"type": "natural", "default_domain": [1, 3], "spectrum": ["#fee5d9", "#fcae91", "#cb181d"]}
            }]
        }))
        .unwrap();
        let m = cfg.metric("Safety_Score").unwrap();
        assert_eq!(m.display_title(), "Safety_Score");
        assert_eq!(m.spectrum().unwrap().stops().len(), 3);
    }

    #[test]
    fn rejects_invalid_tables() {
        let cases = [
            json!({"classes": 1}),
            json!({"classes": 13}),
            json!({"line_opacity": 1.5}),
            json!({"default_metric": "nope"}),
            json!({"metrics": []}),
            json!({"default_metric": "a", "metrics": [
                {"key": "a", "kind": {"type": "natural", "default_domain": [3, 1], "spectrum": ["#000000", "#777777", "#ffffff"]}}
            ]}),
            json!({"default_metric": "a", "metrics": [
                {"key": "a", "kind": {"type": "natural", "default_domain": [0, 1], "spectrum": ["#000000", "#777777", "#ffffff"]}},
                {"key": "a", "kind": {"type": "natural", "default_domain": [0, 1], "spectrum": ["#000000", "#777777", "#ffffff"]}}
            ]}),
            json!({"default_metric": "d", "metrics": [
                {"key": "d", "kind": {"type": "fixed", "bins": [
                    {"lower": 0, "upper": 1, "label": "lo", "color": "#000000"},
                    {"lower": 0.5, "upper": 2, "label": "hi", "color": "#ffffff"}
                ]}}
            ]}),
        ];
        for c in cases {
            assert!(EngineConfig::from_json_value(c.clone()).is_err(), "accepted {c}");
        }
    }
}
