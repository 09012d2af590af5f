use crate::error::{Error, Result};
use crate::numeric::limits;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat property mapping carried by each feature.
pub type Properties = Map<String, Value>;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Properties>,
    // Geometry is opaque to classification; kept so a collection round-trips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Feature {
    /// Numeric value of `property`, or `None` when missing or malformed.
    pub fn value(&self, property: &str) -> Option<f64> {
        self.properties.as_ref().and_then(|p| property_value(p, property))
    }
}

impl FeatureCollection {
    pub fn len(&self) -> usize { self.features.len() }
    pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// Parse a GeoJSON-like document. Only `features[].properties` are read.
    pub fn from_json_value(v: Value) -> Result<Self> {
        match v.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") | None => {}
            Some(other) => return Err(Error::NotAFeatureCollection(format!("type is '{}'", other))),
        }
        let Some(features) = v.get("features") else {
            return Err(Error::NotAFeatureCollection("missing 'features' array".into()));
        };
        let Some(arr) = features.as_array() else {
            return Err(Error::NotAFeatureCollection("'features' is not an array".into()));
        };
        if arr.len() > limits::MAX_FEATURES {
            return Err(Error::TooManyFeatures { got: arr.len(), max: limits::MAX_FEATURES });
        }
        let fc: FeatureCollection = serde_json::from_value(v)?;
        Ok(fc)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let v: Value = serde_json::from_str(s)?;
        Self::from_json_value(v)
    }

    /// Sample of finite values of `property`, in feature order.
    pub fn sample(&self, property: &str) -> Vec<f64> {
        extract_sample(&self.features, property)
    }
}

/// Interpret one property value as a finite number.
///
/// Accepts JSON numbers and numeric strings; everything else (null, booleans,
/// arrays, objects, text, NaN/inf spelled as strings) is rejected.
pub fn property_value(props: &Properties, property: &str) -> Option<f64> {
    let x = match props.get(property)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

pub fn extract_sample(features: &[Feature], property: &str) -> Vec<f64> {
    features.iter().filter_map(|f| f.value(property)).collect()
}
