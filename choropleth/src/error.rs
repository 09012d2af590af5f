use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("document is not a feature collection: {0}")]
    NotAFeatureCollection(String),
    #[error("feature collection has {got} features, limit is {max}")]
    TooManyFeatures { got: usize, max: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
    #[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error("invalid breaks: {0}")]
    InvalidBreaks(String),
}

impl Error {
    /// Stable machine-readable code, used by the bindings' error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "invalid_json",
            Error::NotAFeatureCollection(_) => "not_feature_collection",
            Error::TooManyFeatures { .. } => "too_many_features",
            Error::InvalidConfig(_) => "invalid_config",
            Error::UnknownMetric(_) => "unknown_metric",
            Error::InvalidColor(_) => "invalid_color",
            Error::InvalidBreaks(_) => "invalid_breaks",
        }
    }
}
