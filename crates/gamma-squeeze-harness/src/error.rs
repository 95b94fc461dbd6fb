use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fixture case '{case}' is missing numeric input '{field}'")]
    MissingInput { case: String, field: String },
    #[error("fixture case '{case}' names unknown function '{function}'")]
    UnknownFunction { case: String, function: String },
    #[error("invalid sweep: {0}")]
    InvalidSweep(String),
    #[error(transparent)]
    Squeeze(#[from] gamma_squeeze_core::SqueezeError),
}
