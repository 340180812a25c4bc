use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid pattern for rule '{rule}': {source}")]
    Pattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Response Error: {0}")]
    Response(String),
}

pub type LensResult<T> = Result<T, LensError>;
