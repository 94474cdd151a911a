use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidingsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State store returned {status}: {body}")]
    StateStore { status: StatusCode, body: String },

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Enrichment failed: {0}")]
    Enrichment(String),
}

pub type Result<T> = std::result::Result<T, TidingsError>;
