use thiserror::Error;
use warden::WardenError;

/// Error type for handling errors on Sample
#[derive(Error, Debug)]
pub enum SampleError {
    /// A standard error with configurable message
    #[error("Generic error message (use sparigly): `{0}`")]
    Message(String),
    /// Error when starting a runtime or registering signals
    #[error("io::Error eg from tokio start")]
    IoError(#[from] std::io::Error),
    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Figment(#[from] figment::Error),
    /// Reqwest error
    #[error("Reqwest error")]
    ReqwestError(#[from] reqwest::Error),
    /// Error from the registry or scheduler
    #[error("Warden error: {0}")]
    Warden(#[from] WardenError),
    #[error("Json error")]
    Json(#[from] serde_json::Error),
}
