//! describe errors in Warden

use std::{any::Any, time::Duration};

use thiserror::Error;

/// Error type for the lifecycle of the registry and its scheduler
#[derive(Error, Debug)]
pub enum WardenError {
    /// A standard error with configurable message
    #[error("Generic error: `{0}`")]
    Message(String),
    /// The scheduler loop has already been started (a stopped loop cannot be resumed)
    #[error("Scheduler already started")]
    AlreadyStarted,
    /// The scheduler loop was never started
    #[error("Scheduler not running")]
    NotRunning,
    /// io::Error eg from tokio runtime start
    #[error("io::Error eg from tokio start")]
    IoError(#[from] std::io::Error),
    /// The scheduler thread panicked and could not be joined cleanly
    #[error("Scheduler thread panicked: `{0}`")]
    JoinError(String),
}

impl WardenError {
    /// Build a [WardenError::JoinError] from the payload of a panicked thread
    pub(crate) fn from_join(payload: Box<dyn Any + Send + 'static>) -> Self {
        WardenError::JoinError(panic_message(payload.as_ref()))
    }
}

/// Reasons a health probe reports a service as unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The probe ran and reported a failure with a cause
    #[error("{0}")]
    Failed(String),
    /// The probe did not answer within the allowed time
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    /// The probe panicked while running
    #[error("probe panicked: {0}")]
    Panicked(String),
}

impl From<String> for ProbeError {
    fn from(cause: String) -> ProbeError {
        ProbeError::Failed(cause)
    }
}

impl From<&str> for ProbeError {
    fn from(cause: &str) -> ProbeError {
        ProbeError::Failed(cause.to_owned())
    }
}

/// Extract the text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Unknown".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_error_from_str() {
        let err: ProbeError = "connection refused".into();
        assert_eq!(err, ProbeError::Failed("connection refused".to_owned()));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn timeout_message() {
        let err = ProbeError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "probe timed out after 250ms");
    }

    #[test]
    fn panic_payloads() {
        let from_str: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(panic_message(from_str.as_ref()), "static text");

        let from_string: Box<dyn Any + Send> = Box::new(String::from("owned text"));
        assert_eq!(panic_message(from_string.as_ref()), "owned text");

        let other: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(other.as_ref()), "Unknown");
    }

    #[test]
    fn join_error_keeps_message() {
        let payload: Box<dyn Any + Send> = Box::new("loop exploded");
        let err = WardenError::from_join(payload);
        assert_eq!(err.to_string(), "Scheduler thread panicked: `loop exploded`");
    }
}
