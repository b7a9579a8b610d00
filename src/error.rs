use thiserror::Error;

/// Error taxonomy for client-side marketplace operations.
///
/// `Validation` is raised before any request leaves the process; the
/// remaining variants classify what came back (or failed to come back)
/// from the API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Request failed")]
    Network(#[from] reqwest::Error),

    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

impl ClientError {
    /// Human-readable message for transient status banners, with a
    /// generic fallback for transport failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Network(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
