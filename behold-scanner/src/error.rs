use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

/// Problems with a single site definition. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("profile URL template '{template}' must contain exactly one '{{}}' slot, found {slots}")]
    BadTemplate { template: String, slots: usize },

    #[error("unknown error_type '{0}' (expected 'message' or 'status_code')")]
    UnknownMode(String),

    #[error("unknown error_message_means '{0}' (expected 'absent' or 'present')")]
    UnknownMeaning(String),

    #[error("error_type 'message' requires an error_message")]
    MissingIndicator,
}

/// Failures while classifying a response that arrived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unable to decode response body with any of: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
