use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AnalystError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Failed request with status {status}: {body}")]
    RemoteService { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response from the analyst service: {0}")]
    InvalidResponse(String),

    #[error("Query execution failed: {0}")]
    BackendQuery(String),

    #[error("Unknown suggestion: {0}")]
    UnknownSuggestion(String),
}

impl From<reqwest::Error> for AnalystError {
    fn from(err: reqwest::Error) -> Self {
        AnalystError::Transport(err.to_string())
    }
}

pub type AnalystResult<T> = Result<T, AnalystError>;
