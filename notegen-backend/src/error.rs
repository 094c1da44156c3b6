//! Error types for the inference client and the note pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the inference endpoint. Never retried.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request timed out: {0}")]
    Timeout(String),
    #[error("inference endpoint unreachable: {0}")]
    Transport(String),
    #[error("inference endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            InferenceError::Timeout(e.to_string())
        } else if e.is_builder() {
            InferenceError::Client(e.to_string())
        } else {
            InferenceError::Transport(e.to_string())
        }
    }
}

/// Error that aborts processing of one subject (or a whole run).
#[derive(Debug, Error)]
pub enum NoteGenError {
    #[error("network error while processing '{subject}': {source}")]
    Network {
        subject: String,
        #[source]
        source: InferenceError,
    },
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl NoteGenError {
    pub fn is_network(&self) -> bool {
        matches!(self, NoteGenError::Network { .. })
    }
}
