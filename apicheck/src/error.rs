use crate::markdown;
use hyper::http;
use std::{fmt::Display, io, path::PathBuf, sync};

/// A single place where a response body deviated from its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the response body, empty for the root.
    pub path: String,
    pub reason: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "/" } else { self.path.as_str() };
        write!(f, "{}: {}", path, self.reason)
    }
}

fn list_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("\n  - {}", violation))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid header name")]
    InvalidHeaderName,
    #[error("Invalid header value")]
    InvalidHeaderValue,
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),
    #[error("Http error: {0}")]
    Http(#[from] http::Error),
    #[error("Hyper error: {0}")]
    Hyper(#[from] hyper::Error),
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    #[error("The lock was poisoned")]
    PoisonedLock,

    #[error("Schema fixture {} not found", .0.display())]
    SchemaNotFound(PathBuf),
    #[error("Couldn't read schema fixture {}: {source}", .path.display())]
    SchemaIo { path: PathBuf, source: io::Error },
    #[error("Schema fixture {} is not valid JSON: {source}", .path.display())]
    SchemaParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("The schema couldn't be compiled: {0}")]
    InvalidSchema(String),

    #[error("The response body is not valid JSON: {0}. Body: \"{1}\"")]
    InvalidJsonBody(serde_json::Error, String),
    #[error("The response body doesn't match the schema:{}", list_violations(.0))]
    Validation(Vec<Violation>),

    #[error("Expected status code {expected}. Actual status code {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },
    #[error("Expected {pointer} to be {expected}. Actual value {actual}")]
    UnexpectedValue {
        pointer: String,
        expected: String,
        actual: String,
    },

    #[error("Markdown error: {0}")]
    Markdown(#[from] markdown::error::Error),
    #[error("Playback request doesn't match interaction {interaction_number}: expected {expected}, got {actual}")]
    PlaybackMismatch {
        interaction_number: usize,
        expected: String,
        actual: String,
    },
    #[error("No recorded interaction left for {0}")]
    PlaybackExhausted(String),
    #[error("The playback server has stopped unexpectedly")]
    PlaybackServerStopped,
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<hyper::header::InvalidHeaderName> for Error {
    fn from(_: hyper::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(_: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}
