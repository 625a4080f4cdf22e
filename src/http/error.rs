use reqwest::{
    header::{InvalidHeaderName, InvalidHeaderValue},
    StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
    #[error("invalid request path `{0}`: must start with `/`")]
    InvalidPath(String),
    #[error("document `{0}` is undefined")]
    Undefined(String),
}

impl Error {
    /// The HTTP status of the response that caused the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Server(err) => Some(err.status),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// A non-success response returned by OPA.
///
/// OPA reports failures with a body such as
/// `{"code": "invalid_parameter", "message": "..."}`, these fields are
/// kept when the body could be parsed.
#[derive(Debug)]
pub struct ServerError {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: Option<String>,
    pub errors: Vec<Value>,
}

impl ServerError {
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct ErrorBody {
            code: Option<String>,
            message: Option<String>,
            errors: Vec<Value>,
        }

        let body: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        Self {
            status,
            code: body.code,
            message: body.message,
            errors: body.errors,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status.as_u16())?;

        if let Some(reason) = self.status.canonical_reason() {
            write!(f, " {reason}")?;
        }

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }

        Ok(())
    }
}

impl std::error::Error for ServerError {}
