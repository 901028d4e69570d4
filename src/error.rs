// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the UGLIX client
//!
//! A non-success HTTP status is not a transport failure: it arrives as
//! [`Error::Server`] carrying the status and the error body, decoded with
//! the same content-type rules as a successful response.

use thiserror::Error;

use crate::http::{DecodeError, DecodedBody};

/// Result type alias for UGLIX operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the UGLIX client
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status
    #[error("server responded with HTTP {code}: {body}")]
    Server { code: u16, body: DecodedBody },

    /// The body did not match its declared content type
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Transport-level failure (connect, TLS, read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization of a request body failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The openssl tool reported a failure
    #[error("openssl {command} failed: {diagnostic}")]
    Openssl { command: String, diagnostic: String },

    /// A header name or value is not valid HTTP header text
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a server error
    pub fn server(code: u16, body: DecodedBody) -> Self {
        Error::Server { code, body }
    }

    /// Create an openssl failure
    pub fn openssl(command: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Error::Openssl {
            command: command.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if the server answered with an error status
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Server { .. })
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(s) if (400..500).contains(&s))
    }

    /// Check if this is a server-side error (5xx)
    pub fn is_server_side(&self) -> bool {
        matches!(self.status_code(), Some(s) if (500..600).contains(&s))
    }

    /// Check if this is a transport error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Server { code, .. } => Some(*code),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get the decoded error body of a server error
    pub fn server_body(&self) -> Option<&DecodedBody> {
        match self {
            Error::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}
