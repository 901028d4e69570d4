// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response body decoding
//!
//! The decoder recognizes exactly three content categories:
//!
//! - `application/json` (exact match): parsed into a [`serde_json::Value`]
//! - anything starting with `text/plain`: decoded as UTF-8 text
//! - everything else, including a missing header: raw bytes, unchanged
//!
//! Error bodies go through the same rules, so a structured diagnostic from
//! the server stays structured inside [`Error::Server`](crate::Error::Server).

use std::fmt;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde_json::Value;
use thiserror::Error;

use super::headers::CONTENT_TYPE;

/// Content category of a response, as declared by its `Content-Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `application/json`
    Json,
    /// `text/plain`, with or without parameters
    PlainText,
    /// Anything else; the body is passed through
    Other,
}

impl ContentKind {
    /// Classify a `Content-Type` header value
    pub fn classify(content_type: Option<&str>) -> Self {
        match content_type {
            Some("application/json") => ContentKind::Json,
            Some(ct) if ct.starts_with("text/plain") => ContentKind::PlainText,
            _ => ContentKind::Other,
        }
    }

    /// Classify from a header map
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::classify(
            headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        )
    }
}

/// A response body interpreted according to its content type
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// Structured JSON value
    Json(Value),
    /// UTF-8 text
    Text(String),
    /// Opaque bytes
    Binary(Bytes),
}

impl DecodedBody {
    /// The content category this body was decoded as
    pub fn kind(&self) -> ContentKind {
        match self {
            DecodedBody::Json(_) => ContentKind::Json,
            DecodedBody::Text(_) => ContentKind::PlainText,
            DecodedBody::Binary(_) => ContentKind::Other,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DecodedBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedBody::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            DecodedBody::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            DecodedBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            DecodedBody::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            DecodedBody::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for DecodedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedBody::Json(v) => write!(f, "{}", v),
            DecodedBody::Text(s) => f.write_str(s),
            DecodedBody::Binary(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<Value> for DecodedBody {
    fn from(v: Value) -> Self {
        DecodedBody::Json(v)
    }
}

impl From<String> for DecodedBody {
    fn from(s: String) -> Self {
        DecodedBody::Text(s)
    }
}

impl From<Bytes> for DecodedBody {
    fn from(b: Bytes) -> Self {
        DecodedBody::Binary(b)
    }
}

/// The body did not conform to its declared content type
#[derive(Error, Debug)]
pub enum DecodeError {
    /// JSON or text body was not valid UTF-8
    #[error("body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// JSON body did not parse
    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Decode a raw body according to the `Content-Type` in `headers`
pub fn decode(raw: Bytes, headers: &HeaderMap) -> Result<DecodedBody, DecodeError> {
    match ContentKind::from_headers(headers) {
        ContentKind::Json => {
            let text = std::str::from_utf8(&raw)?;
            Ok(DecodedBody::Json(serde_json::from_str(text)?))
        }
        ContentKind::PlainText => Ok(DecodedBody::Text(std::str::from_utf8(&raw)?.to_owned())),
        ContentKind::Other => Ok(DecodedBody::Binary(raw)),
    }
}
