// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::headers;
use crate::error::{Error, Result};

/// A single outgoing request, built per call and consumed by the executor
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body (None = no payload at all)
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a request with an empty header map and no body
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Create a new PUT request
    pub fn put(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::PUT, url)
    }

    /// Set a header, replacing any previous value.
    ///
    /// Names or values that are not valid HTTP header text are skipped.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set a header, failing on names or values that are not valid
    /// HTTP header text
    pub fn try_header(mut self, name: &str, value: &str) -> Result<Self> {
        let header_name =
            HeaderName::try_from(name).map_err(|e| Error::invalid_header(name, e))?;
        let header_value =
            HeaderValue::try_from(value).map_err(|e| Error::invalid_header(name, e))?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `data` as the JSON body and mark it `application/json`
    pub fn json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.body = Some(Bytes::from(json));
        Ok(self.header(headers::CONTENT_TYPE, "application/json"))
    }

    /// Get a header value as text
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Body for [`Connection::put`](super::Connection::put): text or bytes.
///
/// Text is sent as its UTF-8 encoding, bytes are sent unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Bytes);

impl Payload {
    /// The bytes that go on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the wire bytes
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload(Bytes::from(s.into_bytes()))
    }
}

impl From<&[u8]> for Payload {
    fn from(b: &[u8]) -> Self {
        Payload(Bytes::copy_from_slice(b))
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(b: &[u8; N]) -> Self {
        Payload(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self {
        Payload(Bytes::from(b))
    }
}

impl From<Bytes> for Payload {
    fn from(b: Bytes) -> Self {
        Payload(b)
    }
}
