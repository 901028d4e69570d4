// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session token storage
//!
//! The server hands out its session identifier in a `Set-Cookie` header.
//! The whole header value is kept as an opaque token and replayed verbatim
//! as the `Cookie` header of every later request, until the server sends a
//! new one. There is no expiry handling: the token is trusted until the
//! server rejects it.

use reqwest::header::HeaderMap;

use super::headers;

/// Session state of a single connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session resuming an earlier token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// The current token, if the server issued one
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Replace the token
    pub fn set(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Forget the token
    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }

    /// Name of the cookie carried by the token (`name` in `name=value; ...`)
    pub fn cookie_name(&self) -> Option<&str> {
        let first = self.token()?.split(';').next()?.trim();
        let (name, _) = first.split_once('=')?;
        Some(name.trim())
    }

    /// Extract a session-setting header from a response.
    ///
    /// When the response carries several `Set-Cookie` headers the first one
    /// wins. Empty values are not tokens.
    pub fn from_headers(headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(headers::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| !v.trim().is_empty())
            .map(str::to_owned)
    }

    /// Adopt the token from `headers`, if any. Returns whether it changed.
    pub fn update_from(&mut self, headers: &HeaderMap) -> bool {
        match Self::from_headers(headers) {
            Some(token) if self.token.as_deref() != Some(token.as_str()) => {
                self.token = Some(token);
                true
            }
            _ => false,
        }
    }
}
