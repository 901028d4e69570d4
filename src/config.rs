// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Connection configuration

use std::time::Duration;

use crate::http::DEFAULT_USER_AGENT;

/// Transport settings for a [`Connection`](crate::Connection)
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout (None = transport default)
    pub timeout: Option<Duration>,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Headers sent with every request
    pub default_headers: Vec<(String, String)>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            proxy: None,
            default_headers: vec![],
        }
    }
}

impl ConnectionConfig {
    /// Create a new connection config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}
