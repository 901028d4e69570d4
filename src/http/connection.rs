// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session-aware connection to an UGLIX server

use bytes::Bytes;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use url::Url;

use super::request::{Payload, Request};
use super::response::{decode, DecodedBody};
use super::session::Session;
use super::{headers, OCTET_STREAM};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// A connection to an UGLIX server.
///
/// Every request targets `base_url + path`. Once the server has issued a
/// session token it is sent back with each request, and replaced whenever
/// a successful response carries a new one. Requests are blocking and
/// one-at-a-time; methods take `&mut self` because a response may update
/// the session.
///
/// ```rust,no_run
/// use uglix::Connection;
///
/// let mut conn = Connection::new("http://pac.fil.cool/uglix")?;
/// let usage = conn.get("/bin/echo")?;
/// println!("{}", usage);
/// # Ok::<(), uglix::Error>(())
/// ```
#[derive(Debug)]
pub struct Connection {
    base_url: String,
    session: Session,
    client: Client,
    config: ConnectionConfig,
}

impl Connection {
    /// Open a connection with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(base_url, ConnectionConfig::default())
    }

    /// Open a connection with custom configuration
    pub fn with_config(base_url: impl Into<String>, config: ConnectionConfig) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| Error::Config(format!("Invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| Error::Config(format!("Invalid header value for {}: {}", name, e)))?;
            default_headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(default_headers);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        Ok(Self {
            base_url,
            session: Session::new(),
            client: builder.build()?,
            config,
        })
    }

    /// Resume an earlier session
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session.set(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current session token, if any
    pub fn session(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn set_session(&mut self, token: impl Into<String>) {
        self.session.set(token);
    }

    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    /// Get connection configuration
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Absolute URL for `path`: plain concatenation onto the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a GET request
    pub fn get(&mut self, path: &str) -> Result<DecodedBody> {
        let request = Request::get(self.url_for(path))?;
        self.execute(request)
    }

    /// Send a POST request whose body is `fields` as a JSON object.
    ///
    /// With no fields the request carries no body at all.
    pub fn post(&mut self, path: &str, fields: &Map<String, Value>) -> Result<DecodedBody> {
        let mut request = Request::post(self.url_for(path))?;
        if !fields.is_empty() {
            request = request.json(fields)?;
        }
        self.execute(request)
    }

    /// Send a PUT request with `content` as the body.
    ///
    /// Text is sent as UTF-8; no content type is set.
    pub fn put(&mut self, path: &str, content: impl Into<Payload>) -> Result<DecodedBody> {
        let request = Request::put(self.url_for(path))?.body(content.into().into_bytes());
        self.execute(request)
    }

    /// Send a POST request with a raw body and an explicit content type.
    ///
    /// A content type that is not valid header text is an error; nothing is
    /// sent.
    pub fn post_raw(
        &mut self,
        path: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<DecodedBody> {
        let request = Request::post(self.url_for(path))?
            .try_header(headers::CONTENT_TYPE, content_type)?
            .body(data);
        self.execute(request)
    }

    /// [`post_raw`](Self::post_raw) as `application/octet-stream`
    pub fn post_octets(&mut self, path: &str, data: impl Into<Bytes>) -> Result<DecodedBody> {
        self.post_raw(path, data, OCTET_STREAM)
    }

    /// Execute a request and decode the response.
    ///
    /// On success the session token is replaced if the response sets one.
    /// A non-success status becomes [`Error::Server`] and leaves the session
    /// untouched.
    pub fn execute(&mut self, request: Request) -> Result<DecodedBody> {
        let Request {
            method,
            url,
            headers: request_headers,
            body,
        } = request;

        tracing::debug!(
            method = %method,
            url = %url,
            with_session = self.session.is_active(),
            "Request"
        );

        let mut builder = self.client.request(method, url).headers(request_headers);

        if let Some(token) = self.session.token() {
            builder = builder.header(headers::COOKIE, token);
        }

        if let Some(body) = body {
            builder = builder.body(body);
        }

        // The response is consumed by `bytes()`, which releases the
        // connection on every path out of here.
        let response = builder.send()?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let raw = response.bytes()?;

        tracing::debug!(status = %status, bytes = raw.len(), "Response");

        if !status.is_success() {
            let body = decode(raw, &response_headers)?;
            return Err(Error::server(status.as_u16(), body));
        }

        if self.session.update_from(&response_headers) {
            tracing::debug!(cookie = ?self.session.cookie_name(), "Session token replaced");
        }

        let decoded = decode(raw, &response_headers)?;
        tracing::debug!(kind = ?decoded.kind(), "Decoded response");
        Ok(decoded)
    }
}
