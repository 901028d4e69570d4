// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer for UGLIX
//!
//! A [`Connection`] sends one request at a time, round-trips the session
//! cookie, and decodes each response by its declared content type.

mod connection;
mod request;
mod response;
mod session;

pub use connection::Connection;
pub use request::{Payload, Request};
pub use response::{decode, ContentKind, DecodeError, DecodedBody};
pub use session::Session;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("uglix/", env!("CARGO_PKG_VERSION"));

/// Content type sent by [`Connection::post_octets`]
pub const OCTET_STREAM: &str = "application/octet-stream";

/// HTTP headers the client reads or writes
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
}
