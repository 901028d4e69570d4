// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # UGLIX - Session-Aware HTTP Client
//!
//! A small blocking client for the UGLIX text service, plus a shim over the
//! `openssl` command-line tool for the service's encryption exercises.
//!
//! ## Features
//!
//! - Session continuity: the server's `Set-Cookie` is replayed as `Cookie`
//! - JSON bodies for `post`, raw bytes for `put` and `post_raw`
//! - Responses decoded by content type: JSON, plain text, or raw bytes
//! - Server errors carry the status and the decoded error body
//! - Symmetric and RSA encryption through an external `openssl`
//!
//! ## Example
//!
//! ```rust,no_run
//! use serde_json::{json, Map, Value};
//! use uglix::{Connection, Error};
//!
//! fn main() -> Result<(), Error> {
//!     let mut conn = Connection::new("http://pac.fil.cool/uglix")?;
//!
//!     let mut fields = Map::new();
//!     fields.insert("user".into(), json!("alice"));
//!     fields.insert("password".into(), json!("secret"));
//!     conn.post("/bin/login", &fields)?;
//!
//!     match conn.get("/bin/foobar") {
//!         Err(Error::Server { code, body }) => println!("{}: {}", code, body),
//!         Ok(body) => println!("{}", body),
//!         Err(e) => return Err(e),
//!     }
//!
//!     let inbox = conn.get("/home/alice/INBOX")?;
//!     if let Some(Value::Array(messages)) = inbox.as_json() {
//!         println!("{} messages", messages.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod openssl;

// Re-exports for convenience

// Connection
pub use config::ConnectionConfig;
pub use http::{Connection, ContentKind, DecodeError, DecodedBody, Payload, Request, Session};

// Errors
pub use error::{Error, Result};

// Crypto shim
pub use openssl::Openssl;

/// UGLIX client version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
