// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Thin shim over the `openssl` command-line tool
//!
//! Each operation spawns the tool, pipes its input on stdin and collects
//! stdout. Anything written to stderr is treated as a failure and surfaced
//! as [`Error::Openssl`] with the tool's own diagnostic text.
//!
//! Ciphertext always crosses this API as base64 text and plaintext as raw
//! bytes, for both the symmetric and the RSA operations.
//!
//! ```rust,no_run
//! use uglix::openssl::{Openssl, DEFAULT_CIPHER};
//!
//! let tool = Openssl::new();
//! let sealed = tool.encrypt("texte avec caractères accentués", "foobar", DEFAULT_CIPHER)?;
//! let opened = tool.decrypt(&sealed, "foobar", DEFAULT_CIPHER)?;
//! assert_eq!(opened, "texte avec caractères accentués".as_bytes());
//! # Ok::<(), uglix::Error>(())
//! ```

use std::ffi::OsStr;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Error, Result};

/// Symmetric cipher used when the caller has no preference
pub const DEFAULT_CIPHER: &str = "aes-128-cbc";

/// Handle on an `openssl` executable
#[derive(Debug, Clone)]
pub struct Openssl {
    program: PathBuf,
}

impl Default for Openssl {
    fn default() -> Self {
        Self {
            program: PathBuf::from("openssl"),
        }
    }
}

impl Openssl {
    /// Use `openssl` from `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Encrypt with a passphrase-derived symmetric key; returns base64 text
    pub fn encrypt(
        &self,
        plaintext: impl AsRef<[u8]>,
        passphrase: &str,
        cipher: &str,
    ) -> Result<String> {
        let cipher_arg = format!("-{}", cipher);
        let pass_arg = format!("pass:{}", passphrase);
        let out = self.run(
            &[
                OsStr::new("enc"),
                OsStr::new(&cipher_arg),
                OsStr::new("-base64"),
                OsStr::new("-pass"),
                OsStr::new(&pass_arg),
            ],
            plaintext.as_ref(),
        )?;
        String::from_utf8(out)
            .map_err(|e| Error::openssl("enc", format!("output is not UTF-8: {}", e)))
    }

    /// Decrypt base64 ciphertext produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(
        &self,
        ciphertext: impl AsRef<[u8]>,
        passphrase: &str,
        cipher: &str,
    ) -> Result<Vec<u8>> {
        // The base64 reader rejects a final line without its newline.
        let mut input = ciphertext.as_ref().to_vec();
        if input.last() != Some(&b'\n') {
            input.push(b'\n');
        }

        let cipher_arg = format!("-{}", cipher);
        let pass_arg = format!("pass:{}", passphrase);
        self.run(
            &[
                OsStr::new("enc"),
                OsStr::new("-d"),
                OsStr::new(&cipher_arg),
                OsStr::new("-base64"),
                OsStr::new("-pass"),
                OsStr::new(&pass_arg),
            ],
            &input,
        )
    }

    /// Encrypt for the holder of the private key matching `public_key`
    /// (a PEM file); returns base64 text
    pub fn encrypt_rsa(
        &self,
        plaintext: impl AsRef<[u8]>,
        public_key: impl AsRef<Path>,
    ) -> Result<String> {
        let out = self.run(
            &[
                OsStr::new("pkeyutl"),
                OsStr::new("-encrypt"),
                OsStr::new("-pubin"),
                OsStr::new("-inkey"),
                public_key.as_ref().as_os_str(),
            ],
            plaintext.as_ref(),
        )?;
        Ok(STANDARD.encode(out))
    }

    /// Decrypt base64 ciphertext with the private key in `private_key`
    pub fn decrypt_rsa(&self, ciphertext: &str, private_key: impl AsRef<Path>) -> Result<Vec<u8>> {
        let compact: String = ciphertext.split_whitespace().collect();
        let raw = STANDARD
            .decode(compact)
            .map_err(|e| Error::openssl("pkeyutl", format!("ciphertext is not base64: {}", e)))?;

        self.run(
            &[
                OsStr::new("pkeyutl"),
                OsStr::new("-decrypt"),
                OsStr::new("-inkey"),
                private_key.as_ref().as_os_str(),
            ],
            &raw,
        )
    }

    /// SHA-256 signature of `message` with `private_key`; returns base64 text
    pub fn sign(&self, message: impl AsRef<[u8]>, private_key: impl AsRef<Path>) -> Result<String> {
        let out = self.run(
            &[
                OsStr::new("dgst"),
                OsStr::new("-sha256"),
                OsStr::new("-sign"),
                private_key.as_ref().as_os_str(),
            ],
            message.as_ref(),
        )?;
        Ok(STANDARD.encode(out))
    }

    /// Run the tool with `args`, feeding `input` on stdin
    fn run(&self, args: &[&OsStr], input: &[u8]) -> Result<Vec<u8>> {
        let command = args
            .first()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::openssl(command.as_str(), "stdin is not piped"))?;

        // Feed stdin from its own thread so a full stdout pipe cannot stall us.
        let (written, output) = thread::scope(|s| {
            let writer = s.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = output?;

        match written {
            Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
            Err(_) => return Err(Error::openssl(command.as_str(), "stdin writer panicked")),
            _ => {}
        }

        tracing::debug!(
            command = %command,
            status = %output.status,
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "openssl finished"
        );

        let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !diagnostic.is_empty() {
            return Err(Error::openssl(command, diagnostic));
        }
        if !output.status.success() {
            return Err(Error::openssl(
                command,
                format!("exited with {}", output.status),
            ));
        }

        Ok(output.stdout)
    }
}
