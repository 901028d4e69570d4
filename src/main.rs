// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! UGLIX CLI - one request per invocation
//!
//! The session token does not survive between invocations on its own: the
//! CLI prints a new token to stderr, and `UGLIX_SESSION` feeds it back in.

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use uglix::openssl::DEFAULT_CIPHER;
use uglix::{Connection, ConnectionConfig, DecodedBody, Error, Openssl};

const DEFAULT_BASE_URL: &str = "http://pac.fil.cool/uglix";

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uglix=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "get" | "post" | "put" | "post-raw" => run_request(&args[1], &args[2..]),
        "encrypt" | "decrypt" => run_cipher(&args[1], &args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("uglix {}", uglix::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(Error::Server { code, body }) => eprintln!("HTTP {}: {}", code, body),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"UGLIX - session-aware client for the UGLIX service

USAGE:
    uglix <COMMAND> [ARGS]

COMMANDS:
    get <path>                          GET a path
    post <path> [key=value ...]         POST fields as a JSON object
    put <path> <file|->                 PUT a file (or stdin) as the body
    post-raw <path> <file|-> [type]     POST raw bytes (default application/octet-stream)
    encrypt <passphrase> [cipher]       Encrypt stdin with openssl (default {cipher})
    decrypt <passphrase> [cipher]       Decrypt base64 stdin with openssl
    help                                Show this help message
    version                             Show version information

ENVIRONMENT:
    UGLIX_BASE_URL       Base URL (default {base})
    UGLIX_SESSION        Session token to resume
    UGLIX_TIMEOUT_SECS   Request timeout in seconds
    UGLIX_PROXY          Proxy URL
    RUST_LOG             Log filter (default uglix=warn)

Values in key=value are parsed as JSON when possible, else sent as strings:
    uglix post /bin/sendmail to=bob subject=hi content='"hello"'
"#,
        cipher = DEFAULT_CIPHER,
        base = DEFAULT_BASE_URL,
    );
}

fn run_request(command: &str, args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        bail!("Usage: uglix {} <path> ...", command);
    };

    let mut conn = connect()?;
    let before = conn.session().map(str::to_owned);

    let body = match command {
        "get" => conn.get(path)?,
        "post" => conn.post(path, &parse_fields(&args[1..])?)?,
        "put" => {
            let source = args.get(1).context("Usage: uglix put <path> <file|->")?;
            conn.put(path, read_input(source)?)?
        }
        _ => {
            let source = args
                .get(1)
                .context("Usage: uglix post-raw <path> <file|-> [content-type]")?;
            let content_type = args.get(2).map(String::as_str).unwrap_or(uglix::http::OCTET_STREAM);
            conn.post_raw(path, read_input(source)?, content_type)?
        }
    };

    if conn.session() != before.as_deref() {
        if let Some(token) = conn.session() {
            eprintln!("session: {}", token);
        }
    }

    print_body(&body)
}

fn run_cipher(command: &str, args: &[String]) -> anyhow::Result<()> {
    let Some(passphrase) = args.first() else {
        bail!("Usage: uglix {} <passphrase> [cipher]", command);
    };
    let cipher = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CIPHER);
    let input = read_input("-")?;
    let tool = Openssl::new();

    let mut stdout = io::stdout().lock();
    if command == "encrypt" {
        stdout.write_all(tool.encrypt(&input, passphrase, cipher)?.as_bytes())?;
    } else {
        stdout.write_all(&tool.decrypt(&input, passphrase, cipher)?)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Build the connection from the environment
fn connect() -> anyhow::Result<Connection> {
    let base_url = env::var("UGLIX_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let mut config = ConnectionConfig::new();
    if let Ok(secs) = env::var("UGLIX_TIMEOUT_SECS") {
        let secs: u64 = secs
            .parse()
            .with_context(|| format!("UGLIX_TIMEOUT_SECS is not a number: {}", secs))?;
        config = config.timeout(Duration::from_secs(secs));
    }
    if let Ok(proxy) = env::var("UGLIX_PROXY") {
        config = config.proxy(proxy);
    }

    let mut conn = Connection::with_config(base_url, config)?;
    if let Ok(token) = env::var("UGLIX_SESSION") {
        conn.set_session(token);
    }
    Ok(conn)
}

/// Parse `key=value` arguments into a JSON object
fn parse_fields(args: &[String]) -> anyhow::Result<Map<String, Value>> {
    let mut fields = Map::new();
    for arg in args {
        let Some((key, raw)) = arg.split_once('=') else {
            bail!("Expected key=value, got {:?}", arg);
        };
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(key.to_string(), value);
    }
    Ok(fields)
}

fn read_input(source: &str) -> anyhow::Result<Vec<u8>> {
    if source == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(source).with_context(|| format!("Failed to read {}", source))
    }
}

fn print_body(body: &DecodedBody) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match body {
        DecodedBody::Json(value) => writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?,
        DecodedBody::Text(text) => writeln!(stdout, "{}", text)?,
        DecodedBody::Binary(bytes) => stdout.write_all(bytes)?,
    }
    stdout.flush()?;
    Ok(())
}
