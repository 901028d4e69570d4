// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end tests for `Connection` against a mock UGLIX server

use serde_json::{json, Map, Value};
use uglix::{Connection, DecodedBody, Error};
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The client blocks, so it runs off the async runtime.
async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("Expected a JSON object"),
    }
}

fn reply(status: u16, body: &[u8], content_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_vec(), content_type)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_sends_json_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uglix/bin/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"user": "alice", "password": "secret"})))
        .respond_with(reply(200, b"Welcome, alice", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/uglix", server.uri());
    let body = blocking(move || {
        let mut conn = Connection::new(base)?;
        conn.post(
            "/bin/login",
            &fields(json!({"user": "alice", "password": "secret"})),
        )
    })
    .await
    .unwrap();

    assert_eq!(body, DecodedBody::Text("Welcome, alice".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_without_fields_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bin/echo"))
        .respond_with(reply(200, b"usage: echo [arguments]", "text/plain"))
        .mount(&server)
        .await;

    let base = server.uri();
    blocking(move || Connection::new(base)?.post("/bin/echo", &Map::new()))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bin/status"))
        .respond_with(reply(200, br#"{"ok": true}"#, "application/json"))
        .mount(&server)
        .await;

    let base = server.uri();
    let body = blocking(move || Connection::new(base)?.get("/bin/status"))
        .await
        .unwrap();

    assert_eq!(body.as_json(), Some(&json!({"ok": true})));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_passthrough() {
    let server = MockServer::start().await;
    let raw = vec![0x49u8, 0x4d, 0x50, 0x4d, 0xff, 0x00, 0x1a];
    Mock::given(method("GET"))
        .and(path("/home/alice/soundtrack_1.s3m"))
        .respond_with(reply(200, &raw, "application/octet-stream"))
        .mount(&server)
        .await;

    let base = server.uri();
    let body = blocking(move || Connection::new(base)?.get("/home/alice/soundtrack_1.s3m"))
        .await
        .unwrap();

    assert_eq!(body.as_bytes().map(|b| b.to_vec()), Some(raw));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bin/foobar"))
        .respond_with(reply(404, b"not found", "text/plain"))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = blocking(move || Connection::new(base)?.get("/bin/foobar"))
        .await
        .unwrap_err();

    match err {
        Error::Server { code, body } => {
            assert_eq!(code, 404);
            assert_eq!(body, DecodedBody::Text("not found".to_string()));
        }
        other => panic!("Expected server error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_structured_error_body_stays_structured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bin/sendmail"))
        .respond_with(reply(
            400,
            br#"{"error": "missing field", "field": "to"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = blocking(move || {
        Connection::new(base)?.post("/bin/sendmail", &fields(json!({"subject": "hi"})))
    })
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(
        err.server_body().and_then(|b| b.as_json()),
        Some(&json!({"error": "missing field", "field": "to"}))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_session_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bin/login"))
        .respond_with(
            reply(200, b"Welcome", "text/plain").insert_header("set-cookie", "sid=abc123; Path=/"),
        )
        .mount(&server)
        .await;
    // Only answers when the session cookie comes back
    Mock::given(method("GET"))
        .and(path("/home/alice/INBOX"))
        .and(header("cookie", "sid=abc123; Path=/"))
        .respond_with(reply(200, b"[]", "application/json"))
        .expect(2)
        .mount(&server)
        .await;

    let base = server.uri();
    let session = blocking(move || -> uglix::Result<Option<String>> {
        let mut conn = Connection::new(base)?;
        assert_eq!(conn.session(), None);

        conn.post("/bin/login", &fields(json!({"user": "alice"})))?;
        assert_eq!(conn.session(), Some("sid=abc123; Path=/"));

        // No Set-Cookie on these: the token is kept and sent again
        conn.get("/home/alice/INBOX")?;
        conn.get("/home/alice/INBOX")?;
        Ok(conn.session().map(str::to_owned))
    })
    .await
    .unwrap();

    assert_eq!(session.as_deref(), Some("sid=abc123; Path=/"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_set_cookie_replaces_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bin/login/CHAP"))
        .and(header("cookie", "sid=old"))
        .respond_with(
            reply(200, br#"{"challenge": "f00"}"#, "application/json")
                .insert_header("set-cookie", "sid=new"),
        )
        .mount(&server)
        .await;

    let base = server.uri();
    let session = blocking(move || -> uglix::Result<Option<String>> {
        let mut conn = Connection::new(base)?.with_session("sid=old");
        conn.get("/bin/login/CHAP")?;
        Ok(conn.session().map(str::to_owned))
    })
    .await
    .unwrap();

    assert_eq!(session.as_deref(), Some("sid=new"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_response_does_not_update_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bin/crypto_helpdesk"))
        .respond_with(
            reply(403, b"access denied", "text/plain").insert_header("set-cookie", "sid=other"),
        )
        .mount(&server)
        .await;

    let base = server.uri();
    let (err, session) = blocking(move || {
        let mut conn = Connection::new(base).unwrap().with_session("sid=mine");
        let err = conn.get("/bin/crypto_helpdesk").unwrap_err();
        (err, conn.session().map(str::to_owned))
    })
    .await;

    assert_eq!(err.status_code(), Some(403));
    assert_eq!(session.as_deref(), Some("sid=mine"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_put_text_and_bytes_send_same_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/home/alice/.pk.email.openssl"))
        .and(body_bytes(b"hello".to_vec()))
        .respond_with(reply(200, b"ok", "text/plain"))
        .expect(2)
        .mount(&server)
        .await;

    let base = server.uri();
    blocking(move || -> uglix::Result<()> {
        let mut conn = Connection::new(base)?;
        conn.put("/home/alice/.pk.email.openssl", "hello")?;
        conn.put("/home/alice/.pk.email.openssl", b"hello".to_vec())?;
        Ok(())
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_raw_sets_content_type() {
    let server = MockServer::start().await;
    let payload = vec![0x00u8, 0x01, 0xfe, 0xff];
    Mock::given(method("POST"))
        .and(path("/bin/upload"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_bytes(payload.clone()))
        .respond_with(reply(200, b"stored", "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bin/upload/pem"))
        .and(header("content-type", "application/x-pem-file"))
        .respond_with(reply(200, b"stored pem", "text/plain"))
        .mount(&server)
        .await;

    let base = server.uri();
    let (octets, pem) = blocking(move || -> uglix::Result<(DecodedBody, DecodedBody)> {
        let mut conn = Connection::new(base)?;
        let octets = conn.post_octets("/bin/upload", payload)?;
        let pem = conn.post_raw("/bin/upload/pem", "-----BEGIN PUBLIC KEY-----", "application/x-pem-file")?;
        Ok((octets, pem))
    })
    .await
    .unwrap();

    assert_eq!(octets.as_text(), Some("stored"));
    assert_eq!(pem.as_text(), Some("stored pem"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bin/broken"))
        .respond_with(reply(200, b"{oops", "application/json"))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = blocking(move || Connection::new(base)?.get("/bin/broken"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_error_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bin/crash"))
        .respond_with(reply(500, b"{oops", "application/json"))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = blocking(move || Connection::new(base)?.get("/bin/crash"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_first_of_several_set_cookies_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bin/login"))
        .respond_with(
            reply(200, b"Welcome", "text/plain")
                .append_header("set-cookie", "sid=first")
                .append_header("set-cookie", "tracking=second"),
        )
        .mount(&server)
        .await;

    let base = server.uri();
    let session = blocking(move || -> uglix::Result<Option<String>> {
        let mut conn = Connection::new(base)?;
        conn.post("/bin/login", &Map::new())?;
        Ok(conn.session().map(str::to_owned))
    })
    .await
    .unwrap();

    assert_eq!(session.as_deref(), Some("sid=first"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_set_cookie_sends_no_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bin/echo"))
        .respond_with(reply(200, b"hi", "text/plain").insert_header("set-cookie", ""))
        .expect(2)
        .mount(&server)
        .await;

    let base = server.uri();
    let session = blocking(move || -> uglix::Result<Option<String>> {
        let mut conn = Connection::new(base)?;
        conn.get("/bin/echo")?;
        conn.get("/bin/echo")?;
        Ok(conn.session().map(str::to_owned))
    })
    .await
    .unwrap();

    assert_eq!(session, None);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(!requests[1].headers.keys().any(|k| k.as_str() == "cookie"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_raw_invalid_content_type_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply(200, b"stored", "text/plain"))
        .expect(0)
        .mount(&server)
        .await;

    let base = server.uri();
    let err = blocking(move || {
        Connection::new(base)?.post_raw("/bin/upload", b"x".to_vec(), "text/plain\r\nX-Evil: 1")
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::InvalidHeader { .. }));
}
