//! Client tests against a scripted in-process HTTP responder.

#![allow(clippy::unwrap_used)]

use mailsmith_api::{Error, MailApiClient, RawMessage};
use mailsmith_mime::Message;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One captured HTTP request.
#[derive(Debug)]
struct Request {
    head: String,
    body: Vec<u8>,
}

impl Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

/// Answers exactly one request with the given status line and JSON body.
async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Request>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!(
        "http://{}/gmail/v1/users/me/messages/send",
        listener.local_addr().unwrap()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
        let content_length: usize = head
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse().unwrap())
            })
            .unwrap_or(0);
        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        Request {
            body: buf[head_end..head_end + content_length].to_vec(),
            head,
        }
    });

    (endpoint, handle)
}

fn message() -> Message {
    Message::new()
        .from("Me <me@example.com>")
        .to("you@example.com")
        .bcc("secret@example.com")
        .subject("Hello")
        .text_body("Hi there")
}

#[tokio::test]
async fn test_posts_raw_message_with_bearer_token() {
    let (endpoint, server) = respond_once(
        "200 OK",
        r#"{"id": "msg-1", "threadId": "thr-1", "labelIds": ["SENT"]}"#,
    )
    .await;
    let client = MailApiClient::new("token-123")
        .unwrap()
        .with_endpoint(&endpoint)
        .unwrap();

    let message = message();
    let sent = client.send(&message).await.unwrap();
    assert_eq!(sent.id, "msg-1");
    assert_eq!(sent.thread_id, "thr-1");
    assert_eq!(sent.label_ids, vec!["SENT"]);

    let request = server.await.unwrap();
    assert!(request.head.starts_with("POST /gmail/v1/users/me/messages/send HTTP/1.1\r\n"));
    assert_eq!(request.header("authorization"), Some("Bearer token-123"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let raw: RawMessage = serde_json::from_slice(&request.body).unwrap();
    assert!(raw.thread_id.is_none());
    let bytes = raw.to_bytes().unwrap();
    assert_eq!(bytes, message.to_bytes().unwrap());
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("From: \"Me\" <me@example.com>\r\nTo: <you@example.com>\r\n"));
    assert!(!text.contains("secret@example.com"));
}

#[tokio::test]
async fn test_google_error_becomes_api_error() {
    let (endpoint, server) = respond_once(
        "401 Unauthorized",
        r#"{"error": {"code": 401, "message": "Invalid Credentials", "status": "UNAUTHENTICATED"}}"#,
    )
    .await;
    let client = MailApiClient::new("expired")
        .unwrap()
        .with_endpoint(&endpoint)
        .unwrap();

    let err = client.send(&message()).await.unwrap_err();
    assert!(err.is_unauthorized());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "UNAUTHENTICATED: Invalid Credentials");
        }
        other => panic!("unexpected error: {other}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_as_text() {
    let (endpoint, server) = respond_once("503 Service Unavailable", "backend down").await;
    let client = MailApiClient::new("t").unwrap().with_endpoint(&endpoint).unwrap();

    let err = client.send(&message()).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, ref message } if message == "backend down"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_invalid_message_is_not_sent() {
    // Port 1 is never contacted because encoding fails first
    let client = MailApiClient::new("t")
        .unwrap()
        .with_endpoint("http://127.0.0.1:1/send")
        .unwrap();
    let err = client
        .send(&Message::new().to("a@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Encode(mailsmith_mime::Error::MissingSubject)
    ));
}
