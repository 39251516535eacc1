//! Integration tests for the HTTP generation client against a local
//! stub backend.
//!
//! A minimal HTTP/1.1 server on a loopback socket serves scripted
//! responses, which exercises the real wire path: request encoding,
//! response decoding, error mapping, and bounded retry.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use policy_forge::adapters::generation::{HttpClientConfig, HttpGenerationClient};
use policy_forge::domain::intent::{EnrichedIntent, IntentForm};
use policy_forge::domain::policy::{FieldKey, PolicyVariant};
use policy_forge::ports::{GenerationClient, GenerationFailure};

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Serves one scripted response per connection, in order.
async fn serve(listener: TcpListener, responses: Vec<String>) {
    for response in responses {
        let (mut socket, _) = listener.accept().await.expect("accept");
        read_full_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
    }
}

/// Reads headers plus the content-length body so the client is never
/// cut off mid-request.
async fn read_full_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("read");
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let line = line.to_ascii_lowercase();
                    line.strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().expect("content length"))
                })
                .unwrap_or(0);
            if buf.len() - (pos + 4) >= content_length {
                return;
            }
        }
    }
}

async fn start_backend(responses: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(serve(listener, responses));
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> HttpGenerationClient {
    HttpGenerationClient::new(
        HttpClientConfig::new(base_url)
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(2),
    )
}

fn intent_form() -> IntentForm {
    IntentForm::new("forum", "education", "cheating offers", "exam integrity", "strict", "")
        .unwrap()
}

#[tokio::test]
async fn submit_intent_decodes_enriched_response() {
    let base_url = start_backend(vec![http_response(
        "200 OK",
        r#"{"intent":"enriched text","requirements":["r1"]}"#,
    )])
    .await;

    let enriched = client_for(&base_url)
        .submit_intent(&intent_form())
        .await
        .unwrap();
    assert_eq!(enriched.intent, "enriched text");
    assert!(enriched.extra.contains_key("requirements"));
}

#[tokio::test]
async fn generate_initial_policy_decodes_machine_document() {
    let body = r#"{
        "machine": {
            "name": "Cheating Offers",
            "description": "Detects offers to complete exams for pay.",
            "violation_criteria": ["offers payment for exam taking"],
            "output_format": {"type": "classification", "labels": ["violation", "non-violation"], "confidence_required": true}
        }
    }"#;
    let base_url = start_backend(vec![http_response("200 OK", body)]).await;

    let document = client_for(&base_url)
        .generate_initial_policy(&EnrichedIntent::from_text("enriched"))
        .await
        .unwrap();

    assert_eq!(document.variant(), PolicyVariant::Machine);
    assert_eq!(document.name(), "Cheating Offers");
    assert_eq!(
        document
            .field(FieldKey::ViolationCriteria)
            .unwrap()
            .as_items()
            .unwrap()
            .len(),
        1
    );
    assert!(document.output_format().unwrap().confidence_required);
}

#[tokio::test]
async fn retryable_failure_is_retried_then_succeeds() {
    let base_url = start_backend(vec![
        http_response("503 Service Unavailable", r#"{"detail":"warming up"}"#),
        http_response("200 OK", r#"{"intent":"second try"}"#),
    ])
    .await;

    let enriched = client_for(&base_url)
        .submit_intent(&intent_form())
        .await
        .unwrap();
    assert_eq!(enriched.intent, "second try");
}

#[tokio::test]
async fn client_error_is_not_retried() {
    // Only one response scripted: a retry would hang on accept.
    let base_url = start_backend(vec![http_response(
        "400 Bad Request",
        r#"{"detail":"malformed intent"}"#,
    )])
    .await;

    let result = client_for(&base_url).submit_intent(&intent_form()).await;
    match result {
        Err(GenerationFailure::Backend { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "malformed intent");
        }
        other => panic!("expected backend failure, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn retries_are_bounded() {
    let unavailable = http_response("503 Service Unavailable", r#"{"detail":"down"}"#);
    // max_retries = 2 allows three attempts in total.
    let base_url =
        start_backend(vec![unavailable.clone(), unavailable.clone(), unavailable]).await;

    let result = client_for(&base_url).submit_intent(&intent_form()).await;
    assert!(matches!(
        result,
        Err(GenerationFailure::Backend { status: 503, .. })
    ));
}

#[tokio::test]
async fn malformed_success_body_is_invalid_response() {
    let base_url = start_backend(vec![http_response("200 OK", "not json at all")]).await;

    let result = client_for(&base_url).submit_intent(&intent_form()).await;
    assert!(matches!(result, Err(GenerationFailure::InvalidResponse(_))));
}
