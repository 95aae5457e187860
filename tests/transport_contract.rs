//! Pipeline tests against a scripted transport.

use http_envelope::{invoke, Data, RawHeaders, Request, ResponseType, TransportEvent};
use serde_json::json;

mod common;
use common::{ok_headers, ScriptedTransport};

fn raw(entries: &[(&str, serde_json::Value)]) -> RawHeaders {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn transport_headers_are_canonicalized_into_meta() {
    let transport = ScriptedTransport::new(vec![
        ok_headers(raw(&[
            ("set-cookie", json!(["a=1", "b=2"])),
            ("x-empty", json!([])),
            ("content-type", json!("text/plain")),
        ])),
        TransportEvent::End,
    ]);
    let response = invoke(&transport, Request::new("GET", "https://x.test/")).await;
    assert_eq!(response.meta.headers.get("set-cookie").unwrap(), "a=1, b=2");
    assert_eq!(response.meta.headers.get("content-type").unwrap(), "text/plain");
    assert!(!response.meta.headers.contains_key("x-empty"));
}

#[tokio::test]
async fn request_headers_are_canonicalized_for_the_transport() {
    let transport = ScriptedTransport::new(vec![ok_headers(RawHeaders::new()), TransportEvent::End]);
    let mut request = Request::new("GET", "https://x.test/");
    request.headers.insert("accept".into(), json!(["text/html", "text/plain"]));
    request.headers.insert("x-blank".into(), json!(""));
    invoke(&transport, request).await;

    let call = transport.seen_call().unwrap();
    assert_eq!(call.headers.get("accept").unwrap(), "text/html, text/plain");
    assert!(!call.headers.contains_key("x-blank"));
}

#[tokio::test]
async fn unbounded_timeout_reaches_the_transport_as_i32_max() {
    let transport = ScriptedTransport::new(vec![ok_headers(RawHeaders::new()), TransportEvent::End]);
    invoke(&transport, Request::new("GET", "https://x.test/")).await;
    assert_eq!(transport.seen_call().unwrap().timeout_ms, i32::MAX as u64);
}

#[tokio::test]
async fn body_is_serialized_to_json_text() {
    let transport = ScriptedTransport::new(vec![ok_headers(RawHeaders::new()), TransportEvent::End]);
    let mut request = Request::new("POST", "https://x.test/");
    request.body = Some(json!({"name": "value"}));
    invoke(&transport, request).await;
    assert_eq!(
        transport.seen_call().unwrap().body.as_deref(),
        Some(r#"{"name":"value"}"#)
    );
}

#[tokio::test]
async fn cached_is_set_from_an_earlier_date_header() {
    let served = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
    let transport = ScriptedTransport::new(vec![
        ok_headers(raw(&[("date", json!(httpdate::fmt_http_date(served)))])),
        TransportEvent::End,
    ]);
    let response = invoke(&transport, Request::new("GET", "https://x.test/")).await;
    assert!(response.meta.cached);
}

#[tokio::test]
async fn arraybuffer_body_becomes_bytes() {
    let transport = ScriptedTransport::new(vec![
        ok_headers(RawHeaders::new()),
        TransportEvent::Chunk(b"72 101 108 108 111".to_vec()),
        TransportEvent::End,
    ]);
    let mut request = Request::new("GET", "https://x.test/");
    request.response_type = ResponseType::ArrayBuffer;
    let response = invoke(&transport, request).await;
    assert_eq!(response.data, Data::Bytes(b"Hello".to_vec()));
}

#[tokio::test]
async fn blob_request_fails_decoding_but_not_the_call() {
    let transport = ScriptedTransport::new(vec![
        ok_headers(RawHeaders::new()),
        TransportEvent::Chunk(b"payload".to_vec()),
        TransportEvent::End,
    ]);
    let mut request = Request::new("GET", "https://x.test/");
    request.response_type = ResponseType::Blob;
    let response = invoke(&transport, request).await;
    assert!(response.data.is_null());
    assert!(response.meta.error);
    assert!(response.status_text.contains("Blob"));
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn document_body_is_parsed_as_markup() {
    let transport = ScriptedTransport::new(vec![
        ok_headers(raw(&[("content-type", json!("text/html"))])),
        TransportEvent::Chunk(b"<title>hi</title>".to_vec()),
        TransportEvent::End,
    ]);
    let mut request = Request::new("GET", "https://x.test/");
    request.response_type = ResponseType::Document;
    let response = invoke(&transport, request).await;
    match response.data {
        Data::Document { content_type, html } => {
            assert_eq!(content_type, "text/html");
            assert!(html.contains("<title>hi</title>"));
        }
        other => panic!("expected document, got {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_status_is_classified_as_error() {
    let transport = ScriptedTransport::new(vec![
        TransportEvent::Headers {
            status: 404,
            status_text: "Not Found".into(),
            headers: RawHeaders::new(),
        },
        TransportEvent::Chunk(b"missing".to_vec()),
        TransportEvent::End,
    ]);
    let response = invoke(&transport, Request::new("GET", "https://x.test/")).await;
    assert!(response.meta.error);
    assert_eq!(response.status, 404);
    assert_eq!(response.status_text, "Not Found");
    // Malformed JSON falls back to raw text without masking the status error.
    assert_eq!(response.data, Data::Text("missing".into()));
}

#[tokio::test]
async fn timeout_before_any_data_wins() {
    let transport = ScriptedTransport::new(vec![
        TransportEvent::Timeout,
        ok_headers(RawHeaders::new()),
        TransportEvent::End,
    ]);
    let response = invoke(&transport, Request::new("GET", "https://x.test/")).await;
    assert!(response.meta.timeout);
    assert!(response.meta.error);
    assert_eq!(response.status, 0);
    assert_eq!(response.status_text, "Unknown");
}
