//! reqwest-backed transport implementation.
//!
//! # Responsibilities
//! - Issue the HTTP call described by a `TransportCall`
//! - Forward status, headers, and body chunks as transport events
//! - Map client failures onto the Timeout / Abort / Error terminals
//!
//! # Design Decisions
//! - The call runs on a spawned task; the caller only sees the event channel
//! - The per-request timeout comes from the resolved `timeout_ms`
//! - A dropped receiver silently ends the call (the caller already resolved)

use std::io;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;

use crate::envelope::RawHeaders;

use super::{Transport, TransportCall, TransportEvent};

/// How the underlying client call went wrong, mapped onto the three failure
/// terminals of the event contract.
#[derive(Debug, Error)]
enum CallFailure {
    #[error("request timed out")]
    Timeout,
    #[error("request aborted")]
    Abort,
    #[error("{0}")]
    Other(String),
}

impl From<CallFailure> for TransportEvent {
    fn from(failure: CallFailure) -> Self {
        match failure {
            CallFailure::Timeout => TransportEvent::Timeout,
            CallFailure::Abort => TransportEvent::Abort,
            CallFailure::Other(message) => TransportEvent::Error(message),
        }
    }
}

/// Transport that performs real HTTP(S) calls with a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn call(&self, call: TransportCall) -> mpsc::Receiver<TransportEvent> {
        let (tx, rx) = mpsc::channel(16);
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(failure) = perform(client, call, &tx).await {
                let _ = tx.send(failure.into()).await;
            }
        });
        rx
    }
}

/// Drive one call, forwarding events. Send failures mean the receiver is
/// gone, which ends the call without further work.
async fn perform(
    client: reqwest::Client,
    call: TransportCall,
    tx: &mpsc::Sender<TransportEvent>,
) -> Result<(), CallFailure> {
    let url = Url::parse(&call.url).map_err(|e| CallFailure::Other(e.to_string()))?;
    let method = reqwest::Method::from_bytes(call.method.as_bytes())
        .map_err(|e| CallFailure::Other(e.to_string()))?;

    tracing::debug!(method = %method, url = %url, timeout_ms = call.timeout_ms, "issuing request");

    let mut builder = client
        .request(method, url)
        .timeout(Duration::from_millis(call.timeout_ms));
    for (name, value) in &call.headers {
        builder = builder.header(name, value);
    }
    if let Some(body) = call.body {
        builder = builder.body(body);
    }

    let response = builder.send().await.map_err(classify)?;

    let status = response.status();
    let headers = raw_headers(response.headers());
    let event = TransportEvent::Headers {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        headers,
    };
    if tx.send(event).await.is_err() {
        return Ok(());
    }

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(classify)?;
        if tx.send(TransportEvent::Chunk(bytes.to_vec())).await.is_err() {
            return Ok(());
        }
    }

    let _ = tx.send(TransportEvent::End).await;
    tracing::debug!(status = status.as_u16(), "request complete");
    Ok(())
}

/// Rebuild the raw header map with multi-value headers as arrays, so the
/// canonicalizer sees the same shape a caller-supplied map would have.
fn raw_headers(headers: &reqwest::header::HeaderMap) -> RawHeaders {
    let mut raw = RawHeaders::new();
    for name in headers.keys() {
        let values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let value = match values.len() {
            1 => values.into_iter().next().unwrap_or(Value::Null),
            _ => Value::Array(values),
        };
        raw.insert(name.as_str().to_string(), value);
    }
    raw
}

fn classify(error: reqwest::Error) -> CallFailure {
    if error.is_timeout() {
        return CallFailure::Timeout;
    }
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&error);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionAborted {
                return CallFailure::Abort;
            }
        }
        source = err.source();
    }
    CallFailure::Other(error.to_string())
}
