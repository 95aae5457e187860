//! Response assembly over the transport call lifecycle.
//!
//! # Data Flow
//! ```text
//! Request
//!     → canonicalize request headers, record send time
//!     → transport.call(TransportCall)
//!     → Headers: merge headers, detect freshness, copy status
//!     → Chunk*:  accumulate bytes
//!     → End:     decode body, classify status, resolve
//!     → Error / Timeout / Abort: flag and resolve
//! ```
//!
//! # Design Decisions
//! - The response is fully formed before the first event fires
//! - First terminal event wins; the receiver is dropped afterwards, so
//!   later events from a racing transport are never observed
//! - The call always resolves with a best-effort response, never an error

use std::time::SystemTime;

use crate::envelope::{headers, Data, Message, Request, Response};
use crate::envelope::{decode, freshness, status};
use crate::transport::{HttpTransport, Transport, TransportCall, TransportEvent};

/// Issue one call through the given transport and assemble the uniform
/// response envelope. Infallible by contract: every failure mode surfaces
/// as fields on the resolved [`Response`].
pub async fn invoke(transport: &dyn Transport, request: Request) -> Response {
    let mut response = Response::new();
    let sent_at = SystemTime::now();

    let call = TransportCall {
        url: request.url.clone(),
        method: request.method.clone(),
        timeout_ms: request.timeout_ms(),
        headers: headers::canonicalize(&request.headers),
        body: request.body.as_ref().map(|value| value.to_string()),
    };

    tracing::debug!(method = %call.method, url = %call.url, "invoking transport");

    let mut events = transport.call(call);
    let mut body: Vec<u8> = Vec::new();

    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Headers {
                status: code,
                status_text,
                headers: raw,
            } => {
                response.meta.headers.extend(headers::canonicalize(&raw));
                freshness::detect(&mut response, sent_at);
                response.status = code;
                response.status_text = status_text;
            }
            TransportEvent::Chunk(chunk) => {
                body.extend_from_slice(&chunk);
            }
            TransportEvent::End => {
                response.data = Data::Text(String::from_utf8_lossy(&body).into_owned());
                decode::decode(&request.response_type, &mut response);
                status::classify(&mut response);
                tracing::debug!(
                    status = response.status,
                    error = response.meta.error,
                    "response assembled"
                );
                return response;
            }
            TransportEvent::Error(code) => {
                tracing::debug!(error = %code, "transport error");
                response.meta.error = true;
                response.meta.messages.push(Message::error(code));
                return response;
            }
            TransportEvent::Timeout => {
                tracing::debug!("transport timeout");
                response.meta.error = true;
                response.meta.timeout = true;
                return response;
            }
            TransportEvent::Abort => {
                tracing::debug!("transport abort");
                response.meta.error = true;
                return response;
            }
        }
    }

    // Channel closed without a terminal event: treat as a transport failure.
    response.meta.error = true;
    response
        .meta
        .messages
        .push(Message::error("transport closed without completing"));
    response
}

/// Convenience entry point using the built-in HTTP transport.
pub async fn send(request: Request) -> Response {
    invoke(&HttpTransport::new(), request).await
}
