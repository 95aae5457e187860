//! Shared test doubles for the transport event contract.

use std::sync::Mutex;

use http_envelope::{RawHeaders, Transport, TransportCall, TransportEvent};
use tokio::sync::mpsc;

/// Transport that replays a scripted event sequence and records the call
/// it was handed, so tests can assert on the outgoing `TransportCall`.
pub struct ScriptedTransport {
    events: Mutex<Vec<TransportEvent>>,
    seen: Mutex<Option<TransportCall>>,
}

impl ScriptedTransport {
    pub fn new(events: Vec<TransportEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            seen: Mutex::new(None),
        }
    }

    /// The call captured by the last `call` invocation.
    #[allow(dead_code)]
    pub fn seen_call(&self) -> Option<TransportCall> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn call(&self, call: TransportCall) -> mpsc::Receiver<TransportEvent> {
        *self.seen.lock().unwrap() = Some(call);
        let events = std::mem::take(&mut *self.events.lock().unwrap());
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for event in events {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        rx
    }
}

/// A plain 200 OK headers event with the given raw headers.
#[allow(dead_code)]
pub fn ok_headers(headers: RawHeaders) -> TransportEvent {
    TransportEvent::Headers {
        status: 200,
        status_text: "OK".into(),
        headers,
    }
}
