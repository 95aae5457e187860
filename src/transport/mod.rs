//! Transport boundary: the event contract the assembler consumes.
//!
//! # Data Flow
//! ```text
//! TransportCall
//!     → transport implementation (client.rs, or a test double)
//!     → Headers { status, status_text, headers }
//!     → Chunk(bytes)*
//!     → End | Error | Timeout | Abort   (first terminal event wins)
//! ```
//!
//! # Design Decisions
//! - Events arrive over a tokio mpsc channel; the core depends only on the
//!   event contract, never on a concrete transport
//! - Headers are delivered before any chunk, chunks before any terminal event
//! - A closed channel with no terminal event counts as a transport failure

pub mod client;

use indexmap::IndexMap;
use tokio::sync::mpsc;

use crate::envelope::RawHeaders;

pub use client::HttpTransport;

/// Everything a transport needs to issue one call.
#[derive(Debug, Clone)]
pub struct TransportCall {
    /// Absolute URL.
    pub url: String,

    /// HTTP verb.
    pub method: String,

    /// Resolved timeout in milliseconds (never zero; unbounded requests
    /// carry the 32-bit signed maximum).
    pub timeout_ms: u64,

    /// Canonicalized outgoing headers.
    pub headers: IndexMap<String, String>,

    /// JSON-serialized request payload, if any.
    pub body: Option<String>,
}

/// One step in the transport call lifecycle.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Status line and raw response headers arrived.
    Headers {
        status: u16,
        status_text: String,
        headers: RawHeaders,
    },
    /// A piece of the response body.
    Chunk(Vec<u8>),
    /// Body complete (terminal).
    End,
    /// The call failed with the given description (terminal).
    Error(String),
    /// The transport-enforced timeout fired (terminal).
    Timeout,
    /// The call was aborted (terminal).
    Abort,
}

/// A transport collaborator: issues one call and delivers its event
/// sequence. Implementations must deliver headers before chunks and chunks
/// before a terminal event.
pub trait Transport: Send + Sync {
    fn call(&self, call: TransportCall) -> mpsc::Receiver<TransportEvent>;
}
