//! Uniform HTTP response envelope library.
//!
//! Normalizes an outbound HTTP call into a structured [`Response`] envelope
//! regardless of transport quirks: the call always resolves with status,
//! canonicalized headers, decoded data, and metadata flags (error, cached,
//! timeout, diagnostics) — it never fails outright.
//!
//! # Data Flow
//! ```text
//! Request
//!     → assembler (canonicalize request headers, record send time)
//!     → transport (one call, event sequence)
//!     → headers: canonicalize + freshness detection
//!     → body:    decode by declared type + status classification
//!     → Response envelope
//! ```

pub mod assembler;
pub mod envelope;
pub mod transport;

pub use assembler::{invoke, send};
pub use envelope::{
    Data, Message, Meta, RawHeaders, Request, Response, ResponseType, Severity,
};
pub use transport::{HttpTransport, Transport, TransportCall, TransportEvent};
