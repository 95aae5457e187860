//! Request and response envelope types.
//!
//! # Responsibilities
//! - Define the caller-facing `Request` descriptor
//! - Define the uniform `Response` envelope and its metadata
//! - Provide safe defaults so no caller ever sees a partially-built response
//!
//! # Design Decisions
//! - `Response` is built with defaults before any transport event fires
//! - `meta.error` is monotonic: once true it is never cleared
//! - Header maps preserve insertion order (IndexMap)

pub mod decode;
pub mod freshness;
pub mod headers;
pub mod status;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw header map as supplied by callers or reported by transports.
///
/// Values may be a single string, an array of strings, or arbitrary JSON
/// junk; canonicalization flattens one level and keeps only the strings.
pub type RawHeaders = IndexMap<String, serde_json::Value>;

/// Timeout passed to the transport when the request declares none (or zero):
/// effectively unbounded, capped at the largest 32-bit signed value.
pub const UNBOUNDED_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Declared response type controlling body decoding.
///
/// Parsing from a string is case-insensitive; unrecognized values are kept
/// verbatim and leave the raw text body unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseType {
    /// Empty declaration. Decodes like `Json`.
    #[default]
    Text,
    /// Parse the body as JSON, stripping any anti-hijacking prefix first.
    Json,
    /// Interpret the body as space-separated byte values.
    ArrayBuffer,
    /// Unsupported in this adapter; decoding fails with a fixed diagnostic.
    Blob,
    /// Parse the body as a markup document.
    Document,
    /// Anything else: raw text passes through unchanged.
    Other(String),
}

impl From<String> for ResponseType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "" => ResponseType::Text,
            "json" => ResponseType::Json,
            "arraybuffer" => ResponseType::ArrayBuffer,
            "blob" => ResponseType::Blob,
            "document" => ResponseType::Document,
            _ => ResponseType::Other(value),
        }
    }
}

impl From<ResponseType> for String {
    fn from(value: ResponseType) -> Self {
        match value {
            ResponseType::Text => String::new(),
            ResponseType::Json => "json".into(),
            ResponseType::ArrayBuffer => "arraybuffer".into(),
            ResponseType::Blob => "blob".into(),
            ResponseType::Document => "document".into(),
            ResponseType::Other(s) => s,
        }
    }
}

/// Caller-owned request descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Request {
    /// Absolute URL to call.
    pub url: String,

    /// HTTP verb.
    pub method: String,

    /// Outgoing headers; values may be scalars or arrays.
    pub headers: RawHeaders,

    /// Optional structured payload, serialized to JSON text when present.
    pub body: Option<serde_json::Value>,

    /// Timeout in milliseconds. Absent or zero means effectively unbounded.
    pub timeout: Option<u64>,

    /// Declared response type controlling body decoding.
    pub response_type: ResponseType,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: "GET".into(),
            headers: RawHeaders::new(),
            body: None,
            timeout: None,
            response_type: ResponseType::default(),
        }
    }
}

impl Request {
    /// Create a request for the given verb and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Timeout to hand to the transport, with absent/zero mapped to
    /// [`UNBOUNDED_TIMEOUT_MS`].
    pub fn timeout_ms(&self) -> u64 {
        match self.timeout {
            Some(ms) if ms > 0 => ms,
            _ => UNBOUNDED_TIMEOUT_MS,
        }
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Data {
    /// No body, or a fatal decode failure.
    Null,
    /// Raw (or undecodable) text.
    Text(String),
    /// Parsed JSON value.
    Json(serde_json::Value),
    /// Binary payload produced by the `arraybuffer` decoding.
    Bytes(Vec<u8>),
    /// Parsed markup document, stored as its normalized serialization.
    Document {
        content_type: String,
        html: String,
    },
}

impl Default for Data {
    fn default() -> Self {
        Data::Null
    }
}

impl Data {
    /// The raw text, if this is (still) a text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Data::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Data::Null)
    }
}

/// Severity attached to diagnostic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// A diagnostic record attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Short description of what happened (e.g. the transport error text).
    pub code: String,

    /// Arbitrary supporting values; usually empty.
    pub data: Vec<serde_json::Value>,

    /// How severe the condition was.
    pub severity: Severity,
}

impl Message {
    /// An `ERROR`-severity message with no supporting data.
    pub fn error(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            data: Vec::new(),
            severity: Severity::Error,
        }
    }
}

/// Response metadata flags and canonicalized headers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Meta {
    /// Canonicalized response headers (name -> comma-joined string).
    pub headers: IndexMap<String, String>,

    /// True if the transport failed, the status was non-2xx, or decoding
    /// forced it. Monotonic: never reset once true.
    pub error: bool,

    /// True when the response was served from an intermediary cache.
    pub cached: bool,

    /// True when the transport reported a timeout.
    pub timeout: bool,

    /// Diagnostic records, best-effort; may be empty.
    pub messages: Vec<Message>,
}

impl Meta {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The uniform response envelope. Produced exactly once per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// HTTP status code; 0 if the call never completed.
    pub status: u16,

    /// Human-readable status string.
    pub status_text: String,

    /// Decoded body.
    pub data: Data,

    /// Metadata flags and headers.
    pub meta: Meta,
}

impl Response {
    /// The safe pre-transport shape: status 0, `"Unknown"`, null data, all
    /// flags false.
    pub fn new() -> Self {
        Self {
            status: 0,
            status_text: "Unknown".into(),
            data: Data::Null,
            meta: Meta::default(),
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
