//! Response body decoding, dispatched by declared response type.
//!
//! # Responsibilities
//! - Parse JSON bodies, stripping any anti-hijacking prefix first
//! - Interpret `arraybuffer` bodies as space-separated byte values
//! - Parse `document` bodies as markup
//! - Reject the unsupported `blob` type with a fixed diagnostic
//!
//! # Design Decisions
//! - JSON parse failure is non-fatal: the raw text stays in place and no
//!   error flag is touched
//! - All side effects land on the response object; decoding never panics
//!   and never propagates an error past this boundary

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::{Data, Response, ResponseType};

/// Anti-hijacking junk some JSON APIs prepend to block cross-site inclusion.
static XSSI_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\)\]\}',?\n").unwrap());

/// Status text reported when a `blob` decode is requested.
pub const BLOB_UNSUPPORTED: &str = "Type `Blob` is not supported by this adapter.";

/// Decode the accumulated text body in place according to the declared type.
pub fn decode(response_type: &ResponseType, response: &mut Response) {
    let Some(raw) = response.data.as_text().map(str::to_owned) else {
        return;
    };
    match response_type {
        ResponseType::Text | ResponseType::Json => {
            if let Some(value) = parse_json(&raw) {
                response.data = Data::Json(value);
            }
        }
        ResponseType::ArrayBuffer => {
            response.data = Data::Bytes(raw.split(' ').map(to_byte).collect());
        }
        ResponseType::Blob => {
            response.data = Data::Null;
            response.meta.error = true;
            response.status_text = BLOB_UNSUPPORTED.into();
        }
        ResponseType::Document => {
            let content_type = response
                .meta
                .header("content-type")
                .unwrap_or("text/html")
                .to_string();
            let document = Html::parse_document(&raw);
            response.data = Data::Document {
                content_type,
                html: document.root_element().html(),
            };
        }
        ResponseType::Other(_) => {}
    }
}

/// Strip the anti-hijacking prefix and attempt a JSON parse. `None` means
/// the body was not JSON; the caller leaves the raw text untouched.
fn parse_json(raw: &str) -> Option<serde_json::Value> {
    let stripped = XSSI_PREFIX.replace(raw, "");
    serde_json::from_str(&stripped).ok()
}

/// Space-separated token to byte, mirroring unsigned-8-bit coercion:
/// non-numeric tokens become 0, numeric values wrap modulo 256.
fn to_byte(token: &str) -> u8 {
    match token.parse::<f64>() {
        Ok(n) if n.is_finite() => (n.trunc() as i64).rem_euclid(256) as u8,
        _ => 0,
    }
}
