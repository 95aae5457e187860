//! Cache freshness detection from the response `Date` header.
//!
//! # Responsibilities
//! - Parse the response `Date` header as an HTTP calendar date
//! - Compare it against the request's send time at second granularity
//! - Flag the response as cached when it predates the send time
//!
//! # Design Decisions
//! - An unparsable or missing `Date` header is not an error; the flag stays
//!   at its default (false)
//! - Server `Date` headers carry only second precision, so both sides are
//!   truncated to whole seconds before comparing

use std::time::{SystemTime, UNIX_EPOCH};

use super::Response;

/// Set `meta.cached` when the response `Date` header, truncated to whole
/// seconds, is strictly earlier than the send time truncated the same way.
pub fn detect(response: &mut Response, sent_at: SystemTime) {
    let Some(raw) = response.meta.header("date") else {
        return;
    };
    let Ok(date) = httpdate::parse_http_date(raw) else {
        return;
    };
    response.meta.cached = epoch_seconds(date) < epoch_seconds(sent_at);
}

fn epoch_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
