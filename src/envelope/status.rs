//! Status-to-error classification.
//!
//! # Responsibilities
//! - Derive the final `meta.error` flag from the HTTP status code
//! - Preserve any error flag set by an earlier stage
//!
//! # Design Decisions
//! - Success is exactly the 2xx range; status 0 (call never completed) is
//!   always an error
//! - Runs once, after body decoding, as the final authority

use super::Response;

/// Fold the status code into `meta.error`. Never clears a true flag.
pub fn classify(response: &mut Response) {
    let success = (200..=299).contains(&response.status);
    response.meta.error = response.meta.error || !success;
}
