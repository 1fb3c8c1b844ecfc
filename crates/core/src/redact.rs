//! Privacy redaction for identifying addresses.
//!
//! In privacy mode the pipeline substitutes a one-way digest for every
//! identifying address before results leave the pipeline. Once the filter
//! has run, the raw address must not appear in any log line, response body,
//! or persisted artifact -- a hard invariant of the mode.

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::{EmailKind, IdentityAggregate};

/// Compute the digest standing in for a redacted address: lowercase hex
/// SHA-256 over the lowercase-trimmed email. Deterministic and unkeyed.
pub fn email_digest(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Replace every identifying address in `aggregates` with its digest.
///
/// Noreply and missing entries pass through untouched: noreply aliases
/// carry no personal information.
pub fn redact_aggregates(aggregates: &mut [IdentityAggregate]) {
    let mut redacted = 0usize;
    for agg in aggregates.iter_mut() {
        if agg.email_kind == EmailKind::Identifying {
            if let Some(email) = agg.email.take() {
                agg.email = Some(email_digest(&email));
                redacted += 1;
            }
        }
    }
    debug!(redacted, "redacted identifying addresses");
}
