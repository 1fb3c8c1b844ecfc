//! Contributor email classification.
//!
//! A pure pattern match against the hosting provider's noreply-alias
//! format. No network lookups, ever.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::models::EmailKind;

/// GitHub's noreply aliases: `12345+login@users.noreply.github.com`
/// (current form) or the older `login@users.noreply.github.com`.
fn noreply_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:[0-9]+\+)?[a-z0-9](?:[a-z0-9-]*[a-z0-9])?@users\.noreply\.github\.com$",
        )
        .expect("noreply pattern is valid")
    })
}

/// Classify an aggregate's email field.
///
/// Never errors: an address that does not match the noreply pattern
/// classifies as [`EmailKind::Identifying`] even when malformed, treating
/// ambiguous input as sensitive.
pub fn classify(email: Option<&str>) -> EmailKind {
    match email.map(str::trim) {
        None => EmailKind::Missing,
        Some("") => EmailKind::Missing,
        Some(e) if noreply_pattern().is_match(e) => EmailKind::Noreply,
        Some(_) => EmailKind::Identifying,
    }
}
