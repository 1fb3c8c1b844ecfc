//! Commit identity deduplication.
//!
//! A pure reduction over the commit record sequence: no I/O, no side
//! effects, first-seen ordering preserved for output.

use std::collections::HashMap;

use tracing::debug;

use crate::git::log::UNNAMED_AUTHOR;
use crate::identity::classifier;
use crate::models::{CommitRecord, IdentityAggregate};

/// Outcome of aggregating a commit record sequence.
#[derive(Debug)]
pub struct Aggregation {
    /// One entry per distinct contributor, in first-seen order.
    pub aggregates: Vec<IdentityAggregate>,
    /// Commit records consumed. Always equals the sum of the per-aggregate
    /// commit counts.
    pub scanned_commits: u64,
}

/// Fold a sequence of commit records into one aggregate per distinct
/// contributor.
///
/// Keying rule: the lowercase-trimmed email when present, otherwise the
/// exact display name. Two no-email contributors sharing a display name
/// merge into one aggregate; documented behavior, not a defect. The first
/// record seen for a key fixes the aggregate's display name.
pub fn aggregate<I>(records: I) -> Aggregation
where
    I: IntoIterator<Item = CommitRecord>,
{
    let mut aggregates: Vec<IdentityAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut scanned: u64 = 0;

    for record in records {
        scanned += 1;
        let key = match &record.author_email {
            Some(email) => email.trim().to_lowercase(),
            None => record.author_name.clone(),
        };
        match index.get(&key) {
            Some(&slot) => aggregates[slot].commit_count += 1,
            None => {
                let email = record.author_email.clone();
                let email_kind = classifier::classify(email.as_deref());
                aggregates.push(IdentityAggregate {
                    first_name: first_name(&record.author_name),
                    display_name: record.author_name,
                    email,
                    email_kind,
                    commit_count: 1,
                });
                index.insert(key, aggregates.len() - 1);
            }
        }
    }

    debug!(scanned, unique = aggregates.len(), "aggregated commit records");
    Aggregation {
        aggregates,
        scanned_commits: scanned,
    }
}

/// Derive a first name from a display name: the leading whitespace-
/// delimited token with surrounding punctuation stripped, falling back to
/// the full display name when no token survives.
pub fn first_name(display_name: &str) -> String {
    if display_name == UNNAMED_AUTHOR {
        return display_name.to_string();
    }
    let token = display_name
        .split_whitespace()
        .next()
        .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()))
        .unwrap_or("");
    if token.is_empty() {
        display_name.to_string()
    } else {
        token.to_string()
    }
}
