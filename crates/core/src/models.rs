//! Shared data models for the audit and outreach pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Audit side
// ---------------------------------------------------------------------------

/// The author identity parsed from a single commit log entry.
///
/// Ephemeral: records are consumed by the aggregator and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub author_name: String,
    pub author_email: Option<String>,
}

/// Classification of a contributor email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailKind {
    /// Provider-issued noreply alias; carries no personal information.
    Noreply,
    /// Any other address; treated as personally sensitive.
    Identifying,
    /// The commits carried no email at all.
    Missing,
}

impl std::fmt::Display for EmailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Noreply => write!(f, "noreply"),
            Self::Identifying => write!(f, "identifying"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// Deduplicated per-contributor summary.
///
/// `email_kind` is a pure function of `email`: reclassification never
/// mutates the address itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityAggregate {
    /// Display name as first seen in the log.
    pub display_name: String,
    /// Leading token of the display name, surrounding punctuation stripped.
    pub first_name: String,
    /// The contributor's email. In privacy mode, identifying addresses are
    /// replaced by their digest before this value leaves the pipeline.
    pub email: Option<String>,
    pub email_kind: EmailKind,
    /// Number of scanned commits attributed to this contributor.
    pub commit_count: u64,
}

/// Result of a repository audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub repository_url: String,
    /// Commits actually consumed by the aggregator.
    pub scanned_commits: u64,
    /// Number of distinct aggregation keys.
    pub unique_authors: usize,
    /// Distinct identifying addresses, counted before any redaction.
    pub unique_identifying_emails: usize,
    /// True when identifying addresses were replaced by digests.
    pub redacted: bool,
    pub generated_at: DateTime<Utc>,
    /// One entry per contributor, in first-seen order.
    pub authors: Vec<IdentityAggregate>,
}

// ---------------------------------------------------------------------------
// Outreach side
// ---------------------------------------------------------------------------

/// Lifecycle of one outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Sent,
    Failed,
}

/// One queued message for a selected recipient.
///
/// Created at dispatch time; terminal state is `Sent` or `Failed` and a job
/// is never retried automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchJob {
    pub id: Uuid,
    pub recipient_email: String,
    pub rendered_subject: String,
    pub rendered_body: String,
    pub status: JobStatus,
    pub failure_reason: Option<String>,
}

/// One failed recipient in a dispatch summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub email: String,
    pub reason: String,
}

/// Outcome of a dispatch batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub sent_count: usize,
    pub failed_count: usize,
    pub failures: Vec<DispatchFailure>,
    /// Per-recipient outcomes, in submission order.
    pub jobs: Vec<DispatchJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EmailKind::Noreply).unwrap(),
            "\"noreply\""
        );
        assert_eq!(
            serde_json::to_string(&EmailKind::Identifying).unwrap(),
            "\"identifying\""
        );
        assert_eq!(
            serde_json::to_string(&EmailKind::Missing).unwrap(),
            "\"missing\""
        );
    }

    #[test]
    fn test_email_kind_display_matches_serde() {
        for kind in [EmailKind::Noreply, EmailKind::Identifying, EmailKind::Missing] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.to_string());
        }
    }

    #[test]
    fn test_aggregate_round_trips_through_json() {
        let agg = IdentityAggregate {
            display_name: "Alice Smith".into(),
            first_name: "Alice".into(),
            email: Some("alice@example.com".into()),
            email_kind: EmailKind::Identifying,
            commit_count: 7,
        };
        let json = serde_json::to_string(&agg).unwrap();
        let back: IdentityAggregate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.display_name, "Alice Smith");
        assert_eq!(back.commit_count, 7);
        assert_eq!(back.email_kind, EmailKind::Identifying);
    }
}
