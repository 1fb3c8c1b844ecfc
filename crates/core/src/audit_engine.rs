//! Repository audit orchestration.
//!
//! The [`AuditEngine`] runs one audit request to completion:
//!
//! 1. Clone a bare, blob-less copy of the repository into a request-scoped
//!    temporary directory.
//! 2. Read the commit log up to the requested ceiling.
//! 3. Aggregate commit records into per-contributor identities.
//! 4. Classify each contributor's email.
//! 5. In privacy mode, redact identifying addresses before the report
//!    leaves the pipeline.
//!
//! The temporary copy is removed on every exit path -- success, failure,
//! and cancellation (dropping the future kills the git subprocess and the
//! scratch directory with it). Concurrent audits share no mutable state.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, instrument};

use crate::errors::{AuditError, GitError};
use crate::git::client::GitCliClient;
use crate::git::log::decode_log;
use crate::identity::aggregator::{aggregate, Aggregation};
use crate::models::{AuditReport, EmailKind};
use crate::redact::redact_aggregates;

/// One audit request.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Any git-reachable repository reference. Public entry points
    /// normalize user input to a canonical GitHub URL first; tests and
    /// embedders may pass local paths.
    pub repository: String,

    /// Upper bound on commits to inspect. Zero yields an empty report.
    pub commit_ceiling: u64,

    /// Privacy mode: insert the redaction filter before results leave the
    /// pipeline.
    pub redact: bool,
}

/// The audit engine. Stateless between requests; cheap to share.
#[derive(Debug, Clone, Default)]
pub struct AuditEngine {
    git: GitCliClient,
}

impl AuditEngine {
    pub fn new() -> Self {
        Self {
            git: GitCliClient::new(),
        }
    }

    /// Run one audit to completion and build the report.
    #[instrument(skip(self), fields(repo = %request.repository, ceiling = request.commit_ceiling))]
    pub async fn audit(&self, request: &AuditRequest) -> Result<AuditReport, AuditError> {
        let scratch = tempfile::Builder::new()
            .prefix("contribaudit-")
            .tempdir()
            .map_err(GitError::IoError)?;
        let clone_dir = scratch.path().join("repo.git");

        self.git.clone_bare(&request.repository, &clone_dir).await?;
        let raw = self
            .git
            .log_authors(&clone_dir, request.commit_ceiling)
            .await?;
        let records = decode_log(&raw)?;

        let Aggregation {
            mut aggregates,
            scanned_commits,
        } = aggregate(records);

        // Counted before redaction; the count itself carries no addresses.
        let unique_identifying_emails = aggregates
            .iter()
            .filter(|a| a.email_kind == EmailKind::Identifying)
            .filter_map(|a| a.email.as_deref())
            .map(|e| e.trim().to_lowercase())
            .collect::<HashSet<_>>()
            .len();

        if request.redact {
            redact_aggregates(&mut aggregates);
        }

        let report = AuditReport {
            repository_url: request.repository.clone(),
            scanned_commits,
            unique_authors: aggregates.len(),
            unique_identifying_emails,
            redacted: request.redact,
            generated_at: Utc::now(),
            authors: aggregates,
        };
        info!(
            scanned = report.scanned_commits,
            authors = report.unique_authors,
            "audit complete"
        );
        Ok(report)
    }
}
