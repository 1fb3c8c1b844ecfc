//! Repository audit endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use contribaudit_core::audit_engine::AuditRequest;
use contribaudit_core::config::MAX_COMMIT_CEILING;
use contribaudit_core::git::repo_url::normalize_repo_url;
use contribaudit_core::models::AuditReport;

use crate::api::status::AppError;
use crate::AppState;

/// Upper bound on author rows returned in one response.
const MAX_AUTHOR_ROWS: usize = 500;

// ---------------------------------------------------------------------------
// Request type
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct AuditApiRequest {
    /// Repository URL as pasted by the user.
    pub repo: String,

    /// Commit ceiling; falls back to the configured default.
    pub max_commits: Option<u64>,

    /// Request privacy mode for this audit. Ignored (always on) when the
    /// server itself is configured for redaction.
    #[serde(default)]
    pub redact: bool,
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/audit", post(run_audit))
}

async fn run_audit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuditApiRequest>,
) -> Result<Json<AuditReport>, AppError> {
    let repo_url = normalize_repo_url(&request.repo).ok_or_else(|| {
        AppError::BadRequest(
            "invalid GitHub repo URL (expected https://github.com/OWNER/REPO)".into(),
        )
    })?;

    let ceiling = request
        .max_commits
        .unwrap_or(state.config.audit.default_max_commits);
    if ceiling == 0 || ceiling > MAX_COMMIT_CEILING {
        return Err(AppError::BadRequest(format!(
            "max_commits must be between 1 and {}",
            MAX_COMMIT_CEILING
        )));
    }

    // The server-wide privacy flag always wins; a request can only opt in.
    let redact = state.config.audit.redact || request.redact;

    let audit_request = AuditRequest {
        repository: repo_url,
        commit_ceiling: ceiling,
        redact,
    };

    let mut report = state
        .audit_engine
        .audit(&audit_request)
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;

    report.authors.truncate(MAX_AUTHOR_ROWS);
    Ok(Json(report))
}
