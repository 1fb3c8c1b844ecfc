//! Templated outreach endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use contribaudit_core::errors::OutreachError;
use contribaudit_core::models::{DispatchFailure, IdentityAggregate};
use contribaudit_core::outreach::dispatch::{DispatchEngine, OutboundMessage};
use contribaudit_core::outreach::smtp::SmtpChannel;
use contribaudit_core::outreach::template;

use crate::api::status::AppError;
use crate::AppState;

/// Upper bound on failure details returned in one response.
const MAX_ERROR_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SendEmailsRequest {
    pub email_subject: String,
    pub email_template: String,
    /// Recipient rows as returned by the audit endpoint.
    pub recipients: Vec<IdentityAggregate>,
    #[serde(default)]
    pub repo_url: String,
}

#[derive(Serialize)]
struct SendEmailsResponse {
    sent: usize,
    failed: usize,
    total: usize,
    errors: Vec<DispatchFailure>,
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/send-emails", post(send_emails))
}

async fn send_emails(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendEmailsRequest>,
) -> Result<Json<SendEmailsResponse>, AppError> {
    if state.config.audit.redact {
        return Err(AppError::BadRequest(
            "outreach is disabled while redaction mode is active".into(),
        ));
    }

    let smtp = state
        .config
        .smtp
        .resolved()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if request.recipients.is_empty() {
        return Err(AppError::BadRequest("no recipients provided".into()));
    }

    // Render everything before the first send: an empty template must
    // abort before any side effect.
    let total = request.recipients.len();
    let mut messages = Vec::with_capacity(total);
    for recipient in &request.recipients {
        let rendered = template::render(
            &request.email_subject,
            &request.email_template,
            recipient,
            &request.repo_url,
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
        messages.push(OutboundMessage {
            recipient: recipient.email.clone().unwrap_or_default(),
            subject: rendered.subject,
            body: rendered.body,
        });
    }

    let channel = SmtpChannel::new(&smtp).map_err(|e| match e {
        OutreachError::ChannelAuth(msg) => AppError::BadGateway(msg),
        other => AppError::BadRequest(other.to_string()),
    })?;

    let summary = DispatchEngine::new(channel)
        .dispatch(messages)
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;

    let mut errors = summary.failures;
    errors.truncate(MAX_ERROR_ROWS);

    Ok(Json(SendEmailsResponse {
        sent: summary.sent_count,
        failed: summary.failed_count,
        total,
        errors,
    }))
}
