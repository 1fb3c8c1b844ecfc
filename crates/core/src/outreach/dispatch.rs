//! Sequential message dispatch over a caller-supplied mail channel.
//!
//! The engine drains an explicit FIFO job queue with a single worker, so
//! the strict submission order and the partial-failure isolation are
//! structural rather than implicit in control flow. There is no retry or
//! backoff anywhere; a failed send is reported, never re-attempted.

use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::OutreachError;
use crate::models::{DispatchFailure, DispatchJob, DispatchSummary, JobStatus};

/// A fully rendered message ready for submission.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Abstraction over the mail submission channel.
///
/// Implementations own the transport concerns (sockets, TLS, credentials);
/// the dispatch engine only decides what is sent and in what order.
#[async_trait]
pub trait MailChannel: Send + Sync {
    /// Verify the channel is usable. Called exactly once, before any
    /// submission is attempted.
    async fn establish(&self) -> Result<(), OutreachError>;

    /// Submit a single message.
    async fn submit(&self, message: &OutboundMessage) -> Result<(), OutreachError>;
}

/// Sequential dispatch engine: one worker, one queue, list order.
pub struct DispatchEngine<C: MailChannel> {
    channel: C,
}

impl<C: MailChannel> DispatchEngine<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Submit `messages` strictly one at a time, in the given order.
    ///
    /// Fails up front with [`OutreachError::ChannelAuth`] when the channel
    /// cannot be established -- no message is attempted. Once the first
    /// submission has been attempted the call always completes with a
    /// summary: per-recipient failures are recorded on their jobs and
    /// never abort the remainder of the batch.
    pub async fn dispatch(
        &self,
        messages: Vec<OutboundMessage>,
    ) -> Result<DispatchSummary, OutreachError> {
        self.channel.establish().await?;

        let mut queue: VecDeque<DispatchJob> = messages
            .into_iter()
            .map(|m| DispatchJob {
                id: Uuid::new_v4(),
                recipient_email: m.recipient,
                rendered_subject: m.subject,
                rendered_body: m.body,
                status: JobStatus::Pending,
                failure_reason: None,
            })
            .collect();

        let mut sent_count = 0usize;
        let mut failed_count = 0usize;
        let mut failures: Vec<DispatchFailure> = Vec::new();
        let mut jobs: Vec<DispatchJob> = Vec::with_capacity(queue.len());

        while let Some(mut job) = queue.pop_front() {
            let outcome = self.attempt(&job).await;
            match outcome {
                Ok(()) => {
                    job.status = JobStatus::Sent;
                    sent_count += 1;
                    info!(job = %job.id, to = %job.recipient_email, "message sent");
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(job = %job.id, to = %job.recipient_email, error = %reason, "message failed");
                    failures.push(DispatchFailure {
                        email: job.recipient_email.clone(),
                        reason: reason.clone(),
                    });
                    job.status = JobStatus::Failed;
                    job.failure_reason = Some(reason);
                    failed_count += 1;
                }
            }
            jobs.push(job);
        }

        info!(sent_count, failed_count, "dispatch batch complete");
        Ok(DispatchSummary {
            sent_count,
            failed_count,
            failures,
            jobs,
        })
    }

    async fn attempt(&self, job: &DispatchJob) -> Result<(), OutreachError> {
        if job.recipient_email.trim().is_empty() {
            return Err(OutreachError::BuildFailed {
                recipient: String::new(),
                detail: "recipient email is empty".into(),
            });
        }
        let message = OutboundMessage {
            recipient: job.recipient_email.clone(),
            subject: job.rendered_subject.clone(),
            body: job.rendered_body.clone(),
        };
        self.channel.submit(&message).await
    }
}
