//! ContribAudit core library.
//!
//! This crate provides the foundational components for contributor email
//! auditing: configuration, git CLI access and log parsing, identity
//! aggregation, email classification, privacy redaction, outreach
//! templating, and sequential mail dispatch.

pub mod audit_engine;
pub mod config;
pub mod errors;
pub mod git;
pub mod identity;
pub mod models;
pub mod outreach;
pub mod redact;

// Re-exports for convenience.
pub use audit_engine::{AuditEngine, AuditRequest};
pub use config::AppConfig;
pub use models::{AuditReport, DispatchSummary, EmailKind, IdentityAggregate};
