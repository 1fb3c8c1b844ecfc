//! Error types for the ContribAudit core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Outreach(#[from] OutreachError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from git CLI operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// A `git` command exited with a non-zero status.
    #[error("git command failed (exit {exit_code}): {stderr}")]
    CommandFailed {
        exit_code: i32,
        stderr: String,
    },

    /// Cloning the repository failed after all attempts.
    #[error("failed to clone '{url}': {detail}")]
    CloneFailed {
        url: String,
        detail: String,
    },

    /// The local repository copy does not exist or is unreadable.
    #[error("repository copy not found at '{0}'")]
    RepositoryNotFound(String),

    /// Generic I/O wrapper.
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Audit errors
// ---------------------------------------------------------------------------

/// Errors from running an audit scan.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The repository could not be cloned or read.
    #[error(transparent)]
    Source(#[from] GitError),

    /// The log stream contained data but zero records could be decoded.
    #[error("commit log is unparseable ({bytes} bytes, zero records decoded)")]
    LogUnparseable {
        bytes: usize,
    },
}

// ---------------------------------------------------------------------------
// Outreach errors
// ---------------------------------------------------------------------------

/// Errors from the outreach subsystem (templates, mail dispatch).
#[derive(Debug, Error)]
pub enum OutreachError {
    /// A template was empty after trimming. The field names which one.
    #[error("empty {0} template")]
    EmptyTemplate(&'static str),

    /// The mail channel could not be established; no sends were attempted.
    #[error("mail channel authentication failed: {0}")]
    ChannelAuth(String),

    /// A message could not be constructed for a recipient.
    #[error("failed to build message for '{recipient}': {detail}")]
    BuildFailed {
        recipient: String,
        detail: String,
    },

    /// A single submission failed. Recorded per job, never fatal to a batch.
    #[error("send to '{recipient}' failed: {detail}")]
    SendFailed {
        recipient: String,
        detail: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// The SMTP section is missing fields required for dispatch.
    #[error("smtp configuration incomplete, missing: {missing}")]
    SmtpIncomplete {
        missing: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = GitError::BinaryNotFound("git".into());
        assert_eq!(err.to_string(), "git binary not found: git");

        let err = AuditError::LogUnparseable { bytes: 42 };
        assert!(err.to_string().contains("zero records"));

        let err = OutreachError::EmptyTemplate("subject");
        assert_eq!(err.to_string(), "empty subject template");

        let err = ConfigError::SmtpIncomplete {
            missing: "smtp.host, smtp.from".into(),
        };
        assert!(err.to_string().contains("smtp.host"));
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let git_err = GitError::RepositoryNotFound("/tmp/repo".into());
        let core_err: CoreError = git_err.into();
        assert!(matches!(core_err, CoreError::Git(_)));

        let audit_err: AuditError = GitError::BinaryNotFound("git".into()).into();
        assert!(matches!(audit_err, AuditError::Source(_)));
    }
}
