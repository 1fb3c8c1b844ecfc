//! TOML-based configuration system for ContribAudit.
//!
//! Sensitive values (the SMTP password) are stored as `_env` fields that
//! reference environment variable names. The actual secrets are resolved at
//! runtime via [`AppConfig::resolve_env_vars`].
//!
//! Every section has sensible defaults: an empty configuration supports the
//! audit operation out of the box, while an incomplete `[smtp]` section
//! disables the dispatch operation only.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ConfigError;

/// Largest commit ceiling a single audit request may ask for.
pub const MAX_COMMIT_CEILING: u64 = 200_000;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Audit pipeline settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Mail submission settings.
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Web API settings.
    #[serde(default)]
    pub web: WebConfig,
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Audit pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Commit ceiling applied when a request does not specify one.
    #[serde(default = "default_max_commits")]
    pub default_max_commits: u64,

    /// Privacy mode: replace identifying addresses with a one-way digest
    /// before results leave the pipeline. While this is set the dispatch
    /// operation is refused, since raw addresses must never surface.
    #[serde(default)]
    pub redact: bool,
}

fn default_max_commits() -> u64 {
    2000
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_max_commits: default_max_commits(),
            redact: false,
        }
    }
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

/// Transport security for the SMTP channel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TransportSecurity {
    /// Plaintext connection upgraded with STARTTLS (usually port 587).
    #[default]
    Starttls,
    /// TLS from the first byte, aka SMTPS (usually port 465).
    ImplicitTls,
    /// No encryption. Only sensible against a localhost relay.
    None,
}

/// Mail submission configuration.
///
/// Host, username, password and sender address must all be present for the
/// dispatch operation to be enabled. The audit operation never needs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname (e.g. `smtp.example.com`).
    #[serde(default)]
    pub host: Option<String>,

    /// SMTP server port. Default 587.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Transport security mode.
    #[serde(default)]
    pub security: TransportSecurity,

    /// SMTP username for authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Environment variable holding the SMTP password.
    #[serde(default)]
    pub password_env: Option<String>,

    /// Sender address for outgoing messages.
    #[serde(default)]
    pub from: Option<String>,

    /// Resolved password (populated by `resolve_env_vars`).
    #[serde(skip)]
    pub password: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            security: TransportSecurity::default(),
            username: None,
            password_env: None,
            from: None,
            password: None,
        }
    }
}

/// Fully resolved SMTP settings, guaranteed complete.
#[derive(Debug, Clone)]
pub struct ResolvedSmtp {
    pub host: String,
    pub port: u16,
    pub security: TransportSecurity,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpConfig {
    /// Return the complete settings, or list every missing piece so the
    /// caller can surface one actionable message.
    pub fn resolved(&self) -> Result<ResolvedSmtp, ConfigError> {
        let mut missing = Vec::new();

        let host = non_empty(&self.host);
        if host.is_none() {
            missing.push("smtp.host");
        }
        let username = non_empty(&self.username);
        if username.is_none() {
            missing.push("smtp.username");
        }
        let password = non_empty(&self.password);
        if password.is_none() {
            missing.push("smtp.password_env");
        }
        let from = non_empty(&self.from);
        if from.is_none() {
            missing.push("smtp.from");
        }

        if !missing.is_empty() {
            return Err(ConfigError::SmtpIncomplete {
                missing: missing.join(", "),
            });
        }

        Ok(ResolvedSmtp {
            host: host.unwrap_or_default(),
            port: self.port,
            security: self.security,
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
            from: from.unwrap_or_default(),
        })
    }

    /// Whether the dispatch operation is enabled.
    pub fn is_complete(&self) -> bool {
        self.resolved().is_ok()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Web
// ---------------------------------------------------------------------------

/// Web API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Listen address (default `127.0.0.1:8000`).
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:8000".into()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    ///
    /// This does **not** resolve environment variables -- call
    /// [`resolve_env_vars`](Self::resolve_env_vars) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Resolve all `*_env` fields from environment variables and populate
    /// the corresponding resolved fields.
    ///
    /// A missing variable logs a warning but does **not** fail -- dispatch
    /// is simply disabled until the variable is provided, while the audit
    /// operation keeps working.
    pub fn resolve_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref env_name) = self.smtp.password_env {
            self.smtp.password = resolve_optional_env(env_name, "smtp.password_env");
        }
        Ok(())
    }

    /// Validate that all present fields are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audit.default_max_commits == 0
            || self.audit.default_max_commits > MAX_COMMIT_CEILING
        {
            return Err(ConfigError::InvalidValue {
                field: "audit.default_max_commits".into(),
                detail: format!("must be between 1 and {}", MAX_COMMIT_CEILING),
            });
        }
        if self.smtp.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "smtp.port".into(),
                detail: "port must be > 0".into(),
            });
        }
        if self.web.listen.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "web.listen".into(),
                detail: "listen address must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Convenience: load, resolve, and validate in one call.
    pub fn load_and_resolve<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.resolve_env_vars()?;
        config.validate()?;
        Ok(config)
    }
}

/// Try to read an environment variable by name. Returns `Some(value)` on
/// success; logs a warning and returns `None` if the variable is unset.
fn resolve_optional_env(env_name: &str, field: &str) -> Option<String> {
    match std::env::var(env_name) {
        Ok(val) if !val.is_empty() => {
            debug!(field, env_name, "resolved env var");
            Some(val)
        }
        Ok(_) => {
            warn!(field, env_name, "env var is set but empty");
            None
        }
        Err(_) => {
            warn!(field, env_name, "env var not set");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
[audit]
default_max_commits = 500
redact = true

[smtp]
host = "smtp.example.com"
port = 465
security = "implicit-tls"
username = "mailer"
password_env = "SMTP_PASSWORD"
from = "audit@example.com"

[web]
listen = "0.0.0.0:9000"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.audit.default_max_commits, 500);
        assert!(config.audit.redact);
        assert_eq!(config.smtp.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.security, TransportSecurity::ImplicitTls);
        assert_eq!(config.web.listen, "0.0.0.0:9000");
    }

    #[test]
    fn test_defaults_from_empty_config() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.audit.default_max_commits, 2000);
        assert!(!config.audit.redact);
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.security, TransportSecurity::Starttls);
        assert_eq!(config.web.listen, "127.0.0.1:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = AppConfig::load_from_file(&path).expect("load_from_file failed");
        assert_eq!(config.smtp.username.as_deref(), Some("mailer"));
    }

    #[test]
    fn test_file_not_found() {
        let result = AppConfig::load_from_file("/nonexistent/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_resolve_env_vars() {
        std::env::set_var("TEST_CONTRIBAUDIT_SMTP_PW", "s3cret");

        let mut config: AppConfig = toml::from_str(
            r#"
[smtp]
host = "smtp.example.com"
username = "mailer"
password_env = "TEST_CONTRIBAUDIT_SMTP_PW"
from = "audit@example.com"
"#,
        )
        .unwrap();
        config.resolve_env_vars().unwrap();

        assert_eq!(config.smtp.password.as_deref(), Some("s3cret"));
        assert!(config.smtp.is_complete());

        std::env::remove_var("TEST_CONTRIBAUDIT_SMTP_PW");
    }

    #[test]
    fn test_smtp_incomplete_lists_missing_fields() {
        let config = AppConfig::default();
        let err = config.smtp.resolved().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("smtp.host"));
        assert!(msg.contains("smtp.username"));
        assert!(msg.contains("smtp.password_env"));
        assert!(msg.contains("smtp.from"));
    }

    #[test]
    fn test_smtp_blank_values_count_as_missing() {
        let mut config = AppConfig::default();
        config.smtp.host = Some("  ".into());
        let err = config.smtp.resolved().unwrap_err();
        assert!(err.to_string().contains("smtp.host"));
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let mut config = AppConfig::default();
        config.audit.default_max_commits = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "audit.default_max_commits"
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_ceiling() {
        let mut config = AppConfig::default();
        config.audit.default_max_commits = MAX_COMMIT_CEILING + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_security_mode_spellings() {
        for (input, expected) in [
            ("starttls", TransportSecurity::Starttls),
            ("implicit-tls", TransportSecurity::ImplicitTls),
            ("none", TransportSecurity::None),
        ] {
            let toml_str = format!("[smtp]\nsecurity = \"{}\"\n", input);
            let config: AppConfig = toml::from_str(&toml_str).unwrap();
            assert_eq!(config.smtp.security, expected);
        }
    }
}
