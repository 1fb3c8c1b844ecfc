//! ContribAudit command-line tool.
//!
//! Provides subcommands for auditing a repository's contributor emails,
//! sending templated outreach to the identified contributors, running the
//! web API, and generating / validating configuration files.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use contribaudit_core::audit_engine::{AuditEngine, AuditRequest};
use contribaudit_core::config::{AppConfig, MAX_COMMIT_CEILING};
use contribaudit_core::git::repo_url::normalize_repo_url;
use contribaudit_core::models::{AuditReport, EmailKind};
use contribaudit_core::outreach::dispatch::{DispatchEngine, OutboundMessage};
use contribaudit_core::outreach::smtp::SmtpChannel;
use contribaudit_core::outreach::template;
use contribaudit_web::WebServer;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// ContribAudit command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "contribaudit",
    version,
    about = "Audit git contributor emails, redact them, or run templated outreach"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit a repository's contributor identities.
    Audit {
        /// Repository URL (https://github.com/OWNER/REPO).
        repo: String,

        /// Maximum number of commits to inspect.
        #[arg(long)]
        max_commits: Option<u64>,

        /// Replace identifying addresses with a one-way digest.
        #[arg(long)]
        redact: bool,

        /// Print the raw JSON report instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Send a templated email to the identifying contributors of a repository.
    Send {
        /// Repository URL (https://github.com/OWNER/REPO).
        repo: String,

        /// Subject template.
        #[arg(long)]
        subject: String,

        /// Path to the body template file.
        #[arg(long)]
        body: PathBuf,

        /// Maximum number of commits to inspect.
        #[arg(long)]
        max_commits: Option<u64>,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Run the web API server.
    Serve {
        /// Listen address override (host:port).
        #[arg(long)]
        listen: Option<String>,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./contribaudit.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&cli.config),
        Commands::Audit {
            repo,
            max_commits,
            redact,
            json,
        } => {
            let config = load_config(&cli.config)?;
            cmd_audit(&config, &repo, max_commits, redact, json).await
        }
        Commands::Send {
            repo,
            subject,
            body,
            max_commits,
            yes,
        } => {
            let config = load_config(&cli.config)?;
            cmd_send(&config, &repo, &subject, &body, max_commits, yes).await
        }
        Commands::Serve { listen } => {
            let config = load_config(&cli.config)?;
            cmd_serve(config, listen).await
        }
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// Resolve the configuration to use.
///
/// An explicit `--config` path must exist. Without one, the default config
/// location is used if present, and built-in defaults otherwise -- the
/// audit operation needs no configuration at all.
fn load_config(path: &Option<PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            AppConfig::load_and_resolve(path).context("failed to load configuration file")
        }
        None => {
            let default_path = default_config_path();
            match default_path {
                Some(ref p) if p.exists() => {
                    AppConfig::load_and_resolve(p).context("failed to load configuration file")
                }
                _ => Ok(AppConfig::default()),
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("contribaudit").join("config.toml"))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

async fn cmd_audit(
    config: &AppConfig,
    repo: &str,
    max_commits: Option<u64>,
    redact: bool,
    json: bool,
) -> Result<()> {
    let report = run_audit(config, repo, max_commits, redact).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }

    Ok(())
}

async fn cmd_send(
    config: &AppConfig,
    repo: &str,
    subject: &str,
    body_path: &PathBuf,
    max_commits: Option<u64>,
    yes: bool,
) -> Result<()> {
    if config.audit.redact {
        bail!("outreach is disabled while redaction mode is active");
    }

    let smtp = config
        .smtp
        .resolved()
        .context("dispatch is disabled until the [smtp] section is complete")?;

    let body_template =
        std::fs::read_to_string(body_path).context("failed to read body template file")?;

    let report = run_audit(config, repo, max_commits, false).await?;

    let recipients: Vec<_> = report
        .authors
        .iter()
        .filter(|a| a.email_kind == EmailKind::Identifying)
        .cloned()
        .collect();
    if recipients.is_empty() {
        println!("No identifying contributor emails found; nothing to send.");
        return Ok(());
    }

    // Render everything up front so an empty template fails before any send.
    let mut messages = Vec::with_capacity(recipients.len());
    for recipient in &recipients {
        let rendered = template::render(subject, &body_template, recipient, &report.repository_url)
            .context("failed to render template")?;
        messages.push(OutboundMessage {
            recipient: recipient.email.clone().unwrap_or_default(),
            subject: rendered.subject,
            body: rendered.body,
        });
    }

    println!();
    println!(
        "{}",
        render::header(&format!(
            "About to email {} contributor(s) of {}",
            recipients.len(),
            report.repository_url
        ))
    );
    println!();
    println!("{}", render::author_table(&recipients));
    println!();
    println!("{}", render::header("Preview (first recipient)"));
    println!("  Subject: {}", messages[0].subject);
    println!("{}", render::dim(&messages[0].body));
    println!();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Send these messages?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted; nothing was sent.");
            return Ok(());
        }
    }

    let channel = SmtpChannel::new(&smtp)?;
    let engine = DispatchEngine::new(channel);

    let spinner = spinner("Sending...");
    let summary = engine.dispatch(messages).await?;
    spinner.finish_and_clear();

    render::print_dispatch_summary(&summary);
    Ok(())
}

async fn cmd_serve(config: AppConfig, listen: Option<String>) -> Result<()> {
    let listen_addr = listen.unwrap_or_else(|| config.web.listen.clone());
    let server = WebServer::new(config);
    println!("Listening on http://{}", listen_addr);
    server.start(&listen_addr).await
}

fn cmd_init(output: &PathBuf) -> Result<()> {
    let default_config = r#"# ContribAudit Configuration

[audit]
# Commit ceiling applied when a request does not specify one.
default_max_commits = 2000
# Privacy mode: replace identifying addresses with a SHA-256 digest and
# disable the outreach operation.
redact = false

[smtp]
# All of host, username, password_env and from must be set for the send
# operation; auditing works without them.
# host = "smtp.example.com"
# port = 587
# security = "starttls"   # starttls | implicit-tls | none
# username = "mailer"
# password_env = "SMTP_PASSWORD"
# from = "audit@example.com"

[web]
listen = "127.0.0.1:8000"
"#;

    if output.exists() {
        bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the config file (SMTP settings are only needed for 'send')");
    println!("  2. Set the referenced environment variables (SMTP_PASSWORD)");
    println!(
        "  3. Validate with: contribaudit validate --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Option<PathBuf>) -> Result<()> {
    let path = match config_path {
        Some(p) => p.clone(),
        None => default_config_path().context("could not determine default config path")?,
    };

    println!("Validating configuration: {}", path.display());
    println!();

    let mut config =
        AppConfig::load_from_file(&path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    let _ = config.resolve_env_vars();
    println!("  [OK] Environment variable references processed");

    match config.validate() {
        Ok(()) => {
            println!("  [OK] All present fields are valid");
        }
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Default ceiling : {}", config.audit.default_max_commits);
    println!(
        "  Redaction mode  : {}",
        if config.audit.redact { "on" } else { "off" }
    );
    println!(
        "  Dispatch        : {}",
        if config.smtp.is_complete() {
            "enabled"
        } else {
            "disabled (incomplete [smtp] section)"
        }
    );
    println!("  Web listen      : {}", config.web.listen);
    println!();
    println!("Configuration is valid.");

    Ok(())
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

async fn run_audit(
    config: &AppConfig,
    repo: &str,
    max_commits: Option<u64>,
    redact: bool,
) -> Result<AuditReport> {
    let repo_url = normalize_repo_url(repo)
        .context("invalid GitHub repo URL (expected https://github.com/OWNER/REPO)")?;

    let ceiling = max_commits.unwrap_or(config.audit.default_max_commits);
    if ceiling == 0 || ceiling > MAX_COMMIT_CEILING {
        bail!("max_commits must be between 1 and {}", MAX_COMMIT_CEILING);
    }

    let request = AuditRequest {
        repository: repo_url,
        commit_ceiling: ceiling,
        redact: config.audit.redact || redact,
    };

    let spinner = spinner("Cloning and scanning...");
    let result = AuditEngine::new().audit(&request).await;
    spinner.finish_and_clear();

    result.map_err(|e| anyhow::anyhow!("audit failed: {}", e))
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        spinner.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}
