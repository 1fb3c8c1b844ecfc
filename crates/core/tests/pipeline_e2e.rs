//! End-to-end pipeline test against a real git repository.
//!
//! Builds a throwaway repository with the git CLI, then drives the full
//! clone -> log -> aggregate -> classify -> redact pipeline through the
//! audit engine.

use std::path::Path;
use std::process::Command;

use contribaudit_core::audit_engine::{AuditEngine, AuditRequest};
use contribaudit_core::models::EmailKind;
use contribaudit_core::redact::email_digest;

fn run_git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn commit_as(repo_dir: &Path, name: &str, email: &str, message: &str) {
    run_git(
        repo_dir,
        &[
            "-c",
            &format!("user.name={}", name),
            "-c",
            &format!("user.email={}", email),
            "commit",
            "--allow-empty",
            "-m",
            message,
        ],
    );
}

/// Fixture history, oldest first:
///   3x Alice (identifying), 2x Carol (noreply alias), 1x Alice again
///   under a different case spelling of the same address.
fn make_fixture_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    run_git(dir.path(), &["init"]);
    commit_as(dir.path(), "Alice Smith", "alice@example.com", "one");
    commit_as(dir.path(), "Alice Smith", "alice@example.com", "two");
    commit_as(dir.path(), "Alice Smith", "alice@example.com", "three");
    commit_as(
        dir.path(),
        "Carol",
        "12345+carol@users.noreply.github.com",
        "four",
    );
    commit_as(
        dir.path(),
        "Carol",
        "12345+carol@users.noreply.github.com",
        "five",
    );
    commit_as(dir.path(), "Alice S.", "ALICE@example.com", "six");
    dir
}

#[tokio::test]
async fn test_full_audit_of_local_repository() {
    let repo = make_fixture_repo();
    let engine = AuditEngine::new();

    let report = engine
        .audit(&AuditRequest {
            repository: repo.path().display().to_string(),
            commit_ceiling: 100,
            redact: false,
        })
        .await
        .unwrap();

    assert_eq!(report.scanned_commits, 6);
    assert_eq!(report.unique_authors, 2);
    assert_eq!(report.unique_identifying_emails, 1);
    assert!(!report.redacted);

    let total: u64 = report.authors.iter().map(|a| a.commit_count).sum();
    assert_eq!(total, report.scanned_commits);

    // Newest-first scan: the case-variant Alice commit is seen first, so
    // Alice's aggregate leads and keeps the first-seen spelling.
    let alice = &report.authors[0];
    assert_eq!(alice.display_name, "Alice S.");
    assert_eq!(alice.first_name, "Alice");
    assert_eq!(alice.commit_count, 4);
    assert_eq!(alice.email_kind, EmailKind::Identifying);

    let carol = &report.authors[1];
    assert_eq!(carol.display_name, "Carol");
    assert_eq!(carol.commit_count, 2);
    assert_eq!(carol.email_kind, EmailKind::Noreply);
    assert_eq!(
        carol.email.as_deref(),
        Some("12345+carol@users.noreply.github.com")
    );
}

#[tokio::test]
async fn test_commit_ceiling_bounds_the_scan() {
    let repo = make_fixture_repo();
    let engine = AuditEngine::new();

    let report = engine
        .audit(&AuditRequest {
            repository: repo.path().display().to_string(),
            commit_ceiling: 2,
            redact: false,
        })
        .await
        .unwrap();

    // Only the two newest commits: Alice's case-variant and one Carol.
    assert_eq!(report.scanned_commits, 2);
    assert_eq!(report.unique_authors, 2);
}

#[tokio::test]
async fn test_zero_ceiling_yields_empty_report() {
    let repo = make_fixture_repo();
    let engine = AuditEngine::new();

    let report = engine
        .audit(&AuditRequest {
            repository: repo.path().display().to_string(),
            commit_ceiling: 0,
            redact: false,
        })
        .await
        .unwrap();

    assert_eq!(report.scanned_commits, 0);
    assert_eq!(report.unique_authors, 0);
    assert!(report.authors.is_empty());
}

#[tokio::test]
async fn test_privacy_mode_redacts_identifying_addresses_only() {
    let repo = make_fixture_repo();
    let engine = AuditEngine::new();

    let report = engine
        .audit(&AuditRequest {
            repository: repo.path().display().to_string(),
            commit_ceiling: 100,
            redact: true,
        })
        .await
        .unwrap();

    assert!(report.redacted);
    assert_eq!(report.unique_identifying_emails, 1);

    let alice = &report.authors[0];
    // The digest is over the lowercase-trimmed address, so both case
    // spellings collapse to the same deterministic value.
    assert_eq!(
        alice.email.as_deref(),
        Some(email_digest("alice@example.com").as_str())
    );
    assert_ne!(alice.email.as_deref(), Some("alice@example.com"));
    assert_ne!(alice.email.as_deref(), Some("ALICE@example.com"));

    // Noreply aliases pass through unredacted.
    let carol = &report.authors[1];
    assert_eq!(
        carol.email.as_deref(),
        Some("12345+carol@users.noreply.github.com")
    );
}
