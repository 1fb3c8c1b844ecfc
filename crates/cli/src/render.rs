//! Shared terminal rendering for the CLI.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use console::Style;

use contribaudit_core::models::{AuditReport, DispatchSummary, EmailKind, IdentityAggregate};

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create an error-styled string (red with cross).
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Create a header-styled string (bold).
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// Create a dim-styled string.
pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// Render the audit author list as a table.
pub fn author_table(authors: &[IdentityAggregate]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Author", "First name", "Commits", "Email type", "Email"]);

    for author in authors {
        let kind_cell = match author.email_kind {
            EmailKind::Noreply => Cell::new("noreply").fg(comfy_table::Color::Green),
            EmailKind::Identifying => Cell::new("identifying").fg(comfy_table::Color::Yellow),
            EmailKind::Missing => Cell::new("missing").fg(comfy_table::Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(&author.display_name),
            Cell::new(&author.first_name),
            Cell::new(author.commit_count),
            kind_cell,
            Cell::new(author.email.as_deref().unwrap_or("—")),
        ]);
    }

    table
}

/// Print the audit report header and author table.
pub fn print_report(report: &AuditReport) {
    println!();
    println!("{}", header(&format!("Audit of {}", report.repository_url)));
    println!();
    println!("  Scanned commits     : {}", report.scanned_commits);
    println!("  Unique authors      : {}", report.unique_authors);
    println!(
        "  Identifying emails  : {}",
        report.unique_identifying_emails
    );
    if report.redacted {
        println!("  {}", dim("Identifying addresses shown as SHA-256 digests"));
    }
    println!();
    println!("{}", author_table(&report.authors));
    println!();
}

/// Print a dispatch summary with per-failure details.
pub fn print_dispatch_summary(summary: &DispatchSummary) {
    println!();
    if summary.failed_count == 0 {
        println!(
            "{}",
            success(&format!("All {} messages sent", summary.sent_count))
        );
    } else {
        println!(
            "{}",
            error(&format!(
                "{} sent, {} failed",
                summary.sent_count, summary.failed_count
            ))
        );
        for failure in &summary.failures {
            println!("  {}", error(&format!("{}: {}", failure.email, failure.reason)));
        }
    }
    println!();
}
