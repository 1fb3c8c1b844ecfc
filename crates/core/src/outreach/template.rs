//! Placeholder substitution for outreach subject and body templates.

use crate::errors::OutreachError;
use crate::models::IdentityAggregate;

/// A rendered subject/body pair for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// Render `subject` and `body` for one recipient.
///
/// Recognized placeholders: `{first_name}`, `{author_name}` (the full
/// display name), `{email}`, `{commits}`, `{repo_url}`. Unrecognized
/// tokens are left verbatim. Substitution is textual only; templates are
/// never evaluated as code.
pub fn render(
    subject: &str,
    body: &str,
    recipient: &IdentityAggregate,
    repo_url: &str,
) -> Result<RenderedMessage, OutreachError> {
    if subject.trim().is_empty() {
        return Err(OutreachError::EmptyTemplate("subject"));
    }
    if body.trim().is_empty() {
        return Err(OutreachError::EmptyTemplate("body"));
    }
    Ok(RenderedMessage {
        subject: substitute(subject, recipient, repo_url),
        body: substitute(body, recipient, repo_url),
    })
}

fn substitute(template: &str, recipient: &IdentityAggregate, repo_url: &str) -> String {
    template
        .replace("{first_name}", &recipient.first_name)
        .replace("{author_name}", &recipient.display_name)
        .replace("{email}", recipient.email.as_deref().unwrap_or(""))
        .replace("{commits}", &recipient.commit_count.to_string())
        .replace("{repo_url}", repo_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailKind;

    fn alice() -> IdentityAggregate {
        IdentityAggregate {
            display_name: "Alice Smith".into(),
            first_name: "Alice".into(),
            email: Some("alice@example.com".into()),
            email_kind: EmailKind::Identifying,
            commit_count: 42,
        }
    }

    #[test]
    fn test_all_placeholders_are_substituted() {
        let rendered = render(
            "Hi {first_name}",
            "{author_name} <{email}> made {commits} commits to {repo_url}.",
            &alice(),
            "https://github.com/acme/project",
        )
        .unwrap();
        assert_eq!(rendered.subject, "Hi Alice");
        assert_eq!(
            rendered.body,
            "Alice Smith <alice@example.com> made 42 commits to https://github.com/acme/project."
        );
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let rendered = render("Subject", "Hello {nickname}, re {repo_url}", &alice(), "url").unwrap();
        assert_eq!(rendered.body, "Hello {nickname}, re url");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let first = render("Hi {first_name}", "{commits} commits", &alice(), "url").unwrap();
        let second = render("Hi {first_name}", "{commits} commits", &alice(), "url").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_subject_rejected() {
        let err = render("   ", "body", &alice(), "url").unwrap_err();
        assert!(matches!(err, OutreachError::EmptyTemplate("subject")));
    }

    #[test]
    fn test_empty_body_rejected() {
        let err = render("subject", "\n\t ", &alice(), "url").unwrap_err();
        assert!(matches!(err, OutreachError::EmptyTemplate("body")));
    }

    #[test]
    fn test_missing_email_renders_empty() {
        let mut recipient = alice();
        recipient.email = None;
        let rendered = render("s", "to: {email}", &recipient, "url").unwrap();
        assert_eq!(rendered.body, "to: ");
    }

    #[test]
    fn test_repeated_placeholders_all_replaced() {
        let rendered = render("s", "{first_name} {first_name}", &alice(), "url").unwrap();
        assert_eq!(rendered.body, "Alice Alice");
    }
}
