//! GitHub repository URL normalization.
//!
//! Accepts the URL spellings users paste into the audit form and reduces
//! them to the canonical `https://github.com/OWNER/REPO` form, rejecting
//! anything that is not a GitHub repository URL. The core engine itself
//! accepts any git-reachable reference; this gate belongs to the public
//! entry points (web API, CLI).

use std::sync::OnceLock;

use regex_lite::Regex;

/// Owner and repository name segments: GitHub allows word characters,
/// dots and dashes.
fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.-]+$").expect("segment pattern is valid")
    })
}

/// Normalize a GitHub repository URL.
///
/// Returns the canonical `https://github.com/OWNER/REPO` (scheme forced to
/// https, `www.` and a trailing `.git` stripped, extra path segments
/// ignored), or `None` when the input is not an http(s) GitHub URL with an
/// owner and repository.
pub fn normalize_repo_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))?;

    let (host, path) = rest.split_once('/')?;
    let host = host.to_ascii_lowercase();
    if host != "github.com" && host != "www.github.com" {
        return None;
    }

    let mut parts = path.split('/').filter(|p| !p.is_empty());
    let owner = parts.next()?;
    let repo = parts.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if !segment_pattern().is_match(owner) || !segment_pattern().is_match(repo) {
        return None;
    }

    Some(format!("https://github.com/{}/{}", owner, repo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_url_passes_through() {
        assert_eq!(
            normalize_repo_url("https://github.com/acme/project").as_deref(),
            Some("https://github.com/acme/project")
        );
    }

    #[test]
    fn test_http_is_upgraded() {
        assert_eq!(
            normalize_repo_url("http://github.com/acme/project").as_deref(),
            Some("https://github.com/acme/project")
        );
    }

    #[test]
    fn test_www_host_accepted() {
        assert_eq!(
            normalize_repo_url("https://www.github.com/acme/project").as_deref(),
            Some("https://github.com/acme/project")
        );
    }

    #[test]
    fn test_host_case_insensitive() {
        assert_eq!(
            normalize_repo_url("https://GitHub.COM/acme/project").as_deref(),
            Some("https://github.com/acme/project")
        );
    }

    #[test]
    fn test_dot_git_suffix_stripped() {
        assert_eq!(
            normalize_repo_url("https://github.com/acme/project.git").as_deref(),
            Some("https://github.com/acme/project")
        );
    }

    #[test]
    fn test_extra_path_segments_ignored() {
        assert_eq!(
            normalize_repo_url("https://github.com/acme/project/tree/main/src").as_deref(),
            Some("https://github.com/acme/project")
        );
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(
            normalize_repo_url("  https://github.com/acme/project  ").as_deref(),
            Some("https://github.com/acme/project")
        );
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert_eq!(normalize_repo_url("github.com/acme/project"), None);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert_eq!(normalize_repo_url("git@github.com:acme/project.git"), None);
        assert_eq!(normalize_repo_url("ssh://git@github.com/acme/project"), None);
    }

    #[test]
    fn test_rejects_other_hosts() {
        assert_eq!(normalize_repo_url("https://gitlab.com/acme/project"), None);
        assert_eq!(
            normalize_repo_url("https://github.com.evil.io/acme/project"),
            None
        );
    }

    #[test]
    fn test_rejects_owner_only() {
        assert_eq!(normalize_repo_url("https://github.com/acme"), None);
        assert_eq!(normalize_repo_url("https://github.com/acme/"), None);
    }

    #[test]
    fn test_rejects_invalid_segment_characters() {
        assert_eq!(
            normalize_repo_url("https://github.com/ac me/project"),
            None
        );
        assert_eq!(
            normalize_repo_url("https://github.com/acme/pro%20ject"),
            None
        );
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(normalize_repo_url(""), None);
        assert_eq!(normalize_repo_url("   "), None);
    }
}
