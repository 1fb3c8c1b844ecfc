//! Asynchronous git CLI client.
//!
//! Shells out to the `git` binary for cloning and log extraction. Clones
//! are bare and blob-less where the remote supports partial clone, falling
//! back to a plain bare clone otherwise.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::errors::GitError;

/// Log format handed to `git log`: author name and author email separated
/// by a NUL byte, one commit per line, newest first.
const AUTHOR_LOG_FORMAT: &str = "--format=%an%x00%ae";

/// Asynchronous client for fetching repository history via the git CLI.
#[derive(Debug, Clone, Default)]
pub struct GitCliClient;

impl GitCliClient {
    pub fn new() -> Self {
        Self
    }

    /// Clone `url` as a bare repository into `dest`.
    ///
    /// Tries a blob-less partial clone first (`--filter=blob:none`) to keep
    /// the copy small, then retries with a full bare clone when the remote
    /// does not support the filter.
    #[instrument(skip(self), fields(url = %url, dest = %dest.display()))]
    pub async fn clone_bare(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        let dest_str = dest.to_string_lossy().to_string();
        let filtered = self
            .run_git(
                None,
                &["clone", "--bare", "--filter=blob:none", url, &dest_str],
            )
            .await;

        match filtered {
            Ok(_) => {
                info!("blob-less bare clone completed");
                Ok(())
            }
            Err(GitError::CommandFailed { stderr, .. }) => {
                warn!(%stderr, "blob-less clone failed, retrying with full bare clone");
                self.run_git(None, &["clone", "--bare", url, &dest_str])
                    .await
                    .map_err(|e| GitError::CloneFailed {
                        url: url.to_string(),
                        detail: e.to_string(),
                    })?;
                info!("bare clone completed");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Read author name/email pairs for up to `ceiling` commits, newest
    /// first, as raw `NAME<NUL>EMAIL` lines.
    ///
    /// A ceiling of zero short-circuits to empty output without touching
    /// the repository.
    #[instrument(skip(self), fields(repo = %repo_dir.display(), ceiling))]
    pub async fn log_authors(&self, repo_dir: &Path, ceiling: u64) -> Result<String, GitError> {
        if ceiling == 0 {
            debug!("zero commit ceiling, skipping log");
            return Ok(String::new());
        }
        if !repo_dir.exists() {
            return Err(GitError::RepositoryNotFound(
                repo_dir.display().to_string(),
            ));
        }
        let count = format!("-n{}", ceiling);
        self.run_git(Some(repo_dir), &["log", &count, AUTHOR_LOG_FORMAT])
            .await
    }

    async fn run_git(&self, dir: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // An aborted audit drops the future; the subprocess must not
            // outlive the request-scoped clone directory.
            .kill_on_drop(true);

        debug!(cmd = ?format!("git {}", args.join(" ")), "running git command");
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::BinaryNotFound("git".into())
            } else {
                GitError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, "git command failed");
            return Err(GitError::CommandFailed { exit_code, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
