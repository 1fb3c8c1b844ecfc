//! Git CLI access: cloning, commit log extraction, URL normalization.

pub mod client;
pub mod log;
pub mod repo_url;

pub use client::GitCliClient;
pub use log::CommitLogReader;
pub use repo_url::normalize_repo_url;
