//! Repository source parsing
//!
//! Supported forms:
//! - Local directories: `./feed`, `/srv/feed`, `file:///srv/feed`
//! - Git-hosted feeds: `https://host/org/feed.git`, `ssh://git@host/org/feed.git`,
//!   `git@host:org/feed.git`, `github:org/feed`, each optionally suffixed with `#ref`

use std::path::{Path, PathBuf};

use crate::error::{Result, install};

/// A parsed repository source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    /// Feed directory on the local file system (always absolute)
    Local(PathBuf),
    /// Feed stored in a git repository, optionally pinned to a ref
    Git { url: String, git_ref: Option<String> },
}

fn split_ref(input: &str) -> (&str, Option<String>) {
    match input.split_once('#') {
        Some((url, git_ref)) if !git_ref.is_empty() => (url, Some(git_ref.to_string())),
        Some((url, _)) => (url, None),
        None => (input, None),
    }
}

impl RepositorySource {
    /// Parse a configured source; relative paths resolve against `workspace_root`
    pub fn parse(source: &str, workspace_root: &Path) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(install::feed_unavailable(source, "empty source"));
        }

        if let Some(path) = source.strip_prefix("file://") {
            return Ok(Self::Local(PathBuf::from(path)));
        }

        if let Some(repo) = source.strip_prefix("github:") {
            let (repo, git_ref) = split_ref(repo);
            let repo = repo.trim_matches('/').trim_end_matches(".git");
            if repo.split('/').filter(|s| !s.is_empty()).count() != 2 {
                return Err(install::feed_unavailable(
                    source,
                    "expected github:owner/repo",
                ));
            }
            return Ok(Self::Git {
                url: format!("https://github.com/{repo}.git"),
                git_ref,
            });
        }

        let is_git_url = ["https://", "http://", "ssh://", "git://"]
            .iter()
            .any(|scheme| source.starts_with(scheme))
            || source.starts_with("git@");
        if is_git_url {
            let (url, git_ref) = split_ref(source);
            return Ok(Self::Git {
                url: url.to_string(),
                git_ref,
            });
        }

        if let Some((scheme, _)) = source.split_once("://") {
            return Err(install::feed_unavailable(
                source,
                format!("unsupported scheme '{scheme}'"),
            ));
        }

        let path = Path::new(source);
        if path.is_absolute() {
            Ok(Self::Local(path.to_path_buf()))
        } else {
            Ok(Self::Local(workspace_root.join(path)))
        }
    }

    pub fn is_git(&self) -> bool {
        matches!(self, Self::Git { .. })
    }
}
