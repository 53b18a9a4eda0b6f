//! Feed cache
//!
//! Git-hosted feeds are cloned once per commit and stored without their `.git`
//! directory:
//!
//! ```text
//! <cache>/feeds/<url-slug>/
//! ├── .scriptshell_feed_url
//! └── <sha>/                  # feed tree at that commit
//! ```
//!
//! A cached commit is immutable, so a hit skips the checkout entirely.

pub mod paths;
pub mod stats;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, cache};
use crate::git;

pub use paths::{FEED_URL_FILE, FEEDS_DIR, cache_dir, url_to_slug};
pub use stats::{CacheStats, CachedFeed};

/// Handle on a cache root directory
#[derive(Debug, Clone)]
pub struct FeedCache {
    root: PathBuf,
}

impl FeedCache {
    /// Cache rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted at `SCRIPTSHELL_CACHE_DIR` or the platform default
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(cache_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn feeds_dir(&self) -> PathBuf {
        self.root.join(FEEDS_DIR)
    }

    /// Directory holding one feed's tree at `sha`
    pub fn entry_path(&self, url: &str, sha: &str) -> PathBuf {
        self.feeds_dir().join(url_to_slug(url)).join(sha)
    }

    /// Materialize the feed at `url` (optionally at `git_ref`) and return its tree
    pub fn fetch(&self, url: &str, git_ref: Option<&str>) -> Result<PathBuf> {
        let staging_root = self.root.join(".staging");
        fs::create_dir_all(&staging_root).map_err(|e| {
            cache::operation_failed(format!("Failed to create cache directory: {e}"))
        })?;
        let staging = tempfile::TempDir::new_in(&staging_root)?;
        let clone_dir = staging.path().join("repository");

        let repo = git::clone(url, &clone_dir, git_ref.is_none())?;
        let sha = git::resolve_ref(&repo, git_ref)?;

        let entry = self.entry_path(url, &sha);
        if entry.is_dir() {
            debug!(url, sha = %sha, "feed cache hit");
            return Ok(entry);
        }

        git::checkout_commit(&repo, &sha)?;

        let slug_dir = entry
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.feeds_dir());
        fs::create_dir_all(&slug_dir)?;
        fs::write(slug_dir.join(FEED_URL_FILE), url)?;

        let tree = staging.path().join("tree");
        copy_tree_without_git(&clone_dir, &tree)?;
        fs::rename(&tree, &entry).map_err(|e| {
            cache::operation_failed(format!("Failed to store feed {url} at {sha}: {e}"))
        })?;

        debug!(url, sha = %sha, path = %entry.display(), "feed cached");
        Ok(entry)
    }

    pub fn list(&self) -> Result<Vec<CachedFeed>> {
        stats::list_cached_feeds(&self.feeds_dir())
    }

    pub fn stats(&self) -> Result<CacheStats> {
        stats::cache_stats(&self.feeds_dir())
    }

    pub fn clear(&self) -> Result<()> {
        stats::clear_cache(&self.feeds_dir())
    }
}

fn copy_tree_without_git(src: &Path, dst: &Path) -> Result<()> {
    let walker = WalkDir::new(src)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry
            .map_err(|e| cache::operation_failed(format!("Failed to walk checkout: {e}")))?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_git_repo_with_commit;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_caches_tree_without_git_dir() {
        let source = TempDir::new().unwrap();
        let sha = create_git_repo_with_commit(
            source.path(),
            "Acme.Json/1.0.0/package.yaml",
            "id: Acme.Json\nversion: 1.0.0\n",
        );
        let url = format!("file://{}", source.path().display());

        let cache_root = TempDir::new().unwrap();
        let cache = FeedCache::new(cache_root.path());

        let tree = cache.fetch(&url, None).unwrap();
        assert_eq!(tree, cache.entry_path(&url, &sha));
        assert!(tree.join("Acme.Json/1.0.0/package.yaml").is_file());
        assert!(!tree.join(".git").exists());

        // Second fetch resolves to the same immutable entry
        assert_eq!(cache.fetch(&url, None).unwrap(), tree);

        let listed = cache.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, url);
        assert_eq!(listed[0].versions, 1);
    }

    #[test]
    fn test_clear_empties_feeds() {
        let cache_root = TempDir::new().unwrap();
        let cache = FeedCache::new(cache_root.path());
        std::fs::create_dir_all(cache.feeds_dir().join("x/abc")).unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.stats().unwrap().feeds, 0);
    }
}
