//! Cache statistics and management
//!
//! Listing, statistics and clearing of cached feed checkouts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, cache};

use super::FEED_URL_FILE;

fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

/// A cached feed, aggregated across its checked-out commits
#[derive(Debug, Clone)]
pub struct CachedFeed {
    /// Feed URL, or the slug when the URL file is missing
    pub name: String,
    /// Number of cached commits
    pub versions: usize,
    /// Total size in bytes
    pub size: u64,
}

impl CachedFeed {
    /// Format size as human-readable string
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of distinct feeds cached
    pub feeds: usize,
    /// Number of cached commits across all feeds
    pub versions: usize,
    /// Total size in bytes
    pub total_size: u64,
}

impl CacheStats {
    /// Format total size as human-readable string
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

fn read_dir(path: &Path) -> Result<fs::ReadDir> {
    fs::read_dir(path).map_err(|e| {
        cache::operation_failed(format!(
            "Failed to read cache directory {}: {e}",
            path.display()
        ))
    })
}

/// List every cached feed under `feeds_dir`
pub fn list_cached_feeds(feeds_dir: &Path) -> Result<Vec<CachedFeed>> {
    if !feeds_dir.exists() {
        return Ok(Vec::new());
    }

    let mut by_name: BTreeMap<String, (usize, u64)> = BTreeMap::new();

    for entry in read_dir(feeds_dir)? {
        let slug_dir = entry?.path();
        if !slug_dir.is_dir() {
            continue;
        }

        let name = fs::read_to_string(slug_dir.join(FEED_URL_FILE))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| {
                slug_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            });

        for sha_entry in read_dir(&slug_dir)? {
            let sha_dir = sha_entry?.path();
            if !sha_dir.is_dir() {
                continue;
            }
            let (versions, total) = by_name.entry(name.clone()).or_insert((0, 0));
            *versions += 1;
            *total += dir_size(&sha_dir)?;
        }
    }

    Ok(by_name
        .into_iter()
        .map(|(name, (versions, size))| CachedFeed {
            name,
            versions,
            size,
        })
        .collect())
}

/// Get cache statistics for `feeds_dir`
pub fn cache_stats(feeds_dir: &Path) -> Result<CacheStats> {
    let feeds = list_cached_feeds(feeds_dir)?;
    Ok(CacheStats {
        feeds: feeds.len(),
        versions: feeds.iter().map(|f| f.versions).sum(),
        total_size: feeds.iter().map(|f| f.size).sum(),
    })
}

/// Remove every cached feed
pub fn clear_cache(feeds_dir: &Path) -> Result<()> {
    if feeds_dir.exists() {
        fs::remove_dir_all(feeds_dir)
            .map_err(|e| cache::operation_failed(format!("Failed to clear cache: {e}")))?;
    }
    Ok(())
}

/// Calculate directory size recursively
fn dir_size(path: &Path) -> Result<u64> {
    let mut size = 0u64;
    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            size += entry
                .metadata()
                .map_err(|e| cache::operation_failed(format!("Failed to get metadata: {e}")))?
                .len();
        }
    }
    Ok(size)
}
