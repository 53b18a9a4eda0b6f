//! Cache path utilities and constants

use std::path::PathBuf;

use crate::error::{Result, cache};

/// Default cache directory name under the user's cache directory
const CACHE_DIR: &str = "scriptshell";

/// Feeds subdirectory within the cache
pub const FEEDS_DIR: &str = "feeds";

/// File stored next to the SHA directories recording the feed URL
pub const FEED_URL_FILE: &str = ".scriptshell_feed_url";

/// Get the default cache directory path
///
/// Uses the platform's standard cache location with a `scriptshell`
/// subdirectory. Can be overridden with the `SCRIPTSHELL_CACHE_DIR` environment variable.
pub fn cache_dir() -> Result<PathBuf> {
    if let Ok(cache_dir) = std::env::var("SCRIPTSHELL_CACHE_DIR") {
        return Ok(PathBuf::from(cache_dir));
    }

    let base = dirs::cache_dir()
        .ok_or_else(|| cache::operation_failed("Could not determine cache directory"))?;

    Ok(base.join(CACHE_DIR))
}

/// Turn a feed URL into a single path-safe directory name
///
/// `https://github.com/acme/feed.git` becomes `github.com-acme-feed`.
pub fn url_to_slug(url: &str) -> String {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest)
        .trim_start_matches("git@");

    let slug: String = without_scheme
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '@' | '#' => '-',
            c => c,
        })
        .collect();

    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cache_dir_env_override() {
        let previous = std::env::var_os("SCRIPTSHELL_CACHE_DIR");
        // SAFETY: serialized with every other test touching this variable
        unsafe { std::env::set_var("SCRIPTSHELL_CACHE_DIR", "/tmp/scriptshell-cache") };
        let dir = cache_dir().unwrap();
        match previous {
            Some(value) => unsafe { std::env::set_var("SCRIPTSHELL_CACHE_DIR", value) },
            None => unsafe { std::env::remove_var("SCRIPTSHELL_CACHE_DIR") },
        }
        assert_eq!(dir, PathBuf::from("/tmp/scriptshell-cache"));
    }

    #[test]
    fn test_url_to_slug() {
        assert_eq!(
            url_to_slug("https://github.com/acme/feed.git"),
            "github.com-acme-feed"
        );
        assert_eq!(
            url_to_slug("git@github.com:acme/feed.git"),
            "github.com-acme-feed"
        );
        assert_eq!(url_to_slug("file:///tmp/feeds/local/"), "tmp-feeds-local");
        assert_eq!(url_to_slug(":::"), "unknown");
    }

    #[test]
    fn test_url_to_slug_windows_paths_are_safe() {
        let slug = url_to_slug("file://C:\\Users\\RUNNER~1\\Temp\\feed-repo");
        assert!(!slug.contains('\\'));
        assert!(!slug.contains(':'));
        assert!(slug.ends_with("feed-repo"));
    }
}
