//! Cache command implementation

use crate::cache::FeedCache;
use crate::cli::{CacheArgs, CacheSubcommand};
use crate::error::Result;

pub fn run(args: CacheArgs) -> Result<()> {
    let cache = FeedCache::from_env()?;

    match args.command {
        Some(CacheSubcommand::List) => list_cached_feeds(&cache),
        Some(CacheSubcommand::Clear) => {
            cache.clear()?;
            println!("Cache cleared successfully.");
            Ok(())
        }
        None => show_cache_stats(&cache),
    }
}

fn print_stats(cache: &FeedCache) -> Result<usize> {
    let stats = cache.stats()?;

    println!("Cache Statistics:");
    println!("  Location: {}", cache.root().display());
    println!("  Feeds: {}", stats.feeds);
    println!("  Versions: {}", stats.versions);
    println!("  Size: {}", stats.formatted_size());

    Ok(stats.feeds)
}

fn show_cache_stats(cache: &FeedCache) -> Result<()> {
    if print_stats(cache)? == 0 {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'scriptshell cache list' to list cached feeds.");
        println!("Run 'scriptshell cache clear' to remove everything from cache.");
    }
    Ok(())
}

fn list_cached_feeds(cache: &FeedCache) -> Result<()> {
    print_stats(cache)?;
    println!();

    let feeds = cache.list()?;
    if feeds.is_empty() {
        println!("No cached feeds.");
        return Ok(());
    }

    println!("Cached feeds ({}):", feeds.len());
    for feed in &feeds {
        println!(
            "  {} ({} version{}, {})",
            feed.name,
            feed.versions,
            if feed.versions == 1 { "" } else { "s" },
            feed.formatted_size()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stats_and_list_on_empty_cache() {
        let temp = TempDir::new().unwrap();
        let cache = FeedCache::new(temp.path());
        assert!(show_cache_stats(&cache).is_ok());
        assert!(list_cached_feeds(&cache).is_ok());
    }

    #[test]
    fn test_clear_removes_feeds() {
        let temp = TempDir::new().unwrap();
        let cache = FeedCache::new(temp.path());
        std::fs::create_dir_all(cache.feeds_dir().join("slug").join("abc")).unwrap();

        cache.clear().unwrap();
        assert!(!cache.feeds_dir().exists());
    }
}
