//! Command helper utilities

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cache::FeedCache;
use crate::error::{Result, ShellError};
use crate::filesystem::{FileSystem, PhysicalFileSystem};
use crate::package::FeedInstallationProvider;
use crate::workspace::Workspace;

/// Resolve workspace path from optional argument
///
/// Falls back to the current directory. The nearest ancestor holding a
/// `scriptshell.yaml` wins; without one the directory itself is the workspace.
pub fn resolve_workspace_path(workspace: Option<PathBuf>) -> Result<PathBuf> {
    let start = match workspace {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| ShellError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?,
    };
    let start = dunce::canonicalize(&start).unwrap_or(start);
    Ok(Workspace::find_from(&start).unwrap_or(start))
}

/// Provider for `root` with git feeds cached in the user cache directory
pub fn provider_for(root: &Path) -> FeedInstallationProvider {
    let file_system: Arc<dyn FileSystem> = Arc::new(PhysicalFileSystem::with_current_directory(root));
    match FeedCache::from_env() {
        Ok(cache) => FeedInstallationProvider::with_cache(file_system, cache),
        Err(e) => {
            debug!(error = %e, "no feed cache, git feeds disabled");
            FeedInstallationProvider::new(file_system)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::write_workspace_config;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_finds_enclosing_workspace() {
        let temp = TempDir::new().unwrap();
        write_workspace_config(temp.path(), &[], &[]);
        let nested = temp.path().join("scripts").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let resolved = resolve_workspace_path(Some(nested)).unwrap();
        assert_eq!(resolved, dunce::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn test_resolve_plain_directory() {
        let temp = TempDir::new().unwrap();
        let resolved = resolve_workspace_path(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(resolved, dunce::canonicalize(temp.path()).unwrap());
    }
}
