//! Transaction support for package installation
//!
//! An install writes payload directories and rewrites `packages.lock`; if any
//! step fails the workspace goes back to how it looked before the install.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new(&workspace.root);
//! transaction.backup_manifest()?;
//!
//! transaction.track_package_dir(&dir);
//! // copy payload...
//!
//! // On success:
//! transaction.commit();
//!
//! // On error, rollback happens when the transaction is dropped
//! ```

#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::manifest::MANIFEST_FILE;
use crate::error::{Result, ShellError};

/// Manifest content captured before the install started
#[derive(Debug, Clone)]
enum ManifestBackup {
    /// No manifest existed; rollback deletes whatever got written
    Absent(PathBuf),
    Present { path: PathBuf, content: Vec<u8> },
}

/// A transaction for atomic installs
#[derive(Debug)]
pub struct Transaction {
    root: PathBuf,

    manifest_backup: Option<ManifestBackup>,

    /// Package directories created during this transaction, removed recursively
    package_dirs: Vec<PathBuf>,

    committed: bool,
}

impl Transaction {
    /// Create a new transaction for the workspace at `root`
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            manifest_backup: None,
            package_dirs: Vec::new(),
            committed: false,
        }
    }

    /// Back up `packages.lock`
    ///
    /// Call before any step that may rewrite the manifest.
    pub fn backup_manifest(&mut self) -> Result<()> {
        let path = self.root.join(MANIFEST_FILE);
        let backup = if path.exists() {
            let content = fs::read(&path).map_err(|e| ShellError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            ManifestBackup::Present { path, content }
        } else {
            ManifestBackup::Absent(path)
        };
        self.manifest_backup = Some(backup);
        Ok(())
    }

    /// Track a package directory created during this transaction
    ///
    /// Only directories that did not exist beforehand should be tracked.
    pub fn track_package_dir(&mut self, path: impl Into<PathBuf>) {
        self.package_dirs.push(path.into());
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo everything this transaction recorded
    pub fn rollback(&mut self) {
        if self.committed {
            return;
        }

        for dir in self.package_dirs.iter().rev() {
            if dir.exists() {
                if let Err(e) = fs::remove_dir_all(dir) {
                    warn!(path = %dir.display(), error = %e, "failed to remove package directory");
                }
            }
        }
        self.package_dirs.clear();

        match self.manifest_backup.take() {
            Some(ManifestBackup::Present { path, content }) => {
                if let Err(e) = fs::write(&path, content) {
                    warn!(path = %path.display(), error = %e, "failed to restore manifest");
                }
            }
            Some(ManifestBackup::Absent(path)) => {
                if path.exists() {
                    if let Err(e) = fs::remove_file(&path) {
                        warn!(path = %path.display(), error = %e, "failed to remove manifest");
                    }
                }
            }
            None => {}
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}
