//! File-system abstraction shared by the executor factory, the classifier and
//! the package provider
//!
//! The current directory lives inside the abstraction rather than the process so
//! that one process can host sessions for different workspaces, and so tests can
//! point a session at a temp dir without touching `std::env::set_current_dir`.

use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Result, ShellError};

/// Anything that can be read and seeked, used for header inspection
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// File-system collaborator
pub trait FileSystem: Send + Sync {
    /// Directory every relative path is resolved against
    fn current_directory(&self) -> PathBuf;

    /// Replace the current directory. Performs no validation.
    fn set_current_directory(&self, path: &Path);

    /// Syntactic rootedness test; never touches the disk
    fn is_path_rooted(&self, path: &str) -> bool {
        Path::new(path).is_absolute()
    }

    /// Whether a path exists, relative paths resolved against the current directory
    fn exists(&self, path: &Path) -> bool;

    /// Whether a path is an existing directory
    fn is_directory(&self, path: &Path) -> bool;

    /// Open a file for reading
    fn open_read(&self, path: &Path) -> Result<Box<dyn ReadSeek>>;

    /// Read a whole file as UTF-8
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// `FileSystem` backed by the real disk
#[derive(Debug)]
pub struct PhysicalFileSystem {
    current: RwLock<PathBuf>,
}

impl PhysicalFileSystem {
    /// Create a file system rooted at the process working directory
    pub fn new() -> Self {
        let current = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_current_directory(current)
    }

    /// Create a file system rooted at `path`
    pub fn with_current_directory(path: impl Into<PathBuf>) -> Self {
        Self {
            current: RwLock::new(path.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_directory().join(path)
        }
    }
}

impl Default for PhysicalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for PhysicalFileSystem {
    fn current_directory(&self) -> PathBuf {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_current_directory(&self, path: &Path) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = path.to_path_buf();
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn ReadSeek>> {
        let resolved = self.resolve(path);
        let file = File::open(&resolved).map_err(|e| ShellError::FileReadFailed {
            path: resolved.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(file))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let resolved = self.resolve(path);
        fs::read_to_string(&resolved).map_err(|e| ShellError::FileReadFailed {
            path: resolved.display().to_string(),
            reason: e.to_string(),
        })
    }
}
