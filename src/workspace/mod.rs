//! Workspace layout and loading
//!
//! ## Workspace Structure
//!
//! ```text
//! <workspace>/
//! ├── scriptshell.yaml        # sources, references, target framework
//! ├── packages.lock           # installed package manifest
//! ├── packages/
//! │   └── <id>.<version>/     # materialized package payloads
//! │       ├── lib/<framework>/*.dll
//! │       └── content/**
//! └── bin/                    # local assemblies scanned for script packs
//! ```

use std::path::{Path, PathBuf};

use crate::config::{PackageManifest, WorkspaceConfig};
use crate::config::workspace::CONFIG_FILE;
use crate::error::{Result, ShellError};
use crate::package::{FrameworkName, PackageVersion};

/// Installed packages subdirectory
pub const PACKAGES_DIR: &str = "packages";

/// Local assemblies subdirectory
pub const BIN_DIR: &str = "bin";

/// A loaded workspace directory
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace
    pub root: PathBuf,

    /// Workspace configuration (scriptshell.yaml)
    pub config: WorkspaceConfig,

    /// Installed packages (packages.lock)
    pub manifest: PackageManifest,
}

impl Workspace {
    /// Whether `root` carries a workspace configuration file
    pub fn exists(root: &Path) -> bool {
        root.join(CONFIG_FILE).is_file()
    }

    /// Find a workspace by searching upward from the given path
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if Self::exists(&current) {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Open the workspace at `root`
    ///
    /// Any existing directory is a workspace; missing files load as defaults.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(ShellError::WorkspaceUnusable {
                path: root.display().to_string(),
                reason: "directory does not exist".to_string(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            config: WorkspaceConfig::load(root)?,
            manifest: PackageManifest::load(root)?,
        })
    }

    /// Target framework from the configuration
    pub fn target_framework(&self) -> Result<FrameworkName> {
        self.config.target_framework()
    }

    /// Directory holding all installed packages
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join(PACKAGES_DIR)
    }

    /// Payload directory of one package version
    pub fn package_dir(&self, id: &str, version: &PackageVersion) -> PathBuf {
        self.packages_dir().join(format!("{id}.{version}"))
    }

    /// Directory holding local assemblies
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Persist the manifest
    pub fn save_manifest(&self) -> Result<()> {
        self.manifest.save(&self.root)
    }
}
