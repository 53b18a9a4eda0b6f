//! Installed-package manifest (packages.lock)
//!
//! Records every package materialized under `packages/`, the files it
//! contributed and a BLAKE3 hash of its payload. Installed-state queries read
//! only this file and the payload directories.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, config, fs as fs_error};
use crate::package::{FrameworkName, PackageReference, PackageVersion};

/// Manifest filename
pub const MANIFEST_FILE: &str = "packages.lock";

/// One installed package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub id: String,
    pub version: PackageVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkName>,
    /// Repository source the payload came from
    pub source: String,
    /// BLAKE3 hash of the payload directory
    pub hash: String,
    /// Installed files, relative to the workspace root with forward slashes
    #[serde(default)]
    pub files: Vec<String>,
}

impl InstalledPackage {
    /// Payload directory name: `<id>.<version>`
    pub fn directory_name(&self) -> String {
        format!("{}.{}", self.id, self.version)
    }

    /// Whether this entry satisfies `reference`
    ///
    /// Unversioned references accept any installed version, prereleases only
    /// when `allow_prerelease` is set.
    pub fn satisfies(&self, reference: &PackageReference, allow_prerelease: bool) -> bool {
        if !reference.matches_id(&self.id) {
            return false;
        }

        let version_ok = match reference.version() {
            Some(wanted) => &self.version == wanted,
            None => allow_prerelease || !self.version.is_prerelease(),
        };

        let framework_ok = match (reference.framework(), &self.framework) {
            (Some(wanted), Some(installed)) => wanted == installed,
            _ => true,
        };

        version_ok && framework_ok
    }

    /// Absolute paths of the installed assemblies
    pub fn assembly_paths(&self, workspace_root: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|file| workspace_root.join(file))
            .filter(|path| crate::assembly::has_assembly_extension(path))
            .collect()
    }
}

/// Manifest of installed packages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub packages: Vec<InstalledPackage>,
}

impl PackageManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| config::parse_failed(MANIFEST_FILE, e.to_string()))
    }

    /// Serialize manifest to JSON string (pretty-printed)
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| config::parse_failed(MANIFEST_FILE, e.to_string()))
    }

    /// Load the manifest of a workspace directory; missing file is empty
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| fs_error::read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_json(&content)
    }

    /// Write the manifest into a workspace directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, self.to_json()?)
            .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))
    }

    /// First entry satisfying `reference`
    pub fn find(
        &self,
        reference: &PackageReference,
        allow_prerelease: bool,
    ) -> Option<&InstalledPackage> {
        self.packages
            .iter()
            .find(|p| p.satisfies(reference, allow_prerelease))
    }

    /// Add an entry, replacing any entry with the same id and version
    pub fn upsert(&mut self, package: InstalledPackage) {
        self.packages.retain(|existing| {
            !(existing.id.eq_ignore_ascii_case(&package.id) && existing.version == package.version)
        });
        self.packages.push(package);
    }
}
