//! Directory feeds
//!
//! ## Feed Layout
//!
//! ```text
//! <feed>/
//! └── <id>/
//!     └── <version>/
//!         ├── package.yaml
//!         ├── lib/
//!         │   ├── Acme.Core.dll          # framework-neutral
//!         │   └── <framework>/*.dll|exe
//!         └── content/**
//! ```
//!
//! Git-hosted feeds use the same layout once checked out into the cache.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::assembly::has_assembly_extension;
use crate::error::{Result, config, fs, install};

use super::{FrameworkName, LibFile, PackageDependency, PackageInfo, PackageVersion};

/// Package metadata file inside each version directory
pub const PACKAGE_FILE: &str = "package.yaml";

const LIB_DIR: &str = "lib";
const CONTENT_DIR: &str = "content";

/// On-disk shape of `package.yaml`
#[derive(Debug, Deserialize)]
struct PackageSpec {
    id: String,
    version: PackageVersion,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    download_count: u64,
    #[serde(default)]
    published: Option<DateTime<Utc>>,
    #[serde(default)]
    icon_url: Option<String>,
    #[serde(default)]
    framework_assemblies: Vec<String>,
    #[serde(default)]
    dependencies: Vec<PackageDependency>,
}

/// One package version as stored in a feed
#[derive(Debug, Clone)]
pub struct FeedPackage {
    pub info: PackageInfo,
    pub dependencies: Vec<PackageDependency>,
    /// Version directory holding `package.yaml`, `lib/` and `content/`
    pub root: PathBuf,
}

/// A feed rooted in a local directory
#[derive(Debug, Clone)]
pub struct LocalFeed {
    root: PathBuf,
    source: String,
}

fn relative_slash_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn scan_lib_files(package_root: &Path) -> Vec<LibFile> {
    let lib_root = package_root.join(LIB_DIR);
    let mut files = Vec::new();

    for entry in WalkDir::new(&lib_root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_assembly_extension(e.path()))
    {
        let framework = if entry.depth() == 1 {
            None
        } else {
            let folder = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match FrameworkName::parse(&folder) {
                Ok(framework) => Some(framework),
                Err(_) => {
                    debug!(folder = %folder, path = %entry.path().display(), "ignoring unknown framework folder");
                    continue;
                }
            }
        };

        files.push(LibFile {
            framework,
            path: relative_slash_path(entry.path(), package_root),
        });
    }

    files
}

fn scan_content_files(package_root: &Path) -> Vec<String> {
    WalkDir::new(package_root.join(CONTENT_DIR))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| relative_slash_path(e.path(), package_root))
        .collect()
}

/// Whether `id` can name a directory under `packages/` as-is
pub fn is_safe_package_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// The declared id must be usable as a path and match its `<id>` directory
fn check_package_id(id: &str, version_root: &Path) -> std::result::Result<(), String> {
    if !is_safe_package_id(id) {
        return Err(format!("invalid package id '{id}'"));
    }
    let directory = version_root
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    if !id.eq_ignore_ascii_case(directory) {
        return Err(format!(
            "package id '{id}' does not match its directory '{directory}'"
        ));
    }
    Ok(())
}

impl LocalFeed {
    /// Open the feed directory at `root`, labelled `source` in results
    pub fn open(root: &Path, source: &str) -> Result<Self> {
        if !root.is_dir() {
            return Err(install::feed_unavailable(
                source,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self {
            root: root.to_path_buf(),
            source: source.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every package version in the feed
    ///
    /// Unreadable or malformed `package.yaml` files are skipped with a warning.
    pub fn packages(&self) -> Vec<FeedPackage> {
        WalkDir::new(&self.root)
            .min_depth(3)
            .max_depth(3)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == PACKAGE_FILE)
            .filter_map(|entry| match self.load_package(entry.path()) {
                Ok(package) => Some(package),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping malformed package");
                    None
                }
            })
            .collect()
    }

    /// All versions of `id` (case-insensitive), unordered
    pub fn versions_of(&self, id: &str) -> Vec<FeedPackage> {
        self.packages()
            .into_iter()
            .filter(|p| p.info.id.eq_ignore_ascii_case(id))
            .collect()
    }

    fn load_package(&self, spec_path: &Path) -> Result<FeedPackage> {
        let content =
            std::fs::read_to_string(spec_path)
                .map_err(|e| fs::read_failed(spec_path.display().to_string(), e.to_string()))?;
        let spec: PackageSpec =
            serde_yaml::from_str(&content)
                .map_err(|e| config::parse_failed(spec_path.display().to_string(), e.to_string()))?;

        let root = spec_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        check_package_id(&spec.id, &root)
            .map_err(|reason| config::parse_failed(spec_path.display().to_string(), reason))?;

        let info = PackageInfo {
            title: spec.title.unwrap_or_else(|| spec.id.clone()),
            id: spec.id,
            version: spec.version,
            description: spec.description,
            download_count: spec.download_count,
            authors: spec.authors,
            published: spec.published,
            icon_url: spec.icon_url,
            framework_assemblies: spec.framework_assemblies,
            lib_files: scan_lib_files(&root),
            content_files: scan_content_files(&root),
            source: self.source.clone(),
        };

        Ok(FeedPackage {
            info,
            dependencies: spec.dependencies,
            root,
        })
    }
}
