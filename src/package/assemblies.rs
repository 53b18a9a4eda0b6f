//! Assemblies contributed by installed packages

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::PackageManifest;
use crate::error::Result;

/// Enumerates the assemblies of every package installed in a workspace
pub trait PackageAssemblyResolver: Send + Sync {
    fn get_assembly_paths(&self, workspace: &Path) -> Result<Vec<PathBuf>>;
}

/// Reads `packages.lock`; never touches a feed
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestAssemblyResolver;

impl ManifestAssemblyResolver {
    pub fn new() -> Self {
        Self
    }
}

impl PackageAssemblyResolver for ManifestAssemblyResolver {
    fn get_assembly_paths(&self, workspace: &Path) -> Result<Vec<PathBuf>> {
        let manifest = PackageManifest::load(workspace)?;

        let mut paths = Vec::new();
        for package in &manifest.packages {
            for path in package.assembly_paths(workspace) {
                if path.is_file() {
                    paths.push(path);
                } else {
                    debug!(package = %package.directory_name(), path = %path.display(), "installed assembly missing");
                }
            }
        }
        Ok(paths)
    }
}
