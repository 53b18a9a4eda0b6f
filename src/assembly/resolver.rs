//! Candidate assembly enumeration for a workspace

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use walkdir::WalkDir;

use super::has_assembly_extension;
use crate::config::WorkspaceConfig;
use crate::error::{Result, config};
use crate::package::PackageAssemblyResolver;
use crate::workspace::BIN_DIR;

/// Enumerates candidate assembly paths for a directory
pub trait AssemblyResolver: Send + Sync {
    fn get_assembly_paths(&self, directory: &Path) -> Result<Vec<String>>;
}

/// Resolver over the standard workspace layout
///
/// Candidates come in three groups, in this order:
/// 1. assemblies of installed packages
/// 2. every `bin/**/*.dll|exe`, sorted by path
/// 3. `references` from `scriptshell.yaml`
///
/// Bare reference names (`System.Data`) are passed through untouched; anything
/// path-like is joined onto the workspace directory. Duplicates keep their first
/// position.
pub struct WorkspaceAssemblyResolver {
    packages: Arc<dyn PackageAssemblyResolver>,
}

impl WorkspaceAssemblyResolver {
    pub fn new(packages: Arc<dyn PackageAssemblyResolver>) -> Self {
        Self { packages }
    }
}

impl std::fmt::Debug for WorkspaceAssemblyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceAssemblyResolver")
            .finish_non_exhaustive()
    }
}

fn is_path_like(reference: &str) -> bool {
    reference.contains('/') || reference.contains('\\') || has_assembly_extension(Path::new(reference))
}

impl AssemblyResolver for WorkspaceAssemblyResolver {
    fn get_assembly_paths(&self, directory: &Path) -> Result<Vec<String>> {
        if !directory.is_dir() {
            return Err(config::workspace_unusable(
                directory.display().to_string(),
                "directory does not exist",
            ));
        }

        let mut candidates: Vec<String> = self
            .packages
            .get_assembly_paths(directory)?
            .into_iter()
            .map(|p| p.display().to_string())
            .collect();

        let mut local: Vec<String> = WalkDir::new(directory.join(BIN_DIR))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && has_assembly_extension(e.path()))
            .map(|e| e.path().display().to_string())
            .collect();
        local.sort();
        candidates.extend(local);

        let config = WorkspaceConfig::load(directory)?;
        for reference in config.references {
            let path = Path::new(&reference);
            if path.is_absolute() || !is_path_like(&reference) {
                candidates.push(reference);
            } else {
                candidates.push(directory.join(path).display().to_string());
            }
        }

        let mut seen = HashSet::new();
        candidates.retain(|candidate| seen.insert(candidate.clone()));
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::ManifestAssemblyResolver;
    use crate::test_fixtures::write_workspace_config;
    use tempfile::TempDir;

    fn resolver() -> WorkspaceAssemblyResolver {
        WorkspaceAssemblyResolver::new(Arc::new(ManifestAssemblyResolver::new()))
    }

    #[test]
    fn test_missing_directory_is_unusable() {
        let temp = TempDir::new().unwrap();
        let err = resolver()
            .get_assembly_paths(&temp.path().join("missing"))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_bin_then_references_deduplicated() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        std::fs::create_dir_all(bin.join("tools")).unwrap();
        std::fs::write(bin.join("Zeta.dll"), b"MZ").unwrap();
        std::fs::write(bin.join("Acme.Packs.DLL"), b"MZ").unwrap();
        std::fs::write(bin.join("tools/Runner.exe"), b"MZ").unwrap();
        std::fs::write(bin.join("notes.txt"), b"skip").unwrap();
        write_workspace_config(
            temp.path(),
            &[],
            &["System.Data", "bin/Zeta.dll", "System.Data"],
        );

        let paths = resolver().get_assembly_paths(temp.path()).unwrap();
        assert_eq!(
            paths,
            vec![
                bin.join("Acme.Packs.DLL").display().to_string(),
                bin.join("Zeta.dll").display().to_string(),
                bin.join("tools/Runner.exe").display().to_string(),
                "System.Data".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_workspace_has_no_candidates() {
        let temp = TempDir::new().unwrap();
        assert!(resolver().get_assembly_paths(temp.path()).unwrap().is_empty());
    }
}
