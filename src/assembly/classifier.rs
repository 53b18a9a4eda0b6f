//! Assembly classifier
//!
//! Filters the candidate list down to the assemblies worth scanning for script
//! packs. Framework assemblies are referenced by bare name (`System.Data`) and are
//! already visible to the engine, so anything that is not a rooted path is
//! treated as one of those and skipped. This is a heuristic on the path string,
//! not a real global-assembly-cache membership test. Relative names are never
//! resolved against the disk, even when a matching file exists.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::header;
use crate::filesystem::FileSystem;

/// Decides whether a candidate path is a loadable managed assembly
#[derive(Clone)]
pub struct AssemblyClassifier {
    file_system: Arc<dyn FileSystem>,
}

impl AssemblyClassifier {
    pub fn new(file_system: Arc<dyn FileSystem>) -> Self {
        Self { file_system }
    }

    /// True when `path` is rooted and its header is a managed PE image
    pub fn should_load(&self, path: &str) -> bool {
        if !self.file_system.is_path_rooted(path) {
            debug!(assembly = path, "Skipping unrooted assembly reference");
            return false;
        }

        self.is_managed_assembly(path)
    }

    /// Header check only; unreadable files are not managed
    pub fn is_managed_assembly(&self, path: &str) -> bool {
        match self.file_system.open_read(Path::new(path)) {
            Ok(mut reader) => {
                let managed = header::is_managed_image(&mut reader);
                if !managed {
                    debug!(assembly = path, "Skipping non-managed binary");
                }
                managed
            }
            Err(e) => {
                debug!(assembly = path, error = %e, "Could not read assembly header");
                false
            }
        }
    }

    /// Keep only the candidates that should be scanned, preserving order
    pub fn filter<'a, I>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        candidates
            .into_iter()
            .filter(|path| self.should_load(path))
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for AssemblyClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyClassifier").finish_non_exhaustive()
    }
}
