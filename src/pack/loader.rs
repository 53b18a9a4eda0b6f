//! Script pack discovery over a filtered assembly list

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Result, discovery};
use crate::filesystem::FileSystem;

use super::{AssemblyCatalog, PackCatalog, ScriptPack};

/// Builds pack instances from assemblies, one catalog per assembly
///
/// A broken assembly (unreadable, not managed, failing or panicking module) is
/// logged and skipped; the rest of the list is still scanned.
pub struct ScriptPackLoader {
    file_system: Arc<dyn FileSystem>,
    catalog: Arc<PackCatalog>,
}

impl ScriptPackLoader {
    pub fn new(file_system: Arc<dyn FileSystem>, catalog: Arc<PackCatalog>) -> Self {
        Self {
            file_system,
            catalog,
        }
    }

    fn load_one(&self, path: &str) -> Result<Vec<Arc<dyn ScriptPack>>> {
        let assembly = AssemblyCatalog::open(self.file_system.as_ref(), path)?;
        catch_unwind(AssertUnwindSafe(|| assembly.exports(&self.catalog)))
            .unwrap_or_else(|_| Err(discovery::pack_failed(assembly.name(), "pack module panicked")))
    }

    /// Every pack exported by `paths`, in path order
    pub fn load(&self, paths: &[String]) -> Vec<Arc<dyn ScriptPack>> {
        let mut packs = Vec::new();

        for path in paths {
            match self.load_one(path) {
                Ok(exported) => {
                    debug!(assembly = %path, count = exported.len(), "scanned assembly");
                    packs.extend(exported);
                }
                Err(e) => {
                    warn!(assembly = %path, error = %e, "skipping assembly");
                }
            }
        }

        packs
    }
}

impl std::fmt::Debug for ScriptPackLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPackLoader")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
