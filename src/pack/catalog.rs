//! Capability registry mapping assemblies to the script packs they export
//!
//! Assemblies cannot be reflected over, so each pack-exporting assembly is
//! registered up front under its file stem (`Acme.Packs.dll` registers as
//! `Acme.Packs`). A discovered assembly only contributes packs when it is a
//! managed image and a module is registered for its name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assembly::header::{self, PeHeader};
use crate::error::{Result, discovery};
use crate::filesystem::FileSystem;

use super::ScriptPack;

/// Discovery function of one assembly
pub trait PackModule: Send + Sync {
    fn exports(&self) -> Result<Vec<Arc<dyn ScriptPack>>>;
}

struct FnModule<F>(F);

impl<F> PackModule for FnModule<F>
where
    F: Fn() -> Result<Vec<Arc<dyn ScriptPack>>> + Send + Sync,
{
    fn exports(&self) -> Result<Vec<Arc<dyn ScriptPack>>> {
        (self.0)()
    }
}

/// Registered pack modules, keyed by assembly name (case-insensitive)
#[derive(Clone, Default)]
pub struct PackCatalog {
    modules: HashMap<String, Arc<dyn PackModule>>,
}

impl PackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` for the assembly called `assembly`
    pub fn register(&mut self, assembly: &str, module: Arc<dyn PackModule>) -> &mut Self {
        self.modules.insert(assembly.to_lowercase(), module);
        self
    }

    /// Register a closure as the discovery function of `assembly`
    pub fn register_fn<F>(&mut self, assembly: &str, exports: F) -> &mut Self
    where
        F: Fn() -> Result<Vec<Arc<dyn ScriptPack>>> + Send + Sync + 'static,
    {
        self.register(assembly, Arc::new(FnModule(exports)))
    }

    pub fn module(&self, assembly: &str) -> Option<Arc<dyn PackModule>> {
        self.modules.get(&assembly.to_lowercase()).cloned()
    }

    /// Registered assembly names, sorted
    pub fn assemblies(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl std::fmt::Debug for PackCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackCatalog")
            .field("assemblies", &self.assemblies())
            .finish()
    }
}

/// One opened assembly: its verified header and its name
#[derive(Debug, Clone)]
pub struct AssemblyCatalog {
    path: PathBuf,
    name: String,
    header: PeHeader,
}

impl AssemblyCatalog {
    /// Read and validate the headers of the assembly at `path`
    pub fn open(file_system: &dyn FileSystem, path: &str) -> Result<Self> {
        let mut reader = file_system
            .open_read(Path::new(path))
            .map_err(|e| discovery::assembly_load_failed(path, e.to_string()))?;

        let header = header::read_pe_header(&mut reader)
            .map_err(|e| discovery::assembly_load_failed(path, e.to_string()))?;
        if !header.is_managed() {
            return Err(discovery::assembly_load_failed(path, "no CLI header"));
        }

        let name = Path::new(path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| discovery::assembly_load_failed(path, "no file name"))?;

        Ok(Self {
            path: PathBuf::from(path),
            name,
            header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &PeHeader {
        &self.header
    }

    /// Packs this assembly exports according to `catalog`
    pub fn exports(&self, catalog: &PackCatalog) -> Result<Vec<Arc<dyn ScriptPack>>> {
        match catalog.module(&self.name) {
            Some(module) => module
                .exports()
                .map_err(|e| discovery::pack_failed(&self.name, e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}
