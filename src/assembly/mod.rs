//! Assembly discovery and classification
//!
//! - [`header`]: managed-code header inspection
//! - [`classifier`]: decides which candidates are eligible for script pack scanning
//! - [`resolver`]: enumerates candidate assembly paths for a workspace

pub mod classifier;
pub mod header;
pub mod resolver;

pub use classifier::AssemblyClassifier;
pub use resolver::{AssemblyResolver, WorkspaceAssemblyResolver};

/// File extensions treated as assemblies
pub const ASSEMBLY_EXTENSIONS: [&str; 2] = ["dll", "exe"];

/// Whether a path names an assembly by extension (case-insensitive)
pub fn has_assembly_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ASSEMBLY_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
