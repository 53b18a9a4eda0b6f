//! Assemblies command implementation
//!
//! Shows every candidate the workspace resolver produces together with the
//! classifier's verdict, i.e. which ones a REPL session scans for script packs.

use std::path::PathBuf;
use std::sync::Arc;

use console::Style;

use crate::assembly::{AssemblyClassifier, AssemblyResolver, WorkspaceAssemblyResolver};
use crate::commands::helpers::resolve_workspace_path;
use crate::error::Result;
use crate::filesystem::{FileSystem, PhysicalFileSystem};
use crate::package::ManifestAssemblyResolver;

/// Run assemblies command
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let root = resolve_workspace_path(workspace)?;
    let file_system: Arc<dyn FileSystem> =
        Arc::new(PhysicalFileSystem::with_current_directory(&root));
    let resolver = WorkspaceAssemblyResolver::new(Arc::new(ManifestAssemblyResolver::new()));
    let classifier = AssemblyClassifier::new(Arc::clone(&file_system));

    let candidates = resolver.get_assembly_paths(&root)?;
    if candidates.is_empty() {
        println!("No candidate assemblies.");
        return Ok(());
    }

    let mut scanned = 0;
    println!("Candidate assemblies ({}):", candidates.len());
    for candidate in &candidates {
        let verdict = if !file_system.is_path_rooted(candidate) {
            Style::new().dim().apply_to("framework reference")
        } else if classifier.is_managed_assembly(candidate) {
            scanned += 1;
            Style::new().green().apply_to("scanned")
        } else {
            Style::new().yellow().apply_to("not managed")
        };
        println!("  {candidate}  {verdict}");
    }
    println!();
    println!("{scanned} of {} scanned for script packs.", candidates.len());

    Ok(())
}
