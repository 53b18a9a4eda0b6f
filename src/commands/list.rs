//! List command implementation
//!
//! Lists installed packages from packages.lock; `--verify` re-hashes each
//! payload directory and compares it with the recorded hash.

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::commands::helpers::resolve_workspace_path;
use crate::config::InstalledPackage;
use crate::error::{Result, install};
use crate::hash;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Intact,
    Modified,
    Missing,
}

/// Run list command
pub fn run(workspace: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let root = resolve_workspace_path(workspace)?;
    let workspace = Workspace::open(&root)?;
    list_packages(&workspace, args.verify)
}

fn verify(workspace: &Workspace, package: &InstalledPackage) -> Result<Verdict> {
    let dir = workspace.package_dir(&package.id, &package.version);
    if !dir.is_dir() {
        return Ok(Verdict::Missing);
    }
    let actual = hash::hash_directory(&dir)?;
    Ok(if hash::verify_hash(&package.hash, &actual) {
        Verdict::Intact
    } else {
        Verdict::Modified
    })
}

fn list_packages(workspace: &Workspace, check: bool) -> Result<()> {
    let packages = &workspace.manifest.packages;
    if packages.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }

    println!("Installed packages ({}):", packages.len());
    println!();

    let mut broken = Vec::new();
    for package in packages {
        let framework = package
            .framework
            .as_ref()
            .map(|fw| format!(" [{fw}]"))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            Style::new().bold().yellow().apply_to(&package.id),
            package.version,
            framework
        );
        println!("    {} {}", Style::new().bold().apply_to("Source:"), package.source);
        println!("    {} {}", Style::new().bold().apply_to("Files:"), package.files.len());

        if check {
            let verdict = verify(workspace, package)?;
            let label = match verdict {
                Verdict::Intact => Style::new().green().apply_to("intact"),
                Verdict::Modified => Style::new().red().apply_to("modified"),
                Verdict::Missing => Style::new().red().apply_to("missing"),
            };
            println!("    {} {}", Style::new().bold().apply_to("Payload:"), label);
            if verdict != Verdict::Intact {
                broken.push(package.directory_name());
            }
        }
        println!();
    }

    if !broken.is_empty() {
        return Err(install::failed(
            broken.join(", "),
            "payload does not match packages.lock; reinstall the package",
        ));
    }
    Ok(())
}
