//! Install command implementation
//!
//! The installation process:
//! 1. Resolve and open the workspace
//! 2. Resolve the reference against the configured feeds
//! 3. Install dependencies first, then the package itself
//! 4. Record everything in packages.lock (or roll back on error)

use std::collections::HashSet;
use std::path::PathBuf;

use console::Style;

use crate::cli::InstallArgs;
use crate::commands::helpers::{provider_for, resolve_workspace_path};
use crate::config::PackageManifest;
use crate::error::Result;
use crate::package::{FrameworkName, InstallationProvider, PackageReference, PackageVersion};
use crate::progress::Spinner;

/// Run install command
pub fn run(workspace: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let root = resolve_workspace_path(workspace)?;
    let framework = args
        .framework
        .as_deref()
        .map(FrameworkName::parse)
        .transpose()?;
    let version = args
        .version
        .as_deref()
        .map(PackageVersion::parse)
        .transpose()?;
    let reference = PackageReference::new(args.id, framework, version);

    let provider = provider_for(&root);
    provider.initialize()?;

    if provider.is_installed(&reference, args.prerelease)? {
        println!("{reference} is already installed.");
        return Ok(());
    }

    let before: HashSet<String> = PackageManifest::load(&root)?
        .packages
        .iter()
        .map(|p| p.directory_name())
        .collect();

    let spinner = Spinner::start(format!("Installing {reference}..."));
    let result = provider.install_package(&reference, args.prerelease);
    spinner.finish();
    result?;

    let manifest = PackageManifest::load(&root)?;
    let added: Vec<_> = manifest
        .packages
        .iter()
        .filter(|p| !before.contains(&p.directory_name()))
        .collect();

    println!(
        "{} {} package{}:",
        Style::new().green().bold().apply_to("Installed"),
        added.len(),
        if added.len() == 1 { "" } else { "s" }
    );
    for package in added {
        println!(
            "  {} {} ({} files)",
            Style::new().bold().yellow().apply_to(&package.id),
            package.version,
            package.files.len()
        );
    }

    Ok(())
}
