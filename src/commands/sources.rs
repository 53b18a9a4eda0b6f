//! Sources command implementation

use std::path::PathBuf;

use console::Style;

use crate::commands::helpers::{provider_for, resolve_workspace_path};
use crate::error::Result;
use crate::package::{InstallationProvider, RepositorySource};

/// Run sources command
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let root = resolve_workspace_path(workspace)?;
    let sources = provider_for(&root).get_repository_sources(&root)?;

    if sources.is_empty() {
        println!("No repository sources configured.");
        println!("\nAdd a 'sources:' list to scriptshell.yaml.");
        return Ok(());
    }

    println!("Repository sources ({}), in search order:", sources.len());
    for (index, source) in sources.iter().enumerate() {
        let kind = match RepositorySource::parse(source, &root) {
            Ok(RepositorySource::Local(path)) => format!("directory {}", path.display()),
            Ok(RepositorySource::Git { url, git_ref }) => match git_ref {
                Some(git_ref) => format!("git {url} at {git_ref}"),
                None => format!("git {url}"),
            },
            Err(e) => Style::new().red().apply_to(e.to_string()).to_string(),
        };
        println!(
            "  {}. {}",
            index + 1,
            Style::new().bold().apply_to(source)
        );
        println!("     {}", Style::new().dim().apply_to(kind));
    }

    Ok(())
}
