//! Search command implementation
//!
//! Feed reads can block on git fetches, so the search runs on a worker thread
//! while a spinner is shown.

use std::path::PathBuf;
use std::sync::Arc;

use console::Style;

use crate::cli::SearchArgs;
use crate::commands::helpers::{provider_for, resolve_workspace_path};
use crate::error::{Result, fs};
use crate::package::{InstallationProvider, PackageInfo};
use crate::progress::Spinner;

/// Run search command
pub fn run(workspace: Option<PathBuf>, args: SearchArgs) -> Result<()> {
    let root = resolve_workspace_path(workspace)?;
    let provider = Arc::new(provider_for(&root));
    provider.initialize()?;

    let filter = args.filter.unwrap_or_default();
    let spinner = Spinner::start(if filter.trim().is_empty() {
        "Listing packages...".to_string()
    } else {
        format!("Searching for '{}'...", filter.trim())
    });

    let worker = Arc::clone(&provider);
    let (page, page_size) = (args.page, args.page_size);
    let handle = std::thread::spawn(move || worker.search_packages(&filter, page, page_size));
    let joined = handle.join();
    spinner.finish();

    let packages = match joined {
        Ok(result) => result?,
        Err(_) => return Err(fs::io_error("search worker panicked")),
    };

    print_packages(&packages, page);
    Ok(())
}

fn print_packages(packages: &[PackageInfo], page: usize) {
    if packages.is_empty() {
        println!("No packages found.");
        return;
    }

    println!("Packages (page {page}):");
    println!();
    for package in packages {
        println!(
            "  {} {}",
            Style::new().bold().yellow().apply_to(&package.id),
            package.text_version()
        );
        if !package.title.is_empty() && package.title != package.id {
            println!("    {}", package.title);
        }
        if !package.description.is_empty() {
            println!("    {}", package.description);
        }

        let mut facts = vec![format!("{} downloads", package.download_count)];
        if !package.authors.is_empty() {
            facts.push(format!("by {}", package.authors_display()));
        }
        if let Some(date) = package.published_date() {
            facts.push(format!("published {date}"));
        }
        println!("    {}", Style::new().dim().apply_to(facts.join(", ")));
    }
}
