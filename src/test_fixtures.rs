//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Builders for the three things most tests need: PE images (managed and
//! native), package feeds on disk, and workspaces with a `scriptshell.yaml`.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{add_feed_package, managed_pe_image, write_workspace_config};
//!
//! #[test]
//! fn my_test() {
//!     let temp = TempDir::new().unwrap();
//!     std::fs::write(temp.path().join("bin/Acme.Packs.dll"), managed_pe_image()).unwrap();
//!     add_feed_package(&temp.path().join("feed"), "Acme.Json", "1.0.0", "");
//!     write_workspace_config(temp.path(), &["./feed"], &["System.Data"]);
//! }
//! ```

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

/// File offset of the PE signature in every generated image
const PE_OFFSET: usize = 0x40;

/// Build a minimal PE image
///
/// `pe32_plus` selects the optional header format; `cli` fills data directory 14
/// (the CLI runtime header) with `(rva, size)`.
#[must_use]
pub fn pe_image(pe32_plus: bool, cli: Option<(u32, u32)>) -> Vec<u8> {
    let (machine, optional_len, magic, rva_count_offset, directories_offset): (
        u16,
        u16,
        u16,
        usize,
        usize,
    ) = if pe32_plus {
        (0x8664, 240, 0x20B, 108, 112)
    } else {
        (0x14C, 224, 0x10B, 92, 96)
    };

    let optional_start = PE_OFFSET + 4 + 20;
    let mut image = vec![0u8; optional_start + usize::from(optional_len) + 64];

    image[0..2].copy_from_slice(b"MZ");
    image[0x3C..0x40].copy_from_slice(&(PE_OFFSET as u32).to_le_bytes());
    image[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");

    let coff = PE_OFFSET + 4;
    image[coff..coff + 2].copy_from_slice(&machine.to_le_bytes());
    image[coff + 16..coff + 18].copy_from_slice(&optional_len.to_le_bytes());

    let optional = optional_start;
    image[optional..optional + 2].copy_from_slice(&magic.to_le_bytes());
    image[optional + rva_count_offset..optional + rva_count_offset + 4]
        .copy_from_slice(&16u32.to_le_bytes());

    if let Some((rva, size)) = cli {
        let entry = optional + directories_offset + 14 * 8;
        image[entry..entry + 4].copy_from_slice(&rva.to_le_bytes());
        image[entry + 4..entry + 8].copy_from_slice(&size.to_le_bytes());
    }

    image
}

/// PE32 image with a CLI header
#[must_use]
pub fn managed_pe_image() -> Vec<u8> {
    pe_image(false, Some((0x2008, 0x48)))
}

/// PE32 image without a CLI header
#[must_use]
pub fn native_pe_image() -> Vec<u8> {
    pe_image(false, None)
}

/// Write `<feed>/<id>/<version>/package.yaml` and return the version directory
///
/// `extra_yaml` is appended to the generated `id`/`version` lines.
///
/// # Panics
///
/// Panics if the directory or file cannot be written.
pub fn add_feed_package(feed: &Path, id: &str, version: &str, extra_yaml: &str) -> PathBuf {
    let root = feed.join(id).join(version);
    std::fs::create_dir_all(&root).expect("Failed to create feed package directory");
    std::fs::write(
        root.join("package.yaml"),
        format!("id: {id}\nversion: \"{version}\"\n{extra_yaml}"),
    )
    .expect("Failed to write package.yaml");
    root
}

/// Write `scriptshell.yaml` with the given sources and references
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_workspace_config(root: &Path, sources: &[&str], references: &[&str]) {
    let config = crate::config::WorkspaceConfig {
        framework: None,
        sources: sources.iter().map(ToString::to_string).collect(),
        references: references.iter().map(ToString::to_string).collect(),
    };
    config.save(root).expect("Failed to write scriptshell.yaml");
}

/// Initialize a git repository at `path` with a single commit adding `file`
///
/// Returns the commit SHA.
///
/// # Panics
///
/// Panics if any git step fails.
pub fn create_git_repo_with_commit(path: &Path, file: &str, content: &str) -> String {
    let repo = git2::Repository::init(path).expect("Failed to init git repository");

    let file_path = path.join(file);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&file_path, content).expect("Failed to write file");

    let mut index = repo.index().expect("Failed to open index");
    index
        .add_path(Path::new(file))
        .expect("Failed to stage file");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");

    let signature =
        git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
    let oid = repo
        .commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
        .expect("Failed to commit");
    oid.to_string()
}
