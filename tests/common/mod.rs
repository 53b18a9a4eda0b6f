//! Common test utilities for scriptshell integration tests

#![allow(dead_code, clippy::expect_used)]

use std::path::PathBuf;
use tempfile::TempDir;

/// A workspace next to a local feed, both inside one temp directory
///
/// ```text
/// <temp>/
/// ├── ws/      # workspace root
/// └── feed/    # directory feed, configured as "../feed"
/// ```
pub struct TestWorkspace {
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
    /// Path to the local feed
    pub feed: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("ws");
        let feed = temp.path().join("feed");
        std::fs::create_dir_all(&path).expect("Failed to create workspace directory");
        std::fs::create_dir_all(&feed).expect("Failed to create feed directory");
        Self { temp, path, feed }
    }

    /// Write `scriptshell.yaml`
    pub fn write_config(&self, sources: &[&str], references: &[&str]) {
        let mut yaml = String::new();
        if !sources.is_empty() {
            yaml.push_str("sources:\n");
            for source in sources {
                yaml.push_str(&format!("  - \"{source}\"\n"));
            }
        }
        if !references.is_empty() {
            yaml.push_str("references:\n");
            for reference in references {
                yaml.push_str(&format!("  - \"{reference}\"\n"));
            }
        }
        self.write_file("scriptshell.yaml", &yaml);
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        self.write_bytes(path, content.as_bytes());
    }

    /// Write raw bytes in workspace
    pub fn write_bytes(&self, path: &str, content: &[u8]) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Add `<feed>/<id>/<version>/package.yaml` with one net45 assembly
    pub fn add_package(&self, id: &str, version: &str, extra_yaml: &str) -> PathBuf {
        let root = self.feed.join(id).join(version);
        let lib = root.join("lib").join("net45");
        std::fs::create_dir_all(&lib).expect("Failed to create package directory");
        std::fs::write(
            root.join("package.yaml"),
            format!("id: {id}\nversion: \"{version}\"\n{extra_yaml}"),
        )
        .expect("Failed to write package.yaml");
        std::fs::write(lib.join(format!("{id}.dll")), managed_pe_image())
            .expect("Failed to write package assembly");
        root
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal PE32 image; `cli` marks it as a managed assembly
pub fn pe_image(cli: bool) -> Vec<u8> {
    const PE_OFFSET: usize = 0x40;
    let optional = PE_OFFSET + 4 + 20;
    let mut image = vec![0u8; optional + 224 + 64];

    image[0..2].copy_from_slice(b"MZ");
    image[0x3C..0x40].copy_from_slice(&(PE_OFFSET as u32).to_le_bytes());
    image[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");
    image[PE_OFFSET + 4..PE_OFFSET + 6].copy_from_slice(&0x14Cu16.to_le_bytes());
    image[PE_OFFSET + 20..PE_OFFSET + 22].copy_from_slice(&224u16.to_le_bytes());
    image[optional..optional + 2].copy_from_slice(&0x10Bu16.to_le_bytes());
    image[optional + 92..optional + 96].copy_from_slice(&16u32.to_le_bytes());

    if cli {
        let entry = optional + 96 + 14 * 8;
        image[entry..entry + 4].copy_from_slice(&0x2008u32.to_le_bytes());
        image[entry + 4..entry + 8].copy_from_slice(&0x48u32.to_le_bytes());
    }
    image
}

pub fn managed_pe_image() -> Vec<u8> {
    pe_image(true)
}

pub fn native_pe_image() -> Vec<u8> {
    pe_image(false)
}
