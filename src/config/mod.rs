//! Configuration file handling
//!
//! This module handles parsing and serialization of:
//! - scriptshell.yaml: workspace configuration (sources, references, framework)
//! - packages.lock: manifest of installed packages

pub mod manifest;
pub mod workspace;

pub use manifest::{InstalledPackage, PackageManifest};
pub use workspace::WorkspaceConfig;
