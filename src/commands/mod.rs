//! Command implementations for the scriptshell CLI

pub mod assemblies;
pub mod cache;
pub mod completions;
pub mod helpers;
pub mod install;
pub mod list;
pub mod repl;
pub mod search;
pub mod sources;
pub mod version;
