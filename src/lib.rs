//! scriptshell - interactive script host
//!
//! Given a workspace directory, scriptshell discovers the assemblies visible to
//! scripts, composes script packs out of the loadable ones, and runs a REPL
//! session over a pluggable script engine. Packages from directory or git feeds
//! are searched and installed into the workspace.
//!
//! The entry point for embedders is [`repl::ReplExecutorFactory`]:
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use scriptshell::filesystem::PhysicalFileSystem;
//! use scriptshell::host::StdConsole;
//! use scriptshell::pack::PackCatalog;
//! use scriptshell::repl::{ReplExecutorFactory, ScriptServices};
//!
//! let services = ScriptServices::with_defaults(
//!     Arc::new(PhysicalFileSystem::new()),
//!     Arc::new(StdConsole),
//!     PackCatalog::new(),
//! );
//! let factory = ReplExecutorFactory::new(services, Vec::new());
//! let mut executor = factory.create(Path::new("."))?;
//! executor.execute("[1, 2, 3]")?;
//! # Ok::<(), scriptshell::error::ShellError>(())
//! ```

pub mod assembly;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod hash;
pub mod host;
pub mod pack;
pub mod package;
pub mod progress;
pub mod repl;
pub mod transaction;
pub mod workspace;

#[cfg(test)]
mod test_fixtures;
