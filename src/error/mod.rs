//! Error types and handling for scriptshell
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Workspace configuration errors
//! - [`discovery`]: Assembly and script pack discovery errors
//! - [`install`]: Package resolution and installation errors
//! - [`state`]: Operations invoked before their prerequisites are ready
//! - [`fs`]: File system errors
//! - [`git`]: Git feed errors
//! - [`cache`]: Feed cache errors
//!
//! Every variant maps onto one [`ErrorKind`] so callers can tell a session-aborting
//! configuration problem from a recoverable discovery failure.

pub mod cache;
pub mod config;
pub mod discovery;
pub mod fs;
pub mod git;
pub mod install;
pub mod state;

#[cfg(test)]
mod tests;

use miette::Diagnostic;
use thiserror::Error;

/// Broad error category used by callers to decide how to surface a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Workspace unusable or required configuration missing; session creation aborts
    Configuration,
    /// A single assembly failed to load or reflect; recovered locally
    Discovery,
    /// A package could not be resolved, downloaded or materialized
    Installation,
    /// An operation ran before its prerequisite was ready
    State,
    /// Reading or writing the workspace failed
    FileSystem,
    /// A REPL command or script directive failed
    Script,
}

/// Main error type for scriptshell operations
#[derive(Error, Diagnostic, Debug)]
pub enum ShellError {
    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(
        code(scriptshell::config::parse_failed),
        help("Check the YAML syntax of scriptshell.yaml")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(scriptshell::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Workspace directory is not usable: {path}: {reason}")]
    #[diagnostic(
        code(scriptshell::config::workspace_unusable),
        help("Pass an existing, readable directory with --workspace")
    )]
    WorkspaceUnusable { path: String, reason: String },

    #[error("No repository sources configured for workspace: {path}")]
    #[diagnostic(
        code(scriptshell::config::no_sources),
        help("Add a 'sources:' list to scriptshell.yaml")
    )]
    NoRepositorySources { path: String },

    // Discovery errors
    #[error("Failed to load assembly '{path}': {reason}")]
    #[diagnostic(code(scriptshell::discovery::assembly_load_failed))]
    AssemblyLoadFailed { path: String, reason: String },

    #[error("Script pack discovery failed in '{assembly}': {reason}")]
    #[diagnostic(code(scriptshell::discovery::pack_failed))]
    PackDiscoveryFailed { assembly: String, reason: String },

    // Installation errors
    #[error("Package '{id}' not found in any configured source")]
    #[diagnostic(
        code(scriptshell::install::not_found),
        help("Check the package id and version, or run 'scriptshell search'")
    )]
    PackageNotFound { id: String },

    #[error("Failed to install package '{id}': {reason}")]
    #[diagnostic(code(scriptshell::install::failed))]
    InstallationFailed { id: String, reason: String },

    #[error("Circular package dependency detected: {chain}")]
    #[diagnostic(
        code(scriptshell::install::circular),
        help("Remove the circular dependency from the package manifests")
    )]
    CircularDependency { chain: String },

    #[error("Invalid package version: {input}")]
    #[diagnostic(
        code(scriptshell::install::invalid_version),
        help("Versions look like 1.2, 1.2.3, 1.2.3.4 or 1.2.3-beta.1")
    )]
    InvalidVersion { input: String },

    #[error("Invalid target framework: {input}")]
    #[diagnostic(
        code(scriptshell::install::invalid_framework),
        help("Use a short name such as net45, netstandard2.0 or net6.0")
    )]
    InvalidFramework { input: String },

    #[error("Repository source '{source_uri}' is unavailable: {reason}")]
    #[diagnostic(code(scriptshell::install::feed_unavailable))]
    FeedUnavailable { source_uri: String, reason: String },

    // State errors
    #[error("{component} used before it was initialized")]
    #[diagnostic(code(scriptshell::state::not_initialized))]
    NotInitialized { component: String },

    #[error("{component} has already been terminated")]
    #[diagnostic(code(scriptshell::state::terminated))]
    Terminated { component: String },

    // Script errors
    #[error("Unknown REPL command: :{name}")]
    #[diagnostic(
        code(scriptshell::script::unknown_command),
        help("Type :help to list the available commands")
    )]
    UnknownCommand { name: String },

    #[error("Failed to load script '{path}': {reason}")]
    #[diagnostic(code(scriptshell::script::load_failed))]
    ScriptLoadFailed { path: String, reason: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(scriptshell::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(scriptshell::git::clone_failed),
        help("Check that the feed URL is correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(scriptshell::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Failed to checkout commit '{sha}': {reason}")]
    #[diagnostic(code(scriptshell::git::checkout_failed))]
    GitCheckoutFailed { sha: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(scriptshell::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(scriptshell::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(
        code(scriptshell::fs::write_failed),
        help("Check that the workspace directory is writable")
    )]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(scriptshell::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(scriptshell::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl ShellError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigParseFailed { .. }
            | Self::ConfigInvalid { .. }
            | Self::WorkspaceUnusable { .. }
            | Self::NoRepositorySources { .. } => ErrorKind::Configuration,

            Self::AssemblyLoadFailed { .. } | Self::PackDiscoveryFailed { .. } => {
                ErrorKind::Discovery
            }

            Self::PackageNotFound { .. }
            | Self::InstallationFailed { .. }
            | Self::CircularDependency { .. }
            | Self::InvalidVersion { .. }
            | Self::InvalidFramework { .. }
            | Self::FeedUnavailable { .. }
            | Self::GitOperationFailed { .. }
            | Self::GitCloneFailed { .. }
            | Self::GitRefResolveFailed { .. }
            | Self::GitCheckoutFailed { .. }
            | Self::CacheOperationFailed { .. } => ErrorKind::Installation,

            Self::NotInitialized { .. } | Self::Terminated { .. } => ErrorKind::State,

            Self::UnknownCommand { .. } | Self::ScriptLoadFailed { .. } => ErrorKind::Script,

            Self::FileNotFound { .. }
            | Self::FileReadFailed { .. }
            | Self::FileWriteFailed { .. }
            | Self::IoError { .. } => ErrorKind::FileSystem,
        }
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ShellError {
    fn from(err: serde_yaml::Error) -> Self {
        ShellError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        ShellError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for ShellError {
    fn from(err: git2::Error) -> Self {
        git::operation_failed(err.message())
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ShellError>;
