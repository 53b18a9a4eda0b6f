//! Configuration errors

use super::ShellError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> ShellError {
    ShellError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a workspace unusable error
pub fn workspace_unusable(path: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::WorkspaceUnusable {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a no repository sources error
pub fn no_sources(path: impl Into<String>) -> ShellError {
    ShellError::NoRepositorySources { path: path.into() }
}
