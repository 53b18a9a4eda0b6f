//! Package resolution and installation errors

use super::ShellError;

/// Creates a package not found error
pub fn not_found(id: impl Into<String>) -> ShellError {
    ShellError::PackageNotFound { id: id.into() }
}

/// Creates an installation failed error
pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::InstallationFailed {
        id: id.into(),
        reason: reason.into(),
    }
}

/// Creates a circular dependency error
pub fn circular(chain: impl Into<String>) -> ShellError {
    ShellError::CircularDependency {
        chain: chain.into(),
    }
}

/// Creates an invalid version error
pub fn invalid_version(input: impl Into<String>) -> ShellError {
    ShellError::InvalidVersion {
        input: input.into(),
    }
}

/// Creates an invalid framework error
pub fn invalid_framework(input: impl Into<String>) -> ShellError {
    ShellError::InvalidFramework {
        input: input.into(),
    }
}

/// Creates a feed unavailable error
pub fn feed_unavailable(source: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::FeedUnavailable {
        source_uri: source.into(),
        reason: reason.into(),
    }
}
