//! Git feed errors

use super::ShellError;

/// Creates a git operation failed error
pub fn operation_failed(message: impl Into<String>) -> ShellError {
    ShellError::GitOperationFailed {
        message: message.into(),
    }
}

/// Creates a clone failed error
pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::GitCloneFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a ref resolve failed error
pub fn ref_resolve_failed(git_ref: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::GitRefResolveFailed {
        git_ref: git_ref.into(),
        reason: reason.into(),
    }
}

/// Creates a checkout failed error
pub fn checkout_failed(sha: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::GitCheckoutFailed {
        sha: sha.into(),
        reason: reason.into(),
    }
}
