//! Cache errors

use super::ShellError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> ShellError {
    ShellError::CacheOperationFailed {
        message: message.into(),
    }
}
