//! Assembly and script pack discovery errors

use super::ShellError;

/// Creates an assembly load failed error
pub fn assembly_load_failed(path: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::AssemblyLoadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a pack discovery failed error
pub fn pack_failed(assembly: impl Into<String>, reason: impl Into<String>) -> ShellError {
    ShellError::PackDiscoveryFailed {
        assembly: assembly.into(),
        reason: reason.into(),
    }
}
