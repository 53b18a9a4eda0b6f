//! Errors for operations invoked before (or after) their resource is ready

use super::ShellError;

/// Creates a not initialized error
pub fn not_initialized(component: impl Into<String>) -> ShellError {
    ShellError::NotInitialized {
        component: component.into(),
    }
}

/// Creates a terminated error
pub fn terminated(component: impl Into<String>) -> ShellError {
    ShellError::Terminated {
        component: component.into(),
    }
}
