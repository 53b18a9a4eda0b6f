//! Error type tests
//!
//! Tests for ShellError, its conversions and its taxonomy mapping.

#![allow(clippy::expect_used)]

use crate::error::{ErrorKind, ShellError};
use crate::error::{cache, config, discovery, fs, git, install, state};
use miette::Diagnostic;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_error_display() {
    let err = install::not_found("Acme.Json");
    assert_eq!(
        err.to_string(),
        "Package 'Acme.Json' not found in any configured source"
    );
}

#[test]
fn test_error_code() {
    let err = install::not_found("Acme.Json");
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("scriptshell::install::not_found".to_string())
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ShellError = io_err.into();
    assert!(matches!(err, ShellError::IoError { .. }));
    assert_eq!(err.kind(), ErrorKind::FileSystem);
}

#[test]
fn test_yaml_error_conversion() {
    let parse_result: std::result::Result<serde_yaml::Value, _> =
        serde_yaml::from_str("invalid: yaml: content: [unclosed");
    let err: ShellError = parse_result.expect_err("yaml should not parse").into();
    assert!(matches!(err, ShellError::ConfigParseFailed { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_json_error_conversion() {
    let parse_result: std::result::Result<serde_json::Value, _> =
        serde_json::from_str("invalid json content");
    let err: ShellError = parse_result.expect_err("json should not parse").into();
    assert!(matches!(err, ShellError::ConfigParseFailed { .. }));
}

#[test]
fn test_git_error_conversion() {
    let err: ShellError = git2::Error::from_str("git error").into();
    assert!(matches!(err, ShellError::GitOperationFailed { .. }));
    assert_eq!(err.kind(), ErrorKind::Installation);
}

#[test]
fn test_kind_taxonomy() {
    assert_eq!(
        config::workspace_unusable("/nope", "missing").kind(),
        ErrorKind::Configuration
    );
    assert_eq!(config::no_sources("/ws").kind(), ErrorKind::Configuration);
    assert_eq!(
        discovery::assembly_load_failed("/ws/bin/a.dll", "truncated").kind(),
        ErrorKind::Discovery
    );
    assert_eq!(
        discovery::pack_failed("Acme.Packs", "boom").kind(),
        ErrorKind::Discovery
    );
    assert_eq!(
        install::failed("Acme.Json", "disk full").kind(),
        ErrorKind::Installation
    );
    assert_eq!(
        state::not_initialized("Package provider").kind(),
        ErrorKind::State
    );
    assert_eq!(state::terminated("REPL executor").kind(), ErrorKind::State);
    assert_eq!(
        fs::write_failed("/ws/packages.lock", "read-only").kind(),
        ErrorKind::FileSystem
    );
    assert_eq!(
        ShellError::UnknownCommand {
            name: "nope".to_string()
        }
        .kind(),
        ErrorKind::Script
    );
    assert_eq!(
        cache::operation_failed("locked").kind(),
        ErrorKind::Installation
    );
}

test_error_contains!(
    test_not_initialized_error,
    state::not_initialized("Package provider"),
    "Package provider",
    "before it was initialized"
);

test_error_contains!(
    test_no_sources_error,
    config::no_sources("/work/space"),
    "No repository sources",
    "/work/space"
);

test_error_contains!(
    test_circular_dependency_error,
    install::circular("A -> B -> A"),
    "Circular package dependency",
    "A -> B -> A"
);

test_error_contains!(
    test_feed_unavailable_error,
    install::feed_unavailable("ftp://feed", "unsupported scheme"),
    "ftp://feed",
    "unsupported scheme"
);

test_error_contains!(
    test_clone_failed_error,
    git::clone_failed("https://example.com/feed.git", "Repository not found"),
    "Failed to clone repository",
    "Repository not found"
);

test_error_contains!(
    test_invalid_version_error,
    install::invalid_version("1.x"),
    "Invalid package version: 1.x"
);

test_error_contains!(
    test_file_read_failed_error,
    fs::read_failed("/ws/bin/a.dll", "permission denied"),
    "Failed to read file",
    "permission denied"
);

test_error_contains!(
    test_io_error,
    fs::io_error("some error"),
    "IO error: some error"
);

test_error_contains!(
    test_config_parse_failed_error,
    config::parse_failed("scriptshell.yaml", "bad indent"),
    "Failed to parse configuration file"
);

test_error_contains!(
    test_invalid_framework_error,
    install::invalid_framework("java8"),
    "Invalid target framework"
);

test_error_contains!(
    test_unknown_command_error,
    ShellError::UnknownCommand {
        name: "frobnicate".to_string()
    },
    "Unknown REPL command: :frobnicate"
);
