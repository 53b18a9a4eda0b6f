//! CLI integration tests using the real scriptshell binary

mod common;

use assert_cmd::Command;
use common::{TestWorkspace, managed_pe_image, native_pe_image};
use predicates::prelude::*;

#[allow(deprecated)]
fn scriptshell_cmd(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("scriptshell").unwrap();
    cmd.env_remove("SCRIPTSHELL_WORKSPACE")
        .env_remove("RUST_LOG")
        .env("SCRIPTSHELL_CACHE_DIR", workspace.temp.path().join("cache"))
        .current_dir(&workspace.path);
    cmd
}

#[test]
fn test_help_output() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interactive script host"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("assemblies"))
        .stdout(predicate::str::contains("repl"));
}

#[test]
fn test_version_output() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scriptshell"))
        .stdout(predicate::str::contains("Build info:"));
}

#[test]
fn test_sources_empty_and_configured() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("No repository sources configured."));

    workspace.write_config(&["../feed", "https://github.com/acme/feed.git#v1"], &[]);
    scriptshell_cmd(&workspace)
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repository sources (2), in search order:"))
        .stdout(predicate::str::contains("1. ../feed"))
        .stdout(predicate::str::contains("2. https://github.com/acme/feed.git#v1"));
}

#[test]
fn test_list_without_packages() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages installed."));
}

#[test]
fn test_install_then_verify() {
    let workspace = TestWorkspace::new();
    workspace.write_config(&["../feed"], &[]);
    workspace.add_package("Acme.Core", "1.0.0", "");
    workspace.add_package("Acme.Json", "1.2.0", "dependencies:\n  - id: Acme.Core\n");

    scriptshell_cmd(&workspace)
        .args(["install", "Acme.Json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed 2 packages:"))
        .stdout(predicate::str::contains("Acme.Core"));

    scriptshell_cmd(&workspace)
        .args(["list", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed packages (2):"))
        .stdout(predicate::str::contains("intact"));

    workspace.write_file("packages/Acme.Json.1.2.0/lib/net45/extra.txt", "tampered");
    scriptshell_cmd(&workspace)
        .args(["list", "--verify"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("modified"))
        .stderr(predicate::str::contains("Acme.Json.1.2.0"));
}

#[test]
fn test_install_unknown_package_fails() {
    let workspace = TestWorkspace::new();
    workspace.write_config(&["../feed"], &[]);

    scriptshell_cmd(&workspace)
        .args(["install", "Acme.Missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    assert!(!workspace.file_exists("packages.lock"));
}

#[test]
fn test_search_lists_matching_packages() {
    let workspace = TestWorkspace::new();
    workspace.write_config(&["../feed"], &[]);
    workspace.add_package("Acme.Json", "1.0.0", "description: Fast JSON\n");
    workspace.add_package("Acme.Http", "1.0.0", "");

    scriptshell_cmd(&workspace)
        .args(["search", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packages (page 0):"))
        .stdout(predicate::str::contains("Acme.Json"))
        .stdout(predicate::str::contains("Fast JSON"))
        .stdout(predicate::str::contains("Acme.Http").not());

    scriptshell_cmd(&workspace)
        .args(["search", "nothing-like-this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages found."));
}

#[test]
fn test_assemblies_show_verdicts() {
    let workspace = TestWorkspace::new();
    workspace.write_bytes("bin/Acme.Clock.dll", &managed_pe_image());
    workspace.write_bytes("bin/Native.Interop.dll", &native_pe_image());
    workspace.write_config(&[], &["System.Data"]);

    scriptshell_cmd(&workspace)
        .arg("assemblies")
        .assert()
        .success()
        .stdout(predicate::str::contains("Candidate assemblies (3):"))
        .stdout(predicate::str::contains("framework reference"))
        .stdout(predicate::str::contains("not managed"))
        .stdout(predicate::str::contains("1 of 3 scanned for script packs."));
}

#[test]
fn test_assemblies_empty_workspace() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .arg("assemblies")
        .assert()
        .success()
        .stdout(predicate::str::contains("No candidate assemblies."));
}

#[test]
fn test_repl_reads_stdin_until_exit() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .args(["repl", "--", "--fast"])
        .write_stdin("Env.ScriptArgs\n:usings\n:exit\n\"after exit\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type :help for commands."))
        .stdout(predicate::str::contains("\"--fast\""))
        .stdout(predicate::str::contains("System.Linq"))
        .stdout(predicate::str::contains("after exit").not());
}

#[test]
fn test_repl_unknown_command_keeps_session() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .arg("repl")
        .write_stdin(":frobnicate\n:packs\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No script packs loaded"));
}

#[test]
fn test_workspace_flag_selects_directory() {
    let workspace = TestWorkspace::new();
    workspace.write_config(&["../feed"], &[]);
    let elsewhere = TestWorkspace::new();

    scriptshell_cmd(&elsewhere)
        .arg("-w")
        .arg(&workspace.path)
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. ../feed"));
}

#[test]
fn test_completions() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scriptshell"));

    scriptshell_cmd(&workspace)
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell: tcsh"));
}

#[test]
fn test_cache_stats_and_clear() {
    let workspace = TestWorkspace::new();
    scriptshell_cmd(&workspace)
        .arg("cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache Statistics:"))
        .stdout(predicate::str::contains("Cache is empty."));

    scriptshell_cmd(&workspace)
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached feeds."));

    scriptshell_cmd(&workspace)
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared successfully."));
}
