//! CLI definitions using clap derive API
//!
//! One submodule per command's argument types.

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod completions;
pub mod install;
pub mod list;
pub mod repl;
pub mod search;

pub use cache::{CacheArgs, CacheSubcommand};
pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use repl::ReplArgs;
pub use search::SearchArgs;

/// scriptshell - interactive script host
#[derive(Parser, Debug)]
#[command(
    name = "scriptshell",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Interactive script host with script packs and package feeds",
    long_about = "scriptshell discovers the assemblies of a workspace, loads the script packs \
                  they export and runs a REPL session over them. Packages are searched and \
                  installed from directory and git feeds listed in scriptshell.yaml.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  scriptshell search json                \x1b[90m# Search the configured feeds\x1b[0m\n   \
                  scriptshell install Acme.Json          \x1b[90m# Install the newest stable version\x1b[0m\n   \
                  scriptshell list --verify              \x1b[90m# Check installed payloads\x1b[0m\n   \
                  scriptshell assemblies                 \x1b[90m# Show candidate assemblies\x1b[0m\n   \
                  scriptshell repl -- --fast             \x1b[90m# Start a session with script args\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "SCRIPTSHELL_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the configured package feeds
    Search(SearchArgs),

    /// Install a package and its dependencies into the workspace
    Install(InstallArgs),

    /// List installed packages
    List(ListArgs),

    /// Show the configured repository sources
    Sources,

    /// Show candidate assemblies and whether they are scanned for script packs
    Assemblies,

    /// Start an interactive session
    Repl(ReplArgs),

    /// Manage the git feed cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_list() {
        let cli = Cli::try_parse_from(["scriptshell", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_cli_parsing_sources_and_assemblies() {
        let cli = Cli::try_parse_from(["scriptshell", "sources"]).unwrap();
        assert!(matches!(cli.command, Commands::Sources));
        let cli = Cli::try_parse_from(["scriptshell", "assemblies"]).unwrap();
        assert!(matches!(cli.command, Commands::Assemblies));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["scriptshell", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli =
            Cli::try_parse_from(["scriptshell", "-v", "-w", "/tmp/workspace", "list"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/workspace")));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["scriptshell", "sources", "-w", "/tmp/ws"]).unwrap();
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/ws")));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["scriptshell", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, "bash");
            }
            _ => panic!("Expected Completions command"),
        }
    }
}
