use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List all installed packages:\n    scriptshell list\n\n\
                  Check payloads against their recorded hashes:\n    scriptshell list --verify")]
pub struct ListArgs {
    /// Re-hash each installed package and compare with the manifest
    #[arg(long)]
    pub verify: bool,
}
