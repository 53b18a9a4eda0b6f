use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache statistics:\n    scriptshell cache\n\n\
                  List cached feeds:\n    scriptshell cache list\n\n\
                  Clear all cached feeds:\n    scriptshell cache clear")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List cached feeds
    List,

    /// Remove every cached feed
    Clear,
}
