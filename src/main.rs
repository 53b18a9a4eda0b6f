//! scriptshell - interactive script host

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scriptshell::cli::{Cli, Commands};
use scriptshell::commands;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(cli.workspace, args),
        Commands::Install(args) => commands::install::run(cli.workspace, args),
        Commands::List(args) => commands::list::run(cli.workspace, args),
        Commands::Sources => commands::sources::run(cli.workspace),
        Commands::Assemblies => commands::assemblies::run(cli.workspace),
        Commands::Repl(args) => commands::repl::run(cli.workspace, args),
        Commands::Cache(args) => commands::cache::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
