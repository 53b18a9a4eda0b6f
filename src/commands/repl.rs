//! Repl command implementation

use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::ReplArgs;
use crate::commands::helpers::resolve_workspace_path;
use crate::error::Result;
use crate::filesystem::PhysicalFileSystem;
use crate::host::{Console, StdConsole};
use crate::pack::PackCatalog;
use crate::repl::{ReplExecutor, ReplExecutorFactory, ScriptServices};

/// Run repl command
pub fn run(workspace: Option<PathBuf>, args: ReplArgs) -> Result<()> {
    let root = resolve_workspace_path(workspace)?;
    let console: Arc<dyn Console> = Arc::new(StdConsole);
    let services = ScriptServices::with_defaults(
        Arc::new(PhysicalFileSystem::new()),
        Arc::clone(&console),
        PackCatalog::new(),
    );

    let mut executor = ReplExecutorFactory::new(services, args.script_args).create(&root)?;
    run_loop(&mut executor, console.as_ref())
}

/// Read lines from `console` until end of input or `:exit`
pub fn run_loop(executor: &mut ReplExecutor, console: &dyn Console) -> Result<()> {
    let mut continuation = false;

    loop {
        console.write(if continuation { "... " } else { "> " });
        let Some(line) = console.read_line() else {
            break;
        };

        let result = executor.execute(&line)?;
        if executor.is_terminated() {
            return Ok(());
        }
        continuation = !result.is_complete;
    }

    console.write_line("");
    executor.terminate();
    Ok(())
}
