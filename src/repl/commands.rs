//! REPL commands: `:name args...` lines handled by the executor itself

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;

use super::ReplExecutor;

/// A `:command` understood by the REPL
pub trait ReplCommand: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn execute(&self, executor: &mut ReplExecutor, args: &[String]) -> Result<()>;
}

/// Registry of commands, keyed by name
#[derive(Clone, Default)]
pub struct ReplCommands {
    commands: BTreeMap<String, Arc<dyn ReplCommand>>,
}

impl ReplCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in commands
    pub fn with_defaults() -> Self {
        let mut commands = Self::new();
        commands
            .register(Arc::new(HelpCommand))
            .register(Arc::new(ReferencesCommand))
            .register(Arc::new(UsingsCommand))
            .register(Arc::new(PacksCommand))
            .register(Arc::new(ClearCommand))
            .register(Arc::new(ResetCommand))
            .register(Arc::new(ExitCommand));
        commands
    }

    /// Add a command, replacing any command with the same name
    pub fn register(&mut self, command: Arc<dyn ReplCommand>) -> &mut Self {
        self.commands
            .insert(command.name().to_ascii_lowercase(), command);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ReplCommand>> {
        self.commands.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ReplCommand>> {
        self.commands.values()
    }
}

impl std::fmt::Debug for ReplCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplCommands")
            .field("commands", &self.names())
            .finish()
    }
}

fn write_list(executor: &ReplExecutor, items: &[String], empty: &str) {
    if items.is_empty() {
        executor.output().write(empty);
        return;
    }
    for item in items {
        executor.output().write(&format!("  {item}"));
    }
}

struct HelpCommand;

impl ReplCommand for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Show the available commands"
    }

    fn execute(&self, executor: &mut ReplExecutor, _args: &[String]) -> Result<()> {
        let lines: Vec<String> = executor
            .commands()
            .iter()
            .map(|command| format!(":{:<12}{}", command.name(), command.description()))
            .collect();
        for line in lines {
            executor.output().write(&line);
        }
        Ok(())
    }
}

struct ReferencesCommand;

impl ReplCommand for ReferencesCommand {
    fn name(&self) -> &str {
        "references"
    }

    fn description(&self) -> &str {
        "List the session's assembly references"
    }

    fn execute(&self, executor: &mut ReplExecutor, _args: &[String]) -> Result<()> {
        let references = executor.references().to_vec();
        write_list(executor, &references, "No references");
        Ok(())
    }
}

struct UsingsCommand;

impl ReplCommand for UsingsCommand {
    fn name(&self) -> &str {
        "usings"
    }

    fn description(&self) -> &str {
        "List the imported namespaces"
    }

    fn execute(&self, executor: &mut ReplExecutor, _args: &[String]) -> Result<()> {
        let namespaces = executor.namespaces().to_vec();
        write_list(executor, &namespaces, "No namespaces imported");
        Ok(())
    }
}

struct PacksCommand;

impl ReplCommand for PacksCommand {
    fn name(&self) -> &str {
        "packs"
    }

    fn description(&self) -> &str {
        "List the loaded script packs"
    }

    fn execute(&self, executor: &mut ReplExecutor, _args: &[String]) -> Result<()> {
        let names: Vec<String> = executor
            .pack_resolver()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();
        write_list(executor, &names, "No script packs loaded");
        Ok(())
    }
}

struct ClearCommand;

impl ReplCommand for ClearCommand {
    fn name(&self) -> &str {
        "clear"
    }

    fn description(&self) -> &str {
        "Clear the console"
    }

    fn execute(&self, executor: &mut ReplExecutor, _args: &[String]) -> Result<()> {
        executor.output().clear();
        Ok(())
    }
}

struct ResetCommand;

impl ReplCommand for ResetCommand {
    fn name(&self) -> &str {
        "reset"
    }

    fn description(&self) -> &str {
        "Restart the session with the same assemblies and packs"
    }

    fn execute(&self, executor: &mut ReplExecutor, _args: &[String]) -> Result<()> {
        executor.reset()?;
        executor.output().write("Session reset");
        Ok(())
    }
}

struct ExitCommand;

impl ReplCommand for ExitCommand {
    fn name(&self) -> &str {
        "exit"
    }

    fn description(&self) -> &str {
        "End the session"
    }

    fn execute(&self, executor: &mut ReplExecutor, _args: &[String]) -> Result<()> {
        executor.terminate();
        Ok(())
    }
}
