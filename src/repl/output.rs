//! REPL output sink

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use console::Style;
use serde_json::Value;

use crate::host::{Console, Printers};

use super::ReplExecutor;

/// Where the executor sends results, errors and command output
pub trait ReplOutput: Send + Sync {
    /// Bind to a ready executor; called once per session
    fn initialize(&self, executor: &ReplExecutor);

    fn write(&self, text: &str);

    fn write_value(&self, value: &Value);

    fn write_error(&self, message: &str);

    fn clear(&self);
}

/// Output sink writing to a [`Console`]
pub struct ConsoleReplOutput {
    console: Arc<dyn Console>,
    printers: Printers,
    initialized: AtomicBool,
}

impl ConsoleReplOutput {
    pub fn new(console: Arc<dyn Console>, printers: Printers) -> Self {
        Self {
            console,
            printers,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ConsoleReplOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReplOutput")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl ReplOutput for ConsoleReplOutput {
    fn initialize(&self, executor: &ReplExecutor) {
        self.initialized.store(true, Ordering::SeqCst);
        let packs = executor.pack_resolver().get_packs().len();
        self.console.write_line(&format!(
            "{} {} assemblies, {} script packs. Type :help for commands.",
            Style::new().bold().apply_to("scriptshell"),
            executor.assemblies().len(),
            packs
        ));
    }

    fn write(&self, text: &str) {
        self.console.write_line(text);
    }

    fn write_value(&self, value: &Value) {
        self.console.write_line(&self.printers.get_string_for(value));
    }

    fn write_error(&self, message: &str) {
        self.console
            .write_line(&format!("{} {message}", Style::new().red().apply_to("error:")));
    }

    fn clear(&self) {
        self.console.clear();
    }
}
