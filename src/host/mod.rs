//! Script host: the environment handed to the script engine
//!
//! A fresh [`ScriptHost`] is built for every session by a [`ScriptHostFactory`].
//! It bundles the pack manager with the console, printers and script arguments
//! scripts can reach through `Env`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ShellError};
use crate::pack::ScriptPackManager;

/// Text console used by scripts and the REPL output sink
pub trait Console: Send + Sync {
    fn write(&self, text: &str);

    fn write_line(&self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Next input line without its terminator; `None` at end of input
    fn read_line(&self) -> Option<String>;

    fn clear(&self);
}

/// Console over the process's stdin and stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&self, text: &str) {
        if let Err(e) = write_flushed(&mut io::stdout().lock(), text) {
            debug!(error = %e, "Failed to write to stdout");
        }
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                debug!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = console::Term::stdout().clear_screen() {
            debug!(error = %e, "Failed to clear the terminal");
        }
    }
}

fn write_flushed(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// In-memory console: captures output, replays queued input
#[derive(Debug, Default)]
pub struct BufferConsole {
    output: Mutex<String>,
    input: Mutex<VecDeque<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console whose `read_line` yields `lines` in order
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: Mutex::new(String::new()),
            input: Mutex::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        lock(&self.output).clone()
    }

    /// Drain the captured output
    pub fn take(&self) -> String {
        std::mem::take(&mut *lock(&self.output))
    }
}

impl Console for BufferConsole {
    fn write(&self, text: &str) {
        lock(&self.output).push_str(text);
    }

    fn read_line(&self) -> Option<String> {
        lock(&self.input).pop_front()
    }

    fn clear(&self) {
        lock(&self.output).clear();
    }
}

/// Turns script values into display text
pub trait ObjectSerializer: Send + Sync {
    fn serialize(&self, value: &Value) -> Result<String>;
}

/// Pretty-printed JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl ObjectSerializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<String> {
        serde_json::to_string_pretty(value).map_err(ShellError::from)
    }
}

/// Formats values for the console
#[derive(Clone)]
pub struct Printers {
    serializer: Arc<dyn ObjectSerializer>,
}

impl Printers {
    pub fn new(serializer: Arc<dyn ObjectSerializer>) -> Self {
        Self { serializer }
    }

    /// Strings print raw; everything else goes through the serializer
    pub fn get_string_for(&self, value: &Value) -> String {
        match value {
            Value::String(text) => text.clone(),
            other => self
                .serializer
                .serialize(other)
                .unwrap_or_else(|_| other.to_string()),
        }
    }
}

impl std::fmt::Debug for Printers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Printers").finish_non_exhaustive()
    }
}

/// What scripts see as `Env`
#[derive(Clone)]
pub struct ScriptEnvironment {
    script_args: Vec<String>,
    console: Arc<dyn Console>,
    printers: Printers,
}

impl ScriptEnvironment {
    pub fn new(script_args: Vec<String>, console: Arc<dyn Console>, printers: Printers) -> Self {
        Self {
            script_args,
            console,
            printers,
        }
    }

    pub fn script_args(&self) -> &[String] {
        &self.script_args
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }

    pub fn printers(&self) -> &Printers {
        &self.printers
    }
}

/// Host object handed to the engine for one session
pub struct ScriptHost {
    pack_manager: Arc<ScriptPackManager>,
    environment: ScriptEnvironment,
}

impl ScriptHost {
    pub fn new(pack_manager: Arc<ScriptPackManager>, environment: ScriptEnvironment) -> Self {
        Self {
            pack_manager,
            environment,
        }
    }

    /// Typed context of a loaded script pack
    pub fn require<T: std::any::Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.pack_manager.get::<T>()
    }

    pub fn pack_manager(&self) -> &Arc<ScriptPackManager> {
        &self.pack_manager
    }

    pub fn environment(&self) -> &ScriptEnvironment {
        &self.environment
    }
}

impl std::fmt::Debug for ScriptHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptHost")
            .field("pack_manager", &self.pack_manager)
            .field("script_args", &self.environment.script_args)
            .finish_non_exhaustive()
    }
}

/// Builds the host for a new session
pub trait ScriptHostFactory: Send + Sync {
    fn create_script_host(
        &self,
        pack_manager: Arc<ScriptPackManager>,
        script_args: &[String],
    ) -> ScriptHost;
}

/// Host factory used by the REPL
pub struct ReplScriptHostFactory {
    console: Arc<dyn Console>,
    serializer: Arc<dyn ObjectSerializer>,
}

impl ReplScriptHostFactory {
    pub fn new(console: Arc<dyn Console>, serializer: Arc<dyn ObjectSerializer>) -> Self {
        Self {
            console,
            serializer,
        }
    }
}

impl ScriptHostFactory for ReplScriptHostFactory {
    fn create_script_host(
        &self,
        pack_manager: Arc<ScriptPackManager>,
        script_args: &[String],
    ) -> ScriptHost {
        let printers = Printers::new(Arc::clone(&self.serializer));
        let environment =
            ScriptEnvironment::new(script_args.to_vec(), Arc::clone(&self.console), printers);
        ScriptHost::new(pack_manager, environment)
    }
}
