//! Script engine seam and the built-in JSON engine
//!
//! The executor only talks to [`ScriptEngine`] and [`EngineSession`]; a real
//! compiler can be plugged in behind them. [`JsonEngine`] is the engine the
//! binary ships with. It understands:
//!
//! - any JSON literal, which evaluates to itself
//! - `Env.ScriptArgs`, the session's script arguments
//! - `Require("<pack>")`, the state a loaded script pack published
//! - `Console.WriteLine(<expr>)`, printing through the host console
//!
//! Input with unclosed brackets or strings is buffered until it balances.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::Result;
use crate::host::ScriptHost;

/// Session-wide data the executor passes on every call
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub references: Vec<String>,
    pub namespaces: Vec<String>,
    /// Names of the loaded script packs
    pub packs: Vec<String>,
    /// State published by packs during initialization
    pub pack_state: BTreeMap<String, Value>,
}

/// Outcome of one submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptResult {
    pub return_value: Option<Value>,
    pub compile_error: Option<String>,
    pub execute_error: Option<String>,
    /// False while the engine is waiting for more input
    pub is_complete: bool,
}

impl ScriptResult {
    pub fn empty() -> Self {
        Self {
            is_complete: true,
            ..Self::default()
        }
    }

    pub fn value(value: Value) -> Self {
        Self {
            return_value: Some(value),
            ..Self::empty()
        }
    }

    pub fn incomplete() -> Self {
        Self::default()
    }

    pub fn compile_error(message: impl Into<String>) -> Self {
        Self {
            compile_error: Some(message.into()),
            ..Self::empty()
        }
    }

    pub fn execute_error(message: impl Into<String>) -> Self {
        Self {
            execute_error: Some(message.into()),
            ..Self::empty()
        }
    }

    pub fn is_error(&self) -> bool {
        self.compile_error.is_some() || self.execute_error.is_some()
    }
}

/// Factory for engine sessions
pub trait ScriptEngine: Send + Sync {
    fn create_session(
        &self,
        host: Arc<ScriptHost>,
        context: &SessionContext,
    ) -> Result<Box<dyn EngineSession>>;
}

/// One live evaluation session
pub trait EngineSession: Send {
    fn execute(&mut self, code: &str, context: &SessionContext) -> ScriptResult;

    /// Identifiers worth offering for completion
    fn completions(&self, _context: &SessionContext) -> Vec<String> {
        Vec::new()
    }
}

/// Engine evaluating JSON literals and a few host calls
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEngine;

impl ScriptEngine for JsonEngine {
    fn create_session(
        &self,
        host: Arc<ScriptHost>,
        _context: &SessionContext,
    ) -> Result<Box<dyn EngineSession>> {
        Ok(Box::new(JsonSession {
            host,
            pending: String::new(),
        }))
    }
}

struct JsonSession {
    host: Arc<ScriptHost>,
    pending: String,
}

/// Whether every bracket and string in `code` is closed
fn is_balanced(code: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for c in code.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth -= 1,
            _ => {}
        }
    }

    !in_string && depth <= 0
}

/// `name(inner)` → `inner`
fn call_argument<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    input
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
        .map(str::trim)
}

impl JsonSession {
    fn evaluate(&self, input: &str, context: &SessionContext) -> ScriptResult {
        let input = input.trim().trim_end_matches(';').trim_end();

        if input == "Env.ScriptArgs" {
            let args = self.host.environment().script_args();
            return ScriptResult::value(json!(args));
        }

        if let Some(argument) = call_argument(input, "Require") {
            let name: String = match serde_json::from_str(argument) {
                Ok(name) => name,
                Err(_) => return ScriptResult::compile_error("Require expects a pack name string"),
            };
            let Some(pack) = context.packs.iter().find(|p| p.eq_ignore_ascii_case(&name)) else {
                return ScriptResult::execute_error(format!("No script pack named '{name}' is loaded"));
            };
            let state = context
                .pack_state
                .get(pack)
                .cloned()
                .unwrap_or_else(|| json!({ "pack": pack }));
            return ScriptResult::value(state);
        }

        if let Some(argument) = call_argument(input, "Console.WriteLine") {
            let inner = self.evaluate(argument, context);
            if inner.is_error() {
                return inner;
            }
            let environment = self.host.environment();
            let text = inner
                .return_value
                .map(|value| environment.printers().get_string_for(&value))
                .unwrap_or_default();
            environment.console().write_line(&text);
            return ScriptResult::empty();
        }

        match serde_json::from_str::<Value>(input) {
            Ok(value) => ScriptResult::value(value),
            Err(e) => ScriptResult::compile_error(e.to_string()),
        }
    }
}

impl EngineSession for JsonSession {
    fn execute(&mut self, code: &str, context: &SessionContext) -> ScriptResult {
        if !self.pending.is_empty() {
            self.pending.push('\n');
        }
        self.pending.push_str(code);

        if !is_balanced(&self.pending) {
            return ScriptResult::incomplete();
        }

        let input = std::mem::take(&mut self.pending);
        if input.trim().is_empty() {
            return ScriptResult::empty();
        }
        self.evaluate(&input, context)
    }

    fn completions(&self, context: &SessionContext) -> Vec<String> {
        let mut items = vec![
            "Console.WriteLine(".to_string(),
            "Env.ScriptArgs".to_string(),
        ];
        items.extend(context.packs.iter().map(|pack| format!("Require(\"{pack}\")")));
        items
    }
}
