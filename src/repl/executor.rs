//! The REPL executor: one interactive session over a script engine
//!
//! Lifecycle is `Created -> Ready -> Terminated`. [`ReplExecutor::initialize`]
//! moves to `Ready`; [`ReplExecutor::reset`] rebuilds the session in place;
//! [`ReplExecutor::terminate`] is final.

use std::path::Path;
use std::sync::Arc;

use tracing::{Span, debug, info, info_span};

use crate::error::{Result, ShellError, state};
use crate::filesystem::FileSystem;
use crate::host::{ObjectSerializer, ScriptHost, ScriptHostFactory};
use crate::pack::{ScriptPack, ScriptPackManager, ScriptPackResolver, ScriptPackSession};
use crate::package::PackageAssemblyResolver;

use super::commands::ReplCommands;
use super::engine::{EngineSession, ScriptEngine, ScriptResult, SessionContext};
use super::output::ReplOutput;
use super::preprocessor::FilePreProcessor;

const COMPONENT: &str = "REPL executor";

/// References and namespace imports every session starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultReferences {
    pub assemblies: Vec<String>,
    pub namespaces: Vec<String>,
}

impl Default for DefaultReferences {
    fn default() -> Self {
        let names = [
            "System",
            "System.Core",
            "System.Data",
            "System.Xml",
            "System.Xml.Linq",
            "System.Net.Http",
        ];
        let namespaces = [
            "System",
            "System.Linq",
            "System.Data",
            "System.Xml",
            "System.Xml.Linq",
            "System.Net.Http",
        ];
        Self {
            assemblies: names.iter().map(ToString::to_string).collect(),
            namespaces: namespaces.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Creates the tracing span a session runs in
#[derive(Debug, Clone)]
pub struct LogProvider {
    session_name: String,
}

impl LogProvider {
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
        }
    }

    pub fn session_span(&self, workspace: &Path) -> Span {
        info_span!(
            "session",
            name = %self.session_name,
            workspace = %workspace.display()
        )
    }
}

impl Default for LogProvider {
    fn default() -> Self {
        Self::new("repl")
    }
}

/// Everything the executor is constructed with
pub struct ReplCollaborators {
    pub output: Arc<dyn ReplOutput>,
    pub serializer: Arc<dyn ObjectSerializer>,
    pub file_system: Arc<dyn FileSystem>,
    pub preprocessor: Arc<FilePreProcessor>,
    pub engine: Arc<dyn ScriptEngine>,
    pub log_provider: LogProvider,
    pub commands: ReplCommands,
    pub default_references: DefaultReferences,
    pub package_assemblies: Arc<dyn PackageAssemblyResolver>,
    pub host_factory: Arc<dyn ScriptHostFactory>,
    pub script_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Ready,
    Terminated,
}

struct LiveSession {
    engine: Box<dyn EngineSession>,
    host: Arc<ScriptHost>,
    span: Span,
}

fn push_unique(list: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !list.contains(&item) {
            list.push(item);
        }
    }
}

/// Evaluates REPL input against a live engine session
pub struct ReplExecutor {
    collaborators: ReplCollaborators,
    lifecycle: Lifecycle,
    assemblies: Vec<String>,
    resolver: ScriptPackResolver,
    context: SessionContext,
    session: Option<LiveSession>,
}

impl ReplExecutor {
    pub fn new(collaborators: ReplCollaborators) -> Self {
        Self {
            collaborators,
            lifecycle: Lifecycle::Created,
            assemblies: Vec::new(),
            resolver: ScriptPackResolver::default(),
            context: SessionContext::default(),
            session: None,
        }
    }

    /// Start the session with `assemblies` referenced and `packs` loaded
    pub fn initialize(
        &mut self,
        assemblies: Vec<String>,
        packs: Vec<Arc<dyn ScriptPack>>,
    ) -> Result<()> {
        if self.lifecycle == Lifecycle::Terminated {
            return Err(state::terminated(COMPONENT));
        }

        let workspace = self.collaborators.file_system.current_directory();
        let defaults = &self.collaborators.default_references;

        let mut references = defaults.assemblies.clone();
        push_unique(&mut references, assemblies.iter().cloned());
        let package_assemblies = self
            .collaborators
            .package_assemblies
            .get_assembly_paths(&workspace)?;
        push_unique(
            &mut references,
            package_assemblies
                .iter()
                .map(|path| path.display().to_string()),
        );

        let mut namespaces = defaults.namespaces.clone();

        let mut pack_session = ScriptPackSession::new(self.collaborators.script_args.clone());
        for pack in &packs {
            debug!(pack = pack.name(), "initializing script pack");
            pack.initialize(&mut pack_session);
        }
        push_unique(&mut references, pack_session.references().iter().cloned());
        push_unique(&mut namespaces, pack_session.namespaces().iter().cloned());

        let context = SessionContext {
            references,
            namespaces,
            packs: packs.iter().map(|pack| pack.name().to_string()).collect(),
            pack_state: pack_session.all_state().clone(),
        };

        let manager = Arc::new(ScriptPackManager::new(&packs));
        let host = Arc::new(
            self.collaborators
                .host_factory
                .create_script_host(manager, &self.collaborators.script_args),
        );
        let engine = self
            .collaborators
            .engine
            .create_session(Arc::clone(&host), &context)?;
        let span = self.collaborators.log_provider.session_span(&workspace);

        info!(
            parent: &span,
            assemblies = assemblies.len(),
            packs = packs.len(),
            references = context.references.len(),
            "session ready"
        );

        self.assemblies = assemblies;
        self.resolver = ScriptPackResolver::new(packs);
        self.context = context;
        self.session = Some(LiveSession { engine, host, span });
        self.lifecycle = Lifecycle::Ready;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Created => Err(state::not_initialized(COMPONENT)),
            Lifecycle::Terminated => Err(state::terminated(COMPONENT)),
            Lifecycle::Ready => Ok(()),
        }
    }

    /// Evaluate one line of input
    ///
    /// Script failures come back inside the [`ScriptResult`] and are written
    /// to the output; `Err` is reserved for lifecycle misuse.
    pub fn execute(&mut self, line: &str) -> Result<ScriptResult> {
        self.ensure_ready()?;

        if let Some(command_line) = line.trim().strip_prefix(':') {
            return Ok(self.run_command(command_line));
        }

        let processed = match self.collaborators.preprocessor.process_code(line) {
            Ok(processed) => processed,
            Err(e) => {
                let message = e.to_string();
                self.collaborators.output.write_error(&message);
                return Ok(ScriptResult::execute_error(message));
            }
        };
        push_unique(&mut self.context.references, processed.references);
        push_unique(&mut self.context.namespaces, processed.namespaces);

        let Some(session) = self.session.as_mut() else {
            return Err(state::not_initialized(COMPONENT));
        };
        let result = {
            let _entered = session.span.enter();
            session.engine.execute(&processed.code, &self.context)
        };

        let output = &self.collaborators.output;
        if let Some(message) = &result.compile_error {
            output.write_error(message);
        } else if let Some(message) = &result.execute_error {
            output.write_error(message);
        } else if let Some(value) = &result.return_value {
            output.write_value(value);
        }

        Ok(result)
    }

    fn run_command(&mut self, command_line: &str) -> ScriptResult {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let name = words.next().unwrap_or_default();
        let args: Vec<String> = words.collect();

        let Some(command) = self.collaborators.commands.get(&name) else {
            let message = ShellError::UnknownCommand { name }.to_string();
            self.collaborators.output.write_error(&message);
            return ScriptResult::execute_error(message);
        };

        match command.execute(self, &args) {
            Ok(()) => ScriptResult::empty(),
            Err(e) => {
                let message = e.to_string();
                self.collaborators.output.write_error(&message);
                ScriptResult::execute_error(message)
            }
        }
    }

    /// Completion candidates starting with `prefix`
    pub fn complete(&self, prefix: &str) -> Result<Vec<String>> {
        self.ensure_ready()?;

        let mut candidates: Vec<String> = self
            .collaborators
            .commands
            .names()
            .into_iter()
            .map(|name| format!(":{name}"))
            .collect();
        candidates.extend(self.context.namespaces.iter().cloned());
        if let Some(session) = &self.session {
            candidates.extend(session.engine.completions(&self.context));
        }

        candidates.retain(|candidate| candidate.starts_with(prefix));
        candidates.sort();
        candidates.dedup();
        Ok(candidates)
    }

    /// Terminate the packs and start over with the same assemblies and packs
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.terminate_packs();

        let assemblies = self.assemblies.clone();
        let packs = self.resolver.get_packs().to_vec();
        self.session = None;
        self.context = SessionContext::default();
        self.lifecycle = Lifecycle::Created;
        self.initialize(assemblies, packs)
    }

    /// End the session. Calling it again does nothing.
    pub fn terminate(&mut self) {
        if self.lifecycle == Lifecycle::Terminated {
            return;
        }
        if self.lifecycle == Lifecycle::Ready {
            self.terminate_packs();
        }
        self.session = None;
        self.lifecycle = Lifecycle::Terminated;
        debug!("session terminated");
    }

    fn terminate_packs(&self) {
        for pack in self.resolver.get_packs() {
            pack.terminate();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    pub fn is_terminated(&self) -> bool {
        self.lifecycle == Lifecycle::Terminated
    }

    /// Assemblies the session was initialized with, unfiltered
    pub fn assemblies(&self) -> &[String] {
        &self.assemblies
    }

    pub fn references(&self) -> &[String] {
        &self.context.references
    }

    pub fn namespaces(&self) -> &[String] {
        &self.context.namespaces
    }

    pub fn pack_resolver(&self) -> &ScriptPackResolver {
        &self.resolver
    }

    pub fn commands(&self) -> &ReplCommands {
        &self.collaborators.commands
    }

    pub fn output(&self) -> &Arc<dyn ReplOutput> {
        &self.collaborators.output
    }

    pub fn serializer(&self) -> &Arc<dyn ObjectSerializer> {
        &self.collaborators.serializer
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.collaborators.file_system
    }

    /// Host object of the live session
    pub fn host(&self) -> Option<&Arc<ScriptHost>> {
        self.session.as_ref().map(|session| &session.host)
    }
}

impl std::fmt::Debug for ReplExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplExecutor")
            .field("lifecycle", &self.lifecycle)
            .field("assemblies", &self.assemblies)
            .field("packs", &self.resolver.names())
            .finish_non_exhaustive()
    }
}
