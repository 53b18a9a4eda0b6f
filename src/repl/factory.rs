//! Session bootstrap
//!
//! [`ReplExecutorFactory::create`] turns a workspace directory into a ready
//! executor. Every collaborator is built up front in [`ScriptServices`] and
//! passed down explicitly.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::assembly::{AssemblyClassifier, AssemblyResolver, WorkspaceAssemblyResolver};
use crate::cache::FeedCache;
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::host::{
    Console, JsonSerializer, ObjectSerializer, Printers, ReplScriptHostFactory, ScriptHostFactory,
};
use crate::pack::{PackCatalog, ScriptPackLoader};
use crate::package::{
    FeedInstallationProvider, InstallationProvider, ManifestAssemblyResolver,
    PackageAssemblyResolver,
};

use super::commands::ReplCommands;
use super::engine::{JsonEngine, ScriptEngine};
use super::executor::{DefaultReferences, LogProvider, ReplCollaborators, ReplExecutor};
use super::output::{ConsoleReplOutput, ReplOutput};
use super::preprocessor::FilePreProcessor;

/// Collaborators shared by every session a factory creates
#[derive(Clone)]
pub struct ScriptServices {
    pub file_system: Arc<dyn FileSystem>,
    pub provider: Arc<dyn InstallationProvider>,
    pub assembly_resolver: Arc<dyn AssemblyResolver>,
    pub classifier: AssemblyClassifier,
    pub pack_loader: Arc<ScriptPackLoader>,
    pub output: Arc<dyn ReplOutput>,
    pub serializer: Arc<dyn ObjectSerializer>,
    pub preprocessor: Arc<FilePreProcessor>,
    pub engine: Arc<dyn ScriptEngine>,
    pub log_provider: LogProvider,
    pub commands: ReplCommands,
    pub default_references: DefaultReferences,
    pub package_assemblies: Arc<dyn PackageAssemblyResolver>,
    pub host_factory: Arc<dyn ScriptHostFactory>,
}

impl ScriptServices {
    /// The standard wiring: feed provider, workspace resolver, JSON engine,
    /// everything printing to `console`
    pub fn with_defaults(
        file_system: Arc<dyn FileSystem>,
        console: Arc<dyn Console>,
        catalog: PackCatalog,
    ) -> Self {
        let provider: Arc<dyn InstallationProvider> = match FeedCache::from_env() {
            Ok(cache) => Arc::new(FeedInstallationProvider::with_cache(
                Arc::clone(&file_system),
                cache,
            )),
            Err(e) => {
                debug!(error = %e, "no feed cache, git feeds disabled");
                Arc::new(FeedInstallationProvider::new(Arc::clone(&file_system)))
            }
        };
        let package_assemblies: Arc<dyn PackageAssemblyResolver> =
            Arc::new(ManifestAssemblyResolver::new());
        let serializer: Arc<dyn ObjectSerializer> = Arc::new(JsonSerializer);

        Self {
            provider,
            assembly_resolver: Arc::new(WorkspaceAssemblyResolver::new(Arc::clone(
                &package_assemblies,
            ))),
            classifier: AssemblyClassifier::new(Arc::clone(&file_system)),
            pack_loader: Arc::new(ScriptPackLoader::new(
                Arc::clone(&file_system),
                Arc::new(catalog),
            )),
            output: Arc::new(ConsoleReplOutput::new(
                Arc::clone(&console),
                Printers::new(Arc::clone(&serializer)),
            )),
            preprocessor: Arc::new(FilePreProcessor::new(Arc::clone(&file_system))),
            engine: Arc::new(JsonEngine),
            log_provider: LogProvider::default(),
            commands: ReplCommands::with_defaults(),
            default_references: DefaultReferences::default(),
            package_assemblies,
            host_factory: Arc::new(ReplScriptHostFactory::new(console, Arc::clone(&serializer))),
            serializer,
            file_system,
        }
    }
}

impl std::fmt::Debug for ScriptServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptServices")
            .field("commands", &self.commands)
            .field("default_references", &self.default_references)
            .finish_non_exhaustive()
    }
}

/// Builds ready-to-use executors for workspace directories
#[derive(Debug, Clone)]
pub struct ReplExecutorFactory {
    services: ScriptServices,
    script_args: Vec<String>,
}

impl ReplExecutorFactory {
    pub fn new(services: ScriptServices, script_args: Vec<String>) -> Self {
        Self {
            services,
            script_args,
        }
    }

    pub fn services(&self) -> &ScriptServices {
        &self.services
    }

    /// Start a session for `directory`
    ///
    /// Each step's failure aborts the rest. Only the classified assemblies are
    /// scanned for script packs; the executor is given the full list.
    pub fn create(&self, directory: &Path) -> Result<ReplExecutor> {
        let services = &self.services;

        services.file_system.set_current_directory(directory);
        services.provider.initialize()?;

        let assemblies = services.assembly_resolver.get_assembly_paths(directory)?;
        let loadable = services.classifier.filter(&assemblies);
        debug!(
            candidates = assemblies.len(),
            loadable = loadable.len(),
            "classified assemblies"
        );
        let packs = services.pack_loader.load(&loadable);

        let mut executor = ReplExecutor::new(ReplCollaborators {
            output: Arc::clone(&services.output),
            serializer: Arc::clone(&services.serializer),
            file_system: Arc::clone(&services.file_system),
            preprocessor: Arc::clone(&services.preprocessor),
            engine: Arc::clone(&services.engine),
            log_provider: services.log_provider.clone(),
            commands: services.commands.clone(),
            default_references: services.default_references.clone(),
            package_assemblies: Arc::clone(&services.package_assemblies),
            host_factory: Arc::clone(&services.host_factory),
            script_args: self.script_args.clone(),
        });
        executor.initialize(assemblies, packs)?;
        services.output.initialize(&executor);

        info!(
            workspace = %directory.display(),
            assemblies = executor.assemblies().len(),
            packs = executor.pack_resolver().get_packs().len(),
            "REPL session created"
        );
        Ok(executor)
    }
}
