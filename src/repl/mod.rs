//! Interactive script execution
//!
//! - [`engine`]: engine seam and the built-in [`JsonEngine`]
//! - [`preprocessor`]: `#r`, `#load` and `using` directives
//! - [`commands`]: `:command` handling
//! - [`output`]: where results and errors go
//! - [`executor`]: one REPL session
//! - [`factory`]: builds sessions for a workspace directory

pub mod commands;
pub mod engine;
pub mod executor;
pub mod factory;
pub mod output;
pub mod preprocessor;

pub use commands::{ReplCommand, ReplCommands};
pub use engine::{EngineSession, JsonEngine, ScriptEngine, ScriptResult, SessionContext};
pub use executor::{DefaultReferences, LogProvider, ReplCollaborators, ReplExecutor};
pub use factory::{ReplExecutorFactory, ScriptServices};
pub use output::{ConsoleReplOutput, ReplOutput};
pub use preprocessor::{FileParserResult, FilePreProcessor};
