//! Script pre-processing: directives are lifted out before code reaches the engine
//!
//! Recognised in the leading section of a submission or loaded file:
//! - `#r "Assembly.dll"`: add a reference
//! - `#load "other.csx"`: inline another script (paths relative to the current directory)
//! - `using Namespace;`: import a namespace
//!
//! The first ordinary line ends the leading section; everything after it is code.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, ShellError};
use crate::filesystem::FileSystem;

/// Code and directives extracted from a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileParserResult {
    pub code: String,
    pub references: Vec<String>,
    pub namespaces: Vec<String>,
    /// Files inlined through `#load`, in load order
    pub loaded_scripts: Vec<PathBuf>,
}

impl FileParserResult {
    fn push_unique(list: &mut Vec<String>, item: String) {
        if !list.contains(&item) {
            list.push(item);
        }
    }

    fn push_code(&mut self, line: &str) {
        if !self.code.is_empty() {
            self.code.push('\n');
        }
        self.code.push_str(line);
    }
}

/// Directive pre-processor
pub struct FilePreProcessor {
    file_system: Arc<dyn FileSystem>,
}

fn quoted_argument<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(directive)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim();
    rest.strip_prefix('"')?.strip_suffix('"')
}

fn using_namespace(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("using")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let namespace = rest.trim().strip_suffix(';')?.trim();
    let is_identifier_path = !namespace.is_empty()
        && namespace
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_'));
    is_identifier_path.then_some(namespace)
}

impl FilePreProcessor {
    pub fn new(file_system: Arc<dyn FileSystem>) -> Self {
        Self { file_system }
    }

    /// Process an interactive submission
    pub fn process_code(&self, code: &str) -> Result<FileParserResult> {
        let mut result = FileParserResult::default();
        let mut visited = HashSet::new();
        self.parse(code, &mut result, &mut visited)?;
        Ok(result)
    }

    /// Process a script file
    pub fn process_file(&self, path: &Path) -> Result<FileParserResult> {
        let mut result = FileParserResult::default();
        let mut visited = HashSet::new();
        self.load(path, &mut result, &mut visited)?;
        Ok(result)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.file_system.current_directory().join(path)
        }
    }

    fn load(
        &self,
        path: &Path,
        result: &mut FileParserResult,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<()> {
        let resolved = self.resolve(path);
        let key = dunce::canonicalize(&resolved).unwrap_or_else(|_| resolved.clone());
        if !visited.insert(key) {
            debug!(script = %resolved.display(), "script already loaded");
            return Ok(());
        }

        if !self.file_system.exists(&resolved) {
            return Err(ShellError::ScriptLoadFailed {
                path: resolved.display().to_string(),
                reason: "file not found".to_string(),
            });
        }
        let content = self.file_system.read_to_string(&resolved).map_err(|e| {
            ShellError::ScriptLoadFailed {
                path: resolved.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        result.loaded_scripts.push(resolved);
        self.parse(&content, result, visited)
    }

    fn parse(
        &self,
        code: &str,
        result: &mut FileParserResult,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<()> {
        let mut in_header = true;

        for line in code.lines() {
            let trimmed = line.trim();
            if in_header {
                if trimmed.is_empty() || trimmed.starts_with("//") {
                    continue;
                }
                if let Some(reference) = quoted_argument(trimmed, "#r") {
                    FileParserResult::push_unique(&mut result.references, reference.to_string());
                    continue;
                }
                if let Some(script) = quoted_argument(trimmed, "#load") {
                    self.load(Path::new(script), result, visited)?;
                    continue;
                }
                if let Some(namespace) = using_namespace(trimmed) {
                    FileParserResult::push_unique(&mut result.namespaces, namespace.to_string());
                    continue;
                }
                in_header = false;
            }
            result.push_code(line);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FilePreProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePreProcessor").finish_non_exhaustive()
    }
}
