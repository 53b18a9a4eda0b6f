//! Workspace configuration (scriptshell.yaml)
//!
//! ```yaml
//! framework: net45
//! sources:
//!   - ./feed
//!   - https://github.com/acme/feed.git
//! references:
//!   - System.Data
//!   - lib/Acme.Tools.dll
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError, config, fs as fs_error};
use crate::package::FrameworkName;

/// Workspace configuration filename
pub const CONFIG_FILE: &str = "scriptshell.yaml";

/// Workspace configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Target framework short name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    /// Repository sources in search precedence order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    /// Extra assembly references; bare names are framework assemblies
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl WorkspaceConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize configuration to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load the configuration of a workspace directory
    ///
    /// A missing file is an empty configuration.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| fs_error::read_failed(path.display().to_string(), e.to_string()))?;

        Self::from_yaml(&content).map_err(|e| match e {
            ShellError::ConfigParseFailed { reason, .. } => {
                config::parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Write the configuration into a workspace directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, self.to_yaml()?)
            .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))
    }

    /// Target framework, defaulting to net45
    pub fn target_framework(&self) -> Result<FrameworkName> {
        match &self.framework {
            Some(name) => FrameworkName::parse(name),
            None => Ok(FrameworkName::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = WorkspaceConfig::from_yaml(
            r#"
framework: net451
sources:
  - ./feed
  - https://github.com/acme/feed.git
references:
  - System.Data
"#,
        )
        .unwrap();
        assert_eq!(config.sources, vec!["./feed", "https://github.com/acme/feed.git"]);
        assert_eq!(config.references, vec!["System.Data"]);
        assert_eq!(config.target_framework().unwrap().short_name(), "net451");
    }

    #[test]
    fn test_empty_and_missing_config_are_default() {
        assert_eq!(WorkspaceConfig::from_yaml("").unwrap(), WorkspaceConfig::default());

        let temp = TempDir::new().unwrap();
        let config = WorkspaceConfig::load(temp.path()).unwrap();
        assert!(config.sources.is_empty());
        assert_eq!(config.target_framework().unwrap(), FrameworkName::default());
    }

    #[test]
    fn test_malformed_config_names_the_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "sources: [unclosed").unwrap();
        let err = WorkspaceConfig::load(temp.path()).unwrap_err();
        match err {
            ShellError::ConfigParseFailed { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let config = WorkspaceConfig {
            framework: Some("net46".to_string()),
            sources: vec!["./feed".to_string()],
            references: Vec::new(),
        };
        config.save(temp.path()).unwrap();
        assert_eq!(WorkspaceConfig::load(temp.path()).unwrap(), config);
    }

    #[test]
    fn test_invalid_framework() {
        let config = WorkspaceConfig {
            framework: Some("java8".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.target_framework(),
            Err(ShellError::InvalidFramework { .. })
        ));
    }
}
