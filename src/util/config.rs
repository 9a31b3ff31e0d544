//! Configuration file support.
//!
//! pomwright reads an optional `pomwright.toml` at the workspace root.
//! Everything has a sensible default, so the file only needs to exist when
//! a repo deviates from the stock layout (different manifest file name,
//! extra excluded directories, a non-standard third-party package).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the workspace configuration file.
pub const CONFIG_FILE_NAME: &str = "pomwright.toml";

/// pomwright configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace settings
    pub workspace: WorkspaceConfig,

    /// BUILD generation settings
    pub generate: GenerateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workspace: WorkspaceConfig::default(),
            generate: GenerateConfig::default(),
        }
    }
}

/// Workspace-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// File name of target manifests (default: `BUILD`).
    pub build_file_name: String,

    /// Glob patterns (relative to the workspace root) excluded from
    /// manifest discovery.
    pub exclude: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            build_file_name: "BUILD".to_string(),
            exclude: Vec::new(),
        }
    }
}

/// Generation-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Package that holds managed third-party targets (default: `3rdparty`).
    pub third_party_dir: String,

    /// Maven module roots whose targets must never be referenced from
    /// generated dependencies.
    pub exclude_project_targets: Vec<String>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            third_party_dir: "3rdparty".to_string(),
            exclude_project_targets: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is absent.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Load the config that governs a workspace root.
    pub fn for_workspace(root: &Path) -> Self {
        Self::load_or_default(&root.join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.workspace.build_file_name, "BUILD");
        assert!(config.workspace.exclude.is_empty());
        assert_eq!(config.generate.third_party_dir, "3rdparty");
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);

        std::fs::write(
            &config_path,
            r#"
[workspace]
build_file_name = "BUILD.gen"
exclude = ["external-protos/**"]

[generate]
third_party_dir = "thirdparty"
exclude_project_targets = ["service/container"]
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.workspace.build_file_name, "BUILD.gen");
        assert_eq!(config.workspace.exclude, vec!["external-protos/**"]);
        assert_eq!(config.generate.third_party_dir, "thirdparty");
        assert_eq!(
            config.generate.exclude_project_targets,
            vec!["service/container"]
        );
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::for_workspace(tmp.path());
        assert_eq!(config.workspace.build_file_name, "BUILD");
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[workspace]\nexclude = [\"tmp/**\"]\n").unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.workspace.build_file_name, "BUILD");
        assert_eq!(config.workspace.exclude, vec!["tmp/**"]);
    }
}
