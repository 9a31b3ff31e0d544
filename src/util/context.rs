//! Global context for pomwright operations.
//!
//! Carries the working directory and output settings, and locates the
//! workspace root. A directory is a workspace root when it contains
//! `pomwright.toml` or a top-level `pom.xml`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::util::config::CONFIG_FILE_NAME;

/// Raised when no workspace root can be located.
#[derive(Debug, Error)]
#[error(
    "could not find {config} or pom.xml in {dir} or any parent directory",
    config = CONFIG_FILE_NAME,
    dir = .dir.display()
)]
pub struct WorkspaceNotFound {
    pub dir: PathBuf,
}

/// Global context carrying the directory the invocation started from.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext { cwd })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext { cwd }
    }

    /// Find the workspace root, searching upward from cwd.
    ///
    /// `pomwright.toml` wins at any depth. Without one, the root is the
    /// topmost ancestor holding a `pom.xml`, since in a multi-module
    /// repository every module directory carries its own pom.
    pub fn find_workspace_root(&self) -> Result<PathBuf, WorkspaceNotFound> {
        let mut topmost_pom = None;
        let mut current = self.cwd.clone();
        loop {
            if current.join(CONFIG_FILE_NAME).is_file() {
                return Ok(current);
            }
            if current.join("pom.xml").is_file() {
                topmost_pom = Some(current.clone());
            }
            if !current.pop() {
                break;
            }
        }
        topmost_pom.ok_or_else(|| WorkspaceNotFound {
            dir: self.cwd.clone(),
        })
    }
}
