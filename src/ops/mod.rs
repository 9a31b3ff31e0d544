//! High-level operations behind the CLI commands.

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::core::build_file::BuildFile;
use crate::core::workspace::Workspace;

pub mod check;
pub mod generate;
pub mod list;
pub mod tree;

pub use check::{check, CheckReport, CheckViolation};
pub use generate::{generate, GenOptions, GenReport};
pub use list::{list, ListFilter, ListedTarget};
pub use tree::tree;

/// Parse every manifest in the workspace, failing on the first bad one.
///
/// Operations that need a usable graph go through this; `check` collects
/// errors instead of stopping.
pub(crate) fn load_build_files(workspace: &Workspace) -> Result<Vec<BuildFile>> {
    workspace
        .discover_build_files()?
        .par_iter()
        .map(|entry| {
            let text = crate::util::fs::read_to_string(&entry.path)?;
            BuildFile::parse(&entry.package, &entry.path, &text)
                .with_context(|| format!("failed to parse {}", entry.path.display()))
        })
        .collect()
}
