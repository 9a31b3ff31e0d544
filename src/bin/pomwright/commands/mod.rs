//! Command implementations

use anyhow::Result;

use pomwright::core::Workspace;
use pomwright::util::context::GlobalContext;
use pomwright::util::diagnostic::suggestions;

pub mod check;
pub mod completions;
pub mod gen;
pub mod targets;
pub mod tree;

/// Locate and open the workspace enclosing the working directory.
pub(crate) fn open_workspace() -> Result<Workspace> {
    let ctx = GlobalContext::new()?;
    let root = ctx
        .find_workspace_root()
        .map_err(|e| anyhow::anyhow!("{e}\n{}", suggestions::NO_WORKSPACE))?;
    Ok(Workspace::open(root))
}
