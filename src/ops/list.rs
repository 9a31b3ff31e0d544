//! Target enumeration.

use anyhow::Result;
use serde::Serialize;

use crate::core::target::TargetKind;
use crate::core::workspace::Workspace;
use crate::graph::TargetGraph;

/// Filters for `pomwright targets`.
#[derive(Debug, Default)]
pub struct ListFilter {
    /// Only targets of this kind.
    pub kind: Option<TargetKind>,
    /// Only targets whose package starts with this prefix.
    pub package_prefix: Option<String>,
}

impl ListFilter {
    fn matches(&self, kind: TargetKind, package: &str) -> bool {
        if self.kind.is_some_and(|k| k != kind) {
            return false;
        }
        if let Some(prefix) = &self.package_prefix {
            if !package.starts_with(prefix.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One row of listing output.
#[derive(Debug, Serialize)]
pub struct ListedTarget {
    pub address: String,
    pub kind: TargetKind,
    pub dependencies: usize,
    pub sources: usize,
}

/// Enumerate declared targets, sorted by address.
pub fn list(workspace: &Workspace, filter: &ListFilter) -> Result<Vec<ListedTarget>> {
    let files = super::load_build_files(workspace)?;
    let graph = TargetGraph::from_build_files(&files);

    Ok(graph
        .targets()
        .into_iter()
        .filter(|t| filter.matches(t.kind, &t.address.package()))
        .map(|t| ListedTarget {
            address: t.address.to_string(),
            kind: t.kind,
            dependencies: t.dependencies.len(),
            sources: t.sources.len(),
        })
        .collect())
}
