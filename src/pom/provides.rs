//! Lookup from Maven names to the module poms that provide them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::pom::info::PomRegistry;
use crate::pom::reader::PomError;

/// Index over the top pom's module list.
///
/// Maps both the bare `artifactId` and the full `groupId.artifactId` to the
/// module poms that declare them. Duplicate artifact ids across groups are
/// possible, so values are lists.
#[derive(Debug, Default)]
pub struct ProvidesIndex {
    by_artifact: HashMap<String, Vec<PathBuf>>,
    by_dotted: HashMap<String, Vec<PathBuf>>,
}

impl ProvidesIndex {
    /// Build the index from the modules listed in the workspace's top pom.
    pub fn build(registry: &mut PomRegistry, modules: &[String]) -> Result<Self, PomError> {
        debug!("indexing {} modules", modules.len());
        let mut index = ProvidesIndex::default();
        for module in modules {
            let pom = PathBuf::from(module).join("pom.xml");
            let info = registry.get(&pom)?;
            if info.artifact_id.is_empty() {
                continue;
            }
            index
                .by_artifact
                .entry(info.artifact_id.clone())
                .or_default()
                .push(pom.clone());
            index
                .by_dotted
                .entry(info.dotted_name())
                .or_default()
                .push(pom);
        }
        Ok(index)
    }

    /// Module poms providing a bare `artifactId`.
    pub fn find_artifact(&self, artifact_id: &str) -> &[PathBuf] {
        self.by_artifact
            .get(artifact_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Module poms providing a `groupId.artifactId`. There should be one.
    pub fn find_dotted(&self, dotted: &str) -> &[PathBuf] {
        self.by_dotted
            .get(dotted)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_local(&self, dotted: &str) -> bool {
        self.by_dotted.contains_key(dotted)
    }

    /// All indexed `groupId.artifactId` names, sorted.
    pub fn dotted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_dotted.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Project root directory of the first pom providing `dotted`, if any.
    pub fn project_root(&self, dotted: &str) -> Option<&Path> {
        self.find_dotted(dotted).first().and_then(|p| p.parent())
    }
}
