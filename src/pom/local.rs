//! Target inference from a Maven module's directory layout.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Source directories and the target names their presence implies.
const LAYOUT: [(&str, &[&str]); 7] = [
    ("src/main/java", &["lib"]),
    ("src/main/proto", &["proto"]),
    ("src/main/resources", &["resources"]),
    ("src/test/java", &["lib", "test"]),
    ("src/test/proto", &["proto"]),
    ("src/test/resources", &["resources"]),
    ("src/main/wire_proto", &["wire_proto"]),
];

/// Infers the targets a Maven module provides from which conventional
/// source directories exist and are non-empty. Results are cached per
/// module root.
#[derive(Debug)]
pub struct LocalTargetCache {
    workspace_root: PathBuf,
    cache: HashMap<PathBuf, HashSet<String>>,
}

impl LocalTargetCache {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        LocalTargetCache {
            workspace_root: workspace_root.into(),
            cache: HashMap::new(),
        }
    }

    /// All inferred target refs for a module, keyed by the module's
    /// workspace-relative root. Refs are rendered `package:name` with the
    /// package path relative to the workspace root.
    pub fn get(&mut self, project_root: &Path) -> &HashSet<String> {
        if !self.cache.contains_key(project_root) {
            let targets = self.compute(project_root);
            self.cache.insert(project_root.to_path_buf(), targets);
        }
        // Just inserted above when absent.
        &self.cache[project_root]
    }

    pub fn contains(&mut self, project_root: &Path, target_ref: &str) -> bool {
        self.get(project_root).contains(target_ref)
    }

    fn compute(&self, project_root: &Path) -> HashSet<String> {
        let root_str = crate::util::fs::slash_path(project_root);
        let mut targets = HashSet::new();

        // Every module gets an aggregate lib target at its root.
        targets.insert(format!("{root_str}:lib"));

        for (dir, names) in LAYOUT {
            let full = self.workspace_root.join(project_root).join(dir);
            if has_entries(&full) {
                for name in names {
                    targets.insert(format!("{root_str}/{dir}:{name}"));
                }
            }
        }

        // external-protos modules get proto sources generated into place
        // later, so the target exists even while the directory is empty.
        if root_str.starts_with("external-protos") {
            targets.insert(format!("{root_str}/src/main/proto:proto"));
        }

        targets
    }
}

fn has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
