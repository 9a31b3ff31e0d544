//! Workspace - manifest discovery rooted at the repository top.
//!
//! The workspace root is the directory holding `pomwright.toml` or the
//! top-level `pom.xml`. Manifests are found by walking the tree, skipping
//! hidden directories and anything the config excludes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::util::config::Config;
use crate::util::fs::{compile_globs, matches_any, slash_path};

/// A workspace: the root directory plus its configuration.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

/// A discovered manifest: filesystem path plus its package path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Absolute path of the BUILD file.
    pub path: PathBuf,

    /// Slash-separated package path relative to the workspace root.
    pub package: String,
}

impl Workspace {
    /// Open a workspace at a known root, loading its config.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = Config::for_workspace(&root);
        Workspace { root, config }
    }

    /// Open a workspace with an explicit config (tests, overrides).
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Workspace {
            root: root.into(),
            config,
        }
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The workspace configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The path of the top-level pom, whether or not it exists.
    pub fn top_pom_path(&self) -> PathBuf {
        self.root.join("pom.xml")
    }

    /// Discover every manifest in the workspace.
    ///
    /// Hidden directories (and thus VCS metadata) are skipped; configured
    /// exclude globs are matched against workspace-relative paths.
    pub fn discover_build_files(&self) -> Result<Vec<ManifestEntry>> {
        let build_file_name = &self.config.workspace.build_file_name;
        let excludes = compile_globs(&self.config.workspace.exclude)?;

        let mut entries = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                // The root itself may be a dot directory; only prune below it.
                e.depth() == 0 || !is_hidden(e.file_name().to_string_lossy().as_ref())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy() != *build_file_name {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .expect("walkdir yields paths under its root");
            if matches_any(rel, &excludes) {
                tracing::debug!("excluded manifest: {}", rel.display());
                continue;
            }

            let package = rel
                .parent()
                .map(slash_path)
                .unwrap_or_default();
            entries.push(ManifestEntry {
                path: entry.path().to_path_buf(),
                package,
            });
        }

        entries.sort_by(|a, b| a.package.cmp(&b.package));
        Ok(entries)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_discovery_finds_and_sorts_manifests() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "service/web/BUILD", "target(name = 'lib')");
        touch(tmp.path(), "service/http/BUILD", "target(name = 'lib')");
        touch(tmp.path(), "service/http/README", "not a manifest");

        let ws = Workspace::open(tmp.path());
        let entries = ws.discover_build_files().unwrap();

        let packages: Vec<&str> = entries.iter().map(|e| e.package.as_str()).collect();
        assert_eq!(packages, vec!["service/http", "service/web"]);
    }

    #[test]
    fn test_discovery_skips_hidden_dirs() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), ".git/BUILD", "target(name = 'x')");
        touch(tmp.path(), "lib/BUILD", "target(name = 'lib')");

        let ws = Workspace::open(tmp.path());
        let entries = ws.discover_build_files().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].package, "lib");
    }

    #[test]
    fn test_discovery_from_dot_named_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".workspace");
        touch(&root, "lib/BUILD", "target(name = 'lib')");
        touch(&root, ".git/BUILD", "target(name = 'x')");

        let ws = Workspace::open(&root);
        let entries = ws.discover_build_files().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].package, "lib");
    }

    #[test]
    fn test_discovery_honors_excludes() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "external-protos/a/BUILD", "target(name = 'x')");
        touch(tmp.path(), "lib/BUILD", "target(name = 'lib')");

        let mut config = Config::default();
        config.workspace.exclude = vec!["external-protos/**".to_string()];

        let ws = Workspace::with_config(tmp.path(), config);
        let entries = ws.discover_build_files().unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_discovery_honors_build_file_name() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "lib/BUILD", "target(name = 'lib')");
        touch(tmp.path(), "lib/BUILD.gen", "target(name = 'gen')");

        let mut config = Config::default();
        config.workspace.build_file_name = "BUILD.gen".to_string();

        let ws = Workspace::with_config(tmp.path(), config);
        let entries = ws.discover_build_files().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.ends_with("lib/BUILD.gen"));
    }
}
