//! Raw extraction from a single `pom.xml`.
//!
//! This layer reads what the file literally says. Parent-chain merging and
//! property substitution happen in [`crate::pom::info`].

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::debug;

use crate::pom::model::{MavenCoord, ParentRef, PomDependency};

#[derive(Debug, Error)]
pub enum PomError {
    /// The file exists but is not well-formed XML.
    #[error("malformed pom.xml {path}: {message}{excerpt}")]
    Malformed {
        path: PathBuf,
        message: String,
        line: usize,
        column: usize,
        /// The offending line with a caret marker, or empty.
        excerpt: String,
    },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dependency that the pom must version but does not.
    #[error("expected artifact {artifact} group {group} in pom {path} to have a version")]
    MissingVersion {
        group: String,
        artifact: String,
        path: PathBuf,
    },
}

/// Everything pomwright extracts from one pom file, uncooked.
#[derive(Debug, Clone, Default)]
pub struct RawPom {
    pub group_id: String,
    pub artifact_id: String,
    pub parent: Option<ParentRef>,
    /// `<properties>` plus properties from platform-activated profiles.
    pub properties: Vec<(String, String)>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    /// `<modules>` entries, relevant in the top-level pom.
    pub modules: Vec<String>,
}

impl RawPom {
    /// Read and parse a pom file.
    ///
    /// Returns `Ok(None)` when the file does not exist: a listed module
    /// whose pom has been removed is treated as empty rather than fatal.
    pub fn read(path: &Path) -> Result<Option<RawPom>, PomError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("pom not found, treating as empty: {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(PomError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(path, &text).map(Some)
    }

    /// Parse pom text. `path` is for diagnostics only.
    pub fn parse(path: &Path, text: &str) -> Result<RawPom, PomError> {
        Self::parse_for_platform(path, text, current_platform())
    }

    fn parse_for_platform(path: &Path, text: &str, platform: &str) -> Result<RawPom, PomError> {
        let doc = Document::parse(text).map_err(|e| malformed(path, text, e))?;
        let project = doc.root_element();

        let mut pom = RawPom {
            group_id: child_text(project, "groupId").unwrap_or_default(),
            artifact_id: child_text(project, "artifactId").unwrap_or_default(),
            ..RawPom::default()
        };

        if let Some(parent) = child_element(project, "parent") {
            let coord = MavenCoord::new(
                child_text(parent, "groupId").unwrap_or_default(),
                child_text(parent, "artifactId").unwrap_or_default(),
            );
            if let Some(relative_path) = child_text(parent, "relativePath") {
                pom.parent = Some(ParentRef {
                    coord,
                    relative_path,
                });
            }
        }

        if let Some(props) = child_element(project, "properties") {
            for prop in props.children().filter(Node::is_element) {
                pom.properties
                    .push((prop.tag_name().name().to_string(), element_text(prop)));
            }
        }

        if let Some(deps) = child_element(project, "dependencies") {
            for dep in named_children(deps, "dependency") {
                pom.dependencies.push(read_dependency(dep));
            }
        }

        if let Some(dm) = child_element(project, "dependencyManagement") {
            if let Some(deps) = child_element(dm, "dependencies") {
                for dep in named_children(deps, "dependency") {
                    pom.dependency_management.push(read_dependency(dep));
                }
            }
        }

        if let Some(modules) = child_element(project, "modules") {
            for module in named_children(modules, "module") {
                pom.modules.push(element_text(module));
            }
        }

        if let Some(profiles) = child_element(project, "profiles") {
            for profile in named_children(profiles, "profile") {
                if profile_active(profile, platform) {
                    if let Some(props) = child_element(profile, "properties") {
                        for prop in props.children().filter(Node::is_element) {
                            pom.properties
                                .push((prop.tag_name().name().to_string(), element_text(prop)));
                        }
                    }
                }
            }
        }

        Ok(pom)
    }
}

fn malformed(path: &Path, text: &str, error: roxmltree::Error) -> PomError {
    let pos = error.pos();
    let line = pos.row as usize;
    let column = pos.col as usize;
    let excerpt = match text.lines().nth(line.saturating_sub(1)) {
        Some(src) => format!("\n{}\n{}^", src, " ".repeat(column.saturating_sub(1))),
        None => String::new(),
    };
    PomError::Malformed {
        path: path.to_path_buf(),
        message: error.to_string(),
        line,
        column,
        excerpt,
    }
}

fn read_dependency(dep: Node<'_, '_>) -> PomDependency {
    let coord = MavenCoord::new(
        child_text(dep, "groupId").unwrap_or_default(),
        child_text(dep, "artifactId").unwrap_or_default(),
    );
    let mut out = PomDependency::new(coord);
    out.version = child_text(dep, "version");
    out.scope = child_text(dep, "scope");
    out.classifier = child_text(dep, "classifier");
    out.dep_type = child_text(dep, "type");
    if let Some(exclusions) = child_element(dep, "exclusions") {
        for exclusion in named_children(exclusions, "exclusion") {
            out.exclusions.push(MavenCoord::new(
                child_text(exclusion, "groupId").unwrap_or_default(),
                child_text(exclusion, "artifactId").unwrap_or_default(),
            ));
        }
    }
    out
}

/// A profile is active when `<activation><os><name>` names the running
/// platform, directly or through a synonym.
fn profile_active(profile: Node<'_, '_>, platform: &str) -> bool {
    child_element(profile, "activation")
        .and_then(|a| child_element(a, "os"))
        .and_then(|os| child_text(os, "name"))
        .is_some_and(|name| same_platform(platform, &name))
}

/// Platform synonym groups match the conventions seen in hand-written poms.
fn same_platform(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return true;
    }
    const GROUPS: [&[&str]; 2] = [&["darwin", "mac os x", "posix"], &["win32", "windows"]];
    GROUPS
        .iter()
        .any(|group| group.contains(&a.as_str()) && group.contains(&b.as_str()))
}

fn current_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn named_children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name).map(element_text)
}

fn element_text(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().trim().to_string()
}
