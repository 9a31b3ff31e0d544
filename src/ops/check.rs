//! Workspace verification: parse every manifest, build the target graph,
//! and report everything that is wrong.

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::core::build_file::{BuildFile, BuildFileError};
use crate::core::workspace::{ManifestEntry, Workspace};
use crate::graph::{TargetGraph, Violation};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs;

/// One problem found during a check run.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckViolation {
    SyntaxError {
        file: String,
        message: String,
        offset: usize,
        len: usize,
    },
    DuplicateTarget {
        file: String,
        package: String,
        name: String,
    },
    DanglingEdge {
        file: String,
        from: String,
        to: String,
        spec: String,
    },
    Cycle {
        members: Vec<String>,
    },
}

impl CheckViolation {
    /// Render for human output.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CheckViolation::SyntaxError { file, message, .. } => {
                Diagnostic::error(message).with_location(file)
            }
            CheckViolation::DuplicateTarget {
                file,
                package,
                name,
            } => Diagnostic::error(format!(
                "target `{name}` is declared twice in package `{package}`"
            ))
            .with_location(file)
            .with_suggestion(suggestions::DUPLICATE_TARGET),
            CheckViolation::DanglingEdge {
                file, from, to, ..
            } => Diagnostic::error(format!("dependency `{to}` does not resolve"))
                .with_location(file)
                .with_context(format!("referenced by `{from}`"))
                .with_suggestion(suggestions::DANGLING_EDGE),
            CheckViolation::Cycle { members } => {
                Diagnostic::error(format!("dependency cycle: {}", members.join(" -> ")))
                    .with_suggestion(suggestions::CYCLE)
            }
        }
    }
}

/// Result of checking a workspace.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Manifests discovered.
    pub files: usize,
    /// Targets declared across parseable manifests.
    pub targets: usize,
    /// Resolved dependency edges.
    pub edges: usize,
    pub violations: Vec<CheckViolation>,
}

impl CheckReport {
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Parse every manifest in the workspace and verify the target graph.
pub fn check(workspace: &Workspace) -> Result<CheckReport> {
    let entries = workspace.discover_build_files()?;
    debug!("checking {} manifests", entries.len());

    let parses: Vec<(&ManifestEntry, Result<BuildFile, BuildFileError>)> = entries
        .par_iter()
        .map(|entry| {
            let text = fs::read_to_string(&entry.path)?;
            Ok((entry, BuildFile::parse(&entry.package, &entry.path, &text)))
        })
        .collect::<Result<_>>()?;

    let root = workspace.root();
    let mut violations = Vec::new();
    let mut parsed_files = Vec::new();
    for (entry, result) in parses {
        match result {
            Ok(file) => parsed_files.push(file),
            Err(error) => violations.push(parse_violation(root, entry, error)),
        }
    }

    let graph = TargetGraph::from_build_files(&parsed_files);
    for violation in graph.verify() {
        violations.push(match violation {
            Violation::DanglingEdge {
                from,
                to,
                spec,
                file,
                ..
            } => CheckViolation::DanglingEdge {
                file: fs::relative_path(root, &file).display().to_string(),
                from: from.to_string(),
                to: to.to_string(),
                spec,
            },
            Violation::Cycle { members } => CheckViolation::Cycle {
                members: members.iter().map(|m| m.to_string()).collect(),
            },
        });
    }

    Ok(CheckReport {
        files: entries.len(),
        targets: graph.len(),
        edges: graph.edge_count(),
        violations,
    })
}

fn parse_violation(
    root: &std::path::Path,
    entry: &ManifestEntry,
    error: BuildFileError,
) -> CheckViolation {
    // Reports name manifests relative to the workspace root.
    let file = fs::relative_path(root, &entry.path).display().to_string();
    match error {
        BuildFileError::Syntax(e) => {
            let span = e.span();
            CheckViolation::SyntaxError {
                file,
                message: e.to_string(),
                offset: span.offset,
                len: span.len,
            }
        }
        BuildFileError::DuplicateTarget { package, name, .. } => CheckViolation::DuplicateTarget {
            file,
            package: package.to_string(),
            name: name.to_string(),
        },
    }
}
