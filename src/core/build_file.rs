//! One parsed manifest and its file-local invariants.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::target::Target;
use crate::syntax::{parse_build_file, Span, SyntaxError};
use crate::util::InternedString;

/// Errors raised while loading a single manifest.
#[derive(Debug, Error)]
pub enum BuildFileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Target names must be unique within a file.
    #[error("target `{name}` is declared twice in package `{package}`")]
    DuplicateTarget {
        package: InternedString,
        name: InternedString,
        first: Span,
        second: Span,
    },
}

impl BuildFileError {
    /// The span to highlight in the source file.
    pub fn span(&self) -> Span {
        match self {
            BuildFileError::Syntax(e) => e.span(),
            BuildFileError::DuplicateTarget { second, .. } => *second,
        }
    }
}

/// A parsed manifest: the targets one BUILD file declares.
#[derive(Debug, Clone)]
pub struct BuildFile {
    /// Package path of the declaring directory, relative to the workspace
    /// root, slash-separated.
    pub package: InternedString,

    /// Filesystem path of the manifest.
    pub path: PathBuf,

    /// Declared targets, in file order.
    pub targets: Vec<Target>,
}

impl BuildFile {
    /// Parse manifest text, enforcing file-local invariants.
    pub fn parse(
        package: impl AsRef<str>,
        path: impl Into<PathBuf>,
        text: &str,
    ) -> Result<Self, BuildFileError> {
        let package = InternedString::new(package);
        let targets = parse_build_file(&package, text)?;

        // No target name may collide within a file.
        for (i, target) in targets.iter().enumerate() {
            if let Some(earlier) = targets[..i]
                .iter()
                .find(|t| t.address.name() == target.address.name())
            {
                return Err(BuildFileError::DuplicateTarget {
                    package,
                    name: target.address.name(),
                    first: earlier.span,
                    second: target.span,
                });
            }
        }

        Ok(BuildFile {
            package,
            path: path.into(),
            targets,
        })
    }

    /// Find a declared target by name.
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.address.name().as_str() == name)
    }
}
