//! Target records - the buildable units a manifest declares.
//!
//! A target has a kind, an optional set of source file paths, and an
//! ordered list of dependency references to other targets.

use serde::Serialize;

use crate::core::address::Address;
use crate::syntax::Span;

/// The kind of a declared target, one per declaration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// `python_library(...)`
    Library,

    /// `python_binary(...)`
    Binary,

    /// `python_tests(...)`
    Tests,

    /// `target(...)` - an aggregate with dependencies only
    Alias,
}

impl TargetKind {
    /// The declaration form that introduces this kind.
    pub fn declaration_form(&self) -> &'static str {
        match self {
            TargetKind::Library => "python_library",
            TargetKind::Binary => "python_binary",
            TargetKind::Tests => "python_tests",
            TargetKind::Alias => "target",
        }
    }

    /// Look up a kind by its declaration form.
    pub fn from_declaration_form(form: &str) -> Option<Self> {
        match form {
            "python_library" => Some(TargetKind::Library),
            "python_binary" => Some(TargetKind::Binary),
            "python_tests" => Some(TargetKind::Tests),
            "target" => Some(TargetKind::Alias),
            _ => None,
        }
    }

    /// Whether this kind may declare `sources`.
    pub fn has_sources(&self) -> bool {
        !matches!(self, TargetKind::Alias)
    }
}

/// A dependency reference as written in a manifest.
///
/// Keeps the raw spec and its source span so that resolution failures can
/// point back at the offending text.
#[derive(Debug, Clone, Serialize)]
pub struct DepRef {
    /// The reference text as written (`service/http:lib`, `:local`, ...)
    pub spec: String,

    /// The resolved address.
    pub address: Address,

    /// Where in the manifest the reference appears.
    #[serde(skip)]
    pub span: Span,
}

/// A declared target.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    /// Fully qualified address of this target.
    pub address: Address,

    /// Declaration form kind.
    pub kind: TargetKind,

    /// Source file paths relative to the declaring package. Empty for
    /// aggregate targets.
    pub sources: Vec<String>,

    /// Dependency references in declaration order.
    pub dependencies: Vec<DepRef>,

    /// Tags (`python_tests` only).
    pub tags: Vec<String>,

    /// Entry point (`python_binary` only).
    pub entry_point: Option<String>,

    /// Where in the manifest the declaration starts.
    #[serde(skip)]
    pub span: Span,
}

impl Target {
    /// Create a target with no sources or dependencies.
    pub fn new(address: Address, kind: TargetKind) -> Self {
        Target {
            address,
            kind,
            sources: Vec::new(),
            dependencies: Vec::new(),
            tags: Vec::new(),
            entry_point: None,
            span: Span::default(),
        }
    }

    /// The addresses this target depends on, in declaration order.
    pub fn dep_addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.dependencies.iter().map(|d| d.address)
    }

    /// Attach source file paths.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Attach dependency references parsed relative to this target's package.
    pub fn with_dependencies(
        mut self,
        specs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, crate::core::address::AddressError> {
        let base = self.address.package();
        self.dependencies = specs
            .into_iter()
            .map(|s| {
                let spec = s.into();
                let address = Address::parse_relative(&base, &spec)?;
                Ok(DepRef {
                    spec,
                    address,
                    span: Span::default(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }
}
