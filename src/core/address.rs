//! Target identity - WHICH target (package path + name).
//!
//! An address pairs a slash-qualified package path with a colon-qualified
//! target name, e.g. `service/http/src/main/java:lib`. Both halves are
//! interned, so addresses are `Copy` and compare in O(1).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::util::InternedString;

/// Errors produced while parsing an address spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty target address")]
    Empty,

    #[error("address `{0}` has an empty target name after `:`")]
    EmptyName(String),

    #[error("relative address `{0}` is only valid inside a BUILD file")]
    RelativeWithoutBase(String),

    #[error("package path `{0}` must be relative, slash-separated, without `.` or `..` segments")]
    InvalidPackage(String),

    #[error("target name `{0}` contains an invalid character")]
    InvalidName(String),
}

/// A fully qualified target address: `(package_path, name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    package: InternedString,
    name: InternedString,
}

impl Address {
    /// Create an address from already validated parts.
    pub fn new(package: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Address {
            package: InternedString::new(package),
            name: InternedString::new(name),
        }
    }

    /// Parse an absolute address spec.
    ///
    /// Accepted forms:
    /// - `path/to/pkg:name`
    /// - `path/to/pkg` (shorthand for a target named after the last path
    ///   segment, the Pants/Buck convention)
    pub fn parse(spec: &str) -> Result<Self, AddressError> {
        if spec.is_empty() {
            return Err(AddressError::Empty);
        }
        if spec.starts_with(':') {
            return Err(AddressError::RelativeWithoutBase(spec.to_string()));
        }
        Self::parse_with_base(None, spec)
    }

    /// Parse an address spec as written inside a BUILD file.
    ///
    /// In addition to the absolute forms, `:name` resolves against the
    /// declaring file's package.
    pub fn parse_relative(base_package: &str, spec: &str) -> Result<Self, AddressError> {
        Self::parse_with_base(Some(base_package), spec)
    }

    fn parse_with_base(base: Option<&str>, spec: &str) -> Result<Self, AddressError> {
        if spec.is_empty() {
            return Err(AddressError::Empty);
        }

        let (package, name) = match spec.find(':') {
            Some(0) => {
                let base = base
                    .ok_or_else(|| AddressError::RelativeWithoutBase(spec.to_string()))?;
                (base.to_string(), spec[1..].to_string())
            }
            Some(idx) => (spec[..idx].to_string(), spec[idx + 1..].to_string()),
            None => {
                // Shorthand: target named after the last path segment.
                let name = spec
                    .rsplit('/')
                    .next()
                    .expect("rsplit always yields at least one item")
                    .to_string();
                (spec.to_string(), name)
            }
        };

        if name.is_empty() {
            return Err(AddressError::EmptyName(spec.to_string()));
        }
        validate_package(&package)?;
        validate_name(&name)?;

        Ok(Address::new(package, name))
    }

    /// The slash-qualified package path.
    pub fn package(&self) -> InternedString {
        self.package
    }

    /// The target name within the package.
    pub fn name(&self) -> InternedString {
        self.name
    }
}

fn validate_package(package: &str) -> Result<(), AddressError> {
    let invalid = || AddressError::InvalidPackage(package.to_string());

    if package.is_empty() {
        // The workspace root package is spelled as an empty path; allowed.
        return Ok(());
    }
    if package.starts_with('/') || package.ends_with('/') || package.contains('\\') {
        return Err(invalid());
    }
    for segment in package.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(invalid());
        }
        if segment.contains(':') || segment.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AddressError> {
    let bad = name
        .chars()
        .any(|c| c == '/' || c == ':' || c.is_whitespace());
    if bad {
        return Err(AddressError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.name)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}
