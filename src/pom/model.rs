//! The Maven data model, as much of it as generation needs.

use std::fmt;

use serde::Serialize;

/// A Maven artifact coordinate without a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MavenCoord {
    pub group_id: String,
    pub artifact_id: String,
}

impl MavenCoord {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        MavenCoord {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// The `groupId.artifactId` form used for indexing and managed refs.
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.group_id, self.artifact_id)
    }

    /// The `groupId artifactId` form used as a merge key across the parent
    /// chain.
    pub fn merge_key(&self) -> String {
        format!("{} {}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for MavenCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// One `<dependency>` entry, from either `<dependencies>` or
/// `<dependencyManagement>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PomDependency {
    pub coord: MavenCoord,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub classifier: Option<String>,
    /// The `<type>` element. `test-jar` gets special handling downstream.
    pub dep_type: Option<String>,
    pub exclusions: Vec<MavenCoord>,
}

impl PomDependency {
    pub fn new(coord: MavenCoord) -> Self {
        PomDependency {
            coord,
            version: None,
            scope: None,
            classifier: None,
            dep_type: None,
            exclusions: Vec::new(),
        }
    }

    /// Whether this dependency only matters for tests.
    pub fn is_test_scoped(&self) -> bool {
        self.scope.as_deref() == Some("test")
    }

    pub fn is_test_jar(&self) -> bool {
        self.dep_type.as_deref() == Some("test-jar")
    }
}

/// The `<parent>` block of a pom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentRef {
    pub coord: MavenCoord,
    /// `<relativePath>`, as written. May name a directory or a pom file.
    pub relative_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_forms() {
        let coord = MavenCoord::new("com.squareup", "service-core");
        assert_eq!(coord.dotted(), "com.squareup.service-core");
        assert_eq!(coord.merge_key(), "com.squareup service-core");
        assert_eq!(coord.to_string(), "com.squareup:service-core");
    }

    #[test]
    fn test_test_scope_detection() {
        let mut dep = PomDependency::new(MavenCoord::new("junit", "junit"));
        assert!(!dep.is_test_scoped());
        dep.scope = Some("test".to_string());
        assert!(dep.is_test_scoped());
    }
}
