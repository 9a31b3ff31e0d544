//! Classifies a module's Maven dependencies and renders them as manifest
//! dependency refs.
//!
//! Three classes, emitted in order: local (another module of this
//! workspace, referenced by inferred target address), third-party (version
//! managed at the top pom, referenced through the third-party package), and
//! external (unmanaged, rendered as a full `jar(...)` stanza).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::pom::info::PomRegistry;
use crate::pom::local::LocalTargetCache;
use crate::pom::model::PomDependency;
use crate::pom::provides::ProvidesIndex;
use crate::pom::reader::PomError;

/// Local target suffixes in precedence order. A `java:lib` target depends
/// on the others when they exist, so the first match stands in for the
/// whole module.
const CLOSEST_MATCH_SUFFIXES: [&str; 4] =
    ["java:lib", "proto:proto", "wire_proto:wire_proto", "resources:resources"];

/// Dependency refs for one module, split by scope.
#[derive(Debug, Default)]
pub struct ModuleDeps {
    pub lib: Vec<String>,
    pub test: Vec<String>,
}

/// Turns a module pom's dependency list into manifest refs.
pub struct DepsFromPom<'a> {
    provides: &'a ProvidesIndex,
    /// `groupId.artifactId` names version-managed at the top pom.
    managed: &'a HashSet<String>,
    third_party_dir: &'a str,
    exclude_project_targets: &'a [String],
}

impl<'a> DepsFromPom<'a> {
    pub fn new(
        provides: &'a ProvidesIndex,
        managed: &'a HashSet<String>,
        third_party_dir: &'a str,
        exclude_project_targets: &'a [String],
    ) -> Self {
        DepsFromPom {
            provides,
            managed,
            third_party_dir,
            exclude_project_targets,
        }
    }

    /// Build refs for the module pom at `source_path`.
    pub fn get(
        &self,
        registry: &mut PomRegistry,
        local_targets: &mut LocalTargetCache,
        source_path: &Path,
    ) -> Result<ModuleDeps, PomError> {
        let info = registry.get(source_path)?;
        let mut deps = info.dependencies.clone();
        deps.sort_by(|a, b| a.coord.cmp(&b.coord));

        let (test_deps, lib_deps): (Vec<_>, Vec<_>) =
            deps.into_iter().partition(PomDependency::is_test_scoped);

        Ok(ModuleDeps {
            lib: self.build_refs(&lib_deps, local_targets, source_path)?,
            test: self.build_refs(&test_deps, local_targets, source_path)?,
        })
    }

    fn build_refs(
        &self,
        deps: &[PomDependency],
        local_targets: &mut LocalTargetCache,
        source_path: &Path,
    ) -> Result<Vec<String>, PomError> {
        let mut refs = Vec::new();

        for dep in deps {
            let dotted = dep.coord.dotted();
            if !self.provides.is_local(&dotted) {
                continue;
            }
            let project_root = match self.provides.project_root(&dotted) {
                Some(root) => root.to_path_buf(),
                None => PathBuf::from(&dep.coord.artifact_id),
            };
            if self.is_excluded(&project_root) {
                continue;
            }
            let prefix = if dep.is_test_jar() {
                "src/test/"
            } else {
                "src/main/"
            };
            if let Some(target) = closest_match(local_targets, &project_root, prefix) {
                refs.push(target);
            } else {
                debug!("no local target found under {}", project_root.display());
            }
        }

        for dep in deps {
            let dotted = dep.coord.dotted();
            if !self.provides.is_local(&dotted) && self.managed.contains(&dotted) {
                refs.push(format!("{}:{}", self.third_party_dir, dotted));
            }
        }

        for dep in deps {
            let dotted = dep.coord.dotted();
            if !self.provides.is_local(&dotted) && !self.managed.contains(&dotted) {
                refs.push(render_jar(dep, source_path)?);
            }
        }

        Ok(refs)
    }

    fn is_excluded(&self, project_root: &Path) -> bool {
        let root = crate::util::fs::slash_path(project_root);
        self.exclude_project_targets.iter().any(|e| e == &root)
    }
}

/// Pick the best target a module offers under a source prefix.
fn closest_match(
    local_targets: &mut LocalTargetCache,
    project_root: &Path,
    prefix: &str,
) -> Option<String> {
    let root = crate::util::fs::slash_path(project_root);
    for suffix in CLOSEST_MATCH_SUFFIXES {
        let candidate = format!("{root}/{prefix}{suffix}");
        if local_targets.contains(project_root, &candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Render an external dependency as a `jar(...)` stanza.
fn render_jar(dep: &PomDependency, source_path: &Path) -> Result<String, PomError> {
    let version = dep.version.as_ref().ok_or_else(|| PomError::MissingVersion {
        group: dep.coord.group_id.clone(),
        artifact: dep.coord.artifact_id.clone(),
        path: source_path.to_path_buf(),
    })?;

    // Ivy mishandles type='test-jar'; a 'tests' classifier is equivalent.
    let (classifier, dep_type) = if dep.is_test_jar() {
        (Some("tests"), None)
    } else {
        (dep.classifier.as_deref(), dep.dep_type.as_deref())
    };

    let mut out = format!(
        "jar(org='{}', name='{}', rev='{}'",
        dep.coord.group_id, dep.coord.artifact_id, version
    );
    if let Some(classifier) = classifier {
        out.push_str(&format!(", classifier='{classifier}'"));
    }
    if let Some(dep_type) = dep_type {
        out.push_str(&format!(", type_='{dep_type}'"));
    }
    out.push(')');
    for exclusion in &dep.exclusions {
        out.push_str(&format!(
            ".exclude(org='{}', name='{}')",
            exclusion.group_id, exclusion.artifact_id
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::model::MavenCoord;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    fn dep(group: &str, artifact: &str, version: Option<&str>) -> PomDependency {
        let mut d = PomDependency::new(MavenCoord::new(group, artifact));
        d.version = version.map(String::from);
        d
    }

    #[test]
    fn test_render_jar_forms() {
        let source = Path::new("service/pom.xml");

        let plain = dep("com.google.guava", "guava", Some("18.0"));
        assert_eq!(
            render_jar(&plain, source).unwrap(),
            "jar(org='com.google.guava', name='guava', rev='18.0')"
        );

        let mut with_exclude = dep("org.apache.hadoop", "hadoop-common", Some("2.4.0"));
        with_exclude
            .exclusions
            .push(MavenCoord::new("org.slf4j", "slf4j-log4j12"));
        assert_eq!(
            render_jar(&with_exclude, source).unwrap(),
            "jar(org='org.apache.hadoop', name='hadoop-common', rev='2.4.0')\
             .exclude(org='org.slf4j', name='slf4j-log4j12')"
        );

        let mut test_jar = dep("com.example", "service-core", Some("1.0"));
        test_jar.dep_type = Some("test-jar".to_string());
        assert_eq!(
            render_jar(&test_jar, source).unwrap(),
            "jar(org='com.example', name='service-core', rev='1.0', classifier='tests')"
        );

        let unversioned = dep("com.example", "mystery", None);
        assert!(matches!(
            render_jar(&unversioned, source),
            Err(PomError::MissingVersion { .. })
        ));
    }

    #[test]
    fn test_classification_order() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "service/core/pom.xml",
            "<project><groupId>com.example</groupId><artifactId>core</artifactId></project>",
        );
        write(tmp.path(), "service/core/src/main/java/App.java", "");
        write(
            tmp.path(),
            "service/api/pom.xml",
            r#"<project>
  <groupId>com.example</groupId>
  <artifactId>api</artifactId>
  <dependencies>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>core</artifactId>
    </dependency>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
    </dependency>
    <dependency>
      <groupId>args4j</groupId>
      <artifactId>args4j</artifactId>
      <version>2.0.16</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.12</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>"#,
        );

        let mut registry = PomRegistry::new(tmp.path());
        let modules = vec!["service/core".to_string(), "service/api".to_string()];
        let provides = ProvidesIndex::build(&mut registry, &modules).unwrap();
        let managed: HashSet<String> = ["com.google.guava.guava".to_string()].into();
        let exclude = Vec::new();

        let deps_from_pom = DepsFromPom::new(&provides, &managed, "3rdparty", &exclude);
        let mut local_targets = LocalTargetCache::new(tmp.path());
        let deps = deps_from_pom
            .get(&mut registry, &mut local_targets, Path::new("service/api"))
            .unwrap();

        assert_eq!(
            deps.lib,
            vec![
                "service/core/src/main/java:lib",
                "3rdparty:com.google.guava.guava",
                "jar(org='args4j', name='args4j', rev='2.0.16')",
            ]
        );
        assert_eq!(deps.test, vec!["jar(org='junit', name='junit', rev='4.12')"]);
    }

    #[test]
    fn test_excluded_project_is_dropped() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "container/pom.xml",
            "<project><groupId>com.example</groupId><artifactId>container</artifactId></project>",
        );
        write(
            tmp.path(),
            "app/pom.xml",
            r#"<project>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <dependencies>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>container</artifactId>
    </dependency>
  </dependencies>
</project>"#,
        );

        let mut registry = PomRegistry::new(tmp.path());
        let modules = vec!["container".to_string(), "app".to_string()];
        let provides = ProvidesIndex::build(&mut registry, &modules).unwrap();
        let managed = HashSet::new();
        let exclude = vec!["container".to_string()];

        let deps_from_pom = DepsFromPom::new(&provides, &managed, "3rdparty", &exclude);
        let mut local_targets = LocalTargetCache::new(tmp.path());
        let deps = deps_from_pom
            .get(&mut registry, &mut local_targets, Path::new("app"))
            .unwrap();
        assert!(deps.lib.is_empty());
    }
}
