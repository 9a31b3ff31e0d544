//! Cooked per-pom analysis: parent-chain merge and property substitution.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::warn;

use crate::pom::model::PomDependency;
use crate::pom::reader::{PomError, RawPom};
use crate::util::fs::normalize_path;

/// Substitution passes are bounded so self-referential properties cannot
/// loop forever.
const MAX_SUBSTITUTION_PASSES: usize = 10;

static PROPERTY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("property reference pattern is valid"));

/// One pom's resolved view: its own declarations merged with everything
/// inherited through the parent chain, with `${key}` references expanded.
#[derive(Debug, Clone)]
pub struct PomInfo {
    /// Workspace-relative path of the pom file this was built from.
    pub source_path: PathBuf,
    pub group_id: String,
    pub artifact_id: String,
    /// Merged properties, parent values overridden by the child's.
    pub properties: HashMap<String, String>,
    /// Merged dependencies. The parent pom itself appears as a dependency,
    /// and a child declaration shadows a parent declaration of the same
    /// `groupId artifactId`.
    pub dependencies: Vec<PomDependency>,
}

impl PomInfo {
    /// The `groupId.artifactId` name this pom provides.
    pub fn dotted_name(&self) -> String {
        format!("{}.{}", self.group_id, self.artifact_id)
    }

    pub fn property(&self, name: &str) -> &str {
        self.properties.get(name).map(String::as_str).unwrap_or("")
    }

    fn empty(source_path: PathBuf) -> Self {
        PomInfo {
            source_path,
            group_id: String::new(),
            artifact_id: String::new(),
            properties: HashMap::new(),
            dependencies: Vec::new(),
        }
    }
}

/// By-path cache of [`PomInfo`]s so each pom file is parsed once per run.
#[derive(Debug)]
pub struct PomRegistry {
    root: PathBuf,
    cache: HashMap<PathBuf, Arc<PomInfo>>,
    /// Poms currently being resolved, to break parent cycles.
    in_flight: HashSet<PathBuf>,
}

impl PomRegistry {
    /// `root` is the workspace root all pom paths are relative to.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PomRegistry {
            root: root.into(),
            cache: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    /// Resolve the info for a pom named by a workspace-relative path.
    ///
    /// The path may name the pom file or its directory. A missing file
    /// resolves to an empty info.
    pub fn get(&mut self, source: &Path) -> Result<Arc<PomInfo>, PomError> {
        let key = normalize_path(&pom_file_path(source));
        if let Some(info) = self.cache.get(&key) {
            return Ok(Arc::clone(info));
        }
        if !self.in_flight.insert(key.clone()) {
            warn!("parent cycle through {}, treating as empty", key.display());
            return Ok(Arc::new(PomInfo::empty(key)));
        }
        let result = self.load(&key);
        self.in_flight.remove(&key);

        let info = Arc::new(result?);
        self.cache.insert(key, Arc::clone(&info));
        Ok(info)
    }

    fn load(&mut self, key: &Path) -> Result<PomInfo, PomError> {
        let raw = match RawPom::read(&self.root.join(key))? {
            Some(raw) => raw,
            None => return Ok(PomInfo::empty(key.to_path_buf())),
        };

        let mut info = PomInfo {
            source_path: key.to_path_buf(),
            group_id: raw.group_id,
            artifact_id: raw.artifact_id,
            properties: HashMap::new(),
            dependencies: Vec::new(),
        };

        // The parent pom counts as a dependency of its own.
        let mut dep_keys = HashSet::new();
        if let Some(parent) = &raw.parent {
            dep_keys.insert(parent.coord.merge_key());
            info.dependencies.push(PomDependency::new(parent.coord.clone()));
        }
        for dep in raw.dependencies {
            if dep.coord.group_id.is_empty() || dep.coord.artifact_id.is_empty() {
                continue;
            }
            dep_keys.insert(dep.coord.merge_key());
            info.dependencies.push(dep);
        }

        if let Some(parent) = &raw.parent {
            let parent_key = match key.parent() {
                Some(dir) => dir.join(&parent.relative_path),
                None => PathBuf::from(&parent.relative_path),
            };
            let parent_info = self.get(&parent_key)?;

            // Inherited declarations a child can override.
            for dep in &parent_info.dependencies {
                if !dep_keys.contains(&dep.coord.merge_key()) {
                    info.dependencies.push(dep.clone());
                }
            }
            info.properties.extend(
                parent_info
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        for (name, value) in raw.properties {
            info.properties.insert(name, value);
        }

        let expanded: HashMap<String, String> = info
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), substitute(&info.properties, v)))
            .collect();
        info.properties = expanded;
        for dep in &mut info.dependencies {
            substitute_dependency(&info.properties, dep);
        }

        Ok(info)
    }
}

/// Expand `${key}` references against the property map. Unresolved keys
/// stay as written.
pub fn substitute(properties: &HashMap<String, String>, value: &str) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_SUBSTITUTION_PASSES {
        let next = PROPERTY_REF
            .replace_all(&current, |caps: &regex::Captures<'_>| {
                match properties.get(&caps[1]) {
                    Some(replacement) => replacement.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn substitute_dependency(properties: &HashMap<String, String>, dep: &mut PomDependency) {
    dep.coord.group_id = substitute(properties, &dep.coord.group_id);
    dep.coord.artifact_id = substitute(properties, &dep.coord.artifact_id);
    for field in [
        &mut dep.version,
        &mut dep.scope,
        &mut dep.classifier,
        &mut dep.dep_type,
    ] {
        if let Some(value) = field {
            *value = substitute(properties, value);
        }
    }
}

/// Append `pom.xml` when the path names a module directory.
fn pom_file_path(path: &Path) -> PathBuf {
    if path.file_name().is_some_and(|name| name == "pom.xml") {
        path.to_path_buf()
    } else {
        path.join("pom.xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_substitution_is_recursive_and_bounded() {
        let mut props = HashMap::new();
        props.insert("a".to_string(), "${b}".to_string());
        props.insert("b".to_string(), "value".to_string());
        props.insert("loop".to_string(), "${loop}".to_string());

        assert_eq!(substitute(&props, "${a}"), "value");
        assert_eq!(substitute(&props, "${missing}"), "${missing}");
        // Self-reference terminates.
        assert_eq!(substitute(&props, "${loop}"), "${loop}");
    }

    #[test]
    fn test_parent_chain_merge() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "parent/pom.xml",
            r#"<project>
  <groupId>com.example</groupId>
  <artifactId>parent</artifactId>
  <properties>
    <guava.version>18.0</guava.version>
    <junit.version>4.11</junit.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>${junit.version}</version>
    </dependency>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>1.7.5</version>
    </dependency>
  </dependencies>
</project>"#,
        );
        write(
            tmp.path(),
            "service/pom.xml",
            r#"<project>
  <groupId>com.example</groupId>
  <artifactId>service</artifactId>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <relativePath>../parent</relativePath>
  </parent>
  <properties>
    <junit.version>4.12</junit.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>${guava.version}</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>${junit.version}</version>
    </dependency>
  </dependencies>
</project>"#,
        );

        let mut registry = PomRegistry::new(tmp.path());
        let info = registry.get(Path::new("service")).unwrap();

        assert_eq!(info.artifact_id, "service");
        // Child property overrides the parent's.
        assert_eq!(info.property("junit.version"), "4.12");

        let find = |artifact: &str| {
            info.dependencies
                .iter()
                .find(|d| d.coord.artifact_id == artifact)
                .unwrap()
        };
        // Parent-declared property flows into the child's dependency.
        assert_eq!(find("guava").version.as_deref(), Some("18.0"));
        // Child declaration shadows the parent's junit 4.11.
        assert_eq!(find("junit").version.as_deref(), Some("4.12"));
        // Parent-only dependency is inherited.
        assert_eq!(find("slf4j-api").version.as_deref(), Some("1.7.5"));
        // The parent pom itself is a dependency.
        assert_eq!(find("parent").coord.group_id, "com.example");
    }

    #[test]
    fn test_missing_pom_resolves_empty() {
        let tmp = TempDir::new().unwrap();
        let mut registry = PomRegistry::new(tmp.path());
        let info = registry.get(Path::new("gone/pom.xml")).unwrap();
        assert!(info.artifact_id.is_empty());
        assert!(info.dependencies.is_empty());
    }

    #[test]
    fn test_registry_caches_by_normalized_path() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "service/pom.xml",
            "<project><groupId>g</groupId><artifactId>service</artifactId></project>",
        );
        let mut registry = PomRegistry::new(tmp.path());
        let a = registry.get(Path::new("service")).unwrap();
        let b = registry.get(Path::new("other/../service/pom.xml")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
