//! Manifest generation from an existing Maven build.
//!
//! For every module the top pom lists, analyze its pom and emit an
//! aggregate manifest: a `target(name = 'lib')` carrying the module's
//! compile-scope dependency refs, plus a `target(name = 'test')` when
//! test-scope refs exist. Only address refs are written; external
//! `jar(...)` stanzas belong in the third-party package and are logged
//! for review instead.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::address::Address;
use crate::core::target::{Target, TargetKind};
use crate::core::workspace::Workspace;
use crate::pom::info::{substitute, PomRegistry};
use crate::pom::local::LocalTargetCache;
use crate::pom::provides::ProvidesIndex;
use crate::pom::reader::RawPom;
use crate::pom::DepsFromPom;
use crate::syntax::render::render_build_file_with_header;
use crate::util::fs;

const GENERATED_HEADER: &str =
    "Generated by pomwright from pom.xml. Do not edit; run `pomwright gen` to refresh.";

#[derive(Debug, Clone, Copy, Default)]
pub struct GenOptions {
    /// Plan and render without touching the filesystem.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenStatus {
    /// Written, or would be under `--dry-run`.
    Written,
    /// Existing manifest already matches.
    Unchanged,
    /// Module pom missing or empty.
    Skipped,
}

/// One module's generation outcome.
#[derive(Debug, Serialize)]
pub struct GeneratedFile {
    pub module: String,
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub status: GenStatus,
    /// Rendered manifest text, empty when skipped.
    #[serde(skip)]
    pub contents: String,
}

fn serialize_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&path.display())
}

#[derive(Debug, Default, Serialize)]
pub struct GenReport {
    pub files: Vec<GeneratedFile>,
}

impl GenReport {
    pub fn written(&self) -> usize {
        self.count(GenStatus::Written)
    }

    pub fn unchanged(&self) -> usize {
        self.count(GenStatus::Unchanged)
    }

    pub fn skipped(&self) -> usize {
        self.count(GenStatus::Skipped)
    }

    fn count(&self, status: GenStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }
}

/// Generate manifests for every module of the workspace's Maven build.
pub fn generate(workspace: &Workspace, options: GenOptions) -> Result<GenReport> {
    let top_pom_path = workspace.top_pom_path();
    let top = match RawPom::read(&top_pom_path)? {
        Some(top) => top,
        None => bail!("no pom.xml at {}", top_pom_path.display()),
    };
    if top.modules.is_empty() {
        bail!("{} lists no modules", top_pom_path.display());
    }
    info!("generating manifests for {} modules", top.modules.len());

    let managed = managed_coords(&top);
    let mut registry = PomRegistry::new(workspace.root());
    let provides = ProvidesIndex::build(&mut registry, &top.modules)?;
    let mut local_targets = LocalTargetCache::new(workspace.root());

    let config = workspace.config();
    let deps_from_pom = DepsFromPom::new(
        &provides,
        &managed,
        &config.generate.third_party_dir,
        &config.generate.exclude_project_targets,
    );

    let mut report = GenReport::default();
    for module in &top.modules {
        let manifest_path = workspace
            .root()
            .join(module)
            .join(&config.workspace.build_file_name);

        let pom_rel = Path::new(module).join("pom.xml");
        let pom_info = registry.get(&pom_rel)?;
        if pom_info.artifact_id.is_empty() {
            debug!("skipping module without a pom: {module}");
            report.files.push(GeneratedFile {
                module: module.clone(),
                path: manifest_path,
                status: GenStatus::Skipped,
                contents: String::new(),
            });
            continue;
        }

        let deps = deps_from_pom.get(&mut registry, &mut local_targets, &pom_rel)?;
        let targets = module_targets(module, &deps.lib, &deps.test)
            .with_context(|| format!("building targets for module {module}"))?;
        let contents = render_build_file_with_header(GENERATED_HEADER, &targets);

        let status = if std::fs::read_to_string(&manifest_path).ok().as_deref()
            == Some(contents.as_str())
        {
            GenStatus::Unchanged
        } else {
            if !options.dry_run {
                fs::write_string(&manifest_path, &contents)?;
            }
            GenStatus::Written
        };

        report.files.push(GeneratedFile {
            module: module.clone(),
            path: manifest_path,
            status,
            contents,
        });
    }

    Ok(report)
}

/// `groupId.artifactId` names pinned in the top pom's dependencyManagement,
/// with property references expanded.
fn managed_coords(top: &RawPom) -> HashSet<String> {
    let properties: HashMap<String, String> = top.properties.iter().cloned().collect();
    top.dependency_management
        .iter()
        .map(|dep| {
            format!(
                "{}.{}",
                substitute(&properties, &dep.coord.group_id),
                substitute(&properties, &dep.coord.artifact_id)
            )
        })
        .collect()
}

fn module_targets(module: &str, lib_refs: &[String], test_refs: &[String]) -> Result<Vec<Target>> {
    let lib_deps = address_refs(lib_refs);
    let mut test_deps = vec![":lib".to_string()];
    test_deps.extend(address_refs(test_refs));

    let lib = Target::new(
        Address::parse(&format!("{module}:lib"))?,
        TargetKind::Alias,
    )
    .with_dependencies(lib_deps)?;

    let mut targets = vec![lib];
    if test_deps.len() > 1 {
        targets.push(
            Target::new(
                Address::parse(&format!("{module}:test"))?,
                TargetKind::Alias,
            )
            .with_dependencies(test_deps)?,
        );
    }
    Ok(targets)
}

/// Keep refs that name workspace or third-party targets. `jar(...)`
/// stanzas are external artifacts with no target address.
fn address_refs(refs: &[String]) -> Vec<String> {
    refs.iter()
        .filter(|r| {
            if r.starts_with("jar(") {
                debug!("external dependency left to the third-party package: {r}");
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}
