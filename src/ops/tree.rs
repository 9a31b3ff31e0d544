//! Dependency tree rendering.

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::core::address::Address;
use crate::core::workspace::Workspace;
use crate::graph::TargetGraph;

/// Render the dependency tree under a target.
///
/// A target already printed elsewhere in the tree is marked `(*)` and not
/// expanded again, so shared subtrees appear once.
pub fn tree(workspace: &Workspace, spec: &str) -> Result<String> {
    let files = super::load_build_files(workspace)?;
    let graph = TargetGraph::from_build_files(&files);

    let root = Address::parse(spec)?;
    if !graph.contains(root) {
        bail!("target `{root}` is not declared in this workspace");
    }

    let mut out = format!("{root}\n");
    let mut seen = HashSet::from([root]);
    render_children(&graph, root, "", &mut seen, &mut out);
    Ok(out)
}

fn render_children(
    graph: &TargetGraph,
    node: Address,
    prefix: &str,
    seen: &mut HashSet<Address>,
    out: &mut String,
) {
    let deps = graph.deps(node);
    for (i, dep) in deps.iter().enumerate() {
        let last = i == deps.len() - 1;
        let branch = if last { "└── " } else { "├── " };

        if seen.insert(*dep) {
            out.push_str(&format!("{prefix}{branch}{dep}\n"));
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_children(graph, *dep, &child_prefix, seen, out);
        } else {
            out.push_str(&format!("{prefix}{branch}{dep} (*)\n"));
        }
    }
}
