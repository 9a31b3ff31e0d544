//! The target graph - targets as nodes, dependency references as edges.
//!
//! Built once from a set of parsed manifests and then read-only. Carries
//! the manifest-level checks: every dependency reference must resolve to a
//! declared target, and the edge relation must be acyclic (an edge must be
//! buildable before its referencing target).

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Topo;
use serde::Serialize;

use crate::core::address::Address;
use crate::core::build_file::BuildFile;
use crate::core::target::Target;
use crate::syntax::Span;

/// A violation found while verifying the graph.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A dependency reference that resolves to no declared target.
    DanglingEdge {
        from: Address,
        to: Address,
        /// The reference text as written.
        spec: String,
        /// Manifest that contains the reference.
        #[serde(serialize_with = "crate::graph::serialize_path")]
        file: PathBuf,
        #[serde(skip)]
        span: Span,
    },

    /// A dependency cycle; members are listed in graph order.
    Cycle { members: Vec<Address> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DanglingEdge { from, to, .. } => {
                write!(f, "`{}` depends on `{}`, which is not declared", from, to)
            }
            Violation::Cycle { members } => {
                let names: Vec<String> = members.iter().map(|a| a.to_string()).collect();
                write!(f, "dependency cycle: {}", names.join(" -> "))
            }
        }
    }
}

fn serialize_path<S>(path: &PathBuf, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&path.display())
}

/// The immutable graph over all declared targets.
#[derive(Debug, Default)]
pub struct TargetGraph {
    graph: DiGraph<Address, ()>,
    nodes: HashMap<Address, NodeIndex>,
    targets: HashMap<Address, Target>,
    /// Manifest path per declared target, for diagnostics.
    files: HashMap<Address, PathBuf>,
}

impl TargetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from parsed manifests.
    ///
    /// Every declared target becomes a node. Edges to undeclared targets
    /// are not inserted; they surface from [`TargetGraph::verify`].
    pub fn from_build_files<'a>(files: impl IntoIterator<Item = &'a BuildFile>) -> Self {
        let mut graph = TargetGraph::new();
        let files: Vec<&BuildFile> = files.into_iter().collect();

        for file in &files {
            for target in &file.targets {
                graph.add_target(target.clone(), file.path.clone());
            }
        }
        for file in &files {
            for target in &file.targets {
                for dep in &target.dependencies {
                    graph.add_edge(target.address, dep.address);
                }
            }
        }
        graph
    }

    fn add_target(&mut self, target: Target, file: PathBuf) {
        let address = target.address;
        if self.nodes.contains_key(&address) {
            return;
        }
        let node = self.graph.add_node(address);
        self.nodes.insert(address, node);
        self.files.insert(address, file);
        self.targets.insert(address, target);
    }

    fn add_edge(&mut self, from: Address, to: Address) {
        if let (Some(&from_node), Some(&to_node)) = (self.nodes.get(&from), self.nodes.get(&to)) {
            if !self.graph.contains_edge(from_node, to_node) {
                self.graph.add_edge(from_node, to_node, ());
            }
        }
    }

    /// Look up a declared target.
    pub fn target(&self, address: Address) -> Option<&Target> {
        self.targets.get(&address)
    }

    /// Whether an address is declared.
    pub fn contains(&self, address: Address) -> bool {
        self.nodes.contains_key(&address)
    }

    /// All declared targets, sorted by address.
    pub fn targets(&self) -> Vec<&Target> {
        let mut all: Vec<&Target> = self.targets.values().collect();
        all.sort_by_key(|t| t.address);
        all
    }

    /// Number of declared targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of resolved dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Direct dependencies of a target, in declaration order.
    pub fn deps(&self, address: Address) -> Vec<Address> {
        // Declaration order comes from the target record, not petgraph's
        // adjacency order.
        match self.targets.get(&address) {
            Some(target) => target
                .dep_addresses()
                .filter(|a| self.contains(*a))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Targets that depend on the given target.
    pub fn dependents(&self, address: Address) -> Vec<Address> {
        if let Some(&node) = self.nodes.get(&address) {
            let mut out: Vec<Address> = self
                .graph
                .neighbors_directed(node, petgraph::Direction::Incoming)
                .map(|n| self.graph[n])
                .collect();
            out.sort();
            out
        } else {
            Vec::new()
        }
    }

    /// Targets in topological order: dependencies before dependents.
    ///
    /// Cycle members are absent from the result; `verify` reports them.
    pub fn topo_order(&self) -> Vec<Address> {
        let mut topo = Topo::new(&self.graph);
        let mut order = Vec::new();
        while let Some(node) = topo.next(&self.graph) {
            order.push(self.graph[node]);
        }
        // Edges point from dependent to dependency, so reverse to put
        // dependencies first.
        order.reverse();
        order
    }

    /// All transitive dependencies of a target.
    pub fn transitive_deps(&self, address: Address) -> Vec<Address> {
        let mut visited = std::collections::HashSet::new();
        let mut stack = vec![address];
        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.deps(current));
            }
        }
        visited.remove(&address);
        let mut out: Vec<Address> = visited.into_iter().collect();
        out.sort();
        out
    }

    /// Run the manifest-level checks and return every violation.
    pub fn verify(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        // 1. Every dependency reference must resolve to a declared target.
        for target in self.targets() {
            for dep in &target.dependencies {
                if !self.contains(dep.address) {
                    violations.push(Violation::DanglingEdge {
                        from: target.address,
                        to: dep.address,
                        spec: dep.spec.clone(),
                        file: self
                            .files
                            .get(&target.address)
                            .cloned()
                            .unwrap_or_default(),
                        span: dep.span,
                    });
                }
            }
        }

        // 2. The edge relation must be acyclic. Tarjan returns singleton
        // components for acyclic nodes; only real cycles are reported.
        for component in tarjan_scc(&self.graph) {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| self.graph.contains_edge(n, n));
            if is_cycle {
                let mut members: Vec<Address> =
                    component.iter().map(|&n| self.graph[n]).collect();
                members.sort();
                violations.push(Violation::Cycle { members });
            }
        }

        violations
    }
}
