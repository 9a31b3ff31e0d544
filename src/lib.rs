//! pomwright - BUILD manifest toolkit for Maven-backed Pants repositories
//!
//! This crate provides the core library functionality for pomwright:
//! parsing and validating BUILD target manifests, and generating them
//! from Maven pom.xml module metadata.

pub mod core;
pub mod graph;
pub mod ops;
pub mod pom;
pub mod syntax;
pub mod util;

pub use crate::core::address::Address;
pub use crate::core::build_file::BuildFile;
pub use crate::core::target::{Target, TargetKind};
pub use crate::core::workspace::Workspace;

pub use crate::graph::TargetGraph;
pub use crate::util::context::GlobalContext;
