//! Core data model: addresses, targets, manifests, workspace.

pub mod address;
pub mod build_file;
pub mod target;
pub mod workspace;

pub use address::Address;
pub use build_file::BuildFile;
pub use target::{DepRef, Target, TargetKind};
pub use workspace::Workspace;
