//! Maven POM analysis.
//!
//! pomwright generates target manifests from an existing Maven build. This
//! module reads `pom.xml` files and turns them into the cooked form the
//! generator consumes: resolved coordinates, merged parent-chain
//! dependencies, and per-module target inference.

pub mod deps;
pub mod info;
pub mod local;
pub mod model;
pub mod provides;
pub mod reader;

pub use deps::DepsFromPom;
pub use info::{PomInfo, PomRegistry};
pub use local::LocalTargetCache;
pub use model::{MavenCoord, ParentRef, PomDependency};
pub use provides::ProvidesIndex;
pub use reader::{PomError, RawPom};
