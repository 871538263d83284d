//! The class graph: linking decoded units and querying their relationships.
//!
//! # Architecture
//!
//! - [`GraphLinker`] merges [`crate::classfile::decoder::DecodedUnit`]s one at a time into a
//!   [`ClassGraph`], creating placeholder nodes for referenced but not yet linked names
//! - [`ClassGraph`] is the finished, read-only arena of [`TypeNode`]s, [`NamespaceNode`]s
//!   and [`ModuleNode`]s addressed by copyable handles
//! - [`query::QueryEngine`] walks the graph along one [`RelationshipKind`] at a time
//!
//! Every relationship is stored in both directions, so `Subclasses` is as cheap to follow as
//! `Superclasses`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use classscope::prelude::*;
//!
//! let context = ScanContext::new();
//! let mut decoder = UnitDecoder::new();
//! let mut linker = GraphLinker::new();
//! for path in ["Foo.class", "Bar.class"] {
//!     let unit = decoder.decode(&Physical::new(path)?, &ScanPolicy::default(), &context)?;
//!     linker.link(unit)?;
//! }
//!
//! let graph = linker.finish();
//! let engine = QueryEngine::new(&graph);
//! let supers = engine.related_by_name("Foo", RelationshipKind::Superclasses)?;
//! # Ok::<(), classscope::Error>(())
//! ```

mod classgraph;
mod linker;
mod node;
mod relationship;

pub mod query;

pub use classgraph::ClassGraph;
pub use linker::{GraphLinker, LinkOutcome, MAX_PACKAGE_DEPTH};
pub use node::{
    EdgeSet, ModuleId, ModuleNode, NamespaceId, NamespaceNode, TypeDetails, TypeId, TypeNode,
};
pub use query::{CancellationToken, QueryEngine, QueryOptions, RelationshipResult, TypeRef};
pub use relationship::RelationshipKind;
