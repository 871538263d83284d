//! Relationship queries over a finished [`crate::graph::ClassGraph`].
//!
//! A [`QueryEngine`] answers "which types are related to these seeds under this
//! relationship" with a [`RelationshipResult`] holding both the direct neighbours and the
//! transitive closure. Results combine through set algebra (union, intersection,
//! exclusion) and can be filtered by arbitrary predicates.
//!
//! Queries only read the graph. Long traversals can be stopped from another thread through
//! a [`CancellationToken`], which is checked between expansion steps.

mod cancel;
mod engine;
mod result;

pub use cancel::CancellationToken;
pub use engine::{QueryEngine, QueryOptions};
pub use result::{RelationshipResult, TypeRef};
