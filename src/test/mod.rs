//! Shared fixtures for unit tests.
//!
//! The builders assemble constant pools, annotation element values and complete class files
//! in memory, so every decoder path can be exercised without compiled `.class` samples.
//! They only depend on the standard library; integration tests include the same files.

mod builders;

pub use builders::*;
