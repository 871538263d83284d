// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # classscope
//!
//! A fast, parallel scanner for JVM class files. `classscope` decodes compiled units into
//! lightweight records, links them into a graph of types, packages and modules, and answers
//! relationship queries over that graph: subclasses, implementors, annotated types, inner
//! classes, dependencies and their transitive closures.
//!
//! ## Features
//!
//! - **Single-pass decoding** - Constant pool indexed in one forward pass, strings materialized on demand
//! - **Full generic signatures** - Class, method and field signatures parsed into a typed AST
//! - **Annotation values** - Constants, enums, class literals, nested annotations and arrays
//! - **Parallel scanning** - One reusable decoder per worker, single-writer linking
//! - **Relationship algebra** - Union, intersection, exclusion and filtering of query results
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use classscope::prelude::*;
//!
//! let sources: Vec<Box<dyn ByteSource>> = vec![
//!     Box::new(Physical::new("classes/com/example/Service.class")?),
//!     Box::new(Physical::new("classes/com/example/ServiceImpl.class")?),
//! ];
//!
//! let session = ScanSession::new(ScanPolicy::default());
//! session.scan(sources)?;
//! let report = session.finish()?;
//!
//! let engine = QueryEngine::new(&report.graph);
//! let implementors = engine.related_by_name("com.example.Service", RelationshipKind::Implementors)?;
//! for type_ref in &implementors {
//!     println!("{type_ref}");
//! }
//! # Ok::<(), classscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`file`] - Byte sources ([`Physical`], [`Memory`]) and the big-endian [`Parser`]
//! - [`classfile`] - Constant pool index, signature and annotation grammars, the
//!   [`classfile::decoder::UnitDecoder`] and the diagnostics sink
//! - [`graph`] - The [`graph::GraphLinker`], the finished [`graph::ClassGraph`] and the
//!   [`graph::query`] engine
//! - [`scan`] - Shared scan state, extended scanning and the [`scan::ScanSession`] driver
//! - [`Error`] and [`Result`] - Error handling with a coarse [`FailureKind`] classification
//!
//! ## Lower-level Use
//!
//! The session is a convenience; decoder and linker can be driven directly:
//!
//! ```rust,no_run
//! use classscope::prelude::*;
//!
//! let context = ScanContext::new();
//! let mut decoder = UnitDecoder::new();
//! let mut linker = GraphLinker::new();
//!
//! match decoder.decode(&Physical::new("Foo.class")?, &ScanPolicy::default(), &context) {
//!     Ok(unit) => {
//!         linker.link(unit)?;
//!     }
//!     Err(error) if error.is_skip() => {}
//!     Err(error) => return Err(error),
//! }
//!
//! let graph = linker.finish();
//! println!("{} types", graph.type_count());
//! # Ok::<(), classscope::Error>(())
//! ```

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use classscope::prelude::*;
///
/// let session = ScanSession::new(ScanPolicy::comprehensive());
/// let report = session.finish()?;
/// assert_eq!(report.graph.type_count(), 0);
/// # Ok::<(), classscope::Error>(())
/// ```
pub mod prelude;

pub mod classfile;
pub mod file;
pub mod graph;
pub mod scan;

/// `classscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `classscope` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::{classfile::decoder::UnitDecoder, scan::ScanContext, Error, FailureKind, Memory, ScanPolicy};
///
/// let context = ScanContext::new();
/// match UnitDecoder::new().decode(&Memory::new(vec![0; 8]), &ScanPolicy::default(), &context) {
///     Ok(unit) => println!("Decoded {}", unit.name),
///     Err(Error::Skipped(reason)) => println!("Skipped: {}", reason),
///     Err(e) if e.kind() == FailureKind::MalformedFormat => println!("Malformed: {}", e),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

pub use error::{FailureKind, SkipReason};

pub use classfile::decoder::ScanPolicy;

pub use file::{memory::Memory, parser::Parser, physical::Physical, ByteSource};
