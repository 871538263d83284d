//! Constant pool decoding and resolution.
//!
//! Every class file starts its payload with an indexed table of constants: strings, numeric
//! literals and symbolic references that the rest of the file addresses by 1-based index.
//! This module decodes that table into a compact index and resolves entries on demand.
//!
//! # Key Components
//!
//! - [`ConstantPool`] - parallel-array index over one class file's pool, with
//!   [`ConstantPool::resolve`] for the UTF8 span behind an entry and typed numeric accessors
//! - [`PoolBuffers`] - recycled storage so a decoder can index unit after unit without
//!   reallocating
//! - [`ConstantTag`] - the entry kinds
//! - [`StringInterner`] - session-wide deduplication of every materialized string
//! - [`decode_modified_utf8`] - the JVM's string encoding
//!
//! # Indexing Rules
//!
//! Index 0 is never valid. `Long` and `Double` entries take two slots; the second one is
//! unusable and any attempt to read it is a [`crate::Error::Malformed`] failure, as is any
//! index at or beyond the declared count.

mod intern;
mod pool;
mod tag;

pub use intern::{decode_modified_utf8, StringInterner};
pub use pool::{ConstantPool, PoolBuffers};
pub use tag::ConstantTag;
