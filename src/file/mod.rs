//! Byte source abstraction and low-level binary parsing.
//!
//! The scanner never opens archives or walks directories itself; an external I/O layer hands
//! it pre-resolved byte sources, one per compiled unit. This module defines that boundary
//! through the [`crate::file::ByteSource`] trait and ships two implementations.
//!
//! # Key Components
//!
//! ## Core Types
//! - [`crate::file::ByteSource`] - Trait for random-access class file data
//!
//! ## Parsing Infrastructure
//! - [`crate::file::parser::Parser`] - Cursor-based big-endian parser
//! - [`crate::file::io`] - Low-level bounds-checked primitive reads
//!
//! ## Source Implementations
//! - [`crate::file::physical::Physical`] - Memory-mapped file on disk
//! - [`crate::file::memory::Memory`] - Owned in-memory buffer
//!
//! # Examples
//!
//! ```rust
//! use classscope::{ByteSource, Memory};
//!
//! let source = Memory::new(vec![0xCA, 0xFE, 0xBA, 0xBE])
//!     .with_classpath_element("lib/app.jar")
//!     .with_module("com.example.app");
//!
//! assert_eq!(source.len(), 4);
//! assert_eq!(source.data_slice(0, 2)?, &[0xCA, 0xFE]);
//! assert_eq!(source.classpath_element(), Some("lib/app.jar"));
//! assert_eq!(source.module(), Some("com.example.app"));
//! # Ok::<(), classscope::Error>(())
//! ```

pub mod io;
pub mod memory;
pub mod parser;
pub mod physical;

use crate::Result;

/// Random-access provider of the bytes of one compiled unit.
///
/// Implementations do not transfer ownership of the underlying storage to the scanner; the
/// decoder only borrows the data for the duration of one decode call. The optional labels
/// identify where the unit came from: the classpath element drives duplicate masking during
/// linking, and the module name attaches the unit to a module node.
pub trait ByteSource: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total size of the data in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the source holds no data.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The classpath element (archive path, directory, module layer) providing this unit.
    fn classpath_element(&self) -> Option<&str> {
        None
    }

    /// The module this unit belongs to, for module-qualified sources.
    fn module(&self) -> Option<&str> {
        None
    }
}

/// Bounds-checked slice of `data`, shared by the source implementations.
pub(crate) fn checked_slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let Some(offset_end) = offset.checked_add(len) else {
        return Err(out_of_bounds_error!());
    };

    if offset_end > data.len() {
        return Err(out_of_bounds_error!());
    }

    Ok(&data[offset..offset_end])
}
