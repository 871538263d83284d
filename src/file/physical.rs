//! Memory-mapped file byte source.
//!
//! [`crate::file::physical::Physical`] maps a loose `.class` file from disk. The mapping is
//! read-only; modifying the file while it is mapped is undefined behaviour at the operating
//! system level, which is the usual caveat of `memmap2`.

use super::{checked_slice, ByteSource};
use crate::Result;

use memmap2::Mmap;
use std::{fs, path::Path};

/// A class file mapped into memory.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
    classpath_element: Option<String>,
    module: Option<String>,
}

impl Physical {
    /// Map the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;
        Self::from_std_file(file)
    }

    /// Map an already opened file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be mapped.
    #[allow(clippy::needless_pass_by_value)]
    pub fn from_std_file(file: fs::File) -> Result<Physical> {
        // Mmap keeps the underlying file alive for the lifetime of the mapping.
        let mmap = unsafe { Mmap::map(&file) }?;

        Ok(Physical {
            data: mmap,
            classpath_element: None,
            module: None,
        })
    }

    /// Label the classpath element this unit was found in.
    #[must_use]
    pub fn with_classpath_element(mut self, element: impl Into<String>) -> Physical {
        self.classpath_element = Some(element.into());
        self
    }

    /// Label the module this unit belongs to.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Physical {
        self.module = Some(module.into());
        self
    }
}

impl ByteSource for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        checked_slice(&self.data, offset, len)
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn classpath_element(&self) -> Option<&str> {
        self.classpath_element.as_deref()
    }

    fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }
}
