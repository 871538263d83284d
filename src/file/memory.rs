//! In-memory byte source.
//!
//! [`crate::file::memory::Memory`] owns a `Vec<u8>` holding one class file. It is the natural
//! source for class files extracted from archives by an external I/O layer, and for tests.

use super::{checked_slice, ByteSource};
use crate::Result;

/// Owned in-memory class file data with optional origin labels.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    data: Vec<u8>,
    classpath_element: Option<String>,
    module: Option<String>,
}

impl Memory {
    /// Wrap the given bytes.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Memory {
        Memory {
            data,
            classpath_element: None,
            module: None,
        }
    }

    /// Label the classpath element this unit was found in.
    #[must_use]
    pub fn with_classpath_element(mut self, element: impl Into<String>) -> Memory {
        self.classpath_element = Some(element.into());
        self
    }

    /// Label the module this unit belongs to.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Memory {
        self.module = Some(module.into());
        self
    }
}

impl ByteSource for Memory {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        checked_slice(&self.data, offset, len)
    }

    fn data(&self) -> &[u8] {
        self.data.as_slice()
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
