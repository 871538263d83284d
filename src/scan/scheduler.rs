//! Extended scanning of externally referenced types.
//!
//! When [`crate::ScanPolicy::extend_scanning`] is set, the decoder asks an
//! [`ExternalScheduler`] for the bytes of every supertype, interface, annotation and outer
//! class it sees. The scheduler answers each name at most once for the whole scan, so a type
//! referenced from a thousand units is decoded once.
//!
//! Finding the bytes is left to a [`TypeLocator`], the boundary to whatever owns the
//! classpath (archives, directories, module images).

use std::collections::HashMap;

use dashmap::DashSet;

use crate::{ByteSource, Memory};

/// Callback the decoder uses to request decoding of a referenced type
pub trait ExternalScheduler: Send + Sync {
    /// Return a byte source for `name` the first time it is requested and it can be found,
    /// `None` on every later request or if it cannot be found.
    fn schedule_if_unseen(&self, name: &str) -> Option<Box<dyn ByteSource>>;

    /// Record `name` as already handled, so later requests for it return `None`.
    ///
    /// The scan session calls this for every unit of the original input.
    fn mark_seen(&self, name: &str);
}

/// Finds the class file for a dotted type name
pub trait TypeLocator: Send + Sync {
    /// Byte source for `name`, or `None` if the name is not on the classpath.
    fn locate(&self, name: &str) -> Option<Box<dyn ByteSource>>;
}

/// [`ExternalScheduler`] deduplicating names through a concurrent set
pub struct DedupScheduler<L: TypeLocator> {
    seen: DashSet<String>,
    locator: L,
}

impl<L: TypeLocator> DedupScheduler<L> {
    /// Scheduler answering from `locator`.
    pub fn new(locator: L) -> Self {
        DedupScheduler {
            seen: DashSet::new(),
            locator,
        }
    }

    /// Number of distinct names requested or marked so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl<L: TypeLocator> ExternalScheduler for DedupScheduler<L> {
    fn schedule_if_unseen(&self, name: &str) -> Option<Box<dyn ByteSource>> {
        if self.seen.contains(name) || !self.seen.insert(name.to_string()) {
            return None;
        }

        let source = self.locator.locate(name);
        if source.is_some() {
            tracing::trace!("Scheduled external type {}", name);
        }
        source
    }

    fn mark_seen(&self, name: &str) {
        if !self.seen.contains(name) {
            self.seen.insert(name.to_string());
        }
    }
}

/// [`TypeLocator`] over class files held in memory, keyed by dotted name
#[derive(Debug, Default, Clone)]
pub struct MemoryLocator {
    units: HashMap<String, Memory>,
}

impl MemoryLocator {
    /// Empty locator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the class file for `name`.
    pub fn insert(&mut self, name: impl Into<String>, unit: Memory) {
        self.units.insert(name.into(), unit);
    }
}

impl TypeLocator for MemoryLocator {
    fn locate(&self, name: &str) -> Option<Box<dyn ByteSource>> {
        self.units
            .get(name)
            .map(|unit| Box::new(unit.clone()) as Box<dyn ByteSource>)
    }
}
