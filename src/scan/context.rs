use std::sync::Arc;

use crate::{
    classfile::{constpool::StringInterner, diagnostics::Diagnostics},
    scan::ExternalScheduler,
};

/// Shared state of one scan
///
/// Holds everything decode and link calls share: the string intern table, the diagnostics
/// sink and the optional external scheduler. A context is created per scan session; nothing
/// in this crate keeps process-wide state. All members are safe to use from many decode
/// threads at once.
pub struct ScanContext {
    /// Session-wide string table
    pub interner: StringInterner,
    /// Diagnostics sink
    pub diagnostics: Diagnostics,
    /// Extended scanning callback
    pub scheduler: Option<Arc<dyn ExternalScheduler>>,
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanContext {
    /// Context without external scheduler.
    #[must_use]
    pub fn new() -> Self {
        ScanContext {
            interner: StringInterner::new(),
            diagnostics: Diagnostics::new(),
            scheduler: None,
        }
    }

    /// Attach an external scheduler.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Arc<dyn ExternalScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }
}
