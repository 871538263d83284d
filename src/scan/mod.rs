//! Scan orchestration: shared state, extended scanning and the scan driver.
//!
//! A [`ScanContext`] carries what all decode and link calls of one scan share. The
//! [`ScanSession`] drives a complete scan on top of it, while the lower-level
//! [`crate::classfile::decoder::UnitDecoder`] and [`crate::graph::GraphLinker`] remain
//! available for callers that schedule work themselves.

mod context;
mod scheduler;
mod session;

pub use context::ScanContext;
pub use scheduler::{DedupScheduler, ExternalScheduler, MemoryLocator, TypeLocator};
pub use session::{ScanReport, ScanSession};
