//! Shared helpers for the integration tests.

#![allow(dead_code)]

#[path = "../../src/test/builders/mod.rs"]
mod builders;

pub use builders::*;

use classscope::prelude::*;

/// Byte source for a built class file, labelled with a classpath element.
pub fn source(builder: ClassFileBuilder, element: &str) -> Box<dyn ByteSource> {
    Box::new(Memory::new(builder.build()).with_classpath_element(element))
}

/// Scan `builders` from one classpath element and return the report.
pub fn scan(policy: ScanPolicy, builders: Vec<ClassFileBuilder>) -> Result<ScanReport> {
    let session = ScanSession::new(policy);
    session.scan(
        builders
            .into_iter()
            .map(|builder| source(builder, "classes"))
            .collect(),
    )?;
    session.finish()
}

/// Decode one built class file with `policy`.
pub fn decode(builder: ClassFileBuilder, policy: &ScanPolicy) -> Result<DecodedUnit> {
    let context = ScanContext::new();
    UnitDecoder::new().decode(&Memory::new(builder.build()), policy, &context)
}
