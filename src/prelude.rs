//! # classscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the classscope library. Import this module to get quick access to the essential
//! types for scanning class files and querying the resulting graph.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all classscope operations
pub use crate::Error;

/// The result type used throughout classscope
pub use crate::Result;

/// Failure classification and skip reasons
pub use crate::{FailureKind, SkipReason};

// ================================================================================================
// Byte Sources and Parsing
// ================================================================================================

/// Byte source abstraction and its implementations
pub use crate::{ByteSource, Memory, Physical};

/// Low-level big-endian parser
pub use crate::Parser;

// ================================================================================================
// Scanning
// ================================================================================================

/// Scan driver, shared state and extended scanning
pub use crate::scan::{
    DedupScheduler, ExternalScheduler, MemoryLocator, ScanContext, ScanReport, ScanSession,
    TypeLocator,
};

/// Per-unit decoding
pub use crate::classfile::decoder::{
    ClassFileVersion, DecodedUnit, FieldInfo, MethodInfo, ScanPolicy, UnitDecoder, UnitKind,
};

/// Access flags
pub use crate::classfile::modifiers::{ClassModifiers, FieldModifiers, MethodModifiers};

/// Diagnostics collected during a scan
pub use crate::classfile::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};

// ================================================================================================
// Grammars
// ================================================================================================

/// Generic signature AST
pub use crate::classfile::signatures::{
    BaseType, ClassRefType, ClassSignature, MethodSignature, TypeArgument, TypeParameter,
    TypeSignature, TypeVariable, Wildcard,
};

/// Annotation values
pub use crate::classfile::annotations::{AnnotationElement, AnnotationInfo, AnnotationValue};

// ================================================================================================
// Graph and Queries
// ================================================================================================

/// The class graph and its linker
pub use crate::graph::{
    ClassGraph, GraphLinker, LinkOutcome, ModuleId, ModuleNode, NamespaceId, NamespaceNode,
    RelationshipKind, TypeId, TypeNode,
};

/// Relationship queries
pub use crate::graph::query::{
    CancellationToken, QueryEngine, QueryOptions, RelationshipResult, TypeRef,
};
