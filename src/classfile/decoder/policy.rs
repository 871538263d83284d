//! Scan policy for class file decoding
//!
//! The policy decides which members and attributes a decoded unit materializes. Anything
//! excluded is still skipped by its declared length, so the policy never affects cursor
//! alignment.

use crate::classfile::signatures::DEFAULT_MAX_DEPTH;

/// Configuration for decoding class files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScanPolicy {
    /// Decode non-public classes instead of skipping them
    pub ignore_class_visibility: bool,

    /// Keep non-public fields
    pub ignore_field_visibility: bool,

    /// Keep non-public methods
    pub ignore_method_visibility: bool,

    /// Materialize field records
    pub enable_field_info: bool,

    /// Materialize method records
    pub enable_method_info: bool,

    /// Decode annotations on classes, fields, methods and parameters
    pub enable_annotation_info: bool,

    /// Decode `ConstantValue` initializers of static final fields (requires field info)
    pub enable_constant_initializer_values: bool,

    /// Also decode `RuntimeInvisible*Annotations` (retention `CLASS`)
    pub include_invisible_annotations: bool,

    /// Schedule externally referenced supertypes, interfaces, annotations and outer classes
    /// for decoding
    pub extend_scanning: bool,

    /// Nesting bound for signatures and annotation values (default: 64)
    pub max_grammar_depth: usize,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            ignore_class_visibility: false,
            ignore_field_visibility: false,
            ignore_method_visibility: false,
            enable_field_info: true,
            enable_method_info: true,
            enable_annotation_info: true,
            enable_constant_initializer_values: false,
            include_invisible_annotations: false,
            extend_scanning: false,
            max_grammar_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ScanPolicy {
    /// Class hierarchy only
    ///
    /// No field, method or annotation information. The cheapest policy for building a
    /// subclass/implementor graph of public classes.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            ignore_class_visibility: false,
            ignore_field_visibility: false,
            ignore_method_visibility: false,
            enable_field_info: false,
            enable_method_info: false,
            enable_annotation_info: false,
            enable_constant_initializer_values: false,
            include_invisible_annotations: false,
            extend_scanning: false,
            max_grammar_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Everything in every scanned unit, regardless of visibility
    #[must_use]
    pub fn comprehensive() -> Self {
        Self {
            ignore_class_visibility: true,
            ignore_field_visibility: true,
            ignore_method_visibility: true,
            enable_field_info: true,
            enable_method_info: true,
            enable_annotation_info: true,
            enable_constant_initializer_values: true,
            include_invisible_annotations: true,
            extend_scanning: false,
            max_grammar_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Default information, plus decoding of externally referenced types
    ///
    /// Supertypes, interfaces, annotations and outer classes that are not among the scanned
    /// units are requested from the external scheduler and decoded in follow-up waves.
    #[must_use]
    pub fn external() -> Self {
        Self {
            extend_scanning: true,
            ..Self::default()
        }
    }
}
