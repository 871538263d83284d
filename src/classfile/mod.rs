//! Class file decoding.
//!
//! Everything needed to turn the bytes of one `.class` file into a [`decoder::DecodedUnit`]
//! lives here, organized leaves first:
//!
//! - [`constpool`] - Constant pool index, modified UTF-8 and the shared intern table
//! - [`signatures`] - Descriptor and generic signature grammars and their AST
//! - [`annotations`] - Annotation element value grammar
//! - [`modifiers`] - Access flag sets for classes, fields, methods and parameters
//! - [`decoder`] - The positional decoder and its scan policy
//! - [`diagnostics`] - Sink for non-fatal problems found while decoding and linking
//!
//! Nothing in this module touches the graph; decoded units are plain owned values that the
//! [`crate::graph::GraphLinker`] consumes.

pub mod annotations;
pub mod constpool;
pub mod decoder;
pub mod diagnostics;
pub mod modifiers;
pub mod signatures;
