//! Type descriptor and generic signature parsing.
//!
//! Class files describe types in two related textual grammars. Plain *descriptors* (the
//! `descriptor_index` of every field and method) have no generics. Generic *signatures*
//! (the `Signature` attribute) extend them with type parameters, type arguments, wildcards,
//! type variables and throws clauses.
//!
//! # Grammar Summary
//!
//! | Production | Form | Example |
//! |------------|------|---------|
//! | Base type | single character | `I`, `Z`, `V` (return only) |
//! | Class type | `L` name [`<`args`>`] {`.`inner [`<`args`>`]} `;` | `Ljava/util/Map<TK;TV;>.Entry;` |
//! | Array | `[` element | `[[I` |
//! | Type variable | `T` name `;` | `TE;` |
//! | Type argument | `*`, `+`bound, `-`bound, bound | `+Ljava/lang/Number;` |
//! | Type parameter | name `:` [classBound] {`:` interfaceBound} | `T::Ljava/lang/Comparable<TT;>;` |
//! | Method | [params] `(` types `)` result {`^` thrown} | `<T:Ljava/lang/Object;>(TT;)V` |
//! | Class | [params] superclass {superinterface} | `Ljava/lang/Object;Ljava/lang/Runnable;` |
//!
//! The parser is recursive descent with one character of lookahead, must consume the whole
//! input, and bounds its nesting depth. Type variables come out unresolved; the graph linker
//! binds them in a second pass.
//!
//! # Examples
//!
//! ```rust
//! use classscope::classfile::signatures::{parse_field_signature, SignatureEncode};
//!
//! let ty = parse_field_signature("Ljava/util/Map<TK;+Ljava/util/List<TV;>;>;")?;
//! assert_eq!(ty.to_string(), "java.util.Map<K, ? extends java.util.List<V>>");
//! assert_eq!(ty.to_jvm_signature(), "Ljava/util/Map<TK;+Ljava/util/List<TV;>;>;");
//! assert!(ty.referenced_class_names().contains("java.util.List"));
//! # Ok::<(), classscope::Error>(())
//! ```

mod display;
mod encode;
mod parser;
mod types;

pub use encode::SignatureEncode;
pub use parser::{SignatureParser, DEFAULT_MAX_DEPTH};
pub use types::*;

use crate::Result;

/// Parse a plain field descriptor such as `[Ljava/lang/String;`
///
/// # Errors
/// Returns [`crate::Error::GrammarParse`] if the input is not a valid descriptor.
pub fn parse_field_descriptor(input: &str) -> Result<TypeSignature> {
    SignatureParser::descriptor(input).parse_field_type()
}

/// Parse a plain method descriptor such as `(ILjava/lang/String;)V`
///
/// # Errors
/// Returns [`crate::Error::GrammarParse`] if the input is not a valid descriptor.
pub fn parse_method_descriptor(input: &str) -> Result<MethodSignature> {
    SignatureParser::descriptor(input).parse_method_signature()
}

/// Parse a generic field signature
///
/// # Errors
/// Returns [`crate::Error::GrammarParse`] if the input is not a valid signature.
pub fn parse_field_signature(input: &str) -> Result<TypeSignature> {
    SignatureParser::new(input).parse_field_type()
}

/// Parse a generic method signature
///
/// # Errors
/// Returns [`crate::Error::GrammarParse`] if the input is not a valid signature.
pub fn parse_method_signature(input: &str) -> Result<MethodSignature> {
    SignatureParser::new(input).parse_method_signature()
}

/// Parse a generic class signature
///
/// # Errors
/// Returns [`crate::Error::GrammarParse`] if the input is not a valid signature.
pub fn parse_class_signature(input: &str) -> Result<ClassSignature> {
    SignatureParser::new(input).parse_class_signature()
}
