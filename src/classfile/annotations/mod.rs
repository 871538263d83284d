//! Annotation value parsing.
//!
//! Annotations are stored in class files as binary trees of tagged element values whose
//! leaves point into the constant pool. This module decodes them into [`AnnotationInfo`]
//! and [`AnnotationValue`] trees.
//!
//! # Element Value Tags
//!
//! | Tag | Value | Pool entry |
//! |-----|-------|------------|
//! | `B` `C` `I` `S` `Z` | byte, char, int, short, boolean | `Integer`, narrowed by tag |
//! | `J` `F` `D` | long, float, double | `Long`, `Float`, `Double` |
//! | `s` | string | `Utf8` |
//! | `e` | enum constant | type descriptor + constant name |
//! | `c` | class literal | return descriptor |
//! | `@` | nested annotation | recursive |
//! | `[` | array | count-prefixed, recursive, homogeneous |

mod parser;
mod types;

pub use parser::AnnotationParser;
pub use types::*;
