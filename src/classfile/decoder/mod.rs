//! Positional decoding of single class files.
//!
//! The decoder walks the fixed class file layout once, front to back:
//!
//! ```text
//! magic -> version -> constant pool -> access/this/super -> interfaces
//!       -> fields -> methods -> class attributes
//! ```
//!
//! Fields and methods are decoded as access flags, name and descriptor, then an attribute
//! list. Attributes are matched by name against a fixed recognized set; everything else,
//! and everything the [`ScanPolicy`] excludes, is skipped by its declared length.
//!
//! # Key Components
//!
//! - [`UnitDecoder`] - Reusable decoder producing one [`DecodedUnit`] per class file
//! - [`ScanPolicy`] - What to materialize (visibility, members, annotations, constants)
//! - [`DecodedUnit`], [`FieldInfo`], [`MethodInfo`] - The decoded record
//!
//! # Failure Handling
//!
//! | Failure | Effect |
//! |---------|--------|
//! | bad magic, pool index, attribute length, truncation | unit abandoned |
//! | `java.lang.Object`, non-public class | [`crate::Error::Skipped`] |
//! | bad field/method signature or annotation | member dropped, warning recorded |
//! | bad class signature | signature dropped, warning recorded |
//!
//! # Examples
//!
//! ```rust,no_run
//! use classscope::prelude::*;
//!
//! let context = ScanContext::new();
//! let mut decoder = UnitDecoder::new();
//! let source = Physical::new("Foo.class")?;
//!
//! match decoder.decode(&source, &ScanPolicy::default(), &context) {
//!     Ok(unit) => println!("{} with {} methods", unit.name, unit.methods.len()),
//!     Err(e) if e.is_skip() => println!("skipped: {e}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), classscope::Error>(())
//! ```

mod attributes;
mod policy;
mod reader;
mod unit;

pub use policy::ScanPolicy;
pub use reader::{UnitDecoder, CLASS_MAGIC, ROOT_OBJECT_TYPE};
pub use unit::{
    package_of, unit_kind, ClassFileVersion, Containment, DecodedUnit, EnclosingMethod,
    FieldInfo, MethodInfo, MethodParameter, UnitKind, MODULE_INFO, PACKAGE_INFO,
};
