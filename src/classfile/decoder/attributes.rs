//! Attribute framing shared by class, field and method decoding.
//!
//! Every attribute is `u2 name_index, u4 length, u1[length] info`. The cursor is only ever
//! advanced by the declared length: [`read_attribute`] splits the body off into its own
//! [`Parser`] window, so a recognized attribute cannot read into its neighbour (doing so is
//! an out-of-bounds failure) and an unrecognized one is skipped without inspecting its shape.

use crate::{classfile::constpool::ConstantPool, Error, Parser, Result};

pub(crate) const CONSTANT_VALUE: &[u8] = b"ConstantValue";
pub(crate) const SIGNATURE: &[u8] = b"Signature";
pub(crate) const RUNTIME_VISIBLE_ANNOTATIONS: &[u8] = b"RuntimeVisibleAnnotations";
pub(crate) const RUNTIME_INVISIBLE_ANNOTATIONS: &[u8] = b"RuntimeInvisibleAnnotations";
pub(crate) const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &[u8] =
    b"RuntimeVisibleParameterAnnotations";
pub(crate) const RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: &[u8] =
    b"RuntimeInvisibleParameterAnnotations";
pub(crate) const METHOD_PARAMETERS: &[u8] = b"MethodParameters";
pub(crate) const ANNOTATION_DEFAULT: &[u8] = b"AnnotationDefault";
pub(crate) const EXCEPTIONS: &[u8] = b"Exceptions";
pub(crate) const CODE: &[u8] = b"Code";
pub(crate) const INNER_CLASSES: &[u8] = b"InnerClasses";
pub(crate) const ENCLOSING_METHOD: &[u8] = b"EnclosingMethod";
pub(crate) const SOURCE_FILE: &[u8] = b"SourceFile";
pub(crate) const MODULE: &[u8] = b"Module";

/// One framed attribute
pub(crate) struct RawAttribute<'a> {
    /// Attribute name bytes from the pool
    pub name: &'a [u8],
    /// Parser over exactly the declared body
    pub body: Parser<'a>,
}

/// Read the next attribute header and split off its body.
pub(crate) fn read_attribute<'a>(
    parser: &mut Parser<'a>,
    pool: &ConstantPool<'a>,
) -> Result<RawAttribute<'a>> {
    let name_index = parser.read_be::<u16>()?;
    let length = parser.read_be::<u32>()?;
    let length = usize::try_from(length)
        .map_err(|_| malformed_error!("Attribute length {} exceeds address space", length))?;

    let name = pool.resolve(name_index.into(), 0)?;
    let body = parser.window(length).map_err(|_| {
        malformed_error!(
            "Attribute '{}' declares {} bytes, only {} remain",
            String::from_utf8_lossy(name),
            length,
            parser.remaining()
        )
    })?;

    Ok(RawAttribute { name, body })
}

/// Skip `count` attributes by their declared lengths.
pub(crate) fn skip_attributes(parser: &mut Parser<'_>, count: u16) -> Result<()> {
    for _ in 0..count {
        let _name_index = parser.read_be::<u16>()?;
        let length = parser.read_be::<u32>()?;
        parser.advance_by(length as usize)?;
    }
    Ok(())
}

/// First grammar failure inside one record
///
/// Grammar failures drop the record but decoding of its remaining attributes continues so
/// the cursor stays aligned; structural failures propagate immediately.
#[derive(Default)]
pub(crate) struct GrammarScope {
    failure: Option<Error>,
}

impl GrammarScope {
    /// Keep a successful value, absorb a grammar failure, propagate anything else.
    pub(crate) fn absorb<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_grammar() => {
                if self.failure.is_none() {
                    self.failure = Some(error);
                }
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// The absorbed failure, if any.
    pub(crate) fn into_failure(self) -> Option<Error> {
        self.failure
    }
}
