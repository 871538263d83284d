use std::{mem, sync::Arc};

use crate::{
    classfile::{
        annotations::{AnnotationElement, AnnotationInfo, AnnotationValue},
        constpool::{ConstantPool, StringInterner},
        signatures::{BaseType, SignatureParser, TypeSignature, DEFAULT_MAX_DEPTH},
    },
    Error::RecursionLimit,
    Parser, Result,
};

/// Name used as grammar input in errors raised while decoding binary annotation data
const ANNOTATION_INPUT: &str = "annotation element_value";

/// Recursive parser for the binary annotation structures of one attribute
///
/// Wraps the attribute's byte window together with the unit's constant pool. Nested
/// annotations and arrays recurse into the same grammar up to a nesting bound.
///
/// ## Notes:
/// - Pool resolution failures are structural and surface as [`crate::Error::Malformed`];
///   grammar violations in the element values surface as [`crate::Error::GrammarParse`].
pub struct AnnotationParser<'p, 'a> {
    parser: Parser<'a>,
    pool: &'p ConstantPool<'a>,
    interner: &'p StringInterner,
    depth: usize,
    max_depth: usize,
}

impl<'p, 'a> AnnotationParser<'p, 'a> {
    /// Create a parser over an attribute body.
    #[must_use]
    pub fn new(
        parser: Parser<'a>,
        pool: &'p ConstantPool<'a>,
        interner: &'p StringInterner,
    ) -> Self {
        AnnotationParser {
            parser,
            pool,
            interner,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// `RuntimeVisibleAnnotations` / `RuntimeInvisibleAnnotations` body: a count-prefixed
    /// list of annotations.
    ///
    /// # Errors
    /// Returns [`crate::Error::GrammarParse`] or [`crate::Error::RecursionLimit`] on grammar
    /// violations, and [`crate::Error::Malformed`] / [`crate::Error::OutOfBounds`] on
    /// structural ones.
    pub fn parse_annotations(&mut self) -> Result<Vec<AnnotationInfo>> {
        let count = self.parser.read_be::<u16>()?;
        let mut annotations = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            annotations.push(self.parse_annotation()?);
        }
        Ok(annotations)
    }

    /// `Runtime*ParameterAnnotations` body: per-parameter annotation lists.
    ///
    /// # Errors
    /// See [`AnnotationParser::parse_annotations`].
    pub fn parse_parameter_annotations(&mut self) -> Result<Vec<Vec<AnnotationInfo>>> {
        let parameters = self.parser.read_be::<u8>()?;
        let mut result = Vec::with_capacity(usize::from(parameters));
        for _ in 0..parameters {
            result.push(self.parse_annotations()?);
        }
        Ok(result)
    }

    /// `AnnotationDefault` body: a single element value.
    ///
    /// # Errors
    /// See [`AnnotationParser::parse_annotations`].
    pub fn parse_default_value(&mut self) -> Result<AnnotationValue> {
        self.element_value()
    }

    /// One annotation: type descriptor, then count-prefixed `(name, value)` pairs.
    ///
    /// # Errors
    /// See [`AnnotationParser::parse_annotations`].
    pub fn parse_annotation(&mut self) -> Result<AnnotationInfo> {
        let type_index = self.parser.read_be::<u16>()?;
        let type_name = self.class_from_descriptor(type_index)?;

        let pairs = self.parser.read_be::<u16>()?;
        let mut elements = Vec::with_capacity(usize::from(pairs));
        for _ in 0..pairs {
            let name_index = self.parser.read_be::<u16>()?;
            let name = self.pool.string(name_index.into(), 0, self.interner)?;
            let value = self.element_value()?;
            elements.push(AnnotationElement { name, value });
        }

        Ok(AnnotationInfo {
            type_name,
            elements,
        })
    }

    fn descriptor(&self, index: u16) -> Result<Arc<str>> {
        self.pool.string(index.into(), 0, self.interner)
    }

    fn class_from_descriptor(&self, index: u16) -> Result<Arc<str>> {
        let descriptor = self.descriptor(index)?;
        match SignatureParser::descriptor(&descriptor)
            .with_max_depth(self.max_depth)
            .parse_field_type()?
        {
            TypeSignature::ClassRef(class) => Ok(self.interner.intern(&class.full_name())),
            _ => Err(grammar_error!(
                descriptor,
                0,
                "expected a class type descriptor"
            )),
        }
    }

    fn element_value(&mut self) -> Result<AnnotationValue> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        let value = self.element_value_inner();
        self.depth -= 1;
        value
    }

    fn element_value_inner(&mut self) -> Result<AnnotationValue> {
        let tag_position = self.parser.pos();
        let tag = self.parser.read_be::<u8>()?;

        match tag {
            b'B' | b'C' | b'I' | b'S' | b'Z' => {
                let index = self.parser.read_be::<u16>()?;
                let value = self.pool.integer(index.into())?;
                BaseType::from_code(tag)
                    .and_then(|base| AnnotationValue::from_integer(base, value))
                    .ok_or_else(|| grammar_error!(ANNOTATION_INPUT, tag_position, "bad tag"))
            }
            b'J' => {
                let index = self.parser.read_be::<u16>()?;
                Ok(AnnotationValue::Long(self.pool.long(index.into())?))
            }
            b'F' => {
                let index = self.parser.read_be::<u16>()?;
                Ok(AnnotationValue::Float(self.pool.float(index.into())?))
            }
            b'D' => {
                let index = self.parser.read_be::<u16>()?;
                Ok(AnnotationValue::Double(self.pool.double(index.into())?))
            }
            b's' => {
                let index = self.parser.read_be::<u16>()?;
                Ok(AnnotationValue::String(self.descriptor(index)?))
            }
            b'e' => {
                let type_index = self.parser.read_be::<u16>()?;
                let name_index = self.parser.read_be::<u16>()?;
                Ok(AnnotationValue::Enum {
                    type_name: self.class_from_descriptor(type_index)?,
                    constant_name: self.descriptor(name_index)?,
                })
            }
            b'c' => {
                let index = self.parser.read_be::<u16>()?;
                let descriptor = self.descriptor(index)?;
                let ty = SignatureParser::descriptor(&descriptor)
                    .with_max_depth(self.max_depth)
                    .parse_return_type()?;
                Ok(AnnotationValue::Class(ty))
            }
            b'@' => Ok(AnnotationValue::Annotation(self.parse_annotation()?)),
            b'[' => {
                let count = self.parser.read_be::<u16>()?;
                let mut values = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    let value = self.element_value()?;
                    if let Some(first) = values.first() {
                        if mem::discriminant(first) != mem::discriminant(&value) {
                            return Err(grammar_error!(
                                ANNOTATION_INPUT,
                                tag_position,
                                "array elements of different kinds"
                            ));
                        }
                    }
                    values.push(value);
                }
                Ok(AnnotationValue::Array(values))
            }
            other => Err(grammar_error!(
                ANNOTATION_INPUT,
                tag_position,
                "unknown element value tag '{}'",
                other as char
            )),
        }
    }
}
