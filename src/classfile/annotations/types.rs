use std::{collections::BTreeSet, fmt, sync::Arc};

use crate::classfile::signatures::{BaseType, TypeSignature};

/// A decoded annotation element value
///
/// Also used for field constant initializers, which are restricted to the primitive and
/// [`AnnotationValue::String`] variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// `byte`
    Byte(i8),
    /// `char`, a UTF-16 code unit
    Char(u16),
    /// `short`
    Short(i16),
    /// `boolean`
    Boolean(bool),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `java.lang.String`
    String(Arc<str>),
    /// Enum constant
    Enum {
        /// Dotted name of the enum class
        type_name: Arc<str>,
        /// Constant name
        constant_name: Arc<str>,
    },
    /// Class literal, `void.class` included
    Class(TypeSignature),
    /// Nested annotation
    Annotation(AnnotationInfo),
    /// Array of values of one kind
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// Narrow a pool `Integer` constant to the runtime representation of `target`.
    ///
    /// Returns `None` if `target` is not an integer-backed type.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_integer(target: BaseType, value: i32) -> Option<AnnotationValue> {
        Some(match target {
            BaseType::Byte => AnnotationValue::Byte(value as i8),
            BaseType::Char => AnnotationValue::Char(value as u16),
            BaseType::Short => AnnotationValue::Short(value as i16),
            BaseType::Boolean => AnnotationValue::Boolean(value != 0),
            BaseType::Int => AnnotationValue::Int(value),
            BaseType::Long | BaseType::Float | BaseType::Double | BaseType::Void => return None,
        })
    }

    /// Add every class name this value mentions (enum types, class literals, nested
    /// annotation types) to `names`.
    pub fn collect_class_names(&self, names: &mut BTreeSet<String>) {
        match self {
            AnnotationValue::Enum { type_name, .. } => {
                names.insert(type_name.to_string());
            }
            AnnotationValue::Class(ty) => ty.collect_class_names(names),
            AnnotationValue::Annotation(annotation) => annotation.collect_class_names(names),
            AnnotationValue::Array(values) => {
                for value in values {
                    value.collect_class_names(names);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Byte(v) => write!(f, "{v}"),
            AnnotationValue::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(c) => write!(f, "'{}'", c.escape_default()),
                None => write!(f, "'\\u{v:04x}'"),
            },
            AnnotationValue::Short(v) => write!(f, "{v}"),
            AnnotationValue::Boolean(v) => write!(f, "{v}"),
            AnnotationValue::Int(v) => write!(f, "{v}"),
            AnnotationValue::Long(v) => write!(f, "{v}L"),
            AnnotationValue::Float(v) => write!(f, "{v}f"),
            AnnotationValue::Double(v) => write!(f, "{v}d"),
            AnnotationValue::String(v) => write!(f, "\"{}\"", v.escape_default()),
            AnnotationValue::Enum {
                type_name,
                constant_name,
            } => write!(f, "{type_name}.{constant_name}"),
            AnnotationValue::Class(ty) => write!(f, "{ty}.class"),
            AnnotationValue::Annotation(annotation) => write!(f, "{annotation}"),
            AnnotationValue::Array(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// One `name = value` pair of an annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationElement {
    /// Element (method) name
    pub name: Arc<str>,
    /// Element value
    pub value: AnnotationValue,
}

/// One annotation occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationInfo {
    /// Dotted name of the annotation interface
    pub type_name: Arc<str>,
    /// Explicitly given elements in class file order
    pub elements: Vec<AnnotationElement>,
}

impl AnnotationInfo {
    /// Value of the element called `name`, if it was given explicitly.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&AnnotationValue> {
        self.elements
            .iter()
            .find(|element| &*element.name == name)
            .map(|element| &element.value)
    }

    /// Add the annotation type and every class name in its values to `names`.
    pub fn collect_class_names(&self, names: &mut BTreeSet<String>) {
        names.insert(self.type_name.to_string());
        for element in &self.elements {
            element.value.collect_class_names(names);
        }
    }
}

impl fmt::Display for AnnotationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)?;
        if self.elements.is_empty() {
            return Ok(());
        }

        f.write_str("(")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", element.name, element.value)?;
        }
        f.write_str(")")
    }
}
