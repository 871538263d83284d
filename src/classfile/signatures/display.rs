//! Java source-style rendering of signature types.
//!
//! `java.util.Map<K, ? extends java.util.List<V>>`, `int[][]`, `<T> void (T[], int)`.
//! Bounds of exactly `java.lang.Object` are omitted the way javac prints them.

use std::fmt::{self, Display, Formatter};

use crate::classfile::signatures::{
    ArrayType, BaseType, ClassRefType, ClassSignature, MethodSignature, TypeArgument,
    TypeParameter, TypeSignature, TypeVariable, Wildcard,
};

fn write_joined<T: Display>(f: &mut Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_arguments(f: &mut Formatter<'_>, arguments: &[TypeArgument]) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    write_joined(f, arguments, ", ")?;
    f.write_str(">")
}

fn write_parameters(f: &mut Formatter<'_>, parameters: &[TypeParameter]) -> fmt::Result {
    if parameters.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    write_joined(f, parameters, ", ")?;
    f.write_str(">")
}

impl Display for BaseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.java_name())
    }
}

impl Display for TypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Base(base) => write!(f, "{base}"),
            TypeSignature::ClassRef(class) => write!(f, "{class}"),
            TypeSignature::Array(array) => write!(f, "{array}"),
            TypeSignature::Variable(variable) => write!(f, "{variable}"),
        }
    }
}

impl Display for ClassRefType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_name)?;
        write_arguments(f, &self.type_arguments)?;
        for suffix in &self.suffixes {
            write!(f, ".{}", suffix.name)?;
            write_arguments(f, &suffix.type_arguments)?;
        }
        Ok(())
    }
}

impl Display for ArrayType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element)?;
        for _ in 0..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl Display for TypeVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Display for TypeArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.wildcard, &self.bound) {
            (Wildcard::Any, _) | (_, None) => f.write_str("?"),
            (Wildcard::None, Some(bound)) => write!(f, "{bound}"),
            (Wildcard::Extends, Some(bound)) => write!(f, "? extends {bound}"),
            (Wildcard::Super, Some(bound)) => write!(f, "? super {bound}"),
        }
    }
}

fn is_object(ty: &TypeSignature) -> bool {
    matches!(ty, TypeSignature::ClassRef(class)
        if class.base_name == "java.lang.Object"
            && class.type_arguments.is_empty()
            && class.suffixes.is_empty())
}

impl Display for TypeParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;

        let bounds: Vec<&TypeSignature> = self
            .class_bound
            .iter()
            .filter(|bound| !is_object(bound))
            .chain(self.interface_bounds.iter())
            .collect();
        if bounds.is_empty() {
            return Ok(());
        }

        f.write_str(" extends ")?;
        write_joined(f, &bounds, " & ")
    }
}

impl Display for MethodSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.type_parameters.is_empty() {
            write_parameters(f, &self.type_parameters)?;
            f.write_str(" ")?;
        }
        write!(f, "{} (", self.return_type)?;
        write_joined(f, &self.parameter_types, ", ")?;
        f.write_str(")")?;
        if !self.throws.is_empty() {
            f.write_str(" throws ")?;
            write_joined(f, &self.throws, ", ")?;
        }
        Ok(())
    }
}

impl Display for ClassSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_parameters(f, &self.type_parameters)?;
        if !self.type_parameters.is_empty() {
            f.write_str(" ")?;
        }
        write!(f, "extends {}", self.superclass)?;
        if !self.superinterfaces.is_empty() {
            f.write_str(" implements ")?;
            write_joined(f, &self.superinterfaces, ", ")?;
        }
        Ok(())
    }
}
