use std::{collections::BTreeSet, sync::Arc};

use crate::classfile::{
    annotations::{AnnotationInfo, AnnotationValue},
    modifiers::{ClassModifiers, FieldModifiers, MethodModifiers, ParameterModifiers},
    signatures::{ClassSignature, MethodSignature, TypeSignature},
};

/// Simple name of namespace descriptor units
pub const PACKAGE_INFO: &str = "package-info";
/// Name of module descriptor units
pub const MODULE_INFO: &str = "module-info";

/// `major.minor` class file version, recorded but not enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClassFileVersion {
    /// Major version (52 = Java 8)
    pub major: u16,
    /// Minor version
    pub minor: u16,
}

/// What a decoded unit describes, by name convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// A class, interface, enum, record or annotation interface
    Type,
    /// `package-info`, carrying package annotations
    NamespaceDescriptor,
    /// `module-info`, carrying module annotations
    ModuleDescriptor,
}

/// One field record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field name
    pub name: Arc<str>,
    /// Raw descriptor, e.g. `Ljava/lang/String;`
    pub descriptor: Arc<str>,
    /// Access flags
    pub modifiers: FieldModifiers,
    /// Type parsed from the descriptor
    pub type_descriptor: TypeSignature,
    /// Type parsed from the `Signature` attribute, if present
    pub type_signature: Option<TypeSignature>,
    /// `ConstantValue` initializer of a static final field, narrowed to the field type
    pub constant_value: Option<AnnotationValue>,
    /// Field annotations
    pub annotations: Vec<AnnotationInfo>,
}

impl FieldInfo {
    /// Generic type if present, otherwise the descriptor type.
    #[must_use]
    pub fn type_signature_or_descriptor(&self) -> &TypeSignature {
        self.type_signature.as_ref().unwrap_or(&self.type_descriptor)
    }
}

/// One entry of the `MethodParameters` attribute
#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameter {
    /// Parameter name, absent for unnamed parameters
    pub name: Option<Arc<str>>,
    /// Parameter flags
    pub modifiers: ParameterModifiers,
}

/// One method record
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Method name, `<init>` for constructors
    pub name: Arc<str>,
    /// Raw descriptor, e.g. `(I)V`
    pub descriptor: Arc<str>,
    /// Access flags
    pub modifiers: MethodModifiers,
    /// Signature parsed from the descriptor
    pub type_descriptor: MethodSignature,
    /// Signature parsed from the `Signature` attribute, if present
    pub type_signature: Option<MethodSignature>,
    /// Names and flags from `MethodParameters`, empty if the attribute is absent
    pub parameters: Vec<MethodParameter>,
    /// Annotations per parameter, visible and invisible merged positionally
    pub parameter_annotations: Vec<Vec<AnnotationInfo>>,
    /// Method annotations
    pub annotations: Vec<AnnotationInfo>,
    /// `AnnotationDefault` of an annotation interface element
    pub annotation_default: Option<AnnotationValue>,
    /// Dotted names from the `Exceptions` attribute
    pub thrown: Vec<Arc<str>>,
    /// Whether a `Code` attribute is present
    pub has_body: bool,
}

impl MethodInfo {
    /// Generic signature if present, otherwise the descriptor signature.
    #[must_use]
    pub fn signature_or_descriptor(&self) -> &MethodSignature {
        self.type_signature.as_ref().unwrap_or(&self.type_descriptor)
    }

    /// Returns `true` for constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        &*self.name == "<init>"
    }
}

/// Nesting relation from an `InnerClasses` or `EnclosingMethod` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Containment {
    /// Dotted name of the nested class
    pub inner: Arc<str>,
    /// Dotted name of the enclosing class
    pub outer: Arc<str>,
}

/// `EnclosingMethod` of a local or anonymous class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingMethod {
    /// Dotted name of the enclosing class
    pub class_name: Arc<str>,
    /// Enclosing method name, absent for initializer blocks
    pub method_name: Option<Arc<str>>,
}

/// Result of decoding one class file
///
/// Owned by the decode call that produced it and consumed by the linker.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedUnit {
    /// Dotted fully-qualified name
    pub name: Arc<str>,
    /// Access flags; for nested classes extended by the `InnerClasses` entry
    pub modifiers: ClassModifiers,
    /// Class file version
    pub version: ClassFileVersion,
    /// Superclass, absent for `java.lang.Object` and module descriptors
    pub superclass: Option<Arc<str>>,
    /// Directly implemented interfaces
    pub interfaces: Vec<Arc<str>>,
    /// Field records allowed by the policy
    pub fields: Vec<FieldInfo>,
    /// Method records allowed by the policy
    pub methods: Vec<MethodInfo>,
    /// Class annotations
    pub annotations: Vec<AnnotationInfo>,
    /// Generic class signature
    pub signature: Option<ClassSignature>,
    /// Every nesting pair this unit declares, involving itself or not
    pub containment: Vec<Containment>,
    /// `EnclosingMethod` attribute
    pub enclosing_method: Option<EnclosingMethod>,
    /// `SourceFile` attribute
    pub source_file: Option<Arc<str>>,
    /// Module name from the `Module` attribute of a module descriptor
    pub module_name: Option<Arc<str>>,
    /// Classpath element the bytes were read from
    pub classpath_element: Option<Arc<str>>,
    /// Module the unit belongs to, if loaded from a module
    pub module: Option<Arc<str>>,
}

impl DecodedUnit {
    /// Classify the unit by its name.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        unit_kind(&self.name)
    }

    /// Package part of the name, empty for the default package.
    ///
    /// For a namespace descriptor this is the package it describes.
    #[must_use]
    pub fn package_name(&self) -> &str {
        package_of(&self.name)
    }

    /// Names outside this unit that extended scanning follows: superclass, interfaces,
    /// annotation types of the class and its members, and enclosing classes.
    #[must_use]
    pub fn external_references(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if let Some(superclass) = &self.superclass {
            names.insert(superclass.to_string());
        }
        names.extend(self.interfaces.iter().map(ToString::to_string));

        let member_annotations = self
            .fields
            .iter()
            .flat_map(|f| f.annotations.iter())
            .chain(self.methods.iter().flat_map(|m| m.annotations.iter()))
            .chain(
                self.methods
                    .iter()
                    .flat_map(|m| m.parameter_annotations.iter().flatten()),
            );
        for annotation in self.annotations.iter().chain(member_annotations) {
            names.insert(annotation.type_name.to_string());
        }

        for pair in &self.containment {
            if pair.inner == self.name {
                names.insert(pair.outer.to_string());
            }
        }

        names.remove(&*self.name);
        names
    }

    /// Every class name this unit depends on structurally: supertypes, signatures and
    /// descriptors of members, annotations with their values, and thrown types.
    #[must_use]
    pub fn referenced_class_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if let Some(superclass) = &self.superclass {
            names.insert(superclass.to_string());
        }
        names.extend(self.interfaces.iter().map(ToString::to_string));
        if let Some(signature) = &self.signature {
            names.extend(signature.referenced_class_names());
        }
        for annotation in &self.annotations {
            annotation.collect_class_names(&mut names);
        }

        for field in &self.fields {
            field.type_descriptor.collect_class_names(&mut names);
            if let Some(signature) = &field.type_signature {
                signature.collect_class_names(&mut names);
            }
            for annotation in &field.annotations {
                annotation.collect_class_names(&mut names);
            }
        }

        for method in &self.methods {
            names.extend(method.type_descriptor.referenced_class_names());
            if let Some(signature) = &method.type_signature {
                names.extend(signature.referenced_class_names());
            }
            names.extend(method.thrown.iter().map(ToString::to_string));
            for annotation in method
                .annotations
                .iter()
                .chain(method.parameter_annotations.iter().flatten())
            {
                annotation.collect_class_names(&mut names);
            }
            if let Some(default) = &method.annotation_default {
                default.collect_class_names(&mut names);
            }
        }

        names.remove(&*self.name);
        names
    }
}

/// Classify a dotted unit name.
#[must_use]
pub fn unit_kind(name: &str) -> UnitKind {
    if name == MODULE_INFO {
        UnitKind::ModuleDescriptor
    } else if name == PACKAGE_INFO
        || name
            .strip_suffix(PACKAGE_INFO)
            .is_some_and(|prefix| prefix.ends_with('.'))
    {
        UnitKind::NamespaceDescriptor
    } else {
        UnitKind::Type
    }
}

/// Package part of a dotted name, empty for the default package.
#[must_use]
pub fn package_of(name: &str) -> &str {
    name.rfind('.').map_or("", |dot| &name[..dot])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(unit_kind("module-info"), UnitKind::ModuleDescriptor);
        assert_eq!(unit_kind("com.a.package-info"), UnitKind::NamespaceDescriptor);
        assert_eq!(unit_kind("package-info"), UnitKind::NamespaceDescriptor);
        assert_eq!(unit_kind("com.a.xpackage-info"), UnitKind::Type);
        assert_eq!(unit_kind("com.a.Foo"), UnitKind::Type);
    }

    #[test]
    fn packages() {
        assert_eq!(package_of("com.a.Foo"), "com.a");
        assert_eq!(package_of("com.a.package-info"), "com.a");
        assert_eq!(package_of("Foo"), "");
    }
}
