use strum::{EnumCount, EnumIter};

/// Directed relationship between two type nodes
///
/// Every edge is stored in both directions: linking `Foo extends Bar` records `Bar` under
/// [`RelationshipKind::Superclasses`] of `Foo` and `Foo` under
/// [`RelationshipKind::Subclasses`] of `Bar`. [`RelationshipKind::inverse`] maps each kind
/// to the kind stored on the other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[repr(u8)]
pub enum RelationshipKind {
    /// Superclass chain
    Superclasses,
    /// Classes extending this one
    Subclasses,
    /// Implemented or extended interfaces
    Interfaces,
    /// Types implementing or extending this interface
    Implementors,
    /// Annotation types present on the class
    Annotations,
    /// Classes carrying this annotation type
    AnnotatedWith,
    /// Annotation types present on any method of the class
    MethodAnnotations,
    /// Classes with a method carrying this annotation type
    ClassesWithMethodAnnotation,
    /// Annotation types present on any field of the class
    FieldAnnotations,
    /// Classes with a field carrying this annotation type
    ClassesWithFieldAnnotation,
    /// Enclosing classes
    OuterClasses,
    /// Nested, local and anonymous classes
    InnerClasses,
    /// Types referenced by supertypes, annotations, member descriptors and signatures
    Dependencies,
    /// Types referencing this one
    Dependents,
}

impl RelationshipKind {
    /// The kind recorded on the target node of an edge of this kind.
    #[must_use]
    pub const fn inverse(self) -> RelationshipKind {
        match self {
            RelationshipKind::Superclasses => RelationshipKind::Subclasses,
            RelationshipKind::Subclasses => RelationshipKind::Superclasses,
            RelationshipKind::Interfaces => RelationshipKind::Implementors,
            RelationshipKind::Implementors => RelationshipKind::Interfaces,
            RelationshipKind::Annotations => RelationshipKind::AnnotatedWith,
            RelationshipKind::AnnotatedWith => RelationshipKind::Annotations,
            RelationshipKind::MethodAnnotations => RelationshipKind::ClassesWithMethodAnnotation,
            RelationshipKind::ClassesWithMethodAnnotation => RelationshipKind::MethodAnnotations,
            RelationshipKind::FieldAnnotations => RelationshipKind::ClassesWithFieldAnnotation,
            RelationshipKind::ClassesWithFieldAnnotation => RelationshipKind::FieldAnnotations,
            RelationshipKind::OuterClasses => RelationshipKind::InnerClasses,
            RelationshipKind::InnerClasses => RelationshipKind::OuterClasses,
            RelationshipKind::Dependencies => RelationshipKind::Dependents,
            RelationshipKind::Dependents => RelationshipKind::Dependencies,
        }
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}
