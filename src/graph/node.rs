use std::{collections::HashSet, fmt, sync::Arc};

use strum::EnumCount;

use crate::{
    classfile::{
        annotations::AnnotationInfo,
        decoder::{ClassFileVersion, DecodedUnit, EnclosingMethod, FieldInfo, MethodInfo},
        modifiers::ClassModifiers,
        signatures::ClassSignature,
    },
    graph::RelationshipKind,
};

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                $name(index as u32)
            }

            /// Position of the node in its arena.
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

node_id!(
    /// Handle of a [`TypeNode`] in a [`crate::graph::ClassGraph`]
    TypeId
);
node_id!(
    /// Handle of a [`NamespaceNode`] in a [`crate::graph::ClassGraph`]
    NamespaceId
);
node_id!(
    /// Handle of a [`ModuleNode`] in a [`crate::graph::ClassGraph`]
    ModuleId
);

/// Insertion-ordered set of node handles
#[derive(Debug, Clone)]
pub struct EdgeSet<T> {
    order: Vec<T>,
    members: HashSet<T>,
}

impl<T> Default for EdgeSet<T> {
    fn default() -> Self {
        EdgeSet {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + std::hash::Hash> EdgeSet<T> {
    /// Add `id`; returns `false` if it was already present.
    pub(crate) fn insert(&mut self, id: T) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Members in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.order
    }

    /// Returns `true` if `id` is a member.
    #[must_use]
    pub fn contains(&self, id: T) -> bool {
        self.members.contains(&id)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// What the graph knows about a linked (non-placeholder) type
#[derive(Debug, Clone)]
pub struct TypeDetails {
    /// Access flags
    pub modifiers: ClassModifiers,
    /// Class file version
    pub version: ClassFileVersion,
    /// Superclass name
    pub superclass: Option<Arc<str>>,
    /// Field records
    pub fields: Vec<FieldInfo>,
    /// Method records
    pub methods: Vec<MethodInfo>,
    /// Class annotations with their values
    pub annotations: Vec<AnnotationInfo>,
    /// Generic class signature
    pub signature: Option<ClassSignature>,
    /// `EnclosingMethod` of local and anonymous classes
    pub enclosing_method: Option<EnclosingMethod>,
    /// `SourceFile` attribute
    pub source_file: Option<Arc<str>>,
    /// Classpath element the class was linked from
    pub classpath_element: Option<Arc<str>>,
}

impl From<DecodedUnit> for TypeDetails {
    fn from(unit: DecodedUnit) -> Self {
        TypeDetails {
            modifiers: unit.modifiers,
            version: unit.version,
            superclass: unit.superclass,
            fields: unit.fields,
            methods: unit.methods,
            annotations: unit.annotations,
            signature: unit.signature,
            enclosing_method: unit.enclosing_method,
            source_file: unit.source_file,
            classpath_element: unit.classpath_element,
        }
    }
}

/// Canonical node for one fully-qualified type name
///
/// A node created only because another type referenced it is a placeholder: it has edges
/// but no [`TypeDetails`], no namespace and no module. Linking the unit of that name later
/// fills it in place, so handles handed out earlier stay valid.
#[derive(Debug)]
pub struct TypeNode {
    id: TypeId,
    name: Arc<str>,
    pub(crate) details: Option<TypeDetails>,
    pub(crate) namespace: Option<NamespaceId>,
    pub(crate) module: Option<ModuleId>,
    edges: [EdgeSet<TypeId>; RelationshipKind::COUNT],
}

impl TypeNode {
    pub(crate) fn placeholder(id: TypeId, name: Arc<str>) -> Self {
        TypeNode {
            id,
            name,
            details: None,
            namespace: None,
            module: None,
            edges: std::array::from_fn(|_| EdgeSet::default()),
        }
    }

    /// Handle of this node.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Dotted fully-qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Name after the last package separator, with nesting suffixes kept (`Outer$Inner`).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Returns `true` if the type was referenced but never linked.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.details.is_none()
    }

    /// Decoded information, `None` for placeholders.
    #[must_use]
    pub fn details(&self) -> Option<&TypeDetails> {
        self.details.as_ref()
    }

    /// Access flags, empty for placeholders.
    #[must_use]
    pub fn modifiers(&self) -> ClassModifiers {
        self.details
            .as_ref()
            .map_or(ClassModifiers::empty(), |d| d.modifiers)
    }

    /// Returns `true` for interfaces, including annotation interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.modifiers().contains(ClassModifiers::INTERFACE)
    }

    /// Returns `true` for annotation interfaces.
    #[must_use]
    pub fn is_annotation(&self) -> bool {
        self.modifiers().contains(ClassModifiers::ANNOTATION)
    }

    /// Owning namespace.
    #[must_use]
    pub fn namespace(&self) -> Option<NamespaceId> {
        self.namespace
    }

    /// Owning module.
    #[must_use]
    pub fn module(&self) -> Option<ModuleId> {
        self.module
    }

    /// Direct neighbours under `kind`, in link order.
    #[must_use]
    pub fn neighbors(&self, kind: RelationshipKind) -> &[TypeId] {
        self.edges[kind.slot()].as_slice()
    }

    /// Returns `true` if `other` is a direct neighbour under `kind`.
    #[must_use]
    pub fn has_edge(&self, kind: RelationshipKind, other: TypeId) -> bool {
        self.edges[kind.slot()].contains(other)
    }

    pub(crate) fn insert_edge(&mut self, kind: RelationshipKind, other: TypeId) -> bool {
        self.edges[kind.slot()].insert(other)
    }
}

/// One package, created on first reference together with all its ancestors
#[derive(Debug)]
pub struct NamespaceNode {
    id: NamespaceId,
    name: Arc<str>,
    parent: Option<NamespaceId>,
    pub(crate) children: EdgeSet<NamespaceId>,
    pub(crate) members: EdgeSet<TypeId>,
    pub(crate) annotations: Vec<AnnotationInfo>,
    pub(crate) descriptor_location: Option<Arc<str>>,
    pub(crate) has_descriptor: bool,
}

impl NamespaceNode {
    pub(crate) fn new(id: NamespaceId, name: Arc<str>, parent: Option<NamespaceId>) -> Self {
        NamespaceNode {
            id,
            name,
            parent,
            children: EdgeSet::default(),
            members: EdgeSet::default(),
            annotations: Vec::new(),
            descriptor_location: None,
            has_descriptor: false,
        }
    }

    /// Handle of this node.
    #[must_use]
    pub fn id(&self) -> NamespaceId {
        self.id
    }

    /// Dotted package name; empty for the root namespace.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for the root namespace.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Enclosing namespace, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NamespaceId> {
        self.parent
    }

    /// Direct sub-namespaces in creation order.
    #[must_use]
    pub fn children(&self) -> &[NamespaceId] {
        self.children.as_slice()
    }

    /// Types linked into this namespace, not including sub-namespaces.
    #[must_use]
    pub fn members(&self) -> &[TypeId] {
        self.members.as_slice()
    }

    /// Annotations of the `package-info` descriptor.
    #[must_use]
    pub fn annotations(&self) -> &[AnnotationInfo] {
        &self.annotations
    }
}

/// One module, created on first module-qualified unit or `module-info` descriptor
#[derive(Debug)]
pub struct ModuleNode {
    id: ModuleId,
    name: Arc<str>,
    pub(crate) location: Option<Arc<str>>,
    pub(crate) members: EdgeSet<TypeId>,
    pub(crate) namespaces: EdgeSet<NamespaceId>,
    pub(crate) annotations: Vec<AnnotationInfo>,
    pub(crate) has_descriptor: bool,
}

impl ModuleNode {
    pub(crate) fn new(id: ModuleId, name: Arc<str>) -> Self {
        ModuleNode {
            id,
            name,
            location: None,
            members: EdgeSet::default(),
            namespaces: EdgeSet::default(),
            annotations: Vec::new(),
            has_descriptor: false,
        }
    }

    /// Handle of this node.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classpath element of the first unit seen for this module.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Types linked into this module.
    #[must_use]
    pub fn members(&self) -> &[TypeId] {
        self.members.as_slice()
    }

    /// Namespaces holding at least one member type.
    #[must_use]
    pub fn namespaces(&self) -> &[NamespaceId] {
        self.namespaces.as_slice()
    }

    /// Annotations of the `module-info` descriptor.
    #[must_use]
    pub fn annotations(&self) -> &[AnnotationInfo] {
        &self.annotations
    }
}
