use std::{collections::BTreeSet, sync::OnceLock};

/// Primitive types and `void`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
    /// `V`, only valid as a method return type
    Void,
}

impl BaseType {
    /// Map a descriptor character to its base type.
    #[must_use]
    pub fn from_code(code: u8) -> Option<BaseType> {
        Some(match code {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            b'V' => BaseType::Void,
            _ => return None,
        })
    }

    /// The descriptor character.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
            BaseType::Void => 'V',
        }
    }

    /// The Java keyword.
    #[must_use]
    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
            BaseType::Void => "void",
        }
    }
}

/// A parsed type in a descriptor or generic signature
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSignature {
    /// Primitive or void
    Base(BaseType),
    /// Class or interface type, possibly parameterized
    ClassRef(ClassRefType),
    /// Array of any other type
    Array(ArrayType),
    /// Reference to a type parameter
    Variable(TypeVariable),
}

/// A class type such as `java.util.Map<K, V>.Entry`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRefType {
    /// Dotted name of the outermost class (`java.util.Map`)
    pub base_name: String,
    /// Type arguments of the outermost class
    pub type_arguments: Vec<TypeArgument>,
    /// Nested class suffixes, each separately parameterized
    pub suffixes: Vec<ClassSuffix>,
}

/// One `.Inner<...>` suffix of a [`ClassRefType`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSuffix {
    /// Simple name of the nested class
    pub name: String,
    /// Type arguments of the nested class
    pub type_arguments: Vec<TypeArgument>,
}

impl ClassRefType {
    /// A non-generic class reference.
    #[must_use]
    pub fn plain(base_name: impl Into<String>) -> Self {
        ClassRefType {
            base_name: base_name.into(),
            type_arguments: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    /// Binary class name, with nested suffixes joined by `$` (`java.util.Map$Entry`).
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.suffixes.is_empty() {
            return self.base_name.clone();
        }

        let mut name = self.base_name.clone();
        for suffix in &self.suffixes {
            name.push('$');
            name.push_str(&suffix.name);
        }
        name
    }
}

/// `[`-prefixed array type
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    /// Number of dimensions, at least 1
    pub dimensions: usize,
    /// Element type, never itself an array
    pub element: Box<TypeSignature>,
}

/// Where a [`TypeVariable`] was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeParameterOwner {
    /// A type parameter of a generic method
    Method {
        /// Declaring class
        class_name: String,
        /// Method name
        method_name: String,
    },
    /// A type parameter of a generic class (possibly an outer class)
    Class(String),
}

/// The declaration a [`TypeVariable`] resolved to during linking.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeVariableBinding {
    /// Declaring class or method
    pub declared_by: TypeParameterOwner,
    /// The type parameter as declared
    pub parameter: TypeParameter,
}

/// `T` name `;`
///
/// Parsed unresolved. The linker binds it once to the type parameter it refers to.
/// Equality only compares names, so binding does not change structural equality.
#[derive(Debug, Clone)]
pub struct TypeVariable {
    /// Type parameter name
    pub name: String,
    binding: OnceLock<Box<TypeVariableBinding>>,
}

impl TypeVariable {
    /// Unresolved type variable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        TypeVariable {
            name: name.into(),
            binding: OnceLock::new(),
        }
    }

    /// The declaration this variable was bound to, if linking found one.
    #[must_use]
    pub fn binding(&self) -> Option<&TypeVariableBinding> {
        self.binding.get().map(|b| &**b)
    }

    /// Bind this variable. Returns `false` if it was already bound.
    pub fn bind(&self, binding: TypeVariableBinding) -> bool {
        self.binding.set(Box::new(binding)).is_ok()
    }
}

impl PartialEq for TypeVariable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Wildcard indicator of a [`TypeArgument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    /// Exact type argument
    None,
    /// `*`, unbounded `?`
    Any,
    /// `+`, `? extends`
    Extends,
    /// `-`, `? super`
    Super,
}

/// One type argument inside `<...>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeArgument {
    /// Wildcard kind
    pub wildcard: Wildcard,
    /// Bound, absent only for [`Wildcard::Any`]
    pub bound: Option<TypeSignature>,
}

/// `name : [classBound] {: interfaceBound}`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    /// Parameter name
    pub name: String,
    /// Class bound, absent when only interface bounds are given
    pub class_bound: Option<TypeSignature>,
    /// Interface bounds in declaration order
    pub interface_bounds: Vec<TypeSignature>,
}

/// Signature of a method, generic or derived from a plain descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    /// Method type parameters
    pub type_parameters: Vec<TypeParameter>,
    /// Parameter types in order
    pub parameter_types: Vec<TypeSignature>,
    /// Return type, `Base(Void)` for void methods
    pub return_type: TypeSignature,
    /// Declared thrown types
    pub throws: Vec<TypeSignature>,
}

impl MethodSignature {
    /// `()V`, the signature synthesized for `<init>` without a descriptor.
    #[must_use]
    pub fn no_args_void() -> Self {
        MethodSignature {
            type_parameters: Vec::new(),
            parameter_types: Vec::new(),
            return_type: TypeSignature::Base(BaseType::Void),
            throws: Vec::new(),
        }
    }
}

/// Generic signature of a class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSignature {
    /// Class type parameters
    pub type_parameters: Vec<TypeParameter>,
    /// Superclass type
    pub superclass: ClassRefType,
    /// Superinterface types in declaration order
    pub superinterfaces: Vec<ClassRefType>,
}

impl TypeSignature {
    /// Add every class name this type mentions to `names`.
    pub fn collect_class_names(&self, names: &mut BTreeSet<String>) {
        match self {
            TypeSignature::Base(_) | TypeSignature::Variable(_) => {}
            TypeSignature::ClassRef(class) => class.collect_class_names(names),
            TypeSignature::Array(array) => array.element.collect_class_names(names),
        }
    }

    /// Class names this type mentions, sorted.
    #[must_use]
    pub fn referenced_class_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_class_names(&mut names);
        names
    }

    /// Call `visit` for every type variable in this type.
    pub fn visit_type_variables<'s>(&'s self, visit: &mut impl FnMut(&'s TypeVariable)) {
        match self {
            TypeSignature::Base(_) => {}
            TypeSignature::Variable(variable) => visit(variable),
            TypeSignature::ClassRef(class) => class.visit_type_variables(visit),
            TypeSignature::Array(array) => array.element.visit_type_variables(visit),
        }
    }
}

impl ClassRefType {
    /// Add this class, its nested classes and every class in its type arguments to `names`.
    pub fn collect_class_names(&self, names: &mut BTreeSet<String>) {
        names.insert(self.full_name());
        for argument in self.all_arguments() {
            if let Some(bound) = &argument.bound {
                bound.collect_class_names(names);
            }
        }
    }

    /// Call `visit` for every type variable in the type arguments.
    pub fn visit_type_variables<'s>(&'s self, visit: &mut impl FnMut(&'s TypeVariable)) {
        for argument in self.all_arguments() {
            if let Some(bound) = &argument.bound {
                bound.visit_type_variables(visit);
            }
        }
    }

    fn all_arguments(&self) -> impl Iterator<Item = &TypeArgument> {
        self.type_arguments
            .iter()
            .chain(self.suffixes.iter().flat_map(|s| s.type_arguments.iter()))
    }
}

impl TypeParameter {
    fn bounds(&self) -> impl Iterator<Item = &TypeSignature> {
        self.class_bound.iter().chain(self.interface_bounds.iter())
    }
}

fn collect_parameters(parameters: &[TypeParameter], names: &mut BTreeSet<String>) {
    for bound in parameters.iter().flat_map(TypeParameter::bounds) {
        bound.collect_class_names(names);
    }
}

impl MethodSignature {
    /// Class names mentioned anywhere in this signature, sorted.
    #[must_use]
    pub fn referenced_class_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_parameters(&self.type_parameters, &mut names);
        for ty in self
            .parameter_types
            .iter()
            .chain(std::iter::once(&self.return_type))
            .chain(self.throws.iter())
        {
            ty.collect_class_names(&mut names);
        }
        names
    }

    /// Call `visit` for every type variable in this signature, including bounds.
    pub fn visit_type_variables<'s>(&'s self, visit: &mut impl FnMut(&'s TypeVariable)) {
        for bound in self.type_parameters.iter().flat_map(TypeParameter::bounds) {
            bound.visit_type_variables(visit);
        }
        for ty in self
            .parameter_types
            .iter()
            .chain(std::iter::once(&self.return_type))
            .chain(self.throws.iter())
        {
            ty.visit_type_variables(visit);
        }
    }
}

impl ClassSignature {
    /// Class names mentioned anywhere in this signature, sorted.
    #[must_use]
    pub fn referenced_class_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_parameters(&self.type_parameters, &mut names);
        self.superclass.collect_class_names(&mut names);
        for interface in &self.superinterfaces {
            interface.collect_class_names(&mut names);
        }
        names
    }

    /// Call `visit` for every type variable in this signature, including bounds.
    pub fn visit_type_variables<'s>(&'s self, visit: &mut impl FnMut(&'s TypeVariable)) {
        for bound in self.type_parameters.iter().flat_map(TypeParameter::bounds) {
            bound.visit_type_variables(visit);
        }
        self.superclass.visit_type_variables(visit);
        for interface in &self.superinterfaces {
            interface.visit_type_variables(visit);
        }
    }
}
