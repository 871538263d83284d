use std::{collections::HashSet, sync::Arc};

use crate::{
    classfile::{
        decoder::{DecodedUnit, UnitKind},
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity},
        signatures::{TypeParameter, TypeParameterOwner, TypeVariable, TypeVariableBinding},
    },
    graph::{ClassGraph, ModuleId, NamespaceId, RelationshipKind, TypeDetails, TypeId},
    scan::ScanContext,
    Error, Result,
};

/// Location reported for units whose byte source carried no classpath element
const UNKNOWN_LOCATION: &str = "<unknown>";

/// Deepest package a linked unit may declare
///
/// Every namespace keeps its full dotted name, so namespace memory grows with the square of
/// the package depth. Deeper units are rejected as malformed before any graph mutation.
pub const MAX_PACKAGE_DEPTH: usize = 1024;

/// Node a unit was merged into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A class, interface, enum, record or annotation interface
    Type(TypeId),
    /// A `package-info` descriptor, attached to its namespace
    Namespace(NamespaceId),
    /// A `module-info` descriptor, attached to its module
    Module(ModuleId),
}

/// Single-writer merge step from decoded units into a [`ClassGraph`]
///
/// Every unit is linked atomically: all checks that can reject it run before the first
/// mutation, so a rejected unit leaves no trace in the graph. Names referenced but not (yet)
/// linked become placeholder nodes, filled in place if their unit arrives later.
///
/// ## Masking
///
/// The first unit linked under a name is authoritative. A later unit with the same name is
/// rejected with [`Error::LinkConflict`] naming both classpath elements, and the conflict is
/// recorded in the context diagnostics. The same holds for a second `package-info` of one
/// package and a second `module-info` of one module.
///
/// ## Thread Safety
///
/// `link` takes `&mut self`; concurrent producers must serialize access, e.g. behind the
/// [`std::sync::Mutex`] of a [`crate::scan::ScanSession`].
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::prelude::*;
///
/// # fn units() -> Vec<DecodedUnit> { Vec::new() }
/// let mut linker = GraphLinker::new();
/// for unit in units() {
///     if let Err(conflict) = linker.link(unit) {
///         eprintln!("{conflict}");
///     }
/// }
/// let graph = linker.finish();
/// println!("{} types", graph.type_count());
/// ```
pub struct GraphLinker {
    graph: ClassGraph,
    context: Arc<ScanContext>,
}

impl Default for GraphLinker {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphLinker {
    /// Linker over an empty graph with a private context.
    #[must_use]
    pub fn new() -> Self {
        Self::with_context(Arc::new(ScanContext::new()))
    }

    /// Linker reporting into the diagnostics of `context`.
    #[must_use]
    pub fn with_context(context: Arc<ScanContext>) -> Self {
        GraphLinker {
            graph: ClassGraph::new(),
            context,
        }
    }

    /// The graph built so far.
    #[must_use]
    pub fn graph(&self) -> &ClassGraph {
        &self.graph
    }

    /// Merge one decoded unit.
    ///
    /// # Errors
    /// - [`Error::LinkConflict`] if the name (or the package/module descriptor) was already
    ///   linked; the graph is unchanged
    /// - [`Error::Malformed`] for a `module-info` unit with no module name, or a unit whose
    ///   package is nested deeper than [`MAX_PACKAGE_DEPTH`]
    pub fn link(&mut self, unit: DecodedUnit) -> Result<LinkOutcome> {
        match unit.kind() {
            UnitKind::Type => self.link_type(unit).map(LinkOutcome::Type),
            UnitKind::NamespaceDescriptor => {
                self.link_namespace_descriptor(unit).map(LinkOutcome::Namespace)
            }
            UnitKind::ModuleDescriptor => {
                self.link_module_descriptor(unit).map(LinkOutcome::Module)
            }
        }
    }

    /// Bind type variables and hand out the finished graph.
    ///
    /// Each type variable in a class signature, field signature or method signature is
    /// bound to the type parameter it names, looked up in the declaring method first, then
    /// the declaring class, then its enclosing classes from the innermost outwards.
    #[must_use]
    pub fn finish(self) -> ClassGraph {
        let graph = self.graph;
        let (bound, unbound) = bind_type_variables(&graph);
        tracing::debug!(
            "Linked {} types into {} namespaces and {} modules ({} type variables bound, {} unbound)",
            graph.type_count(),
            graph.namespace_count(),
            graph.module_count(),
            bound,
            unbound
        );
        graph
    }

    fn conflict(&self, name: &str, kept: Option<&str>, rejected: Option<&str>) -> Error {
        let error = Error::LinkConflict {
            name: name.to_string(),
            kept: kept.unwrap_or(UNKNOWN_LOCATION).to_string(),
            rejected: rejected.unwrap_or(UNKNOWN_LOCATION).to_string(),
        };
        tracing::debug!("{}", error);
        self.context.diagnostics.push(
            Diagnostic::new(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Link,
                error.to_string(),
            )
            .with_unit(name),
        );
        error
    }

    fn link_type(&mut self, unit: DecodedUnit) -> Result<TypeId> {
        check_package_depth(&unit)?;
        if let Some(existing) = self.graph.type_by_name(&unit.name) {
            if let Some(details) = existing.details() {
                return Err(self.conflict(
                    &unit.name,
                    details.classpath_element.as_deref(),
                    unit.classpath_element.as_deref(),
                ));
            }
        }

        let graph = &mut self.graph;
        let id = graph.type_or_placeholder(&unit.name);

        let namespace = graph.namespace_or_create(unit.package_name());
        graph.namespace_mut(namespace).members.insert(id);
        graph.node_mut(id).namespace = Some(namespace);

        if let Some(module_name) = &unit.module {
            let module = graph.module_or_create(module_name);
            let node = graph.module_mut(module);
            if node.location.is_none() {
                node.location = unit.classpath_element.clone();
            }
            node.members.insert(id);
            node.namespaces.insert(namespace);
            graph.node_mut(id).module = Some(module);
        }

        if let Some(superclass) = &unit.superclass {
            graph.add_edge_to_name(id, RelationshipKind::Superclasses, superclass);
        }
        for interface in &unit.interfaces {
            graph.add_edge_to_name(id, RelationshipKind::Interfaces, interface);
        }
        for annotation in &unit.annotations {
            graph.add_edge_to_name(id, RelationshipKind::Annotations, &annotation.type_name);
        }
        for annotation in unit.methods.iter().flat_map(|m| &m.annotations) {
            graph.add_edge_to_name(id, RelationshipKind::MethodAnnotations, &annotation.type_name);
        }
        for annotation in unit.fields.iter().flat_map(|f| &f.annotations) {
            graph.add_edge_to_name(id, RelationshipKind::FieldAnnotations, &annotation.type_name);
        }
        for pair in &unit.containment {
            let inner = graph.type_or_placeholder(&pair.inner);
            let outer = graph.type_or_placeholder(&pair.outer);
            graph.add_edge(inner, RelationshipKind::OuterClasses, outer);
        }
        for name in unit.referenced_class_names() {
            graph.add_edge_to_name(id, RelationshipKind::Dependencies, &Arc::from(name));
        }

        tracing::trace!("Linked {} as {}", unit.name, id);
        graph.node_mut(id).details = Some(TypeDetails::from(unit));
        Ok(id)
    }

    fn link_namespace_descriptor(&mut self, unit: DecodedUnit) -> Result<NamespaceId> {
        check_package_depth(&unit)?;
        let package = unit.package_name().to_string();
        if let Some(existing) = self.graph.namespace_id(&package) {
            let node = self.graph.namespace(existing);
            if node.has_descriptor {
                return Err(self.conflict(
                    &unit.name,
                    node.descriptor_location.as_deref(),
                    unit.classpath_element.as_deref(),
                ));
            }
        }

        let namespace = self.graph.namespace_or_create(&package);
        let node = self.graph.namespace_mut(namespace);
        node.has_descriptor = true;
        node.descriptor_location = unit.classpath_element;
        node.annotations = unit.annotations;
        Ok(namespace)
    }

    fn link_module_descriptor(&mut self, unit: DecodedUnit) -> Result<ModuleId> {
        let Some(name) = unit.module_name.clone().or_else(|| unit.module.clone()) else {
            return Err(malformed_error!("Module descriptor without module name"));
        };

        if let Some(existing) = self.graph.module_id(&name) {
            let node = self.graph.module(existing);
            if node.has_descriptor {
                return Err(self.conflict(
                    &unit.name,
                    node.location(),
                    unit.classpath_element.as_deref(),
                ));
            }
        }

        let module = self.graph.module_or_create(&name);
        let node = self.graph.module_mut(module);
        node.has_descriptor = true;
        node.location = unit.classpath_element.or(node.location.take());
        node.annotations = unit.annotations;
        Ok(module)
    }
}

fn check_package_depth(unit: &DecodedUnit) -> Result<()> {
    let package = unit.package_name();
    let depth = if package.is_empty() {
        0
    } else {
        package.bytes().filter(|&b| b == b'.').count() + 1
    };
    if depth > MAX_PACKAGE_DEPTH {
        return Err(malformed_error!(
            "Package nested {} levels deep, at most {} are supported",
            depth,
            MAX_PACKAGE_DEPTH
        ));
    }
    Ok(())
}

/// Where a type variable occurs, innermost scope first
struct BindingScope<'g> {
    graph: &'g ClassGraph,
    class: TypeId,
    method: Option<(&'g str, &'g [TypeParameter])>,
}

impl BindingScope<'_> {
    fn resolve(&self, name: &str) -> Option<TypeVariableBinding> {
        if let Some((method_name, parameters)) = self.method {
            if let Some(parameter) = parameters.iter().find(|p| p.name == name) {
                return Some(TypeVariableBinding {
                    declared_by: TypeParameterOwner::Method {
                        class_name: self.graph.node(self.class).name().to_string(),
                        method_name: method_name.to_string(),
                    },
                    parameter: parameter.clone(),
                });
            }
        }

        let mut visited = HashSet::new();
        let mut current = vec![self.class];
        while !current.is_empty() {
            let mut next = Vec::new();
            for id in current {
                if !visited.insert(id) {
                    continue;
                }
                let node = self.graph.node(id);
                let declared = node
                    .details()
                    .and_then(|d| d.signature.as_ref())
                    .and_then(|s| s.type_parameters.iter().find(|p| p.name == name));
                if let Some(parameter) = declared {
                    return Some(TypeVariableBinding {
                        declared_by: TypeParameterOwner::Class(node.name().to_string()),
                        parameter: parameter.clone(),
                    });
                }
                next.extend_from_slice(node.neighbors(RelationshipKind::OuterClasses));
            }
            current = next;
        }
        None
    }

    fn bind(&self, variable: &TypeVariable, counts: &mut (usize, usize)) {
        if variable.binding().is_some() {
            return;
        }
        match self.resolve(&variable.name) {
            Some(binding) => {
                variable.bind(binding);
                counts.0 += 1;
            }
            None => counts.1 += 1,
        }
    }
}

fn bind_type_variables(graph: &ClassGraph) -> (usize, usize) {
    let mut counts = (0, 0);

    for node in graph.linked_types() {
        let Some(details) = node.details() else {
            continue;
        };
        let class_scope = BindingScope {
            graph,
            class: node.id(),
            method: None,
        };

        if let Some(signature) = &details.signature {
            signature.visit_type_variables(&mut |v| class_scope.bind(v, &mut counts));
        }
        for field in &details.fields {
            if let Some(signature) = &field.type_signature {
                signature.visit_type_variables(&mut |v| class_scope.bind(v, &mut counts));
            }
        }
        for method in &details.methods {
            let Some(signature) = &method.type_signature else {
                continue;
            };
            let method_scope = BindingScope {
                graph,
                class: node.id(),
                method: Some((&*method.name, signature.type_parameters.as_slice())),
            };
            signature.visit_type_variables(&mut |v| method_scope.bind(v, &mut counts));
        }
    }

    counts
}
