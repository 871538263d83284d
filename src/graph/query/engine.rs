use std::{collections::HashSet, sync::Arc};

use crate::{
    graph::{
        query::{CancellationToken, RelationshipResult, TypeRef},
        ClassGraph, ModuleId, NamespaceId, RelationshipKind, TypeId,
    },
    Result,
};

/// Options controlling result shape and cancellation
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Sort results by name instead of breadth-first discovery order (default: `true`)
    pub sort_by_name: bool,
    /// Report placeholder nodes, i.e. types referenced but never linked (default: `true`).
    /// Placeholders are traversed either way.
    pub include_placeholders: bool,
    /// Token checked between expansion steps
    pub cancellation: Option<CancellationToken>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            sort_by_name: true,
            include_placeholders: true,
            cancellation: None,
        }
    }
}

/// Read-only relationship queries over a finished [`ClassGraph`]
///
/// A query starts from one or more seed types and follows one [`RelationshipKind`]:
///
/// - `direct` holds the immediate neighbours of the seeds
/// - `reachable` holds everything reachable by repeating the step
///
/// Seeds never appear in their own result, even if a cycle leads back to them. Every
/// traversal keeps a visited set, so cyclic graphs terminate.
///
/// The engine borrows the graph immutably and holds no other state, so any number of
/// engines may query the same graph from different threads.
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::prelude::*;
///
/// # fn graph() -> ClassGraph { GraphLinker::new().finish() }
/// let graph = graph();
/// let engine = QueryEngine::new(&graph);
///
/// let subclasses = engine.related_by_name("java.util.AbstractList", RelationshipKind::Subclasses)?;
/// println!("{} direct, {} total", subclasses.direct().len(), subclasses.len());
/// # Ok::<(), classscope::Error>(())
/// ```
pub struct QueryEngine<'g> {
    graph: &'g ClassGraph,
    options: QueryOptions,
}

impl<'g> QueryEngine<'g> {
    /// Engine with default options.
    #[must_use]
    pub fn new(graph: &'g ClassGraph) -> Self {
        Self::with_options(graph, QueryOptions::default())
    }

    /// Engine with explicit options.
    #[must_use]
    pub fn with_options(graph: &'g ClassGraph, options: QueryOptions) -> Self {
        QueryEngine { graph, options }
    }

    /// The queried graph.
    #[must_use]
    pub fn graph(&self) -> &'g ClassGraph {
        self.graph
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.options.cancellation {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    fn type_ref(&self, id: TypeId) -> TypeRef {
        let node = self.graph.node(id);
        TypeRef {
            id,
            name: Arc::clone(node.name_arc()),
        }
    }

    fn reportable(&self, id: TypeId) -> bool {
        self.options.include_placeholders || !self.graph.node(id).is_placeholder()
    }

    /// Relationship closure from a single seed.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the cancellation token fires.
    pub fn related(&self, seed: TypeId, kind: RelationshipKind) -> Result<RelationshipResult> {
        self.related_to_any(&[seed], kind)
    }

    /// Relationship closure from the type called `name`; empty if the name is unknown.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the cancellation token fires.
    pub fn related_by_name(&self, name: &str, kind: RelationshipKind) -> Result<RelationshipResult> {
        match self.graph.type_id(name) {
            Some(seed) => self.related(seed, kind),
            None => Ok(RelationshipResult::empty(self.options.sort_by_name)),
        }
    }

    /// Relationship closure from a set of seeds.
    ///
    /// Breadth-first: the direct neighbours of all seeds are discovered first, in seed order,
    /// then their neighbours and so on.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the cancellation token fires.
    pub fn related_to_any(
        &self,
        seeds: &[TypeId],
        kind: RelationshipKind,
    ) -> Result<RelationshipResult> {
        let mut visited: HashSet<TypeId> = seeds.iter().copied().collect();
        let mut reachable = Vec::new();
        let mut direct = Vec::new();
        let mut frontier = seeds.to_vec();
        let mut first_step = true;

        while !frontier.is_empty() {
            self.check_cancelled()?;

            let mut next = Vec::new();
            for id in frontier {
                for &neighbor in self.graph.node(id).neighbors(kind) {
                    if !visited.insert(neighbor) {
                        continue;
                    }
                    next.push(neighbor);
                    if self.reportable(neighbor) {
                        reachable.push(self.type_ref(neighbor));
                        if first_step {
                            direct.push(self.type_ref(neighbor));
                        }
                    }
                }
            }
            frontier = next;
            first_step = false;
        }

        tracing::trace!(
            "{:?} from {} seeds: {} direct, {} reachable",
            kind,
            seeds.len(),
            direct.len(),
            reachable.len()
        );
        Ok(RelationshipResult::new(
            reachable,
            direct,
            self.options.sort_by_name,
        ))
    }

    /// Types of a namespace: `direct` holds the namespace's own members, `reachable` adds
    /// the members of all descendant namespaces.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the cancellation token fires.
    pub fn namespace_members(&self, namespace: NamespaceId) -> Result<RelationshipResult> {
        let direct: Vec<TypeRef> = self
            .graph
            .namespace(namespace)
            .members()
            .iter()
            .filter(|id| self.reportable(**id))
            .map(|id| self.type_ref(*id))
            .collect();

        let mut reachable = Vec::new();
        let mut pending = vec![namespace];
        while let Some(current) = pending.pop() {
            self.check_cancelled()?;
            let node = self.graph.namespace(current);
            reachable.extend(
                node.members()
                    .iter()
                    .filter(|id| self.reportable(**id))
                    .map(|id| self.type_ref(*id)),
            );
            pending.extend(node.children().iter().rev());
        }

        Ok(RelationshipResult::new(
            reachable,
            direct,
            self.options.sort_by_name,
        ))
    }

    /// Types of the namespace called `name`; empty if the namespace is unknown.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the cancellation token fires.
    pub fn namespace_members_by_name(&self, name: &str) -> Result<RelationshipResult> {
        match self.graph.namespace_id(name) {
            Some(namespace) => self.namespace_members(namespace),
            None => Ok(RelationshipResult::empty(self.options.sort_by_name)),
        }
    }

    /// Types of a module; `direct` and `reachable` are equal.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the cancellation token fires.
    pub fn module_members(&self, module: ModuleId) -> Result<RelationshipResult> {
        self.check_cancelled()?;
        let members: Vec<TypeRef> = self
            .graph
            .module(module)
            .members()
            .iter()
            .map(|id| self.type_ref(*id))
            .collect();
        Ok(RelationshipResult::new(
            members.clone(),
            members,
            self.options.sort_by_name,
        ))
    }

    /// Every type carrying the annotation `annotation` on the class, one of its methods or
    /// one of its fields.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if the cancellation token fires.
    pub fn annotated_anywhere(&self, annotation: &str) -> Result<RelationshipResult> {
        let Some(seed) = self.graph.type_id(annotation) else {
            return Ok(RelationshipResult::empty(self.options.sort_by_name));
        };
        let on_class = self.related(seed, RelationshipKind::AnnotatedWith)?;
        let on_method = self.related(seed, RelationshipKind::ClassesWithMethodAnnotation)?;
        let on_field = self.related(seed, RelationshipKind::ClassesWithFieldAnnotation)?;
        Ok(RelationshipResult::union_all(&[
            &on_class, &on_method, &on_field,
        ]))
    }
}
