use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

use crate::graph::{
    ModuleId, ModuleNode, NamespaceId, NamespaceNode, RelationshipKind, TypeId, TypeNode,
};

/// Arena holding every node of one scan
///
/// Nodes live in per-kind `Vec` arenas and are addressed by [`TypeId`], [`NamespaceId`] and
/// [`ModuleId`] handles, so the cyclic relationship structure needs no reference counting.
/// Name lookups go through sorted skip-map indices, which also give name-ordered iteration
/// for free.
///
/// A graph is built by a [`crate::graph::GraphLinker`] and is read-only afterwards; all
/// accessors take `&self` and the type is [`Sync`], so any number of query threads may share
/// it.
///
/// # Examples
///
/// ```rust
/// use classscope::graph::{ClassGraph, GraphLinker};
///
/// let graph: ClassGraph = GraphLinker::new().finish();
/// assert_eq!(graph.type_count(), 0);
/// assert!(graph.namespace(graph.root_namespace()).is_root());
/// ```
#[derive(Debug)]
pub struct ClassGraph {
    types: Vec<TypeNode>,
    type_index: SkipMap<Arc<str>, TypeId>,
    namespaces: Vec<NamespaceNode>,
    namespace_index: SkipMap<Arc<str>, NamespaceId>,
    modules: Vec<ModuleNode>,
    module_index: SkipMap<Arc<str>, ModuleId>,
}

impl Default for ClassGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassGraph {
    /// Empty graph holding only the root namespace.
    #[must_use]
    pub fn new() -> Self {
        let root: Arc<str> = Arc::from("");
        let namespace_index = SkipMap::new();
        namespace_index.insert(Arc::clone(&root), NamespaceId::new(0));

        ClassGraph {
            types: Vec::new(),
            type_index: SkipMap::new(),
            namespaces: vec![NamespaceNode::new(NamespaceId::new(0), root, None)],
            namespace_index,
            modules: Vec::new(),
            module_index: SkipMap::new(),
        }
    }

    /// Number of type nodes, placeholders included.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// The node behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this graph.
    #[must_use]
    pub fn node(&self, id: TypeId) -> &TypeNode {
        &self.types[id.index()]
    }

    /// The node behind `id`, `None` if `id` belongs to another graph.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.types.get(id.index())
    }

    /// Handle of the type called `name`.
    #[must_use]
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.type_index.get(name).map(|entry| *entry.value())
    }

    /// The type called `name`.
    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<&TypeNode> {
        self.type_id(name).map(|id| self.node(id))
    }

    /// All type nodes in link order.
    pub fn types(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.iter()
    }

    /// All type nodes sorted by name.
    pub fn types_by_name(&self) -> impl Iterator<Item = &TypeNode> + '_ {
        self.type_index.iter().map(|entry| self.node(*entry.value()))
    }

    /// Linked (non-placeholder) types in link order.
    pub fn linked_types(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.iter().filter(|node| !node.is_placeholder())
    }

    /// Handle of the root namespace.
    #[must_use]
    pub fn root_namespace(&self) -> NamespaceId {
        NamespaceId::new(0)
    }

    /// The namespace behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this graph.
    #[must_use]
    pub fn namespace(&self, id: NamespaceId) -> &NamespaceNode {
        &self.namespaces[id.index()]
    }

    /// Handle of the namespace called `name` (dotted, empty for the root).
    #[must_use]
    pub fn namespace_id(&self, name: &str) -> Option<NamespaceId> {
        self.namespace_index.get(name).map(|entry| *entry.value())
    }

    /// All namespaces sorted by name.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceNode> + '_ {
        self.namespace_index
            .iter()
            .map(|entry| self.namespace(*entry.value()))
    }

    /// Number of namespace nodes, the root included.
    #[must_use]
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// The module behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this graph.
    #[must_use]
    pub fn module(&self, id: ModuleId) -> &ModuleNode {
        &self.modules[id.index()]
    }

    /// Handle of the module called `name`.
    #[must_use]
    pub fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.module_index.get(name).map(|entry| *entry.value())
    }

    /// All modules sorted by name.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> + '_ {
        self.module_index.iter().map(|entry| self.module(*entry.value()))
    }

    /// Number of module nodes.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub(crate) fn node_mut(&mut self, id: TypeId) -> &mut TypeNode {
        &mut self.types[id.index()]
    }

    pub(crate) fn namespace_mut(&mut self, id: NamespaceId) -> &mut NamespaceNode {
        &mut self.namespaces[id.index()]
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut ModuleNode {
        &mut self.modules[id.index()]
    }

    /// Existing node for `name`, or a new placeholder.
    pub(crate) fn type_or_placeholder(&mut self, name: &Arc<str>) -> TypeId {
        if let Some(id) = self.type_id(name) {
            return id;
        }

        let id = TypeId::new(self.types.len());
        self.types.push(TypeNode::placeholder(id, Arc::clone(name)));
        self.type_index.insert(Arc::clone(name), id);
        id
    }

    /// Record `from -kind-> to` and its inverse. Self-edges are ignored.
    pub(crate) fn add_edge(&mut self, from: TypeId, kind: RelationshipKind, to: TypeId) {
        if from == to {
            return;
        }
        self.node_mut(from).insert_edge(kind, to);
        self.node_mut(to).insert_edge(kind.inverse(), from);
    }

    /// Edge from `from` to the node called `name`, created as placeholder if unknown.
    pub(crate) fn add_edge_to_name(&mut self, from: TypeId, kind: RelationshipKind, name: &Arc<str>) {
        let to = self.type_or_placeholder(name);
        self.add_edge(from, kind, to);
    }

    /// Namespace for a dotted package name, creating it and its missing ancestors.
    ///
    /// Ancestors are created iteratively from the deepest existing one downwards, so the
    /// nesting depth of `name` never bounds the stack.
    pub(crate) fn namespace_or_create(&mut self, name: &str) -> NamespaceId {
        if let Some(id) = self.namespace_id(name) {
            return id;
        }

        let mut parent = self.root_namespace();
        let mut next = 0;
        for (dot, _) in name.rmatch_indices('.') {
            if let Some(id) = self.namespace_id(&name[..dot]) {
                parent = id;
                next = dot + 1;
                break;
            }
        }

        loop {
            let end = name[next..].find('.').map_or(name.len(), |offset| next + offset);
            parent = self.push_namespace(&name[..end], parent);
            if end == name.len() {
                return parent;
            }
            next = end + 1;
        }
    }

    fn push_namespace(&mut self, name: &str, parent: NamespaceId) -> NamespaceId {
        let id = NamespaceId::new(self.namespaces.len());
        let name: Arc<str> = Arc::from(name);
        self.namespaces
            .push(NamespaceNode::new(id, Arc::clone(&name), Some(parent)));
        self.namespace_index.insert(name, id);
        self.namespace_mut(parent).children.insert(id);
        id
    }

    /// Module node for `name`, created on first use.
    pub(crate) fn module_or_create(&mut self, name: &Arc<str>) -> ModuleId {
        if let Some(id) = self.module_id(name) {
            return id;
        }

        let id = ModuleId::new(self.modules.len());
        self.modules.push(ModuleNode::new(id, Arc::clone(name)));
        self.module_index.insert(Arc::clone(name), id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_created_up_to_the_root() {
        let mut graph = ClassGraph::new();
        let leaf = graph.namespace_or_create("com.example.app");
        assert_eq!(graph.namespace_count(), 4);

        let example = graph.namespace(leaf).parent().unwrap();
        assert_eq!(graph.namespace(example).name(), "com.example");
        let com = graph.namespace(example).parent().unwrap();
        assert_eq!(graph.namespace(com).parent(), Some(graph.root_namespace()));
        assert_eq!(graph.namespace(graph.root_namespace()).children(), &[com]);

        assert_eq!(graph.namespace_or_create("com.example"), example);
        let names: Vec<_> = graph.namespaces().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["", "com", "com.example", "com.example.app"]);
    }

    #[test]
    fn missing_ancestors_attach_below_the_deepest_existing_one() {
        let mut graph = ClassGraph::new();
        let example = graph.namespace_or_create("com.example");
        let leaf = graph.namespace_or_create("com.example.app.web");
        assert_eq!(graph.namespace_count(), 5);

        let app = graph.namespace(leaf).parent().unwrap();
        assert_eq!(graph.namespace(app).name(), "com.example.app");
        assert_eq!(graph.namespace(app).parent(), Some(example));
        assert_eq!(graph.namespace(example).children(), &[app]);
    }

    #[test]
    fn deep_packages_do_not_recurse() {
        let depth = 4096;
        let name = vec!["a"; depth].join(".");

        // A small stack overflows long before `depth` frames
        let handle = std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn(move || {
                let mut graph = ClassGraph::new();
                let leaf = graph.namespace_or_create(&name);
                (graph.namespace_count(), graph.namespace(leaf).name().len())
            })
            .unwrap();

        let (count, leaf_len) = handle.join().unwrap();
        assert_eq!(count, depth + 1);
        assert_eq!(leaf_len, depth * 2 - 1);
    }

    #[test]
    fn edges_are_bidirectional() {
        let mut graph = ClassGraph::new();
        let foo = graph.type_or_placeholder(&Arc::from("a.Foo"));
        let bar = graph.type_or_placeholder(&Arc::from("a.Bar"));
        assert_eq!(graph.type_or_placeholder(&Arc::from("a.Foo")), foo);

        graph.add_edge(foo, RelationshipKind::Superclasses, bar);
        graph.add_edge(foo, RelationshipKind::Superclasses, bar);
        graph.add_edge(foo, RelationshipKind::Dependencies, foo);

        assert_eq!(graph.node(foo).neighbors(RelationshipKind::Superclasses), &[bar]);
        assert_eq!(graph.node(bar).neighbors(RelationshipKind::Subclasses), &[foo]);
        assert!(graph.node(foo).neighbors(RelationshipKind::Dependencies).is_empty());

        let sorted: Vec<_> = graph.types_by_name().map(TypeNode::name).collect();
        assert_eq!(sorted, vec!["a.Bar", "a.Foo"]);
    }
}
