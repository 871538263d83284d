use std::{collections::HashSet, fmt, sync::Arc};

use crate::graph::TypeId;

/// A type in a query result: its handle and its name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Handle into the queried graph
    pub id: TypeId,
    /// Dotted fully-qualified name
    pub name: Arc<str>,
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered set of [`TypeRef`]s
#[derive(Debug, Clone, Default)]
struct TypeSet {
    items: Vec<TypeRef>,
    members: HashSet<TypeId>,
}

impl TypeSet {
    fn insert(&mut self, item: TypeRef) -> bool {
        if self.members.insert(item.id) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    fn contains(&self, id: TypeId) -> bool {
        self.members.contains(&id)
    }

    fn retain(&mut self, mut keep: impl FnMut(&TypeRef) -> bool) {
        let members = &mut self.members;
        self.items.retain(|item| {
            let kept = keep(item);
            if !kept {
                members.remove(&item.id);
            }
            kept
        });
    }

    fn sort_by_name(&mut self) {
        self.items.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

impl FromIterator<TypeRef> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeRef>>(iter: I) -> Self {
        let mut set = TypeSet::default();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

/// Dual result of a relationship query
///
/// `reachable` is the full transitive closure, `direct` the one-hop neighbourhood of the
/// seeds. `direct` is always a subset of `reachable`. Both iterate either sorted by name or
/// in discovery (breadth-first) order, as recorded by [`RelationshipResult::is_sorted_by_name`].
///
/// ## Algebra
///
/// [`RelationshipResult::union_all`], [`RelationshipResult::intersect_all`] and
/// [`RelationshipResult::exclude_all`] combine the `reachable` and `direct` sets of their
/// operands independently. If every operand is name-sorted, so is the result. Otherwise
/// the first operand in discovery order leads: its members come first in its order,
/// followed by the remaining operands' members in operand order.
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::prelude::*;
///
/// # fn graph() -> ClassGraph { GraphLinker::new().finish() }
/// let graph = graph();
/// let engine = QueryEngine::new(&graph);
/// let services = engine.related_by_name("com.example.Service", RelationshipKind::Implementors)?;
/// let beans = engine.related_by_name("com.example.Bean", RelationshipKind::AnnotatedWith)?;
///
/// for type_ref in services.intersect(&beans).reachable() {
///     println!("{type_ref}");
/// }
/// # Ok::<(), classscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RelationshipResult {
    reachable: TypeSet,
    direct: TypeSet,
    sorted: bool,
}

impl RelationshipResult {
    /// Build a result from discovery-ordered sets.
    ///
    /// Members of `direct` missing from `reachable` are dropped; with `sort_by_name` both
    /// sets are sorted.
    #[must_use]
    pub fn new(
        reachable: impl IntoIterator<Item = TypeRef>,
        direct: impl IntoIterator<Item = TypeRef>,
        sort_by_name: bool,
    ) -> Self {
        Self::assemble(
            reachable.into_iter().collect(),
            direct.into_iter().collect(),
            sort_by_name,
        )
    }

    /// Empty result.
    #[must_use]
    pub fn empty(sort_by_name: bool) -> Self {
        RelationshipResult {
            reachable: TypeSet::default(),
            direct: TypeSet::default(),
            sorted: sort_by_name,
        }
    }

    fn assemble(reachable: TypeSet, mut direct: TypeSet, sorted: bool) -> Self {
        direct.retain(|item| reachable.contains(item.id));
        let mut result = RelationshipResult {
            reachable,
            direct,
            sorted,
        };
        if sorted {
            result.reachable.sort_by_name();
            result.direct.sort_by_name();
        }
        result
    }

    /// Full transitive closure.
    #[must_use]
    pub fn reachable(&self) -> &[TypeRef] {
        &self.reachable.items
    }

    /// One-hop neighbourhood.
    #[must_use]
    pub fn direct(&self) -> &[TypeRef] {
        &self.direct.items
    }

    /// Names in [`RelationshipResult::reachable`], in iteration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.reachable.items.iter().map(|t| &*t.name).collect()
    }

    /// Names in [`RelationshipResult::direct`], in iteration order.
    #[must_use]
    pub fn direct_names(&self) -> Vec<&str> {
        self.direct.items.iter().map(|t| &*t.name).collect()
    }

    /// Returns `true` if both sets iterate in name order.
    #[must_use]
    pub fn is_sorted_by_name(&self) -> bool {
        self.sorted
    }

    /// Returns `true` if `id` is reachable.
    #[must_use]
    pub fn contains(&self, id: TypeId) -> bool {
        self.reachable.contains(id)
    }

    /// Returns `true` if `id` is a direct neighbour.
    #[must_use]
    pub fn contains_direct(&self, id: TypeId) -> bool {
        self.direct.contains(id)
    }

    /// Size of the reachable set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reachable.items.len()
    }

    /// Returns `true` if nothing is reachable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reachable.items.is_empty()
    }

    /// `self ∪ other`.
    #[must_use]
    pub fn union(&self, other: &RelationshipResult) -> RelationshipResult {
        Self::union_all(&[self, other])
    }

    /// `self ∩ other`.
    #[must_use]
    pub fn intersect(&self, other: &RelationshipResult) -> RelationshipResult {
        Self::intersect_all(&[self, other])
    }

    /// `self \ other`.
    #[must_use]
    pub fn exclude(&self, other: &RelationshipResult) -> RelationshipResult {
        Self::exclude_all(self, &[other])
    }

    /// Union of all operands.
    #[must_use]
    pub fn union_all(operands: &[&RelationshipResult]) -> RelationshipResult {
        let (ordered, sorted) = iteration_order(operands);
        let reachable = ordered
            .iter()
            .flat_map(|r| r.reachable.items.iter().cloned())
            .collect();
        let direct = ordered
            .iter()
            .flat_map(|r| r.direct.items.iter().cloned())
            .collect();
        Self::assemble(reachable, direct, sorted)
    }

    /// Intersection of all operands.
    #[must_use]
    pub fn intersect_all(operands: &[&RelationshipResult]) -> RelationshipResult {
        let (ordered, sorted) = iteration_order(operands);
        let Some(leader) = ordered.first() else {
            return Self::empty(sorted);
        };

        let reachable = leader
            .reachable
            .items
            .iter()
            .filter(|item| ordered.iter().all(|r| r.reachable.contains(item.id)))
            .cloned()
            .collect();
        let direct = leader
            .direct
            .items
            .iter()
            .filter(|item| ordered.iter().all(|r| r.direct.contains(item.id)))
            .cloned()
            .collect();
        Self::assemble(reachable, direct, sorted)
    }

    /// Members of `base` in none of `excluded`.
    #[must_use]
    pub fn exclude_all(
        base: &RelationshipResult,
        excluded: &[&RelationshipResult],
    ) -> RelationshipResult {
        let sorted = base.sorted && excluded.iter().all(|r| r.sorted);
        let reachable = base
            .reachable
            .items
            .iter()
            .filter(|item| !excluded.iter().any(|r| r.reachable.contains(item.id)))
            .cloned()
            .collect();
        let direct = base
            .direct
            .items
            .iter()
            .filter(|item| !excluded.iter().any(|r| r.direct.contains(item.id)))
            .cloned()
            .collect();
        Self::assemble(reachable, direct, sorted)
    }

    /// Keep the members matching `predicate`, tested separately in both sets.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&TypeRef) -> bool) -> RelationshipResult {
        let reachable = self
            .reachable
            .items
            .iter()
            .filter(|item| predicate(*item))
            .cloned()
            .collect();
        let direct = self
            .direct
            .items
            .iter()
            .filter(|item| predicate(*item))
            .cloned()
            .collect();
        Self::assemble(reachable, direct, self.sorted)
    }
}

/// Operands reordered so the first discovery-ordered one leads, and whether the result is
/// name-sorted.
fn iteration_order<'r>(operands: &[&'r RelationshipResult]) -> (Vec<&'r RelationshipResult>, bool) {
    match operands.iter().position(|r| !r.sorted) {
        None => (operands.to_vec(), true),
        Some(leader) => {
            let mut ordered = Vec::with_capacity(operands.len());
            ordered.push(operands[leader]);
            ordered.extend(
                operands
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| *index != leader)
                    .map(|(_, r)| *r),
            );
            (ordered, false)
        }
    }
}

impl<'r> IntoIterator for &'r RelationshipResult {
    type Item = &'r TypeRef;
    type IntoIter = std::slice::Iter<'r, TypeRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.reachable.items.iter()
    }
}
