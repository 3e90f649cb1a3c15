// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The node arena.
//!
//! [`SyntaxTree`] owns every node record. Parent and sibling links are plain
//! [`NodeId`]s maintained by the arena's mutation methods; nodes never hold
//! references to each other. Children under a parent form a doubly linked list
//! so that insertion before/after a sibling and replacement are O(1).
//!
//! ```text
//! parent ── first_child ─▶ a ⇄ b ⇄ c ◀─ last_child ── parent
//! ```

use super::annotations::Annotations;
use super::location::LocationTable;
use super::node::{NodeId, NodeKind};
use super::role::Role;

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    role: Role,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        NodeData {
            kind,
            role: Role::Root,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// An arena of syntax nodes plus their side tables.
///
/// Cloning a tree produces an independent copy with identical node ids, which
/// is how callers hand a tree to another thread.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    locations: LocationTable,
    annotations: Annotations,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree {
            nodes: vec![NodeData::new(NodeKind::Null)],
            locations: LocationTable::new(),
            annotations: Annotations::new(),
        }
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Number of allocated nodes, including the null node and detached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    /// Mutable access to the payload. The null node's kind cannot change.
    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        if id.is_null() {
            return None;
        }
        Some(&mut self.data_mut(id).kind)
    }

    pub fn role(&self, id: NodeId) -> Role {
        self.data(id).role
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).prev_sibling
    }

    pub fn locations(&self) -> &LocationTable {
        &self.locations
    }

    pub fn locations_mut(&mut self) -> &mut LocationTable {
        &mut self.locations
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    pub fn children_by_role(&self, id: NodeId, role: Role) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&c| self.role(c) == role)
    }

    /// The first child in `role`, or [`NodeId::NULL`].
    pub fn child(&self, id: NodeId, role: Role) -> NodeId {
        self.children_by_role(id, role)
            .next()
            .unwrap_or(NodeId::NULL)
    }

    pub fn has_child(&self, id: NodeId, role: Role) -> bool {
        !self.child(id, role).is_null()
    }

    /// Proper ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// All descendants in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(n) = stack.pop() {
            out.push(n);
            let start = stack.len();
            stack.extend(self.children(n));
            stack[start..].reverse();
        }
        out
    }

    /// The next node in document order that is not a descendant of `id`: the
    /// next sibling, or the next sibling of the nearest ancestor that has one.
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if let Some(next) = self.next_sibling(current) {
                return Some(next);
            }
            current = self.parent(current)?;
        }
    }

    /// The name held by an identifier node, or by a node's `Identifier` child.
    ///
    /// Returns an empty string when there is none.
    pub fn name(&self, id: NodeId) -> &str {
        match self.kind(id) {
            NodeKind::Identifier { name, .. } => name,
            _ => match self.kind(self.child(id, Role::Identifier)) {
                NodeKind::Identifier { name, .. } => name,
                _ => "",
            },
        }
    }

    /// True when `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    fn check_attachable(&self, parent: NodeId, child: NodeId) {
        assert!(!parent.is_null(), "cannot add children to the null node");
        assert!(
            self.parent(child).is_none(),
            "{} already has a parent",
            child
        );
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "{} cannot become its own descendant",
            child
        );
    }

    /// Append `child` under `parent` in `role`. Adding the null node is a no-op.
    ///
    /// # Panics
    /// Panics if `child` is already attached or `parent` is the null node.
    pub fn add_child(&mut self, parent: NodeId, role: Role, child: NodeId) {
        if child.is_null() {
            return;
        }
        self.check_attachable(parent, child);
        let last = self.last_child(parent);
        {
            let c = self.data_mut(child);
            c.role = role;
            c.parent = Some(parent);
            c.prev_sibling = last;
            c.next_sibling = None;
        }
        match last {
            Some(last) => self.data_mut(last).next_sibling = Some(child),
            None => self.data_mut(parent).first_child = Some(child),
        }
        self.data_mut(parent).last_child = Some(child);
    }

    /// Insert `child` under `parent` before `next`; `None` appends.
    ///
    /// # Panics
    /// Panics if `next` is not a child of `parent`.
    pub fn insert_child_before(
        &mut self,
        parent: NodeId,
        next: Option<NodeId>,
        role: Role,
        child: NodeId,
    ) {
        let Some(next) = next else {
            self.add_child(parent, role, child);
            return;
        };
        if child.is_null() {
            return;
        }
        assert_eq!(
            self.parent(next),
            Some(parent),
            "{} is not a child of {}",
            next,
            parent
        );
        self.check_attachable(parent, child);
        let prev = self.prev_sibling(next);
        {
            let c = self.data_mut(child);
            c.role = role;
            c.parent = Some(parent);
            c.prev_sibling = prev;
            c.next_sibling = Some(next);
        }
        self.data_mut(next).prev_sibling = Some(child);
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = Some(child),
            None => self.data_mut(parent).first_child = Some(child),
        }
    }

    /// Insert `child` under `parent` after `prev`; `None` prepends.
    pub fn insert_child_after(
        &mut self,
        parent: NodeId,
        prev: Option<NodeId>,
        role: Role,
        child: NodeId,
    ) {
        let next = match prev {
            Some(prev) => self.next_sibling(prev),
            None => self.first_child(parent),
        };
        self.insert_child_before(parent, next, role, child);
    }

    /// Unlink `id` from its parent. The node keeps its role and children.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let prev = self.prev_sibling(id);
        let next = self.next_sibling(id);
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = next,
            None => self.data_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.data_mut(next).prev_sibling = prev,
            None => self.data_mut(parent).last_child = prev,
        }
        let d = self.data_mut(id);
        d.parent = None;
        d.prev_sibling = None;
        d.next_sibling = None;
    }

    /// Put `new` where `old` is, in `old`'s role, and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.parent(old) else {
            return;
        };
        let role = self.role(old);
        let next = self.next_sibling(old);
        self.detach(old);
        self.insert_child_before(parent, next, role, new);
    }

    /// Detach `old`, build its replacement with `f`, and put the replacement in
    /// `old`'s position and role. `f` receives the detached `old`, so it may
    /// re-attach it inside the replacement (wrapping).
    pub fn replace_with<F>(&mut self, old: NodeId, f: F) -> NodeId
    where
        F: FnOnce(&mut SyntaxTree, NodeId) -> NodeId,
    {
        let parent = self.parent(old);
        let role = self.role(old);
        let next = self.next_sibling(old);
        self.detach(old);
        let new = f(self, old);
        if let Some(parent) = parent {
            self.insert_child_before(parent, next, role, new);
        }
        new
    }
}

/// Iterator over a node's children.
pub struct Children<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(tree: &mut SyntaxTree, name: &str) -> NodeId {
        tree.alloc(NodeKind::Identifier {
            name: name.to_string(),
            verbatim: false,
        })
    }

    #[test]
    fn test_null_child_is_sentinel() {
        let mut tree = SyntaxTree::new();
        let block = tree.alloc(NodeKind::BlockStatement);
        assert_eq!(tree.child(block, Role::Statement), NodeId::NULL);
        tree.add_child(block, Role::Statement, NodeId::NULL);
        assert_eq!(tree.children(block).count(), 0);
        assert_eq!(tree.kind(NodeId::NULL), &NodeKind::Null);
    }

    #[test]
    fn test_sibling_links_follow_insertions() {
        let mut tree = SyntaxTree::new();
        let parent = tree.alloc(NodeKind::BlockStatement);
        let a = ident(&mut tree, "a");
        let b = ident(&mut tree, "b");
        let c = ident(&mut tree, "c");
        tree.add_child(parent, Role::Statement, a);
        tree.add_child(parent, Role::Statement, c);
        tree.insert_child_after(parent, Some(a), Role::Statement, b);
        let order: Vec<_> = tree.children(parent).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(tree.prev_sibling(c), Some(b));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.last_child(parent), Some(c));

        tree.detach(b);
        let order: Vec<_> = tree.children(parent).collect();
        assert_eq!(order, vec![a, c]);
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.next_sibling(a), Some(c));
    }

    #[test]
    fn test_replace_with_wraps_in_place() {
        let mut tree = SyntaxTree::new();
        let parent = tree.alloc(NodeKind::BinaryOperatorExpression {
            operator: crate::ast::BinaryOperator::Add,
        });
        let left = ident(&mut tree, "l");
        let right = ident(&mut tree, "r");
        tree.add_child(parent, Role::Left, left);
        tree.add_child(parent, Role::Right, right);

        let wrapper = tree.replace_with(left, |tree, old| {
            let paren = tree.alloc(NodeKind::ParenthesizedExpression);
            tree.add_child(paren, Role::Expression, old);
            paren
        });
        assert_eq!(tree.child(parent, Role::Left), wrapper);
        assert_eq!(tree.parent(left), Some(wrapper));
        assert_eq!(tree.role(left), Role::Expression);
        assert_eq!(tree.next_sibling(wrapper), Some(right));
    }

    #[test]
    fn test_next_node_climbs_to_parent_sibling() {
        let mut tree = SyntaxTree::new();
        let root = tree.alloc(NodeKind::BlockStatement);
        let first = tree.alloc(NodeKind::ExpressionStatement);
        let second = tree.alloc(NodeKind::ExpressionStatement);
        let inner = ident(&mut tree, "x");
        tree.add_child(root, Role::Statement, first);
        tree.add_child(root, Role::Statement, second);
        tree.add_child(first, Role::Expression, inner);
        assert_eq!(tree.next_node(inner), Some(second));
        assert_eq!(tree.next_node(second), None);
        assert_eq!(tree.descendants(root), vec![first, inner, second]);
    }

    #[test]
    #[should_panic]
    fn test_attached_node_cannot_be_added_twice() {
        let mut tree = SyntaxTree::new();
        let a = tree.alloc(NodeKind::BlockStatement);
        let b = tree.alloc(NodeKind::BlockStatement);
        let x = ident(&mut tree, "x");
        tree.add_child(a, Role::Statement, x);
        tree.add_child(b, Role::Statement, x);
    }
}
