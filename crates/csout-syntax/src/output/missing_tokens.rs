// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Turns written punctuation and keywords into tree nodes with locations.
//!
//! Most tokens are implied by a node's kind (the `+` of an addition, the
//! parentheses of an invocation) and have no node of their own. While
//! rendering, this decorator records for every open node the sequence of
//! children and synthesized tokens it emitted, and where each token landed.
//!
//! The tree cannot be mutated while the renderer is borrowing it, so the
//! recorded plan is applied afterwards with [`InsertMissingTokens::apply`]:
//! stale token children are removed and each node's children are re-attached
//! in emission order, with comments and directives kept in front of the child
//! they preceded.

use std::collections::{HashMap, HashSet};

use csout_core::{TextLocation, TextRange};
use tracing::debug;

use super::token_writer::TokenWriter;
use crate::ast::{
    CommentKind, DirectiveKind, Modifiers, NodeId, NodeKind, PrimitiveValue, Role, SyntaxTree,
};

#[derive(Debug, Clone)]
enum Entry {
    Node(NodeId),
    Token { role: Role, range: TextRange },
    Modifier { modifier: Modifiers, range: TextRange },
}

#[derive(Debug)]
pub struct InsertMissingTokens<W> {
    inner: W,
    /// Open nodes with where each started and the entries emitted under it.
    open: Vec<OpenNode>,
    plan: Vec<(NodeId, Vec<Entry>)>,
    locations: Vec<(NodeId, TextRange)>,
}

#[derive(Debug)]
struct OpenNode {
    node: NodeId,
    tag: NodeKindTag,
    /// Start of the first token written inside the node.
    first: Option<TextLocation>,
    entries: Vec<Entry>,
}

/// The few node kinds whose own location is back-filled from a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKindTag {
    Primitive,
    NullReference,
    ThisReference,
    BaseReference,
    PrimitiveType,
    EmptyStatement,
    Error,
    Other,
}

impl NodeKindTag {
    fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::PrimitiveExpression { .. } => NodeKindTag::Primitive,
            NodeKind::NullReferenceExpression => NodeKindTag::NullReference,
            NodeKind::ThisReferenceExpression => NodeKindTag::ThisReference,
            NodeKind::BaseReferenceExpression => NodeKindTag::BaseReference,
            NodeKind::PrimitiveType { .. } => NodeKindTag::PrimitiveType,
            NodeKind::EmptyStatement => NodeKindTag::EmptyStatement,
            NodeKind::ErrorExpression => NodeKindTag::Error,
            _ => NodeKindTag::Other,
        }
    }
}

impl<W: TokenWriter> InsertMissingTokens<W> {
    pub fn new(inner: W) -> Self {
        InsertMissingTokens {
            inner,
            open: Vec::new(),
            plan: Vec::new(),
            locations: Vec::new(),
        }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    fn current(&self) -> Option<(NodeId, NodeKindTag)> {
        self.open.last().map(|open| (open.node, open.tag))
    }

    fn push_entry(&mut self, entry: Entry) {
        if let Some(open) = self.open.last_mut() {
            open.entries.push(entry);
        }
    }

    /// Mark the token just written as the first one of every open node that
    /// has none yet. Nodes further down the stack already have theirs.
    fn note_token(&mut self, range: Option<TextRange>) {
        let Some(range) = range else {
            return;
        };
        for open in self.open.iter_mut().rev() {
            if open.first.is_some() {
                break;
            }
            open.first = Some(range.start);
        }
    }

    /// Record the last token's range as the location of the current node if
    /// it has kind `tag`.
    fn locate_current_if(&mut self, tag: NodeKindTag, range: Option<TextRange>) -> bool {
        match (self.current(), range) {
            (Some((node, current)), Some(range)) if current == tag => {
                self.locations.push((node, range));
                true
            }
            _ => false,
        }
    }

    /// Apply the recorded tokens and locations to `tree` and return the
    /// wrapped writer.
    pub fn apply(self, tree: &mut SyntaxTree) -> W {
        let mut synthesized = 0usize;
        for (node, entries) in &self.plan {
            synthesized += rebuild_children(tree, *node, entries);
        }
        for (node, range) in &self.locations {
            tree.locations_mut().set_range(*node, *range);
        }
        debug!(
            nodes = self.plan.len(),
            tokens = synthesized,
            locations = self.locations.len(),
            "materialized missing tokens"
        );
        self.inner
    }
}

/// Replace `node`'s children by the emitted sequence. Returns the number of
/// token nodes created.
fn rebuild_children(tree: &mut SyntaxTree, node: NodeId, entries: &[Entry]) -> usize {
    let stale: Vec<NodeId> = tree
        .children(node)
        .filter(|&c| matches!(tree.kind(c), NodeKind::Token | NodeKind::ModifierToken { .. }))
        .collect();
    for token in stale {
        tree.detach(token);
    }

    let original: Vec<NodeId> = tree.children(node).collect();
    let emitted: HashSet<NodeId> = entries
        .iter()
        .filter_map(|e| match e {
            Entry::Node(n) if tree.parent(*n) == Some(node) => Some(*n),
            _ => None,
        })
        .collect();

    // children that were not emitted stay in front of the next emitted one
    let mut leading: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    let mut pending = Vec::new();
    for &child in &original {
        if emitted.contains(&child) {
            leading.insert(child, std::mem::take(&mut pending));
        } else {
            pending.push(child);
        }
    }
    let trailing = pending;

    for &child in &original {
        tree.detach(child);
    }

    let mut created = 0;
    for entry in entries {
        match entry {
            Entry::Node(child) => {
                if !emitted.contains(child) || tree.parent(*child).is_some() {
                    continue;
                }
                for before in leading.remove(child).unwrap_or_default() {
                    let role = tree.role(before);
                    tree.add_child(node, role, before);
                }
                let role = tree.role(*child);
                tree.add_child(node, role, *child);
            }
            Entry::Token { role, range } => {
                let token = tree.alloc(NodeKind::Token);
                tree.add_child(node, *role, token);
                tree.locations_mut().set_range(token, *range);
                created += 1;
            }
            Entry::Modifier { modifier, range } => {
                let token = tree.alloc(NodeKind::ModifierToken {
                    modifier: *modifier,
                });
                tree.add_child(node, Role::Modifier, token);
                tree.locations_mut().set_range(token, *range);
                created += 1;
            }
        }
    }
    for child in trailing {
        let role = tree.role(child);
        tree.add_child(node, role, child);
    }
    created
}

impl<W: TokenWriter> TokenWriter for InsertMissingTokens<W> {
    fn start_node(&mut self, tree: &SyntaxTree, node: NodeId) {
        self.push_entry(Entry::Node(node));
        self.open.push(OpenNode {
            node,
            tag: NodeKindTag::of(tree.kind(node)),
            first: None,
            entries: Vec::new(),
        });
        self.inner.start_node(tree, node);
    }

    fn end_node(&mut self, tree: &SyntaxTree, node: NodeId) {
        if let Some(open) = self.open.pop() {
            debug_assert_eq!(open.node, node, "unbalanced start/end node");
            // token-like kinds were located by their token
            if open.tag == NodeKindTag::Other {
                if let (Some(first), Some(last)) = (open.first, self.inner.last_token_range()) {
                    if first.offset <= last.end.offset {
                        self.locations.push((open.node, TextRange::new(first, last.end)));
                    }
                }
            }
            self.plan.push((open.node, open.entries));
        }
        self.inner.end_node(tree, node);
    }

    fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId) {
        self.inner.write_identifier(tree, identifier);
        self.note_token(self.inner.last_token_range());
        if identifier.is_null() {
            return;
        }
        self.push_entry(Entry::Node(identifier));
        if let Some(range) = self.inner.last_token_range() {
            self.locations.push((identifier, range));
        }
    }

    fn write_keyword(&mut self, tree: &SyntaxTree, role: Role, keyword: &str) {
        self.inner.write_keyword(tree, role, keyword);
        self.note_token(self.inner.last_token_range());
        let Some(range) = self.inner.last_token_range() else {
            return;
        };
        match role {
            Role::Token(_) => self.push_entry(Entry::Token { role, range }),
            Role::Modifier => {
                if let Some(modifier) = Modifiers::from_keyword(keyword) {
                    self.push_entry(Entry::Modifier { modifier, range });
                }
            }
            _ => {
                let tag = match keyword {
                    "this" => NodeKindTag::ThisReference,
                    "base" => NodeKindTag::BaseReference,
                    _ => return,
                };
                self.locate_current_if(tag, Some(range));
            }
        }
    }

    fn write_token(&mut self, tree: &SyntaxTree, role: Role, token: &str) {
        self.inner.write_token(tree, role, token);
        self.note_token(self.inner.last_token_range());
        let range = self.inner.last_token_range();
        if self.locate_current_if(NodeKindTag::EmptyStatement, range) {
            return;
        }
        if let (Role::Token(_), Some(range)) = (role, range) {
            self.push_entry(Entry::Token { role, range });
        }
    }

    fn write_primitive_value(&mut self, value: &PrimitiveValue) {
        self.inner.write_primitive_value(value);
        self.note_token(self.inner.last_token_range());
        let range = self.inner.last_token_range();
        if !self.locate_current_if(NodeKindTag::Primitive, range) {
            self.locate_current_if(NodeKindTag::NullReference, range);
        }
    }

    fn write_primitive_type(&mut self, keyword: &str) {
        self.inner.write_primitive_type(keyword);
        self.note_token(self.inner.last_token_range());
        let range = self.inner.last_token_range();
        self.locate_current_if(NodeKindTag::PrimitiveType, range);
    }

    fn write_comment(&mut self, kind: CommentKind, content: &str) {
        let start = self.inner.location();
        self.inner.write_comment(kind, content);
        if let (Some(start), Some(end)) = (start, self.inner.location()) {
            if start.offset <= end.offset {
                let range = TextRange::new(start, end);
                self.note_token(Some(range));
                self.locate_current_if(NodeKindTag::Error, Some(range));
            }
        }
    }

    fn write_preprocessor_directive(&mut self, kind: DirectiveKind, argument: &str) {
        self.inner.write_preprocessor_directive(kind, argument);
    }

    fn space(&mut self) {
        self.inner.space();
    }

    fn indent(&mut self) {
        self.inner.indent();
    }

    fn unindent(&mut self) {
        self.inner.unindent();
    }

    fn new_line(&mut self) {
        self.inner.new_line();
    }

    fn location(&self) -> Option<TextLocation> {
        self.inner.location()
    }

    fn last_token_range(&self) -> Option<TextRange> {
        self.inner.last_token_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;
    use crate::output::TextTokenWriter;

    #[test]
    fn test_operator_token_becomes_child() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.primitive(1);
        let sum = tree.binary(BinaryOperator::Add, a, b);

        let mut w = InsertMissingTokens::new(TextTokenWriter::new());
        w.start_node(&tree, sum);
        w.start_node(&tree, a);
        w.write_identifier(&tree, tree.child(a, Role::Identifier));
        w.end_node(&tree, a);
        w.space();
        w.write_token(&tree, Role::Token("+"), "+");
        w.space();
        w.start_node(&tree, b);
        w.write_primitive_value(&PrimitiveValue::Int(1));
        w.end_node(&tree, b);
        w.end_node(&tree, sum);
        let text = w.apply(&mut tree).into_string();
        assert_eq!(text, "a + 1");

        let roles: Vec<_> = tree.children(sum).map(|c| tree.role(c)).collect();
        assert_eq!(roles, vec![Role::Left, Role::Token("+"), Role::Right]);
        let plus = tree.child(sum, Role::Token("+"));
        assert_eq!(tree.locations().start_of(plus).map(|l| l.column), Some(3));
        assert_eq!(tree.locations().range_of(b).map(|r| r.start.column), Some(5));
        let whole = tree.locations().range_of(sum).map(|r| (r.start.column, r.end.column));
        assert_eq!(whole, Some((1, 6)));
    }

    #[test]
    fn test_reapplying_replaces_stale_tokens() {
        let mut tree = SyntaxTree::new();
        let stmt = tree.break_stmt();
        for _ in 0..2 {
            let mut w = InsertMissingTokens::new(TextTokenWriter::new());
            w.start_node(&tree, stmt);
            w.write_keyword(&tree, Role::Token("break"), "break");
            w.write_token(&tree, Role::Token(";"), ";");
            w.end_node(&tree, stmt);
            w.apply(&mut tree);
        }
        assert_eq!(tree.children(stmt).count(), 2);
    }
}
