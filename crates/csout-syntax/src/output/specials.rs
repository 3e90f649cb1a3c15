// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Replays comments and preprocessor directives between real tokens.
//!
//! Comments and directives are ordinary children of the node they appear in
//! (roles [`Role::Comment`] and [`Role::PreProcessorDirective`]). The renderer
//! never visits them; instead this decorator keeps, for every open node, a
//! cursor to the next child not yet accounted for. Whenever a child node is
//! started, or a token with a given role is written, the specials between the
//! cursor and that child are written first and the cursor moves past it.

use csout_core::{TextLocation, TextRange};

use super::token_writer::TokenWriter;
use crate::ast::{CommentKind, DirectiveKind, NodeId, NodeKind, PrimitiveValue, Role, SyntaxTree};

#[derive(Debug)]
pub struct InsertSpecials<W> {
    inner: W,
    /// One cursor per open node; `None` means past the last child.
    positions: Vec<Option<NodeId>>,
}

impl<W: TokenWriter> InsertSpecials<W> {
    pub fn new(inner: W) -> Self {
        InsertSpecials {
            inner,
            positions: Vec::new(),
        }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// True when every started node has been ended.
    pub fn is_balanced(&self) -> bool {
        self.positions.is_empty()
    }

    /// Write the specials among the siblings `start..end`.
    fn write_specials(&mut self, tree: &SyntaxTree, start: Option<NodeId>, end: Option<NodeId>) {
        let mut pos = start;
        while let Some(node) = pos {
            if Some(node) == end {
                break;
            }
            match tree.kind(node) {
                NodeKind::Comment { kind, content } => {
                    self.inner.start_node(tree, node);
                    self.inner.write_comment(*kind, content);
                    self.inner.end_node(tree, node);
                }
                NodeKind::PreProcessorDirective { kind, argument } => {
                    self.inner.start_node(tree, node);
                    self.inner.write_preprocessor_directive(*kind, argument);
                    self.inner.end_node(tree, node);
                }
                _ => {}
            }
            pos = tree.next_sibling(node);
        }
    }

    /// Move the cursor past the first sibling for which `is_target` holds,
    /// writing the specials before it.
    fn write_specials_up_to<F>(&mut self, tree: &SyntaxTree, is_target: F)
    where
        F: Fn(NodeId) -> bool,
    {
        let Some(&cursor) = self.positions.last() else {
            return;
        };
        let mut pos = cursor;
        while let Some(node) = pos {
            if is_target(node) {
                self.positions.pop();
                self.write_specials(tree, cursor, Some(node));
                self.positions.push(tree.next_sibling(node));
                return;
            }
            pos = tree.next_sibling(node);
        }
    }

    fn write_specials_up_to_role(&mut self, tree: &SyntaxTree, role: Role) {
        self.write_specials_up_to(tree, |n| tree.role(n) == role);
    }
}

impl<W: TokenWriter> TokenWriter for InsertSpecials<W> {
    fn start_node(&mut self, tree: &SyntaxTree, node: NodeId) {
        if !self.positions.is_empty() {
            self.write_specials_up_to(tree, |n| n == node);
        }
        self.positions.push(tree.first_child(node));
        self.inner.start_node(tree, node);
    }

    fn end_node(&mut self, tree: &SyntaxTree, node: NodeId) {
        self.inner.end_node(tree, node);
        if let Some(pos) = self.positions.pop() {
            self.write_specials(tree, pos, None);
        }
    }

    fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId) {
        let role = match tree.role(identifier) {
            Role::Root => Role::Identifier,
            role => role,
        };
        self.write_specials_up_to_role(tree, role);
        self.inner.write_identifier(tree, identifier);
    }

    fn write_keyword(&mut self, tree: &SyntaxTree, role: Role, keyword: &str) {
        self.write_specials_up_to_role(tree, role);
        self.inner.write_keyword(tree, role, keyword);
    }

    fn write_token(&mut self, tree: &SyntaxTree, role: Role, token: &str) {
        self.write_specials_up_to_role(tree, role);
        self.inner.write_token(tree, role, token);
    }

    fn write_primitive_value(&mut self, value: &PrimitiveValue) {
        self.inner.write_primitive_value(value);
    }

    fn write_primitive_type(&mut self, keyword: &str) {
        self.inner.write_primitive_type(keyword);
    }

    fn write_comment(&mut self, kind: CommentKind, content: &str) {
        self.inner.write_comment(kind, content);
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
    use crate::output::TextTokenWriter;

    #[test]
    fn test_comment_replayed_before_following_child() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let block = tree.block(vec![a, b]);
        let comment = tree.comment(CommentKind::MultiLine, "between");
        tree.insert_special_before(b, comment);
        let trailing = tree.comment(CommentKind::MultiLine, "end");
        tree.append_special(block, trailing);

        let mut w = InsertSpecials::new(TextTokenWriter::new());
        w.start_node(&tree, block);
        for child in [a, b] {
            w.start_node(&tree, child);
            w.write_identifier(&tree, tree.child(child, Role::Identifier));
            w.end_node(&tree, child);
        }
        w.end_node(&tree, block);

        assert!(w.is_balanced());
        assert_eq!(w.inner().as_str(), "a/*between*/b/*end*/");
    }

    #[test]
    fn test_token_role_drains_up_to_matching_token() {
        let mut tree = SyntaxTree::new();
        let stmt = tree.alloc(NodeKind::BreakStatement);
        let comment = tree.comment(CommentKind::MultiLine, "x");
        tree.add_child(stmt, Role::Comment, comment);
        let semi = tree.alloc(NodeKind::Token);
        tree.add_child(stmt, Role::Token(";"), semi);

        let mut w = InsertSpecials::new(TextTokenWriter::new());
        w.start_node(&tree, stmt);
        w.write_keyword(&tree, Role::Token("break"), "break");
        w.write_token(&tree, Role::Token(";"), ";");
        w.end_node(&tree, stmt);
        assert_eq!(w.inner().as_str(), "break/*x*/;");
    }
}
