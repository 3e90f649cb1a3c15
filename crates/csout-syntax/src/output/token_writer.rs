// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The token-writer interface.
//!
//! The renderer never writes text directly. It calls a [`TokenWriter`], which
//! is usually a chain of decorators around a [`TextTokenWriter`]:
//!
//! ```text
//! OutputVisitor
//!   └─▶ InsertMissingTokens      (optional: records token nodes and locations)
//!         └─▶ InsertSpecials     (replays comments and directives)
//!               └─▶ InsertRequiredSpaces   (keeps adjacent tokens apart)
//!                     └─▶ TextTokenWriter  (escapes and appends text)
//! ```
//!
//! Every decorator forwards each call to the writer it wraps exactly once.
//!
//! [`TextTokenWriter`]: super::TextTokenWriter

use csout_core::{TextLocation, TextRange};

use crate::ast::{CommentKind, DirectiveKind, NodeId, PrimitiveValue, Role, SyntaxTree};

pub trait TokenWriter {
    /// A node is about to be written.
    fn start_node(&mut self, tree: &SyntaxTree, node: NodeId);

    /// All of a node's tokens have been written.
    fn end_node(&mut self, tree: &SyntaxTree, node: NodeId);

    /// Write an identifier node, escaping it and adding `@` where needed.
    fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId);

    fn write_keyword(&mut self, tree: &SyntaxTree, role: Role, keyword: &str);

    /// Write a punctuation or operator token.
    fn write_token(&mut self, tree: &SyntaxTree, role: Role, token: &str);

    fn write_primitive_value(&mut self, value: &PrimitiveValue);

    /// Write a primitive type keyword (`int`, `string`, ...).
    fn write_primitive_type(&mut self, keyword: &str);

    fn write_comment(&mut self, kind: CommentKind, content: &str);

    fn write_preprocessor_directive(&mut self, kind: DirectiveKind, argument: &str);

    fn space(&mut self);

    fn indent(&mut self);

    fn unindent(&mut self);

    fn new_line(&mut self);

    /// Where the next token would start, if the writer tracks positions.
    fn location(&self) -> Option<TextLocation> {
        None
    }

    /// The range of the most recent keyword, token, identifier, literal or
    /// primitive type, if the writer tracks positions.
    fn last_token_range(&self) -> Option<TextRange> {
        None
    }
}
