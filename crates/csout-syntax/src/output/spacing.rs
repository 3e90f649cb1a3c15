// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Keeps adjacent tokens from merging when the output is read back.
//!
//! Only the class of the previously written token is remembered, so each
//! decision is O(1):
//!
//! | last written        | next                                  | result      |
//! |---------------------|---------------------------------------|-------------|
//! | `+` / `-` / `&` / `?` | token starting with the same char   | space       |
//! | `/`                 | token starting with `*`, or a comment | space       |
//! | keyword/identifier  | keyword, identifier, literal, type    | space       |
//!
//! Numeric literals count as keyword/identifier, so `1 L` can never be read
//! back as `1L`. A negative literal after `-` gets a space like any other
//! token starting with `-`.

use csout_core::{TextLocation, TextRange};

use super::token_writer::TokenWriter;
use crate::ast::{is_keyword, CommentKind, DirectiveKind, NodeId, NodeKind, PrimitiveValue, Role, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastWritten {
    Whitespace,
    Other,
    KeywordOrIdentifier,
    Plus,
    Minus,
    Ampersand,
    QuestionMark,
    Division,
}

/// Inserts the spaces the token stream needs to re-lex identically.
#[derive(Debug)]
pub struct InsertRequiredSpaces<W> {
    inner: W,
    last_written: LastWritten,
}

impl<W: TokenWriter> InsertRequiredSpaces<W> {
    pub fn new(inner: W) -> Self {
        InsertRequiredSpaces {
            inner,
            last_written: LastWritten::Whitespace,
        }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn space_if_after_word(&mut self) {
        if self.last_written == LastWritten::KeywordOrIdentifier {
            self.space();
        }
    }
}

impl<W: TokenWriter> TokenWriter for InsertRequiredSpaces<W> {
    fn start_node(&mut self, tree: &SyntaxTree, node: NodeId) {
        self.inner.start_node(tree, node);
    }

    fn end_node(&mut self, tree: &SyntaxTree, node: NodeId) {
        self.inner.end_node(tree, node);
    }

    fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId) {
        let escaped = match tree.kind(identifier) {
            NodeKind::Identifier { name, verbatim } => *verbatim || is_keyword(tree, name, identifier),
            _ => false,
        };
        if self.last_written == LastWritten::KeywordOrIdentifier {
            if escaped {
                // `@name` would not merge, but keep words apart anyway
                self.space();
            } else {
                self.inner.space();
            }
        }
        self.inner.write_identifier(tree, identifier);
        self.last_written = LastWritten::KeywordOrIdentifier;
    }

    fn write_keyword(&mut self, tree: &SyntaxTree, role: Role, keyword: &str) {
        self.space_if_after_word();
        self.inner.write_keyword(tree, role, keyword);
        self.last_written = LastWritten::KeywordOrIdentifier;
    }

    fn write_token(&mut self, tree: &SyntaxTree, role: Role, token: &str) {
        let first = token.chars().next();
        let merges = matches!(
            (self.last_written, first),
            (LastWritten::Plus, Some('+'))
                | (LastWritten::Minus, Some('-'))
                | (LastWritten::Ampersand, Some('&'))
                | (LastWritten::QuestionMark, Some('?'))
                | (LastWritten::Division, Some('*'))
                | (LastWritten::Division, Some('/'))
        );
        if merges {
            self.inner.space();
        }
        self.inner.write_token(tree, role, token);
        self.last_written = match token {
            "+" => LastWritten::Plus,
            "-" => LastWritten::Minus,
            "&" => LastWritten::Ampersand,
            "?" => LastWritten::QuestionMark,
            "/" => LastWritten::Division,
            _ => LastWritten::Other,
        };
    }

    fn write_primitive_value(&mut self, value: &PrimitiveValue) {
        if self.last_written == LastWritten::Minus && starts_with_minus(value) {
            self.inner.space();
        } else {
            self.space_if_after_word();
        }
        self.inner.write_primitive_value(value);
        self.last_written = match value {
            PrimitiveValue::String(_) | PrimitiveValue::Char(_) => LastWritten::Other,
            _ => LastWritten::KeywordOrIdentifier,
        };
    }

    fn write_primitive_type(&mut self, keyword: &str) {
        self.space_if_after_word();
        self.inner.write_primitive_type(keyword);
        self.last_written = if keyword == "new" {
            LastWritten::Other
        } else {
            LastWritten::KeywordOrIdentifier
        };
    }

    fn write_comment(&mut self, kind: CommentKind, content: &str) {
        if self.last_written == LastWritten::Division {
            self.inner.space();
        }
        self.inner.write_comment(kind, content);
        self.last_written = LastWritten::Whitespace;
    }

    fn write_preprocessor_directive(&mut self, kind: DirectiveKind, argument: &str) {
        self.inner.write_preprocessor_directive(kind, argument);
        self.last_written = LastWritten::Whitespace;
    }

    fn space(&mut self) {
        self.inner.space();
        self.last_written = LastWritten::Whitespace;
    }

    fn indent(&mut self) {
        self.inner.indent();
    }

    fn unindent(&mut self) {
        self.inner.unindent();
    }

    fn new_line(&mut self) {
        self.inner.new_line();
        self.last_written = LastWritten::Whitespace;
    }

    fn location(&self) -> Option<TextLocation> {
        self.inner.location()
    }

    fn last_token_range(&self) -> Option<TextRange> {
        self.inner.last_token_range()
    }
}

/// Whether the literal text of `value` begins with `-`. Negative infinities
/// are written as member references and do not.
fn starts_with_minus(value: &PrimitiveValue) -> bool {
    match value {
        PrimitiveValue::Float(v) if v.is_infinite() => false,
        PrimitiveValue::Double(v) if v.is_infinite() => false,
        _ => value.is_negative(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TextTokenWriter;

    fn writer() -> InsertRequiredSpaces<TextTokenWriter> {
        InsertRequiredSpaces::new(TextTokenWriter::new())
    }

    #[test]
    fn test_repeated_operators_are_separated() {
        let tree = SyntaxTree::new();
        let mut w = writer();
        for tok in ["+", "+", "-", "-", "&", "&", "?", "?"] {
            w.write_token(&tree, Role::Token(tok), tok);
        }
        assert_eq!(w.inner().as_str(), "+ +- -& &? ?");
    }

    #[test]
    fn test_division_then_star_or_comment() {
        let tree = SyntaxTree::new();
        let mut w = writer();
        w.write_token(&tree, Role::Token("/"), "/");
        w.write_token(&tree, Role::Token("*"), "*");
        w.write_token(&tree, Role::Token("/"), "/");
        w.write_comment(CommentKind::MultiLine, "c");
        assert_eq!(w.inner().as_str(), "/ */ /*c*/");
    }

    #[test]
    fn test_words_are_separated() {
        let mut tree = SyntaxTree::new();
        let x = tree.identifier("x");
        let mut w = writer();
        w.write_keyword(&tree, Role::Token("return"), "return");
        w.write_identifier(&tree, x);
        w.write_token(&tree, Role::Token(";"), ";");
        w.write_primitive_type("int");
        w.write_identifier(&tree, x);
        assert_eq!(w.inner().as_str(), "return x;int x");
    }

    #[test]
    fn test_number_then_identifier() {
        let mut tree = SyntaxTree::new();
        let l = tree.identifier("L");
        let mut w = writer();
        w.write_primitive_value(&PrimitiveValue::Int(1));
        w.write_identifier(&tree, l);
        w.write_token(&tree, Role::Token(","), ",");
        w.write_primitive_value(&PrimitiveValue::Float(1.5));
        w.write_identifier(&tree, l);
        assert_eq!(w.inner().as_str(), "1 L,1.5f L");
    }

    #[test]
    fn test_minus_then_negative_literal() {
        let tree = SyntaxTree::new();
        let mut w = writer();
        for value in [
            PrimitiveValue::Int(-1),
            PrimitiveValue::Double(-0.0),
            PrimitiveValue::Float(-1.5),
            PrimitiveValue::Decimal("-1".to_string()),
            PrimitiveValue::Int(2),
        ] {
            w.write_token(&tree, Role::Token("-"), "-");
            w.write_primitive_value(&value);
            w.write_token(&tree, Role::Token(","), ",");
        }
        assert_eq!(w.inner().as_str(), "- -1,- -0.0,- -1.5f,- -1m,-2,");
    }
}
