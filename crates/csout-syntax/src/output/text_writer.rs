// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The innermost token writer: appends text and tracks the position.

use csout_core::{TextLocation, TextRange};

use super::literals::{escape_identifier, format_primitive};
use super::token_writer::TokenWriter;
use crate::ast::{is_keyword, CommentKind, DirectiveKind, NodeId, NodeKind, PrimitiveValue, Role, SyntaxTree};

/// Writes tokens into a `String`.
///
/// Indentation is written lazily, at the first token of a line, so a line that
/// ends up empty carries no trailing whitespace. [`TokenWriter::location`]
/// accounts for indentation that is pending.
#[derive(Debug, Clone)]
pub struct TextTokenWriter {
    output: String,
    indent_unit: String,
    indentation: usize,
    needs_indent: bool,
    at_line_start: bool,
    line: u32,
    column: u32,
    max_string_length: Option<usize>,
    last_range: Option<TextRange>,
}

impl Default for TextTokenWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextTokenWriter {
    /// A writer indenting with one tab per level.
    pub fn new() -> Self {
        Self::with_indentation("\t")
    }

    pub fn with_indentation(indent_unit: &str) -> Self {
        TextTokenWriter {
            output: String::new(),
            indent_unit: indent_unit.to_string(),
            indentation: 0,
            needs_indent: true,
            at_line_start: true,
            line: 1,
            column: 1,
            max_string_length: None,
            last_range: None,
        }
    }

    /// Cut string literals longer than `max` characters.
    pub fn set_max_string_length(&mut self, max: Option<usize>) {
        self.max_string_length = max;
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn current(&self) -> TextLocation {
        TextLocation::new(self.line, self.column, self.output.len())
    }

    fn write_indentation(&mut self) {
        if self.needs_indent {
            self.needs_indent = false;
            for _ in 0..self.indentation {
                self.output.push_str(&self.indent_unit);
            }
            self.column += (self.indentation * self.indent_unit.chars().count()) as u32;
        }
    }

    /// Append text, advancing line and column over any newlines it contains.
    fn write_raw(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.output.push_str(text);
        if !text.is_empty() {
            self.at_line_start = text.ends_with('\n');
        }
    }

    fn write_token_text(&mut self, text: &str) {
        self.write_indentation();
        let start = self.current();
        self.write_raw(text);
        self.last_range = Some(TextRange::new(start, self.current()));
    }
}

impl TokenWriter for TextTokenWriter {
    fn start_node(&mut self, _tree: &SyntaxTree, _node: NodeId) {}

    fn end_node(&mut self, _tree: &SyntaxTree, _node: NodeId) {}

    fn write_identifier(&mut self, tree: &SyntaxTree, identifier: NodeId) {
        let NodeKind::Identifier { name, verbatim } = tree.kind(identifier) else {
            return;
        };
        let mut text = String::with_capacity(name.len() + 1);
        if *verbatim || is_keyword(tree, name, identifier) {
            text.push('@');
        }
        text.push_str(&escape_identifier(name));
        self.write_token_text(&text);
    }

    fn write_keyword(&mut self, _tree: &SyntaxTree, _role: Role, keyword: &str) {
        self.write_token_text(keyword);
    }

    fn write_token(&mut self, _tree: &SyntaxTree, _role: Role, token: &str) {
        self.write_token_text(token);
    }

    fn write_primitive_value(&mut self, value: &PrimitiveValue) {
        match format_primitive(value, self.max_string_length) {
            Ok(text) => self.write_token_text(&text),
            Err((type_keyword, non_finite)) => {
                // no literal exists: write `double.NaN` and friends
                self.write_indentation();
                let start = self.current();
                self.write_raw(type_keyword);
                self.write_raw(".");
                self.write_raw(non_finite.member_name());
                self.last_range = Some(TextRange::new(start, self.current()));
            }
        }
    }

    fn write_primitive_type(&mut self, keyword: &str) {
        self.write_token_text(keyword);
    }

    fn write_comment(&mut self, kind: CommentKind, content: &str) {
        self.write_indentation();
        match kind {
            CommentKind::SingleLine => {
                self.write_raw("//");
                self.write_raw(content);
                self.new_line();
            }
            CommentKind::Documentation => {
                self.write_raw("///");
                self.write_raw(content);
                self.new_line();
            }
            CommentKind::MultiLine => {
                self.write_raw("/*");
                self.write_raw(content);
                self.write_raw("*/");
            }
            CommentKind::InactiveCode => {
                self.write_raw(content);
            }
        }
    }

    fn write_preprocessor_directive(&mut self, kind: DirectiveKind, argument: &str) {
        // a directive must start on its own line
        if !self.at_line_start {
            self.new_line();
        }
        self.write_indentation();
        self.write_raw("#");
        self.write_raw(kind.keyword());
        if !argument.is_empty() {
            self.write_raw(" ");
            self.write_raw(argument);
        }
        self.new_line();
    }

    fn space(&mut self) {
        self.write_indentation();
        self.write_raw(" ");
    }

    fn indent(&mut self) {
        self.indentation += 1;
    }

    fn unindent(&mut self) {
        self.indentation = self.indentation.saturating_sub(1);
    }

    fn new_line(&mut self) {
        self.output.push('\n');
        self.line += 1;
        self.column = 1;
        self.needs_indent = true;
        self.at_line_start = true;
    }

    fn location(&self) -> Option<TextLocation> {
        let mut loc = self.current();
        if self.needs_indent {
            loc.column += (self.indentation * self.indent_unit.chars().count()) as u32;
            loc.offset += self.indentation * self.indent_unit.len();
        }
        Some(loc)
    }

    fn last_token_range(&self) -> Option<TextRange> {
        self.last_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_indentation() {
        let tree = SyntaxTree::new();
        let mut w = TextTokenWriter::with_indentation("    ");
        w.write_keyword(&tree, Role::Token("{"), "{");
        w.indent();
        w.new_line();
        w.new_line();
        assert_eq!(w.location().unwrap().column, 5);
        w.write_token(&tree, Role::Token(";"), ";");
        w.unindent();
        w.new_line();
        assert_eq!(w.as_str(), "{\n\n    ;\n");
    }

    #[test]
    fn test_identifier_escaping_and_verbatim() {
        let mut tree = SyntaxTree::new();
        let kw = tree.identifier("class");
        let plain = tree.identifier("value");
        let verbatim = tree.verbatim_identifier("value");
        let mut w = TextTokenWriter::new();
        w.write_identifier(&tree, kw);
        w.space();
        w.write_identifier(&tree, plain);
        w.space();
        w.write_identifier(&tree, verbatim);
        assert_eq!(w.as_str(), "@class value @value");
    }

    #[test]
    fn test_non_finite_values() {
        let mut w = TextTokenWriter::new();
        w.write_primitive_value(&PrimitiveValue::Double(f64::INFINITY));
        w.space();
        w.write_primitive_value(&PrimitiveValue::Float(f32::NAN));
        assert_eq!(w.as_str(), "double.PositiveInfinity float.NaN");
        let range = w.last_token_range().unwrap();
        assert_eq!(range.span().len(), "float.NaN".len());
    }

    #[test]
    fn test_multiline_comment_advances_lines() {
        let mut w = TextTokenWriter::new();
        w.write_comment(CommentKind::MultiLine, " a\nb ");
        let loc = w.location().unwrap();
        assert_eq!((loc.line, loc.column), (2, 5));
    }

    #[test]
    fn test_directive_forces_own_line() {
        let tree = SyntaxTree::new();
        let mut w = TextTokenWriter::new();
        w.write_token(&tree, Role::Token(";"), ";");
        w.write_preprocessor_directive(DirectiveKind::Region, "Fields");
        w.write_token(&tree, Role::Token(";"), ";");
        assert_eq!(w.as_str(), ";\n#region Fields\n;");
    }

    #[test]
    fn test_single_line_comment_ends_line() {
        let mut w = TextTokenWriter::new();
        w.indent();
        w.write_comment(CommentKind::SingleLine, " note");
        assert_eq!(w.as_str(), "\t// note\n");
        assert_eq!(w.location().unwrap().line, 2);
    }
}
