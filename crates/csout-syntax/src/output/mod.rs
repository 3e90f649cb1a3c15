// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rendering a syntax tree to text.
//!
//! The renderer is a visitor ([`OutputVisitor`]) writing into a chain of
//! [`TokenWriter`] decorators around a [`TextTokenWriter`]:
//!
//! ```text
//! OutputVisitor
//!   -> InsertMissingTokens    (optional: token nodes and locations)
//!   -> InsertSpecials         (comments and directives from the tree)
//!   -> InsertRequiredSpaces   (spaces the grammar needs)
//!   -> TextTokenWriter        (text, indentation, positions)
//! ```
//!
//! [`render_to_string`] covers the common case. [`render_tracking_locations`]
//! additionally writes token nodes and text locations back into the tree.

pub mod events;
pub mod literals;
pub mod missing_tokens;
pub mod options;
pub mod spacing;
pub mod specials;
pub mod text_writer;
pub mod token_writer;
mod visitor;

use csout_core::CancellationToken;
use tracing::debug;

pub use events::{BracePairKind, NoEvents, RecordedEvents, RenderEvents};
pub use literals::{
    convert_char, convert_char_literal, convert_string, escape_identifier, format_double,
    format_float, NonFinite, STRING_TOO_LONG_MARKER,
};
pub use missing_tokens::InsertMissingTokens;
pub use options::{BraceStyle, FormattingOptions, NewLinePlacement, PropertyFormatting, Wrapping};
pub use spacing::InsertRequiredSpaces;
pub use specials::InsertSpecials;
pub use text_writer::TextTokenWriter;
pub use token_writer::TokenWriter;
pub use visitor::OutputVisitor;

use crate::ast::{NodeId, NodeKind, SyntaxTree};
use crate::error::RenderError;

/// The decorator chain used when the tree is not updated.
pub type TextPipeline = InsertSpecials<InsertRequiredSpaces<TextTokenWriter>>;

/// Longest text returned by [`debug_string`].
const DEBUG_STRING_LIMIT: usize = 100;

fn text_writer(options: &FormattingOptions) -> TextTokenWriter {
    let mut writer = TextTokenWriter::with_indentation(&options.indentation_string);
    writer.set_max_string_length(options.max_string_length);
    writer
}

/// A fresh writer chain configured from `options`.
pub fn text_pipeline(options: &FormattingOptions) -> TextPipeline {
    InsertSpecials::new(InsertRequiredSpaces::new(text_writer(options)))
}

/// Render `root` with no events and no cancellation.
pub fn render_to_string(
    tree: &SyntaxTree,
    root: NodeId,
    options: &FormattingOptions,
) -> Result<String, RenderError> {
    render_with(tree, root, options, &mut NoEvents, &CancellationToken::none())
}

/// Render `root`, reporting brace pairs, keyword references and the like to
/// `events`. The tree is left unchanged.
pub fn render_with(
    tree: &SyntaxTree,
    root: NodeId,
    options: &FormattingOptions,
    events: &mut dyn RenderEvents,
    cancel: &CancellationToken,
) -> Result<String, RenderError> {
    let mut visitor = OutputVisitor::new(tree, text_pipeline(options), options, events, cancel);
    visitor.visit(root)?;
    let writer = visitor.into_writer();
    debug_assert!(writer.is_balanced(), "specials cursor left open");
    let text = writer.into_inner().into_inner().into_string();
    debug!(%root, bytes = text.len(), "rendered tree");
    Ok(text)
}

/// Render `root` and record where everything landed: every fixed token
/// becomes a `Token` or `ModifierToken` child of the node that wrote it, and
/// rendered nodes, identifiers and tokens get their text range in
/// [`SyntaxTree::locations`].
///
/// Rendering the same tree again replaces the token children from the
/// previous run.
pub fn render_tracking_locations(
    tree: &mut SyntaxTree,
    root: NodeId,
    options: &FormattingOptions,
    events: &mut dyn RenderEvents,
    cancel: &CancellationToken,
) -> Result<String, RenderError> {
    let writer = InsertMissingTokens::new(text_pipeline(options));
    let writer = {
        let mut visitor = OutputVisitor::new(&*tree, writer, options, events, cancel);
        visitor.visit(root)?;
        visitor.into_writer()
    };
    let text = writer.apply(tree).into_inner().into_inner().into_string();
    debug!(%root, bytes = text.len(), "rendered tree with locations");
    Ok(text)
}

/// A one-line rendering of `node` for logs and error messages, cut at 100
/// characters.
pub fn debug_string(tree: &SyntaxTree, node: NodeId) -> String {
    let text = match tree.kind(node) {
        NodeKind::Identifier { name, .. } => name.clone(),
        kind @ (NodeKind::Null
        | NodeKind::Token
        | NodeKind::ModifierToken { .. }
        | NodeKind::Comment { .. }
        | NodeKind::PreProcessorDirective { .. }) => kind.name().to_string(),
        kind => render_to_string(tree, node, &FormattingOptions::compact())
            .unwrap_or_else(|_| kind.name().to_string()),
    };
    let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= DEBUG_STRING_LIMIT {
        return line;
    }
    let mut cut: String = line.chars().take(DEBUG_STRING_LIMIT - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Role, UnaryOperator};

    #[test]
    fn test_render_expression() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let one = tree.primitive(1);
        let sum = tree.binary(BinaryOperator::Add, a, one);
        let text = render_to_string(&tree, sum, &FormattingOptions::default()).unwrap();
        assert_eq!(text, "a + 1");
    }

    #[test]
    fn test_nested_unary_plus_keeps_apart() {
        let mut tree = SyntaxTree::new();
        let x = tree.ident("x");
        let inner = tree.unary(UnaryOperator::Plus, x);
        let outer = tree.unary(UnaryOperator::Plus, inner);
        let text = render_to_string(&tree, outer, &FormattingOptions::default()).unwrap();
        assert_eq!(text, "+ +x");
    }

    #[test]
    fn test_debug_string_is_one_line_and_cut() {
        let mut tree = SyntaxTree::new();
        let statements = (0..40)
            .map(|i| {
                let target = tree.ident(&format!("value{}", i));
                let call = tree.invocation(target, vec![]);
                tree.expr_stmt(call)
            })
            .collect();
        let block = tree.block(statements);
        let text = debug_string(&tree, block);
        assert!(!text.contains('\n'));
        assert_eq!(text.chars().count(), DEBUG_STRING_LIMIT);
        assert!(text.ends_with("..."));
        assert!(text.starts_with("{ value0(); value1();"));
    }

    #[test]
    fn test_cancelled_render() {
        let mut tree = SyntaxTree::new();
        let statements = (0..200).map(|_| tree.empty()).collect();
        let block = tree.block(statements);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = render_with(
            &tree,
            block,
            &FormattingOptions::default(),
            &mut NoEvents,
            &cancel,
        );
        assert_eq!(result, Err(RenderError::Cancelled));
    }

    #[test]
    fn test_tracking_locations_adds_tokens() {
        let mut tree = SyntaxTree::new();
        let value = tree.primitive(42);
        let ret = tree.return_stmt(value);
        let text = render_tracking_locations(
            &mut tree,
            ret,
            &FormattingOptions::default(),
            &mut NoEvents,
            &CancellationToken::none(),
        )
        .unwrap();
        assert_eq!(text, "return 42;\n");
        let keyword = tree.child(ret, Role::Token("return"));
        assert!(!keyword.is_null());
        assert_eq!(tree.locations().start_of(keyword).map(|l| l.column), Some(1));
        let semicolon = tree.child(ret, Role::Token(";"));
        assert_eq!(tree.locations().start_of(semicolon).map(|l| l.column), Some(10));
        let range = tree.locations().range_of(ret).map(|r| (r.start.offset, r.end.offset));
        assert_eq!(range, Some((0, 10)));
    }
}
