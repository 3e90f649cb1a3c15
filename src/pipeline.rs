// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rewrite then render.
//!
//! A tree straight from a decompiler has no parentheses; operator precedence
//! lives in its shape. [`prepare_tree`] adds the parentheses the text needs
//! and then breaks the `<`/`>` chains a reader would take for type arguments.
//! [`render`] and [`render_with_locations`] prepare and render in one call.
//!
//! Both passes only add `ParenthesizedExpression` nodes, so preparing a tree
//! twice inserts nothing the second time.

use csout_core::CancellationToken;
use csout_syntax::rewrite::{insert_parentheses, resolve_ambiguities};
use csout_syntax::{
    render_to_string, render_tracking_locations, FormattingOptions, NodeId, RenderEvents,
    SyntaxTree,
};
use tracing::debug;

use crate::error::Result;

/// What [`prepare_tree`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prepared {
    pub parentheses_inserted: usize,
    pub ambiguities_resolved: usize,
}

impl Prepared {
    pub fn is_unchanged(&self) -> bool {
        self.parentheses_inserted == 0 && self.ambiguities_resolved == 0
    }
}

/// Run both rewrite passes over the subtree at `root`.
///
/// Readability parentheses are added when the options ask for them.
pub fn prepare_tree(tree: &mut SyntaxTree, root: NodeId, options: &FormattingOptions) -> Prepared {
    let parentheses_inserted =
        insert_parentheses(tree, root, options.insert_parentheses_for_readability);
    let ambiguities_resolved = resolve_ambiguities(tree, root);
    debug!(
        root = %root,
        parentheses_inserted,
        ambiguities_resolved,
        "prepared tree for rendering"
    );
    Prepared {
        parentheses_inserted,
        ambiguities_resolved,
    }
}

/// Prepare `root` and render it to text.
pub fn render(tree: &mut SyntaxTree, root: NodeId, options: &FormattingOptions) -> Result<String> {
    prepare_tree(tree, root, options);
    Ok(render_to_string(tree, root, options)?)
}

/// Prepare `root`, render it, and record token nodes and text ranges in the
/// tree.
pub fn render_with_locations(
    tree: &mut SyntaxTree,
    root: NodeId,
    options: &FormattingOptions,
    events: &mut dyn RenderEvents,
    cancel: &CancellationToken,
) -> Result<String> {
    cancel.check()?;
    prepare_tree(tree, root, options);
    let text = render_tracking_locations(tree, root, options, events, cancel)?;
    debug!(located = tree.locations().len(), "recorded node locations");
    Ok(text)
}
