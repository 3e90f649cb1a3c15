// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A C#-shaped syntax tree and its renderer.
//!
//! Trees are built programmatically (usually by a decompiler) and rendered to
//! source text. The renderer keeps track of where each node ended up, so the
//! text can be linked back to the tree.
//!
//! # Overview
//!
//! - **Trees**: [`SyntaxTree`] is an arena of nodes; builder helpers create
//!   expressions, statements and declarations with their children in the
//!   right roles.
//! - **Rewrites**: [`rewrite::insert_parentheses`] and
//!   [`rewrite::resolve_ambiguities`] add the parentheses a tree needs before
//!   it is rendered.
//! - **Rendering**: [`render_to_string`] produces text, [`render_with`]
//!   additionally reports brace pairs, keyword references and other events,
//!   and [`render_tracking_locations`] writes token nodes and text ranges back
//!   into the tree.
//!
//! # Quick Start
//!
//! ```
//! use csout_syntax::{render_to_string, BinaryOperator, FormattingOptions, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let a = tree.ident("a");
//! let one = tree.primitive(1);
//! let sum = tree.binary(BinaryOperator::Add, a, one);
//! let text = render_to_string(&tree, sum, &FormattingOptions::default()).unwrap();
//! assert_eq!(text, "a + 1");
//! ```

pub mod ast;
pub mod error;
pub mod output;
pub mod rewrite;

pub use ast::{
    is_keyword, AssignmentOperator, BinaryOperator, Modifiers, NodeId, NodeKind, PrimitiveValue,
    Role, SyntaxTree, UnaryOperator,
};
pub use error::{OptionsError, RenderError};
pub use output::{
    debug_string, render_to_string, render_tracking_locations, render_with, BraceStyle,
    FormattingOptions, NoEvents, RecordedEvents, RenderEvents,
};
