// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! csout: render C#-shaped syntax trees and analyze their control flow.
//!
//! This crate ties the workspace together. It re-exports the tree, renderer
//! and analysis types, and adds the pipeline a caller normally wants: run the
//! rewrite passes over a tree, then render it.
//!
//! ```
//! use csout::{render, BinaryOperator, FormattingOptions, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let one = tree.primitive(1);
//! let other = tree.primitive(1);
//! let sum = tree.binary(BinaryOperator::Add, one, other);
//! let two = tree.primitive(2);
//! let product = tree.binary(BinaryOperator::Multiply, two, sum);
//! let text = render(&mut tree, product, &FormattingOptions::default()).unwrap();
//! assert_eq!(text, "2 * (1 + 1)");
//! ```

pub mod error;
mod error_bridges;
pub mod pipeline;

// Re-export the workspace crates' modules
pub use csout_flow as flow;
pub use csout_syntax::{ast, output, rewrite};

pub use csout_core::{CancellationPoll, CancellationToken, Cancelled, Span, TextLocation, TextRange};
pub use csout_flow::{
    export_graph, ConstantResolver, ConstantValue, ControlFlowGraph, ControlFlowGraphBuilder,
    DefiniteAssignmentAnalysis, DefiniteAssignmentStatus, FlowError, NoConstants, NoRecursion,
    PrimitiveConstants, ReachabilityAnalysis, RecursiveDetector,
};
pub use csout_syntax::{
    render_to_string, render_tracking_locations, render_with, BinaryOperator, BraceStyle,
    FormattingOptions, NodeId, NodeKind, NoEvents, OptionsError, RecordedEvents, RenderError,
    RenderEvents, Role, SyntaxTree, UnaryOperator,
};

pub use error::{Error, Result};
pub use pipeline::{prepare_tree, render, render_with_locations, Prepared};
