// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compile-only test to verify the public API surface.
//!
//! If this file fails to compile, the public API has regressed.

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Text positions and cancellation
// ============================================================================

use csout::{CancellationPoll, CancellationToken, Cancelled, Span, TextLocation, TextRange};

// ============================================================================
// Syntax tree
// ============================================================================

use csout::ast::{
    AccessorKind, ClassType, FieldDirection, LocationTable, Modifiers, PrimitiveValue, Role,
};
use csout::{BinaryOperator, NodeId, NodeKind, SyntaxTree, UnaryOperator};

// ============================================================================
// Rendering and policy
// ============================================================================

use csout::output::BracePairKind;
use csout::{
    render_to_string, render_tracking_locations, render_with, BraceStyle, FormattingOptions,
    NoEvents, OptionsError, RecordedEvents, RenderError, RenderEvents,
};

// ============================================================================
// Rewrite passes and pipeline
// ============================================================================

use csout::rewrite::{insert_parentheses, resolve_ambiguities};
use csout::{prepare_tree, render, render_with_locations, Error, Prepared, Result};

// ============================================================================
// Control flow
// ============================================================================

use csout::flow::{
    CfgEdgeId, CfgNodeId, ControlFlowEdge, ControlFlowEdgeKind, ControlFlowNode,
    ControlFlowNodeKind, FlowResult,
};
use csout::{
    export_graph, ConstantResolver, ConstantValue, ControlFlowGraph, ControlFlowGraphBuilder,
    DefiniteAssignmentAnalysis, DefiniteAssignmentStatus, FlowError, NoConstants, NoRecursion,
    PrimitiveConstants, ReachabilityAnalysis, RecursiveDetector,
};

#[test]
fn api_surface_compiles() {
    // This test exists solely to verify the imports above compile.
}
