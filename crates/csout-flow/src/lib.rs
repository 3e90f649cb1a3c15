// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Control-flow analysis for csout syntax trees.
//!
//! - [`ControlFlowGraphBuilder`] turns a statement into a graph of control
//!   points, pruning branches whose condition a [`ConstantResolver`] can decide
//! - [`ReachabilityAnalysis`] finds the statements that can execute
//! - [`DefiniteAssignmentAnalysis`] tracks whether a local is assigned on every
//!   path
//! - [`export_graph`] renders a graph as Graphviz `dot` for debugging
//!
//! The analyses only read the tree. They are independent of rendering: folding
//! a constant condition here never changes the rendered text.

pub mod builder;
pub mod constant;
pub mod definite_assignment;
pub mod dot;
pub mod error;
pub mod graph;
pub mod reachability;

pub use builder::ControlFlowGraphBuilder;
pub use constant::{ConstantResolver, ConstantValue, NoConstants, PrimitiveConstants};
pub use definite_assignment::{DefiniteAssignmentAnalysis, DefiniteAssignmentStatus};
pub use dot::export_graph;
pub use error::{FlowError, FlowResult};
pub use graph::{
    CfgEdgeId, CfgNodeId, ControlFlowEdge, ControlFlowEdgeKind, ControlFlowGraph, ControlFlowNode,
    ControlFlowNodeKind,
};
pub use reachability::{NoRecursion, ReachabilityAnalysis, RecursiveDetector};
