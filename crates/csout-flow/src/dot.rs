// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Graphviz export for debugging graphs.
//!
//! Edge colours follow the edge kind: green for `ConditionTrue`, red for
//! `ConditionFalse`, blue for `Jump`. Edges leaving a `try` with a `finally`
//! block are dashed.

use csout_syntax::{NodeId, SyntaxTree};

use crate::graph::{CfgEdgeId, CfgNodeId, ControlFlowEdgeKind, ControlFlowGraph};

/// Render `graph` as a `dot` digraph.
pub fn export_graph(tree: &SyntaxTree, graph: &ControlFlowGraph) -> String {
    render_dot(tree, graph, graph.order(), |_| None, |_| None)
}

/// Render the listed nodes of `graph` and their outgoing edges, appending the
/// optional notes to node and edge labels.
pub(crate) fn render_dot(
    tree: &SyntaxTree,
    graph: &ControlFlowGraph,
    order: &[CfgNodeId],
    node_note: impl Fn(CfgNodeId) -> Option<String>,
    edge_note: impl Fn(CfgEdgeId) -> Option<String>,
) -> String {
    let mut lines = Vec::new();
    lines.push("digraph G {".to_string());
    lines.push("    node [shape=box, fontname=\"Helvetica\"];".to_string());

    for (index, &id) in order.iter().enumerate() {
        let node = graph.node(id);
        let mut label = format!("#{} = {:?}", index, node.kind);
        for (caption, statement) in [("prev", node.previous_statement), ("next", node.next_statement)] {
            if !statement.is_null() {
                label.push_str(&format!("\n{}: {}", caption, describe(tree, statement)));
            }
        }
        if let Some(note) = node_note(id) {
            label.push('\n');
            label.push_str(&note);
        }
        lines.push(format!("    {} [label=\"{}\"];", id, escape_label(&label)));
    }

    for &id in order {
        for &edge_id in &graph.node(id).outgoing {
            let edge = graph.edge(edge_id);
            let mut attributes = Vec::new();
            if let Some(color) = edge_color(edge.kind) {
                attributes.push(format!("color={}", color));
            }
            if edge.is_leaving_try_finally() {
                attributes.push("style=dashed".to_string());
            }
            if let Some(note) = edge_note(edge_id) {
                attributes.push(format!("label=\"{}\"", escape_label(&note)));
            }
            let attributes = if attributes.is_empty() {
                String::new()
            } else {
                format!(" [{}]", attributes.join(", "))
            };
            lines.push(format!("    {} -> {}{};", edge.from, edge.to, attributes));
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn describe(tree: &SyntaxTree, statement: NodeId) -> String {
    format!("{} {}", tree.kind(statement).name(), statement.as_u32())
}

fn edge_color(kind: ControlFlowEdgeKind) -> Option<&'static str> {
    match kind {
        ControlFlowEdgeKind::Normal => None,
        ControlFlowEdgeKind::ConditionTrue => Some("green"),
        ControlFlowEdgeKind::ConditionFalse => Some("red"),
        ControlFlowEdgeKind::Jump => Some("blue"),
    }
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
