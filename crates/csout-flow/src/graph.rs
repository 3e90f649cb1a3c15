// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Control-flow graph storage.
//!
//! Nodes and edges live in arenas addressed by [`CfgNodeId`] and
//! [`CfgEdgeId`]. A node is a control point between statements; an edge is a
//! possible transition. [`ControlFlowGraph::connect`] is the only way to add
//! an edge and records it on both endpoints.
//!
//! Besides the arena the graph keeps a node *order*: the sequence in which the
//! builder listed its nodes. The order differs from allocation order for end
//! nodes of loops and switches, which are created before their bodies but
//! listed after them. The definite-assignment analysis depends on it.

use std::fmt;

use csout_syntax::NodeId;

/// Identifies a node in a [`ControlFlowGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CfgNodeId(pub u32);

impl CfgNodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CfgNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identifies an edge in a [`ControlFlowGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CfgEdgeId(pub u32);

impl CfgEdgeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CfgEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlFlowNodeKind {
    /// Before the first statement of the analyzed root.
    StartNode,
    /// Between two statements of the same statement list.
    BetweenStatements,
    /// After the last statement of a list or embedded statement.
    EndNode,
    /// Where a loop evaluates its condition.
    LoopCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlFlowEdgeKind {
    Normal,
    /// Taken when the condition of the source statement is true.
    ConditionTrue,
    /// Taken when the condition of the source statement is false.
    ConditionFalse,
    /// A `goto`, `break` or `continue`.
    Jump,
}

/// A control point.
///
/// At least one of `previous_statement` and `next_statement` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlFlowNode {
    pub previous_statement: NodeId,
    pub next_statement: NodeId,
    pub kind: ControlFlowNodeKind,
    pub outgoing: Vec<CfgEdgeId>,
    pub incoming: Vec<CfgEdgeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlFlowEdge {
    pub from: CfgNodeId,
    pub to: CfgNodeId,
    pub kind: ControlFlowEdgeKind,
    /// The `try` statements with a `finally` block this edge jumps out of,
    /// innermost first.
    pub try_finally_statements: Vec<NodeId>,
}

impl ControlFlowEdge {
    pub fn is_leaving_try_finally(&self) -> bool {
        !self.try_finally_statements.is_empty()
    }
}

/// Nodes and edges of one or more built statement trees.
#[derive(Debug, Clone, Default)]
pub struct ControlFlowGraph {
    nodes: Vec<ControlFlowNode>,
    edges: Vec<ControlFlowEdge>,
    order: Vec<CfgNodeId>,
}

impl ControlFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node. It is not part of the order until listed.
    pub(crate) fn add_node(
        &mut self,
        previous_statement: NodeId,
        next_statement: NodeId,
        kind: ControlFlowNodeKind,
    ) -> CfgNodeId {
        debug_assert!(!previous_statement.is_null() || !next_statement.is_null());
        let id = CfgNodeId(self.nodes.len() as u32);
        self.nodes.push(ControlFlowNode {
            previous_statement,
            next_statement,
            kind,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        id
    }

    pub(crate) fn set_order(&mut self, order: Vec<CfgNodeId>) {
        self.order = order;
    }

    /// Add an edge from `from` to `to`.
    pub fn connect(&mut self, from: CfgNodeId, to: CfgNodeId, kind: ControlFlowEdgeKind) -> CfgEdgeId {
        let id = CfgEdgeId(self.edges.len() as u32);
        self.edges.push(ControlFlowEdge {
            from,
            to,
            kind,
            try_finally_statements: Vec::new(),
        });
        self.nodes[from.index()].outgoing.push(id);
        self.nodes[to.index()].incoming.push(id);
        id
    }

    pub(crate) fn edge_mut(&mut self, id: CfgEdgeId) -> &mut ControlFlowEdge {
        &mut self.edges[id.index()]
    }

    pub fn node(&self, id: CfgNodeId) -> &ControlFlowNode {
        &self.nodes[id.index()]
    }

    pub fn edge(&self, id: CfgEdgeId) -> &ControlFlowEdge {
        &self.edges[id.index()]
    }

    /// The first listed node; the entry of the graph.
    pub fn entry(&self) -> Option<CfgNodeId> {
        self.order.first().copied()
    }

    /// Node ids in listing order.
    pub fn order(&self) -> &[CfgNodeId] {
        &self.order
    }

    /// Nodes in listing order.
    pub fn nodes(&self) -> impl Iterator<Item = (CfgNodeId, &ControlFlowNode)> + '_ {
        self.order.iter().map(move |&id| (id, self.node(id)))
    }

    /// Every allocated node, listed or not, in allocation order.
    pub fn all_nodes(&self) -> impl Iterator<Item = (CfgNodeId, &ControlFlowNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (CfgNodeId(i as u32), node))
    }

    pub fn edges(&self) -> impl Iterator<Item = (CfgEdgeId, &ControlFlowEdge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (CfgEdgeId(i as u32), edge))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_updates_both_endpoints() {
        let mut graph = ControlFlowGraph::new();
        let a = graph.add_node(NodeId::NULL, NodeId(1), ControlFlowNodeKind::StartNode);
        let b = graph.add_node(NodeId(1), NodeId::NULL, ControlFlowNodeKind::EndNode);
        let edge = graph.connect(a, b, ControlFlowEdgeKind::Normal);
        assert_eq!(graph.node(a).outgoing, vec![edge]);
        assert_eq!(graph.node(b).incoming, vec![edge]);
        assert_eq!(graph.edge(edge).from, a);
        assert!(!graph.edge(edge).is_leaving_try_finally());
        assert_eq!(format!("{} {}", a, edge), "n0 e0");
    }
}
