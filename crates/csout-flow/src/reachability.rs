// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Which statements can execute.
//!
//! [`ReachabilityAnalysis`] walks a graph from its entry node. A statement is
//! reachable when some reached node leads into it; its end point is reachable
//! when some reached node follows it.
//!
//! An optional [`RecursiveDetector`] marks statements that never return
//! because they unconditionally call the enclosing function again. The walk
//! reaches such a statement but does not continue past it.

use std::collections::HashSet;

use csout_core::{CancellationPoll, CancellationToken};
use csout_syntax::{BinaryOperator, NodeId, NodeKind, Role, SyntaxTree};
use tracing::debug;

use crate::error::FlowResult;
use crate::graph::{CfgNodeId, ControlFlowGraph};

const CANCELLATION_INTERVAL: u32 = 256;

/// Decides whether a statement unconditionally recurses.
///
/// The default [`is_recursive`](RecursiveDetector::is_recursive) looks at the
/// expressions a statement always evaluates: it skips nested statements,
/// lambda bodies, the right operand of `&&`, `||` and `??`, and both branches
/// of `?:`. Each invocation found is passed to
/// [`is_recursive_invocation`](RecursiveDetector::is_recursive_invocation),
/// which implementors override with their symbol knowledge.
pub trait RecursiveDetector {
    fn is_recursive(&self, tree: &SyntaxTree, statement: NodeId) -> bool {
        tree.children(statement)
            .filter(|&child| !tree.kind(child).is_statement())
            .any(|child| self.evaluates_recursive_call(tree, child))
    }

    /// Whether `invocation` calls the function being analyzed.
    fn is_recursive_invocation(&self, _tree: &SyntaxTree, _invocation: NodeId) -> bool {
        false
    }

    /// Whether evaluating `node` always reaches a recursive invocation.
    fn evaluates_recursive_call(&self, tree: &SyntaxTree, node: NodeId) -> bool {
        let kind = tree.kind(node);
        if kind.is_statement() {
            return false;
        }
        match kind {
            NodeKind::LambdaExpression { .. } | NodeKind::AnonymousMethodExpression { .. } => false,
            NodeKind::InvocationExpression if self.is_recursive_invocation(tree, node) => true,
            NodeKind::ConditionalExpression => {
                self.evaluates_recursive_call(tree, tree.child(node, Role::Condition))
            }
            NodeKind::BinaryOperatorExpression {
                operator:
                    BinaryOperator::ConditionalAnd
                    | BinaryOperator::ConditionalOr
                    | BinaryOperator::NullCoalescing,
            } => self.evaluates_recursive_call(tree, tree.child(node, Role::Left)),
            _ => tree
                .children(node)
                .any(|child| self.evaluates_recursive_call(tree, child)),
        }
    }
}

/// A detector that never reports recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecursion;

impl RecursiveDetector for NoRecursion {}

/// The reachable statements and end points of a graph.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityAnalysis {
    reachable_statements: HashSet<NodeId>,
    reachable_end_points: HashSet<NodeId>,
}

impl ReachabilityAnalysis {
    pub fn create(
        tree: &SyntaxTree,
        graph: &ControlFlowGraph,
        detector: Option<&dyn RecursiveDetector>,
        cancel: &CancellationToken,
    ) -> FlowResult<Self> {
        let mut analysis = ReachabilityAnalysis::default();
        let Some(entry) = graph.entry() else {
            return Ok(analysis);
        };

        let mut poll = CancellationPoll::new(cancel, CANCELLATION_INTERVAL);
        let mut visited: HashSet<CfgNodeId> = HashSet::from([entry]);
        let mut stack = vec![entry];
        while let Some(id) = stack.pop() {
            poll.tick()?;
            let node = graph.node(id);
            if !node.previous_statement.is_null() {
                if matches!(tree.kind(node.previous_statement), NodeKind::LabelStatement) {
                    analysis.reachable_statements.insert(node.previous_statement);
                }
                analysis.reachable_end_points.insert(node.previous_statement);
            }
            if !node.next_statement.is_null() {
                analysis.reachable_statements.insert(node.next_statement);
                if detector.is_some_and(|d| d.is_recursive(tree, node.next_statement)) {
                    continue;
                }
            }
            for &edge in &node.outgoing {
                let to = graph.edge(edge).to;
                if visited.insert(to) {
                    stack.push(to);
                }
            }
        }

        debug!(
            visited = visited.len(),
            statements = analysis.reachable_statements.len(),
            "reachability analysis finished"
        );
        Ok(analysis)
    }

    pub fn is_reachable(&self, statement: NodeId) -> bool {
        self.reachable_statements.contains(&statement)
    }

    pub fn is_endpoint_reachable(&self, statement: NodeId) -> bool {
        self.reachable_end_points.contains(&statement)
    }

    pub fn reachable_statements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.reachable_statements.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ControlFlowGraphBuilder;
    use crate::constant::{NoConstants, PrimitiveConstants};

    fn call(tree: &mut SyntaxTree, name: &str) -> NodeId {
        let target = tree.ident(name);
        let call = tree.invocation(target, vec![]);
        tree.expr_stmt(call)
    }

    struct CallsNamed(&'static str);

    impl RecursiveDetector for CallsNamed {
        fn is_recursive_invocation(&self, tree: &SyntaxTree, invocation: NodeId) -> bool {
            tree.name(tree.child(invocation, Role::Target)) == self.0
        }
    }

    #[test]
    fn test_statement_after_return_is_unreachable() {
        let mut tree = SyntaxTree::new();
        let a = call(&mut tree, "A");
        let ret = tree.return_stmt(NodeId::NULL);
        let b = call(&mut tree, "B");
        let block = tree.block(vec![a, ret, b]);
        let graph = ControlFlowGraphBuilder::new()
            .build(&tree, block, &NoConstants, &CancellationToken::none())
            .unwrap();
        let analysis =
            ReachabilityAnalysis::create(&tree, &graph, None, &CancellationToken::none()).unwrap();
        assert!(analysis.is_reachable(a));
        assert!(analysis.is_reachable(ret));
        assert!(!analysis.is_endpoint_reachable(ret));
        assert!(!analysis.is_reachable(b));
        assert!(!analysis.is_endpoint_reachable(block));
    }

    #[test]
    fn test_dead_branch_of_constant_condition() {
        let mut tree = SyntaxTree::new();
        let f = tree.primitive(false);
        let a = call(&mut tree, "A");
        let b = call(&mut tree, "B");
        let stmt = tree.if_else(f, a, b);
        let graph = ControlFlowGraphBuilder::new()
            .build(&tree, stmt, &PrimitiveConstants, &CancellationToken::none())
            .unwrap();
        let analysis =
            ReachabilityAnalysis::create(&tree, &graph, None, &CancellationToken::none()).unwrap();
        assert!(!analysis.is_reachable(a));
        assert!(analysis.is_reachable(b));
        assert!(analysis.is_endpoint_reachable(stmt));
    }

    #[test]
    fn test_recursive_call_stops_propagation() {
        let mut tree = SyntaxTree::new();
        let again = call(&mut tree, "Again");
        let after = call(&mut tree, "After");
        let block = tree.block(vec![again, after]);
        let graph = ControlFlowGraphBuilder::new()
            .build(&tree, block, &NoConstants, &CancellationToken::none())
            .unwrap();
        let detector = CallsNamed("Again");
        let analysis = ReachabilityAnalysis::create(
            &tree,
            &graph,
            Some(&detector),
            &CancellationToken::none(),
        )
        .unwrap();
        assert!(analysis.is_reachable(again));
        assert!(!analysis.is_endpoint_reachable(again));
        assert!(!analysis.is_reachable(after));
    }

    #[test]
    fn test_recursion_behind_short_circuit_is_ignored() {
        let mut tree = SyntaxTree::new();
        let flag = tree.ident("flag");
        let target = tree.ident("Again");
        let again = tree.invocation(target, vec![]);
        let and = tree.binary(BinaryOperator::ConditionalAnd, flag, again);
        let stmt = tree.expr_stmt(and);
        assert!(!CallsNamed("Again").is_recursive(&tree, stmt));
        assert!(!NoRecursion.is_recursive(&tree, stmt));
    }
}
