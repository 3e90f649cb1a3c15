// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Definite assignment of local variables.
//!
//! [`DefiniteAssignmentAnalysis`] builds the graph of a statement once and then
//! answers, per variable, whether the variable is assigned on every path
//! reaching each control point.
//!
//! # The Status Lattice
//!
//! Each node and edge carries a [`DefiniteAssignmentStatus`]. Statuses from
//! several incoming edges are combined with [`DefiniteAssignmentStatus::merge`].
//! The two `AssignedAfter...Expression` values only describe the result of a
//! boolean expression: they turn into `DefinitelyAssigned` on the matching
//! branch edge and into `PotentiallyAssigned` everywhere else.
//!
//! # Nested Functions
//!
//! Block bodies of lambdas and anonymous methods get their own graphs. Their
//! nodes are listed right after the node of the statement containing them,
//! and their entry is fed with the status at the point the function is
//! created.
//!
//! # Try/Finally
//!
//! A finally block runs on every exit from its `try` statement. When the end
//! of a finally block becomes assigned, every edge leaving that `try`
//! statement that is only potentially assigned is upgraded to the finally
//! block's status.

use std::collections::{HashMap, HashSet, VecDeque};

use csout_core::{CancellationPoll, CancellationToken};
use csout_syntax::ast::FieldDirection;
use csout_syntax::{AssignmentOperator, BinaryOperator, NodeId, NodeKind, Role, SyntaxTree, UnaryOperator};
use tracing::{debug, trace};

use crate::builder::ControlFlowGraphBuilder;
use crate::constant::{ConstantResolver, ConstantValue};
use crate::dot::render_dot;
use crate::error::{FlowError, FlowResult};
use crate::graph::{CfgEdgeId, CfgNodeId, ControlFlowEdgeKind, ControlFlowGraph, ControlFlowNodeKind};

const CANCELLATION_INTERVAL: u32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefiniteAssignmentStatus {
    /// No path reaches this point.
    CodeUnreachable,
    /// Assigned on some paths but not all.
    PotentiallyAssigned,
    DefinitelyAssigned,
    /// Assigned when the boolean expression just evaluated is true.
    AssignedAfterTrueExpression,
    /// Assigned when the boolean expression just evaluated is false.
    AssignedAfterFalseExpression,
}

impl DefiniteAssignmentStatus {
    /// Join of two incoming statuses.
    pub fn merge(self, other: Self) -> Self {
        use DefiniteAssignmentStatus::*;
        if self == other {
            self
        } else if self == CodeUnreachable {
            other
        } else if other == CodeUnreachable {
            self
        } else {
            PotentiallyAssigned
        }
    }

    /// Collapse the expression-only statuses to `PotentiallyAssigned`.
    pub fn clean(self) -> Self {
        use DefiniteAssignmentStatus::*;
        match self {
            AssignedAfterTrueExpression | AssignedAfterFalseExpression => PotentiallyAssigned,
            other => other,
        }
    }
}

/// Definite assignment over one statement and the functions nested in it.
pub struct DefiniteAssignmentAnalysis<'t> {
    tree: &'t SyntaxTree,
    resolver: &'t dyn ConstantResolver,
    graph: ControlFlowGraph,
    /// Nodes in analysis order, nested function graphs spliced in.
    nodes: Vec<CfgNodeId>,
    index_of: HashMap<CfgNodeId, usize>,
    begin_nodes: HashMap<NodeId, usize>,
    end_nodes: HashMap<NodeId, usize>,
    condition_nodes: HashMap<NodeId, usize>,
    node_status: Vec<DefiniteAssignmentStatus>,
    edge_status: Vec<DefiniteAssignmentStatus>,
    range_start: usize,
    range_end: usize,
    unassigned_uses: Vec<NodeId>,
}

impl<'t> DefiniteAssignmentAnalysis<'t> {
    pub fn new(
        tree: &'t SyntaxTree,
        root: NodeId,
        resolver: &'t dyn ConstantResolver,
        cancel: &CancellationToken,
    ) -> FlowResult<Self> {
        Self::with_builder(tree, root, resolver, ControlFlowGraphBuilder::new(), cancel)
    }

    /// Like [`new`](Self::new), building graphs with `builder`.
    pub fn with_builder(
        tree: &'t SyntaxTree,
        root: NodeId,
        resolver: &'t dyn ConstantResolver,
        builder: ControlFlowGraphBuilder,
        cancel: &CancellationToken,
    ) -> FlowResult<Self> {
        let mut graph = ControlFlowGraph::new();
        let mut nodes = builder.build_into(&mut graph, tree, root, resolver, cancel)?;

        let mut index = 0;
        while index < nodes.len() {
            let node = graph.node(nodes[index]);
            if matches!(
                node.kind,
                ControlFlowNodeKind::StartNode | ControlFlowNodeKind::BetweenStatements
            ) {
                let mut bodies = Vec::new();
                for child in tree.children(node.next_statement) {
                    nested_function_bodies(tree, child, &mut bodies);
                }
                let mut spliced = Vec::new();
                for body in bodies {
                    spliced.extend(builder.build_into(&mut graph, tree, body, resolver, cancel)?);
                }
                nodes.splice(index + 1..index + 1, spliced);
            }
            index += 1;
        }
        graph.set_order(nodes.clone());

        let mut index_of = HashMap::with_capacity(nodes.len());
        let mut begin_nodes = HashMap::new();
        let mut end_nodes = HashMap::new();
        let mut condition_nodes = HashMap::new();
        for (index, &id) in nodes.iter().enumerate() {
            index_of.insert(id, index);
            let node = graph.node(id);
            match node.kind {
                ControlFlowNodeKind::StartNode => {
                    begin_nodes.insert(node.next_statement, index);
                }
                ControlFlowNodeKind::BetweenStatements => {
                    begin_nodes.insert(node.next_statement, index);
                    end_nodes.insert(node.previous_statement, index);
                }
                ControlFlowNodeKind::EndNode => {
                    end_nodes.insert(node.previous_statement, index);
                }
                ControlFlowNodeKind::LoopCondition => {
                    condition_nodes.insert(node.next_statement, index);
                }
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = graph.edge_count(),
            "prepared definite assignment analysis"
        );
        Ok(DefiniteAssignmentAnalysis {
            tree,
            resolver,
            node_status: vec![DefiniteAssignmentStatus::CodeUnreachable; nodes.len()],
            edge_status: vec![DefiniteAssignmentStatus::CodeUnreachable; graph.edge_count()],
            range_start: 0,
            range_end: nodes.len().saturating_sub(1),
            graph,
            nodes,
            index_of,
            begin_nodes,
            end_nodes,
            condition_nodes,
            unassigned_uses: Vec::new(),
        })
    }

    /// The graph, including the graphs of nested functions.
    pub fn graph(&self) -> &ControlFlowGraph {
        &self.graph
    }

    /// Restrict the analysis to the nodes from `start` to `end`.
    ///
    /// An inclusive start begins before `start`, an exclusive one after it.
    /// An inclusive end stops after `end`, an exclusive one before it.
    pub fn set_analyzed_range(
        &mut self,
        start: NodeId,
        end: NodeId,
        start_inclusive: bool,
        end_inclusive: bool,
    ) -> FlowResult<()> {
        let start_map = if start_inclusive { &self.begin_nodes } else { &self.end_nodes };
        let end_map = if end_inclusive { &self.end_nodes } else { &self.begin_nodes };
        let (Some(&start_index), Some(&end_index)) = (start_map.get(&start), end_map.get(&end)) else {
            return Err(FlowError::InvalidRange {
                reason: format!("{} or {} has no control flow node", start, end),
            });
        };
        if start_index > end_index {
            return Err(FlowError::InvalidRange {
                reason: format!("{} does not precede {}", start, end),
            });
        }
        self.range_start = start_index;
        self.range_end = end_index;
        Ok(())
    }

    /// Run the analysis for `variable`, starting the analyzed range with
    /// `initial_status`.
    pub fn analyze(
        &mut self,
        variable: &str,
        initial_status: DefiniteAssignmentStatus,
        cancel: &CancellationToken,
    ) -> FlowResult<()> {
        self.unassigned_uses.clear();
        self.node_status.fill(DefiniteAssignmentStatus::CodeUnreachable);
        self.edge_status.fill(DefiniteAssignmentStatus::CodeUnreachable);
        if self.nodes.is_empty() {
            return Ok(());
        }

        let mut pass = Pass {
            analysis: self,
            variable,
            poll: CancellationPoll::new(cancel, CANCELLATION_INTERVAL),
            queue: VecDeque::new(),
            seen_uses: HashSet::new(),
        };
        let start = pass.analysis.range_start;
        pass.change_node_status(start, initial_status)?;

        let mut iterations = 0usize;
        while let Some(index) = pass.queue.pop_front() {
            pass.poll.tick()?;
            iterations += 1;
            let id = pass.analysis.nodes[index];
            let input = pass
                .analysis
                .graph
                .node(id)
                .incoming
                .iter()
                .fold(DefiniteAssignmentStatus::CodeUnreachable, |status, edge| {
                    status.merge(pass.analysis.edge_status[edge.index()])
                });
            pass.change_node_status(index, input)?;
        }

        debug!(variable, iterations, "definite assignment reached a fixpoint");
        Ok(())
    }

    fn lookup(&self, map: &HashMap<NodeId, usize>, statement: NodeId) -> FlowResult<DefiniteAssignmentStatus> {
        map.get(&statement)
            .map(|&index| self.node_status[index])
            .ok_or_else(|| FlowError::UnknownStatement {
                node: statement,
                kind: self.tree.kind(statement).name(),
            })
    }

    /// The status on entry to `statement`.
    pub fn status_before(&self, statement: NodeId) -> FlowResult<DefiniteAssignmentStatus> {
        self.lookup(&self.begin_nodes, statement)
    }

    /// The status after `statement` completes normally.
    pub fn status_after(&self, statement: NodeId) -> FlowResult<DefiniteAssignmentStatus> {
        self.lookup(&self.end_nodes, statement)
    }

    /// The status before the condition of the loop `statement` is evaluated.
    pub fn status_before_loop_condition(&self, statement: NodeId) -> FlowResult<DefiniteAssignmentStatus> {
        self.lookup(&self.condition_nodes, statement)
    }

    /// Reads of the variable at a point where it is not definitely assigned.
    pub fn unassigned_variable_uses(&self) -> &[NodeId] {
        &self.unassigned_uses
    }

    /// The graph as `dot` text, labelled with the statuses of the last run.
    pub fn export_graph(&self) -> String {
        render_dot(
            self.tree,
            &self.graph,
            &self.nodes,
            |id| {
                self.index_of
                    .get(&id)
                    .map(|&index| format!("{:?}", self.node_status[index]))
            },
            |edge| Some(format!("{:?}", self.edge_status[edge.index()])),
        )
    }
}

/// Collect the block bodies of functions nested in `node`, skipping nested
/// statements.
fn nested_function_bodies(tree: &SyntaxTree, node: NodeId, bodies: &mut Vec<NodeId>) {
    let kind = tree.kind(node);
    if kind.is_statement() {
        return;
    }
    match kind {
        NodeKind::AnonymousMethodExpression { .. } | NodeKind::LambdaExpression { .. } => {
            let body = tree.child(node, Role::Body);
            if tree.kind(body).is_statement() {
                bodies.push(body);
            }
        }
        _ => {
            for child in tree.children(node) {
                nested_function_bodies(tree, child, bodies);
            }
        }
    }
}

/// One run of [`DefiniteAssignmentAnalysis::analyze`].
struct Pass<'p, 't> {
    analysis: &'p mut DefiniteAssignmentAnalysis<'t>,
    variable: &'p str,
    poll: CancellationPoll<'p>,
    queue: VecDeque<usize>,
    seen_uses: HashSet<NodeId>,
}

impl Pass<'_, '_> {
    fn change_node_status(&mut self, index: usize, input: DefiniteAssignmentStatus) -> FlowResult<()> {
        use DefiniteAssignmentStatus::*;

        if self.analysis.node_status[index] == input {
            return Ok(());
        }
        self.analysis.node_status[index] = input;
        let tree = self.analysis.tree;
        let id = self.analysis.nodes[index];
        let (kind, previous, next) = {
            let node = self.analysis.graph.node(id);
            (node.kind, node.previous_statement, node.next_statement)
        };
        trace!(node = %id, status = ?input, "node status changed");

        let is_if = matches!(tree.kind(next), NodeKind::IfElseStatement);
        let output = match kind {
            ControlFlowNodeKind::StartNode | ControlFlowNodeKind::BetweenStatements if !is_if => {
                if input == DefinitelyAssigned {
                    DefinitelyAssigned
                } else {
                    self.statement(next, input)?.clean()
                }
            }
            ControlFlowNodeKind::EndNode => {
                if tree.role(previous) == Role::FinallyBlock
                    && matches!(input, DefinitelyAssigned | PotentiallyAssigned)
                {
                    if let Some(try_statement) = tree.parent(previous) {
                        self.replay_finally(try_statement, input);
                    }
                }
                input
            }
            ControlFlowNodeKind::LoopCondition
                if matches!(tree.kind(next), NodeKind::ForeachStatement) =>
            {
                let source = tree.child(next, Role::InExpression);
                let status = self.expression(source, input)?.clean();
                if tree.name(next) == self.variable {
                    DefinitelyAssigned
                } else {
                    status
                }
            }
            _ => {
                let condition = tree.child(next, Role::Condition);
                let output = if condition.is_null() {
                    input
                } else {
                    self.expression(condition, input)?
                };
                let outgoing = self.analysis.graph.node(id).outgoing.clone();
                for edge in outgoing {
                    let status = match (self.analysis.graph.edge(edge).kind, output) {
                        (ControlFlowEdgeKind::ConditionTrue, AssignedAfterTrueExpression)
                        | (ControlFlowEdgeKind::ConditionFalse, AssignedAfterFalseExpression) => {
                            DefinitelyAssigned
                        }
                        _ => output.clean(),
                    };
                    self.change_edge_status(edge, status);
                }
                return Ok(());
            }
        };

        let outgoing = self.analysis.graph.node(id).outgoing.clone();
        for edge in outgoing {
            self.change_edge_status(edge, output);
        }
        Ok(())
    }

    /// Upgrade the potentially assigned edges leaving `try_statement`.
    fn replay_finally(&mut self, try_statement: NodeId, status: DefiniteAssignmentStatus) {
        let leaving: Vec<CfgEdgeId> = self
            .analysis
            .graph
            .edges()
            .filter(|(_, edge)| edge.try_finally_statements.contains(&try_statement))
            .map(|(id, _)| id)
            .collect();
        for edge in leaving {
            if self.analysis.edge_status[edge.index()] == DefiniteAssignmentStatus::PotentiallyAssigned {
                self.change_edge_status(edge, status);
            }
        }
    }

    fn change_edge_status(&mut self, edge: CfgEdgeId, status: DefiniteAssignmentStatus) {
        let status = status.clean();
        let old = self.analysis.edge_status[edge.index()];
        if old == status || status == DefiniteAssignmentStatus::CodeUnreachable {
            return;
        }
        self.analysis.edge_status[edge.index()] = status;
        let target = self.analysis.graph.edge(edge).to;
        if let Some(&index) = self.analysis.index_of.get(&target) {
            if self.analysis.range_start <= index && index <= self.analysis.range_end {
                self.queue.push_back(index);
            }
        }
    }

    fn evaluate_condition(&self, expression: NodeId) -> Option<bool> {
        self.analysis
            .resolver
            .resolve_boolean(self.analysis.tree, expression)
    }

    // ------------------------------------------------------------------------
    // Transfer functions
    // ------------------------------------------------------------------------

    /// The effect of `statement` itself. Nested statements are reached through
    /// the graph and are not visited here.
    fn statement(&mut self, statement: NodeId, status: DefiniteAssignmentStatus) -> FlowResult<DefiniteAssignmentStatus> {
        let tree = self.analysis.tree;
        match tree.kind(statement) {
            NodeKind::ExpressionStatement
            | NodeKind::ReturnStatement
            | NodeKind::ThrowStatement
            | NodeKind::YieldReturnStatement
            | NodeKind::LockStatement
            | NodeKind::SwitchStatement => {
                let expression = tree.child(statement, Role::Expression);
                if expression.is_null() {
                    Ok(status)
                } else {
                    self.expression(expression, status)
                }
            }
            NodeKind::IfElseStatement => self.expression(tree.child(statement, Role::Condition), status),
            NodeKind::VariableDeclarationStatement { .. } | NodeKind::FixedStatement => {
                let mut status = status;
                for variable in tree.children_by_role(statement, Role::Variable) {
                    status = self.expression(variable, status)?;
                }
                Ok(status)
            }
            NodeKind::UsingStatement => {
                let resource = tree.child(statement, Role::ResourceAcquisition);
                if tree.kind(resource).is_expression() {
                    self.expression(resource, status)
                } else {
                    Ok(status)
                }
            }
            _ => Ok(status),
        }
    }

    /// Walk the children of `node` in order, cleaning between them.
    fn children(&mut self, node: NodeId, status: DefiniteAssignmentStatus) -> FlowResult<DefiniteAssignmentStatus> {
        let tree = self.analysis.tree;
        let mut status = status;
        for child in tree.children(node) {
            self.poll.tick()?;
            if tree.kind(child).is_statement() {
                continue;
            }
            status = self.expression(child, status)?.clean();
        }
        Ok(status)
    }

    fn expression(&mut self, node: NodeId, status: DefiniteAssignmentStatus) -> FlowResult<DefiniteAssignmentStatus> {
        use DefiniteAssignmentStatus::*;

        let tree = self.analysis.tree;
        match tree.kind(node) {
            NodeKind::Null => Ok(status),
            NodeKind::AssignmentExpression {
                operator: AssignmentOperator::Assign,
            } => self.assignment(
                tree.child(node, Role::Left),
                tree.child(node, Role::Right),
                status,
            ),
            NodeKind::DirectionExpression {
                direction: FieldDirection::Out,
            } => self.assignment(tree.child(node, Role::Expression), NodeId::NULL, status),
            NodeKind::ParenthesizedExpression
            | NodeKind::CheckedExpression
            | NodeKind::UncheckedExpression => {
                self.expression(tree.child(node, Role::Expression), status)
            }
            NodeKind::BinaryOperatorExpression {
                operator: BinaryOperator::ConditionalAnd,
            } => self.conditional_and(node, status),
            NodeKind::BinaryOperatorExpression {
                operator: BinaryOperator::ConditionalOr,
            } => self.conditional_or(node, status),
            NodeKind::BinaryOperatorExpression {
                operator: BinaryOperator::NullCoalescing,
            } => {
                let left = tree.child(node, Role::Left);
                let right = tree.child(node, Role::Right);
                if self.analysis.resolver.resolve(tree, left) == Some(ConstantValue::Null) {
                    return self.expression(right, status);
                }
                let status = self.expression(left, status)?.clean();
                self.expression(right, status)?;
                Ok(status)
            }
            NodeKind::UnaryOperatorExpression {
                operator: UnaryOperator::Not,
            } => {
                let status = self.expression(tree.child(node, Role::Expression), status)?;
                Ok(match status {
                    AssignedAfterFalseExpression => AssignedAfterTrueExpression,
                    AssignedAfterTrueExpression => AssignedAfterFalseExpression,
                    other => other,
                })
            }
            NodeKind::ConditionalExpression => self.conditional(node, status),
            NodeKind::AnonymousMethodExpression { .. } | NodeKind::LambdaExpression { .. } => {
                let body = tree.child(node, Role::Body);
                if tree.kind(body).is_statement() {
                    let Some(&begin) = self.analysis.begin_nodes.get(&body) else {
                        return Err(FlowError::UnknownStatement {
                            node: body,
                            kind: tree.kind(body).name(),
                        });
                    };
                    self.change_node_status(begin, status)?;
                } else {
                    self.expression(body, status)?;
                }
                Ok(status)
            }
            NodeKind::IdentifierExpression => {
                let generic = tree.children_by_role(node, Role::TypeArgument).next().is_some();
                if status != DefinitelyAssigned
                    && !generic
                    && tree.name(node) == self.variable
                    && self.seen_uses.insert(node)
                {
                    self.analysis.unassigned_uses.push(node);
                }
                Ok(status)
            }
            NodeKind::VariableInitializer => {
                let initializer = tree.child(node, Role::Initializer);
                if initializer.is_null() {
                    return Ok(status);
                }
                let status = self.expression(initializer, status)?;
                if tree.name(node) == self.variable {
                    Ok(DefinitelyAssigned)
                } else {
                    Ok(status)
                }
            }
            _ => self.children(node, status),
        }
    }

    fn assignment(
        &mut self,
        left: NodeId,
        right: NodeId,
        status: DefiniteAssignmentStatus,
    ) -> FlowResult<DefiniteAssignmentStatus> {
        let tree = self.analysis.tree;
        if matches!(tree.kind(left), NodeKind::IdentifierExpression) && tree.name(left) == self.variable {
            if !right.is_null() {
                self.expression(right, status)?;
            }
            return Ok(DefiniteAssignmentStatus::DefinitelyAssigned);
        }
        let mut status = self.expression(left, status)?;
        if !right.is_null() {
            status = self.expression(right, status.clean())?;
        }
        Ok(status.clean())
    }

    fn conditional_and(&mut self, node: NodeId, status: DefiniteAssignmentStatus) -> FlowResult<DefiniteAssignmentStatus> {
        use DefiniteAssignmentStatus::*;

        let tree = self.analysis.tree;
        let left = tree.child(node, Role::Left);
        let right = tree.child(node, Role::Right);
        match self.evaluate_condition(left) {
            Some(true) => return self.expression(right, status),
            Some(false) => return Ok(status),
            None => {}
        }
        let after_left = self.expression(left, status)?;
        let before_right = match after_left {
            AssignedAfterTrueExpression => DefinitelyAssigned,
            AssignedAfterFalseExpression => PotentiallyAssigned,
            other => other,
        };
        let after_right = self.expression(right, before_right)?;
        Ok(if after_left == DefinitelyAssigned {
            DefinitelyAssigned
        } else if after_right == DefinitelyAssigned && after_left == AssignedAfterFalseExpression {
            DefinitelyAssigned
        } else if matches!(after_right, DefinitelyAssigned | AssignedAfterTrueExpression) {
            AssignedAfterTrueExpression
        } else if after_left == AssignedAfterFalseExpression && after_right == AssignedAfterFalseExpression {
            AssignedAfterFalseExpression
        } else {
            PotentiallyAssigned
        })
    }

    fn conditional_or(&mut self, node: NodeId, status: DefiniteAssignmentStatus) -> FlowResult<DefiniteAssignmentStatus> {
        use DefiniteAssignmentStatus::*;

        let tree = self.analysis.tree;
        let left = tree.child(node, Role::Left);
        let right = tree.child(node, Role::Right);
        match self.evaluate_condition(left) {
            Some(false) => return self.expression(right, status),
            Some(true) => return Ok(status),
            None => {}
        }
        let after_left = self.expression(left, status)?;
        let before_right = match after_left {
            AssignedAfterTrueExpression => PotentiallyAssigned,
            AssignedAfterFalseExpression => DefinitelyAssigned,
            other => other,
        };
        let after_right = self.expression(right, before_right)?;
        Ok(if after_left == DefinitelyAssigned {
            DefinitelyAssigned
        } else if after_right == DefinitelyAssigned && after_left == AssignedAfterTrueExpression {
            DefinitelyAssigned
        } else if matches!(after_right, DefinitelyAssigned | AssignedAfterFalseExpression) {
            AssignedAfterFalseExpression
        } else if after_left == AssignedAfterTrueExpression && after_right == AssignedAfterTrueExpression {
            AssignedAfterTrueExpression
        } else {
            PotentiallyAssigned
        })
    }

    fn conditional(&mut self, node: NodeId, status: DefiniteAssignmentStatus) -> FlowResult<DefiniteAssignmentStatus> {
        use DefiniteAssignmentStatus::*;

        let tree = self.analysis.tree;
        let condition = tree.child(node, Role::Condition);
        let when_true = tree.child(node, Role::TrueExpression);
        let when_false = tree.child(node, Role::FalseExpression);
        match self.evaluate_condition(condition) {
            Some(true) => return self.expression(when_true, status),
            Some(false) => return self.expression(when_false, status),
            None => {}
        }
        let after_condition = self.expression(condition, status)?;
        let (before_true, before_false) = match after_condition {
            AssignedAfterTrueExpression => (DefinitelyAssigned, PotentiallyAssigned),
            AssignedAfterFalseExpression => (PotentiallyAssigned, DefinitelyAssigned),
            other => (other, other),
        };
        let after_true = self.expression(when_true, before_true)?.clean();
        let after_false = self.expression(when_false, before_false)?.clean();
        Ok(after_true.merge(after_false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::{NoConstants, PrimitiveConstants};
    use DefiniteAssignmentStatus::*;

    const ALL: [DefiniteAssignmentStatus; 5] = [
        CodeUnreachable,
        PotentiallyAssigned,
        DefinitelyAssigned,
        AssignedAfterTrueExpression,
        AssignedAfterFalseExpression,
    ];

    fn none() -> CancellationToken {
        CancellationToken::none()
    }

    fn assign(tree: &mut SyntaxTree, name: &str, value: i32) -> NodeId {
        let target = tree.ident(name);
        let value = tree.primitive(value);
        let assign = tree.assign(AssignmentOperator::Assign, target, value);
        tree.expr_stmt(assign)
    }

    fn use_of(tree: &mut SyntaxTree, name: &str) -> NodeId {
        let target = tree.ident("Use");
        let argument = tree.ident(name);
        let call = tree.invocation(target, vec![argument]);
        tree.expr_stmt(call)
    }

    fn out_call(tree: &mut SyntaxTree, name: &str) -> NodeId {
        let target = tree.ident("TryGet");
        let argument = tree.ident(name);
        let out = tree.direction(FieldDirection::Out, argument);
        tree.invocation(target, vec![out])
    }

    #[test]
    fn test_lattice_laws() {
        for a in ALL {
            assert_eq!(a.merge(a), a);
            assert_eq!(CodeUnreachable.merge(a), a);
            for b in ALL {
                assert_eq!(a.merge(b), b.merge(a));
            }
        }
        assert_eq!(DefinitelyAssigned.merge(PotentiallyAssigned), PotentiallyAssigned);
        assert_eq!(AssignedAfterTrueExpression.clean(), PotentiallyAssigned);
        assert_eq!(DefinitelyAssigned.clean(), DefinitelyAssigned);
    }

    #[test]
    fn test_assignment_in_both_branches() {
        let mut tree = SyntaxTree::new();
        let c = tree.ident("c");
        let then = assign(&mut tree, "x", 1);
        let otherwise = assign(&mut tree, "x", 2);
        let branch = tree.if_else(c, then, otherwise);
        let read = use_of(&mut tree, "x");
        let block = tree.block(vec![branch, read]);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_before(branch).unwrap(), PotentiallyAssigned);
        assert_eq!(analysis.status_after(branch).unwrap(), DefinitelyAssigned);
        assert_eq!(analysis.status_before(read).unwrap(), DefinitelyAssigned);
        assert!(analysis.unassigned_variable_uses().is_empty());
    }

    #[test]
    fn test_assignment_in_one_branch() {
        let mut tree = SyntaxTree::new();
        let c = tree.ident("c");
        let then = assign(&mut tree, "x", 1);
        let branch = tree.if_else(c, then, NodeId::NULL);
        let read = use_of(&mut tree, "x");
        let block = tree.block(vec![branch, read]);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_after(branch).unwrap(), PotentiallyAssigned);
        assert_eq!(analysis.unassigned_variable_uses().len(), 1);
    }

    #[test]
    fn test_out_argument_on_true_branch() {
        // if (TryGet(out x) && x > 0) Use(x);
        let mut tree = SyntaxTree::new();
        let call = out_call(&mut tree, "x");
        let x = tree.ident("x");
        let zero = tree.primitive(0);
        let positive = tree.binary(BinaryOperator::GreaterThan, x, zero);
        let condition = tree.binary(BinaryOperator::ConditionalAnd, call, positive);
        let read = use_of(&mut tree, "x");
        let branch = tree.if_else(condition, read, NodeId::NULL);
        let block = tree.block(vec![branch]);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_before(read).unwrap(), DefinitelyAssigned);
        assert!(analysis.unassigned_variable_uses().is_empty());
    }

    #[test]
    fn test_negated_or_assigns_on_true_branch() {
        // if (!(c || TryGet(out x))) ... else Use(x);
        let mut tree = SyntaxTree::new();
        let c = tree.ident("c");
        let call = out_call(&mut tree, "x");
        let or = tree.binary(BinaryOperator::ConditionalOr, c, call);
        let paren = tree.paren(or);
        let not = tree.unary(UnaryOperator::Not, paren);
        let then = use_of(&mut tree, "y");
        let otherwise = use_of(&mut tree, "x");
        let branch = tree.if_else(not, then, otherwise);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, branch, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_before(then).unwrap(), DefinitelyAssigned);
        assert_eq!(analysis.status_before(otherwise).unwrap(), PotentiallyAssigned);
    }

    #[test]
    fn test_loop_body_may_not_run() {
        let mut tree = SyntaxTree::new();
        let c = tree.ident("c");
        let body = assign(&mut tree, "x", 1);
        let loop_stmt = tree.while_stmt(c, body);
        let read = use_of(&mut tree, "x");
        let block = tree.block(vec![loop_stmt, read]);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_before_loop_condition(loop_stmt).unwrap(), PotentiallyAssigned);
        assert_eq!(analysis.status_after(body).unwrap(), DefinitelyAssigned);
        assert_eq!(analysis.status_before(read).unwrap(), PotentiallyAssigned);
    }

    #[test]
    fn test_infinite_loop_with_assignment_before_break() {
        let mut tree = SyntaxTree::new();
        let t = tree.primitive(true);
        let set = assign(&mut tree, "x", 1);
        let brk = tree.break_stmt();
        let body = tree.block(vec![set, brk]);
        let loop_stmt = tree.while_stmt(t, body);
        let read = use_of(&mut tree, "x");
        let block = tree.block(vec![loop_stmt, read]);

        let mut analysis =
            DefiniteAssignmentAnalysis::new(&tree, block, &PrimitiveConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_before(read).unwrap(), DefinitelyAssigned);
    }

    #[test]
    fn test_finally_assignment_reaches_exit() {
        let mut tree = SyntaxTree::new();
        let work = use_of(&mut tree, "y");
        let try_block = tree.block(vec![work]);
        let set = assign(&mut tree, "x", 1);
        let finally_block = tree.block(vec![set]);
        let try_stmt = tree.try_catch(try_block, vec![], finally_block);
        let read = use_of(&mut tree, "x");
        let block = tree.block(vec![try_stmt, read]);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_after(finally_block).unwrap(), DefinitelyAssigned);
        assert_eq!(analysis.status_before(read).unwrap(), DefinitelyAssigned);
    }

    #[test]
    fn test_lambda_body_is_analyzed() {
        // F(() => { Use(x); }); x = 1;
        let mut tree = SyntaxTree::new();
        let read = use_of(&mut tree, "x");
        let body = tree.block(vec![read]);
        let lambda = tree.lambda(vec![], body, false);
        let target = tree.ident("F");
        let call = tree.invocation(target, vec![lambda]);
        let call = tree.expr_stmt(call);
        let set = assign(&mut tree, "x", 1);
        let block = tree.block(vec![call, set]);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_before(read).unwrap(), PotentiallyAssigned);
        assert_eq!(analysis.unassigned_variable_uses().len(), 1);
    }

    #[test]
    fn test_analyzed_range() {
        let mut tree = SyntaxTree::new();
        let first = assign(&mut tree, "x", 1);
        let second = use_of(&mut tree, "x");
        let third = use_of(&mut tree, "x");
        let block = tree.block(vec![first, second, third]);

        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.set_analyzed_range(second, second, true, true).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        assert_eq!(analysis.status_before(second).unwrap(), PotentiallyAssigned);
        assert_eq!(analysis.status_after(second).unwrap(), PotentiallyAssigned);
        assert_eq!(analysis.status_after(third).unwrap(), CodeUnreachable);

        assert!(matches!(
            analysis.set_analyzed_range(third, first, true, true),
            Err(FlowError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_unknown_statement_query() {
        let mut tree = SyntaxTree::new();
        let first = assign(&mut tree, "x", 1);
        let block = tree.block(vec![first]);
        let stray = use_of(&mut tree, "x");
        let analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        assert!(matches!(
            analysis.status_before(stray),
            Err(FlowError::UnknownStatement { node, .. }) if node == stray
        ));
    }

    #[test]
    fn test_export_includes_statuses() {
        let mut tree = SyntaxTree::new();
        let first = assign(&mut tree, "x", 1);
        let block = tree.block(vec![first]);
        let mut analysis = DefiniteAssignmentAnalysis::new(&tree, block, &NoConstants, &none()).unwrap();
        analysis.analyze("x", PotentiallyAssigned, &none()).unwrap();
        let dot = analysis.export_graph();
        assert!(dot.contains("DefinitelyAssigned"));
        assert!(dot.contains("PotentiallyAssigned"));
    }
}
