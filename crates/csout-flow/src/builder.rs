// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Building control-flow graphs from statement trees.
//!
//! [`ControlFlowGraphBuilder::build`] walks a statement and creates a node for
//! every control point: a start node before the root, a node between each
//! pair of statements in a list, an end node after each list, and a condition
//! node per loop. Edges follow the possible transitions.
//!
//! # Constant Conditions
//!
//! Conditions of `if`, `while`, `do`, `for` and `switch` are passed to a
//! [`ConstantResolver`]. A branch that a constant condition never takes gets
//! no edge; its nodes are still created but are unreachable.
//!
//! # Jumps
//!
//! `break` and `continue` connect to the innermost loop or switch. `goto`
//! statements are connected to their label after the walk; `goto case` and
//! `goto default` are connected when the enclosing switch is finished.
//! `return`, `throw` and `yield break` end a path: their end node has no
//! incoming edge.
//!
//! # Try/Finally
//!
//! The finally block is not connected to what follows the `try` statement.
//! Instead every edge that leaves a `try` with a `finally` block records that
//! statement in [`ControlFlowEdge::try_finally_statements`]; consumers replay
//! the finally block's effects on those edges.
//!
//! [`ControlFlowEdge::try_finally_statements`]: crate::graph::ControlFlowEdge::try_finally_statements

use std::collections::{HashMap, HashSet};

use csout_core::{CancellationPoll, CancellationToken};
use csout_syntax::{NodeId, NodeKind, Role, SyntaxTree};
use tracing::debug;

use crate::constant::{ConstantResolver, ConstantValue};
use crate::error::{FlowError, FlowResult};
use crate::graph::{CfgEdgeId, CfgNodeId, ControlFlowEdgeKind, ControlFlowGraph, ControlFlowNodeKind};

/// Statements between two cancellation checks.
const CANCELLATION_INTERVAL: u32 = 64;

/// Builds a [`ControlFlowGraph`] for a statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlFlowGraphBuilder {
    evaluate_only_primitive_constants: bool,
}

impl ControlFlowGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only consult the resolver for literal conditions (`true`, `null`, ...),
    /// treating every other expression as unknown.
    pub fn evaluate_only_primitive_constants(mut self, value: bool) -> Self {
        self.evaluate_only_primitive_constants = value;
        self
    }

    /// Build the graph for `root`.
    pub fn build(
        &self,
        tree: &SyntaxTree,
        root: NodeId,
        resolver: &dyn ConstantResolver,
        cancel: &CancellationToken,
    ) -> FlowResult<ControlFlowGraph> {
        let mut graph = ControlFlowGraph::new();
        let order = self.build_into(&mut graph, tree, root, resolver, cancel)?;
        graph.set_order(order);
        Ok(graph)
    }

    /// Build the graph for `root` into an existing arena and return the new
    /// nodes in listing order. The arena's own order is left untouched.
    pub(crate) fn build_into(
        &self,
        graph: &mut ControlFlowGraph,
        tree: &SyntaxTree,
        root: NodeId,
        resolver: &dyn ConstantResolver,
        cancel: &CancellationToken,
    ) -> FlowResult<Vec<CfgNodeId>> {
        if !tree.kind(root).is_statement() {
            return Err(FlowError::UnknownStatement {
                node: root,
                kind: tree.kind(root).name(),
            });
        }
        let first_edge = graph.edge_count();
        let first_node = graph.node_count();
        let mut build = Build {
            options: *self,
            tree,
            graph,
            resolver,
            poll: CancellationPoll::new(cancel, CANCELLATION_INTERVAL),
            root,
            order: Vec::new(),
            labels: HashMap::new(),
            gotos: Vec::new(),
            goto_case_or_default: Vec::new(),
            break_targets: Vec::new(),
            continue_targets: Vec::new(),
        };

        let entry = build.start_node(root);
        build.visit(root, entry)?;
        build.resolve_gotos();
        build.annotate_leave_edges(first_edge);

        debug!(
            nodes = build.graph.node_count() - first_node,
            edges = build.graph.edge_count() - first_edge,
            "built control flow graph"
        );
        Ok(build.order)
    }
}

/// State of one build.
struct Build<'a, 't> {
    options: ControlFlowGraphBuilder,
    tree: &'t SyntaxTree,
    graph: &'a mut ControlFlowGraph,
    resolver: &'a dyn ConstantResolver,
    poll: CancellationPoll<'a>,
    root: NodeId,
    order: Vec<CfgNodeId>,
    labels: HashMap<String, CfgNodeId>,
    gotos: Vec<CfgNodeId>,
    goto_case_or_default: Vec<CfgNodeId>,
    break_targets: Vec<CfgNodeId>,
    continue_targets: Vec<CfgNodeId>,
}

impl Build<'_, '_> {
    // ------------------------------------------------------------------------
    // Nodes and edges
    // ------------------------------------------------------------------------

    fn start_node(&mut self, statement: NodeId) -> Option<CfgNodeId> {
        if statement.is_null() {
            return None;
        }
        let node = self
            .graph
            .add_node(NodeId::NULL, statement, ControlFlowNodeKind::StartNode);
        self.order.push(node);
        Some(node)
    }

    fn special_node(&mut self, statement: NodeId, kind: ControlFlowNodeKind, listed: bool) -> CfgNodeId {
        let node = self.graph.add_node(NodeId::NULL, statement, kind);
        if listed {
            self.order.push(node);
        }
        node
    }

    /// The node after `statement`: between it and the next statement in the
    /// same role, or at the end of its list.
    fn end_node(&mut self, statement: NodeId, listed: bool) -> CfgNodeId {
        let next = if statement == self.root {
            NodeId::NULL
        } else {
            let role = self.tree.role(statement);
            let mut next = self.tree.next_sibling(statement);
            while let Some(candidate) = next {
                if self.tree.role(candidate) == role {
                    break;
                }
                next = self.tree.next_sibling(candidate);
            }
            next.filter(|&n| self.tree.kind(n).is_statement())
                .unwrap_or(NodeId::NULL)
        };
        let kind = if next.is_null() {
            ControlFlowNodeKind::EndNode
        } else {
            ControlFlowNodeKind::BetweenStatements
        };
        let node = self.graph.add_node(statement, next, kind);
        if listed {
            self.order.push(node);
        }
        node
    }

    fn connect(
        &mut self,
        from: Option<CfgNodeId>,
        to: Option<CfgNodeId>,
        kind: ControlFlowEdgeKind,
    ) -> Option<CfgEdgeId> {
        Some(self.graph.connect(from?, to?, kind))
    }

    fn connected_end_node(&mut self, statement: NodeId, from: Option<CfgNodeId>) -> Option<CfgNodeId> {
        let end = self.end_node(statement, true);
        self.connect(from, Some(end), ControlFlowEdgeKind::Normal);
        Some(end)
    }

    // ------------------------------------------------------------------------
    // Constants
    // ------------------------------------------------------------------------

    fn evaluate_constant(&self, expression: NodeId) -> Option<ConstantValue> {
        if expression.is_null() {
            return None;
        }
        if self.options.evaluate_only_primitive_constants
            && !matches!(
                self.tree.kind(expression),
                NodeKind::PrimitiveExpression { .. } | NodeKind::NullReferenceExpression
            )
        {
            return None;
        }
        self.resolver.resolve(self.tree, expression)
    }

    fn evaluate_condition(&self, expression: NodeId) -> Option<bool> {
        self.evaluate_constant(expression).and_then(|value| value.as_bool())
    }

    // ------------------------------------------------------------------------
    // Statement lists
    // ------------------------------------------------------------------------

    fn statement_list(
        &mut self,
        statements: Vec<NodeId>,
        source: Option<CfgNodeId>,
    ) -> FlowResult<Option<CfgNodeId>> {
        let mut current: Option<CfgNodeId> = None;
        for statement in statements {
            self.poll.tick()?;
            if current.is_none() {
                current = self.start_node(statement);
                self.connect(source, current, ControlFlowEdgeKind::Normal);
            }
            current = self.visit(statement, current)?;
        }
        Ok(current.or(source))
    }

    fn embedded_statement(
        &mut self,
        statement: NodeId,
        source: Option<CfgNodeId>,
    ) -> FlowResult<Option<CfgNodeId>> {
        if statement.is_null() {
            return Ok(source);
        }
        self.poll.tick()?;
        let begin = self.start_node(statement);
        self.connect(source, begin, ControlFlowEdgeKind::Normal);
        self.visit(statement, begin)
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    /// Visit `statement`, entered at `data`, and return the node after it.
    fn visit(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let tree = self.tree;
        match tree.kind(statement) {
            NodeKind::Null => Ok(None),
            NodeKind::BlockStatement => {
                let statements = tree.children_by_role(statement, Role::Statement).collect();
                let end = self.statement_list(statements, data)?;
                Ok(self.connected_end_node(statement, end))
            }
            NodeKind::EmptyStatement
            | NodeKind::ExpressionStatement
            | NodeKind::VariableDeclarationStatement { .. } => {
                Ok(self.connected_end_node(statement, data))
            }
            NodeKind::LabelStatement => {
                let end = self.end_node(statement, true);
                self.connect(data, Some(end), ControlFlowEdgeKind::Normal);
                self.labels.insert(tree.name(statement).to_string(), end);
                Ok(Some(end))
            }
            NodeKind::IfElseStatement => self.visit_if_else(statement, data),
            NodeKind::SwitchStatement => self.visit_switch(statement, data),
            NodeKind::WhileStatement => self.visit_while(statement, data),
            NodeKind::DoWhileStatement => self.visit_do_while(statement, data),
            NodeKind::ForStatement => self.visit_for(statement, data),
            NodeKind::ForeachStatement => self.visit_foreach(statement, data),
            NodeKind::GotoCaseStatement | NodeKind::GotoDefaultStatement => {
                if let Some(data) = data {
                    self.goto_case_or_default.push(data);
                }
                Ok(Some(self.end_node(statement, true)))
            }
            NodeKind::GotoStatement => {
                if let Some(data) = data {
                    self.gotos.push(data);
                }
                Ok(Some(self.end_node(statement, true)))
            }
            NodeKind::BreakStatement => {
                let target = self.break_targets.last().copied();
                self.connect(data, target, ControlFlowEdgeKind::Jump);
                Ok(Some(self.end_node(statement, true)))
            }
            NodeKind::ContinueStatement => {
                let target = self.continue_targets.last().copied();
                self.connect(data, target, ControlFlowEdgeKind::Jump);
                Ok(Some(self.end_node(statement, true)))
            }
            // The end node of a terminating statement is not connected.
            NodeKind::ReturnStatement | NodeKind::ThrowStatement | NodeKind::YieldBreakStatement => {
                Ok(Some(self.end_node(statement, true)))
            }
            NodeKind::YieldReturnStatement => Ok(self.connected_end_node(statement, data)),
            NodeKind::TryCatchStatement => self.visit_try_catch(statement, data),
            NodeKind::CheckedStatement | NodeKind::UncheckedStatement | NodeKind::UnsafeStatement => {
                let body = tree.child(statement, Role::Body);
                let end = self.embedded_statement(body, data)?;
                Ok(self.connected_end_node(statement, end))
            }
            NodeKind::LockStatement | NodeKind::FixedStatement => {
                let body = tree.child(statement, Role::EmbeddedStatement);
                let end = self.embedded_statement(body, data)?;
                Ok(self.connected_end_node(statement, end))
            }
            NodeKind::UsingStatement => {
                let resource = tree.child(statement, Role::ResourceAcquisition);
                let data = if tree.kind(resource).is_statement() {
                    self.embedded_statement(resource, data)?
                } else {
                    data
                };
                let body = tree.child(statement, Role::EmbeddedStatement);
                let end = self.embedded_statement(body, data)?;
                Ok(self.connected_end_node(statement, end))
            }
            other => Err(FlowError::UnknownStatement {
                node: statement,
                kind: other.name(),
            }),
        }
    }

    fn visit_if_else(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let tree = self.tree;
        let condition = self.evaluate_condition(tree.child(statement, Role::Condition));

        let when_true = tree.child(statement, Role::TrueStatement);
        let true_begin = self.start_node(when_true);
        if condition != Some(false) {
            self.connect(data, true_begin, ControlFlowEdgeKind::ConditionTrue);
        }
        let true_end = self.visit(when_true, true_begin)?;

        let when_false = tree.child(statement, Role::FalseStatement);
        let false_begin = self.start_node(when_false);
        if condition != Some(true) {
            self.connect(data, false_begin, ControlFlowEdgeKind::ConditionFalse);
        }
        let false_end = self.visit(when_false, false_begin)?;

        let end = Some(self.end_node(statement, true));
        self.connect(true_end, end, ControlFlowEdgeKind::Normal);
        if false_end.is_some() {
            self.connect(false_end, end, ControlFlowEdgeKind::Normal);
        } else if condition != Some(true) {
            self.connect(data, end, ControlFlowEdgeKind::ConditionFalse);
        }
        Ok(end)
    }

    fn visit_switch(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let tree = self.tree;
        let sections: Vec<NodeId> = tree.children_by_role(statement, Role::SwitchSection).collect();

        let constant = self.evaluate_constant(tree.child(statement, Role::Expression));
        let mut default_section = None;
        let mut matched_section = None;
        for &section in &sections {
            for label in tree.children_by_role(section, Role::CaseLabel) {
                let value = tree.child(label, Role::Expression);
                if value.is_null() {
                    default_section = Some(section);
                } else if let Some(constant) = &constant {
                    let matches = self
                        .evaluate_constant(value)
                        .is_some_and(|label_value| constant.matches(&label_value));
                    if matches {
                        matched_section = Some(section);
                    }
                }
            }
        }
        if constant.is_some() && matched_section.is_none() {
            matched_section = default_section;
        }

        let outer_gotos = self.goto_case_or_default.len();
        let mut section_starts: Vec<Option<CfgNodeId>> = Vec::with_capacity(sections.len());

        let end = self.end_node(statement, false);
        self.break_targets.push(end);
        for &section in &sections {
            let first_listed = self.order.len();
            let source = if constant.is_none() || matched_section == Some(section) {
                data
            } else {
                None
            };
            let statements = tree.children_by_role(section, Role::Statement).collect();
            self.statement_list(statements, source)?;
            section_starts.push(self.order.get(first_listed).copied());
        }
        self.break_targets.pop();
        if default_section.is_none() && matched_section.is_none() {
            self.connect(data, Some(end), ControlFlowEdgeKind::Normal);
        }

        let pending: Vec<CfgNodeId> = self.goto_case_or_default.drain(outer_gotos..).collect();
        for goto_node in pending {
            let goto_statement = self.graph.node(goto_node).next_statement;
            let goto_value = match tree.kind(goto_statement) {
                NodeKind::GotoCaseStatement => {
                    Some(self.evaluate_constant(tree.child(goto_statement, Role::Expression)))
                }
                _ => None,
            };
            let mut target = None;
            for (index, &section) in sections.iter().enumerate() {
                for label in tree.children_by_role(section, Role::CaseLabel) {
                    let value = tree.child(label, Role::Expression);
                    let hit = match &goto_value {
                        Some(goto_value) => {
                            !value.is_null()
                                && matches!(
                                    (goto_value, self.evaluate_constant(value)),
                                    (Some(a), Some(b)) if a.matches(&b)
                                )
                        }
                        None => value.is_null(),
                    };
                    if hit {
                        target = Some(index);
                    }
                }
            }
            let target = target
                .and_then(|index| section_starts[index])
                .unwrap_or(end);
            self.graph.connect(goto_node, target, ControlFlowEdgeKind::Jump);
        }

        self.order.push(end);
        Ok(Some(end))
    }

    fn visit_while(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let tree = self.tree;
        let end = self.end_node(statement, false);
        let condition_node = self.special_node(statement, ControlFlowNodeKind::LoopCondition, true);
        self.break_targets.push(end);
        self.continue_targets.push(condition_node);

        self.connect(data, Some(condition_node), ControlFlowEdgeKind::Normal);

        let condition = self.evaluate_condition(tree.child(statement, Role::Condition));
        let body = tree.child(statement, Role::EmbeddedStatement);
        let body_start = self.start_node(body);
        if condition != Some(false) {
            self.connect(Some(condition_node), body_start, ControlFlowEdgeKind::ConditionTrue);
        }
        let body_end = self.visit(body, body_start)?;
        self.connect(body_end, Some(condition_node), ControlFlowEdgeKind::Normal);
        if condition != Some(true) {
            self.graph
                .connect(condition_node, end, ControlFlowEdgeKind::ConditionFalse);
        }

        self.break_targets.pop();
        self.continue_targets.pop();
        self.order.push(end);
        Ok(Some(end))
    }

    fn visit_do_while(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let tree = self.tree;
        let end = self.end_node(statement, false);
        let condition_node = self.special_node(statement, ControlFlowNodeKind::LoopCondition, false);
        self.break_targets.push(end);
        self.continue_targets.push(condition_node);

        let body = tree.child(statement, Role::EmbeddedStatement);
        let body_start = self.start_node(body);
        self.connect(data, body_start, ControlFlowEdgeKind::Normal);
        let body_end = self.visit(body, body_start)?;
        self.connect(body_end, Some(condition_node), ControlFlowEdgeKind::Normal);

        let condition = self.evaluate_condition(tree.child(statement, Role::Condition));
        if condition != Some(false) {
            self.connect(Some(condition_node), body_start, ControlFlowEdgeKind::ConditionTrue);
        }
        if condition != Some(true) {
            self.graph
                .connect(condition_node, end, ControlFlowEdgeKind::ConditionFalse);
        }

        self.break_targets.pop();
        self.continue_targets.pop();
        self.order.push(condition_node);
        self.order.push(end);
        Ok(Some(end))
    }

    fn visit_for(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let tree = self.tree;
        let initializers = tree.children_by_role(statement, Role::ForInitializer).collect();
        let data = self.statement_list(initializers, data)?;

        let end = self.end_node(statement, false);
        let condition_node = self.special_node(statement, ControlFlowNodeKind::LoopCondition, true);
        self.connect(data, Some(condition_node), ControlFlowEdgeKind::Normal);

        let first_iterator = self.order.len();
        let iterators = tree.children_by_role(statement, Role::ForIterator).collect();
        let iterator_end = self.statement_list(iterators, None)?;
        let iterator_start = match iterator_end {
            Some(iterator_end) => {
                self.graph
                    .connect(iterator_end, condition_node, ControlFlowEdgeKind::Normal);
                self.order[first_iterator]
            }
            None => condition_node,
        };

        self.break_targets.push(end);
        self.continue_targets.push(iterator_start);

        let body = tree.child(statement, Role::EmbeddedStatement);
        let body_start = self.start_node(body);
        let body_end = self.visit(body, body_start)?;
        self.connect(body_end, Some(iterator_start), ControlFlowEdgeKind::Normal);

        self.break_targets.pop();
        self.continue_targets.pop();

        let condition = tree.child(statement, Role::Condition);
        let condition = if condition.is_null() {
            Some(true)
        } else {
            self.evaluate_condition(condition)
        };
        if condition != Some(false) {
            self.connect(Some(condition_node), body_start, ControlFlowEdgeKind::ConditionTrue);
        }
        if condition != Some(true) {
            self.graph
                .connect(condition_node, end, ControlFlowEdgeKind::ConditionFalse);
        }

        self.order.push(end);
        Ok(Some(end))
    }

    fn visit_foreach(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let end = self.end_node(statement, false);
        let condition_node = self.special_node(statement, ControlFlowNodeKind::LoopCondition, true);
        self.connect(data, Some(condition_node), ControlFlowEdgeKind::Normal);

        self.break_targets.push(end);
        self.continue_targets.push(condition_node);

        let body = self.tree.child(statement, Role::EmbeddedStatement);
        let body_end = self.embedded_statement(body, Some(condition_node))?;
        self.connect(body_end, Some(condition_node), ControlFlowEdgeKind::Normal);

        self.break_targets.pop();
        self.continue_targets.pop();

        self.graph.connect(condition_node, end, ControlFlowEdgeKind::Normal);
        self.order.push(end);
        Ok(Some(end))
    }

    fn visit_try_catch(&mut self, statement: NodeId, data: Option<CfgNodeId>) -> FlowResult<Option<CfgNodeId>> {
        let tree = self.tree;
        let finally_block = tree.child(statement, Role::FinallyBlock);
        let end = self.end_node(statement, false);

        let mut bodies = vec![tree.child(statement, Role::TryBlock)];
        bodies.extend(
            tree.children_by_role(statement, Role::CatchClause)
                .map(|clause| tree.child(clause, Role::Body)),
        );
        for body in bodies {
            let body_end = self.embedded_statement(body, data)?;
            let edge = self.connect(body_end, Some(end), ControlFlowEdgeKind::Normal);
            if !finally_block.is_null() {
                if let Some(edge) = edge {
                    self.graph.edge_mut(edge).try_finally_statements.push(statement);
                }
            }
        }
        if !finally_block.is_null() {
            // The end of the finally block stays unconnected.
            self.embedded_statement(finally_block, data)?;
        }

        self.order.push(end);
        Ok(Some(end))
    }

    // ------------------------------------------------------------------------
    // Post-passes
    // ------------------------------------------------------------------------

    fn resolve_gotos(&mut self) {
        let gotos = std::mem::take(&mut self.gotos);
        for goto_node in gotos {
            let label = self.tree.name(self.graph.node(goto_node).next_statement);
            if let Some(&target) = self.labels.get(label) {
                self.graph.connect(goto_node, target, ControlFlowEdgeKind::Jump);
            }
        }
    }

    /// Record the `try`/`finally` statements each jump leaves.
    fn annotate_leave_edges(&mut self, first_edge: usize) {
        let tree = self.tree;
        for index in first_edge..self.graph.edge_count() {
            let id = CfgEdgeId(index as u32);
            let edge = self.graph.edge(id);
            if edge.kind != ControlFlowEdgeKind::Jump {
                continue;
            }
            let jump = self.graph.node(edge.from).next_statement;
            let to = self.graph.node(edge.to);
            let target = if to.previous_statement.is_null() {
                to.next_statement
            } else {
                to.previous_statement
            };
            if tree.parent(jump) == tree.parent(target) {
                continue;
            }
            let target_tries: HashSet<NodeId> = tree
                .ancestors(target)
                .filter(|&n| matches!(tree.kind(n), NodeKind::TryCatchStatement))
                .collect();
            let mut left = Vec::new();
            for node in tree.ancestors(jump) {
                if !matches!(tree.kind(node), NodeKind::TryCatchStatement) {
                    continue;
                }
                if target_tries.contains(&node) {
                    break;
                }
                if tree.has_child(node, Role::FinallyBlock) {
                    left.push(node);
                }
            }
            self.graph.edge_mut(id).try_finally_statements.extend(left);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::{NoConstants, PrimitiveConstants};
    use csout_syntax::BinaryOperator;

    fn call(tree: &mut SyntaxTree, name: &str) -> NodeId {
        let target = tree.ident(name);
        let call = tree.invocation(target, vec![]);
        tree.expr_stmt(call)
    }

    fn build(tree: &SyntaxTree, root: NodeId) -> ControlFlowGraph {
        ControlFlowGraphBuilder::new()
            .build(tree, root, &NoConstants, &CancellationToken::none())
            .unwrap()
    }

    fn edge_kinds(graph: &ControlFlowGraph) -> Vec<ControlFlowEdgeKind> {
        graph.edges().map(|(_, e)| e.kind).collect()
    }

    #[test]
    fn test_sequence() {
        let mut tree = SyntaxTree::new();
        let a = call(&mut tree, "A");
        let b = call(&mut tree, "B");
        let block = tree.block(vec![a, b]);
        let graph = build(&tree, block);

        let kinds: Vec<_> = graph.nodes().map(|(_, n)| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ControlFlowNodeKind::StartNode,
                ControlFlowNodeKind::StartNode,
                ControlFlowNodeKind::BetweenStatements,
                ControlFlowNodeKind::EndNode,
                ControlFlowNodeKind::EndNode,
            ]
        );
        let between = graph.order()[2];
        assert_eq!(graph.node(between).previous_statement, a);
        assert_eq!(graph.node(between).next_statement, b);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_every_node_has_a_statement() {
        let mut tree = SyntaxTree::new();
        let x = tree.ident("x");
        let f = call(&mut tree, "F");
        let brk = tree.break_stmt();
        let body = tree.block(vec![f, brk]);
        let loop_stmt = tree.while_stmt(x, body);
        let ret = tree.return_stmt(NodeId::NULL);
        let block = tree.block(vec![loop_stmt, ret]);
        let graph = build(&tree, block);
        for (_, node) in graph.all_nodes() {
            assert!(!node.previous_statement.is_null() || !node.next_statement.is_null());
        }
        assert_eq!(graph.order().len(), graph.node_count());
    }

    #[test]
    fn test_constant_true_if_has_no_false_edge() {
        let mut tree = SyntaxTree::new();
        let t = tree.primitive(true);
        let a = call(&mut tree, "A");
        let b = call(&mut tree, "B");
        let stmt = tree.if_else(t, a, b);
        let graph = ControlFlowGraphBuilder::new()
            .build(&tree, stmt, &PrimitiveConstants, &CancellationToken::none())
            .unwrap();
        let kinds = edge_kinds(&graph);
        assert!(kinds.contains(&ControlFlowEdgeKind::ConditionTrue));
        assert!(!kinds.contains(&ControlFlowEdgeKind::ConditionFalse));

        let unfolded = build(&tree, stmt);
        assert!(edge_kinds(&unfolded).contains(&ControlFlowEdgeKind::ConditionFalse));
    }

    #[test]
    fn test_only_primitive_constants() {
        let mut tree = SyntaxTree::new();
        let one = tree.primitive(1);
        let two = tree.primitive(2);
        let less = tree.binary(BinaryOperator::LessThan, one, two);
        let a = call(&mut tree, "A");
        let stmt = tree.if_else(less, a, NodeId::NULL);
        let folded = ControlFlowGraphBuilder::new()
            .build(&tree, stmt, &PrimitiveConstants, &CancellationToken::none())
            .unwrap();
        assert!(!edge_kinds(&folded).contains(&ControlFlowEdgeKind::ConditionFalse));
        let literal_only = ControlFlowGraphBuilder::new()
            .evaluate_only_primitive_constants(true)
            .build(&tree, stmt, &PrimitiveConstants, &CancellationToken::none())
            .unwrap();
        assert!(edge_kinds(&literal_only).contains(&ControlFlowEdgeKind::ConditionFalse));
    }

    #[test]
    fn test_break_and_continue_jump_to_loop() {
        let mut tree = SyntaxTree::new();
        let x = tree.ident("x");
        let y = tree.ident("y");
        let brk = tree.break_stmt();
        let cont = tree.continue_stmt();
        let branch = tree.if_else(y, brk, cont);
        let body = tree.block(vec![branch]);
        let loop_stmt = tree.while_stmt(x, body);
        let graph = build(&tree, loop_stmt);

        let jumps: Vec<_> = graph
            .edges()
            .filter(|(_, e)| e.kind == ControlFlowEdgeKind::Jump)
            .map(|(_, e)| graph.node(e.to).kind)
            .collect();
        assert_eq!(
            jumps,
            vec![ControlFlowNodeKind::EndNode, ControlFlowNodeKind::LoopCondition]
        );
    }

    #[test]
    fn test_goto_connects_to_label() {
        let mut tree = SyntaxTree::new();
        let jump = tree.goto("done");
        let a = call(&mut tree, "A");
        let label = tree.label("done");
        let b = call(&mut tree, "B");
        let block = tree.block(vec![jump, a, label, b]);
        let graph = build(&tree, block);
        let (_, edge) = graph
            .edges()
            .find(|(_, e)| e.kind == ControlFlowEdgeKind::Jump)
            .unwrap();
        assert_eq!(graph.node(edge.from).next_statement, jump);
        assert_eq!(graph.node(edge.to).previous_statement, label);
        assert!(!edge.is_leaving_try_finally());
    }

    #[test]
    fn test_jump_out_of_try_finally_is_annotated() {
        let mut tree = SyntaxTree::new();
        let brk = tree.break_stmt();
        let try_block = tree.block(vec![brk]);
        let cleanup = call(&mut tree, "Cleanup");
        let finally_block = tree.block(vec![cleanup]);
        let try_stmt = tree.try_catch(try_block, vec![], finally_block);
        let body = tree.block(vec![try_stmt]);
        let t = tree.primitive(true);
        let loop_stmt = tree.while_stmt(t, body);
        let graph = build(&tree, loop_stmt);

        let (_, jump) = graph
            .edges()
            .find(|(_, e)| e.kind == ControlFlowEdgeKind::Jump)
            .unwrap();
        assert_eq!(jump.try_finally_statements, vec![try_stmt]);
        let leaving = graph
            .edges()
            .filter(|(_, e)| e.is_leaving_try_finally())
            .count();
        assert_eq!(leaving, 2);
    }

    #[test]
    fn test_return_end_node_is_unconnected() {
        let mut tree = SyntaxTree::new();
        let ret = tree.return_stmt(NodeId::NULL);
        let a = call(&mut tree, "A");
        let block = tree.block(vec![ret, a]);
        let graph = build(&tree, block);
        let (_, after_return) = graph
            .nodes()
            .find(|(_, n)| n.previous_statement == ret)
            .unwrap();
        assert!(after_return.incoming.is_empty());
    }

    #[test]
    fn test_switch_goto_case() {
        let mut tree = SyntaxTree::new();
        let x = tree.ident("x");
        let one = tree.primitive(1);
        let label_one = tree.case_label(one);
        let two = tree.primitive(2);
        let target_value = tree.primitive(2);
        let jump = tree.goto_case(target_value);
        let first = tree.switch_section(vec![label_one], vec![jump]);
        let label_two = tree.case_label(two);
        let a = call(&mut tree, "A");
        let brk = tree.break_stmt();
        let second = tree.switch_section(vec![label_two], vec![a, brk]);
        let switch = tree.switch(x, vec![first, second]);
        let graph = ControlFlowGraphBuilder::new()
            .build(&tree, switch, &PrimitiveConstants, &CancellationToken::none())
            .unwrap();

        let (_, edge) = graph
            .edges()
            .find(|(_, e)| graph.node(e.from).next_statement == jump)
            .unwrap();
        assert_eq!(edge.kind, ControlFlowEdgeKind::Jump);
        assert_eq!(graph.node(edge.to).next_statement, a);
    }

    #[test]
    fn test_unknown_statement_is_an_error() {
        let mut tree = SyntaxTree::new();
        let x = tree.ident("x");
        let result = ControlFlowGraphBuilder::new().build(
            &tree,
            x,
            &NoConstants,
            &CancellationToken::none(),
        );
        assert!(matches!(result, Err(FlowError::UnknownStatement { node, .. }) if node == x));
    }

    #[test]
    fn test_cancelled_build() {
        let mut tree = SyntaxTree::new();
        let statements = (0..200).map(|_| call(&mut tree, "F")).collect();
        let block = tree.block(statements);
        let token = CancellationToken::new();
        token.cancel();
        let result = ControlFlowGraphBuilder::new().build(&tree, block, &NoConstants, &token);
        assert_eq!(result.err(), Some(FlowError::Cancelled));
    }
}
