// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Graph construction and analyses over method-sized statement trees.

use std::collections::HashSet;

use csout_core::CancellationToken;
use csout_flow::{
    export_graph, CfgNodeId, ControlFlowEdgeKind, ControlFlowGraph, ControlFlowGraphBuilder,
    DefiniteAssignmentAnalysis, DefiniteAssignmentStatus, NoConstants, PrimitiveConstants,
    ReachabilityAnalysis,
};
use csout_syntax::{BinaryOperator, NodeId, SyntaxTree, UnaryOperator};
use itertools::Itertools;

fn none() -> CancellationToken {
    CancellationToken::none()
}

fn use_of(tree: &mut SyntaxTree, name: &str) -> NodeId {
    let target = tree.ident("Use");
    let argument = tree.ident(name);
    let call = tree.invocation(target, vec![argument]);
    tree.expr_stmt(call)
}

fn reachable_nodes(graph: &ControlFlowGraph) -> HashSet<CfgNodeId> {
    let mut seen = HashSet::new();
    let mut stack: Vec<CfgNodeId> = graph.entry().into_iter().collect();
    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            stack.extend(graph.node(id).outgoing.iter().map(|&e| graph.edge(e).to));
        }
    }
    seen
}

/// Statements of a method exercising every statement kind the builder knows.
struct Method {
    tree: SyntaxTree,
    body: NodeId,
    for_stmt: NodeId,
    foreach_read: NodeId,
    label: NodeId,
}

fn build_method() -> Method {
    let mut tree = SyntaxTree::new();

    let int = tree.primitive_type("int");
    let zero = tree.primitive(0);
    let local = tree.local(int, "i", zero);

    // for (int j = 0; j < 10; j++) { if (j == 5) continue; Use(j); }
    let int = tree.primitive_type("int");
    let zero = tree.primitive(0);
    let init = tree.local(int, "j", zero);
    let j = tree.ident("j");
    let ten = tree.primitive(10);
    let condition = tree.binary(BinaryOperator::LessThan, j, ten);
    let j = tree.ident("j");
    let step = tree.unary(UnaryOperator::PostIncrement, j);
    let step = tree.expr_stmt(step);
    let j = tree.ident("j");
    let five = tree.primitive(5);
    let is_five = tree.binary(BinaryOperator::Equality, j, five);
    let cont = tree.continue_stmt();
    let skip = tree.if_else(is_five, cont, NodeId::NULL);
    let read_j = use_of(&mut tree, "j");
    let for_body = tree.block(vec![skip, read_j]);
    let for_stmt = tree.for_stmt(vec![init], condition, vec![step], for_body);

    // foreach (var item in items) { Use(item); }
    let var = tree.simple_type("var", vec![]);
    let items = tree.ident("items");
    let foreach_read = use_of(&mut tree, "item");
    let foreach_body = tree.block(vec![foreach_read]);
    let foreach = tree.foreach(var, "item", items, foreach_body);

    // switch (i) { case 0: Use(i); break; default: goto case 0; }
    let i = tree.ident("i");
    let zero = tree.primitive(0);
    let case_zero = tree.case_label(zero);
    let read_i = use_of(&mut tree, "i");
    let brk = tree.break_stmt();
    let first = tree.switch_section(vec![case_zero], vec![read_i, brk]);
    let default = tree.case_label(NodeId::NULL);
    let zero = tree.primitive(0);
    let jump = tree.goto_case(zero);
    let second = tree.switch_section(vec![default], vec![jump]);
    let switch = tree.switch(i, vec![first, second]);

    // try { lock (gate) { Use(i); } } catch (Exception e) { throw; } finally { Use(gate); }
    let gate = tree.ident("gate");
    let read_i = use_of(&mut tree, "i");
    let locked = tree.block(vec![read_i]);
    let lock = tree.lock_stmt(gate, locked);
    let try_block = tree.block(vec![lock]);
    let exception = tree.simple_type("Exception", vec![]);
    let rethrow = tree.throw_stmt(NodeId::NULL);
    let catch_body = tree.block(vec![rethrow]);
    let catch = tree.catch_clause(exception, Some("e"), catch_body);
    let cleanup = use_of(&mut tree, "gate");
    let finally_block = tree.block(vec![cleanup]);
    let try_stmt = tree.try_catch(try_block, vec![catch], finally_block);

    // using (r) { yield return i; }
    let r = tree.ident("r");
    let i = tree.ident("i");
    let yielded = tree.yield_return(i);
    let using_body = tree.block(vec![yielded]);
    let using = tree.using_stmt(r, using_body);

    let label = tree.label("done");
    let read_i = use_of(&mut tree, "i");
    let ret = tree.return_stmt(NodeId::NULL);

    let body = tree.block(vec![
        local, for_stmt, foreach, switch, try_stmt, using, label, read_i, ret,
    ]);
    Method {
        tree,
        body,
        for_stmt,
        foreach_read,
        label,
    }
}

#[test]
fn every_statement_has_a_control_point() {
    let method = build_method();
    let tree = &method.tree;
    let graph = ControlFlowGraphBuilder::new()
        .build(tree, method.body, &NoConstants, &none())
        .unwrap();

    let mut covered = HashSet::new();
    for (_, node) in graph.all_nodes() {
        assert!(!node.previous_statement.is_null() || !node.next_statement.is_null());
        covered.insert(node.previous_statement);
        covered.insert(node.next_statement);
    }
    for statement in tree.descendants(method.body) {
        if tree.kind(statement).is_statement() {
            assert!(
                covered.contains(&statement),
                "{} has no control point",
                tree.kind(statement).name()
            );
        }
    }
    assert_eq!(graph.order().len(), graph.node_count());
}

#[test]
fn jumps_are_the_only_blue_edges() {
    let method = build_method();
    let graph = ControlFlowGraphBuilder::new()
        .build(&method.tree, method.body, &NoConstants, &none())
        .unwrap();

    let counts = graph.edges().map(|(_, edge)| edge.kind).counts();
    // continue, break, goto case
    assert_eq!(counts[&ControlFlowEdgeKind::Jump], 3);

    let dot = export_graph(&method.tree, &graph);
    assert_eq!(dot.matches("color=blue").count(), 3);
    assert!(dot.contains("style=dashed"));
}

#[test]
fn terminal_statements_end_their_paths() {
    // { if (c) return; throw e; }
    let mut tree = SyntaxTree::new();
    let c = tree.ident("c");
    let ret = tree.return_stmt(NodeId::NULL);
    let branch = tree.if_else(c, ret, NodeId::NULL);
    let e = tree.ident("e");
    let throw = tree.throw_stmt(e);
    let body = tree.block(vec![branch, throw]);
    let graph = ControlFlowGraphBuilder::new()
        .build(&tree, body, &NoConstants, &none())
        .unwrap();

    let reachable = reachable_nodes(&graph);
    let dead_ends = reachable
        .iter()
        .filter(|&&id| graph.node(id).outgoing.is_empty())
        .count();
    assert_eq!(dead_ends, 2);

    let analysis = ReachabilityAnalysis::create(&tree, &graph, None, &none()).unwrap();
    assert!(analysis.is_reachable(throw));
    assert!(!analysis.is_endpoint_reachable(body));
}

#[test]
fn reachability_over_a_method() {
    let method = build_method();
    let graph = ControlFlowGraphBuilder::new()
        .build(&method.tree, method.body, &NoConstants, &none())
        .unwrap();
    let analysis = ReachabilityAnalysis::create(&method.tree, &graph, None, &none()).unwrap();
    assert!(analysis.is_reachable(method.label));
    assert!(analysis.is_reachable(method.foreach_read));
    assert!(!analysis.is_endpoint_reachable(method.body));
    assert!(analysis.reachable_statements().count() > 10);
}

#[test]
fn loop_variables_are_assigned() {
    let method = build_method();
    let mut analysis =
        DefiniteAssignmentAnalysis::new(&method.tree, method.body, &PrimitiveConstants, &none())
            .unwrap();

    analysis
        .analyze("item", DefiniteAssignmentStatus::PotentiallyAssigned, &none())
        .unwrap();
    assert_eq!(
        analysis.status_before(method.foreach_read).unwrap(),
        DefiniteAssignmentStatus::DefinitelyAssigned
    );

    analysis
        .analyze("j", DefiniteAssignmentStatus::PotentiallyAssigned, &none())
        .unwrap();
    assert_eq!(
        analysis.status_before_loop_condition(method.for_stmt).unwrap(),
        DefiniteAssignmentStatus::DefinitelyAssigned
    );
    assert!(analysis.unassigned_variable_uses().is_empty());
}
