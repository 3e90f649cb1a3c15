// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! End-to-end: build a tree, prepare and render it, analyze it.

use csout::flow::ControlFlowEdgeKind;
use csout::{
    prepare_tree, render, render_with_locations, BinaryOperator, CancellationToken,
    ControlFlowGraphBuilder, Error, FormattingOptions, NodeId, PrimitiveConstants,
    ReachabilityAnalysis, RecordedEvents, SyntaxTree, UnaryOperator,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `name();`
fn call_stmt(tree: &mut SyntaxTree, name: &str) -> NodeId {
    let target = tree.ident(name);
    let call = tree.invocation(target, vec![]);
    tree.expr_stmt(call)
}

/// `2 * (a + 1)` without the parentheses node.
fn product(tree: &mut SyntaxTree) -> (NodeId, NodeId) {
    let a = tree.ident("a");
    let one = tree.primitive(1);
    let sum = tree.binary(BinaryOperator::Add, a, one);
    let two = tree.primitive(2);
    (tree.binary(BinaryOperator::Multiply, two, sum), a)
}

#[test]
fn precedence_is_restored_before_rendering() {
    init_logging();
    let mut tree = SyntaxTree::new();
    let (root, _) = product(&mut tree);
    let text = render(&mut tree, root, &FormattingOptions::default()).unwrap();
    assert_eq!(text, "2 * (a + 1)");
}

#[test]
fn negative_literal_after_minus_is_not_a_decrement() {
    init_logging();
    let mut tree = SyntaxTree::new();
    let minus_one = tree.primitive(-1);
    let negated = tree.unary(UnaryOperator::Minus, minus_one);
    let text = render(&mut tree, negated, &FormattingOptions::default()).unwrap();
    assert_eq!(text, "- -1");

    let a = tree.ident("a");
    let minus_one = tree.primitive(-1);
    let difference = tree.binary(BinaryOperator::Subtract, a, minus_one);
    let tight = FormattingOptions {
        space_around_binary_operators: false,
        ..FormattingOptions::default()
    };
    let text = render(&mut tree, difference, &tight).unwrap();
    assert_eq!(text, "a- -1");
}

#[test]
fn comparison_chains_do_not_read_as_generics() {
    init_logging();
    let mut tree = SyntaxTree::new();
    let a = tree.ident("a");
    let b = tree.ident("b");
    let less = tree.binary(BinaryOperator::LessThan, a, b);
    let c = tree.ident("c");
    let d = tree.ident("d");
    let paren = tree.paren(d);
    let greater = tree.binary(BinaryOperator::GreaterThan, c, paren);
    let target = tree.ident("F");
    let call = tree.invocation(target, vec![less, greater]);

    let prepared = prepare_tree(&mut tree, call, &FormattingOptions::default());
    assert_eq!(prepared.parentheses_inserted, 0);
    assert_eq!(prepared.ambiguities_resolved, 1);
    let text = render(&mut tree, call, &FormattingOptions::default()).unwrap();
    assert_eq!(text, "F((a < b), c > (d))");
}

#[test]
fn right_nested_comparison_is_grouped_by_precedence() {
    // a < b > (c), nested to the right
    let mut tree = SyntaxTree::new();
    let a = tree.ident("a");
    let b = tree.ident("b");
    let c = tree.ident("c");
    let paren = tree.paren(c);
    let greater = tree.binary(BinaryOperator::GreaterThan, b, paren);
    let less = tree.binary(BinaryOperator::LessThan, a, greater);

    let text = render(&mut tree, less, &FormattingOptions::default()).unwrap();
    assert_eq!(text, "a < (b > (c))");
}

#[test]
fn constant_condition_folds_only_in_the_graph() {
    init_logging();
    // if (true) { F(); } else { G(); }
    let mut tree = SyntaxTree::new();
    let condition = tree.primitive(true);
    let f = call_stmt(&mut tree, "F");
    let then_block = tree.block(vec![f]);
    let g = call_stmt(&mut tree, "G");
    let else_block = tree.block(vec![g]);
    let stmt = tree.if_else(condition, then_block, else_block);

    let options = FormattingOptions::allman();
    let expected = "if (true)\n{\n\tF();\n}\nelse\n{\n\tG();\n}\n";
    assert_eq!(render(&mut tree, stmt, &options).unwrap(), expected);

    let cancel = CancellationToken::none();
    let graph = ControlFlowGraphBuilder::new()
        .build(&tree, stmt, &PrimitiveConstants, &cancel)
        .unwrap();
    assert!(graph
        .edges()
        .all(|(_, edge)| edge.kind != ControlFlowEdgeKind::ConditionFalse));
    let reachability = ReachabilityAnalysis::create(&tree, &graph, None, &cancel).unwrap();
    assert!(reachability.is_reachable(f));
    assert!(!reachability.is_reachable(g));

    assert_eq!(render(&mut tree, stmt, &options).unwrap(), expected);
}

#[test]
fn locations_point_into_the_rendered_text() {
    init_logging();
    let mut tree = SyntaxTree::new();
    let (root, a) = product(&mut tree);
    let text = render_with_locations(
        &mut tree,
        root,
        &FormattingOptions::default(),
        &mut RecordedEvents::new(),
        &CancellationToken::none(),
    )
    .unwrap();
    let range = tree.locations().range_of(a).unwrap();
    assert_eq!(&text[range.start.offset..range.end.offset], "a");

    let whole = tree.locations().range_of(root).unwrap();
    assert_eq!(whole.start.offset, 0);
    assert_eq!(whole.end.offset, text.len());
}

#[test]
fn cancelled_render_reports_cancellation() {
    let mut tree = SyntaxTree::new();
    let (root, _) = product(&mut tree);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = render_with_locations(
        &mut tree,
        root,
        &FormattingOptions::default(),
        &mut RecordedEvents::new(),
        &cancel,
    )
    .unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn bad_options_file_is_an_options_error() {
    let err: Error = FormattingOptions::from_json_str("{ not json")
        .unwrap_err()
        .into();
    assert!(matches!(err, Error::Options(_)));
    assert!(err.to_string().starts_with("invalid formatting options"));
}
