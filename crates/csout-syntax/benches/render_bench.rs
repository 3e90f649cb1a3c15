// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Performance benchmarks for rendering and the rewrite passes.
//!
//! Run with:
//! ```bash
//! cargo bench -p csout-syntax
//! ```
//!
//! # Benchmark Categories
//!
//! 1. **Render**: plain text rendering of generated classes
//! 2. **Tracking**: rendering that writes tokens and locations back
//! 3. **Rewrite**: the parenthesization pass on deep operator chains

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use csout_core::CancellationToken;
use csout_syntax::ast::ClassType;
use csout_syntax::rewrite::insert_parentheses;
use csout_syntax::{
    render_to_string, render_tracking_locations, BinaryOperator, FormattingOptions, Modifiers,
    NodeId, NoEvents, SyntaxTree,
};
use std::hint::black_box;

// =============================================================================
// Test Data Generation
// =============================================================================

/// A class with `num_methods` methods, each holding a loop and a branch.
fn generate_class(tree: &mut SyntaxTree, num_methods: usize) -> NodeId {
    let methods = (0..num_methods)
        .map(|i| {
            let int = tree.primitive_type("int");
            let zero = tree.primitive(0);
            let local = tree.local(int, "total", zero);

            let total = tree.ident("total");
            let item = tree.ident("item");
            let add = tree.assign(csout_syntax::AssignmentOperator::Add, total, item);
            let add = tree.expr_stmt(add);
            let body = tree.block(vec![add]);
            let var = tree.simple_type("var", vec![]);
            let items = tree.ident("items");
            let loop_stmt = tree.foreach(var, "item", items, body);

            let total = tree.ident("total");
            let limit = tree.primitive(i as i32);
            let over = tree.binary(BinaryOperator::GreaterThan, total, limit);
            let zero = tree.primitive(0);
            let early = tree.return_stmt(zero);
            let branch = tree.if_else(over, early, NodeId::NULL);

            let total = tree.ident("total");
            let ret = tree.return_stmt(total);
            let body = tree.block(vec![local, loop_stmt, branch, ret]);
            let int = tree.primitive_type("int");
            let items_type = tree.simple_type("IEnumerable", vec![int]);
            let parameter = tree.param(items_type, "items");
            let int = tree.primitive_type("int");
            tree.method(
                Modifiers::PUBLIC,
                int,
                &format!("Sum{}", i),
                vec![parameter],
                body,
            )
        })
        .collect();
    tree.type_decl(ClassType::Class, Modifiers::PUBLIC, "Generated", vec![], methods)
}

/// `x0 - (x1 - (x2 - ...))`, which needs a pair of parentheses per level.
fn generate_chain(tree: &mut SyntaxTree, depth: usize) -> NodeId {
    let mut expression = tree.ident("last");
    for i in 0..depth {
        let name = tree.ident(&format!("x{}", i));
        expression = tree.binary(BinaryOperator::Subtract, name, expression);
    }
    tree.expr_stmt(expression)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let options = FormattingOptions::default();
    for size in [10, 100, 1000] {
        let mut tree = SyntaxTree::new();
        let class = generate_class(&mut tree, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &class, |b, &class| {
            b.iter(|| render_to_string(black_box(&tree), class, &options))
        });
    }
    group.finish();
}

fn bench_render_tracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_tracking");
    let options = FormattingOptions::default();
    for size in [10, 100] {
        let mut tree = SyntaxTree::new();
        let class = generate_class(&mut tree, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &class, |b, &class| {
            b.iter(|| {
                let mut tree = tree.clone();
                render_tracking_locations(
                    &mut tree,
                    class,
                    &options,
                    &mut NoEvents,
                    &CancellationToken::none(),
                )
            })
        });
    }
    group.finish();
}

fn bench_insert_parentheses(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_parentheses");
    for depth in [10, 100, 1000] {
        let mut tree = SyntaxTree::new();
        let stmt = generate_chain(&mut tree, depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &stmt, |b, &stmt| {
            b.iter(|| {
                let mut tree = tree.clone();
                insert_parentheses(&mut tree, stmt, false)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_render_tracking,
    bench_insert_parentheses
);
criterion_main!(benches);
