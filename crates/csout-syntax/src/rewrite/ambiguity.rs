// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolving the generic/comparison ambiguity.
//!
//! A `<` followed later by a `>` and an opening parenthesis reads as a generic
//! method call: `a < b > (c)` is parsed as `a<b>(c)`, and so is
//! `F(a < b, c > (d))`. [`resolve_ambiguities`] finds every less-than
//! comparison that would be read this way and parenthesizes it, producing
//! `(a < b) > (c)`.
//!
//! # How It Works
//!
//! Starting after the `<`, the walk follows the tokens that would keep a
//! type-argument list open (identifiers, member accesses, further `<`, `>`
//! and `>>`) and tracks the nesting level. Commas between siblings keep the
//! list open too. When the level drops to zero the expression is ambiguous
//! exactly if the next operand is parenthesized. Any other expression ends the
//! walk.

use tracing::debug;

use crate::ast::{BinaryOperator, NodeId, NodeKind, Role, SyntaxTree};

use super::parens::parenthesize;

/// Tracks the open type-argument nesting after a `<`.
struct AmbiguityWalk<'t> {
    tree: &'t SyntaxTree,
    level: u32,
}

impl AmbiguityWalk<'_> {
    /// Follow `node`. Returns `true` once the walk is finished; `ambiguous`
    /// then holds the answer.
    fn visit(&mut self, node: NodeId, ambiguous: &mut bool) -> bool {
        match self.tree.kind(node) {
            NodeKind::IdentifierExpression | NodeKind::TypeReferenceExpression => false,
            NodeKind::MemberReferenceExpression => {
                let target = self.tree.child(node, Role::Target);
                self.visit(target, ambiguous)
            }
            NodeKind::BinaryOperatorExpression { operator } => {
                let left = self.tree.child(node, Role::Left);
                if self.visit(left, ambiguous) {
                    return true;
                }
                let right = self.tree.child(node, Role::Right);
                self.apply(*operator, right, ambiguous)
            }
            _ => true,
        }
    }

    /// Apply `operator`, then continue with its right operand.
    fn apply(&mut self, operator: BinaryOperator, right: NodeId, ambiguous: &mut bool) -> bool {
        match operator {
            BinaryOperator::LessThan => self.level += 1,
            BinaryOperator::GreaterThan => match self.level.checked_sub(1) {
                Some(level) => self.level = level,
                None => return true,
            },
            BinaryOperator::ShiftRight if self.level >= 2 => self.level -= 2,
            _ => return true,
        }
        if self.level == 0 {
            *ambiguous = matches!(self.tree.kind(right), NodeKind::ParenthesizedExpression);
            return true;
        }
        self.visit(right, ambiguous)
    }

    /// The next sibling that renders as an expression, skipping tokens and
    /// comments.
    fn next_operand(&self, node: NodeId) -> Option<NodeId> {
        let mut next = self.tree.next_sibling(node);
        while let Some(candidate) = next {
            let kind = self.tree.kind(candidate);
            let skipped = matches!(kind, NodeKind::Token | NodeKind::ModifierToken { .. })
                || kind.is_special();
            if !skipped {
                return Some(candidate);
            }
            next = self.tree.next_sibling(candidate);
        }
        None
    }
}

/// Whether the `<` comparison `less_than` would read as the start of a
/// type-argument list followed by a call.
pub fn is_ambiguous(tree: &SyntaxTree, less_than: NodeId) -> bool {
    let mut walk = AmbiguityWalk { tree, level: 1 };
    let mut ambiguous = false;
    let right = tree.child(less_than, Role::Right);
    if walk.visit(right, &mut ambiguous) {
        return ambiguous;
    }
    let mut current = less_than;
    loop {
        let parent = tree.parent(current);
        let parent_operator = parent.and_then(|p| match tree.kind(p) {
            NodeKind::BinaryOperatorExpression { operator } => Some(*operator),
            _ => None,
        });
        if let (Some(parent), Some(operator), Role::Left) =
            (parent, parent_operator, tree.role(current))
        {
            let right = tree.child(parent, Role::Right);
            if walk.apply(operator, right, &mut ambiguous) {
                return ambiguous;
            }
            current = parent;
        } else if let Some(next) = walk.next_operand(current) {
            if walk.visit(next, &mut ambiguous) {
                return ambiguous;
            }
            current = next;
        } else {
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

/// Parenthesize every ambiguous `<` comparison below `root` and return how
/// many were wrapped. `root` itself is never wrapped, and neither is a
/// comparison that already sits in parentheses. Runs after
/// [`insert_parentheses`](super::parens::insert_parentheses): a comparison
/// nested to the right is grouped by precedence, not here.
pub fn resolve_ambiguities(tree: &mut SyntaxTree, root: NodeId) -> usize {
    let ambiguous: Vec<NodeId> = tree
        .descendants(root)
        .into_iter()
        .filter(|&node| {
            matches!(
                tree.kind(node),
                NodeKind::BinaryOperatorExpression {
                    operator: BinaryOperator::LessThan
                }
            )
        })
        .filter(|&node| {
            tree.parent(node).is_none_or(|parent| {
                !matches!(tree.kind(parent), NodeKind::ParenthesizedExpression)
            })
        })
        .filter(|&node| is_ambiguous(tree, node))
        .collect();
    for &node in &ambiguous {
        parenthesize(tree, node);
    }
    debug!(wrapped = ambiguous.len(), "resolved generic ambiguities");
    ambiguous.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{render_to_string, FormattingOptions};
    use crate::rewrite::parens::insert_parentheses;

    fn render(tree: &SyntaxTree, node: NodeId) -> String {
        render_to_string(tree, node, &FormattingOptions::default()).unwrap()
    }

    #[test]
    fn test_comparison_chain_followed_by_parens() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let less = tree.binary(BinaryOperator::LessThan, a, b);
        let c = tree.ident("c");
        let paren = tree.paren(c);
        let greater = tree.binary(BinaryOperator::GreaterThan, less, paren);
        let stmt = tree.expr_stmt(greater);
        assert!(is_ambiguous(&tree, less));
        assert_eq!(resolve_ambiguities(&mut tree, stmt), 1);
        assert_eq!(render(&tree, greater), "(a < b) > (c)");
    }

    #[test]
    fn test_comparisons_in_argument_list() {
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
        let stmt = tree.expr_stmt(call);
        assert_eq!(resolve_ambiguities(&mut tree, stmt), 1);
        assert_eq!(render(&tree, call), "F((a < b), c > (d))");
    }

    #[test]
    fn test_second_run_wraps_nothing() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let less = tree.binary(BinaryOperator::LessThan, a, b);
        let c = tree.ident("c");
        let paren = tree.paren(c);
        let greater = tree.binary(BinaryOperator::GreaterThan, less, paren);
        let stmt = tree.expr_stmt(greater);
        assert_eq!(resolve_ambiguities(&mut tree, stmt), 1);
        assert_eq!(resolve_ambiguities(&mut tree, stmt), 0);
        assert_eq!(render(&tree, greater), "(a < b) > (c)");
    }

    #[test]
    fn test_right_nested_comparison_is_grouped_by_precedence() {
        // a < b > (c) with the `>` below the `<`
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let c = tree.ident("c");
        let paren = tree.paren(c);
        let greater = tree.binary(BinaryOperator::GreaterThan, b, paren);
        let less = tree.binary(BinaryOperator::LessThan, a, greater);
        let stmt = tree.expr_stmt(less);
        assert!(is_ambiguous(&tree, less));
        assert_eq!(render(&tree, less), "a < b > (c)");

        assert_eq!(insert_parentheses(&mut tree, stmt, false), 1);
        assert!(!is_ambiguous(&tree, less));
        assert_eq!(resolve_ambiguities(&mut tree, stmt), 0);
        assert_eq!(render(&tree, less), "a < (b > (c))");
    }

    #[test]
    fn test_unparenthesized_right_side_is_fine() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let less = tree.binary(BinaryOperator::LessThan, a, b);
        let c = tree.ident("c");
        let d = tree.ident("d");
        let greater = tree.binary(BinaryOperator::GreaterThan, c, d);
        let target = tree.ident("F");
        let call = tree.invocation(target, vec![less, greater]);
        let stmt = tree.expr_stmt(call);
        assert_eq!(resolve_ambiguities(&mut tree, stmt), 0);
        assert_eq!(render(&tree, call), "F(a < b, c > d)");
    }

    #[test]
    fn test_literal_stops_the_walk() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let one = tree.primitive(1);
        let less = tree.binary(BinaryOperator::LessThan, a, one);
        let c = tree.ident("c");
        let paren = tree.paren(c);
        let greater = tree.binary(BinaryOperator::GreaterThan, less, paren);
        let stmt = tree.expr_stmt(greater);
        assert!(!is_ambiguous(&tree, less));
        assert_eq!(resolve_ambiguities(&mut tree, stmt), 0);
    }
}
