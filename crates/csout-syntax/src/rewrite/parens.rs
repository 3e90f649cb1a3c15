// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Inserting the parentheses an expression tree needs to render correctly.
//!
//! A tree built programmatically carries its structure in the nesting of
//! nodes, not in parentheses. [`InsertParentheses`] walks the tree and wraps
//! every operand whose precedence is lower than its position requires in a
//! `ParenthesizedExpression`, so that reading the rendered text back gives the
//! same tree.
//!
//! # Special Cases
//!
//! - Casts of casts are never wrapped: `(int)(long)x`
//! - A unary operand of a cast to a type that reads like an expression is
//!   wrapped: `(A)(-b)`, since `(A)-b` is a subtraction. The same holds for
//!   negative literals. Only `!` is exempt.
//! - `??` is right-associative: its left operand needs a strictly higher level.
//! - Lambdas and queries extend as far right as possible, so they are wrapped
//!   as the left operand of a binary operator and as the operand of `is`/`as`.
//! - `new int[1][0]` means something else than `(new int[1])[0]`.
//!
//! # Readability Mode
//!
//! With `readability` set, parentheses are also added where the grammar does
//! not need them but readers benefit: around `is`/`as` operands, around the
//! parts of `?:`, around the right side of assignments, and around the
//! operands of a binary operator whose left side uses a different operator
//! (`(a & b) | c`, `(a | b) && c`).

use tracing::debug;

use crate::ast::{BinaryOperator, NodeId, NodeKind, Role, SyntaxTree, UnaryOperator};

/// Operator precedence, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Assignment = 1,
    Conditional = 2,
    NullCoalescing = 3,
    ConditionalOr = 4,
    ConditionalAnd = 5,
    BitwiseOr = 6,
    ExclusiveOr = 7,
    BitwiseAnd = 8,
    Equality = 9,
    RelationalAndTypeTesting = 10,
    Shift = 11,
    Additive = 12,
    Multiplicative = 13,
    Unary = 14,
    QueryOrLambda = 15,
    NullableRewrap = 16,
    Primary = 17,
}

impl Precedence {
    /// The next tighter level; `Primary` stays `Primary`.
    pub fn tighter(self) -> Precedence {
        use Precedence::*;
        match self {
            Assignment => Conditional,
            Conditional => NullCoalescing,
            NullCoalescing => ConditionalOr,
            ConditionalOr => ConditionalAnd,
            ConditionalAnd => BitwiseOr,
            BitwiseOr => ExclusiveOr,
            ExclusiveOr => BitwiseAnd,
            BitwiseAnd => Equality,
            Equality => RelationalAndTypeTesting,
            RelationalAndTypeTesting => Shift,
            Shift => Additive,
            Additive => Multiplicative,
            Multiplicative => Unary,
            Unary => QueryOrLambda,
            QueryOrLambda => NullableRewrap,
            NullableRewrap | Primary => Primary,
        }
    }

    pub fn of_binary(operator: BinaryOperator) -> Precedence {
        match operator {
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulus => {
                Precedence::Multiplicative
            }
            BinaryOperator::Add | BinaryOperator::Subtract => Precedence::Additive,
            BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => Precedence::Shift,
            BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual => Precedence::RelationalAndTypeTesting,
            BinaryOperator::Equality | BinaryOperator::InEquality => Precedence::Equality,
            BinaryOperator::BitwiseAnd => Precedence::BitwiseAnd,
            BinaryOperator::ExclusiveOr => Precedence::ExclusiveOr,
            BinaryOperator::BitwiseOr => Precedence::BitwiseOr,
            BinaryOperator::ConditionalAnd => Precedence::ConditionalAnd,
            BinaryOperator::ConditionalOr => Precedence::ConditionalOr,
            BinaryOperator::NullCoalescing => Precedence::NullCoalescing,
        }
    }
}

/// The precedence `node` binds with when rendered as is.
pub fn precedence(tree: &SyntaxTree, node: NodeId) -> Precedence {
    match tree.kind(node) {
        // the start of a query binds tighter than unary operators
        NodeKind::QueryExpression => Precedence::QueryOrLambda,
        NodeKind::UnaryOperatorExpression { operator } => match operator {
            UnaryOperator::PostIncrement
            | UnaryOperator::PostDecrement
            | UnaryOperator::NullConditional => Precedence::Primary,
            UnaryOperator::NullConditionalRewrap => Precedence::NullableRewrap,
            _ => Precedence::Unary,
        },
        NodeKind::CastExpression => Precedence::Unary,
        NodeKind::PrimitiveExpression { value } if value.is_negative() => Precedence::Unary,
        NodeKind::BinaryOperatorExpression { operator } => Precedence::of_binary(*operator),
        NodeKind::IsExpression | NodeKind::AsExpression => Precedence::RelationalAndTypeTesting,
        NodeKind::ConditionalExpression | NodeKind::DirectionExpression { .. } => {
            Precedence::Conditional
        }
        NodeKind::AssignmentExpression { .. } | NodeKind::LambdaExpression { .. } => {
            Precedence::Assignment
        }
        _ => Precedence::Primary,
    }
}

fn binary_operator(tree: &SyntaxTree, node: NodeId) -> Option<BinaryOperator> {
    match tree.kind(node) {
        NodeKind::BinaryOperatorExpression { operator } => Some(*operator),
        _ => None,
    }
}

/// A simple or non-`::` member type: `(A)-b` and `(A.B)-b` read as
/// subtractions.
fn type_reads_as_expression(tree: &SyntaxTree, ty: NodeId) -> bool {
    match tree.kind(ty) {
        NodeKind::MemberType { double_colon } => !double_colon,
        NodeKind::SimpleType => true,
        _ => false,
    }
}

/// Wrap `node` in a new `ParenthesizedExpression` in its current position.
pub(crate) fn parenthesize(tree: &mut SyntaxTree, node: NodeId) -> NodeId {
    tree.replace_with(node, |tree, inner| {
        let paren = tree.alloc(NodeKind::ParenthesizedExpression);
        tree.add_child(paren, Role::Expression, inner);
        paren
    })
}

/// The parenthesization pass.
#[derive(Debug, Clone, Default)]
pub struct InsertParentheses {
    readability: bool,
    inserted: usize,
}

impl InsertParentheses {
    pub fn new(readability: bool) -> Self {
        InsertParentheses {
            readability,
            inserted: 0,
        }
    }

    /// Parenthesize everything below `root` and return the number of
    /// parentheses pairs added. `root` itself is never wrapped.
    pub fn run(mut self, tree: &mut SyntaxTree, root: NodeId) -> usize {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            self.visit(tree, node, node == root);
            let start = stack.len();
            stack.extend(tree.children(node));
            stack[start..].reverse();
        }
        debug!(
            inserted = self.inserted,
            readability = self.readability,
            "inserted parentheses"
        );
        self.inserted
    }

    fn wrap(&mut self, tree: &mut SyntaxTree, node: NodeId) {
        if node.is_null() {
            return;
        }
        parenthesize(tree, node);
        self.inserted += 1;
    }

    fn wrap_if_below(&mut self, tree: &mut SyntaxTree, node: NodeId, minimum: Precedence) {
        if !node.is_null() && precedence(tree, node) < minimum {
            self.wrap(tree, node);
        }
    }

    fn assignment_value(&mut self, tree: &mut SyntaxTree, value: NodeId) {
        let direction = matches!(tree.kind(value), NodeKind::DirectionExpression { .. });
        if self.readability && !direction {
            self.wrap_if_below(tree, value, Precedence::NullableRewrap);
        } else {
            self.wrap_if_below(tree, value, Precedence::Assignment);
        }
    }

    /// Handle `node` itself; its children are visited afterwards.
    fn visit(&mut self, tree: &mut SyntaxTree, node: NodeId, is_root: bool) {
        match *tree.kind(node) {
            NodeKind::MemberReferenceExpression | NodeKind::InvocationExpression => {
                let target = tree.child(node, Role::Target);
                self.wrap_if_below(tree, target, Precedence::Primary);
            }
            NodeKind::IndexerExpression => {
                let target = tree.child(node, Role::Target);
                self.wrap_if_below(tree, target, Precedence::Primary);
                let target = tree.child(node, Role::Target);
                let bare_array_creation = matches!(tree.kind(target), NodeKind::ArrayCreateExpression)
                    && (self.readability || tree.child(target, Role::Initializer).is_null());
                if bare_array_creation {
                    self.wrap(tree, target);
                }
            }
            NodeKind::UnaryOperatorExpression { .. } => {
                let operand = tree.child(node, Role::Expression);
                if !matches!(tree.kind(operand), NodeKind::CastExpression) {
                    let minimum = if self.readability {
                        Precedence::NullableRewrap
                    } else {
                        precedence(tree, node)
                    };
                    self.wrap_if_below(tree, operand, minimum);
                }
            }
            NodeKind::CastExpression => self.visit_cast(tree, node),
            NodeKind::BinaryOperatorExpression { operator } => {
                self.visit_binary(tree, node, operator)
            }
            NodeKind::IsExpression | NodeKind::AsExpression => {
                let operand = tree.child(node, Role::Expression);
                let minimum = if self.readability {
                    Precedence::NullableRewrap
                } else {
                    Precedence::RelationalAndTypeTesting
                };
                self.wrap_if_below(tree, operand, minimum);
            }
            NodeKind::ConditionalExpression => {
                let condition = tree.child(node, Role::Condition);
                let when_true = tree.child(node, Role::TrueExpression);
                let when_false = tree.child(node, Role::FalseExpression);
                if self.readability {
                    self.wrap_if_below(tree, condition, Precedence::NullableRewrap);
                    self.wrap_if_below(tree, when_true, Precedence::NullableRewrap);
                    self.wrap_if_below(tree, when_false, Precedence::NullableRewrap);
                } else {
                    self.wrap_if_below(tree, condition, Precedence::Conditional.tighter());
                    self.wrap_if_below(tree, when_true, Precedence::Conditional);
                    self.wrap_if_below(tree, when_false, Precedence::Conditional);
                }
            }
            NodeKind::AssignmentExpression { .. } => {
                // right-associative
                let left = tree.child(node, Role::Left);
                self.wrap_if_below(tree, left, Precedence::Assignment.tighter());
                let right = tree.child(node, Role::Right);
                self.assignment_value(tree, right);
            }
            NodeKind::VariableInitializer => {
                let value = tree.child(node, Role::Initializer);
                if tree.kind(value).is_expression() {
                    self.assignment_value(tree, value);
                }
            }
            NodeKind::NamedExpression => {
                let value = tree.child(node, Role::Expression);
                self.assignment_value(tree, value);
            }
            NodeKind::LambdaExpression { .. } | NodeKind::QueryExpression if !is_root => {
                self.visit_lambda_or_query(tree, node)
            }
            _ => {}
        }
    }

    fn visit_cast(&mut self, tree: &mut SyntaxTree, cast: NodeId) {
        let operand = tree.child(cast, Role::Expression);
        if !matches!(tree.kind(operand), NodeKind::CastExpression) {
            let minimum = if self.readability {
                Precedence::NullableRewrap
            } else {
                Precedence::Unary
            };
            self.wrap_if_below(tree, operand, minimum);
        }
        // `(A)-b` is a subtraction and `(A)-1` too
        let ty = tree.child(cast, Role::Type);
        if !type_reads_as_expression(tree, ty) {
            return;
        }
        let operand = tree.child(cast, Role::Expression);
        let ambiguous = match tree.kind(operand) {
            NodeKind::UnaryOperatorExpression { operator } => *operator != UnaryOperator::Not,
            NodeKind::PrimitiveExpression { value } => value.is_negative(),
            _ => false,
        };
        if ambiguous {
            self.wrap(tree, operand);
        }
    }

    fn visit_binary(&mut self, tree: &mut SyntaxTree, node: NodeId, operator: BinaryOperator) {
        let level = Precedence::of_binary(operator);
        let left = tree.child(node, Role::Left);
        let right = tree.child(node, Role::Right);
        if operator == BinaryOperator::NullCoalescing {
            if self.readability {
                self.wrap_if_below(tree, left, Precedence::NullableRewrap);
                if binary_operator(tree, right) == Some(BinaryOperator::NullCoalescing) {
                    self.wrap_if_below(tree, right, level);
                } else {
                    self.wrap_if_below(tree, right, Precedence::NullableRewrap);
                }
            } else {
                // right-associative
                self.wrap_if_below(tree, left, level.tighter());
                self.wrap_if_below(tree, right, level);
            }
        } else if self.readability && level < Precedence::Equality {
            let boost = if operator.is_bitwise() {
                Precedence::Unary
            } else {
                Precedence::Equality
            };
            if binary_operator(tree, left) == Some(operator) {
                self.wrap_if_below(tree, left, level);
            } else {
                self.wrap_if_below(tree, left, boost);
            }
            self.wrap_if_below(tree, right, boost);
        } else {
            // left-associative
            self.wrap_if_below(tree, left, level);
            self.wrap_if_below(tree, right, level.tighter());
        }
    }

    /// Lambdas and queries run to the end of the expression.
    fn visit_lambda_or_query(&mut self, tree: &mut SyntaxTree, node: NodeId) {
        let Some(parent) = tree.parent(node) else {
            return;
        };
        let parent_kind = tree.kind(parent);
        let in_binary = matches!(parent_kind, NodeKind::BinaryOperatorExpression { .. });
        let must_wrap = (in_binary && tree.role(node) == Role::Left)
            || matches!(parent_kind, NodeKind::IsExpression | NodeKind::AsExpression)
            || (self.readability
                && (in_binary || matches!(parent_kind, NodeKind::UnaryOperatorExpression { .. })));
        if must_wrap {
            self.wrap(tree, node);
        }
    }
}

/// Parenthesize the expressions below `root`; see [`InsertParentheses`].
pub fn insert_parentheses(tree: &mut SyntaxTree, root: NodeId, readability: bool) -> usize {
    InsertParentheses::new(readability).run(tree, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignmentOperator, FieldDirection};
    use crate::output::{render_to_string, FormattingOptions};

    fn render(tree: &SyntaxTree, node: NodeId) -> String {
        render_to_string(tree, node, &FormattingOptions::default()).unwrap()
    }

    #[test]
    fn test_precedence_table_order() {
        assert!(Precedence::Primary > Precedence::NullableRewrap);
        assert!(Precedence::Unary > Precedence::Multiplicative);
        assert!(Precedence::NullCoalescing > Precedence::Conditional);
        assert_eq!(Precedence::Primary as u8, 17);
        assert_eq!(Precedence::Assignment as u8, 1);
        assert_eq!(Precedence::Multiplicative.tighter(), Precedence::Unary);
        assert_eq!(Precedence::Primary.tighter(), Precedence::Primary);
    }

    #[test]
    fn test_lower_precedence_operand_is_wrapped() {
        let mut tree = SyntaxTree::new();
        let one = tree.primitive(1);
        let other = tree.primitive(1);
        let sum = tree.binary(BinaryOperator::Add, one, other);
        let two = tree.primitive(2);
        let product = tree.binary(BinaryOperator::Multiply, two, sum);
        let stmt = tree.expr_stmt(product);
        assert_eq!(insert_parentheses(&mut tree, stmt, false), 1);
        assert_eq!(render(&tree, product), "2 * (1 + 1)");
    }

    #[test]
    fn test_left_associativity() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let c = tree.ident("c");
        let left = tree.binary(BinaryOperator::Subtract, a, b);
        let outer = tree.binary(BinaryOperator::Subtract, left, c);
        let stmt = tree.expr_stmt(outer);
        assert_eq!(insert_parentheses(&mut tree, stmt, false), 0);
        assert_eq!(render(&tree, outer), "a - b - c");

        let d = tree.ident("d");
        let e = tree.ident("e");
        let f = tree.ident("f");
        let right = tree.binary(BinaryOperator::Subtract, e, f);
        let outer = tree.binary(BinaryOperator::Subtract, d, right);
        let stmt = tree.expr_stmt(outer);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, outer), "d - (e - f)");
    }

    #[test]
    fn test_null_coalescing_is_right_associative() {
        let mut tree = SyntaxTree::new();
        let names: Vec<NodeId> = ["a", "b", "c"].iter().map(|n| tree.ident(n)).collect();
        let inner = tree.binary(BinaryOperator::NullCoalescing, names[1], names[2]);
        let chain = tree.binary(BinaryOperator::NullCoalescing, names[0], inner);
        let stmt = tree.expr_stmt(chain);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, chain), "a ?? b ?? c");

        let names: Vec<NodeId> = ["a", "b", "c"].iter().map(|n| tree.ident(n)).collect();
        let inner = tree.binary(BinaryOperator::NullCoalescing, names[0], names[1]);
        let chain = tree.binary(BinaryOperator::NullCoalescing, inner, names[2]);
        let stmt = tree.expr_stmt(chain);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, chain), "(a ?? b) ?? c");
    }

    #[test]
    fn test_cast_of_unary_minus_with_ambiguous_type() {
        let mut tree = SyntaxTree::new();
        let b = tree.ident("b");
        let negated = tree.unary(UnaryOperator::Minus, b);
        let ty = tree.simple_type("A", vec![]);
        let cast = tree.cast(ty, negated);
        let stmt = tree.expr_stmt(cast);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, cast), "(A)(-b)");

        let c = tree.ident("c");
        let negated = tree.unary(UnaryOperator::Minus, c);
        let int = tree.primitive_type("int");
        let cast = tree.cast(int, negated);
        let stmt = tree.expr_stmt(cast);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, cast), "(int)-c");

        let d = tree.ident("d");
        let not = tree.unary(UnaryOperator::Not, d);
        let ty = tree.simple_type("A", vec![]);
        let cast = tree.cast(ty, not);
        let stmt = tree.expr_stmt(cast);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, cast), "(A)!d");
    }

    #[test]
    fn test_cast_of_negative_literal() {
        let mut tree = SyntaxTree::new();
        let value = tree.primitive(-1);
        let ty = tree.simple_type("A", vec![]);
        let cast = tree.cast(ty, value);
        let stmt = tree.expr_stmt(cast);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, cast), "(A)(-1)");
    }

    #[test]
    fn test_casts_of_casts_stay_bare() {
        let mut tree = SyntaxTree::new();
        let x = tree.ident("x");
        let long = tree.primitive_type("long");
        let inner = tree.cast(long, x);
        let int = tree.primitive_type("int");
        let outer = tree.cast(int, inner);
        let stmt = tree.expr_stmt(outer);
        assert_eq!(insert_parentheses(&mut tree, stmt, true), 0);
        assert_eq!(render(&tree, outer), "(int)(long)x");
    }

    #[test]
    fn test_lambda_as_left_operand() {
        let mut tree = SyntaxTree::new();
        let x = tree.param(NodeId::NULL, "x");
        let body = tree.ident("x");
        let lambda = tree.lambda(vec![x], body, false);
        let other = tree.ident("other");
        let coalesce = tree.binary(BinaryOperator::NullCoalescing, lambda, other);
        let stmt = tree.expr_stmt(coalesce);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, coalesce), "(x => x) ?? other");
    }

    #[test]
    fn test_bare_array_creation_indexed() {
        let mut tree = SyntaxTree::new();
        let int = tree.primitive_type("int");
        let size = tree.primitive(1);
        let create = tree.array_create(int, vec![size], &[], NodeId::NULL);
        let zero = tree.primitive(0);
        let index = tree.indexer(create, vec![zero]);
        let stmt = tree.expr_stmt(index);
        insert_parentheses(&mut tree, stmt, false);
        assert_eq!(render(&tree, index), "(new int[1])[0]");
    }

    #[test]
    fn test_readability_boosts_mixed_operators() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let c = tree.ident("c");
        let and = tree.binary(BinaryOperator::BitwiseAnd, a, b);
        let or = tree.binary(BinaryOperator::BitwiseOr, and, c);
        let stmt = tree.expr_stmt(or);
        assert_eq!(insert_parentheses(&mut tree, stmt, false), 0);
        assert_eq!(render(&tree, or), "a & b | c");

        let a = tree.ident("a");
        let b = tree.ident("b");
        let c = tree.ident("c");
        let and = tree.binary(BinaryOperator::BitwiseAnd, a, b);
        let or = tree.binary(BinaryOperator::BitwiseOr, and, c);
        let stmt = tree.expr_stmt(or);
        assert_eq!(insert_parentheses(&mut tree, stmt, true), 1);
        assert_eq!(render(&tree, or), "(a & b) | c");
    }

    #[test]
    fn test_readability_keeps_same_operator_chains() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let c = tree.ident("c");
        let first = tree.binary(BinaryOperator::ConditionalAnd, a, b);
        let chain = tree.binary(BinaryOperator::ConditionalAnd, first, c);
        let stmt = tree.expr_stmt(chain);
        assert_eq!(insert_parentheses(&mut tree, stmt, true), 0);
        assert_eq!(render(&tree, chain), "a && b && c");
    }

    #[test]
    fn test_assignment_value_and_direction() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let c = tree.ident("c");
        let sum = tree.binary(BinaryOperator::Add, b, c);
        let assign = tree.assign(AssignmentOperator::Assign, a, sum);
        let stmt = tree.expr_stmt(assign);
        insert_parentheses(&mut tree, stmt, true);
        assert_eq!(render(&tree, assign), "a = (b + c)");

        let y = tree.ident("y");
        let out = tree.direction(FieldDirection::Out, y);
        let x = tree.ident("x");
        let assign = tree.assign(AssignmentOperator::Assign, x, out);
        let stmt = tree.expr_stmt(assign);
        insert_parentheses(&mut tree, stmt, true);
        assert_eq!(render(&tree, assign), "x = out y");
    }
}
