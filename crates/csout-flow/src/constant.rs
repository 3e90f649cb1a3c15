// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compile-time constant evaluation.
//!
//! The graph builder and the definite-assignment analysis ask a
//! [`ConstantResolver`] whether a condition has a known value. A resolver that
//! knows nothing ([`NoConstants`]) is always valid: every condition is then
//! treated as unknown and both branches stay live.
//!
//! [`PrimitiveConstants`] folds what can be decided from the tree alone:
//! literals, `null`, parentheses, `checked`/`unchecked`, the unary operators
//! `!`, `-`, `+` and `~`, and binary operators whose operands fold.

use csout_syntax::{BinaryOperator, NodeId, NodeKind, PrimitiveValue, Role, SyntaxTree, UnaryOperator};

/// A folded constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    /// Any integral value, widened.
    Integer(i128),
    Float(f64),
    Char(char),
    String(String),
    /// A decimal literal, kept as written.
    Decimal(String),
}

impl ConstantValue {
    /// Convert a literal payload.
    pub fn from_primitive(value: &PrimitiveValue) -> Self {
        match value {
            PrimitiveValue::Null => ConstantValue::Null,
            PrimitiveValue::Bool(b) => ConstantValue::Bool(*b),
            PrimitiveValue::Char(c) => ConstantValue::Char(*c),
            PrimitiveValue::String(s) => ConstantValue::String(s.clone()),
            PrimitiveValue::Float(f) => ConstantValue::Float(f64::from(*f)),
            PrimitiveValue::Double(d) => ConstantValue::Float(*d),
            PrimitiveValue::Decimal(d) => ConstantValue::Decimal(d.clone()),
            other => match other.as_integer() {
                Some(i) => ConstantValue::Integer(i),
                None => ConstantValue::Null,
            },
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstantValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i128> {
        match self {
            ConstantValue::Integer(i) => Some(*i),
            ConstantValue::Char(c) => Some(*c as i128),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            ConstantValue::Float(f) => Some(*f),
            other => other.as_integer().map(|i| i as f64),
        }
    }

    /// Equality as a `case` label comparison sees it: integral values and
    /// characters compare numerically.
    pub fn matches(&self, other: &ConstantValue) -> bool {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => a == b,
            _ => match (self, other) {
                (ConstantValue::Float(a), b) | (b, ConstantValue::Float(a)) => {
                    b.as_float().is_some_and(|b| *a == b)
                }
                _ => self == other,
            },
        }
    }
}

/// Answers whether an expression is a compile-time constant.
pub trait ConstantResolver {
    /// The value of `expression`, or `None` when it is not a constant.
    fn resolve(&self, tree: &SyntaxTree, expression: NodeId) -> Option<ConstantValue>;

    /// The value of a boolean condition, or `None` when it is unknown.
    fn resolve_boolean(&self, tree: &SyntaxTree, expression: NodeId) -> Option<bool> {
        self.resolve(tree, expression).and_then(|value| value.as_bool())
    }
}

/// A resolver that never knows anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstants;

impl ConstantResolver for NoConstants {
    fn resolve(&self, _tree: &SyntaxTree, _expression: NodeId) -> Option<ConstantValue> {
        None
    }
}

/// Folds literals and operators applied to literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveConstants;

impl ConstantResolver for PrimitiveConstants {
    fn resolve(&self, tree: &SyntaxTree, expression: NodeId) -> Option<ConstantValue> {
        match tree.kind(expression) {
            NodeKind::PrimitiveExpression { value } => Some(ConstantValue::from_primitive(value)),
            NodeKind::NullReferenceExpression => Some(ConstantValue::Null),
            NodeKind::ParenthesizedExpression
            | NodeKind::CheckedExpression
            | NodeKind::UncheckedExpression => {
                self.resolve(tree, tree.child(expression, Role::Expression))
            }
            NodeKind::UnaryOperatorExpression { operator } => {
                let operand = self.resolve(tree, tree.child(expression, Role::Expression))?;
                fold_unary(*operator, operand)
            }
            NodeKind::BinaryOperatorExpression { operator } => {
                let left = self.resolve(tree, tree.child(expression, Role::Left))?;
                if *operator == BinaryOperator::NullCoalescing && left != ConstantValue::Null {
                    return Some(left);
                }
                let right = self.resolve(tree, tree.child(expression, Role::Right))?;
                fold_binary(*operator, left, right)
            }
            _ => None,
        }
    }
}

fn fold_unary(operator: UnaryOperator, operand: ConstantValue) -> Option<ConstantValue> {
    use ConstantValue::*;
    match (operator, operand) {
        (UnaryOperator::Not, Bool(b)) => Some(Bool(!b)),
        (UnaryOperator::Minus, Float(f)) => Some(Float(-f)),
        (UnaryOperator::Plus, Float(f)) => Some(Float(f)),
        (UnaryOperator::Minus, value) => value.as_integer().and_then(i128::checked_neg).map(Integer),
        (UnaryOperator::Plus, value) => value.as_integer().map(Integer),
        (UnaryOperator::BitNot, value) => value.as_integer().map(|i| Integer(!i)),
        _ => None,
    }
}

fn fold_binary(
    operator: BinaryOperator,
    left: ConstantValue,
    right: ConstantValue,
) -> Option<ConstantValue> {
    use BinaryOperator as Op;
    use ConstantValue::*;

    if let (Bool(a), Bool(b)) = (&left, &right) {
        let (a, b) = (*a, *b);
        return match operator {
            Op::ConditionalAnd | Op::BitwiseAnd => Some(Bool(a && b)),
            Op::ConditionalOr | Op::BitwiseOr => Some(Bool(a || b)),
            Op::ExclusiveOr | Op::InEquality => Some(Bool(a != b)),
            Op::Equality => Some(Bool(a == b)),
            _ => None,
        };
    }

    match operator {
        Op::NullCoalescing => return Some(right),
        Op::Equality => return Some(Bool(left.matches(&right))),
        Op::InEquality => return Some(Bool(!left.matches(&right))),
        _ => {}
    }

    if let (String(a), String(b)) = (&left, &right) {
        return match operator {
            Op::Add => Some(String(format!("{}{}", a, b))),
            _ => None,
        };
    }

    if let (Some(a), Some(b)) = (left.as_integer(), right.as_integer()) {
        return match operator {
            Op::Add => a.checked_add(b).map(Integer),
            Op::Subtract => a.checked_sub(b).map(Integer),
            Op::Multiply => a.checked_mul(b).map(Integer),
            Op::Divide => a.checked_div(b).map(Integer),
            Op::Modulus => a.checked_rem(b).map(Integer),
            Op::ShiftLeft => u32::try_from(b).ok().and_then(|s| a.checked_shl(s)).map(Integer),
            Op::ShiftRight => u32::try_from(b).ok().and_then(|s| a.checked_shr(s)).map(Integer),
            Op::BitwiseAnd => Some(Integer(a & b)),
            Op::BitwiseOr => Some(Integer(a | b)),
            Op::ExclusiveOr => Some(Integer(a ^ b)),
            Op::LessThan => Some(Bool(a < b)),
            Op::LessThanOrEqual => Some(Bool(a <= b)),
            Op::GreaterThan => Some(Bool(a > b)),
            Op::GreaterThanOrEqual => Some(Bool(a >= b)),
            _ => None,
        };
    }

    let (a, b) = (left.as_float()?, right.as_float()?);
    match operator {
        Op::Add => Some(Float(a + b)),
        Op::Subtract => Some(Float(a - b)),
        Op::Multiply => Some(Float(a * b)),
        Op::Divide => Some(Float(a / b)),
        Op::Modulus => Some(Float(a % b)),
        Op::LessThan => Some(Bool(a < b)),
        Op::LessThanOrEqual => Some(Bool(a <= b)),
        Op::GreaterThan => Some(Bool(a > b)),
        Op::GreaterThanOrEqual => Some(Bool(a >= b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_constants_knows_nothing() {
        let mut tree = SyntaxTree::new();
        let t = tree.primitive(true);
        assert_eq!(NoConstants.resolve(&tree, t), None);
        assert_eq!(NoConstants.resolve_boolean(&tree, t), None);
    }

    #[test]
    fn test_folds_literals_and_operators() {
        let mut tree = SyntaxTree::new();
        let one = tree.primitive(1);
        let two = tree.primitive(2);
        let sum = tree.binary(BinaryOperator::Add, one, two);
        let three = tree.primitive(3);
        let equal = tree.binary(BinaryOperator::Equality, sum, three);
        let paren = tree.paren(equal);
        let not = tree.unary(UnaryOperator::Not, paren);
        assert_eq!(PrimitiveConstants.resolve(&tree, sum), Some(ConstantValue::Integer(3)));
        assert_eq!(PrimitiveConstants.resolve_boolean(&tree, paren), Some(true));
        assert_eq!(PrimitiveConstants.resolve_boolean(&tree, not), Some(false));
    }

    #[test]
    fn test_identifiers_are_not_constant() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let t = tree.primitive(true);
        let and = tree.binary(BinaryOperator::ConditionalAnd, a, t);
        assert_eq!(PrimitiveConstants.resolve(&tree, and), None);
    }

    #[test]
    fn test_division_by_zero_does_not_fold() {
        let mut tree = SyntaxTree::new();
        let one = tree.primitive(1);
        let zero = tree.primitive(0);
        let div = tree.binary(BinaryOperator::Divide, one, zero);
        assert_eq!(PrimitiveConstants.resolve(&tree, div), None);
    }

    #[test]
    fn test_char_matches_integer() {
        assert!(ConstantValue::Char('A').matches(&ConstantValue::Integer(65)));
        assert!(ConstantValue::Float(2.0).matches(&ConstantValue::Integer(2)));
        assert!(!ConstantValue::String("a".into()).matches(&ConstantValue::Null));
    }
}
