// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expressions, types and query clauses.

use super::OutputVisitor;
use crate::ast::{
    AssignmentOperator, CommentKind, FieldDirection, NodeId, NodeKind, ParameterModifier, Role,
    SyntaxTree,
};
use crate::error::RenderError;
use crate::output::options::{BraceStyle, Wrapping};
use crate::output::token_writer::TokenWriter;

/// Call chains are measured up to this many links.
const MAX_CALL_CHAIN_LENGTH: usize = 4;

/// A call chain this long breaks the line before its next link.
const CALL_CHAIN_BREAK_LENGTH: usize = 3;

/// Wrapped initializers start a new line after this many elements.
const INITIALIZER_ELEMENTS_PER_LINE: usize = 10;

impl<W: TokenWriter> OutputVisitor<'_, '_, W> {
    pub(super) fn visit_identifier_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_name_of(node)?;
        self.write_type_arguments(node)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_primitive_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        if let NodeKind::PrimitiveExpression { value } = self.tree.kind(node) {
            self.writer.write_primitive_value(value);
            self.at_line_start = false;
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_null_reference_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        self.writer
            .write_primitive_value(&crate::ast::PrimitiveValue::Null);
        self.at_line_start = false;
        self.end_node(node);
        Ok(())
    }

    /// `this` and `base`.
    pub(super) fn visit_keyword_expression(
        &mut self,
        node: NodeId,
        keyword: &'static str,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let role = self.tree.role(node);
        self.writer.write_keyword(self.tree, role, keyword);
        self.at_line_start = false;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_binary_operator_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let NodeKind::BinaryOperatorExpression { operator } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        let left = self.required(node, Role::Left)?;
        let right = self.required(node, Role::Right)?;
        self.visit(left)?;
        let spaced = self.options.space_around_binary_operators;
        self.space_if(spaced);
        self.write_token(operator.token());
        self.space_if(spaced);
        self.visit(right)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_unary_operator_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let NodeKind::UnaryOperatorExpression { operator } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        let operand = self.required(node, Role::Expression)?;
        let token = operator.token();
        if operator == crate::ast::UnaryOperator::Await {
            self.write_keyword(token);
            self.space();
        } else if !operator.is_postfix() && !token.is_empty() {
            self.write_token(token);
        }
        self.visit(operand)?;
        if operator.is_postfix() {
            self.write_token(token);
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_assignment_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::AssignmentExpression { operator } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        let left = self.required(node, Role::Left)?;
        let right = self.required(node, Role::Right)?;
        self.visit(left)?;
        let spaced = self.options.space_around_assignment;
        self.space_if(spaced);
        self.write_token(operator.token());
        self.space_if(spaced);
        self.visit(right)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_conditional_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        let condition = self.required(node, Role::Condition)?;
        let when_true = self.required(node, Role::TrueExpression)?;
        let when_false = self.required(node, Role::FalseExpression)?;
        let options = self.options;
        self.visit(condition)?;
        self.space_if(options.space_before_conditional_question);
        self.write_token("?");
        self.space_if(options.space_after_conditional_question);
        self.visit(when_true)?;
        self.space_if(options.space_before_conditional_colon);
        self.write_token(":");
        self.space_if(options.space_after_conditional_colon);
        self.visit(when_false)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_cast_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        let ty = self.required(node, Role::Type)?;
        let operand = self.required(node, Role::Expression)?;
        let within = self.options.space_within_cast_parentheses;
        self.write_token("(");
        self.space_if(within);
        self.visit(ty)?;
        self.space_if(within);
        self.write_token(")");
        self.space_if(self.options.space_after_cast);
        self.visit(operand)?;
        self.end_node(node);
        Ok(())
    }

    /// `as` and `is`.
    pub(super) fn visit_type_test_expression(
        &mut self,
        node: NodeId,
        keyword: &'static str,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let operand = self.required(node, Role::Expression)?;
        let ty = self.required(node, Role::Type)?;
        self.visit(operand)?;
        self.space();
        self.write_keyword(keyword);
        self.space();
        self.visit(ty)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_invocation_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        self.start_node(node);
        let target = self.required(node, Role::Target)?;
        self.visit(target)?;
        self.space_if(self.options.space_before_method_call_parentheses);
        let arguments = self.children_in(node, Role::Argument);
        self.comma_separated_list_in(
            "(",
            ")",
            &arguments,
            self.options.space_within_method_call_parentheses,
        )?;
        let in_member_reference = tree
            .parent(node)
            .is_some_and(|p| matches!(tree.kind(p), NodeKind::MemberReferenceExpression));
        if !in_member_reference
            && matches!(tree.kind(target), NodeKind::MemberReferenceExpression)
            && call_chain_length(tree, target) >= CALL_CHAIN_BREAK_LENGTH
        {
            self.writer.unindent();
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_member_reference_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let tree = self.tree;
        self.start_node(node);
        let target = self.required(node, Role::Target)?;
        self.visit(target)?;
        let inserted_new_line = self.break_call_chain(node);
        self.write_token(".");
        self.write_name_of(node)?;
        self.write_type_arguments(node)?;
        let in_invocation = tree
            .parent(node)
            .is_some_and(|p| matches!(tree.kind(p), NodeKind::InvocationExpression));
        if inserted_new_line && !in_invocation {
            self.writer.unindent();
        }
        self.end_node(node);
        Ok(())
    }

    /// Start a new line before the third and later links of a call chain.
    /// The first break also indents; the outermost invocation unindents.
    fn break_call_chain(&mut self, member: NodeId) -> bool {
        let length = call_chain_length(self.tree, member);
        if length < CALL_CHAIN_BREAK_LENGTH {
            return false;
        }
        if length == CALL_CHAIN_BREAK_LENGTH {
            self.writer.indent();
        }
        self.new_line();
        true
    }

    pub(super) fn visit_indexer_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        let target = self.required(node, Role::Target)?;
        self.visit(target)?;
        self.space_if(self.options.space_before_brackets);
        let arguments = self.children_in(node, Role::Argument);
        self.comma_separated_list_in("[", "]", &arguments, self.options.space_within_brackets)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_parenthesized_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let inner = self.required(node, Role::Expression)?;
        let within = self.options.space_within_parentheses;
        self.write_token("(");
        self.space_if(within);
        self.visit(inner)?;
        self.space_if(within);
        self.write_token(")");
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_lambda_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::LambdaExpression { is_async } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        if is_async {
            self.write_keyword("async");
            self.space();
        }
        let parameters = self.children_in(node, Role::Parameter);
        if lambda_needs_parentheses(self.tree, &parameters) {
            self.comma_separated_list_in(
                "(",
                ")",
                &parameters,
                self.options.space_within_method_declaration_parentheses,
            )?;
        } else {
            self.visit(parameters[0])?;
        }
        let spaced = self.options.space_around_lambda_arrow;
        self.space_if(spaced);
        self.write_token("=>");
        self.space_if(spaced);
        let body = self.required(node, Role::Body)?;
        self.visit(body)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_anonymous_method_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let NodeKind::AnonymousMethodExpression {
            is_async,
            has_parameter_list,
        } = *self.tree.kind(node)
        else {
            return Ok(());
        };
        self.start_node(node);
        if is_async {
            self.write_keyword("async");
            self.space();
        }
        self.write_keyword("delegate");
        if has_parameter_list {
            self.space_if(self.options.space_before_method_declaration_parentheses);
            let parameters = self.children_in(node, Role::Parameter);
            self.comma_separated_list_in(
                "(",
                ")",
                &parameters,
                self.options.space_within_method_declaration_parentheses,
            )?;
        }
        let body = self.required(node, Role::Body)?;
        self.visit(body)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_object_create_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let tree = self.tree;
        self.start_node(node);
        self.write_keyword("new");
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        let arguments = self.children_in(node, Role::Argument);
        let initializer = tree.child(node, Role::Initializer);
        let use_parentheses = !arguments.is_empty()
            || initializer.is_null()
            || tree.has_child(node, Role::Token("("));
        if use_parentheses {
            self.space_if(self.options.space_before_method_call_parentheses);
            self.comma_separated_list_in(
                "(",
                ")",
                &arguments,
                self.options.space_within_method_call_parentheses,
            )?;
        }
        self.visit(initializer)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_array_create_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let tree = self.tree;
        self.start_node(node);
        self.write_keyword("new");
        self.visit(tree.child(node, Role::Type))?;
        let arguments = self.children_in(node, Role::Argument);
        if !arguments.is_empty() {
            self.comma_separated_list_in("[", "]", &arguments, self.options.space_within_brackets)?;
        }
        for specifier in self.children_in(node, Role::ArraySpecifier) {
            self.visit(specifier)?;
        }
        self.visit(tree.child(node, Role::Initializer))?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_array_initializer_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let tree = self.tree;
        self.start_node(node);
        let elements = self.children_in(node, Role::Expression);
        let braces_are_optional = elements.len() == 1
            && is_object_or_collection_initializer(tree, tree.parent(node))
            && !can_be_confused_with_object_initializer(tree, elements[0]);
        if braces_are_optional && !tree.has_child(node, Role::Token("{")) {
            self.visit(elements[0])?;
        } else {
            self.write_initializer_elements(&elements)?;
        }
        self.end_node(node);
        Ok(())
    }

    fn write_initializer_elements(&mut self, elements: &[NodeId]) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        let wrap_always = options.array_initializer_wrapping == Wrapping::WrapAlways
            || (elements.len() > 1 && elements.iter().any(|&e| !is_simple_expression(tree, e)))
            || elements.iter().any(|&e| is_complex_expression(tree, e));
        let wrap = wrap_always || elements.len() > INITIALIZER_ELEMENTS_PER_LINE;
        let style = if wrap {
            options.array_initializer_brace_style
        } else {
            BraceStyle::EndOfLine
        };
        self.open_brace(style, wrap);
        if !wrap {
            self.space();
        }
        for (i, &element) in elements.iter().enumerate() {
            self.poll.tick()?;
            if i > 0 {
                self.comma(true);
                if wrap_always || i % INITIALIZER_ELEMENTS_PER_LINE == 0 {
                    self.new_line();
                } else {
                    self.space();
                }
            }
            self.visit(element)?;
        }
        if let Some(&last) = elements.last() {
            self.optional_token(last, ",");
        }
        if wrap {
            self.new_line();
        } else {
            self.space();
        }
        self.close_brace(style, wrap);
        Ok(())
    }

    pub(super) fn visit_named_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_name_of(node)?;
        let spaced = self.options.space_around_assignment;
        self.space_if(spaced);
        self.write_token("=");
        self.space_if(spaced);
        let value = self.required(node, Role::Expression)?;
        self.visit(value)?;
        self.end_node(node);
        Ok(())
    }

    /// `typeof(T)`, `default(T)` and `sizeof(T)`.
    pub(super) fn visit_type_operator_expression(
        &mut self,
        node: NodeId,
        keyword: &'static str,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let ty = self.required(node, Role::Type)?;
        let within = self.options.space_within_typeof_parentheses;
        self.write_keyword(keyword);
        self.space_if(self.options.space_before_typeof_parentheses);
        self.write_token("(");
        self.space_if(within);
        self.visit(ty)?;
        self.space_if(within);
        self.write_token(")");
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_type_reference_expression(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        self.end_node(node);
        Ok(())
    }

    /// `checked(e)` and `unchecked(e)`.
    pub(super) fn visit_checked_expression(
        &mut self,
        node: NodeId,
        keyword: &'static str,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let inner = self.required(node, Role::Expression)?;
        let within = self.options.space_within_checked_parentheses;
        self.write_keyword(keyword);
        self.space_if(self.options.space_before_checked_parentheses);
        self.write_token("(");
        self.space_if(within);
        self.visit(inner)?;
        self.space_if(within);
        self.write_token(")");
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_direction_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::DirectionExpression { direction } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        let inner = self.required(node, Role::Expression)?;
        self.write_keyword(match direction {
            FieldDirection::Out => "out",
            FieldDirection::Ref => "ref",
        });
        self.space();
        self.visit(inner)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_error_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.writer.write_comment(CommentKind::MultiLine, " error ");
        self.at_line_start = false;
        self.end_node(node);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Query expressions
    // ------------------------------------------------------------------------

    pub(super) fn visit_query_expression(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.writer.indent();
        for (i, clause) in self.children_in(node, Role::QueryClause).into_iter().enumerate() {
            self.poll.tick()?;
            if i > 0 {
                self.new_line();
            }
            self.visit(clause)?;
        }
        self.writer.unindent();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_query_from_clause(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        self.start_node(node);
        self.write_keyword("from");
        self.space();
        let ty = tree.child(node, Role::Type);
        if !ty.is_null() {
            self.visit(ty)?;
            self.space();
        }
        self.write_name_of(node)?;
        self.space();
        self.write_keyword("in");
        self.space();
        let source = self.required(node, Role::Expression)?;
        self.visit(source)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_query_let_clause(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("let");
        self.space();
        self.write_name_of(node)?;
        let spaced = self.options.space_around_assignment;
        self.space_if(spaced);
        self.write_token("=");
        self.space_if(spaced);
        let value = self.required(node, Role::Expression)?;
        self.visit(value)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_query_where_clause(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("where");
        self.space();
        let condition = self.required(node, Role::Condition)?;
        self.visit(condition)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_query_order_clause(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("orderby");
        self.space();
        let orderings = self.children_in(node, Role::QueryOrdering);
        self.comma_separated_list(&orderings)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_query_ordering(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::QueryOrdering { descending } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.expect_parent(node, "an orderby clause", |k| {
            matches!(k, NodeKind::QueryOrderClause)
        })?;
        self.start_node(node);
        let key = self.required(node, Role::Expression)?;
        self.visit(key)?;
        if descending {
            self.space();
            self.write_keyword("descending");
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_query_select_clause(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("select");
        self.space();
        let value = self.required(node, Role::Expression)?;
        self.visit(value)?;
        self.end_node(node);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    pub(super) fn visit_simple_type(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_name_of(node)?;
        self.write_type_arguments(node)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_member_type(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::MemberType { double_colon } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        let target = self.required(node, Role::Target)?;
        self.visit(target)?;
        self.write_token(if double_colon { "::" } else { "." });
        self.write_name_of(node)?;
        self.write_type_arguments(node)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_primitive_type(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        if let NodeKind::PrimitiveType { keyword } = self.tree.kind(node) {
            self.writer.write_primitive_type(keyword);
            self.at_line_start = false;
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_composed_type(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::ComposedType {
            nullable,
            pointer_rank,
        } = *self.tree.kind(node)
        else {
            return Ok(());
        };
        self.start_node(node);
        let base = self.required(node, Role::Type)?;
        self.visit(base)?;
        if nullable {
            self.write_token("?");
        }
        for _ in 0..pointer_rank {
            self.write_token("*");
        }
        for specifier in self.children_in(node, Role::ArraySpecifier) {
            self.visit(specifier)?;
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_array_specifier(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::ArraySpecifier { dimensions } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_token("[");
        for _ in 1..dimensions {
            self.write_token(",");
        }
        self.write_token("]");
        self.end_node(node);
        Ok(())
    }
}

/// The number of `.m()` links before `member`, capped at four.
///
/// `a.b().c().d` has length 2: `.d` follows `.c()` which follows `.b()`.
pub(crate) fn call_chain_length(tree: &SyntaxTree, member: NodeId) -> usize {
    let mut length = 0;
    let mut node = member;
    while length < MAX_CALL_CHAIN_LENGTH {
        let target = tree.child(node, Role::Target);
        if !matches!(tree.kind(target), NodeKind::InvocationExpression) {
            break;
        }
        let inner = tree.child(target, Role::Target);
        if !matches!(tree.kind(inner), NodeKind::MemberReferenceExpression) {
            break;
        }
        length += 1;
        node = inner;
    }
    length
}

/// A lambda can drop its parentheses only for one untyped, unmodified parameter.
fn lambda_needs_parentheses(tree: &SyntaxTree, parameters: &[NodeId]) -> bool {
    let [parameter] = parameters else {
        return true;
    };
    let plain = matches!(
        tree.kind(*parameter),
        NodeKind::ParameterDeclaration {
            modifier: ParameterModifier::None
        }
    );
    !(plain && tree.child(*parameter, Role::Type).is_null())
}

/// An array initializer serving as the body of `new T { ... }` or of a
/// named member initializer (`X = { ... }`).
fn is_object_or_collection_initializer(tree: &SyntaxTree, node: Option<NodeId>) -> bool {
    let Some(node) = node else {
        return false;
    };
    if !matches!(tree.kind(node), NodeKind::ArrayInitializerExpression) {
        return false;
    }
    match tree.parent(node).map(|p| tree.kind(p)) {
        Some(NodeKind::ObjectCreateExpression) => tree.role(node) == Role::Initializer,
        Some(NodeKind::NamedExpression) => tree.role(node) == Role::Expression,
        _ => false,
    }
}

/// `{ a = b }` would read as a member assignment of an object initializer.
fn can_be_confused_with_object_initializer(tree: &SyntaxTree, element: NodeId) -> bool {
    matches!(
        tree.kind(element),
        NodeKind::AssignmentExpression {
            operator: AssignmentOperator::Assign
        }
    )
}

fn is_simple_expression(tree: &SyntaxTree, node: NodeId) -> bool {
    match tree.kind(node) {
        NodeKind::NullReferenceExpression
        | NodeKind::ThisReferenceExpression
        | NodeKind::PrimitiveExpression { .. }
        | NodeKind::IdentifierExpression => true,
        NodeKind::MemberReferenceExpression => matches!(
            tree.kind(tree.child(node, Role::Target)),
            NodeKind::ThisReferenceExpression
                | NodeKind::IdentifierExpression
                | NodeKind::BaseReferenceExpression
        ),
        _ => false,
    }
}

fn is_complex_expression(tree: &SyntaxTree, node: NodeId) -> bool {
    matches!(
        tree.kind(node),
        NodeKind::AnonymousMethodExpression { .. }
            | NodeKind::LambdaExpression { .. }
            | NodeKind::ObjectCreateExpression
            | NodeKind::NamedExpression
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;

    #[test]
    fn test_call_chain_length_counts_invocation_links() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.call(a, "B", vec![]);
        let c = tree.call(b, "C", vec![]);
        let d = tree.member_ref(c, "D");
        assert_eq!(call_chain_length(&tree, d), 2);

        let mut chain = d;
        for name in ["E", "F", "G", "H"] {
            let call = tree.invocation(chain, vec![]);
            chain = tree.member_ref(call, name);
        }
        assert_eq!(call_chain_length(&tree, chain), MAX_CALL_CHAIN_LENGTH);
    }

    #[test]
    fn test_lambda_parentheses() {
        let mut tree = SyntaxTree::new();
        let x = tree.param(NodeId::NULL, "x");
        assert!(!lambda_needs_parentheses(&tree, &[x]));

        let int = tree.primitive_type("int");
        let typed = tree.param(int, "y");
        assert!(lambda_needs_parentheses(&tree, &[typed]));

        let z = tree.parameter(ParameterModifier::Ref, NodeId::NULL, "z", NodeId::NULL);
        assert!(lambda_needs_parentheses(&tree, &[z]));
        assert!(lambda_needs_parentheses(&tree, &[]));
    }

    #[test]
    fn test_initializer_element_classes() {
        let mut tree = SyntaxTree::new();
        let this = tree.this_ref();
        let field = tree.member_ref(this, "field");
        let one = tree.primitive(1);
        let two = tree.primitive(2);
        let sum = tree.binary(BinaryOperator::Add, one, two);
        let ty = tree.simple_type("Point", vec![]);
        let create = tree.object_create(ty, vec![], NodeId::NULL);
        assert!(is_simple_expression(&tree, field));
        assert!(!is_simple_expression(&tree, sum));
        assert!(is_complex_expression(&tree, create));
        assert!(!is_complex_expression(&tree, sum));
    }
}
