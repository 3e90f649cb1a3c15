// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::OutputVisitor;
use crate::ast::{NodeId, NodeKind, Role};
use crate::error::RenderError;
use crate::output::options::{BraceStyle, NewLinePlacement};
use crate::output::token_writer::TokenWriter;

impl<W: TokenWriter> OutputVisitor<'_, '_, W> {
    // ------------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------------

    pub(super) fn visit_block_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let parent = tree.parent(node).map(|p| tree.kind(p));
        let style = match parent {
            Some(NodeKind::LambdaExpression { .. } | NodeKind::AnonymousMethodExpression { .. }) => {
                self.options.anonymous_method_brace_style
            }
            Some(NodeKind::ConstructorDeclaration { .. }) => self.options.constructor_brace_style,
            Some(NodeKind::MethodDeclaration { .. }) => self.options.method_brace_style,
            Some(NodeKind::Accessor { .. }) => self.options.accessor_brace_style,
            _ => self.options.statement_brace_style,
        };
        self.write_block(node, style)?;
        if !parent.is_some_and(|kind| kind.is_expression()) {
            self.new_line();
        }
        Ok(())
    }

    /// `{`, the statements of `block`, `}`. No trailing new line.
    pub(super) fn write_block(&mut self, block: NodeId, style: BraceStyle) -> Result<(), RenderError> {
        self.start_node(block);
        self.open_brace(style, true);
        for statement in self.children_in(block, Role::Statement) {
            self.poll.tick()?;
            self.visit(statement)?;
        }
        self.close_brace(style, true);
        self.end_node(block);
        Ok(())
    }

    /// The body of a loop, `if`, `lock`, `using` or `fixed`. A block stays on
    /// the header's line; anything else goes indented on the next one.
    /// `placement` decides what follows a block's closing brace.
    fn write_embedded_statement(
        &mut self,
        statement: NodeId,
        placement: NewLinePlacement,
    ) -> Result<(), RenderError> {
        let tree = self.tree;
        if statement.is_null() {
            self.new_line();
            return Ok(());
        }
        if matches!(tree.kind(statement), NodeKind::BlockStatement) {
            self.write_block(statement, self.options.statement_brace_style)?;
            match placement {
                NewLinePlacement::SameLine => self.space(),
                NewLinePlacement::NewLine => self.new_line(),
            }
        } else {
            self.new_line();
            self.writer.indent();
            self.visit(statement)?;
            self.writer.unindent();
        }
        Ok(())
    }

    /// `(expression)` after a statement keyword.
    fn write_parenthesized(
        &mut self,
        expression: NodeId,
        space_before: bool,
        space_within: bool,
    ) -> Result<(), RenderError> {
        self.space_if(space_before);
        self.write_token("(");
        self.space_if(space_within);
        self.visit(expression)?;
        self.space_if(space_within);
        self.write_token(")");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Simple statements
    // ------------------------------------------------------------------------

    pub(super) fn visit_expression_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        let expression = self.required(node, Role::Expression)?;
        self.visit(expression)?;
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_variable_declaration_statement(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let NodeKind::VariableDeclarationStatement { modifiers } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_modifiers(modifiers);
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        self.space();
        let variables = self.children_in(node, Role::Variable);
        self.comma_separated_list(&variables)?;
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_empty_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_label_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        self.start_node(node);
        self.write_name_of(node)?;
        self.write_token(":");
        let role = tree.role(node);
        let mut labels_statement = false;
        let mut next = tree.next_sibling(node);
        while let Some(sibling) = next {
            if tree.role(sibling) == role {
                labels_statement = true;
                break;
            }
            next = tree.next_sibling(sibling);
        }
        if !labels_statement {
            self.write_token(";");
        }
        self.new_line();
        self.end_node(node);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Control flow
    // ------------------------------------------------------------------------

    pub(super) fn visit_if_else_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        self.start_node(node);
        self.write_keyword("if");
        let condition = self.required(node, Role::Condition)?;
        self.write_parenthesized(
            condition,
            options.space_before_if_parentheses,
            options.space_within_if_parentheses,
        )?;
        let when_true = tree.child(node, Role::TrueStatement);
        let when_false = tree.child(node, Role::FalseStatement);
        if when_false.is_null() {
            self.write_embedded_statement(when_true, NewLinePlacement::NewLine)?;
        } else {
            self.write_embedded_statement(when_true, options.else_new_line_placement)?;
            self.write_keyword("else");
            if matches!(tree.kind(when_false), NodeKind::IfElseStatement) {
                self.space();
                self.visit(when_false)?;
            } else {
                self.write_embedded_statement(when_false, NewLinePlacement::NewLine)?;
            }
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_while_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.start_node(node);
        self.write_keyword_referencing("while", Some(node));
        let condition = self.required(node, Role::Condition)?;
        self.write_parenthesized(
            condition,
            options.space_before_while_parentheses,
            options.space_within_while_parentheses,
        )?;
        let body = self.tree.child(node, Role::EmbeddedStatement);
        self.write_embedded_statement(body, NewLinePlacement::NewLine)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_do_while_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.start_node(node);
        self.write_keyword_referencing("do", Some(node));
        let body = self.tree.child(node, Role::EmbeddedStatement);
        self.write_embedded_statement(body, options.while_new_line_placement)?;
        self.write_keyword_referencing("while", Some(node));
        let condition = self.required(node, Role::Condition)?;
        self.write_parenthesized(
            condition,
            options.space_before_while_parentheses,
            options.space_within_while_parentheses,
        )?;
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_for_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        self.start_node(node);
        self.write_keyword_referencing("for", Some(node));
        self.space_if(options.space_before_for_parentheses);
        self.write_token("(");
        self.space_if(options.space_within_for_parentheses);
        let initializers = self.children_in(node, Role::ForInitializer);
        self.comma_separated_list(&initializers)?;
        self.space_if(options.space_before_for_semicolon);
        self.write_token(";");
        self.space_if(options.space_after_for_semicolon);
        self.visit(tree.child(node, Role::Condition))?;
        self.space_if(options.space_before_for_semicolon);
        self.write_token(";");
        let iterators = self.children_in(node, Role::ForIterator);
        if !iterators.is_empty() {
            self.space_if(options.space_after_for_semicolon);
            self.comma_separated_list(&iterators)?;
        }
        self.space_if(options.space_within_for_parentheses);
        self.write_token(")");
        let body = tree.child(node, Role::EmbeddedStatement);
        self.write_embedded_statement(body, NewLinePlacement::NewLine)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_foreach_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.start_node(node);
        self.write_keyword_referencing("foreach", Some(node));
        self.space_if(options.space_before_foreach_parentheses);
        self.write_token("(");
        self.space_if(options.space_within_foreach_parentheses);
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        self.space();
        self.write_name_of(node)?;
        self.space();
        self.write_keyword("in");
        self.space();
        let source = self.required(node, Role::InExpression)?;
        self.visit(source)?;
        self.space_if(options.space_within_foreach_parentheses);
        self.write_token(")");
        let body = self.tree.child(node, Role::EmbeddedStatement);
        self.write_embedded_statement(body, NewLinePlacement::NewLine)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_switch_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.start_node(node);
        self.write_keyword_referencing("switch", Some(node));
        let expression = self.required(node, Role::Expression)?;
        self.write_parenthesized(
            expression,
            options.space_before_switch_parentheses,
            options.space_within_switch_parentheses,
        )?;
        let style = options.statement_brace_style;
        self.open_brace(style, true);
        if !options.indent_switch_body {
            self.writer.unindent();
        }
        for section in self.children_in(node, Role::SwitchSection) {
            self.poll.tick()?;
            self.visit(section)?;
        }
        if !options.indent_switch_body {
            self.writer.indent();
        }
        self.close_brace(style, true);
        self.new_line();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_switch_section(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        self.expect_parent(node, "a switch statement", |k| {
            matches!(k, NodeKind::SwitchStatement)
        })?;
        self.start_node(node);
        for (i, label) in self.children_in(node, Role::CaseLabel).into_iter().enumerate() {
            if i > 0 {
                self.new_line();
            }
            self.visit(label)?;
        }
        let statements = self.children_in(node, Role::Statement);
        let is_block = matches!(statements.as_slice(), [only] if matches!(tree.kind(*only), NodeKind::BlockStatement));
        let indent = self.options.indent_case_body && !is_block;
        if indent {
            self.writer.indent();
        }
        if !is_block {
            self.new_line();
        }
        for statement in statements {
            self.poll.tick()?;
            self.visit(statement)?;
        }
        if indent {
            self.writer.unindent();
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_case_label(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.expect_parent(node, "a switch section", |k| {
            matches!(k, NodeKind::SwitchSection)
        })?;
        self.start_node(node);
        let value = self.tree.child(node, Role::Expression);
        if value.is_null() {
            self.write_keyword("default");
        } else {
            self.write_keyword("case");
            self.space();
            self.visit(value)?;
        }
        self.write_token(":");
        self.end_node(node);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Jumps
    // ------------------------------------------------------------------------

    pub(super) fn visit_break_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        let target = self.enclosing_jump_target(node, true);
        self.write_keyword_referencing("break", target);
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_continue_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        let target = self.enclosing_jump_target(node, false);
        self.write_keyword_referencing("continue", target);
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_goto_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("goto");
        self.space();
        self.write_name_of(node)?;
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_goto_case_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("goto");
        self.space();
        self.write_keyword("case");
        self.space();
        let value = self.required(node, Role::Expression)?;
        self.visit(value)?;
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_goto_default_statement(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("goto");
        self.space();
        self.write_keyword("default");
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_return_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        let function = self.enclosing_function(node);
        self.write_keyword_referencing("return", function);
        let value = self.tree.child(node, Role::Expression);
        if !value.is_null() {
            self.space();
            self.visit(value)?;
        }
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_throw_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("throw");
        let value = self.tree.child(node, Role::Expression);
        if !value.is_null() {
            self.space();
            self.visit(value)?;
        }
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_yield_return_statement(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let function = self.enclosing_function(node);
        self.write_keyword_referencing("yield", function);
        self.space();
        self.write_keyword_referencing("return", function);
        self.space();
        let value = self.required(node, Role::Expression)?;
        self.visit(value)?;
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_yield_break_statement(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        let function = self.enclosing_function(node);
        self.write_keyword_referencing("yield", function);
        self.space();
        self.write_keyword_referencing("break", function);
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Exceptions and resources
    // ------------------------------------------------------------------------

    pub(super) fn visit_try_catch_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        let style = options.statement_brace_style;
        self.start_node(node);
        self.write_keyword("try");
        let try_block = self.required(node, Role::TryBlock)?;
        self.write_block(try_block, style)?;
        for clause in self.children_in(node, Role::CatchClause) {
            match options.catch_new_line_placement {
                NewLinePlacement::SameLine => self.space(),
                NewLinePlacement::NewLine => self.new_line(),
            }
            self.visit(clause)?;
        }
        let finally_block = tree.child(node, Role::FinallyBlock);
        if !finally_block.is_null() {
            match options.finally_new_line_placement {
                NewLinePlacement::SameLine => self.space(),
                NewLinePlacement::NewLine => self.new_line(),
            }
            self.write_keyword("finally");
            self.write_block(finally_block, style)?;
        }
        self.new_line();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_catch_clause(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        self.expect_parent(node, "a try statement", |k| {
            matches!(k, NodeKind::TryCatchStatement)
        })?;
        self.start_node(node);
        self.write_keyword("catch");
        let ty = tree.child(node, Role::Type);
        if !ty.is_null() {
            self.space_if(options.space_before_catch_parentheses);
            self.write_token("(");
            self.space_if(options.space_within_catch_parentheses);
            self.visit(ty)?;
            if tree.has_child(node, Role::Identifier) {
                self.space();
                self.write_name_of(node)?;
            }
            self.space_if(options.space_within_catch_parentheses);
            self.write_token(")");
        }
        let body = self.required(node, Role::Body)?;
        self.write_block(body, options.statement_brace_style)?;
        self.end_node(node);
        Ok(())
    }

    /// `checked`, `unchecked` and `unsafe` blocks.
    pub(super) fn visit_keyword_block_statement(
        &mut self,
        node: NodeId,
        keyword: &'static str,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword(keyword);
        let body = self.required(node, Role::Body)?;
        self.write_block(body, self.options.statement_brace_style)?;
        self.new_line();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_lock_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.start_node(node);
        self.write_keyword("lock");
        let expression = self.required(node, Role::Expression)?;
        self.write_parenthesized(
            expression,
            options.space_before_lock_parentheses,
            options.space_within_lock_parentheses,
        )?;
        let body = self.tree.child(node, Role::EmbeddedStatement);
        self.write_embedded_statement(body, NewLinePlacement::NewLine)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_using_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.start_node(node);
        self.write_keyword("using");
        let resource = self.required(node, Role::ResourceAcquisition)?;
        self.write_parenthesized(
            resource,
            options.space_before_using_parentheses,
            options.space_within_using_parentheses,
        )?;
        let body = self.tree.child(node, Role::EmbeddedStatement);
        self.write_embedded_statement(body, NewLinePlacement::NewLine)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_fixed_statement(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.start_node(node);
        self.write_keyword("fixed");
        self.space_if(options.space_before_fixed_parentheses);
        self.write_token("(");
        self.space_if(options.space_within_fixed_parentheses);
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        self.space();
        let variables = self.children_in(node, Role::Variable);
        self.comma_separated_list(&variables)?;
        self.space_if(options.space_within_fixed_parentheses);
        self.write_token(")");
        let body = self.tree.child(node, Role::EmbeddedStatement);
        self.write_embedded_statement(body, NewLinePlacement::NewLine)?;
        self.end_node(node);
        Ok(())
    }
}
