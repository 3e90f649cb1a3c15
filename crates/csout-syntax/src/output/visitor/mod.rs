// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The tree renderer.
//!
//! [`OutputVisitor`] walks a syntax tree and drives a [`TokenWriter`]: one
//! method per node kind writes the node's keywords, punctuation and children
//! in order. Every optional space, brace placement and wrap is decided by
//! [`FormattingOptions`]; the writer chain takes care of escaping, required
//! spaces, comments and locations.
//!
//! The per-kind methods live in three files:
//!
//! - `expressions.rs`: expressions, types and query clauses
//! - `statements.rs`: statements, blocks, switch sections and catch clauses
//! - `declarations.rs`: compilation units, namespaces, types and members
//!
//! This file holds the dispatch, the shared write helpers and the brace
//! placement logic.

mod declarations;
mod expressions;
mod statements;

use csout_core::{CancellationPoll, CancellationToken, TextLocation, TextRange};

use super::events::{BracePairKind, RenderEvents};
use super::options::{BraceStyle, FormattingOptions};
use super::token_writer::TokenWriter;
use crate::ast::{Modifiers, NodeId, NodeKind, Role, SyntaxTree};
use crate::error::RenderError;

/// Child loops check the cancellation token once per this many iterations.
const CANCELLATION_INTERVAL: u32 = 100;

pub struct OutputVisitor<'a, 'e, W: TokenWriter> {
    tree: &'a SyntaxTree,
    writer: W,
    options: &'a FormattingOptions,
    events: &'e mut dyn RenderEvents,
    poll: CancellationPoll<'a>,
    /// Open nodes with the location their first token starts at.
    containers: Vec<(NodeId, Option<TextLocation>)>,
    /// Open braces: the range of `{` and what the pair delimits.
    braces: Vec<(Option<TextRange>, BracePairKind)>,
    at_line_start: bool,
}

impl<'a, 'e, W: TokenWriter> OutputVisitor<'a, 'e, W> {
    pub fn new(
        tree: &'a SyntaxTree,
        writer: W,
        options: &'a FormattingOptions,
        events: &'e mut dyn RenderEvents,
        cancel: &'a CancellationToken,
    ) -> Self {
        OutputVisitor {
            tree,
            writer,
            options,
            events,
            poll: CancellationPoll::new(cancel, CANCELLATION_INTERVAL),
            containers: Vec::new(),
            braces: Vec::new(),
            at_line_start: true,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Render `node` and everything below it. Visiting the null node writes
    /// nothing.
    pub fn visit(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        match tree.kind(node) {
            NodeKind::Null => Ok(()),

            NodeKind::Identifier { .. }
            | NodeKind::Token
            | NodeKind::ModifierToken { .. }
            | NodeKind::Comment { .. }
            | NodeKind::PreProcessorDirective { .. } => {
                Err(self.invalid(node, "written by its parent, not visited"))
            }

            NodeKind::CompilationUnit => self.visit_compilation_unit(node),
            NodeKind::UsingDeclaration => self.visit_using_declaration(node),
            NodeKind::NamespaceDeclaration => self.visit_namespace_declaration(node),
            NodeKind::TypeDeclaration { .. } => self.visit_type_declaration(node),
            NodeKind::EnumMemberDeclaration { .. } => self.visit_enum_member_declaration(node),
            NodeKind::FieldDeclaration { .. } => self.visit_field_declaration(node),
            NodeKind::PropertyDeclaration { .. } => self.visit_property_declaration(node),
            NodeKind::Accessor { .. } => self.visit_accessor(node),
            NodeKind::MethodDeclaration { .. } => self.visit_method_declaration(node),
            NodeKind::ConstructorDeclaration { .. } => self.visit_constructor_declaration(node),
            NodeKind::ConstructorInitializer { .. } => self.visit_constructor_initializer(node),
            NodeKind::ParameterDeclaration { .. } => self.visit_parameter_declaration(node),
            NodeKind::TypeParameterDeclaration => self.visit_type_parameter_declaration(node),
            NodeKind::AttributeSection { .. } => self.visit_attribute_section(node),
            NodeKind::Attribute => self.visit_attribute(node),
            NodeKind::VariableInitializer => self.visit_variable_initializer(node),

            NodeKind::SimpleType => self.visit_simple_type(node),
            NodeKind::MemberType { .. } => self.visit_member_type(node),
            NodeKind::PrimitiveType { .. } => self.visit_primitive_type(node),
            NodeKind::ComposedType { .. } => self.visit_composed_type(node),
            NodeKind::ArraySpecifier { .. } => self.visit_array_specifier(node),

            NodeKind::BlockStatement => self.visit_block_statement(node),
            NodeKind::ExpressionStatement => self.visit_expression_statement(node),
            NodeKind::VariableDeclarationStatement { .. } => {
                self.visit_variable_declaration_statement(node)
            }
            NodeKind::EmptyStatement => self.visit_empty_statement(node),
            NodeKind::IfElseStatement => self.visit_if_else_statement(node),
            NodeKind::WhileStatement => self.visit_while_statement(node),
            NodeKind::DoWhileStatement => self.visit_do_while_statement(node),
            NodeKind::ForStatement => self.visit_for_statement(node),
            NodeKind::ForeachStatement => self.visit_foreach_statement(node),
            NodeKind::SwitchStatement => self.visit_switch_statement(node),
            NodeKind::SwitchSection => self.visit_switch_section(node),
            NodeKind::CaseLabel => self.visit_case_label(node),
            NodeKind::BreakStatement => self.visit_break_statement(node),
            NodeKind::ContinueStatement => self.visit_continue_statement(node),
            NodeKind::GotoStatement => self.visit_goto_statement(node),
            NodeKind::GotoCaseStatement => self.visit_goto_case_statement(node),
            NodeKind::GotoDefaultStatement => self.visit_goto_default_statement(node),
            NodeKind::ReturnStatement => self.visit_return_statement(node),
            NodeKind::ThrowStatement => self.visit_throw_statement(node),
            NodeKind::TryCatchStatement => self.visit_try_catch_statement(node),
            NodeKind::CatchClause => self.visit_catch_clause(node),
            NodeKind::CheckedStatement => self.visit_keyword_block_statement(node, "checked"),
            NodeKind::UncheckedStatement => self.visit_keyword_block_statement(node, "unchecked"),
            NodeKind::UnsafeStatement => self.visit_keyword_block_statement(node, "unsafe"),
            NodeKind::LockStatement => self.visit_lock_statement(node),
            NodeKind::UsingStatement => self.visit_using_statement(node),
            NodeKind::FixedStatement => self.visit_fixed_statement(node),
            NodeKind::YieldReturnStatement => self.visit_yield_return_statement(node),
            NodeKind::YieldBreakStatement => self.visit_yield_break_statement(node),
            NodeKind::LabelStatement => self.visit_label_statement(node),

            NodeKind::IdentifierExpression => self.visit_identifier_expression(node),
            NodeKind::PrimitiveExpression { .. } => self.visit_primitive_expression(node),
            NodeKind::NullReferenceExpression => self.visit_null_reference_expression(node),
            NodeKind::ThisReferenceExpression => self.visit_keyword_expression(node, "this"),
            NodeKind::BaseReferenceExpression => self.visit_keyword_expression(node, "base"),
            NodeKind::BinaryOperatorExpression { .. } => self.visit_binary_operator_expression(node),
            NodeKind::UnaryOperatorExpression { .. } => self.visit_unary_operator_expression(node),
            NodeKind::AssignmentExpression { .. } => self.visit_assignment_expression(node),
            NodeKind::ConditionalExpression => self.visit_conditional_expression(node),
            NodeKind::CastExpression => self.visit_cast_expression(node),
            NodeKind::AsExpression => self.visit_type_test_expression(node, "as"),
            NodeKind::IsExpression => self.visit_type_test_expression(node, "is"),
            NodeKind::InvocationExpression => self.visit_invocation_expression(node),
            NodeKind::MemberReferenceExpression => self.visit_member_reference_expression(node),
            NodeKind::IndexerExpression => self.visit_indexer_expression(node),
            NodeKind::ParenthesizedExpression => self.visit_parenthesized_expression(node),
            NodeKind::LambdaExpression { .. } => self.visit_lambda_expression(node),
            NodeKind::AnonymousMethodExpression { .. } => {
                self.visit_anonymous_method_expression(node)
            }
            NodeKind::ObjectCreateExpression => self.visit_object_create_expression(node),
            NodeKind::ArrayCreateExpression => self.visit_array_create_expression(node),
            NodeKind::ArrayInitializerExpression => self.visit_array_initializer_expression(node),
            NodeKind::NamedExpression => self.visit_named_expression(node),
            NodeKind::TypeOfExpression => self.visit_type_operator_expression(node, "typeof"),
            NodeKind::DefaultValueExpression => self.visit_type_operator_expression(node, "default"),
            NodeKind::SizeOfExpression => self.visit_type_operator_expression(node, "sizeof"),
            NodeKind::TypeReferenceExpression => self.visit_type_reference_expression(node),
            NodeKind::CheckedExpression => self.visit_checked_expression(node, "checked"),
            NodeKind::UncheckedExpression => self.visit_checked_expression(node, "unchecked"),
            NodeKind::DirectionExpression { .. } => self.visit_direction_expression(node),
            NodeKind::QueryExpression => self.visit_query_expression(node),
            NodeKind::QueryFromClause => self.visit_query_from_clause(node),
            NodeKind::QueryLetClause => self.visit_query_let_clause(node),
            NodeKind::QueryWhereClause => self.visit_query_where_clause(node),
            NodeKind::QueryOrderClause => self.visit_query_order_clause(node),
            NodeKind::QueryOrdering { .. } => self.visit_query_ordering(node),
            NodeKind::QuerySelectClause => self.visit_query_select_clause(node),
            NodeKind::ErrorExpression => self.visit_error_expression(node),
        }
    }

    // ------------------------------------------------------------------------
    // Node bracketing
    // ------------------------------------------------------------------------

    fn start_node(&mut self, node: NodeId) {
        self.containers.push((node, self.writer.location()));
        self.writer.start_node(self.tree, node);
    }

    fn end_node(&mut self, node: NodeId) {
        if let Some((open, start)) = self.containers.pop() {
            debug_assert_eq!(open, node, "unbalanced start/end node");
            self.report_sequence_point(node, start);
        }
        self.writer.end_node(self.tree, node);
    }

    fn report_sequence_point(&mut self, node: NodeId, start: Option<TextLocation>) {
        let tree = self.tree;
        let debug_ranges = tree.annotations().debug_ranges(node);
        if debug_ranges.is_empty() || !tree.kind(node).is_statement() {
            return;
        }
        if let (Some(start), Some(last)) = (start, self.writer.last_token_range()) {
            if start.offset <= last.end.offset {
                let range = TextRange::new(start, last.end);
                self.events.add_sequence_point(node, range, debug_ranges);
            }
        }
    }

    /// The role of the innermost open node.
    fn container_role(&self) -> Role {
        self.containers
            .last()
            .map(|(node, _)| self.tree.role(*node))
            .unwrap_or(Role::Root)
    }

    fn invalid(&self, node: NodeId, reason: &str) -> RenderError {
        let tree = self.tree;
        RenderError::InvalidTree {
            kind: tree.kind(node).name(),
            node,
            reason: reason.to_string(),
            location: tree
                .locations()
                .start_of(node)
                .or_else(|| self.writer.location()),
        }
    }

    /// The child of `node` in `role`, which must be present.
    fn required(&self, node: NodeId, role: Role) -> Result<NodeId, RenderError> {
        let child = self.tree.child(node, role);
        if child.is_null() {
            return Err(self.invalid(node, &format!("missing required {} child", role)));
        }
        Ok(child)
    }

    /// Fail unless `node`'s parent has a kind accepted by `accepts`.
    fn expect_parent<F>(&self, node: NodeId, what: &str, accepts: F) -> Result<(), RenderError>
    where
        F: Fn(&NodeKind) -> bool,
    {
        let tree = self.tree;
        match tree.parent(node) {
            Some(parent) if accepts(tree.kind(parent)) => Ok(()),
            _ => Err(self.invalid(node, &format!("must be a child of {}", what))),
        }
    }

    // ------------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------------

    fn write_keyword(&mut self, keyword: &'static str) {
        self.writer.write_keyword(self.tree, Role::Token(keyword), keyword);
        self.at_line_start = false;
    }

    /// Write a keyword and report it as belonging to `reference`.
    fn write_keyword_referencing(&mut self, keyword: &'static str, reference: Option<NodeId>) {
        self.write_keyword(keyword);
        if let (Some(reference), Some(range)) = (reference, self.writer.last_token_range()) {
            self.events.add_keyword_reference(range, reference);
        }
    }

    fn write_token(&mut self, token: &'static str) {
        self.writer.write_token(self.tree, Role::Token(token), token);
        self.at_line_start = false;
    }

    fn write_identifier(&mut self, identifier: NodeId) {
        let tree = self.tree;
        self.writer.write_identifier(tree, identifier);
        self.at_line_start = false;
        let Some(range) = self.writer.last_token_range() else {
            return;
        };
        let owner = tree.parent(identifier).unwrap_or(NodeId::NULL);
        let annotations = tree.annotations();
        let symbol = annotations
            .symbol(identifier)
            .or_else(|| annotations.symbol(owner));
        if let Some(symbol) = symbol {
            let is_definition = tree.kind(owner).is_entity_declaration()
                || matches!(
                    tree.kind(owner),
                    NodeKind::VariableInitializer
                        | NodeKind::ParameterDeclaration { .. }
                        | NodeKind::TypeParameterDeclaration
                        | NodeKind::LabelStatement
                        | NodeKind::CatchClause
                        | NodeKind::ForeachStatement
                );
            self.events.add_symbol_reference(range, symbol, is_definition);
        }
        if let Some(color) = annotations.color(identifier).or_else(|| annotations.color(owner)) {
            self.events.add_highlight(range, color);
        }
    }

    /// Write the `Identifier` child of `node`, which must be present.
    fn write_name_of(&mut self, node: NodeId) -> Result<(), RenderError> {
        let identifier = self.required(node, Role::Identifier)?;
        self.write_identifier(identifier);
        Ok(())
    }

    fn write_modifiers(&mut self, modifiers: Modifiers) {
        for modifier in modifiers.iter() {
            self.writer
                .write_keyword(self.tree, Role::Modifier, modifier.keyword());
            self.at_line_start = false;
            self.space();
        }
    }

    fn space(&mut self) {
        self.writer.space();
    }

    fn space_if(&mut self, add_space: bool) {
        if add_space {
            self.space();
        }
    }

    fn new_line(&mut self) {
        self.writer.new_line();
        self.at_line_start = true;
    }

    fn new_lines(&mut self, count: u32) {
        for _ in 0..count {
            self.new_line();
        }
    }

    /// `;` and a new line, unless the enclosing statement is part of a `for`
    /// header or a `using` resource, which write their own separators.
    fn semicolon(&mut self) {
        match self.container_role() {
            Role::ForInitializer | Role::ForIterator | Role::ResourceAcquisition => {}
            _ => {
                self.write_token(";");
                if self.is_single_line_accessor() {
                    self.space();
                } else {
                    self.new_line();
                }
            }
        }
    }

    /// An accessor without body inside a property written on one line.
    fn is_single_line_accessor(&self) -> bool {
        let tree = self.tree;
        let Some(&(node, _)) = self.containers.last() else {
            return false;
        };
        if !matches!(tree.kind(node), NodeKind::Accessor { .. }) {
            return false;
        }
        tree.parent(node)
            .is_some_and(|property| self.is_single_line_property(property))
    }

    fn comma(&mut self, no_space_after: bool) {
        self.space_if(self.options.space_before_comma);
        self.write_token(",");
        self.space_if(!no_space_after && self.options.space_after_comma);
    }

    /// Write a `,` or `;` only when the tree holds that token explicitly after
    /// `last`, for trailing separators the source had.
    fn optional_token(&mut self, last: NodeId, token: &'static str) {
        let tree = self.tree;
        let mut next = tree.next_sibling(last);
        while let Some(n) = next {
            if tree.role(n).is_special() {
                next = tree.next_sibling(n);
                continue;
            }
            if tree.role(n) == Role::Token(token) {
                if token == "," {
                    self.comma(true);
                } else {
                    self.write_token(token);
                }
            }
            return;
        }
    }

    fn comma_separated_list(&mut self, nodes: &[NodeId]) -> Result<(), RenderError> {
        for (i, &node) in nodes.iter().enumerate() {
            self.poll.tick()?;
            if i > 0 {
                self.comma(false);
            }
            self.visit(node)?;
        }
        Ok(())
    }

    fn comma_separated_list_in(
        &mut self,
        open: &'static str,
        close: &'static str,
        nodes: &[NodeId],
        space_within: bool,
    ) -> Result<(), RenderError> {
        self.write_token(open);
        if !nodes.is_empty() {
            self.space_if(space_within);
            self.comma_separated_list(nodes)?;
            self.space_if(space_within);
        }
        self.write_token(close);
        Ok(())
    }

    fn children_in(&self, node: NodeId, role: Role) -> Vec<NodeId> {
        self.tree.children_by_role(node, role).collect()
    }

    fn write_type_arguments(&mut self, node: NodeId) -> Result<(), RenderError> {
        let arguments = self.children_in(node, Role::TypeArgument);
        if !arguments.is_empty() {
            self.comma_separated_list_in("<", ">", &arguments, false)?;
        }
        Ok(())
    }

    fn write_type_parameters(&mut self, node: NodeId) -> Result<(), RenderError> {
        let parameters = self.children_in(node, Role::TypeParameter);
        if !parameters.is_empty() {
            self.comma_separated_list_in("<", ">", &parameters, false)?;
        }
        Ok(())
    }

    fn write_attributes(&mut self, node: NodeId) -> Result<(), RenderError> {
        for section in self.children_in(node, Role::AttributeSection) {
            self.visit(section)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Braces
    // ------------------------------------------------------------------------

    /// What the braces opened inside the innermost open node delimit.
    fn brace_kind(&self) -> BracePairKind {
        let tree = self.tree;
        let Some(&(mut owner, _)) = self.containers.last() else {
            return BracePairKind::Block;
        };
        if matches!(tree.kind(owner), NodeKind::BlockStatement) {
            match tree.parent(owner) {
                Some(parent) => owner = parent,
                None => return BracePairKind::Block,
            }
        }
        match tree.kind(owner) {
            NodeKind::NamespaceDeclaration => BracePairKind::Namespace,
            NodeKind::TypeDeclaration { .. } => BracePairKind::Type,
            NodeKind::MethodDeclaration { .. } | NodeKind::ConstructorDeclaration { .. } => {
                BracePairKind::Method
            }
            NodeKind::PropertyDeclaration { .. } => BracePairKind::Property,
            NodeKind::Accessor { .. } => BracePairKind::Accessor,
            NodeKind::LambdaExpression { .. } | NodeKind::AnonymousMethodExpression { .. } => {
                BracePairKind::AnonymousMethod
            }
            NodeKind::WhileStatement
            | NodeKind::DoWhileStatement
            | NodeKind::ForStatement
            | NodeKind::ForeachStatement => BracePairKind::Loop,
            NodeKind::IfElseStatement => BracePairKind::Conditional,
            NodeKind::SwitchStatement | NodeKind::SwitchSection => BracePairKind::Switch,
            NodeKind::TryCatchStatement | NodeKind::CatchClause => BracePairKind::Try,
            NodeKind::LockStatement => BracePairKind::Lock,
            NodeKind::UsingStatement => BracePairKind::Using,
            NodeKind::FixedStatement => BracePairKind::Fixed,
            NodeKind::CheckedStatement | NodeKind::UncheckedStatement => BracePairKind::Checked,
            NodeKind::UnsafeStatement => BracePairKind::Unsafe,
            NodeKind::ArrayInitializerExpression | NodeKind::ObjectCreateExpression => {
                BracePairKind::Initializer
            }
            _ => BracePairKind::Block,
        }
    }

    fn open_brace(&mut self, style: BraceStyle, new_line: bool) {
        match style {
            BraceStyle::EndOfLine | BraceStyle::BannerStyle => {
                if !self.at_line_start {
                    self.space();
                }
                self.write_token("{");
            }
            BraceStyle::EndOfLineWithoutSpace => self.write_token("{"),
            BraceStyle::NextLine => {
                if !self.at_line_start {
                    self.new_line();
                }
                self.write_token("{");
            }
            BraceStyle::NextLineShifted | BraceStyle::NextLineShifted2 => {
                if !self.at_line_start {
                    self.new_line();
                }
                self.writer.indent();
                self.write_token("{");
            }
        }
        let left = self.writer.last_token_range();
        let kind = self.brace_kind();
        self.braces.push((left, kind));
        if new_line {
            if style != BraceStyle::NextLineShifted {
                self.writer.indent();
            }
            self.new_line();
        }
    }

    fn close_brace(&mut self, style: BraceStyle, unindent: bool) {
        match style {
            BraceStyle::EndOfLine | BraceStyle::EndOfLineWithoutSpace | BraceStyle::NextLine => {
                if unindent {
                    self.writer.unindent();
                }
                self.write_token("}");
            }
            BraceStyle::BannerStyle => {
                self.write_token("}");
                if unindent {
                    self.writer.unindent();
                }
            }
            BraceStyle::NextLineShifted => {
                self.write_token("}");
                self.writer.unindent();
            }
            BraceStyle::NextLineShifted2 => {
                if unindent {
                    self.writer.unindent();
                }
                self.write_token("}");
                self.writer.unindent();
            }
        }
        let right = self.writer.last_token_range();
        if let Some((left, kind)) = self.braces.pop() {
            if let (Some(left), Some(right)) = (left, right) {
                self.events.add_brace_pair(left, right, kind);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Keyword references
    // ------------------------------------------------------------------------

    /// The method, accessor, constructor or anonymous function whose body
    /// contains `node`.
    fn enclosing_function(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree;
        tree.ancestors(node).find(|&a| is_function(tree.kind(a)))
    }

    /// The innermost loop (or, when `include_switch`, switch) that a `break`
    /// or `continue` at `node` leaves, without crossing a function boundary.
    fn enclosing_jump_target(&self, node: NodeId, include_switch: bool) -> Option<NodeId> {
        let tree = self.tree;
        for ancestor in tree.ancestors(node) {
            let kind = tree.kind(ancestor);
            if is_function(kind) {
                return None;
            }
            let is_loop = matches!(
                kind,
                NodeKind::WhileStatement
                    | NodeKind::DoWhileStatement
                    | NodeKind::ForStatement
                    | NodeKind::ForeachStatement
            );
            if is_loop || (include_switch && matches!(kind, NodeKind::SwitchStatement)) {
                return Some(ancestor);
            }
        }
        None
    }
}

fn is_function(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::MethodDeclaration { .. }
            | NodeKind::ConstructorDeclaration { .. }
            | NodeKind::Accessor { .. }
            | NodeKind::LambdaExpression { .. }
            | NodeKind::AnonymousMethodExpression { .. }
    )
}
