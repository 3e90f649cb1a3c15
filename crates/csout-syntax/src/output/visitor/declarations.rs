// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compilation units, namespaces, types and their members.

use super::OutputVisitor;
use crate::ast::{
    AccessorKind, ClassType, ConstructorInitializerKind, NodeId, NodeKind, ParameterModifier, Role,
};
use crate::error::RenderError;
use crate::output::options::{BraceStyle, PropertyFormatting};
use crate::output::token_writer::TokenWriter;

/// Targets allowed before the `:` of an attribute section.
const ATTRIBUTE_TARGETS: &[&str] = &[
    "assembly", "module", "field", "event", "method", "param", "property", "return", "type",
];

impl<W: TokenWriter> OutputVisitor<'_, '_, W> {
    pub(super) fn visit_compilation_unit(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_top_level_members(node)?;
        self.end_node(node);
        Ok(())
    }

    /// Members of a compilation unit or namespace: usings first, then blank
    /// lines between types and namespaces.
    fn write_top_level_members(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        let mut previous: Option<NodeId> = None;
        for member in self.children_in(node, Role::Member) {
            self.poll.tick()?;
            if let Some(previous) = previous {
                let after_usings = matches!(tree.kind(previous), NodeKind::UsingDeclaration);
                if after_usings && !matches!(tree.kind(member), NodeKind::UsingDeclaration) {
                    self.new_lines(options.blank_lines_after_usings);
                } else if !after_usings {
                    self.new_lines(options.blank_lines_between_types);
                }
            }
            self.visit(member)?;
            previous = Some(member);
        }
        Ok(())
    }

    pub(super) fn visit_using_declaration(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_keyword("using");
        self.space();
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        self.semicolon();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_namespace_declaration(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        let style = options.namespace_brace_style;
        self.start_node(node);
        self.write_keyword("namespace");
        self.space();
        self.write_name_of(node)?;
        self.open_brace(style, true);
        if !options.indent_namespace_body {
            self.writer.unindent();
        }
        self.write_top_level_members(node)?;
        if !options.indent_namespace_body {
            self.writer.indent();
        }
        self.close_brace(style, true);
        self.new_line();
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_type_declaration(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::TypeDeclaration {
            class_type,
            modifiers,
        } = *self.tree.kind(node)
        else {
            return Ok(());
        };
        let options = self.options;
        self.start_node(node);
        self.write_attributes(node)?;
        self.write_modifiers(modifiers);
        self.write_keyword(class_type.keyword());
        self.space();
        self.write_name_of(node)?;
        self.write_type_parameters(node)?;
        let bases = self.children_in(node, Role::BaseType);
        if !bases.is_empty() {
            self.space();
            self.write_token(":");
            self.space();
            self.comma_separated_list(&bases)?;
        }
        let style = match class_type {
            ClassType::Class => options.class_brace_style,
            ClassType::Struct => options.struct_brace_style,
            ClassType::Interface => options.interface_brace_style,
            ClassType::Enum => options.enum_brace_style,
        };
        self.open_brace(style, true);
        if !options.indent_class_body {
            self.writer.unindent();
        }
        let members = self.children_in(node, Role::Member);
        if class_type == ClassType::Enum {
            self.write_enum_members(&members)?;
        } else {
            self.write_type_members(&members)?;
        }
        if !options.indent_class_body {
            self.writer.indent();
        }
        self.close_brace(style, true);
        self.new_line();
        self.end_node(node);
        Ok(())
    }

    fn write_enum_members(&mut self, members: &[NodeId]) -> Result<(), RenderError> {
        for (i, &member) in members.iter().enumerate() {
            self.poll.tick()?;
            if i > 0 {
                self.comma(true);
                self.new_line();
            }
            self.visit(member)?;
        }
        if let Some(&last) = members.last() {
            self.optional_token(last, ",");
            self.new_line();
        }
        Ok(())
    }

    fn write_type_members(&mut self, members: &[NodeId]) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        let mut previous: Option<NodeId> = None;
        for &member in members {
            self.poll.tick()?;
            if let Some(previous) = previous {
                let (before, current) = (tree.kind(previous), tree.kind(member));
                if member_group(before) != member_group(current) {
                    if let Some(location) = self.writer.location() {
                        self.events.add_line_separator(location.offset);
                    }
                }
                let both_fields = matches!(before, NodeKind::FieldDeclaration { .. })
                    && matches!(current, NodeKind::FieldDeclaration { .. });
                self.new_lines(if both_fields {
                    options.blank_lines_between_fields
                } else {
                    options.blank_lines_between_members
                });
            }
            self.visit(member)?;
            previous = Some(member);
        }
        Ok(())
    }

    pub(super) fn visit_enum_member_declaration(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let NodeKind::EnumMemberDeclaration { modifiers } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_attributes(node)?;
        self.write_modifiers(modifiers);
        self.write_name_of(node)?;
        let value = self.tree.child(node, Role::Initializer);
        if !value.is_null() {
            let spaced = self.options.space_around_assignment;
            self.space_if(spaced);
            self.write_token("=");
            self.space_if(spaced);
            self.visit(value)?;
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_field_declaration(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::FieldDeclaration { modifiers } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_attributes(node)?;
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

    pub(super) fn visit_property_declaration(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let NodeKind::PropertyDeclaration { modifiers } = *tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_attributes(node)?;
        self.write_modifiers(modifiers);
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        self.space();
        self.write_name_of(node)?;
        let getter = tree.child(node, Role::Getter);
        let setter = tree.child(node, Role::Setter);
        if self.is_single_line_property(node) {
            self.open_brace(BraceStyle::EndOfLine, false);
            self.space();
            self.visit(getter)?;
            self.visit(setter)?;
            self.close_brace(BraceStyle::EndOfLine, false);
        } else {
            let style = self.options.property_brace_style;
            self.open_brace(style, true);
            self.visit(getter)?;
            self.visit(setter)?;
            self.close_brace(style, true);
        }
        self.new_line();
        self.end_node(node);
        Ok(())
    }

    /// Whether `property` is written as `{ get; set; }` on its own line:
    /// the policy asks for it and no accessor has a body or attributes.
    pub(super) fn is_single_line_property(&self, property: NodeId) -> bool {
        let tree = self.tree;
        if self.options.auto_property_formatting != PropertyFormatting::SingleLine {
            return false;
        }
        [Role::Getter, Role::Setter]
            .into_iter()
            .map(|role| tree.child(property, role))
            .filter(|accessor| !accessor.is_null())
            .all(|accessor| {
                !tree.has_child(accessor, Role::Body)
                    && !tree.has_child(accessor, Role::AttributeSection)
            })
    }

    pub(super) fn visit_accessor(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::Accessor { kind, modifiers } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.expect_parent(node, "a property", |k| {
            matches!(k, NodeKind::PropertyDeclaration { .. })
        })?;
        self.start_node(node);
        self.write_attributes(node)?;
        self.write_modifiers(modifiers);
        self.write_keyword(match kind {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
        });
        let body = self.tree.child(node, Role::Body);
        self.write_method_body(body, self.options.accessor_brace_style)?;
        self.end_node(node);
        Ok(())
    }

    /// `;` for a missing body, otherwise the block and a new line.
    fn write_method_body(&mut self, body: NodeId, style: BraceStyle) -> Result<(), RenderError> {
        if body.is_null() {
            self.semicolon();
            return Ok(());
        }
        self.write_block(body, style)?;
        self.new_line();
        Ok(())
    }

    fn write_parameter_list(&mut self, node: NodeId) -> Result<(), RenderError> {
        let options = self.options;
        self.space_if(options.space_before_method_declaration_parentheses);
        let parameters = self.children_in(node, Role::Parameter);
        self.comma_separated_list_in(
            "(",
            ")",
            &parameters,
            options.space_within_method_declaration_parentheses,
        )
    }

    pub(super) fn visit_method_declaration(&mut self, node: NodeId) -> Result<(), RenderError> {
        let NodeKind::MethodDeclaration { modifiers } = *self.tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_attributes(node)?;
        self.write_modifiers(modifiers);
        let return_type = self.required(node, Role::Type)?;
        self.visit(return_type)?;
        self.space();
        self.write_name_of(node)?;
        self.write_type_parameters(node)?;
        self.write_parameter_list(node)?;
        let body = self.tree.child(node, Role::Body);
        self.write_method_body(body, self.options.method_brace_style)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_constructor_declaration(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let tree = self.tree;
        let NodeKind::ConstructorDeclaration { modifiers } = *tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_attributes(node)?;
        self.write_modifiers(modifiers);
        self.write_name_of(node)?;
        self.write_parameter_list(node)?;
        let initializer = tree.child(node, Role::Initializer);
        if !initializer.is_null() {
            self.new_line();
            self.writer.indent();
            self.visit(initializer)?;
            self.writer.unindent();
        }
        let body = tree.child(node, Role::Body);
        self.write_method_body(body, self.options.constructor_brace_style)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_constructor_initializer(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        let NodeKind::ConstructorInitializer { kind } = *self.tree.kind(node) else {
            return Ok(());
        };
        let options = self.options;
        self.start_node(node);
        self.write_token(":");
        self.space();
        self.write_keyword(match kind {
            ConstructorInitializerKind::Base => "base",
            ConstructorInitializerKind::This => "this",
        });
        self.space_if(options.space_before_method_call_parentheses);
        let arguments = self.children_in(node, Role::Argument);
        self.comma_separated_list_in(
            "(",
            ")",
            &arguments,
            options.space_within_method_call_parentheses,
        )?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_parameter_declaration(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let NodeKind::ParameterDeclaration { modifier } = *tree.kind(node) else {
            return Ok(());
        };
        self.start_node(node);
        self.write_attributes(node)?;
        let keyword = match modifier {
            ParameterModifier::None => None,
            ParameterModifier::Ref => Some("ref"),
            ParameterModifier::Out => Some("out"),
            ParameterModifier::Params => Some("params"),
            ParameterModifier::This => Some("this"),
        };
        if let Some(keyword) = keyword {
            self.write_keyword(keyword);
            self.space();
        }
        let ty = tree.child(node, Role::Type);
        if !ty.is_null() {
            self.visit(ty)?;
            self.space();
        }
        self.write_name_of(node)?;
        let default = tree.child(node, Role::DefaultValue);
        if !default.is_null() {
            let spaced = self.options.space_around_assignment;
            self.space_if(spaced);
            self.write_token("=");
            self.space_if(spaced);
            self.visit(default)?;
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_type_parameter_declaration(
        &mut self,
        node: NodeId,
    ) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_attributes(node)?;
        self.write_name_of(node)?;
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_attribute_section(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let NodeKind::AttributeSection { target } = tree.kind(node) else {
            return Ok(());
        };
        let target = match target.as_deref() {
            Some(name) => match ATTRIBUTE_TARGETS.iter().find(|&&t| t == name) {
                Some(&keyword) => Some(keyword),
                None => {
                    return Err(self.invalid(node, &format!("unknown attribute target '{}'", name)));
                }
            },
            None => None,
        };
        self.start_node(node);
        self.write_token("[");
        if let Some(keyword) = target {
            self.write_keyword(keyword);
            self.write_token(":");
            self.space();
        }
        let attributes = self.children_in(node, Role::Attribute);
        self.comma_separated_list(&attributes)?;
        self.write_token("]");
        let inline = tree.parent(node).is_some_and(|p| {
            matches!(
                tree.kind(p),
                NodeKind::ParameterDeclaration { .. } | NodeKind::TypeParameterDeclaration
            )
        });
        if inline {
            self.space();
        } else {
            self.new_line();
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_attribute(&mut self, node: NodeId) -> Result<(), RenderError> {
        let tree = self.tree;
        let options = self.options;
        self.start_node(node);
        let ty = self.required(node, Role::Type)?;
        self.visit(ty)?;
        let arguments = self.children_in(node, Role::Argument);
        if !arguments.is_empty() || tree.has_child(node, Role::Token("(")) {
            self.space_if(options.space_before_method_call_parentheses);
            self.comma_separated_list_in(
                "(",
                ")",
                &arguments,
                options.space_within_method_call_parentheses,
            )?;
        }
        self.end_node(node);
        Ok(())
    }

    pub(super) fn visit_variable_initializer(&mut self, node: NodeId) -> Result<(), RenderError> {
        self.start_node(node);
        self.write_name_of(node)?;
        let value = self.tree.child(node, Role::Initializer);
        if !value.is_null() {
            let spaced = self.options.space_around_assignment;
            self.space_if(spaced);
            self.write_token("=");
            self.space_if(spaced);
            self.visit(value)?;
        }
        self.end_node(node);
        Ok(())
    }
}

/// Members of one group are kept together; a line separator is reported
/// where the group changes.
fn member_group(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::FieldDeclaration { .. } => 0,
        NodeKind::PropertyDeclaration { .. } => 1,
        NodeKind::ConstructorDeclaration { .. } => 2,
        NodeKind::MethodDeclaration { .. } => 3,
        NodeKind::TypeDeclaration { .. } => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Modifiers;

    #[test]
    fn test_member_groups() {
        let field = NodeKind::FieldDeclaration {
            modifiers: Modifiers::PRIVATE,
        };
        let other_field = NodeKind::FieldDeclaration {
            modifiers: Modifiers::STATIC,
        };
        let method = NodeKind::MethodDeclaration {
            modifiers: Modifiers::PUBLIC,
        };
        assert_eq!(member_group(&field), member_group(&other_field));
        assert_ne!(member_group(&field), member_group(&method));
    }

    #[test]
    fn test_attribute_targets() {
        assert!(ATTRIBUTE_TARGETS.contains(&"assembly"));
        assert!(ATTRIBUTE_TARGETS.contains(&"return"));
        assert!(!ATTRIBUTE_TARGETS.contains(&"class"));
    }
}
