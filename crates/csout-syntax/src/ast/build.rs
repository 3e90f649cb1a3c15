// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Construction helpers.
//!
//! Each helper allocates one node, attaches the given children in the roles
//! the renderer and the analyses expect, and returns the new node's id.
//! Optional children are passed as [`NodeId::NULL`]; lists are passed as
//! vectors and attached in order.
//!
//! | node kind                   | children (role)                                        |
//! |-----------------------------|--------------------------------------------------------|
//! | `BinaryOperatorExpression`  | `Left`, `Right`                                        |
//! | `InvocationExpression`      | `Target`, `Argument*`                                  |
//! | `MemberReferenceExpression` | `Target`, `Identifier`, `TypeArgument*`                |
//! | `IfElseStatement`           | `Condition`, `TrueStatement`, `FalseStatement`         |
//! | `ForStatement`              | `ForInitializer*`, `Condition`, `ForIterator*`, `EmbeddedStatement` |
//! | `TryCatchStatement`         | `TryBlock`, `CatchClause*`, `FinallyBlock`             |
//! | `MethodDeclaration`         | `AttributeSection*`, `Type`, `Identifier`, `TypeParameter*`, `Parameter*`, `Body` |
//!
//! The other kinds follow the same pattern; see the individual helpers.

use super::modifiers::Modifiers;
use super::node::{
    AccessorKind, ClassType, CommentKind, ConstructorInitializerKind, DirectiveKind,
    FieldDirection, NodeId, NodeKind, ParameterModifier,
};
use super::ops::{AssignmentOperator, BinaryOperator, UnaryOperator};
use super::role::Role;
use super::tree::SyntaxTree;
use super::value::PrimitiveValue;

impl SyntaxTree {
    fn node_with(&mut self, kind: NodeKind, children: &[(Role, NodeId)]) -> NodeId {
        let id = self.alloc(kind);
        for &(role, child) in children {
            self.add_child(id, role, child);
        }
        id
    }

    fn add_children(&mut self, parent: NodeId, role: Role, children: Vec<NodeId>) {
        for child in children {
            self.add_child(parent, role, child);
        }
    }

    // ------------------------------------------------------------------------
    // Leaves and specials
    // ------------------------------------------------------------------------

    pub fn identifier(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Identifier {
            name: name.to_string(),
            verbatim: false,
        })
    }

    /// An identifier written with a leading `@` regardless of its text.
    pub fn verbatim_identifier(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Identifier {
            name: name.to_string(),
            verbatim: true,
        })
    }

    pub fn comment(&mut self, kind: CommentKind, content: &str) -> NodeId {
        self.alloc(NodeKind::Comment {
            kind,
            content: content.to_string(),
        })
    }

    pub fn directive(&mut self, kind: DirectiveKind, argument: &str) -> NodeId {
        self.alloc(NodeKind::PreProcessorDirective {
            kind,
            argument: argument.to_string(),
        })
    }

    /// Insert a comment or directive before `anchor`, as its sibling.
    pub fn insert_special_before(&mut self, anchor: NodeId, special: NodeId) {
        let Some(parent) = self.parent(anchor) else {
            return;
        };
        let role = match self.kind(special) {
            NodeKind::PreProcessorDirective { .. } => Role::PreProcessorDirective,
            _ => Role::Comment,
        };
        self.insert_child_before(parent, Some(anchor), role, special);
    }

    /// Append a comment or directive as the last child of `parent`.
    pub fn append_special(&mut self, parent: NodeId, special: NodeId) {
        let role = match self.kind(special) {
            NodeKind::PreProcessorDirective { .. } => Role::PreProcessorDirective,
            _ => Role::Comment,
        };
        self.add_child(parent, role, special);
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    pub fn simple_type(&mut self, name: &str, type_arguments: Vec<NodeId>) -> NodeId {
        let ident = self.identifier(name);
        let id = self.node_with(NodeKind::SimpleType, &[(Role::Identifier, ident)]);
        self.add_children(id, Role::TypeArgument, type_arguments);
        id
    }

    pub fn member_type(&mut self, target: NodeId, name: &str, type_arguments: Vec<NodeId>) -> NodeId {
        let ident = self.identifier(name);
        let id = self.node_with(
            NodeKind::MemberType {
                double_colon: false,
            },
            &[(Role::Target, target), (Role::Identifier, ident)],
        );
        self.add_children(id, Role::TypeArgument, type_arguments);
        id
    }

    /// `alias::Name`
    pub fn alias_qualified_type(&mut self, alias: &str, name: &str) -> NodeId {
        let target = self.simple_type(alias, vec![]);
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::MemberType { double_colon: true },
            &[(Role::Target, target), (Role::Identifier, ident)],
        )
    }

    pub fn primitive_type(&mut self, keyword: &str) -> NodeId {
        self.alloc(NodeKind::PrimitiveType {
            keyword: keyword.to_string(),
        })
    }

    /// `base?`, `base*`, `base[]`, `base[,]`.
    pub fn composed_type(
        &mut self,
        base: NodeId,
        nullable: bool,
        pointer_rank: u32,
        array_dimensions: &[u32],
    ) -> NodeId {
        let id = self.node_with(
            NodeKind::ComposedType {
                nullable,
                pointer_rank,
            },
            &[(Role::Type, base)],
        );
        for &dimensions in array_dimensions {
            let spec = self.array_specifier(dimensions);
            self.add_child(id, Role::ArraySpecifier, spec);
        }
        id
    }

    pub fn array_specifier(&mut self, dimensions: u32) -> NodeId {
        self.alloc(NodeKind::ArraySpecifier {
            dimensions: dimensions.max(1),
        })
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub fn ident(&mut self, name: &str) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(NodeKind::IdentifierExpression, &[(Role::Identifier, ident)])
    }

    pub fn generic_ident(&mut self, name: &str, type_arguments: Vec<NodeId>) -> NodeId {
        let id = self.ident(name);
        self.add_children(id, Role::TypeArgument, type_arguments);
        id
    }

    pub fn primitive(&mut self, value: impl Into<PrimitiveValue>) -> NodeId {
        self.alloc(NodeKind::PrimitiveExpression {
            value: value.into(),
        })
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.alloc(NodeKind::NullReferenceExpression)
    }

    pub fn this_ref(&mut self) -> NodeId {
        self.alloc(NodeKind::ThisReferenceExpression)
    }

    pub fn base_ref(&mut self) -> NodeId {
        self.alloc(NodeKind::BaseReferenceExpression)
    }

    pub fn binary(&mut self, operator: BinaryOperator, left: NodeId, right: NodeId) -> NodeId {
        self.node_with(
            NodeKind::BinaryOperatorExpression { operator },
            &[(Role::Left, left), (Role::Right, right)],
        )
    }

    pub fn unary(&mut self, operator: UnaryOperator, operand: NodeId) -> NodeId {
        self.node_with(
            NodeKind::UnaryOperatorExpression { operator },
            &[(Role::Expression, operand)],
        )
    }

    pub fn assign(&mut self, operator: AssignmentOperator, left: NodeId, right: NodeId) -> NodeId {
        self.node_with(
            NodeKind::AssignmentExpression { operator },
            &[(Role::Left, left), (Role::Right, right)],
        )
    }

    pub fn conditional(&mut self, condition: NodeId, when_true: NodeId, when_false: NodeId) -> NodeId {
        self.node_with(
            NodeKind::ConditionalExpression,
            &[
                (Role::Condition, condition),
                (Role::TrueExpression, when_true),
                (Role::FalseExpression, when_false),
            ],
        )
    }

    pub fn cast(&mut self, ty: NodeId, operand: NodeId) -> NodeId {
        self.node_with(
            NodeKind::CastExpression,
            &[(Role::Type, ty), (Role::Expression, operand)],
        )
    }

    pub fn as_expr(&mut self, operand: NodeId, ty: NodeId) -> NodeId {
        self.node_with(
            NodeKind::AsExpression,
            &[(Role::Expression, operand), (Role::Type, ty)],
        )
    }

    pub fn is_expr(&mut self, operand: NodeId, ty: NodeId) -> NodeId {
        self.node_with(
            NodeKind::IsExpression,
            &[(Role::Expression, operand), (Role::Type, ty)],
        )
    }

    pub fn invocation(&mut self, target: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let id = self.node_with(NodeKind::InvocationExpression, &[(Role::Target, target)]);
        self.add_children(id, Role::Argument, arguments);
        id
    }

    pub fn member_ref(&mut self, target: NodeId, name: &str) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::MemberReferenceExpression,
            &[(Role::Target, target), (Role::Identifier, ident)],
        )
    }

    pub fn generic_member_ref(&mut self, target: NodeId, name: &str, type_arguments: Vec<NodeId>) -> NodeId {
        let id = self.member_ref(target, name);
        self.add_children(id, Role::TypeArgument, type_arguments);
        id
    }

    /// `target.name(arguments)`
    pub fn call(&mut self, target: NodeId, name: &str, arguments: Vec<NodeId>) -> NodeId {
        let member = self.member_ref(target, name);
        self.invocation(member, arguments)
    }

    pub fn indexer(&mut self, target: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let id = self.node_with(NodeKind::IndexerExpression, &[(Role::Target, target)]);
        self.add_children(id, Role::Argument, arguments);
        id
    }

    pub fn paren(&mut self, inner: NodeId) -> NodeId {
        self.node_with(
            NodeKind::ParenthesizedExpression,
            &[(Role::Expression, inner)],
        )
    }

    /// `body` is a block or an expression.
    pub fn lambda(&mut self, parameters: Vec<NodeId>, body: NodeId, is_async: bool) -> NodeId {
        let id = self.alloc(NodeKind::LambdaExpression { is_async });
        self.add_children(id, Role::Parameter, parameters);
        self.add_child(id, Role::Body, body);
        id
    }

    pub fn anonymous_method(&mut self, parameters: Option<Vec<NodeId>>, body: NodeId, is_async: bool) -> NodeId {
        let id = self.alloc(NodeKind::AnonymousMethodExpression {
            is_async,
            has_parameter_list: parameters.is_some(),
        });
        self.add_children(id, Role::Parameter, parameters.unwrap_or_default());
        self.add_child(id, Role::Body, body);
        id
    }

    pub fn object_create(&mut self, ty: NodeId, arguments: Vec<NodeId>, initializer: NodeId) -> NodeId {
        let id = self.node_with(NodeKind::ObjectCreateExpression, &[(Role::Type, ty)]);
        self.add_children(id, Role::Argument, arguments);
        self.add_child(id, Role::Initializer, initializer);
        id
    }

    /// `new ty[arguments]...` with optional additional specifiers and initializer.
    pub fn array_create(
        &mut self,
        element_type: NodeId,
        arguments: Vec<NodeId>,
        additional_dimensions: &[u32],
        initializer: NodeId,
    ) -> NodeId {
        let id = self.node_with(NodeKind::ArrayCreateExpression, &[(Role::Type, element_type)]);
        self.add_children(id, Role::Argument, arguments);
        for &dimensions in additional_dimensions {
            let spec = self.array_specifier(dimensions);
            self.add_child(id, Role::ArraySpecifier, spec);
        }
        self.add_child(id, Role::Initializer, initializer);
        id
    }

    pub fn array_initializer(&mut self, elements: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::ArrayInitializerExpression);
        self.add_children(id, Role::Expression, elements);
        id
    }

    pub fn named(&mut self, name: &str, value: NodeId) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::NamedExpression,
            &[(Role::Identifier, ident), (Role::Expression, value)],
        )
    }

    pub fn type_of(&mut self, ty: NodeId) -> NodeId {
        self.node_with(NodeKind::TypeOfExpression, &[(Role::Type, ty)])
    }

    pub fn default_value(&mut self, ty: NodeId) -> NodeId {
        self.node_with(NodeKind::DefaultValueExpression, &[(Role::Type, ty)])
    }

    pub fn size_of(&mut self, ty: NodeId) -> NodeId {
        self.node_with(NodeKind::SizeOfExpression, &[(Role::Type, ty)])
    }

    pub fn type_reference(&mut self, ty: NodeId) -> NodeId {
        self.node_with(NodeKind::TypeReferenceExpression, &[(Role::Type, ty)])
    }

    pub fn checked_expr(&mut self, inner: NodeId) -> NodeId {
        self.node_with(NodeKind::CheckedExpression, &[(Role::Expression, inner)])
    }

    pub fn unchecked_expr(&mut self, inner: NodeId) -> NodeId {
        self.node_with(NodeKind::UncheckedExpression, &[(Role::Expression, inner)])
    }

    pub fn direction(&mut self, direction: FieldDirection, inner: NodeId) -> NodeId {
        self.node_with(
            NodeKind::DirectionExpression { direction },
            &[(Role::Expression, inner)],
        )
    }

    pub fn query(&mut self, clauses: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::QueryExpression);
        self.add_children(id, Role::QueryClause, clauses);
        id
    }

    pub fn from_clause(&mut self, ty: NodeId, name: &str, source: NodeId) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::QueryFromClause,
            &[
                (Role::Type, ty),
                (Role::Identifier, ident),
                (Role::Expression, source),
            ],
        )
    }

    pub fn let_clause(&mut self, name: &str, value: NodeId) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::QueryLetClause,
            &[(Role::Identifier, ident), (Role::Expression, value)],
        )
    }

    pub fn where_clause(&mut self, condition: NodeId) -> NodeId {
        self.node_with(NodeKind::QueryWhereClause, &[(Role::Condition, condition)])
    }

    pub fn order_clause(&mut self, orderings: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::QueryOrderClause);
        self.add_children(id, Role::QueryOrdering, orderings);
        id
    }

    pub fn ordering(&mut self, key: NodeId, descending: bool) -> NodeId {
        self.node_with(
            NodeKind::QueryOrdering { descending },
            &[(Role::Expression, key)],
        )
    }

    pub fn select_clause(&mut self, value: NodeId) -> NodeId {
        self.node_with(NodeKind::QuerySelectClause, &[(Role::Expression, value)])
    }

    pub fn error_expr(&mut self) -> NodeId {
        self.alloc(NodeKind::ErrorExpression)
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::BlockStatement);
        self.add_children(id, Role::Statement, statements);
        id
    }

    pub fn expr_stmt(&mut self, expression: NodeId) -> NodeId {
        self.node_with(
            NodeKind::ExpressionStatement,
            &[(Role::Expression, expression)],
        )
    }

    pub fn variable(&mut self, name: &str, initializer: NodeId) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::VariableInitializer,
            &[(Role::Identifier, ident), (Role::Initializer, initializer)],
        )
    }

    pub fn var_decl(&mut self, ty: NodeId, variables: Vec<NodeId>) -> NodeId {
        self.var_decl_with(Modifiers::NONE, ty, variables)
    }

    pub fn var_decl_with(&mut self, modifiers: Modifiers, ty: NodeId, variables: Vec<NodeId>) -> NodeId {
        let id = self.node_with(
            NodeKind::VariableDeclarationStatement { modifiers },
            &[(Role::Type, ty)],
        );
        self.add_children(id, Role::Variable, variables);
        id
    }

    /// `ty name = initializer;` with a single variable.
    pub fn local(&mut self, ty: NodeId, name: &str, initializer: NodeId) -> NodeId {
        let variable = self.variable(name, initializer);
        self.var_decl(ty, vec![variable])
    }

    pub fn empty(&mut self) -> NodeId {
        self.alloc(NodeKind::EmptyStatement)
    }

    pub fn if_else(&mut self, condition: NodeId, when_true: NodeId, when_false: NodeId) -> NodeId {
        self.node_with(
            NodeKind::IfElseStatement,
            &[
                (Role::Condition, condition),
                (Role::TrueStatement, when_true),
                (Role::FalseStatement, when_false),
            ],
        )
    }

    pub fn while_stmt(&mut self, condition: NodeId, body: NodeId) -> NodeId {
        self.node_with(
            NodeKind::WhileStatement,
            &[(Role::Condition, condition), (Role::EmbeddedStatement, body)],
        )
    }

    pub fn do_while(&mut self, body: NodeId, condition: NodeId) -> NodeId {
        self.node_with(
            NodeKind::DoWhileStatement,
            &[(Role::EmbeddedStatement, body), (Role::Condition, condition)],
        )
    }

    pub fn for_stmt(
        &mut self,
        initializers: Vec<NodeId>,
        condition: NodeId,
        iterators: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let id = self.alloc(NodeKind::ForStatement);
        self.add_children(id, Role::ForInitializer, initializers);
        self.add_child(id, Role::Condition, condition);
        self.add_children(id, Role::ForIterator, iterators);
        self.add_child(id, Role::EmbeddedStatement, body);
        id
    }

    pub fn foreach(&mut self, ty: NodeId, name: &str, source: NodeId, body: NodeId) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::ForeachStatement,
            &[
                (Role::Type, ty),
                (Role::Identifier, ident),
                (Role::InExpression, source),
                (Role::EmbeddedStatement, body),
            ],
        )
    }

    pub fn switch(&mut self, expression: NodeId, sections: Vec<NodeId>) -> NodeId {
        let id = self.node_with(
            NodeKind::SwitchStatement,
            &[(Role::Expression, expression)],
        );
        self.add_children(id, Role::SwitchSection, sections);
        id
    }

    pub fn switch_section(&mut self, labels: Vec<NodeId>, statements: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::SwitchSection);
        self.add_children(id, Role::CaseLabel, labels);
        self.add_children(id, Role::Statement, statements);
        id
    }

    /// `case value:`, or `default:` when `value` is the null node.
    pub fn case_label(&mut self, value: NodeId) -> NodeId {
        self.node_with(NodeKind::CaseLabel, &[(Role::Expression, value)])
    }

    pub fn break_stmt(&mut self) -> NodeId {
        self.alloc(NodeKind::BreakStatement)
    }

    pub fn continue_stmt(&mut self) -> NodeId {
        self.alloc(NodeKind::ContinueStatement)
    }

    pub fn goto(&mut self, label: &str) -> NodeId {
        let ident = self.identifier(label);
        self.node_with(NodeKind::GotoStatement, &[(Role::Identifier, ident)])
    }

    pub fn goto_case(&mut self, value: NodeId) -> NodeId {
        self.node_with(NodeKind::GotoCaseStatement, &[(Role::Expression, value)])
    }

    pub fn goto_default(&mut self) -> NodeId {
        self.alloc(NodeKind::GotoDefaultStatement)
    }

    pub fn return_stmt(&mut self, value: NodeId) -> NodeId {
        self.node_with(NodeKind::ReturnStatement, &[(Role::Expression, value)])
    }

    pub fn throw_stmt(&mut self, value: NodeId) -> NodeId {
        self.node_with(NodeKind::ThrowStatement, &[(Role::Expression, value)])
    }

    pub fn try_catch(&mut self, try_block: NodeId, catches: Vec<NodeId>, finally_block: NodeId) -> NodeId {
        let id = self.node_with(NodeKind::TryCatchStatement, &[(Role::TryBlock, try_block)]);
        self.add_children(id, Role::CatchClause, catches);
        self.add_child(id, Role::FinallyBlock, finally_block);
        id
    }

    /// `catch`, `catch (ty)` or `catch (ty name)`.
    pub fn catch_clause(&mut self, ty: NodeId, variable: Option<&str>, body: NodeId) -> NodeId {
        let ident = match variable {
            Some(name) => self.identifier(name),
            None => NodeId::NULL,
        };
        self.node_with(
            NodeKind::CatchClause,
            &[
                (Role::Type, ty),
                (Role::Identifier, ident),
                (Role::Body, body),
            ],
        )
    }

    pub fn checked_stmt(&mut self, body: NodeId) -> NodeId {
        self.node_with(NodeKind::CheckedStatement, &[(Role::Body, body)])
    }

    pub fn unchecked_stmt(&mut self, body: NodeId) -> NodeId {
        self.node_with(NodeKind::UncheckedStatement, &[(Role::Body, body)])
    }

    pub fn unsafe_stmt(&mut self, body: NodeId) -> NodeId {
        self.node_with(NodeKind::UnsafeStatement, &[(Role::Body, body)])
    }

    pub fn lock_stmt(&mut self, expression: NodeId, body: NodeId) -> NodeId {
        self.node_with(
            NodeKind::LockStatement,
            &[(Role::Expression, expression), (Role::EmbeddedStatement, body)],
        )
    }

    /// `resource` is a variable declaration statement or an expression.
    pub fn using_stmt(&mut self, resource: NodeId, body: NodeId) -> NodeId {
        self.node_with(
            NodeKind::UsingStatement,
            &[
                (Role::ResourceAcquisition, resource),
                (Role::EmbeddedStatement, body),
            ],
        )
    }

    pub fn fixed_stmt(&mut self, ty: NodeId, variables: Vec<NodeId>, body: NodeId) -> NodeId {
        let id = self.node_with(NodeKind::FixedStatement, &[(Role::Type, ty)]);
        self.add_children(id, Role::Variable, variables);
        self.add_child(id, Role::EmbeddedStatement, body);
        id
    }

    pub fn yield_return(&mut self, value: NodeId) -> NodeId {
        self.node_with(NodeKind::YieldReturnStatement, &[(Role::Expression, value)])
    }

    pub fn yield_break(&mut self) -> NodeId {
        self.alloc(NodeKind::YieldBreakStatement)
    }

    pub fn label(&mut self, name: &str) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(NodeKind::LabelStatement, &[(Role::Identifier, ident)])
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    pub fn compilation_unit(&mut self, members: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::CompilationUnit);
        self.add_children(id, Role::Member, members);
        id
    }

    /// `using a.b.c;`
    pub fn using_decl(&mut self, namespace: &str) -> NodeId {
        let ty = self.dotted_type(namespace);
        self.node_with(NodeKind::UsingDeclaration, &[(Role::Type, ty)])
    }

    fn dotted_type(&mut self, dotted: &str) -> NodeId {
        let mut parts = dotted.split('.');
        let mut ty = self.simple_type(parts.next().unwrap_or_default(), vec![]);
        for part in parts {
            ty = self.member_type(ty, part, vec![]);
        }
        ty
    }

    pub fn namespace(&mut self, name: &str, members: Vec<NodeId>) -> NodeId {
        let ident = self.identifier(name);
        let id = self.node_with(
            NodeKind::NamespaceDeclaration,
            &[(Role::Identifier, ident)],
        );
        self.add_children(id, Role::Member, members);
        id
    }

    pub fn type_decl(
        &mut self,
        class_type: ClassType,
        modifiers: Modifiers,
        name: &str,
        base_types: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> NodeId {
        let ident = self.identifier(name);
        let id = self.node_with(
            NodeKind::TypeDeclaration {
                class_type,
                modifiers,
            },
            &[(Role::Identifier, ident)],
        );
        self.add_children(id, Role::BaseType, base_types);
        self.add_children(id, Role::Member, members);
        id
    }

    pub fn enum_member(&mut self, name: &str, value: NodeId) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::EnumMemberDeclaration {
                modifiers: Modifiers::NONE,
            },
            &[(Role::Identifier, ident), (Role::Initializer, value)],
        )
    }

    pub fn field(&mut self, modifiers: Modifiers, ty: NodeId, variables: Vec<NodeId>) -> NodeId {
        let id = self.node_with(NodeKind::FieldDeclaration { modifiers }, &[(Role::Type, ty)]);
        self.add_children(id, Role::Variable, variables);
        id
    }

    pub fn property(
        &mut self,
        modifiers: Modifiers,
        ty: NodeId,
        name: &str,
        getter: NodeId,
        setter: NodeId,
    ) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::PropertyDeclaration { modifiers },
            &[
                (Role::Type, ty),
                (Role::Identifier, ident),
                (Role::Getter, getter),
                (Role::Setter, setter),
            ],
        )
    }

    /// `body` may be the null node for an auto-accessor (`get;`).
    pub fn accessor(&mut self, kind: AccessorKind, modifiers: Modifiers, body: NodeId) -> NodeId {
        self.node_with(
            NodeKind::Accessor { kind, modifiers },
            &[(Role::Body, body)],
        )
    }

    /// `body` may be the null node for an abstract or interface method.
    pub fn method(
        &mut self,
        modifiers: Modifiers,
        return_type: NodeId,
        name: &str,
        parameters: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let ident = self.identifier(name);
        let id = self.node_with(
            NodeKind::MethodDeclaration { modifiers },
            &[(Role::Type, return_type), (Role::Identifier, ident)],
        );
        self.add_children(id, Role::Parameter, parameters);
        self.add_child(id, Role::Body, body);
        id
    }

    pub fn constructor(
        &mut self,
        modifiers: Modifiers,
        name: &str,
        parameters: Vec<NodeId>,
        initializer: NodeId,
        body: NodeId,
    ) -> NodeId {
        let ident = self.identifier(name);
        let id = self.node_with(
            NodeKind::ConstructorDeclaration { modifiers },
            &[(Role::Identifier, ident)],
        );
        self.add_children(id, Role::Parameter, parameters);
        self.add_child(id, Role::Initializer, initializer);
        self.add_child(id, Role::Body, body);
        id
    }

    pub fn constructor_initializer(&mut self, kind: ConstructorInitializerKind, arguments: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::ConstructorInitializer { kind });
        self.add_children(id, Role::Argument, arguments);
        id
    }

    /// `ty` may be the null node for an implicitly typed lambda parameter.
    pub fn parameter(&mut self, modifier: ParameterModifier, ty: NodeId, name: &str, default: NodeId) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::ParameterDeclaration { modifier },
            &[
                (Role::Type, ty),
                (Role::Identifier, ident),
                (Role::DefaultValue, default),
            ],
        )
    }

    /// A plain `ty name` parameter.
    pub fn param(&mut self, ty: NodeId, name: &str) -> NodeId {
        self.parameter(ParameterModifier::None, ty, name, NodeId::NULL)
    }

    pub fn type_parameter(&mut self, name: &str) -> NodeId {
        let ident = self.identifier(name);
        self.node_with(
            NodeKind::TypeParameterDeclaration,
            &[(Role::Identifier, ident)],
        )
    }

    /// Attach type parameters to a type or method declaration, after its name.
    pub fn add_type_parameters(&mut self, declaration: NodeId, names: &[&str]) {
        let mut anchor = self.child(declaration, Role::Identifier);
        for name in names {
            let tp = self.type_parameter(name);
            let prev = if anchor.is_null() { None } else { Some(anchor) };
            self.insert_child_after(declaration, prev, Role::TypeParameter, tp);
            anchor = tp;
        }
    }

    pub fn attribute(&mut self, ty: NodeId, arguments: Vec<NodeId>) -> NodeId {
        let id = self.node_with(NodeKind::Attribute, &[(Role::Type, ty)]);
        self.add_children(id, Role::Argument, arguments);
        id
    }

    pub fn attribute_section(&mut self, target: Option<&str>, attributes: Vec<NodeId>) -> NodeId {
        let id = self.alloc(NodeKind::AttributeSection {
            target: target.map(str::to_string),
        });
        self.add_children(id, Role::Attribute, attributes);
        id
    }

    /// Prepend attribute sections to a declaration.
    pub fn add_attribute_sections(&mut self, declaration: NodeId, sections: Vec<NodeId>) {
        for section in sections.into_iter().rev() {
            self.insert_child_after(declaration, None, Role::AttributeSection, section);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_attach_roles() {
        let mut tree = SyntaxTree::new();
        let a = tree.ident("a");
        let b = tree.ident("b");
        let sum = tree.binary(BinaryOperator::Add, a, b);
        assert_eq!(tree.child(sum, Role::Left), a);
        assert_eq!(tree.child(sum, Role::Right), b);
        assert_eq!(tree.name(a), "a");

        let stmt = tree.if_else(sum, NodeId::NULL, NodeId::NULL);
        assert_eq!(tree.child(stmt, Role::Condition), sum);
        assert!(tree.child(stmt, Role::FalseStatement).is_null());
    }

    #[test]
    fn test_type_parameters_follow_name() {
        let mut tree = SyntaxTree::new();
        let void = tree.primitive_type("void");
        let body = tree.block(vec![]);
        let m = tree.method(Modifiers::PUBLIC, void, "Map", vec![], body);
        tree.add_type_parameters(m, &["T", "U"]);
        let roles: Vec<_> = tree.children(m).map(|c| tree.role(c)).collect();
        assert_eq!(
            roles,
            vec![
                Role::Type,
                Role::Identifier,
                Role::TypeParameter,
                Role::TypeParameter,
                Role::Body
            ]
        );
    }

    #[test]
    fn test_using_declaration_splits_dotted_name() {
        let mut tree = SyntaxTree::new();
        let using = tree.using_decl("System.Collections.Generic");
        let ty = tree.child(using, Role::Type);
        assert!(matches!(tree.kind(ty), NodeKind::MemberType { .. }));
        assert_eq!(tree.name(ty), "Generic");
    }
}
