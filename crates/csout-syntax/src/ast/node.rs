// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node identity and node kinds.
//!
//! # NodeId
//!
//! [`NodeId`] indexes a node record inside a [`SyntaxTree`](super::SyntaxTree).
//! Slot 0 always holds the null node ([`NodeId::NULL`], kind [`NodeKind::Null`]),
//! which stands in for every absent optional child. Code that walks the tree
//! can ask for `tree.child(parent, Role::Condition)` and get the null node back
//! instead of an `Option`, and visiting the null node does nothing.
//!
//! # NodeKind
//!
//! The kind carries the per-kind payload that is not expressed as children:
//! operators, identifier text, literal values, modifiers. Everything that is a
//! syntax node in its own right (operands, bodies, type references, names) is a
//! child in a [`Role`](super::Role).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::modifiers::Modifiers;
use super::ops::{AssignmentOperator, BinaryOperator, UnaryOperator};
use super::value::PrimitiveValue;

// ============================================================================
// Node Identity
// ============================================================================

/// A stable identifier for a node in a [`SyntaxTree`](super::SyntaxTree).
///
/// Ids are assigned in allocation order and never reused; a detached node keeps
/// its id and can be re-attached elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The null-node sentinel.
    pub const NULL: NodeId = NodeId(0);

    /// Create a new NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ============================================================================
// Payload enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassType {
    Class,
    Struct,
    Interface,
    Enum,
}

impl ClassType {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassType::Class => "class",
            ClassType::Struct => "struct",
            ClassType::Interface => "interface",
            ClassType::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructorInitializerKind {
    Base,
    This,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterModifier {
    None,
    Ref,
    Out,
    Params,
    This,
}

/// Direction of an argument passed by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldDirection {
    Out,
    Ref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// text`
    SingleLine,
    /// `/* text */`
    MultiLine,
    /// `/// text`
    Documentation,
    /// Disabled code kept verbatim between preprocessor directives.
    InactiveCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    If,
    Elif,
    Else,
    Endif,
    Define,
    Undef,
    Region,
    EndRegion,
    Pragma,
    Warning,
    Error,
    Line,
}

impl DirectiveKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DirectiveKind::If => "if",
            DirectiveKind::Elif => "elif",
            DirectiveKind::Else => "else",
            DirectiveKind::Endif => "endif",
            DirectiveKind::Define => "define",
            DirectiveKind::Undef => "undef",
            DirectiveKind::Region => "region",
            DirectiveKind::EndRegion => "endregion",
            DirectiveKind::Pragma => "pragma",
            DirectiveKind::Warning => "warning",
            DirectiveKind::Error => "error",
            DirectiveKind::Line => "line",
        }
    }
}

// ============================================================================
// NodeKind
// ============================================================================

/// The type tag and payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Null,

    // ---- Leaf and special nodes ----
    Identifier { name: String, verbatim: bool },
    /// A fixed punctuation or keyword token; its text is the `Role::Token` it
    /// is attached with.
    Token,
    ModifierToken { modifier: Modifiers },
    Comment { kind: CommentKind, content: String },
    PreProcessorDirective { kind: DirectiveKind, argument: String },

    // ---- Declarations ----
    CompilationUnit,
    UsingDeclaration,
    NamespaceDeclaration,
    TypeDeclaration { class_type: ClassType, modifiers: Modifiers },
    EnumMemberDeclaration { modifiers: Modifiers },
    FieldDeclaration { modifiers: Modifiers },
    PropertyDeclaration { modifiers: Modifiers },
    Accessor { kind: AccessorKind, modifiers: Modifiers },
    MethodDeclaration { modifiers: Modifiers },
    ConstructorDeclaration { modifiers: Modifiers },
    ConstructorInitializer { kind: ConstructorInitializerKind },
    ParameterDeclaration { modifier: ParameterModifier },
    TypeParameterDeclaration,
    AttributeSection { target: Option<String> },
    Attribute,
    VariableInitializer,

    // ---- Types ----
    SimpleType,
    MemberType { double_colon: bool },
    PrimitiveType { keyword: String },
    ComposedType { nullable: bool, pointer_rank: u32 },
    ArraySpecifier { dimensions: u32 },

    // ---- Statements ----
    BlockStatement,
    ExpressionStatement,
    VariableDeclarationStatement { modifiers: Modifiers },
    EmptyStatement,
    IfElseStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForeachStatement,
    SwitchStatement,
    SwitchSection,
    CaseLabel,
    BreakStatement,
    ContinueStatement,
    GotoStatement,
    GotoCaseStatement,
    GotoDefaultStatement,
    ReturnStatement,
    ThrowStatement,
    TryCatchStatement,
    CatchClause,
    CheckedStatement,
    UncheckedStatement,
    LockStatement,
    UsingStatement,
    FixedStatement,
    UnsafeStatement,
    YieldReturnStatement,
    YieldBreakStatement,
    LabelStatement,

    // ---- Expressions ----
    IdentifierExpression,
    PrimitiveExpression { value: PrimitiveValue },
    NullReferenceExpression,
    ThisReferenceExpression,
    BaseReferenceExpression,
    BinaryOperatorExpression { operator: BinaryOperator },
    UnaryOperatorExpression { operator: UnaryOperator },
    AssignmentExpression { operator: AssignmentOperator },
    ConditionalExpression,
    CastExpression,
    AsExpression,
    IsExpression,
    InvocationExpression,
    MemberReferenceExpression,
    IndexerExpression,
    ParenthesizedExpression,
    LambdaExpression { is_async: bool },
    AnonymousMethodExpression { is_async: bool, has_parameter_list: bool },
    ObjectCreateExpression,
    ArrayCreateExpression,
    ArrayInitializerExpression,
    NamedExpression,
    TypeOfExpression,
    DefaultValueExpression,
    SizeOfExpression,
    TypeReferenceExpression,
    CheckedExpression,
    UncheckedExpression,
    DirectionExpression { direction: FieldDirection },
    QueryExpression,
    QueryFromClause,
    QueryLetClause,
    QueryWhereClause,
    QueryOrderClause,
    QueryOrdering { descending: bool },
    QuerySelectClause,
    ErrorExpression,
}

impl NodeKind {
    /// The kind's name, as used in diagnostics and debug output.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Null => "Null",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Token => "Token",
            NodeKind::ModifierToken { .. } => "ModifierToken",
            NodeKind::Comment { .. } => "Comment",
            NodeKind::PreProcessorDirective { .. } => "PreProcessorDirective",
            NodeKind::CompilationUnit => "CompilationUnit",
            NodeKind::UsingDeclaration => "UsingDeclaration",
            NodeKind::NamespaceDeclaration => "NamespaceDeclaration",
            NodeKind::TypeDeclaration { .. } => "TypeDeclaration",
            NodeKind::EnumMemberDeclaration { .. } => "EnumMemberDeclaration",
            NodeKind::FieldDeclaration { .. } => "FieldDeclaration",
            NodeKind::PropertyDeclaration { .. } => "PropertyDeclaration",
            NodeKind::Accessor { .. } => "Accessor",
            NodeKind::MethodDeclaration { .. } => "MethodDeclaration",
            NodeKind::ConstructorDeclaration { .. } => "ConstructorDeclaration",
            NodeKind::ConstructorInitializer { .. } => "ConstructorInitializer",
            NodeKind::ParameterDeclaration { .. } => "ParameterDeclaration",
            NodeKind::TypeParameterDeclaration => "TypeParameterDeclaration",
            NodeKind::AttributeSection { .. } => "AttributeSection",
            NodeKind::Attribute => "Attribute",
            NodeKind::VariableInitializer => "VariableInitializer",
            NodeKind::SimpleType => "SimpleType",
            NodeKind::MemberType { .. } => "MemberType",
            NodeKind::PrimitiveType { .. } => "PrimitiveType",
            NodeKind::ComposedType { .. } => "ComposedType",
            NodeKind::ArraySpecifier { .. } => "ArraySpecifier",
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::VariableDeclarationStatement { .. } => "VariableDeclarationStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::IfElseStatement => "IfElseStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoWhileStatement => "DoWhileStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::ForeachStatement => "ForeachStatement",
            NodeKind::SwitchStatement => "SwitchStatement",
            NodeKind::SwitchSection => "SwitchSection",
            NodeKind::CaseLabel => "CaseLabel",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::GotoStatement => "GotoStatement",
            NodeKind::GotoCaseStatement => "GotoCaseStatement",
            NodeKind::GotoDefaultStatement => "GotoDefaultStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::ThrowStatement => "ThrowStatement",
            NodeKind::TryCatchStatement => "TryCatchStatement",
            NodeKind::CatchClause => "CatchClause",
            NodeKind::CheckedStatement => "CheckedStatement",
            NodeKind::UncheckedStatement => "UncheckedStatement",
            NodeKind::LockStatement => "LockStatement",
            NodeKind::UsingStatement => "UsingStatement",
            NodeKind::FixedStatement => "FixedStatement",
            NodeKind::UnsafeStatement => "UnsafeStatement",
            NodeKind::YieldReturnStatement => "YieldReturnStatement",
            NodeKind::YieldBreakStatement => "YieldBreakStatement",
            NodeKind::LabelStatement => "LabelStatement",
            NodeKind::IdentifierExpression => "IdentifierExpression",
            NodeKind::PrimitiveExpression { .. } => "PrimitiveExpression",
            NodeKind::NullReferenceExpression => "NullReferenceExpression",
            NodeKind::ThisReferenceExpression => "ThisReferenceExpression",
            NodeKind::BaseReferenceExpression => "BaseReferenceExpression",
            NodeKind::BinaryOperatorExpression { .. } => "BinaryOperatorExpression",
            NodeKind::UnaryOperatorExpression { .. } => "UnaryOperatorExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::CastExpression => "CastExpression",
            NodeKind::AsExpression => "AsExpression",
            NodeKind::IsExpression => "IsExpression",
            NodeKind::InvocationExpression => "InvocationExpression",
            NodeKind::MemberReferenceExpression => "MemberReferenceExpression",
            NodeKind::IndexerExpression => "IndexerExpression",
            NodeKind::ParenthesizedExpression => "ParenthesizedExpression",
            NodeKind::LambdaExpression { .. } => "LambdaExpression",
            NodeKind::AnonymousMethodExpression { .. } => "AnonymousMethodExpression",
            NodeKind::ObjectCreateExpression => "ObjectCreateExpression",
            NodeKind::ArrayCreateExpression => "ArrayCreateExpression",
            NodeKind::ArrayInitializerExpression => "ArrayInitializerExpression",
            NodeKind::NamedExpression => "NamedExpression",
            NodeKind::TypeOfExpression => "TypeOfExpression",
            NodeKind::DefaultValueExpression => "DefaultValueExpression",
            NodeKind::SizeOfExpression => "SizeOfExpression",
            NodeKind::TypeReferenceExpression => "TypeReferenceExpression",
            NodeKind::CheckedExpression => "CheckedExpression",
            NodeKind::UncheckedExpression => "UncheckedExpression",
            NodeKind::DirectionExpression { .. } => "DirectionExpression",
            NodeKind::QueryExpression => "QueryExpression",
            NodeKind::QueryFromClause => "QueryFromClause",
            NodeKind::QueryLetClause => "QueryLetClause",
            NodeKind::QueryWhereClause => "QueryWhereClause",
            NodeKind::QueryOrderClause => "QueryOrderClause",
            NodeKind::QueryOrdering { .. } => "QueryOrdering",
            NodeKind::QuerySelectClause => "QuerySelectClause",
            NodeKind::ErrorExpression => "ErrorExpression",
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::BlockStatement
                | NodeKind::ExpressionStatement
                | NodeKind::VariableDeclarationStatement { .. }
                | NodeKind::EmptyStatement
                | NodeKind::IfElseStatement
                | NodeKind::WhileStatement
                | NodeKind::DoWhileStatement
                | NodeKind::ForStatement
                | NodeKind::ForeachStatement
                | NodeKind::SwitchStatement
                | NodeKind::BreakStatement
                | NodeKind::ContinueStatement
                | NodeKind::GotoStatement
                | NodeKind::GotoCaseStatement
                | NodeKind::GotoDefaultStatement
                | NodeKind::ReturnStatement
                | NodeKind::ThrowStatement
                | NodeKind::TryCatchStatement
                | NodeKind::CheckedStatement
                | NodeKind::UncheckedStatement
                | NodeKind::LockStatement
                | NodeKind::UsingStatement
                | NodeKind::FixedStatement
                | NodeKind::UnsafeStatement
                | NodeKind::YieldReturnStatement
                | NodeKind::YieldBreakStatement
                | NodeKind::LabelStatement
        )
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::IdentifierExpression
                | NodeKind::PrimitiveExpression { .. }
                | NodeKind::NullReferenceExpression
                | NodeKind::ThisReferenceExpression
                | NodeKind::BaseReferenceExpression
                | NodeKind::BinaryOperatorExpression { .. }
                | NodeKind::UnaryOperatorExpression { .. }
                | NodeKind::AssignmentExpression { .. }
                | NodeKind::ConditionalExpression
                | NodeKind::CastExpression
                | NodeKind::AsExpression
                | NodeKind::IsExpression
                | NodeKind::InvocationExpression
                | NodeKind::MemberReferenceExpression
                | NodeKind::IndexerExpression
                | NodeKind::ParenthesizedExpression
                | NodeKind::LambdaExpression { .. }
                | NodeKind::AnonymousMethodExpression { .. }
                | NodeKind::ObjectCreateExpression
                | NodeKind::ArrayCreateExpression
                | NodeKind::ArrayInitializerExpression
                | NodeKind::NamedExpression
                | NodeKind::TypeOfExpression
                | NodeKind::DefaultValueExpression
                | NodeKind::SizeOfExpression
                | NodeKind::TypeReferenceExpression
                | NodeKind::CheckedExpression
                | NodeKind::UncheckedExpression
                | NodeKind::DirectionExpression { .. }
                | NodeKind::QueryExpression
                | NodeKind::ErrorExpression
        )
    }

    /// Types and members a declaration-level visitor treats as entities.
    pub fn is_entity_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeDeclaration { .. }
                | NodeKind::EnumMemberDeclaration { .. }
                | NodeKind::FieldDeclaration { .. }
                | NodeKind::PropertyDeclaration { .. }
                | NodeKind::Accessor { .. }
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::ConstructorDeclaration { .. }
        )
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::SimpleType
                | NodeKind::MemberType { .. }
                | NodeKind::PrimitiveType { .. }
                | NodeKind::ComposedType { .. }
        )
    }

    /// Comments and preprocessor directives.
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            NodeKind::Comment { .. } | NodeKind::PreProcessorDirective { .. }
        )
    }

    /// The modifiers of a declaration, if the kind carries any.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            NodeKind::TypeDeclaration { modifiers, .. }
            | NodeKind::EnumMemberDeclaration { modifiers }
            | NodeKind::FieldDeclaration { modifiers }
            | NodeKind::PropertyDeclaration { modifiers }
            | NodeKind::Accessor { modifiers, .. }
            | NodeKind::MethodDeclaration { modifiers }
            | NodeKind::ConstructorDeclaration { modifiers }
            | NodeKind::VariableDeclarationStatement { modifiers } => Some(*modifiers),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
