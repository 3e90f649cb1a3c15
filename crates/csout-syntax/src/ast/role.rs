// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Child roles.
//!
//! A [`Role`] names the slot a child fills in its parent. Many siblings may
//! share a role (every statement of a block has [`Role::Statement`]); only their
//! order distinguishes them. [`Role::Token`] carries the text of a fixed token
//! such as `(` and compares by that text.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A node with no parent.
    Root,
    Identifier,
    Comment,
    PreProcessorDirective,
    AttributeSection,
    Attribute,
    Modifier,
    Type,
    BaseType,
    TypeArgument,
    TypeParameter,
    Parameter,
    Argument,
    Member,
    Body,
    Getter,
    Setter,
    Variable,
    Initializer,
    Expression,
    Condition,
    TrueStatement,
    FalseStatement,
    EmbeddedStatement,
    Statement,
    ForInitializer,
    ForIterator,
    InExpression,
    ResourceAcquisition,
    SwitchSection,
    CaseLabel,
    TryBlock,
    CatchClause,
    FinallyBlock,
    Target,
    Left,
    Right,
    TrueExpression,
    FalseExpression,
    ArraySpecifier,
    QueryClause,
    QueryOrdering,
    DefaultValue,
    /// A fixed token with its literal text.
    Token(&'static str),
}

impl Role {
    /// Comments and preprocessor directives interleave with real children.
    pub fn is_special(self) -> bool {
        matches!(self, Role::Comment | Role::PreProcessorDirective)
    }

    pub fn is_token(self) -> bool {
        matches!(self, Role::Token(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Token(text) => write!(f, "Token({:?})", text),
            other => write!(f, "{:?}", other),
        }
    }
}
