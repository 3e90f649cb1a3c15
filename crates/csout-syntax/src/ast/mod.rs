// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The syntax tree.

pub mod annotations;
mod build;
pub mod keywords;
pub mod location;
pub mod modifiers;
pub mod node;
pub mod ops;
pub mod role;
pub mod tree;
pub mod value;

pub use annotations::{Annotations, SymbolRef, TextColor};
pub use keywords::is_keyword;
pub use location::{LocationTable, NodeLocation};
pub use modifiers::Modifiers;
pub use node::{
    AccessorKind, ClassType, CommentKind, ConstructorInitializerKind, DirectiveKind,
    FieldDirection, NodeId, NodeKind, ParameterModifier,
};
pub use ops::{AssignmentOperator, BinaryOperator, UnaryOperator};
pub use role::Role;
pub use tree::{Ancestors, Children, SyntaxTree};
pub use value::PrimitiveValue;
