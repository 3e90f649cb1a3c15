// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tree rewrites run before rendering.
//!
//! Both passes only add `ParenthesizedExpression` nodes; they never remove or
//! reorder anything. Run [`insert_parentheses`] first, then
//! [`resolve_ambiguities`].

pub mod ambiguity;
pub mod parens;

pub use ambiguity::{is_ambiguous, resolve_ambiguities};
pub use parens::{insert_parentheses, precedence, InsertParentheses, Precedence};
