// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword tables and the context-sensitive keyword check.

use super::modifiers::Modifiers;
use super::node::{NodeId, NodeKind};
use super::tree::SyntaxTree;

/// Words that are keywords everywhere.
pub static UNCONDITIONAL_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Words that are keywords inside a query expression.
pub static QUERY_KEYWORDS: &[&str] = &[
    "from", "where", "join", "on", "equals", "into", "let", "orderby", "ascending",
    "descending", "select", "group", "by",
];

/// Whether `identifier` would be read as a keyword at `context`.
///
/// Contextual keywords depend on the nearest relevant ancestor: query keywords
/// inside any query expression; `await` inside an async lambda, async anonymous
/// method or async member. The first lambda, anonymous method or member
/// found decides for `await`, even if an outer one would answer differently.
pub fn is_keyword(tree: &SyntaxTree, identifier: &str, context: NodeId) -> bool {
    if UNCONDITIONAL_KEYWORDS.contains(&identifier) {
        return true;
    }
    for ancestor in tree.ancestors(context) {
        let kind = tree.kind(ancestor);
        if matches!(kind, NodeKind::QueryExpression) && QUERY_KEYWORDS.contains(&identifier) {
            return true;
        }
        if identifier == "await" {
            match kind {
                NodeKind::LambdaExpression { is_async } => return *is_async,
                NodeKind::AnonymousMethodExpression { is_async, .. } => return *is_async,
                k if k.is_entity_declaration() => {
                    return k
                        .modifiers()
                        .is_some_and(|m| m.contains(Modifiers::ASYNC));
                }
                _ => {}
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Role;

    #[test]
    fn test_unconditional_keywords() {
        let tree = SyntaxTree::new();
        assert!(is_keyword(&tree, "class", NodeId::NULL));
        assert!(!is_keyword(&tree, "value", NodeId::NULL));
        assert!(!is_keyword(&tree, "await", NodeId::NULL));
    }

    #[test]
    fn test_query_keyword_only_inside_query() {
        let mut tree = SyntaxTree::new();
        let name = tree.ident("select");
        assert!(!is_keyword(&tree, "select", name));
        let sel = tree.select_clause(name);
        let _query = tree.query(vec![sel]);
        assert!(is_keyword(&tree, "select", name));
    }

    #[test]
    fn test_await_nearest_function_decides() {
        let mut tree = SyntaxTree::new();
        let name = tree.ident("await");
        let inner = tree.lambda(vec![], name, false);
        let stmt = tree.expr_stmt(inner);
        let body = tree.block(vec![stmt]);
        let outer = tree.lambda(vec![], body, true);
        let _ = outer;
        // the synchronous inner lambda wins over the async outer one
        assert!(!is_keyword(&tree, "await", name));

        let mut tree = SyntaxTree::new();
        let name = tree.ident("await");
        let stmt = tree.expr_stmt(name);
        let body = tree.block(vec![stmt]);
        let void = tree.primitive_type("void");
        let _m = tree.method(Modifiers::ASYNC, void, "Run", vec![], body);
        assert!(is_keyword(&tree, "await", tree.child(name, Role::Identifier)));
    }
}
