// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Typed per-node side data.
//!
//! Only three kinds of annotation are consulted while rendering:
//!
//! - a resolved symbol, reported with the identifier's rendered range
//! - debug-info ranges (input offsets), reported with the statement's range
//! - a colour hint, reported with the identifier's rendered range

use std::collections::HashMap;

use csout_core::Span;
use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// An opaque reference to whatever a resolver bound a name to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolRef(pub String);

/// Highlighting hint attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextColor {
    Keyword,
    Type,
    Method,
    Field,
    Local,
    Parameter,
    Literal,
}

#[derive(Debug, Clone, Default)]
pub struct Annotations {
    symbols: HashMap<NodeId, SymbolRef>,
    debug_ranges: HashMap<NodeId, Vec<Span>>,
    colors: HashMap<NodeId, TextColor>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_symbol(&mut self, node: NodeId, symbol: SymbolRef) {
        self.symbols.insert(node, symbol);
    }

    pub fn symbol(&self, node: NodeId) -> Option<&SymbolRef> {
        self.symbols.get(&node)
    }

    pub fn add_debug_range(&mut self, node: NodeId, range: Span) {
        self.debug_ranges.entry(node).or_default().push(range);
    }

    pub fn debug_ranges(&self, node: NodeId) -> &[Span] {
        self.debug_ranges
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_color(&mut self, node: NodeId, color: TextColor) {
        self.colors.insert(node, color);
    }

    pub fn color(&self, node: NodeId) -> Option<TextColor> {
        self.colors.get(&node).copied()
    }
}
