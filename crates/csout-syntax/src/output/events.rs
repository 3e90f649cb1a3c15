// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Callbacks for consumers that annotate rendered text.
//!
//! Editors use these to fold brace pairs, draw separators between declaration
//! groups and highlight related keywords. Every method has a no-op default, so
//! a consumer implements only what it needs.

use csout_core::{Span, TextRange};
use serde::Serialize;

use crate::ast::{NodeId, SymbolRef, TextColor};

/// What a pair of braces delimits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BracePairKind {
    Namespace,
    Type,
    Method,
    Property,
    Accessor,
    AnonymousMethod,
    Loop,
    Conditional,
    Switch,
    Try,
    Lock,
    Using,
    Fixed,
    Checked,
    Unsafe,
    Initializer,
    Block,
}

pub trait RenderEvents {
    /// A `{` and its matching `}` were written.
    fn add_brace_pair(&mut self, _left: TextRange, _right: TextRange, _kind: BracePairKind) {}

    /// A new group of declarations starts on the line at `offset`.
    fn add_line_separator(&mut self, _offset: usize) {}

    /// A keyword belonging to `reference` was written; all `return`s of a
    /// method share the method as reference.
    fn add_keyword_reference(&mut self, _range: TextRange, _reference: NodeId) {}

    /// An identifier resolved to `symbol` was written.
    fn add_symbol_reference(&mut self, _range: TextRange, _symbol: &SymbolRef, _is_definition: bool) {}

    fn add_highlight(&mut self, _range: TextRange, _color: TextColor) {}

    /// A statement carrying debug-info ranges was written at `range`.
    fn add_sequence_point(&mut self, _statement: NodeId, _range: TextRange, _debug_ranges: &[Span]) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl RenderEvents for NoEvents {}

/// Collects every event, in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordedEvents {
    pub brace_pairs: Vec<(TextRange, TextRange, BracePairKind)>,
    pub line_separators: Vec<usize>,
    pub keyword_references: Vec<(TextRange, NodeId)>,
    pub symbol_references: Vec<(TextRange, SymbolRef, bool)>,
    pub highlights: Vec<(TextRange, TextColor)>,
    pub sequence_points: Vec<(NodeId, TextRange, Vec<Span>)>,
}

impl RecordedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyword ranges grouped under `reference`.
    pub fn keywords_of(&self, reference: NodeId) -> Vec<TextRange> {
        self.keyword_references
            .iter()
            .filter(|(_, r)| *r == reference)
            .map(|(range, _)| *range)
            .collect()
    }
}

impl RenderEvents for RecordedEvents {
    fn add_brace_pair(&mut self, left: TextRange, right: TextRange, kind: BracePairKind) {
        self.brace_pairs.push((left, right, kind));
    }

    fn add_line_separator(&mut self, offset: usize) {
        self.line_separators.push(offset);
    }

    fn add_keyword_reference(&mut self, range: TextRange, reference: NodeId) {
        self.keyword_references.push((range, reference));
    }

    fn add_symbol_reference(&mut self, range: TextRange, symbol: &SymbolRef, is_definition: bool) {
        self.symbol_references
            .push((range, symbol.clone(), is_definition));
    }

    fn add_highlight(&mut self, range: TextRange, color: TextColor) {
        self.highlights.push((range, color));
    }

    fn add_sequence_point(&mut self, statement: NodeId, range: TextRange, debug_ranges: &[Span]) {
        self.sequence_points
            .push((statement, range, debug_ranges.to_vec()));
    }
}
