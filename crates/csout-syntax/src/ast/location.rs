// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rendered positions of nodes.
//!
//! [`LocationTable`] stores where a node started and ended in the most recent
//! rendering that tracked locations. Not all nodes have locations recorded:
//! identifiers, literals, primitive types, synthesized tokens and a few
//! keyword-only expressions are tracked.

use std::collections::HashMap;

use csout_core::{TextLocation, TextRange};

use super::node::NodeId;

/// Start and end of a rendered node; either may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeLocation {
    pub start: Option<TextLocation>,
    pub end: Option<TextLocation>,
}

/// A table mapping [`NodeId`]s to rendered locations.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    locations: HashMap<NodeId, NodeLocation>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_start(&mut self, node: NodeId, at: TextLocation) {
        self.locations.entry(node).or_default().start = Some(at);
    }

    pub fn set_end(&mut self, node: NodeId, at: TextLocation) {
        self.locations.entry(node).or_default().end = Some(at);
    }

    pub fn set_range(&mut self, node: NodeId, range: TextRange) {
        self.locations.insert(
            node,
            NodeLocation {
                start: Some(range.start),
                end: Some(range.end),
            },
        );
    }

    pub fn start_of(&self, node: NodeId) -> Option<TextLocation> {
        self.locations.get(&node).and_then(|l| l.start)
    }

    pub fn end_of(&self, node: NodeId) -> Option<TextLocation> {
        self.locations.get(&node).and_then(|l| l.end)
    }

    /// The full range, if both ends were recorded.
    pub fn range_of(&self, node: NodeId) -> Option<TextRange> {
        let loc = self.locations.get(&node)?;
        match (loc.start, loc.end) {
            (Some(start), Some(end)) if start.offset <= end.offset => {
                Some(TextRange::new(start, end))
            }
            _ => None,
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.locations.contains_key(&node)
    }

    pub fn remove(&mut self, node: NodeId) {
        self.locations.remove(&node);
    }

    pub fn clear(&mut self) {
        self.locations.clear();
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_requires_both_ends() {
        let mut table = LocationTable::new();
        let id = NodeId(3);
        table.set_start(id, TextLocation::new(1, 1, 0));
        assert!(table.range_of(id).is_none());
        table.set_end(id, TextLocation::new(1, 4, 3));
        let range = table.range_of(id).unwrap();
        assert_eq!(range.span().len(), 3);
        assert_eq!(table.len(), 1);
    }
}
