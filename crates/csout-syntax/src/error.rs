// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for rendering and policy loading.

use std::path::PathBuf;

use csout_core::{Cancelled, TextLocation};
use thiserror::Error;

use crate::ast::NodeId;

/// Errors raised while rendering a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The tree does not have the shape the renderer needs at `node`.
    #[error("invalid tree at {node} ({kind}): {reason}")]
    InvalidTree {
        kind: &'static str,
        node: NodeId,
        reason: String,
        location: Option<TextLocation>,
    },

    #[error("rendering was cancelled")]
    Cancelled,
}

impl From<Cancelled> for RenderError {
    fn from(_: Cancelled) -> Self {
        RenderError::Cancelled
    }
}

/// Errors raised while loading [`FormattingOptions`](crate::output::FormattingOptions).
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot read formatting options from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid formatting options: {0}")]
    Parse(#[from] serde_json::Error),
}
