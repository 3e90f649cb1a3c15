// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for graph construction and the analyses.

use csout_core::Cancelled;
use csout_syntax::NodeId;
use thiserror::Error;

/// Errors raised while building a control-flow graph or analyzing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The requested analysis range does not describe a valid slice of the
    /// graph's node list.
    #[error("invalid analysis range: {reason}")]
    InvalidRange { reason: String },

    /// A statement the graph does not know about, or a node kind the builder
    /// cannot handle.
    #[error("{kind} at {node} is not part of the control flow graph")]
    UnknownStatement { node: NodeId, kind: &'static str },

    #[error("analysis was cancelled")]
    Cancelled,
}

impl From<Cancelled> for FlowError {
    fn from(_: Cancelled) -> Self {
        FlowError::Cancelled
    }
}

/// Result alias for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;
