// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! `From` conversions into [`Error`].
//!
//! Each stage has its own cancellation variant. They all collapse into
//! [`Error::Cancelled`] so callers match on one variant.

use csout_core::Cancelled;
use csout_flow::FlowError;
use csout_syntax::RenderError;

use crate::error::Error;

// ============================================================================
// Bridge: Cancelled -> Error
// ============================================================================

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Error::Cancelled
    }
}

// ============================================================================
// Bridge: RenderError -> Error
// ============================================================================

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Cancelled => Error::Cancelled,
            other => Error::Render(other),
        }
    }
}

// ============================================================================
// Bridge: FlowError -> Error
// ============================================================================

impl From<FlowError> for Error {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Cancelled => Error::Cancelled,
            other => Error::Flow(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csout_syntax::NodeId;

    #[test]
    fn test_cancellation_collapses() {
        assert!(Error::from(RenderError::Cancelled).is_cancelled());
        assert!(Error::from(FlowError::Cancelled).is_cancelled());
        assert!(Error::from(Cancelled).is_cancelled());
    }

    #[test]
    fn test_flow_error_is_kept() {
        let err = Error::from(FlowError::UnknownStatement {
            node: NodeId(7),
            kind: "Identifier",
        });
        assert!(matches!(err, Error::Flow(FlowError::UnknownStatement { .. })));
    }
}
