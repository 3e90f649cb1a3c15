// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The unified error type of the `csout` pipeline.

use thiserror::Error;

use csout_flow::FlowError;
use csout_syntax::{OptionsError, RenderError};

/// Errors from any stage of the pipeline.
///
/// Cancellation is reported as [`Error::Cancelled`] whichever stage noticed
/// it; the conversions live in `error_bridges`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Render(RenderError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Flow(FlowError),

    #[error("operation was cancelled")]
    Cancelled,
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
