//! Core infrastructure for csout.
//!
//! This crate provides the language-agnostic pieces shared by the renderer and
//! the flow analyses:
//! - Byte spans and line/column text locations
//! - Conversions between byte offsets and line/column positions
//! - Cooperative cancellation

pub mod cancel;
pub mod span;
pub mod text;

pub use cancel::{CancellationPoll, CancellationToken, Cancelled};
pub use span::{Span, TextLocation, TextRange};
