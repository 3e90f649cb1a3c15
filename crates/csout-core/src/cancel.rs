//! Cooperative cancellation.
//!
//! Long tree walks poll a [`CancellationToken`] at bounded intervals and bail
//! out with [`Cancelled`] once it has been triggered. Cancellation is advisory:
//! nothing is interrupted between two polls, and a cancelled walk leaves its
//! partial output undefined.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// The signal raised by a walk that observed a cancelled token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// A cloneable handle to a shared cancellation flag.
///
/// All clones observe the same flag, so a token can be handed to a render or
/// analysis on one thread and cancelled from another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that can never be cancelled by anyone else.
    pub fn none() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Return `Err(Cancelled)` if cancellation was requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Polls a token once every `interval` ticks.
///
/// Child loops call [`CancellationPoll::tick`] per iteration; only every
/// `interval`-th call touches the shared flag.
#[derive(Debug)]
pub struct CancellationPoll<'t> {
    token: &'t CancellationToken,
    interval: u32,
    counter: u32,
}

impl<'t> CancellationPoll<'t> {
    pub fn new(token: &'t CancellationToken, interval: u32) -> Self {
        CancellationPoll {
            token,
            interval: interval.max(1),
            counter: 0,
        }
    }

    pub fn tick(&mut self) -> Result<(), Cancelled> {
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            self.token.check()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());
        other.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(Cancelled));
    }

    #[test]
    fn test_poll_checks_only_at_interval() {
        let token = CancellationToken::new();
        token.cancel();
        let mut poll = CancellationPoll::new(&token, 3);
        assert!(poll.tick().is_ok());
        assert!(poll.tick().is_ok());
        assert_eq!(poll.tick(), Err(Cancelled));
        assert!(poll.tick().is_ok());
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let token = CancellationToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel())
            .join()
            .expect("thread panicked");
        assert!(token.is_cancelled());
    }
}
