//! Command repeater - periodic re-send for held controls
//!
//! Emulates continuous analog input ("drive forward while held") over the
//! discrete command channel: send the command, sleep the interval, repeat
//! until cancelled. Cancellation is cooperative and checked between
//! iterations, so at most the in-flight send completes after `cancel`;
//! actual stop latency is bounded by one interval.
//!
//! Per-gesture handle ownership is the caller's: starting a new repeat
//! without cancelling the previous one is caller error the core does not
//! guard against. `cancel` itself is an idempotent no-op on finished
//! handles.

use super::LinkCore;
use crate::transport::Duplex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Handle to an active repeating-send job
#[derive(Debug, Clone)]
pub struct RepeatHandle {
    cancelled: Arc<AtomicBool>,
}

impl RepeatHandle {
    pub(super) fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// An inert handle whose job already finished (or never ran)
    ///
    /// Useful as a placeholder where a gesture slot must always hold a
    /// cancellable handle.
    pub fn finished() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stop further sends
    ///
    /// Idempotent; safe on a handle whose job already finished.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(super) fn flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }
}

/// Repeating-send loop, one task per held gesture
///
/// Stops on cancellation or when the send path reports the link is gone;
/// the repeater cannot outlive the connection it drives.
pub(super) async fn run<S: Duplex>(
    core: Arc<LinkCore<S>>,
    command: String,
    interval: Duration,
    cancelled: Arc<AtomicBool>,
) {
    loop {
        if cancelled.load(Ordering::SeqCst) {
            debug!(%command, "repeat cancelled");
            break;
        }
        if !core.send(&command).await {
            debug!(%command, "repeat stopped, link is down");
            break;
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = RepeatHandle::new();
        assert!(!handle.is_cancelled());

        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_finished_handle_is_already_cancelled() {
        let handle = RepeatHandle::finished();
        assert!(handle.is_cancelled());
        handle.cancel();
    }

    #[test]
    fn test_clones_share_cancellation() {
        let handle = RepeatHandle::new();
        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancelled());
    }
}
