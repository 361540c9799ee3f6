use std::time::Duration;

use tracing::trace;

use crate::framework::{
    context::Context,
    timer::{TimerHandle, TimerToken},
};

/// Keeps at most one pending clue timer for a game.
///
/// A tick only counts if its token belongs to the timer that is pending
/// right now; ticks from cancelled or replaced timers that were already
/// queued are ignored by [`ClueScheduler::fire`].
#[derive(Debug)]
pub struct ClueScheduler {
    interval: Duration,
    pending: Option<TimerHandle>,
}

impl ClueScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces any pending timer with a new one, `interval` from now.
    pub fn schedule(&mut self, ctx: &mut Context<'_>) {
        self.cancel();
        self.pending = Some(ctx.schedule(self.interval));
    }

    pub fn cancel(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            trace!(token = ?pending.token(), "clue timer cancelled");
            pending.cancel();
        }
    }

    /// Claims a tick. `true` means the pending timer fired and is now spent.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        match self.pending {
            Some(ref pending) if pending.token() == token => {
                self.pending = None;
                true
            }
            _ => {
                trace!(?token, "ignoring stale clue timer");
                false
            }
        }
    }
}
