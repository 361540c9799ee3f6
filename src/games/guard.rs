use tracing::{debug, info};

use crate::framework::context::Context;

/// The one-game-at-a-time flag shared by every game command.
///
/// Starts out clear; set only by a successful [`GameStarter::try_start`]
/// and cleared by the close sequence of whichever game holds it.
#[derive(Debug, Default)]
pub struct GameGuard {
    running: bool,
}

impl GameGuard {
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Sets the flag, returning `false` if it was already set.
    pub(crate) fn acquire(&mut self) -> bool {
        if self.running {
            false
        } else {
            debug!("game guard acquired");
            self.running = true;
            true
        }
    }

    pub fn release(&mut self) {
        if self.running {
            debug!("game guard released");
        }

        self.running = false;
    }
}

/// Decides whether a message may start a game, charging non-privileged
/// users a stake. The stake is never refunded, whatever the outcome.
#[derive(Debug, Clone)]
pub struct GameStarter {
    keyword: &'static str,
    stake: i64,
}

impl GameStarter {
    pub fn new(keyword: &'static str, stake: i64) -> Self {
        Self { keyword, stake }
    }

    pub fn try_start(&self, ctx: &mut Context<'_>, user: &str, msg: &str) -> bool {
        if ctx.game_running() || msg.trim() != self.keyword {
            return false;
        }

        if !ctx.permission(user).is_privileged() {
            let balance = ctx.points().balance_of(user);

            if balance <= self.stake {
                debug!(user, balance, stake = self.stake, "not enough points to start a game");
                ctx.say(format!(
                    "You need more than {} points to start a game.",
                    self.stake
                ));
                return false;
            }

            ctx.points().adjust(user, -self.stake);
            info!(user, stake = self.stake, keyword = self.keyword, "stake paid");
        }

        ctx.guard().acquire()
    }
}
