use tracing::{debug, info};

use crate::{
    commands::Command,
    framework::{context::Context, timer::TimerToken},
    utils::CommandResult,
};

pub mod clue;
pub mod emote;
mod guard;
pub mod kappa;
pub mod minion;

pub use guard::{GameGuard, GameStarter};

/// What a game wants to happen after it handled a message or a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Continue,
    /// The sender of the message won and gets `reward` points.
    Won { reward: i64 },
    /// Nothing left to play for; close without a winner.
    Exhausted,
}

/// The game-specific half of a game command. [`GameCommand`] owns the
/// lifecycle around it: starting, stopping, rewards and the game guard.
pub trait Game: Send {
    const NAME: &'static str;
    const TITLE: &'static str;
    const START: &'static str;
    const STOP: &'static str;

    /// Sets up a fresh session and announces it. On error the game stays idle.
    fn start(&mut self, ctx: &mut Context<'_>) -> CommandResult;

    fn play(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult<Turn>;

    fn tick(&mut self, _ctx: &mut Context<'_>, _token: TimerToken) -> CommandResult<Turn> {
        Ok(Turn::Continue)
    }

    /// Cancels pending timers and drops the session. Must be idempotent.
    fn end(&mut self);
}

/// Idle until a start keyword is accepted, then active until someone
/// wins, a moderator stops it or the game runs out of content.
pub struct GameCommand<G> {
    game: G,
    starter: GameStarter,
    active: bool,
}

impl<G: Game> GameCommand<G> {
    pub fn new(game: G, stake: i64) -> Self {
        Self {
            game,
            starter: GameStarter::new(G::START, stake),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    fn finish(&mut self, ctx: &mut Context<'_>) {
        self.game.end();

        if self.active {
            self.active = false;
            ctx.guard().release();
            debug!(game = G::NAME, "game closed");
        }
    }

    fn resolve(&mut self, ctx: &mut Context<'_>, user: Option<&str>, turn: Turn) {
        match (turn, user) {
            (Turn::Continue, _) => {}
            (Turn::Won { reward }, Some(user)) => {
                info!(game = G::NAME, winner = user, reward, "game won");
                ctx.points().adjust(user, reward);
                self.finish(ctx);
            }
            (Turn::Won { .. } | Turn::Exhausted, _) => {
                info!(game = G::NAME, "game over without a winner");
                self.finish(ctx);
            }
        }
    }
}

impl<G: Game> Command for GameCommand<G> {
    fn name(&self) -> &'static str {
        G::NAME
    }

    fn matches(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> bool {
        self.active || self.starter.try_start(ctx, user, msg)
    }

    fn run(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult {
        if !self.active {
            // `matches` already claimed the guard, so a failed start gives it back
            if let Err(err) = self.game.start(ctx) {
                self.game.end();
                ctx.guard().release();
                return Err(err);
            }

            self.active = true;
            info!(game = G::NAME, started_by = user, "game started");
            return Ok(());
        }

        if msg.trim() == G::STOP && ctx.permission(user).is_privileged() {
            info!(game = G::NAME, stopped_by = user, "game stopped");
            self.finish(ctx);
            ctx.say(format!("The {} has been stopped.", G::TITLE));
            return Ok(());
        }

        let turn = self.game.play(ctx, user, msg)?;
        self.resolve(ctx, Some(user), turn);

        Ok(())
    }

    fn on_timer(&mut self, ctx: &mut Context<'_>, token: TimerToken) -> CommandResult {
        if !self.active {
            debug!(game = G::NAME, ?token, "timer fired for a closed game");
            return Ok(());
        }

        let turn = self.game.tick(ctx, token)?;
        self.resolve(ctx, None, turn);

        Ok(())
    }

    fn close(&mut self, ctx: &mut Context<'_>) {
        self.finish(ctx)
    }
}
