use tracing::{debug, info, instrument};

use super::Command;
use crate::{
    framework::context::Context,
    utils::{display_name, CommandResult},
};

/// Rows of a three-high pyramid, by position in the streak.
const HEIGHTS: [usize; 5] = [1, 2, 3, 2, 1];

/// Watches every message for emote pyramids.
///
/// A full pyramid (`E`, `E E`, `E E E`, `E E`, `E`) earns points. Cutting it
/// short after the second row (`E`, `E E`, `E`) is a pleb pyramid and earns
/// non-privileged builders a timeout instead. The streak counts rows across
/// all chatters, not per user.
#[derive(Debug, Clone)]
pub struct Pyramid {
    streak: usize,
    emote: String,
    reward: i64,
    timeout: u64,
}

impl Pyramid {
    pub fn new(reward: i64, timeout: u64) -> Self {
        Self {
            streak: 0,
            emote: String::new(),
            reward,
            timeout,
        }
    }

    pub fn streak(&self) -> usize {
        self.streak
    }

    fn row(&self, streak: usize) -> Option<String> {
        let height = HEIGHTS.get(streak.checked_sub(1)?)?;
        Some(vec![self.emote.as_str(); *height].join(" "))
    }

    fn begin(&mut self, ctx: &Context<'_>, msg: &str) {
        if ctx.emotes().is_emote(msg) {
            self.emote = msg.to_owned();
            self.streak = 1;
        } else {
            self.streak = 0;
        }
    }

    fn complete(&mut self, ctx: &mut Context<'_>, user: &str) {
        self.streak = 0;

        info!(user, emote = self.emote, reward = self.reward, "pyramid built");
        ctx.say(format!(
            "Yay. {} created a pyramid and gets {} spam points.",
            display_name(user),
            self.reward
        ));
        ctx.points().adjust(user, self.reward);
    }

    fn pleb(&mut self, ctx: &mut Context<'_>, user: &str) {
        self.streak = 0;
        let name = display_name(user);

        if ctx.permission(user).is_privileged() {
            ctx.say(format!(
                "{name} created a pleb pyramid and would get a free timeout, but is a mod. FeelsBadMan"
            ));
        } else {
            ctx.say(format!(
                "Wow, {name} created a pleb pyramid and gets a free timeout. 4Head"
            ));
            ctx.timeout(user, self.timeout);
        }
    }
}

impl Command for Pyramid {
    fn name(&self) -> &'static str {
        "pyramid"
    }

    fn matches(&mut self, _ctx: &mut Context<'_>, _user: &str, _msg: &str) -> bool {
        true
    }

    #[instrument(skip_all, fields(streak = self.streak))]
    fn run(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult {
        let msg = msg.trim();

        if self.streak == 0 {
            self.begin(ctx, msg);
            return Ok(());
        }

        let streak = self.streak + 1;

        if self.row(streak).as_deref() == Some(msg) {
            if streak == HEIGHTS.len() {
                self.complete(ctx, user);
            } else {
                self.streak = streak;
            }
        } else if streak == 3 && self.row(1).as_deref() == Some(msg) {
            self.pleb(ctx, user);
        } else {
            debug!(streak, "pyramid broken");
            self.begin(ctx, msg);
        }

        Ok(())
    }
}
