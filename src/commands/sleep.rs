use tracing::info;

use super::Command;
use crate::{
    framework::context::Context,
    permission::Permission,
    utils::{strip_prefix_ignore_case, CommandResult},
};

/// `!sleep` and `!wakeup`. While asleep the dispatcher only listens to admins.
#[derive(Debug, Clone, Copy)]
pub struct Sleep;

impl Command for Sleep {
    fn name(&self) -> &'static str {
        "sleep"
    }

    fn permission(&self) -> Permission {
        Permission::Admin
    }

    fn matches(&mut self, _ctx: &mut Context<'_>, _user: &str, msg: &str) -> bool {
        let msg = msg.trim();
        strip_prefix_ignore_case(msg, "!sleep").is_some()
            || strip_prefix_ignore_case(msg, "!wakeup").is_some()
    }

    fn run(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult {
        if strip_prefix_ignore_case(msg.trim(), "!sleep").is_some() {
            info!(user, "going to sleep");
            ctx.say("Going to sleep... bye!");
            ctx.set_paused(true);
        } else {
            info!(user, "waking up");
            ctx.say("Good morning everyone!");
            ctx.set_paused(false);
        }

        Ok(())
    }
}
