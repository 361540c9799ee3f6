use crate::{
    framework::{context::Context, data::BotData, timer::TimerToken},
    games::{emote::EmoteGame, kappa::KappaGame, minion::MinionGame, GameCommand},
    permission::Permission,
    utils::CommandResult,
};

pub mod pyramid;
pub mod quotes;
pub mod replies;
pub mod sleep;

use pyramid::Pyramid;
use quotes::{EditQuotes, OutputQuote};
use replies::{EditReplies, SimpleReply};
use sleep::Sleep;

/// A way of reacting to chat messages.
///
/// The dispatcher asks every command in registration order whether it
/// [`matches`](Command::matches) a message and runs only the first one that
/// does. `matches` may have side effects: game commands take the stake and
/// claim the game guard there.
pub trait Command: Send {
    fn name(&self) -> &'static str;

    /// Users below this level never reach `matches`.
    fn permission(&self) -> Permission {
        Permission::User
    }

    fn matches(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> bool;

    fn run(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult;

    /// A timer this command scheduled has fired.
    fn on_timer(&mut self, _ctx: &mut Context<'_>, _token: TimerToken) -> CommandResult {
        Ok(())
    }

    /// Release timers and shared state before the command is dropped or replaced.
    fn close(&mut self, _ctx: &mut Context<'_>) {}
}

/// Every command the bot runs, highest priority first. The pyramid watcher
/// matches everything, so it has to stay last.
pub fn list(data: &BotData) -> Vec<Box<dyn Command>> {
    let games = &data.config.games;

    vec![
        Box::new(Sleep),
        Box::new(EditReplies::new(data.replies.clone(), data.reply_store())),
        Box::new(SimpleReply::new(data.replies.clone())),
        Box::new(EditQuotes::new(data.quotes.clone(), data.quote_store())),
        Box::new(OutputQuote::new(data.quotes.clone())),
        Box::new(GameCommand::new(
            KappaGame::new(games.kappa_reward),
            games.stake,
        )),
        Box::new(GameCommand::new(
            EmoteGame::new(games.emote_reward, games.emote_pool_a, games.emote_pool_b),
            games.stake,
        )),
        Box::new(GameCommand::new(
            MinionGame::new(
                data.cards.clone(),
                games.minion_reward,
                games.clue_interval(),
                games.set_names.clone(),
            ),
            games.stake,
        )),
        Box::new(Pyramid::new(games.pyramid_reward, games.timeout_secs)),
    ]
}
