use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use super::{Game, Turn};
use crate::{
    emotes::EmotePools,
    errors::NotEnoughEmotesError,
    framework::context::Context,
    utils::{display_name, CommandResult},
};

const LIST_KEYWORD: &str = "!emotes";

/// Guess which of the listed emotes the bot picked.
pub struct EmoteGame {
    rng: StdRng,
    reward: i64,
    from_a: usize,
    from_b: usize,
    candidates: Vec<String>,
    answer: Option<String>,
}

impl EmoteGame {
    pub fn new(reward: i64, from_a: usize, from_b: usize) -> Self {
        Self::with_rng(reward, from_a, from_b, StdRng::from_entropy())
    }

    pub fn seeded(reward: i64, from_a: usize, from_b: usize, seed: u64) -> Self {
        Self::with_rng(reward, from_a, from_b, StdRng::seed_from_u64(seed))
    }

    fn with_rng(reward: i64, from_a: usize, from_b: usize, rng: StdRng) -> Self {
        Self {
            rng,
            reward,
            from_a,
            from_b,
            candidates: Vec::new(),
            answer: None,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    fn list(&self) -> String {
        self.candidates.join(" ")
    }
}

/// Draws `from_a` distinct emotes from pool A, then `from_b` distinct emotes
/// from pool B that weren't already drawn, in shuffled order. Asking for no
/// emotes at all is an error, since the game would have no answer.
pub fn sample_candidates(
    pools: &dyn EmotePools,
    from_a: usize,
    from_b: usize,
    rng: &mut StdRng,
) -> Result<Vec<String>, NotEnoughEmotesError> {
    if from_a + from_b == 0 {
        return Err(NotEnoughEmotesError::new("game", 1, 0));
    }

    let mut chosen: Vec<String> = Vec::with_capacity(from_a + from_b);

    let mut pool_a: Vec<&String> = pools.pool_a().iter().collect();
    pool_a.sort_unstable();
    pool_a.dedup();

    if pool_a.len() < from_a {
        return Err(NotEnoughEmotesError::new("twitch", from_a, pool_a.len()));
    }

    chosen.extend(pool_a.choose_multiple(rng, from_a).map(|emote| (*emote).clone()));

    let mut pool_b: Vec<&String> = pools
        .pool_b()
        .iter()
        .filter(|emote| !chosen.contains(*emote))
        .collect();
    pool_b.sort_unstable();
    pool_b.dedup();

    if pool_b.len() < from_b {
        return Err(NotEnoughEmotesError::new("bttv", from_b, pool_b.len()));
    }

    chosen.extend(pool_b.choose_multiple(rng, from_b).map(|emote| (*emote).clone()));

    chosen.shuffle(rng);
    Ok(chosen)
}

impl Game for EmoteGame {
    const NAME: &'static str = "emote";
    const TITLE: &'static str = "Guess The Emote Game";
    const START: &'static str = "!estart";
    const STOP: &'static str = "!estop";

    fn start(&mut self, ctx: &mut Context<'_>) -> CommandResult {
        let candidates = sample_candidates(ctx.emotes(), self.from_a, self.from_b, &mut self.rng)?;
        let answer = candidates.choose(&mut self.rng).cloned();

        debug!(?answer, candidates = candidates.len(), "emote game answer");

        self.candidates = candidates;
        self.answer = answer;

        ctx.say(format!(
            "The '{}' has started. Write one of the following emotes to start playing: {}",
            Self::TITLE,
            self.list()
        ));

        Ok(())
    }

    fn play(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult<Turn> {
        let Some(answer) = self.answer.as_deref() else {
            return Ok(Turn::Continue);
        };
        let guess = msg.trim();

        if guess == answer {
            let name = display_name(user);
            ctx.say(format!(
                "{name} got it! It was {answer} . {name} gets {} spam points.",
                self.reward
            ));

            return Ok(Turn::Won {
                reward: self.reward,
            });
        }

        if guess == LIST_KEYWORD {
            ctx.say(format!("Possible game emotes: {}", self.list()));
        }

        Ok(Turn::Continue)
    }

    fn end(&mut self) {
        self.candidates.clear();
        self.answer = None;
    }
}
