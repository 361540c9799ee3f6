use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use super::{Game, Turn};
use crate::{
    errors::ParseInputError,
    framework::context::Context,
    utils::{display_name, CommandResult},
};

const EMOTE: &str = "Kappa";
const MAX: u32 = 25;

/// Guess how many Kappas the bot is thinking of.
pub struct KappaGame {
    rng: StdRng,
    reward: i64,
    answer: Option<u32>,
}

impl KappaGame {
    pub fn new(reward: i64) -> Self {
        Self::with_rng(reward, StdRng::from_entropy())
    }

    pub fn seeded(reward: i64, seed: u64) -> Self {
        Self::with_rng(reward, StdRng::seed_from_u64(seed))
    }

    fn with_rng(reward: i64, rng: StdRng) -> Self {
        Self {
            rng,
            reward,
            answer: None,
        }
    }

    pub fn answer(&self) -> Option<u32> {
        self.answer
    }
}

/// How many times `emote` makes up the whole message. `None` if the message
/// has anything else in it.
pub fn count_emotes(msg: &str, emote: &str) -> Option<u32> {
    let mut count = 0;

    for token in msg.split_whitespace() {
        if token != emote {
            return None;
        }

        count += 1;
    }

    (count > 0).then_some(count)
}

impl Game for KappaGame {
    const NAME: &'static str = "kappa";
    const TITLE: &'static str = "Kappa game";
    const START: &'static str = "!kstart";
    const STOP: &'static str = "!kstop";

    fn start(&mut self, ctx: &mut Context<'_>) -> CommandResult {
        let answer = self.rng.gen_range(1..=MAX);
        debug!(answer, "kappa game answer");
        self.answer = Some(answer);

        ctx.say(format!(
            "Kappa game has started. Guess the right amount of {EMOTE} s between 1 and {MAX}! PogChamp"
        ));

        Ok(())
    }

    fn play(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult<Turn> {
        let Some(answer) = self.answer else {
            return Ok(Turn::Continue);
        };

        if !msg.split_whitespace().any(|token| token == EMOTE) {
            return Ok(Turn::Continue);
        }

        let guess = count_emotes(msg, EMOTE).ok_or_else(|| {
            ParseInputError::new(msg, format!("Only {EMOTE} s count, nothing else. 4Head"))
        })?;

        if guess == answer {
            ctx.say(format!(
                "{} got it! It was {answer} {EMOTE} s!",
                display_name(user)
            ));

            return Ok(Turn::Won {
                reward: self.reward,
            });
        }

        ctx.say(format!("It's not {guess}. 4Head"));
        Ok(Turn::Continue)
    }

    fn end(&mut self) {
        self.answer = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{count_emotes, KappaGame};
    use crate::{
        games::{Game, GameCommand},
        permission::Permission,
        points::PointLedger,
        testing::Harness,
    };

    #[test]
    fn counts_only_pure_messages() {
        assert_eq!(count_emotes("Kappa", "Kappa"), Some(1));
        assert_eq!(count_emotes("  Kappa Kappa  Kappa ", "Kappa"), Some(3));
        assert_eq!(count_emotes("Kappa lol", "Kappa"), None);
        assert_eq!(count_emotes("kappa", "Kappa"), None);
        assert_eq!(count_emotes("", "Kappa"), None);
    }

    fn started() -> (Harness, u32) {
        let mut harness = Harness::empty()
            .with_points("pleb", 50)
            .with_command(GameCommand::new(KappaGame::seeded(7, 42), 5));

        assert_eq!(harness.say("pleb", "!kstart"), Some("kappa"));
        assert_eq!(
            harness.said(),
            ["Kappa game has started. Guess the right amount of Kappa s between 1 and 25! PogChamp"]
        );
        harness.clear();

        // same seed, same first draw
        let mut reference = KappaGame::seeded(7, 42);
        let answer = harness.with_context(|ctx| {
            reference.start(ctx).expect("kappa game always starts");
            reference.answer().expect("answer drawn on start")
        });
        harness.clear();

        (harness, answer)
    }

    fn kappas(n: u32) -> String {
        vec!["Kappa"; n as usize].join(" ")
    }

    #[test]
    fn wrong_guess_is_told_off() {
        let (mut harness, answer) = started();
        let wrong = if answer == 1 { 2 } else { answer - 1 };

        harness.say("pleb", &kappas(wrong));

        assert_eq!(harness.said(), [format!("It's not {wrong}. 4Head")]);
        assert!(harness.game_running());
    }

    #[test]
    fn right_guess_wins() {
        let (mut harness, answer) = started();

        harness.say("viewer", &kappas(answer));

        assert_eq!(
            harness.said(),
            [format!("Viewer got it! It was {answer} Kappa s!")]
        );
        assert_eq!(harness.points.balance_of("viewer"), 7);
        assert!(!harness.game_running());

        // game is over, the same guess does nothing
        assert_eq!(harness.say("viewer", &kappas(answer)), None);
        assert_eq!(harness.points.balance_of("viewer"), 7);
    }

    #[test]
    fn mixed_message_is_a_parse_fault() {
        let (mut harness, _) = started();

        harness.say("pleb", "Kappa Kappa PogChamp");
        harness.say("pleb", "just chatting");

        assert_eq!(harness.said(), ["Only Kappa s count, nothing else. 4Head"]);
        assert!(harness.game_running());
    }

    #[test]
    fn moderator_can_stop() {
        let (harness, _) = started();
        let mut harness = harness.with_permission("modguy", Permission::Moderator);

        harness.say("modguy", "!kstop");

        assert!(!harness.game_running());
        assert_eq!(harness.said(), ["The Kappa game has been stopped."]);
        assert_eq!(harness.points.balance_of("pleb"), 45);
    }
}
