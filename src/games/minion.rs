use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use super::{clue::ClueScheduler, Game, Turn};
use crate::{
    corpus::{Card, CorpusSource},
    errors::{CommandError, MissingStatError},
    framework::{context::Context, timer::TimerToken},
    utils::{display_name, CommandResult},
};

const CARD_TYPE: &str = "MINION";

/// The card stats the game hands out as clues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minion {
    pub name: String,
    pub class: String,
    pub set: String,
    pub rarity: String,
    pub attack: u32,
    pub cost: u32,
    pub health: u32,
}

impl TryFrom<Card> for Minion {
    type Error = MissingStatError;

    fn try_from(card: Card) -> Result<Self, Self::Error> {
        let name = card.name.trim().to_owned();
        let missing = |stat: &str| MissingStatError::new(&name, stat);

        if name.is_empty() {
            return Err(MissingStatError::new("an unnamed card", "name"));
        }

        Ok(Self {
            class: card.card_class.ok_or_else(|| missing("class"))?,
            set: card.set.ok_or_else(|| missing("set"))?,
            rarity: card.rarity.ok_or_else(|| missing("rarity"))?,
            attack: card.attack.ok_or_else(|| missing("attack"))?,
            cost: card.cost.ok_or_else(|| missing("cost"))?,
            health: card.health.ok_or_else(|| missing("health"))?,
            name,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClueAttribute {
    Class,
    Set,
    Letter,
    Rarity,
    Attack,
    Cost,
    Health,
}

impl ClueAttribute {
    pub const ALL: [Self; 7] = [
        Self::Class,
        Self::Set,
        Self::Letter,
        Self::Rarity,
        Self::Attack,
        Self::Cost,
        Self::Health,
    ];

    pub fn clue(self, minion: &Minion, set_names: &HashMap<String, String>) -> String {
        match self {
            Self::Class => format!("The minion is a {} card.", minion.class.to_lowercase()),
            Self::Set => format!("The card is from the {} set.", set_alias(&minion.set, set_names)),
            Self::Letter => {
                let first = minion.name.chars().next().unwrap_or_default();
                format!("The name of the card starts with '{first}'.")
            }
            Self::Rarity => format!("The minion is a '{}' card.", minion.rarity.to_lowercase()),
            Self::Attack => format!("The minion has {} attackpower.", minion.attack),
            Self::Cost => format!("The card costs {} mana.", minion.cost),
            Self::Health => {
                let plural = if minion.health == 1 { "" } else { "s" };
                format!("The minion has {} healthpoint{plural}.", minion.health)
            }
        }
    }
}

impl fmt::Display for ClueAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Set => "set",
            Self::Letter => "letter",
            Self::Rarity => "rarity",
            Self::Attack => "attack",
            Self::Cost => "cost",
            Self::Health => "health",
        };

        f.write_str(name)
    }
}

/// The chat-friendly name for a set code. Config keys may have been
/// lowercased on the way in, so codes are compared ignoring case.
fn set_alias<'a>(set: &'a str, set_names: &'a HashMap<String, String>) -> &'a str {
    set_names
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(set))
        .map_or(set, |(_, alias)| alias.as_str())
}

#[derive(Debug)]
struct Session {
    minion: Minion,
    remaining: Vec<ClueAttribute>,
}

/// Guess the minion card from clues that show up every few seconds.
pub struct MinionGame {
    corpus: Arc<dyn CorpusSource>,
    rng: StdRng,
    reward: i64,
    set_names: HashMap<String, String>,
    clues: ClueScheduler,
    session: Option<Session>,
}

impl MinionGame {
    pub fn new(
        corpus: Arc<dyn CorpusSource>,
        reward: i64,
        interval: Duration,
        set_names: HashMap<String, String>,
    ) -> Self {
        Self::with_rng(corpus, reward, interval, set_names, StdRng::from_entropy())
    }

    pub fn seeded(
        corpus: Arc<dyn CorpusSource>,
        reward: i64,
        interval: Duration,
        set_names: HashMap<String, String>,
        seed: u64,
    ) -> Self {
        Self::with_rng(corpus, reward, interval, set_names, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        corpus: Arc<dyn CorpusSource>,
        reward: i64,
        interval: Duration,
        set_names: HashMap<String, String>,
        rng: StdRng,
    ) -> Self {
        Self {
            corpus,
            rng,
            reward,
            set_names,
            clues: ClueScheduler::new(interval),
            session: None,
        }
    }

    /// Reveals one attribute nobody has seen yet and books the next clue
    /// while there are any left.
    fn give_clue(&mut self, ctx: &mut Context<'_>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.remaining.is_empty() {
            trace!("no clues left");
            return;
        }

        let index = self.rng.gen_range(0..session.remaining.len());
        let attribute = session.remaining.swap_remove(index);

        debug!(%attribute, left = session.remaining.len(), "giving clue");
        ctx.say(attribute.clue(&session.minion, &self.set_names));

        if !session.remaining.is_empty() {
            self.clues.schedule(ctx);
        }
    }
}

impl Game for MinionGame {
    const NAME: &'static str = "minion";
    const TITLE: &'static str = "Guess The Minion Game";
    const START: &'static str = "!mstart";
    const STOP: &'static str = "!mstop";

    fn start(&mut self, ctx: &mut Context<'_>) -> CommandResult {
        let card = self
            .corpus
            .sample_by_type(CARD_TYPE, &mut self.rng)
            .ok_or_else(|| CommandError::EmptyCorpus(CARD_TYPE.to_lowercase()))?;
        let minion = Minion::try_from(card)?;

        debug!(minion = minion.name, "minion game answer");

        self.session = Some(Session {
            minion,
            remaining: ClueAttribute::ALL.to_vec(),
        });

        ctx.say(format!(
            "The '{}' has started. Type minion names to play.",
            Self::TITLE
        ));
        self.give_clue(ctx);

        Ok(())
    }

    fn play(&mut self, ctx: &mut Context<'_>, user: &str, msg: &str) -> CommandResult<Turn> {
        let Some(session) = self.session.as_ref() else {
            return Ok(Turn::Continue);
        };
        let name = &session.minion.name;

        if msg.trim().to_lowercase() != name.to_lowercase() {
            return Ok(Turn::Continue);
        }

        let user = display_name(user);
        ctx.say(format!(
            "{user} got it! It was {name}. {user} gets {} spam points.",
            self.reward
        ));

        Ok(Turn::Won {
            reward: self.reward,
        })
    }

    fn tick(&mut self, ctx: &mut Context<'_>, token: TimerToken) -> CommandResult<Turn> {
        if self.clues.fire(token) {
            self.give_clue(ctx);
        }

        Ok(Turn::Continue)
    }

    fn end(&mut self) {
        self.clues.cancel();
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc, time::Duration};

    use pretty_assertions::assert_eq;

    use super::{ClueAttribute, Minion, MinionGame};
    use crate::{
        corpus::{Card, Cards},
        framework::event_handler::Event,
        games::GameCommand,
        permission::Permission,
        points::PointLedger,
        testing::Harness,
    };

    fn card(name: &str, card_type: &str) -> Card {
        Card {
            name: name.to_owned(),
            card_type: card_type.to_owned(),
            card_class: Some("MAGE".to_owned()),
            set: Some("EXPERT1".to_owned()),
            rarity: Some("RARE".to_owned()),
            attack: Some(3),
            cost: Some(4),
            health: Some(1),
        }
    }

    fn set_names() -> HashMap<String, String> {
        HashMap::from([("expert1".to_owned(), "CLASSIC".to_owned())])
    }

    fn game(cards: Vec<Card>) -> GameCommand<MinionGame> {
        let corpus = Arc::new(Cards::new(cards));
        let game = MinionGame::seeded(corpus, 20, Duration::from_secs(10), set_names(), 9);

        GameCommand::new(game, 5)
    }

    fn harness(cards: Vec<Card>) -> Harness {
        Harness::empty()
            .with_permission("modguy", Permission::Moderator)
            .with_points("pleb", 50)
            .with_command(game(cards))
    }

    fn corpus() -> Vec<Card> {
        vec![card("Fireball", "SPELL"), card("Water Elemental", "MINION")]
    }

    #[test]
    fn clue_texts() {
        let minion = Minion::try_from(card("Water Elemental", "MINION")).expect("all stats set");
        let clues: Vec<String> = ClueAttribute::ALL
            .iter()
            .map(|attribute| attribute.clue(&minion, &set_names()))
            .collect();

        assert_eq!(
            clues,
            [
                "The minion is a mage card.",
                "The card is from the CLASSIC set.",
                "The name of the card starts with 'W'.",
                "The minion is a 'rare' card.",
                "The minion has 3 attackpower.",
                "The card costs 4 mana.",
                "The minion has 1 healthpoint.",
            ]
        );

        let tougher = Minion {
            health: 5,
            set: "KARA".to_owned(),
            ..minion
        };
        assert_eq!(
            ClueAttribute::Health.clue(&tougher, &set_names()),
            "The minion has 5 healthpoints."
        );
        assert_eq!(
            ClueAttribute::Set.clue(&tougher, &set_names()),
            "The card is from the KARA set."
        );
    }

    #[test]
    fn missing_stat_is_named() {
        let mut broken = card("Blank", "MINION");
        broken.attack = None;

        let err = Minion::try_from(broken).expect_err("no attack");
        assert_eq!(
            err.to_string(),
            "the card data for Blank has no attack, the game can't continue"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn seven_distinct_clues_then_silence() {
        let mut harness = harness(corpus());

        harness.say("pleb", "!mstart");
        assert_eq!(harness.points.balance_of("pleb"), 45);

        while harness.tick().await {}

        let said = harness.said();
        assert_eq!(
            said[0],
            "The 'Guess The Minion Game' has started. Type minion names to play."
        );

        let mut clues = said[1..].to_vec();
        assert_eq!(clues.len(), 7);
        clues.sort();
        clues.dedup();
        assert_eq!(clues.len(), 7, "a clue was repeated");

        // all clues given, but nobody has won yet
        assert!(harness.game_running());
    }

    #[tokio::test(start_paused = true)]
    async fn win_stops_clues_and_pays_once() {
        let mut harness = harness(corpus());

        harness.say("pleb", "!mstart");
        assert!(harness.tick().await);
        assert!(harness.tick().await);
        assert_eq!(harness.said().len(), 4);
        harness.clear();

        harness.say("viewer", "  water ELEMENTAL ");
        assert_eq!(
            harness.said(),
            ["Viewer got it! It was Water Elemental. Viewer gets 20 spam points."]
        );
        assert_eq!(harness.points.balance_of("viewer"), 20);
        assert!(!harness.game_running());

        harness.say("viewer", "water elemental");
        assert_eq!(harness.points.balance_of("viewer"), 20);

        assert!(harness.next_event().await.is_none(), "no clue after the win");
    }

    #[tokio::test(start_paused = true)]
    async fn moderator_stop_cancels_clues() {
        let mut harness = harness(corpus());

        harness.say("pleb", "!mstart");
        harness.say("pleb", "!mstop");
        assert!(harness.game_running());

        harness.say("modguy", "!mstop");
        assert!(!harness.game_running());
        assert_eq!(
            harness.said().last().map(String::as_str),
            Some("The Guess The Minion Game has been stopped.")
        );
        assert_eq!(harness.points.balance_of("pleb"), 45);

        assert!(harness.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_after_restart_is_ignored() {
        let mut harness = harness(corpus());

        harness.say("modguy", "!mstart");
        let stale = harness.next_event().await.expect("second clue is due");
        assert!(matches!(stale, Event::Timer { .. }));

        // close and restart while the old tick is already queued
        harness.say("modguy", "!mstop");
        harness.say("modguy", "!mstart");
        harness.clear();

        let _ = harness.dispatcher.handle(stale);
        assert!(harness.said().is_empty(), "stale tick gave a clue");

        // the new game's own clue still arrives
        assert!(harness.tick().await);
        assert_eq!(harness.said().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_after_reload_is_ignored() {
        let mut harness = harness(corpus());

        harness.say("modguy", "!mstart");
        let stale = harness.next_event().await.expect("second clue is due");
        assert!(matches!(stale, Event::Timer { slot: 0, .. }));

        // a fresh command takes over the same slot and starts its own game
        harness.dispatcher.reload(vec![Box::new(game(corpus()))]);
        assert!(!harness.game_running());
        harness.say("modguy", "!mstart");
        harness.clear();

        let _ = harness.dispatcher.handle(stale);
        assert!(harness.said().is_empty(), "tick from before the reload gave a clue");

        assert!(harness.tick().await);
        assert_eq!(harness.said().len(), 1);
    }

    #[test]
    fn empty_corpus_is_reported() {
        let mut harness = harness(vec![card("Fireball", "SPELL")]);

        harness.say("pleb", "!mstart");

        assert!(!harness.game_running());
        assert_eq!(
            harness.said(),
            ["there are no minion cards to play with right now. FeelsBadMan"]
        );
        assert_eq!(harness.points.balance_of("pleb"), 45);
    }

    #[test]
    fn broken_card_is_reported() {
        let mut broken = card("Blank", "MINION");
        broken.health = None;
        let mut harness = harness(vec![broken]);

        harness.say("modguy", "!mstart");

        assert!(!harness.game_running());
        assert_eq!(
            harness.said(),
            ["the card data for Blank has no health, the game can't continue"]
        );
    }
}
