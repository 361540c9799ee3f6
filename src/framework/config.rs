use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use rand::seq::IteratorRandom;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::permission::{Permission, PermissionTable};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub games: GamesConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "./spambot.toml";

    #[tracing::instrument(skip_all)]
    pub fn load(path: &Path) -> Result<Self, Error> {
        ::config::Config::builder()
            .add_source(::config::File::new(
                &path.to_string_lossy(),
                ::config::FileFormat::Toml,
            ))
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)
    }

    /// `SPAMBOT_TOML` from the environment, else [`Self::DEFAULT_PATH`].
    pub fn path_from_env() -> PathBuf {
        if let Ok(path) = std::env::var("SPAMBOT_TOML") {
            info!(path, "looking for config file with SPAMBOT_TOML...");
            path.into()
        } else {
            warn!(path = Self::DEFAULT_PATH, "SPAMBOT_TOML env unset, using default path");
            Self::DEFAULT_PATH.into()
        }
    }

    #[cfg(test)]
    pub(crate) fn from_toml(text: &str) -> Result<Self, Error> {
        ::config::Config::builder()
            .add_source(::config::File::from_str(text, ::config::FileFormat::Toml))
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)
    }
}

#[derive(Debug, thiserror::Error, thisslime::TracingError)]
pub enum Error {
    #[error("file read error: {0}")]
    #[event(level = ERROR)]
    Read(::config::ConfigError),

    #[error("parsing error: {0}")]
    #[event(level = ERROR)]
    Parse(::config::ConfigError),
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BotConfig {
    channel: Option<String>,
    #[serde(default)]
    admins: Vec<String>,
    #[serde(default)]
    moderators: Vec<String>,
    #[serde(default)]
    subscribers: Vec<String>,
}

impl BotConfig {
    pub fn channel(&self) -> Option<&str> {
        if self.channel.is_none() {
            warn!("no bot.channel set in config");
        }

        self.channel.as_deref()
    }

    pub fn permissions(&self) -> PermissionTable {
        let mut table = PermissionTable::new();

        let levels = [
            (&self.subscribers, Permission::Subscriber),
            (&self.moderators, Permission::Moderator),
            (&self.admins, Permission::Admin),
        ];

        for (users, level) in levels {
            for user in users {
                table.set(user, level);
            }
        }

        if table.is_empty() {
            warn!("no admins, moderators or subscribers in config, everyone is a user");
        } else {
            debug!(users = table.len(), "permission table built");
        }

        table
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LogsConfig {
    #[serde(default)]
    flavor_texts: Vec<String>,
}

impl LogsConfig {
    pub fn flavor_text(&self) -> Option<&str> {
        let flavor_text = self
            .flavor_texts
            .iter()
            .choose(&mut rand::thread_rng())
            .map(|s| s.as_str());

        if flavor_text.is_none() {
            warn!("no flavor texts provided in config :(");
        }

        flavor_text
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GamesConfig {
    /// Points a non-privileged user pays to start any game.
    pub stake: i64,
    pub clue_interval_secs: u64,
    pub timeout_secs: u64,
    pub pyramid_reward: i64,
    pub kappa_reward: i64,
    pub emote_reward: i64,
    pub minion_reward: i64,
    pub emote_pool_a: usize,
    pub emote_pool_b: usize,
    /// Card set codes and the names chat knows them by.
    pub set_names: HashMap<String, String>,
}

impl GamesConfig {
    pub fn clue_interval(&self) -> Duration {
        Duration::from_secs(self.clue_interval_secs)
    }
}

impl Default for GamesConfig {
    fn default() -> Self {
        let set_names = [
            ("EXPERT1", "CLASSIC"),
            ("CORE", "CLASSIC"),
            ("OG", "WotOG"),
            ("GANGS", "MSoG"),
            ("KARA", "OniK"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_owned(), name.to_owned()))
        .collect();

        Self {
            stake: 5,
            clue_interval_secs: 10,
            timeout_secs: 60,
            pyramid_reward: 30,
            kappa_reward: 7,
            emote_reward: 15,
            minion_reward: 20,
            emote_pool_a: 15,
            emote_pool_b: 10,
            set_names,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub replies: PathBuf,
    pub quotes: PathBuf,
    pub cards: PathBuf,
    pub emotes: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            replies: "data/sreply_cmds.json".into(),
            quotes: "data/quotes.json".into(),
            cards: "data/cards.json".into(),
            emotes: "data/emotes.json".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::Config;
    use crate::permission::{Permission, PermissionOracle};

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").expect("empty config should parse");

        assert_eq!(config.games.stake, 5);
        assert_eq!(config.games.clue_interval(), Duration::from_secs(10));
        assert_eq!(config.games.emote_pool_a + config.games.emote_pool_b, 25);
        assert_eq!(
            config.games.set_names.get("KARA").map(String::as_str),
            Some("OniK")
        );
        assert_eq!(config.data.quotes.to_str(), Some("data/quotes.json"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn parses_sections() {
        let config = Config::from_toml(
            r#"
            [bot]
            channel = "spamchannel"
            admins = ["Owner"]
            moderators = ["modguy", "owner"]
            subscribers = ["fan"]

            [logs]
            flavor_texts = ["beep boop"]

            [games]
            stake = 10
            clue_interval_secs = 3

            [games.set_names]
            NAXX = "Naxxramas"
            "#,
        )
        .expect("hard-coded config should parse");

        assert_eq!(config.bot.channel(), Some("spamchannel"));
        assert_eq!(config.logs.flavor_text(), Some("beep boop"));
        assert_eq!(config.games.stake, 10);
        assert_eq!(config.games.minion_reward, 20);
        assert_eq!(config.games.clue_interval(), Duration::from_secs(3));
        assert_eq!(config.games.set_names.len(), 1);

        let permissions = config.bot.permissions();
        assert_eq!(permissions.level_of("owner"), Permission::Admin);
        assert_eq!(permissions.level_of("modguy"), Permission::Moderator);
        assert_eq!(permissions.level_of("fan"), Permission::Subscriber);
        assert_eq!(permissions.level_of("lurker"), Permission::User);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::from_toml("[games]\nstake = \"five\"").is_err());
    }
}
