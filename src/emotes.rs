use std::collections::HashSet;

use serde::Deserialize;

/// The two emote sources games sample from. Pool A is the platform's own
/// emotes, pool B third-party ones.
pub trait EmotePools: Send + Sync {
    fn pool_a(&self) -> &[String];
    fn pool_b(&self) -> &[String];

    fn is_emote(&self, token: &str) -> bool {
        self.pool_a()
            .iter()
            .chain(self.pool_b())
            .any(|emote| emote == token)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "EmoteLists")]
pub struct Emotes {
    twitch: Vec<String>,
    bttv: Vec<String>,
    known: HashSet<String>,
}

#[derive(Deserialize)]
struct EmoteLists {
    #[serde(default)]
    twitch: Vec<String>,
    #[serde(default)]
    bttv: Vec<String>,
}

impl From<EmoteLists> for Emotes {
    fn from(lists: EmoteLists) -> Self {
        Self::new(lists.twitch, lists.bttv)
    }
}

impl Emotes {
    pub fn new(twitch: Vec<String>, bttv: Vec<String>) -> Self {
        let known = twitch.iter().chain(&bttv).cloned().collect();
        Self { twitch, bttv, known }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl EmotePools for Emotes {
    fn pool_a(&self) -> &[String] {
        &self.twitch
    }

    fn pool_b(&self) -> &[String] {
        &self.bttv
    }

    fn is_emote(&self, token: &str) -> bool {
        self.known.contains(token)
    }
}
