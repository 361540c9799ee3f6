use rand::{seq::SliceRandom, RngCore};
use serde::Deserialize;

/// One card from the card database, as exported in the usual `cards.json` shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default)]
    pub card_class: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub attack: Option<u32>,
    #[serde(default)]
    pub cost: Option<u32>,
    #[serde(default)]
    pub health: Option<u32>,
}

pub trait CorpusSource: Send + Sync {
    /// A uniformly random card of the given type, or `None` if there are none.
    fn sample_by_type(&self, card_type: &str, rng: &mut dyn RngCore) -> Option<Card>;
}

#[derive(Debug, Clone, Default)]
pub struct Cards(Vec<Card>);

impl Cards {
    pub fn new(cards: Vec<Card>) -> Self {
        Self(cards)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CorpusSource for Cards {
    fn sample_by_type(&self, card_type: &str, rng: &mut dyn RngCore) -> Option<Card> {
        let matching: Vec<&Card> = self
            .0
            .iter()
            .filter(|card| card.card_type == card_type)
            .collect();

        matching.choose(rng).map(|card| (*card).clone())
    }
}
