use thiserror::Error as ThisError;
use thisslime::TracingError;
use tracing::debug;

use crate::framework::DataError;

/// Anything a command can fail with. The dispatcher traces it and writes
/// the display text to chat, so messages here are written for chatters.
#[derive(Debug, ThisError, TracingError)]
#[span(level = WARN)]
pub enum CommandError {
    #[error("there are no {0} cards to play with right now. FeelsBadMan")]
    #[event(level = ERROR)]
    EmptyCorpus(String),

    #[error(transparent)]
    MissingStat(#[from] MissingStatError),

    #[error(transparent)]
    NotEnoughEmotes(#[from] NotEnoughEmotesError),

    #[error(transparent)]
    Parse(#[from] ParseInputError),

    #[error("couldn't save that, try again later")]
    #[event(level = ERROR)]
    Data(#[from] DataError),
}

/// Anything that stops the bot from starting.
#[derive(Debug, ThisError, TracingError)]
#[span]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] crate::framework::config::Error),
}

#[derive(Debug, ThisError, TracingError)]
#[error("the card data for {card} has no {stat}, the game can't continue")]
#[event(level = ERROR)]
pub struct MissingStatError {
    card: String,
    stat: String,
}

impl MissingStatError {
    pub fn new(card: impl Into<String>, stat: impl Into<String>) -> Self {
        Self {
            card: card.into(),
            stat: stat.into(),
        }
    }
}

#[derive(Debug, ThisError, TracingError)]
#[error("not enough {pool} emotes to play (need {wanted}, found {found})")]
#[event(level = ERROR)]
pub struct NotEnoughEmotesError {
    pool: String,
    wanted: usize,
    found: usize,
}

impl NotEnoughEmotesError {
    pub fn new(pool: impl Into<String>, wanted: usize, found: usize) -> Self {
        Self {
            pool: pool.into(),
            wanted,
            found,
        }
    }
}

/// Input that looked like it was meant for a command but couldn't be read.
#[derive(Debug, ThisError, TracingError)]
#[error("{reply}")]
#[event(level = DEBUG)]
pub struct ParseInputError {
    reply: String,
}

impl ParseInputError {
    pub fn new(input: impl AsRef<str>, reply: impl Into<String>) -> Self {
        debug!(input = input.as_ref(), "couldn't read command input");

        Self {
            reply: reply.into(),
        }
    }
}
