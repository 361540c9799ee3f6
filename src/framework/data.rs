use std::{
    io::ErrorKind,
    path::PathBuf,
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{config::Config, context::Services};
use crate::{
    chat::ChannelSink,
    commands::{
        quotes::Quotes,
        replies::{ReplyMap, Replies},
    },
    corpus::{Card, Cards},
    emotes::Emotes,
    permission::PermissionTable,
    points::MemoryLedger,
};

pub mod error;
pub use error::Error as DataError;

pub type Result<T, E = DataError> = std::result::Result<T, E>;

/// Somewhere an edited collection gets written back to.
pub trait Store<T: ?Sized>: Send + Sync {
    fn save(&self, value: &T) -> Result<()>;
}

/// A pretty-printed JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the file, or starts from `T::default()` if it doesn't exist yet.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self) -> Result<T> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                debug!(path = %self.path.display(), "loaded data file");
                Ok(serde_json::from_str(&text)?)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "data file missing, starting empty");
                Ok(T::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl<T: Serialize + ?Sized> Store<T> for JsonFile {
    fn save(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        std::fs::write(&self.path, text)?;

        debug!(path = %self.path.display(), "saved data file");
        Ok(())
    }
}

/// Everything loaded at startup that commands get built from.
#[derive(Debug, Clone)]
pub struct BotData {
    pub config: Config,
    pub permissions: Arc<PermissionTable>,
    pub points: MemoryLedger,
    pub replies: Replies,
    pub quotes: Quotes,
    pub cards: Arc<Cards>,
    pub emotes: Arc<Emotes>,
    reply_file: JsonFile,
    quote_file: JsonFile,
}

impl BotData {
    pub fn load(config: Config) -> Result<Self> {
        let paths = &config.data;

        let reply_file = JsonFile::new(&paths.replies);
        let quote_file = JsonFile::new(&paths.quotes);

        let replies: ReplyMap = reply_file.load_or_default()?;
        let quotes: Vec<String> = quote_file.load_or_default()?;
        let cards: Vec<Card> = JsonFile::new(&paths.cards).load_or_default()?;
        let emotes: Emotes = JsonFile::new(&paths.emotes).load_or_default()?;

        info!(
            replies = replies.len(),
            quotes = quotes.len(),
            cards = cards.len(),
            emotes = emotes.len(),
            "bot data loaded"
        );

        Ok(Self {
            permissions: Arc::new(config.bot.permissions()),
            points: MemoryLedger::new(),
            replies: Replies::new(replies),
            quotes: Quotes::new(quotes),
            cards: Arc::new(Cards::new(cards)),
            emotes: Arc::new(emotes),
            reply_file,
            quote_file,
            config,
        })
    }

    pub fn reply_store(&self) -> Arc<dyn Store<ReplyMap>> {
        Arc::new(self.reply_file.clone())
    }

    pub fn quote_store(&self) -> Arc<dyn Store<Vec<String>>> {
        Arc::new(self.quote_file.clone())
    }

    pub fn services(&self, sink: ChannelSink) -> Services {
        let sink = Arc::new(sink);

        Services {
            chat: sink.clone(),
            moderation: sink,
            points: Arc::new(self.points.clone()),
            permissions: self.permissions.clone(),
            emotes: self.emotes.clone(),
        }
    }
}
