use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::info;

use super::Command;
use crate::{
    errors::ParseInputError,
    framework::{context::Context, data::Store},
    permission::Permission,
    utils::{strip_prefix_ignore_case, CommandResult},
};

#[derive(Debug, Clone)]
pub struct Quotes(Arc<ArcSwap<Vec<String>>>);

impl Quotes {
    pub fn new(quotes: Vec<String>) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(quotes)))
    }

    pub fn snapshot(&self) -> Arc<Vec<String>> {
        self.0.load_full()
    }

    fn replace(&self, quotes: Vec<String>) {
        self.0.store(Arc::new(quotes))
    }
}

const QUOTE: &str = "!quote";

/// `!quote` for a random quote, `!quote <n>` for a specific one.
pub struct OutputQuote {
    quotes: Quotes,
    rng: StdRng,
}

impl OutputQuote {
    pub fn new(quotes: Quotes) -> Self {
        Self {
            quotes,
            rng: StdRng::from_entropy(),
        }
    }

    fn numbered(&self, ctx: &mut Context<'_>, quotes: &[String], arg: &str) -> CommandResult {
        let n: usize = arg
            .trim()
            .parse()
            .map_err(|_| ParseInputError::new(arg, "Wrong input, try !quote <number>"))?;

        match n.checked_sub(1).and_then(|index| quotes.get(index)) {
            Some(quote) => ctx.say(quote),
            None => ctx.say(format!(
                "Quote not found. Try: !quote [1 - {}]",
                quotes.len()
            )),
        }

        Ok(())
    }
}

impl Command for OutputQuote {
    fn name(&self) -> &'static str {
        "quote"
    }

    fn matches(&mut self, _ctx: &mut Context<'_>, _user: &str, msg: &str) -> bool {
        let msg = msg.trim();
        msg.eq_ignore_ascii_case(QUOTE) || strip_prefix_ignore_case(msg, "!quote ").is_some()
    }

    fn run(&mut self, ctx: &mut Context<'_>, _user: &str, msg: &str) -> CommandResult {
        let quotes = self.quotes.snapshot();

        if quotes.is_empty() {
            ctx.say("There are no quotes yet.");
            return Ok(());
        }

        match strip_prefix_ignore_case(msg.trim(), "!quote ") {
            Some(arg) => self.numbered(ctx, &quotes, arg),
            None => {
                if let Some(quote) = quotes.choose(&mut self.rng) {
                    ctx.say(quote);
                }
                Ok(())
            }
        }
    }
}

const ADD: &str = "!addquote ";
const DELETE: &str = "!delquote ";

/// `!addquote <text>` and `!delquote <text>` for moderators.
pub struct EditQuotes {
    quotes: Quotes,
    store: Arc<dyn Store<Vec<String>>>,
}

impl EditQuotes {
    pub fn new(quotes: Quotes, store: Arc<dyn Store<Vec<String>>>) -> Self {
        Self { quotes, store }
    }

    fn commit(&self, quotes: Vec<String>) -> CommandResult {
        self.store.save(&quotes)?;
        self.quotes.replace(quotes);
        Ok(())
    }

    fn add(&self, ctx: &mut Context<'_>, quote: &str) -> CommandResult {
        let mut quotes = (*self.quotes.snapshot()).clone();

        if quotes.iter().any(|known| known == quote) {
            ctx.say("Quote is already in the list. :thinking:");
            return Ok(());
        }

        quotes.push(quote.to_owned());
        self.commit(quotes)?;

        info!(quote, "quote added");
        ctx.say("Quote has been added. FeelsGoodMan");
        Ok(())
    }

    fn delete(&self, ctx: &mut Context<'_>, quote: &str) -> CommandResult {
        let mut quotes = (*self.quotes.snapshot()).clone();

        let Some(index) = quotes.iter().position(|known| known == quote) else {
            ctx.say("Quote not found. :thinking:");
            return Ok(());
        };

        quotes.remove(index);
        self.commit(quotes)?;

        info!(quote, "quote removed");
        ctx.say("Quote has been removed. FeelsBadMan");
        Ok(())
    }
}

impl Command for EditQuotes {
    fn name(&self) -> &'static str {
        "edit_quotes"
    }

    fn permission(&self) -> Permission {
        Permission::Moderator
    }

    fn matches(&mut self, _ctx: &mut Context<'_>, _user: &str, msg: &str) -> bool {
        let msg = msg.trim();
        strip_prefix_ignore_case(msg, ADD).is_some() || strip_prefix_ignore_case(msg, DELETE).is_some()
    }

    fn run(&mut self, ctx: &mut Context<'_>, _user: &str, msg: &str) -> CommandResult {
        let msg = msg.trim();

        if let Some(quote) = strip_prefix_ignore_case(msg, ADD) {
            self.add(ctx, quote.trim())
        } else if let Some(quote) = strip_prefix_ignore_case(msg, DELETE) {
            self.delete(ctx, quote.trim())
        } else {
            Ok(())
        }
    }
}
