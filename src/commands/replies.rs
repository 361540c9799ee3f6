use std::{collections::BTreeMap, sync::Arc};

use arc_swap::ArcSwap;
use tracing::info;

use super::Command;
use crate::{
    errors::ParseInputError,
    framework::{context::Context, data::Store},
    permission::Permission,
    utils::{strip_prefix_ignore_case, CommandResult},
};

/// Lowercase trigger to canned response.
pub type ReplyMap = BTreeMap<String, String>;

/// The reply table, shared between the command that answers and the one
/// that edits it.
#[derive(Debug, Clone)]
pub struct Replies(Arc<ArcSwap<ReplyMap>>);

impl Replies {
    pub fn new(replies: ReplyMap) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(replies)))
    }

    pub fn get(&self, trigger: &str) -> Option<String> {
        self.0.load().get(trigger).cloned()
    }

    pub fn snapshot(&self) -> Arc<ReplyMap> {
        self.0.load_full()
    }

    fn replace(&self, replies: ReplyMap) {
        self.0.store(Arc::new(replies))
    }
}

fn trigger(msg: &str) -> String {
    msg.trim().to_lowercase()
}

/// Answers any message that is exactly a known trigger.
#[derive(Debug, Clone)]
pub struct SimpleReply {
    replies: Replies,
}

impl SimpleReply {
    pub fn new(replies: Replies) -> Self {
        Self { replies }
    }
}

impl Command for SimpleReply {
    fn name(&self) -> &'static str {
        "reply"
    }

    fn matches(&mut self, _ctx: &mut Context<'_>, _user: &str, msg: &str) -> bool {
        self.replies.snapshot().contains_key(&trigger(msg))
    }

    fn run(&mut self, ctx: &mut Context<'_>, _user: &str, msg: &str) -> CommandResult {
        if let Some(reply) = self.replies.get(&trigger(msg)) {
            ctx.say(reply);
        }

        Ok(())
    }
}

const ADD: &str = "!addcommand ";
const DELETE: &str = "!delcommand ";
const LIST: &str = "!replylist";

/// `!addcommand`, `!delcommand` and `!replylist` for moderators.
pub struct EditReplies {
    replies: Replies,
    store: Arc<dyn Store<ReplyMap>>,
}

impl EditReplies {
    pub fn new(replies: Replies, store: Arc<dyn Store<ReplyMap>>) -> Self {
        Self { replies, store }
    }

    /// Saves first, so a failed write leaves the table as it was.
    fn commit(&self, replies: ReplyMap) -> CommandResult {
        self.store.save(&replies)?;
        self.replies.replace(replies);
        Ok(())
    }

    fn add(&self, ctx: &mut Context<'_>, args: &str) -> CommandResult {
        let (trigger, reply) = args
            .trim()
            .split_once(' ')
            .map(|(trigger, reply)| (trigger.to_lowercase(), reply.trim()))
            .filter(|(_, reply)| !reply.is_empty())
            .ok_or_else(|| {
                ParseInputError::new(args, "Wrong input, try !addcommand <command> <reply>")
            })?;

        let mut replies = (*self.replies.snapshot()).clone();

        if replies.contains_key(&trigger) {
            ctx.say("Command already in the list! DansGame");
            return Ok(());
        }

        replies.insert(trigger.clone(), reply.to_owned());
        self.commit(replies)?;

        info!(trigger, "reply added");
        ctx.say(format!("Command {trigger} added! FeelsGoodMan"));
        Ok(())
    }

    fn delete(&self, ctx: &mut Context<'_>, args: &str) -> CommandResult {
        let trigger = trigger(args);
        let mut replies = (*self.replies.snapshot()).clone();

        if replies.remove(&trigger).is_none() {
            ctx.say(format!("Command {trigger} does not exist. monkaS"));
            return Ok(());
        }

        self.commit(replies)?;

        info!(trigger, "reply deleted");
        ctx.say(format!("Command {trigger} deleted. FeelsBadMan"));
        Ok(())
    }

    fn list(&self, ctx: &mut Context<'_>) {
        let replies = self.replies.snapshot();
        let triggers: Vec<&str> = replies.keys().map(String::as_str).collect();

        ctx.say(format!("Replylist Commands: {}", triggers.join(" ")));
    }
}

impl Command for EditReplies {
    fn name(&self) -> &'static str {
        "edit_replies"
    }

    fn permission(&self) -> Permission {
        Permission::Moderator
    }

    fn matches(&mut self, _ctx: &mut Context<'_>, _user: &str, msg: &str) -> bool {
        let msg = msg.trim();

        strip_prefix_ignore_case(msg, ADD).is_some()
            || strip_prefix_ignore_case(msg, DELETE).is_some()
            || msg.eq_ignore_ascii_case(LIST)
    }

    fn run(&mut self, ctx: &mut Context<'_>, _user: &str, msg: &str) -> CommandResult {
        let msg = msg.trim();

        if let Some(args) = strip_prefix_ignore_case(msg, ADD) {
            self.add(ctx, args)
        } else if let Some(args) = strip_prefix_ignore_case(msg, DELETE) {
            self.delete(ctx, args)
        } else {
            self.list(ctx);
            Ok(())
        }
    }
}
