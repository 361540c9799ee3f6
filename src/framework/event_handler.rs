use std::ops::ControlFlow;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, instrument, trace};

use super::{
    context::{BotState, Context, Services},
    timer::TimerToken,
};
use crate::{commands::Command, permission::Permission};

/// Everything the dispatcher reacts to. Chat from the transport and timer
/// callbacks share one queue, so they are handled strictly one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Message { user: String, text: String },
    Timer { slot: usize, token: TimerToken },
    Shutdown,
}

impl Event {
    pub fn message(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message {
            user: user.into(),
            text: text.into(),
        }
    }
}

/// Owns the registered commands and all bot state, and hands each event
/// to at most one command.
pub struct Dispatcher {
    commands: Vec<Box<dyn Command>>,
    services: Services,
    state: BotState,
    events: UnboundedSender<Event>,
}

impl Dispatcher {
    pub fn new(
        services: Services,
        commands: Vec<Box<dyn Command>>,
    ) -> (Self, UnboundedReceiver<Event>) {
        let (events, rx) = unbounded_channel();

        let dispatcher = Self {
            commands,
            services,
            state: BotState::default(),
            events,
        };

        (dispatcher, rx)
    }

    /// Where the transport posts incoming chat.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.events.clone()
    }

    pub fn register(&mut self, command: impl Command + 'static) {
        self.commands.push(Box::new(command));
    }

    pub fn game_running(&self) -> bool {
        self.state.guard.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Runs the first eligible command that matches `msg`, returning its name.
    #[instrument(skip_all, fields(user = user))]
    pub fn dispatch(&mut self, user: &str, msg: &str) -> Option<&'static str> {
        let level = self.services.permissions.level_of(user);
        let paused = self.state.paused;

        for (slot, command) in self.commands.iter_mut().enumerate() {
            let required = command.permission();

            if level < required || (paused && required < Permission::Admin) {
                continue;
            }

            let mut ctx = Context::new(&self.services, &mut self.state, &self.events, slot);

            if !command.matches(&mut ctx, user, msg) {
                continue;
            }

            let name = command.name();
            info!(command = name, "@{user}: {msg}");

            if let Err(err) = command.run(&mut ctx, user, msg) {
                ctx.report(err);
            }

            return Some(name);
        }

        trace!("no command matched");
        None
    }

    pub fn handle(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::Message { user, text } => {
                self.dispatch(&user, &text);
            }
            Event::Timer { slot, token } => self.fire_timer(slot, token),
            Event::Shutdown => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    fn fire_timer(&mut self, slot: usize, token: TimerToken) {
        let Some(command) = self.commands.get_mut(slot) else {
            debug!(slot, ?token, "timer fired for a command that no longer exists");
            return;
        };

        trace!(command = command.name(), ?token, "timer fired");

        let mut ctx = Context::new(&self.services, &mut self.state, &self.events, slot);

        if let Err(err) = command.on_timer(&mut ctx, token) {
            ctx.report(err);
        }
    }

    /// Closes every current command, then swaps in `commands`.
    pub fn reload(&mut self, commands: Vec<Box<dyn Command>>) {
        self.close_all();
        self.commands = commands;
        info!(commands = self.commands.len(), "commands reloaded");
    }

    pub fn shutdown(&mut self) {
        self.close_all();
        info!("dispatcher shut down");
    }

    fn close_all(&mut self) {
        for (slot, command) in self.commands.iter_mut().enumerate() {
            let mut ctx = Context::new(&self.services, &mut self.state, &self.events, slot);
            command.close(&mut ctx);
        }

        if self.state.guard.is_running() {
            error!("game guard still set after closing every command, clearing it");
            self.state.guard.release();
        }
    }

    /// Handles events until [`Event::Shutdown`], then closes every command.
    pub async fn run(mut self, mut events: UnboundedReceiver<Event>) {
        info!(commands = self.commands.len(), "dispatcher started");

        while let Some(event) = events.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }

        self.shutdown();
    }

    #[cfg(test)]
    pub(crate) fn with_context<R>(&mut self, f: impl FnOnce(&mut Context<'_>) -> R) -> R {
        let mut ctx = Context::new(&self.services, &mut self.state, &self.events, 0);
        f(&mut ctx)
    }
}
