use std::{sync::Arc, time::Duration};

use thisslime::TracingError;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, trace};

use super::{
    event_handler::Event,
    timer::{TimerHandle, TimerToken},
};
use crate::{
    chat::{ChatSink, ModerationSink},
    emotes::EmotePools,
    errors::CommandError,
    games::GameGuard,
    permission::{Permission, PermissionOracle},
    points::PointLedger,
};

/// The external collaborators every command talks to.
#[derive(Clone)]
pub struct Services {
    pub chat: Arc<dyn ChatSink>,
    pub moderation: Arc<dyn ModerationSink>,
    pub points: Arc<dyn PointLedger>,
    pub permissions: Arc<dyn PermissionOracle>,
    pub emotes: Arc<dyn EmotePools>,
}

/// Bot-wide mutable state. Only the dispatcher owns it, so every change
/// happens on the dispatch queue.
#[derive(Debug, Default)]
pub struct BotState {
    pub(crate) guard: GameGuard,
    pub(crate) paused: bool,
    next_timer: u64,
}

/// What a command sees while it handles one message or timer tick.
pub struct Context<'a> {
    services: &'a Services,
    state: &'a mut BotState,
    events: &'a UnboundedSender<Event>,
    slot: usize,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        services: &'a Services,
        state: &'a mut BotState,
        events: &'a UnboundedSender<Event>,
        slot: usize,
    ) -> Self {
        Self {
            services,
            state,
            events,
            slot,
        }
    }

    pub fn say(&self, text: impl AsRef<str>) {
        let text = text.as_ref();
        trace!(text, "writing to chat");
        self.services.chat.write(text)
    }

    pub fn timeout(&self, user: &str, seconds: u64) {
        info!(user, seconds, "timing out user");
        self.services.moderation.timeout(user, seconds)
    }

    pub fn permission(&self, user: &str) -> Permission {
        self.services.permissions.level_of(user)
    }

    pub fn points(&self) -> &dyn PointLedger {
        self.services.points.as_ref()
    }

    pub fn emotes(&self) -> &dyn EmotePools {
        self.services.emotes.as_ref()
    }

    pub fn guard(&mut self) -> &mut GameGuard {
        &mut self.state.guard
    }

    pub fn game_running(&self) -> bool {
        self.state.guard.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        debug!(paused, "pause state changed");
        self.state.paused = paused;
    }

    /// Posts a timer event for the current command onto the dispatch queue
    /// once `after` has elapsed.
    pub fn schedule(&mut self, after: Duration) -> TimerHandle {
        self.state.next_timer += 1;
        let token = TimerToken(self.state.next_timer);

        let event = Event::Timer {
            slot: self.slot,
            token,
        };
        let events = self.events.clone();

        let abort = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let task = runtime.spawn(async move {
                    tokio::time::sleep(after).await;

                    if events.send(event).is_err() {
                        debug!("dispatch queue closed, dropping timer");
                    }
                });

                Some(task.abort_handle())
            }
            Err(_) => {
                error!(?token, "no async runtime, timer will never fire");
                None
            }
        };

        trace!(?token, ?after, slot = self.slot, "timer scheduled");

        TimerHandle::new(token, abort)
    }

    pub(crate) fn report(&self, err: CommandError) {
        err.trace();
        self.say(err.to_string());
    }
}
