use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    chat::{ChatSink, ModerationSink, Outbound},
    commands::Command,
    emotes::Emotes,
    framework::{
        context::{Context, Services},
        event_handler::{Dispatcher, Event},
    },
    permission::{Permission, PermissionOracle, PermissionTable},
    points::{MemoryLedger, PointLedger},
};

/// Keeps everything the bot would have sent.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink(Mutex<Vec<Outbound>>);

impl RecordingSink {
    fn sent(&self) -> Vec<Outbound> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn said(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|outbound| match outbound {
                Outbound::Say(text) => Some(text),
                Outbound::Timeout { .. } => None,
            })
            .collect()
    }

    pub fn timeouts(&self) -> Vec<(String, u64)> {
        self.sent()
            .into_iter()
            .filter_map(|outbound| match outbound {
                Outbound::Timeout { user, seconds } => Some((user, seconds)),
                Outbound::Say(_) => None,
            })
            .collect()
    }

    fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear()
    }

    fn push(&self, outbound: Outbound) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outbound)
    }
}

impl ChatSink for RecordingSink {
    fn write(&self, text: &str) {
        self.push(Outbound::Say(text.to_owned()))
    }
}

impl ModerationSink for RecordingSink {
    fn timeout(&self, user: &str, seconds: u64) {
        self.push(Outbound::Timeout {
            user: user.to_owned(),
            seconds,
        })
    }
}

/// A permission table tests can still change after the dispatcher was built.
#[derive(Debug, Default)]
struct SharedPermissions(Mutex<PermissionTable>);

impl PermissionOracle for SharedPermissions {
    fn level_of(&self, user: &str) -> Permission {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .level_of(user)
    }
}

/// A dispatcher wired to in-memory collaborators.
pub(crate) struct Harness {
    pub dispatcher: Dispatcher,
    pub points: MemoryLedger,
    events: UnboundedReceiver<Event>,
    sink: Arc<RecordingSink>,
    permissions: Arc<SharedPermissions>,
}

impl Harness {
    pub fn new(emotes: Emotes) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let permissions = Arc::new(SharedPermissions::default());
        let points = MemoryLedger::new();

        let services = Services {
            chat: sink.clone(),
            moderation: sink.clone(),
            points: Arc::new(points.clone()),
            permissions: permissions.clone(),
            emotes: Arc::new(emotes),
        };

        let (dispatcher, events) = Dispatcher::new(services, Vec::new());

        Self {
            dispatcher,
            points,
            events,
            sink,
            permissions,
        }
    }

    pub fn empty() -> Self {
        Self::new(Emotes::default())
    }

    pub fn with_points(self, user: &str, balance: i64) -> Self {
        self.points.adjust(user, balance);
        self
    }

    pub fn with_permission(self, user: &str, level: Permission) -> Self {
        self.permissions
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(user, level);
        self
    }

    pub fn with_command(mut self, command: impl Command + 'static) -> Self {
        self.dispatcher.register(command);
        self
    }

    pub fn say(&mut self, user: &str, msg: &str) -> Option<&'static str> {
        self.dispatcher.dispatch(user, msg)
    }

    pub fn said(&self) -> Vec<String> {
        self.sink.said()
    }

    pub fn timeouts(&self) -> Vec<(String, u64)> {
        self.sink.timeouts()
    }

    pub fn clear(&self) {
        self.sink.clear()
    }

    pub fn game_running(&self) -> bool {
        self.dispatcher.game_running()
    }

    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut Context<'_>) -> R) -> R {
        self.dispatcher.with_context(f)
    }

    /// The next queued event, or `None` if nothing arrives within a minute.
    pub async fn next_event(&mut self) -> Option<Event> {
        tokio::time::timeout(Duration::from_secs(60), self.events.recv())
            .await
            .ok()
            .flatten()
    }

    /// Waits for the next event and lets the dispatcher handle it.
    pub async fn tick(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                let _ = self.dispatcher.handle(event);
                true
            }
            None => false,
        }
    }

    pub fn into_parts(self) -> (Dispatcher, UnboundedReceiver<Event>, Arc<RecordingSink>) {
        (self.dispatcher, self.events, self.sink)
    }
}
