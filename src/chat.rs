use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::warn;

/// Fire-and-forget outbound chat.
pub trait ChatSink: Send + Sync {
    fn write(&self, text: &str);
}

pub trait ModerationSink: Send + Sync {
    fn timeout(&self, user: &str, seconds: u64);
}

/// Something the bot wants the transport to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Say(String),
    Timeout { user: String, seconds: u64 },
}

/// Hands outbound actions to whatever transport drains the receiver.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<Outbound>,
}

impl ChannelSink {
    pub fn channel() -> (Self, UnboundedReceiver<Outbound>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, outbound: Outbound) {
        if let Err(err) = self.tx.send(outbound) {
            warn!(dropped = ?err.0, "outbound channel closed");
        }
    }
}

impl ChatSink for ChannelSink {
    fn write(&self, text: &str) {
        self.send(Outbound::Say(text.to_owned()))
    }
}

impl ModerationSink for ChannelSink {
    fn timeout(&self, user: &str, seconds: u64) {
        self.send(Outbound::Timeout {
            user: user.to_owned(),
            seconds,
        })
    }
}

/// Hands every queued action to `deliver`, returning once the last sink is
/// gone and the queue is empty.
pub async fn forward(
    mut outbound: UnboundedReceiver<Outbound>,
    mut deliver: impl FnMut(Outbound),
) {
    while let Some(action) = outbound.recv().await {
        deliver(action);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ChannelSink, ChatSink, ModerationSink, Outbound};

    #[test]
    fn forwards_in_order() {
        let (sink, mut rx) = ChannelSink::channel();
        sink.write("hello");
        sink.timeout("pleb", 60);

        assert_eq!(rx.try_recv().ok(), Some(Outbound::Say("hello".to_owned())));
        assert_eq!(
            rx.try_recv().ok(),
            Some(Outbound::Timeout {
                user: "pleb".to_owned(),
                seconds: 60
            })
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn closed_channel_is_not_fatal() {
        let (sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.write("into the void");

        assert!(logs_contain("outbound channel closed"));
    }
}
