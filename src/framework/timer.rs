use tokio::task::AbortHandle;

/// Identifies one scheduled callback. Tokens are never reused within a
/// dispatcher, so a tick that arrives late can always be told apart from
/// the one currently pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub(crate) u64);

/// A scheduled callback that will post [`crate::Event::Timer`] to the
/// dispatch queue unless cancelled first.
#[derive(Debug)]
pub struct TimerHandle {
    token: TimerToken,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    pub(crate) fn new(token: TimerToken, abort: Option<AbortHandle>) -> Self {
        Self { token, abort }
    }

    pub fn token(&self) -> TimerToken {
        self.token
    }

    /// Safe to call any number of times, and after the timer has fired.
    pub fn cancel(&mut self) {
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel()
    }
}
