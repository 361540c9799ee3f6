use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::debug;

/// Per-user point balances. The bot only reads balances and requests deltas.
pub trait PointLedger: Send + Sync {
    fn balance_of(&self, user: &str) -> i64;
    fn adjust(&self, user: &str, delta: i64);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLedger(Arc<Mutex<HashMap<String, i64>>>);

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, user: &str, balance: i64) -> Self {
        self.adjust(user, balance);
        self
    }
}

impl PointLedger for MemoryLedger {
    fn balance_of(&self, user: &str) -> i64 {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(&user.to_lowercase()).copied().unwrap_or_default()
    }

    fn adjust(&self, user: &str, delta: i64) {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        let balance = guard.entry(user.to_lowercase()).or_default();
        *balance += delta;

        debug!(user, delta, balance = *balance, "points adjusted");
    }
}
