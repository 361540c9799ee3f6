use std::collections::HashMap;

use serde::Deserialize;

/// Chat permission levels, lowest first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    User,
    Subscriber,
    Moderator,
    Admin,
}

impl Permission {
    /// Moderators and admins skip the game stake and may stop games.
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

pub trait PermissionOracle: Send + Sync {
    fn level_of(&self, user: &str) -> Permission;
}

/// Fixed name-to-level table, usually built from the `[bot]` config section.
/// Unknown users are [`Permission::User`].
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    levels: HashMap<String, Permission>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user: impl AsRef<str>, level: Permission) -> Self {
        self.set(user, level);
        self
    }

    pub fn set(&mut self, user: impl AsRef<str>, level: Permission) {
        let user = user.as_ref().to_lowercase();

        // a name listed twice keeps its highest level
        let entry = self.levels.entry(user).or_default();
        *entry = (*entry).max(level);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl PermissionOracle for PermissionTable {
    fn level_of(&self, user: &str) -> Permission {
        self.levels
            .get(&user.to_lowercase())
            .copied()
            .unwrap_or_default()
    }
}
