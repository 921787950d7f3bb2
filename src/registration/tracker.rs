use std::collections::HashMap;

use log::debug;
use serenity::model::id::UserId;
use tokio::sync::RwLock;

use super::RoleChoice;

/// Role choices recorded before the registrant has joined the target guild.
///
/// A user may register from a DM or from another server, so the chosen role
/// cannot always be granted right away. The choice is remembered here and
/// consumed exactly once when the user's join event for the target guild is
/// observed. At most one choice is kept per user; a later registration
/// overwrites an earlier one.
///
/// Entries for users who never join are kept forever. The original system
/// never expired them either, and the population (prospective members of a
/// single community) is small enough that this is acceptable.
pub struct PendingRegistrations {
    pending: RwLock<HashMap<UserId, RoleChoice>>,
}

impl PendingRegistrations {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Stores the pending role for `user_id`, overwriting any earlier choice.
    pub async fn record(&self, user_id: UserId, choice: RoleChoice) {
        let mut pending = self.pending.write().await;
        pending.insert(user_id, choice);
        debug!("Recorded pending {:?} registration for {}", choice, user_id);
    }

    /// Looks up and removes the pending role for `user_id` in one step.
    ///
    /// Returns `None` when nothing is pending. Removal happens before the
    /// caller attempts the role grant, so a second join by the same user
    /// never re-triggers assignment.
    pub async fn resolve(&self, user_id: UserId) -> Option<RoleChoice> {
        let mut pending = self.pending.write().await;
        pending.remove(&user_id)
    }
}

impl Default for PendingRegistrations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_consumes_the_entry() {
        let registrations = PendingRegistrations::new();
        let user = UserId::new(101);

        registrations.record(user, RoleChoice::Student).await;
        registrations.record(user, RoleChoice::Student).await;

        assert_eq!(registrations.resolve(user).await, Some(RoleChoice::Student));
        assert_eq!(registrations.resolve(user).await, None);
    }

    #[tokio::test]
    async fn last_choice_wins() {
        let registrations = PendingRegistrations::new();
        let user = UserId::new(102);

        registrations.record(user, RoleChoice::Student).await;
        registrations.record(user, RoleChoice::Professor).await;

        assert_eq!(
            registrations.resolve(user).await,
            Some(RoleChoice::Professor)
        );
    }

    #[tokio::test]
    async fn no_cross_user_leakage() {
        let registrations = PendingRegistrations::new();
        let alice = UserId::new(103);
        let bob = UserId::new(104);

        registrations.record(alice, RoleChoice::Student).await;

        assert_eq!(registrations.resolve(bob).await, None);
        assert_eq!(
            registrations.resolve(alice).await,
            Some(RoleChoice::Student)
        );
    }

    #[tokio::test]
    async fn resolve_without_record_is_none() {
        let registrations = PendingRegistrations::new();
        assert_eq!(registrations.resolve(UserId::new(105)).await, None);
    }
}
