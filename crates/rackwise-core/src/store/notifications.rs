// ── Activity feed ──

use super::inventory::Inventory;
use crate::error::CoreError;
use crate::model::{EntityId, Notification, NotificationKind};

impl Inventory {
    /// Prepend a notification to the feed.
    pub(crate) fn notify(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.notifications
            .insert(0, Notification::new(kind, title, message));
    }

    /// Drop the oldest entries beyond `cap`.
    pub(crate) fn trim_notifications(&mut self, cap: usize) {
        self.notifications.truncate(cap);
    }

    pub fn mark_notification_read(&mut self, id: &EntityId) -> Result<(), CoreError> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| CoreError::not_found("notification", id))?;
        notification.read = true;
        Ok(())
    }

    /// Returns how many entries changed state.
    pub fn mark_all_notifications_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    pub fn remove_notification(&mut self, id: &EntityId) -> Result<Notification, CoreError> {
        let index = self
            .notifications
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| CoreError::not_found("notification", id))?;
        Ok(self.notifications.remove(index))
    }

    /// Returns the number of entries removed.
    pub fn clear_notifications(&mut self) -> usize {
        let count = self.notifications.len();
        self.notifications.clear();
        count
    }
}
