use crate::{
    error::Result,
    models::{Notification, NotificationFilter, UserRef},
    services::repository::NotificationRepository,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// 获取用户的通知，最新的在前
    pub async fn notifications_for(&self, recipient: &UserRef) -> Result<Vec<Notification>> {
        debug!("Getting notifications for user: {}", recipient.id);

        let mut notifications = self
            .notifications
            .find_many(&NotificationFilter::recipient(&recipient.id))
            .await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(notifications)
    }

    pub async fn unread_count(&self, recipient: &UserRef) -> Result<usize> {
        let unread = self
            .notifications
            .find_many(&NotificationFilter::recipient(&recipient.id).unread())
            .await?;
        Ok(unread.len())
    }
}
