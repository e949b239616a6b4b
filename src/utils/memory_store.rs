use crate::{
    error::{AppError, Result},
    models::{Notification, NotificationFilter, Subscription, SubscriptionFilter},
    services::repository::{NotificationRepository, SubscriptionRepository},
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;

/// 进程内存储实现，每次写入只加一次锁，批量写入整批成功或整批失败
#[derive(Debug, Default)]
pub struct MemoryStore {
    subscriptions: RwLock<Vec<Subscription>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.read().len()
    }
}

fn duplicate_pair(subscription: &Subscription) -> AppError {
    AppError::UniqueViolation(format!(
        "subscription for user {} on answer {} already exists",
        subscription.user_id, subscription.answer_id
    ))
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn create(&self, subscription: Subscription) -> Result<Subscription> {
        let mut rows = self.subscriptions.write();
        if rows
            .iter()
            .any(|s| s.user_id == subscription.user_id && s.answer_id == subscription.answer_id)
        {
            return Err(duplicate_pair(&subscription));
        }
        rows.push(subscription.clone());
        Ok(subscription)
    }

    async fn find_one(&self, filter: &SubscriptionFilter) -> Result<Option<Subscription>> {
        Ok(self.subscriptions.read().iter().find(|s| filter.matches(s)).cloned())
    }

    async fn find_many(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .read()
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn delete_all(&self, filter: &SubscriptionFilter) -> Result<usize> {
        let mut rows = self.subscriptions.write();
        let before = rows.len();
        rows.retain(|s| !filter.matches(s));
        Ok(before - rows.len())
    }

    async fn insert_many(&self, subscriptions: Vec<Subscription>) -> Result<usize> {
        let mut rows = self.subscriptions.write();
        let mut seen: HashSet<(String, String)> = rows
            .iter()
            .map(|s| (s.user_id.clone(), s.answer_id.clone()))
            .collect();

        // 先整体校验，再一次性写入
        for subscription in &subscriptions {
            if !seen.insert((subscription.user_id.clone(), subscription.answer_id.clone())) {
                return Err(duplicate_pair(subscription));
            }
        }

        let count = subscriptions.len();
        rows.extend(subscriptions);
        Ok(count)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, notification: Notification) -> Result<Notification> {
        self.notifications.write().push(notification.clone());
        Ok(notification)
    }

    async fn find_one(&self, filter: &NotificationFilter) -> Result<Option<Notification>> {
        Ok(self.notifications.read().iter().find(|n| filter.matches(n)).cloned())
    }

    async fn find_many(&self, filter: &NotificationFilter) -> Result<Vec<Notification>> {
        Ok(self
            .notifications
            .read()
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect())
    }

    async fn delete_all(&self, filter: &NotificationFilter) -> Result<usize> {
        let mut rows = self.notifications.write();
        let before = rows.len();
        rows.retain(|n| !filter.matches(n));
        Ok(before - rows.len())
    }

    async fn insert_many(&self, notifications: Vec<Notification>) -> Result<usize> {
        let count = notifications.len();
        self.notifications.write().extend(notifications);
        Ok(count)
    }
}
