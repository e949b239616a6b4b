//! Narrow persistence seam consumed by the services.
//!
//! Each backend must enforce uniqueness of (user_id, answer_id) for
//! subscriptions itself, and must apply `insert_many`/`delete_all` as a single
//! atomic operation.

use crate::{
    error::Result,
    models::{Notification, NotificationFilter, Subscription, SubscriptionFilter},
};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: Subscription) -> Result<Subscription>;

    async fn find_one(&self, filter: &SubscriptionFilter) -> Result<Option<Subscription>>;

    async fn find_many(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>>;

    /// Returns the number of removed rows.
    async fn delete_all(&self, filter: &SubscriptionFilter) -> Result<usize>;

    async fn insert_many(&self, subscriptions: Vec<Subscription>) -> Result<usize>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification>;

    async fn find_one(&self, filter: &NotificationFilter) -> Result<Option<Notification>>;

    async fn find_many(&self, filter: &NotificationFilter) -> Result<Vec<Notification>>;

    /// Returns the number of removed rows.
    async fn delete_all(&self, filter: &NotificationFilter) -> Result<usize>;

    async fn insert_many(&self, notifications: Vec<Notification>) -> Result<usize>;
}
