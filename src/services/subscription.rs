use crate::{
    error::Result,
    models::{
        AnswerRef, EventSource, Notification, NotificationFilter, NotificationKind,
        SubscribeOutcome, Subscription, SubscriptionFilter, UserRef,
    },
    services::repository::{NotificationRepository, SubscriptionRepository},
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// 回答订阅服务：维护订阅者集合，并按评论事件批量创建或撤回通知
#[derive(Clone)]
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl SubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            subscriptions,
            notifications,
        }
    }

    /// Subscribes `recipient` to `target`. Calling it again for the same pair
    /// returns the existing row; a concurrent duplicate surfaces as
    /// [`AppError::UniqueViolation`](crate::error::AppError::UniqueViolation).
    pub async fn subscribe(&self, recipient: &UserRef, target: &AnswerRef) -> Result<SubscribeOutcome> {
        debug!("User {} subscribing to answer {}", recipient.id, target.id);

        recipient.validate()?;
        target.validate()?;

        let filter = SubscriptionFilter::pair(&recipient.id, &target.id);
        if let Some(existing) = self.subscriptions.find_one(&filter).await? {
            return Ok(SubscribeOutcome::AlreadySubscribed(existing));
        }

        let created = self
            .subscriptions
            .create(Subscription::new(recipient, target))
            .await?;

        info!("User {} subscribed to answer {}", recipient.id, target.id);
        Ok(SubscribeOutcome::Created(created))
    }

    pub async fn unsubscribe(
        &self,
        recipient: Option<&UserRef>,
        target: Option<&AnswerRef>,
    ) -> Result<Option<Subscription>> {
        let (Some(recipient), Some(target)) = (recipient, target) else {
            return Ok(None);
        };
        debug!("User {} unsubscribing from answer {}", recipient.id, target.id);

        let filter = SubscriptionFilter::pair(&recipient.id, &target.id);
        let Some(existing) = self.subscriptions.find_one(&filter).await? else {
            return Ok(None);
        };

        self.subscriptions
            .delete_all(&SubscriptionFilter::by_id(&existing.id))
            .await?;

        info!("User {} unsubscribed from answer {}", recipient.id, target.id);
        Ok(Some(existing))
    }

    /// Drops every subscription on `target` in one bulk delete.
    pub async fn destruct(&self, target: Option<&AnswerRef>) -> Result<Option<usize>> {
        let Some(target) = target else {
            return Ok(None);
        };

        let removed = self
            .subscriptions
            .delete_all(&SubscriptionFilter::answer(&target.id))
            .await?;

        info!("Removed {} subscriptions for answer {}", removed, target.id);
        Ok(Some(removed))
    }

    /// Creates one unread notification of `kind` per subscriber of `target`,
    /// never for the answer's owner, in a single bulk insert.
    pub async fn notify(
        &self,
        source: Option<&EventSource>,
        target: Option<&AnswerRef>,
        kind: NotificationKind,
    ) -> Result<Option<usize>> {
        let (Some(source), Some(target)) = (source, target) else {
            return Ok(None);
        };
        debug!(
            "Fanning out {} for {} {} on answer {}",
            kind.as_str(),
            source.target_type(),
            source.target_id(),
            target.id
        );

        let filter = SubscriptionFilter::answer(&target.id).excluding_user(&target.user_id);
        let recipients = distinct_users(self.subscriptions.find_many(&filter).await?)
            .into_iter()
            .filter(|user_id| *user_id != target.user_id)
            .collect::<Vec<_>>();

        if recipients.is_empty() {
            return Ok(Some(0));
        }

        let batch = recipients
            .iter()
            .map(|recipient_id| Notification::new(source, recipient_id, kind))
            .collect::<Vec<_>>();

        let inserted = self.notifications.insert_many(batch).await?;

        info!("Created {} notifications for answer {}", inserted, target.id);
        Ok(Some(inserted))
    }

    /// Removes the notifications `source` produced for the current
    /// subscribers of `target`.
    pub async fn denotify(
        &self,
        source: Option<&EventSource>,
        target: Option<&AnswerRef>,
    ) -> Result<Option<usize>> {
        let (Some(source), Some(target)) = (source, target) else {
            return Ok(None);
        };

        let recipients = distinct_users(
            self.subscriptions
                .find_many(&SubscriptionFilter::answer(&target.id))
                .await?,
        );

        if recipients.is_empty() {
            return Ok(Some(0));
        }

        let removed = self
            .notifications
            .delete_all(&NotificationFilter::target(source).among_recipients(recipients))
            .await?;

        info!(
            "Retracted {} notifications for {} {}",
            removed,
            source.target_type(),
            source.target_id()
        );
        Ok(Some(removed))
    }

    pub async fn is_subscribed(&self, user: &UserRef, answer: &AnswerRef) -> Result<bool> {
        let filter = SubscriptionFilter::pair(&user.id, &answer.id);
        Ok(self.subscriptions.find_one(&filter).await?.is_some())
    }

    pub async fn subscribers(&self, answer: &AnswerRef) -> Result<Vec<Subscription>> {
        self.subscriptions
            .find_many(&SubscriptionFilter::answer(&answer.id))
            .await
    }
}

/// 按首次出现顺序去重用户ID
fn distinct_users(subscriptions: Vec<Subscription>) -> Vec<String> {
    let mut seen = HashSet::new();
    subscriptions
        .into_iter()
        .map(|s| s.user_id)
        .filter(|user_id| seen.insert(user_id.clone()))
        .collect()
}
