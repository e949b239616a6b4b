use crate::{
    error::{AppError, Result},
    models::{AnswerRef, CommentRef, EventSource, NotificationKind, UserRef},
    services::SubscriptionService,
};
use tracing::{debug, warn};

/// 回答与评论生命周期钩子
#[derive(Clone)]
pub struct ActivityHooks {
    subscriptions: SubscriptionService,
    notify_on_comments: bool,
}

impl ActivityHooks {
    pub fn new(subscriptions: SubscriptionService, notify_on_comments: bool) -> Self {
        Self {
            subscriptions,
            notify_on_comments,
        }
    }

    /// The author of a new answer watches it.
    pub async fn answer_created(&self, answer: &AnswerRef) -> Result<()> {
        self.ensure_subscribed(&answer.owner(), answer).await
    }

    pub async fn answer_destroyed(&self, answer: &AnswerRef) -> Result<Option<usize>> {
        self.subscriptions.destruct(Some(answer)).await
    }

    /// Subscribes the commenter, then notifies the other subscribers.
    pub async fn comment_created(&self, comment: &CommentRef, answer: &AnswerRef) -> Result<Option<usize>> {
        ensure_same_answer(comment, answer)?;

        self.ensure_subscribed(&comment.author(), answer).await?;

        if !self.notify_on_comments {
            debug!("Comment notifications disabled, skipping fan-out for {}", comment.id);
            return Ok(None);
        }

        self.subscriptions
            .notify(Some(&EventSource::from(comment)), Some(answer), NotificationKind::Commented)
            .await
    }

    /// Retracts the comment's notifications whether or not fan-out is enabled.
    pub async fn comment_destroyed(&self, comment: &CommentRef, answer: &AnswerRef) -> Result<Option<usize>> {
        ensure_same_answer(comment, answer)?;

        self.subscriptions
            .denotify(Some(&EventSource::from(comment)), Some(answer))
            .await
    }

    async fn ensure_subscribed(&self, user: &UserRef, answer: &AnswerRef) -> Result<()> {
        match self.subscriptions.subscribe(user, answer).await {
            Ok(_) => Ok(()),
            // 并发订阅输给了另一请求，订阅已存在
            Err(e) if e.is_unique_violation() => {
                warn!("Concurrent subscribe for user {} on answer {}: {}", user.id, answer.id, e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn ensure_same_answer(comment: &CommentRef, answer: &AnswerRef) -> Result<()> {
    if comment.answer_id != answer.id {
        return Err(AppError::Validation(format!(
            "Comment {} belongs to answer {}, not {}",
            comment.id, comment.answer_id, answer.id
        )));
    }
    Ok(())
}
