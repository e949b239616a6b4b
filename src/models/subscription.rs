use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::reference::{AnswerRef, UserRef};

/// 用户对某个回答的订阅
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub answer_id: String,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(user: &UserRef, answer: &AnswerRef) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            answer_id: answer.id.clone(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    AlreadySubscribed(Subscription),
    Created(Subscription),
}

impl SubscribeOutcome {
    pub fn subscription(&self) -> &Subscription {
        match self {
            SubscribeOutcome::AlreadySubscribed(s) | SubscribeOutcome::Created(s) => s,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, SubscribeOutcome::Created(_))
    }
}

/// Query criteria over subscriptions. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub answer_id: Option<String>,
    pub exclude_user_id: Option<String>,
}

impl SubscriptionFilter {
    pub fn by_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn pair(user_id: &str, answer_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            answer_id: Some(answer_id.to_string()),
            ..Default::default()
        }
    }

    pub fn answer(answer_id: &str) -> Self {
        Self {
            answer_id: Some(answer_id.to_string()),
            ..Default::default()
        }
    }

    pub fn excluding_user(mut self, user_id: &str) -> Self {
        self.exclude_user_id = Some(user_id.to_string());
        self
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.id.as_deref().map_or(true, |id| subscription.id == id)
            && self.user_id.as_deref().map_or(true, |id| subscription.user_id == id)
            && self.answer_id.as_deref().map_or(true, |id| subscription.answer_id == id)
            && self
                .exclude_user_id
                .as_deref()
                .map_or(true, |id| subscription.user_id != id)
    }
}
