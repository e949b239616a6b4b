use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::reference::EventSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    Commented,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Commented => "Commented",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub target_type: String,
    pub target_id: String,
    pub recipient_id: String,
    pub notification_type: NotificationKind,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(source: &EventSource, recipient_id: &str, kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target_type: source.target_type().to_string(),
            target_id: source.target_id().to_string(),
            recipient_id: recipient_id.to_string(),
            notification_type: kind,
            is_new: true,
            created_at: Utc::now(),
        }
    }

    pub fn target(&self) -> Option<EventSource> {
        EventSource::from_parts(&self.target_type, &self.target_id)
    }
}

/// Query criteria over notifications. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    pub target: Option<EventSource>,
    pub recipient_id: Option<String>,
    pub recipient_ids: Option<Vec<String>>,
    pub only_new: bool,
}

impl NotificationFilter {
    pub fn target(source: &EventSource) -> Self {
        Self {
            target: Some(source.clone()),
            ..Default::default()
        }
    }

    pub fn recipient(recipient_id: &str) -> Self {
        Self {
            recipient_id: Some(recipient_id.to_string()),
            ..Default::default()
        }
    }

    pub fn among_recipients(mut self, recipient_ids: Vec<String>) -> Self {
        self.recipient_ids = Some(recipient_ids);
        self
    }

    pub fn unread(mut self) -> Self {
        self.only_new = true;
        self
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        let target_matches = self.target.as_ref().map_or(true, |source| {
            notification.target_type == source.target_type()
                && notification.target_id == source.target_id()
        });

        target_matches
            && self
                .recipient_id
                .as_deref()
                .map_or(true, |id| notification.recipient_id == id)
            && self
                .recipient_ids
                .as_ref()
                .map_or(true, |ids| ids.iter().any(|id| *id == notification.recipient_id))
            && (!self.only_new || notification.is_new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let source = EventSource::comment("c1");
        let notification = Notification::new(&source, "u1", NotificationKind::Commented);

        assert!(notification.is_new);
        assert_eq!(notification.target_type, "Comment");
        assert_eq!(notification.target(), Some(source));
    }

    #[test]
    fn test_filter_matching() {
        let source = EventSource::comment("c1");
        let mut notification = Notification::new(&source, "u1", NotificationKind::Commented);

        assert!(NotificationFilter::target(&source).matches(&notification));
        assert!(!NotificationFilter::target(&EventSource::comment("c2")).matches(&notification));
        assert!(NotificationFilter::target(&source)
            .among_recipients(vec!["u1".to_string(), "u2".to_string()])
            .matches(&notification));
        assert!(!NotificationFilter::target(&source)
            .among_recipients(vec![])
            .matches(&notification));

        notification.is_new = false;
        assert!(NotificationFilter::recipient("u1").matches(&notification));
        assert!(!NotificationFilter::recipient("u1").unread().matches(&notification));
    }
}
