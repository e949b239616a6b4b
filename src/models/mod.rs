pub mod notification;
pub mod reference;
pub mod subscription;

pub use notification::{Notification, NotificationFilter, NotificationKind};
pub use reference::{AnswerRef, CommentRef, EventSource, UserRef};
pub use subscription::{SubscribeOutcome, Subscription, SubscriptionFilter};
