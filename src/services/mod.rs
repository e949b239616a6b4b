pub mod activity;
pub mod database;
pub mod notification;
pub mod repository;
pub mod subscription;

// 重新导出常用类型
pub use activity::ActivityHooks;
pub use database::{Database, SurrealNotificationRepository, SurrealSubscriptionRepository};
pub use notification::NotificationService;
pub use repository::{NotificationRepository, SubscriptionRepository};
pub use subscription::SubscriptionService;
