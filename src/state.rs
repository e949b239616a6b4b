use crate::{
    config::{Config, StorageBackend},
    error::Result,
    services::{
        ActivityHooks, Database, NotificationRepository, NotificationService,
        SubscriptionRepository, SubscriptionService, SurrealNotificationRepository,
        SurrealSubscriptionRepository,
    },
    utils::memory_store::MemoryStore,
};
use std::sync::Arc;
use tracing::info;

/// 应用程序的共享状态
/// 包含所有服务和配置的引用
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 订阅服务
    pub subscription_service: SubscriptionService,

    /// 通知服务
    pub notification_service: NotificationService,

    /// 回答/评论生命周期钩子
    pub activity_hooks: ActivityHooks,
}

impl AppState {
    pub fn new(
        config: Config,
        subscriptions: Arc<dyn SubscriptionRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        let subscription_service = SubscriptionService::new(subscriptions, notifications.clone());
        let notification_service = NotificationService::new(notifications);
        let activity_hooks = ActivityHooks::new(
            subscription_service.clone(),
            config.enable_comment_notifications,
        );

        Self {
            config,
            subscription_service,
            notification_service,
            activity_hooks,
        }
    }

    /// 按配置选择存储后端并初始化所有服务
    pub async fn connect(config: &Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::Surreal => {
                let db = Arc::new(Database::new(config).await?);
                db.verify_connection().await?;
                db.apply_schema().await?;

                Ok(Self::new(
                    config.clone(),
                    Arc::new(SurrealSubscriptionRepository::new(db.clone())),
                    Arc::new(SurrealNotificationRepository::new(db)),
                ))
            }
            StorageBackend::Memory => {
                info!("Using in-memory subscription store");
                let store = Arc::new(MemoryStore::new());
                Ok(Self::new(config.clone(), store.clone(), store))
            }
        }
    }
}
