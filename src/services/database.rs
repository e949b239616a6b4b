use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Notification, NotificationFilter, Subscription, SubscriptionFilter};
use crate::services::repository::{NotificationRepository, SubscriptionRepository};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use surrealdb::{Response, Surreal};
use tracing::{debug, error, info};

/// 表结构与索引；唯一索引是防止重复订阅的最终保障
const SCHEMA: &str = r#"
    DEFINE TABLE subscription SCHEMALESS;
    DEFINE INDEX subscription_user_answer ON TABLE subscription COLUMNS user_id, answer_id UNIQUE;
    DEFINE TABLE notification SCHEMALESS;
    DEFINE INDEX notification_target ON TABLE notification COLUMNS target_type, target_id;
    DEFINE INDEX notification_recipient ON TABLE notification COLUMNS recipient_id;
"#;

const SUBSCRIPTION_FIELDS: &str = "meta::id(id) AS id, user_id, answer_id, created_at";
const NOTIFICATION_FIELDS: &str =
    "meta::id(id) AS id, target_type, target_id, recipient_id, notification_type, is_new, created_at";

/// 数据库服务
#[derive(Clone)]
pub struct Database {
    pub client: Surreal<Any>,
}

impl Database {
    /// 创建新的数据库实例
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Initializing database connection to {}", config.database_url);

        let client = any::connect(config.database_url.as_str())
            .await
            .map_err(AppError::from_db)?;

        if config.requires_signin() {
            client
                .signin(Root {
                    username: &config.database_username,
                    password: &config.database_password,
                })
                .await?;
        }

        client
            .use_ns(config.database_namespace.as_str())
            .use_db(config.database_name.as_str())
            .await?;

        Ok(Self { client })
    }

    /// 验证数据库连接
    pub async fn verify_connection(&self) -> Result<()> {
        match self.query("INFO FOR DB").await {
            Ok(_) => {
                info!("Database connection verified successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to verify database connection: {}", e);
                Err(AppError::Persistence(format!("database unreachable: {}", e)))
            }
        }
    }

    /// 初始化表结构和唯一索引（可重复执行）
    pub async fn apply_schema(&self) -> Result<()> {
        self.query(SCHEMA).await?;
        info!("Database schema applied");
        Ok(())
    }

    /// 执行原始SQL查询
    pub async fn query(&self, sql: &str) -> Result<Response> {
        self.client
            .query(sql)
            .await
            .and_then(Response::check)
            .map_err(AppError::from_db)
    }

    /// 执行带参数的查询，任何语句失败都会返回错误
    pub async fn query_with_params<P>(&self, sql: &str, params: P) -> Result<Response>
    where
        P: Serialize,
    {
        debug!("Executing query: {}", sql.trim());
        self.client
            .query(sql)
            .bind(params)
            .await
            .and_then(Response::check)
            .map_err(AppError::from_db)
    }
}

/// WHERE 子句及其绑定参数
#[derive(Debug, Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Map<String, Value>,
}

impl Conditions {
    fn push(&mut self, clause: &str, name: &str, value: Value) {
        self.clauses.push(clause.to_string());
        self.params.insert(name.to_string(), value);
    }

    fn flag(&mut self, clause: &str) {
        self.clauses.push(clause.to_string());
    }

    fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn subscription_conditions(filter: &SubscriptionFilter) -> Conditions {
    let mut conditions = Conditions::default();
    if let Some(id) = &filter.id {
        conditions.push("id = type::thing('subscription', $id)", "id", json!(id));
    }
    if let Some(user_id) = &filter.user_id {
        conditions.push("user_id = $user_id", "user_id", json!(user_id));
    }
    if let Some(answer_id) = &filter.answer_id {
        conditions.push("answer_id = $answer_id", "answer_id", json!(answer_id));
    }
    if let Some(excluded) = &filter.exclude_user_id {
        conditions.push("user_id != $exclude_user_id", "exclude_user_id", json!(excluded));
    }
    conditions
}

fn notification_conditions(filter: &NotificationFilter) -> Conditions {
    let mut conditions = Conditions::default();
    if let Some(target) = &filter.target {
        conditions.push("target_type = $target_type", "target_type", json!(target.target_type()));
        conditions.push("target_id = $target_id", "target_id", json!(target.target_id()));
    }
    if let Some(recipient_id) = &filter.recipient_id {
        conditions.push("recipient_id = $recipient_id", "recipient_id", json!(recipient_id));
    }
    if let Some(recipient_ids) = &filter.recipient_ids {
        conditions.push("recipient_id INSIDE $recipient_ids", "recipient_ids", json!(recipient_ids));
    }
    if filter.only_new {
        conditions.flag("is_new = true");
    }
    conditions
}

#[derive(Clone)]
pub struct SurrealSubscriptionRepository {
    db: Arc<Database>,
}

impl SurrealSubscriptionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for SurrealSubscriptionRepository {
    async fn create(&self, subscription: Subscription) -> Result<Subscription> {
        let query = r#"
            CREATE type::thing('subscription', $id) SET
                user_id = $user_id,
                answer_id = $answer_id,
                created_at = $created_at
            RETURN NONE
        "#;

        self.db.query_with_params(query, json!({
            "id": subscription.id,
            "user_id": subscription.user_id,
            "answer_id": subscription.answer_id,
            "created_at": subscription.created_at,
        })).await?;

        Ok(subscription)
    }

    async fn find_one(&self, filter: &SubscriptionFilter) -> Result<Option<Subscription>> {
        let conditions = subscription_conditions(filter);
        let query = format!("SELECT {} FROM subscription{} LIMIT 1", SUBSCRIPTION_FIELDS, conditions.sql());

        let mut response = self.db.query_with_params(&query, Value::Object(conditions.params)).await?;
        let rows: Vec<Subscription> = response.take(0)?;
        Ok(rows.into_iter().next())
    }

    async fn find_many(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>> {
        let conditions = subscription_conditions(filter);
        let query = format!("SELECT {} FROM subscription{}", SUBSCRIPTION_FIELDS, conditions.sql());

        let mut response = self.db.query_with_params(&query, Value::Object(conditions.params)).await?;
        let rows: Vec<Subscription> = response.take(0)?;
        Ok(rows)
    }

    async fn delete_all(&self, filter: &SubscriptionFilter) -> Result<usize> {
        let conditions = subscription_conditions(filter);
        let query = format!("DELETE subscription{} RETURN BEFORE", conditions.sql());

        let mut response = self.db.query_with_params(&query, Value::Object(conditions.params)).await?;
        let removed: Vec<Value> = response.take(0)?;
        Ok(removed.len())
    }

    async fn insert_many(&self, subscriptions: Vec<Subscription>) -> Result<usize> {
        if subscriptions.is_empty() {
            return Ok(0);
        }

        let count = subscriptions.len();
        self.db.query_with_params(
            "INSERT INTO subscription $rows RETURN NONE",
            json!({ "rows": serde_json::to_value(&subscriptions)? }),
        ).await?;

        Ok(count)
    }
}

#[derive(Clone)]
pub struct SurrealNotificationRepository {
    db: Arc<Database>,
}

impl SurrealNotificationRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for SurrealNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification> {
        let query = r#"
            CREATE type::thing('notification', $id) SET
                target_type = $target_type,
                target_id = $target_id,
                recipient_id = $recipient_id,
                notification_type = $notification_type,
                is_new = $is_new,
                created_at = $created_at
            RETURN NONE
        "#;

        self.db.query_with_params(query, json!({
            "id": notification.id,
            "target_type": notification.target_type,
            "target_id": notification.target_id,
            "recipient_id": notification.recipient_id,
            "notification_type": notification.notification_type,
            "is_new": notification.is_new,
            "created_at": notification.created_at,
        })).await?;

        Ok(notification)
    }

    async fn find_one(&self, filter: &NotificationFilter) -> Result<Option<Notification>> {
        let conditions = notification_conditions(filter);
        let query = format!("SELECT {} FROM notification{} LIMIT 1", NOTIFICATION_FIELDS, conditions.sql());

        let mut response = self.db.query_with_params(&query, Value::Object(conditions.params)).await?;
        let rows: Vec<Notification> = response.take(0)?;
        Ok(rows.into_iter().next())
    }

    async fn find_many(&self, filter: &NotificationFilter) -> Result<Vec<Notification>> {
        let conditions = notification_conditions(filter);
        let query = format!("SELECT {} FROM notification{}", NOTIFICATION_FIELDS, conditions.sql());

        let mut response = self.db.query_with_params(&query, Value::Object(conditions.params)).await?;
        let rows: Vec<Notification> = response.take(0)?;
        Ok(rows)
    }

    async fn delete_all(&self, filter: &NotificationFilter) -> Result<usize> {
        let conditions = notification_conditions(filter);
        let query = format!("DELETE notification{} RETURN BEFORE", conditions.sql());

        let mut response = self.db.query_with_params(&query, Value::Object(conditions.params)).await?;
        let removed: Vec<Value> = response.take(0)?;
        Ok(removed.len())
    }

    async fn insert_many(&self, notifications: Vec<Notification>) -> Result<usize> {
        if notifications.is_empty() {
            return Ok(0);
        }

        let count = notifications.len();
        // 单条 INSERT 语句，整批成功或整批失败
        self.db.query_with_params(
            "INSERT INTO notification $rows RETURN NONE",
            json!({ "rows": serde_json::to_value(&notifications)? }),
        ).await?;

        debug!("Inserted {} notifications", count);
        Ok(count)
    }
}
