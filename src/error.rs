use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// SurrealDB 唯一索引冲突时的错误文本
const UNIQUE_INDEX_MESSAGE: &str = "already contains";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {0}")]
    ValidatorError(#[from] validator::ValidationErrors),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// 便利函数，用于创建常见错误
impl AppError {
    pub fn persistence(msg: &str) -> Self {
        Self::Persistence(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Classifies a raw database error, lifting unique index failures into
    /// [`AppError::UniqueViolation`].
    pub fn from_db(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains(UNIQUE_INDEX_MESSAGE) {
            Self::UniqueViolation(message)
        } else {
            Self::Database(err)
        }
    }

    /// A lost subscribe race surfaces as this; callers treat it as "already subscribed".
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::UniqueViolation(_) => true,
            AppError::Database(e) => e.to_string().contains(UNIQUE_INDEX_MESSAGE),
            _ => false,
        }
    }

    /// Errors raised by the storage layer rather than by input checks.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Persistence(_) | AppError::UniqueViolation(_)
        )
    }
}

// 从其他错误类型转换
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
