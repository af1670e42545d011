//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 业务逻辑错误 | E0003 资源不存在 |
//! | E2xxx | 权限错误 | E2001 无权限 |
//! | E3xxx | 认证令牌错误 | E3002 无效令牌 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Shift 42 not found"))
//!
//! // 返回成功响应
//! Ok(Json(AppResponse::success(data)))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> AppResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: "E0000".to_string(),
            message: "Success".to_string(),
            data: Some(data),
        }
    }
}

/// 应用错误枚举
///
/// Business-rule violations (capacity, duplicate booking, schedule
/// conflict, illegal transition) are always surfaced to the caller;
/// the core never coerces state to make a request fit.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401/403) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Staff member already holds an effective reservation on the shift
    #[error("Duplicate booking: {0}")]
    DuplicateBooking(String),

    /// Shift headcount already reached
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Overlap or insufficient gap against another booking
    #[error("Schedule conflict: {0}")]
    ScheduleConflict(String),

    /// No effective reservation whose shift window contains now
    #[error("No active shift: {0}")]
    NoActiveShift(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".to_string()),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::NoActiveShift(msg) => (StatusCode::NOT_FOUND, "E0009", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Conflict (409)
            AppError::DuplicateBooking(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Business rule (422)
            AppError::CapacityExceeded(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "E0007", msg.clone()),
            AppError::ScheduleConflict(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "E0008", msg.clone()),
            AppError::BusinessRule(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone()),

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error".to_string())
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9001", "Internal server error".to_string())
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::DuplicateBooking(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an invalid credentials error with unified message
    /// Used to prevent account enumeration during login
    pub fn invalid_credentials() -> Self {
        Self::Validation("Invalid chat id or password".to_string())
    }
}

/// 处理器的 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse::success(data))
}
