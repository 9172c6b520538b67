use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用统一错误类型
///
/// 对外契约（与前端 SDK 约定）：
/// - 所有错误响应体均为 JSON，固定携带 `error` 字段；
/// - 参数校验错误额外携带 `details`，逐项列出所有不合法字段（而非只报第一个）；
/// - 上游 SVG 未找到时，`error` 固定为 `"SVG not found"`。
#[derive(Error, Debug)]
pub enum AppError {
    /// 参数校验错误（在任何网络拉取/渲染之前检出）
    #[error("Invalid conversion request")]
    Validation(Vec<FieldError>),

    /// 上游 SVG 路径无法获取（非 2xx 响应）
    #[error("SVG not found")]
    SourceNotFound,

    /// 渲染失败（SVG 不合法、渲染器内部错误、上游不可达等）
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    /// 内部服务器错误
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// 字段级校验错误
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    /// 字段名（camelCase，与请求体一致）
    pub field: String,
    /// 字段错误信息
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// 错误响应体
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// 人类可读的错误信息
    #[schema(example = "SVG not found")]
    pub error: String,
    /// 字段级校验错误（仅参数校验失败时存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SourceNotFound => StatusCode::NOT_FOUND,
            AppError::ConversionFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 500 类错误：详情只进服务端日志，响应体保留可读原因但不含调用栈。
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("PNG 转换错误: {self:?}");
        }

        let body = ErrorBody {
            error: self.to_string(),
            details: match self {
                AppError::Validation(details) => Some(details),
                _ => None,
            },
        };

        let mut res = Json(body).into_response();
        *res.status_mut() = status;
        res
    }
}
