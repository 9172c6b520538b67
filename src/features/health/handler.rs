use axum::{http::StatusCode, response::Json};
use chrono::Utc;
use serde::Serialize;

use crate::features::convert::renderer_runtime_initialized;

/// 健康检查响应
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// 服务状态
    #[schema(example = "healthy")]
    pub status: String,
    /// 当前时间（ISO-8601）
    #[schema(example = "2026-08-27T08:00:00Z")]
    pub timestamp: String,
    /// 渲染运行时是否已完成惰性初始化（信息性字段，非健康条件）
    pub renderer_initialized: bool,
    /// 服务名称
    #[schema(example = "doodle-backend")]
    pub service: String,
    /// 当前版本（Cargo package version）
    #[schema(example = "0.1.0")]
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "健康检查",
    description = "用于探活的健康检查端点，返回服务状态、时间戳与渲染运行时初始化状态。",
    responses((status = 200, description = "服务健康", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            renderer_initialized: renderer_runtime_initialized(),
            service: "doodle-backend".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::health_check;

    #[tokio::test]
    async fn health_reports_status_and_iso_timestamp() {
        let (status, body) = health_check().await;
        assert_eq!(status, axum::http::StatusCode::OK);
        assert_eq!(body.status, "healthy");
        // RFC3339/ISO-8601：形如 2026-08-27T08:00:00.000Z
        assert!(body.timestamp.contains('T') && body.timestamp.ends_with('Z'));
    }
}
