use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as base64_engine};

use crate::config::AppConfig;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

use super::service;
use super::types::{BatchConvertItem, RawConversionRequest};

#[utoipa::path(
    post,
    path = "/png-convert",
    summary = "SVG 转 PNG",
    description = "按 `svgPath` 拉取上游 SVG，按请求边界保持纵横比渲染为 PNG 并返回原始字节。\
        响应携带一年期 `Cache-Control` 与基于请求参数的 `ETag` 校验摘要。",
    request_body = RawConversionRequest,
    responses(
        (status = 200, description = "PNG bytes", content_type = "image/png"),
        (status = 400, description = "参数校验失败（details 列出全部不合法字段）", body = ErrorBody),
        (status = 404, description = "上游 SVG 不存在", body = ErrorBody),
        (status = 500, description = "渲染失败", body = ErrorBody)
    ),
    tag = "Convert"
)]
pub async fn convert_png(
    State(state): State<AppState>,
    Json(raw): Json<RawConversionRequest>,
) -> Result<Response, AppError> {
    let config = AppConfig::global();

    // 校验先行：任何拉取/渲染开销之前就拒绝坏请求。
    let req = raw
        .validate(&config.convert)
        .map_err(AppError::Validation)?;

    let converted = service::convert_svg_path_to_png(&state, req).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, converted.png.len())
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", config.convert.cache_max_age_secs),
        )
        .header(header::ETAG, format!("\"{}\"", converted.etag))
        .body(Body::from(converted.png))
        .map_err(|e| AppError::Internal(format!("build response failed: {e}")))?;

    Ok(response)
}

/// CORS 预检响应：204 无响应体。
///
/// 浏览器发起的预检（带 Origin + Access-Control-Request-Method）由
/// CorsLayer 在进入路由前应答；这里兜底处理裸 OPTIONS 请求，保证该
/// 端点对任何 OPTIONS 都返回 204 + CORS 头。
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

#[utoipa::path(
    post,
    path = "/png-convert/batch",
    summary = "批量 SVG 转 PNG",
    description = "对每个请求项独立转换、独立结算：单项失败不会中断整批。\
        结果数组与请求顺序一致，成功项的 `data` 为 base64 编码的 PNG 字节。",
    request_body = Vec<RawConversionRequest>,
    responses(
        (status = 200, description = "逐项结果（与请求同序）", body = Vec<BatchConvertItem>),
        (status = 400, description = "批量条目数超限", body = ErrorBody)
    ),
    tag = "Convert"
)]
pub async fn convert_png_batch(
    State(state): State<AppState>,
    Json(raw_items): Json<Vec<RawConversionRequest>>,
) -> Result<Json<Vec<BatchConvertItem>>, AppError> {
    let config = AppConfig::global();
    if raw_items.len() > config.convert.batch_max_items {
        return Err(AppError::Validation(vec![crate::error::FieldError::new(
            "requests",
            format!("batch size exceeds {}", config.convert.batch_max_items),
        )]));
    }

    // 校验错误归入对应项的结算结果，而不是让整批失败。
    let validated: Vec<Result<_, String>> = raw_items
        .into_iter()
        .map(|raw| {
            raw.validate(&config.convert).map_err(|errors| {
                let fields = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("Invalid conversion request: {fields}")
            })
        })
        .collect();

    let outcomes = service::convert_multiple(&state, validated).await;

    let items = outcomes
        .into_iter()
        .map(|outcome| BatchConvertItem {
            success: outcome.error.is_none(),
            data: outcome.data.map(|png| base64_engine.encode(png)),
            error: outcome.error,
        })
        .collect();

    Ok(Json(items))
}

pub fn create_convert_router() -> Router<AppState> {
    Router::new()
        .route("/png-convert", post(convert_png).options(preflight))
        .route("/png-convert/batch", post(convert_png_batch))
}
