use futures_util::future::join_all;
use std::time::Instant;
use tokio::task::spawn_blocking;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;

use super::digest;
use super::dimensions::{self, NaturalDimensions};
use super::renderer::Background;
use super::types::ConversionRequest;

/// 一次转换的产物：PNG 字节 + 缓存校验摘要。
#[derive(Debug)]
pub struct ConvertedPng {
    pub png: Vec<u8>,
    pub etag: String,
}

/// 批量转换的单项结果（HTTP 层再编码为 base64）。
pub struct BatchItemOutcome {
    pub data: Option<Vec<u8>>,
    pub error: Option<String>,
}

/// 完整转换管线：拉取上游 SVG → 解析尺寸 → 渲染 → 参数摘要。
///
/// 校验已在边界完成；这里默认拿到的请求合法。渲染是纯 CPU 工作，
/// 放到 blocking 线程池并经信号量限流，避免高并发下拖垮运行时。
/// 渲染失败不重试（同样的输入必然同样失败）。
pub async fn convert_svg_path_to_png(
    state: &AppState,
    req: ConversionRequest,
) -> Result<ConvertedPng, AppError> {
    let ConversionRequest {
        svg_path,
        width,
        height,
        transparent,
        ..
    } = req;

    let svg = state.svg_source.fetch(&svg_path).await?;

    let etag = digest::etag_for(&svg_path, width, height);
    let max_dimension = AppConfig::global().convert.max_dimension;

    let permit = state
        .render_semaphore
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| AppError::Internal(format!("render semaphore closed: {e}")))?;

    let renderer = state.renderer.clone();
    let t_render = Instant::now();
    let png = spawn_blocking(move || {
        let _permit = permit;

        // 自然尺寸：源 SVG 的固有大小，解析不出来回退 512×512；
        // 先按硬上限钳制最长边（只缩不放），再收进请求边界。
        let natural = renderer
            .intrinsic_size(&svg)
            .unwrap_or(NaturalDimensions::FALLBACK);
        let clamped = dimensions::clamp_to_ceiling(natural, max_dimension);
        let target = dimensions::fit_within(
            NaturalDimensions::new(clamped.width as f64, clamped.height as f64),
            width,
            height,
        );

        renderer.render(&svg, target, Background::from_transparent(transparent))
    })
    .await
    .map_err(|e| AppError::Internal(format!("render task join failed: {e}")))??;

    tracing::debug!(
        "PNG 转换完成: {} {}x{} 耗时 {:?}, {} bytes",
        svg_path,
        width,
        height,
        t_render.elapsed(),
        png.len()
    );

    Ok(ConvertedPng { png, etag })
}

/// 批量转换：逐项独立执行、独立结算，单项失败不影响其余项；
/// 结果数组与请求顺序一一对应。
pub async fn convert_multiple(
    state: &AppState,
    requests: Vec<Result<ConversionRequest, String>>,
) -> Vec<BatchItemOutcome> {
    let futures = requests.into_iter().map(|item| async move {
        match item {
            Ok(req) => match convert_svg_path_to_png(state, req).await {
                Ok(converted) => BatchItemOutcome {
                    data: Some(converted.png),
                    error: None,
                },
                Err(e) => BatchItemOutcome {
                    data: None,
                    error: Some(e.to_string()),
                },
            },
            // 边界校验已失败的项直接结算，不发起拉取/渲染。
            Err(message) => BatchItemOutcome {
                data: None,
                error: Some(message),
            },
        }
    });

    join_all(futures).await
}
