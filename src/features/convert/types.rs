use serde::{Deserialize, Serialize};

use crate::config::ConvertConfig;
use crate::error::FieldError;

/// 未校验的转换请求体（所有字段先按可选接收，统一在边界处逐项校验，
/// 保证一次性列出全部不合法字段，而不是在反序列化阶段碰到第一个就失败）。
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConversionRequest {
    /// 上游 SVG 的站内路径（如 `/illustrations/work/laptop.svg`）
    #[schema(example = "/illustrations/work/laptop.svg")]
    pub svg_path: Option<String>,
    /// 输出宽度上界（1-2048）
    #[schema(example = 512)]
    pub width: Option<f64>,
    /// 输出高度上界（1-2048）
    #[schema(example = 512)]
    pub height: Option<f64>,
    /// 是否透明背景（默认 true；false 时画布先填充纯白）
    pub transparent: Option<bool>,
    /// 质量参数 0-100（默认 90；当前 PNG 编码不使用，仅保留契约字段）
    pub quality: Option<f64>,
}

/// 校验通过的转换请求
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub svg_path: String,
    pub width: u32,
    pub height: u32,
    pub transparent: bool,
    /// 已校验但渲染不消费（见契约说明），保留以维持 API 稳定。
    pub quality: u8,
}

impl RawConversionRequest {
    /// 边界校验：失败时返回所有不合法字段。
    ///
    /// 超界尺寸在这里直接拒绝，不做静默钳制。
    pub fn validate(self, convert: &ConvertConfig) -> Result<ConversionRequest, Vec<FieldError>> {
        let mut errors = Vec::new();
        let max = convert.max_dimension;

        let svg_path = match self.svg_path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(p.to_string()),
            _ => {
                errors.push(FieldError::new("svgPath", "svgPath is required"));
                None
            }
        };

        let width = validate_dimension("width", self.width, max, &mut errors);
        let height = validate_dimension("height", self.height, max, &mut errors);

        let quality = match self.quality {
            None => Some(90u8),
            Some(q) if q.fract() == 0.0 && (0.0..=100.0).contains(&q) => Some(q as u8),
            Some(_) => {
                errors.push(FieldError::new(
                    "quality",
                    "quality must be an integer between 0 and 100",
                ));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // 所有 None 分支都已写入 errors，这里不会再出现缺失字段。
        Ok(ConversionRequest {
            svg_path: svg_path.unwrap_or_default(),
            width: width.unwrap_or(1),
            height: height.unwrap_or(1),
            transparent: self.transparent.unwrap_or(true),
            quality: quality.unwrap_or(90),
        })
    }
}

fn validate_dimension(
    field: &str,
    value: Option<f64>,
    max: u32,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    match value {
        None => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            None
        }
        Some(v) if v.fract() != 0.0 || !v.is_finite() => {
            errors.push(FieldError::new(field, format!("{field} must be an integer")));
            None
        }
        Some(v) if v < 1.0 || v > max as f64 => {
            errors.push(FieldError::new(
                field,
                format!("{field} must be between 1 and {max}"),
            ));
            None
        }
        Some(v) => Some(v as u32),
    }
}

/// 批量转换的单项结果（与前端 `ApiResponse` 形状对齐；data 为 base64 PNG）
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchConvertItem {
    /// 该项是否转换成功
    pub success: bool,
    /// base64 编码的 PNG 字节（仅成功时存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// 失败原因（仅失败时存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 尺寸预设（详情页的三档导出选项）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    /// Icon (256x256)
    Icon,
    /// Standard (512x512)
    Standard,
    /// Large (1024x1024)
    Large,
}

impl SizePreset {
    /// 预设对应的请求边界（宽 == 高）。
    pub fn bound(self) -> (u32, u32) {
        match self {
            SizePreset::Icon => (256, 256),
            SizePreset::Standard => (512, 512),
            SizePreset::Large => (1024, 1024),
        }
    }
}
