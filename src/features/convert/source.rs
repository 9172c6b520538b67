use crate::error::AppError;
use crate::http;

/// 上游 SVG 源。
///
/// `svgPath` 一般是站内相对路径（如 `/illustrations/work/laptop.svg`），
/// 拉取时拼接到配置的静态资源基地址；绝对 URL 原样透传。
pub struct SvgSource {
    base_url: String,
}

impl SvgSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 把 `svgPath` 解析为完整的拉取 URL。
    pub fn resolve(&self, svg_path: &str) -> String {
        if svg_path.starts_with("http://") || svg_path.starts_with("https://") {
            return svg_path.to_string();
        }
        if svg_path.starts_with('/') {
            format!("{}{}", self.base_url, svg_path)
        } else {
            format!("{}/{}", self.base_url, svg_path)
        }
    }

    /// 拉取 SVG 源文本。
    ///
    /// 错误映射：非 2xx 响应 → `SourceNotFound`（404）；
    /// 传输层错误（DNS/连接/超时）→ `ConversionFailed`（500）。
    /// 拉取严格发生在渲染之前，渲染步骤内部不做任何 I/O。
    pub async fn fetch(&self, svg_path: &str) -> Result<String, AppError> {
        let url = self.resolve(svg_path);

        let client = http::client_svg_fetch()
            .map_err(|e| AppError::ConversionFailed(format!("HTTP client init failed: {e}")))?;

        let resp = client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ConversionFailed(format!("Failed to fetch {svg_path}: {e}")))?;

        if !resp.status().is_success() {
            tracing::debug!("上游 SVG 返回非 2xx：{} -> {}", url, resp.status());
            return Err(AppError::SourceNotFound);
        }

        resp.text()
            .await
            .map_err(|e| AppError::ConversionFailed(format!("Failed to read {svg_path}: {e}")))
    }
}
