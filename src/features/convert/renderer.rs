use resvg::usvg::{self, Options as UsvgOptions, fontdb};
use resvg::{
    render,
    tiny_skia::{Color, Pixmap, Transform},
};
use std::sync::{Arc, OnceLock};

use crate::error::AppError;
use crate::features::convert::dimensions::{NaturalDimensions, ResolvedDimensions};

/// 画布背景策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// 不填充，保留 alpha 通道
    Transparent,
    /// 先填充纯白，再绘制矢量内容
    White,
}

impl Background {
    pub fn from_transparent(transparent: bool) -> Self {
        if transparent {
            Background::Transparent
        } else {
            Background::White
        }
    }
}

/// 矢量渲染能力（注入接口）。
///
/// 核心流程（校验、尺寸解析、摘要、错误映射）只依赖该 trait，
/// 单元/集成测试可以用假渲染器替换真实后端。
pub trait VectorRenderer: Send + Sync {
    /// 解析 SVG 的固有尺寸；解析失败返回 None（调用方回退 512×512）。
    fn intrinsic_size(&self, svg: &str) -> Option<NaturalDimensions>;

    /// 在 `target` 尺寸下渲染 SVG 为 PNG 字节。
    fn render(
        &self,
        svg: &str,
        target: ResolvedDimensions,
        background: Background,
    ) -> Result<Vec<u8>, AppError>;
}

// 全局字体数据库单例。
//
// 同时充当“渲染运行时已初始化”标志：首个渲染请求触发一次性加载，
// 并发首调安全（OnceLock），进程生命周期内不回收。初始化只摊销启动
// 成本，不构成正确性依赖。
static GLOBAL_FONT_DB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

fn get_global_font_db() -> Arc<fontdb::Database> {
    GLOBAL_FONT_DB
        .get_or_init(|| {
            let mut font_db = fontdb::Database::new();
            font_db.load_system_fonts();
            tracing::info!("字体数据库初始化完成，共 {} 个字体面", font_db.len());
            Arc::new(font_db)
        })
        .clone()
}

/// 渲染运行时是否已完成惰性初始化（健康检查的附加信息字段）。
pub fn renderer_runtime_initialized() -> bool {
    GLOBAL_FONT_DB.get().is_some()
}

/// 基于 resvg/tiny-skia 的生产实现。
pub struct ResvgRenderer;

impl Default for ResvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgRenderer {
    pub fn new() -> Self {
        Self
    }

    fn parse_tree(&self, svg: &str) -> Result<usvg::Tree, AppError> {
        let opts = UsvgOptions {
            fontdb: get_global_font_db(),
            ..Default::default()
        };
        usvg::Tree::from_data(svg.as_bytes(), &opts)
            .map_err(|e| AppError::ConversionFailed(format!("Failed to parse SVG: {e}")))
    }
}

impl VectorRenderer for ResvgRenderer {
    fn intrinsic_size(&self, svg: &str) -> Option<NaturalDimensions> {
        let tree = self.parse_tree(svg).ok()?;
        let size = tree.size();
        Some(NaturalDimensions::new(
            size.width() as f64,
            size.height() as f64,
        ))
    }

    fn render(
        &self,
        svg: &str,
        target: ResolvedDimensions,
        background: Background,
    ) -> Result<Vec<u8>, AppError> {
        let tree = self.parse_tree(svg)?;
        let size = tree.size();

        // fit-to-width：以宽度推出统一缩放系数。调用方已按同一棵树的纵横比
        // 解析出高度，画布直接建在显式的 width×height 上，误差不超过一像素。
        let scale = target.width as f32 / size.width();

        let mut pixmap = Pixmap::new(target.width, target.height)
            .ok_or_else(|| AppError::ConversionFailed("Failed to create pixmap".to_string()))?;

        if background == Background::White {
            pixmap.fill(Color::WHITE);
        }

        render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        encode_png(&pixmap, target)
    }
}

/// 使用 png crate 进行快速编码（RGBA8）。
fn encode_png(pixmap: &Pixmap, target: ResolvedDimensions) -> Result<Vec<u8>, AppError> {
    let mut out = Vec::with_capacity((target.width * target.height * 4) as usize);
    {
        let mut encoder = png::Encoder::new(&mut out, target.width, target.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::ConversionFailed(format!("PNG write_header error: {e}")))?;
        writer
            .write_image_data(pixmap.data())
            .map_err(|e| AppError::ConversionFailed(format!("PNG write_image_data error: {e}")))?;
        writer
            .finish()
            .map_err(|e| AppError::ConversionFailed(format!("PNG finish error: {e}")))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{Background, ResvgRenderer, VectorRenderer, renderer_runtime_initialized};
    use crate::features::convert::dimensions::ResolvedDimensions;

    const RECT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><rect x="25" y="25" width="50" height="50" fill="#ff0000"/></svg>"##;
    const WIDE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="#00ff00"/></svg>"##;

    fn decode(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().expect("read png info");
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("decode frame");
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    #[test]
    fn intrinsic_size_reads_svg_dimensions() {
        let r = ResvgRenderer::new();
        let natural = r.intrinsic_size(WIDE_SVG).expect("intrinsic size");
        assert_eq!((natural.width, natural.height), (200.0, 100.0));
        assert!(renderer_runtime_initialized());
    }

    #[test]
    fn intrinsic_size_of_malformed_svg_is_none() {
        let r = ResvgRenderer::new();
        assert!(r.intrinsic_size("not an svg at all").is_none());
    }

    #[test]
    fn transparent_render_keeps_corner_alpha_zero() {
        let r = ResvgRenderer::new();
        let target = ResolvedDimensions { width: 512, height: 512 };
        let png = r
            .render(RECT_SVG, target, Background::Transparent)
            .expect("render");

        let (w, h, pixels) = decode(&png);
        assert_eq!((w, h), (512, 512));
        // 左上角在矩形之外，透明模式下 alpha 必须为 0
        assert_eq!(pixels[3], 0);
        // 中心像素落在红色矩形上
        let center = ((256 * 512 + 256) * 4) as usize;
        assert_eq!(&pixels[center..center + 2], &[255, 0]);
    }

    #[test]
    fn white_background_render_has_opaque_white_corner() {
        let r = ResvgRenderer::new();
        let target = ResolvedDimensions { width: 512, height: 512 };
        let png = r.render(RECT_SVG, target, Background::White).expect("render");

        let (w, h, pixels) = decode(&png);
        assert_eq!((w, h), (512, 512));
        assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn render_is_byte_for_byte_idempotent() {
        let r = ResvgRenderer::new();
        let target = ResolvedDimensions { width: 256, height: 256 };
        let a = r.render(RECT_SVG, target, Background::Transparent).expect("a");
        let b = r.render(RECT_SVG, target, Background::Transparent).expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_svg_surfaces_as_conversion_failed() {
        let r = ResvgRenderer::new();
        let target = ResolvedDimensions { width: 64, height: 64 };
        let err = r
            .render("<svg", target, Background::Transparent)
            .expect_err("malformed svg");
        assert!(matches!(err, crate::error::AppError::ConversionFailed(_)));
    }
}
