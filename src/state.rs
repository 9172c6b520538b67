use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::features::convert::renderer::{ResvgRenderer, VectorRenderer};
use crate::features::convert::source::SvgSource;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 矢量渲染能力（注入接口，测试中可替换为假渲染器）
    pub renderer: Arc<dyn VectorRenderer>,
    /// 上游 SVG 源（按 `svgPath` 拉取源文件）
    pub svg_source: Arc<SvgSource>,
    /// 控制并发渲染的信号量（限制 CPU 密集型任务数量）
    pub render_semaphore: Arc<Semaphore>,
}

impl AppState {
    /// 按配置构建生产状态（resvg 渲染器 + HTTP 源）。
    pub fn from_config(config: &AppConfig) -> Self {
        let max_parallel = {
            let m = config.convert.max_parallel as usize;
            if m == 0 { num_cpus::get() } else { m }
        };

        Self {
            renderer: Arc::new(ResvgRenderer::new()),
            svg_source: Arc::new(SvgSource::new(config.resources.asset_base_url.clone())),
            render_semaphore: Arc::new(Semaphore::new(max_parallel)),
        }
    }

    /// 自定义各组件的构建入口（集成测试注入假渲染器/本地源时使用）。
    pub fn with_parts(
        renderer: Arc<dyn VectorRenderer>,
        svg_source: Arc<SvgSource>,
        max_parallel: usize,
    ) -> Self {
        Self {
            renderer,
            svg_source,
            render_semaphore: Arc::new(Semaphore::new(max_parallel.max(1))),
        }
    }
}
