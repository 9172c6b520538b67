use axum::{Router, routing::get};
use doodle_backend::cors::build_cors_layer;
use doodle_backend::features::{convert, health};
use doodle_backend::{AppConfig, AppState, shutdown};
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn compression_predicate() -> impl tower_http::compression::predicate::Predicate {
    use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};

    // 压缩策略：明确排除不该压缩的响应。
    //
    // - PNG 响应本身已压缩，再套 gzip 只浪费 CPU；
    // - 二进制下载类型同理；
    // - 保留默认的最小大小阈值（32B），避免压缩开销覆盖收益。
    SizeAbove::default()
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::const_new("application/octet-stream"))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        doodle_backend::features::convert::handler::convert_png,
        doodle_backend::features::convert::handler::convert_png_batch,
        doodle_backend::features::health::handler::health_check,
    ),
    components(
        schemas(
            doodle_backend::error::ErrorBody,
            doodle_backend::error::FieldError,
            doodle_backend::features::convert::RawConversionRequest,
            doodle_backend::features::convert::BatchConvertItem,
            doodle_backend::features::convert::SizePreset,
            doodle_backend::features::health::HealthResponse,
        )
    ),
    tags(
        (name = "Convert", description = "SVG→PNG conversion APIs"),
        (name = "Health", description = "Health APIs"),
    ),
    info(
        title = "Doodle Backend API",
        version = "0.1.0",
        description = "Illustration catalog SVG→PNG conversion service (Axum)"
    )
)]
pub struct ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doodle_backend=info,tower_http=info".into()),
        )
        .init();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    let app_state = AppState::from_config(config);

    // Routes
    let api_router = Router::<AppState>::new()
        .merge(convert::create_convert_router())
        .route("/health", get(health::health_check));

    let mut app = Router::<AppState>::new()
        .nest(&config.api.prefix, api_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // CORS：默认即对外契约（* / POST,OPTIONS / Content-Type）
    if let Some(cors_layer) = build_cors_layer(&config.cors) {
        app = app.layer(cors_layer);
    }

    // 应用内响应压缩：JSON/文本受益，PNG 响应被谓词排除。
    app = app.layer(CompressionLayer::new().compress_when(compression_predicate()));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}{}/health", addr, config.api.prefix);
    tracing::info!("Convert API: http://{}{}/png-convert", addr, config.api.prefix);
    tracing::info!("Asset base: {}", config.resources.asset_base_url);

    // 运行服务器直到收到退出信号；在途渲染请求自然收尾。
    let graceful = axum::serve(listener, app).with_graceful_shutdown(shutdown::shutdown_signal());

    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {}", e);
        std::process::exit(1);
    }

    tracing::info!("服务器已优雅关闭");
}
