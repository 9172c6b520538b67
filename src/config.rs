use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀
    #[serde(default = "ApiConfig::default_prefix")]
    pub prefix: String,
}

impl ApiConfig {
    fn default_prefix() -> String {
        "/api".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
        }
    }
}

/// 资源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// 插画静态资源基地址（HTTP）。请求体里的 `svgPath` 是站内相对路径
    /// （如 `/illustrations/work/laptop.svg`），拉取时与该基地址拼接。
    #[serde(default = "ResourcesConfig::default_asset_base_url")]
    pub asset_base_url: String,
}

impl ResourcesConfig {
    fn default_asset_base_url() -> String {
        "http://localhost:5173".to_string()
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            asset_base_url: Self::default_asset_base_url(),
        }
    }
}

/// PNG 转换配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// 单边尺寸硬上限（像素）。超出的请求在边界校验处直接拒绝，不做静默钳制。
    #[serde(default = "ConvertConfig::default_max_dimension")]
    pub max_dimension: u32,
    /// 客户端缓存时长（秒），写入 `Cache-Control: public, max-age=...`
    #[serde(default = "ConvertConfig::default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,
    /// 并行渲染上限（0 = CPU 核数）。渲染是 CPU 密集任务，需要限流。
    #[serde(default)]
    pub max_parallel: u32,
    /// 单次批量转换的最大条目数
    #[serde(default = "ConvertConfig::default_batch_max_items")]
    pub batch_max_items: usize,
}

impl ConvertConfig {
    fn default_max_dimension() -> u32 {
        2048
    }

    fn default_cache_max_age_secs() -> u64 {
        31_536_000
    }

    fn default_batch_max_items() -> usize {
        20
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_dimension: Self::default_max_dimension(),
            cache_max_age_secs: Self::default_cache_max_age_secs(),
            max_parallel: 0,
            batch_max_items: Self::default_batch_max_items(),
        }
    }
}

/// CORS 配置
///
/// 默认值即对外契约：任意来源、POST/OPTIONS、Content-Type。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default = "CorsConfig::default_enabled")]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// 允许的方法列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// 允许的请求头列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    /// 暴露的响应头列表（支持 "*" 表示任意）
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// 是否允许携带凭证（Cookie/Authorization）
    #[serde(default)]
    pub allow_credentials: bool,
    /// 预检缓存时间（秒）
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

impl CorsConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_allowed_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    fn default_allowed_methods() -> Vec<String> {
        vec!["POST".to_string(), "OPTIONS".to_string()]
    }

    fn default_allowed_headers() -> Vec<String> {
        vec!["Content-Type".to_string()]
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allowed_origins: Self::default_allowed_origins(),
            allowed_methods: Self::default_allowed_methods(),
            allowed_headers: Self::default_allowed_headers(),
            expose_headers: Vec::new(),
            allow_credentials: false,
            max_age_secs: None,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::builder()
            // 配置文件可选：缺失时全部走默认值（便于本地起服务与测试）
            .add_source(File::new("config", FileFormat::Toml).required(false))
            // 支持环境变量覆盖，例如：APP_SERVER_PORT
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get_or_init(|| {
            AppConfig::load().unwrap_or_else(|e| {
                tracing::warn!("配置加载失败，使用默认配置: {}", e);
                AppConfig::default()
            })
        })
    }

    /// 初始化全局配置（失败时报错，供 main 显式处理）
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        let _ = CONFIG.set(config);
        Ok(())
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
