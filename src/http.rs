use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

/// 全局复用的 HTTP Client（统一连接池/Keep-Alive），避免每次请求重复创建。
///
/// `Client` 本身是线程安全的，适合全局复用。上游 SVG 是小文件，
/// 统一使用 10s 超时的 client 拉取，避免慢源拖住渲染请求。
static CLIENT_SVG_FETCH: OnceCell<Client> = OnceCell::new();

/// timeout=10s 的 HTTP Client，用于拉取上游 SVG 源文件。
pub fn client_svg_fetch() -> Result<&'static Client, reqwest::Error> {
    CLIENT_SVG_FETCH
        .get_or_try_init(|| Client::builder().timeout(Duration::from_secs(10)).build())
}
