use sha2::{Digest, Sha256};

/// ETag 摘要长度（十六进制字符数）。
const ETAG_HEX_LEN: usize = 16;

/// 基于请求参数生成缓存校验摘要：`sha256("{svgPath}-{width}x{height}")`
/// 的前 16 个十六进制字符。
///
/// 注意：这是对请求参数的摘要，不是对渲染产物的内容哈希——同一路径下
/// 源 SVG 变更后，客户端缓存副本在 max-age 窗口内仍被视为有效。
/// 这是既有行为，按产品口径保留（截断到 64 bit 对缓存校验器而言
/// 碰撞概率可接受，不用于安全场景）。
pub fn etag_for(svg_path: &str, width: u32, height: u32) -> String {
    let input = format!("{svg_path}-{width}x{height}");
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(ETAG_HEX_LEN);
    hex
}
