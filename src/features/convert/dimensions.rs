//! 尺寸解析：自然尺寸 + 请求边界 → 保持纵横比的目标栅格尺寸。
//!
//! 两种模式：
//! - `fit_within`：显式宽高边界（详情页 256/512/1024 预设走这条路径），
//!   结果完整落在边界内，至少一条边贴住边界；
//! - `clamp_to_ceiling`：单边上限（快捷复制默认路径），只缩不放。
//!
//! 纯函数，无 I/O，无失败分支。

/// 自然尺寸未知时的回退值（宽高各 512）。
pub const DEFAULT_NATURAL_SIZE: f64 = 512.0;

/// 源图像的固有尺寸。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalDimensions {
    pub width: f64,
    pub height: f64,
}

impl NaturalDimensions {
    /// 512×512 回退值。
    pub const FALLBACK: Self = Self {
        width: DEFAULT_NATURAL_SIZE,
        height: DEFAULT_NATURAL_SIZE,
    };

    /// 非正数/NaN 一律回退到 512，保证后续缩放不会除零。
    pub fn new(width: f64, height: f64) -> Self {
        let sanitize = |v: f64| {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                DEFAULT_NATURAL_SIZE
            }
        };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }
}

/// 解析后的输出栅格尺寸，每边 ≥ 1。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDimensions {
    pub width: u32,
    pub height: u32,
}

/// 模式一：显式宽高边界。
///
/// `scale = min(bw/nw, bh/nh)`，输出完整收进边界且保持纵横比；
/// 非方形源在方形边界下必有一条边小于边界。
pub fn fit_within(natural: NaturalDimensions, bound_width: u32, bound_height: u32) -> ResolvedDimensions {
    let scale_w = bound_width as f64 / natural.width;
    let scale_h = bound_height as f64 / natural.height;
    let scale = scale_w.min(scale_h);

    ResolvedDimensions {
        width: round_at_least_one(natural.width * scale),
        height: round_at_least_one(natural.height * scale),
    }
}

/// 模式二：单边上限。
///
/// 仅当最长边超过上限时等比缩小，否则原样返回；从不放大。
pub fn clamp_to_ceiling(natural: NaturalDimensions, ceiling: u32) -> ResolvedDimensions {
    let largest_side = natural.width.max(natural.height);
    let scale = if largest_side > ceiling as f64 {
        ceiling as f64 / largest_side
    } else {
        1.0
    };

    ResolvedDimensions {
        width: round_at_least_one(natural.width * scale),
        height: round_at_least_one(natural.height * scale),
    }
}

fn round_at_least_one(v: f64) -> u32 {
    (v.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::{NaturalDimensions, clamp_to_ceiling, fit_within};

    #[test]
    fn fit_within_fills_at_least_one_axis() {
        let cases = [
            (512.0, 512.0, 256, 256),
            (800.0, 600.0, 512, 512),
            (600.0, 800.0, 1024, 1024),
            (1920.0, 1080.0, 512, 512),
            (37.0, 113.0, 256, 256),
        ];
        for (nw, nh, bw, bh) in cases {
            let r = fit_within(NaturalDimensions::new(nw, nh), bw, bh);
            assert!(r.width <= bw && r.height <= bh, "{nw}x{nh} into {bw}x{bh}");
            assert!(
                r.width == bw || r.height == bh,
                "expected box filled on one axis: {r:?}"
            );
        }
    }

    #[test]
    fn fit_within_preserves_aspect_ratio_within_rounding() {
        let r = fit_within(NaturalDimensions::new(1920.0, 1080.0), 512, 512);
        assert_eq!(r.width, 512);
        // 512 * 1080/1920 = 288
        assert_eq!(r.height, 288);
        let expected = 512.0 * 1080.0 / 1920.0;
        assert!((r.height as f64 - expected).abs() <= 1.0);
    }

    #[test]
    fn fit_within_can_upscale_small_sources() {
        let r = fit_within(NaturalDimensions::new(100.0, 50.0), 1024, 1024);
        assert_eq!(r.width, 1024);
        assert_eq!(r.height, 512);
    }

    #[test]
    fn fit_within_never_produces_zero() {
        let r = fit_within(NaturalDimensions::new(4096.0, 2.0), 1, 1);
        assert!(r.width >= 1 && r.height >= 1);
    }

    #[test]
    fn zero_or_invalid_naturals_fall_back_to_512() {
        assert_eq!(NaturalDimensions::new(0.0, 300.0).width, 512.0);
        assert_eq!(NaturalDimensions::new(f64::NAN, -5.0), NaturalDimensions::FALLBACK);

        // 回退后仍可正常解析，不会除零。
        let r = fit_within(NaturalDimensions::new(0.0, 0.0), 256, 256);
        assert_eq!((r.width, r.height), (256, 256));
    }

    #[test]
    fn ceiling_leaves_small_sources_untouched() {
        for (nw, nh) in [(512.0, 512.0), (2048.0, 1024.0), (33.0, 41.0)] {
            let r = clamp_to_ceiling(NaturalDimensions::new(nw, nh), 2048);
            assert_eq!((r.width, r.height), (nw as u32, nh as u32));
        }
    }

    #[test]
    fn ceiling_shrinks_oversized_sources_to_exactly_the_cap() {
        let r = clamp_to_ceiling(NaturalDimensions::new(4096.0, 1024.0), 2048);
        assert_eq!(r.width.max(r.height), 2048);
        assert_eq!((r.width, r.height), (2048, 512));

        let r = clamp_to_ceiling(NaturalDimensions::new(3000.0, 5000.0), 2048);
        assert_eq!(r.height, 2048);
        // 3000 * 2048/5000 = 1228.8 → 1229
        assert_eq!(r.width, 1229);
        let ratio_in = 3000.0 / 5000.0;
        let ratio_out = r.width as f64 / r.height as f64;
        assert!((ratio_in - ratio_out).abs() < 0.001);
    }

    #[test]
    fn ceiling_never_upscales() {
        let r = clamp_to_ceiling(NaturalDimensions::new(16.0, 16.0), 2048);
        assert_eq!((r.width, r.height), (16, 16));
    }

    #[test]
    fn non_square_sources_stay_non_square() {
        let r = fit_within(NaturalDimensions::new(200.0, 100.0), 512, 512);
        assert_ne!(r.width, r.height);
    }
}
