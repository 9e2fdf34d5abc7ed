//! # Easing 模块
//!
//! 缓动函数库，用于过渡时间轴的插值。

use serde::{Deserialize, Serialize};

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// 线性（匀速）
    Linear,
    /// 二次缓入
    EaseInQuad,
    /// 二次缓出
    EaseOutQuad,
    /// 二次缓入缓出
    EaseInOutQuad,
    /// 三次缓入缓出
    EaseInOutCubic,
    /// 标准曲线：快出慢入，cubic-bezier(0.4, 0.0, 0.2, 1.0)
    #[default]
    FastOutSlowIn,
    /// 减速曲线：cubic-bezier(0.0, 0.0, 0.2, 1.0)
    LinearOutSlowIn,
    /// 加速曲线：cubic-bezier(0.4, 0.0, 1.0, 1.0)
    FastOutLinearIn,
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)，超出范围会被限制
    ///
    /// # 返回
    /// - 缓动后的进度值；`0.0` 和 `1.0` 精确映射到自身
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            EasingFunction::LinearOutSlowIn => cubic_bezier(0.0, 0.0, 0.2, 1.0, t),
            EasingFunction::FastOutLinearIn => cubic_bezier(0.4, 0.0, 1.0, 1.0, t),
        }
    }
}

/// 三次贝塞尔缓动
///
/// 控制点为 (0,0)、(x1,y1)、(x2,y2)、(1,1)。
/// 先对 x 求参数 s（牛顿迭代，失败时二分），再返回 y(s)。
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    let curve = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    let slope = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };

    let mut s = t;
    for _ in 0..8 {
        let error = curve(x1, x2, s) - t;
        if error.abs() < EPSILON {
            return curve(y1, y2, s);
        }
        let d = slope(x1, x2, s);
        if d.abs() < EPSILON {
            break;
        }
        s = (s - error / d).clamp(0.0, 1.0);
    }

    // 牛顿迭代不收敛时二分
    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    s = t;
    for _ in 0..32 {
        let x = curve(x1, x2, s);
        if (x - t).abs() < EPSILON {
            break;
        }
        if x < t {
            low = s;
        } else {
            high = s;
        }
        s = (low + high) / 2.0;
    }
    curve(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 8] = [
        EasingFunction::Linear,
        EasingFunction::EaseInQuad,
        EasingFunction::EaseOutQuad,
        EasingFunction::EaseInOutQuad,
        EasingFunction::EaseInOutCubic,
        EasingFunction::FastOutSlowIn,
        EasingFunction::LinearOutSlowIn,
        EasingFunction::FastOutLinearIn,
    ];

    #[test]
    fn test_linear() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_clamp() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for i in 1..=20 {
                let value = easing.apply(i as f32 / 20.0);
                assert!(value >= last - 1e-4, "{easing:?} at step {i}");
                last = value;
            }
        }
    }

    #[test]
    fn test_fast_out_slow_in_shape() {
        let easing = EasingFunction::FastOutSlowIn;
        // 前半程推进超过一半
        assert!(easing.apply(0.5) > 0.7);
        assert!(easing.apply(0.5) < 0.85);
        // 起步比线性慢
        assert!(easing.apply(0.1) < 0.1);
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&EasingFunction::FastOutSlowIn).unwrap();
        assert_eq!(json, "\"fast_out_slow_in\"");
    }
}
