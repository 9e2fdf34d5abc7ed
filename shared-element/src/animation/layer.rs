//! # Layer 模块
//!
//! 占位元素的图层参数：平移、非均匀缩放与透明度。

use crate::geometry::{Rect, Size, Vec2, lerp_f32};

/// 占位图层参数
///
/// - `offset`: 未缩放内容的左上角（相对根表面）
/// - `scale`: 以内容自身中心为原点的缩放因子
/// - `alpha`: 透明度 (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderLayer {
    pub offset: Vec2,
    pub scale: Vec2,
    pub alpha: f32,
}

impl Default for PlaceholderLayer {
    fn default() -> Self {
        Self {
            offset: Vec2::zero(),
            scale: Vec2::one(),
            alpha: 1.0,
        }
    }
}

impl PlaceholderLayer {
    /// 创建图层参数
    pub fn new(offset: Vec2, scale: Vec2, alpha: f32) -> Self {
        Self {
            offset,
            scale,
            alpha,
        }
    }

    /// 静止放置在 `offset` 处（无缩放、完全不透明）
    pub fn at(offset: Vec2) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// 线性插值到另一组参数
    ///
    /// 端点精确：`t <= 0` 返回 `self`，`t >= 1` 返回 `other`。
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            offset: self.offset.lerp(other.offset, t),
            scale: self.scale.lerp(other.scale, t),
            alpha: lerp_f32(self.alpha, other.alpha, t).clamp(0.0, 1.0),
        }
    }

    /// `size` 尺寸的内容按本图层绘制后实际覆盖的区域
    pub fn drawn_rect(&self, size: Size) -> Rect {
        let scaled = Size::new(size.width * self.scale.x, size.height * self.scale.y);
        let origin = Rect::from_origin_size(self.offset, size).centered_origin(scaled);
        Rect::from_origin_size(origin, scaled)
    }
}

/// 一个占位元素从起始姿态到结束姿态的轨迹
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTrack {
    pub from: PlaceholderLayer,
    pub to: PlaceholderLayer,
}

impl LayerTrack {
    pub fn new(from: PlaceholderLayer, to: PlaceholderLayer) -> Self {
        Self { from, to }
    }

    /// 取进度 `progress` 处的图层参数
    pub fn at(&self, progress: f32) -> PlaceholderLayer {
        self.from.lerp(&self.to, progress)
    }
}
