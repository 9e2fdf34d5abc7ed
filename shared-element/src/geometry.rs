//! # Geometry 模块
//!
//! 元素布局几何：二维向量、尺寸与矩形。
//!
//! 所有坐标均为逻辑像素，原点在左上角，y 轴向下。

use serde::{Deserialize, Serialize};

/// 二维向量
///
/// 既用于位置偏移，也用于非均匀缩放因子。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 单位缩放 (1, 1)
    pub const fn one() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    /// 线性插值
    ///
    /// 端点精确：`t <= 0` 返回 `self`，`t >= 1` 返回 `other`。
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: lerp_f32(self.x, other.x, t),
            y: lerp_f32(self.y, other.y, t),
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 端点精确的标量插值
pub(crate) fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    if t <= 0.0 {
        from
    } else if t >= 1.0 {
        to
    } else {
        from + (to - from) * t
    }
}

/// 尺寸
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// 创建新的尺寸
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// 零尺寸
    pub const fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// 矩形（左上角 + 尺寸）
///
/// 元素的布局边界。创建后不可变，重新布局时整体替换。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// 创建新的矩形
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// 由左上角和尺寸创建
    pub const fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// 左上角
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// 尺寸
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// 平移
    pub fn translate(self, offset: Vec2) -> Self {
        Self::new(
            self.left + offset.x,
            self.top + offset.y,
            self.width,
            self.height,
        )
    }

    /// 是否与另一个矩形相交
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// 让 `content` 尺寸的内容居中放入本矩形时的左上角
    ///
    /// 内容比本矩形大时结果在本矩形左上方。
    pub fn centered_origin(&self, content: Size) -> Vec2 {
        Vec2::new(
            self.left + (self.width - content.width) / 2.0,
            self.top + (self.height - content.height) / 2.0,
        )
    }
}

/// 计算相对根表面的元素边界
///
/// - 有根表面：减去根表面的偏移
/// - 无根表面（生命周期早期）：原样返回元素自身上报的绝对边界
pub fn root_relative_bounds(bounds: Rect, root: Option<&Rect>) -> Rect {
    match root {
        Some(root) => bounds.translate(Vec2::zero() - root.origin()),
        None => bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_relative_bounds() {
        let element = Rect::new(120.0, 340.0, 48.0, 48.0);
        let root = Rect::new(20.0, 40.0, 360.0, 640.0);

        let relative = root_relative_bounds(element, Some(&root));
        assert_eq!(relative, Rect::new(100.0, 300.0, 48.0, 48.0));

        // 没有根表面时原样返回
        assert_eq!(root_relative_bounds(element, None), element);
    }

    #[test]
    fn test_centered_origin() {
        let target = Rect::new(200.0, 50.0, 50.0, 50.0);
        let origin = target.centered_origin(Size::new(100.0, 100.0));
        assert_eq!(origin, Vec2::new(175.0, 25.0));

        let target = Rect::new(0.0, 0.0, 100.0, 100.0);
        let origin = target.centered_origin(Size::new(50.0, 50.0));
        assert_eq!(origin, Vec2::new(25.0, 25.0));
    }

    #[test]
    fn test_vec2_lerp_endpoints() {
        let a = Vec2::new(0.1, 0.7);
        let b = Vec2::new(175.3, 25.9);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let mid = Vec2::new(0.0, 0.0).lerp(Vec2::new(10.0, 20.0), 0.5);
        assert_eq!(mid, Vec2::new(5.0, 10.0));
    }

    #[test]
    fn test_rect_intersects() {
        let viewport = Rect::new(0.0, 0.0, 360.0, 640.0);
        assert!(Rect::new(16.0, 600.0, 48.0, 48.0).intersects(&viewport));
        assert!(!Rect::new(16.0, 640.0, 48.0, 48.0).intersects(&viewport));
    }
}
