//! # Overlay 模块
//!
//! 过渡覆盖层：把当前所有过渡展开成一份显示列表，交给宿主绘制。
//!
//! 覆盖层画在正常内容之上。等待中的过渡只画起始占位元素；
//! 进行中的过渡先画起始占位、再画结束占位，两者交叉淡化。

use std::fmt;
use std::rc::Rc;

use crate::animation::PlaceholderLayer;
use crate::geometry::Rect;
use crate::identity::{ElementIdentity, ElementKey};
use crate::root::RootCoordinator;

/// 宿主提供的绘制原语
///
/// 需要支持：绘制任意内容、平移、非均匀缩放（以内容中心为原点）和透明度。
pub trait Canvas<C: ?Sized> {
    /// 绘制一个占位元素
    ///
    /// `bounds` 是内容未缩放时的布局边界（左上角即 `layer.offset`）。
    fn draw_placeholder(&mut self, content: &C, bounds: Rect, layer: &PlaceholderLayer);
}

/// 显示列表中的一项
pub struct OverlayItem<K, S, C: ?Sized> {
    /// 占位元素来自哪个实例
    pub identity: ElementIdentity<K, S>,
    /// 绘制内容
    pub placeholder: Rc<C>,
    /// 未缩放的布局边界（左上角已移到 `layer.offset`）
    pub bounds: Rect,
    pub layer: PlaceholderLayer,
}

impl<K, S, C: ?Sized> OverlayItem<K, S, C> {
    /// 应用缩放后实际覆盖的区域
    pub fn drawn_rect(&self) -> Rect {
        self.layer.drawn_rect(self.bounds.size())
    }
}

impl<K: fmt::Debug, S: fmt::Debug, C: ?Sized> fmt::Debug for OverlayItem<K, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayItem")
            .field("identity", &self.identity)
            .field("bounds", &self.bounds)
            .field("layer", &self.layer)
            .finish_non_exhaustive()
    }
}

/// 生成当前显示列表（按追踪器创建顺序）
pub fn overlay_items<K: ElementKey, S: ElementKey, C: ?Sized>(
    coordinator: &RootCoordinator<K, S, C>,
) -> Vec<OverlayItem<K, S, C>> {
    coordinator
        .active_transitions()
        .into_iter()
        .flat_map(|(_, transition)| transition.placeholders())
        .map(|(element, layer)| OverlayItem {
            identity: element.identity.clone(),
            placeholder: Rc::clone(&element.placeholder),
            bounds: Rect::from_origin_size(layer.offset, element.bounds.size()),
            layer,
        })
        .collect()
}

/// 绘制覆盖层
///
/// # 返回
/// 绘制的占位元素数量
pub fn render_overlay<K: ElementKey, S: ElementKey, C: ?Sized>(
    coordinator: &RootCoordinator<K, S, C>,
    canvas: &mut impl Canvas<C>,
) -> usize {
    let items = overlay_items(coordinator);
    for item in &items {
        canvas.draw_placeholder(&item.placeholder, item.bounds, &item.layer);
    }
    items.len()
}
