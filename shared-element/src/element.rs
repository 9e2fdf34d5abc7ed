//! # Element 模块
//!
//! 已定位的共享元素：身份 + 占位渲染器 + 相对根表面的边界。

use std::fmt;
use std::rc::Rc;

use crate::geometry::Rect;
use crate::identity::ElementIdentity;

/// 已定位的共享元素
///
/// 元素上报布局位置时创建，创建后不可变。
/// 同一身份重新布局时会生成新的值替换旧值，而不是原地修改。
///
/// `C` 是宿主定义的占位内容类型（可以是 `dyn Fn(..)` 之类的 unsized 类型），
/// 覆盖层通过 [`Canvas`](crate::overlay::Canvas) 把它交回宿主绘制。
pub struct PositionedElement<K, S, C: ?Sized> {
    /// 实例标识
    pub identity: ElementIdentity<K, S>,
    /// 过渡期间覆盖层绘制的内容
    pub placeholder: Rc<C>,
    /// 相对根表面的边界
    pub bounds: Rect,
}

impl<K, S, C: ?Sized> PositionedElement<K, S, C> {
    /// 创建已定位元素
    pub fn new(identity: ElementIdentity<K, S>, placeholder: Rc<C>, bounds: Rect) -> Self {
        Self {
            identity,
            placeholder,
            bounds,
        }
    }
}

impl<K: Clone, S: Clone, C: ?Sized> Clone for PositionedElement<K, S, C> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            placeholder: Rc::clone(&self.placeholder),
            bounds: self.bounds,
        }
    }
}

impl<K: fmt::Debug, S: fmt::Debug, C: ?Sized> fmt::Debug for PositionedElement<K, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionedElement")
            .field("identity", &self.identity)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
