//! # Container 模块
//!
//! 共享元素包装器的布局约定：至多一个直接子元素。

use crate::error::{SharedElementError, SharedElementResult};
use crate::geometry::Size;

/// 计算包装器的尺寸
///
/// - 没有子元素：不是错误，按最小约束布局（空边界）
/// - 一个子元素：取子元素尺寸（不小于最小约束）
/// - 多个子元素：几何无法确定，立即报错
pub fn container_size(min: Size, children: &[Size]) -> SharedElementResult<Size> {
    match children {
        [] => Ok(min),
        [child] => Ok(Size::new(
            child.width.max(min.width),
            child.height.max(min.height),
        )),
        _ => Err(SharedElementError::MultipleChildren {
            count: children.len(),
        }),
    }
}
