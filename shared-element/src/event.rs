//! # Event 模块
//!
//! 根协调器发给宿主的重绘请求。

use crate::identity::ElementIdentity;

/// 宿主需要处理的事件
///
/// 宿主在每帧（或每次调用协调器之后）取出事件并安排重绘。
#[derive(Debug, Clone, PartialEq)]
pub enum RootEvent<K, S> {
    /// 某个键的过渡发生变化，覆盖层需要重绘
    ///
    /// 队列中至多有一个未取出的该事件。
    OverlayInvalidated,
    /// 过渡自然结束，对应元素需要重绘（恢复可见）
    ElementInvalidated(ElementIdentity<K, S>),
}
