//! # FrameQueue 模块
//!
//! 按令牌去重的单帧延迟队列。
//!
//! 两个屏幕交叉淡入淡出时，旧屏元素的卸载和新屏元素的挂载顺序不确定。
//! 卸载通知因此不立即生效，而是推迟到下一次显示刷新：
//!
//! ```text
//! post(token)    -> 下一帧到期（已挂起时为 no-op）
//! remove(token)  -> 取消挂起项，无副作用
//! take_due()     -> 宿主在每帧开始时取出全部到期令牌
//! clear()        -> 丢弃全部挂起项，不执行
//! ```
//!
//! 队列只保存令牌，到期后要做什么由持有者决定；
//! 这样它与宿主提供的具体刷新原语无关。

use tracing::trace;

/// 单帧延迟队列
///
/// 每个令牌至多挂起一次，保持投递顺序。
#[derive(Debug, Clone)]
pub struct FrameQueue<T> {
    pending: Vec<T>,
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T: PartialEq + std::fmt::Debug> FrameQueue<T> {
    /// 创建空队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 安排令牌在下一帧到期
    ///
    /// # 返回
    /// - `true`: 新安排
    /// - `false`: 该令牌已挂起，本次调用无效果
    pub fn post(&mut self, token: T) -> bool {
        if self.contains(&token) {
            trace!(token = ?token, "令牌已挂起，忽略重复投递");
            return false;
        }
        trace!(token = ?token, "安排下一帧执行");
        self.pending.push(token);
        true
    }

    /// 取消挂起的令牌
    ///
    /// # 返回
    /// 令牌此前是否处于挂起状态
    pub fn remove(&mut self, token: &T) -> bool {
        match self.pending.iter().position(|t| t == token) {
            Some(index) => {
                trace!(token = ?token, "取消挂起令牌");
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    /// 令牌是否挂起
    pub fn contains(&self, token: &T) -> bool {
        self.pending.iter().any(|t| t == token)
    }

    /// 挂起数量
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 取出本帧到期的全部令牌（按投递顺序）
    ///
    /// 处理到期令牌期间再投递的令牌属于下一帧。
    pub fn take_due(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }

    /// 丢弃全部挂起令牌
    ///
    /// # 返回
    /// 被丢弃的数量
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}
