//! # Animation 模块
//!
//! 单条过渡时间轴。
//!
//! 核心设计：时间轴只产出 0.0 - 1.0 的进度，不关心被驱动的是什么属性；
//! 同一条时间轴可以同时驱动多个占位元素，保证它们同时开始、同时结束。

use super::EasingFunction;

/// 时间轴状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// 已创建，尚未收到第一帧
    #[default]
    Pending,
    /// 正在播放
    Running,
    /// 已到达终点
    Finished,
}

impl AnimationState {
    /// 是否为活跃状态（需要继续更新）
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

/// 过渡时间轴
///
/// 在 `duration_ms` 内把进度从 0 推进到 1。
///
/// 第一帧只锚定起始时间（进度保持 0），与显示刷新驱动的动画一致：
/// 动画开始的那一帧画出的就是起始姿态。
#[derive(Debug, Clone)]
pub struct Animation {
    /// 时长（毫秒）
    duration_ms: u32,
    /// 缓动函数
    easing: EasingFunction,
    /// 当前状态
    state: AnimationState,
    /// 自起始帧以来经过的时间（毫秒）
    elapsed_ms: f32,
    /// 当前进度（0.0 - 1.0，已应用缓动）
    progress: f32,
}

impl Animation {
    /// 创建时间轴
    pub fn new(duration_ms: u32, easing: EasingFunction) -> Self {
        Self {
            duration_ms,
            easing,
            state: AnimationState::Pending,
            elapsed_ms: 0.0,
            progress: 0.0,
        }
    }

    /// 推进一帧
    ///
    /// # 参数
    /// - `dt_ms`: 距上一帧的时间（毫秒），负值按 0 处理
    ///
    /// # 返回
    /// - `true`: 仍在进行中
    /// - `false`: 已结束
    pub fn update(&mut self, dt_ms: f32) -> bool {
        match self.state {
            AnimationState::Pending => {
                self.state = AnimationState::Running;
                self.settle()
            }
            AnimationState::Running => {
                self.elapsed_ms += dt_ms.max(0.0);
                self.settle()
            }
            AnimationState::Finished => false,
        }
    }

    fn settle(&mut self) -> bool {
        let fraction = self.fraction();
        if fraction >= 1.0 {
            self.progress = 1.0;
            self.state = AnimationState::Finished;
            false
        } else {
            self.progress = self.easing.apply(fraction);
            true
        }
    }

    /// 原始线性进度（未应用缓动）
    pub fn fraction(&self) -> f32 {
        if self.duration_ms == 0 {
            return if self.state == AnimationState::Pending {
                0.0
            } else {
                1.0
            };
        }
        (self.elapsed_ms / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// 当前进度（已应用缓动）
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn easing(&self) -> EasingFunction {
        self.easing
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state == AnimationState::Finished
    }
}
