//! # Config 模块
//!
//! 过渡参数配置。
//!
//! 所有字段都有默认值，反序列化时缺省字段取默认值。

use serde::{Deserialize, Serialize};

use crate::animation::EasingFunction;
use crate::error::{SharedElementError, SharedElementResult};

/// 过渡时长上限（毫秒）
pub const MAX_DURATION_MS: u32 = 60_000;

/// 过渡配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// 过渡时长（毫秒）
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,

    /// 缓动函数
    #[serde(default)]
    pub easing: EasingFunction,
}

fn default_duration_ms() -> u32 {
    300
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: EasingFunction::default(),
        }
    }
}

impl TransitionConfig {
    /// 指定时长，其余取默认值
    pub fn with_duration(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    /// 设置缓动函数
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> SharedElementResult<()> {
        if self.duration_ms > MAX_DURATION_MS {
            return Err(SharedElementError::InvalidConfig {
                message: format!(
                    "duration_ms 必须不超过 {}，实际为 {}",
                    MAX_DURATION_MS, self.duration_ms
                ),
            });
        }
        Ok(())
    }
}
