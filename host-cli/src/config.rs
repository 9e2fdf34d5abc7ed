//! # Config 模块
//!
//! 演示宿主的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use shared_element::{SharedElementError, TransitionConfig};
use shared_element::config::MAX_DURATION_MS;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 共享元素过渡参数
    #[serde(default = "default_transition")]
    pub transition: TransitionConfig,

    /// 屏幕交叉淡化时长（毫秒）
    #[serde(default = "default_crossfade_ms")]
    pub crossfade_ms: u32,

    /// 模拟帧间隔（毫秒）
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: f32,

    /// 视口配置
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// 列表行高
    #[serde(default = "default_list_row_height")]
    pub list_row_height: f32,
}

/// 视口配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// 视口宽度
    #[serde(default = "default_viewport_width")]
    pub width: f32,

    /// 视口高度
    #[serde(default = "default_viewport_height")]
    pub height: f32,
}

// 默认值函数
fn default_transition() -> TransitionConfig {
    TransitionConfig::with_duration(1000)
}

fn default_crossfade_ms() -> u32 {
    1000
}

fn default_frame_interval_ms() -> f32 {
    16.0
}

fn default_list_row_height() -> f32 {
    72.0
}

fn default_viewport_width() -> f32 {
    360.0
}

fn default_viewport_height() -> f32 {
    640.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transition: default_transition(),
            crossfade_ms: default_crossfade_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            viewport: ViewportConfig::default(),
            list_row_height: default_list_row_height(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = ?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transition.validate()?;

        if self.crossfade_ms > MAX_DURATION_MS {
            return Err(ConfigError::ValidationFailed(format!(
                "crossfade_ms 必须不超过 {}",
                MAX_DURATION_MS
            )));
        }

        if !(self.frame_interval_ms > 0.0 && self.frame_interval_ms.is_finite()) {
            return Err(ConfigError::ValidationFailed(
                "frame_interval_ms 必须为正数".to_string(),
            ));
        }

        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "视口宽高必须为正数".to_string(),
            ));
        }

        if !(self.list_row_height > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "list_row_height 必须为正数".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误
///
/// 底层错误保留在 `source()` 链中，不拼进消息。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败")]
    SerializationFailed(#[from] serde_json::Error),
    /// IO 错误
    #[error("配置 IO 错误")]
    IoError(#[from] std::io::Error),
    /// 过渡参数无效
    #[error("过渡配置无效")]
    InvalidTransition(#[from] SharedElementError),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_element::EasingFunction;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.transition.duration_ms, 1000);
        assert_eq!(config.crossfade_ms, 1000);
        assert_eq!(config.viewport.width, 360.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let loaded: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "transition": { "easing": "linear" }, "viewport": { "height": 480 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.transition.easing, EasingFunction::Linear);
        assert_eq!(config.transition.duration_ms, 300);
        assert_eq!(config.viewport.width, 360.0);
        assert_eq!(config.viewport.height, 480.0);
        assert_eq!(config.list_row_height, 72.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.frame_interval_ms = 0.0;
        assert!(config.validate().is_err());
        config.frame_interval_ms = 16.0;

        config.list_row_height = -1.0;
        assert!(config.validate().is_err());
        config.list_row_height = 72.0;

        config.transition.duration_ms = MAX_DURATION_MS + 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTransition(_)));
        assert!(std::error::Error::source(&err).is_some());
        config.transition.duration_ms = 1000;

        config.crossfade_ms = MAX_DURATION_MS + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_save_keeps_io_source() {
        let path = std::env::temp_dir()
            .join("host-cli-config-test-missing-dir")
            .join("nested")
            .join("config.json");
        let err = AppConfig::default().save(&path).unwrap_err();

        let ConfigError::IoError(source) = &err else {
            panic!("意外错误: {:?}", err);
        };
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);

        // anyhow 的错误链里能看到底层 IO 错误
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert!(chain.starts_with("配置 IO 错误: "));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = AppConfig::load("definitely/not/here/config.json");
        assert_eq!(config, AppConfig::default());
    }
}
