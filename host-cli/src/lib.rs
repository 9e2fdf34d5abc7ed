//! # Host CLI
//!
//! 无界面宿主：在模拟帧时钟上运行 用户列表 ⇄ 用户详情 演示，
//! 每帧把实时元素和过渡覆盖层记录到文本画布。
//!
//! ## 模块结构
//!
//! - [`config`]：应用配置（JSON）
//! - [`canvas`]：演示内容与文本画布
//! - [`sample`]：演示应用（懒加载列表、交叉淡化、切屏前 prepare）

pub mod canvas;
pub mod config;
pub mod sample;

pub use canvas::{SampleContent, TextCanvas, TextStyle};
pub use config::{AppConfig, ConfigError, ViewportConfig};
pub use sample::{FrameReport, SampleApp, SampleKey, Screen, USERS, User};
