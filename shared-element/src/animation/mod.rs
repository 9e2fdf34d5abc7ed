//! # Animation 模块
//!
//! 驱动共享元素过渡的最小动画原语。
//!
//! ## 核心概念
//!
//! - `Animation`: 一条时间轴，只产出 0.0 - 1.0 的进度
//! - `EasingFunction`: 缓动函数
//! - `PlaceholderLayer`: 占位元素某一时刻的平移、缩放、透明度
//! - `LayerTrack`: 占位元素从起始姿态到结束姿态的轨迹
//!
//! 过渡把同一条时间轴的进度同时喂给起始、结束两条轨迹，
//! 宿主每帧读取当前图层参数并绘制。

mod animation;
mod easing;
mod layer;

pub use animation::{Animation, AnimationState};
pub use easing::EasingFunction;
pub use layer::{LayerTrack, PlaceholderLayer};
