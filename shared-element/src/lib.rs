//! # Shared Element
//!
//! 共享元素过渡的核心库。
//!
//! ## 架构概述
//!
//! 同一个逻辑对象（例如列表里的头像和详情页里的大头像）出现在两个屏幕上时，
//! 切换屏幕会让旧屏上的元素平移、缩放、淡出到新屏对应元素的位置，
//! 新屏元素同时从旧位置淡入，完成后撤掉过渡、恢复正常布局。
//!
//! 本库是纯逻辑核心，不依赖任何 UI 框架。宿主把元素生命周期事件交给根协调器，
//! 每帧驱动一次，再按显示列表绘制覆盖层：
//!
//! ```text
//! Host                                   RootCoordinator
//!   │── register / layout / dispose ──►│ 按逻辑键分发给 Tracker
//!   │── on_frame(dt) ──────────────────►│ 延迟卸载生效 + 推进过渡
//!   │◄── RootEvent ─────────────────────│ 重绘覆盖层 / 恢复元素
//!   │◄── overlay_items() ───────────────│ 占位元素 + 图层参数
//! ```
//!
//! ## 核心类型
//!
//! - [`Tracker`]：单个逻辑键的状态机
//! - [`Transition`]：等待结束几何 / 进行中
//! - [`RootCoordinator`]：所有事件的入口，持有全部追踪器
//! - [`SharedElementsRoot`] / [`ElementHandle`]：宿主使用的句柄 API
//! - [`FrameQueue`]：单帧延迟的卸载队列
//!
//! ## 模块结构
//!
//! - [`geometry`]：矩形、尺寸与相对根表面的坐标换算
//! - [`identity`]：实例身份
//! - [`animation`]：时间轴、缓动与图层轨迹
//! - [`tracker`] / [`transition`]：状态机与过渡值
//! - [`root`] / [`scope`]：协调器与句柄
//! - [`overlay`]：覆盖层显示列表
//! - [`container`]：包装器布局约定

pub mod animation;
pub mod config;
pub mod container;
pub mod element;
pub mod error;
pub mod event;
pub mod frame_queue;
pub mod geometry;
pub mod identity;
pub mod overlay;
pub mod root;
pub mod scope;
pub mod tracker;
pub mod transition;

// 重导出核心类型
pub use animation::{Animation, AnimationState, EasingFunction, LayerTrack, PlaceholderLayer};
pub use config::TransitionConfig;
pub use container::container_size;
pub use element::PositionedElement;
pub use error::{SharedElementError, SharedElementResult};
pub use event::RootEvent;
pub use frame_queue::FrameQueue;
pub use geometry::{Rect, Size, Vec2, root_relative_bounds};
pub use identity::{ElementIdentity, ElementKey};
pub use overlay::{Canvas, OverlayItem, overlay_items, render_overlay};
pub use root::RootCoordinator;
pub use scope::{ElementHandle, SharedElementsRoot};
pub use tracker::{Tracker, TrackerEvent, TrackerState};
pub use transition::{FinishAction, InProgressTransition, Transition, placeholder_tracks};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_public_api_accessible() {
        let root: SharedElementsRoot<u32, &'static str, str> =
            SharedElementsRoot::new(TransitionConfig::default()).unwrap();
        let handle = root
            .register_element(ElementIdentity::new(1, "list"), Rc::from("avatar"))
            .unwrap();
        handle.on_layout(Rect::new(0.0, 0.0, 48.0, 48.0)).unwrap();
        assert!(!handle.should_hide().unwrap());
        assert!(root.overlay_items().is_empty());
    }
}
