//! # Transition 模块
//!
//! 单个逻辑键上的过渡值。
//!
//! ## 两种形态
//!
//! - `AwaitingEndGeometry`: 起始元素已知，结束元素已注册但还没有几何信息；
//!   覆盖层在起始元素的边界处静止绘制它的占位内容
//! - `InProgress`: 两端几何都已知，一条时间轴同时驱动两个占位元素：
//!
//! ```text
//! 起始占位: 起始位置/原尺寸/不透明  ──►  居中于结束边界/缩放到结束尺寸/透明
//! 结束占位: 居中于起始边界/缩放到起始尺寸/透明  ──►  结束位置/原尺寸/不透明
//! ```
//!
//! 两个占位元素同时开始、同时结束并交叉淡化；完成动作只在共享时间轴
//! 自然结束时触发一次。过渡被替换或取消时先 `cleanup()`，完成动作随之丢弃。

use std::fmt;

use tracing::debug;

use crate::animation::{Animation, LayerTrack, PlaceholderLayer};
use crate::config::TransitionConfig;
use crate::element::PositionedElement;
use crate::geometry::{Rect, Vec2};
use crate::identity::{ElementIdentity, ElementKey};

/// 过渡自然完成时要执行的动作
///
/// 完成回调以数据形式保存：清除过渡后，请宿主重绘触发过渡的元素。
#[derive(Debug, Clone, PartialEq)]
pub struct FinishAction<K, S> {
    /// 需要重绘的元素（结束元素）
    pub invalidate: ElementIdentity<K, S>,
}

/// 缩放比例，分母不是正的有限值时取 1
fn scale_ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator > 0.0 && denominator.is_finite() && numerator.is_finite() {
        numerator / denominator
    } else {
        1.0
    }
}

/// 计算起始、结束两个占位元素的轨迹
///
/// 宽或高为零的退化边界不会产生无穷大缩放：对应轴的缩放取 1。
pub fn placeholder_tracks(start: Rect, end: Rect) -> (LayerTrack, LayerTrack) {
    let start_track = LayerTrack::new(
        PlaceholderLayer::at(start.origin()),
        PlaceholderLayer::new(
            end.centered_origin(start.size()),
            Vec2::new(
                scale_ratio(end.width, start.width),
                scale_ratio(end.height, start.height),
            ),
            0.0,
        ),
    );
    let end_track = LayerTrack::new(
        PlaceholderLayer::new(
            start.centered_origin(end.size()),
            Vec2::new(
                scale_ratio(start.width, end.width),
                scale_ratio(start.height, end.height),
            ),
            0.0,
        ),
        PlaceholderLayer::at(end.origin()),
    );
    (start_track, end_track)
}

/// 进行中的过渡
pub struct InProgressTransition<K, S, C: ?Sized> {
    start: PositionedElement<K, S, C>,
    end: PositionedElement<K, S, C>,
    start_track: LayerTrack,
    end_track: LayerTrack,
    timeline: Animation,
    on_finished: Option<FinishAction<K, S>>,
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> InProgressTransition<K, S, C> {
    /// 在两个已定位元素之间创建过渡
    pub fn new(
        start: PositionedElement<K, S, C>,
        end: PositionedElement<K, S, C>,
        config: &TransitionConfig,
    ) -> Self {
        let (start_track, end_track) = placeholder_tracks(start.bounds, end.bounds);
        let on_finished = Some(FinishAction {
            invalidate: end.identity.clone(),
        });
        Self {
            start,
            end,
            start_track,
            end_track,
            timeline: Animation::new(config.duration_ms, config.easing),
            on_finished,
        }
    }

    pub fn start(&self) -> &PositionedElement<K, S, C> {
        &self.start
    }

    pub fn end(&self) -> &PositionedElement<K, S, C> {
        &self.end
    }

    pub fn duration_ms(&self) -> u32 {
        self.timeline.duration_ms()
    }

    /// 当前进度（已应用缓动）
    pub fn progress(&self) -> f32 {
        self.timeline.progress()
    }

    /// 起始占位元素当前的图层参数
    pub fn start_layer(&self) -> PlaceholderLayer {
        self.start_track.at(self.progress())
    }

    /// 结束占位元素当前的图层参数
    pub fn end_layer(&self) -> PlaceholderLayer {
        self.end_track.at(self.progress())
    }

    pub fn start_track(&self) -> &LayerTrack {
        &self.start_track
    }

    pub fn end_track(&self) -> &LayerTrack {
        &self.end_track
    }

    /// 共享时间轴是否已结束
    pub fn is_finished(&self) -> bool {
        self.timeline.is_finished()
    }

    /// 完成动作是否仍然有效（未被清理、未被触发）
    pub fn has_pending_finish(&self) -> bool {
        self.on_finished.is_some()
    }

    /// 推进一帧
    ///
    /// # 返回
    /// 时间轴在本帧到达终点且未被清理时返回完成动作；此后不再返回
    pub fn advance(&mut self, dt_ms: f32) -> Option<FinishAction<K, S>> {
        if self.timeline.update(dt_ms) {
            return None;
        }
        self.on_finished.take()
    }

    /// 清理：丢弃完成动作，之后即使时间轴结束也不会触发
    pub fn cleanup(&mut self) {
        if self.on_finished.take().is_some() {
            debug!(
                start = %self.start.identity,
                end = %self.end.identity,
                progress = self.progress(),
                "过渡被取代，完成回调已抑制"
            );
        }
    }
}

impl<K: fmt::Debug, S: fmt::Debug, C: ?Sized> fmt::Debug for InProgressTransition<K, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProgressTransition")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("timeline", &self.timeline)
            .field("on_finished", &self.on_finished)
            .finish_non_exhaustive()
    }
}

/// 过渡值
///
/// 由追踪器独占，每个逻辑键至多一个。
pub enum Transition<K, S, C: ?Sized> {
    /// 等待结束元素的几何信息
    AwaitingEndGeometry(PositionedElement<K, S, C>),
    /// 正在两个已定位元素之间插值
    InProgress(InProgressTransition<K, S, C>),
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> Transition<K, S, C> {
    /// 起始元素
    pub fn start_element(&self) -> &PositionedElement<K, S, C> {
        match self {
            Self::AwaitingEndGeometry(start) => start,
            Self::InProgress(transition) => transition.start(),
        }
    }

    pub fn is_awaiting_end_geometry(&self) -> bool {
        matches!(self, Self::AwaitingEndGeometry(_))
    }

    pub fn as_in_progress(&self) -> Option<&InProgressTransition<K, S, C>> {
        match self {
            Self::InProgress(transition) => Some(transition),
            Self::AwaitingEndGeometry(_) => None,
        }
    }

    /// 当前需要绘制的占位元素及其图层参数（绘制顺序）
    ///
    /// - 等待中：起始元素静止绘制在自身边界处
    /// - 进行中：先起始占位，后结束占位
    pub fn placeholders(&self) -> Vec<(&PositionedElement<K, S, C>, PlaceholderLayer)> {
        match self {
            Self::AwaitingEndGeometry(start) => {
                vec![(start, PlaceholderLayer::at(start.bounds.origin()))]
            }
            Self::InProgress(transition) => vec![
                (transition.start(), transition.start_layer()),
                (transition.end(), transition.end_layer()),
            ],
        }
    }

    /// 被替换或清除前调用
    pub fn cleanup(&mut self) {
        if let Self::InProgress(transition) = self {
            transition.cleanup();
        }
    }

    /// 形态名称（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingEndGeometry(_) => "AwaitingEndGeometry",
            Self::InProgress(_) => "InProgress",
        }
    }
}

impl<K: fmt::Debug, S: fmt::Debug, C: ?Sized> fmt::Debug for Transition<K, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingEndGeometry(start) => {
                f.debug_tuple("AwaitingEndGeometry").field(start).finish()
            }
            Self::InProgress(transition) => f.debug_tuple("InProgress").field(transition).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::EasingFunction;
    use std::rc::Rc;

    type TestElement = PositionedElement<&'static str, &'static str, str>;

    fn element(screen: &'static str, bounds: Rect) -> TestElement {
        PositionedElement::new(ElementIdentity::new("avatar", screen), Rc::from(screen), bounds)
    }

    fn linear(duration_ms: u32) -> TransitionConfig {
        TransitionConfig::with_duration(duration_ms).easing(EasingFunction::Linear)
    }

    #[test]
    fn test_tracks_start_and_end_poses() {
        let start = Rect::new(0.0, 0.0, 100.0, 100.0);
        let end = Rect::new(200.0, 50.0, 50.0, 50.0);
        let (start_track, end_track) = placeholder_tracks(start, end);

        // 进度 0：起始占位在原处，结束占位缩放到起始尺寸并居中
        let s0 = start_track.at(0.0);
        assert_eq!(s0.offset, Vec2::new(0.0, 0.0));
        assert_eq!(s0.scale, Vec2::one());
        assert_eq!(s0.alpha, 1.0);
        let e0 = end_track.at(0.0);
        assert_eq!(e0.offset, Vec2::new(25.0, 25.0));
        assert_eq!(e0.scale, Vec2::new(2.0, 2.0));
        assert_eq!(e0.alpha, 0.0);

        // 进度 1：角色互换
        let s1 = start_track.at(1.0);
        assert_eq!(s1.offset, Vec2::new(175.0, 25.0));
        assert_eq!(s1.scale, Vec2::new(0.5, 0.5));
        assert_eq!(s1.alpha, 0.0);
        let e1 = end_track.at(1.0);
        assert_eq!(e1.offset, Vec2::new(200.0, 50.0));
        assert_eq!(e1.scale, Vec2::one());
        assert_eq!(e1.alpha, 1.0);
    }

    #[test]
    fn test_degenerate_geometry_clamps_scale() {
        let start = Rect::new(0.0, 0.0, 0.0, 40.0);
        let end = Rect::new(10.0, 10.0, 80.0, 0.0);
        let (start_track, end_track) = placeholder_tracks(start, end);

        // 起始宽为 0：起始占位 x 轴缩放取 1
        assert_eq!(start_track.to.scale.x, 1.0);
        assert_eq!(start_track.to.scale.y, 0.0);
        // 结束高为 0：结束占位 y 轴缩放取 1
        assert_eq!(end_track.from.scale.x, 0.0);
        assert_eq!(end_track.from.scale.y, 1.0);

        for layer in [start_track.to, end_track.from] {
            assert!(layer.scale.x.is_finite() && layer.scale.y.is_finite());
        }
    }

    #[test]
    fn test_finish_fires_once() {
        let start = element("list", Rect::new(0.0, 0.0, 48.0, 48.0));
        let end = element("details", Rect::new(80.0, 200.0, 200.0, 200.0));
        let mut transition = InProgressTransition::new(start, end, &linear(100));

        assert!(transition.advance(16.0).is_none());
        assert!(transition.advance(50.0).is_none());
        assert!((transition.progress() - 0.5).abs() < 1e-6);

        let finish = transition.advance(50.0).expect("时间轴结束时应返回完成动作");
        assert_eq!(finish.invalidate, ElementIdentity::new("avatar", "details"));
        assert!(transition.is_finished());

        // 不会再次触发
        assert!(transition.advance(16.0).is_none());
        assert!(!transition.has_pending_finish());
    }

    #[test]
    fn test_cleanup_suppresses_finish() {
        let start = element("list", Rect::new(0.0, 0.0, 48.0, 48.0));
        let end = element("details", Rect::new(80.0, 200.0, 200.0, 200.0));
        let mut transition = InProgressTransition::new(start, end, &linear(100));

        transition.advance(0.0);
        transition.cleanup();
        assert!(transition.advance(200.0).is_none());
        assert!(transition.is_finished());
    }

    #[test]
    fn test_placeholders_order() {
        let start = element("list", Rect::new(16.0, 12.0, 48.0, 48.0));
        let awaiting: Transition<_, _, str> = Transition::AwaitingEndGeometry(start.clone());
        let items = awaiting.placeholders();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].1, PlaceholderLayer::at(Vec2::new(16.0, 12.0)));

        let end = element("details", Rect::new(80.0, 200.0, 200.0, 200.0));
        let running = Transition::InProgress(InProgressTransition::new(start, end, &linear(100)));
        let items = running.placeholders();
        assert_eq!(items.len(), 2);
        assert_eq!(*items[0].0.identity.screen_key(), "list");
        assert_eq!(*items[1].0.identity.screen_key(), "details");
        assert_eq!(items[1].1.alpha, 0.0);
    }
}
