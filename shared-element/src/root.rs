//! # Root 模块
//!
//! 根协调器：所有共享元素事件的唯一入口。
//!
//! ## 职责
//!
//! - 按逻辑键惰性创建追踪器，追踪器回到 `Empty` 时回收
//! - 把元素上报的绝对边界换算为相对根表面的边界
//! - 卸载通知延迟一帧生效；同一身份在此之前重新挂载则取消卸载
//! - 汇总追踪器事件，转成宿主可处理的重绘请求
//!
//! ## 帧循环
//!
//! ```text
//! on_frame(dt)
//!   1. 取出到期的卸载通知，依次交给对应追踪器
//!   2. 推进所有进行中的过渡
//!   3. 宿主 drain_events() 后重绘
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::config::TransitionConfig;
use crate::element::PositionedElement;
use crate::error::{SharedElementError, SharedElementResult};
use crate::event::RootEvent;
use crate::frame_queue::FrameQueue;
use crate::geometry::{Rect, root_relative_bounds};
use crate::identity::{ElementIdentity, ElementKey};
use crate::tracker::{Tracker, TrackerEvent};
use crate::transition::Transition;

/// 已挂载元素的内容
struct MountedContent<C: ?Sized> {
    content: Rc<C>,
    placeholder: Option<Rc<C>>,
}

impl<C: ?Sized> MountedContent<C> {
    /// 过渡期间绘制的内容：有占位内容时用占位内容，否则用元素本身的内容
    fn placeholder(&self) -> Rc<C> {
        Rc::clone(self.placeholder.as_ref().unwrap_or(&self.content))
    }
}

/// 根协调器
pub struct RootCoordinator<K, S, C: ?Sized> {
    config: TransitionConfig,
    trackers: HashMap<K, Tracker<K, S, C>>,
    /// 追踪器创建顺序（覆盖层按此顺序绘制）
    order: Vec<K>,
    contents: HashMap<ElementIdentity<K, S>, MountedContent<C>>,
    root_bounds: Option<Rect>,
    unregistrations: FrameQueue<ElementIdentity<K, S>>,
    events: Vec<RootEvent<K, S>>,
    disposed: bool,
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> RootCoordinator<K, S, C> {
    /// 创建协调器
    pub fn new(config: TransitionConfig) -> SharedElementResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            trackers: HashMap::new(),
            order: Vec::new(),
            contents: HashMap::new(),
            root_bounds: None,
            unregistrations: FrameQueue::new(),
            events: Vec::new(),
            disposed: false,
        })
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    fn ensure_active(&self) -> SharedElementResult<()> {
        if self.disposed {
            return Err(SharedElementError::RootDisposed);
        }
        Ok(())
    }

    fn tracker_mut(&mut self, key: &K) -> &mut Tracker<K, S, C> {
        if !self.trackers.contains_key(key) {
            trace!(key = ?key, "创建追踪器");
            self.order.push(key.clone());
        }
        let config = self.config;
        self.trackers
            .entry(key.clone())
            .or_insert_with(|| Tracker::new(key.clone(), config))
    }

    /// 元素挂载（或重组时再次声明存在）
    ///
    /// 同一身份挂起的卸载通知会被取消，视为一直存在。
    pub fn on_element_registered(
        &mut self,
        identity: ElementIdentity<K, S>,
        content: Rc<C>,
        placeholder: Option<Rc<C>>,
    ) -> SharedElementResult<()> {
        self.ensure_active()?;
        if self.unregistrations.remove(&identity) {
            debug!(element = %identity, "重新挂载，取消挂起的卸载");
        }
        self.contents.insert(
            identity.clone(),
            MountedContent {
                content,
                placeholder,
            },
        );
        let tracker = self.tracker_mut(&identity.key);
        tracker.on_element_registered(identity);
        let tracker_events = tracker.drain_events();
        forward_events(&mut self.events, tracker_events);
        Ok(())
    }

    /// 元素上报布局（绝对坐标）
    ///
    /// 未挂载身份的布局被忽略。
    pub fn on_element_layout(
        &mut self,
        identity: &ElementIdentity<K, S>,
        bounds: Rect,
    ) -> SharedElementResult<()> {
        self.ensure_active()?;
        let Some(mounted) = self.contents.get(identity) else {
            warn!(element = %identity, "收到未挂载元素的布局，忽略");
            return Ok(());
        };
        let bounds = root_relative_bounds(bounds, self.root_bounds.as_ref());
        let element = PositionedElement::new(identity.clone(), mounted.placeholder(), bounds);
        if let Some(tracker) = self.trackers.get_mut(&identity.key) {
            tracker.on_element_positioned(element);
            forward_events(&mut self.events, tracker.drain_events());
        }
        Ok(())
    }

    /// 元素卸载：下一帧才生效
    pub fn on_element_disposed(&mut self, identity: &ElementIdentity<K, S>) {
        if self.disposed {
            trace!(element = %identity, "根已销毁，忽略卸载");
            return;
        }
        self.unregistrations.post(identity.clone());
    }

    /// 卸载是否挂起中
    pub fn has_pending_unregistration(&self, identity: &ElementIdentity<K, S>) -> bool {
        self.unregistrations.contains(identity)
    }

    /// 挂起的卸载数量
    pub fn pending_unregistrations(&self) -> usize {
        self.unregistrations.len()
    }

    /// 显示刷新
    ///
    /// # 参数
    /// - `dt_ms`: 距上一帧的时间（毫秒）
    pub fn on_frame(&mut self, dt_ms: f32) {
        if self.disposed {
            return;
        }
        for identity in self.unregistrations.take_due() {
            self.apply_unregistration(identity);
        }
        for key in &self.order {
            if let Some(tracker) = self.trackers.get_mut(key) {
                tracker.advance(dt_ms);
                forward_events(&mut self.events, tracker.drain_events());
            }
        }
    }

    fn apply_unregistration(&mut self, identity: ElementIdentity<K, S>) {
        self.contents.remove(&identity);
        let key = identity.key.clone();
        let Some(tracker) = self.trackers.get_mut(&key) else {
            return;
        };
        tracker.on_element_unregistered(&identity);
        forward_events(&mut self.events, tracker.drain_events());
        if tracker.is_empty() {
            self.trackers.remove(&key);
            self.order.retain(|k| *k != key);
            debug!(key = ?key, "追踪器已空，回收");
        }
    }

    /// 预告这些键的起始元素即将被替换
    ///
    /// 只作用于已存在的追踪器。
    pub fn prepare_transition(&mut self, keys: &[K]) {
        for key in keys {
            match self.trackers.get_mut(key) {
                Some(tracker) => {
                    tracker.prepare_transition();
                    forward_events(&mut self.events, tracker.drain_events());
                }
                None => trace!(key = ?key, "没有该键的追踪器，忽略 prepare"),
            }
        }
    }

    /// 该身份的实时元素是否需要隐藏
    ///
    /// 只查询，不会创建追踪器。
    pub fn should_hide(&self, identity: &ElementIdentity<K, S>) -> bool {
        self.trackers
            .get(&identity.key)
            .is_some_and(Tracker::should_hide_element)
    }

    /// 当前所有过渡（按追踪器创建顺序）
    pub fn active_transitions(&self) -> Vec<(&K, &Transition<K, S, C>)> {
        self.order
            .iter()
            .filter_map(|key| {
                let transition = self.trackers.get(key)?.transition()?;
                Some((key, transition))
            })
            .collect()
    }

    /// 仍有追踪器的键（按创建顺序）
    pub fn tracked_keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn tracker(&self, key: &K) -> Option<&Tracker<K, S, C>> {
        self.trackers.get(key)
    }

    /// 设置根表面的绝对边界（`None` 时元素边界原样使用）
    pub fn set_root_bounds(&mut self, bounds: Option<Rect>) {
        self.root_bounds = bounds;
    }

    pub fn root_bounds(&self) -> Option<&Rect> {
        self.root_bounds.as_ref()
    }

    /// 取出待处理事件
    pub fn drain_events(&mut self) -> Vec<RootEvent<K, S>> {
        std::mem::take(&mut self.events)
    }

    /// 销毁：丢弃所有挂起的卸载通知（不执行）和全部追踪器
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let cancelled = self.unregistrations.clear();
        debug!(
            trackers = self.trackers.len(),
            cancelled_unregistrations = cancelled,
            "根协调器销毁"
        );
        self.trackers.clear();
        self.order.clear();
        self.contents.clear();
        self.events.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

fn forward_events<K, S>(events: &mut Vec<RootEvent<K, S>>, tracker_events: Vec<TrackerEvent<K, S>>) {
    for event in tracker_events {
        match event {
            TrackerEvent::TransitionChanged => {
                if !events
                    .iter()
                    .any(|e| matches!(e, RootEvent::OverlayInvalidated))
                {
                    events.push(RootEvent::OverlayInvalidated);
                }
            }
            TrackerEvent::ElementInvalidated(identity) => {
                events.push(RootEvent::ElementInvalidated(identity));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::EasingFunction;
    use crate::tracker::TrackerState;

    type Id = ElementIdentity<&'static str, &'static str>;
    type TestRoot = RootCoordinator<&'static str, &'static str, str>;

    fn id(key: &'static str, screen: &'static str) -> Id {
        ElementIdentity::new(key, screen)
    }

    fn root() -> TestRoot {
        RootCoordinator::new(TransitionConfig::with_duration(100).easing(EasingFunction::Linear))
            .unwrap()
    }

    fn mount(root: &mut TestRoot, identity: &Id, bounds: Rect) {
        root.on_element_registered(identity.clone(), Rc::from(identity.screen_key), None)
            .unwrap();
        root.on_element_layout(identity, bounds).unwrap();
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = TestRoot::new(TransitionConfig::with_duration(120_000));
        assert!(matches!(result, Err(SharedElementError::InvalidConfig { .. })));
    }

    #[test]
    fn test_layout_is_root_relative() {
        let mut root = root();
        root.set_root_bounds(Some(Rect::new(10.0, 20.0, 400.0, 800.0)));
        let a = id("avatar", "list");
        mount(&mut root, &a, Rect::new(30.0, 70.0, 48.0, 48.0));

        let start = root.tracker(&"avatar").unwrap().state().start_element().unwrap();
        assert_eq!(start.bounds, Rect::new(20.0, 50.0, 48.0, 48.0));
    }

    #[test]
    fn test_layout_for_unknown_identity_is_ignored() {
        let mut root = root();
        assert!(root
            .on_element_layout(&id("avatar", "list"), Rect::new(0.0, 0.0, 1.0, 1.0))
            .is_ok());
        assert_eq!(root.tracked_keys().count(), 0);
    }

    #[test]
    fn test_placeholder_overrides_content() {
        let mut root = root();
        let a = id("avatar", "list");
        root.on_element_registered(a.clone(), Rc::from("content"), Some(Rc::from("placeholder")))
            .unwrap();
        root.on_element_layout(&a, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        root.prepare_transition(&["avatar"]);

        let transitions = root.active_transitions();
        let start = transitions[0].1.start_element();
        assert_eq!(&*start.placeholder, "placeholder");
    }

    #[test]
    fn test_unregistration_waits_one_frame() {
        let mut root = root();
        let a = id("avatar", "list");
        mount(&mut root, &a, Rect::new(0.0, 0.0, 10.0, 10.0));

        root.on_element_disposed(&a);
        assert!(root.has_pending_unregistration(&a));
        assert!(root.tracker(&"avatar").is_some());

        root.on_frame(16.0);
        assert!(!root.has_pending_unregistration(&a));
        assert!(root.tracker(&"avatar").is_none());
        assert_eq!(root.tracked_keys().count(), 0);
    }

    #[test]
    fn test_reregistration_cancels_unregistration() {
        let mut root = root();
        let a = id("avatar", "list");
        mount(&mut root, &a, Rect::new(0.0, 0.0, 10.0, 10.0));

        root.on_element_disposed(&a);
        root.on_element_disposed(&a);
        root.on_element_registered(a.clone(), Rc::from("list"), None).unwrap();
        assert!(!root.has_pending_unregistration(&a));

        root.on_frame(16.0);
        let tracker = root.tracker(&"avatar").unwrap();
        assert!(matches!(tracker.state(), TrackerState::StartPositioned(_)));
    }

    #[test]
    fn test_prepare_does_not_create_trackers() {
        let mut root = root();
        root.prepare_transition(&["avatar", "name"]);
        assert_eq!(root.tracked_keys().count(), 0);
        assert!(!root.should_hide(&id("avatar", "list")));
        assert_eq!(root.tracked_keys().count(), 0);
    }

    #[test]
    fn test_overlay_invalidation_is_deduplicated() {
        let mut root = root();
        let a = id("avatar", "list");
        let n = id("name", "list");
        mount(&mut root, &a, Rect::new(0.0, 0.0, 10.0, 10.0));
        mount(&mut root, &n, Rect::new(0.0, 20.0, 10.0, 10.0));
        root.prepare_transition(&["avatar", "name"]);

        assert_eq!(root.drain_events(), vec![RootEvent::OverlayInvalidated]);
        assert!(root.drain_events().is_empty());
    }

    #[test]
    fn test_dispose_cancels_pending_work() {
        let mut root = root();
        let a = id("avatar", "list");
        mount(&mut root, &a, Rect::new(0.0, 0.0, 10.0, 10.0));
        root.on_element_disposed(&a);

        root.dispose();
        assert!(root.is_disposed());
        assert!(!root.has_pending_unregistration(&a));
        assert_eq!(root.tracked_keys().count(), 0);

        root.on_frame(16.0);
        assert!(root.drain_events().is_empty());
        assert_eq!(
            root.on_element_registered(a, Rc::from("list"), None),
            Err(SharedElementError::RootDisposed)
        );
    }
}
