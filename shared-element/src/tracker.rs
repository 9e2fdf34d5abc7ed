//! # Tracker 模块
//!
//! 单个逻辑键的生命周期状态机。
//!
//! ## 状态
//!
//! ```text
//! Empty ──registered──► StartRegistered ──positioned──► StartPositioned
//!   ▲                        │                              │
//!   └──────unregistered──────┘                 registered(另一身份)
//!                                                           ▼
//!                     StartPositioned ◄──positioned(end)── EndRegistered
//!                     (结束元素成为新一轮的起始元素，过渡开始)
//! ```
//!
//! 来自两个屏幕的挂载、布局、卸载事件互相之间没有顺序保证，
//! 所有乱序和重复都在这里按转换表确定性地吸收，不会成为错误。
//!
//! 追踪器不直接通知外界；它把事件压入队列，由根协调器统一取出。

use std::fmt;

use tracing::{debug, trace};

use crate::config::TransitionConfig;
use crate::element::PositionedElement;
use crate::identity::{ElementIdentity, ElementKey};
use crate::transition::{InProgressTransition, Transition};

/// 追踪器状态
pub enum TrackerState<K, S, C: ?Sized> {
    /// 没有任何注册
    Empty,
    /// 一个身份已挂载，尚未上报几何信息
    StartRegistered(ElementIdentity<K, S>),
    /// 起始身份已上报几何信息
    StartPositioned(PositionedElement<K, S, C>),
    /// 起始元素已定位，另一个身份又挂载了
    EndRegistered {
        start: PositionedElement<K, S, C>,
        end: ElementIdentity<K, S>,
    },
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> TrackerState<K, S, C> {
    /// 起始身份（`Empty` 时为 `None`）
    pub fn start_identity(&self) -> Option<&ElementIdentity<K, S>> {
        match self {
            Self::Empty => None,
            Self::StartRegistered(identity) => Some(identity),
            Self::StartPositioned(start) | Self::EndRegistered { start, .. } => {
                Some(&start.identity)
            }
        }
    }

    /// 已定位的起始元素（`StartPositioned` 及 `EndRegistered`）
    pub fn start_element(&self) -> Option<&PositionedElement<K, S, C>> {
        match self {
            Self::StartPositioned(start) | Self::EndRegistered { start, .. } => Some(start),
            Self::Empty | Self::StartRegistered(_) => None,
        }
    }

    /// 等待几何信息的结束身份
    pub fn end_identity(&self) -> Option<&ElementIdentity<K, S>> {
        match self {
            Self::EndRegistered { end, .. } => Some(end),
            _ => None,
        }
    }

    /// 身份是否已在本状态中登记
    pub fn is_registered(&self, identity: &ElementIdentity<K, S>) -> bool {
        self.start_identity() == Some(identity) || self.end_identity() == Some(identity)
    }

    /// 状态名称（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::StartRegistered(_) => "StartRegistered",
            Self::StartPositioned(_) => "StartPositioned",
            Self::EndRegistered { .. } => "EndRegistered",
        }
    }
}

impl<K: fmt::Debug, S: fmt::Debug, C: ?Sized> fmt::Debug for TrackerState<K, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::StartRegistered(identity) => {
                f.debug_tuple("StartRegistered").field(identity).finish()
            }
            Self::StartPositioned(start) => f.debug_tuple("StartPositioned").field(start).finish(),
            Self::EndRegistered { start, end } => f
                .debug_struct("EndRegistered")
                .field("start", start)
                .field("end", end)
                .finish(),
        }
    }
}

/// 追踪器产生的事件
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent<K, S> {
    /// 过渡值发生了变化，覆盖层需要重绘
    TransitionChanged,
    /// 过渡自然结束，需要重绘触发它的元素
    ElementInvalidated(ElementIdentity<K, S>),
}

/// 单个逻辑键的追踪器
pub struct Tracker<K, S, C: ?Sized> {
    key: K,
    config: TransitionConfig,
    state: TrackerState<K, S, C>,
    transition: Option<Transition<K, S, C>>,
    events: Vec<TrackerEvent<K, S>>,
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> Tracker<K, S, C> {
    /// 创建空追踪器
    pub fn new(key: K, config: TransitionConfig) -> Self {
        Self {
            key,
            config,
            state: TrackerState::Empty,
            transition: None,
            events: Vec::new(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn state(&self) -> &TrackerState<K, S, C> {
        &self.state
    }

    pub fn transition(&self) -> Option<&Transition<K, S, C>> {
        self.transition.as_ref()
    }

    /// 状态是否为 `Empty`（所有者据此回收追踪器）
    pub fn is_empty(&self) -> bool {
        matches!(self.state, TrackerState::Empty)
    }

    /// 过渡存在期间，该键的实时元素需要隐藏，只显示覆盖层上的占位元素
    pub fn should_hide_element(&self) -> bool {
        self.transition.is_some()
    }

    /// 取出积累的事件
    pub fn drain_events(&mut self) -> Vec<TrackerEvent<K, S>> {
        std::mem::take(&mut self.events)
    }

    /// 外部预告：当前起始元素即将被替换
    ///
    /// 只在起始元素已定位且过渡还不是 `AwaitingEndGeometry` 时生效，
    /// 连续调用只会产生一个等待中的过渡。
    pub fn prepare_transition(&mut self) {
        let start = match &self.state {
            TrackerState::StartPositioned(start) | TrackerState::EndRegistered { start, .. } => {
                start.clone()
            }
            TrackerState::Empty | TrackerState::StartRegistered(_) => {
                trace!(key = ?self.key, state = self.state.name(), "起始元素未定位，忽略 prepare");
                return;
            }
        };
        self.await_end_geometry(start);
    }

    fn await_end_geometry(&mut self, start: PositionedElement<K, S, C>) {
        if self
            .transition
            .as_ref()
            .is_some_and(Transition::is_awaiting_end_geometry)
        {
            return;
        }
        self.set_transition(Some(Transition::AwaitingEndGeometry(start)));
    }

    /// 元素挂载
    pub fn on_element_registered(&mut self, identity: ElementIdentity<K, S>) {
        let state = std::mem::replace(&mut self.state, TrackerState::Empty);
        self.state = match state {
            TrackerState::Empty => TrackerState::StartRegistered(identity),
            TrackerState::StartRegistered(_) => TrackerState::StartRegistered(identity),
            TrackerState::StartPositioned(start) => {
                if start.identity == identity {
                    TrackerState::StartPositioned(start)
                } else {
                    self.await_end_geometry(start.clone());
                    TrackerState::EndRegistered {
                        start,
                        end: identity,
                    }
                }
            }
            TrackerState::EndRegistered { start, end } => {
                if start.identity == identity || end == identity {
                    TrackerState::EndRegistered { start, end }
                } else {
                    // 第三个身份取代等待中的结束身份
                    debug!(key = ?self.key, replaced = %end, end = %identity, "结束身份被替换");
                    self.await_end_geometry(start.clone());
                    TrackerState::EndRegistered {
                        start,
                        end: identity,
                    }
                }
            }
        };
        trace!(key = ?self.key, state = self.state.name(), "元素挂载");
    }

    /// 元素上报几何信息
    pub fn on_element_positioned(&mut self, element: PositionedElement<K, S, C>) {
        let state = std::mem::replace(&mut self.state, TrackerState::Empty);
        self.state = match state {
            TrackerState::StartRegistered(identity)
            | TrackerState::StartPositioned(PositionedElement { identity, .. })
                if identity == element.identity =>
            {
                TrackerState::StartPositioned(element)
            }
            TrackerState::EndRegistered { start, end } if end == element.identity => {
                debug!(
                    key = ?self.key,
                    start = %start.identity,
                    end = %end,
                    duration_ms = self.config.duration_ms,
                    "开始过渡"
                );
                let transition = InProgressTransition::new(start, element.clone(), &self.config);
                self.set_transition(Some(Transition::InProgress(transition)));
                TrackerState::StartPositioned(element)
            }
            TrackerState::EndRegistered { start, end } if start.identity == element.identity => {
                self.set_transition(Some(Transition::AwaitingEndGeometry(element.clone())));
                TrackerState::EndRegistered {
                    start: element,
                    end,
                }
            }
            other => {
                trace!(
                    key = ?self.key,
                    state = other.name(),
                    element = %element.identity,
                    "未登记身份的布局，忽略"
                );
                other
            }
        };
    }

    /// 元素卸载（已经过一帧延迟）
    pub fn on_element_unregistered(&mut self, identity: &ElementIdentity<K, S>) {
        let state = std::mem::replace(&mut self.state, TrackerState::Empty);
        self.state = match state {
            TrackerState::EndRegistered { start, end } if end == *identity => {
                self.set_transition(None);
                TrackerState::StartPositioned(start)
            }
            TrackerState::EndRegistered { start, end } if start.identity == *identity => {
                self.set_transition(None);
                TrackerState::StartRegistered(end)
            }
            TrackerState::StartRegistered(start) if start == *identity => {
                self.set_transition(None);
                TrackerState::Empty
            }
            TrackerState::StartPositioned(start) if start.identity == *identity => {
                self.set_transition(None);
                TrackerState::Empty
            }
            other => other,
        };
        trace!(key = ?self.key, state = self.state.name(), element = %identity, "元素卸载");
    }

    /// 推进当前过渡一帧
    ///
    /// 过渡自然结束时清除过渡，并请求重绘触发它的元素。
    pub fn advance(&mut self, dt_ms: f32) {
        let Some(Transition::InProgress(transition)) = self.transition.as_mut() else {
            return;
        };
        if let Some(finish) = transition.advance(dt_ms) {
            debug!(key = ?self.key, end = %finish.invalidate, "过渡完成");
            self.set_transition(None);
            self.events.push(TrackerEvent::ElementInvalidated(finish.invalidate));
        }
    }

    /// 替换过渡值：先清理旧值，再赋值，最后通知覆盖层
    fn set_transition(&mut self, transition: Option<Transition<K, S, C>>) {
        if self.transition.is_none() && transition.is_none() {
            return;
        }
        if let Some(old) = self.transition.as_mut() {
            old.cleanup();
        }
        trace!(
            key = ?self.key,
            from = self.transition.as_ref().map(Transition::name),
            to = transition.as_ref().map(Transition::name),
            "过渡变化"
        );
        self.transition = transition;
        self.events.push(TrackerEvent::TransitionChanged);
    }
}

impl<K: fmt::Debug, S: fmt::Debug, C: ?Sized> fmt::Debug for Tracker<K, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("transition", &self.transition)
            .finish_non_exhaustive()
    }
}
