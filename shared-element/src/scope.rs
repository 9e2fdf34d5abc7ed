//! # Scope 模块
//!
//! 宿主使用的句柄 API。
//!
//! 根协调器通过 `SharedElementsRoot` 显式传给每个共享元素的挂载点，
//! 没有全局查找。元素挂载后得到 `ElementHandle`：
//!
//! ```text
//! let handle = root.register_element(identity, content)?;
//! handle.on_layout(bounds)?;          // 每次布局
//! if handle.should_hide()? { .. }     // 绘制实时元素前
//! drop(handle);                       // 卸载：下一帧生效
//! ```
//!
//! 句柄只持有根的弱引用；根被丢弃后继续使用句柄会得到
//! `SharedElementError::RootNotFound`。
//!
//! 句柄在协调器被借用期间（例如 `with_coordinator` 的闭包里）被丢弃时，
//! 卸载通知先记入根上的待处理列表，下一次修改协调器之前补发，不会丢失。

use std::cell::{RefCell, RefMut};
use std::mem;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::config::TransitionConfig;
use crate::error::{SharedElementError, SharedElementResult};
use crate::event::RootEvent;
use crate::geometry::Rect;
use crate::identity::{ElementIdentity, ElementKey};
use crate::overlay::{self, Canvas, OverlayItem};
use crate::root::RootCoordinator;

/// 根与句柄共享的状态
struct Shared<K, S, C: ?Sized> {
    coordinator: RefCell<RootCoordinator<K, S, C>>,
    /// 协调器被借用时丢弃的句柄
    dropped: RefCell<Vec<ElementIdentity<K, S>>>,
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> Shared<K, S, C> {
    /// 可变借用协调器，先补发积压的卸载通知
    fn coordinator_mut(&self) -> RefMut<'_, RootCoordinator<K, S, C>> {
        let mut coordinator = self.coordinator.borrow_mut();
        let dropped = mem::take(&mut *self.dropped.borrow_mut());
        for identity in &dropped {
            debug!(element = %identity, "补发延后的卸载通知");
            coordinator.on_element_disposed(identity);
        }
        coordinator
    }

    /// 元素卸载；协调器正被借用时记入待处理列表
    fn dispose_element(&self, identity: &ElementIdentity<K, S>) {
        match self.coordinator.try_borrow_mut() {
            Ok(mut coordinator) => coordinator.on_element_disposed(identity),
            Err(_) => {
                debug!(element = %identity, "协调器正被占用，卸载通知延后");
                self.dropped.borrow_mut().push(identity.clone());
            }
        }
    }
}

/// 共享元素根
///
/// 克隆得到的是同一个根的另一个引用。
pub struct SharedElementsRoot<K, S, C: ?Sized> {
    inner: Rc<Shared<K, S, C>>,
}

impl<K, S, C: ?Sized> Clone for SharedElementsRoot<K, S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> SharedElementsRoot<K, S, C> {
    /// 创建根
    pub fn new(config: TransitionConfig) -> SharedElementResult<Self> {
        Ok(Self {
            inner: Rc::new(Shared {
                coordinator: RefCell::new(RootCoordinator::new(config)?),
                dropped: RefCell::new(Vec::new()),
            }),
        })
    }

    /// 挂载共享元素，过渡期间绘制元素本身的内容
    pub fn register_element(
        &self,
        identity: ElementIdentity<K, S>,
        content: Rc<C>,
    ) -> SharedElementResult<ElementHandle<K, S, C>> {
        self.register(identity, content, None)
    }

    /// 挂载共享元素，过渡期间改为绘制 `placeholder`
    pub fn register_element_with_placeholder(
        &self,
        identity: ElementIdentity<K, S>,
        content: Rc<C>,
        placeholder: Rc<C>,
    ) -> SharedElementResult<ElementHandle<K, S, C>> {
        self.register(identity, content, Some(placeholder))
    }

    fn register(
        &self,
        identity: ElementIdentity<K, S>,
        content: Rc<C>,
        placeholder: Option<Rc<C>>,
    ) -> SharedElementResult<ElementHandle<K, S, C>> {
        self.inner.coordinator_mut().on_element_registered(
            identity.clone(),
            Rc::clone(&content),
            placeholder.clone(),
        )?;
        Ok(ElementHandle {
            identity,
            content,
            placeholder,
            root: Rc::downgrade(&self.inner),
        })
    }

    /// 预告这些键的当前元素即将被替换（例如切换屏幕之前）
    pub fn prepare_transition(&self, keys: &[K]) {
        self.inner.coordinator_mut().prepare_transition(keys);
    }

    /// 显示刷新
    pub fn on_frame(&self, dt_ms: f32) {
        self.inner.coordinator_mut().on_frame(dt_ms);
    }

    /// 根表面布局
    pub fn set_root_bounds(&self, bounds: Option<Rect>) {
        self.inner.coordinator_mut().set_root_bounds(bounds);
    }

    pub fn should_hide(&self, identity: &ElementIdentity<K, S>) -> bool {
        self.inner.coordinator.borrow().should_hide(identity)
    }

    pub fn drain_events(&self) -> Vec<RootEvent<K, S>> {
        self.inner.coordinator_mut().drain_events()
    }

    /// 当前覆盖层的显示列表
    pub fn overlay_items(&self) -> Vec<OverlayItem<K, S, C>> {
        overlay::overlay_items(&*self.inner.coordinator.borrow())
    }

    /// 把覆盖层画到 `canvas` 上，返回绘制的占位元素数量
    pub fn render_overlay(&self, canvas: &mut impl Canvas<C>) -> usize {
        overlay::render_overlay(&*self.inner.coordinator.borrow(), canvas)
    }

    /// 只读访问协调器
    pub fn with_coordinator<R>(&self, f: impl FnOnce(&RootCoordinator<K, S, C>) -> R) -> R {
        f(&*self.inner.coordinator.borrow())
    }

    /// 销毁根：挂起的卸载通知全部取消
    pub fn dispose(&self) {
        self.inner.coordinator_mut().dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.coordinator.borrow().is_disposed()
    }
}

/// 已挂载共享元素的句柄
///
/// 句柄被丢弃（或调用 [`dispose`](Self::dispose)）时发出卸载通知。
pub struct ElementHandle<K: ElementKey, S: ElementKey, C: ?Sized> {
    identity: ElementIdentity<K, S>,
    content: Rc<C>,
    placeholder: Option<Rc<C>>,
    root: Weak<Shared<K, S, C>>,
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> ElementHandle<K, S, C> {
    pub fn identity(&self) -> &ElementIdentity<K, S> {
        &self.identity
    }

    fn root(&self) -> SharedElementResult<Rc<Shared<K, S, C>>> {
        self.root.upgrade().ok_or(SharedElementError::RootNotFound)
    }

    /// 上报布局（绝对坐标）
    pub fn on_layout(&self, bounds: Rect) -> SharedElementResult<()> {
        self.root()?
            .coordinator_mut()
            .on_element_layout(&self.identity, bounds)
    }

    /// 实时元素是否需要隐藏
    pub fn should_hide(&self) -> SharedElementResult<bool> {
        Ok(self.root()?.coordinator.borrow().should_hide(&self.identity))
    }

    /// 重组时再次声明存在
    pub fn refresh(&self) -> SharedElementResult<()> {
        self.root()?.coordinator_mut().on_element_registered(
            self.identity.clone(),
            Rc::clone(&self.content),
            self.placeholder.clone(),
        )
    }

    /// 卸载
    pub fn dispose(self) {
        drop(self);
    }
}

impl<K: ElementKey, S: ElementKey, C: ?Sized> Drop for ElementHandle<K, S, C> {
    fn drop(&mut self) {
        if let Some(root) = self.root.upgrade() {
            root.dispose_element(&self.identity);
        }
    }
}
