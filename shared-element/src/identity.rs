//! # Identity 模块
//!
//! 共享元素实例的身份标识。
//!
//! 同一个逻辑键可以出现在多个屏幕上（这正是共享元素的场景），
//! 但同一 `(key, screen_key)` 组合在同一时刻至多对应一个存活实例。

use std::fmt;
use std::hash::Hash;

/// 可作为逻辑键或屏幕键的类型
///
/// 只要求可比较、可哈希、可克隆，对具体类型不做假设。
pub trait ElementKey: Clone + Eq + Hash + fmt::Debug + 'static {}

impl<T: Clone + Eq + Hash + fmt::Debug + 'static> ElementKey for T {}

/// 共享元素实例标识
///
/// 由逻辑键和屏幕键组成，按值比较。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementIdentity<K, S> {
    /// 逻辑键（跨屏共享）
    pub key: K,
    /// 屏幕键（区分所在屏幕）
    pub screen_key: S,
}

impl<K: ElementKey, S: ElementKey> ElementIdentity<K, S> {
    /// 创建实例标识
    pub fn new(key: K, screen_key: S) -> Self {
        Self { key, screen_key }
    }

    /// 逻辑键
    pub fn key(&self) -> &K {
        &self.key
    }

    /// 屏幕键
    pub fn screen_key(&self) -> &S {
        &self.screen_key
    }
}

impl<K: fmt::Debug, S: fmt::Debug> fmt::Display for ElementIdentity<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.key, self.screen_key)
    }
}
