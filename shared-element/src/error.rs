//! # Error 模块
//!
//! 定义 shared-element 中使用的错误类型。
//!
//! 只有结构性误用才会成为错误；事件乱序、重复注册等竞态
//! 全部由追踪器状态机吸收，不会出现在这里。

use thiserror::Error;

/// 共享元素错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedElementError {
    /// 协调器已销毁
    #[error("共享元素根已销毁，无法继续使用")]
    RootDisposed,

    /// 元素句柄所属的根已不存在
    #[error("未找到共享元素根：SharedElement 必须挂在 SharedElementsRoot 之下")]
    RootNotFound,

    /// 容器下有多个直接子元素
    #[error("共享元素只能有一个直接子元素，实际为 {count} 个")]
    MultipleChildren { count: usize },

    /// 配置无效
    #[error("配置无效: {message}")]
    InvalidConfig { message: String },
}

/// Result 类型别名
pub type SharedElementResult<T> = Result<T, SharedElementError>;
