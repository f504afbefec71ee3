//! # DI Common
//!
//! 对象管理器各层共用的基础类型。
//!
//! ## 核心内容
//!
//! - [`TypeIdentifier`] - 抽象 / 具体类型的标识符
//! - [`Lifetime`] - 实例生命周期（共享 / 瞬时）
//! - [`DependencyError`] - 解析与实例化的错误分类
//! - [`ConfigError`] - 配置加载错误

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;

/// 对象管理器在共享实例存储中登记自身时使用的标识符
pub const OBJECT_MANAGER_TYPE: &str = "ObjectManager";
