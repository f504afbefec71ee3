//! # Dependency Injection Abstractions
//!
//! 对象管理器的抽象层，定义类型解析和实例化的核心接口。
//!
//! ## 核心接口
//!
//! - [`ObjectManager`] - 对外唯一的实例获取入口（`create` / `get` / `configure`）
//! - [`PreferenceResolver`] - 抽象类型到具体类型的偏好解析
//! - [`TypeIntrospector`] - 根据类型标识符给出构造描述
//! - [`InstanceFactory`] - 合并参数并构造实例
//! - [`DependencyResolver`] - 工厂回调对象管理器解析嵌套依赖

pub mod arguments;
pub mod configuration;
pub mod container;
pub mod factory;
pub mod introspector;
pub mod resolver;

pub use arguments::*;
pub use configuration::*;
pub use container::*;
pub use factory::*;
pub use introspector::*;
pub use resolver::*;
