//! # 对象管理器具体实现
//!
//! 提供偏好解析、参数合并工厂、共享实例存储以及组合它们的对象管理器
//!
//! ```
//! use di_abstractions::{instance_of, ConstructorSpec, ObjectManagerExt};
//! use di_impl::ObjectManagerImpl;
//!
//! struct Clock;
//!
//! let manager = ObjectManagerImpl::builder()
//!     .register("Clock", ConstructorSpec::new(), |_| Ok(instance_of(Clock)))
//!     .build();
//!
//! let first = manager.get_as::<Clock>("Clock").unwrap();
//! let second = manager.get_as::<Clock>("Clock").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! ```

pub mod config;
pub mod factory;
pub mod manager;
pub mod registry;
pub mod stats;
pub mod store;

pub use config::*;
pub use factory::*;
pub use manager::*;
pub use registry::*;
pub use stats::*;
pub use store::*;
