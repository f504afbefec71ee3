//! # 对象管理器配置加载
//!
//! 从 TOML / JSON / YAML 文件和环境变量加载 [`ObjectManagerSettings`]：
//!
//! ```toml
//! [container]
//! max_preference_hops = 8
//!
//! [di.preferences]
//! Logger = "FileLogger"
//!
//! [di.arguments.FileLogger]
//! path = "/var/log/app.log"
//! ```
//!
//! `container` 节可以用 `DI__CONTAINER__MAX_PREFERENCE_HOPS=4` 这样的环境变量覆盖。

pub mod format;
pub mod loader;
pub mod settings;

pub use format::*;
pub use loader::*;
pub use settings::*;
