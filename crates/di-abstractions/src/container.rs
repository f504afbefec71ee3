//! 对象管理器抽象接口
//!
//! 对外提供 `create` / `get` / `configure` 三个入口

use crate::arguments::{downcast_instance, downcast_service, Arguments, Instance};
use crate::configuration::DiConfiguration;
use di_common::DependencyResult;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

/// 对象管理器 trait
///
/// 外部组件只能通过这里获取服务，不应直接构造这些类型。
pub trait ObjectManager: Send + Sync {
    /// 创建新实例，顶层类型从不进入共享实例存储
    fn create(&self, type_name: &str, arguments: Arguments) -> DependencyResult<Instance>;

    /// 获取共享实例，首次请求时构造
    fn get(&self, type_name: &str) -> DependencyResult<Instance>;

    /// 合并配置，只影响之后的解析
    fn configure(&self, configuration: DiConfiguration);
}

/// 对象管理器的类型化便捷方法
pub trait ObjectManagerExt: ObjectManager {
    /// 获取共享实例并转换为具体类型
    fn get_as<T>(&self, type_name: &str) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        downcast_instance(type_name, self.get(type_name)?)
    }

    /// 创建新实例并转换为具体类型
    fn create_as<T>(&self, type_name: &str, arguments: Arguments) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        downcast_instance(type_name, self.create(type_name, arguments)?)
    }

    /// 获取共享实例并转换为接口指针
    fn get_service<T>(&self, type_name: &str) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        downcast_service(type_name, &self.get(type_name)?)
    }

    /// 创建新实例并转换为接口指针
    fn create_service<T>(&self, type_name: &str, arguments: Arguments) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        downcast_service(type_name, &self.create(type_name, arguments)?)
    }
}

impl<M: ObjectManager + ?Sized> ObjectManagerExt for M {}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 偏好链最大跳数
    pub max_preference_hops: usize,
    /// 未配置共享标记的类型是否共享
    pub shared_by_default: bool,
    /// 调用方传入未声明的参数时是否告警
    pub warn_on_unknown_arguments: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_preference_hops: 16,
            shared_by_default: true,
            warn_on_unknown_arguments: true,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 瞬时实例创建次数
    pub transient_creations: u64,
    /// 共享实例创建次数
    pub shared_creations: u64,
    /// 共享实例命中次数
    pub shared_hits: u64,
    /// 顶层解析错误次数
    pub resolution_errors: u64,
    /// 当前共享实例数量
    pub active_shared_instances: usize,
}

impl ContainerStats {
    /// 共享实例命中率
    pub fn shared_hit_rate(&self) -> f64 {
        let total = self.shared_hits + self.shared_creations;
        if total == 0 {
            0.0
        } else {
            self.shared_hits as f64 / total as f64
        }
    }
}
