//! 实例工厂抽象接口

use crate::arguments::{Arguments, Instance};
use crate::resolver::{DependencyResolver, ResolveContext};
use di_common::{DependencyResult, TypeIdentifier};

/// 实例工厂 trait
///
/// 按 调用方参数 > 配置参数 > 声明默认值 的优先级合并参数，
/// 剩余的类型化参数通过 `resolver` 递归解析，然后按声明顺序构造实例。
pub trait InstanceFactory: Send + Sync {
    /// 构造具体类型的新实例
    fn create(
        &self,
        type_id: &TypeIdentifier,
        arguments: Arguments,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance>;
}
