//! 解析器抽象接口
//!
//! 偏好解析、配置参数来源以及依赖解析回调

use crate::arguments::{ArgumentValue, Arguments, Instance};
use di_common::{DependencyError, DependencyResult, Lifetime, TypeIdentifier};
use std::collections::HashSet;
use std::fmt;

/// 偏好解析器 trait
///
/// 将抽象类型映射到应当实例化的具体类型，没有偏好时返回自身。
pub trait PreferenceResolver: Send + Sync {
    /// 解析偏好
    fn resolve(&self, requested: &TypeIdentifier) -> DependencyResult<TypeIdentifier>;
}

/// 配置参数来源 trait
pub trait ArgumentOverrides: Send + Sync {
    /// 获取具体类型某个参数的配置值
    fn configured_argument(&self, type_id: &TypeIdentifier, parameter: &str) -> Option<ArgumentValue>;
}

/// 生命周期策略 trait
pub trait LifetimePolicy: Send + Sync {
    /// 确定 `get` 请求某个具体类型时的生命周期
    fn lifetime_of(&self, type_id: &TypeIdentifier) -> Lifetime;
}

/// 依赖解析器 trait
///
/// 工厂通过它回调对象管理器，在同一个解析上下文中获取嵌套依赖。
pub trait DependencyResolver: Send + Sync {
    /// 获取共享实例
    fn get_in_context(
        &self,
        type_id: &TypeIdentifier,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance>;

    /// 创建新实例
    fn create_in_context(
        &self,
        type_id: &TypeIdentifier,
        arguments: Arguments,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance>;
}

/// 解析步骤：请求的类型和偏好解析后的具体类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionStep {
    pub requested: TypeIdentifier,
    pub concrete: TypeIdentifier,
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.requested == self.concrete {
            write!(f, "{}", self.concrete)
        } else {
            write!(f, "{} => {}", self.requested, self.concrete)
        }
    }
}

/// 解析上下文
///
/// 作用域为一次顶层 `create` / `get` 调用，记录正在构造的具体类型。
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链
    resolution_chain: Vec<ResolutionStep>,
    /// 正在构造中的具体类型
    in_progress: HashSet<TypeIdentifier>,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 接续外层调用尚未完成的解析链
    ///
    /// 构造函数内部再次经由对象管理器发起的调用用它建立上下文，
    /// 外层正在构造的类型对内层仍然是进行中。
    pub fn resume(steps: impl IntoIterator<Item = ResolutionStep>) -> Self {
        let resolution_chain: Vec<ResolutionStep> = steps.into_iter().collect();
        let in_progress = resolution_chain
            .iter()
            .map(|step| step.concrete.clone())
            .collect();
        Self {
            resolution_chain,
            in_progress,
        }
    }

    /// 进入一个具体类型的构造
    pub fn enter(
        &mut self,
        requested: &TypeIdentifier,
        concrete: &TypeIdentifier,
    ) -> DependencyResult<()> {
        let step = ResolutionStep {
            requested: requested.clone(),
            concrete: concrete.clone(),
        };

        if self.in_progress.contains(concrete) {
            let cycle_start = self
                .resolution_chain
                .iter()
                .position(|s| &s.concrete == concrete)
                .unwrap_or(0);
            let cycle = self.resolution_chain[cycle_start..]
                .iter()
                .chain(std::iter::once(&step))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");

            return Err(DependencyError::CircularDependency {
                dependency_chain: cycle,
            });
        }

        self.in_progress.insert(concrete.clone());
        self.resolution_chain.push(step);
        Ok(())
    }

    /// 离开最近进入的构造
    pub fn leave(&mut self) {
        if let Some(step) = self.resolution_chain.pop() {
            self.in_progress.remove(&step.concrete);
        }
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 是否正在构造指定类型
    pub fn is_in_progress(&self, concrete: &TypeIdentifier) -> bool {
        self.in_progress.contains(concrete)
    }

    /// 解析链的文本形式，用于错误信息
    pub fn chain(&self) -> String {
        if self.resolution_chain.is_empty() {
            return "<root>".to_string();
        }
        self.resolution_chain
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
