//! 默认实例工厂
//!
//! 参数优先级：调用方参数 > 配置参数 > 声明默认值，剩余类型化参数递归解析

use di_abstractions::{
    ArgumentOverrides, ArgumentValue, Arguments, DependencyResolver, Instance, InstanceFactory,
    ParameterDescriptor, ResolveContext, ResolvedArguments, ResolvedValue, TypeIntrospector,
};
use di_common::{DependencyError, DependencyResult, TypeIdentifier};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 默认实例工厂
pub struct DefaultFactory {
    introspector: Arc<dyn TypeIntrospector>,
    overrides: Arc<dyn ArgumentOverrides>,
    warn_on_unknown_arguments: bool,
}

impl DefaultFactory {
    pub fn new(
        introspector: Arc<dyn TypeIntrospector>,
        overrides: Arc<dyn ArgumentOverrides>,
    ) -> Self {
        Self {
            introspector,
            overrides,
            warn_on_unknown_arguments: true,
        }
    }

    /// 设置是否对未声明的调用方参数告警
    pub fn with_unknown_argument_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_unknown_arguments = enabled;
        self
    }

    /// 解析单个参数
    fn resolve_parameter(
        &self,
        type_id: &TypeIdentifier,
        parameter: &ParameterDescriptor,
        arguments: &mut Arguments,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedValue> {
        if let Some(value) = arguments.remove(&parameter.name) {
            trace!("{}::{} 使用调用方参数", type_id, parameter.name);
            return materialize(value, resolver, context);
        }

        if let Some(value) = self.overrides.configured_argument(type_id, &parameter.name) {
            trace!("{}::{} 使用配置参数", type_id, parameter.name);
            return materialize(value, resolver, context);
        }

        if let Some(default) = &parameter.default_value {
            return Ok(ResolvedValue::Literal(default.clone()));
        }

        match &parameter.declared_type {
            Some(dependency) if parameter.shared => resolver
                .get_in_context(dependency, context)
                .map(ResolvedValue::Instance),
            Some(dependency) => resolver
                .create_in_context(dependency, Arguments::new(), context)
                .map(ResolvedValue::Instance),
            None => Err(DependencyError::UnresolvableDependency {
                type_name: type_id.to_string(),
                parameter: parameter.name.clone(),
                resolution_chain: context.chain(),
            }),
        }
    }
}

impl std::fmt::Debug for DefaultFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultFactory")
            .field("warn_on_unknown_arguments", &self.warn_on_unknown_arguments)
            .finish_non_exhaustive()
    }
}

impl InstanceFactory for DefaultFactory {
    fn create(
        &self,
        type_id: &TypeIdentifier,
        mut arguments: Arguments,
        resolver: &dyn DependencyResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let definition =
            self.introspector
                .definition(type_id)
                .ok_or_else(|| DependencyError::UnresolvableType {
                    type_name: type_id.to_string(),
                    resolution_chain: context.chain(),
                })?;

        let parameters = definition.spec.parameters();
        let mut resolved = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let value =
                self.resolve_parameter(type_id, parameter, &mut arguments, resolver, context)?;
            resolved.push((parameter.name.clone(), value));
        }

        if self.warn_on_unknown_arguments && !arguments.is_empty() {
            let unknown: Vec<_> = arguments.names().collect();
            warn!("类型 {} 未声明参数 {:?}，已忽略", type_id, unknown);
        }

        debug!("构造实例: {} (深度 {})", type_id, context.depth());
        definition.construct(ResolvedArguments::new(type_id.clone(), resolved))
    }
}

/// 将参数值转换为构造函数可用的值
fn materialize(
    value: ArgumentValue,
    resolver: &dyn DependencyResolver,
    context: &mut ResolveContext,
) -> DependencyResult<ResolvedValue> {
    match value {
        ArgumentValue::Literal(literal) => Ok(ResolvedValue::Literal(literal)),
        ArgumentValue::Object(instance) => Ok(ResolvedValue::Instance(instance)),
        ArgumentValue::Type {
            type_id,
            shared: true,
        } => resolver
            .get_in_context(&type_id, context)
            .map(ResolvedValue::Instance),
        ArgumentValue::Type {
            type_id,
            shared: false,
        } => resolver
            .create_in_context(&type_id, Arguments::new(), context)
            .map(ResolvedValue::Instance),
    }
}
