//! 类型注册表
//!
//! 通过显式注册表实现类型内省，不依赖运行时反射

use di_abstractions::{ConstructorSpec, Instance, ResolvedArguments, TypeDefinition, TypeIntrospector};
use di_common::{DependencyResult, TypeIdentifier};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 类型注册表
#[derive(Debug, Default)]
pub struct TypeRegistry {
    definitions: HashMap<TypeIdentifier, Arc<TypeDefinition>>,
}

impl TypeRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型
    pub fn register<F>(
        &mut self,
        type_id: impl Into<TypeIdentifier>,
        spec: ConstructorSpec,
        constructor: F,
    ) -> &mut Self
    where
        F: Fn(ResolvedArguments) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        self.register_definition(TypeDefinition::new(type_id, spec, constructor))
    }

    /// 注册完整的类型定义，同名定义会被替换
    pub fn register_definition(&mut self, definition: TypeDefinition) -> &mut Self {
        let type_id = definition.type_id.clone();
        debug!(
            "注册类型: {} ({} 个构造参数)",
            type_id,
            definition.spec.parameters().len()
        );

        if self
            .definitions
            .insert(type_id.clone(), Arc::new(definition))
            .is_some()
        {
            warn!("类型 {} 已注册，旧定义被替换", type_id);
        }
        self
    }

    /// 已注册类型数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 取出所有定义
    pub fn into_definitions(self) -> impl Iterator<Item = TypeDefinition> {
        self.definitions
            .into_values()
            .map(|definition| Arc::try_unwrap(definition).unwrap_or_else(|shared| (*shared).clone()))
    }
}

impl TypeIntrospector for TypeRegistry {
    fn definition(&self, type_id: &TypeIdentifier) -> Option<Arc<TypeDefinition>> {
        self.definitions.get(type_id).cloned()
    }
}
