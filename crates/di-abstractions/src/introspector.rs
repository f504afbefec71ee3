//! 类型内省抽象接口
//!
//! 根据具体类型标识符给出构造描述和构造函数

use crate::arguments::{Instance, ResolvedArguments};
use di_common::{DependencyResult, TypeIdentifier};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 构造参数描述
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// 参数名
    pub name: String,
    /// 声明的依赖类型
    pub declared_type: Option<TypeIdentifier>,
    /// 声明的默认值
    pub default_value: Option<Value>,
    /// 依赖是否以共享方式获取
    pub shared: bool,
}

impl ParameterDescriptor {
    /// 无类型的值参数
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default_value: None,
            shared: true,
        }
    }

    /// 声明了依赖类型的参数
    pub fn typed(name: impl Into<String>, declared_type: impl Into<TypeIdentifier>) -> Self {
        Self {
            declared_type: Some(declared_type.into()),
            ..Self::value(name)
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// 依赖每次都新建
    pub fn transient(mut self) -> Self {
        self.shared = false;
        self
    }
}

/// 构造描述，参数顺序即构造顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructorSpec {
    parameters: Vec<ParameterDescriptor>,
}

impl ConstructorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加参数
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// 是否声明了指定参数
    pub fn declares(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// 声明的依赖类型
    pub fn dependencies(&self) -> impl Iterator<Item = &TypeIdentifier> {
        self.parameters
            .iter()
            .filter_map(|p| p.declared_type.as_ref())
    }
}

/// 构造函数类型
pub type Constructor = Arc<dyn Fn(ResolvedArguments) -> DependencyResult<Instance> + Send + Sync>;

/// 具体类型的构造定义
#[derive(Clone)]
pub struct TypeDefinition {
    /// 具体类型标识符
    pub type_id: TypeIdentifier,
    /// 构造描述
    pub spec: ConstructorSpec,
    /// 构造函数
    pub constructor: Constructor,
}

impl TypeDefinition {
    pub fn new<F>(type_id: impl Into<TypeIdentifier>, spec: ConstructorSpec, constructor: F) -> Self
    where
        F: Fn(ResolvedArguments) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        Self {
            type_id: type_id.into(),
            spec,
            constructor: Arc::new(constructor),
        }
    }

    /// 调用构造函数
    pub fn construct(&self, arguments: ResolvedArguments) -> DependencyResult<Instance> {
        (self.constructor)(arguments)
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("type_id", &self.type_id)
            .field("spec", &self.spec)
            .field("constructor", &"<function>")
            .finish()
    }
}

/// 类型内省器 trait
///
/// 可以由运行时反射或显式注册表实现；找不到定义时返回 `None`。
pub trait TypeIntrospector: Send + Sync {
    /// 获取具体类型的构造定义
    fn definition(&self, type_id: &TypeIdentifier) -> Option<Arc<TypeDefinition>>;

    /// 是否可以构造指定类型
    fn is_defined(&self, type_id: &TypeIdentifier) -> bool {
        self.definition(type_id).is_some()
    }
}
