//! 构造参数定义
//!
//! 调用方参数、配置参数以及解析完成后交给构造函数的参数

use di_common::{DependencyError, DependencyResult, TypeIdentifier};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 将具体值包装为实例
pub fn instance_of<T>(value: T) -> Instance
where
    T: Any + Send + Sync,
{
    Arc::new(value)
}

/// 将接口对象包装为实例
///
/// 实际存储的是 `Arc<T>` 本身，消费方通过 [`downcast_service`] 取回接口指针。
pub fn service_instance<T>(service: Arc<T>) -> Instance
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(service)
}

/// 将实例向下转换为具体类型
pub fn downcast_instance<T>(type_name: &str, instance: Instance) -> DependencyResult<Arc<T>>
where
    T: Any + Send + Sync,
{
    instance
        .downcast::<T>()
        .map_err(|_| DependencyError::TypeMismatch {
            type_name: type_name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
}

/// 将实例向下转换为接口指针
pub fn downcast_service<T>(type_name: &str, instance: &Instance) -> DependencyResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| DependencyError::TypeMismatch {
            type_name: type_name.to_string(),
            expected: std::any::type_name::<Arc<T>>().to_string(),
        })
}

/// 参数值
#[derive(Clone)]
pub enum ArgumentValue {
    /// 字面量
    Literal(Value),
    /// 调用方已经构造好的对象
    Object(Instance),
    /// 需要通过对象管理器实例化的类型
    Type {
        type_id: TypeIdentifier,
        /// 为 `true` 时走 `get`，否则走 `create`
        shared: bool,
    },
}

impl ArgumentValue {
    /// 字面量参数
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// 已构造对象参数
    pub fn object<T>(value: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::Object(value)
    }

    /// 共享实例参数
    pub fn shared(type_id: impl Into<TypeIdentifier>) -> Self {
        Self::Type {
            type_id: type_id.into(),
            shared: true,
        }
    }

    /// 新实例参数
    pub fn new_instance(type_id: impl Into<TypeIdentifier>) -> Self {
        Self::Type {
            type_id: type_id.into(),
            shared: false,
        }
    }
}

impl fmt::Debug for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Object(_) => f.write_str("Object(<instance>)"),
            Self::Type { type_id, shared } => f
                .debug_struct("Type")
                .field("type_id", type_id)
                .field("shared", shared)
                .finish(),
        }
    }
}

/// 按参数名组织的参数集合
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: HashMap<String, ArgumentValue>,
}

impl Arguments {
    /// 创建空参数集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加参数（建造者风格）
    pub fn with(mut self, name: impl Into<String>, value: ArgumentValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// 添加字面量参数（建造者风格）
    pub fn with_literal(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(name, ArgumentValue::literal(value))
    }

    /// 插入参数，返回被覆盖的旧值
    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) -> Option<ArgumentValue> {
        self.values.insert(name.into(), value)
    }

    /// 获取参数
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    /// 取出参数
    pub fn remove(&mut self, name: &str) -> Option<ArgumentValue> {
        self.values.remove(name)
    }

    /// 是否包含参数
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 所有参数名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, ArgumentValue)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, ArgumentValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// 解析完成的参数值
#[derive(Clone)]
pub enum ResolvedValue {
    Literal(Value),
    Instance(Instance),
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Instance(_) => f.write_str("Instance(<instance>)"),
        }
    }
}

/// 交给构造函数的参数，保持构造描述中声明的顺序
#[derive(Debug, Clone)]
pub struct ResolvedArguments {
    type_id: TypeIdentifier,
    values: Vec<(String, ResolvedValue)>,
}

impl ResolvedArguments {
    pub fn new(type_id: TypeIdentifier, values: Vec<(String, ResolvedValue)>) -> Self {
        Self { type_id, values }
    }

    /// 正在构造的具体类型
    pub fn type_id(&self) -> &TypeIdentifier {
        &self.type_id
    }

    /// 按名称获取参数
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// 按位置获取参数
    pub fn at(&self, index: usize) -> Option<&ResolvedValue> {
        self.values.get(index).map(|(_, value)| value)
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// 获取字面量参数
    pub fn literal(&self, name: &str) -> DependencyResult<&Value> {
        match self.get(name) {
            Some(ResolvedValue::Literal(value)) => Ok(value),
            Some(ResolvedValue::Instance(_)) => Err(DependencyError::argument_invalid(
                name,
                "期望字面量，实际为对象实例",
            )),
            None => Err(DependencyError::argument_missing(name)),
        }
    }

    /// 将字面量参数反序列化为指定类型
    pub fn value<T>(&self, name: &str) -> DependencyResult<T>
    where
        T: DeserializeOwned,
    {
        let literal = self.literal(name)?;
        serde_json::from_value(literal.clone())
            .map_err(|e| DependencyError::argument_invalid(name, e.to_string()))
    }

    /// 获取类型擦除的实例参数
    pub fn raw_instance(&self, name: &str) -> DependencyResult<Instance> {
        match self.get(name) {
            Some(ResolvedValue::Instance(instance)) => Ok(instance.clone()),
            Some(ResolvedValue::Literal(_)) => Err(DependencyError::argument_invalid(
                name,
                "期望对象实例，实际为字面量",
            )),
            None => Err(DependencyError::argument_missing(name)),
        }
    }

    /// 获取具体类型的实例参数
    pub fn instance<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        downcast_instance(self.type_id.as_str(), self.raw_instance(name)?)
    }

    /// 获取接口类型的实例参数
    pub fn service<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        downcast_service(self.type_id.as_str(), &self.raw_instance(name)?)
    }
}
