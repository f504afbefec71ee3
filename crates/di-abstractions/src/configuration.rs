//! 声明式依赖注入配置
//!
//! 外部配置加载方交给 `configure` 的数据模型

use crate::arguments::ArgumentValue;
use di_common::TypeIdentifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 依赖注入配置
///
/// ```toml
/// [preferences]
/// Logger = "FileLogger"
///
/// [arguments.Mailer]
/// host = "smtp.local"
/// logger = { instance = "FileLogger", shared = false }
///
/// [shared]
/// RequestContext = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiConfiguration {
    /// 抽象类型 -> 具体类型
    pub preferences: BTreeMap<TypeIdentifier, TypeIdentifier>,
    /// 具体类型 -> 参数名 -> 参数值
    pub arguments: BTreeMap<TypeIdentifier, BTreeMap<String, ArgumentConfig>>,
    /// 类型级共享标记
    pub shared: BTreeMap<TypeIdentifier, bool>,
}

impl DiConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加偏好
    pub fn preference(
        mut self,
        abstract_type: impl Into<TypeIdentifier>,
        concrete_type: impl Into<TypeIdentifier>,
    ) -> Self {
        self.preferences
            .insert(abstract_type.into(), concrete_type.into());
        self
    }

    /// 添加参数覆盖
    pub fn argument(
        mut self,
        type_id: impl Into<TypeIdentifier>,
        parameter: impl Into<String>,
        value: ArgumentConfig,
    ) -> Self {
        self.arguments
            .entry(type_id.into())
            .or_default()
            .insert(parameter.into(), value);
        self
    }

    /// 设置类型级共享标记
    pub fn shared(mut self, type_id: impl Into<TypeIdentifier>, shared: bool) -> Self {
        self.shared.insert(type_id.into(), shared);
        self
    }

    /// 合并另一份配置，同名键以 `other` 为准
    pub fn merge(&mut self, other: DiConfiguration) {
        self.preferences.extend(other.preferences);
        for (type_id, arguments) in other.arguments {
            self.arguments.entry(type_id).or_default().extend(arguments);
        }
        self.shared.extend(other.shared);
    }

    /// 是否为空配置
    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty() && self.arguments.is_empty() && self.shared.is_empty()
    }
}

/// 配置文件中的参数值
///
/// 含有 `instance` 键的表被视为类型引用，其余任意值都是字面量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentConfig {
    Instance {
        instance: TypeIdentifier,
        #[serde(default = "default_shared")]
        shared: bool,
    },
    Literal(Value),
}

fn default_shared() -> bool {
    true
}

impl ArgumentConfig {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn instance(type_id: impl Into<TypeIdentifier>, shared: bool) -> Self {
        Self::Instance {
            instance: type_id.into(),
            shared,
        }
    }
}

impl From<ArgumentConfig> for ArgumentValue {
    fn from(config: ArgumentConfig) -> Self {
        match config {
            ArgumentConfig::Instance { instance, shared } => ArgumentValue::Type {
                type_id: instance,
                shared,
            },
            ArgumentConfig::Literal(value) => ArgumentValue::Literal(value),
        }
    }
}
