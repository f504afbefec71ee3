//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("不支持的配置格式: {format}")]
    UnsupportedFormat { format: String },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
///
/// 所有变体都不会在容器内部被恢复，而是原样传播给 `create` / `get` 的调用方。
#[derive(Error, Debug)]
pub enum DependencyError {
    /// 偏好链出现循环或超过最大跳数
    #[error("偏好配置无效: {type_name}, 偏好链: {preference_chain}, 解析链: {resolution_chain}")]
    InvalidPreference {
        type_name: String,
        preference_chain: String,
        resolution_chain: String,
    },

    #[error("无法解析类型: {type_name}, 解析链: {resolution_chain}")]
    UnresolvableType {
        type_name: String,
        resolution_chain: String,
    },

    #[error("无法解析依赖: {type_name}::{parameter}, 解析链: {resolution_chain}")]
    UnresolvableDependency {
        type_name: String,
        parameter: String,
        resolution_chain: String,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("实例类型不匹配: {type_name}, 期望 {expected}")]
    TypeMismatch { type_name: String, expected: String },

    #[error("构造参数缺失: {parameter}")]
    ArgumentMissing { parameter: String },

    #[error("构造参数无效: {parameter}, 原因: {message}")]
    ArgumentInvalid { parameter: String, message: String },
}

impl DependencyError {
    /// 创建参数缺失错误
    pub fn argument_missing(parameter: impl Into<String>) -> Self {
        Self::ArgumentMissing {
            parameter: parameter.into(),
        }
    }

    /// 创建参数无效错误
    pub fn argument_invalid(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArgumentInvalid {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// 包装构造函数内部的失败
    pub fn creation_failed<E>(type_name: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 补充发生偏好错误时所在的依赖路径，其他错误原样返回
    pub fn within(self, resolution_chain: impl Into<String>) -> Self {
        match self {
            Self::InvalidPreference {
                type_name,
                preference_chain,
                ..
            } => Self::InvalidPreference {
                type_name,
                preference_chain,
                resolution_chain: resolution_chain.into(),
            },
            other => other,
        }
    }

    /// 是否为配置类错误（偏好链无效）
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidPreference { .. })
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
