//! 元数据定义
//!
//! 类型标识符

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// 类型标识符
///
/// 命名抽象类型或具体类型的不透明字符串，区分大小写。
/// 内部使用 `Arc<str>`，克隆开销很小，适合在解析热路径上传递。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeIdentifier(Arc<str>);

impl TypeIdentifier {
    /// 创建新的类型标识符
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// 获取字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeIdentifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeIdentifier {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&TypeIdentifier> for TypeIdentifier {
    fn from(id: &TypeIdentifier) -> Self {
        id.clone()
    }
}

impl AsRef<str> for TypeIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}
