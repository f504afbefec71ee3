//! 配置文件格式

use di_common::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;

/// 支持的配置格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// 根据扩展名判断格式
    pub fn from_extension(extension: &str) -> ConfigResult<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ConfigError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }

    /// 根据文件路径判断格式
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                format: path.display().to_string(),
            })?;
        Self::from_extension(extension)
    }

    /// 解析文本
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> ConfigResult<T> {
        let parsed = match self {
            Self::Toml => toml::from_str(text).map_err(|e| Box::new(e) as BoxedError),
            Self::Json => serde_json::from_str(text).map_err(|e| Box::new(e) as BoxedError),
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| Box::new(e) as BoxedError),
        };
        parsed.map_err(|source| ConfigError::ParseError { source })
    }

    /// 对应的 `config` crate 文件格式
    pub(crate) fn file_format(self) -> config::FileFormat {
        match self {
            Self::Toml => config::FileFormat::Toml,
            Self::Json => config::FileFormat::Json,
            Self::Yaml => config::FileFormat::Yaml,
        }
    }
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Toml => "toml",
            Self::Json => "json",
            Self::Yaml => "yaml",
        };
        f.write_str(name)
    }
}
