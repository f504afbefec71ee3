//! 配置加载器
//!
//! `container` 节经由 `config` crate 分层合并文件与环境变量；
//! `di` 节的键是类型名，按原样逐个文件解析后依次合并，后加载的文件覆盖先加载的。

use crate::format::ConfigFormat;
use crate::settings::ObjectManagerSettings;
use di_abstractions::ContainerConfig;
use di_common::{ConfigError, ConfigResult};
use std::path::PathBuf;
use tracing::{debug, info};

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "DI";

/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 配置加载器
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    files: Vec<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// 创建加载器，默认读取 `DI__` 前缀的环境变量
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }

    /// 追加配置文件，格式由扩展名决定
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 不读取环境变量
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// 加载并校验设置
    pub fn load(&self) -> ConfigResult<ObjectManagerSettings> {
        let mut builder = config::Config::builder();
        let mut settings = ObjectManagerSettings::default();

        for path in &self.files {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            let format = ConfigFormat::from_path(path)?;
            debug!("加载配置文件: {} ({})", path.display(), format);

            let text = std::fs::read_to_string(path)?;
            let document: ObjectManagerSettings = format.parse(&text)?;
            settings.di.merge(document.di);

            builder = builder.add_source(
                config::File::from(path.as_path())
                    .format(format.file_format())
                    .required(true),
            );
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let layered = builder.build().map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        settings.container = match layered.get::<ContainerConfig>("container") {
            Ok(container) => container,
            Err(config::ConfigError::NotFound(_)) => ContainerConfig::default(),
            Err(e) => {
                return Err(ConfigError::ParseError {
                    source: Box::new(e),
                })
            }
        };

        settings.validate()?;
        info!(
            "对象管理器配置加载完成: {} 个文件, 偏好 {} 条",
            self.files.len(),
            settings.di.preferences.len()
        );
        Ok(settings)
    }

    /// 从文本加载，不读取环境变量
    pub fn load_str(format: ConfigFormat, text: &str) -> ConfigResult<ObjectManagerSettings> {
        let settings: ObjectManagerSettings = format.parse(text)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
