//! 对象管理器设置

use di_abstractions::{ContainerConfig, DiConfiguration};
use di_common::{ConfigError, ConfigResult};
use di_impl::ObjectManagerBuilder;
use serde::{Deserialize, Serialize};

/// 对象管理器完整设置：容器参数加依赖注入配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectManagerSettings {
    pub container: ContainerConfig,
    pub di: DiConfiguration,
}

impl ObjectManagerSettings {
    /// 校验设置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.container.max_preference_hops == 0 {
            return Err(ConfigError::ValidationError {
                message: "container.max_preference_hops 必须大于 0".to_string(),
            });
        }

        for (type_id, arguments) in &self.di.arguments {
            if arguments.keys().any(|name| name.trim().is_empty()) {
                return Err(ConfigError::ValidationError {
                    message: format!("类型 {type_id} 的参数名不能为空"),
                });
            }
        }

        Ok(())
    }

    /// 把设置应用到对象管理器构建器
    pub fn apply(self, builder: ObjectManagerBuilder) -> ObjectManagerBuilder {
        builder.with_settings(self.container).configure(self.di)
    }
}
