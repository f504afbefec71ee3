//! 对象管理器配置
//!
//! 偏好映射、参数覆盖和共享标记的写时复制快照

use di_abstractions::{
    ArgumentOverrides, ArgumentValue, ContainerConfig, DiConfiguration, LifetimePolicy,
    PreferenceResolver,
};
use di_common::{DependencyError, DependencyResult, Lifetime, TypeIdentifier};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 某一时刻的完整配置
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    preferences: HashMap<TypeIdentifier, TypeIdentifier>,
    arguments: HashMap<TypeIdentifier, HashMap<String, ArgumentValue>>,
    shared: HashMap<TypeIdentifier, bool>,
}

impl ConfigSnapshot {
    fn apply(&mut self, configuration: DiConfiguration) {
        self.preferences.extend(configuration.preferences);
        for (type_id, arguments) in configuration.arguments {
            self.arguments
                .entry(type_id)
                .or_default()
                .extend(arguments.into_iter().map(|(name, value)| (name, value.into())));
        }
        self.shared.extend(configuration.shared);
    }

    /// 直接配置的偏好（单跳）
    pub fn preference(&self, type_id: &TypeIdentifier) -> Option<&TypeIdentifier> {
        self.preferences.get(type_id)
    }
}

/// 对象管理器配置
///
/// 读取方拿到 `Arc` 快照，`extend` 构造新快照后整体替换，
/// 并发读取永远不会看到只应用了一半的配置。
#[derive(Debug)]
pub struct ObjectManagerConfig {
    snapshot: RwLock<Arc<ConfigSnapshot>>,
    settings: ContainerConfig,
}

impl ObjectManagerConfig {
    /// 创建空配置
    pub fn new(settings: ContainerConfig) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(ConfigSnapshot::default())),
            settings,
        }
    }

    /// 创建带初始配置的实例
    pub fn with_configuration(settings: ContainerConfig, configuration: DiConfiguration) -> Self {
        let config = Self::new(settings);
        config.extend(configuration);
        config
    }

    /// 合并配置，同名键后者覆盖前者
    pub fn extend(&self, configuration: DiConfiguration) {
        if configuration.is_empty() {
            return;
        }

        let mut guard = self.snapshot.write();
        let mut next = ConfigSnapshot::clone(&guard);
        next.apply(configuration);
        debug!(
            "配置已更新，偏好 {} 条，参数覆盖 {} 个类型",
            next.preferences.len(),
            next.arguments.len()
        );
        *guard = Arc::new(next);
    }

    /// 当前配置快照
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.snapshot.read().clone()
    }

    /// 容器设置
    pub fn settings(&self) -> &ContainerConfig {
        &self.settings
    }
}

impl PreferenceResolver for ObjectManagerConfig {
    fn resolve(&self, requested: &TypeIdentifier) -> DependencyResult<TypeIdentifier> {
        let snapshot = self.snapshot();
        let mut chain = vec![requested.clone()];
        let mut current = requested;

        for _ in 0..self.settings.max_preference_hops {
            match snapshot.preferences.get(current) {
                Some(next) if next != current => {
                    if chain.contains(next) {
                        chain.push(next.clone());
                        return Err(invalid_preference(requested, &chain));
                    }
                    chain.push(next.clone());
                    current = next;
                }
                _ => return Ok(current.clone()),
            }
        }

        match snapshot.preferences.get(current) {
            Some(next) if next != current => {
                chain.push(next.clone());
                Err(invalid_preference(requested, &chain))
            }
            _ => Ok(current.clone()),
        }
    }
}

fn invalid_preference(requested: &TypeIdentifier, chain: &[TypeIdentifier]) -> DependencyError {
    DependencyError::InvalidPreference {
        type_name: requested.to_string(),
        preference_chain: chain
            .iter()
            .map(TypeIdentifier::as_str)
            .collect::<Vec<_>>()
            .join(" -> "),
        resolution_chain: "<root>".to_string(),
    }
}

impl ArgumentOverrides for ObjectManagerConfig {
    fn configured_argument(&self, type_id: &TypeIdentifier, parameter: &str) -> Option<ArgumentValue> {
        self.snapshot()
            .arguments
            .get(type_id)
            .and_then(|arguments| arguments.get(parameter))
            .cloned()
    }
}

impl LifetimePolicy for ObjectManagerConfig {
    fn lifetime_of(&self, type_id: &TypeIdentifier) -> Lifetime {
        let shared = self
            .snapshot()
            .shared
            .get(type_id)
            .copied()
            .unwrap_or(self.settings.shared_by_default);
        Lifetime::from_shared_flag(shared)
    }
}
