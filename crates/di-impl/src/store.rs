//! 共享实例存储
//!
//! 每个类型一个 `OnceCell` 槽位：并发首次访问时同一类型最多构造一次，
//! 构造过程中对其他类型的嵌套访问不会争用同一把锁。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use di_abstractions::Instance;
use di_common::{DependencyError, DependencyResult, TypeIdentifier};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::{Arc, Weak};

/// 存储的实例
enum StoredInstance {
    /// 存储独占持有的实例
    Owned(Instance),
    /// 对象管理器自身，使用弱引用避免与存储形成引用环
    SelfReference(Weak<dyn Any + Send + Sync>),
}

struct SharedEntry {
    instance: StoredInstance,
    created_at: DateTime<Utc>,
}

impl SharedEntry {
    fn owned(instance: Instance) -> Self {
        Self {
            instance: StoredInstance::Owned(instance),
            created_at: Utc::now(),
        }
    }

    fn instance(&self) -> Option<Instance> {
        match &self.instance {
            StoredInstance::Owned(instance) => Some(instance.clone()),
            StoredInstance::SelfReference(weak) => weak.upgrade(),
        }
    }

    fn is_self_reference(&self) -> bool {
        matches!(self.instance, StoredInstance::SelfReference(_))
    }
}

type Slot = Arc<OnceCell<SharedEntry>>;

/// 共享实例信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedInstanceInfo {
    pub type_id: TypeIdentifier,
    pub created_at: DateTime<Utc>,
    pub self_reference: bool,
}

/// 共享实例存储
#[derive(Default)]
pub struct SharedInstanceStore {
    slots: DashMap<TypeIdentifier, Slot>,
}

impl SharedInstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取已存在的实例
    pub fn get(&self, type_id: &TypeIdentifier) -> Option<Instance> {
        self.slots
            .get(type_id)
            .and_then(|slot| slot.value().get().and_then(SharedEntry::instance))
    }

    /// 获取实例，不存在时调用 `factory` 构造并保存
    ///
    /// 返回值中的布尔值表示本次调用是否执行了构造。`factory` 失败时不保存任何内容。
    pub fn get_or_create<F>(
        &self,
        type_id: &TypeIdentifier,
        factory: F,
    ) -> DependencyResult<(Instance, bool)>
    where
        F: FnOnce() -> DependencyResult<Instance>,
    {
        if let Some(instance) = self.get(type_id) {
            return Ok((instance, false));
        }

        let slot = self.slots.entry(type_id.clone()).or_default().clone();
        let mut created = false;
        let entry = slot.get_or_try_init(|| {
            created = true;
            factory().map(SharedEntry::owned)
        })?;

        match entry.instance() {
            Some(instance) => Ok((instance, created)),
            None => Err(DependencyError::UnresolvableType {
                type_name: type_id.to_string(),
                resolution_chain: "<released>".to_string(),
            }),
        }
    }

    /// 登记外部构造好的实例，类型已存在时返回 `false`
    pub fn register(&self, type_id: TypeIdentifier, instance: Instance) -> bool {
        let slot = self.slots.entry(type_id).or_default().clone();
        slot.set(SharedEntry::owned(instance)).is_ok()
    }

    /// 登记对象管理器自身，覆盖同名条目
    pub fn register_self(&self, type_id: TypeIdentifier, manager: Weak<dyn Any + Send + Sync>) {
        let entry = SharedEntry {
            instance: StoredInstance::SelfReference(manager),
            created_at: Utc::now(),
        };
        self.slots.insert(type_id, Arc::new(OnceCell::with_value(entry)));
    }

    /// 是否已有指定类型的实例
    pub fn contains(&self, type_id: &TypeIdentifier) -> bool {
        self.slots
            .get(type_id)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// 已构造的实例数量
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 所有共享实例的诊断信息，按类型名排序
    pub fn shared_types(&self) -> Vec<SharedInstanceInfo> {
        let mut infos: Vec<_> = self
            .slots
            .iter()
            .filter_map(|slot| {
                slot.value().get().map(|entry| SharedInstanceInfo {
                    type_id: slot.key().clone(),
                    created_at: entry.created_at,
                    self_reference: entry.is_self_reference(),
                })
            })
            .collect();
        infos.sort_by(|a, b| a.type_id.cmp(&b.type_id));
        infos
    }

    /// 释放所有独占持有的实例，自身登记保留
    ///
    /// 正在构造中的槽位也保留，构造完成后的实例仍然只有一份。
    pub fn clear(&self) {
        self.slots
            .retain(|_, slot| slot.get().map_or(true, SharedEntry::is_self_reference));
    }
}

impl std::fmt::Debug for SharedInstanceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedInstanceStore")
            .field("instances", &self.len())
            .finish()
    }
}
