//! 对象管理器
//!
//! 组合偏好解析、实例工厂和共享实例存储，对外提供 `create` / `get` / `configure`

use crate::config::ObjectManagerConfig;
use crate::factory::DefaultFactory;
use crate::registry::TypeRegistry;
use crate::stats::StatsCollector;
use crate::store::{SharedInstanceInfo, SharedInstanceStore};
use di_abstractions::{
    Arguments, ConstructorSpec, ContainerConfig, ContainerStats, DependencyResolver,
    DiConfiguration, Instance, InstanceFactory, LifetimePolicy, ObjectManager, PreferenceResolver,
    ResolutionStep, ResolveContext, ResolvedArguments, TypeDefinition, TypeIntrospector,
};
use di_common::{DependencyResult, TypeIdentifier, OBJECT_MANAGER_TYPE};
use std::any::Any;
use std::cell::RefCell;
use std::sync::{Arc, Weak};
use tracing::{debug, debug_span, info, warn};
use uuid::Uuid;

thread_local! {
    /// 当前线程上正在构造的类型，按对象管理器区分
    static CONSTRUCTING: RefCell<Vec<(Uuid, ResolutionStep)>> = const { RefCell::new(Vec::new()) };
}

/// 在当前线程登记一次进行中的构造，离开作用域时撤销
struct ConstructionGuard;

impl ConstructionGuard {
    fn enter(manager: Uuid, requested: &TypeIdentifier, concrete: &TypeIdentifier) -> Self {
        let step = ResolutionStep {
            requested: requested.clone(),
            concrete: concrete.clone(),
        };
        CONSTRUCTING.with(|stack| stack.borrow_mut().push((manager, step)));
        Self
    }
}

impl Drop for ConstructionGuard {
    fn drop(&mut self) {
        CONSTRUCTING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// 对象管理器实现
///
/// 每个实例拥有独立的共享实例存储；多个对象管理器之间不共享任何状态。
pub struct ObjectManagerImpl {
    id: Uuid,
    config: Arc<ObjectManagerConfig>,
    factory: Arc<dyn InstanceFactory>,
    store: SharedInstanceStore,
    stats: StatsCollector,
}

impl ObjectManagerImpl {
    /// 创建构建器
    pub fn builder() -> ObjectManagerBuilder {
        ObjectManagerBuilder::new()
    }

    /// 使用注册表和默认设置创建对象管理器
    pub fn new(registry: TypeRegistry) -> Arc<Self> {
        ObjectManagerBuilder::new().with_registry(registry).build()
    }

    /// 两阶段构造：先建立内部状态，最后把自身登记到共享实例存储
    fn assemble(
        config: Arc<ObjectManagerConfig>,
        factory: Arc<dyn InstanceFactory>,
        shared_instances: Vec<(TypeIdentifier, Instance)>,
    ) -> Arc<Self> {
        let manager = Arc::new(Self {
            id: Uuid::new_v4(),
            config,
            factory,
            store: SharedInstanceStore::new(),
            stats: StatsCollector::new(),
        });

        for (type_id, instance) in shared_instances {
            if !manager.store.register(type_id.clone(), instance) {
                warn!("预置共享实例 {} 重复，保留先登记的实例", type_id);
            }
        }

        let weak_self: Weak<dyn Any + Send + Sync> =
            Arc::downgrade(&manager) as Weak<dyn Any + Send + Sync>;
        manager
            .store
            .register_self(TypeIdentifier::from(OBJECT_MANAGER_TYPE), weak_self);

        info!("对象管理器已创建: {}", manager.id);
        manager
    }

    /// 对象管理器标识，用于区分日志
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 解析偏好
    pub fn resolve(&self, type_name: &str) -> DependencyResult<TypeIdentifier> {
        self.config.resolve(&TypeIdentifier::from(type_name))
    }

    /// 容器设置
    pub fn settings(&self) -> &ContainerConfig {
        self.config.settings()
    }

    /// 统计信息快照
    pub fn stats(&self) -> ContainerStats {
        self.stats.snapshot(self.store.len())
    }

    /// 共享实例诊断信息
    pub fn shared_instances(&self) -> Vec<SharedInstanceInfo> {
        self.store.shared_types()
    }

    /// 是否已有指定类型（偏好解析后）的共享实例
    pub fn has_shared_instance(&self, type_name: &str) -> bool {
        self.resolve(type_name)
            .map(|concrete| self.store.contains(&concrete))
            .unwrap_or(false)
    }

    /// 释放所有共享实例，对象管理器自身的登记保留
    pub fn clear_shared_instances(&self) {
        info!("清空共享实例: {}", self.id);
        self.store.clear();
    }

    /// 顶层调用的解析上下文
    ///
    /// 构造函数内部通过自身引用再次调用时，接续本线程上尚未完成的解析链，
    /// 否则会在同一个共享实例槽位上等待自己。
    fn top_level_context(&self) -> ResolveContext {
        CONSTRUCTING.with(|stack| {
            ResolveContext::resume(
                stack
                    .borrow()
                    .iter()
                    .filter(|(manager, _)| *manager == self.id)
                    .map(|(_, step)| step.clone())
                    .collect::<Vec<_>>(),
            )
        })
    }

    fn observe(
        &self,
        operation: &str,
        type_id: &TypeIdentifier,
        result: DependencyResult<Instance>,
    ) -> DependencyResult<Instance> {
        if let Err(error) = &result {
            self.stats.record_resolution_error();
            debug!("{} {} 失败: {}", operation, type_id, error);
        }
        result
    }
}

impl DependencyResolver for ObjectManagerImpl {
    fn get_in_context(
        &self,
        type_id: &TypeIdentifier,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let concrete = self
            .config
            .resolve(type_id)
            .map_err(|e| e.within(context.chain()))?;

        // 已缓存的实例不受之后配置变化影响
        if let Some(instance) = self.store.get(&concrete) {
            self.stats.record_shared_hit();
            return Ok(instance);
        }

        context.enter(type_id, &concrete)?;
        let _constructing = ConstructionGuard::enter(self.id, type_id, &concrete);
        let result = if self.config.lifetime_of(&concrete).is_shared() {
            self.store
                .get_or_create(&concrete, || {
                    self.factory
                        .create(&concrete, Arguments::new(), self, context)
                })
                .map(|(instance, created)| {
                    if created {
                        self.stats.record_shared_creation();
                        debug!("共享实例已创建: {}", concrete);
                    } else {
                        self.stats.record_shared_hit();
                    }
                    instance
                })
        } else {
            debug!("类型 {} 配置为非共享，按瞬时方式构造", concrete);
            self.factory
                .create(&concrete, Arguments::new(), self, context)
                .map(|instance| {
                    self.stats.record_transient_creation();
                    instance
                })
        };
        context.leave();
        result
    }

    fn create_in_context(
        &self,
        type_id: &TypeIdentifier,
        arguments: Arguments,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let concrete = self
            .config
            .resolve(type_id)
            .map_err(|e| e.within(context.chain()))?;

        context.enter(type_id, &concrete)?;
        let _constructing = ConstructionGuard::enter(self.id, type_id, &concrete);
        let result = self.factory.create(&concrete, arguments, self, context);
        context.leave();

        if result.is_ok() {
            self.stats.record_transient_creation();
        }
        result
    }
}

impl ObjectManager for ObjectManagerImpl {
    fn create(&self, type_name: &str, arguments: Arguments) -> DependencyResult<Instance> {
        let type_id = TypeIdentifier::from(type_name);
        let _span = debug_span!("create", manager = %self.id, type_name).entered();

        let mut context = self.top_level_context();
        let result = self.create_in_context(&type_id, arguments, &mut context);
        self.observe("create", &type_id, result)
    }

    fn get(&self, type_name: &str) -> DependencyResult<Instance> {
        let type_id = TypeIdentifier::from(type_name);
        let _span = debug_span!("get", manager = %self.id, type_name).entered();

        let mut context = self.top_level_context();
        let result = self.get_in_context(&type_id, &mut context);
        self.observe("get", &type_id, result)
    }

    fn configure(&self, configuration: DiConfiguration) {
        info!(
            "应用依赖注入配置: 偏好 {} 条, 参数 {} 个类型, 共享标记 {} 条",
            configuration.preferences.len(),
            configuration.arguments.len(),
            configuration.shared.len()
        );
        self.config.extend(configuration);
    }
}

impl std::fmt::Debug for ObjectManagerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectManagerImpl")
            .field("id", &self.id)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// 对象管理器构建器
pub struct ObjectManagerBuilder {
    registry: TypeRegistry,
    introspector: Option<Arc<dyn TypeIntrospector>>,
    factory: Option<Arc<dyn InstanceFactory>>,
    configuration: DiConfiguration,
    settings: ContainerConfig,
    shared_instances: Vec<(TypeIdentifier, Instance)>,
}

impl ObjectManagerBuilder {
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            introspector: None,
            factory: None,
            configuration: DiConfiguration::new(),
            settings: ContainerConfig::default(),
            shared_instances: Vec::new(),
        }
    }

    /// 注册类型
    pub fn register<F>(
        mut self,
        type_id: impl Into<TypeIdentifier>,
        spec: ConstructorSpec,
        constructor: F,
    ) -> Self
    where
        F: Fn(ResolvedArguments) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        self.registry.register(type_id, spec, constructor);
        self
    }

    /// 注册完整的类型定义
    pub fn register_definition(mut self, definition: TypeDefinition) -> Self {
        self.registry.register_definition(definition);
        self
    }

    /// 使用已有的注册表，之前通过 `register` 注册的类型会被合并进去
    pub fn with_registry(mut self, mut registry: TypeRegistry) -> Self {
        let previous = std::mem::take(&mut self.registry);
        for definition in previous.into_definitions() {
            registry.register_definition(definition);
        }
        self.registry = registry;
        self
    }

    /// 使用自定义类型内省器，替代内置注册表
    pub fn with_introspector(mut self, introspector: Arc<dyn TypeIntrospector>) -> Self {
        self.introspector = Some(introspector);
        self
    }

    /// 使用自定义实例工厂
    pub fn with_factory(mut self, factory: Arc<dyn InstanceFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// 合并初始配置
    pub fn configure(mut self, configuration: DiConfiguration) -> Self {
        self.configuration.merge(configuration);
        self
    }

    /// 设置容器参数
    pub fn with_settings(mut self, settings: ContainerConfig) -> Self {
        self.settings = settings;
        self
    }

    /// 预置共享实例
    pub fn with_shared_instance(mut self, type_id: impl Into<TypeIdentifier>, instance: Instance) -> Self {
        self.shared_instances.push((type_id.into(), instance));
        self
    }

    /// 构建对象管理器
    pub fn build(self) -> Arc<ObjectManagerImpl> {
        let config = Arc::new(ObjectManagerConfig::with_configuration(
            self.settings.clone(),
            self.configuration,
        ));

        let factory = match self.factory {
            Some(factory) => factory,
            None => {
                let introspector: Arc<dyn TypeIntrospector> = match self.introspector {
                    Some(introspector) => {
                        if !self.registry.is_empty() {
                            warn!(
                                "已指定自定义类型内省器，忽略 {} 个注册类型",
                                self.registry.len()
                            );
                        }
                        introspector
                    }
                    None => Arc::new(self.registry),
                };
                Arc::new(
                    DefaultFactory::new(introspector, config.clone())
                        .with_unknown_argument_warnings(self.settings.warn_on_unknown_arguments),
                )
            }
        };

        ObjectManagerImpl::assemble(config, factory, self.shared_instances)
    }
}

impl Default for ObjectManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
