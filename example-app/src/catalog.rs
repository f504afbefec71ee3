//! 示例组件及其注册

use di_abstractions::{
    instance_of, service_instance, Arguments, ConstructorSpec, ObjectManagerExt,
    ParameterDescriptor,
};
use di_common::{DependencyError, DependencyResult, OBJECT_MANAGER_TYPE};
use di_impl::{ObjectManagerBuilder, ObjectManagerImpl};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use tracing::info;

/// 事件日志接口
pub trait EventLogger: Send + Sync {
    fn kind(&self) -> &'static str;
    fn record(&self, message: &str);

    /// 已记录的内容，不保存记录的实现返回空
    fn history(&self) -> Vec<String> {
        Vec::new()
    }
}

/// 输出到标准输出
pub struct ConsoleEventLogger {
    prefix: String,
}

impl EventLogger for ConsoleEventLogger {
    fn kind(&self) -> &'static str {
        "ConsoleEventLogger"
    }

    fn record(&self, message: &str) {
        println!("{} {}", self.prefix, message);
    }
}

/// 记录在内存中
#[derive(Default)]
pub struct MemoryEventLogger {
    lines: Mutex<Vec<String>>,
}

impl EventLogger for MemoryEventLogger {
    fn kind(&self) -> &'static str {
        "MemoryEventLogger"
    }

    fn record(&self, message: &str) {
        self.lines.lock().push(message.to_string());
    }

    fn history(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: u64,
    pub name: String,
}

/// 一页事件
#[derive(Debug, Serialize)]
pub struct EventCollection {
    pub page_size: usize,
    pub events: Vec<Event>,
}

/// 通过对象管理器创建事件集合
pub struct EventCollectionFactory {
    object_manager: Weak<ObjectManagerImpl>,
}

impl EventCollectionFactory {
    /// 创建新的事件集合，`arguments` 覆盖配置参数
    pub fn create(&self, arguments: Arguments) -> DependencyResult<Arc<EventCollection>> {
        let object_manager = self.object_manager.upgrade().ok_or_else(|| {
            DependencyError::creation_failed("EventCollection", "对象管理器已释放")
        })?;
        object_manager.create_as::<EventCollection>("EventCollection", arguments)
    }
}

/// 事件仓库
pub struct EventRepository {
    collections: Arc<EventCollectionFactory>,
    logger: Arc<dyn EventLogger>,
    source: Vec<Event>,
}

impl EventRepository {
    /// 读取第 `page` 页（从 0 开始），页大小取自 `EventCollection` 的配置
    pub fn page(&self, page: usize) -> DependencyResult<EventCollection> {
        let page_size = self.collections.create(Arguments::new())?.page_size;
        let events: Vec<Event> = self
            .source
            .iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();
        self.logger
            .record(&format!("读取第 {} 页, {} 条事件", page, events.len()));
        Ok(EventCollection { page_size, events })
    }

    pub fn logger(&self) -> &Arc<dyn EventLogger> {
        &self.logger
    }
}

fn sample_events() -> Vec<Event> {
    ["signup", "login", "purchase", "refund", "logout"]
        .iter()
        .enumerate()
        .map(|(i, name)| Event {
            id: i as u64 + 1,
            name: (*name).to_string(),
        })
        .collect()
}

/// 注册示例组件
pub fn register(builder: ObjectManagerBuilder) -> ObjectManagerBuilder {
    info!("注册示例组件");
    builder
        .register(
            "ConsoleEventLogger",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::value("prefix").with_default(">")),
            |args| {
                let logger: Arc<dyn EventLogger> = Arc::new(ConsoleEventLogger {
                    prefix: args.value("prefix")?,
                });
                Ok(service_instance(logger))
            },
        )
        .register("MemoryEventLogger", ConstructorSpec::new(), |_| {
            let logger: Arc<dyn EventLogger> = Arc::new(MemoryEventLogger::default());
            Ok(service_instance(logger))
        })
        .register(
            "EventCollection",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::value("page_size").with_default(10)),
            |args| {
                let page_size: usize = args.value("page_size")?;
                if page_size == 0 {
                    return Err(DependencyError::argument_invalid("page_size", "必须大于 0"));
                }
                Ok(instance_of(EventCollection {
                    page_size,
                    events: Vec::new(),
                }))
            },
        )
        .register(
            "EventCollectionFactory",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::typed("object_manager", OBJECT_MANAGER_TYPE)),
            |args| {
                let object_manager = args.instance::<ObjectManagerImpl>("object_manager")?;
                Ok(instance_of(EventCollectionFactory {
                    object_manager: Arc::downgrade(&object_manager),
                }))
            },
        )
        .register(
            "EventRepository",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::typed("collections", "EventCollectionFactory"))
                .parameter(ParameterDescriptor::typed("logger", "EventLogger")),
            |args| {
                Ok(instance_of(EventRepository {
                    collections: args.instance("collections")?,
                    logger: args.service("logger")?,
                    source: sample_events(),
                }))
            },
        )
}
