//! 共享与瞬时实例生命周期集成测试


use common::{catalog, catalog_with_file_logger, init_tracing, Formatter, Logger, Mailer};
use di_abstractions::{
    instance_of, ArgumentConfig, Arguments, ConstructorSpec, DiConfiguration, ObjectManager,
    ObjectManagerExt, ParameterDescriptor,
};
use di_common::{DependencyError, OBJECT_MANAGER_TYPE};
use di_impl::ObjectManagerImpl;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

#[test]
fn test_get_is_pointer_identical() {
    init_tracing();
    let constructions = Arc::new(AtomicUsize::new(0));
    let manager = catalog_with_file_logger(constructions.clone()).build();

    let first = manager.get_service::<dyn Logger>("Logger").unwrap();
    let second = manager.get_service::<dyn Logger>("Logger").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_create_is_always_fresh() {
    init_tracing();
    let constructions = Arc::new(AtomicUsize::new(0));
    let manager = catalog_with_file_logger(constructions.clone()).build();

    let shared = manager.get_service::<dyn Logger>("FileLogger").unwrap();
    let first = manager.create_service::<dyn Logger>("FileLogger", Arguments::new()).unwrap();
    let second = manager.create_service::<dyn Logger>("Logger", Arguments::new()).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&shared, &first));
    assert!(!Arc::ptr_eq(&shared, &second));
    assert_eq!(constructions.load(Ordering::SeqCst), 3);

    // 瞬时实例的依赖仍然共享
    let mailer = manager.create_as::<Mailer>("Mailer", Arguments::new()).unwrap();
    assert!(Arc::ptr_eq(&mailer.logger, &shared));
    assert_eq!(manager.stats().shared_creations, 2);
}

#[test]
fn test_diamond_dependencies_converge() {
    init_tracing();
    let constructions = Arc::new(AtomicUsize::new(0));
    let manager = catalog_with_file_logger(constructions.clone())
        .register(
            "Notifier",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::typed("mailer", "Mailer"))
                .parameter(ParameterDescriptor::typed("logger", "Logger")),
            |args| {
                let mailer = args.instance::<Mailer>("mailer")?;
                let logger = args.service::<dyn Logger>("logger")?;
                Ok(instance_of(Arc::ptr_eq(&mailer.logger, &logger)))
            },
        )
        .build();

    let same_logger = manager.create_as::<bool>("Notifier", Arguments::new()).unwrap();
    assert!(*same_logger);
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_object_manager_resolves_to_itself() {
    init_tracing();
    let manager = catalog(Arc::default())
        .register(
            "EventCollectionFactory",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::typed("object_manager", OBJECT_MANAGER_TYPE)),
            |args| Ok(instance_of(args.instance::<ObjectManagerImpl>("object_manager")?)),
        )
        .build();

    let direct = manager.get_as::<ObjectManagerImpl>(OBJECT_MANAGER_TYPE).unwrap();
    assert!(Arc::ptr_eq(&direct, &manager));

    let factory = manager
        .create_as::<Arc<ObjectManagerImpl>>("EventCollectionFactory", Arguments::new())
        .unwrap();
    assert!(Arc::ptr_eq(&*factory, &manager));

    // 不同的对象管理器互不共享
    let other = catalog(Arc::default()).build();
    let other_self = other.get_as::<ObjectManagerImpl>(OBJECT_MANAGER_TYPE).unwrap();
    assert!(!Arc::ptr_eq(&other_self, &manager));
    assert_ne!(other.id(), manager.id());
}

fn locator_catalog() -> Arc<ObjectManagerImpl> {
    catalog(Arc::default())
        .register(
            "Locator",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::typed("object_manager", OBJECT_MANAGER_TYPE)),
            |args| {
                let manager = args.instance::<ObjectManagerImpl>("object_manager")?;
                manager.get("Locator")?;
                Ok(instance_of(()))
            },
        )
        .register(
            "LocatorFactory",
            ConstructorSpec::new()
                .parameter(ParameterDescriptor::typed("object_manager", OBJECT_MANAGER_TYPE)),
            |args| {
                let manager = args.instance::<ObjectManagerImpl>("object_manager")?;
                manager.create("LocatorFactory", Arguments::new())?;
                Ok(instance_of(()))
            },
        )
        .build()
}

#[test]
fn test_constructor_requesting_itself_reports_cycle() {
    init_tracing();
    let manager = locator_catalog();

    // 在独立线程上执行，自身等待时测试以超时失败而不是挂起
    let (tx, rx) = mpsc::channel();
    let worker = manager.clone();
    thread::spawn(move || {
        let shared = worker.get("Locator").map(|_| ());
        let transient = worker.create("LocatorFactory", Arguments::new()).map(|_| ());
        let _ = tx.send((shared, transient));
    });
    let (shared, transient) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("constructor re-entering the manager must not block");

    assert!(matches!(
        shared,
        Err(DependencyError::CircularDependency { ref dependency_chain })
            if dependency_chain == "Locator -> Locator"
    ));
    assert!(matches!(
        transient,
        Err(DependencyError::CircularDependency { ref dependency_chain })
            if dependency_chain == "LocatorFactory -> LocatorFactory"
    ));

    // 失败的构造不会留下半成品，之后的请求照常报告循环
    assert!(!manager.has_shared_instance("Locator"));
    assert!(matches!(
        manager.get("Locator"),
        Err(DependencyError::CircularDependency { .. })
    ));
}

#[test]
fn test_self_reference_does_not_keep_manager_alive() {
    init_tracing();
    let manager = catalog(Arc::default()).build();
    let weak = Arc::downgrade(&manager);

    drop(manager);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_configure_does_not_touch_cached_instances() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default()).build();

    let logger = manager.get_service::<dyn Logger>("FileLogger").unwrap();
    let mailer = manager.get_as::<Mailer>("Mailer").unwrap();

    manager.configure(
        DiConfiguration::new()
            .preference("Logger", "NullLogger")
            .argument("FileLogger", "path", ArgumentConfig::literal("/var/log/other.log"))
            .argument("Mailer", "host", ArgumentConfig::literal("smtp.new")),
    );

    assert!(Arc::ptr_eq(
        &logger,
        &manager.get_service::<dyn Logger>("FileLogger").unwrap()
    ));
    let cached_mailer = manager.get_as::<Mailer>("Mailer").unwrap();
    assert!(Arc::ptr_eq(&mailer, &cached_mailer));
    assert_eq!(cached_mailer.host, "localhost");
    assert_eq!(cached_mailer.logger.name(), "file");

    // 新构造的实例使用新配置
    let fresh = manager.create_as::<Mailer>("Mailer", Arguments::new()).unwrap();
    assert_eq!(fresh.host, "smtp.new");
    assert_eq!(fresh.logger.name(), "null");
}

#[test]
fn test_non_shared_type_is_never_cached() {
    init_tracing();
    let constructions = Arc::new(AtomicUsize::new(0));
    let manager = catalog_with_file_logger(constructions.clone())
        .configure(DiConfiguration::new().shared("FileLogger", false))
        .build();

    let first = manager.get_service::<dyn Logger>("Logger").unwrap();
    let second = manager.get_service::<dyn Logger>("Logger").unwrap();
    let mailer = manager.get_as::<Mailer>("Mailer").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first, &mailer.logger));
    assert_eq!(constructions.load(Ordering::SeqCst), 3);
    assert!(!manager.has_shared_instance("Logger"));
    assert!(manager.has_shared_instance("Mailer"));
}

#[test]
fn test_direct_self_dependency_is_circular() {
    init_tracing();
    let manager = ObjectManagerImpl::builder()
        .register(
            "Selfish",
            ConstructorSpec::new().parameter(ParameterDescriptor::typed("me", "Selfish")),
            |_| Ok(instance_of(())),
        )
        .build();

    let error = manager.get("Selfish").unwrap_err();
    match error {
        DependencyError::CircularDependency { dependency_chain } => {
            assert_eq!(dependency_chain, "Selfish -> Selfish");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!manager.has_shared_instance("Selfish"));
}

#[test]
fn test_transitive_cycle_through_preference_is_circular() {
    init_tracing();
    let manager = ObjectManagerImpl::builder()
        .register(
            "Alpha",
            ConstructorSpec::new().parameter(ParameterDescriptor::typed("beta", "Beta")),
            |_| Ok(instance_of(())),
        )
        .register(
            "Beta",
            ConstructorSpec::new().parameter(ParameterDescriptor::typed("node", "Node").transient()),
            |_| Ok(instance_of(())),
        )
        .configure(DiConfiguration::new().preference("Node", "Alpha"))
        .build();

    for result in [
        manager.get("Alpha"),
        manager.create("Node", Arguments::new()),
    ] {
        match result {
            Err(DependencyError::CircularDependency { dependency_chain }) => {
                assert!(dependency_chain.ends_with("Beta -> Node => Alpha"), "{dependency_chain}");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("cycle was not detected"),
        }
    }

    assert!(!manager.has_shared_instance("Alpha"));
    assert!(!manager.has_shared_instance("Beta"));
    assert_eq!(manager.stats().resolution_errors, 2);
}

#[test]
fn test_pre_seeded_instances_and_clear() {
    init_tracing();
    let seeded = Arc::new(Formatter {
        prefix: "[seeded]".to_string(),
    });
    let manager = catalog_with_file_logger(Arc::default())
        .with_shared_instance("Formatter", seeded.clone())
        .build();

    let logger = manager.get_service::<dyn Logger>("Logger").unwrap();
    assert_eq!(logger.format("x"), "[seeded] x");
    assert!(Arc::ptr_eq(&manager.get_as::<Formatter>("Formatter").unwrap(), &seeded));

    let types: Vec<String> = manager
        .shared_instances()
        .into_iter()
        .map(|info| info.type_id.to_string())
        .collect();
    assert_eq!(types, vec!["FileLogger", "Formatter", OBJECT_MANAGER_TYPE]);

    manager.clear_shared_instances();
    assert_eq!(manager.stats().active_shared_instances, 1);

    let rebuilt = manager.get_as::<Formatter>("Formatter").unwrap();
    assert_eq!(rebuilt.prefix, "[app]");
    assert!(manager.get(OBJECT_MANAGER_TYPE).is_ok());
}

#[test]
fn test_stats_track_creations_and_hits() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default()).build();

    manager.get("Logger").unwrap();
    manager.get("Logger").unwrap();
    manager.create("Mailer", Arguments::new()).unwrap();
    assert!(manager.get("Missing").is_err());

    let stats = manager.stats();
    // FileLogger + Formatter
    assert_eq!(stats.shared_creations, 2);
    // 第二次 get 以及 Mailer 的 logger 参数
    assert_eq!(stats.shared_hits, 2);
    assert_eq!(stats.transient_creations, 1);
    assert_eq!(stats.resolution_errors, 1);
    assert_eq!(stats.active_shared_instances, 3);
}
