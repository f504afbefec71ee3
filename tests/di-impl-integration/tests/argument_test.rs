//! 构造参数解析集成测试


use common::{catalog, catalog_with_file_logger, init_tracing, Formatter, Logger, Mailer, Report};
use di_abstractions::{
    ArgumentConfig, ArgumentValue, Arguments, DiConfiguration, ObjectManager, ObjectManagerExt,
};
use di_common::DependencyError;
use std::sync::Arc;

#[test]
fn test_caller_beats_configured_beats_default() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default()).build();

    let mailer = manager.create_as::<Mailer>("Mailer", Arguments::new()).unwrap();
    assert_eq!(mailer.host, "localhost");

    manager.configure(DiConfiguration::new().argument(
        "Mailer",
        "host",
        ArgumentConfig::literal("smtp.configured"),
    ));
    let mailer = manager.create_as::<Mailer>("Mailer", Arguments::new()).unwrap();
    assert_eq!(mailer.host, "smtp.configured");

    let mailer = manager
        .create_as::<Mailer>("Mailer", Arguments::new().with_literal("host", "smtp.caller"))
        .unwrap();
    assert_eq!(mailer.host, "smtp.caller");
    assert_eq!(mailer.port, 25);
}

#[test]
fn test_interface_parameter_receives_shared_implementation() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default()).build();

    let mailer = manager.create_as::<Mailer>("Mailer", Arguments::new()).unwrap();
    let logger = manager.get_service::<dyn Logger>("Logger").unwrap();

    assert!(Arc::ptr_eq(&mailer.logger, &logger));
    assert_eq!(mailer.logger.format("hi"), "[app] hi");
}

#[test]
fn test_transient_parameter_gets_fresh_instance() {
    init_tracing();
    let manager = catalog(Arc::default()).build();

    let first = manager.create_as::<Report>("Report", Arguments::new()).unwrap();
    let second = manager.create_as::<Report>("Report", Arguments::new()).unwrap();
    let shared = manager.get_as::<Formatter>("Formatter").unwrap();

    assert!(!Arc::ptr_eq(&first.formatter, &second.formatter));
    assert!(!Arc::ptr_eq(&first.formatter, &shared));
}

#[test]
fn test_configured_instance_argument() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default())
        .configure(DiConfiguration::new().argument(
            "Mailer",
            "logger",
            ArgumentConfig::instance("NullLogger", true),
        ))
        .build();

    let mailer = manager.create_as::<Mailer>("Mailer", Arguments::new()).unwrap();
    assert_eq!(mailer.logger.name(), "null");
    assert!(!manager.has_shared_instance("FileLogger"));
}

#[test]
fn test_caller_object_argument() {
    init_tracing();
    let manager = catalog(Arc::default()).build();
    let logger: Arc<dyn Logger> = Arc::new(common::NullLogger);

    let mailer = manager
        .create_as::<Mailer>(
            "Mailer",
            Arguments::new().with("logger", ArgumentValue::object(Arc::new(logger.clone()))),
        )
        .unwrap();

    assert!(Arc::ptr_eq(&mailer.logger, &logger));
}

#[test]
fn test_configured_literal_reaches_nested_dependency() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default())
        .configure(DiConfiguration::new().argument(
            "Formatter",
            "prefix",
            ArgumentConfig::literal("[mail]"),
        ))
        .build();

    let mailer = manager.create_as::<Mailer>("Mailer", Arguments::new()).unwrap();
    assert_eq!(mailer.logger.format("sent"), "[mail] sent");
}

#[test]
fn test_missing_interface_preference_is_unresolvable_type() {
    init_tracing();
    let manager = catalog(Arc::default()).build();

    let error = manager.create("Mailer", Arguments::new()).unwrap_err();
    match error {
        DependencyError::UnresolvableType {
            type_name,
            resolution_chain,
        } => {
            assert_eq!(type_name, "Logger");
            assert_eq!(resolution_chain, "Mailer -> Logger");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_value_parameter_without_value_is_unresolvable_dependency() {
    init_tracing();
    let manager = catalog(Arc::default())
        .register(
            "Connection",
            di_abstractions::ConstructorSpec::new()
                .parameter(di_abstractions::ParameterDescriptor::value("dsn")),
            |args| Ok(di_abstractions::instance_of(args.value::<String>("dsn")?)),
        )
        .build();

    let error = manager.get("Connection").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::UnresolvableDependency { ref type_name, ref parameter, .. }
            if type_name == "Connection" && parameter == "dsn"
    ));

    let connection = manager
        .create_as::<String>("Connection", Arguments::new().with_literal("dsn", "mysql://db"))
        .unwrap();
    assert_eq!(connection.as_str(), "mysql://db");
}

#[test]
fn test_constructor_failure_is_propagated() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default()).build();

    let error = manager
        .create("Mailer", Arguments::new().with_literal("port", 0))
        .unwrap_err();
    assert!(matches!(error, DependencyError::ComponentCreationFailed { ref type_name, .. } if type_name == "Mailer"));

    let error = manager
        .create("Mailer", Arguments::new().with_literal("port", "not a port"))
        .unwrap_err();
    assert!(matches!(error, DependencyError::ArgumentInvalid { ref parameter, .. } if parameter == "port"));
}
