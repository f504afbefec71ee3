//! 偏好解析集成测试


use common::{catalog, catalog_with_file_logger, init_tracing, Logger};
use di_abstractions::{
    Arguments, ContainerConfig, DiConfiguration, ObjectManager, ObjectManagerExt,
};
use di_common::{DependencyError, TypeIdentifier};
use di_impl::ObjectManagerImpl;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

#[test]
fn test_type_without_preference_resolves_to_itself() {
    init_tracing();
    let manager = catalog(Arc::default()).build();

    assert_eq!(manager.resolve("Formatter").unwrap(), TypeIdentifier::from("Formatter"));
    assert_eq!(manager.resolve("Unknown").unwrap(), TypeIdentifier::from("Unknown"));
}

#[test]
fn test_preference_redirects_get() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::default()).build();

    assert_eq!(manager.resolve("Logger").unwrap(), TypeIdentifier::from("FileLogger"));

    let by_interface = manager.get("Logger").unwrap();
    let by_concrete = manager.get("FileLogger").unwrap();
    assert!(Arc::ptr_eq(&by_interface, &by_concrete));

    let logger = manager.get_service::<dyn Logger>("Logger").unwrap();
    assert_eq!(logger.name(), "file");
}

#[test]
fn test_preference_chain_is_followed() {
    init_tracing();
    let manager = catalog(Arc::default())
        .configure(
            DiConfiguration::new()
                .preference("Logger", "DefaultLogger")
                .preference("DefaultLogger", "NullLogger"),
        )
        .build();

    assert_eq!(manager.resolve("Logger").unwrap(), TypeIdentifier::from("NullLogger"));
    assert_eq!(manager.get_service::<dyn Logger>("Logger").unwrap().name(), "null");
}

#[test]
fn test_preference_cycle_is_configuration_error() {
    init_tracing();
    let manager = catalog(Arc::default())
        .configure(DiConfiguration::new().preference("A", "B").preference("B", "A"))
        .build();

    let error = manager.resolve("A").unwrap_err();
    assert!(error.is_configuration_error());
    match &error {
        DependencyError::InvalidPreference { preference_chain, .. } => {
            assert_eq!(preference_chain, "A -> B -> A");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(manager.get("A").unwrap_err().is_configuration_error());
    // 错误不影响其他类型
    assert!(manager.get("Formatter").is_ok());
}

#[test]
fn test_nested_preference_cycle_reports_dependency_path() {
    init_tracing();
    let manager = catalog(Arc::default())
        .configure(
            DiConfiguration::new()
                .preference("Logger", "LoggerImpl")
                .preference("LoggerImpl", "Logger"),
        )
        .build();

    let error = manager.get("Mailer").unwrap_err();
    assert!(error.is_configuration_error());
    assert!(error.to_string().contains("解析链: Mailer"));
    match &error {
        DependencyError::InvalidPreference {
            type_name,
            preference_chain,
            resolution_chain,
        } => {
            assert_eq!(type_name, "Logger");
            assert_eq!(preference_chain, "Logger -> LoggerImpl -> Logger");
            assert_eq!(resolution_chain, "Mailer");
        }
        other => panic!("unexpected error: {other}"),
    }

    // 顶层请求没有外层依赖
    match manager.create("Logger", Arguments::new()).unwrap_err() {
        DependencyError::InvalidPreference { resolution_chain, .. } => {
            assert_eq!(resolution_chain, "<root>");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_over_long_chain_is_rejected() {
    init_tracing();
    let settings = ContainerConfig {
        max_preference_hops: 2,
        ..ContainerConfig::default()
    };
    let manager = ObjectManagerImpl::builder()
        .with_settings(settings)
        .configure(
            DiConfiguration::new()
                .preference("A", "B")
                .preference("B", "C")
                .preference("C", "D"),
        )
        .build();

    assert!(manager.resolve("B").is_ok());
    assert!(manager.resolve("A").unwrap_err().is_configuration_error());
}

#[test]
fn test_later_configure_overrides_preference() {
    init_tracing();
    let manager = catalog_with_file_logger(Arc::new(AtomicUsize::new(0))).build();

    manager.configure(DiConfiguration::new().preference("Logger", "NullLogger"));

    assert_eq!(manager.resolve("Logger").unwrap(), TypeIdentifier::from("NullLogger"));
    assert_eq!(manager.get_service::<dyn Logger>("Logger").unwrap().name(), "null");
}
