//! component-macros 与容器的集成测试

use component_macros::{component_methods, Injectable};
use di_impl::{Container, TypeCatalog};
use infrastructure_common::{
    arguments, Arguments, Component, ConstructorIssue, DependencyError, Injectable, Instance,
    InvocationError, TypeDescriptor, TypeName, Visibility,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("订单 {0} 不存在")]
struct OrderNotFound(u64);

#[derive(Injectable)]
#[injectable(name = "shop::Clock")]
struct Clock {
    ticks: AtomicU64,
}

#[component_methods]
impl Clock {
    pub fn now(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::SeqCst) + 1000
    }
}

#[derive(Debug, Injectable)]
#[injectable(name = "shop::SqlRepository", implements = "shop::Repository")]
struct SqlRepository;

#[component_methods]
impl SqlRepository {
    pub fn find(&self, id: u64) -> Result<String, OrderNotFound> {
        match id {
            1 => Ok("book".to_string()),
            _ => Err(OrderNotFound(id)),
        }
    }

    pub fn tags(&self) -> &[&'static str] {
        &["new", "paid"]
    }

    #[sealed]
    pub fn dialect(&self) -> String {
        "sqlite".to_string()
    }

    pub fn table() -> String {
        "orders".to_string()
    }
}

#[derive(Injectable)]
#[injectable(name = "shop::OrderService", sealed)]
struct OrderService {
    #[inject("shop::Repository")]
    repository: Instance,
    #[inject]
    clock: Arc<Clock>,
    processed: AtomicU64,
}

#[component_methods]
impl OrderService {
    pub fn describe(&self, id: u64, #[default(">".to_string())] prefix: &str) -> Option<String> {
        let name = self
            .repository
            .call("find", arguments![id])
            .ok()
            .flatten()
            .and_then(|value| value.get::<String>())?;
        self.processed.fetch_add(1, Ordering::SeqCst);
        Some(format!("{}{}@{}", prefix, name, self.clock.now()))
    }

    pub fn stamp(&self, log: &mut Vec<String>) {
        log.push(format!("stamp@{}", self.clock.now()));
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    #[skip]
    pub fn generic<T: Default>(&self) -> T {
        T::default()
    }
}

fn container() -> Container {
    let catalog = Arc::new(TypeCatalog::new());
    catalog
        .register(TypeDescriptor::interface("shop::Repository"))
        .register_type::<Clock>()
        .register_type::<SqlRepository>()
        .register_type::<OrderService>();
    let mut container = Container::new(catalog);
    container
        .register_type("shop::Repository", "shop::SqlRepository")
        .unwrap();
    container
}

#[test]
fn test_derived_descriptor() {
    let descriptor = OrderService::descriptor();

    assert_eq!(descriptor.name.as_str(), "shop::OrderService");
    assert!(descriptor.is_final());
    let constructor = descriptor.constructor.as_ref().unwrap();
    assert_eq!(constructor.visibility, Visibility::Public);
    assert_eq!(
        constructor.signature(),
        vec![
            ("repository".to_string(), Some(TypeName::from("shop::Repository"))),
            ("clock".to_string(), Some(TypeName::from("shop::Clock"))),
        ]
    );

    let method_names: Vec<_> = descriptor.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(method_names, vec!["describe", "stamp", "processed"]);

    let describe = &descriptor.methods[0];
    assert_eq!(describe.declaring_type, "shop::OrderService");
    assert_eq!(describe.required_parameter_count(), 1);
    assert!(describe.parameters[1].default.is_some());

    let stamp = &descriptor.methods[1];
    assert!(stamp.parameters[0].by_reference);
}

#[test]
fn test_method_flags() {
    let methods = SqlRepository::methods();
    let by_name = |name: &str| methods.iter().find(|m| m.name == name).unwrap();

    assert!(by_name("dialect").is_final);
    assert!(!by_name("dialect").is_overridable());
    assert!(by_name("table").is_static);
    assert!(by_name("tags").returns_reference);
    assert!(!by_name("find").returns_reference);

    let repository = SqlRepository::descriptor();
    assert_eq!(repository.interfaces, vec![TypeName::from("shop::Repository")]);
    assert!(repository.constructor.is_none());
}

#[test]
fn test_invoke_dispatch() {
    let repository = SqlRepository;

    let found = repository.invoke("find", &mut arguments![1_u64]).unwrap();
    assert_eq!(found.and_then(|v| v.get::<String>()).as_deref(), Some("book"));

    let error = repository.invoke("find", &mut arguments![7_u64]).unwrap_err();
    assert_eq!(error.to_string(), "订单 7 不存在");

    let tags = repository.invoke("tags", &mut Arguments::new()).unwrap();
    assert_eq!(
        tags.and_then(|v| v.get::<Vec<&'static str>>()),
        Some(vec!["new", "paid"])
    );

    let table = repository.invoke("table", &mut Arguments::new()).unwrap();
    assert_eq!(table.and_then(|v| v.get::<String>()).as_deref(), Some("orders"));
}

#[test]
fn test_invoke_argument_errors() {
    let repository = SqlRepository;

    let error = repository.invoke("drop", &mut Arguments::new()).unwrap_err();
    assert_eq!(
        error.downcast_ref::<InvocationError>(),
        Some(&InvocationError::undefined_method("shop::SqlRepository", "drop"))
    );

    let error = repository.invoke("find", &mut Arguments::new()).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<InvocationError>(),
        Some(InvocationError::ArgumentCount { expected: 1, actual: 0, .. })
    ));

    let error = repository
        .invoke("find", &mut arguments!["1".to_string()])
        .unwrap_err();
    assert!(matches!(
        error.downcast_ref::<InvocationError>(),
        Some(InvocationError::ArgumentType { position: 1, .. })
    ));
}

#[test]
fn test_container_resolves_derived_components() {
    let container = container();

    let service = container.resolve("shop::OrderService").unwrap();
    let described = service.call("describe", arguments![1_u64]).unwrap();
    assert_eq!(
        described.and_then(|v| v.get::<String>()).as_deref(),
        Some(">book@1000")
    );

    let described = service
        .call("describe", arguments![1_u64, "#".to_string()])
        .unwrap();
    assert_eq!(
        described.and_then(|v| v.get::<String>()).as_deref(),
        Some("#book@1001")
    );

    let missing = service.call("describe", arguments![9_u64]).unwrap();
    assert!(missing.is_none());

    let typed = service.downcast_ref::<OrderService>().unwrap();
    assert_eq!(typed.processed(), 2);
    assert_eq!(typed.generic::<u8>(), 0);
}

#[test]
fn test_by_reference_parameter_is_written_back() {
    let container = container();
    let service = container.resolve("shop::OrderService").unwrap();

    let mut args = arguments![vec!["start".to_string()]];
    service.invoke("stamp", &mut args).unwrap();

    let log = args.get_as::<Vec<String>>(0).unwrap();
    assert_eq!(log, &vec!["start".to_string(), "stamp@1000".to_string()]);
}

#[test]
fn test_proxied_dependency_is_injected_as_instance() {
    let mut container = container();
    container.proxy_type("shop::Repository");

    let service = container.resolve_as::<OrderService>("shop::OrderService").unwrap();
    assert!(service
        .repository
        .type_name()
        .as_str()
        .starts_with("BlueShiftProxy_shop_SqlRepository_"));

    let described = service.describe(1, ">").unwrap();
    assert_eq!(described, ">book@1000");

    // 代理实例不能转换为目标类型本身
    let error = container
        .resolve_as::<SqlRepository>("shop::Repository")
        .unwrap_err();
    assert!(matches!(error, DependencyError::TypeMismatch { .. }));
}

#[test]
fn test_private_constructor_from_attribute() {
    #[derive(Injectable)]
    #[injectable(name = "shop::Singleton", constructor = "private")]
    struct Singleton;

    #[component_methods]
    impl Singleton {}

    let catalog = Arc::new(TypeCatalog::new());
    catalog.register_type::<Singleton>();
    let container = Container::new(catalog);

    let error = container.resolve("shop::Singleton").unwrap_err();
    assert!(matches!(
        error,
        DependencyError::InvalidConstructor {
            issue: ConstructorIssue::NotPublic,
            ..
        }
    ));
}

#[test]
fn test_factory_reports_missing_arguments() {
    let descriptor = OrderService::descriptor();
    let clock: Instance = Arc::new(Clock {
        ticks: AtomicU64::new(0),
    });

    let error = descriptor.instantiate(vec![clock]).unwrap_err();
    assert!(matches!(error, DependencyError::ComponentCreationFailed { .. }));
    assert!(error.to_string().contains("缺少第 2 个构造参数"));
}
