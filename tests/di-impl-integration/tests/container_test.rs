//! 容器注册与解析集成测试


use di_abstractions::{DiContainer, ObjectBuilder, TypeIntrospector};
use di_impl::{Container, ContainerBuilder, ContainerSettings, TypeCatalog};
use fixtures::{catalog, container, Bar, Baz, FooImplementation, Plain};
use infrastructure_common::{
    downcast_instance, Arguments, Component, ConstructorIssue, DependencyError, DependencyResult,
    Instance, InvocationError, MethodDescriptor, MethodResult, TypeDescriptor, TypeName,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_new_container_is_empty() {
    let container = container();

    assert!(container.get_mappings().is_empty());
    assert!(container.get_dependency_graph().is_empty());
    assert_eq!(container.settings(), &ContainerSettings::default());
}

#[test]
fn test_cannot_register_type_of_wrong_type() {
    let mut container = container();

    let error = container.register_type("Foo", "Plain").unwrap_err();
    assert!(matches!(error, DependencyError::Registration { .. }));
    assert!(container.get_mappings().is_empty());

    let error = container.register_type("Foo", "Missing").unwrap_err();
    assert!(matches!(error, DependencyError::Registration { .. }));
}

#[test]
fn test_cannot_register_instance_of_wrong_type() {
    let mut container = container();

    let error = container
        .register_instance("Foo", Arc::new(Plain))
        .unwrap_err();
    assert!(matches!(error, DependencyError::Registration { .. }));
    assert!(!container.has_instance("Foo"));
}

#[test]
fn test_register_instance_must_be_a_known_class() {
    struct Stranger;

    impl Component for Stranger {
        fn type_name(&self) -> TypeName {
            TypeName::from("Stranger")
        }

        fn invoke(&self, method: &str, _arguments: &mut Arguments) -> MethodResult {
            Err(InvocationError::undefined_method("Stranger", method).into())
        }
    }

    let mut container = container();
    let error = container
        .register_instance("Foo", Arc::new(Stranger))
        .unwrap_err();
    assert!(matches!(error, DependencyError::InvalidArgument { .. }));
}

#[test]
fn test_resolve_instance_returns_same_object() {
    let mut container = container();
    let instance: Instance = Arc::new(FooImplementation);
    container.register_instance("Foo", instance.clone()).unwrap();

    let resolved = container.resolve("Foo").unwrap();
    assert!(Arc::ptr_eq(&instance, &resolved));
    assert!(container.get_dependency_graph().is_empty());
}

/// 统计内省调用次数
struct CountingIntrospector {
    inner: Arc<TypeCatalog>,
    calls: AtomicUsize,
}

impl CountingIntrospector {
    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl TypeIntrospector for CountingIntrospector {
    fn is_known(&self, type_name: &TypeName) -> bool {
        self.tick();
        self.inner.is_known(type_name)
    }

    fn is_instantiable(&self, type_name: &TypeName) -> bool {
        self.tick();
        self.inner.is_instantiable(type_name)
    }

    fn is_final(&self, type_name: &TypeName) -> bool {
        self.tick();
        self.inner.is_final(type_name)
    }

    fn has_constructor(&self, type_name: &TypeName) -> bool {
        self.tick();
        self.inner.has_constructor(type_name)
    }

    fn is_constructor_public(&self, type_name: &TypeName) -> bool {
        self.tick();
        self.inner.is_constructor_public(type_name)
    }

    fn constructor_signature(&self, type_name: &TypeName) -> Vec<(String, Option<TypeName>)> {
        self.tick();
        self.inner.constructor_signature(type_name)
    }

    fn overridable_methods(&self, type_name: &TypeName) -> Vec<MethodDescriptor> {
        self.tick();
        self.inner.overridable_methods(type_name)
    }

    fn implements_or_extends(&self, concrete: &TypeName, abstract_type: &TypeName) -> bool {
        self.tick();
        self.inner.implements_or_extends(concrete, abstract_type)
    }

    fn descriptor(&self, type_name: &TypeName) -> Option<TypeDescriptor> {
        self.tick();
        self.inner.descriptor(type_name)
    }
}

#[test]
fn test_resolve_instance_skips_introspection() {
    let introspector = Arc::new(CountingIntrospector {
        inner: catalog(),
        calls: AtomicUsize::new(0),
    });
    let mut container = Container::builder()
        .with_introspector(introspector.clone())
        .build();
    container
        .register_instance("Foo", Arc::new(FooImplementation))
        .unwrap();

    let before = introspector.count();
    container.resolve("Foo").unwrap();
    assert_eq!(introspector.count(), before);
}

#[test]
fn test_resolve_mapped_type() {
    let mut container = container();
    container.register_type("Foo", "FooImplementation").unwrap();

    let resolved = container.resolve("Foo").unwrap();
    assert_eq!(resolved.type_name(), "FooImplementation");
    assert_eq!(
        container.get_mappings().get("Foo").map(TypeName::as_str),
        Some("FooImplementation")
    );
}

#[test]
fn test_resolve_unmapped_uninstantiable_type() {
    let container = container();

    let error = container.resolve("Foo").unwrap_err();
    assert!(matches!(error, DependencyError::Unresolvable { .. }));
}

#[test]
fn test_resolve_unmapped_instantiable_type() {
    let container = container();

    let resolved = container.resolve("FooImplementation").unwrap();
    assert!(resolved.downcast_ref::<FooImplementation>().is_some());
}

#[test]
fn test_resolve_type_with_non_public_constructor() {
    let container = container();

    let error = container.resolve("BadConstructor").unwrap_err();
    match error {
        DependencyError::InvalidConstructor { type_name, issue } => {
            assert_eq!(type_name, "BadConstructor");
            assert_eq!(issue, ConstructorIssue::NotPublic);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_resolve_type_with_untyped_constructor_parameter() {
    let container = container();

    let error = container.resolve("Untyped").unwrap_err();
    match error {
        DependencyError::InvalidConstructor { type_name, issue } => {
            assert_eq!(type_name, "Untyped");
            assert_eq!(
                issue,
                ConstructorIssue::UnresolvableParameter {
                    position: 1,
                    name: "argument".to_string(),
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_resolve_type_with_dependencies() {
    let container = container();

    let baz = container.resolve_as::<Baz>("Baz").unwrap();
    assert_eq!(baz.bar.foo.type_name(), "FooImplementation");

    let graph = container.get_dependency_graph();
    assert_eq!(graph.get("Baz"), Some(&[TypeName::from("Bar")][..]));
    assert_eq!(graph.get("Bar"), Some(&[TypeName::from("FooImplementation")][..]));
    assert_eq!(graph.get("FooImplementation"), Some(&[][..]));
}

#[test]
fn test_each_resolution_creates_new_object() {
    let container = container();

    let first = container.resolve_as::<Bar>("Bar").unwrap();
    let second = container.resolve_as::<Bar>("Bar").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first.foo, &second.foo));
}

#[test]
fn test_instance_binding_is_injected_into_dependents() {
    let mut container = container();
    let foo = Arc::new(FooImplementation);
    container
        .register_instance("FooImplementation", foo.clone())
        .unwrap();

    let bar = container.resolve_as::<Bar>("Bar").unwrap();
    assert!(Arc::ptr_eq(&foo, &bar.foo));
}

#[test]
fn test_resolve_type_with_a_cyclic_dependency() {
    let container = container();

    let error = container.resolve("Cyclic1").unwrap_err();
    match &error {
        DependencyError::CyclicDependency {
            dependent,
            dependency,
        } => {
            assert_eq!(dependent, &"Cyclic2");
            assert_eq!(dependency, &"Cyclic1");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(error.to_string(), "检测到循环依赖: Cyclic2 与 Cyclic1");
    assert!(!container.get_dependency_graph().contains("Cyclic1"));
}

#[test]
fn test_resolve_type_with_a_longer_cycle() {
    let container = container();

    let error = container.resolve("RingA").unwrap_err();
    match &error {
        DependencyError::CyclicDependency {
            dependent,
            dependency,
        } => {
            assert_eq!(dependent, &"RingC");
            assert_eq!(dependency, &"RingA");
        }
        other => panic!("unexpected error: {other}"),
    }

    // 环上的类型都不会留下依赖图条目，序列化结果中也不包含它们
    let graph = container.get_dependency_graph();
    assert_eq!(graph.len(), 0);
    assert!(!container.serialize().unwrap().contains("Ring"));

    // 从环上的任一类型开始解析都报告循环依赖
    let error = container.resolve("RingB").unwrap_err();
    assert!(matches!(error, DependencyError::CyclicDependency { .. }));
}

#[test]
fn test_resolution_depth_is_limited() {
    let settings = ContainerSettings {
        max_resolution_depth: 1,
        ..ContainerSettings::default()
    };
    let container = Container::builder()
        .with_catalog(catalog())
        .with_settings(settings)
        .build();

    let error = container.resolve("Baz").unwrap_err();
    assert!(matches!(error, DependencyError::DepthExceeded { max_depth: 1, .. }));
}

/// 返回固定实例的对象构建器
struct FixedBuilder {
    instance: Instance,
    calls: AtomicUsize,
}

impl ObjectBuilder for FixedBuilder {
    fn build(&self, class: &TypeDescriptor, arguments: Vec<Instance>) -> DependencyResult<Instance> {
        assert_eq!(class.name, "FooImplementation");
        assert!(arguments.is_empty());
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.instance.clone())
    }
}

#[test]
fn test_resolve_using_object_builder() {
    let builder = Arc::new(FixedBuilder {
        instance: Arc::new(Plain),
        calls: AtomicUsize::new(0),
    });

    let mut container = container();
    container.set_object_builder(builder.clone());
    container
        .register_type("Foo", "FooImplementation")
        .unwrap()
        .proxy_type("Foo");

    let resolved = container.resolve("Foo").unwrap();
    assert!(Arc::ptr_eq(&resolved, &builder.instance));
    assert_eq!(builder.calls.load(Ordering::SeqCst), 1);

    // 未标记代理的类型不经过对象构建器
    container.resolve("FooImplementation").unwrap();
    assert_eq!(builder.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_serialization() {
    let mut container = container();
    container.register_type("Foo", "FooImplementation").unwrap();
    container.resolve("Foo").unwrap();
    container.resolve("Bar").unwrap();

    let mappings = container.get_mappings();
    let dependency_graph = container.get_dependency_graph();
    let serialized = container.serialize().unwrap();

    let restored =
        Container::deserialize(&serialized, ContainerBuilder::new().with_catalog(catalog()))
            .unwrap();
    assert_eq!(restored.get_mappings(), mappings);
    assert_eq!(restored.get_dependency_graph(), dependency_graph);

    // 恢复后的容器可以直接解析
    let bar = restored.resolve("Bar").unwrap();
    assert!(downcast_instance::<Bar>(bar).is_ok());
}

#[test]
fn test_deserialize_rejects_malformed_input() {
    let error = Container::deserialize("{\"typeMappings\":", ContainerBuilder::new()).unwrap_err();
    assert!(matches!(error, DependencyError::Serialization { .. }));
}

#[test]
fn test_container_through_trait_object_methods() {
    fn register<C: DiContainer>(container: &mut C) -> DependencyResult<()> {
        container.register_type(&TypeName::from("Foo"), &TypeName::from("FooImplementation"))?;
        Ok(())
    }

    let mut container = container();
    register(&mut container).unwrap();

    let resolved = DiContainer::resolve(&container, &TypeName::from("Foo")).unwrap();
    assert_eq!(resolved.type_name(), "FooImplementation");
    assert_eq!(DiContainer::get_mappings(&container).len(), 1);
}
