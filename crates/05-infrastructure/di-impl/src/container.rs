//! 依赖注入容器实现

use crate::catalog::TypeCatalog;
use crate::graph::DependencyGraphBuilder;
use crate::interception::{InterceptorRegistry, ProxyFactory};
use crate::registry::Registry;
use crate::settings::ContainerSettings;
use crate::snapshot::ContainerSnapshot;
use di_abstractions::{
    DependencyGraph, DiContainer, Interceptor, MethodMatcher, ObjectBuilder, TypeIntrospector,
};
use infrastructure_common::{
    downcast_instance, Component, DependencyError, DependencyResult, Instance, TypeDescriptor,
    TypeName,
};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// 依赖注入容器
///
/// 按类型名称解析实例：实例绑定优先，其次按类型映射与依赖图递归构造依赖，
/// 标记为需要代理的类型交给对象构建器创建
pub struct Container {
    catalog: Arc<TypeCatalog>,
    introspector: Arc<dyn TypeIntrospector>,
    interceptors: Arc<InterceptorRegistry>,
    settings: ContainerSettings,
    registry: Registry,
    dependency_graph: RwLock<DependencyGraph>,
    types_to_proxy: HashSet<TypeName>,
    object_builder: OnceCell<Arc<dyn ObjectBuilder>>,
}

impl Container {
    /// 使用给定类型目录与默认配置创建容器
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        ContainerBuilder::new().with_catalog(catalog).build()
    }

    /// 创建容器构建器
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// 类型目录
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    /// 拦截器注册表
    pub fn interceptors(&self) -> &Arc<InterceptorRegistry> {
        &self.interceptors
    }

    /// 容器配置
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// 设置用于创建代理的对象构建器
    pub fn set_object_builder(&mut self, builder: Arc<dyn ObjectBuilder>) -> &mut Self {
        self.object_builder = OnceCell::with_value(builder);
        self
    }

    /// 获取对象构建器，未设置时创建默认的 [`ProxyFactory`]
    pub fn object_builder(&self) -> Arc<dyn ObjectBuilder> {
        self.object_builder
            .get_or_init(|| {
                let factory = ProxyFactory::new(self.catalog.clone(), self.interceptors.clone())
                    .with_prefix(self.settings.proxy_name_prefix.clone());
                Arc::new(factory)
            })
            .clone()
    }

    /// 标记类型在解析时需要代理，与是否注册了拦截器无关
    pub fn proxy_type(&mut self, type_name: impl Into<TypeName>) -> &mut Self {
        let type_name = type_name.into();
        debug!("标记代理类型: {}", type_name);
        self.types_to_proxy.insert(type_name);
        self
    }

    /// 类型是否被标记为代理
    pub fn is_proxied(&self, type_name: &str) -> bool {
        self.types_to_proxy.contains(type_name)
    }

    /// 注册拦截器
    pub fn register_interceptor(
        &mut self,
        interceptor: Arc<dyn Interceptor>,
        matcher: MethodMatcher,
    ) -> &mut Self {
        self.interceptors.register(interceptor, matcher);
        self
    }

    /// 注册类型映射
    ///
    /// 具体类型必须是已知类型，并继承或实现抽象类型（或就是抽象类型本身）
    pub fn register_type(
        &mut self,
        abstract_type: impl Into<TypeName>,
        concrete: impl Into<TypeName>,
    ) -> DependencyResult<&mut Self> {
        let abstract_type = abstract_type.into();
        let concrete = concrete.into();

        if !self.introspector.is_known(&concrete)
            || !self.introspector.implements_or_extends(&concrete, &abstract_type)
        {
            return Err(DependencyError::registration(concrete, abstract_type));
        }

        debug!("注册类型映射: {} -> {}", abstract_type, concrete);
        self.registry.add_mapping(abstract_type, concrete);
        Ok(self)
    }

    /// 注册实例绑定
    ///
    /// 实例的运行时类型必须是已知的类，并继承或实现抽象类型
    pub fn register_instance(
        &mut self,
        abstract_type: impl Into<TypeName>,
        instance: Instance,
    ) -> DependencyResult<&mut Self> {
        let abstract_type = abstract_type.into();
        let actual = instance.type_name();

        let is_class = self
            .introspector
            .descriptor(&actual)
            .is_some_and(|descriptor| !descriptor.is_interface());
        if !is_class {
            return Err(DependencyError::invalid_argument(format!(
                "第二个参数必须是对象实例, {} 不是已知的类",
                actual
            )));
        }

        if !self.introspector.implements_or_extends(&actual, &abstract_type) {
            return Err(DependencyError::registration(actual, abstract_type));
        }

        debug!("注册实例绑定: {} -> {}", abstract_type, actual);
        self.registry.add_instance(abstract_type, instance);
        Ok(self)
    }

    /// 是否存在实例绑定
    pub fn has_instance(&self, type_name: &str) -> bool {
        self.registry.has_instance(type_name)
    }

    /// 按类型名称解析实例
    pub fn resolve(&self, type_name: impl Into<TypeName>) -> DependencyResult<Instance> {
        self.resolve_at(&type_name.into(), 0)
    }

    /// 解析并转换为具体类型
    ///
    /// 代理实例不是目标类型本身，对代理类型使用时返回 [`DependencyError::TypeMismatch`]
    pub fn resolve_as<T: Component>(
        &self,
        type_name: impl Into<TypeName>,
    ) -> DependencyResult<Arc<T>> {
        downcast_instance::<T>(self.resolve(type_name)?)
    }

    /// 当前的类型映射
    pub fn get_mappings(&self) -> BTreeMap<TypeName, TypeName> {
        self.registry.mappings().clone()
    }

    /// 当前的依赖图快照
    pub fn get_dependency_graph(&self) -> DependencyGraph {
        self.dependency_graph.read().clone()
    }

    /// 当前可持久化的状态
    pub fn snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            type_mappings: self.get_mappings(),
            dependency_graph: self.get_dependency_graph(),
        }
    }

    /// 序列化类型映射与依赖图
    pub fn serialize(&self) -> DependencyResult<String> {
        self.snapshot().to_json()
    }

    /// 从序列化结果恢复容器，其余部分由构建器提供
    pub fn deserialize(json: &str, builder: ContainerBuilder) -> DependencyResult<Self> {
        let snapshot = ContainerSnapshot::from_json(json)?;
        Ok(builder.with_snapshot(snapshot).build())
    }

    fn resolve_at(&self, type_name: &TypeName, depth: usize) -> DependencyResult<Instance> {
        if let Some(instance) = self.registry.instance(type_name.as_str()) {
            trace!("使用实例绑定: {}", type_name);
            return Ok(instance.clone());
        }

        if depth > self.settings.max_resolution_depth {
            return Err(DependencyError::DepthExceeded {
                type_name: type_name.clone(),
                max_depth: self.settings.max_resolution_depth,
            });
        }

        self.ensure_graph(type_name)?;

        let (class, graph_key) = match self.registry.mapping(type_name.as_str()) {
            Some(concrete) => {
                let concrete = concrete.clone();
                let graph_key = if self.introspector.has_constructor(type_name) {
                    type_name.clone()
                } else {
                    self.ensure_graph(&concrete)?;
                    concrete.clone()
                };
                (self.class_descriptor(&concrete)?, graph_key)
            }
            None => {
                if !self.introspector.is_instantiable(type_name) {
                    return Err(DependencyError::unresolvable(type_name.clone()));
                }
                (self.class_descriptor(type_name)?, type_name.clone())
            }
        };

        let dependencies = self
            .dependency_graph
            .read()
            .get(graph_key.as_str())
            .map(<[TypeName]>::to_vec)
            .unwrap_or_default();

        let arguments = dependencies
            .iter()
            .map(|dependency| self.resolve_at(dependency, depth + 1))
            .collect::<DependencyResult<Vec<_>>>()?;

        if self.types_to_proxy.contains(type_name) {
            trace!("通过对象构建器创建: {} ({})", type_name, class.name);
            return self.object_builder().build(&class, arguments);
        }

        trace!("直接构造: {} ({})", type_name, class.name);
        class.instantiate(arguments)
    }

    fn ensure_graph(&self, type_name: &TypeName) -> DependencyResult<()> {
        if self.dependency_graph.read().contains(type_name.as_str()) {
            return Ok(());
        }

        let mut graph = self.dependency_graph.write();
        DependencyGraphBuilder::new(self.introspector.as_ref(), self.settings.max_resolution_depth)
            .build(&mut graph, type_name)
    }

    fn class_descriptor(&self, type_name: &TypeName) -> DependencyResult<TypeDescriptor> {
        self.introspector
            .descriptor(type_name)
            .ok_or_else(|| DependencyError::unresolvable(type_name.clone()))
    }
}

impl DiContainer for Container {
    fn register_type(
        &mut self,
        abstract_type: &TypeName,
        concrete: &TypeName,
    ) -> DependencyResult<&mut Self> {
        Container::register_type(self, abstract_type, concrete)
    }

    fn register_instance(
        &mut self,
        abstract_type: &TypeName,
        instance: Instance,
    ) -> DependencyResult<&mut Self> {
        Container::register_instance(self, abstract_type, instance)
    }

    fn proxy_type(&mut self, type_name: &TypeName) -> &mut Self {
        Container::proxy_type(self, type_name)
    }

    fn register_interceptor(
        &mut self,
        interceptor: Arc<dyn Interceptor>,
        matcher: MethodMatcher,
    ) -> &mut Self {
        Container::register_interceptor(self, interceptor, matcher)
    }

    fn resolve(&self, type_name: &TypeName) -> DependencyResult<Instance> {
        self.resolve_at(type_name, 0)
    }

    fn get_mappings(&self) -> BTreeMap<TypeName, TypeName> {
        Container::get_mappings(self)
    }

    fn get_dependency_graph(&self) -> DependencyGraph {
        Container::get_dependency_graph(self)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .field("dependency_graph", &*self.dependency_graph.read())
            .field("types_to_proxy", &self.types_to_proxy)
            .finish_non_exhaustive()
    }
}

/// 容器构建器
#[derive(Default)]
pub struct ContainerBuilder {
    catalog: Option<Arc<TypeCatalog>>,
    introspector: Option<Arc<dyn TypeIntrospector>>,
    interceptors: Option<Arc<InterceptorRegistry>>,
    object_builder: Option<Arc<dyn ObjectBuilder>>,
    settings: ContainerSettings,
    snapshot: Option<ContainerSnapshot>,
}

impl ContainerBuilder {
    /// 创建构建器，未设置的部分使用默认值
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置类型目录，同时作为默认的类型内省实现
    pub fn with_catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 替换依赖图构建与解析使用的类型内省实现
    pub fn with_introspector(mut self, introspector: Arc<dyn TypeIntrospector>) -> Self {
        self.introspector = Some(introspector);
        self
    }

    /// 使用指定的拦截器注册表
    pub fn with_interceptors(mut self, interceptors: Arc<InterceptorRegistry>) -> Self {
        self.interceptors = Some(interceptors);
        self
    }

    /// 使用指定的对象构建器
    pub fn with_object_builder(mut self, builder: Arc<dyn ObjectBuilder>) -> Self {
        self.object_builder = Some(builder);
        self
    }

    /// 使用指定的容器配置
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 使用持久化的类型映射与依赖图初始化
    pub fn with_snapshot(mut self, snapshot: ContainerSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// 构建容器
    pub fn build(self) -> Container {
        let catalog = self
            .catalog
            .unwrap_or_else(|| Arc::new(TypeCatalog::new()));
        let introspector = self
            .introspector
            .unwrap_or_else(|| catalog.clone() as Arc<dyn TypeIntrospector>);
        let interceptors = self.interceptors.unwrap_or_else(|| {
            if self.settings.share_global_interceptors {
                InterceptorRegistry::global()
            } else {
                Arc::new(InterceptorRegistry::new())
            }
        });
        let (registry, dependency_graph) = match self.snapshot {
            Some(snapshot) => (
                Registry::with_mappings(snapshot.type_mappings),
                snapshot.dependency_graph,
            ),
            None => (Registry::new(), DependencyGraph::new()),
        };
        let object_builder = match self.object_builder {
            Some(builder) => OnceCell::with_value(builder),
            None => OnceCell::new(),
        };

        Container {
            catalog,
            introspector,
            interceptors,
            settings: self.settings,
            registry,
            dependency_graph: RwLock::new(dependency_graph),
            types_to_proxy: HashSet::new(),
            object_builder,
        }
    }
}
