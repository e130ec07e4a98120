//! 代理工厂
//!
//! 为目标类型合成代理类型：代理包装目标实例，可重写的方法经由拦截管道调用，
//! 其余方法直接转发给目标实例

use super::pipeline::InterceptionPipeline;
use super::registry::InterceptorRegistry;
use crate::catalog::TypeCatalog;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use di_abstractions::{InterceptionContext, ObjectBuilder, TypeIntrospector};
use infrastructure_common::{
    Arguments, Component, DependencyError, DependencyResult, Instance, InvocationError,
    MethodDescriptor, MethodResult, TypeDescriptor, TypeName,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 代理类型名称序号
static PROXY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// 默认代理类型名称前缀
pub const DEFAULT_PROXY_PREFIX: &str = "BlueShiftProxy";

/// 合成的代理类型
#[derive(Debug)]
pub struct ProxyType {
    name: TypeName,
    target: TypeDescriptor,
    methods: Vec<MethodDescriptor>,
}

impl ProxyType {
    /// 代理类型名称
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// 被代理的目标类型
    pub fn target(&self) -> &TypeName {
        &self.target.name
    }

    /// 被重写（经由拦截管道调用）的方法
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// 使用构造参数创建目标实例并包装为代理
    fn instantiate(
        self: &Arc<Self>,
        arguments: Vec<Instance>,
        pipeline: &Arc<InterceptionPipeline>,
    ) -> DependencyResult<Instance> {
        let inner = self.target.instantiate(arguments)?;
        Ok(Arc::new(Proxy {
            proxy_type: self.clone(),
            inner,
            pipeline: pipeline.clone(),
        }))
    }
}

/// 代理实例
pub struct Proxy {
    proxy_type: Arc<ProxyType>,
    inner: Instance,
    pipeline: Arc<InterceptionPipeline>,
}

impl Proxy {
    /// 代理类型
    pub fn proxy_type(&self) -> &Arc<ProxyType> {
        &self.proxy_type
    }

    /// 被包装的目标实例
    pub fn inner(&self) -> &Instance {
        &self.inner
    }
}

impl Component for Proxy {
    fn type_name(&self) -> TypeName {
        self.proxy_type.name.clone()
    }

    fn invoke(&self, method: &str, arguments: &mut Arguments) -> MethodResult {
        let Some(descriptor) = self.proxy_type.method(method) else {
            return self.inner.invoke(method, arguments);
        };

        let bound = bind_arguments(descriptor, arguments)?;

        let target = (!descriptor.is_static).then(|| self.inner.clone());
        let mut context = InterceptionContext::new(target, descriptor.clone(), bound);
        let inner = &self.inner;
        let result = self
            .pipeline
            .run(&mut context, |args| inner.invoke(method, args));

        // 只回写调用方实际传入的引用参数
        let written = context.into_arguments();
        for (position, parameter) in descriptor.parameters.iter().enumerate() {
            if !parameter.by_reference || position >= arguments.len() {
                continue;
            }
            if let Some(value) = written.get(position) {
                arguments.set(position, value.clone());
            }
        }

        result
    }
}

/// 检查参数数量，返回补齐默认值后的参数副本
fn bind_arguments(method: &MethodDescriptor, arguments: &Arguments) -> Result<Arguments, InvocationError> {
    let required = method.required_parameter_count();
    if arguments.len() < required {
        return Err(InvocationError::ArgumentCount {
            method: method.name.clone(),
            expected: required,
            actual: arguments.len(),
        });
    }

    let mut bound = arguments.clone();
    for parameter in method.parameters.iter().skip(arguments.len()) {
        match &parameter.default {
            Some(default) => bound.push(default.clone()),
            None => break,
        }
    }
    Ok(bound)
}

/// 代理工厂
///
/// 每个目标类型只合成一次代理类型，合成结果登记到类型目录中，作为目标类型的 final 子类
pub struct ProxyFactory {
    catalog: Arc<TypeCatalog>,
    pipeline: Arc<InterceptionPipeline>,
    prefix: String,
    proxy_types: DashMap<TypeName, Arc<ProxyType>>,
}

impl ProxyFactory {
    /// 创建代理工厂，代理类型登记到 `catalog`
    pub fn new(catalog: Arc<TypeCatalog>, interceptors: Arc<InterceptorRegistry>) -> Self {
        Self {
            catalog,
            pipeline: Arc::new(InterceptionPipeline::new(interceptors)),
            prefix: DEFAULT_PROXY_PREFIX.to_string(),
            proxy_types: DashMap::new(),
        }
    }

    /// 设置代理类型名称前缀
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// 目标类型已合成的代理类型
    pub fn proxy_type_for(&self, class: &str) -> Option<Arc<ProxyType>> {
        self.proxy_types.get(class).map(|entry| entry.value().clone())
    }

    /// 全部已合成的 (目标类型, 代理类型名称)
    pub fn cached_proxy_types(&self) -> Vec<(TypeName, TypeName)> {
        let mut cached: Vec<_> = self
            .proxy_types
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().name.clone()))
            .collect();
        cached.sort();
        cached
    }

    /// 清空代理类型缓存，已登记到类型目录的代理类型保留
    pub fn reset(&self) {
        self.proxy_types.clear();
    }

    fn synthesize(&self, class: &TypeDescriptor) -> DependencyResult<Arc<ProxyType>> {
        if class.is_final() {
            return Err(DependencyError::proxy(
                class.name.clone(),
                "类型为 final，无法被继承",
            ));
        }
        if !class.is_instantiable() {
            return Err(DependencyError::proxy(class.name.clone(), "类型无法实例化"));
        }

        let name = self.generate_name(&class.name);
        let methods = self.catalog.overridable_methods(&class.name);
        let proxy_type = Arc::new(ProxyType {
            name: name.clone(),
            target: class.clone(),
            methods,
        });

        let factory_type = proxy_type.clone();
        let pipeline = self.pipeline.clone();
        let mut descriptor = TypeDescriptor::class(name.clone())
            .sealed()
            .extends(class.name.clone())
            .with_methods(proxy_type.methods.iter().cloned())
            .with_factory(move |arguments| {
                factory_type
                    .instantiate(arguments, &pipeline)
                    .map_err(Into::into)
            });
        descriptor.constructor = class.constructor.clone();
        self.catalog.register(descriptor);

        debug!(
            "合成代理类型: {} -> {}, 重写方法 {} 个",
            class.name,
            name,
            proxy_type.methods.len()
        );
        Ok(proxy_type)
    }

    fn generate_name(&self, target: &TypeName) -> TypeName {
        let sanitized = target.as_str().replace("::", "_").replace('\\', "_");
        loop {
            let sequence = PROXY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
            let name = format!("{}_{}_{}", self.prefix, sanitized, sequence);
            if !self.catalog.contains(&name) {
                return TypeName::from(name);
            }
        }
    }
}

impl ObjectBuilder for ProxyFactory {
    fn build(&self, class: &TypeDescriptor, arguments: Vec<Instance>) -> DependencyResult<Instance> {
        let proxy_type = match self.proxy_types.entry(class.name.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry.insert(self.synthesize(class)?).clone(),
        };
        proxy_type.instantiate(arguments, &self.pipeline)
    }
}

impl std::fmt::Debug for ProxyFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyFactory")
            .field("prefix", &self.prefix)
            .field("proxy_types", &self.cached_proxy_types())
            .finish()
    }
}
