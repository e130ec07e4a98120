//! 拦截器注册表

use dashmap::DashMap;
use di_abstractions::{Interceptor, MethodMatcher};
use infrastructure_common::MethodDescriptor;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// 某个方法适用的拦截器，按注册顺序排列
pub type ApplicableInterceptors = Arc<[Arc<dyn Interceptor>]>;

/// 全局拦截器注册表
static GLOBAL_INTERCEPTOR_REGISTRY: Lazy<Arc<InterceptorRegistry>> =
    Lazy::new(|| Arc::new(InterceptorRegistry::new()));

#[derive(Clone)]
struct InterceptorBinding {
    interceptor: Arc<dyn Interceptor>,
    matcher: MethodMatcher,
}

/// 拦截器注册表
///
/// 保存 (拦截器, 匹配谓词) 绑定，并按 `声明类型::方法名` 缓存适用的拦截器。
/// 缓存一旦建立，之后注册的拦截器不会作用于该方法，直到调用 [`InterceptorRegistry::rebuild_cache`]
/// 或 [`InterceptorRegistry::reset`]
#[derive(Default)]
pub struct InterceptorRegistry {
    bindings: RwLock<Vec<InterceptorBinding>>,
    cache: DashMap<String, ApplicableInterceptors>,
}

impl InterceptorRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享的注册表
    pub fn global() -> Arc<InterceptorRegistry> {
        GLOBAL_INTERCEPTOR_REGISTRY.clone()
    }

    /// 注册拦截器，不去重
    pub fn register(&self, interceptor: Arc<dyn Interceptor>, matcher: MethodMatcher) -> &Self {
        let mut bindings = self.bindings.write();
        bindings.push(InterceptorBinding {
            interceptor,
            matcher,
        });
        debug!("注册拦截器, 当前数量: {}", bindings.len());
        self
    }

    /// 获取方法适用的拦截器，首次访问时计算并缓存
    ///
    /// 计算在缓存条目的锁内完成，匹配谓词中不能再访问同一注册表
    pub fn get_applicable(&self, method: &MethodDescriptor) -> ApplicableInterceptors {
        let key = method.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            return cached.value().clone();
        }

        self.cache
            .entry(key.clone())
            .or_insert_with(|| {
                let applicable: ApplicableInterceptors = self
                    .bindings
                    .read()
                    .iter()
                    .filter(|binding| (binding.matcher)(method))
                    .map(|binding| binding.interceptor.clone())
                    .collect();
                trace!("缓存方法 {} 的拦截器: {} 个", key, applicable.len());
                applicable
            })
            .value()
            .clone()
    }

    /// 清空适用拦截器缓存
    pub fn rebuild_cache(&self) {
        self.cache.clear();
    }

    /// 清空拦截器绑定
    pub fn purge(&self) {
        self.bindings.write().clear();
    }

    /// 清空绑定与缓存
    pub fn reset(&self) {
        self.purge();
        self.rebuild_cache();
        debug!("拦截器注册表已重置");
    }

    /// 已注册的拦截器数量
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}

impl std::fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("bindings", &self.len())
            .field("cached_methods", &self.cache.len())
            .finish()
    }
}
